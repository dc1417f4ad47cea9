//! Dispatch tests: detection, routing and PL011 forwarding

mod common;

use core::fmt::Write as _;

use common::*;
use dual_serial::*;
use mockall::mock;
use mockall::predicate::eq;

mock! {
    pub Backend {}

    impl Pl011Uart for Backend {
        fn clock_frequency(&self) -> u32;
        fn initialize_port(
            &self,
            base: usize,
            clock_hz: u32,
            request: &AttributeRequest,
        ) -> Result<LineAttributes>;
        fn write(&self, base: usize, buffer: &[u8]) -> usize;
        fn read(&self, base: usize, buffer: &mut [u8]) -> usize;
        fn poll(&self, base: usize) -> bool;
        fn set_control(&self, base: usize, control: u32) -> Result<()>;
        fn get_control(&self, base: usize) -> Result<ControlSignals>;
    }
}

const PL011_BASE: usize = 0xFE20_1000;

fn port(sim: &SimulatedSoc, backend: MockBackend) -> DualSerialPort<&SimulatedSoc, MockBackend> {
    DualSerialPort::new(sim, backend, sim.layout, SerialConfig::rpi4())
}

fn attributes_8n1() -> LineAttributes {
    LineAttributes {
        baud_rate: 115_200,
        receive_fifo_depth: 32,
        timeout_us: 1_000_000,
        parity: Parity::None,
        data_bits: 8,
        stop_bits: StopBits::One,
    }
}

#[test]
fn test_no_detection_before_first_operation() {
    let sim = SimulatedSoc::pl011();
    let port = port(&sim, MockBackend::new());

    assert_eq!(port.variant(), HardwareVariant::Undetected);
    assert_eq!(sim.state.borrow().fsel1_reads, 0);
}

#[test]
fn test_detection_runs_once() {
    let sim = SimulatedSoc::pl011();
    let mut backend = MockBackend::new();
    backend.expect_poll().with(eq(PL011_BASE)).times(3).return_const(false);
    let port = port(&sim, backend);

    for _ in 0..3 {
        assert!(!port.poll());
    }
    assert_eq!(port.variant(), HardwareVariant::Pl011);
    assert_eq!(sim.state.borrow().fsel1_reads, 1);
}

#[test]
fn test_mini_uart_selected_by_pinmux() {
    let sim = SimulatedSoc::mini_uart();
    // any call on the PL011 back-end would panic
    let port = port(&sim, MockBackend::new());

    assert_eq!(port.write(b"hi"), 2);
    assert_eq!(port.variant(), HardwareVariant::MiniUart16550);
    assert_eq!(sim.tx(), b"hi");
    assert!(matches!(port.transport(), ActiveTransport::MiniUart(_)));
}

#[test]
fn test_pl011_initialize_uses_defaults() {
    let sim = SimulatedSoc::pl011();
    let mut backend = MockBackend::new();
    backend.expect_clock_frequency().times(1).return_const(48_000_000u32);
    backend
        .expect_initialize_port()
        .withf(|base, clock_hz, request| {
            *base == PL011_BASE
                && *clock_hz == 48_000_000
                && request.baud_rate == Setting::Value(115_200)
                && request.receive_fifo_depth == Setting::Default
                && request.timeout_us == Setting::Default
                && request.parity == Setting::Value(Parity::None)
                && request.data_bits == Setting::Value(8)
                && request.stop_bits == Setting::Value(StopBits::One)
        })
        .times(1)
        .returning(|_, _, _| Ok(attributes_8n1()));
    let port = port(&sim, backend);

    assert_eq!(port.initialize(), Ok(()));
    // the mini UART was never programmed
    assert!(sim.accesses().is_empty());
}

#[test]
fn test_pl011_set_attributes_forwards_request() {
    let sim = SimulatedSoc::pl011();
    let mut backend = MockBackend::new();
    backend.expect_clock_frequency().return_const(48_000_000u32);
    backend
        .expect_initialize_port()
        .withf(|base, _, request| {
            *base == PL011_BASE
                && request.baud_rate == Setting::Value(9600)
                && request.data_bits == Setting::Default
                && request.timeout_us == Setting::Default
        })
        .times(1)
        .returning(|_, _, _| {
            Ok(LineAttributes {
                baud_rate: 9600,
                ..attributes_8n1()
            })
        });
    let port = port(&sim, backend);

    let resolved = port
        .set_attributes(
            &AttributeRequest::default()
                .with_baud_rate(9600)
                .with_timeout_us(250),
        )
        .unwrap();
    assert_eq!(resolved.baud_rate, 9600);
}

#[test]
fn test_pl011_errors_pass_through() {
    let sim = SimulatedSoc::pl011();
    let mut backend = MockBackend::new();
    backend.expect_clock_frequency().return_const(48_000_000u32);
    backend
        .expect_initialize_port()
        .returning(|_, _, _| Err(SerialError::DeviceError));
    backend
        .expect_set_control()
        .with(eq(PL011_BASE), eq(0x8000_0000u32))
        .times(1)
        .returning(|_, _| Ok(()));
    let port = port(&sim, backend);

    assert_eq!(port.initialize(), Err(SerialError::DeviceError));
    // validation belongs to the back-end on this path
    assert_eq!(port.set_control(0x8000_0000), Ok(()));
}

#[test]
fn test_pl011_byte_transfer() {
    let sim = SimulatedSoc::pl011();
    let mut backend = MockBackend::new();
    backend
        .expect_write()
        .withf(|base, buffer| *base == PL011_BASE && buffer == &b"ping"[..])
        .times(1)
        .returning(|_, buffer| buffer.len());
    backend
        .expect_read()
        .withf(|base, _| *base == PL011_BASE)
        .times(1)
        .returning(|_, buffer| {
            buffer.copy_from_slice(b"pong");
            buffer.len()
        });
    backend
        .expect_get_control()
        .with(eq(PL011_BASE))
        .returning(|_| Ok(ControlSignals::CLEAR_TO_SEND));
    let port = port(&sim, backend);

    assert_eq!(port.write(b"ping"), 4);
    let mut buffer = [0u8; 4];
    assert_eq!(port.read(&mut buffer), 4);
    assert_eq!(&buffer, b"pong");
    assert_eq!(port.get_control(), Ok(ControlSignals::CLEAR_TO_SEND));
}

#[test]
fn test_formatted_output() {
    let sim = SimulatedSoc::mini_uart();
    let mut port = port(&sim, MockBackend::new());

    write!(port, "x={}", 5).unwrap();
    port.flush();
    assert_eq!(sim.tx(), b"x=5");
}
