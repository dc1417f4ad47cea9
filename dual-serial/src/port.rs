//! Dual serial port
//!
//! [`DualSerialPort`] owns both transports and the detection result. Each
//! public operation first makes sure the hardware variant is known, then
//! routes to the transport that drives the console pins.

use core::fmt;

use serial_api::{
    AttributeRequest, ControlSignals, LineAttributes, Mmio, Pl011Uart, Result, SerialTransport,
};

use crate::config::{PlatformLayout, SerialConfig};
use crate::pl011::Pl011Transport;
use crate::uart16550::MiniUart;
use crate::variant::{HardwareVariant, VariantCell};

/// The transport selected for this port
#[derive(Debug)]
pub enum ActiveTransport<'a, M, P> {
    /// 16550-compatible mini UART
    MiniUart(&'a MiniUart<M>),
    /// PL011 UART
    Pl011(&'a Pl011Transport<P>),
}

impl<M: Mmio, P: Pl011Uart> SerialTransport for ActiveTransport<'_, M, P> {
    fn initialize(&self) -> Result<()> {
        match self {
            ActiveTransport::MiniUart(uart) => uart.initialize(),
            ActiveTransport::Pl011(uart) => uart.initialize(),
        }
    }

    fn write(&self, buffer: &[u8]) -> usize {
        match self {
            ActiveTransport::MiniUart(uart) => uart.write(buffer),
            ActiveTransport::Pl011(uart) => uart.write(buffer),
        }
    }

    fn read(&self, buffer: &mut [u8]) -> usize {
        match self {
            ActiveTransport::MiniUart(uart) => uart.read(buffer),
            ActiveTransport::Pl011(uart) => uart.read(buffer),
        }
    }

    fn poll(&self) -> bool {
        match self {
            ActiveTransport::MiniUart(uart) => uart.poll(),
            ActiveTransport::Pl011(uart) => uart.poll(),
        }
    }

    fn set_control(&self, control: u32) -> Result<()> {
        match self {
            ActiveTransport::MiniUart(uart) => uart.set_control(control),
            ActiveTransport::Pl011(uart) => uart.set_control(control),
        }
    }

    fn get_control(&self) -> Result<ControlSignals> {
        match self {
            ActiveTransport::MiniUart(uart) => uart.get_control(),
            ActiveTransport::Pl011(uart) => uart.get_control(),
        }
    }

    fn set_attributes(&self, request: &AttributeRequest) -> Result<LineAttributes> {
        match self {
            ActiveTransport::MiniUart(uart) => uart.set_attributes(request),
            ActiveTransport::Pl011(uart) => uart.set_attributes(request),
        }
    }
}

/// One serial port over whichever UART the pin-mux selects
///
/// `M` provides raw register access for the mini UART, GPIO and clock
/// manager; `P` is the PL011 back-end.
#[derive(Debug)]
pub struct DualSerialPort<M, P> {
    mini: MiniUart<M>,
    pl011: Pl011Transport<P>,
    layout: PlatformLayout,
    variant: VariantCell,
}

impl<M: Mmio, P: Pl011Uart> DualSerialPort<M, P> {
    /// Creates an undetected port. No hardware is touched until the first
    /// operation.
    pub fn new(mmio: M, pl011: P, layout: PlatformLayout, config: SerialConfig) -> Self {
        Self {
            mini: MiniUart::new(mmio, &layout, config),
            pl011: Pl011Transport::new(pl011, layout.pl011_base, config.pl011_defaults),
            layout,
            variant: VariantCell::new(),
        }
    }

    /// Detection state without probing.
    pub fn variant(&self) -> HardwareVariant {
        self.variant.get()
    }

    /// Detects the hardware if needed and returns the active transport.
    pub fn transport(&self) -> ActiveTransport<'_, M, P> {
        let detected = self
            .variant
            .ensure_detected(self.mini.registers().mmio(), &self.layout);
        match detected {
            HardwareVariant::Pl011 => ActiveTransport::Pl011(&self.pl011),
            HardwareVariant::MiniUart16550 | HardwareVariant::Undetected => {
                ActiveTransport::MiniUart(&self.mini)
            }
        }
    }

    /// Mini UART transport, regardless of detection
    pub fn mini_uart(&self) -> &MiniUart<M> {
        &self.mini
    }

    /// PL011 transport, regardless of detection
    pub fn pl011(&self) -> &Pl011Transport<P> {
        &self.pl011
    }

    /// Blocks until everything written so far has left the transmitter.
    pub fn flush(&self) {
        self.transport().write(&[]);
    }
}

impl<M: Mmio, P: Pl011Uart> SerialTransport for DualSerialPort<M, P> {
    fn initialize(&self) -> Result<()> {
        self.transport().initialize()
    }

    fn write(&self, buffer: &[u8]) -> usize {
        self.transport().write(buffer)
    }

    fn read(&self, buffer: &mut [u8]) -> usize {
        self.transport().read(buffer)
    }

    fn poll(&self) -> bool {
        self.transport().poll()
    }

    fn set_control(&self, control: u32) -> Result<()> {
        self.transport().set_control(control)
    }

    fn get_control(&self) -> Result<ControlSignals> {
        self.transport().get_control()
    }

    fn set_attributes(&self, request: &AttributeRequest) -> Result<LineAttributes> {
        self.transport().set_attributes(request)
    }
}

impl<M: Mmio, P: Pl011Uart> fmt::Write for DualSerialPort<M, P> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let written = SerialTransport::write(self, s.as_bytes());
        if written == s.len() {
            Ok(())
        } else {
            Err(fmt::Error)
        }
    }
}
