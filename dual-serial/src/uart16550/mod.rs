//! 16550-compatible mini UART transport
//!
//! Polled, non-interrupt operation only. Every wait is a named predicate
//! spun on without a deadline:
//!
//! - [`MiniUart::transmitter_empty`]: transmit FIFO and shift register empty
//! - [`MiniUart::receiver_ready`]: receive data available
//! - [`MiniUart::flow_control_writable`]: the peer allows transmission
//!
//! Register access is not locked. Steps that toggle the divisor latch must
//! not interleave with another operation on the same port.

pub mod divisor;
pub mod flow;
pub mod line;
pub mod registers;

use log::{debug, trace, warn};
use serial_api::{
    AttributeRequest, ControlSignals, LineAttributes, Mmio, Result, SerialError,
    SerialTransport, Setting,
};

use crate::config::{PlatformLayout, SerialConfig};
use flow::FlowControl;
use line::ResolvedLine;
use registers::{LCR_DLAB, LCR_WRITABLE_MASK, Lsr, Mcr, Msr, Register, RegisterBlock};

/// Largest value the 16-bit divisor latch holds
const MAX_DIVISOR: u32 = 0xFFFF;

#[inline]
fn spin_until<F>(mut condition: F)
where
    F: FnMut() -> bool,
{
    while !condition() {
        core::hint::spin_loop();
    }
}

/// The 16550-compatible mini UART
#[derive(Debug)]
pub struct MiniUart<M> {
    regs: RegisterBlock<M>,
    vpu_clock_divisor: usize,
    config: SerialConfig,
}

impl<M: Mmio> MiniUart<M> {
    /// Creates the transport for the mini UART described by `layout`.
    pub fn new(mmio: M, layout: &PlatformLayout, config: SerialConfig) -> Self {
        Self {
            regs: RegisterBlock::new(mmio, layout.mini_uart_base, config.register_stride),
            vpu_clock_divisor: layout.vpu_clock_divisor,
            config,
        }
    }

    /// Register block
    pub fn registers(&self) -> &RegisterBlock<M> {
        &self.regs
    }

    /// Configuration in use
    pub fn config(&self) -> &SerialConfig {
        &self.config
    }

    fn flow(&self) -> FlowControl {
        FlowControl {
            enabled: self.config.hardware_flow_control,
            detect_cable: self.config.detect_cable,
        }
    }

    /// Transmit FIFO and shift register are both empty.
    pub fn transmitter_empty(&self) -> bool {
        self.regs.line_status().contains(Lsr::TRANSMITTER_EMPTY)
    }

    /// Receive data is available.
    pub fn receiver_ready(&self) -> bool {
        self.regs.line_status().contains(Lsr::RX_READY)
    }

    /// Flow control allows transmitting a byte.
    ///
    /// Does not touch the modem status register when flow control is off.
    pub fn flow_control_writable(&self) -> bool {
        let flow = self.flow();
        flow.is_disabled() || flow.writable(self.regs.modem_status())
    }

    /// Baud generator divisor for `baud` from the live VPU clock divisor.
    pub fn compute_divisor(&self, baud: u32) -> u32 {
        divisor::compute_divisor(
            self.regs.mmio(),
            self.vpu_clock_divisor,
            self.config.clock_rate,
            baud,
        )
    }

    fn read_divisor(&self) -> u32 {
        let lcr = self.regs.read(Register::LineControl);
        self.regs.write(Register::LineControl, lcr | LCR_DLAB);
        let mut divisor = u32::from(self.regs.read(Register::DivisorHigh)) << 8;
        divisor |= u32::from(self.regs.read(Register::DivisorLow));
        let lcr = self.regs.read(Register::LineControl);
        self.regs.write(Register::LineControl, lcr & !LCR_DLAB);
        divisor
    }

    /// Leaves the divisor latch enabled; the caller's next LCR write clears it.
    fn write_divisor(&self, divisor: u32) {
        self.regs.write(Register::LineControl, LCR_DLAB);
        self.regs.write(Register::DivisorHigh, (divisor >> 8) as u8);
        self.regs.write(Register::DivisorLow, (divisor & 0xFF) as u8);
    }

    /// Validates an explicit baud rate and returns it with its divisor.
    fn divisor_for(&self, baud_rate: u64) -> Result<(u64, u32)> {
        let baud = u32::try_from(baud_rate)
            .map_err(|_| SerialError::InvalidParameter("baud rate"))?;
        let divisor = self.compute_divisor(baud);
        if divisor == 0 || divisor > MAX_DIVISOR {
            return Err(SerialError::InvalidParameter("baud rate"));
        }
        Ok((baud_rate, divisor))
    }

    /// Baud rate and divisor the device is currently programmed with.
    ///
    /// Falls back to the configured baud rate while the divisor latch
    /// still reads zero.
    fn current_baud(&self) -> Result<(u64, u32)> {
        match self.read_divisor() {
            0 => self.divisor_for(u64::from(self.config.baud_rate)),
            live => {
                let clock = divisor::uart_clock(
                    self.config.clock_rate,
                    self.regs.mmio().read32(self.vpu_clock_divisor),
                );
                Ok((divisor::baud_rate(clock, live), live))
            }
        }
    }

    /// Returns true if the line control and divisor already match
    /// the configuration.
    fn already_configured(&self, divisor: u32) -> bool {
        let current_lcr = self.regs.read(Register::LineControl) & LCR_WRITABLE_MASK;
        let line_matches = current_lcr == self.config.line_control_bits();
        let current = self.read_divisor();
        line_matches && current == divisor
    }
}

impl<M: Mmio> SerialTransport for MiniUart<M> {
    fn initialize(&self) -> Result<()> {
        let divisor = self.compute_divisor(self.config.baud_rate);

        if self.already_configured(divisor) {
            trace!("mini UART already configured (divisor {})", divisor);
            return Ok(());
        }

        if divisor > MAX_DIVISOR {
            warn!("mini UART divisor {} does not fit the 16-bit latch", divisor);
        }
        debug!(
            "programming mini UART: {} baud, divisor {}, LCR {:#04x}, FCR {:#04x}",
            self.config.baud_rate,
            divisor,
            self.config.line_control_bits(),
            self.config.fifo_control_bits()
        );

        spin_until(|| self.transmitter_empty());

        self.write_divisor(divisor);
        self.regs.write(Register::LineControl, self.config.line_control_bits());

        self.regs.write(Register::FifoControl, 0x00);
        self.regs.write(Register::FifoControl, self.config.fifo_control_bits());

        // polled mode
        self.regs.write(Register::InterruptEnable, 0x00);
        self.regs.set_modem_control(Mcr::empty());

        Ok(())
    }

    fn write(&self, buffer: &[u8]) -> usize {
        if buffer.is_empty() {
            spin_until(|| self.transmitter_empty());
            spin_until(|| self.flow_control_writable());
            return 0;
        }

        let fifo_depth = self.config.fifo_depth().max(1);
        for burst in buffer.chunks(fifo_depth) {
            spin_until(|| self.transmitter_empty());
            for &byte in burst {
                spin_until(|| self.flow_control_writable());
                self.regs.write(Register::TransmitBuffer, byte);
            }
        }
        buffer.len()
    }

    fn read(&self, buffer: &mut [u8]) -> usize {
        if buffer.is_empty() {
            return 0;
        }

        // base MCR value, only needed to pace the peer
        let mcr = self
            .flow()
            .enabled
            .then(|| self.regs.modem_control().difference(Mcr::RTS));

        for slot in buffer.iter_mut() {
            while !self.receiver_ready() {
                if let Some(mcr) = mcr {
                    // invite the peer to send
                    self.regs.set_modem_control(mcr.union(Mcr::RTS));
                }
                core::hint::spin_loop();
            }
            if let Some(mcr) = mcr {
                self.regs.set_modem_control(mcr);
            }
            *slot = self.regs.read(Register::ReceiveBuffer);
        }
        buffer.len()
    }

    fn poll(&self) -> bool {
        let flow = self.flow();

        if self.receiver_ready() {
            if flow.enabled {
                let mcr = self.regs.modem_control();
                self.regs.set_modem_control(mcr.difference(Mcr::RTS));
            }
            return true;
        }

        if flow.enabled {
            let mcr = self.regs.modem_control();
            self.regs.set_modem_control(mcr.union(Mcr::RTS));
        }
        false
    }

    fn set_control(&self, control: u32) -> Result<()> {
        if !ControlSignals::only_settable(control) {
            return Err(SerialError::Unsupported);
        }
        let control = ControlSignals::from_bits_retain(control);

        let mut mcr = self.regs.modem_control().difference(Mcr::DTR | Mcr::RTS);
        mcr.set(Mcr::DTR, control.contains(ControlSignals::DATA_TERMINAL_READY));
        mcr.set(Mcr::RTS, control.contains(ControlSignals::REQUEST_TO_SEND));
        self.regs.set_modem_control(mcr);

        Ok(())
    }

    fn get_control(&self) -> Result<ControlSignals> {
        let mut control = ControlSignals::empty();

        let msr = self.regs.modem_status();
        control.set(ControlSignals::CLEAR_TO_SEND, msr.contains(Msr::CTS));
        control.set(ControlSignals::DATA_SET_READY, msr.contains(Msr::DSR));
        control.set(ControlSignals::RING_INDICATE, msr.contains(Msr::RI));
        control.set(ControlSignals::CARRIER_DETECT, msr.contains(Msr::DCD));

        let mcr = self.regs.modem_control();
        control.set(ControlSignals::DATA_TERMINAL_READY, mcr.contains(Mcr::DTR));
        control.set(ControlSignals::REQUEST_TO_SEND, mcr.contains(Mcr::RTS));

        control.set(
            ControlSignals::HARDWARE_FLOW_CONTROL_ENABLE,
            self.config.hardware_flow_control,
        );

        let lsr = self.regs.line_status();
        control.set(
            ControlSignals::OUTPUT_BUFFER_EMPTY,
            lsr.contains(Lsr::TRANSMITTER_EMPTY),
        );
        control.set(ControlSignals::INPUT_BUFFER_EMPTY, !lsr.contains(Lsr::RX_READY));

        Ok(control)
    }

    fn set_attributes(&self, request: &AttributeRequest) -> Result<LineAttributes> {
        let requested = match request.baud_rate {
            Setting::Value(rate) => Some(self.divisor_for(rate)?),
            Setting::Default => None,
        };

        let line = ResolvedLine::resolve(request, self.regs.read(Register::LineControl))?;

        let (baud_rate, divisor) = match requested {
            Some(resolved) => resolved,
            None => self.current_baud()?,
        };

        let resolved = LineAttributes {
            baud_rate,
            receive_fifo_depth: request.receive_fifo_depth.resolve_with(|| {
                u32::try_from(self.config.fifo_depth()).unwrap_or(u32::MAX)
            }),
            timeout_us: request
                .timeout_us
                .resolve_with(|| self.config.pl011_defaults.default_timeout_us),
            parity: line.parity,
            data_bits: line.data_bits,
            stop_bits: line.stop_bits,
        };

        let line_untouched = request.baud_rate.is_default()
            && request.data_bits.is_default()
            && request.parity.is_default()
            && request.stop_bits.is_default();
        if line_untouched {
            return Ok(resolved);
        }

        self.write_divisor(divisor);
        self.regs.write(Register::LineControl, line.fields.pack());

        trace!(
            "mini UART attributes: {} baud, divisor {}, LCR {:#04x}",
            baud_rate,
            divisor,
            line.fields.pack()
        );
        Ok(resolved)
    }
}
