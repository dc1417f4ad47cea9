//! PL011 adapter
//!
//! Presents the external [`Pl011Uart`] back-end through the common
//! [`SerialTransport`] capability set. Byte and control operations are
//! forwarded verbatim with the PL011 register base. `initialize` and
//! `set_attributes` both go through the back-end's port initialization
//! with its own clock; port initialization takes no timeout, so requests
//! reach the back-end with `timeout_us` left at its default.

use serial_api::{
    AttributeRequest, ControlSignals, LineAttributes, Pl011Uart, Result, SerialTransport,
    Setting,
};

use crate::config::Pl011Defaults;

/// PL011 transport over an external back-end
#[derive(Debug)]
pub struct Pl011Transport<P> {
    backend: P,
    base: usize,
    defaults: Pl011Defaults,
}

impl<P: Pl011Uart> Pl011Transport<P> {
    /// Wraps `backend` for the PL011 at `base`.
    pub const fn new(backend: P, base: usize, defaults: Pl011Defaults) -> Self {
        Self {
            backend,
            base,
            defaults,
        }
    }

    /// The wrapped back-end
    pub fn backend(&self) -> &P {
        &self.backend
    }

    /// PL011 register base
    pub const fn base(&self) -> usize {
        self.base
    }

    /// Request built from the configured defaults, with the device's
    /// default receive FIFO depth and timeout.
    pub fn default_request(&self) -> AttributeRequest {
        AttributeRequest {
            baud_rate: Setting::Value(self.defaults.default_baud_rate),
            receive_fifo_depth: Setting::Default,
            timeout_us: Setting::Default,
            parity: Setting::Value(self.defaults.default_parity),
            data_bits: Setting::Value(self.defaults.default_data_bits),
            stop_bits: Setting::Value(self.defaults.default_stop_bits),
        }
    }
}

impl<P: Pl011Uart> SerialTransport for Pl011Transport<P> {
    fn initialize(&self) -> Result<()> {
        let request = self.default_request();
        self.set_attributes(&request).map(|_| ())
    }

    fn write(&self, buffer: &[u8]) -> usize {
        self.backend.write(self.base, buffer)
    }

    fn read(&self, buffer: &mut [u8]) -> usize {
        self.backend.read(self.base, buffer)
    }

    fn poll(&self) -> bool {
        self.backend.poll(self.base)
    }

    fn set_control(&self, control: u32) -> Result<()> {
        self.backend.set_control(self.base, control)
    }

    fn get_control(&self) -> Result<ControlSignals> {
        self.backend.get_control(self.base)
    }

    fn set_attributes(&self, request: &AttributeRequest) -> Result<LineAttributes> {
        let request = AttributeRequest {
            timeout_us: Setting::Default,
            ..*request
        };
        let clock_hz = self.backend.clock_frequency();
        self.backend.initialize_port(self.base, clock_hz, &request)
    }
}
