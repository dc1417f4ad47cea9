//! Transport capability traits

use crate::attributes::{AttributeRequest, LineAttributes};
use crate::control::ControlSignals;
use crate::error::Result;

/// The uniform byte-stream capability set every serial back-end provides.
///
/// All operations are synchronous. `write` and `read` block until the whole
/// buffer has been transferred; there is no timeout.
pub trait SerialTransport {
    /// Brings the device into its configured state.
    fn initialize(&self) -> Result<()>;

    /// Transmits `buffer` and returns the number of bytes written.
    ///
    /// An empty buffer flushes the transmitter and returns 0.
    fn write(&self, buffer: &[u8]) -> usize;

    /// Fills `buffer` and returns the number of bytes read.
    fn read(&self, buffer: &mut [u8]) -> usize;

    /// Returns true if received data is waiting. Never blocks.
    fn poll(&self) -> bool;

    /// Sets the settable control signals from a raw signal mask.
    fn set_control(&self, control: u32) -> Result<()>;

    /// Reports the current control and status signals.
    fn get_control(&self) -> Result<ControlSignals>;

    /// Validates and applies `request`, returning the values in effect.
    fn set_attributes(&self, request: &AttributeRequest) -> Result<LineAttributes>;
}

/// Contract of the external PL011 back-end.
///
/// The PL011 register protocol and its clock source live outside this
/// workspace; the dispatcher only forwards to them. `base` is the PL011
/// register base address.
pub trait Pl011Uart {
    /// Returns the UART reference clock frequency in Hz.
    fn clock_frequency(&self) -> u32;

    /// Programs the port from `request` and returns the values in effect.
    fn initialize_port(
        &self,
        base: usize,
        clock_hz: u32,
        request: &AttributeRequest,
    ) -> Result<LineAttributes>;

    /// Transmits `buffer`, returning the number of bytes written.
    fn write(&self, base: usize, buffer: &[u8]) -> usize;

    /// Fills `buffer`, returning the number of bytes read.
    fn read(&self, base: usize, buffer: &mut [u8]) -> usize;

    /// Returns true if received data is waiting.
    fn poll(&self, base: usize) -> bool;

    /// Sets control signals from a raw signal mask.
    fn set_control(&self, base: usize, control: u32) -> Result<()>;

    /// Reports control and status signals.
    fn get_control(&self, base: usize) -> Result<ControlSignals>;
}
