//! Dual Serial - one serial port API over two UART implementations
//!
//! Boards in the BCM283x/BCM2711 family route the console pins either to
//! the 16550-compatible "mini" UART or to the PL011 UART, depending on the
//! GPIO pin-mux. This crate works out which one is live the first time the
//! port is used and routes every operation to the matching back-end.
//!
//! # Architecture
//!
//! - **Config**: Externally supplied platform configuration and fixed addresses
//! - **Variant**: One-shot hardware detection and its memoized result
//! - **Uart16550**: Register access, flow-control gate, baud divisor,
//!   line discipline codec and the polled 16550 transport
//! - **Pl011**: Adapter forwarding to the external PL011 back-end
//! - **Port**: The dispatching [`DualSerialPort`]
//!
//! # Blocking behaviour
//!
//! Every operation is synchronous and polled. `write`, `read`, `flush` and
//! `initialize` spin on hardware status bits with no timeout: a peer that
//! never asserts CTS, or never sends, blocks the caller indefinitely.
//!
//! # Usage
//!
//! ```rust,ignore
//! use dual_serial::{DualSerialPort, PlatformLayout, SerialConfig};
//! use serial_api::VolatileMmio;
//!
//! let mmio = unsafe { VolatileMmio::new() };
//! let port = DualSerialPort::new(mmio, pl011, PlatformLayout::RPI4, SerialConfig::rpi4());
//! port.initialize()?;
//! port.write(b"hello\r\n");
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod config;
pub mod pl011;
pub mod port;
pub mod uart16550;
pub mod variant;

// Re-export commonly used types
pub use crate::config::{Pl011Defaults, PlatformLayout, SerialConfig};
pub use crate::pl011::Pl011Transport;
pub use crate::port::{ActiveTransport, DualSerialPort};
pub use crate::uart16550::MiniUart;
pub use crate::variant::{HardwareVariant, VariantCell};

pub use serial_api::{
    AttributeRequest, ControlSignals, LineAttributes, Mmio, Parity, Pl011Uart, Result,
    SerialError, SerialTransport, Setting, StopBits,
};
