//! Serial API - Core interfaces and types for polled UART transports
//!
//! This crate provides the interfaces and types shared by every serial
//! back-end in the workspace. It is the contract between the dispatching
//! driver and the concrete transports.
//!
//! # Architecture
//!
//! The API is organized into several key modules:
//!
//! - **Error**: The serial status taxonomy and `Result` alias
//! - **Attributes**: Line attribute requests (with per-field "use default") and resolved values
//! - **Control**: Modem control/status signal bitflags
//! - **Mmio**: The raw memory-mapped register access capability
//! - **Transport**: The uniform transport capability set and the PL011 back-end contract
//!
//! # Usage
//!
//! ```rust
//! use serial_api::{AttributeRequest, Parity, Setting};
//!
//! let request = AttributeRequest::default()
//!     .with_baud_rate(115_200)
//!     .with_parity(Parity::None);
//! assert_eq!(request.baud_rate, Setting::Value(115_200));
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod attributes;
pub mod control;
pub mod error;
pub mod mmio;
pub mod transport;

// Re-export commonly used types
pub use crate::attributes::{AttributeRequest, LineAttributes, Parity, Setting, StopBits};
pub use crate::control::ControlSignals;
pub use crate::error::{Result, SerialError};
pub use crate::mmio::{Mmio, VolatileMmio};
pub use crate::transport::{Pl011Uart, SerialTransport};
