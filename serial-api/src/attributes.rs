//! Line attribute types
//!
//! `SetAttributes` takes an [`AttributeRequest`] where each field is either
//! an explicit value or [`Setting::Default`] ("use what the device has"),
//! and returns the [`LineAttributes`] that were actually applied.

use crate::error::{Result, SerialError};

/// A requested attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting<T> {
    /// Use the device's current or default value
    Default,
    /// Use this explicit value
    Value(T),
}

// Manual impl: `T` need not be `Default` itself.
impl<T> Default for Setting<T> {
    fn default() -> Self {
        Setting::Default
    }
}

impl<T: Copy> Setting<T> {
    /// Returns the explicit value, if any
    pub fn value(self) -> Option<T> {
        match self {
            Setting::Default => None,
            Setting::Value(value) => Some(value),
        }
    }

    /// Returns true if the device default was requested
    pub fn is_default(&self) -> bool {
        matches!(self, Setting::Default)
    }

    /// Returns the explicit value, or the value produced by `fallback`
    pub fn resolve_with<F>(self, fallback: F) -> T
    where
        F: FnOnce() -> T,
    {
        match self {
            Setting::Default => fallback(),
            Setting::Value(value) => value,
        }
    }

    /// Maps a zero-is-default raw value into a setting
    fn from_sentinel(raw: T, sentinel: T) -> Self
    where
        T: PartialEq,
    {
        if raw == sentinel {
            Setting::Default
        } else {
            Setting::Value(raw)
        }
    }
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    /// No parity
    None,
    /// Even parity
    Even,
    /// Odd parity
    Odd,
    /// Parity bit always 1
    Mark,
    /// Parity bit always 0
    Space,
}

impl Parity {
    /// Decodes the firmware parity encoding (`0` means default).
    pub fn from_raw(raw: u32) -> Result<Setting<Parity>> {
        match raw {
            0 => Ok(Setting::Default),
            1 => Ok(Setting::Value(Parity::None)),
            2 => Ok(Setting::Value(Parity::Even)),
            3 => Ok(Setting::Value(Parity::Odd)),
            4 => Ok(Setting::Value(Parity::Mark)),
            5 => Ok(Setting::Value(Parity::Space)),
            _ => Err(SerialError::InvalidParameter("parity")),
        }
    }

    /// Returns the firmware parity encoding.
    pub const fn raw(self) -> u32 {
        match self {
            Parity::None => 1,
            Parity::Even => 2,
            Parity::Odd => 3,
            Parity::Mark => 4,
            Parity::Space => 5,
        }
    }
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    /// 1 stop bit
    One,
    /// 1.5 stop bits
    OneAndHalf,
    /// 2 stop bits
    Two,
}

impl StopBits {
    /// Decodes the firmware stop-bits encoding (`0` means default).
    pub fn from_raw(raw: u32) -> Result<Setting<StopBits>> {
        match raw {
            0 => Ok(Setting::Default),
            1 => Ok(Setting::Value(StopBits::One)),
            2 => Ok(Setting::Value(StopBits::OneAndHalf)),
            3 => Ok(Setting::Value(StopBits::Two)),
            _ => Err(SerialError::InvalidParameter("stop bits")),
        }
    }

    /// Returns the firmware stop-bits encoding.
    pub const fn raw(self) -> u32 {
        match self {
            StopBits::One => 1,
            StopBits::OneAndHalf => 2,
            StopBits::Two => 3,
        }
    }
}

/// Requested serial attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttributeRequest {
    /// Baud rate in bits per second
    pub baud_rate: Setting<u64>,
    /// Receive FIFO depth in bytes
    pub receive_fifo_depth: Setting<u32>,
    /// Per-character timeout in microseconds
    pub timeout_us: Setting<u32>,
    /// Parity mode
    pub parity: Setting<Parity>,
    /// Data bits per character
    pub data_bits: Setting<u8>,
    /// Stop bits
    pub stop_bits: Setting<StopBits>,
}

impl AttributeRequest {
    /// Builds a request from the firmware encodings, where zero (or the
    /// `Default*` enumerator) means "use the device default".
    ///
    /// Unknown parity or stop-bit encodings fail with `InvalidParameter`.
    pub fn from_raw(
        baud_rate: u64,
        receive_fifo_depth: u32,
        timeout_us: u32,
        parity: u32,
        data_bits: u8,
        stop_bits: u32,
    ) -> Result<Self> {
        Ok(Self {
            baud_rate: Setting::from_sentinel(baud_rate, 0),
            receive_fifo_depth: Setting::from_sentinel(receive_fifo_depth, 0),
            timeout_us: Setting::from_sentinel(timeout_us, 0),
            parity: Parity::from_raw(parity)?,
            data_bits: Setting::from_sentinel(data_bits, 0),
            stop_bits: StopBits::from_raw(stop_bits)?,
        })
    }

    /// Sets an explicit baud rate
    pub fn with_baud_rate(mut self, baud_rate: u64) -> Self {
        self.baud_rate = Setting::Value(baud_rate);
        self
    }

    /// Sets an explicit receive FIFO depth
    pub fn with_receive_fifo_depth(mut self, depth: u32) -> Self {
        self.receive_fifo_depth = Setting::Value(depth);
        self
    }

    /// Sets an explicit timeout
    pub fn with_timeout_us(mut self, timeout_us: u32) -> Self {
        self.timeout_us = Setting::Value(timeout_us);
        self
    }

    /// Sets an explicit parity
    pub fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = Setting::Value(parity);
        self
    }

    /// Sets an explicit data-bit count
    pub fn with_data_bits(mut self, data_bits: u8) -> Self {
        self.data_bits = Setting::Value(data_bits);
        self
    }

    /// Sets explicit stop bits
    pub fn with_stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = Setting::Value(stop_bits);
        self
    }

    /// Returns true if every field asks for the device default
    pub fn is_all_default(&self) -> bool {
        self.baud_rate.is_default()
            && self.receive_fifo_depth.is_default()
            && self.timeout_us.is_default()
            && self.parity.is_default()
            && self.data_bits.is_default()
            && self.stop_bits.is_default()
    }
}

/// Attributes actually in effect after a `SetAttributes` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAttributes {
    /// Baud rate in bits per second
    pub baud_rate: u64,
    /// Receive FIFO depth in bytes
    pub receive_fifo_depth: u32,
    /// Per-character timeout in microseconds
    pub timeout_us: u32,
    /// Parity mode
    pub parity: Parity,
    /// Data bits per character
    pub data_bits: u8,
    /// Stop bits
    pub stop_bits: StopBits,
}

impl LineAttributes {
    /// Converts these values into a fully explicit request.
    pub fn to_request(&self) -> AttributeRequest {
        AttributeRequest {
            baud_rate: Setting::Value(self.baud_rate),
            receive_fifo_depth: Setting::Value(self.receive_fifo_depth),
            timeout_us: Setting::Value(self.timeout_us),
            parity: Setting::Value(self.parity),
            data_bits: Setting::Value(self.data_bits),
            stop_bits: Setting::Value(self.stop_bits),
        }
    }
}
