//! Line discipline codec
//!
//! Maps (data bits, parity, stop bits) to and from the packed
//! line-control byte:
//!
//! | Bits  | Field                         |
//! |-------|-------------------------------|
//! | 1:0   | data bits − 5                 |
//! | 2     | stop bits (0 = 1, 1 = 1.5/2)  |
//! | 5:3   | parity                        |
//! | 7     | divisor latch access          |
//!
//! 1.5 and 2 stop bits share a code; on decode, 5 data bits means 1.5.

use serial_api::{AttributeRequest, Parity, Result, SerialError, Setting, StopBits};

use super::registers::LCR_WRITABLE_MASK;

const DATA_BITS_MASK: u8 = 0x03;
const STOP_BITS_SHIFT: u8 = 2;
const PARITY_SHIFT: u8 = 3;
const PARITY_MASK: u8 = 0x07;

const PARITY_NONE: u8 = 0;
const PARITY_ODD: u8 = 1;
const PARITY_EVEN: u8 = 3;
const PARITY_MARK: u8 = 5;
const PARITY_SPACE: u8 = 7;

/// Encodes a data-bit count (5..=8) into its field code.
pub fn encode_data_bits(data_bits: u8) -> Result<u8> {
    match data_bits {
        5..=8 => Ok(data_bits - 5),
        _ => Err(SerialError::InvalidParameter("data bits")),
    }
}

/// Encodes a parity mode into its field code.
pub const fn encode_parity(parity: Parity) -> u8 {
    match parity {
        Parity::None => PARITY_NONE,
        Parity::Odd => PARITY_ODD,
        Parity::Even => PARITY_EVEN,
        Parity::Mark => PARITY_MARK,
        Parity::Space => PARITY_SPACE,
    }
}

/// Encodes a stop-bit setting into its field code.
pub const fn encode_stop_bits(stop_bits: StopBits) -> u8 {
    match stop_bits {
        StopBits::One => 0,
        StopBits::OneAndHalf | StopBits::Two => 1,
    }
}

/// Decodes a parity field code. Codes without the parity-enable bit
/// decode as `Parity::None`.
pub const fn decode_parity(code: u8) -> Parity {
    match code & PARITY_MASK {
        PARITY_ODD => Parity::Odd,
        PARITY_EVEN => Parity::Even,
        PARITY_MARK => Parity::Mark,
        PARITY_SPACE => Parity::Space,
        _ => Parity::None,
    }
}

/// Decodes a stop-bit field code given the data-bit count in effect.
pub const fn decode_stop_bits(code: u8, data_bits: u8) -> StopBits {
    match (code & 1, data_bits) {
        (0, _) => StopBits::One,
        (_, 5) => StopBits::OneAndHalf,
        _ => StopBits::Two,
    }
}

/// The three line-control fields, as raw codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFields {
    /// Data-bits code (0..=3)
    pub data: u8,
    /// Stop-bits code (0 or 1)
    pub stop: u8,
    /// Parity code (0..=7)
    pub parity: u8,
}

impl LineFields {
    /// Splits a line-control byte into its fields.
    pub const fn from_register(lcr: u8) -> Self {
        Self {
            data: lcr & DATA_BITS_MASK,
            stop: (lcr >> STOP_BITS_SHIFT) & 1,
            parity: (lcr >> PARITY_SHIFT) & PARITY_MASK,
        }
    }

    /// Packs the fields into a line-control byte with reserved bits clear.
    pub const fn pack(&self) -> u8 {
        ((self.parity << PARITY_SHIFT) | (self.stop << STOP_BITS_SHIFT) | self.data)
            & LCR_WRITABLE_MASK
    }

    /// Data-bit count (5..=8)
    pub const fn data_bits(&self) -> u8 {
        (self.data & DATA_BITS_MASK) + 5
    }
}

/// Line settings resolved from a request against the current register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLine {
    /// Codes to program
    pub fields: LineFields,
    /// Data bits in effect
    pub data_bits: u8,
    /// Parity in effect
    pub parity: Parity,
    /// Stop bits in effect
    pub stop_bits: StopBits,
}

impl ResolvedLine {
    /// Resolves every explicit field of `request` into its code and fills
    /// every default field from `current_lcr`.
    ///
    /// Nothing is written; a failure here leaves the device untouched.
    pub fn resolve(request: &AttributeRequest, current_lcr: u8) -> Result<Self> {
        let current = LineFields::from_register(current_lcr);

        let (data, data_bits) = match request.data_bits {
            Setting::Default => (current.data, current.data_bits()),
            Setting::Value(bits) => (encode_data_bits(bits)?, bits),
        };

        let (parity_code, parity) = match request.parity {
            Setting::Default => (current.parity, decode_parity(current.parity)),
            Setting::Value(parity) => (encode_parity(parity), parity),
        };

        let (stop, stop_bits) = match request.stop_bits {
            Setting::Default => (current.stop, decode_stop_bits(current.stop, data_bits)),
            Setting::Value(stop_bits) => (encode_stop_bits(stop_bits), stop_bits),
        };

        Ok(Self {
            fields: LineFields {
                data,
                stop,
                parity: parity_code,
            },
            data_bits,
            parity,
            stop_bits,
        })
    }
}
