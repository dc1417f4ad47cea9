//! Hardware variant detection
//!
//! GPIO 14/15 carry the console. Their function-select fields in GPFSEL1
//! (bits 12..17) read ALT0 for both pins when the PL011 is routed to them;
//! any other setting means the mini UART is in use.

use log::debug;
use serial_api::Mmio;
use spin::Once;

use crate::config::PlatformLayout;

/// Function-select fields for GPIO 14 and 15 within GPFSEL1
pub const CONSOLE_PINMUX_MASK: u32 = 0x0003_F000;
/// Both console pins set to ALT0 (PL011 TXD0/RXD0)
pub const PL011_PINMUX: u32 = 0x0002_4000;

/// Which UART drives the console pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareVariant {
    /// Not yet detected
    Undetected,
    /// 16550-compatible mini UART
    MiniUart16550,
    /// PL011 UART
    Pl011,
}

/// Reads the console pin-mux and reports the routed UART.
pub fn detect_variant<M: Mmio>(mmio: &M, layout: &PlatformLayout) -> HardwareVariant {
    let fsel1 = mmio.read32(layout.gpio_fsel1);
    if fsel1 & CONSOLE_PINMUX_MASK == PL011_PINMUX {
        HardwareVariant::Pl011
    } else {
        HardwareVariant::MiniUart16550
    }
}

/// Memoized detection result
///
/// The first [`ensure_detected`](VariantCell::ensure_detected) call reads
/// the hardware; every later call returns the stored variant. Concurrent
/// first calls are safe: one detection wins and the others wait for it.
#[derive(Debug)]
pub struct VariantCell {
    detected: Once<HardwareVariant>,
}

impl VariantCell {
    /// Creates an undetected cell.
    pub const fn new() -> Self {
        Self {
            detected: Once::new(),
        }
    }

    /// Current state, `Undetected` until the first detection completes.
    pub fn get(&self) -> HardwareVariant {
        self.detected
            .get()
            .copied()
            .unwrap_or(HardwareVariant::Undetected)
    }

    /// Detects the hardware once and returns the detected variant.
    pub fn ensure_detected<M: Mmio>(&self, mmio: &M, layout: &PlatformLayout) -> HardwareVariant {
        *self.detected.call_once(|| {
            let variant = detect_variant(mmio, layout);
            debug!("console UART detected: {:?}", variant);
            variant
        })
    }
}

impl Default for VariantCell {
    fn default() -> Self {
        Self::new()
    }
}
