//! Baud divisor calculator
//!
//! The mini UART is clocked from the VPU clock: the configured base clock
//! times four, divided by the 12.12 fixed-point VPU clock divisor. The
//! baud generator then divides that by 16 × baud.

use serial_api::Mmio;

/// Significant bits of the VPU clock divisor register (12.12 fixed point)
pub const VPU_DIVISOR_MASK: u32 = 0x00FF_FFFF;

/// Derives the UART reference clock from the base clock and the raw VPU
/// clock divisor register value.
///
/// A divisor of zero means the divider is inactive and leaves the clock
/// unscaled.
pub fn uart_clock(base_clock: u32, vpu_divisor: u32) -> u64 {
    let clock = u64::from(base_clock) * 4;
    match vpu_divisor & VPU_DIVISOR_MASK {
        0 => clock,
        divisor => (clock << 12) / u64::from(divisor),
    }
}

/// Baud generator divisor for `baud`, rounded to nearest with ties up.
///
/// Returns 0 for a zero baud rate and saturates at `u32::MAX`.
pub fn baud_divisor(clock: u64, baud: u32) -> u32 {
    if baud == 0 {
        return 0;
    }
    let denominator = u64::from(baud) * 16;
    let mut divisor = clock / denominator;
    if clock % denominator >= u64::from(baud) * 8 {
        divisor += 1;
    }
    u32::try_from(divisor).unwrap_or(u32::MAX)
}

/// Baud rate produced by a programmed `divisor`, rounded to nearest.
///
/// Returns 0 for a zero divisor.
pub fn baud_rate(clock: u64, divisor: u32) -> u64 {
    if divisor == 0 {
        return 0;
    }
    let denominator = u64::from(divisor) * 16;
    (clock + denominator / 2) / denominator
}

/// Reads the live VPU divisor at `vpu_divisor_address` and computes the
/// baud generator divisor for `baud`.
pub fn compute_divisor<M: Mmio>(
    mmio: &M,
    vpu_divisor_address: usize,
    base_clock: u32,
    baud: u32,
) -> u32 {
    let clock = uart_clock(base_clock, mmio.read32(vpu_divisor_address));
    baud_divisor(clock, baud)
}
