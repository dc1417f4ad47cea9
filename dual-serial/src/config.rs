//! Platform configuration
//!
//! Everything in here is supplied by the platform and read-only to the
//! driver: the mini UART's clock, baud rate and line/FIFO control bytes,
//! the flow-control policy, and the PL011 defaults used when the PL011
//! is selected.

use serial_api::{Parity, StopBits};

use crate::uart16550::registers::{Fcr, LCR_WRITABLE_MASK};

/// SoC peripheral base on BCM2837 (Raspberry Pi 3)
pub const RPI3_PERIPHERAL_BASE: usize = 0x3F00_0000;
/// SoC peripheral base on BCM2711 (Raspberry Pi 4)
pub const RPI4_PERIPHERAL_BASE: usize = 0xFE00_0000;

const GPIO_OFFSET: usize = 0x0020_0000;
const GPIO_FSEL1: usize = 0x04;
const PL011_OFFSET: usize = 0x0020_1000;
const AUX_OFFSET: usize = 0x0021_5000;
const AUX_MINI_UART: usize = 0x40;
const CM_OFFSET: usize = 0x0010_1000;
const CM_VPU_CLOCK_DIVISOR: usize = 0x0c;

/// Fixed hardware addresses used by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformLayout {
    /// PL011 register base
    pub pl011_base: usize,
    /// Mini UART 16550-compatible register base
    pub mini_uart_base: usize,
    /// GPIO function-select register covering GPIO 10..19
    pub gpio_fsel1: usize,
    /// VPU clock divisor register (12.12 fixed point)
    pub vpu_clock_divisor: usize,
}

impl PlatformLayout {
    /// Raspberry Pi 3 layout
    pub const RPI3: PlatformLayout = PlatformLayout::bcm2836(RPI3_PERIPHERAL_BASE);
    /// Raspberry Pi 4 layout
    pub const RPI4: PlatformLayout = PlatformLayout::bcm2836(RPI4_PERIPHERAL_BASE);

    /// Builds the layout from a BCM2836-style peripheral base address.
    pub const fn bcm2836(peripheral_base: usize) -> Self {
        Self {
            pl011_base: peripheral_base + PL011_OFFSET,
            mini_uart_base: peripheral_base + AUX_OFFSET + AUX_MINI_UART,
            gpio_fsel1: peripheral_base + GPIO_OFFSET + GPIO_FSEL1,
            vpu_clock_divisor: peripheral_base + CM_OFFSET + CM_VPU_CLOCK_DIVISOR,
        }
    }
}

impl Default for PlatformLayout {
    fn default() -> Self {
        Self::RPI4
    }
}

/// Defaults handed to the PL011 back-end on `initialize`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pl011Defaults {
    /// Baud rate in bits per second
    pub default_baud_rate: u64,
    /// Parity mode
    pub default_parity: Parity,
    /// Data bits per character
    pub default_data_bits: u8,
    /// Stop bits
    pub default_stop_bits: StopBits,
    /// Per-character timeout in microseconds
    pub default_timeout_us: u32,
}

impl Default for Pl011Defaults {
    fn default() -> Self {
        Self {
            default_baud_rate: 115_200,
            default_parity: Parity::None,
            default_data_bits: 8,
            default_stop_bits: StopBits::One,
            default_timeout_us: 1_000_000,
        }
    }
}

/// Serial port configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialConfig {
    /// Base UART clock rate in Hz, before the VPU divisor is applied
    pub clock_rate: u32,
    /// Mini UART baud rate
    pub baud_rate: u32,
    /// Mini UART line-control byte (data bits, stop bits, parity)
    pub line_control: u8,
    /// Mini UART FIFO-control byte
    pub fifo_control: u8,
    /// Gate transmit on CTS/DSR and pace receive with RTS
    pub hardware_flow_control: bool,
    /// Require DSR (cable present) before transmitting
    pub detect_cable: bool,
    /// Distance in bytes between consecutive 16550 registers
    pub register_stride: usize,
    /// Transmit FIFO size when the 64-byte FIFO mode is selected
    pub extended_tx_fifo_size: usize,
    /// PL011 defaults
    pub pl011_defaults: Pl011Defaults,
}

impl SerialConfig {
    /// Raspberry Pi 3 configuration
    pub const fn rpi3() -> Self {
        Self::with_clock(250_000_000)
    }

    /// Raspberry Pi 4 configuration
    pub const fn rpi4() -> Self {
        Self::with_clock(500_000_000)
    }

    const fn with_clock(clock_rate: u32) -> Self {
        Self {
            clock_rate,
            baud_rate: 115_200,
            line_control: 0x03,
            fifo_control: 0x07,
            hardware_flow_control: false,
            detect_cable: false,
            register_stride: 4,
            extended_tx_fifo_size: 64,
            pl011_defaults: Pl011Defaults {
                default_baud_rate: 115_200,
                default_parity: Parity::None,
                default_data_bits: 8,
                default_stop_bits: StopBits::One,
                default_timeout_us: 1_000_000,
            },
        }
    }

    /// Sets the mini UART baud rate
    pub const fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Sets the mini UART line-control byte
    pub const fn with_line_control(mut self, line_control: u8) -> Self {
        self.line_control = line_control;
        self
    }

    /// Sets the mini UART FIFO-control byte
    pub const fn with_fifo_control(mut self, fifo_control: u8) -> Self {
        self.fifo_control = fifo_control;
        self
    }

    /// Enables or disables hardware flow control and cable detection
    pub const fn with_flow_control(mut self, enabled: bool, detect_cable: bool) -> Self {
        self.hardware_flow_control = enabled;
        self.detect_cable = detect_cable;
        self
    }

    /// Sets the register stride
    pub const fn with_register_stride(mut self, stride: usize) -> Self {
        self.register_stride = stride;
        self
    }

    /// Address of 16550 register `offset` relative to `base`
    #[inline]
    pub const fn register_address(&self, base: usize, offset: usize) -> usize {
        base + offset * self.register_stride
    }

    /// Line-control byte with reserved bits stripped
    #[inline]
    pub const fn line_control_bits(&self) -> u8 {
        self.line_control & LCR_WRITABLE_MASK
    }

    /// FIFO-control byte with everything but the enable and 64-byte bits stripped
    #[inline]
    pub const fn fifo_control_bits(&self) -> u8 {
        self.fifo_control & (Fcr::FIFO_ENABLE.bits() | Fcr::FIFO_64_BYTE.bits())
    }

    /// Effective transmit FIFO depth
    ///
    /// 1 with FIFOs disabled, 16 in standard FIFO mode, otherwise the
    /// configured extended size.
    pub const fn fifo_depth(&self) -> usize {
        if self.fifo_control & Fcr::FIFO_ENABLE.bits() == 0 {
            1
        } else if self.fifo_control & Fcr::FIFO_64_BYTE.bits() == 0 {
            16
        } else {
            self.extended_tx_fifo_size
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self::rpi4()
    }
}
