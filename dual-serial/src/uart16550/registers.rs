//! 16550 register map and raw register access

use serial_api::Mmio;

/// Registers that the 16550 transport interacts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// Receive buffer (read, DLAB = 0)
    ReceiveBuffer,
    /// Transmit holding register (write, DLAB = 0)
    TransmitBuffer,
    /// Divisor latch low byte (DLAB = 1)
    DivisorLow,
    /// Divisor latch high byte (DLAB = 1)
    DivisorHigh,
    /// Interrupt enable (DLAB = 0)
    InterruptEnable,
    /// FIFO control
    FifoControl,
    /// Line control
    LineControl,
    /// Modem control
    ModemControl,
    /// Line status
    LineStatus,
    /// Modem status
    ModemStatus,
}

impl Register {
    /// Register index before stride scaling
    pub const fn offset(self) -> usize {
        match self {
            Register::ReceiveBuffer | Register::TransmitBuffer | Register::DivisorLow => 0,
            Register::DivisorHigh | Register::InterruptEnable => 1,
            Register::FifoControl => 2,
            Register::LineControl => 3,
            Register::ModemControl => 4,
            Register::LineStatus => 5,
            Register::ModemStatus => 6,
        }
    }
}

/// Divisor latch access bit in the line-control register
pub const LCR_DLAB: u8 = 1 << 7;
/// Line-control bits the driver ever writes: data, stop and parity fields
pub const LCR_WRITABLE_MASK: u8 = 0x3F;

bitflags::bitflags! {
    /// FIFO control register
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Fcr: u8 {
        /// Enable the FIFOs
        const FIFO_ENABLE = 1 << 0;
        /// Select 64-byte FIFO mode
        const FIFO_64_BYTE = 1 << 5;
    }
}

bitflags::bitflags! {
    /// Modem control register
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Mcr: u8 {
        /// Data Terminal Ready
        const DTR = 1 << 0;
        /// Request To Send
        const RTS = 1 << 1;
    }
}

bitflags::bitflags! {
    /// Line status register
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Lsr: u8 {
        /// Receive data ready
        const RX_READY = 1 << 0;
        /// Transmit holding register (FIFO) empty
        const TX_EMPTY = 1 << 5;
        /// Transmit FIFO and shift register empty
        const TX_IDLE = 1 << 6;
        /// Both transmit-side empty bits
        const TRANSMITTER_EMPTY = Self::TX_EMPTY.bits() | Self::TX_IDLE.bits();
    }
}

bitflags::bitflags! {
    /// Modem status register
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Msr: u8 {
        /// Clear To Send
        const CTS = 1 << 4;
        /// Data Set Ready
        const DSR = 1 << 5;
        /// Ring Indicator
        const RI = 1 << 6;
        /// Data Carrier Detect
        const DCD = 1 << 7;
    }
}

/// A 16550 register block at `base`, with registers `stride` bytes apart.
#[derive(Debug)]
pub struct RegisterBlock<M> {
    mmio: M,
    base: usize,
    stride: usize,
}

impl<M: Mmio> RegisterBlock<M> {
    /// Creates a register block view.
    pub const fn new(mmio: M, base: usize, stride: usize) -> Self {
        Self { mmio, base, stride }
    }

    /// Register base address
    pub const fn base(&self) -> usize {
        self.base
    }

    /// The underlying MMIO capability
    pub fn mmio(&self) -> &M {
        &self.mmio
    }

    #[inline]
    fn address(&self, register: Register) -> usize {
        self.base + register.offset() * self.stride
    }

    /// Read the current value of a register.
    #[inline]
    pub fn read(&self, register: Register) -> u8 {
        self.mmio.read8(self.address(register))
    }

    /// Write a value to a register.
    #[inline]
    pub fn write(&self, register: Register, value: u8) {
        self.mmio.write8(self.address(register), value)
    }

    /// Snapshot of the line status register
    #[inline]
    pub fn line_status(&self) -> Lsr {
        Lsr::from_bits_retain(self.read(Register::LineStatus))
    }

    /// Snapshot of the modem status register
    #[inline]
    pub fn modem_status(&self) -> Msr {
        Msr::from_bits_retain(self.read(Register::ModemStatus))
    }

    /// Snapshot of the modem control register
    #[inline]
    pub fn modem_control(&self) -> Mcr {
        Mcr::from_bits_retain(self.read(Register::ModemControl))
    }

    /// Write the modem control register, unnamed bits included
    #[inline]
    pub fn set_modem_control(&self, mcr: Mcr) {
        self.write(Register::ModemControl, mcr.bits())
    }
}
