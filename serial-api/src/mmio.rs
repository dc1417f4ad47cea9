//! Raw memory-mapped I/O capability
//!
//! The drivers never dereference physical addresses themselves; every
//! load and store goes through an [`Mmio`] implementation so that the
//! register protocol can be driven against real hardware or a simulated
//! register file.

/// Minimal abstraction over single-byte and single-word MMIO access.
pub trait Mmio {
    /// Read an 8-bit register at `address`.
    fn read8(&self, address: usize) -> u8;
    /// Write an 8-bit register at `address`.
    fn write8(&self, address: usize, value: u8);
    /// Read a 32-bit register at `address`.
    fn read32(&self, address: usize) -> u32;
}

impl<M: Mmio + ?Sized> Mmio for &M {
    #[inline]
    fn read8(&self, address: usize) -> u8 {
        (**self).read8(address)
    }

    #[inline]
    fn write8(&self, address: usize, value: u8) {
        (**self).write8(address, value)
    }

    #[inline]
    fn read32(&self, address: usize) -> u32 {
        (**self).read32(address)
    }
}

/// Volatile access to identity-mapped device memory.
#[derive(Debug)]
pub struct VolatileMmio {
    _private: (),
}

impl VolatileMmio {
    /// Creates the MMIO capability.
    ///
    /// # Safety
    ///
    /// Every address later passed to this instance must be a mapped device
    /// register, accessible at the requested width, with no aliases that
    /// the compiler could reorder against.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Mmio for VolatileMmio {
    #[inline]
    fn read8(&self, address: usize) -> u8 {
        // SAFETY: guaranteed by the contract of `VolatileMmio::new`.
        unsafe { core::ptr::read_volatile(address as *const u8) }
    }

    #[inline]
    fn write8(&self, address: usize, value: u8) {
        // SAFETY: guaranteed by the contract of `VolatileMmio::new`.
        unsafe { core::ptr::write_volatile(address as *mut u8, value) }
    }

    #[inline]
    fn read32(&self, address: usize) -> u32 {
        // SAFETY: guaranteed by the contract of `VolatileMmio::new`.
        unsafe { core::ptr::read_volatile(address as *const u32) }
    }
}
