//! Common test utilities
//!
//! A simulated register file covering the mini UART, the GPIO function
//! select register and the VPU clock divisor. Every 16550 access is
//! recorded so tests can assert on exactly what the driver touched.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use dual_serial::{Mmio, PlatformLayout};

/// Register indices (before stride scaling)
pub const RBR_THR_DLL: usize = 0;
pub const IER_DLM: usize = 1;
pub const FCR: usize = 2;
pub const LCR: usize = 3;
pub const MCR: usize = 4;
pub const LSR: usize = 5;
pub const MSR: usize = 6;

/// GPFSEL1 with GPIO 14/15 on ALT0
pub const FSEL1_PL011: u32 = 0x0002_4000;
/// GPFSEL1 with GPIO 14/15 on ALT5
pub const FSEL1_MINI_UART: u32 = 0x0001_2000;
/// VPU divisor of 4.0, which makes the UART clock equal the base clock
pub const VPU_DIVISOR_UNITY: u32 = 4 << 12;

const DLAB: u8 = 0x80;
const MCR_RTS: u8 = 0x02;
const LSR_RX_READY: u8 = 0x01;
const LSR_TX_EMPTY: u8 = 0x60;

/// One recorded 16550 register access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read(usize),
    Write(usize, u8),
}

/// Simulated device state
#[derive(Debug, Default)]
pub struct State {
    pub lcr: u8,
    pub dll: u8,
    pub dlm: u8,
    pub ier: u8,
    pub fcr: u8,
    pub mcr: u8,
    pub msr: u8,
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub accesses: Vec<Access>,
    pub fsel1: u32,
    pub vpu_divisor: u32,
    pub fsel1_reads: usize,
    /// Received bytes only become visible while RTS is asserted
    pub rx_needs_rts: bool,
    /// Transmit-side LSR bits for upcoming LSR reads; `0x60` once drained
    pub tx_status: VecDeque<u8>,
}

/// A simulated SoC register file
#[derive(Debug)]
pub struct SimulatedSoc {
    pub layout: PlatformLayout,
    pub stride: usize,
    pub state: RefCell<State>,
}

impl SimulatedSoc {
    pub fn new(fsel1: u32) -> Self {
        Self {
            layout: PlatformLayout::RPI4,
            stride: 4,
            state: RefCell::new(State {
                fsel1,
                vpu_divisor: VPU_DIVISOR_UNITY,
                ..State::default()
            }),
        }
    }

    pub fn mini_uart() -> Self {
        Self::new(FSEL1_MINI_UART)
    }

    pub fn pl011() -> Self {
        Self::new(FSEL1_PL011)
    }

    pub fn divisor(&self) -> u32 {
        let state = self.state.borrow();
        u32::from(state.dlm) << 8 | u32::from(state.dll)
    }

    /// Queues transmit-side LSR values returned before the transmitter
    /// reports fully empty.
    pub fn script_tx_status(&self, values: &[u8]) {
        self.state.borrow_mut().tx_status.extend(values.iter().copied());
    }

    pub fn push_rx(&self, bytes: &[u8]) {
        self.state.borrow_mut().rx.extend(bytes.iter().copied());
    }

    pub fn tx(&self) -> Vec<u8> {
        self.state.borrow().tx.clone()
    }

    pub fn accesses(&self) -> Vec<Access> {
        self.state.borrow().accesses.clone()
    }

    pub fn clear_accesses(&self) {
        self.state.borrow_mut().accesses.clear();
    }

    pub fn writes(&self) -> Vec<(usize, u8)> {
        self.accesses()
            .into_iter()
            .filter_map(|access| match access {
                Access::Write(register, value) => Some((register, value)),
                Access::Read(_) => None,
            })
            .collect()
    }

    pub fn writes_to(&self, register: usize) -> Vec<u8> {
        self.writes()
            .into_iter()
            .filter(|(r, _)| *r == register)
            .map(|(_, value)| value)
            .collect()
    }

    pub fn touched(&self, register: usize) -> bool {
        self.accesses().iter().any(|access| match access {
            Access::Read(r) | Access::Write(r, _) => *r == register,
        })
    }

    fn register(&self, address: usize) -> usize {
        let base = self.layout.mini_uart_base;
        assert!(address >= base, "address {:#x} below the mini UART", address);
        (address - base) / self.stride
    }

    fn rx_visible(state: &State) -> bool {
        !state.rx.is_empty() && (!state.rx_needs_rts || state.mcr & MCR_RTS != 0)
    }
}

impl Mmio for SimulatedSoc {
    fn read8(&self, address: usize) -> u8 {
        let register = self.register(address);
        let mut state = self.state.borrow_mut();
        state.accesses.push(Access::Read(register));
        let dlab = state.lcr & DLAB != 0;
        match register {
            RBR_THR_DLL if dlab => state.dll,
            RBR_THR_DLL => state.rx.pop_front().unwrap_or(0),
            IER_DLM if dlab => state.dlm,
            IER_DLM => state.ier,
            FCR => 0x01,
            LCR => state.lcr,
            MCR => state.mcr,
            LSR => {
                let rx = if Self::rx_visible(&state) { LSR_RX_READY } else { 0 };
                let tx = state.tx_status.pop_front().unwrap_or(LSR_TX_EMPTY);
                (tx & LSR_TX_EMPTY) | rx
            }
            MSR => state.msr,
            _ => panic!("read of unmodelled register {}", register),
        }
    }

    fn write8(&self, address: usize, value: u8) {
        let register = self.register(address);
        let mut state = self.state.borrow_mut();
        state.accesses.push(Access::Write(register, value));
        let dlab = state.lcr & DLAB != 0;
        match register {
            RBR_THR_DLL if dlab => state.dll = value,
            RBR_THR_DLL => state.tx.push(value),
            IER_DLM if dlab => state.dlm = value,
            IER_DLM => state.ier = value,
            FCR => state.fcr = value,
            LCR => state.lcr = value,
            MCR => state.mcr = value,
            _ => panic!("write of unmodelled register {}", register),
        }
    }

    fn read32(&self, address: usize) -> u32 {
        let mut state = self.state.borrow_mut();
        if address == self.layout.gpio_fsel1 {
            state.fsel1_reads += 1;
            state.fsel1
        } else if address == self.layout.vpu_clock_divisor {
            state.vpu_divisor
        } else {
            panic!("32-bit read of unmodelled address {:#x}", address)
        }
    }
}
