//! Modem control and status signals

bitflags::bitflags! {
    /// Control and status signal mask reported by `GetControl` and
    /// accepted by `SetControl`.
    ///
    /// Bit positions follow the firmware serial I/O encoding.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControlSignals: u32 {
        /// Data Terminal Ready
        const DATA_TERMINAL_READY = 0x0001;
        /// Request To Send
        const REQUEST_TO_SEND = 0x0002;
        /// Clear To Send
        const CLEAR_TO_SEND = 0x0010;
        /// Data Set Ready
        const DATA_SET_READY = 0x0020;
        /// Ring Indicate
        const RING_INDICATE = 0x0040;
        /// Data Carrier Detect
        const CARRIER_DETECT = 0x0080;
        /// Receive side has no pending data
        const INPUT_BUFFER_EMPTY = 0x0100;
        /// Transmit FIFO and shift register are empty
        const OUTPUT_BUFFER_EMPTY = 0x0200;
        /// Hardware loopback
        const HARDWARE_LOOPBACK_ENABLE = 0x1000;
        /// Software loopback
        const SOFTWARE_LOOPBACK_ENABLE = 0x2000;
        /// Hardware flow control is in effect
        const HARDWARE_FLOW_CONTROL_ENABLE = 0x4000;
    }
}

impl ControlSignals {
    /// Signals a caller may request through `SetControl` on the 16550 path.
    pub const SETTABLE: ControlSignals = ControlSignals::REQUEST_TO_SEND
        .union(ControlSignals::DATA_TERMINAL_READY)
        .union(ControlSignals::HARDWARE_FLOW_CONTROL_ENABLE);

    /// Returns true if every bit in `raw` (known or not) is settable.
    ///
    /// Works on raw bits so that undefined bits are not silently truncated.
    pub const fn only_settable(raw: u32) -> bool {
        raw & !Self::SETTABLE.bits() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settable_mask() {
        assert!(ControlSignals::only_settable(0));
        assert!(ControlSignals::only_settable(ControlSignals::SETTABLE.bits()));
        assert!(!ControlSignals::only_settable(ControlSignals::CLEAR_TO_SEND.bits()));
        assert!(!ControlSignals::only_settable(1 << 31));
    }

    #[test]
    fn test_retain_keeps_unknown_bits() {
        let raw = ControlSignals::REQUEST_TO_SEND.bits() | (1 << 31);
        let signals = ControlSignals::from_bits_retain(raw);
        assert_eq!(signals.bits(), raw);
        assert!(!ControlSignals::only_settable(signals.bits()));
    }
}
