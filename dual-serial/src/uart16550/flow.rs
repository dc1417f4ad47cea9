//! Flow-control gate
//!
//! Decides from the modem status whether the next byte may be
//! transmitted.
//!
//! With cable detection, both DSR (cable present) and CTS (clear to send)
//! must be set:
//!
//! | DSR | CTS | Action   |
//! |-----|-----|----------|
//! |  0  |  0  | Wait     |
//! |  0  |  1  | Wait     |
//! |  1  |  0  | Wait     |
//! |  1  |  1  | Transmit |
//!
//! Without cable detection, only "cable present but not clear to send"
//! holds transmission back:
//!
//! | DSR | CTS | Action   |
//! |-----|-----|----------|
//! |  0  |  x  | Transmit |
//! |  1  |  0  | Wait     |
//! |  1  |  1  | Transmit |

use super::registers::Msr;

/// Flow-control policy taken from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowControl {
    /// Hardware flow control enabled
    pub enabled: bool,
    /// Require DSR before transmitting
    pub detect_cable: bool,
}

impl FlowControl {
    /// Returns true if the policy never consults the modem status.
    pub const fn is_disabled(&self) -> bool {
        !self.enabled
    }

    /// Returns true if a byte may be transmitted given `msr`.
    pub fn writable(&self, msr: Msr) -> bool {
        if !self.enabled {
            return true;
        }
        let lines = msr.intersection(Msr::DSR | Msr::CTS);
        if self.detect_cable {
            lines == Msr::DSR | Msr::CTS
        } else {
            lines != Msr::DSR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: Msr = Msr::empty();

    #[test]
    fn test_disabled_always_writable() {
        let flow = FlowControl { enabled: false, detect_cable: true };
        for msr in [NONE, Msr::DSR, Msr::CTS, Msr::DSR | Msr::CTS] {
            assert!(flow.writable(msr));
        }
        assert!(flow.is_disabled());
    }

    #[test]
    fn test_cable_detection_table() {
        let flow = FlowControl { enabled: true, detect_cable: true };
        assert!(!flow.writable(NONE));
        assert!(!flow.writable(Msr::CTS));
        assert!(!flow.writable(Msr::DSR));
        assert!(flow.writable(Msr::DSR | Msr::CTS));
    }

    #[test]
    fn test_no_cable_detection_table() {
        let flow = FlowControl { enabled: true, detect_cable: false };
        assert!(flow.writable(NONE));
        assert!(flow.writable(Msr::CTS));
        assert!(!flow.writable(Msr::DSR));
        assert!(flow.writable(Msr::DSR | Msr::CTS));
    }

    #[test]
    fn test_other_msr_bits_ignored() {
        let flow = FlowControl { enabled: true, detect_cable: false };
        assert!(!flow.writable(Msr::DSR | Msr::RI | Msr::DCD));
        assert!(flow.writable(Msr::from_bits_retain(0x0F)));
    }
}
