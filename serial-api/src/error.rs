//! Error handling module for serial transports

use core::fmt;

/// Firmware-style status code for a device error.
pub const RETURN_DEVICE_ERROR: usize = status_error(7);
/// Firmware-style status code for an unsupported operation.
pub const RETURN_UNSUPPORTED: usize = status_error(3);
/// Firmware-style status code for an invalid parameter.
pub const RETURN_INVALID_PARAMETER: usize = status_error(2);

const fn status_error(code: usize) -> usize {
    (1 << (usize::BITS - 1)) | code
}

/// Common error type returned by every serial operation
///
/// Success is expressed as `Ok(..)`; there is no success variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialError {
    /// The device is not functioning correctly
    ///
    /// Reserved for back-ends that can detect a missing or broken device.
    /// The 16550 path never reports it.
    DeviceError,
    /// The operation (or a requested control bit) is not supported
    Unsupported,
    /// An attribute value is outside the supported encoding
    InvalidParameter(&'static str),
}

impl SerialError {
    /// Returns the firmware-style status code for this error.
    pub const fn status_code(&self) -> usize {
        match self {
            SerialError::DeviceError => RETURN_DEVICE_ERROR,
            SerialError::Unsupported => RETURN_UNSUPPORTED,
            SerialError::InvalidParameter(_) => RETURN_INVALID_PARAMETER,
        }
    }

    /// Returns true if this is an invalid parameter error
    pub const fn is_invalid_parameter(&self) -> bool {
        matches!(self, SerialError::InvalidParameter(_))
    }
}

impl fmt::Display for SerialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialError::DeviceError => write!(f, "Serial device error"),
            SerialError::Unsupported => write!(f, "Serial operation unsupported"),
            SerialError::InvalidParameter(what) => write!(f, "Invalid parameter: {}", what),
        }
    }
}

/// Result type for operations that can fail
pub type Result<T> = core::result::Result<T, SerialError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            format!("{}", SerialError::InvalidParameter("data bits")),
            "Invalid parameter: data bits"
        );
        assert_eq!(format!("{}", SerialError::Unsupported), "Serial operation unsupported");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(SerialError::InvalidParameter("x").status_code() & 0xFF, 2);
        assert_eq!(SerialError::Unsupported.status_code() & 0xFF, 3);
        assert_eq!(SerialError::DeviceError.status_code() & 0xFF, 7);
        assert_ne!(SerialError::DeviceError.status_code() >> (usize::BITS - 1), 0);
        assert!(SerialError::InvalidParameter("x").is_invalid_parameter());
        assert!(!SerialError::Unsupported.is_invalid_parameter());
    }
}
