//! Error kinds surfaced by the rover link.

use thiserror::Error;

/// Opaque failure reported by the platform capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CapabilityError {
    message: String,
}

impl CapabilityError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Hard failures a caller of the link manager can see. Discovery and
/// disconnect never produce these; they degrade to empty results or a
/// plain success instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// The capability was never bound, or binding timed out.
    #[error("bluetooth serial capability is not available")]
    CapabilityUnavailable,
    /// Both connect strategies (insecure, then standard) failed.
    #[error("could not connect to the device with either strategy")]
    ConnectionFailed,
    /// A command was sent with no active link.
    #[error("robot is not connected")]
    NotConnected,
    /// The platform rejected the serial write.
    #[error("serial write failed: {0}")]
    WriteFailed(#[source] CapabilityError),
    /// The platform refused to switch the radio on.
    #[error("could not enable bluetooth: {0}")]
    EnableFailed(#[source] CapabilityError),
}
