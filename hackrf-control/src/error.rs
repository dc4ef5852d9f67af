use std::ops::Range;

use crate::proto::GainStage;
use crate::transport::TransportError;

/// An error from operating the HackRF.
///
/// Some errors are recoverable:
///
/// - `DeviceNotFound` means discovery turned up no matching device; the
///   session stays unopened and `setup` can be retried after replugging.
/// - `InvalidFrequency`, `GainOutOfRange`, `AddressRange`, and `ValueRange`
///   mean an argument was rejected before anything was sent to the device.
/// - `Transport` may just be a failed transfer on the USB cable and can
///   potentially be recovered from without giving up on the device. This
///   driver never retries on its own; retry policy belongs to the caller.
/// - `ShortTransfer` and `GainRejected` mean the bus worked but the device's
///   reply didn't satisfy the protocol.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// No HackRF was found during discovery, or opening it failed cleanly.
    #[error("no HackRF device found")]
    DeviceNotFound,

    /// An operation was attempted before a successful `setup`.
    #[error("device session is not opened; call setup() first")]
    NotOpened,

    /// The requested tuning frequency cannot be encoded in the wire format.
    #[error("frequency ({freq_hz} Hz) exceeds the encodable tuning range")]
    InvalidFrequency {
        /// The rejected frequency.
        freq_hz: u64,
    },

    /// A gain value exceeds the maximum for its stage.
    #[error("{stage} gain ({gain} dB) out of range (0..={max} dB)")]
    #[allow(missing_docs)]
    GainOutOfRange {
        stage: GainStage,
        gain: u16,
        max: u16,
    },

    /// A register address is out of range for the targeted sub-device.
    #[error("register address (0x{addr:x}) out of range (0x{}..0x{})", .range.start, .range.end)]
    #[allow(missing_docs)]
    AddressRange { range: Range<u32>, addr: u32 },

    /// An argument value is out of range.
    #[error("value (0x{val:x}) out of range (0x{}..0x{})", .range.start, .range.end)]
    #[allow(missing_docs)]
    ValueRange { range: Range<u32>, val: u32 },

    /// The underlying control transfer failed. The cause is passed through
    /// unmodified.
    #[error("control transport failure")]
    Transport(#[from] TransportError),

    /// The transfer completed but moved fewer bytes than the protocol
    /// requires. Never treated as partial success.
    #[error("short transfer: expected {expected} bytes, got {actual}")]
    #[allow(missing_docs)]
    ShortTransfer { expected: usize, actual: usize },

    /// The device answered a gain-set request without acknowledging it.
    #[error("device rejected the gain setting")]
    GainRejected,
}
