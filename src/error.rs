//! Error types for the lwpkt crate.
//!
//! Only genuine frame-level faults are represented here. The non-error
//! results a read can produce (a complete valid frame, a frame still in
//! progress, an idle parser waiting for a start byte) live in
//! [`crate::status::FrameStatus`] instead, since returning them as `Err`
//! would make the common case of "keep feeding bytes" look like failure.

use thiserror::Error;

/// Errors produced by the receive state machine, the transmit encoder, or
/// instance configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LwPktError {
    /// CRC verification failed; the frame was discarded and the parser reset.
    #[error("CRC mismatch: expected 0x{expected:08X}, calculated 0x{calculated:08X}")]
    CrcMismatch { expected: u32, calculated: u32 },

    /// The byte after DATA/CRC wasn't the stop byte; frame discarded, parser reset.
    #[error("stop byte mismatch: expected 0x55, got 0x{got:02X}")]
    StopByteMismatch { got: u8 },

    /// The declared payload length would exceed the instance's fixed capacity.
    #[error("payload overflow: declared length {len} exceeds capacity {capacity}")]
    PayloadOverflow { len: u32, capacity: usize },

    /// `write()` would need more bytes than the TX ring buffer has free; no
    /// bytes were written.
    #[error("insufficient TX ring buffer capacity: need {required}, have {available}")]
    InsufficientTxCapacity { required: usize, available: usize },

    /// A value passed to a setter doesn't fit the configured wire layout
    /// (e.g. an address that doesn't fit in compact 8-bit addressing).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
