//! Non-error results the receive state machine can return from a single
//! `read()` invocation.

/// What happened during one `read()` call that consumed whatever bytes
/// were currently available in the RX ring buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// A complete frame was assembled and its CRC (if enabled) and stop
    /// byte both checked out. Use the accessors to read it.
    Valid,
    /// Bytes were consumed, advancing the state machine, but no complete
    /// frame is available yet (state is somewhere past `START`).
    InProgress,
    /// No bytes were available, or the parser is idle at `START` waiting
    /// for the next start byte.
    WaitingForData,
}
