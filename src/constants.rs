//! lwpkt wire-format constants.
//!
//! Values match the layout described in the protocol's wire format: fixed
//! start/stop delimiters, the broadcast address sentinel, and the numeric
//! defaults a `Packet` instance falls back to when the caller doesn't
//! override them.

/// Marks the beginning of a frame on the wire. Not CRC-covered.
pub const START_BYTE: u8 = 0xAA;

/// Marks the end of a frame on the wire. Not CRC-covered.
pub const STOP_BYTE: u8 = 0x55;

/// Destination address sentinel meaning "all nodes".
pub const ADDR_BROADCAST: u32 = 0xFF;

/// Default fixed-capacity payload size when a caller doesn't pick their own
/// `N` for `Packet<N, _>`.
pub const DEFAULT_MAX_DATA_LEN: usize = 256;

/// Default idle window (milliseconds) the watchdog allows a frame to sit
/// mid-state before it forces a reset.
pub const DEFAULT_PROCESS_INPROG_TIMEOUT_MS: u32 = 100;

/// Varint-7 continuation bit: set means "more bytes follow".
pub const VARINT_CONTINUATION_BIT: u8 = 0x80;

/// Low 7 data bits of a varint-7 byte.
pub const VARINT_DATA_MASK: u8 = 0x7F;

/// A varint-7 encoding a full u32 never needs more than this many bytes
/// (ceil(32/7) = 5).
pub const VARINT_MAX_BYTES: usize = 5;
