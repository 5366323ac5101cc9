//! The receive work area as tagged states.
//!
//! A single flat struct for the whole receive work area would need one
//! `scratch index` field whose meaning shifts depending on which state is
//! current (bytes-received for FROM, TO, FLAGS, LEN, DATA *and* CRC, each
//! with different accumulation rules). Instead, [`ReceiveState`] is a sum
//! type whose variant carries only the scratch meaningful to that state.
//! `START`, `CMD`, and `STOP` need no scratch at all and carry none.
//!
//! Fields that have already been *decided* (not still being accumulated)
//! live in [`DecodedHeader`] instead, since they persist across states
//! within one frame rather than being state-local.

/// In-progress accumulation of one multi-byte field (an address, the
/// flags value, or the payload length), fed one byte at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldAccum {
    pub value: u32,
    pub bytes_read: usize,
}

/// In-progress payload copy: how many of the declared `len` bytes have
/// landed in the payload buffer so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataAccum {
    pub index: usize,
}

/// In-progress assembly of the little-endian CRC bytes off the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrcAccum {
    pub value: u32,
    pub bytes_read: usize,
}

/// Where the receive state machine currently is, carrying exactly the
/// scratch relevant to that position. A sentinel "no transition" state
/// isn't represented here — that case is expressed by the header dispatch
/// table ([`crate::config::first_enabled_from`]) returning `None`, not by
/// a state variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveState {
    Start,
    From(FieldAccum),
    To(FieldAccum),
    Flags(FieldAccum),
    Cmd,
    Len(FieldAccum),
    Data(DataAccum),
    Crc(CrcAccum),
    Stop,
}

impl ReceiveState {
    pub fn is_start(self) -> bool {
        matches!(self, ReceiveState::Start)
    }
}

impl Default for ReceiveState {
    fn default() -> Self {
        ReceiveState::Start
    }
}

/// Header fields decided so far in the current frame. Reset to all-zero
/// whenever the state machine returns to `Start`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodedHeader {
    pub from: u32,
    pub to: u32,
    pub flags: u32,
    pub cmd: u8,
    pub len: u32,
}
