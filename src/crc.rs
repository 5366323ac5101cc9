//! Streaming CRC accumulator: CRC-8 (Dallas/1-Wire, reversed polynomial
//! 0x8C) and CRC-32 (ISO-HDLC, reversed polynomial 0xEDB88320, all-ones
//! init, final XOR). Both fold input one byte at a time, which is what
//! the receive state machine and the transmit encoder both need — the
//! whole frame is never buffered up just to compute a checksum over it.
//!
//! The CRC-32 byte table is built once, lazily, via `once_cell` — the
//! protocol's C reference implementation builds an equivalent table with
//! a `static mut` guarded by a once-flag and raw pointer writes; this is
//! the safe equivalent.

use once_cell::sync::Lazy;

const CRC32_POLY: u32 = 0xEDB88320;
const CRC8_POLY: u8 = 0x8C;

static CRC32_TABLE: Lazy<[u32; 256]> = Lazy::new(|| {
    let mut table = [0u32; 256];
    let mut i = 0usize;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ CRC32_POLY
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
});

/// Which polynomial/width an accumulator (or a `Packet` instance) uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrcMode {
    Crc8,
    Crc32,
}

impl CrcMode {
    /// Number of bytes the CRC occupies on the wire.
    pub fn byte_len(self) -> usize {
        match self {
            CrcMode::Crc8 => 1,
            CrcMode::Crc32 => 4,
        }
    }
}

/// A running CRC computation. Fold bytes in with [`update`](Self::update)
/// as they're produced/consumed, then read the final value with
/// [`finish`](Self::finish).
#[derive(Debug, Clone, Copy)]
pub struct CrcAccumulator {
    mode: CrcMode,
    value: u32,
}

impl CrcAccumulator {
    /// Start a new accumulation. CRC-8 starts at 0; CRC-32 starts at
    /// all-ones, per the ISO-HDLC convention.
    pub fn new(mode: CrcMode) -> Self {
        let value = match mode {
            CrcMode::Crc8 => 0,
            CrcMode::Crc32 => 0xFFFF_FFFF,
        };
        CrcAccumulator { mode, value }
    }

    pub fn mode(&self) -> CrcMode {
        self.mode
    }

    /// Fold one byte into the running value.
    pub fn update(&mut self, byte: u8) {
        match self.mode {
            CrcMode::Crc8 => {
                let mut acc = self.value as u8;
                let mut b = byte;
                for _ in 0..8 {
                    if (acc ^ b) & 1 != 0 {
                        acc = (acc >> 1) ^ CRC8_POLY;
                    } else {
                        acc >>= 1;
                    }
                    b >>= 1;
                }
                self.value = acc as u32;
            }
            CrcMode::Crc32 => {
                let idx = ((self.value ^ byte as u32) & 0xFF) as usize;
                self.value = (self.value >> 8) ^ CRC32_TABLE[idx];
            }
        }
    }

    /// Fold a whole slice in, in order.
    pub fn update_slice(&mut self, data: &[u8]) {
        for &b in data {
            self.update(b);
        }
    }

    /// Return the final CRC value: identity for CRC-8, final-XOR for CRC-32.
    pub fn finish(&self) -> u32 {
        match self.mode {
            CrcMode::Crc8 => self.value,
            CrcMode::Crc32 => self.value ^ 0xFFFF_FFFF,
        }
    }
}

/// One-shot helper: compute the CRC of a complete slice.
pub fn crc_of(mode: CrcMode, data: &[u8]) -> u32 {
    let mut acc = CrcAccumulator::new(mode);
    acc.update_slice(data);
    acc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc8_of_empty_is_zero() {
        assert_eq!(crc_of(CrcMode::Crc8, &[]), 0);
    }

    #[test]
    fn crc32_of_empty_matches_iso_hdlc_identity() {
        // CRC-32/ISO-HDLC of zero bytes is 0 (init XOR final-XOR cancel).
        assert_eq!(crc_of(CrcMode::Crc32, &[]), 0);
    }

    #[test]
    fn crc32_matches_known_vector() {
        // CRC-32/ISO-HDLC ("PKZIP"/zlib variant) of ASCII "123456789".
        assert_eq!(crc_of(CrcMode::Crc32, b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn crc8_maxim_matches_known_vector() {
        // Dallas/Maxim CRC-8/MAXIM of ASCII "123456789" is 0xA1.
        assert_eq!(crc_of(CrcMode::Crc8, b"123456789"), 0xA1);
    }

    #[test]
    fn incremental_update_matches_one_shot() {
        let data = b"the quick brown fox";
        let mut acc = CrcAccumulator::new(CrcMode::Crc32);
        for chunk in data.chunks(3) {
            acc.update_slice(chunk);
        }
        assert_eq!(acc.finish(), crc_of(CrcMode::Crc32, data));

        let mut acc8 = CrcAccumulator::new(CrcMode::Crc8);
        for &b in data {
            acc8.update(b);
        }
        assert_eq!(acc8.finish(), crc_of(CrcMode::Crc8, data));
    }

    #[test]
    fn single_bit_flip_changes_crc() {
        let data = b"lwpkt frame payload";
        let original = crc_of(CrcMode::Crc32, data);
        let mut flipped = data.to_vec();
        flipped[5] ^= 0x01;
        assert_ne!(original, crc_of(CrcMode::Crc32, &flipped));

        let original8 = crc_of(CrcMode::Crc8, data);
        assert_ne!(original8, crc_of(CrcMode::Crc8, &flipped));
    }

    #[test]
    fn byte_len_matches_mode() {
        assert_eq!(CrcMode::Crc8.byte_len(), 1);
        assert_eq!(CrcMode::Crc32.byte_len(), 4);
    }
}
