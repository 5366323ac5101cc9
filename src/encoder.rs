//! The transmit encoder: a single pre-flight-checked pass that builds one
//! complete frame. Unlike the receiver, encoding a frame is not
//! resumable — the whole frame is assembled in one call, after first
//! confirming the TX ring buffer has room for all of it, so a caller
//! never observes a half-written frame.

use bytes::{BufMut, BytesMut};
use log::{trace, warn};

use crate::constants::{START_BYTE, STOP_BYTE};
use crate::crc::CrcAccumulator;
use crate::error::LwPktError;
use crate::events::Event;
use crate::packet::{Feature, Packet};
use crate::ringbuffer::RingBuffer;
use crate::varint;

fn write_byte_covered(buf: &mut BytesMut, crc: &mut CrcAccumulator, byte: u8) {
    buf.put_u8(byte);
    crc.update(byte);
}

fn write_varint_covered(buf: &mut BytesMut, crc: &mut CrcAccumulator, value: u32) {
    let mut tmp = Vec::with_capacity(5);
    varint::encode(value, &mut tmp);
    for b in tmp {
        write_byte_covered(buf, crc, b);
    }
}

impl<const N: usize, RB: RingBuffer> Packet<N, RB> {
    /// Assemble and enqueue one frame: `FROM` is this instance's own
    /// address; `to`/`flags`/`cmd` default to `0` if `None` and the
    /// corresponding feature is enabled anyway. Fields belonging to
    /// disabled features are never written regardless of what's passed.
    ///
    /// Fails with [`LwPktError::InsufficientTxCapacity`] without writing
    /// anything if the TX ring buffer doesn't have room for the whole
    /// frame, and with [`LwPktError::InvalidArgument`] if `to` doesn't fit
    /// compact (non-extended) addressing.
    pub fn write(
        &mut self,
        to: Option<u32>,
        flags: Option<u32>,
        cmd: Option<u8>,
        data: &[u8],
    ) -> Result<(), LwPktError> {
        self.emit(Event::PreWrite);
        let result = self.write_inner(to, flags, cmd, data);
        if result.is_ok() {
            self.emit(Event::Write);
        }
        self.emit(Event::PostWrite);
        result
    }

    fn write_inner(
        &mut self,
        to: Option<u32>,
        flags: Option<u32>,
        cmd: Option<u8>,
        data: &[u8],
    ) -> Result<(), LwPktError> {
        let addr_enabled = self.config.is_enabled(Feature::Addr, self.runtime);
        let extended = self.config.is_enabled(Feature::AddrExtended, self.runtime);
        let flags_enabled = self.config.is_enabled(Feature::Flags, self.runtime);
        let cmd_enabled = self.config.is_enabled(Feature::Cmd, self.runtime);
        let crc_enabled = self.config.is_enabled(Feature::Crc, self.runtime);
        let crc_mode = self.effective_crc_mode();

        let to_val = to.unwrap_or(0);
        let flags_val = flags.unwrap_or(0);
        let cmd_val = cmd.unwrap_or(0);

        if addr_enabled && !extended && (self.own_addr > 0xFF || to_val > 0xFF) {
            warn!(
                "tx: address does not fit compact addressing (own=0x{:X} to=0x{:X}), rejecting write",
                self.own_addr, to_val
            );
            return Err(LwPktError::InvalidArgument(
                "address does not fit compact (8-bit) addressing".into(),
            ));
        }

        let mut required = 2usize; // start + stop
        if addr_enabled {
            required += if extended {
                varint::encoded_len(self.own_addr) + varint::encoded_len(to_val)
            } else {
                2
            };
        }
        if flags_enabled {
            required += varint::encoded_len(flags_val);
        }
        if cmd_enabled {
            required += 1;
        }
        required += varint::encoded_len(data.len() as u32);
        required += data.len();
        if crc_enabled {
            required += crc_mode.byte_len();
        }

        let available = self.tx.free_len();
        if available < required {
            warn!(
                "tx: frame needs {required} bytes but only {available} free, rejecting write"
            );
            return Err(LwPktError::InsufficientTxCapacity {
                required,
                available,
            });
        }
        trace!("tx: assembling {required}-byte frame");

        let mut buf = BytesMut::with_capacity(required);
        let mut crc = CrcAccumulator::new(crc_mode);

        buf.put_u8(START_BYTE);

        if addr_enabled {
            if extended {
                write_varint_covered(&mut buf, &mut crc, self.own_addr);
                write_varint_covered(&mut buf, &mut crc, to_val);
            } else {
                write_byte_covered(&mut buf, &mut crc, self.own_addr as u8);
                write_byte_covered(&mut buf, &mut crc, to_val as u8);
            }
        }
        if flags_enabled {
            write_varint_covered(&mut buf, &mut crc, flags_val);
        }
        if cmd_enabled {
            write_byte_covered(&mut buf, &mut crc, cmd_val);
        }
        write_varint_covered(&mut buf, &mut crc, data.len() as u32);
        for &b in data {
            write_byte_covered(&mut buf, &mut crc, b);
        }
        if crc_enabled {
            let value = crc.finish();
            for i in 0..crc_mode.byte_len() {
                buf.put_u8(((value >> (8 * i)) & 0xFF) as u8);
            }
        }
        buf.put_u8(STOP_BYTE);

        debug_assert_eq!(buf.len(), required);
        let written = self.tx.write(&buf);
        debug_assert_eq!(written, buf.len());
        Ok(())
    }
}
