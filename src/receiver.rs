//! The receive state machine: the frame transition table as a Rust
//! `match` over [`ReceiveState`], one byte at a time.
//!
//! `read()` is the public entry point a caller polls: it drains whatever
//! is currently queued in the RX ring buffer and stops at the first
//! terminal condition (a complete, CRC-checked frame, or an error), even
//! if more bytes remain queued — those are picked up on the next call.
//! Each individual byte is dispatched through [`Packet::step`], which
//! mirrors the state table entry by entry.

use log::{debug, trace, warn};

use crate::config::{first_enabled_after, first_enabled_from, Feature, Section};
use crate::constants::{
    STOP_BYTE, START_BYTE, VARINT_CONTINUATION_BIT, VARINT_DATA_MASK, VARINT_MAX_BYTES,
};
use crate::crc::CrcAccumulator;
use crate::error::LwPktError;
use crate::events::Event;
use crate::packet::Packet;
use crate::ringbuffer::RingBuffer;
use crate::state::{CrcAccum, DataAccum, DecodedHeader, FieldAccum, ReceiveState};
use crate::status::FrameStatus;

impl<const N: usize, RB: RingBuffer> Packet<N, RB> {
    /// Consume whatever bytes are currently available in the RX ring
    /// buffer, advancing the receive state machine, and return the first
    /// terminal result reached. Returns `WaitingForData` immediately if
    /// nothing was queued and the parser was already idle.
    pub fn read(&mut self) -> Result<FrameStatus, LwPktError> {
        self.emit(Event::PreRead);
        let mut consumed_any = false;
        let result = loop {
            match self.rx.read_one() {
                None => {
                    break Ok(if self.rx_state.is_start() {
                        FrameStatus::WaitingForData
                    } else {
                        FrameStatus::InProgress
                    });
                }
                Some(byte) => {
                    consumed_any = true;
                    match self.step(byte) {
                        Ok(Some(status)) => break Ok(status),
                        Ok(None) => continue,
                        Err(e) => break Err(e),
                    }
                }
            }
        };
        if consumed_any {
            self.emit(Event::Read);
        }
        self.emit(Event::PostRead);
        result
    }

    /// Advance the state machine by exactly one byte. `Ok(Some(status))`
    /// means a frame finished (successfully or not, folded into the
    /// `Result`); `Ok(None)` means keep feeding bytes.
    fn step(&mut self, byte: u8) -> Result<Option<FrameStatus>, LwPktError> {
        match self.rx_state {
            ReceiveState::Start => {
                if byte == START_BYTE {
                    trace!("rx: start byte seen, beginning new frame");
                    self.header = DecodedHeader::default();
                    self.rx_crc = CrcAccumulator::new(self.effective_crc_mode());
                    let first =
                        first_enabled_from(Section::From, &self.config, self.runtime);
                    self.enter_section(first);
                }
                Ok(None)
            }
            ReceiveState::From(acc) => self.step_address(byte, acc, Section::From),
            ReceiveState::To(acc) => self.step_address(byte, acc, Section::To),
            ReceiveState::Flags(acc) => self.step_flags(byte, acc),
            ReceiveState::Cmd => {
                self.rx_crc.update(byte);
                self.header.cmd = byte;
                let next = first_enabled_after(Section::Cmd, &self.config, self.runtime);
                self.enter_section(next);
                Ok(None)
            }
            ReceiveState::Len(acc) => self.step_len(byte, acc),
            ReceiveState::Data(acc) => self.step_data(byte, acc),
            ReceiveState::Crc(acc) => self.step_crc(byte, acc),
            ReceiveState::Stop => self.step_stop(byte),
        }
    }

    fn enter_section(&mut self, section: Option<Section>) {
        self.rx_state = match section {
            Some(Section::From) => ReceiveState::From(FieldAccum::default()),
            Some(Section::To) => ReceiveState::To(FieldAccum::default()),
            Some(Section::Flags) => ReceiveState::Flags(FieldAccum::default()),
            Some(Section::Cmd) => ReceiveState::Cmd,
            None => ReceiveState::Len(FieldAccum::default()),
        };
        trace!("rx: entering {:?}", self.rx_state);
    }

    fn after_data_state(&self) -> ReceiveState {
        if self.config.is_enabled(Feature::Crc, self.runtime) {
            ReceiveState::Crc(CrcAccum::default())
        } else {
            ReceiveState::Stop
        }
    }

    /// FROM/TO share one decode routine: compact addressing reads a single
    /// raw byte, extended addressing reads a varint-7.
    fn step_address(
        &mut self,
        byte: u8,
        mut acc: FieldAccum,
        section: Section,
    ) -> Result<Option<FrameStatus>, LwPktError> {
        self.rx_crc.update(byte);
        let extended = self.config.is_enabled(Feature::AddrExtended, self.runtime);
        let done = if extended {
            let data = (byte & VARINT_DATA_MASK) as u32;
            acc.value |= data << (7 * acc.bytes_read);
            acc.bytes_read += 1;
            (byte & VARINT_CONTINUATION_BIT == 0) || acc.bytes_read >= VARINT_MAX_BYTES
        } else {
            acc.value = byte as u32;
            acc.bytes_read = 1;
            true
        };
        if done {
            match section {
                Section::From => self.header.from = acc.value,
                Section::To => self.header.to = acc.value,
                _ => unreachable!("step_address only handles From/To"),
            }
            let next = first_enabled_after(section, &self.config, self.runtime);
            self.enter_section(next);
        } else {
            self.rx_state = match section {
                Section::From => ReceiveState::From(acc),
                Section::To => ReceiveState::To(acc),
                _ => unreachable!("step_address only handles From/To"),
            };
        }
        Ok(None)
    }

    fn step_flags(&mut self, byte: u8, mut acc: FieldAccum) -> Result<Option<FrameStatus>, LwPktError> {
        self.rx_crc.update(byte);
        let data = (byte & VARINT_DATA_MASK) as u32;
        acc.value |= data << (7 * acc.bytes_read);
        acc.bytes_read += 1;
        let done = (byte & VARINT_CONTINUATION_BIT == 0) || acc.bytes_read >= VARINT_MAX_BYTES;
        if done {
            self.header.flags = acc.value;
            let next = first_enabled_after(Section::Flags, &self.config, self.runtime);
            self.enter_section(next);
        } else {
            self.rx_state = ReceiveState::Flags(acc);
        }
        Ok(None)
    }

    fn step_len(&mut self, byte: u8, mut acc: FieldAccum) -> Result<Option<FrameStatus>, LwPktError> {
        self.rx_crc.update(byte);
        let data = (byte & VARINT_DATA_MASK) as u32;
        acc.value |= data << (7 * acc.bytes_read);
        acc.bytes_read += 1;
        let done = (byte & VARINT_CONTINUATION_BIT == 0) || acc.bytes_read >= VARINT_MAX_BYTES;
        if !done {
            self.rx_state = ReceiveState::Len(acc);
            return Ok(None);
        }
        self.header.len = acc.value;
        if acc.value as usize > N {
            warn!(
                "rx: declared length {} exceeds payload capacity {}, discarding frame",
                acc.value, N
            );
            self.reset();
            return Err(LwPktError::PayloadOverflow {
                len: acc.value,
                capacity: N,
            });
        }
        self.rx_state = if acc.value > 0 {
            ReceiveState::Data(DataAccum::default())
        } else {
            self.after_data_state()
        };
        Ok(None)
    }

    fn step_data(&mut self, byte: u8, mut acc: DataAccum) -> Result<Option<FrameStatus>, LwPktError> {
        self.rx_crc.update(byte);
        self.payload[acc.index] = byte;
        acc.index += 1;
        self.rx_state = if acc.index as u32 >= self.header.len {
            self.after_data_state()
        } else {
            ReceiveState::Data(acc)
        };
        Ok(None)
    }

    fn step_crc(&mut self, byte: u8, mut acc: CrcAccum) -> Result<Option<FrameStatus>, LwPktError> {
        acc.value |= (byte as u32) << (8 * acc.bytes_read);
        acc.bytes_read += 1;
        let expected_len = self.rx_crc.mode().byte_len();
        if acc.bytes_read < expected_len {
            self.rx_state = ReceiveState::Crc(acc);
            return Ok(None);
        }
        let calculated = self.rx_crc.finish();
        if acc.value != calculated {
            warn!(
                "rx: CRC mismatch, expected 0x{:X} calculated 0x{:X}, discarding frame",
                acc.value, calculated
            );
            self.reset();
            return Err(LwPktError::CrcMismatch {
                expected: acc.value,
                calculated,
            });
        }
        debug!("rx: CRC verified");
        self.rx_state = ReceiveState::Stop;
        Ok(None)
    }

    fn step_stop(&mut self, byte: u8) -> Result<Option<FrameStatus>, LwPktError> {
        self.rx_state = ReceiveState::Start;
        if byte == STOP_BYTE {
            debug!("rx: frame complete");
            Ok(Some(FrameStatus::Valid))
        } else {
            warn!("rx: expected stop byte 0x{STOP_BYTE:X}, got 0x{byte:X}, discarding frame");
            self.header = DecodedHeader::default();
            Err(LwPktError::StopByteMismatch { got: byte })
        }
    }
}
