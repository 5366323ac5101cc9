//! # lwpkt - a lightweight framed packet protocol core
//!
//! `lwpkt` implements a small framed packet protocol for byte-stream
//! links (UART, RS-485, USB CDC): a `START`/`STOP`-delimited frame with
//! optional address, flags, and command sections, a varint-7 encoded
//! length, and either a CRC-8 or CRC-32 integrity check, all built around
//! a byte-at-a-time, resumable receive state machine so it never needs to
//! block waiting for a whole frame to arrive.
//!
//! ## Features
//!
//! - Byte-driven, resumable frame receiver with an explicit state machine
//! - One-shot, pre-flight-checked frame transmit encoder
//! - Per-instance feature configuration (address, extended address,
//!   flags, command, CRC-8 vs CRC-32), each independently
//!   disabled/always-on/runtime-toggleable
//! - No dynamic memory allocation on the hot path: payload storage and the
//!   default ring buffer are both fixed-capacity, sized via const generics
//! - An idle-frame watchdog for polling-loop callers
//! - An event sink for observing protocol milestones
//!
//! ## Usage
//!
//! ```rust
//! use lwpkt::{FeatureConfig, Packet, StaticRingBuffer};
//!
//! let mut pkt = Packet::<256, StaticRingBuffer<512>>::new(
//!     FeatureConfig::all_dynamic(),
//!     StaticRingBuffer::new(),
//!     StaticRingBuffer::new(),
//! );
//! pkt.set_own_address(0x10).unwrap();
//! pkt.write(Some(0x20), None, Some(0x01), b"hello").unwrap();
//! ```

pub mod config;
pub mod constants;
pub mod crc;
pub mod encoder;
pub mod error;
pub mod events;
pub mod logging;
pub mod packet;
pub mod receiver;
pub mod ringbuffer;
pub mod state;
pub mod status;
pub mod varint;

pub use crate::config::{Feature, FeatureConfig, FeatureMode, RuntimeFlags};
pub use crate::error::LwPktError;
pub use crate::events::{Event, EventSink};
pub use crate::logging::{init_logger, log_debug, log_error, log_info, log_warn};
pub use crate::packet::Packet;
pub use crate::ringbuffer::{RingBuffer, StaticRingBuffer};
pub use crate::status::FrameStatus;
