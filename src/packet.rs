//! The `Packet` instance: the single type an application holds. Owns the
//! feature configuration, both ring buffers, the receive work area, and
//! the decoded header/payload storage. `read`/`write`/`process`/`reset`
//! and the field accessors live here; the state-transition table and the
//! transmit encoder are big enough to earn their own modules
//! ([`crate::receiver`], [`crate::encoder`]) but are `impl` blocks on this
//! same type.

use log::{debug, warn};

use crate::config::{FeatureConfig, RuntimeFlags};
use crate::constants::{ADDR_BROADCAST, DEFAULT_PROCESS_INPROG_TIMEOUT_MS};
use crate::crc::{CrcAccumulator, CrcMode};
use crate::error::LwPktError;
use crate::events::{Event, EventSink};
use crate::ringbuffer::RingBuffer;
use crate::state::{DecodedHeader, ReceiveState};
pub use crate::config::Feature;

/// A protocol instance: configuration, ring buffers, and decoded state for
/// one link. `N` is the fixed payload capacity; `RB` is the ring buffer
/// implementation backing both directions.
///
/// Not `Sync` by design — a `Packet` is meant to be driven from one
/// thread (an interrupt handler or a single async task), matching the
/// single-threaded, no-locks resource model the wire protocol assumes.
pub struct Packet<const N: usize, RB: RingBuffer> {
    pub(crate) config: FeatureConfig,
    pub(crate) runtime: RuntimeFlags,
    pub(crate) own_addr: u32,
    pub(crate) tx: RB,
    pub(crate) rx: RB,
    pub(crate) event_sink: Option<Box<dyn EventSink>>,
    pub(crate) process_timeout_ms: u32,
    pub(crate) last_rx_time_ms: u32,
    pub(crate) payload: [u8; N],
    pub(crate) header: DecodedHeader,
    pub(crate) rx_state: ReceiveState,
    pub(crate) rx_crc: CrcAccumulator,
}

impl<const N: usize, RB: RingBuffer> Packet<N, RB> {
    /// Build a new instance around the given TX/RX ring buffers.
    /// Can't fail: an all-dynamic, every-feature-on configuration and a
    /// zeroed work area is always a valid starting point.
    pub fn new(config: FeatureConfig, tx: RB, rx: RB) -> Self {
        Packet {
            config,
            runtime: RuntimeFlags::default(),
            own_addr: 0,
            tx,
            rx,
            event_sink: None,
            process_timeout_ms: DEFAULT_PROCESS_INPROG_TIMEOUT_MS,
            last_rx_time_ms: 0,
            payload: [0u8; N],
            header: DecodedHeader::default(),
            rx_state: ReceiveState::Start,
            rx_crc: CrcAccumulator::new(CrcMode::Crc8),
        }
    }

    /// Set this instance's own address, used as the `FROM` field on
    /// everything it writes. Rejected if it doesn't fit the currently
    /// active addressing width (compact addressing is one byte).
    pub fn set_own_address(&mut self, addr: u32) -> Result<(), LwPktError> {
        let extended = self.config.is_enabled(Feature::AddrExtended, self.runtime);
        if !extended && addr > 0xFF {
            return Err(LwPktError::InvalidArgument(format!(
                "address {addr} does not fit compact (8-bit) addressing"
            )));
        }
        self.own_addr = addr;
        Ok(())
    }

    /// Flip a `Dynamic`-configured feature's runtime flag. Returns `false`
    /// (no-op) if `feature` is configured `Disabled` or `Always`.
    pub fn set_feature_enabled(&mut self, feature: Feature, on: bool) -> bool {
        self.config.set_enabled(feature, &mut self.runtime, on)
    }

    /// Register a sink to receive [`Event`] notifications. Replaces any
    /// previously registered sink.
    pub fn set_event_sink(&mut self, sink: Box<dyn EventSink>) {
        self.event_sink = Some(sink);
    }

    /// Override the watchdog's in-progress idle timeout (default
    /// [`crate::constants::DEFAULT_PROCESS_INPROG_TIMEOUT_MS`]).
    pub fn set_process_timeout_ms(&mut self, timeout_ms: u32) {
        self.process_timeout_ms = timeout_ms;
    }

    /// Discard any partially assembled frame and return the receive state
    /// machine to idle. Leaves the RX ring buffer's queued bytes alone —
    /// anything already sitting past the malformed frame may be the start
    /// of the next one. Does not touch the last successfully decoded
    /// frame's fields either — those remain readable via the accessors
    /// until the next frame starts.
    pub fn reset(&mut self) {
        debug!("resetting receive state machine from {:?}", self.rx_state);
        self.rx_state = ReceiveState::Start;
        self.header = DecodedHeader::default();
    }

    /// Feed bytes just received from the transport (a serial port, a
    /// socket) into the RX ring buffer, for `read()`/`process()` to
    /// consume afterward. Returns how many bytes fit.
    pub fn feed_rx(&mut self, bytes: &[u8]) -> usize {
        self.rx.write(bytes)
    }

    /// Drain up to `out.len()` bytes a prior `write()` enqueued, for a
    /// transport to push out over the wire. Returns how many bytes were
    /// copied.
    pub fn drain_tx(&mut self, out: &mut [u8]) -> usize {
        let mut n = 0;
        while n < out.len() {
            match self.tx.read_one() {
                Some(b) => {
                    out[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        n
    }

    pub(crate) fn emit(&mut self, event: Event) {
        if let Some(sink) = self.event_sink.as_mut() {
            sink.on_event(event);
        }
    }

    pub(crate) fn effective_crc_mode(&self) -> CrcMode {
        if self.config.is_enabled(Feature::Crc32, self.runtime) {
            CrcMode::Crc32
        } else {
            CrcMode::Crc8
        }
    }

    /// Sender address of the last successfully decoded frame.
    pub fn from(&self) -> u32 {
        self.header.from
    }

    /// Destination address of the last successfully decoded frame.
    pub fn to(&self) -> u32 {
        self.header.to
    }

    /// User flags of the last successfully decoded frame.
    pub fn flags(&self) -> u32 {
        self.header.flags
    }

    /// Command byte of the last successfully decoded frame.
    pub fn cmd(&self) -> u8 {
        self.header.cmd
    }

    /// Declared payload length of the last successfully decoded frame.
    pub fn data_len(&self) -> usize {
        self.header.len as usize
    }

    /// Payload bytes of the last successfully decoded frame.
    pub fn data(&self) -> &[u8] {
        &self.payload[..self.data_len()]
    }

    /// Was the last decoded frame addressed to this instance's own address?
    /// Meaningless (returns `false`) if addressing is disabled for this
    /// instance, since `to()` never carries a wire value in that case.
    pub fn is_for_me(&self) -> bool {
        self.config.is_enabled(Feature::Addr, self.runtime) && self.header.to == self.own_addr
    }

    /// Was the last decoded frame sent to the broadcast address?
    pub fn is_broadcast(&self) -> bool {
        self.config.is_enabled(Feature::Addr, self.runtime) && self.header.to == ADDR_BROADCAST
    }

    /// Drive both the receive state machine and the in-progress watchdog
    /// from one call, suitable for a periodic polling loop. `now_ms` is a
    /// monotonic millisecond clock the caller supplies (this crate never
    /// reads the system clock itself).
    pub fn process(&mut self, now_ms: u32) -> Result<crate::status::FrameStatus, LwPktError> {
        let result = self.read();
        match &result {
            Ok(crate::status::FrameStatus::Valid) => {
                self.last_rx_time_ms = now_ms;
                self.emit(Event::Pkt);
            }
            Ok(crate::status::FrameStatus::InProgress) => {
                if now_ms.wrapping_sub(self.last_rx_time_ms) >= self.process_timeout_ms {
                    warn!(
                        "in-progress frame idle for >={}ms, discarding via watchdog",
                        self.process_timeout_ms
                    );
                    self.reset();
                    self.last_rx_time_ms = now_ms;
                    self.emit(Event::Timeout);
                }
            }
            _ => {
                self.last_rx_time_ms = now_ms;
            }
        }
        result
    }
}
