#![no_main]

use libfuzzer_sys::fuzz_target;
use lwpkt::{FeatureConfig, Packet, StaticRingBuffer};

const MAX_DATA_LEN: usize = 256;
const RING_CAPACITY: usize = 1024;

fuzz_target!(|data: &[u8]| {
    // The receive state machine should handle arbitrary byte streams
    // without panicking, regardless of how garbled the framing is.
    let mut pkt: Packet<MAX_DATA_LEN, StaticRingBuffer<RING_CAPACITY>> = Packet::new(
        FeatureConfig::all_dynamic(),
        StaticRingBuffer::new(),
        StaticRingBuffer::new(),
    );

    for chunk in data.chunks(RING_CAPACITY) {
        pkt.feed_rx(chunk);
        // One `read()` call drains everything just fed in; no loop needed.
        let _ = pkt.read();
    }

    // Also exercise every non-default feature profile against the same
    // input, since wire layout changes with configuration.
    let profiles = [
        FeatureConfig {
            addr: lwpkt::FeatureMode::Disabled,
            ..FeatureConfig::all_dynamic()
        },
        FeatureConfig {
            crc: lwpkt::FeatureMode::Disabled,
            ..FeatureConfig::all_dynamic()
        },
        FeatureConfig {
            crc32: lwpkt::FeatureMode::Always,
            ..FeatureConfig::all_dynamic()
        },
    ];
    for config in profiles {
        let mut pkt: Packet<MAX_DATA_LEN, StaticRingBuffer<RING_CAPACITY>> =
            Packet::new(config, StaticRingBuffer::new(), StaticRingBuffer::new());
        pkt.feed_rx(data);
        let _ = pkt.read();
    }
});
