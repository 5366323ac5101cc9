#![no_main]

use libfuzzer_sys::fuzz_target;
use lwpkt::varint;

fuzz_target!(|data: &[u8]| {
    // One-shot decode must never panic, regardless of how the continuation
    // bits are set, and must agree with a byte-at-a-time streaming decode
    // whenever it succeeds.
    let one_shot = varint::decode(data);

    let mut decoder = varint::Decoder::new();
    let mut streaming_done_at = None;
    for (i, &byte) in data.iter().take(5).enumerate() {
        if let varint::FeedResult::Done = decoder.feed(byte) {
            streaming_done_at = Some(i + 1);
            break;
        }
    }

    match one_shot {
        Some((value, consumed)) => {
            assert_eq!(streaming_done_at, Some(consumed));
            assert_eq!(decoder.value(), value);
        }
        None => assert!(streaming_done_at.is_none()),
    }

    // Every u32 derived from the first four bytes round-trips through
    // encode/decode.
    if data.len() >= 4 {
        let value = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        let mut buf = Vec::new();
        let written = varint::encode(value, &mut buf);
        assert_eq!(written, varint::encoded_len(value));
        let (decoded, consumed) = varint::decode(&buf).expect("self-encoded varint must decode");
        assert_eq!(decoded, value);
        assert_eq!(consumed, buf.len());
    }
});
