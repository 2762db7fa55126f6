//! # Codec Property Tests
//!
//! Exercises the public codec surface end to end:
//!
//! 1. Every written value reads back unchanged
//! 2. Malformed input never panics
//! 3. Frames survive arbitrary stream fragmentation
//! 4. A frozen registry serves concurrent dispatch
//!
//! Run with: cargo test -p ttd_protocol --test codec_properties

use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ttd_protocol::{
    encode_frame, handle_packet, CodecConfig, CodecError, CodecResult, Dispatch, FrameDecoder,
    HandlerRegistry, Message, Packet, PacketReader, PacketWriter,
};

#[derive(Clone, Debug, PartialEq)]
struct Chat {
    sender: u32,
    team: bool,
    text: String,
}

impl Chat {
    const TEXT_LENGTH: usize = 64;
}

impl Message for Chat {
    const TAG: u8 = 0x04;
    const CATEGORY: &'static str = "chat";

    fn decode(reader: &mut PacketReader<'_>) -> CodecResult<Self> {
        Ok(Self {
            sender: reader.read_u32()?,
            team: reader.read_bool()?,
            text: reader.read_string(Self::TEXT_LENGTH)?.0,
        })
    }

    fn encode(&self, writer: &mut PacketWriter<'_>) {
        writer.write_u32(self.sender);
        writer.write_bool(self.team);
        writer.write_string(&self.text);
    }
}

fn chat(sender: u32) -> Chat {
    Chat {
        sender,
        team: sender % 2 == 0,
        text: format!("hello from {sender}"),
    }
}

// ============================================================================
// ROUND TRIPS
// ============================================================================

#[test]
fn test_random_integers_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x1D7);

    for _ in 0..1_000 {
        let (a, b, c, d): (u8, u16, u32, u64) = (rng.gen(), rng.gen(), rng.gen(), rng.gen());
        let flag: bool = rng.gen();

        let mut packet = Packet::new(0);
        let mut writer = packet.writer();
        writer.write_u8(a);
        writer.write_u16(b);
        writer.write_u32(c);
        writer.write_u64(d);
        writer.write_bool(flag);
        assert_eq!(packet.len(), 1 + 1 + 2 + 4 + 8 + 1);

        let mut reader = packet.reader();
        assert_eq!(reader.read_u8().unwrap(), a);
        assert_eq!(reader.read_u16().unwrap(), b);
        assert_eq!(reader.read_u32().unwrap(), c);
        assert_eq!(reader.read_u64().unwrap(), d);
        assert_eq!(reader.read_bool().unwrap(), flag);
        assert!(reader.is_exhausted());
    }
}

#[test]
fn test_random_strings_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x5717);

    for round in 0..2_000 {
        let len = rng.gen_range(0..48);
        let text: String = (0..len).map(|_| char::from(rng.gen_range(1u8..0x80))).collect();
        // Every fourth string fills its field exactly.
        let max = if round % 4 == 0 {
            len + 1
        } else {
            rng.gen_range(len + 1..=len + 16)
        };

        let mut packet = Packet::new(0);
        let mut writer = packet.writer();
        assert_eq!(writer.write_string(&text), len + 1);
        writer.write_u8(0xA5);

        let mut reader = packet.reader();
        assert_eq!(reader.read_string(max).unwrap(), (text, len + 1), "max {max}");
        assert_eq!(reader.read_u8().unwrap(), 0xA5);
    }
}

#[test]
fn test_strings_fill_every_width() {
    for max in 1..=64 {
        let text = "w".repeat(max - 1);
        let mut packet = Packet::new(0);
        packet.writer().write_string(&text);
        assert_eq!(packet.reader().read_string(max).unwrap(), (text, max));
    }
}

// ============================================================================
// MALFORMED INPUT
// ============================================================================

#[test]
fn test_random_payloads_never_panic() {
    let mut rng = StdRng::seed_from_u64(0x7717);

    for _ in 0..2_000 {
        let len = rng.gen_range(0..32);
        let payload: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        let mut reader = PacketReader::new(&payload);

        loop {
            let step = match rng.gen_range(0..7) {
                0 => reader.read_u8().map(|_| ()),
                1 => reader.read_u16().map(|_| ()),
                2 => reader.read_u32().map(|_| ()),
                3 => reader.read_u64().map(|_| ()),
                4 => reader.read_bool().map(|_| ()),
                5 => reader.read_string(rng.gen_range(0..16)).map(|_| ()),
                _ => reader.read_bytes(rng.gen_range(0..8)).map(|_| ()),
            };
            match step {
                Ok(()) if reader.is_exhausted() => break,
                Ok(()) => {}
                Err(e) => {
                    assert!(e.is_underrun(), "unexpected error: {e}");
                    break;
                }
            }
        }
    }
}

#[test]
fn test_random_streams_never_panic() {
    let mut rng = StdRng::seed_from_u64(0xBEEF);
    let config = CodecConfig {
        max_frame_size: 64,
        ..CodecConfig::default()
    };

    for _ in 0..500 {
        let mut decoder = FrameDecoder::new(&config).unwrap();
        let len = rng.gen_range(0..128);
        let stream: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        decoder.extend(&stream);

        // Each good frame removes at least FRAME_HEADER_SIZE bytes.
        for _ in 0..=stream.len() {
            match decoder.next_packet() {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(e) => {
                    assert!(matches!(
                        e,
                        CodecError::FrameTooShort { .. } | CodecError::FrameTooLarge { .. }
                    ));
                    break;
                }
            }
        }
    }
}

#[test]
fn test_truncated_message_reports_underrun() {
    let packet = chat(7).to_packet();
    let payload = packet.payload();

    // Cut inside the fixed-width prefix: always an underrun.
    for cut in 0..5 {
        let truncated = Packet::with_payload(Chat::TAG, payload[..cut].to_vec());
        let err = Chat::decode(&mut truncated.reader()).unwrap_err();
        assert!(err.is_underrun(), "cut at {cut}: {err}");
    }
}

// ============================================================================
// FRAGMENTATION
// ============================================================================

#[test]
fn test_fragmented_stream_reassembles() {
    let config = CodecConfig::default();
    let messages: Vec<Chat> = (0..50).map(chat).collect();

    let mut stream = Vec::new();
    for message in &messages {
        stream.extend(encode_frame(&message.to_packet(), &config).unwrap());
    }

    let mut rng = StdRng::seed_from_u64(42);
    let mut decoder = FrameDecoder::new(&config).unwrap();
    let mut decoded = Vec::new();
    let mut offset = 0;

    while offset < stream.len() {
        let chunk = rng.gen_range(1..=7).min(stream.len() - offset);
        decoder.extend(&stream[offset..offset + chunk]);
        offset += chunk;

        while let Some(packet) = decoder.next_packet().unwrap() {
            assert_eq!(packet.tag(), Chat::TAG);
            decoded.push(Chat::decode(&mut packet.reader()).unwrap());
        }
    }

    assert_eq!(decoded, messages);
    assert_eq!(decoder.buffered(), 0);
}

// ============================================================================
// DISPATCH
// ============================================================================

#[test]
fn test_concurrent_dispatch() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);

    let registry = Arc::new(
        HandlerRegistry::builder()
            .register::<Chat, _>(move |message: Chat| sink.lock().push(message.sender))
            .unwrap()
            .build(),
    );

    let handles: Vec<_> = (0..4u32)
        .map(|t| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for i in 0..100 {
                    let packet = chat(t * 1000 + i).to_packet();
                    let outcome = handle_packet(&registry, &packet).unwrap();
                    assert!(outcome.is_handled());
                    // Unknown tags interleaved with real traffic.
                    let unknown = handle_packet(&registry, &Packet::new(0xEE)).unwrap();
                    assert_eq!(unknown, Dispatch::Dropped { tag: 0xEE });
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let mut senders = received.lock().clone();
    senders.sort_unstable();
    assert_eq!(senders.len(), 400);
    assert_eq!(senders[0], 0);
    assert_eq!(senders[399], 3099);
}

#[test]
fn test_packet_moves_across_threads() {
    let packet = chat(9).to_packet();
    let decoded = thread::spawn(move || Chat::decode(&mut packet.reader()))
        .join()
        .unwrap()
        .unwrap();
    assert_eq!(decoded, chat(9));
}
