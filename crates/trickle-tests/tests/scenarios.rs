//! The two reference scenarios: a 5-byte payload pushed as two chunks and
//! pulled as five single-byte reads.
//!
//! Each runs twice: once over the passthrough engine, where compressed and
//! decoded bytes coincide and the 3 + 2 split is literal, and once over a
//! real zlib stream of the same payload.

use trickle_stream::{MinizEngine, StreamContext, StreamSizes, ZlibStream};
use trickle_tests::{ChunkSource, Collector, PassthroughEngine, collect, feed_next, zlib};

const PAYLOAD: &[u8] = b"hello";

// ── Push: 3 + 2 ───────────────────────────────────────────────────────────────

#[test]
fn push_three_plus_two_passthrough() {
    let mut ctx: StreamContext<Collector, PassthroughEngine, 8, 8> = StreamContext::new_push(
        PassthroughEngine,
        StreamSizes::new(5, 5),
        collect,
        Collector::default(),
    )
    .unwrap();

    ctx.write_compressed(&PAYLOAD[..3]).unwrap();
    assert!(ctx.user().windows.is_empty(), "nothing delivered before the stream completes");
    ctx.write_compressed(&PAYLOAD[3..]).unwrap();

    assert_eq!(ctx.user().windows, vec![PAYLOAD.to_vec()]);
    assert!(ctx.is_done());
    assert_eq!(ctx.remaining_compressed(), 0);
    assert_eq!(ctx.remaining_decoded(), 0);
}

#[test]
fn push_split_zlib_stream() {
    let compressed = zlib(PAYLOAD);
    let mut ctx: Box<ZlibStream<Collector>> = Box::new(
        ZlibStream::new_push(
            MinizEngine::new(),
            StreamSizes::new(compressed.len(), PAYLOAD.len()),
            collect,
            Collector::default(),
        )
        .unwrap(),
    );

    let (head, tail) = compressed.split_at(3);
    ctx.write_compressed(head).unwrap();
    ctx.write_compressed(tail).unwrap();

    assert_eq!(ctx.user().windows, vec![PAYLOAD.to_vec()]);
    assert!(ctx.is_done());
    assert_eq!(ctx.stats().windows_delivered, 1);
}

// ── Pull: five 1-byte reads ───────────────────────────────────────────────────

fn read_bytewise<E, const W: usize, const C: usize>(
    ctx: &mut StreamContext<ChunkSource, E, W, C>,
) -> Vec<u8>
where
    E: trickle_stream::InflateEngine,
{
    let mut got = Vec::new();
    for _ in 0..PAYLOAD.len() {
        let mut byte = [0u8; 1];
        ctx.read_uncompressed(&mut byte).unwrap();
        got.push(byte[0]);
    }
    got
}

#[test]
fn pull_five_single_bytes_passthrough() {
    let mut ctx: StreamContext<ChunkSource, PassthroughEngine, 8, 8> = StreamContext::new_pull(
        PassthroughEngine,
        StreamSizes::new(5, 5),
        feed_next,
        ChunkSource::new(PAYLOAD.to_vec(), 5),
    )
    .unwrap();

    assert_eq!(read_bytewise(&mut ctx), PAYLOAD);
    assert_eq!(ctx.user().requests, 1);
    assert!(ctx.is_done());
}

#[test]
fn pull_five_single_bytes_zlib() {
    let compressed = zlib(PAYLOAD);
    let whole = compressed.len();
    let mut ctx: Box<ZlibStream<ChunkSource>> = Box::new(
        ZlibStream::new_pull(
            MinizEngine::new(),
            StreamSizes::new(whole, PAYLOAD.len()),
            feed_next,
            ChunkSource::new(compressed, whole),
        )
        .unwrap(),
    );

    assert_eq!(read_bytewise(&mut *ctx), PAYLOAD);
    assert_eq!(ctx.user().requests, 1);
    assert_eq!(ctx.stats().input_requests, 1);
    assert!(ctx.is_done());
    assert_eq!(ctx.remaining_decoded(), 0);
}
