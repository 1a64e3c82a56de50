//! Round-trip tests: payloads compressed with `miniz_oxide` and decoded
//! through both streaming contracts.
//!
//! The decoded bytes must not depend on how the compressed stream is cut
//! into chunks or how the decoded stream is requested. Payload sizes are
//! chosen to land below, exactly on, and well past the 32 KiB window.

use proptest::prelude::*;
use trickle_stream::{DEFAULT_WINDOW_SIZE, MinizEngine, StreamError, StreamSizes, ZlibStream};
use trickle_tests::{ChunkSource, feed_next, inflate_pull, inflate_push, noise, text, zlib};

const SIZES: &[usize] = &[1, 5, 1000, DEFAULT_WINDOW_SIZE, DEFAULT_WINDOW_SIZE + 1, 100_000];

// ── Push mode ─────────────────────────────────────────────────────────────────

#[test]
fn push_roundtrips_text() {
    for &len in SIZES {
        let data = text(len);
        let compressed = zlib(&data);
        for chunk in [1, 7, 512, compressed.len()] {
            let out = inflate_push(&compressed, len, chunk).unwrap();
            assert_eq!(out.bytes(), data, "len={len} chunk={chunk}");
        }
    }
}

#[test]
fn push_delivers_full_windows_then_the_tail() {
    let data = text(100_000);
    let out = inflate_push(&zlib(&data), data.len(), 4096).unwrap();

    let lens: Vec<usize> = out.windows.iter().map(Vec::len).collect();
    assert_eq!(lens, vec![32_768, 32_768, 32_768, 1_696]);
}

#[test]
fn push_window_sized_payload_is_one_delivery() {
    let data = text(DEFAULT_WINDOW_SIZE);
    let out = inflate_push(&zlib(&data), data.len(), 1000).unwrap();
    assert_eq!(out.windows.len(), 1);
    assert_eq!(out.bytes(), data);
}

#[test]
fn push_window_sized_payload_in_byte_chunks_is_one_delivery() {
    for len in [DEFAULT_WINDOW_SIZE, 2 * DEFAULT_WINDOW_SIZE] {
        let data = text(len);
        let out = inflate_push(&zlib(&data), len, 1).unwrap();
        let lens: Vec<usize> = out.windows.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![DEFAULT_WINDOW_SIZE; len / DEFAULT_WINDOW_SIZE], "len={len}");
        assert_eq!(out.bytes(), data);
    }
}

#[test]
fn push_roundtrips_incompressible_data() {
    let data = noise(70_000);
    let compressed = zlib(&data);
    let out = inflate_push(&compressed, data.len(), 3000).unwrap();
    assert_eq!(out.bytes(), data);
}

// ── Pull mode ─────────────────────────────────────────────────────────────────

#[test]
fn pull_roundtrips_text() {
    for &len in SIZES {
        let data = text(len);
        let compressed = zlib(&data);
        for (chunk, read) in [(1, 1), (64, 100), (4096, 4096), (4096, 50_000)] {
            let out = inflate_pull(&compressed, len, chunk, read).unwrap();
            assert_eq!(out, data, "len={len} chunk={chunk} read={read}");
        }
    }
}

/// Pull a whole stream; the context comes back whether or not it failed.
fn pull_all(
    compressed: Vec<u8>,
    decoded_len: usize,
    chunk: usize,
    read: usize,
) -> (Box<ZlibStream<ChunkSource>>, Result<Vec<u8>, StreamError>) {
    let sizes = StreamSizes::new(compressed.len(), decoded_len);
    let mut ctx: Box<ZlibStream<ChunkSource>> = Box::new(
        ZlibStream::new_pull(MinizEngine::new(), sizes, feed_next, ChunkSource::new(compressed, chunk))
            .unwrap(),
    );
    let mut out = Vec::with_capacity(decoded_len);
    let mut buf = vec![0u8; read];
    while ctx.remaining_decoded() > 0 {
        let n = read.min(ctx.remaining_decoded());
        if let Err(err) = ctx.read_uncompressed(&mut buf[..n]) {
            return (ctx, Err(err));
        }
        out.extend_from_slice(&buf[..n]);
    }
    (ctx, Ok(out))
}

#[test]
fn pull_of_window_multiple_reaches_done() {
    for len in [DEFAULT_WINDOW_SIZE, 2 * DEFAULT_WINDOW_SIZE] {
        for (chunk, read) in [(1, 1000), (1, len), (64, 1)] {
            let data = text(len);
            let (ctx, out) = pull_all(zlib(&data), len, chunk, read);
            assert_eq!(out.unwrap(), data, "len={len} chunk={chunk} read={read}");
            assert!(ctx.is_done(), "len={len} chunk={chunk} read={read}");
            assert_eq!(ctx.remaining_compressed(), 0);
        }
    }
}

#[test]
fn pull_of_window_multiple_checks_the_trailer() {
    for len in [DEFAULT_WINDOW_SIZE, 2 * DEFAULT_WINDOW_SIZE] {
        let mut compressed = zlib(&text(len));
        let last = compressed.len() - 1;
        compressed[last] ^= 0xFF;

        let (ctx, out) = pull_all(compressed, len, 1, 1000);
        assert!(out.is_err(), "len={len}: corrupt checksum accepted");
        assert!(!ctx.is_done());
    }
}

#[test]
fn pull_roundtrips_incompressible_data() {
    let data = noise(70_000);
    let compressed = zlib(&data);
    let out = inflate_pull(&compressed, data.len(), 4096, 777).unwrap();
    assert_eq!(out, data);
}

#[test]
fn pull_single_read_of_everything() {
    let data = text(100_000);
    let out = inflate_pull(&zlib(&data), data.len(), 2048, data.len()).unwrap();
    assert_eq!(out, data);
}

// ── Chunking independence ─────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn push_output_is_independent_of_chunking(len in 1usize..80_000, chunk in 1usize..6_000) {
        let data = text(len);
        let out = inflate_push(&zlib(&data), len, chunk).unwrap();
        prop_assert_eq!(out.bytes(), data);
    }

    #[test]
    fn pull_output_is_independent_of_chunking(
        len in 1usize..80_000,
        chunk in 1usize..=4096,
        read in 1usize..10_000,
    ) {
        let data = text(len);
        let out = inflate_pull(&zlib(&data), len, chunk, read).unwrap();
        prop_assert_eq!(out, data);
    }
}
