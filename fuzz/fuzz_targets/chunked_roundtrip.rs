#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use trickle_stream::{Feed, MinizEngine, StreamError, StreamSizes, ZlibStream};

// Fuzz target: compress -> stream roundtrip in both modes.
//
// Input:
//   payload  plaintext, compressed with miniz_oxide at `level`
//   chunk    compressed bytes per write / per feed
//   read     decoded bytes per pull request
//
// Both modes must reproduce the payload exactly.
#[derive(Arbitrary, Debug)]
struct Input {
    level: u8,
    chunk: u16,
    read: u16,
    payload: Vec<u8>,
}

fn collect(out: &mut Vec<u8>, window: &[u8]) -> Result<(), StreamError> {
    out.extend_from_slice(window);
    Ok(())
}

struct Source {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
}

fn feed_next(src: &mut Source, feed: &mut Feed<'_>) -> Result<(), StreamError> {
    let end = (src.pos + src.chunk.min(feed.max_chunk())).min(src.data.len());
    feed.write_compressed(&src.data[src.pos..end])?;
    src.pos = end;
    Ok(())
}

fuzz_target!(|input: Input| {
    if input.payload.is_empty() {
        return;
    }
    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&input.payload, input.level % 11);
    let sizes = StreamSizes::new(compressed.len(), input.payload.len());
    let chunk = usize::from(input.chunk).max(1);

    let mut push = Box::new(ZlibStream::new_push(MinizEngine::new(), sizes, collect, Vec::new()).unwrap());
    for piece in compressed.chunks(chunk) {
        push.write_compressed(piece).unwrap();
    }
    assert!(push.is_done());
    assert_eq!(push.user(), &input.payload);

    let source = Source {
        data: compressed,
        pos: 0,
        chunk,
    };
    let mut pull = Box::new(ZlibStream::new_pull(MinizEngine::new(), sizes, feed_next, source).unwrap());
    let read = usize::from(input.read).max(1);
    let mut out = Vec::with_capacity(input.payload.len());
    let mut buf = vec![0u8; read];
    while pull.remaining_decoded() > 0 {
        let n = read.min(pull.remaining_decoded());
        pull.read_uncompressed(&mut buf[..n]).unwrap();
        out.extend_from_slice(&buf[..n]);
    }
    assert_eq!(out, input.payload);
});
