#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use trickle_stream::{Feed, MinizEngine, StreamError, StreamSizes, ZlibStream};

// Fuzz target: pull mode over arbitrary bytes.
//
// Catches bugs in:
// - Leftover retention and resumption on corrupt data
// - Ready-window draining with odd read sizes
// - Re-entrant feeding from the input request
#[derive(Arbitrary, Debug)]
struct Input {
    decoded_size: u16,
    chunk: u16,
    read: u8,
    stream: Vec<u8>,
}

struct Source {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
}

fn feed_next(src: &mut Source, feed: &mut Feed<'_>) -> Result<(), StreamError> {
    let end = (src.pos + src.chunk).min(src.data.len());
    feed.write_compressed(&src.data[src.pos..end])?;
    src.pos = end;
    Ok(())
}

fuzz_target!(|input: Input| {
    let sizes = StreamSizes::new(input.stream.len(), usize::from(input.decoded_size));
    let source = Source {
        data: input.stream,
        pos: 0,
        chunk: usize::from(input.chunk).max(1),
    };
    let Ok(ctx) = ZlibStream::new_pull(MinizEngine::new(), sizes, feed_next, source) else {
        return;
    };
    let mut ctx = Box::new(ctx);

    let read = usize::from(input.read).max(1);
    let mut buf = vec![0u8; read];
    while ctx.remaining_decoded() > 0 {
        let n = read.min(ctx.remaining_decoded());
        if ctx.read_uncompressed(&mut buf[..n]).is_err() {
            return;
        }
    }
    assert!(ctx.is_done());
});
