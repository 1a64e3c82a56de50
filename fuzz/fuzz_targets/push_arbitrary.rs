#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use trickle_stream::{MinizEngine, StreamError, StreamSizes, ZlibStream};

// Fuzz target: push mode over arbitrary bytes.
//
// Catches bugs in:
// - Cursor arithmetic when the engine fails mid-window
// - Accounting checks against corrupt or truncated streams
// - Declared sizes that disagree with the data
#[derive(Arbitrary, Debug)]
struct Input {
    decoded_size: u16,
    chunk: u8,
    stream: Vec<u8>,
}

fn discard(_: &mut (), _: &[u8]) -> Result<(), StreamError> {
    Ok(())
}

fuzz_target!(|input: Input| {
    let sizes = StreamSizes::new(input.stream.len(), usize::from(input.decoded_size));
    let Ok(ctx) = ZlibStream::new_push(MinizEngine::new(), sizes, discard, ()) else {
        return;
    };
    let mut ctx = Box::new(ctx);

    let chunk = usize::from(input.chunk).max(1);
    for piece in input.stream.chunks(chunk) {
        if ctx.write_compressed(piece).is_err() {
            return;
        }
    }
    if ctx.is_done() {
        assert_eq!(ctx.remaining_compressed(), 0);
        assert_eq!(ctx.remaining_decoded(), 0);
    }
});
