//! Shared fixtures for the trickle integration tests and benchmarks.
//!
//! - compressed inputs built with `miniz_oxide`'s zlib encoder
//! - deterministic payload generators (compressible text, noise)
//! - user contexts for both streaming contracts ([`ChunkSource`],
//!   [`Collector`]) and one-call helpers that drive a whole stream
//! - the crate's test engines, re-exported so every test imports from here

use trickle_stream::{Feed, MinizEngine, StreamError, StreamSizes, ZlibStream};

pub use trickle_stream::testing::{PassthroughEngine, ScriptedEngine};

// ── Payloads ──────────────────────────────────────────────────────────────────

/// Zlib-frame `data` at the default compression level.
pub fn zlib(data: &[u8]) -> Vec<u8> {
    miniz_oxide::deflate::compress_to_vec_zlib(data, 6)
}

/// Small xorshift generator so payloads are identical on every run.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }
}

const WORDS: &[&str] = &[
    "stream", "window", "chunk", "engine", "buffer", "inflate", "decoded", "bytes", "the", "a",
    "callback", "leftover", "request", "deliver", "zlib", "block",
];

/// Word salad of exactly `len` bytes. Compresses roughly 3:1.
pub fn text(len: usize) -> Vec<u8> {
    let mut rng = XorShift(0x9E37_79B9_7F4A_7C15);
    let mut out = Vec::with_capacity(len + 16);
    while out.len() < len {
        let word = WORDS[(rng.next() % WORDS.len() as u64) as usize];
        out.extend_from_slice(word.as_bytes());
        out.push(if rng.next() % 11 == 0 { b'\n' } else { b' ' });
    }
    out.truncate(len);
    out
}

/// Pseudo-random bytes; deflate falls back to stored blocks.
pub fn noise(len: usize) -> Vec<u8> {
    let mut rng = XorShift(0xDEAD_BEEF_CAFE_F00D);
    (0..len).map(|_| (rng.next() >> 24) as u8).collect()
}

// ── Pull side ─────────────────────────────────────────────────────────────────

/// Pull-mode user context: serves `data` in chunks of at most `chunk`.
pub struct ChunkSource {
    pub data: Vec<u8>,
    pub pos: usize,
    pub chunk: usize,
    pub requests: usize,
}

impl ChunkSource {
    pub fn new(data: Vec<u8>, chunk: usize) -> Self {
        Self {
            data,
            pos: 0,
            chunk,
            requests: 0,
        }
    }
}

/// [`InputRequest`](trickle_stream::InputRequest) that feeds the next chunk.
pub fn feed_next(src: &mut ChunkSource, feed: &mut Feed<'_>) -> Result<(), StreamError> {
    src.requests += 1;
    let end = (src.pos + src.chunk).min(src.data.len());
    feed.write_compressed(&src.data[src.pos..end])?;
    src.pos = end;
    Ok(())
}

/// Decode a whole zlib stream in pull mode with `read`-byte requests.
pub fn inflate_pull(
    compressed: &[u8],
    decoded_len: usize,
    chunk: usize,
    read: usize,
) -> Result<Vec<u8>, StreamError> {
    let sizes = StreamSizes::new(compressed.len(), decoded_len);
    let source = ChunkSource::new(compressed.to_vec(), chunk);
    let mut ctx: Box<ZlibStream<ChunkSource>> =
        Box::new(ZlibStream::new_pull(MinizEngine::new(), sizes, feed_next, source)?);

    let mut out = Vec::with_capacity(decoded_len);
    let mut buf = vec![0u8; read];
    while ctx.remaining_decoded() > 0 {
        let n = read.min(ctx.remaining_decoded());
        ctx.read_uncompressed(&mut buf[..n])?;
        out.extend_from_slice(&buf[..n]);
    }
    Ok(out)
}

// ── Push side ─────────────────────────────────────────────────────────────────

/// Push-mode user context: records every delivered window.
#[derive(Default)]
pub struct Collector {
    pub windows: Vec<Vec<u8>>,
    pub fail_with: Option<i32>,
}

impl Collector {
    pub fn bytes(&self) -> Vec<u8> {
        self.windows.concat()
    }
}

/// [`OutputDelivery`](trickle_stream::OutputDelivery) that records the window.
pub fn collect(sink: &mut Collector, window: &[u8]) -> Result<(), StreamError> {
    if let Some(code) = sink.fail_with {
        return Err(StreamError::callback(code));
    }
    sink.windows.push(window.to_vec());
    Ok(())
}

/// Decode a whole zlib stream in push mode, writing `chunk`-byte slices.
pub fn inflate_push(compressed: &[u8], decoded_len: usize, chunk: usize) -> Result<Collector, StreamError> {
    let sizes = StreamSizes::new(compressed.len(), decoded_len);
    let mut ctx: Box<ZlibStream<Collector>> = Box::new(ZlibStream::new_push(
        MinizEngine::new(),
        sizes,
        collect,
        Collector::default(),
    )?);
    for piece in compressed.chunks(chunk) {
        ctx.write_compressed(piece)?;
    }
    Ok(ctx.into_user())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_deterministic_and_exact_length() {
        assert_eq!(text(1000), text(1000));
        assert_eq!(text(1000).len(), 1000);
        assert!(zlib(&text(10_000)).len() < 5_000);
    }

    #[test]
    fn noise_does_not_compress() {
        let data = noise(4096);
        assert!(zlib(&data).len() >= data.len());
    }
}
