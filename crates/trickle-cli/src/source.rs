/// File-backed user contexts for the two streaming contracts.
///
/// Stream callbacks can only report an opaque code, so I/O failures are
/// parked on the context and recovered by [`explain`] once the stream call
/// returns.
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use trickle_stream::{Feed, StreamError};

/// Callback code used for every I/O failure parked on a context.
const IO_FAILURE: i32 = 1;

/// Open `path` and return it with its length, which is the total
/// compressed size of the stream.
pub fn open_compressed(path: &Path) -> Result<(File, usize)> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let len = file
        .metadata()
        .with_context(|| format!("cannot stat {}", path.display()))?
        .len();
    let len = usize::try_from(len).with_context(|| format!("{} is too large", path.display()))?;
    Ok((file, len))
}

/// Turn a stream error into a CLI error, preferring a parked I/O error.
pub fn explain(err: StreamError, parked: Option<io::Error>) -> anyhow::Error {
    match (err, parked) {
        (StreamError::Callback { .. }, Some(io)) => {
            anyhow::Error::new(io).context("I/O failure inside stream callback")
        }
        (err, _) => anyhow::Error::new(err),
    }
}

// ── Pull side ─────────────────────────────────────────────────────────────────

/// Reads compressed chunks from a file on demand.
pub struct FileSource {
    file: File,
    buf: Vec<u8>,
    pub error: Option<io::Error>,
}

impl FileSource {
    pub fn new(file: File, chunk: usize) -> Self {
        Self {
            file,
            buf: vec![0; chunk],
            error: None,
        }
    }
}

/// Input request: read the next chunk, capped by what the stream can retain.
pub fn feed_from_file(src: &mut FileSource, feed: &mut Feed<'_>) -> Result<(), StreamError> {
    let want = src
        .buf
        .len()
        .min(feed.max_chunk())
        .min(feed.remaining_compressed());

    let n = match src.file.read(&mut src.buf[..want]) {
        Ok(0) => {
            src.error = Some(io::ErrorKind::UnexpectedEof.into());
            return Err(StreamError::callback(IO_FAILURE));
        }
        Ok(n) => n,
        Err(e) => {
            src.error = Some(e);
            return Err(StreamError::callback(IO_FAILURE));
        }
    };
    feed.write_compressed(&src.buf[..n])
}

// ── Push side ─────────────────────────────────────────────────────────────────

/// Writes each delivered window to an output, counting bytes.
pub struct WindowSink {
    out: Box<dyn Write>,
    pub written: usize,
    pub error: Option<io::Error>,
}

impl WindowSink {
    pub fn new(out: Box<dyn Write>) -> Self {
        Self {
            out,
            written: 0,
            error: None,
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Output delivery: write the window through.
pub fn deliver_to_writer(sink: &mut WindowSink, window: &[u8]) -> Result<(), StreamError> {
    if let Err(e) = sink.out.write_all(window) {
        sink.error = Some(e);
        return Err(StreamError::callback(IO_FAILURE));
    }
    sink.written += window.len();
    Ok(())
}
