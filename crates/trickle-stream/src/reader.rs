use tracing::debug;
use trickle_engine::{EngineStatus, InflateEngine};

use crate::context::StreamContext;
use crate::error::{ProtocolError, StreamError};

/// Driver-side half of a [`Feed`]. Implemented by the driver; kept
/// private so a feed can only be obtained inside an input request.
pub(crate) trait CompressedSink {
    fn accept(&mut self, chunk: &[u8]) -> Result<(), StreamError>;
    fn remaining_compressed(&self) -> usize;
    fn max_chunk(&self) -> usize;
}

/// Capability to push compressed bytes back into a pull-mode stream.
///
/// A `Feed` is handed to the [`InputRequest`](crate::InputRequest)
/// callback and lives only for that call. It is the one sanctioned way
/// to re-enter the decompression driver while
/// [`read_uncompressed`](StreamContext::read_uncompressed) is waiting on
/// the callback.
///
/// ```text
///   read_uncompressed ──► input_request(&mut user, &mut feed)
///                               │
///                               └─► feed.write_compressed(chunk) ──► driver
/// ```
pub struct Feed<'a> {
    sink: &'a mut dyn CompressedSink,
}

impl<'a> Feed<'a> {
    pub(crate) fn new(sink: &'a mut dyn CompressedSink) -> Self {
        Self { sink }
    }

    /// Decode `chunk` until a window of output is ready or the chunk is
    /// used up. Bytes the engine has not consumed when the window fills
    /// are retained and decoded on later reads.
    ///
    /// Feed one chunk per request: a second chunk is rejected while
    /// decoded output or retained bytes from the first are pending.
    ///
    /// # Errors
    ///
    /// - [`StreamError::InvalidArgument`] if `chunk` is empty.
    /// - [`StreamError::Protocol`] if the chunk overruns the declared
    ///   compressed size, arrives while earlier output is pending, leaves
    ///   a remainder larger than [`max_chunk`](Self::max_chunk), or the
    ///   engine's results break the stream accounting.
    pub fn write_compressed(&mut self, chunk: &[u8]) -> Result<(), StreamError> {
        self.sink.accept(chunk)
    }

    /// Compressed bytes the stream still expects.
    #[must_use]
    pub fn remaining_compressed(&self) -> usize {
        self.sink.remaining_compressed()
    }

    /// Largest chunk guaranteed to fit the leftover buffer.
    #[must_use]
    pub fn max_chunk(&self) -> usize {
        self.sink.max_chunk()
    }
}

impl<C, E: InflateEngine, const WINDOW: usize, const CHUNK: usize> StreamContext<C, E, WINDOW, CHUNK> {
    /// Fill `dest` with the next `dest.len()` decoded bytes.
    ///
    /// Blocks until the request is satisfied, asking the input-request
    /// callback for compressed bytes whenever neither decoded bytes nor
    /// retained compressed bytes are left. Any request size works,
    /// including one byte at a time.
    ///
    /// Serving loop:
    ///
    ///   1. Copy from the ready window; rewind the window once drained.
    ///   2. Done when `dest` is full, unless it took the last decoded
    ///      byte of a stream the engine has not finished: the trailer
    ///      is then fed and checked before returning.
    ///   3. Decode retained leftovers, if any; loop if a window is ready.
    ///   4. Otherwise invoke the input-request callback.
    ///
    /// # Errors
    ///
    /// - [`StreamError::ModeMismatch`] on a push-mode context (nothing is
    ///   touched).
    /// - [`StreamError::InvalidArgument`] if `dest` is empty.
    /// - [`StreamError::Protocol`] if the request exceeds the decoded
    ///   bytes left in the stream (checked before any work), if the
    ///   callback returns without feeding anything, or if decoding breaks
    ///   the stream accounting.
    /// - Whatever error the input-request callback returns, unchanged.
    pub fn read_uncompressed(&mut self, dest: &mut [u8]) -> Result<(), StreamError> {
        let request = self.input_request()?;
        if dest.is_empty() {
            return Err(StreamError::InvalidArgument {
                reason: "destination buffer must be non-empty",
            });
        }
        let available = self.driver.undelivered();
        if dest.len() > available {
            return Err(ProtocolError::ReadPastEnd {
                requested: dest.len(),
                available,
            }
            .into());
        }

        let mut filled = 0;
        loop {
            filled += self.driver.drain_ready(&mut dest[filled..]);
            let done = self.driver.status() == EngineStatus::Done;
            if filled == dest.len() && (done || self.driver.undelivered() > 0) {
                return Ok(());
            }

            let stale = self.driver.ready_len();
            if stale > 0 {
                return Err(ProtocolError::StaleReadyWindow { len: stale }.into());
            }

            if self.driver.leftover_len() > 0 {
                self.driver.resume()?;
                if self.driver.ready_len() > 0 {
                    continue;
                }
            }

            if self.driver.status() == EngineStatus::Done {
                if filled == dest.len() {
                    return Ok(());
                }
                return Err(ProtocolError::ReadPastEnd {
                    requested: dest.len() - filled,
                    available: 0,
                }
                .into());
            }

            let before = self.driver.remaining_compressed();
            self.driver.note_input_request();
            debug!(remaining_compressed = before, "requesting compressed input");
            request(&mut self.user, &mut Feed::new(&mut self.driver))?;

            if self.driver.remaining_compressed() == before {
                return Err(ProtocolError::StarvedRequest.into());
            }
        }
    }
}
