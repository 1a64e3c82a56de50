use tracing::{debug, trace};
use trickle_engine::{EngineStatus, InflateEngine};

use crate::config::StreamSizes;
use crate::error::{ProtocolError, StreamError};
use crate::reader::CompressedSink;
use crate::stats::StreamStats;

/// Where the driver reads compressed bytes from on one run.
#[derive(Clone, Copy)]
pub(crate) enum Source<'a> {
    /// A chunk supplied by the caller for this call only.
    Chunk(&'a [u8]),
    /// The tail retained in the leftover buffer by an earlier run.
    Leftovers,
}

/// What to do with caller-chunk bytes the engine has not consumed when
/// the driver suspends on a ready window.
///
/// Only caller chunks are subject to this policy. A run over the
/// leftover buffer leaves its own unconsumed tail in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LeftoverPolicy {
    /// Copy the remainder into the leftover buffer (pull mode).
    Retain,
    /// Treat any remainder as a protocol error (push mode).
    Reject,
}

/// Synchronous sink for a full (or final) decoded window.
pub(crate) type Delivery<'a> = &'a mut dyn FnMut(&[u8]) -> Result<(), StreamError>;

/// Buffers, cursors and accounting shared by the pull reader and the
/// push writer.
///
/// ```text
///   window   [0 ........ ready_offset ....... ready_offset+ready_len ... cursor_write ... WINDOW)
///                         └──── bytes the pull reader may serve ────┘
///
///   leftover [0 .. leftover_pos ......... leftover_pos+leftover_len ... CHUNK)
///                 └── compressed bytes not yet consumed ──┘
/// ```
///
/// Invariants:
///
/// - `ready_offset + ready_len <= cursor_write <= WINDOW`
/// - a non-empty ready range is drained before decoding resumes
/// - `remaining_compressed` only decreases and is 0 exactly when the
///   engine reports `Done`
/// - `remaining_decoded` (not yet produced) and `undelivered` (not yet
///   handed to the caller) only decrease, and `undelivered >= remaining_decoded`
pub(crate) struct Driver<E, const WINDOW: usize, const CHUNK: usize> {
    engine: E,
    window: [u8; WINDOW],
    leftover: [u8; CHUNK],
    leftover_pos: usize,
    leftover_len: usize,
    cursor_write: usize,
    ready_offset: usize,
    ready_len: usize,
    remaining_compressed: usize,
    remaining_decoded: usize,
    undelivered: usize,
    status: EngineStatus,
    stats: StreamStats,
}

impl<E: InflateEngine, const WINDOW: usize, const CHUNK: usize> Driver<E, WINDOW, CHUNK> {
    pub(crate) fn new(mut engine: E, sizes: StreamSizes) -> Self {
        engine.reset();
        Self {
            engine,
            window: [0; WINDOW],
            leftover: [0; CHUNK],
            leftover_pos: 0,
            leftover_len: 0,
            cursor_write: 0,
            ready_offset: 0,
            ready_len: 0,
            remaining_compressed: sizes.total_compressed,
            remaining_decoded: sizes.total_decoded,
            undelivered: sizes.total_decoded,
            status: EngineStatus::NeedsMoreInput,
            stats: StreamStats::default(),
        }
    }

    pub(crate) fn status(&self) -> EngineStatus {
        self.status
    }

    pub(crate) fn remaining_compressed(&self) -> usize {
        self.remaining_compressed
    }

    pub(crate) fn undelivered(&self) -> usize {
        self.undelivered
    }

    pub(crate) fn ready_len(&self) -> usize {
        self.ready_len
    }

    pub(crate) fn leftover_len(&self) -> usize {
        self.leftover_len
    }

    pub(crate) fn stats(&self) -> StreamStats {
        self.stats
    }

    pub(crate) fn note_input_request(&mut self) {
        self.stats.input_requests += 1;
    }

    /// Push-mode entry: decode one caller chunk, delivering every window
    /// that fills (and the final one) through `deliver`.
    pub(crate) fn push(&mut self, chunk: &[u8], deliver: Delivery<'_>) -> Result<(), StreamError> {
        self.admit(chunk)?;
        self.run(Source::Chunk(chunk), LeftoverPolicy::Reject, Some(deliver))
    }

    /// Pull-mode entry used by the input-request callback: decode one
    /// caller chunk, parking the first ready window and retaining
    /// whatever the engine has not consumed yet.
    pub(crate) fn feed(&mut self, chunk: &[u8]) -> Result<(), StreamError> {
        self.admit(chunk)?;
        self.run(Source::Chunk(chunk), LeftoverPolicy::Retain, None)
    }

    /// Pull-mode continuation over the retained leftover bytes.
    pub(crate) fn resume(&mut self) -> Result<(), StreamError> {
        self.run(Source::Leftovers, LeftoverPolicy::Retain, None)
    }

    /// Copy as much of the ready range as fits into `dest`.
    ///
    /// Once the range is fully drained the write cursor rewinds to the
    /// start of the window so decoding can reuse it.
    pub(crate) fn drain_ready(&mut self, dest: &mut [u8]) -> usize {
        let n = self.ready_len.min(dest.len());
        if n == 0 {
            return 0;
        }

        let start = self.ready_offset;
        dest[..n].copy_from_slice(&self.window[start..start + n]);
        self.ready_offset += n;
        self.ready_len -= n;
        self.undelivered -= n;
        self.stats.decoded_delivered += n;

        if self.ready_len == 0 {
            self.ready_offset = 0;
            self.cursor_write = 0;
        }
        n
    }

    /// Check that a caller chunk may enter the driver right now.
    fn admit(&self, chunk: &[u8]) -> Result<(), StreamError> {
        if chunk.is_empty() {
            return Err(StreamError::InvalidArgument {
                reason: "compressed chunk must be non-empty",
            });
        }
        if self.status == EngineStatus::Failed {
            return Err(ProtocolError::EngineFailed.into());
        }
        if chunk.len() > self.remaining_compressed {
            return Err(ProtocolError::ChunkExceedsStream {
                len: chunk.len(),
                remaining: self.remaining_compressed,
            }
            .into());
        }
        if self.ready_len > 0 || self.leftover_len > 0 {
            return Err(ProtocolError::Suspended {
                ready: self.ready_len,
                leftover: self.leftover_len,
            }
            .into());
        }
        Ok(())
    }

    /// Step the engine until a decision point is reached.
    ///
    /// Decision points, in the order they are checked after each step:
    ///
    ///   1. The step is inconsistent with the accounting → error.
    ///   2. The stream is done with nothing decoded since the last
    ///      window → return without handing over an empty window.
    ///   3. The stream is done, or the window is full:
    ///      - with `deliver`: hand the window over, rewind, keep going;
    ///      - without: park it as the ready range and return.
    ///   4. The engine needs more input → return.
    fn run(
        &mut self,
        source: Source<'_>,
        policy: LeftoverPolicy,
        mut deliver: Option<Delivery<'_>>,
    ) -> Result<(), StreamError> {
        let chunk = match source {
            Source::Chunk(bytes) => Some(bytes),
            Source::Leftovers => None,
        };
        let (mut pos, end) = match chunk {
            Some(bytes) => (0, bytes.len()),
            None => (self.leftover_pos, self.leftover_pos + self.leftover_len),
        };

        while self.status.in_progress() {
            let input = match chunk {
                Some(bytes) => &bytes[pos..end],
                None => &self.leftover[pos..end],
            };
            let available_input = input.len();
            let available_output = WINDOW - self.cursor_write;
            let has_more_input = self.remaining_compressed > available_input;

            let step = self
                .engine
                .step(input, has_more_input, &mut self.window, self.cursor_write);
            self.stats.engine_steps += 1;
            trace!(
                status = %step.status,
                consumed = step.consumed,
                produced = step.produced,
                has_more_input,
                "engine step"
            );

            if step.consumed > available_input || step.produced > available_output {
                return Err(ProtocolError::EngineOverrun {
                    consumed: step.consumed,
                    available_input,
                    produced: step.produced,
                    available_output,
                }
                .into());
            }
            if step.produced > self.remaining_decoded {
                return Err(ProtocolError::DecodedOverflow {
                    produced: step.produced,
                    remaining: self.remaining_decoded,
                }
                .into());
            }

            self.cursor_write += step.produced;
            self.remaining_compressed -= step.consumed;
            self.remaining_decoded -= step.produced;
            self.stats.compressed_consumed += step.consumed;
            self.stats.decoded_produced += step.produced;
            pos += step.consumed;
            self.status = step.status;

            if let Err(err) = check_accounting(self.status, self.remaining_compressed) {
                debug!(%err, "engine step violates stream accounting");
                return Err(err.into());
            }
            if self.status == EngineStatus::Done && self.remaining_decoded > 0 {
                return Err(ProtocolError::DecodedSizeMismatch {
                    missing: self.remaining_decoded,
                }
                .into());
            }

            // A trailer-only step after the last window: nothing to hand over.
            if self.status == EngineStatus::Done && self.cursor_write == 0 {
                debug!("stream completed with no decoded bytes pending");
                break;
            }

            let window_full = self.cursor_write == WINDOW;
            if self.status == EngineStatus::Done || window_full {
                let ready = self.cursor_write;

                if let Some(deliver) = deliver.as_deref_mut() {
                    debug!(len = ready, status = %self.status, "delivering decoded window");
                    deliver(&self.window[..ready])?;
                    self.undelivered -= ready;
                    self.stats.decoded_delivered += ready;
                    self.stats.windows_delivered += 1;
                    self.cursor_write = 0;
                    continue;
                }

                debug!(len = ready, status = %self.status, "decoded window ready");
                self.ready_offset = 0;
                self.ready_len = ready;
                self.stats.windows_ready += 1;

                let unconsumed = end - pos;
                match chunk {
                    Some(bytes) if unconsumed > 0 => match policy {
                        LeftoverPolicy::Retain => self.stash(&bytes[pos..end])?,
                        LeftoverPolicy::Reject => {
                            return Err(ProtocolError::UnconsumedInput {
                                remaining: unconsumed,
                            }
                            .into());
                        }
                    },
                    Some(_) => {}
                    None => {
                        self.leftover_pos = pos;
                        self.leftover_len = unconsumed;
                    }
                }
                return Ok(());
            }

            if step.consumed == 0 && step.produced == 0 && self.status != EngineStatus::NeedsMoreInput
            {
                return Err(ProtocolError::Stalled {
                    status: self.status,
                }
                .into());
            }

            if self.status == EngineStatus::NeedsMoreInput {
                break;
            }
        }

        let unconsumed = end - pos;
        match chunk {
            Some(_) if unconsumed > 0 => Err(ProtocolError::UnconsumedInput {
                remaining: unconsumed,
            }
            .into()),
            Some(_) => Ok(()),
            None => {
                self.leftover_pos = pos;
                self.leftover_len = unconsumed;
                Ok(())
            }
        }
    }

    /// Copy an unconsumed chunk tail into the leftover buffer.
    fn stash(&mut self, rest: &[u8]) -> Result<(), ProtocolError> {
        if rest.len() > CHUNK {
            return Err(ProtocolError::LeftoverOverflow {
                len: rest.len(),
                capacity: CHUNK,
            });
        }
        self.leftover[..rest.len()].copy_from_slice(rest);
        self.leftover_pos = 0;
        self.leftover_len = rest.len();
        self.stats.leftover_stashes += 1;
        debug!(len = rest.len(), "retained leftover compressed bytes");
        Ok(())
    }
}

impl<E: InflateEngine, const WINDOW: usize, const CHUNK: usize> CompressedSink
    for Driver<E, WINDOW, CHUNK>
{
    fn accept(&mut self, chunk: &[u8]) -> Result<(), StreamError> {
        self.feed(chunk)
    }

    fn remaining_compressed(&self) -> usize {
        self.remaining_compressed
    }

    fn max_chunk(&self) -> usize {
        CHUNK
    }
}

/// Check an engine status against the compressed bytes still outstanding.
///
/// ```text
/// ┌─────────────────────────────────┬───────────────┬───────────────┐
/// │ status                          │ remaining > 0 │ remaining = 0 │
/// ├─────────────────────────────────┼───────────────┼───────────────┤
/// │ Failed                          │ error         │ error         │
/// │ Done                            │ error         │ ok            │
/// │ NeedsMoreInput / NeedsMoreOutput│ ok            │ error         │
/// │ HasMoreOutput                   │ ok            │ error         │
/// └─────────────────────────────────┴───────────────┴───────────────┘
/// ```
pub(crate) fn check_accounting(
    status: EngineStatus,
    remaining_compressed: usize,
) -> Result<(), ProtocolError> {
    match status {
        EngineStatus::Failed => Err(ProtocolError::EngineFailed),
        EngineStatus::Done if remaining_compressed > 0 => Err(ProtocolError::DoneWithInputRemaining {
            remaining: remaining_compressed,
        }),
        EngineStatus::Done => Ok(()),
        EngineStatus::NeedsMoreInput | EngineStatus::NeedsMoreOutput | EngineStatus::HasMoreOutput
            if remaining_compressed == 0 =>
        {
            Err(ProtocolError::InputExhausted { status })
        }
        EngineStatus::NeedsMoreInput | EngineStatus::NeedsMoreOutput | EngineStatus::HasMoreOutput => {
            Ok(())
        }
    }
}
