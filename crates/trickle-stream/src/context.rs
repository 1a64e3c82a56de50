use trickle_engine::{EngineStatus, InflateEngine};

use crate::config::StreamSizes;
use crate::driver::Driver;
use crate::error::StreamError;
use crate::reader::Feed;
use crate::stats::StreamStats;

/// Input-request callback for pull mode.
///
/// Invoked when the context has no decoded bytes left to serve and no
/// retained compressed bytes to decode. The callback obtains more
/// compressed bytes from its own source and hands them over through
/// [`Feed::write_compressed`] before returning.
pub type InputRequest<C> = fn(&mut C, &mut Feed<'_>) -> Result<(), StreamError>;

/// Output-delivery callback for push mode.
///
/// Receives each full decoded window, and the final partial one. The
/// slice is only valid for the duration of the call: copy it out, write
/// it to storage, and so on, before returning.
pub type OutputDelivery<C> = fn(&mut C, &[u8]) -> Result<(), StreamError>;

/// Which streaming contract a context was built for.
///
/// ```text
/// ┌──────────────────┬──────────────────────┬──────────────────────────┐
/// │ Mode             │ Caller drives with   │ Context calls back with  │
/// ├──────────────────┼──────────────────────┼──────────────────────────┤
/// │ PullUncompressed │ read_uncompressed()  │ InputRequest (+ Feed)    │
/// │ PushCompressed   │ write_compressed()   │ OutputDelivery           │
/// └──────────────────┴──────────────────────┴──────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    PullUncompressed,
    PushCompressed,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::PullUncompressed => "pull-uncompressed",
            Self::PushCompressed => "push-compressed",
        })
    }
}

/// The callback set bound to a context; one variant per [`Mode`].
enum Callbacks<C> {
    Pull(InputRequest<C>),
    Push(OutputDelivery<C>),
}

impl<C> Callbacks<C> {
    fn mode(&self) -> Mode {
        match self {
            Self::Pull(_) => Mode::PullUncompressed,
            Self::Push(_) => Mode::PushCompressed,
        }
    }
}

/// All state for decoding one compressed stream with fixed buffers.
///
/// Type parameters:
///
/// - `C`: caller state handed to every callback by `&mut` (file
///   handles, output buffers, counters, ...). Owned by the context and
///   recoverable with [`into_user`](Self::into_user).
/// - `E`: the [`InflateEngine`] doing the actual decoding.
/// - `WINDOW`: decoded-window capacity; must satisfy
///   [`InflateEngine::accepts_window`].
/// - `CHUNK`: leftover-buffer capacity; bounds the chunk size an
///   input-request callback can feed in pull mode.
///
/// A context is built with exactly one of [`new_pull`](Self::new_pull)
/// or [`new_push`](Self::new_push), serves one stream, and must be
/// discarded after completion or after any error. There is no reset.
///
/// # Example
///
/// ```rust
/// use trickle_stream::{MinizEngine, StreamError, StreamSizes, ZlibStream};
///
/// fn collect(out: &mut Vec<u8>, window: &[u8]) -> Result<(), StreamError> {
///     out.extend_from_slice(window);
///     Ok(())
/// }
///
/// let compressed = miniz_oxide::deflate::compress_to_vec_zlib(b"hello", 6);
/// let sizes = StreamSizes::new(compressed.len(), 5);
/// let mut ctx: Box<ZlibStream<Vec<u8>>> =
///     Box::new(ZlibStream::new_push(MinizEngine::new(), sizes, collect, Vec::new()).unwrap());
///
/// for chunk in compressed.chunks(3) {
///     ctx.write_compressed(chunk).unwrap();
/// }
/// assert!(ctx.is_done());
/// assert_eq!(ctx.user(), b"hello");
/// ```
pub struct StreamContext<C, E, const WINDOW: usize, const CHUNK: usize> {
    pub(crate) driver: Driver<E, WINDOW, CHUNK>,
    callbacks: Callbacks<C>,
    pub(crate) user: C,
}

impl<C, E: InflateEngine, const WINDOW: usize, const CHUNK: usize> StreamContext<C, E, WINDOW, CHUNK> {
    /// Build a context for the pull contract.
    ///
    /// # Errors
    ///
    /// [`StreamError::InvalidArgument`] if either total is zero, the
    /// engine rejects a `WINDOW`-byte window, or `CHUNK` is zero.
    pub fn new_pull(
        engine: E,
        sizes: StreamSizes,
        input_request: InputRequest<C>,
        user: C,
    ) -> Result<Self, StreamError> {
        Self::new(engine, sizes, Callbacks::Pull(input_request), user)
    }

    /// Build a context for the push contract.
    ///
    /// # Errors
    ///
    /// Same as [`new_pull`](Self::new_pull).
    pub fn new_push(
        engine: E,
        sizes: StreamSizes,
        output_delivery: OutputDelivery<C>,
        user: C,
    ) -> Result<Self, StreamError> {
        Self::new(engine, sizes, Callbacks::Push(output_delivery), user)
    }

    fn new(
        engine: E,
        sizes: StreamSizes,
        callbacks: Callbacks<C>,
        user: C,
    ) -> Result<Self, StreamError> {
        sizes.validate()?;
        if !E::accepts_window(WINDOW) {
            return Err(StreamError::InvalidArgument {
                reason: "window capacity not accepted by engine",
            });
        }
        if CHUNK == 0 {
            return Err(StreamError::InvalidArgument {
                reason: "leftover buffer capacity must be non-zero",
            });
        }

        Ok(Self {
            driver: Driver::new(engine, sizes),
            callbacks,
            user,
        })
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.callbacks.mode()
    }

    /// Last status reported by the engine.
    #[must_use]
    pub fn status(&self) -> EngineStatus {
        self.driver.status()
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.driver.status() == EngineStatus::Done
    }

    /// Compressed bytes not yet consumed by the engine.
    #[must_use]
    pub fn remaining_compressed(&self) -> usize {
        self.driver.remaining_compressed()
    }

    /// Decoded bytes not yet handed to the caller.
    #[must_use]
    pub fn remaining_decoded(&self) -> usize {
        self.driver.undelivered()
    }

    #[must_use]
    pub fn stats(&self) -> StreamStats {
        self.driver.stats()
    }

    pub fn user(&self) -> &C {
        &self.user
    }

    pub fn user_mut(&mut self) -> &mut C {
        &mut self.user
    }

    pub fn into_user(self) -> C {
        self.user
    }

    pub(crate) fn input_request(&self) -> Result<InputRequest<C>, StreamError> {
        match self.callbacks {
            Callbacks::Pull(request) => Ok(request),
            Callbacks::Push(_) => Err(StreamError::ModeMismatch {
                expected: Mode::PullUncompressed,
                actual: Mode::PushCompressed,
            }),
        }
    }

    pub(crate) fn output_delivery(&self) -> Result<OutputDelivery<C>, StreamError> {
        match self.callbacks {
            Callbacks::Push(deliver) => Ok(deliver),
            Callbacks::Pull(_) => Err(StreamError::ModeMismatch {
                expected: Mode::PushCompressed,
                actual: Mode::PullUncompressed,
            }),
        }
    }
}
