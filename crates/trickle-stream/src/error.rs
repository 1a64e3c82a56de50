use trickle_engine::EngineStatus;

use crate::context::Mode;

/// Errors surfaced by every stream operation.
///
/// All of them are fatal to the stream: nothing is retried internally
/// and a context that returned an error must be discarded.
///
/// Error hierarchy:
///
/// ```text
///   StreamError
///   ├── InvalidArgument         ← zero totals, empty buffers, bad capacities
///   ├── ModeMismatch            ← pull call on a push context or vice versa
///   ├── Protocol(ProtocolError) ← engine result inconsistent with accounting
///   └── Callback                ← non-zero code returned by a caller callback
/// ```
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// Construction-time or call-time misuse.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: &'static str },

    /// The operation belongs to the other streaming mode.
    ///
    /// Returned before the context is touched, so a mismatched call
    /// leaves the stream exactly as it was.
    #[error("operation requires {expected} mode, context was built for {actual}")]
    ModeMismatch { expected: Mode, actual: Mode },

    /// The engine's step results contradict the declared stream sizes,
    /// or the buffering rules of the stream were broken.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Application-defined failure reported by an input-request or
    /// output-delivery callback. The code is opaque to this layer and is
    /// handed back to the caller unchanged.
    #[error("callback failed with code {code}")]
    Callback { code: i32 },
}

impl StreamError {
    /// Shorthand for callbacks reporting their own failure.
    #[must_use]
    pub fn callback(code: i32) -> Self {
        Self::Callback { code }
    }
}

/// Ways in which engine output or caller input can break the stream's
/// byte accounting.
///
/// ```text
///   ProtocolError
///   ├── EngineFailed            ← engine reported a decoding failure
///   ├── DoneWithInputRemaining  ← done, but compressed bytes still outstanding
///   ├── InputExhausted          ← not done, but no compressed bytes outstanding
///   ├── EngineOverrun           ← engine consumed/produced beyond its buffers
///   ├── Stalled                 ← in-progress step made no progress at all
///   ├── UnconsumedInput         ← chunk bytes left over where none are allowed
///   ├── LeftoverOverflow        ← retained remainder larger than scratch buffer
///   ├── ChunkExceedsStream      ← chunk longer than the bytes still expected
///   ├── Suspended               ← chunk fed while output or leftovers pending
///   ├── DecodedOverflow         ← engine produced more than the declared total
///   ├── DecodedSizeMismatch     ← done before the declared total was produced
///   ├── ReadPastEnd             ← read request beyond the declared total
///   ├── StaleReadyWindow        ← ready bytes survived a full drain pass
///   └── StarvedRequest          ← input request returned without feeding
/// ```
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("engine reported a decoding failure")]
    EngineFailed,

    #[error("engine reported completion with {remaining} compressed bytes outstanding")]
    DoneWithInputRemaining { remaining: usize },

    #[error("engine reported {status} with no compressed bytes outstanding")]
    InputExhausted { status: EngineStatus },

    #[error(
        "engine overran its buffers: consumed {consumed} of {available_input}, \
         produced {produced} of {available_output}"
    )]
    EngineOverrun {
        consumed: usize,
        available_input: usize,
        produced: usize,
        available_output: usize,
    },

    #[error("engine made no progress while reporting {status}")]
    Stalled { status: EngineStatus },

    #[error("{remaining} compressed bytes were not consumed")]
    UnconsumedInput { remaining: usize },

    #[error("{len} leftover compressed bytes exceed the {capacity}-byte scratch buffer")]
    LeftoverOverflow { len: usize, capacity: usize },

    #[error("chunk of {len} bytes exceeds the {remaining} compressed bytes still expected")]
    ChunkExceedsStream { len: usize, remaining: usize },

    #[error(
        "chunk fed while {ready} decoded bytes and {leftover} leftover bytes are pending"
    )]
    Suspended { ready: usize, leftover: usize },

    #[error("engine produced {produced} bytes with only {remaining} decoded bytes expected")]
    DecodedOverflow { produced: usize, remaining: usize },

    #[error("stream completed with {missing} of the declared decoded bytes never produced")]
    DecodedSizeMismatch { missing: usize },

    #[error("read of {requested} bytes exceeds the {available} decoded bytes left in the stream")]
    ReadPastEnd { requested: usize, available: usize },

    #[error("{len} ready bytes left undrained")]
    StaleReadyWindow { len: usize },

    #[error("input request returned without supplying compressed bytes")]
    StarvedRequest,
}
