use trickle_engine::MinizEngine;

use crate::context::StreamContext;
use crate::error::StreamError;

/// Default decoded-window capacity: the zlib dictionary size.
///
/// A window this size is the smallest that [`MinizEngine`] accepts, and
/// the one the stream should normally use. Larger windows only change
/// how often output is handed over.
pub const DEFAULT_WINDOW_SIZE: usize = 32 * 1024;

/// Default leftover-buffer capacity.
///
/// Bounds the largest chunk an input-request callback can safely feed in
/// pull mode: whatever the engine has not consumed when the window fills
/// is copied here, and a remainder larger than this is a protocol error.
pub const DEFAULT_CHUNK_SIZE: usize = 4 * 1024;

/// A zlib stream context with the default engine and buffer capacities.
///
/// ```text
/// ┌─────────────┬───────────────────────────────┐
/// │ Parameter   │ Value                         │
/// ├─────────────┼───────────────────────────────┤
/// │ engine      │ MinizEngine (zlib framing)    │
/// │ window      │ DEFAULT_WINDOW_SIZE  (32 KiB) │
/// │ leftovers   │ DEFAULT_CHUNK_SIZE   (4 KiB)  │
/// └─────────────┴───────────────────────────────┘
/// ```
///
/// The whole context is around 48 KiB; on small stacks, box it.
pub type ZlibStream<C> = StreamContext<C, MinizEngine, DEFAULT_WINDOW_SIZE, DEFAULT_CHUNK_SIZE>;

/// Totals declared up front for one stream.
///
/// Both are used only to check the engine's accounting. Buffer
/// capacities come from the context's const parameters, never from
/// these values.
///
/// ```text
/// ┌──────────────────┬───────────────────────────────────────────────┐
/// │ Field            │ Checked against                               │
/// ├──────────────────┼───────────────────────────────────────────────┤
/// │ total_compressed │ bytes consumed; must hit 0 exactly at done    │
/// │ total_decoded    │ bytes produced; must hit 0 exactly at done    │
/// └──────────────────┴───────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamSizes {
    pub total_compressed: usize,
    pub total_decoded: usize,
}

impl StreamSizes {
    #[must_use]
    pub fn new(total_compressed: usize, total_decoded: usize) -> Self {
        Self {
            total_compressed,
            total_decoded,
        }
    }

    /// Reject empty streams.
    ///
    /// # Errors
    ///
    /// [`StreamError::InvalidArgument`] if either total is zero.
    pub fn validate(&self) -> Result<(), StreamError> {
        if self.total_compressed == 0 {
            return Err(StreamError::InvalidArgument {
                reason: "total compressed size must be non-zero",
            });
        }
        if self.total_decoded == 0 {
            return Err(StreamError::InvalidArgument {
                reason: "total decoded size must be non-zero",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trickle_engine::InflateEngine;

    #[test]
    fn default_window_is_accepted_by_miniz() {
        assert!(MinizEngine::accepts_window(DEFAULT_WINDOW_SIZE));
    }

    #[test]
    fn zero_totals_are_rejected() {
        assert!(matches!(
            StreamSizes::new(0, 10).validate(),
            Err(StreamError::InvalidArgument { .. })
        ));
        assert!(matches!(
            StreamSizes::new(10, 0).validate(),
            Err(StreamError::InvalidArgument { .. })
        ));
        assert_eq!(StreamSizes::new(1, 1).validate(), Ok(()));
    }
}
