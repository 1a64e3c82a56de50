use miniz_oxide::inflate::TINFLStatus;
use miniz_oxide::inflate::core::inflate_flags::{
    TINFL_FLAG_COMPUTE_ADLER32, TINFL_FLAG_HAS_MORE_INPUT, TINFL_FLAG_PARSE_ZLIB_HEADER,
};
use miniz_oxide::inflate::core::{DecompressorOxide, TINFL_LZ_DICT_SIZE, decompress};

use crate::engine::InflateEngine;
use crate::status::{EngineStatus, Step};

/// zlib inflate engine backed by `miniz_oxide`'s low-level core.
///
/// Every step parses zlib framing (2-byte header, deflate blocks,
/// Adler-32 trailer) and writes into a *wrapping* output window: the
/// window doubles as the LZ77 dictionary, so it must be a power of two
/// and at least [`TINFL_LZ_DICT_SIZE`] (32 KiB) long.
///
/// The decompressor state is roughly 11 KiB and lives inline; it is
/// reset once per stream and never reallocated.
///
/// ```text
/// TINFLStatus                    EngineStatus
/// ───────────────────────────    ──────────────
/// NeedsMoreInput            ──►  NeedsMoreInput
/// HasMoreOutput             ──►  HasMoreOutput
/// Done                      ──►  Done
/// Failed                    ─┐
/// Adler32Mismatch            │
/// BadParam                   ├►  Failed
/// FailedCannotMakeProgress  ─┘
/// ```
pub struct MinizEngine {
    state: DecompressorOxide,
}

impl MinizEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: DecompressorOxide::new(),
        }
    }
}

impl Default for MinizEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InflateEngine for MinizEngine {
    const MIN_WINDOW: usize = TINFL_LZ_DICT_SIZE;

    fn accepts_window(len: usize) -> bool {
        len >= Self::MIN_WINDOW && len.is_power_of_two()
    }

    fn reset(&mut self) {
        self.state.init();
    }

    fn step(
        &mut self,
        input: &[u8],
        has_more_input: bool,
        window: &mut [u8],
        write_pos: usize,
    ) -> Step {
        let mut flags = TINFL_FLAG_PARSE_ZLIB_HEADER | TINFL_FLAG_COMPUTE_ADLER32;
        if has_more_input {
            flags |= TINFL_FLAG_HAS_MORE_INPUT;
        }

        let (status, consumed, produced) =
            decompress(&mut self.state, input, window, write_pos, flags);

        Step::new(classify(status), consumed, produced)
    }
}

fn classify(status: TINFLStatus) -> EngineStatus {
    match status {
        TINFLStatus::NeedsMoreInput => EngineStatus::NeedsMoreInput,
        TINFLStatus::HasMoreOutput => EngineStatus::HasMoreOutput,
        TINFLStatus::Done => EngineStatus::Done,
        TINFLStatus::Failed
        | TINFLStatus::Adler32Mismatch
        | TINFLStatus::BadParam
        | TINFLStatus::FailedCannotMakeProgress => EngineStatus::Failed,
    }
}
