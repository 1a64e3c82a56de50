use crate::status::Step;

/// Capability contract for an incremental block-decompression engine.
///
/// An engine turns compressed bytes into decoded bytes one step at a
/// time. It owns only its internal decoding state; both buffers are
/// supplied by the caller on every call:
///
/// ```text
///   input:  ┌───────────────────────────────┐
///           │ compressed bytes not yet fed  │  ← engine consumes a prefix
///           └───────────────────────────────┘
///
///   window: ┌──────────────┬────────────────┐
///           │ earlier data │ free space     │  ← engine writes at write_pos
///           └──────────────┴────────────────┘
///           0          write_pos       window.len()
/// ```
///
/// The whole window is handed over (not just the free tail) because
/// back-references may reach into bytes produced by earlier steps. Once
/// `write_pos` reaches the end of the window the caller restarts it at
/// zero, so the window behaves as a ring of the last `window.len()`
/// decoded bytes.
///
/// # Guarantees required of implementations
///
/// - `consumed <= input.len()`
/// - `produced <= window.len() - write_pos`
/// - `NeedsMoreInput` is only reported once all of `input` is consumed.
///
/// The stream driver checks the first two after every step and treats a
/// violation as a protocol error.
pub trait InflateEngine {
    /// Smallest window that can hold every back-reference the format
    /// allows. Windows below this size would silently corrupt output.
    const MIN_WINDOW: usize;

    /// Whether a window of `len` bytes can be used with this engine.
    ///
    /// The default only enforces [`MIN_WINDOW`](Self::MIN_WINDOW);
    /// engines with extra layout requirements override it.
    fn accepts_window(len: usize) -> bool {
        len >= Self::MIN_WINDOW
    }

    /// Return the engine to its start-of-stream state.
    fn reset(&mut self);

    /// Decode as much as possible from `input` into `window[write_pos..]`.
    ///
    /// `has_more_input` tells the engine whether bytes exist beyond the
    /// end of `input`. Formats with final-block framing need this to tell
    /// "input ran out mid-stream" apart from "input was truncated".
    fn step(
        &mut self,
        input: &[u8],
        has_more_input: bool,
        window: &mut [u8],
        write_pos: usize,
    ) -> Step;
}
