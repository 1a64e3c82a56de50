//! Engines whose decisions are easy to predict, for tests.
//!
//! Built for this crate's unit tests and, with the `testing` feature,
//! for downstream test crates.

use std::collections::VecDeque;

use trickle_engine::{EngineStatus, InflateEngine, Step};

/// "Stored" engine: every compressed byte decodes to itself, so the
/// compressed and decoded totals are equal and every boundary is visible
/// in the test.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassthroughEngine;

impl InflateEngine for PassthroughEngine {
    const MIN_WINDOW: usize = 1;

    fn reset(&mut self) {}

    fn step(&mut self, input: &[u8], has_more_input: bool, window: &mut [u8], write_pos: usize) -> Step {
        let n = input.len().min(window.len() - write_pos);
        window[write_pos..write_pos + n].copy_from_slice(&input[..n]);
        let status = if n < input.len() {
            EngineStatus::HasMoreOutput
        } else if has_more_input {
            EngineStatus::NeedsMoreInput
        } else {
            EngineStatus::Done
        };
        Step::new(status, n, n)
    }
}

/// Replays a fixed list of step results, then reports failure.
///
/// Produced bytes are written as `#` so windows still carry data.
pub struct ScriptedEngine {
    script: VecDeque<Step>,
}

impl ScriptedEngine {
    pub fn new(script: impl IntoIterator<Item = Step>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl InflateEngine for ScriptedEngine {
    const MIN_WINDOW: usize = 1;

    fn reset(&mut self) {}

    fn step(&mut self, _input: &[u8], _has_more_input: bool, window: &mut [u8], write_pos: usize) -> Step {
        let step = self
            .script
            .pop_front()
            .unwrap_or(Step::new(EngineStatus::Failed, 0, 0));
        let fill = step.produced.min(window.len() - write_pos);
        window[write_pos..write_pos + fill].fill(b'#');
        step
    }
}
