/// Outcome of a single engine step, in this workspace's vocabulary.
///
/// Engines report their own status codes; adapters translate them into
/// one of these five states. The stream driver never compares statuses
/// numerically; every decision is an explicit `match` over this enum.
///
/// ```text
/// ┌─────────────────┬──────────────────────────────────────────────────┐
/// │ Status          │ Meaning                                          │
/// ├─────────────────┼──────────────────────────────────────────────────┤
/// │ NeedsMoreInput  │ Input slice exhausted, stream not finished       │
/// │ NeedsMoreOutput │ Output space exhausted before any progress       │
/// │ HasMoreOutput   │ Output space full, more decoded bytes pending    │
/// │ Done            │ Final block decoded and trailer verified         │
/// │ Failed          │ Corrupt input or misuse; stream is abandoned     │
/// └─────────────────┴──────────────────────────────────────────────────┘
/// ```
///
/// `NeedsMoreInput` is also the initial state of a fresh stream: a
/// context starts out waiting for its first compressed chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EngineStatus {
    #[default]
    NeedsMoreInput,
    NeedsMoreOutput,
    HasMoreOutput,
    Done,
    Failed,
}

impl EngineStatus {
    /// Whether the stream is still being decoded.
    ///
    /// `Done` and `Failed` are terminal; everything else means another
    /// step may make progress once input or output space is available.
    #[must_use]
    pub fn in_progress(self) -> bool {
        match self {
            Self::NeedsMoreInput | Self::NeedsMoreOutput | Self::HasMoreOutput => true,
            Self::Done | Self::Failed => false,
        }
    }

    /// Short lowercase name, used in log fields and error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NeedsMoreInput => "needs-more-input",
            Self::NeedsMoreOutput => "needs-more-output",
            Self::HasMoreOutput => "has-more-output",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one call to [`InflateEngine::step`](crate::InflateEngine::step)
/// did: how many input bytes it consumed, how many decoded bytes it wrote
/// at the write position, and the resulting status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub status: EngineStatus,
    pub consumed: usize,
    pub produced: usize,
}

impl Step {
    #[must_use]
    pub fn new(status: EngineStatus, consumed: usize, produced: usize) -> Self {
        Self {
            status,
            consumed,
            produced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_status_waits_for_input() {
        assert_eq!(EngineStatus::default(), EngineStatus::NeedsMoreInput);
    }

    #[test]
    fn terminal_statuses_are_not_in_progress() {
        assert!(!EngineStatus::Done.in_progress());
        assert!(!EngineStatus::Failed.in_progress());
    }

    #[test]
    fn suspended_statuses_are_in_progress() {
        assert!(EngineStatus::NeedsMoreInput.in_progress());
        assert!(EngineStatus::NeedsMoreOutput.in_progress());
        assert!(EngineStatus::HasMoreOutput.in_progress());
    }

    #[test]
    fn display_uses_kebab_names() {
        assert_eq!(EngineStatus::HasMoreOutput.to_string(), "has-more-output");
        assert_eq!(EngineStatus::Done.to_string(), "done");
    }
}
