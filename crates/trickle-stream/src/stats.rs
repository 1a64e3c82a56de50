/// Running counters for one stream.
///
/// Updated by the driver as it works; read them through
/// [`StreamContext::stats`](crate::StreamContext::stats). They cost a few
/// additions per engine step and never influence control flow.
///
/// ```text
/// ┌─────────────────────┬────────────────────────────────────────────┐
/// │ Counter             │ Incremented when                           │
/// ├─────────────────────┼────────────────────────────────────────────┤
/// │ engine_steps        │ the engine is stepped once                 │
/// │ compressed_consumed │ the engine consumes compressed bytes       │
/// │ decoded_produced    │ the engine writes decoded bytes            │
/// │ decoded_delivered   │ decoded bytes reach the caller             │
/// │ windows_ready       │ a window is parked for the pull reader     │
/// │ windows_delivered   │ a window is handed to the output callback  │
/// │ input_requests      │ the input-request callback is invoked      │
/// │ leftover_stashes    │ unconsumed bytes are copied to scratch     │
/// └─────────────────────┴────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub engine_steps: u64,
    pub compressed_consumed: usize,
    pub decoded_produced: usize,
    pub decoded_delivered: usize,
    pub windows_ready: u64,
    pub windows_delivered: u64,
    pub input_requests: u64,
    pub leftover_stashes: u64,
}
