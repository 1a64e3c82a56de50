use trickle_engine::InflateEngine;

use crate::context::StreamContext;
use crate::error::StreamError;

impl<C, E: InflateEngine, const WINDOW: usize, const CHUNK: usize> StreamContext<C, E, WINDOW, CHUNK> {
    /// Decode one chunk of compressed bytes, delivering output through
    /// the output-delivery callback as windows fill up.
    ///
    /// The chunk must be fully consumed by the time the engine suspends:
    /// push mode keeps no leftovers, so any unconsumed byte is a protocol
    /// error. The final (possibly partial) window is delivered in the
    /// same call that completes the stream.
    ///
    /// # Errors
    ///
    /// - [`StreamError::ModeMismatch`] on a pull-mode context (nothing is
    ///   touched).
    /// - [`StreamError::InvalidArgument`] if `chunk` is empty.
    /// - [`StreamError::Protocol`] if the chunk overruns the declared
    ///   compressed size, is not fully consumed, or the engine's results
    ///   break the stream accounting.
    /// - Whatever error the output-delivery callback returns, unchanged;
    ///   no further engine step is taken after it.
    pub fn write_compressed(&mut self, chunk: &[u8]) -> Result<(), StreamError> {
        let deliver = self.output_delivery()?;
        let user = &mut self.user;
        let mut sink = |window: &[u8]| deliver(user, window);
        self.driver.push(chunk, &mut sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StreamSizes;
    use crate::context::Mode;
    use crate::error::ProtocolError;
    use crate::reader::Feed;
    use crate::testing::PassthroughEngine;

    #[derive(Default)]
    struct Sink {
        calls: Vec<Vec<u8>>,
        fail_with: Option<i32>,
    }

    fn record(sink: &mut Sink, window: &[u8]) -> Result<(), StreamError> {
        if let Some(code) = sink.fail_with {
            return Err(StreamError::callback(code));
        }
        sink.calls.push(window.to_vec());
        Ok(())
    }

    fn never(_: &mut Sink, _: &mut Feed<'_>) -> Result<(), StreamError> {
        Ok(())
    }

    type Ctx = StreamContext<Sink, PassthroughEngine, 8, 8>;

    fn push(total: usize, sink: Sink) -> Ctx {
        Ctx::new_push(PassthroughEngine, StreamSizes::new(total, total), record, sink).unwrap()
    }

    #[test]
    fn three_plus_two_delivers_once() {
        let mut ctx = push(5, Sink::default());
        ctx.write_compressed(b"hel").unwrap();
        assert!(ctx.user().calls.is_empty());
        ctx.write_compressed(b"lo").unwrap();

        assert_eq!(ctx.user().calls, vec![b"hello".to_vec()]);
        assert!(ctx.is_done());
    }

    #[test]
    fn callback_error_is_returned_verbatim() {
        let mut ctx = push(
            12,
            Sink {
                fail_with: Some(42),
                ..Sink::default()
            },
        );
        let err = ctx.write_compressed(b"0123456789ab").unwrap_err();
        assert_eq!(err, StreamError::Callback { code: 42 });
        assert_eq!(ctx.stats().engine_steps, 1);
    }

    #[test]
    fn writing_after_done_is_rejected() {
        let mut ctx = push(2, Sink::default());
        ctx.write_compressed(b"ok").unwrap();
        assert_eq!(
            ctx.write_compressed(b"!"),
            Err(StreamError::Protocol(ProtocolError::ChunkExceedsStream {
                len: 1,
                remaining: 0
            }))
        );
    }

    #[test]
    fn pull_context_rejects_writes() {
        let mut ctx =
            Ctx::new_pull(PassthroughEngine, StreamSizes::new(3, 3), never, Sink::default()).unwrap();
        assert_eq!(
            ctx.write_compressed(b"abc"),
            Err(StreamError::ModeMismatch {
                expected: Mode::PushCompressed,
                actual: Mode::PullUncompressed
            })
        );
        assert_eq!(ctx.remaining_compressed(), 3);
    }
}
