//! Incremental reveal of a fully-known reply string.
//!
//! The reply arrives all at once (locally synthesized), but is presented
//! as if it were typed: one prefix per display frame, sized so any reply
//! finishes in roughly the same number of ticks.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::pacer::FramePacer;

/// Minimum characters revealed per tick.
const MIN_STEP_CHARS: usize = 2;

/// Handle to an in-flight stream. Dropping the handle does not stop the
/// stream; call [`StreamHandle::cancel`].
pub struct StreamHandle {
    task: JoinHandle<()>,
}

impl StreamHandle {
    /// Stop the stream. No further chunks are emitted and `on_done` will
    /// never fire. Cancelling a completed stream is a no-op.
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

pub struct ReplyStreamer {
    pacer: Arc<FramePacer>,
    tick_target: usize,
}

impl ReplyStreamer {
    pub fn new(pacer: Arc<FramePacer>, tick_target: usize) -> Self {
        Self {
            pacer,
            tick_target: tick_target.max(1),
        }
    }

    /// Reveal `full_text` through `on_chunk`, one growing prefix per
    /// frame; whole characters only, never split mid-scalar. The final
    /// chunk equals `full_text`, after which `on_done` fires exactly once.
    ///
    /// At most one stream may target a given visual slot; the caller must
    /// cancel any prior stream for that slot before starting a new one.
    pub fn start<C, D>(&self, full_text: String, on_chunk: C, on_done: D) -> StreamHandle
    where
        C: FnMut(&str) + Send + 'static,
        D: FnOnce() + Send + 'static,
    {
        let pacer = Arc::clone(&self.pacer);
        let tick_target = self.tick_target;
        let task = tokio::spawn(async move {
            run(&pacer, tick_target, &full_text, on_chunk).await;
            on_done();
        });
        StreamHandle { task }
    }

    /// Inline variant for callers already inside their own task; completes
    /// when the full text has been revealed. Cancellation is the caller's
    /// task being aborted at a frame await.
    pub async fn run<C>(&self, full_text: &str, on_chunk: C)
    where
        C: FnMut(&str),
    {
        run(&self.pacer, self.tick_target, full_text, on_chunk).await;
    }
}

async fn run<C>(pacer: &FramePacer, tick_target: usize, full_text: &str, mut on_chunk: C)
where
    C: FnMut(&str),
{
    let chars: Vec<char> = full_text.chars().collect();
    let step = (chars.len() / tick_target).max(MIN_STEP_CHARS);
    let mut cursor = 0usize;
    while cursor < chars.len() {
        pacer.next_frame().await;
        cursor = (cursor + step).min(chars.len());
        let prefix: String = chars[..cursor].iter().collect();
        on_chunk(&prefix);
    }
}
