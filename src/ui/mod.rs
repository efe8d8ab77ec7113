//! View-facing half of the core: the render target interface, frame
//! pacing, coalesced render scheduling, and reply streaming.

mod pacer;
mod scheduler;
mod streamer;
mod view;

pub use pacer::FramePacer;
pub use scheduler::RenderScheduler;
pub use streamer::{ReplyStreamer, StreamHandle};
pub use view::{ChatView, ViewKind};

#[cfg(test)]
pub(crate) use view::RecordingView;
