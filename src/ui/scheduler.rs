//! Frame-coalesced render scheduling.
//!
//! Model operations mark views dirty through [`RenderScheduler::request`];
//! a single render loop drains the flags at most once per display frame
//! and repaints from *current* model state, so a burst of mutations within
//! one frame costs one repaint per view.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;
use tokio::task::JoinHandle;

use super::pacer::FramePacer;
use super::view::{ChatView, ViewKind};
use crate::history::ConversationModel;

pub struct RenderScheduler {
    list_dirty: AtomicBool,
    messages_dirty: AtomicBool,
    wake: Notify,
}

impl RenderScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            list_dirty: AtomicBool::new(false),
            messages_dirty: AtomicBool::new(false),
            wake: Notify::new(),
        })
    }

    /// Mark a view dirty. Any number of requests for the same view before
    /// the next frame collapse into a single repaint.
    pub fn request(&self, view: ViewKind) {
        match view {
            ViewKind::ConversationList => self.list_dirty.store(true, Ordering::Release),
            ViewKind::Messages => self.messages_dirty.store(true, Ordering::Release),
        }
        self.wake.notify_one();
    }

    /// Spawn the render loop. The loop sleeps until a request arrives,
    /// waits for the next frame, then repaints whichever views are dirty
    /// by then. State is read at fire time, not at request time.
    ///
    /// The scheduler itself holds no model or view reference, so the model
    /// can own an `Arc<RenderScheduler>` without creating a cycle.
    pub fn spawn_loop(
        self: &Arc<Self>,
        pacer: Arc<FramePacer>,
        model: Arc<Mutex<ConversationModel>>,
        view: Arc<Mutex<dyn ChatView>>,
    ) -> JoinHandle<()> {
        let scheduler = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                scheduler.wake.notified().await;
                pacer.next_frame().await;

                let list = scheduler.list_dirty.swap(false, Ordering::AcqRel);
                let messages = scheduler.messages_dirty.swap(false, Ordering::AcqRel);
                if !list && !messages {
                    continue;
                }

                // Neither lock is ever held across an await.
                let Ok(model) = model.lock() else { return };
                let Ok(mut view) = view.lock() else { return };
                if list {
                    view.render_conversation_list(model.conversations(), model.active_id());
                }
                if messages {
                    view.render_messages(model.active_messages());
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{ConvoStore, MemorySlot, Role, SeqIds};
    use crate::ui::view::RecordingView;
    use std::time::Duration;

    struct Fixture {
        scheduler: Arc<RenderScheduler>,
        pacer: Arc<FramePacer>,
        model: Arc<Mutex<ConversationModel>>,
        view: Arc<Mutex<RecordingView>>,
        loop_task: JoinHandle<()>,
    }

    impl Fixture {
        fn new() -> Self {
            let scheduler = RenderScheduler::new();
            let pacer = Arc::new(FramePacer::manual());
            let model = Arc::new(Mutex::new(ConversationModel::bootstrap(
                Arc::new(SeqIds::new("id")),
                ConvoStore::new(Arc::new(MemorySlot::default()), 50),
                Arc::clone(&scheduler),
                50,
            )));
            let view = Arc::new(Mutex::new(RecordingView::default()));
            // Bootstrap marks both views dirty; clear that so each test
            // starts from a quiet scheduler.
            scheduler.list_dirty.store(false, Ordering::SeqCst);
            scheduler.messages_dirty.store(false, Ordering::SeqCst);
            let loop_task = scheduler.spawn_loop(
                Arc::clone(&pacer),
                Arc::clone(&model),
                Arc::clone(&view) as Arc<Mutex<dyn ChatView>>,
            );
            Self {
                scheduler,
                pacer,
                model,
                view,
                loop_task,
            }
        }

        async fn frame(&self) {
            self.pacer.tick(1);
            tokio::time::sleep(Duration::from_millis(30)).await;
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            self.loop_task.abort();
        }
    }

    #[tokio::test]
    async fn many_requests_in_one_frame_collapse_to_one_paint() {
        let fx = Fixture::new();
        for _ in 0..5 {
            fx.scheduler.request(ViewKind::ConversationList);
        }
        fx.frame().await;
        assert_eq!(fx.view.lock().unwrap().list_renders.len(), 1);
    }

    #[tokio::test]
    async fn paint_reads_state_at_fire_time_not_request_time() {
        let fx = Fixture::new();
        fx.scheduler.request(ViewKind::Messages);
        // Mutations after the request but before the frame still land in
        // the same paint.
        {
            let mut model = fx.model.lock().unwrap();
            model.append_message(Role::User, "late");
            model.append_message(Role::Assistant, "later");
        }
        fx.frame().await;

        let view = fx.view.lock().unwrap();
        assert_eq!(view.message_renders.len(), 1);
        assert_eq!(view.message_renders[0], vec!["late", "later"]);
    }

    #[tokio::test]
    async fn views_are_scheduled_independently() {
        let fx = Fixture::new();
        fx.scheduler.request(ViewKind::Messages);
        fx.frame().await;

        let view = fx.view.lock().unwrap();
        assert_eq!(view.message_renders.len(), 1);
        assert!(view.list_renders.is_empty());
    }

    #[tokio::test]
    async fn requests_after_a_frame_get_their_own_paint() {
        let fx = Fixture::new();
        fx.scheduler.request(ViewKind::ConversationList);
        fx.frame().await;
        fx.scheduler.request(ViewKind::ConversationList);
        fx.frame().await;
        assert_eq!(fx.view.lock().unwrap().list_renders.len(), 2);
    }

    #[tokio::test]
    async fn no_paint_without_a_request() {
        let fx = Fixture::new();
        fx.frame().await;
        fx.frame().await;
        let view = fx.view.lock().unwrap();
        assert!(view.list_renders.is_empty());
        assert!(view.message_renders.is_empty());
    }
}
