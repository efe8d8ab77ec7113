//! Event surface of the core: wires inbound UI events to the model,
//! schedules repaints, and drives the synthesized-reply stream.
//!
//! The controller also owns reply-task lifetime: any event that replaces
//! the message view's target (create, switch, delete-active, or a new
//! submit) cancels the outstanding reply before mutating state, so a
//! stale stream can never write into a recycled render target.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;

use crate::history::{ConversationModel, ConvoStore, IdSource, Role, StateSlot};
use crate::history::{FileSlot, StoreError, UuidIds};
use crate::services::config::UiConfig;
use crate::ui::{ChatView, FramePacer, RenderScheduler, ReplyStreamer, ViewKind};

/// Label prefixed to the synthesized echo reply. Stand-in for a real
/// backend; the tested contract is only that the stored assistant text
/// exactly equals what was streamed.
const REPLY_PREFIX: &str = "Echoing: ";

#[derive(Default)]
struct ReplyRegistry {
    next_id: u64,
    current: Option<(u64, JoinHandle<()>)>,
}

pub struct ChatController {
    model: Arc<Mutex<ConversationModel>>,
    renders: Arc<RenderScheduler>,
    view: Arc<Mutex<dyn ChatView>>,
    pacer: Arc<FramePacer>,
    streamer: Arc<ReplyStreamer>,
    // NOTE: std::sync::Mutex since no lock is ever held across .await.
    replies: Arc<Mutex<ReplyRegistry>>,
    reply_delay: Duration,
    render_loop: JoinHandle<()>,
}

impl ChatController {
    pub fn new(
        config: &UiConfig,
        ids: Arc<dyn IdSource>,
        slot: Arc<dyn StateSlot>,
        view: Arc<Mutex<dyn ChatView>>,
        pacer: Arc<FramePacer>,
    ) -> Self {
        let renders = RenderScheduler::new();
        let model = Arc::new(Mutex::new(ConversationModel::bootstrap(
            ids,
            ConvoStore::new(slot, config.max_conversations),
            Arc::clone(&renders),
            config.max_conversations,
        )));
        let render_loop =
            renders.spawn_loop(Arc::clone(&pacer), Arc::clone(&model), Arc::clone(&view));
        let streamer = Arc::new(ReplyStreamer::new(
            Arc::clone(&pacer),
            config.typing_tick_target,
        ));

        Self {
            model,
            renders,
            view,
            pacer,
            streamer,
            replies: Arc::new(Mutex::new(ReplyRegistry::default())),
            reply_delay: config.reply_delay,
            render_loop,
        }
    }

    /// Controller over the default production wiring: env-tuned config,
    /// UUID ids, the JSON slot in the app data directory, and an
    /// interval pacer.
    pub fn with_default_storage(view: Arc<Mutex<dyn ChatView>>) -> Result<Self, StoreError> {
        let config = UiConfig::from_env();
        let slot = Arc::new(FileSlot::in_data_dir()?);
        let pacer = Arc::new(FramePacer::interval(config.frame_interval));
        Ok(Self::new(&config, Arc::new(UuidIds), slot, view, pacer))
    }

    pub fn create_conversation(&self, title: Option<&str>) -> Option<String> {
        self.cancel_reply();
        let mut model = self.model.lock().ok()?;
        Some(model.create(title))
    }

    pub fn select_conversation(&self, id: &str) {
        let is_switch = {
            let Ok(model) = self.model.lock() else { return };
            if !model.conversations().iter().any(|c| c.id == id) {
                return;
            }
            model.active_id() != Some(id)
        };
        if is_switch {
            self.cancel_reply();
        }
        if let Ok(mut model) = self.model.lock() {
            model.set_active(id);
        }
    }

    pub fn rename_conversation(&self, id: &str, title: &str) {
        if let Ok(mut model) = self.model.lock() {
            model.rename(id, title);
        }
    }

    pub fn delete_conversation(&self, id: &str) {
        let was_active = {
            let Ok(model) = self.model.lock() else { return };
            if !model.conversations().iter().any(|c| c.id == id) {
                return;
            }
            model.active_id() == Some(id)
        };
        if was_active {
            self.cancel_reply();
        }
        if let Ok(mut model) = self.model.lock() {
            model.delete(id);
        }
    }

    /// Handle a submit from the input widget. Blank input is dropped.
    /// Appends and renders the user message, then spawns the reply task:
    /// fixed delay, append the echo as an assistant message, stream it
    /// into the view, and re-sync the message view once done.
    pub fn submit(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        {
            let Ok(mut model) = self.model.lock() else { return };
            model.append_message(Role::User, text);
        }
        // Title may have been derived from the first user message, so the
        // list repaints along with the messages.
        self.renders.request(ViewKind::Messages);
        self.renders.request(ViewKind::ConversationList);

        self.cancel_reply();
        let reply = format!("{REPLY_PREFIX}{text}");
        self.spawn_reply(reply);
    }

    /// Tab visibility hook: hidden stops frame consumption (renders and
    /// stream ticks), visible resumes where things left off.
    pub fn set_visible(&self, visible: bool) {
        self.pacer.set_visible(visible);
    }

    pub fn model(&self) -> &Arc<Mutex<ConversationModel>> {
        &self.model
    }

    fn spawn_reply(&self, reply: String) {
        let model = Arc::clone(&self.model);
        let renders = Arc::clone(&self.renders);
        let view = Arc::clone(&self.view);
        let streamer = Arc::clone(&self.streamer);
        let replies = Arc::clone(&self.replies);
        let delay = self.reply_delay;

        let Ok(mut registry) = self.replies.lock() else {
            return;
        };
        registry.next_id += 1;
        let reply_id = registry.next_id;

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let Ok(mut model) = model.lock() else { return };
                model.append_message(Role::Assistant, &reply);
            }
            streamer
                .run(&reply, |prefix| {
                    if let Ok(mut view) = view.lock() {
                        view.append_message_incrementally(prefix);
                    }
                })
                .await;
            // Re-sync the message view from state; the stored text equals
            // the streamed text, so the paint is visually idempotent.
            renders.request(ViewKind::Messages);
            if let Ok(mut registry) = replies.lock() {
                if registry.current.as_ref().map(|(id, _)| *id) == Some(reply_id) {
                    registry.current = None;
                }
            }
        });
        registry.current = Some((reply_id, task));
    }

    fn cancel_reply(&self) {
        let Ok(mut registry) = self.replies.lock() else {
            return;
        };
        if let Some((_, task)) = registry.current.take() {
            task.abort();
        }
    }
}

impl Drop for ChatController {
    fn drop(&mut self) {
        self.cancel_reply();
        self.render_loop.abort();
    }
}

/// Guard for the input widget's submit path: at most one accepted submit
/// per throttle window, against key-repeat double fires. The core itself
/// does not throttle; this mirrors the window the input widget is
/// expected to enforce.
pub struct SubmitThrottle {
    window: Duration,
    last: Option<Instant>,
}

impl SubmitThrottle {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    pub fn allow(&mut self) -> bool {
        let now = Instant::now();
        match self.last {
            Some(last) if now.duration_since(last) <= self.window => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}
