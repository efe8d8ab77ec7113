//! Headless core of a multi-conversation chat UI.
//!
//! Owns a bounded, locally persisted collection of conversations with a
//! single active pointer, coalesces repaints to at most one per display
//! frame per view, and simulates an assistant's incremental reply with a
//! cancellable stream. The visual layer, identifier generator, and
//! durable medium are all injected, so the whole core runs (and is
//! tested) without a real UI attached.
//!
//! Typical wiring:
//!
//! ```no_run
//! use std::sync::{Arc, Mutex};
//! use chatui_core::{ChatController, ChatView, Conversation, Message};
//!
//! struct StdoutView;
//!
//! impl ChatView for StdoutView {
//!     fn render_conversation_list(&mut self, conversations: &[Conversation], active: Option<&str>) {
//!         for c in conversations {
//!             let marker = if Some(c.id.as_str()) == active { "*" } else { " " };
//!             println!("{marker} {}", c.title);
//!         }
//!     }
//!     fn render_messages(&mut self, messages: &[Message]) {
//!         for m in messages {
//!             println!("{:?}: {}", m.role, m.text);
//!         }
//!     }
//!     fn append_message_incrementally(&mut self, partial: &str) {
//!         print!("\r{partial}");
//!     }
//! }
//!
//! # fn main() -> Result<(), chatui_core::StoreError> {
//! let view: Arc<Mutex<dyn ChatView>> = Arc::new(Mutex::new(StdoutView));
//! let controller = ChatController::with_default_storage(view)?;
//! controller.submit("hello world");
//! # Ok(())
//! # }
//! ```

pub mod history;
pub mod services;
pub mod ui;

pub use history::{
    Conversation, ConversationModel, ConvoStore, DEFAULT_TITLE, FileSlot, IdSource, MemorySlot,
    Message, Role, StateSlot, StoreError, UuidIds,
};
pub use services::config::UiConfig;
pub use services::controller::{ChatController, SubmitThrottle};
pub use ui::{ChatView, FramePacer, RenderScheduler, ReplyStreamer, StreamHandle, ViewKind};
