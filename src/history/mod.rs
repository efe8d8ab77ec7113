//! Conversation state: types, persistence, and the model that owns the
//! collection plus the active-conversation pointer.

mod error;
mod ids;
mod model;
mod store;
mod title;
mod types;

pub use error::StoreError;
pub use ids::{Clock, IdSource, UuidIds};
pub use model::ConversationModel;
pub use store::{ConvoStore, FileSlot, MemorySlot, StateSlot};
pub use title::DEFAULT_TITLE;
pub use types::{Conversation, Message, Role};

#[cfg(test)]
pub(crate) use ids::SeqIds;
