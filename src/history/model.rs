//! In-memory conversation collection and its invariants.
//!
//! All mutation goes through [`ConversationModel`]; every operation leaves
//! the collection capped, newest-created-first, non-empty, with the active
//! pointer referencing a present conversation. Persistence is best-effort:
//! a failed write is logged and in-memory state stays authoritative.

use std::sync::Arc;

use super::ids::{Clock, IdSource};
use super::store::ConvoStore;
use super::title::{DEFAULT_TITLE, derive_title};
use super::types::{Conversation, Message, Role};
use crate::ui::{RenderScheduler, ViewKind};

pub struct ConversationModel {
    conversations: Vec<Conversation>,
    active_id: Option<String>,
    ids: Arc<dyn IdSource>,
    clock: Clock,
    store: ConvoStore,
    renders: Arc<RenderScheduler>,
    max_conversations: usize,
}

impl ConversationModel {
    /// Load persisted state and establish the post-init invariants: the
    /// collection is non-empty and the first conversation is active.
    /// Creating the initial conversation (fresh start) persists once;
    /// plain loads do not rewrite the slot.
    pub fn bootstrap(
        ids: Arc<dyn IdSource>,
        store: ConvoStore,
        renders: Arc<RenderScheduler>,
        max_conversations: usize,
    ) -> Self {
        let mut conversations = store.load();
        conversations.truncate(max_conversations);
        let active_id = conversations.first().map(|c| c.id.clone());

        let mut model = Self {
            conversations,
            active_id,
            ids,
            clock: Clock::default(),
            store,
            renders,
            max_conversations,
        };

        if model.conversations.is_empty() {
            model.insert_fresh(None);
            model.persist();
        }
        model.renders.request(ViewKind::ConversationList);
        model.renders.request(ViewKind::Messages);
        model
    }

    /// Create a conversation, make it active, persist, render both views.
    /// Never fails.
    pub fn create(&mut self, title: Option<&str>) -> String {
        let id = self.insert_fresh(title);
        self.persist();
        self.renders.request(ViewKind::ConversationList);
        self.renders.request(ViewKind::Messages);
        id
    }

    /// Move the active pointer. A stale id (just-deleted conversation and
    /// a lagging click handler) is silently ignored. Returns whether the
    /// pointer moved.
    pub fn set_active(&mut self, id: &str) -> bool {
        if !self.conversations.iter().any(|c| c.id == id) {
            return false;
        }
        self.active_id = Some(id.to_string());
        self.renders.request(ViewKind::ConversationList);
        self.renders.request(ViewKind::Messages);
        true
    }

    /// Rename a conversation. Blank input keeps the prior title rather
    /// than blanking it; either way the conversation is touched and the
    /// list view redrawn. Stale ids are ignored.
    pub fn rename(&mut self, id: &str, title: &str) {
        let ts = self.clock.now_ms();
        let Some(convo) = self.conversations.iter_mut().find(|c| c.id == id) else {
            return;
        };
        let trimmed = title.trim();
        if !trimmed.is_empty() {
            convo.title = trimmed.to_string();
        }
        convo.updated_at = ts;
        self.persist();
        self.renders.request(ViewKind::ConversationList);
    }

    /// Delete a conversation. If it was active, the conversation at
    /// position 0 takes over; deleting the last one creates a fresh
    /// default conversation. Exactly one slot write either way. Returns
    /// whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(pos) = self.conversations.iter().position(|c| c.id == id) else {
            return false;
        };
        self.conversations.remove(pos);
        if self.active_id.as_deref() == Some(id) {
            match self.conversations.first().map(|c| c.id.clone()) {
                Some(first_id) => self.active_id = Some(first_id),
                None => {
                    self.insert_fresh(None);
                }
            }
        }
        self.persist();
        self.renders.request(ViewKind::ConversationList);
        self.renders.request(ViewKind::Messages);
        true
    }

    /// Append a message to the active conversation (position 0 if the
    /// pointer is somehow stale). On the first user message of a
    /// still-untitled conversation the title is derived from the text.
    ///
    /// Deliberately requests no render: the caller decides when to paint,
    /// since appends back both the immediate echo and streamed replies.
    pub fn append_message(&mut self, role: Role, text: &str) {
        let ts = self.clock.now_ms();
        let id = self.ids.new_id();
        let active = self.active_id.as_deref();
        let idx = match self
            .conversations
            .iter()
            .position(|c| Some(c.id.as_str()) == active)
        {
            Some(idx) => idx,
            None if !self.conversations.is_empty() => 0,
            None => return,
        };
        let convo = &mut self.conversations[idx];
        convo.messages.push(Message {
            id,
            role,
            text: text.to_string(),
            ts,
        });
        convo.updated_at = ts;
        if role == Role::User && convo.title == DEFAULT_TITLE {
            if let Some(title) = derive_title(text) {
                convo.title = title;
            }
        }
        self.persist();
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        let active = self.active_id.as_deref()?;
        self.conversations.iter().find(|c| c.id == active)
    }

    /// Messages of the active conversation; empty when the pointer is
    /// transiently stale.
    pub fn active_messages(&self) -> &[Message] {
        self.active_conversation()
            .map(|c| c.messages.as_slice())
            .unwrap_or(&[])
    }

    /// Prepend a fresh default conversation, enforce the cap, activate it.
    /// No persistence and no render request; callers own both.
    fn insert_fresh(&mut self, title: Option<&str>) -> String {
        let ts = self.clock.now_ms();
        let id = self.ids.new_id();
        let title = match title.map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => DEFAULT_TITLE.to_string(),
        };
        self.conversations.insert(
            0,
            Conversation {
                id: id.clone(),
                title,
                created_at: ts,
                updated_at: ts,
                messages: Vec::new(),
            },
        );
        self.conversations.truncate(self.max_conversations);
        self.active_id = Some(id.clone());
        id
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.conversations) {
            log::warn!("Conversation save failed, keeping in-memory state: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::ids::SeqIds;
    use crate::history::store::{FailingSlot, MemorySlot, StateSlot};

    fn model_with(slot: Arc<dyn StateSlot>, cap: usize) -> ConversationModel {
        ConversationModel::bootstrap(
            Arc::new(SeqIds::new("id")),
            ConvoStore::new(slot, cap),
            RenderScheduler::new(),
            cap,
        )
    }

    fn fresh_model() -> ConversationModel {
        model_with(Arc::new(MemorySlot::default()), 50)
    }

    #[test]
    fn bootstrap_with_empty_slot_creates_one_default_conversation() {
        let slot = Arc::new(MemorySlot::default());
        let model = model_with(Arc::clone(&slot) as Arc<dyn StateSlot>, 50);

        assert_eq!(model.conversations().len(), 1);
        assert_eq!(model.conversations()[0].title, DEFAULT_TITLE);
        assert_eq!(model.active_id(), Some(model.conversations()[0].id.as_str()));
        // The initial conversation was persisted.
        assert!(slot.snapshot().is_some());
    }

    #[test]
    fn bootstrap_restores_saved_state_and_activates_first() {
        let slot: Arc<dyn StateSlot> = Arc::new(MemorySlot::default());
        {
            let mut model = model_with(Arc::clone(&slot), 50);
            model.create(None);
            model.append_message(Role::User, "hello");
        }
        let model = model_with(slot, 50);
        assert_eq!(model.conversations().len(), 2);
        assert_eq!(model.conversations()[0].title, "hello");
        assert_eq!(model.active_id(), Some(model.conversations()[0].id.as_str()));
    }

    #[test]
    fn create_prepends_caps_and_activates() {
        let mut model = model_with(Arc::new(MemorySlot::default()), 50);
        for _ in 0..51 {
            let id = model.create(None);
            assert!(model.conversations().len() <= 50);
            assert_eq!(model.conversations()[0].id, id);
            assert_eq!(model.active_id(), Some(id.as_str()));
        }
        // 51 creates plus the bootstrap conversation: cap holds and the
        // oldest (bootstrap, id-1) is gone.
        assert_eq!(model.conversations().len(), 50);
        assert!(!model.conversations().iter().any(|c| c.id == "id-1"));
    }

    #[test]
    fn set_active_moves_pointer_and_ignores_stale_ids() {
        let mut model = fresh_model();
        let first = model.conversations()[0].id.clone();
        model.create(None);

        assert!(model.set_active(&first));
        assert_eq!(model.active_id(), Some(first.as_str()));

        assert!(!model.set_active("no-such-id"));
        assert_eq!(model.active_id(), Some(first.as_str()));
    }

    #[test]
    fn rename_sets_trimmed_title_and_bumps_updated_at() {
        let mut model = fresh_model();
        let id = model.conversations()[0].id.clone();
        let before = model.conversations()[0].updated_at;

        model.rename(&id, "  Plans for Friday  ");
        let convo = &model.conversations()[0];
        assert_eq!(convo.title, "Plans for Friday");
        assert!(convo.updated_at >= before);
    }

    #[test]
    fn rename_with_blank_title_keeps_prior_title() {
        let mut model = fresh_model();
        let id = model.conversations()[0].id.clone();
        model.rename(&id, "Kept");
        model.rename(&id, "   ");
        assert_eq!(model.conversations()[0].title, "Kept");
    }

    #[test]
    fn rename_of_absent_id_is_a_no_op() {
        let mut model = fresh_model();
        model.rename("no-such-id", "ghost");
        assert_eq!(model.conversations()[0].title, DEFAULT_TITLE);
    }

    #[test]
    fn delete_of_inactive_conversation_keeps_active_pointer() {
        let mut model = fresh_model();
        let first = model.conversations()[0].id.clone();
        let second = model.create(None);

        assert!(model.delete(&first));
        assert_eq!(model.active_id(), Some(second.as_str()));
        assert_eq!(model.conversations().len(), 1);
    }

    #[test]
    fn delete_of_active_conversation_reassigns_to_position_zero() {
        let mut model = fresh_model();
        let second = model.create(None);
        let third = model.create(None);

        assert!(model.delete(&third));
        assert_eq!(model.active_id(), Some(second.as_str()));
        assert!(
            model
                .conversations()
                .iter()
                .any(|c| Some(c.id.as_str()) == model.active_id())
        );
    }

    #[test]
    fn deleting_the_last_conversation_creates_a_replacement() {
        let slot = Arc::new(MemorySlot::default());
        let mut model = model_with(Arc::clone(&slot) as Arc<dyn StateSlot>, 50);
        let only = model.conversations()[0].id.clone();

        assert!(model.delete(&only));
        assert_eq!(model.conversations().len(), 1);
        let replacement = &model.conversations()[0];
        assert_ne!(replacement.id, only);
        assert_eq!(replacement.title, DEFAULT_TITLE);
        assert_eq!(model.active_id(), Some(replacement.id.as_str()));

        // The delete persisted the replacement, not the deleted state.
        let raw = slot.snapshot().unwrap();
        assert!(raw.contains(&replacement.id));
        assert!(!raw.contains(&only));
    }

    #[test]
    fn delete_of_absent_id_is_a_no_op() {
        let mut model = fresh_model();
        assert!(!model.delete("no-such-id"));
        assert_eq!(model.conversations().len(), 1);
    }

    #[test]
    fn append_sets_title_from_first_user_message_only() {
        let mut model = fresh_model();
        model.append_message(Role::User, "  hello   world, this is   a test  ");
        assert_eq!(model.conversations()[0].title, "hello world, this is a test");

        model.append_message(Role::User, "second message");
        assert_eq!(model.conversations()[0].title, "hello world, this is a test");
    }

    #[test]
    fn assistant_messages_never_set_the_title() {
        let mut model = fresh_model();
        model.append_message(Role::Assistant, "greetings");
        assert_eq!(model.conversations()[0].title, DEFAULT_TITLE);

        // The next user message still claims the sentinel.
        model.append_message(Role::User, "real question");
        assert_eq!(model.conversations()[0].title, "real question");
    }

    #[test]
    fn append_with_blank_text_keeps_sentinel_title() {
        let mut model = fresh_model();
        model.append_message(Role::User, "   ");
        assert_eq!(model.conversations()[0].title, DEFAULT_TITLE);
    }

    #[test]
    fn append_bumps_updated_at_and_keeps_order() {
        let mut model = fresh_model();
        model.append_message(Role::User, "one");
        model.append_message(Role::Assistant, "two");
        model.append_message(Role::User, "three");

        let messages = model.active_messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].text, "one");
        assert_eq!(messages[1].text, "two");
        assert_eq!(messages[2].text, "three");
        assert!(messages[0].ts <= messages[1].ts && messages[1].ts <= messages[2].ts);
        assert!(model.conversations()[0].updated_at >= messages[2].ts);
    }

    #[test]
    fn operations_survive_a_failing_slot() {
        let mut model = model_with(Arc::new(FailingSlot), 50);
        let id = model.create(Some("unsaved"));
        model.append_message(Role::User, "still here");
        model.rename(&id, "renamed anyway");

        assert_eq!(model.conversations()[0].title, "renamed anyway");
        assert_eq!(model.active_messages().len(), 1);
    }

    #[test]
    fn bootstrap_truncates_an_overfull_slot() {
        let slot: Arc<dyn StateSlot> = Arc::new(MemorySlot::default());
        {
            let mut model = model_with(Arc::clone(&slot), 50);
            for _ in 0..9 {
                model.create(None);
            }
        }
        let model = model_with(slot, 5);
        assert_eq!(model.conversations().len(), 5);
    }
}
