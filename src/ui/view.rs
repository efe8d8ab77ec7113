use crate::history::{Conversation, Message};

/// The two independently scheduled render targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    ConversationList,
    Messages,
}

/// Render target consumed by the core. The core only ever writes through
/// this interface; it never reads from or owns the underlying widgets.
///
/// Both `render_*` calls fully replace the target's content from current
/// state (re-synchronization, not diffing). Implementations should scroll
/// the message view to the end after `render_messages` and after each
/// incremental append.
pub trait ChatView: Send {
    fn render_conversation_list(&mut self, conversations: &[Conversation], active_id: Option<&str>);
    fn render_messages(&mut self, messages: &[Message]);
    /// Replace the in-progress reply bubble with a longer prefix of the
    /// streaming text.
    fn append_message_incrementally(&mut self, partial_text: &str);
}

#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingView {
    pub(crate) list_renders: Vec<(Vec<String>, Option<String>)>,
    pub(crate) message_renders: Vec<Vec<String>>,
    pub(crate) partials: Vec<String>,
}

#[cfg(test)]
impl ChatView for RecordingView {
    fn render_conversation_list(
        &mut self,
        conversations: &[Conversation],
        active_id: Option<&str>,
    ) {
        self.list_renders.push((
            conversations.iter().map(|c| c.title.clone()).collect(),
            active_id.map(str::to_string),
        ));
    }

    fn render_messages(&mut self, messages: &[Message]) {
        self.message_renders
            .push(messages.iter().map(|m| m.text.clone()).collect());
    }

    fn append_message_incrementally(&mut self, partial_text: &str) {
        self.partials.push(partial_text.to_string());
    }
}
