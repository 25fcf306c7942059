use mural_shared::messages::MessageResponse;
use uuid::Uuid;

///
/// The newest-first view of the guestbook a session renders.
///
/// Two sources feed it: the baseline load replaces it wholesale, live
/// broadcast events are merged in one at a time. Merging is keyed by id, so
/// an event for a message the baseline already contained (or one the session
/// inserted optimistically after its own submit) leaves the view unchanged.
///
#[derive(Debug, Default)]
pub struct MessageView {
    messages: Vec<MessageResponse>,
}

impl MessageView {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    ///
    /// Replace the whole view with a freshly fetched baseline.
    ///
    pub fn replace(&mut self, baseline: Vec<MessageResponse>) {
        self.messages = baseline;
    }

    ///
    /// Prepend a message, unless one with the same id is already present.
    ///
    /// Returns whether the view changed.
    ///
    pub fn insert(&mut self, message: MessageResponse) -> bool {
        if self.contains(message.id) {
            return false;
        }

        self.messages.insert(0, message);

        true
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.messages.iter().any(|message| message.id == id)
    }

    pub fn messages(&self) -> &[MessageResponse] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
