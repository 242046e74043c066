//! # Message Store
//!
//! In-memory ordered collection of messages, newest first.
//!
//! Only two mutations exist: `append` (insert at the head) and `remove`
//! (filter by id). Removing an id that isn't there is not an error.

use crate::core::message::{Message, MessageId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageStore {
    /// Newest first. Index 0 is the most recent message.
    messages: Vec<Message>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from messages already ordered newest first.
    pub fn from_newest_first(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Inserts at the head of the visible order.
    pub fn append(&mut self, message: Message) {
        self.messages.insert(0, message);
    }

    /// Removes the message with `id`. Returns the removed message, if any.
    pub fn remove(&mut self, id: &MessageId) -> Option<Message> {
        let index = self.position(id)?;
        Some(self.messages.remove(index))
    }

    pub fn find_by_id(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id() == id)
    }

    pub fn position(&self, id: &MessageId) -> Option<usize> {
        self.messages.iter().position(|m| m.id() == id)
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    /// Iterates newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::demo_conversation;

    #[test]
    fn append_inserts_at_head() {
        let mut store = MessageStore::new();
        store.append(Message::text("first"));
        store.append(Message::text("second"));
        let texts: Vec<_> = store
            .iter()
            .map(|m| match m {
                Message::Text { text, .. } => text.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(texts, vec!["second", "first"]);
    }

    #[test]
    fn append_then_remove_restores_original() {
        let original = MessageStore::from_newest_first(demo_conversation());
        let mut store = original.clone();
        let msg = Message::text("temporary");
        let id = msg.id().clone();
        store.append(msg);
        assert_eq!(store.len(), original.len() + 1);

        let removed = store.remove(&id);
        assert!(removed.is_some());
        assert_eq!(store, original);
    }

    #[test]
    fn remove_missing_id_is_noop() {
        let original = MessageStore::from_newest_first(demo_conversation());
        let mut store = original.clone();
        assert!(store.remove(&MessageId::from("not-there")).is_none());
        assert_eq!(store, original);
    }

    #[test]
    fn find_by_id() {
        let store = MessageStore::from_newest_first(demo_conversation());
        let id = store.get(2).unwrap().id().clone();
        assert_eq!(store.find_by_id(&id).map(|m| m.id()), Some(&id));
        assert!(store.find_by_id(&MessageId::from("nope")).is_none());
    }

    #[test]
    fn empty_store() {
        let store = MessageStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.get(0).is_none());
    }
}
