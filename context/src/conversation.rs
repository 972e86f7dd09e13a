//! Conversation state: the exact history sent to the provider.
//!
//! Only user/assistant messages can enter. Assistant replies are added
//! together with the user message that produced them, once the stream has
//! finished and produced text.

use pollen_types::{Message, NonEmptyString, Role};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("only user messages can open an exchange (got {0:?})")]
pub struct NotAUserMessage(pub Role);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored messages, dropping any that may not be sent.
    #[must_use]
    pub fn from_messages(messages: Vec<Message>) -> Self {
        let before = messages.len();
        let messages: Vec<Message> = messages
            .into_iter()
            .filter(|m| m.role().is_conversational())
            .collect();
        if messages.len() != before {
            tracing::warn!(
                dropped = before - messages.len(),
                "Dropped non-conversational messages from stored history"
            );
        }
        Self { messages }
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The messages of the next request: history followed by `user`.
    pub fn outgoing<'a>(&'a self, user: &'a Message) -> impl Iterator<Item = &'a Message> {
        self.messages.iter().chain(std::iter::once(user))
    }

    /// Record a finished exchange.
    pub fn push_exchange(
        &mut self,
        user: Message,
        reply: Option<NonEmptyString>,
    ) -> Result<(), NotAUserMessage> {
        if user.role() != Role::User {
            return Err(NotAUserMessage(user.role()));
        }
        self.messages.push(user);
        if let Some(reply) = reply {
            self.messages.push(Message::assistant(reply));
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use pollen_types::{Message, NonEmptyString, Role};

    use super::{Conversation, NotAUserMessage};

    #[test]
    fn outgoing_is_history_plus_new_message() {
        let mut conversation = Conversation::new();
        conversation
            .push_exchange(
                Message::user("hi"),
                Some(NonEmptyString::new("hello").unwrap()),
            )
            .unwrap();

        let next = Message::user("again");
        let outgoing: Vec<_> = conversation
            .outgoing(&next)
            .map(|m| m.content().to_string())
            .collect();
        assert_eq!(outgoing, vec!["hi", "hello", "again"]);
    }

    #[test]
    fn exchange_without_reply_keeps_user_message() {
        let mut conversation = Conversation::new();
        conversation.push_exchange(Message::user("q"), None).unwrap();
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0].role(), Role::User);
    }

    #[test]
    fn rejects_non_user_openers() {
        let mut conversation = Conversation::new();
        let err = conversation
            .push_exchange(Message::error("boom"), None)
            .unwrap_err();
        assert_eq!(err, NotAUserMessage(Role::Error));
        assert!(conversation.is_empty());
    }

    #[test]
    fn stored_error_messages_are_dropped() {
        let conversation = Conversation::from_messages(vec![
            Message::user("a"),
            Message::error("x"),
            Message::assistant(NonEmptyString::new("b").unwrap()),
        ]);
        assert_eq!(conversation.len(), 2);
        assert!(
            conversation
                .messages()
                .iter()
                .all(|m| m.role().is_conversational())
        );
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut conversation = Conversation::new();
        conversation.push_exchange(Message::user("hi"), None).unwrap();
        let json = serde_json::to_value(&conversation).unwrap();
        assert_eq!(json, serde_json::json!([{"role": "user", "content": "hi"}]));
    }
}
