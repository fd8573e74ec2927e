//! Multi-turn message composer
//!
//! The user writes the source as one or more turns; they are sent to the
//! backend as a single space-joined text.

use uuid::Uuid;

use crate::shared::types::Message;

#[derive(Debug, Clone)]
pub struct Composer {
    messages: Vec<Message>,
}

impl Composer {
    /// A composer always holds at least one (possibly empty) turn.
    pub fn new() -> Self {
        Self {
            messages: vec![Self::blank()],
        }
    }

    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let messages: Vec<Message> = texts
            .into_iter()
            .map(|text| Message {
                id: Uuid::new_v4().to_string(),
                text: text.into(),
            })
            .collect();
        if messages.is_empty() {
            Self::new()
        } else {
            Self { messages }
        }
    }

    fn blank() -> Message {
        Message {
            id: Uuid::new_v4().to_string(),
            text: String::new(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Append an empty turn and return its id.
    pub fn add_message(&mut self) -> String {
        let message = Self::blank();
        let id = message.id.clone();
        self.messages.push(message);
        id
    }

    pub fn update(&mut self, id: &str, text: impl Into<String>) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Remove a turn. The last remaining turn cannot be removed.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.messages.len() <= 1 {
            return false;
        }
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        self.messages.len() != before
    }

    /// Text of the turn being edited, used for language detection.
    pub fn current_text(&self) -> &str {
        self.messages.last().map(|m| m.text.as_str()).unwrap_or_default()
    }

    pub fn compose(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }

    pub fn clear(&mut self) {
        self.messages = vec![Self::blank()];
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}
