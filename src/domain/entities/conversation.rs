use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One completed question/answer cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
    pub asked_at: DateTime<Utc>,
}

impl Exchange {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            asked_at: Utc::now(),
        }
    }
}

/// Append-only conversation history for one session. Exchanges are only
/// recorded after a completion succeeds, so a failed call never leaves a
/// half-written entry behind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    exchanges: Vec<Exchange>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            exchanges: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn push(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.exchanges.push(Exchange::new(question, answer));
        self.updated_at = Utc::now();
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut conv = Conversation::new();
        conv.push("first?", "one");
        conv.push("second?", "two");
        conv.push("third?", "three");

        assert_eq!(conv.len(), 3);
        let questions: Vec<_> = conv.exchanges().iter().map(|e| e.question.as_str()).collect();
        assert_eq!(questions, vec!["first?", "second?", "third?"]);
    }

    #[test]
    fn test_new_conversation_is_empty() {
        assert!(Conversation::new().is_empty());
    }
}
