use std::sync::Arc;
use tracing::instrument;

use crate::application::services::RetrievalService;
use crate::domain::{ports::LlmService, Conversation, DomainError, SearchResult};

/// Prompt text the QA loop wraps around retrieved context.
#[derive(Debug, Clone)]
pub struct QaPrompts {
    pub system: String,
}

impl Default for QaPrompts {
    fn default() -> Self {
        Self {
            system: "You answer questions using only the provided context. \
                     If the context does not contain the answer, say so."
                .to_string(),
        }
    }
}

/// The retrieval-augmented QA loop: fetch the top-K nearest chunks for the
/// question, build a prompt from context + history + question, and call the
/// completion service. The conversation is only appended to after the
/// completion succeeds; any failure propagates with history untouched.
pub struct QaService {
    retrieval: Arc<RetrievalService>,
    llm: Arc<dyn LlmService>,
    prompts: QaPrompts,
}

/// An answer together with the chunks that grounded it.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<SearchResult>,
}

impl QaService {
    pub fn new(retrieval: Arc<RetrievalService>, llm: Arc<dyn LlmService>, prompts: QaPrompts) -> Self {
        Self {
            retrieval,
            llm,
            prompts,
        }
    }

    #[instrument(skip(self, conversation), fields(history_len = conversation.len()))]
    pub async fn ask(
        &self,
        conversation: &mut Conversation,
        question: &str,
    ) -> Result<Answer, DomainError> {
        let sources = self.retrieval.retrieve(question).await?;

        let prompt = build_prompt(question, &sources, conversation);
        let text = self
            .llm
            .complete_with_system(&self.prompts.system, &prompt)
            .await?;

        conversation.push(question, text.clone());
        Ok(Answer { text, sources })
    }
}

fn build_prompt(question: &str, sources: &[SearchResult], conversation: &Conversation) -> String {
    let mut prompt = String::new();

    if !sources.is_empty() {
        let context = sources
            .iter()
            .enumerate()
            .map(|(i, r)| format!("[{}] {}", i + 1, r.chunk.content))
            .collect::<Vec<_>>()
            .join("\n\n");
        prompt.push_str("Context:\n");
        prompt.push_str(&context);
        prompt.push_str("\n\n");
    }

    if !conversation.is_empty() {
        let history = conversation
            .exchanges()
            .iter()
            .map(|e| format!("User: {}\nAssistant: {}", e.question, e.answer))
            .collect::<Vec<_>>()
            .join("\n");
        prompt.push_str("Previous conversation:\n");
        prompt.push_str(&history);
        prompt.push_str("\n\n");
    }

    prompt.push_str("Question: ");
    prompt.push_str(question);
    prompt
}
