//! Hand-rolled port implementations for service tests.

use async_trait::async_trait;

use crate::domain::{ports::EmbeddingService, ports::LlmService, DomainError, Embedding};

/// Deterministic embedding: folds the text's bytes into a fixed-dimension
/// vector. Same text always maps to the same vector.
pub struct StubEmbedding {
    dimension: usize,
}

impl StubEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn vector(&self, text: &str) -> Embedding {
        let mut v = vec![0.0f32; self.dimension];
        for (i, b) in text.bytes().enumerate() {
            v[i % self.dimension] += b as f32;
        }
        Embedding::new(v)
    }
}

#[async_trait]
impl EmbeddingService for StubEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        Ok(self.vector(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Embedding service that fails whenever a text contains the given marker,
/// delegating to [`StubEmbedding`] otherwise. For abort-on-failure tests.
pub struct PoisonEmbedding {
    inner: StubEmbedding,
    marker: &'static str,
}

impl PoisonEmbedding {
    pub fn new(dimension: usize, marker: &'static str) -> Self {
        Self {
            inner: StubEmbedding::new(dimension),
            marker,
        }
    }
}

#[async_trait]
impl EmbeddingService for PoisonEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        if text.contains(self.marker) {
            return Err(DomainError::external("embedding unavailable"));
        }
        self.inner.embed(text).await
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        if texts.iter().any(|t| t.contains(self.marker)) {
            return Err(DomainError::external("embedding unavailable"));
        }
        self.inner.embed_batch(texts).await
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}

/// Completion service that answers with the prompt it was given.
pub struct EchoLlm;

#[async_trait]
impl LlmService for EchoLlm {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        Ok(prompt.to_string())
    }

    async fn complete_with_system(
        &self,
        _system: &str,
        prompt: &str,
    ) -> Result<String, DomainError> {
        Ok(prompt.to_string())
    }
}

/// Completion service that always fails, for error-path tests.
pub struct FailingLlm;

#[async_trait]
impl LlmService for FailingLlm {
    async fn complete(&self, _prompt: &str) -> Result<String, DomainError> {
        Err(DomainError::external("completion unavailable"))
    }

    async fn complete_with_system(
        &self,
        _system: &str,
        _prompt: &str,
    ) -> Result<String, DomainError> {
        Err(DomainError::external("completion unavailable"))
    }
}
