use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    chunk_text,
    ports::{EmbeddingService, VectorStore},
    Document, DocumentChunk, DomainError,
};

/// Drives the ingestion pipeline: chunk each document, embed the chunks in
/// batch, and upsert them into the vector store.
pub struct IngestService {
    embedding: Arc<dyn EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
    max_chars: usize,
    overlap: usize,
}

impl IngestService {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        vector_store: Arc<dyn VectorStore>,
        max_chars: usize,
        overlap: usize,
    ) -> Self {
        Self {
            embedding,
            vector_store,
            max_chars,
            overlap,
        }
    }

    #[instrument(skip(self, doc), fields(document_id = %doc.id, source = %doc.source.path.display()))]
    pub async fn ingest_document(&self, doc: &Document) -> Result<Vec<DocumentChunk>, DomainError> {
        let chunks = chunk_text(doc.id, &doc.text, self.max_chars, self.overlap, &doc.source);
        if chunks.is_empty() {
            tracing::warn!("document produced no chunks");
            return Ok(chunks);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let embeddings = self.embedding.embed_batch(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(DomainError::internal(format!(
                "embedding service returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        for (chunk, embedding) in chunks.iter().zip(embeddings.iter()) {
            self.vector_store.upsert(chunk, embedding).await?;
        }

        tracing::info!(chunks = chunks.len(), "document indexed");
        Ok(chunks)
    }

    /// Ingests every document, aborting on the first failure. Returns the
    /// total number of chunks indexed.
    #[instrument(skip(self, docs), fields(documents = docs.len()))]
    pub async fn ingest_all(&self, docs: &[Document]) -> Result<usize, DomainError> {
        let mut total = 0;
        for doc in docs {
            total += self.ingest_document(doc).await?.len();
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{PoisonEmbedding, StubEmbedding};
    use crate::domain::SourceRef;
    use crate::infrastructure::LocalVectorStore;

    #[tokio::test]
    async fn test_ingest_indexes_every_chunk() {
        let store = Arc::new(LocalVectorStore::new());
        let service = IngestService::new(Arc::new(StubEmbedding::new(3)), store.clone(), 4, 2);

        let doc = Document::new(SourceRef::file("a.txt"), "abcdefghij");
        let chunks = service.ingest_document(&doc).await.unwrap();

        assert_eq!(chunks.len(), 4);
        assert_eq!(store.len().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_ingest_all_aborts_on_first_failure() {
        let store = Arc::new(LocalVectorStore::new());
        let embedding = Arc::new(PoisonEmbedding::new(3, "unembeddable"));
        let service = IngestService::new(embedding, store.clone(), 100, 10);

        let docs = vec![
            Document::new(SourceRef::file("good.txt"), "plain text that embeds fine"),
            Document::new(SourceRef::file("bad.txt"), "this one is unembeddable"),
            Document::new(SourceRef::file("later.txt"), "never reached"),
        ];

        let err = service.ingest_all(&docs).await.unwrap_err();
        assert!(matches!(err, DomainError::ExternalService(_)));
        // The first document's chunks stay indexed; nothing after the
        // failing document is touched.
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ingest_empty_document_is_noop() {
        let store = Arc::new(LocalVectorStore::new());
        let service = IngestService::new(Arc::new(StubEmbedding::new(3)), store.clone(), 100, 10);

        let doc = Document::new(SourceRef::file("empty.txt"), "");
        let chunks = service.ingest_document(&doc).await.unwrap();

        assert!(chunks.is_empty());
        assert_eq!(store.len().await.unwrap(), 0);
    }
}
