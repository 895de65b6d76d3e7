use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{ports::VectorStore, DocumentChunk, DomainError, Embedding, SearchResult};

/// In-memory cosine-similarity index with a serialized snapshot on disk.
/// Ingestion rebuilds it wholesale and saves; query sessions load it
/// read-only. The on-disk layout is whatever serde_json produces for the
/// entry list, not a stable format.
#[derive(Debug)]
pub struct LocalVectorStore {
    entries: RwLock<Vec<(DocumentChunk, Embedding)>>,
}

impl LocalVectorStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn load(path: &Path) -> Result<Self, DomainError> {
        let file = File::open(path).map_err(|e| {
            DomainError::not_found(format!(
                "no index at {} ({e}); run ingest first",
                path.display()
            ))
        })?;
        let entries: Vec<(DocumentChunk, Embedding)> =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                DomainError::internal(format!("corrupt index at {}: {e}", path.display()))
            })?;

        Ok(Self {
            entries: RwLock::new(entries),
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), DomainError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DomainError::internal(e.to_string()))?;
            }
        }

        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        // Write a sibling temp file and rename it over the target, so a
        // failure mid-write never truncates an existing index.
        let tmp = path.with_extension("tmp");
        if let Err(e) = write_snapshot(&tmp, &entries) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
        std::fs::rename(&tmp, path).map_err(|e| DomainError::internal(e.to_string()))?;

        Ok(())
    }
}

fn write_snapshot(
    path: &Path,
    entries: &[(DocumentChunk, Embedding)],
) -> Result<(), DomainError> {
    let file = File::create(path).map_err(|e| DomainError::internal(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, entries)
        .map_err(|e| DomainError::internal(e.to_string()))?;
    std::io::Write::flush(&mut writer).map_err(|e| DomainError::internal(e.to_string()))?;
    Ok(())
}

impl Default for LocalVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    async fn upsert(
        &self,
        chunk: &DocumentChunk,
        embedding: &Embedding,
    ) -> Result<(), DomainError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        entries.retain(|(c, _)| c.id != chunk.id);
        entries.push((chunk.clone(), embedding.clone()));
        Ok(())
    }

    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let mut results: Vec<SearchResult> = entries
            .iter()
            .map(|(chunk, embedding)| SearchResult {
                chunk: chunk.clone(),
                score: query.cosine_similarity(embedding),
            })
            .collect();

        // Score ties break on (document_id, chunk_index) so the same query
        // against the same index always returns the same top-K.
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.chunk.document_id.cmp(&b.chunk.document_id))
                .then_with(|| a.chunk.chunk_index.cmp(&b.chunk.chunk_index))
        });

        results.truncate(top_k);
        Ok(results)
    }

    async fn len(&self) -> Result<usize, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;
        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceRef;
    use uuid::Uuid;

    fn chunk(doc_id: Uuid, text: &str, index: usize) -> DocumentChunk {
        DocumentChunk::new(doc_id, text, index, SourceRef::file("test.txt"))
    }

    #[tokio::test]
    async fn test_upsert_and_search() {
        let store = LocalVectorStore::new();
        let doc_id = Uuid::new_v4();

        store
            .upsert(&chunk(doc_id, "content", 0), &Embedding::new(vec![1.0, 0.0, 0.0]))
            .await
            .unwrap();

        let results = store
            .search(&Embedding::new(vec![1.0, 0.0, 0.0]), 1)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert!((results[0].score - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_upsert_replaces_same_chunk() {
        let store = LocalVectorStore::new();
        let c = chunk(Uuid::new_v4(), "first", 0);

        store
            .upsert(&c, &Embedding::new(vec![1.0, 0.0]))
            .await
            .unwrap();
        store
            .upsert(&c, &Embedding::new(vec![0.0, 1.0]))
            .await
            .unwrap();

        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_search_is_deterministic_under_ties() {
        let store = LocalVectorStore::new();
        let doc_id = Uuid::nil();
        let same = Embedding::new(vec![1.0, 0.0]);

        // Insert in reverse so order of arrival cannot explain the result.
        for index in (0..5).rev() {
            store
                .upsert(&chunk(doc_id, "tied", index), &same)
                .await
                .unwrap();
        }

        let query = Embedding::new(vec![1.0, 0.0]);
        let first = store.search(&query, 3).await.unwrap();
        let second = store.search(&query, 3).await.unwrap();

        let indices: Vec<_> = first.iter().map(|r| r.chunk.chunk_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(
            indices,
            second.iter().map(|r| r.chunk.chunk_index).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        let store = LocalVectorStore::new();
        let doc_id = Uuid::new_v4();
        store
            .upsert(&chunk(doc_id, "persisted", 0), &Embedding::new(vec![0.5, 0.5]))
            .await
            .unwrap();
        store.save(&path).unwrap();

        let loaded = LocalVectorStore::load(&path).unwrap();
        let results = loaded
            .search(&Embedding::new(vec![0.5, 0.5]), 1)
            .await
            .unwrap();

        assert_eq!(results[0].chunk.content, "persisted");
        assert_eq!(results[0].chunk.document_id, doc_id);
    }

    #[tokio::test]
    async fn test_save_replaces_existing_index_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        let first = LocalVectorStore::new();
        first
            .upsert(&chunk(Uuid::new_v4(), "old", 0), &Embedding::new(vec![1.0]))
            .await
            .unwrap();
        first.save(&path).unwrap();

        let second = LocalVectorStore::new();
        second
            .upsert(&chunk(Uuid::new_v4(), "new", 0), &Embedding::new(vec![1.0]))
            .await
            .unwrap();
        second.save(&path).unwrap();

        let loaded = LocalVectorStore::load(&path).unwrap();
        let results = loaded.search(&Embedding::new(vec![1.0]), 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.content, "new");
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_load_missing_index_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalVectorStore::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
