use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a document's text came from. Page is only set for formats
/// where the extractor reports one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub path: PathBuf,
    pub page: Option<usize>,
}

impl SourceRef {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            page: None,
        }
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }
}

/// A loaded document. Immutable once constructed; chunking reads from it
/// but never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub source: SourceRef,
    pub text: String,
    pub loaded_at: DateTime<Utc>,
}

impl Document {
    pub fn new(source: SourceRef, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            text: text.into(),
            loaded_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: Uuid,
    pub document_id: Uuid,
    pub content: String,
    pub chunk_index: usize,
    pub source: SourceRef,
}

impl DocumentChunk {
    pub fn new(
        document_id: Uuid,
        content: impl Into<String>,
        chunk_index: usize,
        source: SourceRef,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            content: content.into(),
            chunk_index,
            source,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: DocumentChunk,
    pub score: f32,
}
