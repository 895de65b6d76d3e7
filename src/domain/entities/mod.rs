mod conversation;
mod document;
mod embedding;

pub use conversation::{Conversation, Exchange};
pub use document::{Document, DocumentChunk, SearchResult, SourceRef};
pub use embedding::Embedding;
