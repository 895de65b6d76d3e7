//! Retrieval-augmented question answering over a directory of local
//! text and PDF files.
//!
//! The flow is ingest -> chunk -> embed -> index -> retrieve-and-answer
//! with conversational memory. Domain entities and ports live in
//! [`domain`], orchestration in [`application`], and the adapters for the
//! external embedding/completion services, the persisted index, and file
//! loading in [`infrastructure`].

pub mod application;
pub mod domain;
pub mod infrastructure;
