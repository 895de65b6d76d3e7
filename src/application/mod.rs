//! Application layer - use cases orchestrating domain logic over the ports.
//!
//! Services depend on domain ports (traits) rather than concrete adapters.

pub mod services;

pub use services::{Answer, IngestService, QaPrompts, QaService, RetrievalService};
