mod ingest;
mod qa;
mod retrieval;

#[cfg(test)]
pub(crate) mod test_support;

pub use ingest::IngestService;
pub use qa::{Answer, QaPrompts, QaService};
pub use retrieval::RetrievalService;
