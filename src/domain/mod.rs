pub mod chunker;
pub mod entities;
pub mod errors;
pub mod ports;

pub use chunker::chunk_text;
pub use entities::*;
pub use errors::{DomainError, Result};
