pub mod config;
pub mod embedding;
pub mod llm;
pub mod loader;
pub mod vector_store;

pub use config::AppConfig;
pub use embedding::OpenAiEmbedding;
pub use llm::AnthropicLlm;
pub use vector_store::LocalVectorStore;
