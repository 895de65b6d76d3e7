use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::DomainError;

/// Session configuration, explicitly constructed and passed to the services.
/// API keys are not part of this object; the provider adapters read them
/// from the process environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub index_path: PathBuf,
    pub prompts: PromptsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub max_chars: usize,
    pub overlap_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub system: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            embedding: EmbeddingConfig::default(),
            chunking: ChunkingConfig::default(),
            retrieval: RetrievalConfig::default(),
            index_path: PathBuf::from("docqa-index.json"),
            prompts: PromptsConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-5-sonnet-latest".to_string(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: 1000,
            overlap_chars: 200,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            system: "You answer questions using only the provided context. \
                     If the context does not contain the answer, say so."
                .to_string(),
        }
    }
}

impl AppConfig {
    /// Loads config from an optional YAML file over the built-in defaults,
    /// then validates.
    pub fn load(path: Option<&Path>) -> Result<Self, DomainError> {
        let config = match path {
            Some(p) => {
                let text = std::fs::read_to_string(p).map_err(|e| {
                    DomainError::validation(format!("cannot read config {}: {e}", p.display()))
                })?;
                serde_yaml::from_str(&text).map_err(|e| {
                    DomainError::validation(format!("invalid config {}: {e}", p.display()))
                })?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.chunking.max_chars == 0 {
            return Err(DomainError::validation("chunking.max_chars must be > 0"));
        }
        if self.chunking.overlap_chars >= self.chunking.max_chars {
            return Err(DomainError::validation(format!(
                "chunking.overlap_chars ({}) must be smaller than chunking.max_chars ({})",
                self.chunking.overlap_chars, self.chunking.max_chars
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(DomainError::validation("retrieval.top_k must be > 0"));
        }
        Ok(())
    }
}
