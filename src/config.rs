use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::Result;

/// How `/query` turns retrieved context into an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationMode {
    /// Echo the retrieved context verbatim.
    Mock,
    /// Ask the generation model, using this model name.
    Model(String),
}

impl GenerationMode {
    pub fn label(&self) -> &'static str {
        match self {
            GenerationMode::Mock => "mock",
            GenerationMode::Model(_) => "model",
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    bind_addr: String,
    qdrant_url: String,
    collection_name: String,
    ollama_url: String,
    llm_model: String,
    llm_timeout_secs: u64,
    embedding_model_dir: Option<String>,
    use_mock_llm: Option<String>,
}

/// Process-wide settings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: String,
    pub qdrant_url: String,
    pub collection_name: String,
    pub ollama_url: String,
    pub llm_timeout: Duration,
    pub embedding_model_dir: Option<PathBuf>,
    pub mode: GenerationMode,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::load(Environment::default())
    }

    fn load(env: Environment) -> Result<Self> {
        let raw: RawSettings = Config::builder()
            .set_default("bind_addr", "0.0.0.0:8000")?
            .set_default("qdrant_url", "http://localhost:6334")?
            .set_default("collection_name", "docs")?
            .set_default("ollama_url", "http://localhost:11434")?
            .set_default("llm_model", "tinyllama")?
            .set_default("llm_timeout_secs", 120)?
            .add_source(env)
            .build()?
            .try_deserialize()?;

        // 厳密に "1" のときだけモック
        let mode = match raw.use_mock_llm.as_deref() {
            Some("1") => GenerationMode::Mock,
            _ => GenerationMode::Model(raw.llm_model),
        };

        Ok(Self {
            bind_addr: raw.bind_addr,
            qdrant_url: raw.qdrant_url,
            collection_name: raw.collection_name,
            ollama_url: raw.ollama_url,
            llm_timeout: Duration::from_secs(raw.llm_timeout_secs),
            embedding_model_dir: raw
                .embedding_model_dir
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            mode,
        })
    }
}
