use fastembed::{
    EmbeddingModel, InitOptions, InitOptionsUserDefined, TextEmbedding, TokenizerFiles,
    UserDefinedEmbeddingModel,
};
use std::path::Path;

use crate::error::{Error, Result};

pub struct EmbeddingGenerator {
    model: TextEmbedding,
}

fn read_model_file(model_dir: &Path, name: &str) -> Result<Vec<u8>> {
    std::fs::read(model_dir.join(name))
        .map_err(|e| Error::Embedding(format!("Failed to read {}: {}", name, e)))
}

impl EmbeddingGenerator {
    /// Loads the model from `model_dir` when given, otherwise fastembed's
    /// BGE-small-en-v1.5 (downloaded into fastembed's cache on first use).
    pub async fn new(model_dir: Option<&Path>) -> Result<Self> {
        let model = match model_dir {
            Some(dir) => Self::from_local_files(dir)?,
            None => {
                tracing::info!("Initializing bundled embedding model (BGE-small-en-v1.5)...");
                TextEmbedding::try_new(InitOptions {
                    model_name: EmbeddingModel::BGESmallENV15,
                    ..Default::default()
                })
                .map_err(|e| Error::Embedding(format!("Failed to initialize embedding model: {}", e)))?
            }
        };

        tracing::info!("Embedding model initialized successfully");
        Ok(Self { model })
    }

    fn from_local_files(model_dir: &Path) -> Result<TextEmbedding> {
        tracing::info!("Initializing embedding model from {}", model_dir.display());

        if !model_dir.exists() {
            return Err(Error::Embedding(format!(
                "Model directory not found: {}",
                model_dir.display()
            )));
        }

        let user_model = UserDefinedEmbeddingModel {
            onnx_file: read_model_file(model_dir, "model.onnx")?,
            tokenizer_files: TokenizerFiles {
                tokenizer_file: read_model_file(model_dir, "tokenizer.json")?,
                config_file: read_model_file(model_dir, "config.json")?,
                special_tokens_map_file: read_model_file(model_dir, "special_tokens_map.json")?,
                tokenizer_config_file: read_model_file(model_dir, "tokenizer_config.json")?,
            },
        };

        TextEmbedding::try_new_from_user_defined(user_model, InitOptionsUserDefined::default())
            .map_err(|e| Error::Embedding(format!("Failed to initialize embedding model: {}", e)))
    }

    pub fn generate(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        self.model
            .embed(texts, None)
            .map_err(|e| Error::Embedding(e.to_string()))
    }

    pub fn generate_single(&self, text: &str) -> Result<Vec<f32>> {
        self.generate(vec![text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("model returned no embedding".to_string()))
    }

    /// Vector width, measured by embedding a probe string.
    pub fn dimension(&self) -> Result<u64> {
        Ok(self.generate_single("dimension probe")?.len() as u64)
    }
}
