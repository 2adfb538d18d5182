pub mod embeddings;
pub mod vector_store;

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use self::embeddings::EmbeddingGenerator;
use self::vector_store::VectorStore;
use crate::error::{Error, Result};
use crate::models::Document;

/// Similarity-searchable document collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert under `id`; an existing document with the same id is replaced.
    async fn add(&self, id: &str, text: &str) -> Result<()>;

    /// Nearest documents to `text`, best first.
    async fn query(&self, text: &str, top_k: u64) -> Result<Vec<Document>>;

    async fn get(&self, ids: &[String]) -> Result<Vec<Document>>;

    /// Removing an id that is not stored is not an error.
    async fn delete(&self, ids: &[String]) -> Result<()>;

    async fn delete_all(&self) -> Result<()>;
}

/// Runs CPU-bound work on tokio's blocking pool.
async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| Error::Embedding(format!("embedding task failed: {}", e)))?
}

/// fastembed embeddings over a Qdrant collection.
pub struct RAGEngine {
    embeddings: Arc<EmbeddingGenerator>,
    vector_store: VectorStore,
}

impl RAGEngine {
    pub async fn new(
        qdrant_url: &str,
        collection_name: &str,
        model_dir: Option<&Path>,
    ) -> Result<Self> {
        let embeddings = EmbeddingGenerator::new(model_dir).await?;
        let dimension = embeddings.dimension()?;
        let vector_store = VectorStore::new(qdrant_url, collection_name, dimension).await?;

        Ok(Self {
            embeddings: Arc::new(embeddings),
            vector_store,
        })
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = Arc::clone(&self.embeddings);
        let text = text.to_string();
        run_blocking(move || embeddings.generate_single(&text)).await
    }
}

#[async_trait]
impl DocumentStore for RAGEngine {
    async fn add(&self, id: &str, text: &str) -> Result<()> {
        let embedding = self.embed(text).await?;
        self.vector_store.add_document(id, text, embedding).await
    }

    async fn query(&self, text: &str, top_k: u64) -> Result<Vec<Document>> {
        let query_embedding = self.embed(text).await?;
        self.vector_store.search(query_embedding, top_k).await
    }

    async fn get(&self, ids: &[String]) -> Result<Vec<Document>> {
        self.vector_store.get_documents(ids).await
    }

    async fn delete(&self, ids: &[String]) -> Result<()> {
        self.vector_store.delete_documents(ids).await
    }

    async fn delete_all(&self) -> Result<()> {
        let ids = self.vector_store.scroll_all_point_ids().await?;
        tracing::info!(
            "Deleting {} documents from '{}'",
            ids.len(),
            self.vector_store.collection_name()
        );
        self.vector_store.delete_documents(&ids).await
    }
}
