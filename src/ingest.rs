use std::path::Path;

use crate::error::{Error, Result};
use crate::models::Document;
use crate::rag::DocumentStore;

/// Stores the whole file as one document under `id`, replacing any earlier
/// document with that id, and returns the record as read back from the store.
pub async fn ingest_file(store: &dyn DocumentStore, path: &Path, id: &str) -> Result<Document> {
    let text = tokio::fs::read_to_string(path).await?;
    tracing::info!("Read {} bytes from {}", text.len(), path.display());

    store.add(id, &text).await?;

    store
        .get(&[id.to_string()])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| Error::Store(format!("document '{}' missing after insert", id)))
}
