use qdrant_client::qdrant::{
    point_id::PointIdOptions, vectors_config::Config as VectorsConfigKind, CollectionInfo,
    CreateCollectionBuilder, DeletePointsBuilder, Distance,
    GetPointsBuilder, PointId, PointStruct, PointsIdsList, ScrollPointsBuilder,
    SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::Document;

const TEXT_KEY: &str = "text";
const DOC_ID_KEY: &str = "doc_id";

/// Qdrant only takes UUID or integer point ids. UUID-shaped document ids are
/// used as-is; anything else maps to a stable UUIDv5.
pub fn point_uuid(doc_id: &str) -> String {
    match Uuid::parse_str(doc_id) {
        Ok(uuid) => uuid.to_string(),
        Err(_) => Uuid::new_v5(&Uuid::NAMESPACE_OID, doc_id.as_bytes()).to_string(),
    }
}

fn point_id(doc_id: &str) -> PointId {
    PointId {
        point_id_options: Some(PointIdOptions::Uuid(point_uuid(doc_id))),
    }
}

fn document_from_payload(payload: &HashMap<String, QdrantValue>) -> Option<Document> {
    let text = payload.get(TEXT_KEY)?.as_str()?;
    let id = payload.get(DOC_ID_KEY)?.as_str()?;
    Some(Document {
        id: id.to_string(),
        text: text.to_string(),
    })
}

/// Vector size of a collection with a single unnamed vector.
fn configured_dimension(info: &CollectionInfo) -> Option<u64> {
    let vectors = info.config.as_ref()?.params.as_ref()?.vectors_config.as_ref()?;
    match vectors.config.as_ref()? {
        VectorsConfigKind::Params(params) => Some(params.size),
        VectorsConfigKind::ParamsMap(_) => None,
    }
}

fn check_dimension(collection: &str, existing: Option<u64>, expected: u64) -> Result<()> {
    match existing {
        Some(size) if size == expected => Ok(()),
        Some(size) => Err(Error::Store(format!(
            "collection '{}' holds {}-dim vectors but the embedding model produces {}",
            collection, size, expected
        ))),
        None => Err(Error::Store(format!(
            "collection '{}' has no single unnamed vector config",
            collection
        ))),
    }
}

pub struct VectorStore {
    client: Qdrant,
    collection_name: String,
}

impl VectorStore {
    pub async fn new(url: &str, collection_name: &str, dimension: u64) -> Result<Self> {
        tracing::info!("Building Qdrant client for URL: {}", url);
        let client = Qdrant::from_url(url).build().map_err(|e| {
            tracing::error!("Qdrant client build failed: {:?}", e);
            Error::store(format!("Qdrant client build failed: {}", e))
        })?;

        let store = Self {
            client,
            collection_name: collection_name.to_string(),
        };

        store.ensure_collection(dimension).await.map_err(|e| {
            tracing::error!("Qdrant ensure_collection failed: {:?}", e);
            e
        })?;
        tracing::info!("Qdrant collection '{}' ready", store.collection_name);

        Ok(store)
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    async fn ensure_collection(&self, dimension: u64) -> Result<()> {
        if !self.client.collection_exists(&self.collection_name).await? {
            tracing::info!(
                "Creating collection '{}' ({} dims, cosine)",
                self.collection_name,
                dimension
            );
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection_name)
                        .vectors_config(VectorParamsBuilder::new(dimension, Distance::Cosine)),
                )
                .await?;
            return Ok(());
        }

        let info = self.client.collection_info(&self.collection_name).await?;
        let existing = info.result.as_ref().and_then(configured_dimension);
        check_dimension(&self.collection_name, existing, dimension)
    }

    /// Upsert: a second write under the same id replaces the first.
    pub async fn add_document(&self, id: &str, text: &str, embedding: Vec<f32>) -> Result<()> {
        let mut payload_map = JsonMap::new();
        payload_map.insert(TEXT_KEY.to_string(), JsonValue::String(text.to_string()));
        payload_map.insert(DOC_ID_KEY.to_string(), JsonValue::String(id.to_string()));
        let point = PointStruct::new(point_uuid(id), embedding, payload_map);

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection_name, vec![point]).wait(true))
            .await?;

        Ok(())
    }

    pub async fn search(&self, query_vector: Vec<f32>, limit: u64) -> Result<Vec<Document>> {
        let search_result = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection_name, query_vector, limit)
                    .with_payload(true),
            )
            .await?;

        Ok(search_result
            .result
            .iter()
            .filter_map(|point| document_from_payload(&point.payload))
            .collect())
    }

    pub async fn get_documents(&self, ids: &[String]) -> Result<Vec<Document>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let point_ids: Vec<PointId> = ids.iter().map(|id| point_id(id)).collect();
        let response = self
            .client
            .get_points(GetPointsBuilder::new(&self.collection_name, point_ids).with_payload(true))
            .await?;

        Ok(response
            .result
            .iter()
            .filter_map(|point| document_from_payload(&point.payload))
            .collect())
    }

    pub async fn scroll_all_point_ids(&self) -> Result<Vec<String>> {
        let mut all_ids = Vec::new();
        let mut offset: Option<PointId> = None;

        loop {
            let mut builder = ScrollPointsBuilder::new(&self.collection_name)
                .limit(100)
                .with_payload(false);

            if let Some(ref off) = offset {
                builder = builder.offset(off.clone());
            }

            let result = self.client.scroll(builder).await?;

            for point in &result.result {
                if let Some(PointIdOptions::Uuid(uuid)) =
                    point.id.as_ref().and_then(|id| id.point_id_options.as_ref())
                {
                    all_ids.push(uuid.clone());
                }
            }

            offset = result.next_page_offset;
            if offset.is_none() {
                break;
            }
        }

        Ok(all_ids)
    }

    /// Absent ids are ignored by Qdrant, so this never reports not-found.
    pub async fn delete_documents(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let point_ids: Vec<PointId> = ids.iter().map(|id| point_id(id)).collect();
        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.collection_name)
                    .points(PointsIdsList { ids: point_ids })
                    .wait(true),
            )
            .await?;

        Ok(())
    }
}
