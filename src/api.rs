use axum::{
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::GenerationMode;
use crate::error::Error;
use crate::llm::GenerationModel;
use crate::models::{
    AddParams, AddResponse, DeleteParams, HealthResponse, MessageResponse, QueryParams,
    QueryResponse, ServiceHealth,
};
use crate::rag::DocumentStore;

pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub generator: Arc<dyn GenerationModel>,
    pub mode: GenerationMode,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn context(mut self, context: &str) -> Self {
        self.message = format!("{}: {}", context, self.message);
        self
    }

    fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::Model(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "status": "error", "message": self.message }));
        (self.status, body).into_response()
    }
}

pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Context:\n{}\n\nQuestion: {}\n\nAnswer clearly and concisely:",
        context, question
    )
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/query", post(query_handler))
        .route("/add", post(add_handler))
        .route("/delete", post(delete_handler))
        .route("/delete_all", post(delete_all_handler))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn query_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<QueryResponse>, ApiError> {
    let context = state
        .store
        .query(&params.q, 1)
        .await
        .map_err(|e| {
            tracing::error!("Store query error: {}", e);
            ApiError::from(e)
        })?
        .into_iter()
        .next()
        .map(|doc| doc.text)
        .unwrap_or_default();

    let answer = match &state.mode {
        GenerationMode::Mock => context,
        GenerationMode::Model(model) => {
            let prompt = build_prompt(&context, &params.q);
            state
                .generator
                .generate(model, &prompt)
                .await
                .map_err(|e| {
                    tracing::error!("Generation error: {}", e);
                    ApiError::from(e)
                })?
        }
    };

    Ok(Json(QueryResponse { answer }))
}

async fn add_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AddParams>,
) -> Result<Json<AddResponse>, ApiError> {
    let id = Uuid::new_v4().to_string();

    state.store.add(&id, &params.text).await.map_err(|e| {
        tracing::error!("Document add error: {}", e);
        // add reports its failure in the body, not the status line
        ApiError::from(e)
            .context("Error adding document")
            .with_status(StatusCode::OK)
    })?;

    tracing::info!("Added document {}", id);
    Ok(Json(AddResponse {
        status: "success".to_string(),
        message: "Document added successfully".to_string(),
        id,
    }))
}

async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete(&[params.id.clone()]).await.map_err(|e| {
        tracing::error!("Document delete error: {}", e);
        ApiError::from(e)
    })?;

    tracing::info!("Deleted document {}", params.id);
    Ok(Json(MessageResponse {
        message: "Document deleted successfully".to_string(),
    }))
}

async fn delete_all_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete_all().await.map_err(|e| {
        tracing::error!("Delete all error: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(MessageResponse {
        message: "All documents deleted successfully".to_string(),
    }))
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let llm = match state.mode {
        GenerationMode::Mock => None,
        GenerationMode::Model(_) => Some(state.generator.health_check().await.unwrap_or(false)),
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        mode: state.mode.label().to_string(),
        services: ServiceHealth { llm },
    })
}
