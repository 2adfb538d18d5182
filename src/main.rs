use anyhow::Result;
use std::sync::Arc;

use docs_rag::api::{router, AppState};
use docs_rag::config::{GenerationMode, Settings};
use docs_rag::llm::OllamaClient;
use docs_rag::logging;
use docs_rag::rag::RAGEngine;

#[tokio::main]
async fn main() -> Result<()> {
    // 環境変数読み込み (.env の RUST_LOG を反映させるため先に)
    dotenv::dotenv().ok();

    // ロギング初期化
    logging::init();
    let settings = Settings::from_env()?;

    tracing::info!("Connecting to Qdrant: {}", settings.qdrant_url);
    match &settings.mode {
        GenerationMode::Mock => tracing::info!("USE_MOCK_LLM=1: answering with retrieved context"),
        GenerationMode::Model(model) => {
            tracing::info!("Generating with model '{}' at {}", model, settings.ollama_url)
        }
    }

    // コンポーネント初期化
    let store = RAGEngine::new(
        &settings.qdrant_url,
        &settings.collection_name,
        settings.embedding_model_dir.as_deref(),
    )
    .await?;
    tracing::info!("RAG engine initialized successfully");

    let generator = OllamaClient::new(settings.ollama_url.clone(), settings.llm_timeout)?;

    let state = Arc::new(AppState {
        store: Arc::new(store),
        generator: Arc::new(generator),
        mode: settings.mode.clone(),
    });

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
