use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use docs_rag::ingest::ingest_file;
use docs_rag::logging;
use docs_rag::rag::RAGEngine;

#[derive(Parser, Debug)]
#[command(name = "rag-ingest")]
#[command(about = "Store one text file as a single document in the RAG collection")]
struct Args {
    /// Text file to ingest
    #[arg(short, long, default_value = "k8s.txt")]
    file: PathBuf,

    /// Document id; an existing document with this id is replaced
    #[arg(long, default_value = "k8s")]
    id: String,

    /// Qdrant server URL
    #[arg(long, env = "QDRANT_URL", default_value = "http://localhost:6334")]
    qdrant_url: String,

    /// Qdrant collection name
    #[arg(long, env = "COLLECTION_NAME", default_value = "docs")]
    collection: String,

    /// Local embedding model directory (defaults to the bundled model)
    #[arg(long, env = "EMBEDDING_MODEL_DIR")]
    model_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init();

    let args = Args::parse();

    if !args.file.exists() {
        anyhow::bail!("File does not exist: {}", args.file.display());
    }

    println!("Connecting to Qdrant at {}...", args.qdrant_url);
    let store = RAGEngine::new(&args.qdrant_url, &args.collection, args.model_dir.as_deref()).await?;

    let doc = ingest_file(&store, &args.file, &args.id).await?;

    println!("Stored '{}' in collection '{}':", doc.id, args.collection);
    println!("{}", serde_json::to_string_pretty(&doc)?);

    Ok(())
}
