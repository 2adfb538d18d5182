pub mod api;
pub mod config;
pub mod error;
pub mod ingest;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;

#[cfg(test)]
mod testing;
