//! In-process stand-ins for the store and the generation backend.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::llm::GenerationModel;
use crate::models::Document;
use crate::rag::DocumentStore;

fn words(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Ranks by shared-word count, exact text match first.
#[derive(Default)]
pub struct MemoryStore {
    docs: Mutex<Vec<Document>>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.docs.lock().unwrap().len()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn add(&self, id: &str, text: &str) -> Result<()> {
        let mut docs = self.docs.lock().unwrap();
        let doc = Document {
            id: id.to_string(),
            text: text.to_string(),
        };
        match docs.iter_mut().find(|d| d.id == id) {
            Some(existing) => *existing = doc,
            None => docs.push(doc),
        }
        Ok(())
    }

    async fn query(&self, text: &str, top_k: u64) -> Result<Vec<Document>> {
        let query_words = words(text);
        let docs = self.docs.lock().unwrap();
        let mut scored: Vec<(usize, &Document)> = docs
            .iter()
            .map(|d| {
                let overlap = words(&d.text).intersection(&query_words).count();
                let exact = if d.text == text { usize::MAX / 2 } else { 0 };
                (overlap + exact, d)
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(scored
            .into_iter()
            .take(top_k as usize)
            .map(|(_, d)| d.clone())
            .collect())
    }

    async fn get(&self, ids: &[String]) -> Result<Vec<Document>> {
        let docs = self.docs.lock().unwrap();
        Ok(docs.iter().filter(|d| ids.contains(&d.id)).cloned().collect())
    }

    async fn delete(&self, ids: &[String]) -> Result<()> {
        self.docs.lock().unwrap().retain(|d| !ids.contains(&d.id));
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        self.docs.lock().unwrap().clear();
        Ok(())
    }
}

pub struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn add(&self, _id: &str, _text: &str) -> Result<()> {
        Err(Error::store("connection refused"))
    }

    async fn query(&self, _text: &str, _top_k: u64) -> Result<Vec<Document>> {
        Err(Error::store("connection refused"))
    }

    async fn get(&self, _ids: &[String]) -> Result<Vec<Document>> {
        Err(Error::store("connection refused"))
    }

    async fn delete(&self, _ids: &[String]) -> Result<()> {
        Err(Error::store("connection refused"))
    }

    async fn delete_all(&self) -> Result<()> {
        Err(Error::store("connection refused"))
    }
}

/// Returns a canned reply and records `(model, prompt)` per call.
pub struct RecordingModel {
    reply: Option<String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingModel {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationModel for RecordingModel {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), prompt.to_string()));
        self.reply
            .clone()
            .ok_or_else(|| Error::model("backend unavailable"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.reply.is_some())
    }
}
