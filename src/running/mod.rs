//! Executing parsed Tests against a service and its datastore.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

pub mod error;
mod find;
pub mod report;
mod runner;

pub use error::{ConfigError, RunError};
pub use report::{CaseReport, Outcome, TestReport};
pub use runner::Runner;

/// Whatever a collaborator reports when it fails; passed through unchanged.
pub type Failure = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: serde_json::Value,
}

/// The datastore holding the collections a Test sets up and searches.
#[allow(async_fn_in_trait)]
pub trait Storage {
    async fn clear_collection(&mut self, collection: &str) -> Result<(), Failure>;

    /// Insert a document and return the identifier it was assigned.
    async fn insert_one(
        &mut self,
        collection: &str,
        document: &serde_json::Value,
    ) -> Result<serde_json::Value, Failure>;

    async fn find_by_id(
        &mut self,
        collection: &str,
        id: &serde_json::Value,
    ) -> Result<Option<serde_json::Value>, Failure>;

    async fn find_all(&mut self, collection: &str) -> Result<Vec<serde_json::Value>, Failure>;
}

/// The service under test.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn post_json(&mut self, url: &str, body: &serde_json::Value) -> Result<Response, Failure>;
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Prefixed to each case's endpoint.
    pub base_url: String,
    /// Reject keys and array elements the templates don't mention.
    pub strict: bool,
    /// Keys a stored document may carry at its root without the Find
    /// template naming them.
    pub ignored_find_keys: Vec<String>,
    /// Per collection, fields merged into every inserted document that
    /// doesn't set them itself.
    pub default_documents: BTreeMap<String, serde_json::Value>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            base_url: "http://localhost:8000/".to_string(),
            strict: true,
            ignored_find_keys: vec!["_id".to_string(), "__v".to_string()],
            default_documents: BTreeMap::new(),
        }
    }
}

impl Options {
    /// Read options from a JSON file. Fields left out take their defaults.
    pub fn load(path: &Path) -> Result<Options, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let options = serde_json::from_str(&content)?;
        debug!(?options);
        Ok(options)
    }

    /// The full address for an endpoint.
    pub fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url
                .trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}
