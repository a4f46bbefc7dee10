//! In memory stand-ins for the datastore and the service under test.

use std::collections::BTreeMap;

use apitest::running::{Failure, Response, Storage, Transport};
use serde_json::{json, Value};

#[derive(Debug, Default)]
pub struct Memory {
    pub collections: BTreeMap<String, Vec<Value>>,
    /// Every operation performed, in order.
    pub log: Vec<String>,
    inserted: usize,
}

impl Memory {
    pub fn documents(&self, collection: &str) -> &[Value] {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Storage for Memory {
    async fn clear_collection(&mut self, collection: &str) -> Result<(), Failure> {
        self.log
            .push(format!("clear {}", collection));
        self.collections
            .insert(collection.to_string(), Vec::new());
        Ok(())
    }

    async fn insert_one(&mut self, collection: &str, document: &Value) -> Result<Value, Failure> {
        self.log
            .push(format!("insert {}", collection));
        self.inserted += 1;

        let id = json!(format!("{:024x}", self.inserted));
        let mut document = document.clone();
        match &mut document {
            Value::Object(map) => {
                map.entry("_id")
                    .or_insert_with(|| id.clone());
            }
            _ => return Err("documents must be objects".into()),
        }
        let id = document["_id"].clone();

        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(id)
    }

    async fn find_by_id(&mut self, collection: &str, id: &Value) -> Result<Option<Value>, Failure> {
        self.log
            .push(format!("find {}", collection));
        Ok(self
            .documents(collection)
            .iter()
            .find(|document| &document["_id"] == id)
            .cloned())
    }

    async fn find_all(&mut self, collection: &str) -> Result<Vec<Value>, Failure> {
        self.log
            .push(format!("scan {}", collection));
        Ok(self
            .documents(collection)
            .to_vec())
    }
}

/// Answers each request with whatever the handler decides, keeping a copy
/// of the request.
pub struct Service {
    handler: fn(&str, &Value) -> Response,
    pub requests: Vec<(String, Value)>,
}

impl Service {
    pub fn new(handler: fn(&str, &Value) -> Response) -> Service {
        Service {
            handler,
            requests: Vec::new(),
        }
    }

    /// Sends back whatever it was given.
    pub fn echo() -> Service {
        Service::new(|_, body| Response {
            status: 200,
            body: body.clone(),
        })
    }
}

impl Transport for Service {
    async fn post_json(&mut self, url: &str, body: &Value) -> Result<Response, Failure> {
        self.requests
            .push((url.to_string(), body.clone()));
        Ok((self.handler)(url, body))
    }
}

/// A service that can't be reached.
pub struct Offline;

impl Transport for Offline {
    async fn post_json(&mut self, _: &str, _: &Value) -> Result<Response, Failure> {
        Err("connection refused".into())
    }
}
