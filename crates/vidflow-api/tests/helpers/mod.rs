//! Test helpers: recording backends and a router built around them.
//!
//! Run from workspace root: `cargo test -p vidflow-api`.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use vidflow_api::setup::routes;
use vidflow_api::state::{AppState, GatewayState, WatcherState};
use vidflow_core::{Config, QueueBackend, StorageBackend, StoredObject, WorkMessage};
use vidflow_queue::{IngestionWatcher, QueueError, QueueResult, WorkQueue};
use vidflow_storage::{Storage, StorageError, StorageResult};

pub const TEST_BUCKET: &str = "video-uploads";
pub const TEST_QUEUE_URL: &str =
    "https://sqs.us-east-1.amazonaws.com/123456789012/video-processing";

/// Build a config from `overrides` layered on the defaults every test needs.
pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("BUCKET_NAME".to_string(), TEST_BUCKET.to_string()),
        ("QUEUE_URL".to_string(), TEST_QUEUE_URL.to_string()),
        ("ENVIRONMENT".to_string(), "test".to_string()),
    ]);
    for (name, value) in overrides {
        vars.insert(name.to_string(), value.to_string());
    }
    Config::from_lookup(|name| vars.get(name).cloned()).expect("Invalid test config")
}

/// A write the gateway made, as the store saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPut {
    pub key: String,
    pub data: Vec<u8>,
    pub content_type: String,
    pub content_encoding: Option<String>,
}

#[derive(Default)]
pub struct RecordingStorage {
    puts: Mutex<Vec<RecordedPut>>,
    fail_with: Mutex<Option<String>>,
}

impl RecordingStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every subsequent write fails with `message`.
    pub fn fail_writes(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }

    pub fn puts(&self) -> Vec<RecordedPut> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        content_encoding: Option<&str>,
    ) -> StorageResult<StoredObject> {
        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(StorageError::UploadFailed(message));
        }
        let size_bytes = data.len() as u64;
        self.puts.lock().unwrap().push(RecordedPut {
            key: key.to_string(),
            data,
            content_type: content_type.to_string(),
            content_encoding: content_encoding.map(String::from),
        });
        Ok(StoredObject {
            bucket: TEST_BUCKET.to_string(),
            key: key.to_string(),
            content_type: content_type.to_string(),
            size_bytes,
        })
    }

    fn bucket(&self) -> &str {
        TEST_BUCKET
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }

    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}

/// Records published messages; publishes of keys listed in `failing_keys` fail.
#[derive(Default)]
pub struct RecordingQueue {
    published: Mutex<Vec<WorkMessage>>,
    failing_keys: Mutex<Vec<String>>,
    unhealthy: Mutex<bool>,
}

impl RecordingQueue {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_key(&self, key: &str) {
        self.failing_keys.lock().unwrap().push(key.to_string());
    }

    pub fn recover(&self) {
        self.failing_keys.lock().unwrap().clear();
    }

    pub fn set_unhealthy(&self) {
        *self.unhealthy.lock().unwrap() = true;
    }

    pub fn published(&self) -> Vec<WorkMessage> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkQueue for RecordingQueue {
    async fn publish(&self, message: &WorkMessage) -> QueueResult<()> {
        if self.failing_keys.lock().unwrap().contains(&message.key) {
            return Err(QueueError::PublishFailed("ServiceUnavailable".to_string()));
        }
        self.published.lock().unwrap().push(message.clone());
        Ok(())
    }

    fn destination(&self) -> &str {
        TEST_QUEUE_URL
    }

    fn backend_type(&self) -> QueueBackend {
        QueueBackend::Memory
    }

    async fn health_check(&self) -> QueueResult<()> {
        if *self.unhealthy.lock().unwrap() {
            return Err(QueueError::BackendError("queue does not exist".to_string()));
        }
        Ok(())
    }
}

/// Test application: server plus the backends behind it.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<RecordingStorage>,
    pub queue: Arc<RecordingQueue>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Both roles wired to recording backends.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with(test_config(&[]))
}

pub fn setup_test_app_with(config: Config) -> TestApp {
    let storage = RecordingStorage::new();
    let queue = RecordingQueue::new();

    let state = AppState {
        config: config.clone(),
        gateway: config.role.runs_gateway().then(|| GatewayState {
            storage: storage.clone() as Arc<dyn Storage>,
        }),
        watcher: config.role.runs_watcher().then(|| WatcherState {
            watcher: IngestionWatcher::new(queue.clone() as Arc<dyn WorkQueue>),
        }),
    };

    let app = routes::build_router(&config, state).expect("Failed to build router");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        storage,
        queue,
    }
}

/// S3 notification document with one `ObjectCreated:Put` record per key.
pub fn s3_notification(bucket: &str, keys: &[&str]) -> serde_json::Value {
    let records: Vec<serde_json::Value> = keys
        .iter()
        .map(|key| {
            serde_json::json!({
                "eventVersion": "2.1",
                "eventSource": "aws:s3",
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": { "name": bucket },
                    "object": { "key": key, "size": 1024 }
                }
            })
        })
        .collect();
    serde_json::json!({ "Records": records })
}
