//! Vidflow API Library
//!
//! HTTP surface of the ingestion pipeline: the upload gateway, the object-created
//! notification endpoint for the watcher, health probes, and application setup.

mod api_doc;
mod handlers;
mod telemetry;

pub mod error;
pub mod pipeline;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use handlers::object_events::IngestionSummary;
