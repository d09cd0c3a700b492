//! Vidflow Queue Library
//!
//! Work queue publishing (SQS and an in-process channel), the ingestion watcher that turns
//! object-created events into work messages, and the redelivery loop used when the
//! pipeline runs in a single process.

pub mod factory;
pub mod memory;
pub mod redelivery;
#[cfg(feature = "queue-sqs")]
pub mod sqs;
pub mod traits;
pub mod watcher;

pub use factory::create_work_queue;
pub use memory::MemoryWorkQueue;
pub use redelivery::{Redelivery, RedeliveryPolicy};
#[cfg(feature = "queue-sqs")]
pub use sqs::SqsWorkQueue;
pub use traits::{QueueError, QueueResult, WorkQueue};
pub use vidflow_core::QueueBackend;
pub use watcher::{IngestionReport, IngestionWatcher, WatcherError};
