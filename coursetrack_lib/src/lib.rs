//! Pipeline layer for coursetrack: persistent snapshots, the join &
//! filter engine, and the update/search orchestration over the host API
//! client.

pub mod error;
pub mod report;
pub mod service;
pub mod stats;
pub mod store;
pub mod validation;

pub use coursetrack_api;
pub use coursetrack_api::types;
pub use coursetrack_api::{CancelSource, CancelToken, Client, RetryPolicy, StaticToken, TokenSource};

pub use error::Error;
pub use report::ExportSink;
pub use service::{NullProgress, Progress, ReportService, UpdateSummary};
pub use stats::{join, CourseSummary, ReportQuery, StatRecord};
pub use store::SnapshotStore;
