//! Dependency-ordered publishing of KM expressions.
//!
//! A KM server rejects expressions that mention frames it has not seen yet,
//! so frames have to arrive after everything they reference. This crate
//! provides:
//!
//! - [`client`]: the [`KmClient`] trait and its HTTP implementation.
//! - [`registry`]: the shared, write-once map of publish outcomes.
//! - [`scheduler`]: the round-based scheduler that drives the client.
//! - [`report`]: the final accounting of a run.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod client;
pub mod error;
pub mod registry;
pub mod report;
pub mod scheduler;

pub use client::{HttpClientConfig, HttpKmClient, KmClient, PublishOutcome};
pub use error::ClientError;
pub use registry::{FailureReason, PublishRegistry, PublishState};
pub use report::PublishReport;
pub use scheduler::{PublishScheduler, SchedulerConfig};
