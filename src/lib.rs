//! Self-hosted photo-storage stack provisioning.
//!
//! Photodock provisions, runs, and backs up one or more
//! *instances* of a photo-storage deployment: an API server, a
//! web frontend, PostgreSQL, and MinIO object storage, all
//! supervised by the external `docker compose` tool.
//!
//! # Overview
//!
//! An instance is one directory holding everything the stack
//! needs:
//!
//! ```text
//! photodock/
//! ├── compose.yaml      service topology (generated)
//! ├── settings.yaml     application settings + secrets (generated)
//! ├── data/             API server state
//! ├── postgres-data/    database files
//! └── minio-data/       object storage files
//! ```
//!
//! `photodock setup` generates both documents with fresh secrets,
//! starts the containers, provisions the storage buckets, and
//! gates on readiness polls. Running it again against the same
//! directory starts the existing stack; configuration is never
//! overwritten.
//!
//! # Components
//!
//! - [`StackConfig`] - immutable deployment parameters (images,
//!   ports, network exposure)
//! - [`secrets`] - credential generation from the OS random source
//! - [`compose`] / [`settings`] - the two generated documents
//! - [`lifecycle`] - start/stop delegation to `docker compose`,
//!   readiness gates, bucket provisioning
//! - [`poll`] - the one bounded fixed-interval readiness primitive
//!   every gate goes through
//! - [`backup`] - plain-copy backup bundles and fail-closed restore

// Allow noisy pedantic lints that don't add value for a
// deployment tool crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod backup;
pub mod cmd;
pub mod compose;
pub mod config;
pub mod error;
pub mod instance;
pub mod lifecycle;
pub mod poll;
pub mod secrets;
pub mod settings;
pub mod setup;

pub use backup::Advisory;
pub use config::StackConfig;
pub use error::{SetupError, SetupResult};
pub use instance::{Instance, InstanceState};
pub use poll::{PollOutcome, Poller};
pub use secrets::StackSecrets;
pub use settings::Settings;
