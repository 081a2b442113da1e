//! # docflow
//!
//! Client-side orchestrator for the DocFlow document conversion service.
//!
//! ## Why this crate?
//!
//! The DocFlow backend exposes a dozen file-processing tools (merge PDFs,
//! split a PDF, stamp page numbers, bundle images into a PDF, …) behind
//! structurally identical endpoints: POST a `multipart/form-data` body, get
//! back the processed artifact or a structured error. Hand-writing that flow
//! once per tool produces a dozen near-copies that drift apart — this crate
//! implements it once, parameterised by a per-tool configuration record, so
//! a new tool is a table entry rather than a new code path.
//!
//! ## Pipeline Overview
//!
//! ```text
//! selection
//!  │
//!  ├─ 1. Acquire   normalise picked files into descriptors
//!  ├─ 2. Validate  count / type / size / option rules from the catalog
//!  ├─ 3. Build     multipart payload, file parts in selection order
//!  ├─ 4. Invoke    one HTTPS POST, uniform error classification
//!  ├─ 5. Persist   atomic write under the tool's naming policy
//!  └─ 6. Share     offer the saved file; absent surface downgrades to a notice
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docflow::{
//!     ArtifactStore, HttpRemoteClient, NoShareSurface, ProcessingSession, ServiceConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServiceConfig::default();
//!     let remote = HttpRemoteClient::new(config.clone())?;
//!     let store = ArtifactStore::new(&config.documents_dir);
//!
//!     let mut session = ProcessingSession::new("merge-pdf", config)?;
//!     session.add_files(docflow::pick_paths(&["a.pdf".into(), "b.pdf".into()])?);
//!
//!     let outcome = session.process(&remote, &store, &NoShareSurface).await?;
//!     println!("{}", outcome.notice);
//!     Ok(())
//! }
//! ```
//!
//! ## Assumptions
//!
//! This is a single-backend client: no authentication header is sent, no API
//! version is negotiated, and a failed call is never retried automatically —
//! the user decides whether to resubmit. Uploads are not cached, deduped,
//! chunked, or resumable.
//!
//! The progress percentage reported while a request is in flight is a timed
//! animation, not a transfer measurement; see [`state`] for the contract.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod catalog;
pub mod config;
pub mod error;
pub mod options;
pub mod pipeline;
pub mod progress;
pub mod session;
pub mod state;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use catalog::{ToolCategory, ToolDescriptor};
pub use config::{FileKind, NamingPolicy, ServiceConfig, ServiceConfigBuilder, ToolConfig};
pub use error::{ProcessError, RemoteError, ValidationError};
pub use options::{
    CompressionLevel, OptionSchema, PageNumberFormat, PagePosition, ToolOptions,
};
pub use pipeline::acquire::{FilePicker, PathPicker};
pub use pipeline::persist::ArtifactStore;
pub use pipeline::remote::{
    cancel_pair, BinaryArtifact, CancelHandle, CancelToken, HttpRemoteClient, RemoteService,
};
pub use pipeline::request::{FilePart, RequestPayload};
pub use pipeline::share::{NoShareSurface, ShareOutcome, ShareSurface};
pub use progress::{NoopObserver, Observer, SessionObserver};
pub use session::{FileDescriptor, ProcessOutcome, ProcessingSession};
pub use state::{Phase, ProcessingState};

use std::path::PathBuf;

/// Convenience: descriptors for a list of local paths, in the given order.
pub fn pick_paths(paths: &[PathBuf]) -> Result<Vec<FileDescriptor>, ProcessError> {
    PathPicker.pick_all(paths)
}
