//! The processing session: one user-initiated run of one tool.
//!
//! A session owns the ordered file selection, the user-edited options, and
//! the user-visible [`ProcessingState`]. The nine near-identical per-tool
//! flows collapse here into one driver parameterised by
//! [`crate::config::ToolConfig`]:
//!
//! ```text
//! idle ── process() ──▶ validating ──▶ uploading ──▶ persisting ──▶ succeeded
//!                            │             │              │
//!                            └─────────────┴──────────────┴──────▶ failed
//! ```
//!
//! Every failure is caught at this boundary and becomes a terminal `failed`
//! state with a user-facing message — nothing propagates to the presentation
//! layer as an unhandled fault, and nothing is swallowed without a log and a
//! state transition. The returned `Result` mirrors the state for callers that
//! prefer `?`.
//!
//! One submission at a time: `process()` refuses to start unless the session
//! is `idle`, and a terminal session must be [`ProcessingSession::reset`] by
//! the user before it can run again. There is no automatic retry.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};

use crate::catalog::{self, ToolDescriptor};
use crate::config::{ServiceConfig, ToolConfig};
use crate::error::{ProcessError, ValidationError};
use crate::options::ToolOptions;
use crate::pipeline::persist::ArtifactStore;
use crate::pipeline::remote::{CancelToken, RemoteService};
use crate::pipeline::request;
use crate::pipeline::share::{ShareOutcome, ShareSurface};
use crate::pipeline::validate;
use crate::progress::{NoopObserver, Observer};
use crate::state::{Phase, ProcessingState};

/// One user-selected file, normalised by the acquisition adapter.
///
/// `location` is the opaque handle the upload reads bytes from. Descriptors
/// live for the session and are dropped when the user removes them from the
/// selection or leaves the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub location: PathBuf,
    pub name: String,
    pub media_type: String,
    pub size_bytes: Option<u64>,
}

/// What a completed session hands back to the caller.
#[derive(Debug)]
pub struct ProcessOutcome {
    pub artifact_path: PathBuf,
    pub share: ShareOutcome,
    /// Informational line for the user ("Shared" / "Saved to …").
    pub notice: String,
}

/// The unit of work: tool + selection + options + state.
#[derive(Debug)]
pub struct ProcessingSession {
    descriptor: &'static ToolDescriptor,
    tool_config: ToolConfig,
    service_config: ServiceConfig,
    files: Vec<FileDescriptor>,
    options: ToolOptions,
    state: ProcessingState,
    validation: Result<(), ValidationError>,
    result_path: Option<PathBuf>,
}

impl ProcessingSession {
    /// Start a session for a catalogued tool.
    ///
    /// An unknown id is a normal navigation outcome — callers should render
    /// a not-found state from the error rather than treat it as a fault.
    pub fn new(tool_id: &str, service_config: ServiceConfig) -> Result<Self, ProcessError> {
        let descriptor = catalog::find_by_id(tool_id).ok_or_else(|| ProcessError::UnknownTool {
            id: tool_id.to_string(),
        })?;
        let tool_config = ToolConfig::for_tool(tool_id);
        let options = ToolOptions::default_for(tool_config.options);

        let mut session = Self {
            descriptor,
            tool_config,
            service_config,
            files: Vec::new(),
            options,
            state: ProcessingState::default(),
            validation: Ok(()),
            result_path: None,
        };
        session.refresh_validation();
        Ok(session)
    }

    pub fn descriptor(&self) -> &'static ToolDescriptor {
        self.descriptor
    }

    pub fn tool_config(&self) -> &ToolConfig {
        &self.tool_config
    }

    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    pub fn options(&self) -> &ToolOptions {
        &self.options
    }

    pub fn state(&self) -> &ProcessingState {
        &self.state
    }

    /// Path of the persisted artifact once the session has succeeded.
    pub fn result_path(&self) -> Option<&PathBuf> {
        self.result_path.as_ref()
    }

    /// The gate's verdict on the current selection, refreshed on every edit.
    pub fn validation(&self) -> &Result<(), ValidationError> {
        &self.validation
    }

    /// Whether the submit affordance should be enabled: the gate passes and
    /// no submission is outstanding.
    pub fn can_submit(&self) -> bool {
        self.validation.is_ok() && self.state.phase == Phase::Idle
    }

    /// Append picked files, preserving pick order (which is upload order).
    pub fn add_files(&mut self, files: impl IntoIterator<Item = FileDescriptor>) {
        self.files.extend(files);
        self.refresh_validation();
    }

    /// Remove one file from the selection list.
    pub fn remove_file(&mut self, index: usize) -> Option<FileDescriptor> {
        if index >= self.files.len() {
            return None;
        }
        let removed = self.files.remove(index);
        self.refresh_validation();
        Some(removed)
    }

    /// Replace the option values (e.g. after the user edits a field).
    pub fn set_options(&mut self, options: ToolOptions) {
        self.options = options;
        self.refresh_validation();
    }

    /// Acknowledge a terminal state and return to `idle` for a fresh
    /// attempt. Returns `false` while a submission is in flight.
    pub fn reset(&mut self) -> bool {
        let ok = self.state.reset();
        if ok {
            self.result_path = None;
            self.refresh_validation();
        }
        ok
    }

    fn refresh_validation(&mut self) {
        self.validation = validate::validate(
            self.descriptor.display_name,
            &self.tool_config,
            &self.files,
            &self.options,
        );
    }

    /// Run the pipeline with no observer and no cancel surface.
    pub async fn process(
        &mut self,
        remote: &dyn RemoteService,
        store: &ArtifactStore,
        share: &dyn ShareSurface,
    ) -> Result<ProcessOutcome, ProcessError> {
        self.process_with(remote, store, share, Arc::new(NoopObserver), CancelToken::never())
            .await
    }

    /// Run the pipeline: validate → build → invoke → persist → share.
    ///
    /// Exactly one call may be outstanding; a second call while the session
    /// is not `idle` returns [`ProcessError::AlreadyRunning`] without
    /// touching the state.
    pub async fn process_with(
        &mut self,
        remote: &dyn RemoteService,
        store: &ArtifactStore,
        share: &dyn ShareSurface,
        observer: Observer,
        cancel: CancelToken,
    ) -> Result<ProcessOutcome, ProcessError> {
        if self.state.phase != Phase::Idle {
            return Err(ProcessError::AlreadyRunning);
        }

        let tool = self.descriptor.display_name;
        info!("{}: starting session with {} file(s)", tool, self.files.len());

        // ── Validate ─────────────────────────────────────────────────────
        self.state.advance(Phase::Validating, 5, "Checking your files…");
        observer.on_state_change(&self.state);

        self.refresh_validation();
        if let Err(reason) = self.validation.clone() {
            warn!("{}: rejected — {}", tool, reason);
            self.state.fail(reason.to_string(), reason.to_string());
            observer.on_state_change(&self.state);
            return Err(reason.into());
        }

        // ── Build the request ────────────────────────────────────────────
        let payload = match request::build(&self.tool_config, &self.files, &self.options) {
            Ok(p) => p,
            Err(reason) => {
                self.state.fail(reason.to_string(), reason.to_string());
                observer.on_state_change(&self.state);
                return Err(reason.into());
            }
        };

        // ── Invoke ───────────────────────────────────────────────────────
        self.state
            .advance(Phase::Uploading, 10, "Uploading your files…");
        observer.on_state_change(&self.state);

        // The sweep below is presentation only: the transport is a single
        // awaited round trip with no transfer events, so the bar animates on
        // a timer and holds near the top until the response lands.
        let ticker = spawn_upload_sweep(
            Arc::clone(&observer),
            self.service_config.upload_animation_ms,
        );

        let invoked = remote.execute(&payload, &cancel).await;
        ticker.abort();

        let artifact = match invoked {
            Ok(a) => a,
            Err(err) => {
                warn!("{}: remote call failed — {}", tool, err);
                self.state.fail(err.to_string(), format!("{err:?}"));
                observer.on_state_change(&self.state);
                return Err(err.into());
            }
        };

        // ── Persist ──────────────────────────────────────────────────────
        self.state
            .advance(Phase::Persisting, 95, "Saving the result…");
        observer.on_state_change(&self.state);

        let source_name = self
            .files
            .first()
            .map(|f| f.name.as_str())
            .unwrap_or("file");
        let artifact_path = match store
            .persist(&artifact, self.tool_config.naming, source_name)
            .await
        {
            Ok(p) => p,
            Err(err) => {
                warn!("{}: persistence failed — {}", tool, err);
                self.state.fail(err.to_string(), format!("{err:?}"));
                observer.on_state_change(&self.state);
                return Err(err);
            }
        };

        self.result_path = Some(artifact_path.clone());
        self.state.succeed(format!("{tool} completed successfully"));
        observer.on_state_change(&self.state);

        // ── Share ────────────────────────────────────────────────────────
        // Past this point the session has succeeded; an absent share surface
        // only changes the notice, never the outcome.
        let share_outcome = share.offer(&artifact_path);
        let notice = match share_outcome {
            ShareOutcome::Offered => format!("Shared {}", artifact_path.display()),
            ShareOutcome::Unavailable => {
                format!("Saved to {}", artifact_path.display())
            }
        };
        info!("{}: {}", tool, notice);

        Ok(ProcessOutcome {
            artifact_path,
            share: share_outcome,
            notice,
        })
    }
}

/// Drive the cosmetic upload sweep: 10 → 90 over `duration_ms`, then hold
/// until the in-flight call resolves and the driver aborts the task.
fn spawn_upload_sweep(observer: Observer, duration_ms: u64) -> tokio::task::JoinHandle<()> {
    let duration_ms = duration_ms.max(1);
    tokio::spawn(async move {
        let start = Instant::now();
        let mut interval = tokio::time::interval(Duration::from_millis(100));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let fraction =
                (start.elapsed().as_millis() as f64 / duration_ms as f64).min(1.0);
            let percent = (10.0 + 80.0 * fraction) as u8;
            observer.on_progress(percent);
            if fraction >= 1.0 {
                break;
            }
        }
    })
}
