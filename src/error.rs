//! Error types for the docflow library.
//!
//! Three distinct error types reflect three distinct failure modes:
//!
//! * [`ValidationError`] — **Recoverable, pre-submit**: the current file
//!   selection or option values violate the tool's rules. The user fixes the
//!   selection and the gate re-runs; nothing ever reaches the network.
//!
//! * [`RemoteError`] — the classified outcome of the single network call:
//!   either the service reported a failure or the call never completed
//!   (connectivity, cancellation). Reported verbatim to the user with a
//!   retry suggestion; never retried automatically.
//!
//! * [`ProcessError`] — **Fatal for the session**: everything the driver can
//!   hit between submit and terminal state, including the two above. Caught
//!   at the session boundary and turned into a terminal `failed`
//!   [`crate::state::ProcessingState`]; nothing propagates as an unhandled
//!   fault to the presentation layer.
//!
//! A persistence failure is deliberately distinct from a remote failure so
//! the user understands the conversion itself succeeded but saving did not.

use std::path::PathBuf;
use thiserror::Error;

/// A rejected file selection or option value.
///
/// Rules are evaluated in a fixed order (count, type, size, options) and the
/// first failure wins, so the message always names the single most actionable
/// problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Tool accepts exactly one file but the selection has another count.
    #[error("'{tool}' needs exactly 1 file ({got} selected)")]
    SingleFileRequired { tool: String, got: usize },

    /// Multi-file tool with fewer files than its documented minimum.
    #[error("'{tool}' needs at least {min} {noun} ({got} selected)")]
    NotEnoughFiles {
        tool: String,
        min: usize,
        noun: &'static str,
        got: usize,
    },

    /// A selected file's media type is not accepted by the tool.
    #[error("'{name}' is not a supported file type for this tool (expected {expected})")]
    UnsupportedType { name: String, expected: String },

    /// A selected file exceeds the tool's size ceiling.
    #[error("'{name}' is {size} bytes, over the {limit}-byte limit")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    /// A page-range token is not `N` or `N-M` with 1-based bounds.
    #[error("invalid page range '{token}': use a page number like '3' or a range like '1-5'")]
    InvalidRange { token: String },

    /// No usable range token was provided at all.
    #[error("specify at least one page range")]
    NoRanges,

    /// The page-order string is not a comma-separated list of 1-based indices.
    #[error("invalid page order '{order}': use comma-separated page numbers like '3,1,2'")]
    InvalidPageOrder { order: String },

    /// A numeric option failed to parse or is below its minimum.
    #[error("{field} must be a whole number of {min} or greater (got '{value}')")]
    InvalidNumber {
        field: &'static str,
        min: u32,
        value: String,
    },

    /// Rotation angle outside the quarter-turn set the service accepts.
    #[error("rotation must be 90, 180 or 270 degrees (got '{value}')")]
    InvalidAngle { value: String },

    /// Options of the wrong family were attached to the session.
    #[error("'{tool}' does not take {given} options")]
    WrongOptions { tool: String, given: &'static str },
}

/// The classified outcome of a failed remote invocation.
///
/// Classification is uniform across tools: a structured-JSON error parse is
/// attempted first, falling back to the raw status-code message (see
/// [`crate::pipeline::remote::classify_error_body`]).
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The service answered with an error status (or an error body on 2xx).
    #[error("{message}")]
    Service { status: u16, message: String },

    /// The call never completed: DNS, TLS, refused connection, timeout.
    #[error("Could not reach the conversion service. Check your internet connection and try again.")]
    Connectivity { detail: String },

    /// A selected file could not be read when the upload was assembled
    /// (deleted or made unreadable between pick and submit).
    #[error("could not read '{name}' for upload: {detail}")]
    PayloadUnreadable { name: String, detail: String },

    /// The caller cancelled the in-flight request.
    #[error("Processing was cancelled")]
    Cancelled,
}

/// All fatal errors a [`crate::session::ProcessingSession`] can end in.
#[derive(Debug, Error)]
pub enum ProcessError {
    // ── Acquisition errors ────────────────────────────────────────────────
    /// A picked file no longer exists at its path.
    #[error("file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// A picked file exists but cannot be opened for reading.
    #[error("cannot read '{path}': {source}")]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Session errors ────────────────────────────────────────────────────
    /// Submission was attempted against a selection the gate rejects.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The remote invocation failed; the artifact was never produced.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The artifact arrived but could not be written to local storage.
    #[error("Conversion succeeded but saving to '{path}' failed: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `process()` was called while a submission is already outstanding.
    #[error("a submission is already in progress for this session")]
    AlreadyRunning,

    /// The tool id resolved no catalog entry. Callers render a not-found
    /// state rather than treating this as a fault.
    #[error("unknown tool '{id}'")]
    UnknownTool { id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_file_required_display() {
        let e = ValidationError::SingleFileRequired {
            tool: "split-pdf".into(),
            got: 3,
        };
        let msg = e.to_string();
        assert!(msg.contains("exactly 1"), "got: {msg}");
        assert!(msg.contains("3 selected"));
    }

    #[test]
    fn not_enough_files_display() {
        let e = ValidationError::NotEnoughFiles {
            tool: "merge-pdf".into(),
            min: 2,
            noun: "PDF files",
            got: 1,
        };
        assert!(e.to_string().contains("at least 2 PDF files"));
    }

    #[test]
    fn file_too_large_names_the_file_and_limit() {
        let e = ValidationError::FileTooLarge {
            name: "scan.pdf".into(),
            size: 60_000_000,
            limit: 52_428_800,
        };
        let msg = e.to_string();
        assert!(msg.contains("scan.pdf"));
        assert!(msg.contains("52428800"));
    }

    #[test]
    fn remote_service_error_shows_server_message_verbatim() {
        let e = RemoteError::Service {
            status: 400,
            message: "invalid range".into(),
        };
        assert_eq!(e.to_string(), "invalid range");
    }

    #[test]
    fn connectivity_error_is_generic() {
        let e = RemoteError::Connectivity {
            detail: "dns error".into(),
        };
        assert!(e.to_string().contains("internet connection"));
    }

    #[test]
    fn persistence_error_distinguishes_save_failure() {
        let e = ProcessError::Persistence {
            path: PathBuf::from("/docs/merged.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        let msg = e.to_string();
        assert!(msg.contains("Conversion succeeded"));
        assert!(msg.contains("merged.pdf"));
    }
}
