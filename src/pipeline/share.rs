//! Result distribution: offer the saved artifact to a share surface.
//!
//! The platform share sheet is a nicety, not a requirement — when no surface
//! is available the session is still a success and the caller tells the user
//! the file was saved locally. That downgrade is encoded in the return type:
//! [`ShareOutcome::Unavailable`] is an informational outcome, not an error.

use std::path::Path;

use tracing::debug;

/// What happened when the artifact was offered for sharing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The surface accepted the file (the user saw a share sheet or
    /// equivalent).
    Offered,
    /// No surface on this platform/run; the artifact stays on disk.
    Unavailable,
}

/// A platform's native share surface.
pub trait ShareSurface: Send + Sync {
    fn offer(&self, artifact: &Path) -> ShareOutcome;
}

/// The always-absent surface: headless runs, tests, and platforms without a
/// share sheet.
pub struct NoShareSurface;

impl ShareSurface for NoShareSurface {
    fn offer(&self, artifact: &Path) -> ShareOutcome {
        debug!("no share surface; {} stays local", artifact.display());
        ShareOutcome::Unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn absent_surface_reports_unavailable() {
        let outcome = NoShareSurface.offer(Path::new("/docs/merged.pdf"));
        assert_eq!(outcome, ShareOutcome::Unavailable);
    }

    #[test]
    fn custom_surface_sees_the_artifact_path() {
        struct Recording(AtomicUsize);
        impl ShareSurface for Recording {
            fn offer(&self, artifact: &Path) -> ShareOutcome {
                assert!(artifact.ends_with("split-documents.zip"));
                self.0.fetch_add(1, Ordering::SeqCst);
                ShareOutcome::Offered
            }
        }

        let surface = Recording(AtomicUsize::new(0));
        let outcome = surface.offer(Path::new("/docs/split-documents.zip"));
        assert_eq!(outcome, ShareOutcome::Offered);
        assert_eq!(surface.0.load(Ordering::SeqCst), 1);
    }
}
