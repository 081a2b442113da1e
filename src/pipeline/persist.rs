//! Artifact persistence: name the result and write it durably.
//!
//! ## Atomicity
//!
//! The artifact is written to a `.tmp` sibling and renamed into place, so
//! from the caller's perspective either the full file exists at the returned
//! path or persistence failed — a partial write is never exposed as success.
//!
//! ## Collision avoidance
//!
//! Fixed-name tools (merge → `merged.pdf`) can run many times into the same
//! documents directory. Every resolved name is uniquified with a numeric
//! suffix (`merged-1.pdf`, `merged-2.pdf`, …) before writing, so a rerun
//! never silently overwrites an earlier result the user has not retrieved.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use crate::config::NamingPolicy;
use crate::error::ProcessError;
use crate::pipeline::remote::BinaryArtifact;

/// Writes artifacts into the configured documents directory.
pub struct ArtifactStore {
    documents_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(documents_dir: impl Into<PathBuf>) -> Self {
        Self {
            documents_dir: documents_dir.into(),
        }
    }

    pub fn documents_dir(&self) -> &Path {
        &self.documents_dir
    }

    /// Persist `artifact` under the tool's naming policy.
    ///
    /// `source_name` is the first selected file's name, used by the derived
    /// policies. Returns the final path; the file at that path holds exactly
    /// the artifact's bytes.
    pub async fn persist(
        &self,
        artifact: &BinaryArtifact,
        naming: NamingPolicy,
        source_name: &str,
    ) -> Result<PathBuf, ProcessError> {
        tokio::fs::create_dir_all(&self.documents_dir)
            .await
            .map_err(|e| ProcessError::Persistence {
                path: self.documents_dir.clone(),
                source: e,
            })?;

        let name = resolve_name(naming, source_name);
        let path = unique_path(&self.documents_dir, &name);

        let tmp = path.with_extension(format!(
            "{}.tmp",
            path.extension().and_then(|e| e.to_str()).unwrap_or("bin")
        ));
        debug!("writing {} bytes to {}", artifact.bytes.len(), tmp.display());

        tokio::fs::write(&tmp, &artifact.bytes)
            .await
            .map_err(|e| ProcessError::Persistence {
                path: path.clone(),
                source: e,
            })?;

        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| ProcessError::Persistence {
                path: path.clone(),
                source: e,
            })?;

        info!("saved artifact to {}", path.display());
        Ok(path)
    }
}

/// Apply a naming policy to produce the base filename.
fn resolve_name(naming: NamingPolicy, source_name: &str) -> String {
    match naming {
        NamingPolicy::Fixed(name) => name.to_string(),
        NamingPolicy::DerivedPrefix(prefix) => {
            format!("{prefix}{}", sanitize(source_name))
        }
        NamingPolicy::DerivedSwapExt(ext) => {
            let base = sanitize(source_name);
            let stem = base.rsplit_once('.').map(|(s, _)| s).unwrap_or(&base);
            format!("{stem}.{ext}")
        }
        NamingPolicy::Timestamped { stem, ext } => {
            let ts = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            format!("{stem}-{ts}.{ext}")
        }
    }
}

/// Strip path separators a hostile picker name could smuggle in.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// First free path for `name` in `dir`: the name itself, then `stem-1.ext`,
/// `stem-2.ext`, …
fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((s, e)) => (s.to_string(), Some(e.to_string())),
        None => (name.to_string(), None),
    };

    for n in 1u32.. {
        let next = match &ext {
            Some(e) => dir.join(format!("{stem}-{n}.{e}")),
            None => dir.join(format!("{stem}-{n}")),
        };
        if !next.exists() {
            return next;
        }
    }
    unreachable!("u32 suffix space exhausted")
}
