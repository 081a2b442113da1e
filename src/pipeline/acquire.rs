//! File acquisition: normalise picked files into descriptors.
//!
//! The platform file picker is abstracted behind [`FilePicker`] so the
//! orchestrator never touches a picker API directly — the CLI picks from
//! command-line paths, a GUI host would wrap its native dialog, and tests
//! construct descriptors by hand. Whatever the source, the session only ever
//! sees [`FileDescriptor`]s.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::FileKind;
use crate::error::ProcessError;
use crate::session::FileDescriptor;

/// Produces normalised descriptors from some platform selection surface.
pub trait FilePicker {
    /// Resolve one picked location into a descriptor.
    fn pick(&self, location: &Path) -> Result<FileDescriptor, ProcessError>;

    /// Resolve many locations, preserving the given order — selection order
    /// is the order the files are uploaded in.
    fn pick_all(&self, locations: &[PathBuf]) -> Result<Vec<FileDescriptor>, ProcessError> {
        locations.iter().map(|p| self.pick(p)).collect()
    }
}

/// Picker over local filesystem paths (the CLI's selection surface).
///
/// Reads the byte size eagerly so the validation gate can enforce the size
/// ceiling before anything is uploaded; the media type comes from the file
/// extension, the same fallback the gate itself applies.
pub struct PathPicker;

impl FilePicker for PathPicker {
    fn pick(&self, location: &Path) -> Result<FileDescriptor, ProcessError> {
        let meta = match fs::metadata(location) {
            Ok(m) if m.is_file() => m,
            Ok(_) => {
                return Err(ProcessError::FileNotFound {
                    path: location.to_path_buf(),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ProcessError::FileNotFound {
                    path: location.to_path_buf(),
                })
            }
            Err(e) => {
                return Err(ProcessError::FileUnreadable {
                    path: location.to_path_buf(),
                    source: e,
                })
            }
        };

        let name = location
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        let media_type = media_type_for(&name);

        debug!("Picked {} ({} bytes, {})", name, meta.len(), media_type);

        Ok(FileDescriptor {
            location: location.to_path_buf(),
            name,
            media_type: media_type.to_string(),
            size_bytes: Some(meta.len()),
        })
    }
}

/// Extension-based media type, mirroring what mobile pickers report.
fn media_type_for(name: &str) -> &'static str {
    for kind in [
        FileKind::Pdf,
        FileKind::Jpeg,
        FileKind::Png,
        FileKind::Word,
        FileKind::Excel,
    ] {
        if kind.matches("", name) {
            return kind.default_media_type();
        }
    }
    "application/octet-stream"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn pick_reads_name_size_and_media_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(b"%PDF-1.4 fake").unwrap();

        let desc = PathPicker.pick(&path).unwrap();
        assert_eq!(desc.name, "report.pdf");
        assert_eq!(desc.media_type, "application/pdf");
        assert_eq!(desc.size_bytes, Some(13));
    }

    #[test]
    fn pick_missing_file_is_not_found() {
        let err = PathPicker.pick(Path::new("/definitely/missing.pdf"));
        assert!(matches!(err, Err(ProcessError::FileNotFound { .. })));
    }

    #[test]
    fn pick_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PathPicker.pick(dir.path());
        assert!(matches!(err, Err(ProcessError::FileNotFound { .. })));
    }

    #[test]
    fn pick_all_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for name in ["c.pdf", "a.pdf", "b.pdf"] {
            let p = dir.path().join(name);
            fs::write(&p, b"x").unwrap();
            paths.push(p);
        }

        let descs = PathPicker.pick_all(&paths).unwrap();
        let names: Vec<_> = descs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["c.pdf", "a.pdf", "b.pdf"]);
    }

    #[test]
    fn unknown_extension_is_octet_stream() {
        assert_eq!(media_type_for("archive.tar.gz"), "application/octet-stream");
        assert_eq!(media_type_for("photo.JPG"), "image/jpeg");
    }
}
