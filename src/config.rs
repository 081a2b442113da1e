//! Processing rules and client configuration.
//!
//! Two kinds of configuration live here:
//!
//! * [`ToolConfig`] — the per-tool processing rules (accepted file types,
//!   multiplicity, size ceiling, endpoint, output naming). These are static
//!   data: each tool is a record in a table, not a code path. Every
//!   catalogued id resolves to exactly one config — ids without a bespoke
//!   entry fall back to [`ToolConfig::DEFAULT`].
//!
//! * [`ServiceConfig`] — where the remote service lives and where artifacts
//!   land locally, built via [`ServiceConfigBuilder`] so callers set only
//!   what they care about and rely on documented defaults for the rest.

use std::path::PathBuf;
use std::time::Duration;

use crate::options::OptionSchema;

/// Accepted input file categories, matched on media type with a
/// file-extension fallback for pickers that report none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Jpeg,
    Png,
    Word,
    Excel,
}

impl FileKind {
    /// Does `media_type` (or, failing that, the `name` extension) belong to
    /// this kind?
    pub fn matches(self, media_type: &str, name: &str) -> bool {
        let mt = media_type.to_ascii_lowercase();
        if !mt.is_empty() && mt != "application/octet-stream" {
            return match self {
                FileKind::Pdf => mt == "application/pdf",
                FileKind::Jpeg => mt == "image/jpeg" || mt == "image/jpg",
                FileKind::Png => mt == "image/png",
                FileKind::Word => {
                    mt == "application/msword"
                        || mt == "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                }
                FileKind::Excel => {
                    mt == "application/vnd.ms-excel"
                        || mt == "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
                }
            };
        }
        let ext = name.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
        match self {
            FileKind::Pdf => ext == "pdf",
            FileKind::Jpeg => ext == "jpg" || ext == "jpeg",
            FileKind::Png => ext == "png",
            FileKind::Word => ext == "doc" || ext == "docx",
            FileKind::Excel => ext == "xls" || ext == "xlsx",
        }
    }

    /// Short label used in rejection messages.
    pub fn label(self) -> &'static str {
        match self {
            FileKind::Pdf => "PDF",
            FileKind::Jpeg => "JPEG",
            FileKind::Png => "PNG",
            FileKind::Word => "Word (.doc/.docx)",
            FileKind::Excel => "Excel (.xls/.xlsx)",
        }
    }

    /// The media type sent for a file of this kind when the picker reported
    /// none.
    pub fn default_media_type(self) -> &'static str {
        match self {
            FileKind::Pdf => "application/pdf",
            FileKind::Jpeg => "image/jpeg",
            FileKind::Png => "image/png",
            FileKind::Word => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            FileKind::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

/// How to name the persisted artifact for a tool.
///
/// Single-output tools use a fixed name, one-to-one conversions derive the
/// name from the source file, and tools whose output is commonly produced
/// repeatedly get a timestamp qualifier. All resolved names are additionally
/// uniquified by [`crate::pipeline::persist::ArtifactStore`] so a rerun never
/// silently overwrites an earlier, unretrieved result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingPolicy {
    /// Always this name, e.g. `merged.pdf`.
    Fixed(&'static str),
    /// Prefix the source file name, e.g. `numbered-report.pdf`.
    DerivedPrefix(&'static str),
    /// Source name with its extension swapped, e.g. `report.docx` → `report.pdf`.
    DerivedSwapExt(&'static str),
    /// `<stem>-<unix-seconds>.<ext>`, e.g. `converted-images-1719824001.zip`.
    Timestamped {
        stem: &'static str,
        ext: &'static str,
    },
}

/// Per-tool processing rules. One record per tool; the pipeline is the same
/// code path for all of them.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Media types the tool accepts.
    pub accepted: &'static [FileKind],
    /// Whether the selection may hold more than one file.
    pub allow_multiple: bool,
    /// Minimum number of files required to submit (2 for merge, else 1).
    pub min_files: usize,
    /// Noun used in count-rule rejections ("PDF files", "images", …).
    pub file_noun: &'static str,
    /// Per-file size ceiling in bytes.
    pub max_file_size: u64,
    /// Multipart field name carrying the file part(s).
    pub file_field: &'static str,
    /// Service path, e.g. `/api/merge-pdf`.
    pub endpoint: &'static str,
    /// Which option family this tool takes.
    pub options: OptionSchema,
    /// How the persisted artifact is named.
    pub naming: NamingPolicy,
}

const MB: u64 = 1024 * 1024;

impl ToolConfig {
    /// The documented fallback for catalogued ids without a bespoke entry:
    /// single PDF input, 50 MB ceiling, `/api/<id>` endpoint, fixed
    /// `<id>.pdf` output. Endpoint and naming are filled in by
    /// [`ToolConfig::for_tool`].
    pub const DEFAULT: ToolConfig = ToolConfig {
        accepted: &[FileKind::Pdf],
        allow_multiple: false,
        min_files: 1,
        file_noun: "PDF file",
        max_file_size: 50 * MB,
        file_field: "file",
        endpoint: "",
        options: OptionSchema::None,
        naming: NamingPolicy::DerivedPrefix("processed-"),
    };

    /// Resolve the processing config for a tool id.
    ///
    /// Every [`crate::catalog::ToolDescriptor`] id resolves; unknown ids also
    /// resolve (to the default) so callers that already hold a descriptor
    /// never need a second not-found path.
    pub fn for_tool(id: &str) -> ToolConfig {
        match id {
            "merge-pdf" => ToolConfig {
                allow_multiple: true,
                min_files: 2,
                file_noun: "PDF files",
                file_field: "pdfs",
                endpoint: "/api/merge-pdf",
                naming: NamingPolicy::Fixed("merged.pdf"),
                ..Self::DEFAULT
            },
            "split-pdf" => ToolConfig {
                file_field: "pdf",
                endpoint: "/api/split-pdf",
                options: OptionSchema::Split,
                naming: NamingPolicy::Fixed("split-documents.zip"),
                ..Self::DEFAULT
            },
            "compress-pdf" => ToolConfig {
                max_file_size: 100 * MB,
                file_field: "pdf",
                endpoint: "/api/compress-pdf",
                options: OptionSchema::Compress,
                naming: NamingPolicy::DerivedPrefix("compressed-"),
                ..Self::DEFAULT
            },
            "organize-pdf" => ToolConfig {
                file_field: "pdf",
                endpoint: "/api/organize-pdf",
                options: OptionSchema::Organize,
                naming: NamingPolicy::Fixed("organized.pdf"),
                ..Self::DEFAULT
            },
            "add-page-numbers" => ToolConfig {
                file_field: "pdf",
                endpoint: "/api/add-page-numbers",
                options: OptionSchema::PageNumbers,
                naming: NamingPolicy::DerivedPrefix("numbered-"),
                ..Self::DEFAULT
            },
            "pdf-to-image" => ToolConfig {
                endpoint: "/api/pdf-to-images",
                naming: NamingPolicy::Timestamped {
                    stem: "converted-images",
                    ext: "zip",
                },
                ..Self::DEFAULT
            },
            "image-to-pdf" => ToolConfig {
                accepted: &[FileKind::Jpeg, FileKind::Png],
                allow_multiple: true,
                min_files: 1,
                file_noun: "image",
                max_file_size: 10 * MB,
                file_field: "images",
                endpoint: "/api/images-to-pdf",
                naming: NamingPolicy::Fixed("converted.pdf"),
                ..Self::DEFAULT
            },
            "remove-bg" => ToolConfig {
                accepted: &[FileKind::Jpeg, FileKind::Png],
                file_noun: "image",
                max_file_size: 10 * MB,
                endpoint: "/api/remove-bg",
                naming: NamingPolicy::DerivedPrefix("no-bg-"),
                ..Self::DEFAULT
            },
            "word-to-pdf" => ToolConfig {
                accepted: &[FileKind::Word],
                file_noun: "Word document",
                max_file_size: 25 * MB,
                endpoint: "/api/word-to-pdf",
                naming: NamingPolicy::DerivedSwapExt("pdf"),
                ..Self::DEFAULT
            },
            "excel-to-pdf" => ToolConfig {
                accepted: &[FileKind::Excel],
                file_noun: "spreadsheet",
                max_file_size: 25 * MB,
                endpoint: "/api/excel-to-pdf",
                naming: NamingPolicy::DerivedSwapExt("pdf"),
                ..Self::DEFAULT
            },
            other => ToolConfig {
                endpoint: default_endpoint(other),
                ..Self::DEFAULT
            },
        }
    }

    /// Human-readable list of accepted kinds for rejection messages.
    pub fn accepted_label(&self) -> String {
        self.accepted
            .iter()
            .map(|k| k.label())
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

/// `/api/<id>` for ids without a bespoke table entry.
///
/// Leaks once per unknown id; tool ids are a small closed set in practice.
fn default_endpoint(id: &str) -> &'static str {
    Box::leak(format!("/api/{id}").into_boxed_str())
}

/// Where the remote service lives and where artifacts land.
///
/// Built via [`ServiceConfig::builder()`] or [`ServiceConfig::default()`].
///
/// # Example
/// ```rust
/// use docflow::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .base_url("https://docflow.example.com")
///     .documents_dir("/tmp/docflow")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Service origin. Default: the hosted DocFlow backend.
    ///
    /// No authentication header is sent and no API version is negotiated —
    /// acceptable simplifications for a single-backend client.
    pub base_url: String,

    /// Directory artifacts are written into. Default: `./documents`.
    ///
    /// No manifest of past conversions is kept; the directory listing is the
    /// only record.
    pub documents_dir: PathBuf,

    /// Whole-request timeout. Default: 120 s — long enough for the backend's
    /// cold starts, short enough that a dead connection surfaces while the
    /// user is still looking at the screen.
    pub request_timeout: Duration,

    /// Duration of the cosmetic upload progress sweep. Default: 2000 ms,
    /// matching the app animation this client replaces. The sweep is
    /// presentational only — this transport emits no real progress events.
    pub upload_animation_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://docflow-backend-q83c.onrender.com".to_string(),
            documents_dir: PathBuf::from("documents"),
            request_timeout: Duration::from_secs(120),
            upload_animation_ms: 2000,
        }
    }
}

impl ServiceConfig {
    /// Create a new builder for `ServiceConfig`.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder {
            config: Self::default(),
        }
    }

    /// Full URL for a tool endpoint.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn documents_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.documents_dir = dir.into();
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn upload_animation_ms(mut self, ms: u64) -> Self {
        self.config.upload_animation_ms = ms;
        self
    }

    pub fn build(self) -> ServiceConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_config_requires_two_files() {
        let cfg = ToolConfig::for_tool("merge-pdf");
        assert!(cfg.allow_multiple);
        assert_eq!(cfg.min_files, 2);
        assert_eq!(cfg.file_field, "pdfs");
        assert_eq!(cfg.naming, NamingPolicy::Fixed("merged.pdf"));
    }

    #[test]
    fn unknown_tool_falls_back_to_default() {
        let cfg = ToolConfig::for_tool("pdf-to-excel");
        assert!(!cfg.allow_multiple);
        assert_eq!(cfg.max_file_size, 50 * MB);
        assert_eq!(cfg.endpoint, "/api/pdf-to-excel");
    }

    #[test]
    fn image_tools_cap_at_ten_megabytes() {
        for id in ["image-to-pdf", "remove-bg"] {
            let cfg = ToolConfig::for_tool(id);
            assert_eq!(cfg.max_file_size, 10 * MB, "{id}");
            assert!(cfg.accepted.contains(&FileKind::Jpeg));
        }
    }

    #[test]
    fn file_kind_matches_media_type_first() {
        assert!(FileKind::Pdf.matches("application/pdf", "whatever.bin"));
        assert!(!FileKind::Pdf.matches("image/png", "file.pdf"));
    }

    #[test]
    fn file_kind_falls_back_to_extension() {
        assert!(FileKind::Pdf.matches("", "report.PDF"));
        assert!(FileKind::Jpeg.matches("application/octet-stream", "photo.jpeg"));
        assert!(!FileKind::Word.matches("", "notes.txt"));
    }

    #[test]
    fn endpoint_url_joins_without_double_slash() {
        let cfg = ServiceConfig::builder()
            .base_url("https://svc.example.com/")
            .build();
        assert_eq!(
            cfg.endpoint_url("/api/merge-pdf"),
            "https://svc.example.com/api/merge-pdf"
        );
    }

    #[test]
    fn builder_overrides_only_what_is_set() {
        let cfg = ServiceConfig::builder()
            .upload_animation_ms(150)
            .build();
        assert_eq!(cfg.upload_animation_ms, 150);
        assert!(cfg.base_url.contains("docflow-backend"));
    }

    #[test]
    fn accepted_label_joins_kinds() {
        let cfg = ToolConfig::for_tool("image-to-pdf");
        assert_eq!(cfg.accepted_label(), "JPEG or PNG");
    }
}
