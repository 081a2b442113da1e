//! The validation gate: catalog-declared rules enforced before submission.
//!
//! Rules run in a fixed order and the first failure wins, so the user always
//! sees the single most actionable problem:
//!
//! 1. count — exactly 1 for single-file tools, ≥ the documented minimum for
//!    multi-file tools (2 for merge, 1 for image-to-pdf)
//! 2. type — every file must match the tool's accepted kinds; the first
//!    offender is named
//! 3. size — any file over the tool's ceiling is named together with the
//!    limit
//! 4. options — the tool's option values must be syntactically valid
//!
//! The gate is pure and cheap, so the session re-runs it on every
//! user-visible change (file added/removed, option edited) — not only at
//! submit time — which is what lets the submit affordance be disabled
//! proactively.

use crate::config::ToolConfig;
use crate::error::ValidationError;
use crate::options::ToolOptions;
use crate::session::FileDescriptor;

/// Check a selection and its options against a tool's rules.
pub fn validate(
    tool_name: &str,
    config: &ToolConfig,
    files: &[FileDescriptor],
    options: &ToolOptions,
) -> Result<(), ValidationError> {
    // Rule 1: count
    if !config.allow_multiple {
        if files.len() != 1 {
            return Err(ValidationError::SingleFileRequired {
                tool: tool_name.to_string(),
                got: files.len(),
            });
        }
    } else if files.len() < config.min_files {
        return Err(ValidationError::NotEnoughFiles {
            tool: tool_name.to_string(),
            min: config.min_files,
            noun: config.file_noun,
            got: files.len(),
        });
    }

    // Rule 2: type — first non-matching file is named
    for file in files {
        let matches = config
            .accepted
            .iter()
            .any(|kind| kind.matches(&file.media_type, &file.name));
        if !matches {
            return Err(ValidationError::UnsupportedType {
                name: file.name.clone(),
                expected: config.accepted_label(),
            });
        }
    }

    // Rule 3: size — unknown sizes pass (the service enforces its own cap)
    for file in files {
        if let Some(size) = file.size_bytes {
            if size > config.max_file_size {
                return Err(ValidationError::FileTooLarge {
                    name: file.name.clone(),
                    size,
                    limit: config.max_file_size,
                });
            }
        }
    }

    // Rule 4: option family and syntax
    if options.schema() != config.options {
        return Err(ValidationError::WrongOptions {
            tool: tool_name.to_string(),
            given: options.family_label(),
        });
    }
    options.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionSchema;
    use std::path::PathBuf;

    fn pdf(name: &str, size: u64) -> FileDescriptor {
        FileDescriptor {
            location: PathBuf::from(format!("/tmp/{name}")),
            name: name.to_string(),
            media_type: "application/pdf".to_string(),
            size_bytes: Some(size),
        }
    }

    fn jpeg(name: &str) -> FileDescriptor {
        FileDescriptor {
            location: PathBuf::from(format!("/tmp/{name}")),
            name: name.to_string(),
            media_type: "image/jpeg".to_string(),
            size_bytes: Some(1024),
        }
    }

    #[test]
    fn single_file_tool_rejects_any_other_count() {
        let cfg = ToolConfig::for_tool("split-pdf");
        let opts = ToolOptions::Split {
            ranges: vec!["1".into()],
        };

        for count in [0usize, 2, 3] {
            let files: Vec<_> = (0..count).map(|i| pdf(&format!("f{i}.pdf"), 10)).collect();
            let err = validate("Split PDF", &cfg, &files, &opts).unwrap_err();
            assert!(
                matches!(err, ValidationError::SingleFileRequired { got, .. } if got == count),
                "count {count}"
            );
        }

        assert!(validate("Split PDF", &cfg, &[pdf("a.pdf", 10)], &opts).is_ok());
    }

    #[test]
    fn merge_requires_two_files() {
        let cfg = ToolConfig::for_tool("merge-pdf");
        let opts = ToolOptions::None;

        for count in [0usize, 1] {
            let files: Vec<_> = (0..count).map(|i| pdf(&format!("f{i}.pdf"), 10)).collect();
            assert!(
                matches!(
                    validate("Merge PDF", &cfg, &files, &opts),
                    Err(ValidationError::NotEnoughFiles { min: 2, .. })
                ),
                "count {count}"
            );
        }

        let files = vec![pdf("a.pdf", 10), pdf("b.pdf", 10)];
        assert!(validate("Merge PDF", &cfg, &files, &opts).is_ok());
    }

    #[test]
    fn image_to_pdf_requires_at_least_one_image() {
        let cfg = ToolConfig::for_tool("image-to-pdf");
        let err = validate("Images to PDF", &cfg, &[], &ToolOptions::None).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NotEnoughFiles { min: 1, noun: "image", .. }
        ));
    }

    #[test]
    fn first_wrong_type_is_named() {
        let cfg = ToolConfig::for_tool("merge-pdf");
        let files = vec![pdf("ok.pdf", 10), jpeg("photo.jpg"), jpeg("other.jpg")];
        let err = validate("Merge PDF", &cfg, &files, &ToolOptions::None).unwrap_err();
        assert!(
            matches!(err, ValidationError::UnsupportedType { ref name, .. } if name == "photo.jpg"),
            "got {err:?}"
        );
    }

    #[test]
    fn extension_fallback_accepts_untyped_picks() {
        let cfg = ToolConfig::for_tool("split-pdf");
        let file = FileDescriptor {
            location: PathBuf::from("/tmp/doc.pdf"),
            name: "doc.pdf".to_string(),
            media_type: String::new(),
            size_bytes: Some(10),
        };
        let opts = ToolOptions::Split {
            ranges: vec!["1-2".into()],
        };
        assert!(validate("Split PDF", &cfg, &[file], &opts).is_ok());
    }

    #[test]
    fn oversize_file_is_named_with_limit() {
        let cfg = ToolConfig::for_tool("merge-pdf");
        let files = vec![pdf("a.pdf", 10), pdf("huge.pdf", cfg.max_file_size + 1)];
        let err = validate("Merge PDF", &cfg, &files, &ToolOptions::None).unwrap_err();
        match err {
            ValidationError::FileTooLarge { name, limit, .. } => {
                assert_eq!(name, "huge.pdf");
                assert_eq!(limit, cfg.max_file_size);
            }
            other => panic!("expected FileTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn count_rule_wins_over_type_rule() {
        // Rules are ordered: an empty selection reports the count problem
        // even though there are also no typed files to inspect.
        let cfg = ToolConfig::for_tool("merge-pdf");
        let err = validate("Merge PDF", &cfg, &[], &ToolOptions::None).unwrap_err();
        assert!(matches!(err, ValidationError::NotEnoughFiles { .. }));
    }

    #[test]
    fn option_family_must_match_tool() {
        let cfg = ToolConfig::for_tool("split-pdf");
        assert_eq!(cfg.options, OptionSchema::Split);
        let err = validate("Split PDF", &cfg, &[pdf("a.pdf", 10)], &ToolOptions::None).unwrap_err();
        assert!(matches!(err, ValidationError::WrongOptions { .. }));
    }

    #[test]
    fn bad_option_syntax_is_rejected_before_submit() {
        let cfg = ToolConfig::for_tool("add-page-numbers");
        let opts = ToolOptions::PageNumbers {
            position: Default::default(),
            start_page: "0".into(),
            start_number: "1".into(),
            format: Default::default(),
        };
        let err = validate("Add Page Numbers", &cfg, &[pdf("a.pdf", 10)], &opts).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidNumber { .. }));
    }

    #[test]
    fn unknown_size_passes_the_size_rule() {
        let cfg = ToolConfig::for_tool("split-pdf");
        let file = FileDescriptor {
            location: PathBuf::from("/tmp/doc.pdf"),
            name: "doc.pdf".to_string(),
            media_type: "application/pdf".to_string(),
            size_bytes: None,
        };
        let opts = ToolOptions::Split {
            ranges: vec!["1".into()],
        };
        assert!(validate("Split PDF", &cfg, &[file], &opts).is_ok());
    }
}
