//! Request assembly: selection + options → a multipart payload description.
//!
//! The payload built here is transport-agnostic — just the ordered parts and
//! fields — so part ordering and option encoding are testable without a
//! network stack. [`crate::pipeline::remote::HttpRemoteClient`] turns it into
//! an actual `multipart/form-data` body at send time.
//!
//! ## Ordering is a contract
//!
//! File parts appear in the user's selection order, never reordered. For
//! merge and images-to-pdf the service concatenates parts in arrival order,
//! so this ordering directly determines the output's page/document order.

use std::path::PathBuf;

use crate::config::ToolConfig;
use crate::error::ValidationError;
use crate::options::ToolOptions;
use crate::session::FileDescriptor;

/// One file part of the multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Multipart field name, fixed per tool (`pdfs`, `images`, `pdf`, `file`).
    pub field: String,
    pub file_name: String,
    pub media_type: String,
    /// Where the bytes are read from at send time.
    pub location: PathBuf,
}

/// The fully assembled request: ordered file parts plus option fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPayload {
    /// Service path, e.g. `/api/merge-pdf`.
    pub endpoint: String,
    /// File parts, in selection order.
    pub parts: Vec<FilePart>,
    /// Option fields in their declared order, appended after the files.
    pub fields: Vec<(String, String)>,
}

/// Assemble the payload for a validated selection.
///
/// Options are serialised with the same parsers the validation gate uses; a
/// session always validates before building, so the `Err` arm only surfaces
/// when a caller skips the gate.
pub fn build(
    config: &ToolConfig,
    files: &[FileDescriptor],
    options: &ToolOptions,
) -> Result<RequestPayload, ValidationError> {
    let parts = files
        .iter()
        .map(|f| FilePart {
            field: config.file_field.to_string(),
            file_name: f.name.clone(),
            media_type: f.media_type.clone(),
            location: f.location.clone(),
        })
        .collect();

    Ok(RequestPayload {
        endpoint: config.endpoint.to_string(),
        parts,
        fields: options.to_fields()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{PageNumberFormat, PagePosition};

    fn pdf(name: &str) -> FileDescriptor {
        FileDescriptor {
            location: PathBuf::from(format!("/tmp/{name}")),
            name: name.to_string(),
            media_type: "application/pdf".to_string(),
            size_bytes: Some(1024),
        }
    }

    #[test]
    fn part_order_equals_selection_order() {
        let cfg = ToolConfig::for_tool("merge-pdf");
        let files = vec![pdf("a.pdf"), pdf("b.pdf"), pdf("c.pdf")];

        let payload = build(&cfg, &files, &ToolOptions::None).unwrap();
        let names: Vec<_> = payload.parts.iter().map(|p| p.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "c.pdf"]);
        assert!(payload.parts.iter().all(|p| p.field == "pdfs"));
    }

    #[test]
    fn reordering_the_selection_reorders_the_parts() {
        let cfg = ToolConfig::for_tool("merge-pdf");
        let forward = vec![pdf("a.pdf"), pdf("b.pdf"), pdf("c.pdf")];
        let reversed: Vec<_> = forward.iter().rev().cloned().collect();

        let fwd = build(&cfg, &forward, &ToolOptions::None).unwrap();
        let rev = build(&cfg, &reversed, &ToolOptions::None).unwrap();

        let fwd_names: Vec<_> = fwd.parts.iter().map(|p| p.file_name.clone()).collect();
        let mut rev_names: Vec<_> = rev.parts.iter().map(|p| p.file_name.clone()).collect();
        rev_names.reverse();
        assert_eq!(fwd_names, rev_names);
    }

    #[test]
    fn split_payload_carries_ranges_field() {
        let cfg = ToolConfig::for_tool("split-pdf");
        let opts = ToolOptions::Split {
            ranges: vec!["1-3".into(), "5".into()],
        };

        let payload = build(&cfg, &[pdf("doc.pdf")], &opts).unwrap();
        assert_eq!(payload.endpoint, "/api/split-pdf");
        assert_eq!(payload.parts.len(), 1);
        assert_eq!(payload.parts[0].field, "pdf");
        assert_eq!(
            payload.fields,
            vec![("ranges".to_string(), r#"["1-3","5"]"#.to_string())]
        );
    }

    #[test]
    fn page_number_fields_follow_the_declared_order() {
        let cfg = ToolConfig::for_tool("add-page-numbers");
        let opts = ToolOptions::PageNumbers {
            position: PagePosition::TopRight,
            start_page: "2".into(),
            start_number: "10".into(),
            format: PageNumberFormat::NumberOnly,
        };

        let payload = build(&cfg, &[pdf("doc.pdf")], &opts).unwrap();
        let keys: Vec<_> = payload.fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["position", "startPage", "pageFormat", "startNumber", "fontColor"]
        );
    }

    #[test]
    fn unvalidated_options_surface_the_gate_error() {
        let cfg = ToolConfig::for_tool("split-pdf");
        let opts = ToolOptions::Split {
            ranges: vec!["3-1".into()],
        };
        assert!(build(&cfg, &[pdf("doc.pdf")], &opts).is_err());
    }
}
