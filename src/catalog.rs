//! The static tool catalog: every file-processing tool the app exposes.
//!
//! The catalog is loaded once at process start and never mutated; lookups
//! are pure and synchronous. A missing id is a normal outcome (the user can
//! navigate to any id), so [`find_by_id`] returns `Option` and callers render
//! a not-found state rather than treating it as an error.

use once_cell::sync::Lazy;
use serde::Serialize;

/// Broad grouping used by the tool list UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCategory {
    Pdf,
    Image,
    Document,
}

/// One immutable catalog entry.
///
/// Display metadata only — processing rules live in
/// [`crate::config::ToolConfig`], resolved separately so a descriptor can
/// exist before its pipeline is wired (it then falls back to the documented
/// default config).
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub category: ToolCategory,
}

static TOOLS: Lazy<Vec<ToolDescriptor>> = Lazy::new(|| {
    use ToolCategory::*;
    vec![
        ToolDescriptor {
            id: "merge-pdf",
            display_name: "Merge PDF",
            icon: "file-multiple",
            description: "Combine several PDFs into one document",
            category: Pdf,
        },
        ToolDescriptor {
            id: "split-pdf",
            display_name: "Split PDF",
            icon: "file-split",
            description: "Split a PDF into separate page ranges",
            category: Pdf,
        },
        ToolDescriptor {
            id: "compress-pdf",
            display_name: "Compress PDF",
            icon: "zip-box",
            description: "Shrink a PDF's file size",
            category: Pdf,
        },
        ToolDescriptor {
            id: "organize-pdf",
            display_name: "Organize PDF",
            icon: "file-swap",
            description: "Reorder or rotate the pages of a PDF",
            category: Pdf,
        },
        ToolDescriptor {
            id: "add-page-numbers",
            display_name: "Add Page Numbers",
            icon: "format-list-numbered",
            description: "Stamp page numbers onto every page",
            category: Pdf,
        },
        ToolDescriptor {
            id: "extract-pdf-pages",
            display_name: "Extract Pages",
            icon: "file-export",
            description: "Pull selected pages into a new PDF",
            category: Pdf,
        },
        ToolDescriptor {
            id: "remove-pdf-pages",
            display_name: "Remove Pages",
            icon: "file-remove",
            description: "Delete selected pages from a PDF",
            category: Pdf,
        },
        ToolDescriptor {
            id: "pdf-to-word",
            display_name: "PDF to Word",
            icon: "file-word",
            description: "Convert a PDF into an editable Word document",
            category: Pdf,
        },
        ToolDescriptor {
            id: "pdf-to-excel",
            display_name: "PDF to Excel",
            icon: "file-excel",
            description: "Convert PDF tables into a spreadsheet",
            category: Pdf,
        },
        ToolDescriptor {
            id: "pdf-to-image",
            display_name: "PDF to Images",
            icon: "file-image",
            description: "Export each PDF page as an image",
            category: Pdf,
        },
        ToolDescriptor {
            id: "remove-bg",
            display_name: "Remove Background",
            icon: "image-off",
            description: "Cut the background out of a photo",
            category: Image,
        },
        ToolDescriptor {
            id: "image-to-pdf",
            display_name: "Images to PDF",
            icon: "image-multiple",
            description: "Bundle one or more images into a PDF",
            category: Image,
        },
        ToolDescriptor {
            id: "word-to-pdf",
            display_name: "Word to PDF",
            icon: "file-document",
            description: "Convert a Word document to PDF",
            category: Document,
        },
        ToolDescriptor {
            id: "excel-to-pdf",
            display_name: "Excel to PDF",
            icon: "table",
            description: "Convert a spreadsheet to PDF",
            category: Document,
        },
    ]
});

/// All catalogued tools, in display order.
pub fn all() -> &'static [ToolDescriptor] {
    &TOOLS
}

/// Look up a tool by id. `None` is a normal outcome, not an error.
pub fn find_by_id(id: &str) -> Option<&'static ToolDescriptor> {
    TOOLS.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = all().iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), all().len());
    }

    #[test]
    fn find_known_tool() {
        let tool = find_by_id("merge-pdf").expect("merge-pdf is catalogued");
        assert_eq!(tool.display_name, "Merge PDF");
        assert_eq!(tool.category, ToolCategory::Pdf);
    }

    #[test]
    fn find_unknown_tool_is_none() {
        assert!(find_by_id("rotate-the-moon").is_none());
        assert!(find_by_id("").is_none());
    }

    #[test]
    fn every_descriptor_has_display_metadata() {
        for tool in all() {
            assert!(!tool.id.is_empty());
            assert!(!tool.display_name.is_empty());
            assert!(!tool.description.is_empty());
            assert!(!tool.icon.is_empty());
        }
    }

    #[test]
    fn every_descriptor_resolves_a_config() {
        // Catalog invariant: a descriptor without a bespoke config falls
        // back to the default, so resolution never fails.
        for tool in all() {
            let cfg = crate::config::ToolConfig::for_tool(tool.id);
            assert!(!cfg.endpoint.is_empty(), "{} has no endpoint", tool.id);
            assert!(!cfg.file_field.is_empty());
        }
    }
}
