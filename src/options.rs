//! Tool-specific option values and their wire encoding.
//!
//! Each tool family has one options variant; the variant holds exactly what
//! the user edited. Numeric fields stay as the raw entered strings — the
//! validation gate parses them (rule 4) on every edit so the submit action
//! can be disabled proactively, and [`ToolOptions::to_fields`] re-serialises
//! the parsed integers as decimal strings for the request body.
//!
//! Syntax only is checked here. Whether a range fits the document or a
//! permutation is complete is the remote service's call — the raw strings
//! pass through verbatim.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;

/// Which option family a tool takes (declared in
/// [`crate::config::ToolConfig`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionSchema {
    None,
    Split,
    Compress,
    Organize,
    PageNumbers,
}

/// Compression strength for compress-pdf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl CompressionLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            CompressionLevel::Low => "low",
            CompressionLevel::Medium => "medium",
            CompressionLevel::High => "high",
        }
    }
}

/// The nine compass placements for a stamped page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagePosition {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    #[default]
    BottomCenter,
    BottomRight,
}

impl PagePosition {
    pub fn as_str(self) -> &'static str {
        match self {
            PagePosition::TopLeft => "top-left",
            PagePosition::TopCenter => "top-center",
            PagePosition::TopRight => "top-right",
            PagePosition::MiddleLeft => "middle-left",
            PagePosition::MiddleCenter => "middle-center",
            PagePosition::MiddleRight => "middle-right",
            PagePosition::BottomLeft => "bottom-left",
            PagePosition::BottomCenter => "bottom-center",
            PagePosition::BottomRight => "bottom-right",
        }
    }
}

/// Label style for stamped page numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageNumberFormat {
    /// Just the number: `7`.
    #[default]
    NumberOnly,
    /// `Page 7 of 34`.
    PageOfTotal,
}

impl PageNumberFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            PageNumberFormat::NumberOnly => "number_only",
            PageNumberFormat::PageOfTotal => "page_of_total",
        }
    }
}

/// User-edited option values for the active session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOptions {
    /// Tools with no options beyond the file selection.
    None,
    /// split-pdf: free-text range tokens, each `N` or `N-M`.
    Split { ranges: Vec<String> },
    /// compress-pdf.
    Compress { level: CompressionLevel },
    /// organize-pdf: a comma-separated permutation of 1-based page indices,
    /// optionally with a quarter-turn rotation.
    Organize {
        page_order: String,
        rotate_angle: Option<String>,
    },
    /// add-page-numbers. `start_page` and `start_number` are raw user input.
    PageNumbers {
        position: PagePosition,
        start_page: String,
        start_number: String,
        format: PageNumberFormat,
    },
}

impl ToolOptions {
    /// The sensible starting value for a tool's option family.
    pub fn default_for(schema: OptionSchema) -> Self {
        match schema {
            OptionSchema::None => ToolOptions::None,
            OptionSchema::Split => ToolOptions::Split { ranges: Vec::new() },
            OptionSchema::Compress => ToolOptions::Compress {
                level: CompressionLevel::default(),
            },
            OptionSchema::Organize => ToolOptions::Organize {
                page_order: String::new(),
                rotate_angle: None,
            },
            OptionSchema::PageNumbers => ToolOptions::PageNumbers {
                position: PagePosition::default(),
                start_page: "1".to_string(),
                start_number: "1".to_string(),
                format: PageNumberFormat::default(),
            },
        }
    }

    /// The family this value belongs to.
    pub fn schema(&self) -> OptionSchema {
        match self {
            ToolOptions::None => OptionSchema::None,
            ToolOptions::Split { .. } => OptionSchema::Split,
            ToolOptions::Compress { .. } => OptionSchema::Compress,
            ToolOptions::Organize { .. } => OptionSchema::Organize,
            ToolOptions::PageNumbers { .. } => OptionSchema::PageNumbers,
        }
    }

    /// Short label for mismatch rejections.
    pub fn family_label(&self) -> &'static str {
        match self {
            ToolOptions::None => "no",
            ToolOptions::Split { .. } => "page-range",
            ToolOptions::Compress { .. } => "compression",
            ToolOptions::Organize { .. } => "page-order",
            ToolOptions::PageNumbers { .. } => "page-number",
        }
    }

    /// Syntax check for the values as entered (gate rule 4).
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            ToolOptions::None | ToolOptions::Compress { .. } => Ok(()),
            ToolOptions::Split { ranges } => validate_ranges(ranges),
            ToolOptions::Organize {
                page_order,
                rotate_angle,
            } => {
                validate_page_order(page_order)?;
                if let Some(angle) = rotate_angle {
                    parse_angle(angle)?;
                }
                Ok(())
            }
            ToolOptions::PageNumbers {
                start_page,
                start_number,
                ..
            } => {
                parse_min_one("start page", start_page)?;
                parse_min_one("start number", start_number)?;
                Ok(())
            }
        }
    }

    /// Serialise to multipart form fields, in the order the original client
    /// sent them.
    ///
    /// A session always validates before building, so the parses below are
    /// guaranteed to succeed at that point; calling out of order surfaces the
    /// same [`ValidationError`] the gate would have raised.
    pub fn to_fields(&self) -> Result<Vec<(String, String)>, ValidationError> {
        match self {
            ToolOptions::None => Ok(Vec::new()),
            ToolOptions::Split { ranges } => {
                validate_ranges(ranges)?;
                let tokens: Vec<&str> = ranges
                    .iter()
                    .map(|r| r.trim())
                    .filter(|r| !r.is_empty())
                    .collect();
                // The service expects the raw tokens as a JSON array, exactly
                // as entered.
                let json = serde_json::to_string(&tokens)
                    .map_err(|_| ValidationError::NoRanges)?;
                Ok(vec![("ranges".to_string(), json)])
            }
            ToolOptions::Compress { level } => Ok(vec![(
                "compressionLevel".to_string(),
                level.as_str().to_string(),
            )]),
            ToolOptions::Organize {
                page_order,
                rotate_angle,
            } => {
                validate_page_order(page_order)?;
                let mut fields = vec![("newOrder".to_string(), page_order.trim().to_string())];
                if let Some(angle) = rotate_angle {
                    let parsed = parse_angle(angle)?;
                    fields.push(("rotateAngle".to_string(), parsed.to_string()));
                }
                Ok(fields)
            }
            ToolOptions::PageNumbers {
                position,
                start_page,
                start_number,
                format,
            } => {
                let page = parse_min_one("start page", start_page)?;
                let number = parse_min_one("start number", start_number)?;
                Ok(vec![
                    ("position".to_string(), position.as_str().to_string()),
                    ("startPage".to_string(), page.to_string()),
                    ("pageFormat".to_string(), format.as_str().to_string()),
                    ("startNumber".to_string(), number.to_string()),
                    ("fontColor".to_string(), "black".to_string()),
                ])
            }
        }
    }
}

static RE_RANGE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(-\d+)?$").unwrap());
static RE_PAGE_ORDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(\s*,\s*\d+)*$").unwrap());

/// Each token must be `N` or `N-M` with 1-based, ordered bounds. Blank
/// tokens are ignored (the UI keeps an empty trailing input row).
fn validate_ranges(ranges: &[String]) -> Result<(), ValidationError> {
    let mut seen = 0usize;
    for raw in ranges {
        let token = raw.trim();
        if token.is_empty() {
            continue;
        }
        seen += 1;
        if !RE_RANGE_TOKEN.is_match(token) {
            return Err(ValidationError::InvalidRange {
                token: token.to_string(),
            });
        }
        let mut parts = token.splitn(2, '-');
        let start: u64 = parts
            .next()
            .unwrap_or("")
            .parse()
            .map_err(|_| ValidationError::InvalidRange {
                token: token.to_string(),
            })?;
        let end: u64 = match parts.next() {
            Some(e) => e.parse().map_err(|_| ValidationError::InvalidRange {
                token: token.to_string(),
            })?,
            None => start,
        };
        if start == 0 || end < start {
            return Err(ValidationError::InvalidRange {
                token: token.to_string(),
            });
        }
    }
    if seen == 0 {
        return Err(ValidationError::NoRanges);
    }
    Ok(())
}

/// Comma-separated 1-based indices. Completeness of the permutation is the
/// service's call; only the shape is checked here.
fn validate_page_order(order: &str) -> Result<(), ValidationError> {
    let trimmed = order.trim();
    if trimmed.is_empty() || !RE_PAGE_ORDER.is_match(trimmed) {
        return Err(ValidationError::InvalidPageOrder {
            order: order.to_string(),
        });
    }
    for part in trimmed.split(',') {
        if part.trim().parse::<u64>().map(|n| n == 0).unwrap_or(true) {
            return Err(ValidationError::InvalidPageOrder {
                order: order.to_string(),
            });
        }
    }
    Ok(())
}

fn parse_angle(value: &str) -> Result<u32, ValidationError> {
    match value.trim().parse::<u32>() {
        Ok(a @ (90 | 180 | 270)) => Ok(a),
        _ => Err(ValidationError::InvalidAngle {
            value: value.to_string(),
        }),
    }
}

fn parse_min_one(field: &'static str, value: &str) -> Result<u32, ValidationError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ValidationError::InvalidNumber {
            field,
            min: 1,
            value: value.to_string(),
        }),
    }
}
