//! Diagnostic extraction from Rolldown errors and warnings.
//!
//! Rolldown's diagnostic types change between releases, so they are flattened
//! here into [`ExtractedDiagnostic`], a cloneable and serializable record that
//! the rest of the pipeline logs and reports.

use serde::{Deserialize, Serialize};

/// Extracted diagnostic information from Rolldown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDiagnostic {
    pub kind: DiagnosticKind,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub help: Option<String>,
}

impl ExtractedDiagnostic {
    /// Diagnostic produced by lamina itself rather than parsed from Rolldown.
    pub fn new(kind: DiagnosticKind, severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            file: None,
            line: None,
            column: None,
            help: None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, DiagnosticSeverity::Error)
    }
}

impl std::fmt::Display for ExtractedDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(file) = &self.file {
            write!(f, " ({}", file)?;
            if let Some(line) = self.line {
                write!(f, ":{}", line)?;
                if let Some(column) = self.column {
                    write!(f, ":{}", column)?;
                }
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Diagnostic kind (mirrors Rolldown's EventKind).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    MissingExport,
    ParseError,
    CircularDependency,
    UnresolvedEntry,
    UnresolvedImport,
    InvalidOption,
    Plugin,
    Transform,
    Other(String),
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::MissingExport => write!(f, "MissingExport"),
            DiagnosticKind::ParseError => write!(f, "ParseError"),
            DiagnosticKind::CircularDependency => write!(f, "CircularDependency"),
            DiagnosticKind::UnresolvedEntry => write!(f, "UnresolvedEntry"),
            DiagnosticKind::UnresolvedImport => write!(f, "UnresolvedImport"),
            DiagnosticKind::InvalidOption => write!(f, "InvalidOption"),
            DiagnosticKind::Plugin => write!(f, "Plugin"),
            DiagnosticKind::Transform => write!(f, "Transform"),
            DiagnosticKind::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// Errors and warnings reported by one transform invocation.
///
/// Never fatal by themselves: the orchestrator logs them and keeps going.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    pub errors: Vec<ExtractedDiagnostic>,
    pub warnings: Vec<ExtractedDiagnostic>,
}

impl Diagnostics {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Sort a diagnostic into the errors or warnings list by its severity.
    pub fn push(&mut self, diagnostic: ExtractedDiagnostic) {
        if diagnostic.is_error() {
            self.errors.push(diagnostic);
        } else {
            self.warnings.push(diagnostic);
        }
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Extract diagnostics from Rolldown error types.
///
/// Rolldown does not expose a stable structured API for its batched errors,
/// so this works from the `Debug` rendering.
pub fn extract_from_rolldown_error(error: &dyn std::fmt::Debug) -> Vec<ExtractedDiagnostic> {
    let error_str = format!("{error:?}");

    if error_str.contains("BatchedBuildDiagnostic") {
        let parts: Vec<&str> = error_str
            .split("BatchedBuildDiagnostic")
            .filter(|s| !s.trim().is_empty())
            .collect();
        if parts.len() > 1 {
            return parts
                .iter()
                .map(|part| extract_single(part, DiagnosticSeverity::Error))
                .collect();
        }
    }

    vec![extract_single(&error_str, DiagnosticSeverity::Error)]
}

/// Extract a warning emitted alongside a successful Rolldown build.
pub fn extract_warning(warning: &dyn std::fmt::Debug) -> ExtractedDiagnostic {
    extract_single(&format!("{warning:?}"), DiagnosticSeverity::Warning)
}

fn extract_single(text: &str, severity: DiagnosticSeverity) -> ExtractedDiagnostic {
    ExtractedDiagnostic {
        kind: classify(text),
        severity,
        message: text.trim().to_string(),
        file: extract_file_path(text),
        line: extract_line_number(text),
        column: extract_column_number(text),
        help: extract_help_text(text),
    }
}

fn classify(text: &str) -> DiagnosticKind {
    if text.contains("MissingExport") {
        DiagnosticKind::MissingExport
    } else if text.contains("Parse error") || text.contains("Syntax") || text.contains("Expected")
    {
        DiagnosticKind::ParseError
    } else if text.contains("Circular") || text.contains("cycle") {
        DiagnosticKind::CircularDependency
    } else if text.contains("UnresolvedEntry") {
        DiagnosticKind::UnresolvedEntry
    } else if text.contains("UnresolvedImport") || text.contains("Cannot resolve") {
        DiagnosticKind::UnresolvedImport
    } else if text.contains("InvalidOption") {
        DiagnosticKind::InvalidOption
    } else if text.contains("Plugin") {
        DiagnosticKind::Plugin
    } else if text.contains("Transform") || text.contains("transform") {
        DiagnosticKind::Transform
    } else {
        DiagnosticKind::Other("Bundler".to_string())
    }
}

/// Extract file path from error message.
fn extract_file_path(text: &str) -> Option<String> {
    for ext in &[".tsx", ".ts", ".jsx", ".mjs", ".cjs", ".js", ".json"] {
        if let Some(pos) = text.find(ext) {
            let before = &text[..pos + ext.len()];
            for indicator in &["in ", "at ", "file: ", "path: ", "\"", "'"] {
                if let Some(start) = before.rfind(indicator) {
                    let path_str = before[start + indicator.len()..].trim();
                    if !path_str.is_empty() && !path_str.contains(char::is_whitespace) {
                        return Some(path_str.to_string());
                    }
                }
            }
        }
    }
    None
}

/// Extract line number from patterns like `line 5` or `file.ts:5:10`.
fn extract_line_number(text: &str) -> Option<u32> {
    if let Some(pos) = text.find("line ") {
        if let Some(n) = leading_number(&text[pos + 5..]) {
            return Some(n);
        }
    }
    line_col_pair(text).map(|(line, _)| line)
}

/// Extract column number from patterns like `column 10` or `file.ts:5:10`.
fn extract_column_number(text: &str) -> Option<u32> {
    if let Some(pos) = text.find("column ") {
        if let Some(n) = leading_number(&text[pos + 7..]) {
            return Some(n);
        }
    }
    line_col_pair(text).map(|(_, column)| column)
}

fn line_col_pair(text: &str) -> Option<(u32, u32)> {
    let mut rest = text;
    while let Some(pos) = rest.find(':') {
        let after = &rest[pos + 1..];
        if let Some(line) = leading_number(after) {
            let digits = after.chars().take_while(|c| c.is_ascii_digit()).count();
            if let Some(col_str) = after[digits..].strip_prefix(':') {
                if let Some(column) = leading_number(col_str) {
                    return Some((line, column));
                }
            }
        }
        rest = after;
    }
    None
}

fn leading_number(text: &str) -> Option<u32> {
    let num_str: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();
    num_str.parse().ok()
}

/// Extract help text from error message.
fn extract_help_text(text: &str) -> Option<String> {
    for indicator in &["help: ", "Help: ", "hint: ", "Hint: "] {
        if let Some(pos) = text.find(indicator) {
            let help = text[pos + indicator.len()..]
                .lines()
                .next()
                .unwrap_or("")
                .trim()
                .trim_end_matches(['"', ','])
                .to_string();
            if !help.is_empty() {
                return Some(help);
            }
        }
    }
    None
}
