//! Diagnostic collection and rendering.
//!
//! The stages report into one shared collector; nothing is printed until the
//! whole frontend has run, at which point the collected wall is rendered in
//! category order (lexical, syntax, semantic, warnings).

use crate::SourceLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lexical,
    Syntax,
    Semantic,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub location: SourceLocation,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

const LEXICAL_BANNER: &str =
    "------------------------------ Too cringe ✖_✖ ------------------------------";
const SYNTAX_BANNER: &str =
    "------------------------------ Ohh, your canceled :) ------------------------------";
const SEMANTIC_BANNER: &str =
    "------------------------------ What a boomer ¬_¬ ------------------------------";
const WARNING_BANNER: &str =
    "------------------------------ A little sus ◔_◔ ------------------------------";
const ALL_CLEAR: &str = "Stan 🎉🎉🎉";

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(
        &mut self,
        kind: DiagnosticKind,
        location: SourceLocation,
        message: impl Into<String>,
    ) {
        self.entries.push(Diagnostic {
            kind,
            location,
            message: message.into(),
        });
    }

    /// Warnings never count as errors; everything else does.
    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|d| d.kind != DiagnosticKind::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.kind != DiagnosticKind::Warning)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Warning)
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    /// Render the full report, one banner per non-empty category.
    pub fn wall(&self) -> String {
        if self.entries.is_empty() {
            return ALL_CLEAR.to_string();
        }

        let mut out = String::new();
        let sections = [
            (DiagnosticKind::Lexical, LEXICAL_BANNER),
            (DiagnosticKind::Syntax, SYNTAX_BANNER),
            (DiagnosticKind::Semantic, SEMANTIC_BANNER),
            (DiagnosticKind::Warning, WARNING_BANNER),
        ];

        for (kind, banner) in sections {
            let mut first = true;
            for diag in self.of_kind(kind) {
                if first {
                    out.push_str(banner);
                    out.push_str("\n\n");
                    first = false;
                }
                out.push_str(&format!("{} -> {}\n\n", diag.location, diag.message));
            }
        }
        out
    }
}
