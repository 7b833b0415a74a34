//! Error taxonomy of the extraction engine.

use std::fmt;

/// The kind of structural element a lookup was searching for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    /// `CLASS ... DEFINITION` or `INTERFACE ...` span, whichever comes first.
    Definition,
    /// `CLASS ... DEFINITION` span.
    ClassDefinition,
    /// `INTERFACE ... ENDINTERFACE` span.
    InterfaceDefinition,
    /// `CLASS ... IMPLEMENTATION` span.
    Implementation,
    /// `METHOD ... ENDMETHOD` span.
    Method,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Element::Definition => "definition",
            Element::ClassDefinition => "class definition",
            Element::InterfaceDefinition => "interface definition",
            Element::Implementation => "class implementation",
            Element::Method => "method",
        };
        f.write_str(label)
    }
}

/// Errors raised by structural lookups and argument validation.
///
/// Dependency extraction never fails: an empty result means "no dependency of
/// that kind". Only explicit slice lookups and bad arguments surface here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("{element} not found: {name}{}", format_suggestions(.suggestions))]
    NotFound {
        element: Element,
        name: String,
        /// Close matches offered to the caller, possibly empty.
        suggestions: Vec<String>,
    },
    #[error("invalid argument `{field}`: {reason}")]
    InvalidArgument { field: &'static str, reason: String },
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}

impl AnalysisError {
    pub fn not_found(element: Element, name: impl Into<String>) -> Self {
        Self::NotFound {
            element,
            name: name.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    /// Attach "did you mean" candidates to a `NotFound`; other variants pass through.
    #[must_use]
    pub fn with_suggestions(self, candidates: Vec<String>) -> Self {
        match self {
            Self::NotFound { element, name, .. } => Self::NotFound {
                element,
                name,
                suggestions: candidates,
            },
            other => other,
        }
    }

    /// Stable machine-readable kind, surfaced to tool callers next to the message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidArgument { .. } => "invalid_argument",
        }
    }
}

/// Reject an empty or malformed identifier before any scanning happens.
///
/// ABAP identifiers may carry a namespace (`/ABC/CL_X`) and method names an
/// interface qualifier (`zif_x~run`).
pub fn require_identifier(field: &'static str, value: &str) -> Result<(), AnalysisError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AnalysisError::invalid(field, "must not be empty"));
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '/' | '~')))
    {
        return Err(AnalysisError::invalid(
            field,
            format!("unexpected character '{}' in '{}'", bad, value),
        ));
    }
    Ok(())
}
