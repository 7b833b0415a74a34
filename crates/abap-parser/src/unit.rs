//! One fetched object's source text, raw and comment-stripped.

use crate::comments::strip_comments;
use crate::outline::outline_definition;
use crate::structure::{extract_definition, extract_implementation, list_method_names};
use abap_core::error::{AnalysisError, require_identifier};
use abap_core::model::ObjectKind;

/// Immutable source blob for a named repository object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub name: String,
    pub kind: ObjectKind,
    pub raw: String,
    /// `raw` with comment blocks removed.
    pub cleaned: String,
}

impl SourceUnit {
    /// Validate the name and size, then strip comment blocks once.
    ///
    /// Text larger than `max_bytes` is rejected before any scanning.
    pub fn new(
        name: &str,
        kind: ObjectKind,
        raw: impl Into<String>,
        max_bytes: usize,
    ) -> Result<Self, AnalysisError> {
        require_identifier("object_name", name)?;
        let raw = raw.into();
        check_size(&raw, max_bytes)?;
        let cleaned = strip_comments(&raw);
        Ok(Self {
            name: name.trim().to_uppercase(),
            kind,
            raw,
            cleaned,
        })
    }

    pub fn definition(&self) -> Result<&str, AnalysisError> {
        extract_definition(&self.cleaned)
    }

    pub fn outline(&self) -> Result<String, AnalysisError> {
        outline_definition(&self.cleaned)
    }

    pub fn implementation(&self) -> Result<&str, AnalysisError> {
        extract_implementation(&self.cleaned)
    }

    pub fn method_names(&self) -> Result<Vec<String>, AnalysisError> {
        Ok(list_method_names(self.implementation()?))
    }
}

/// Reject source text over the configured input bound.
pub fn check_size(text: &str, max_bytes: usize) -> Result<(), AnalysisError> {
    if text.len() > max_bytes {
        return Err(AnalysisError::invalid(
            "source",
            format!("{} bytes exceeds the limit of {} bytes", text.len(), max_bytes),
        ));
    }
    Ok(())
}
