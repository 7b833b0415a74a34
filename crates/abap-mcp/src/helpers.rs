//! Utility functions shared across tool handlers.

use abap_core::model::ObjectKind;
use abap_nav::error::NavError;
use serde::Serialize;

/// `{"kind": ..., "message": ...}` as a string, the error form every tool returns.
pub(crate) fn error_payload(kind: &str, message: &str) -> String {
    serde_json::json!({ "kind": kind, "message": message }).to_string()
}

/// Pretty JSON for a successful lookup, the error payload otherwise.
pub(crate) fn render<T: Serialize>(result: Result<T, NavError>) -> Result<String, String> {
    match result {
        Ok(value) => serde_json::to_string_pretty(&value)
            .map_err(|e| error_payload("internal", &format!("serialization failed: {}", e))),
        Err(e) => {
            tracing::debug!("tool error ({}): {}", e.kind(), e);
            Err(e.to_json().to_string())
        }
    }
}

/// Parse an object type argument, rejecting unknown types with the error payload.
pub(crate) fn parse_object_kind(value: &str) -> Result<ObjectKind, String> {
    value
        .parse::<ObjectKind>()
        .map_err(|e| error_payload(e.kind(), &e.to_string()))
}

/// Truncate source text to `max_lines`, appending a note with the number of dropped lines.
pub(crate) fn truncate_source(source: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    if lines.len() <= max_lines {
        return source.to_string();
    }
    let mut out: String = lines[..max_lines].join("\n");
    out.push_str(&format!(
        "\n\" ... ({} more lines, truncated for context)",
        lines.len() - max_lines
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use abap_core::error::{AnalysisError, Element};

    #[test]
    fn test_error_payload_shape() {
        let payload: serde_json::Value =
            serde_json::from_str(&error_payload("not_found", "method not found: x")).unwrap();
        assert_eq!(payload["kind"], "not_found");
        assert_eq!(payload["message"], "method not found: x");
    }

    #[test]
    fn test_render_ok_and_err() {
        let ok = render::<Vec<String>>(Ok(vec!["run".into()])).unwrap();
        assert_eq!(serde_json::from_str::<Vec<String>>(&ok).unwrap(), vec!["run"]);

        let err = render::<Vec<String>>(Err(AnalysisError::not_found(Element::Method, "x").into()))
            .unwrap_err();
        let payload: serde_json::Value = serde_json::from_str(&err).unwrap();
        assert_eq!(payload["kind"], "not_found");
    }

    #[test]
    fn test_parse_object_kind() {
        assert_eq!(parse_object_kind("intf").unwrap(), ObjectKind::Interface);
        let err = parse_object_kind("function_group").unwrap_err();
        assert!(err.contains("invalid_argument"));
    }

    #[test]
    fn test_truncate_source() {
        let src = "a\nb\nc\nd";
        assert_eq!(truncate_source(src, 10), src);
        assert_eq!(
            truncate_source(src, 2),
            "a\nb\n\" ... (2 more lines, truncated for context)"
        );
    }
}
