//! Signature outline of a class or interface definition.
//!
//! Keeps what a test author needs to see (visibility sections, implemented
//! interfaces, events and method signatures) and drops type, data and
//! constant declarations.

use crate::comments::is_comment_line;
use crate::statements::split_statements;
use crate::structure::extract_definition;
use abap_core::error::AnalysisError;

/// Statement keywords that survive the outline, with their indentation depth.
fn outline_depth(keyword: &str) -> Option<usize> {
    match keyword {
        "CLASS" | "INTERFACE" | "ENDCLASS" | "ENDINTERFACE" => Some(0),
        "PUBLIC" | "PROTECTED" | "PRIVATE" => Some(1),
        "INTERFACES" | "ALIASES" | "EVENTS" | "CLASS-EVENTS" | "METHODS" | "CLASS-METHODS" => {
            Some(2)
        }
        _ => None,
    }
}

/// Outline the first class or interface definition found in `text`.
///
/// Multi-line declarations keep their original line breaks; comment lines
/// inside them are dropped and every line is re-indented to its depth.
pub fn outline_definition(text: &str) -> Result<String, AnalysisError> {
    let definition = extract_definition(text)?;
    let mut out = String::new();

    for statement in split_statements(definition) {
        let keyword = statement.keyword();
        let Some(depth) = outline_depth(&keyword) else {
            continue;
        };
        let indent = "  ".repeat(depth);
        let mut lines = statement.raw(definition).lines();
        if let Some(head) = lines.next() {
            out.push_str(&indent);
            out.push_str(head.trim());
            out.push('\n');
        }
        // Continuation lines sit one level deeper than the keyword.
        for line in lines.filter(|l| !l.trim().is_empty() && !is_comment_line(l)) {
            out.push_str(&indent);
            out.push_str("  ");
            out.push_str(line.trim());
            out.push('\n');
        }
    }

    Ok(out)
}
