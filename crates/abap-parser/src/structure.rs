//! Structural extraction: definition, implementation and method spans.
//!
//! Spans are located with paired markers matched case-insensitively across line
//! breaks. A lookup that finds no span fails with [`AnalysisError::NotFound`];
//! callers can always tell "missing" apart from "present but empty".

use abap_core::error::{AnalysisError, Element, require_identifier};
use abap_core::model::MethodSlice;
use abap_core::ordered::OrderedUnique;
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

fn class_definition_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bclass\s+([\w/]+)\s+definition\b([^.]*)\.").unwrap())
}

fn class_implementation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bclass\s+([\w/]+)\s+implementation\s*\.").unwrap())
}

fn interface_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\binterface\s+([\w/]+)([^.]*)\.").unwrap())
}

fn endclass_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bendclass\s*\.").unwrap())
}

fn endinterface_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bendinterface\s*\.").unwrap())
}

/// `METHOD name.` at the start of a line. AMDP headers
/// (`METHOD name BY DATABASE PROCEDURE ...`) are accepted too.
fn method_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?im)^[ \t]*(method\s+([\w/~]+)(?:\s+by\s+[^.]*)?\s*\.)").unwrap()
    })
}

fn endmethod_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bendmethod\s*\.").unwrap())
}

/// Headers without a body: `DEFERRED` and `LOAD` forward declarations, and
/// `LOCAL FRIENDS` declarations in test includes. `GLOBAL FRIENDS` or a bare
/// `FRIENDS` list belongs to a full definition and is not skipped.
fn is_forward_declaration(options: &str) -> bool {
    let words: Vec<&str> = options.split_whitespace().collect();
    words
        .iter()
        .any(|w| w.eq_ignore_ascii_case("deferred") || w.eq_ignore_ascii_case("load"))
        || words.windows(2).any(|pair| {
            pair[0].eq_ignore_ascii_case("local") && pair[1].eq_ignore_ascii_case("friends")
        })
}

/// First header matched by `header` that is not a forward declaration,
/// through the next `end` marker.
fn find_block(text: &str, header: &Regex, end: &Regex, options_group: usize) -> Option<Range<usize>> {
    for caps in header.captures_iter(text) {
        if caps
            .get(options_group)
            .is_some_and(|opts| is_forward_declaration(opts.as_str()))
        {
            continue;
        }
        let whole = caps.get(0)?;
        let close = end.find_at(text, whole.end())?;
        return Some(whole.start()..close.end());
    }
    None
}

fn class_definition_range(text: &str) -> Option<Range<usize>> {
    find_block(text, class_definition_re(), endclass_re(), 2)
}

fn interface_definition_range(text: &str) -> Option<Range<usize>> {
    find_block(text, interface_re(), endinterface_re(), 2)
}

/// The first `CLASS ... DEFINITION` or `INTERFACE ...` span, through its
/// `ENDCLASS.` / `ENDINTERFACE.`, inclusive.
pub fn extract_definition(text: &str) -> Result<&str, AnalysisError> {
    let class = class_definition_range(text);
    let interface = interface_definition_range(text);
    let range = match (class, interface) {
        (Some(c), Some(i)) => {
            if c.start <= i.start {
                c
            } else {
                i
            }
        }
        (Some(c), None) => c,
        (None, Some(i)) => i,
        (None, None) => {
            return Err(AnalysisError::not_found(
                Element::Definition,
                "CLASS ... DEFINITION or INTERFACE ... ENDINTERFACE",
            ));
        }
    };
    Ok(&text[range])
}

/// The first `CLASS ... DEFINITION` span through `ENDCLASS.`.
pub fn extract_class_definition(text: &str) -> Result<&str, AnalysisError> {
    class_definition_range(text)
        .map(|r| &text[r])
        .ok_or_else(|| AnalysisError::not_found(Element::ClassDefinition, "CLASS ... DEFINITION"))
}

/// The first `INTERFACE name.` span through `ENDINTERFACE.`.
pub fn extract_interface_definition(text: &str) -> Result<&str, AnalysisError> {
    interface_definition_range(text).map(|r| &text[r]).ok_or_else(|| {
        AnalysisError::not_found(Element::InterfaceDefinition, "INTERFACE ... ENDINTERFACE")
    })
}

/// The first `CLASS ... IMPLEMENTATION.` span through `ENDCLASS.`.
pub fn extract_implementation(text: &str) -> Result<&str, AnalysisError> {
    let not_found = || AnalysisError::not_found(Element::Implementation, "CLASS ... IMPLEMENTATION");
    let header = class_implementation_re().find(text).ok_or_else(not_found)?;
    let close = endclass_re()
        .find_at(text, header.end())
        .ok_or_else(not_found)?;
    Ok(&text[header.start()..close.end()])
}

/// Method names declared by `METHOD name.` headers, lower-cased, first-seen order.
pub fn list_method_names(implementation: &str) -> Vec<String> {
    let mut names = OrderedUnique::new();
    for caps in method_header_re().captures_iter(implementation) {
        names.push_lower(&caps[2]);
    }
    names.into_vec()
}

/// A declared header name matches when equal to the wanted name, or when the
/// wanted name is the part after an interface qualifier.
fn header_matches(declared: &str, wanted: &str) -> bool {
    if declared.eq_ignore_ascii_case(wanted) {
        return true;
    }
    declared
        .rsplit_once('~')
        .is_some_and(|(_, short)| short.eq_ignore_ascii_case(wanted))
}

/// The `METHOD name.` ... `ENDMETHOD.` span for `method_name`.
///
/// `method_name` may be plain (`run`) or interface-qualified (`zif_x~run`). A
/// plain name prefers an exact header and otherwise falls back to the first
/// interface-qualified header with that short name. A header whose closing
/// `ENDMETHOD.` is missing, or comes after the next method header, counts as
/// not found.
pub fn extract_method_body<'a>(class_text: &'a str, method_name: &str) -> Result<&'a str, AnalysisError> {
    require_identifier("method_name", method_name)?;
    let wanted = method_name.trim();

    let headers: Vec<(usize, usize, &str)> = method_header_re()
        .captures_iter(class_text)
        .filter_map(|caps| {
            let header = caps.get(1)?;
            let name = caps.get(2)?.as_str();
            Some((header.start(), header.end(), name))
        })
        .collect();

    let exact = headers
        .iter()
        .position(|(_, _, name)| name.eq_ignore_ascii_case(wanted));
    let chosen = exact.or_else(|| headers.iter().position(|(_, _, name)| header_matches(name, wanted)));
    let Some(idx) = chosen else {
        return Err(AnalysisError::not_found(Element::Method, wanted));
    };

    let (start, header_end, _) = headers[idx];
    let close = endmethod_re()
        .find_at(class_text, header_end)
        .ok_or_else(|| AnalysisError::not_found(Element::Method, wanted))?;
    if let Some((next_start, _, _)) = headers.get(idx + 1)
        && *next_start < close.start()
    {
        tracing::debug!("method {} has no ENDMETHOD before the next header", wanted);
        return Err(AnalysisError::not_found(Element::Method, wanted));
    }

    Ok(&class_text[start..close.end()])
}

/// Every method of an implementation block as a [`MethodSlice`], in header order.
pub fn method_slices(implementation: &str) -> Result<Vec<MethodSlice>, AnalysisError> {
    list_method_names(implementation)
        .into_iter()
        .map(|name| {
            let body = extract_method_body(implementation, &name)?;
            Ok(MethodSlice::new(name, body))
        })
        .collect()
}
