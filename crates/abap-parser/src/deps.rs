//! Call-graph facts of a method body: function modules, class references,
//! implemented interfaces, and the combined per-method analysis.

use crate::sql::{extract_table_references, extract_tables_and_fields};
use crate::statements::split_statements;
use abap_core::model::{MethodDependencies, count_code_lines};
use abap_core::ordered::OrderedUnique;
use regex::Regex;
use std::sync::OnceLock;

fn call_function_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bcall\s+function\s+'([A-Za-z0-9_/]+)'").unwrap())
}

/// `CREATE OBJECT x TYPE cls`, `CREATE OBJECT cls`, `DATA(x) = NEW cls`, `NEW cls`.
fn instantiation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:create\s+object\s+\w+\s+type\s+|create\s+object\s+|data\s*\(\w+\)\s*=\s*new\s+|new\s+)((?:z?cl)_\w+)",
        )
        .unwrap()
    })
}

/// `cls=>method(`
fn static_call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b((?:z?cl)_\w+)\s*=>\s*\w+\s*\(").unwrap())
}

/// Function modules called with `CALL FUNCTION 'NAME'`, upper-cased, first-seen order.
///
/// Dynamic calls (`CALL FUNCTION lv_name`) carry no literal and are skipped.
pub fn extract_function_module_calls(body: &str) -> Vec<String> {
    let mut modules = OrderedUnique::new();
    for caps in call_function_re().captures_iter(body) {
        modules.push_upper(&caps[1]);
    }
    modules.into_vec()
}

/// Classes following the `CL_` / `ZCL_` naming convention that are instantiated
/// or called statically. Instantiations come first, then static calls; each
/// name appears once, upper-cased.
pub fn extract_class_references(body: &str) -> Vec<String> {
    let mut classes = OrderedUnique::new();
    for caps in instantiation_re().captures_iter(body) {
        classes.push_upper(&caps[1]);
    }
    for caps in static_call_re().captures_iter(body) {
        classes.push_upper(&caps[1]);
    }
    classes.into_vec()
}

/// Interfaces named by `INTERFACES` statements, including chained
/// `INTERFACES: a, b.` forms. Upper-cased, first-seen order.
pub fn extract_interfaces(source: &str) -> Vec<String> {
    let mut interfaces = OrderedUnique::new();
    for statement in split_statements(source) {
        let Some(rest) = strip_keyword(&statement.code, "INTERFACES") else {
            continue;
        };
        let rest = rest.trim_start();
        let rest = rest.strip_prefix(':').unwrap_or(rest);
        for item in rest.split(',') {
            if let Some(name) = item.split_whitespace().next() {
                interfaces.push_upper(name);
            }
        }
    }
    interfaces.into_vec()
}

/// The text after a leading `keyword`, if the statement starts with it as a
/// whole word. Matching is ASCII case-insensitive.
fn strip_keyword<'a>(code: &'a str, keyword: &str) -> Option<&'a str> {
    let head = code.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = &code[keyword.len()..];
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() || c == ':' => Some(rest),
        Some(_) => None,
    }
}

/// All dependency facts of one (comment-stripped) method body.
pub fn analyze_method(body: &str) -> MethodDependencies {
    MethodDependencies {
        codelines: count_code_lines(body),
        tables: extract_table_references(body),
        function_modules: extract_function_module_calls(body),
        classes: extract_class_references(body),
        table_fields: extract_tables_and_fields(body),
        source_code: body.to_string(),
    }
}
