//! Open SQL query span analysis: referenced tables and alias-aware field attribution.
//!
//! A query span starts at `SELECT`, must reach `FROM` within the same
//! statement, and its source clause runs until the first of INTO, WHERE, ORDER,
//! GROUP, HAVING, FIELDS, ENDSELECT, UNION or the end of the statement. Nested
//! `SELECT`s (subqueries in WHERE) are picked up as spans of their own.
//!
//! Nothing here fails: malformed or partial fragments yield partial results.

use crate::statements::split_statements;
use abap_core::model::TableFieldMap;
use abap_core::ordered::OrderedUnique;
use regex::Regex;
use std::sync::OnceLock;

/// Words in a field list that are syntax, not columns.
const NOISE_TOKENS: &[&str] = &[
    "*", "DISTINCT", "SINGLE", "FOR", "UPDATE", "COUNT", "SUM", "MIN", "MAX", "AVG", "CAST",
    "COALESCE", "CASE", "WHEN", "THEN", "ELSE", "END",
];

fn select_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bselect\b").unwrap())
}

fn from_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bfrom\b").unwrap())
}

fn terminator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:into|where|order|group|having|fields|endselect|union)\b").unwrap()
    })
}

fn target_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(?:into|appending)\b").unwrap())
}

fn fields_keyword_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^fields\b").unwrap())
}

/// `FROM tab [AS alias]` or `[LEFT|RIGHT|FULL|INNER|CROSS] [OUTER] JOIN tab [AS alias]`.
fn table_alias_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:from|(?:(?:left|right|full|inner|cross)\s+(?:outer\s+)?)?join)\s+(?:\(\s*)*([A-Za-z0-9_/]+)(?:\s+as\s+([A-Za-z0-9_]+))?",
        )
        .unwrap()
    })
}

/// `alias~field` in a field list. The alias may be a namespaced table
/// (`/abc/orders~vbeln`), so the match is anchored on a non-name character
/// rather than a word boundary.
fn qualified_field_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:^|[^A-Za-z0-9_/~])([A-Za-z0-9_/]+)~([A-Za-z0-9_/]+)").unwrap()
    })
}

/// Host variables and expressions: `@lv_x`, `@ls_row-field`, `@DATA(lt)`, `@( expr )`.
fn host_expression_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"@\s*(?:\([^()]*\)|[A-Za-z_][A-Za-z0-9_]*\s*\([^()]*\)|[A-Za-z0-9_/~>-]+)")
            .unwrap()
    })
}

/// One SELECT, split into its field list and its FROM/JOIN clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpan {
    /// Text naming the selected columns (between SELECT and FROM, or after FIELDS).
    pub fields: String,
    /// `FROM ...` through the terminating keyword, exclusive.
    pub sources: String,
}

/// Tables and aliases bound by one span's FROM/JOIN clause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableBindings {
    /// (TABLE, ALIAS) pairs upper-cased, in clause order. The alias defaults to
    /// the table name.
    pub bindings: Vec<(String, String)>,
}

impl TableBindings {
    pub fn parse(sources: &str) -> Self {
        let bindings = table_alias_re()
            .captures_iter(sources)
            .map(|caps| {
                let table = caps[1].to_uppercase();
                let alias = caps
                    .get(2)
                    .map_or_else(|| table.clone(), |a| a.as_str().to_uppercase());
                (table, alias)
            })
            .collect();
        Self { bindings }
    }

    pub fn table_for_alias(&self, alias: &str) -> Option<&str> {
        let alias = alias.to_uppercase();
        self.bindings
            .iter()
            .find(|(_, a)| *a == alias)
            .map(|(t, _)| t.as_str())
    }

    /// The only table of a query without joins.
    pub fn sole_table(&self) -> Option<&str> {
        match self.bindings.as_slice() {
            [(table, _)] => Some(table),
            _ => None,
        }
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(t, _)| t.as_str())
    }
}

/// Split a method body into query spans.
pub fn query_spans(body: &str) -> Vec<QuerySpan> {
    let mut spans = Vec::new();
    for statement in split_statements(body) {
        let code = statement.code.as_str();
        let mut pos = 0;
        while let Some(select) = select_re().find_at(code, pos) {
            let Some(from) = from_re().find_at(code, select.end()) else {
                break;
            };
            let terminator = terminator_re().find_at(code, from.end());
            let sources_end = terminator.map_or(code.len(), |t| t.start());

            let mut fields = &code[select.end()..from.start()];
            if let Some(target) = target_re().find(fields) {
                fields = &fields[..target.start()];
            }
            if fields.trim().is_empty()
                && let Some(t) = terminator
                && fields_keyword_re().is_match(&code[t.start()..])
            {
                let list_end = terminator_re()
                    .find_at(code, t.end())
                    .map_or(code.len(), |next| next.start());
                fields = &code[t.end()..list_end];
            }

            spans.push(QuerySpan {
                fields: fields.trim().to_string(),
                sources: code[from.start()..sources_end].trim().to_string(),
            });
            pos = sources_end.max(select.end());
        }
    }
    spans
}

/// Referenced tables across all query spans, upper-cased, first-seen order.
pub fn extract_table_references(body: &str) -> Vec<String> {
    let mut tables = OrderedUnique::new();
    for span in query_spans(body) {
        for table in TableBindings::parse(&span.sources).tables() {
            tables.push(table);
        }
    }
    tables.into_vec()
}

/// Unqualified column names of a field list, upper-cased.
///
/// Qualified `alias~field` references must already be removed. Column aliases
/// (`x AS name`), literals, aggregate names and host variables are noise.
fn unqualified_fields(field_list: &str) -> Vec<String> {
    let without_host = host_expression_re().replace_all(field_list, " ");
    let mut out = Vec::new();
    for item in without_host.split(',') {
        let cleaned: String = item
            .chars()
            .map(|c| if matches!(c, '(' | ')') { ' ' } else { c })
            .collect();
        for word in cleaned.split_whitespace() {
            if word.eq_ignore_ascii_case("as") {
                break;
            }
            let upper = word.to_uppercase();
            if NOISE_TOKENS.contains(&upper.as_str()) {
                continue;
            }
            let is_identifier = upper
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '/')
                && upper
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '/'))
                && upper.chars().any(|c| c.is_ascii_alphanumeric());
            if is_identifier {
                out.push(upper);
            }
        }
    }
    out
}

/// Attribute the fields of one span to its tables.
fn attribute_fields(span: &QuerySpan, map: &mut TableFieldMap) {
    let bindings = TableBindings::parse(&span.sources);

    for caps in qualified_field_re().captures_iter(&span.fields) {
        let field = &caps[2];
        match bindings.table_for_alias(&caps[1]) {
            Some(table) => map.add_field(table, field),
            None => map.add_unmapped(field),
        }
    }

    let remainder = qualified_field_re().replace_all(&span.fields, " ");
    let candidates = unqualified_fields(&remainder);
    match bindings.sole_table() {
        Some(table) => {
            for field in &candidates {
                map.add_field(table, field);
            }
        }
        None => {
            for field in &candidates {
                map.add_unmapped(field);
            }
        }
    }
}

/// Alias-aware table → fields mapping for every query in `body`.
///
/// Qualified fields go to the table bound to their alias. Unqualified fields go
/// to the sole table of a join-free query; with joins (or no resolvable table)
/// they land in the unmapped bucket rather than being guessed.
pub fn extract_tables_and_fields(body: &str) -> TableFieldMap {
    let mut map = TableFieldMap::new();
    for span in query_spans(body) {
        attribute_fields(&span, &mut map);
    }
    map
}
