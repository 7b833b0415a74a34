//! Transient analysis model: object kinds, method slices and dependency facts.
//!
//! Everything here is request-scoped. Values are built once by the extraction
//! engine and never mutated afterwards, so they can be handed across threads.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Sentinel key holding fields that could not be attributed to one table.
pub const UNMAPPED_FIELDS_KEY: &str = "__UNMAPPED_FIELDS__";

/// Repository object types a source unit can be fetched as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Class,
    Interface,
    Table,
    Program,
    View,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 5] = [
        ObjectKind::Class,
        ObjectKind::Interface,
        ObjectKind::Table,
        ObjectKind::Program,
        ObjectKind::View,
    ];

    /// Long lower-case name (`class`, `interface`, ...).
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Class => "class",
            ObjectKind::Interface => "interface",
            ObjectKind::Table => "table",
            ObjectKind::Program => "program",
            ObjectKind::View => "view",
        }
    }

    /// abapGit object type code (`clas`, `intf`, `tabl`, `prog`, `ddls`).
    pub fn code(self) -> &'static str {
        match self {
            ObjectKind::Class => "clas",
            ObjectKind::Interface => "intf",
            ObjectKind::Table => "tabl",
            ObjectKind::Program => "prog",
            ObjectKind::View => "ddls",
        }
    }

    /// File name abapGit serializes the object to.
    ///
    /// Namespaced objects (`/ABC/CL_X`) are stored with `#` in place of `/`.
    pub fn file_name(self, object_name: &str) -> String {
        let stem = object_name.trim().to_lowercase().replace('/', "#");
        let suffix = match self {
            ObjectKind::Table => "xml",
            ObjectKind::View => "asddls",
            _ => "abap",
        };
        format!("{}.{}.{}", stem, self.code(), suffix)
    }

    /// Parse either the long name or the abapGit code, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.name() == lower || k.code() == lower)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            AnalysisError::invalid(
                "object_type",
                format!(
                    "'{}' is not one of class, interface, table, program, view (or clas, intf, tabl, prog, ddls)",
                    s
                ),
            )
        })
    }
}

/// One method's span inside a class implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSlice {
    /// Method name as declared, lower-cased. May carry an `interface~` prefix.
    pub name: String,
    /// Non-blank lines in `body`.
    pub line_count: usize,
    /// `METHOD name.` through `ENDMETHOD.`, inclusive.
    pub body: String,
}

impl MethodSlice {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            name: name.into(),
            line_count: count_code_lines(&body),
            body,
        }
    }
}

/// Count lines that contain anything besides whitespace.
pub fn count_code_lines(text: &str) -> usize {
    text.lines().filter(|l| !l.trim().is_empty()).count()
}

/// Fields selected per table, plus those that could not be attributed.
///
/// Serializes as a flat object: `TABLE -> [FIELD, ...]` with both levels
/// sorted, and [`UNMAPPED_FIELDS_KEY`] holding the ambiguous fields (omitted
/// when empty). Tables that contributed no field are not listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<String, Vec<String>>",
    from = "BTreeMap<String, Vec<String>>"
)]
pub struct TableFieldMap {
    tables: BTreeMap<String, BTreeSet<String>>,
    unmapped: BTreeSet<String>,
}

impl TableFieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute `field` to `table`. Both are upper-cased.
    pub fn add_field(&mut self, table: &str, field: &str) {
        self.tables
            .entry(table.to_uppercase())
            .or_default()
            .insert(field.to_uppercase());
    }

    /// Record a field whose owning table is ambiguous.
    pub fn add_unmapped(&mut self, field: &str) {
        self.unmapped.insert(field.to_uppercase());
    }

    /// Sorted fields attributed to `table`, if any.
    pub fn fields(&self, table: &str) -> Option<Vec<&str>> {
        self.tables
            .get(&table.to_uppercase())
            .map(|set| set.iter().map(String::as_str).collect())
    }

    pub fn unmapped(&self) -> Vec<&str> {
        self.unmapped.iter().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.unmapped.is_empty()
    }

    /// Flat view including the sentinel bucket.
    pub fn to_map(&self) -> BTreeMap<String, Vec<String>> {
        let mut out: BTreeMap<String, Vec<String>> = self
            .tables
            .iter()
            .filter(|(_, fields)| !fields.is_empty())
            .map(|(table, fields)| (table.clone(), fields.iter().cloned().collect()))
            .collect();
        if !self.unmapped.is_empty() {
            out.insert(
                UNMAPPED_FIELDS_KEY.to_string(),
                self.unmapped.iter().cloned().collect(),
            );
        }
        out
    }
}

impl From<TableFieldMap> for BTreeMap<String, Vec<String>> {
    fn from(map: TableFieldMap) -> Self {
        map.to_map()
    }
}

impl From<BTreeMap<String, Vec<String>>> for TableFieldMap {
    fn from(flat: BTreeMap<String, Vec<String>>) -> Self {
        let mut map = TableFieldMap::new();
        for (key, fields) in flat {
            for field in fields {
                if key == UNMAPPED_FIELDS_KEY {
                    map.add_unmapped(&field);
                } else {
                    map.add_field(&key, &field);
                }
            }
        }
        map
    }
}

/// Dependency facts extracted from one method body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDependencies {
    /// Non-blank source lines.
    pub codelines: usize,
    /// Referenced database tables, upper-cased, first-seen order.
    pub tables: Vec<String>,
    /// Called function modules, upper-cased, first-seen order.
    pub function_modules: Vec<String>,
    /// Instantiated or statically called classes, upper-cased.
    pub classes: Vec<String>,
    /// Alias-aware field attribution for the method's queries.
    pub table_fields: TableFieldMap,
    pub source_code: String,
}

/// Per-class aggregate of implemented interfaces and per-method dependencies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyReport {
    pub class_name: String,
    /// `INTERFACES` statements, upper-cased, first-seen order.
    pub interfaces: Vec<String>,
    /// Upper-cased method name -> facts.
    pub methods: BTreeMap<String, MethodDependencies>,
}

impl DependencyReport {
    /// Distinct tables across all methods, sorted.
    pub fn all_tables(&self) -> BTreeSet<&str> {
        self.methods
            .values()
            .flat_map(|m| m.tables.iter().map(String::as_str))
            .collect()
    }

    /// Distinct function modules across all methods, sorted.
    pub fn all_function_modules(&self) -> BTreeSet<&str> {
        self.methods
            .values()
            .flat_map(|m| m.function_modules.iter().map(String::as_str))
            .collect()
    }

    /// Distinct class references across all methods, sorted.
    pub fn all_classes(&self) -> BTreeSet<&str> {
        self.methods
            .values()
            .flat_map(|m| m.classes.iter().map(String::as_str))
            .collect()
    }
}
