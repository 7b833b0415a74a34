//! Composed lookups: fetch → strip → extract, with serializable results.

use crate::error::{FetchError, NavError};
use crate::fetch::{self, SourceFetcher};
use abap_core::config::{AnalysisConfig, ScopeConfig};
use abap_core::error::{AnalysisError, Element, require_identifier};
use abap_core::model::{DependencyReport, ObjectKind, TableFieldMap, count_code_lines};
use abap_parser::outline::outline_definition;
use abap_parser::report::build_unit_report;
use abap_parser::sql::{extract_table_references, extract_tables_and_fields};
use abap_parser::structure::{extract_interface_definition, extract_method_body};
use abap_parser::unit::SourceUnit;
use serde::Serialize;

/// Most "did you mean" candidates offered for a missing method.
const MAX_SUGGESTIONS: usize = 3;

/// Minimum normalized Levenshtein similarity for a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodListing {
    pub class_name: String,
    /// Lower-cased, in implementation order.
    pub methods: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodCode {
    pub class_name: String,
    pub method_name: String,
    pub line_count: usize,
    pub source_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefinitionText {
    pub object_name: String,
    pub kind: ObjectKind,
    /// True when only signatures were kept.
    pub outline: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceText {
    pub object_name: String,
    pub kind: ObjectKind,
    pub comments_stripped: bool,
    pub line_count: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodTableFields {
    pub class_name: String,
    pub method_name: String,
    pub tables: Vec<String>,
    pub fields: TableFieldMap,
}

/// Close matches for `wanted` among `candidates`, best first.
///
/// Interface-qualified names are compared on both the full and the short name.
pub fn suggest(wanted: &str, candidates: &[String]) -> Vec<String> {
    let wanted = wanted.trim().to_lowercase();
    let mut scored: Vec<(f64, &String)> = candidates
        .iter()
        .filter_map(|candidate| {
            let lower = candidate.to_lowercase();
            let short = lower.rsplit('~').next().unwrap_or(&lower);
            let score = strsim::normalized_levenshtein(&wanted, &lower)
                .max(strsim::normalized_levenshtein(&wanted, short));
            let contains = !wanted.is_empty() && lower.contains(&wanted);
            (score >= SUGGESTION_THRESHOLD || contains).then_some((score, candidate))
        })
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, c)| c.clone())
        .collect()
}

/// Every lookup the CLI and MCP server expose, over one fetcher.
pub struct Navigator {
    fetcher: Box<dyn SourceFetcher>,
    analysis: AnalysisConfig,
}

impl Navigator {
    pub fn new(fetcher: Box<dyn SourceFetcher>, analysis: AnalysisConfig) -> Self {
        Self { fetcher, analysis }
    }

    pub fn from_config(config: &ScopeConfig) -> Result<Self, FetchError> {
        Ok(Self::new(
            fetch::from_config(&config.source)?,
            config.analysis.clone(),
        ))
    }

    pub fn describe(&self) -> String {
        self.fetcher.describe()
    }

    /// Fetch an object and strip its comment blocks.
    pub fn load(&self, object_name: &str, kind: ObjectKind) -> Result<SourceUnit, NavError> {
        require_identifier("object_name", object_name)?;
        let raw = self.fetcher.fetch(object_name, kind)?;
        Ok(SourceUnit::new(
            object_name,
            kind,
            raw,
            self.analysis.max_input_bytes,
        )?)
    }

    pub fn list_methods(&self, class_name: &str) -> Result<MethodListing, NavError> {
        let unit = self.load(class_name, ObjectKind::Class)?;
        Ok(MethodListing {
            methods: unit.method_names()?,
            class_name: unit.name,
        })
    }

    pub fn method_code(&self, class_name: &str, method_name: &str) -> Result<MethodCode, NavError> {
        require_identifier("method_name", method_name)?;
        let unit = self.load(class_name, ObjectKind::Class)?;
        let body = method_body(&unit, method_name)?;
        Ok(MethodCode {
            class_name: unit.name.clone(),
            method_name: method_name.trim().to_lowercase(),
            line_count: count_code_lines(body),
            source_code: body.to_string(),
        })
    }

    /// The class definition span, or only its signatures when `outline` is set.
    pub fn class_definition(&self, class_name: &str, outline: bool) -> Result<DefinitionText, NavError> {
        let unit = self.load(class_name, ObjectKind::Class)?;
        let text = if outline {
            unit.outline()?
        } else {
            unit.definition()?.to_string()
        };
        Ok(DefinitionText {
            object_name: unit.name,
            kind: ObjectKind::Class,
            outline,
            text,
        })
    }

    pub fn interface_definition(
        &self,
        interface_name: &str,
        outline: bool,
    ) -> Result<DefinitionText, NavError> {
        let unit = self.load(interface_name, ObjectKind::Interface)?;
        let text = if outline {
            outline_definition(&unit.cleaned)?
        } else {
            extract_interface_definition(&unit.cleaned)?.to_string()
        };
        Ok(DefinitionText {
            object_name: unit.name,
            kind: ObjectKind::Interface,
            outline,
            text,
        })
    }

    /// Whole object text, raw or with comment blocks stripped.
    pub fn source_code(
        &self,
        object_name: &str,
        kind: ObjectKind,
        strip: bool,
    ) -> Result<SourceText, NavError> {
        let unit = self.load(object_name, kind)?;
        let text = if strip { unit.cleaned } else { unit.raw };
        Ok(SourceText {
            object_name: unit.name,
            kind,
            comments_stripped: strip,
            line_count: count_code_lines(&text),
            text,
        })
    }

    /// Dependency report for a class, optionally narrowed to one method.
    pub fn dependencies(
        &self,
        class_name: &str,
        method_name: Option<&str>,
    ) -> Result<DependencyReport, NavError> {
        let unit = self.load(class_name, ObjectKind::Class)?;
        let mut report = build_unit_report(&unit, &self.analysis)?;

        if let Some(method) = method_name {
            require_identifier("method_name", method)?;
            let key = resolve_method_key(&report, method)?;
            report.methods.retain(|name, _| *name == key);
        }
        Ok(report)
    }

    /// Alias-aware table → field attribution for one method.
    pub fn table_fields(
        &self,
        class_name: &str,
        method_name: &str,
    ) -> Result<MethodTableFields, NavError> {
        require_identifier("method_name", method_name)?;
        let unit = self.load(class_name, ObjectKind::Class)?;
        let body = method_body(&unit, method_name)?;
        Ok(MethodTableFields {
            class_name: unit.name.clone(),
            method_name: method_name.trim().to_lowercase(),
            tables: extract_table_references(body),
            fields: extract_tables_and_fields(body),
        })
    }
}

fn method_body<'a>(unit: &'a SourceUnit, method_name: &str) -> Result<&'a str, NavError> {
    extract_method_body(&unit.cleaned, method_name).map_err(|e| {
        let candidates = unit.method_names().unwrap_or_default();
        NavError::from(e.with_suggestions(suggest(method_name, &candidates)))
    })
}

/// Report key for a method name, accepting the short name of an
/// interface-qualified method.
fn resolve_method_key(report: &DependencyReport, method: &str) -> Result<String, NavError> {
    let wanted = method.trim().to_uppercase();
    if report.methods.contains_key(&wanted) {
        return Ok(wanted);
    }
    if let Some(key) = report
        .methods
        .keys()
        .find(|k| k.rsplit_once('~').is_some_and(|(_, short)| short == wanted))
    {
        return Ok(key.clone());
    }
    let candidates: Vec<String> = report.methods.keys().map(|k| k.to_lowercase()).collect();
    Err(AnalysisError::not_found(Element::Method, method.trim())
        .with_suggestions(suggest(method, &candidates))
        .into())
}
