//! Batch dependency reports over the class files of a local checkout.

use abap_core::config::AnalysisConfig;
use abap_core::model::DependencyReport;
use abap_parser::report::build_report;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// abapGit file suffix of a global class's main source.
pub const CLASS_FILE_SUFFIX: &str = ".clas.abap";

/// A class file that could not be analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanFailure {
    pub file: String,
    pub kind: String,
    pub message: String,
}

/// Distinct dependencies across every analyzed class, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanTotals {
    pub classes: usize,
    pub methods: usize,
    pub tables: Vec<String>,
    pub function_modules: Vec<String>,
    pub referenced_classes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub totals: ScanTotals,
    /// Sorted by class name.
    pub reports: Vec<DependencyReport>,
    pub failures: Vec<ScanFailure>,
}

/// Class name for a main class file (`zcl_x.clas.abap` → `ZCL_X`,
/// `#abc#cl_x.clas.abap` → `/ABC/CL_X`). Local-class and test includes
/// (`zcl_x.clas.testclasses.abap`) are not main files.
pub fn class_name_from_file(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let lower = file_name.to_lowercase();
    let stem = lower.strip_suffix(CLASS_FILE_SUFFIX)?;
    if stem.is_empty() || stem.contains('.') {
        return None;
    }
    Some(stem.replace('#', "/").to_uppercase())
}

/// Analyze `(path, source)` pairs on the rayon pool. Files that are not main
/// class files are skipped; analysis failures are collected, not fatal.
pub fn scan_sources(files: &[(PathBuf, String)], config: &AnalysisConfig) -> ScanReport {
    let results: Vec<(String, Result<DependencyReport, String>, &'static str)> = files
        .par_iter()
        .filter_map(|(path, source)| {
            let class_name = class_name_from_file(path)?;
            let file = path.display().to_string();
            Some(match build_report(&class_name, source, config) {
                Ok(report) => (file, Ok(report), ""),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", file, e);
                    (file, Err(e.to_string()), e.kind())
                }
            })
        })
        .collect();

    let mut scan = ScanReport::default();
    for (file, result, kind) in results {
        match result {
            Ok(report) => scan.reports.push(report),
            Err(message) => scan.failures.push(ScanFailure {
                file,
                kind: kind.to_string(),
                message,
            }),
        }
    }
    scan.reports.sort_by(|a, b| a.class_name.cmp(&b.class_name));
    scan.failures.sort_by(|a, b| a.file.cmp(&b.file));
    scan.totals = totals(&scan.reports);
    scan
}

fn totals(reports: &[DependencyReport]) -> ScanTotals {
    let mut tables = BTreeSet::new();
    let mut function_modules = BTreeSet::new();
    let mut classes = BTreeSet::new();
    for report in reports {
        tables.extend(report.all_tables());
        function_modules.extend(report.all_function_modules());
        classes.extend(report.all_classes());
    }
    ScanTotals {
        classes: reports.len(),
        methods: reports.iter().map(|r| r.methods.len()).sum(),
        tables: tables.into_iter().map(String::from).collect(),
        function_modules: function_modules.into_iter().map(String::from).collect(),
        referenced_classes: classes.into_iter().map(String::from).collect(),
    }
}
