//! Per-class dependency report.

use crate::comments::strip_comments;
use crate::deps::{analyze_method, extract_interfaces};
use crate::structure::{extract_implementation, method_slices};
use crate::unit::{SourceUnit, check_size};
use abap_core::config::AnalysisConfig;
use abap_core::error::{AnalysisError, require_identifier};
use abap_core::model::{DependencyReport, MethodDependencies, MethodSlice};

/// Build the dependency report for `class_name` from its raw source.
///
/// Comment blocks are stripped first; interfaces come from the whole cleaned
/// text and method facts from the implementation block. Methods are analyzed on
/// the rayon pool when `config.parallel` is set. A missing implementation
/// block or an unbalanced method propagates as `NotFound`.
pub fn build_report(
    class_name: &str,
    source: &str,
    config: &AnalysisConfig,
) -> Result<DependencyReport, AnalysisError> {
    require_identifier("class_name", class_name)?;
    check_size(source, config.max_input_bytes)?;
    let cleaned = strip_comments(source);
    report_from_cleaned(class_name, &cleaned, config.parallel)
}

/// Same as [`build_report`] for an already validated and stripped unit.
pub fn build_unit_report(
    unit: &SourceUnit,
    config: &AnalysisConfig,
) -> Result<DependencyReport, AnalysisError> {
    report_from_cleaned(&unit.name, &unit.cleaned, config.parallel)
}

fn report_from_cleaned(
    class_name: &str,
    cleaned: &str,
    parallel: bool,
) -> Result<DependencyReport, AnalysisError> {
    let interfaces = extract_interfaces(cleaned);
    let implementation = extract_implementation(cleaned)?;
    let slices = method_slices(implementation)?;

    let analyzed: Vec<(String, MethodDependencies)> = if parallel {
        use rayon::prelude::*;
        slices.par_iter().map(analyze_slice).collect()
    } else {
        slices.iter().map(analyze_slice).collect()
    };

    tracing::debug!(
        "{}: {} methods, {} interfaces",
        class_name,
        analyzed.len(),
        interfaces.len()
    );

    Ok(DependencyReport {
        class_name: class_name.trim().to_uppercase(),
        interfaces,
        methods: analyzed.into_iter().collect(),
    })
}

fn analyze_slice(slice: &MethodSlice) -> (String, MethodDependencies) {
    (slice.name.to_uppercase(), analyze_method(&slice.body))
}
