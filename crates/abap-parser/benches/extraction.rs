use abap_core::config::AnalysisConfig;
use abap_parser::comments::strip_comments;
use abap_parser::report::build_report;
use abap_parser::sql::extract_tables_and_fields;
use criterion::{Criterion, criterion_group, criterion_main};
use std::fmt::Write;
use std::hint::black_box;

/// A class with `methods` methods, each mixing queries, calls and comment blocks.
fn sample_class(methods: usize) -> String {
    let mut src = String::from(
        "CLASS zcl_bench DEFINITION PUBLIC.\n  PUBLIC SECTION.\n    INTERFACES zif_bench.\nENDCLASS.\n\nCLASS zcl_bench IMPLEMENTATION.\n",
    );
    for i in 0..methods {
        let _ = write!(
            src,
            "  METHOD m{i}.
*   ------------------------------------------------
*   Reads orders and materials for step {i}
*   ------------------------------------------------
    SELECT a~vbeln, a~erdat, b~matnr, kwmeng
      FROM vbak AS a
      INNER JOIN vbap AS b ON a~vbeln = b~vbeln
      WHERE a~kunnr = @iv_kunnr
      INTO TABLE @DATA(lt_items_{i}).
    SELECT SINGLE maktx FROM makt INTO @DATA(lv_text) WHERE matnr = @iv_matnr.
    CALL FUNCTION 'CONVERSION_EXIT_ALPHA_INPUT'
      EXPORTING input = lv_in
      IMPORTING output = lv_out.
    DATA(lo_calc) = NEW zcl_price_calc( ).
    zcl_log=>write( |step {i}| ). \" trace
  ENDMETHOD.

"
        );
    }
    src.push_str("ENDCLASS.\n");
    src
}

fn bench_strip_comments(c: &mut Criterion) {
    let src = sample_class(200);
    c.bench_function("strip_comments_200_methods", |b| {
        b.iter(|| strip_comments(black_box(&src)));
    });
}

fn bench_table_fields(c: &mut Criterion) {
    let src = sample_class(1);
    c.bench_function("tables_and_fields_one_method", |b| {
        b.iter(|| extract_tables_and_fields(black_box(&src)));
    });
}

fn bench_report(c: &mut Criterion) {
    let src = sample_class(200);
    let parallel = AnalysisConfig::default();
    let sequential = AnalysisConfig {
        parallel: false,
        ..AnalysisConfig::default()
    };
    c.bench_function("report_200_methods_parallel", |b| {
        b.iter(|| build_report("zcl_bench", black_box(&src), &parallel));
    });
    c.bench_function("report_200_methods_sequential", |b| {
        b.iter(|| build_report("zcl_bench", black_box(&src), &sequential));
    });
}

criterion_group!(benches, bench_strip_comments, bench_table_fields, bench_report);
criterion_main!(benches);
