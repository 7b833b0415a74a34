use abap_core::config::AnalysisConfig;
use abap_core::model::ObjectKind;
use abap_nav::error::FetchError;
use abap_nav::fetch::SourceFetcher;
use abap_nav::ops::Navigator;
use std::collections::HashMap;

const ORDER_CLASS: &str = "\
CLASS zcl_order DEFINITION PUBLIC FINAL CREATE PUBLIC.
  PUBLIC SECTION.
    INTERFACES zif_order.
    TYPES ty_id TYPE n LENGTH 10.
    METHODS place IMPORTING iv_matnr TYPE matnr.
  PRIVATE SECTION.
    DATA mv_count TYPE i.
    METHODS log_event.
ENDCLASS.

*----------------------------------------------------------------------*
* Implementation
*----------------------------------------------------------------------*
CLASS zcl_order IMPLEMENTATION.
  METHOD zif_order~read.
    SELECT a~vbeln, b~posnr, netwr
      FROM vbak AS a
      INNER JOIN vbap AS b ON a~vbeln = b~vbeln
      INTO TABLE @rt_items.
  ENDMETHOD.

  METHOD place.
    SELECT SINGLE maktx FROM makt INTO @DATA(lv_text) WHERE matnr = @iv_matnr.
    CALL FUNCTION 'ZORDER_POST' EXPORTING iv_matnr = iv_matnr.
    log_event( ).
  ENDMETHOD.

  METHOD log_event.
    cl_bal_log=>add( 'placed' ).
  ENDMETHOD.
ENDCLASS.
";

const ORDER_INTERFACE: &str = "\
INTERFACE zif_order PUBLIC.
  TYPES tt_items TYPE STANDARD TABLE OF vbap WITH EMPTY KEY.
  METHODS read RETURNING VALUE(rt_items) TYPE tt_items.
ENDINTERFACE.
";

struct MemoryFetcher {
    objects: HashMap<(ObjectKind, String), String>,
}

impl MemoryFetcher {
    fn new() -> Self {
        let mut objects = HashMap::new();
        objects.insert((ObjectKind::Class, "ZCL_ORDER".to_string()), ORDER_CLASS.to_string());
        objects.insert(
            (ObjectKind::Interface, "ZIF_ORDER".to_string()),
            ORDER_INTERFACE.to_string(),
        );
        objects.insert(
            (ObjectKind::Program, "ZORDER_REPORT".to_string()),
            "REPORT zorder_report.\n* a\n* b\n* c\nWRITE 'x'.\n".to_string(),
        );
        Self { objects }
    }
}

impl SourceFetcher for MemoryFetcher {
    fn fetch(&self, object_name: &str, kind: ObjectKind) -> Result<String, FetchError> {
        let name = object_name.trim().to_uppercase();
        self.objects
            .get(&(kind, name.clone()))
            .cloned()
            .ok_or(FetchError::NotFound {
                kind,
                name,
                location: "memory".into(),
            })
    }

    fn describe(&self) -> String {
        "memory".into()
    }
}

fn navigator() -> Navigator {
    Navigator::new(Box::new(MemoryFetcher::new()), AnalysisConfig::default())
}

#[test]
fn test_list_methods() {
    let listing = navigator().list_methods("zcl_order").unwrap();
    assert_eq!(listing.class_name, "ZCL_ORDER");
    assert_eq!(listing.methods, vec!["zif_order~read", "place", "log_event"]);
}

#[test]
fn test_method_code_and_interface_short_name() {
    let nav = navigator();
    let place = nav.method_code("zcl_order", "PLACE").unwrap();
    assert!(place.source_code.starts_with("METHOD place."));
    assert_eq!(place.line_count, 5);

    let read = nav.method_code("zcl_order", "read").unwrap();
    assert!(read.source_code.contains("INNER JOIN vbap"));
}

#[test]
fn test_method_code_not_found_suggests() {
    let err = navigator().method_code("zcl_order", "plase").unwrap_err();
    assert_eq!(err.kind(), "not_found");
    let message = err.to_string();
    assert!(message.contains("did you mean: place"), "{message}");
}

#[test]
fn test_unknown_class_is_not_found() {
    let err = navigator().list_methods("zcl_nope").unwrap_err();
    assert_eq!(err.kind(), "not_found");
    assert_eq!(err.to_json()["kind"], "not_found");
}

#[test]
fn test_class_definition_full_and_outline() {
    let nav = navigator();
    let full = nav.class_definition("zcl_order", false).unwrap();
    assert!(full.text.contains("DATA mv_count TYPE i."));
    assert!(!full.outline);

    let outline = nav.class_definition("zcl_order", true).unwrap();
    assert!(outline.outline);
    assert!(outline.text.contains("METHODS place IMPORTING iv_matnr TYPE matnr."));
    assert!(!outline.text.contains("mv_count"));
    assert!(!outline.text.contains("TYPES"));
}

#[test]
fn test_interface_definition() {
    let nav = navigator();
    let full = nav.interface_definition("zif_order", false).unwrap();
    assert!(full.text.starts_with("INTERFACE zif_order PUBLIC."));
    assert!(full.text.ends_with("ENDINTERFACE."));

    let outline = nav.interface_definition("zif_order", true).unwrap();
    assert!(!outline.text.contains("tt_items TYPE STANDARD"));
    assert_eq!(outline.kind, ObjectKind::Interface);
}

#[test]
fn test_source_code_raw_and_stripped() {
    let nav = navigator();
    let raw = nav
        .source_code("zorder_report", ObjectKind::Program, false)
        .unwrap();
    assert!(raw.text.contains("* b"));
    let stripped = nav
        .source_code("zorder_report", ObjectKind::Program, true)
        .unwrap();
    assert_eq!(stripped.text, "REPORT zorder_report.\nWRITE 'x'.\n");
    assert_eq!(stripped.line_count, 2);
}

#[test]
fn test_dependencies_whole_class() {
    let report = navigator().dependencies("zcl_order", None).unwrap();
    assert_eq!(report.class_name, "ZCL_ORDER");
    assert_eq!(report.interfaces, vec!["ZIF_ORDER"]);
    assert_eq!(report.methods.len(), 3);

    let place = &report.methods["PLACE"];
    assert_eq!(place.tables, vec!["MAKT"]);
    assert_eq!(place.function_modules, vec!["ZORDER_POST"]);

    let log = &report.methods["LOG_EVENT"];
    assert_eq!(log.classes, vec!["CL_BAL_LOG"]);
}

#[test]
fn test_dependencies_single_method() {
    let nav = navigator();
    let report = nav.dependencies("zcl_order", Some("read")).unwrap();
    assert_eq!(report.methods.keys().collect::<Vec<_>>(), vec!["ZIF_ORDER~READ"]);

    let err = nav.dependencies("zcl_order", Some("reed")).unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

#[test]
fn test_table_fields_for_join() {
    let fields = navigator().table_fields("zcl_order", "zif_order~read").unwrap();
    assert_eq!(fields.tables, vec!["VBAK", "VBAP"]);
    assert_eq!(
        serde_json::to_value(&fields.fields).unwrap(),
        serde_json::json!({
            "VBAK": ["VBELN"],
            "VBAP": ["POSNR"],
            "__UNMAPPED_FIELDS__": ["NETWR"],
        })
    );
}

#[test]
fn test_input_bound_applies_to_fetched_text() {
    let nav = Navigator::new(
        Box::new(MemoryFetcher::new()),
        AnalysisConfig {
            max_input_bytes: 64,
            ..AnalysisConfig::default()
        },
    );
    let err = nav.list_methods("zcl_order").unwrap_err();
    assert_eq!(err.kind(), "invalid_argument");
}

#[test]
fn test_empty_method_name_rejected_before_fetch() {
    let err = navigator().method_code("zcl_order", "").unwrap_err();
    assert_eq!(err.kind(), "invalid_argument");
}
