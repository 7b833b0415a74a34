use abap_core::config::{SourceConfig, SourceProvider};
use abap_core::model::ObjectKind;
use abap_nav::error::FetchError;
use abap_nav::fetch::{self, CachedFetcher, LocalFetcher, SourceFetcher};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

fn checkout() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    std::fs::create_dir_all(src.join("sales")).unwrap();
    std::fs::write(
        src.join("zcl_order.clas.abap"),
        "CLASS zcl_order DEFINITION.\nENDCLASS.\n",
    )
    .unwrap();
    std::fs::write(
        src.join("sales").join("zif_order.intf.abap"),
        "INTERFACE zif_order PUBLIC.\nENDINTERFACE.\n",
    )
    .unwrap();
    std::fs::write(src.join("#abc#cl_ns.clas.abap"), "CLASS /abc/cl_ns DEFINITION.\nENDCLASS.\n").unwrap();
    tmp
}

#[test]
fn test_local_fetch_by_file_name() {
    let tmp = checkout();
    let fetcher = LocalFetcher::new(tmp.path().join("src"));
    let text = fetcher.fetch("ZCL_ORDER", ObjectKind::Class).unwrap();
    assert!(text.starts_with("CLASS zcl_order DEFINITION."));
}

#[test]
fn test_local_fetch_searches_package_folders() {
    let tmp = checkout();
    let fetcher = LocalFetcher::new(tmp.path().join("src"));
    let text = fetcher.fetch("zif_order", ObjectKind::Interface).unwrap();
    assert!(text.contains("ENDINTERFACE."));
}

#[test]
fn test_local_fetch_namespaced_object() {
    let tmp = checkout();
    let fetcher = LocalFetcher::new(tmp.path().join("src"));
    assert!(fetcher.fetch("/ABC/CL_NS", ObjectKind::Class).is_ok());
}

#[test]
fn test_local_fetch_missing_object() {
    let tmp = checkout();
    let fetcher = LocalFetcher::new(tmp.path().join("src"));
    let err = fetcher.fetch("ZCL_MISSING", ObjectKind::Class).unwrap_err();
    assert_eq!(err.kind(), "not_found");
    match err {
        FetchError::NotFound { kind, name, location } => {
            assert_eq!(kind, ObjectKind::Class);
            assert_eq!(name, "ZCL_MISSING");
            assert!(location.ends_with("zcl_missing.clas.abap"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_wrong_kind_is_not_found() {
    let tmp = checkout();
    let fetcher = LocalFetcher::new(tmp.path().join("src"));
    let err = fetcher.fetch("ZCL_ORDER", ObjectKind::Interface).unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

#[test]
fn test_local_fetch_rejects_empty_name() {
    let tmp = checkout();
    let fetcher = LocalFetcher::new(tmp.path().join("src"));
    let err = fetcher.fetch("  ", ObjectKind::Class).unwrap_err();
    assert_eq!(err.kind(), "invalid_argument");
}

#[test]
fn test_from_config_uses_path_prefix() {
    let tmp = checkout();
    let config = SourceConfig {
        provider: SourceProvider::Local,
        local_root: tmp.path().to_path_buf(),
        path_prefix: "src".into(),
        ..SourceConfig::default()
    };
    let fetcher = fetch::from_config(&config).unwrap();
    assert!(fetcher.fetch("zcl_order", ObjectKind::Class).is_ok());
    assert!(fetcher.describe().contains("local checkout"));
}

/// Counts calls and serves a fixed text for one object.
struct CountingFetcher {
    calls: Arc<AtomicUsize>,
}

impl SourceFetcher for CountingFetcher {
    fn fetch(&self, object_name: &str, kind: ObjectKind) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if object_name.eq_ignore_ascii_case("zcl_a") {
            Ok("CLASS zcl_a DEFINITION.\nENDCLASS.".to_string())
        } else {
            Err(FetchError::NotFound {
                kind,
                name: object_name.to_uppercase(),
                location: "memory".into(),
            })
        }
    }

    fn describe(&self) -> String {
        "counting".into()
    }
}

#[test]
fn test_cache_serves_repeat_fetches() {
    let calls = Arc::new(AtomicUsize::new(0));
    let cached = CachedFetcher::new(Box::new(CountingFetcher {
        calls: Arc::clone(&calls),
    }));

    let first = cached.fetch("zcl_a", ObjectKind::Class).unwrap();
    let second = cached.fetch("ZCL_A", ObjectKind::Class).unwrap();
    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cached.cached_len(), 1);

    // Kind is part of the key.
    assert!(cached.fetch("zcl_a", ObjectKind::Program).is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    cached.clear();
    assert!(cached.fetch("zcl_a", ObjectKind::Class).is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_cache_does_not_remember_failures() {
    let calls = Arc::new(AtomicUsize::new(0));
    let cached = CachedFetcher::new(Box::new(CountingFetcher {
        calls: Arc::clone(&calls),
    }));
    assert!(cached.fetch("zcl_b", ObjectKind::Class).is_err());
    assert!(cached.fetch("zcl_b", ObjectKind::Class).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(cached.cached_len(), 0);
}
