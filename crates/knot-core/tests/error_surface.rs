use knot_core::errors::{ErrorInfo, KnotError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("crossing", 3)
        .with_context("reason", "example")
}

#[test]
fn precondition_error_surface() {
    let err = KnotError::Precondition(sample_info("weak-regularity", "edge count mismatch"));
    assert_eq!(err.info().code, "weak-regularity");
    assert_eq!(err.info().context.get("crossing"), Some(&"3".to_string()));
    assert!(!err.is_rejection());
}

#[test]
fn rejection_is_flagged() {
    let err = KnotError::Rejected(sample_info("dead-end", "no partner"));
    assert!(err.is_rejection());
}

#[test]
fn context_is_added_to_any_family() {
    let err = KnotError::Invariant(ErrorInfo::new("not-regular", "degree mismatch"))
        .with_context("node", 7);
    assert_eq!(err.info().context.get("node"), Some(&"7".to_string()));
}

#[test]
fn display_includes_context_and_hint() {
    let err = KnotError::Exhausted(
        ErrorInfo::new("attempt-cap", "no planar diagram found")
            .with_context("attempts", 10)
            .with_hint("raise max_attempts"),
    );
    let text = err.to_string();
    assert!(text.starts_with("attempts exhausted: no planar diagram found (code: attempt-cap)"));
    assert!(text.contains("attempts=10"));
    assert!(text.ends_with("hint: raise max_attempts"));
}

#[test]
fn errors_roundtrip_through_json() {
    let err = KnotError::Unimplemented(sample_info("bracket", "reserved"));
    let json = serde_json::to_string(&err).unwrap();
    assert!(json.contains("\"family\":\"Unimplemented\""));
    let back: KnotError = serde_json::from_str(&json).unwrap();
    assert_eq!(back, err);
}
