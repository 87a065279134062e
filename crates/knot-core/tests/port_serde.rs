use knot_core::{Port, SchemaVersion};

#[test]
fn ports_serialize_as_short_labels() {
    let json = serde_json::to_string(&Port::ALL).unwrap();
    assert_eq!(json, r#"["tl","tr","bl","br"]"#);
    let back: Vec<Port> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Port::ALL.to_vec());
}

#[test]
fn schema_compatibility_follows_major_version() {
    let current = SchemaVersion::new(1, 2, 0);
    assert!(current.is_compatible_with(&SchemaVersion::new(1, 0, 3)));
    assert!(!current.is_compatible_with(&SchemaVersion::new(2, 0, 0)));
}
