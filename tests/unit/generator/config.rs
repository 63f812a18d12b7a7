use super::*;

#[test]
fn empty_document_yields_defaults() {
    let cfg = GeneratorConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, GeneratorConfig::default());
    assert_eq!(cfg.count, CountRange { min: 0, max: 4 });
    assert_eq!(cfg.max_extent_px, DEFAULT_MAX_EXTENT_PX);
    assert_eq!(cfg.texture.prob, 0.0);
}

#[test]
fn partial_sections_merge_with_defaults() {
    let cfg = GeneratorConfig::from_json_str(
        r#"{
            "count": {"min": 1, "max": 3},
            "layout": {"space": 5},
            "postprocess": {"blur": {"prob": 0.9}}
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.count, CountRange { min: 1, max: 3 });
    assert_eq!(cfg.layout.space, 5.0);
    assert_eq!(cfg.postprocess.blur.prob, 0.9);
    assert_eq!(cfg.postprocess.blur.sigma, [0.0, 2.0]);
    assert_eq!(cfg.postprocess.noise.prob, 0.5);
}

#[test]
fn out_of_range_probability_is_a_validation_error() {
    let err = GeneratorConfig::from_json_str(r#"{"postprocess": {"noise": {"prob": 1.5}}}"#)
        .unwrap_err();
    assert!(matches!(err, SynthError::Validation(_)), "{err}");
}

#[test]
fn empty_count_range_is_rejected() {
    assert!(GeneratorConfig::from_json_str(r#"{"count": {"min": 2, "max": 2}}"#).is_err());
}

#[test]
fn malformed_json_is_wrapped() {
    let err = GeneratorConfig::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, SynthError::Other(_)));
}

#[test]
fn reads_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gen.json");
    std::fs::write(&path, r#"{"bgcolor": {"grayscale": 1.0}}"#).unwrap();
    let cfg = GeneratorConfig::from_json_path(&path).unwrap();
    assert_eq!(cfg.bgcolor.grayscale, 1.0);

    let missing = GeneratorConfig::from_json_path(&dir.path().join("nope.json")).unwrap_err();
    assert!(missing.to_string().contains("nope.json"));
}
