use gbview_core::error::{IngestError, IngestFailure};
use gbview_core::ingest::{load, sample, IngestSource};
use gbview_core::report::{diagnose, summarize};

#[test]
fn bundled_sample_converts() {
    let building = sample().expect("sample is valid");
    assert_eq!(3, building.levels.len());
    assert_eq!(3, building.units.len());
    assert_eq!(9.0, building.total_height());
    for level in &building.levels {
        assert_eq!(5, level.points.len());
        assert_eq!(1, level.spaces.len());
    }
}

#[test]
fn sample_units_carry_no_properties() {
    let building = sample().expect("sample is valid");
    for unit in &building.units {
        assert_eq!("", unit.properties.function, "unit {}", unit.id);
        assert_eq!("", unit.properties.program, "unit {}", unit.id);
    }
}

#[test]
fn sample_has_no_dangling_references() {
    let building = sample().expect("sample is valid");
    assert!(diagnose(&building).is_empty());

    let report = summarize(&building);
    assert_eq!(3, report.levels.len());
    assert!(report.levels.iter().all(|l| l.spaces_with_geometry == 1));
}

#[test]
fn pasted_text_errors_use_the_parsing_prefix() {
    let err = load(&IngestSource::Text("{ not json".to_string())).unwrap_err();
    assert!(matches!(err.failure(), IngestFailure::Syntax(_)));
    assert!(err.to_string().starts_with("Error parsing JSON: "));

    let err = load(&IngestSource::Text(r#"{"levels": 1, "units": []}"#.to_string())).unwrap_err();
    assert_eq!("Error parsing JSON: levels must be an array", err.to_string());
}

#[test]
fn file_errors_use_the_loading_prefix() {
    let missing = std::env::temp_dir().join("gbview-definitely-missing-input.json");
    let err = load(&IngestSource::File(missing)).unwrap_err();
    assert!(matches!(err, IngestError::File(IngestFailure::Io(_))));
    assert!(err.to_string().starts_with("Error loading file: "));

    let path = std::env::temp_dir().join(format!("gbview-ingest-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"levels": [{"height": "tall"}], "units": []}"#).expect("write temp file");
    let err = load(&IngestSource::File(path.clone())).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert_eq!("Error loading file: invalid height at level 0", err.to_string());
}

#[test]
fn diagnostics_flag_dangling_references_without_failing() {
    let text = r#"{
        "levels": [{
            "height": 3,
            "points": { "a": [0, 0], "b": [1, 0] },
            "surfaces": [{ "id": "ab", "pointA": "a", "pointB": "ghost" }],
            "spaces": [{ "id": "s", "outerLoop": [
                { "id": "1", "surfaceId": "ab", "directionAToB": true },
                { "id": "2", "surfaceId": "nowhere", "directionAToB": true }
            ]}]
        }],
        "units": [{ "id": "u", "spaceIds": ["s", "elsewhere"], "properties": {} }]
    }"#;
    let building = load(&IngestSource::Text(text.to_string())).expect("structurally valid");
    let codes: Vec<_> = diagnose(&building).into_iter().map(|d| d.code).collect();
    assert_eq!(
        vec![
            "surface_missing_point",
            "dangling_reference",
            "degenerate_loop",
            "unit_unknown_space",
        ],
        codes
    );
}
