use gbview_core::convert::convert;
use gbview_core::error::ConversionError;
use gbview_core::model::Point;
use serde_json::{json, Value};

fn square_level(height: Value) -> Value {
    json!({
        "height": height,
        "points": { "a": [0, 0], "b": [10, 0], "c": [10, 10], "d": [0, 10] },
        "surfaces": [
            { "id": "ab", "pointA": "a", "pointB": "b" },
            { "id": "bc", "pointA": "b", "pointB": "c" },
            { "id": "cd", "pointA": "c", "pointB": "d" },
            { "id": "da", "pointA": "d", "pointB": "a" }
        ],
        "spaces": [{
            "id": "room",
            "outerLoop": [
                { "id": "room-ab", "surfaceId": "ab", "directionAToB": true, "partnerId": null },
                { "id": "room-bc", "surfaceId": "bc", "directionAToB": true, "partnerId": "other-bc" },
                { "id": "room-cd", "surfaceId": "cd", "directionAToB": 1 },
                { "id": "room-da", "surfaceId": "da", "directionAToB": "yes", "partnerId": "" }
            ]
        }]
    })
}

fn document(levels: Value) -> Value {
    json!({
        "levels": levels,
        "units": [{
            "id": 42,
            "spaceIds": ["room", 7],
            "properties": { "function": "residential", "program": "apartment" }
        }]
    })
}

#[test]
fn converts_a_well_formed_document() {
    let building = convert(&document(json!([square_level(json!(3))]))).expect("valid document");

    assert_eq!(1, building.levels.len());
    let level = &building.levels[0];
    assert_eq!(3.0, level.height);
    assert_eq!(Some(&Point::new(10.0, 10.0)), level.points.get("c"));
    assert_eq!(4, level.surfaces.len());

    let lp = &level.spaces[0].outer_loop;
    assert_eq!(None, lp[0].partner_id);
    assert_eq!(Some("other-bc".to_string()), lp[1].partner_id);
    assert!(lp[2].direction_a_to_b);
    assert!(lp[3].direction_a_to_b);
    assert_eq!(None, lp[3].partner_id);
    assert!(level.spaces[0].inner_loops.is_empty());

    let unit = &building.units[0];
    assert_eq!("42", unit.id);
    assert_eq!(vec!["room".to_string(), "7".to_string()], unit.space_ids);
    assert_eq!("residential", unit.properties.function);
}

#[test]
fn rejects_non_object_root() {
    assert_eq!(Err(ConversionError::NotAnObject), convert(&json!(null)));
    assert_eq!(Err(ConversionError::NotAnObject), convert(&json!([1, 2])));
    assert_eq!(Err(ConversionError::NotAnObject), convert(&json!("levels")));
}

#[test]
fn non_array_levels_is_reported() {
    let err = convert(&json!({ "levels": {}, "units": [] })).unwrap_err();
    assert_eq!(ConversionError::LevelsNotArray, err);
    assert_eq!("levels must be an array", err.to_string());
    assert_eq!("levels", err.path());
}

#[test]
fn non_numeric_height_names_the_level() {
    let levels = json!([square_level(json!(3)), square_level(json!(3)), square_level(json!("3"))]);
    let err = convert(&document(levels)).unwrap_err();
    assert_eq!(ConversionError::InvalidHeight { level: 2 }, err);
    assert_eq!("invalid height at level 2", err.to_string());
    assert_eq!("levels[2].height", err.path());
    assert_eq!("invalid_height", err.kind());
}

#[test]
fn non_positive_height_is_rejected() {
    let err = convert(&document(json!([square_level(json!(0))]))).unwrap_err();
    assert_eq!(ConversionError::InvalidHeight { level: 0 }, err);
}

#[test]
fn bad_point_reports_raw_value() {
    let mut level = square_level(json!(3));
    level["points"]["b"] = json!([10, "zero"]);
    let err = convert(&document(json!([level]))).unwrap_err();
    assert_eq!("invalid point format at levels[0].points.b: [10,\"zero\"]", err.to_string());
}

#[test]
fn missing_points_means_empty_table() {
    let mut level = square_level(json!(3));
    level.as_object_mut().unwrap().remove("points");
    let building = convert(&document(json!([level]))).expect("points are optional");
    assert!(building.levels[0].points.is_empty());
}

#[test]
fn surfaces_and_spaces_must_be_arrays() {
    let mut level = square_level(json!(3));
    level["surfaces"] = json!("nope");
    assert_eq!(
        Err(ConversionError::SurfacesNotArray { level: 0 }),
        convert(&document(json!([level])))
    );

    let mut level = square_level(json!(3));
    level["spaces"] = json!(null);
    assert_eq!(
        Err(ConversionError::SpacesNotArray { level: 0 }),
        convert(&document(json!([level])))
    );
}

#[test]
fn first_failure_wins() {
    // Level 0 is broken twice; the height check runs before the surfaces check.
    let mut level = square_level(json!(null));
    level["surfaces"] = json!(5);
    let doc = json!({ "levels": [level], "units": 3 });
    assert_eq!(Err(ConversionError::InvalidHeight { level: 0 }), convert(&doc));
}

#[test]
fn units_need_array_and_properties() {
    let doc = json!({ "levels": [], "units": {} });
    assert_eq!("units must be an array", convert(&doc).unwrap_err().to_string());

    let doc = json!({ "levels": [], "units": [{ "id": "u", "spaceIds": [] }] });
    let err = convert(&doc).unwrap_err();
    assert_eq!(ConversionError::MissingProperties { unit: 0 }, err);
    assert_eq!("units[0].properties", err.path());
}

#[test]
fn absent_unit_properties_fields_become_empty() {
    let doc = json!({ "levels": [], "units": [{ "id": "u", "spaceIds": [], "properties": {} }] });
    let building = convert(&doc).expect("empty properties object is allowed");
    assert_eq!("", building.units[0].properties.function);
    assert_eq!("", building.units[0].properties.program);
}

#[test]
fn inner_loops_are_carried() {
    let mut level = square_level(json!(3));
    level["spaces"][0]["innerLoops"] = json!([[
        { "id": "hole-1", "surfaceId": "ab", "directionAToB": false }
    ]]);
    let building = convert(&document(json!([level]))).expect("inner loops are valid");
    let inner = &building.levels[0].spaces[0].inner_loops;
    assert_eq!(1, inner.len());
    assert!(!inner[0][0].direction_a_to_b);
}

#[test]
fn conversion_is_idempotent() {
    let mut level = square_level(json!(2.5));
    level["spaces"][0]["innerLoops"] = json!([[{ "id": "h", "surfaceId": "ab", "directionAToB": true }]]);
    let first = convert(&document(json!([level, square_level(json!(4))]))).expect("valid");

    let reserialized = first.to_json_value().expect("serializable");
    let second = convert(&reserialized).expect("re-serialized output converts");
    assert_eq!(first, second);
}

#[test]
fn bad_loop_entry_reports_its_path() {
    let mut level = square_level(json!(3));
    level["spaces"][0]["outerLoop"][2] = json!("cd");
    let err = convert(&document(json!([level]))).unwrap_err();
    assert_eq!("levels[0].spaces[0].outerLoop[2]", err.path());
}
