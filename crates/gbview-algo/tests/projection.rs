use approx::assert_relative_eq;
use gbview_algo::projection::{project, Viewport};
use gbview_algo::svg_writer::write_svg;
use gbview_core::model::Level;
use serde_json::json;

fn unit_square_level() -> Level {
    let raw = json!({
        "levels": [{
            "height": 3,
            "points": { "a": [0, 0], "b": [10, 0], "c": [10, 10], "d": [0, 10] },
            "surfaces": [
                { "id": "ab", "pointA": "a", "pointB": "b" },
                { "id": "bc", "pointA": "b", "pointB": "c" },
                { "id": "cd", "pointA": "c", "pointB": "d" },
                { "id": "da", "pointA": "d", "pointB": "a" },
                { "id": "dangling", "pointA": "a", "pointB": "nowhere" }
            ],
            "spaces": [
                {
                    "id": "room",
                    "outerLoop": [
                        { "id": "1", "surfaceId": "ab", "directionAToB": true },
                        { "id": "2", "surfaceId": "bc", "directionAToB": true },
                        { "id": "3", "surfaceId": "cd", "directionAToB": true },
                        { "id": "4", "surfaceId": "da", "directionAToB": true }
                    ]
                },
                {
                    "id": "hall",
                    "outerLoop": [
                        { "id": "5", "surfaceId": "da", "directionAToB": false },
                        { "id": "6", "surfaceId": "cd", "directionAToB": false },
                        { "id": "7", "surfaceId": "bc", "directionAToB": false }
                    ]
                },
                {
                    "id": "sliver",
                    "outerLoop": [
                        { "id": "8", "surfaceId": "ab", "directionAToB": true },
                        { "id": "9", "surfaceId": "bc", "directionAToB": true }
                    ]
                }
            ]
        }],
        "units": []
    });
    gbview_core::convert(&raw)
        .expect("valid building")
        .levels
        .remove(0)
}

#[test]
fn viewport_pads_by_a_tenth_of_the_larger_side() {
    let p = project(&unit_square_level(), 1.0);
    assert_relative_eq!(1.0, p.padding);
    assert_eq!(
        Viewport { x: -1.0, y: -1.0, width: 12.0, height: 12.0 },
        p.viewport
    );
}

#[test]
fn scale_applies_to_geometry_and_inverse_to_strokes() {
    let p = project(&unit_square_level(), 2.0);
    assert_relative_eq!(-2.0, p.viewport.x);
    assert_relative_eq!(24.0, p.viewport.width);
    assert_relative_eq!(20.0, p.space_paths[0].points[2].x);
    assert_relative_eq!(0.5, p.space_paths[0].stroke_width);
    assert_relative_eq!(0.25, p.surface_lines[0].stroke_width);
}

#[test]
fn short_loops_and_dangling_surfaces_are_dropped() {
    let p = project(&unit_square_level(), 1.0);
    let ids: Vec<&str> = p.space_paths.iter().map(|s| s.space_id.as_str()).collect();
    assert_eq!(vec!["room", "hall"], ids);
    assert_eq!(4, p.surface_lines.len());
}

#[test]
fn first_space_is_highlighted() {
    let p = project(&unit_square_level(), 1.0);
    assert_eq!(0xa5d8ff, p.space_paths[0].fill);
    assert_eq!(0xffd8a8, p.space_paths[1].fill);
    assert_eq!(0x666666, p.space_paths[1].stroke);
    assert_eq!(0x333333, p.surface_lines[0].stroke);
}

#[test]
fn empty_level_has_non_finite_viewport() {
    let p = project(&Level::default(), 1.0);
    assert!(p.space_paths.is_empty());
    assert!(!p.viewport.x.is_finite());
}

#[test]
fn svg_uses_viewport_as_view_box() {
    let svg = write_svg(&project(&unit_square_level(), 1.0)).expect("formatting");
    assert!(svg.content.starts_with("<svg"));
    assert!(svg.content.contains(r#"viewBox="-1 -1 12 12""#));
    assert_eq!(2, svg.content.matches("<path").count());
    assert_eq!(4, svg.content.matches("<line").count());
    assert!(svg.content.contains(r##"fill="#a5d8ff""##));
    assert!(svg.content.trim_end().ends_with("</svg>"));
}
