use gbview_core::geom::Vec2;
use gbview_core::model::{CoSurface, Level, Point, Space, Surface};
use gbview_core::resolve::{
    resolve_loop, resolve_loop_detailed, resolve_space, LevelIndex, LoopGap,
};
use std::collections::BTreeMap;

fn co(id: &str, surface: &str, a_to_b: bool) -> CoSurface {
    CoSurface {
        id: id.to_string(),
        partner_id: None,
        surface_id: surface.to_string(),
        direction_a_to_b: a_to_b,
    }
}

fn surface(id: &str, a: &str, b: &str) -> Surface {
    Surface {
        id: id.to_string(),
        point_a: a.to_string(),
        point_b: b.to_string(),
    }
}

fn square() -> Level {
    let points: BTreeMap<String, Point> = [
        ("a", Point::new(0.0, 0.0)),
        ("b", Point::new(10.0, 0.0)),
        ("c", Point::new(10.0, 10.0)),
        ("d", Point::new(0.0, 10.0)),
    ]
    .into_iter()
    .map(|(k, p)| (k.to_string(), p))
    .collect();

    Level {
        height: 3.0,
        points,
        surfaces: vec![
            surface("ab", "a", "b"),
            surface("bc", "b", "c"),
            // Stored the other way round; the loop walks it B to A.
            surface("dc", "d", "c"),
            surface("da", "d", "a"),
        ],
        spaces: vec![Space {
            id: "room".to_string(),
            outer_loop: vec![
                co("1", "ab", true),
                co("2", "bc", true),
                co("3", "dc", false),
                co("4", "da", true),
            ],
            inner_loops: Vec::new(),
        }],
    }
}

#[test]
fn fully_referenced_loop_yields_one_vertex_per_entry() {
    let level = square();
    let space = &level.spaces[0];
    let vertices = resolve_space(space, &level);

    assert_eq!(space.outer_loop.len(), vertices.len());
    assert_eq!(
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ],
        vertices
    );
}

#[test]
fn hashed_lookup_matches_linear_lookup() {
    let level = square();
    let index = LevelIndex::new(&level);
    let lp = &level.spaces[0].outer_loop;
    assert_eq!(resolve_loop(lp, &level), resolve_loop(lp, &index));
}

#[test]
fn unresolvable_entries_are_skipped() {
    let mut level = square();
    level.spaces[0].outer_loop[1].surface_id = "missing".to_string();
    level.points.remove("d");

    let resolved = resolve_loop_detailed(&level.spaces[0].outer_loop, &level);
    assert_eq!(2, resolved.vertices.len());
    assert!(resolved.vertices.len() < level.spaces[0].outer_loop.len());
    assert!(!resolved.has_geometry());
    assert_eq!(
        vec![
            LoopGap::MissingSurface {
                co_surface_id: "2".to_string(),
                surface_id: "missing".to_string(),
            },
            LoopGap::MissingPoint {
                co_surface_id: "4".to_string(),
                surface_id: "da".to_string(),
                point_key: "d".to_string(),
            },
        ],
        resolved.gaps
    );
}

#[test]
fn duplicate_entries_are_not_deduplicated() {
    let mut level = square();
    level.spaces[0].outer_loop.push(co("5", "ab", true));
    assert_eq!(5, resolve_space(&level.spaces[0], &level).len());
}

#[test]
fn empty_loop_resolves_to_nothing() {
    let level = square();
    assert!(resolve_loop(&[], &level).is_empty());
}
