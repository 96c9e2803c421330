use crate::geom::BBox2;
use crate::model::Building;
use crate::resolve::{resolve_loop_detailed, LevelIndex, LoopGap, MIN_POLYGON_VERTICES};
use serde::{Deserialize, Serialize};

/// Non-fatal finding about the source data. Rendering never depends on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub level: Option<usize>,
    pub space_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSummary {
    pub index: usize,
    pub height: f64,
    pub points: usize,
    pub surfaces: usize,
    pub spaces: usize,
    pub spaces_with_geometry: usize,
    pub extents: Option<BBox2>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingReport {
    pub levels: Vec<LevelSummary>,
    pub units_total: usize,
    pub total_height: f64,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn summarize(building: &Building) -> BuildingReport {
    let levels = building
        .levels
        .iter()
        .enumerate()
        .map(|(index, level)| {
            let lookup = LevelIndex::new(level);
            let spaces_with_geometry = level
                .spaces
                .iter()
                .filter(|s| resolve_loop_detailed(&s.outer_loop, &lookup).has_geometry())
                .count();
            let extents = level.extents();
            LevelSummary {
                index,
                height: level.height,
                points: level.points.len(),
                surfaces: level.surfaces.len(),
                spaces: level.spaces.len(),
                spaces_with_geometry,
                extents: (!extents.is_empty()).then_some(extents),
            }
        })
        .collect();

    BuildingReport {
        levels,
        units_total: building.units.len(),
        total_height: building.total_height(),
        diagnostics: diagnose(building),
    }
}

/// Dangling references, degenerate loops, and units pointing nowhere.
pub fn diagnose(building: &Building) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    if building.levels.is_empty() {
        out.push(Diagnostic {
            code: "no_levels".to_string(),
            level: None,
            space_id: None,
            message: "Building has no levels.".to_string(),
        });
    }

    for (index, level) in building.levels.iter().enumerate() {
        if level.points.is_empty() {
            out.push(Diagnostic {
                code: "empty_point_table".to_string(),
                level: Some(index),
                space_id: None,
                message: format!("Level {index} has no points; its plan extent is undefined."),
            });
        }

        for surface in &level.surfaces {
            for key in [&surface.point_a, &surface.point_b] {
                if !level.points.contains_key(key.as_str()) {
                    out.push(Diagnostic {
                        code: "surface_missing_point".to_string(),
                        level: Some(index),
                        space_id: None,
                        message: format!("Surface {} references unknown point {key}.", surface.id),
                    });
                }
            }
        }

        let lookup = LevelIndex::new(level);
        for space in &level.spaces {
            let resolved = resolve_loop_detailed(&space.outer_loop, &lookup);
            for gap in &resolved.gaps {
                let message = match gap {
                    LoopGap::MissingSurface {
                        co_surface_id,
                        surface_id,
                    } => format!("Loop entry {co_surface_id} references unknown surface {surface_id}."),
                    LoopGap::MissingPoint {
                        co_surface_id,
                        point_key,
                        ..
                    } => format!("Loop entry {co_surface_id} starts at unknown point {point_key}."),
                };
                out.push(Diagnostic {
                    code: "dangling_reference".to_string(),
                    level: Some(index),
                    space_id: Some(space.id.clone()),
                    message,
                });
            }
            if !resolved.has_geometry() {
                out.push(Diagnostic {
                    code: "degenerate_loop".to_string(),
                    level: Some(index),
                    space_id: Some(space.id.clone()),
                    message: format!(
                        "Space {} resolves to {} vertices (need {MIN_POLYGON_VERTICES}); it is not drawn.",
                        space.id,
                        resolved.vertices.len()
                    ),
                });
            }
            if !space.inner_loops.is_empty() {
                out.push(Diagnostic {
                    code: "inner_loops_ignored".to_string(),
                    level: Some(index),
                    space_id: Some(space.id.clone()),
                    message: format!(
                        "Space {} has {} inner loop(s); holes are not rendered.",
                        space.id,
                        space.inner_loops.len()
                    ),
                });
            }
        }
    }

    for unit in &building.units {
        for space_id in &unit.space_ids {
            let known = building
                .levels
                .iter()
                .any(|l| l.spaces.iter().any(|s| &s.id == space_id));
            if !known {
                out.push(Diagnostic {
                    code: "unit_unknown_space".to_string(),
                    level: None,
                    space_id: Some(space_id.clone()),
                    message: format!("Unit {} references unknown space {space_id}.", unit.id),
                });
            }
        }
    }

    out
}
