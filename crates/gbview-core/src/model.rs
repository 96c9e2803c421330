use crate::geom::{BBox2, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stacking height used when a level carries no usable height.
pub const DEFAULT_LEVEL_HEIGHT: f64 = 3.0;

/// A named plan coordinate. Serialised as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Undirected edge between two point keys of the same level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surface {
    pub id: String,
    pub point_a: String,
    pub point_b: String,
}

/// Directed use of a [`Surface`] inside one space boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoSurface {
    pub id: String,
    pub partner_id: Option<String>,
    pub surface_id: String,
    #[serde(rename = "directionAToB")]
    pub direction_a_to_b: bool,
}

impl CoSurface {
    /// Point key this use starts from.
    pub fn start_key<'a>(&self, surface: &'a Surface) -> &'a str {
        if self.direction_a_to_b {
            &surface.point_a
        } else {
            &surface.point_b
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: String,
    pub outer_loop: Vec<CoSurface>,
    /// Holes. Carried through conversion, never rendered.
    #[serde(default)]
    pub inner_loops: Vec<Vec<CoSurface>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub height: f64,
    pub points: BTreeMap<String, Point>,
    pub surfaces: Vec<Surface>,
    pub spaces: Vec<Space>,
}

impl Level {
    pub fn surface(&self, id: &str) -> Option<&Surface> {
        self.surfaces.iter().find(|s| s.id == id)
    }

    pub fn point(&self, key: &str) -> Option<Vec2> {
        self.points.get(key).map(Point::pos)
    }

    /// Height used for stacking; falls back to [`DEFAULT_LEVEL_HEIGHT`].
    pub fn effective_height(&self) -> f64 {
        if self.height.is_finite() && self.height > 0.0 {
            self.height
        } else {
            DEFAULT_LEVEL_HEIGHT
        }
    }

    /// Extent of the point table (not of the resolved loops).
    pub fn extents(&self) -> BBox2 {
        BBox2::from_points(self.points.values().map(Point::pos))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UnitProperties {
    pub function: String,
    pub program: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: String,
    pub space_ids: Vec<String>,
    pub properties: UnitProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub levels: Vec<Level>,
    pub units: Vec<Unit>,
}

impl Building {
    pub fn level(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    /// Sum of all level heights.
    pub fn total_height(&self) -> f64 {
        self.levels.iter().map(Level::effective_height).sum()
    }

    /// Union of every level's point extents.
    pub fn plan_extents(&self) -> BBox2 {
        self.levels
            .iter()
            .fold(BBox2::empty(), |acc, level| acc.union(&level.extents()))
    }

    /// Re-serialise into the input schema accepted by [`crate::convert::convert`].
    pub fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
