//! Flat plan view of one level.

use gbview_core::geom::{BBox2, Vec2};
use gbview_core::model::Level;
use gbview_core::resolve::{resolve_space, LevelIndex, MIN_POLYGON_VERTICES};
use serde::{Deserialize, Serialize};

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 5.0;
pub const ZOOM_IN_FACTOR: f64 = 1.2;
pub const ZOOM_OUT_FACTOR: f64 = 0.8;
/// Padding around the point extent, as a fraction of its larger side.
pub const PADDING_RATIO: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct ProjectionStyle {
    pub first_space_fill: u32,
    pub space_fill: u32,
    pub space_stroke: u32,
    pub space_stroke_width: f64,
    pub surface_stroke: u32,
    pub surface_stroke_width: f64,
}

impl Default for ProjectionStyle {
    fn default() -> Self {
        Self {
            first_space_fill: 0xa5d8ff,
            space_fill: 0xffd8a8,
            space_stroke: 0x666666,
            space_stroke_width: 1.0,
            surface_stroke: 0x333333,
            surface_stroke_width: 0.5,
        }
    }
}

/// Visible rectangle in scaled drawing units, `viewBox` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacePath {
    pub space_id: String,
    /// Closed: the last vertex connects back to the first.
    pub points: Vec<Vec2>,
    pub fill: u32,
    pub stroke: u32,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceLine {
    pub surface_id: String,
    pub a: Vec2,
    pub b: Vec2,
    pub stroke: u32,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub scale: f64,
    pub bbox: BBox2,
    pub padding: f64,
    pub viewport: Viewport,
    pub space_paths: Vec<SpacePath>,
    pub surface_lines: Vec<SurfaceLine>,
}

pub fn project(level: &Level, scale: f64) -> Projection {
    project_with_style(level, scale, &ProjectionStyle::default())
}

pub fn project_with_style(level: &Level, scale: f64, style: &ProjectionStyle) -> Projection {
    let bbox = level.extents();
    let (padding, viewport) = padded_viewport(bbox, scale);

    let lookup = LevelIndex::new(level);
    let space_paths = level
        .spaces
        .iter()
        .enumerate()
        .filter_map(|(index, space)| {
            let points = resolve_space(space, &lookup);
            if points.len() < MIN_POLYGON_VERTICES {
                return None;
            }
            Some(SpacePath {
                space_id: space.id.clone(),
                points: points.into_iter().map(|p| p.scaled(scale)).collect(),
                fill: if index == 0 {
                    style.first_space_fill
                } else {
                    style.space_fill
                },
                stroke: style.space_stroke,
                stroke_width: style.space_stroke_width / scale,
            })
        })
        .collect();

    let surface_lines = level
        .surfaces
        .iter()
        .filter_map(|surface| {
            let a = level.point(&surface.point_a)?;
            let b = level.point(&surface.point_b)?;
            Some(SurfaceLine {
                surface_id: surface.id.clone(),
                a: a.scaled(scale),
                b: b.scaled(scale),
                stroke: style.surface_stroke,
                stroke_width: style.surface_stroke_width / scale,
            })
        })
        .collect();

    Projection {
        scale,
        bbox,
        padding,
        viewport,
        space_paths,
        surface_lines,
    }
}

/// Padding and scaled viewport for a plan extent. Empty extents produce
/// non-finite values.
pub fn padded_viewport(bbox: BBox2, scale: f64) -> (f64, Viewport) {
    let padding = bbox.width().max(bbox.height()) * PADDING_RATIO;
    let padded = bbox.expand(padding);
    let viewport = Viewport {
        x: padded.min.x * scale,
        y: padded.min.y * scale,
        width: padded.width() * scale,
        height: padded.height() * scale,
    };
    (padding, viewport)
}

/// Zoom factor for the plan view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleControl {
    scale: f64,
}

impl Default for ScaleControl {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl ScaleControl {
    pub fn new(scale: f64) -> Self {
        Self {
            scale: scale.clamp(MIN_SCALE, MAX_SCALE),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.scale = (self.scale * ZOOM_IN_FACTOR).min(MAX_SCALE);
        self.scale
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.scale = (self.scale * ZOOM_OUT_FACTOR).max(MIN_SCALE);
        self.scale
    }

    /// Rounded percentage for display, e.g. `120`.
    pub fn percent(&self) -> i64 {
        (self.scale * 100.0).round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_is_clamped() {
        let mut s = ScaleControl::default();
        for _ in 0..50 {
            assert!(s.zoom_in() <= MAX_SCALE);
        }
        assert_eq!(MAX_SCALE, s.scale());
        for _ in 0..50 {
            assert!(s.zoom_out() >= MIN_SCALE);
        }
        assert_eq!(MIN_SCALE, s.scale());
    }

    #[test]
    fn percent_rounds() {
        let mut s = ScaleControl::default();
        s.zoom_in();
        assert_eq!(120, s.percent());
    }
}
