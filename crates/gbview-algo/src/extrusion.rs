//! Level-by-level extrusion of resolved space polygons into stacked solids.

use crate::error::{GeometryError, Result};
use crate::scene::{
    EdgeOutline, FaceGroup, LineMaterial, Material, Mesh, MeshGroup, Scene, SceneObject,
    SceneTag, Solid,
};
use crate::triangulate::{signed_area2, triangulate_polygon};
use gbview_core::geom::Vec2;
use gbview_core::model::Building;
use gbview_core::resolve::{resolve_space, LevelIndex, MIN_POLYGON_VERTICES};
use itertools::Itertools;
use nalgebra::{Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use tracing::{debug, info};

/// Neighbouring side faces closer than this (degrees) share no drawn edge.
pub const EDGE_THRESHOLD_DEG: f64 = 1.0;

const CAP_OPACITY_BOOST: f64 = 0.05;
const CAP_ROUGHNESS_DROP: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialOptions {
    pub base_color: u32,
    pub selected_color: u32,
    pub opacity: f64,
    pub roughness: f64,
    pub metalness: f64,
    pub edge_color: u32,
    pub edge_opacity: f64,
}

impl Default for MaterialOptions {
    fn default() -> Self {
        Self {
            base_color: 0xffd8a8,
            selected_color: 0xa5d8ff,
            opacity: 0.9,
            roughness: 0.7,
            metalness: 0.1,
            edge_color: 0x333333,
            edge_opacity: 0.5,
        }
    }
}

impl MaterialOptions {
    /// (side, cap) materials for a level, highlighted when `selected`.
    pub fn materials(&self, selected: bool) -> (Material, Material) {
        let color = if selected {
            self.selected_color
        } else {
            self.base_color
        };
        let side = Material {
            color,
            opacity: self.opacity,
            roughness: self.roughness,
            metalness: self.metalness,
            double_sided: false,
        };
        let cap = Material {
            opacity: self.opacity + CAP_OPACITY_BOOST,
            roughness: self.roughness - CAP_ROUGHNESS_DROP,
            double_sided: true,
            ..side
        };
        (side, cap)
    }

    pub fn edge_material(&self) -> LineMaterial {
        LineMaterial {
            color: self.edge_color,
            opacity: self.edge_opacity,
        }
    }
}

/// Prism over `polygon` along its own +Z normal. Caps first, then sides.
pub fn extrude_polygon(polygon: &[Vec2], height: f64) -> Result<Mesh> {
    if polygon.len() < MIN_POLYGON_VERTICES {
        return Err(GeometryError::TooFewVertices(polygon.len()));
    }
    if !(height.is_finite() && height > 0.0) {
        return Err(GeometryError::InvalidHeight(height));
    }

    let triangles = triangulate_polygon(polygon)?;
    let mut mesh = Mesh::default();

    // Bottom cap faces down, top cap faces up.
    let cap_start = mesh.triangles.len();
    for (z, normal, flip) in [(0.0, -Vector3::z(), true), (height, Vector3::z(), false)] {
        let base = mesh.vertex_count() as u32;
        for p in polygon {
            mesh.push_vertex(Point3::new(p.x, p.y, z), normal);
        }
        for t in &triangles {
            let [a, b, c] = t.map(|i| base + i as u32);
            mesh.triangles.push(if flip { [a, c, b] } else { [a, b, c] });
        }
    }
    mesh.groups.push(MeshGroup {
        group: FaceGroup::Cap,
        start: cap_start,
        count: mesh.triangles.len() - cap_start,
    });

    let ccw = signed_area2(polygon) >= 0.0;
    let side_start = mesh.triangles.len();
    for (p, q) in polygon.iter().circular_tuple_windows() {
        let d = Vector3::new(q.x - p.x, q.y - p.y, 0.0);
        if d.norm_squared() == 0.0 {
            continue;
        }
        let outward = if ccw {
            Vector3::new(d.y, -d.x, 0.0)
        } else {
            Vector3::new(-d.y, d.x, 0.0)
        }
        .normalize();

        let i0 = mesh.push_vertex(Point3::new(p.x, p.y, 0.0), outward);
        let i1 = mesh.push_vertex(Point3::new(q.x, q.y, 0.0), outward);
        let i2 = mesh.push_vertex(Point3::new(q.x, q.y, height), outward);
        let i3 = mesh.push_vertex(Point3::new(p.x, p.y, height), outward);
        if ccw {
            mesh.triangles.push([i0, i1, i2]);
            mesh.triangles.push([i0, i2, i3]);
        } else {
            mesh.triangles.push([i0, i2, i1]);
            mesh.triangles.push([i0, i3, i2]);
        }
    }
    mesh.groups.push(MeshGroup {
        group: FaceGroup::Side,
        start: side_start,
        count: mesh.triangles.len() - side_start,
    });

    Ok(mesh)
}

/// Cap rings plus the vertical edges where the wall turns by more than
/// [`EDGE_THRESHOLD_DEG`]. Same local frame as [`extrude_polygon`].
pub fn feature_edges(polygon: &[Vec2], height: f64) -> Vec<[Point3<f64>; 2]> {
    let n = polygon.len();
    let mut segments = Vec::with_capacity(n * 3);

    for (p, q) in polygon.iter().circular_tuple_windows() {
        if p == q {
            continue;
        }
        for z in [0.0, height] {
            segments.push([Point3::new(p.x, p.y, z), Point3::new(q.x, q.y, z)]);
        }
    }

    let threshold = EDGE_THRESHOLD_DEG.to_radians().cos();
    for i in 0..n {
        let prev = polygon[(i + n - 1) % n];
        let here = polygon[i];
        let next = polygon[(i + 1) % n];
        let a = Vector3::new(here.x - prev.x, here.y - prev.y, 0.0);
        let b = Vector3::new(next.x - here.x, next.y - here.y, 0.0);
        let (la, lb) = (a.norm(), b.norm());
        if la == 0.0 || lb == 0.0 {
            continue;
        }
        if a.dot(&b) / (la * lb) < threshold {
            segments.push([
                Point3::new(here.x, here.y, 0.0),
                Point3::new(here.x, here.y, height),
            ]);
        }
    }

    segments
}

/// Turns local +Z (the extrusion axis) into world +Y.
pub fn up_axis_rotation() -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), -FRAC_PI_2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RendererState {
    Empty,
    Populated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderStats {
    pub pass: u64,
    pub removed: usize,
    pub solids: usize,
    pub skipped_spaces: usize,
    pub total_height: f64,
}

/// Rebuilds every building object of a [`Scene`] on each call.
#[derive(Debug, Clone)]
pub struct ExtrusionRenderer {
    options: MaterialOptions,
    state: RendererState,
    passes: u64,
}

impl ExtrusionRenderer {
    pub fn new(options: MaterialOptions) -> Self {
        Self {
            options,
            state: RendererState::Empty,
            passes: 0,
        }
    }

    pub fn options(&self) -> &MaterialOptions {
        &self.options
    }

    pub fn state(&self) -> RendererState {
        self.state
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn render(&mut self, scene: &mut Scene, building: &Building, selected_level: usize) -> RenderStats {
        let removed = scene.remove_tagged(SceneTag::Building);
        self.passes += 1;

        let rotation = up_axis_rotation();
        let edge_material = self.options.edge_material();
        let mut stats = RenderStats {
            pass: self.passes,
            removed,
            ..RenderStats::default()
        };

        let mut base_height = 0.0;
        for (level_index, level) in building.levels.iter().enumerate() {
            let height = level.effective_height();
            let (side_material, cap_material) = self.options.materials(level_index == selected_level);
            let lookup = LevelIndex::new(level);

            for space in &level.spaces {
                let polygon = resolve_space(space, &lookup);
                let mut mesh = match extrude_polygon(&polygon, height) {
                    Ok(mesh) => mesh,
                    Err(err) => {
                        debug!(level = level_index, space = %space.id, %err, "space has no geometry");
                        stats.skipped_spaces += 1;
                        continue;
                    }
                };
                mesh.rotate(&rotation);

                let segments = feature_edges(&polygon, height)
                    .into_iter()
                    .map(|[a, b]| [rotation * a, rotation * b])
                    .collect();

                scene.add(
                    SceneTag::Building,
                    SceneObject::Solid(Solid {
                        level_index,
                        space_id: space.id.clone(),
                        mesh,
                        side_material,
                        cap_material,
                        offset_y: base_height,
                    }),
                );
                scene.add(
                    SceneTag::Building,
                    SceneObject::Edges(EdgeOutline {
                        level_index,
                        space_id: space.id.clone(),
                        segments,
                        material: edge_material,
                        offset_y: base_height,
                    }),
                );
                stats.solids += 1;
            }

            base_height += height;
        }

        stats.total_height = base_height;
        self.state = RendererState::Populated;
        info!(
            pass = stats.pass,
            solids = stats.solids,
            skipped = stats.skipped_spaces,
            "rendered building"
        );
        stats
    }

    /// Removes everything this renderer put into `scene`.
    pub fn dispose(&mut self, scene: &mut Scene) {
        scene.remove_tagged(SceneTag::Building);
        self.state = RendererState::Empty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(size, 0.0),
            Vec2::new(size, size),
            Vec2::new(0.0, size),
        ]
    }

    #[test]
    fn box_has_twelve_triangles() {
        let mesh = extrude_polygon(&square(2.0), 3.0).expect("valid square");
        assert_eq!(12, mesh.triangle_count());
        assert_eq!(2, mesh.groups.len());
        assert_eq!(FaceGroup::Cap, mesh.groups[0].group);
        assert_eq!(4, mesh.groups[0].count);
        assert_eq!(8, mesh.groups[1].count);
    }

    #[test]
    fn box_has_twelve_feature_edges() {
        assert_eq!(12, feature_edges(&square(2.0), 3.0).len());
    }

    #[test]
    fn collinear_vertex_gets_no_vertical_edge() {
        let mut poly = square(2.0);
        poly.insert(1, Vec2::new(1.0, 0.0));
        // 5 ring segments top and bottom, 4 corners.
        assert_eq!(14, feature_edges(&poly, 1.0).len());
    }

    #[test]
    fn rotation_maps_extrusion_axis_to_world_up() {
        let r = up_axis_rotation();
        let top = r * Point3::new(1.0, 2.0, 3.0);
        assert_relative_eq!(Point3::new(1.0, 3.0, -2.0), top, epsilon = 1e-12);
    }

    #[test]
    fn side_normals_point_outward_for_either_winding() {
        for poly in [square(1.0), square(1.0).into_iter().rev().collect()] {
            let mesh = extrude_polygon(&poly, 1.0).expect("valid");
            let side = mesh.groups[1];
            for t in &mesh.triangles[side.start..side.start + side.count] {
                let p = mesh.positions[t[0] as usize];
                let n = mesh.normals[t[0] as usize];
                let to_centre = Vector3::new(0.5 - p.x, 0.5 - p.y, 0.0);
                assert!(n.dot(&to_centre) < 0.0);
            }
        }
    }

    #[test]
    fn cap_material_is_more_opaque_and_smoother() {
        let (side, cap) = MaterialOptions::default().materials(false);
        assert_eq!(0xffd8a8, side.color);
        assert_eq!(side.color, cap.color);
        assert_relative_eq!(side.opacity + 0.05, cap.opacity);
        assert_relative_eq!(side.roughness - 0.2, cap.roughness);
        assert_eq!(0xa5d8ff, MaterialOptions::default().materials(true).0.color);
    }

    #[test]
    fn rejects_degenerate_input() {
        assert_eq!(
            Err(GeometryError::TooFewVertices(2)),
            extrude_polygon(&square(1.0)[..2], 1.0)
        );
        assert_eq!(Err(GeometryError::InvalidHeight(0.0)), extrude_polygon(&square(1.0), 0.0));
    }
}
