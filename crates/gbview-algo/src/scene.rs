//! Drawable scene content produced by the 3D pipeline.
//!
//! World space is Y-up. Plan coordinates `(x, y)` lie on the ground plane at
//! world `(x, -y)`; elevation is world `+Y`.

use gbview_core::transform::TransformOffset;
use nalgebra::{Matrix4, Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Map a plan coordinate at some elevation into world space.
pub fn plan_to_world(x: f64, y: f64, elevation: f64) -> Point3<f64> {
    Point3::new(x, elevation, -y)
}

/// Surface appearance of a solid face group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: u32,
    pub opacity: f64,
    pub roughness: f64,
    pub metalness: f64,
    pub double_sided: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineMaterial {
    pub color: u32,
    pub opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceGroup {
    Cap,
    Side,
}

/// Triangles `[start, start + count)` drawn with one material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshGroup {
    pub group: FaceGroup,
    pub start: usize,
    pub count: usize,
}

/// Flat-shaded triangle mesh; vertices are not shared between faces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub positions: Vec<Point3<f64>>,
    pub normals: Vec<Vector3<f64>>,
    pub triangles: Vec<[u32; 3]>,
    pub groups: Vec<MeshGroup>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn push_vertex(&mut self, p: Point3<f64>, n: Vector3<f64>) -> u32 {
        self.positions.push(p);
        self.normals.push(n);
        (self.positions.len() - 1) as u32
    }

    pub fn rotate(&mut self, rotation: &Rotation3<f64>) {
        for p in &mut self.positions {
            *p = rotation * *p;
        }
        for n in &mut self.normals {
            *n = rotation * *n;
        }
    }

    /// (min, max) over all positions, `None` when empty.
    pub fn aabb(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(lo, hi), p| {
            (lo.inf(p), hi.sup(p))
        }))
    }
}

/// Extruded space ready to draw. `offset_y` is applied on top of `mesh`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solid {
    pub level_index: usize,
    pub space_id: String,
    pub mesh: Mesh,
    pub side_material: Material,
    pub cap_material: Material,
    pub offset_y: f64,
}

impl Solid {
    pub fn material(&self, group: FaceGroup) -> &Material {
        match group {
            FaceGroup::Cap => &self.cap_material,
            FaceGroup::Side => &self.side_material,
        }
    }

    pub fn world_positions(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        let lift = Vector3::new(0.0, self.offset_y, 0.0);
        self.mesh.positions.iter().map(move |p| p + lift)
    }
}

/// Feature-edge wireframe of one solid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeOutline {
    pub level_index: usize,
    pub space_id: String,
    pub segments: Vec<[Point3<f64>; 2]>,
    pub material: LineMaterial,
    pub offset_y: f64,
}

/// Square reference grid on the ground plane, centred at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridHelper {
    pub size: f64,
    pub divisions: u32,
    pub visible: bool,
}

impl GridHelper {
    pub fn lines(&self) -> Vec<[Point3<f64>; 2]> {
        let half = self.size * 0.5;
        let step = self.size / self.divisions.max(1) as f64;
        (0..=self.divisions)
            .flat_map(|i| {
                let t = -half + step * i as f64;
                [
                    [Point3::new(t, 0.0, -half), Point3::new(t, 0.0, half)],
                    [Point3::new(-half, 0.0, t), Point3::new(half, 0.0, t)],
                ]
            })
            .collect()
    }
}

/// Ownership tag; a render pass clears exactly the objects it tagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneTag {
    Building,
    Helper,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneObject {
    Solid(Solid),
    Edges(EdgeOutline),
    Grid(GridHelper),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedObject {
    pub tag: SceneTag,
    pub object: SceneObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    objects: Vec<TaggedObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, tag: SceneTag, object: SceneObject) {
        self.objects.push(TaggedObject { tag, object });
    }

    /// Drops every object carrying `tag`; returns how many went.
    pub fn remove_tagged(&mut self, tag: SceneTag) -> usize {
        let before = self.objects.len();
        self.objects.retain(|o| o.tag != tag);
        before - self.objects.len()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[TaggedObject] {
        &self.objects
    }

    pub fn count_tagged(&self, tag: SceneTag) -> usize {
        self.objects.iter().filter(|o| o.tag == tag).count()
    }

    pub fn solids(&self) -> impl Iterator<Item = &Solid> {
        self.objects.iter().filter_map(|o| match &o.object {
            SceneObject::Solid(s) => Some(s),
            _ => None,
        })
    }

    pub fn outlines(&self) -> impl Iterator<Item = &EdgeOutline> {
        self.objects.iter().filter_map(|o| match &o.object {
            SceneObject::Edges(e) => Some(e),
            _ => None,
        })
    }

    pub fn grid_mut(&mut self) -> Option<&mut GridHelper> {
        self.objects.iter_mut().find_map(|o| match &mut o.object {
            SceneObject::Grid(g) => Some(g),
            _ => None,
        })
    }

    pub fn grid(&self) -> Option<&GridHelper> {
        self.objects.iter().find_map(|o| match &o.object {
            SceneObject::Grid(g) => Some(g),
            _ => None,
        })
    }
}

/// Model matrix for the building group: translate * rotate(X, Y, Z) * scale.
pub fn offset_matrix(t: &TransformOffset) -> Matrix4<f64> {
    let rotation = Rotation3::from_axis_angle(&Vector3::x_axis(), t.rotation.x)
        * Rotation3::from_axis_angle(&Vector3::y_axis(), t.rotation.y)
        * Rotation3::from_axis_angle(&Vector3::z_axis(), t.rotation.z);
    Matrix4::new_translation(&Vector3::new(t.position.x, t.position.y, t.position.z))
        * rotation.to_homogeneous()
        * Matrix4::new_nonuniform_scaling(&Vector3::new(t.scale.x, t.scale.y, t.scale.z))
}
