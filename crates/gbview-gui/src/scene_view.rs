//! Software rendering of a [`RenderSession`] frame onto an egui painter.

use crate::plan_view::color;
use eframe::egui;
use gbview_algo::scene::{offset_matrix, SceneObject};
use gbview_algo::session::{FrameSnapshot, RenderSession};
use gbview_core::transform::{TransformCommand, Vec3};
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

const ORBIT_SPEED: f64 = 0.01;
const ZOOM_SPEED: f64 = 0.002;
const TRANSLATE_SPEED: f64 = 0.05;
const ROTATE_SPEED: f64 = 0.01;
const SCALE_SPEED: f64 = 0.005;
const AMBIENT: f64 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManipulationMode {
    Detached,
    Translate,
    Rotate,
    Scale,
}

#[derive(Debug, Clone, Copy)]
pub struct ViewOptions {
    pub mode: ManipulationMode,
    pub wireframe: bool,
}

pub fn show(ui: &mut egui::Ui, session: &mut RenderSession, options: ViewOptions) {
    let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::drag());
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return;
    }
    session.resize(rect.width() as f64, rect.height() as f64);
    interact(ui, &response, session, options.mode);

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, egui::CornerRadius::same(0), egui::Color32::from_gray(245));
    if let Some(frame) = session.frame() {
        paint(&painter, rect, &frame, options.wireframe);
    }
}

fn interact(ui: &egui::Ui, response: &egui::Response, session: &mut RenderSession, mode: ManipulationMode) {
    let transform = session.transform().clone();
    let delta = response.drag_delta();
    let (dx, dy) = (delta.x as f64, delta.y as f64);

    if mode == ManipulationMode::Detached {
        if response.dragged() {
            session.camera_mut().orbit(-dx * ORBIT_SPEED, dy * ORBIT_SPEED);
        }
    } else {
        if response.drag_started() {
            transform.set_dragging(true);
        }
        if response.dragged() && (dx != 0.0 || dy != 0.0) {
            let cmd = match mode {
                ManipulationMode::Translate => {
                    TransformCommand::Translate(Vec3::new(dx * TRANSLATE_SPEED, 0.0, dy * TRANSLATE_SPEED))
                }
                ManipulationMode::Rotate => TransformCommand::Rotate(Vec3::new(0.0, dx * ROTATE_SPEED, 0.0)),
                ManipulationMode::Scale => {
                    let f = (-dy * SCALE_SPEED).exp();
                    TransformCommand::Scale(Vec3::new(f, f, f))
                }
                ManipulationMode::Detached => return,
            };
            transform.apply(cmd);
        }
        if response.drag_stopped() {
            transform.set_dragging(false);
        }
    }

    if response.hovered() && !transform.is_dragging() {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y) as f64;
        if scroll != 0.0 {
            session.camera_mut().zoom((-scroll * ZOOM_SPEED).exp());
        }
    }
}

struct Projector {
    view_projection: Matrix4<f64>,
    rect: egui::Rect,
    near: f64,
}

impl Projector {
    /// Screen position and view depth; `None` behind the near plane.
    fn project(&self, p: &Point3<f64>) -> Option<(egui::Pos2, f64)> {
        let clip = self.view_projection * p.to_homogeneous();
        if clip.w <= self.near {
            return None;
        }
        let (x, y) = (clip.x / clip.w, clip.y / clip.w);
        let c = self.rect.center();
        Some((
            egui::pos2(
                c.x + (x as f32) * self.rect.width() * 0.5,
                c.y - (y as f32) * self.rect.height() * 0.5,
            ),
            clip.w,
        ))
    }
}

struct Tri {
    depth: f64,
    points: [egui::Pos2; 3],
    fill: egui::Color32,
}

fn paint(painter: &egui::Painter, rect: egui::Rect, frame: &FrameSnapshot<'_>, wireframe: bool) {
    let camera = frame.camera;
    let projector = Projector {
        view_projection: camera.view_projection(),
        rect,
        near: camera.framing().near,
    };
    let eye = camera.position();
    let model = offset_matrix(&frame.transform);
    let normal_matrix = model
        .fixed_view::<3, 3>(0, 0)
        .clone_owned()
        .try_inverse()
        .map(|m| m.transpose())
        .unwrap_or_else(Matrix3::identity);
    let light = Vector3::new(0.5, 1.0, 0.75).normalize();

    let mut tris = Vec::new();
    let mut edges = Vec::new();

    for tagged in frame.objects {
        match &tagged.object {
            SceneObject::Grid(grid) if grid.visible => {
                let stroke = egui::Stroke::new(1.0, egui::Color32::from_gray(200));
                for [a, b] in grid.lines() {
                    if let (Some((pa, _)), Some((pb, _))) = (projector.project(&a), projector.project(&b)) {
                        painter.line_segment([pa, pb], stroke);
                    }
                }
            }
            SceneObject::Grid(_) => {}
            SceneObject::Solid(solid) => {
                let lift = Vector3::new(0.0, solid.offset_y, 0.0);
                let world: Vec<Point3<f64>> = solid
                    .mesh
                    .positions
                    .iter()
                    .map(|p| model.transform_point(&(p + lift)))
                    .collect();

                for group in &solid.mesh.groups {
                    let material = solid.material(group.group);
                    for t in &solid.mesh.triangles[group.start..group.start + group.count] {
                        let [a, b, c] = t.map(|i| i as usize);
                        let normal = (normal_matrix * solid.mesh.normals[a]).normalize();
                        let facing = normal.dot(&(eye - world[a]));
                        if facing <= 0.0 && !material.double_sided {
                            continue;
                        }
                        let (Some((pa, da)), Some((pb, db)), Some((pc, dc))) = (
                            projector.project(&world[a]),
                            projector.project(&world[b]),
                            projector.project(&world[c]),
                        ) else {
                            continue;
                        };
                        let lit = if facing > 0.0 { normal } else { -normal };
                        let shade = AMBIENT + (1.0 - AMBIENT) * lit.dot(&light).max(0.0);
                        tris.push(Tri {
                            depth: (da + db + dc) / 3.0,
                            points: [pa, pb, pc],
                            fill: shaded(material.color, shade, material.opacity as f32),
                        });
                    }
                }
            }
            SceneObject::Edges(outline) => {
                let lift = Vector3::new(0.0, outline.offset_y, 0.0);
                let stroke = egui::Stroke::new(1.0, color(outline.material.color, outline.material.opacity as f32));
                for [a, b] in &outline.segments {
                    let a = model.transform_point(&(a + lift));
                    let b = model.transform_point(&(b + lift));
                    if let (Some((pa, _)), Some((pb, _))) = (projector.project(&a), projector.project(&b)) {
                        edges.push(([pa, pb], stroke));
                    }
                }
            }
        }
    }

    // Far to near.
    tris.sort_by(|a, b| b.depth.total_cmp(&a.depth));

    if wireframe {
        let stroke = egui::Stroke::new(1.0, egui::Color32::from_black_alpha(77));
        for t in &tris {
            painter.add(egui::Shape::closed_line(t.points.to_vec(), stroke));
        }
    } else {
        let mut mesh = egui::Mesh::default();
        for t in &tris {
            let base = mesh.vertices.len() as u32;
            for p in t.points {
                mesh.colored_vertex(p, t.fill);
            }
            mesh.add_triangle(base, base + 1, base + 2);
        }
        painter.add(egui::Shape::mesh(mesh));
    }

    for (points, stroke) in edges {
        painter.line_segment(points, stroke);
    }
}

fn shaded(rgb: u32, shade: f64, alpha: f32) -> egui::Color32 {
    let [_, r, g, b] = rgb.to_be_bytes();
    let s = |c: u8| (c as f64 * shade).round().clamp(0.0, 255.0) as u8;
    egui::Color32::from_rgba_unmultiplied(s(r), s(g), s(b), (alpha.clamp(0.0, 1.0) * 255.0) as u8)
}
