use eframe::egui;
use gbview_algo::projection::{Projection, Viewport};
use gbview_algo::triangulate::triangulate_polygon;
use gbview_core::geom::Vec2;

/// Maps projection units into `rect`, preserving aspect like an SVG viewBox
/// with the default `xMidYMid meet`.
#[derive(Debug, Clone, Copy)]
struct ViewBoxToScreen {
    origin: egui::Pos2,
    min: Vec2,
    scale: f32,
}

impl ViewBoxToScreen {
    fn new(rect: egui::Rect, vb: Viewport) -> Option<Self> {
        if !(vb.width.is_finite() && vb.height.is_finite()) || vb.width <= 0.0 || vb.height <= 0.0 {
            return None;
        }
        let scale = (rect.width() / vb.width as f32).min(rect.height() / vb.height as f32);
        let used = egui::vec2(vb.width as f32 * scale, vb.height as f32 * scale);
        Some(Self {
            origin: rect.center() - used * 0.5,
            min: Vec2::new(vb.x, vb.y),
            scale,
        })
    }

    fn point(&self, p: Vec2) -> egui::Pos2 {
        self.origin
            + egui::vec2(
                (p.x - self.min.x) as f32 * self.scale,
                (p.y - self.min.y) as f32 * self.scale,
            )
    }

    fn width(&self, w: f64) -> f32 {
        (w as f32 * self.scale).max(0.5)
    }
}

pub fn color(rgb: u32, alpha: f32) -> egui::Color32 {
    let [_, r, g, b] = rgb.to_be_bytes();
    egui::Color32::from_rgba_unmultiplied(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0) as u8)
}

pub fn draw(ui: &mut egui::Ui, projection: &Projection) {
    let (rect, _) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, egui::CornerRadius::same(0), egui::Color32::WHITE);

    let Some(tx) = ViewBoxToScreen::new(rect, projection.viewport) else {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Level has no points.",
            egui::FontId::proportional(14.0),
            egui::Color32::GRAY,
        );
        return;
    };

    for path in &projection.space_paths {
        let screen: Vec<egui::Pos2> = path.points.iter().map(|p| tx.point(*p)).collect();
        if let Ok(triangles) = triangulate_polygon(&path.points) {
            let fill = color(path.fill, 1.0);
            let mut mesh = egui::Mesh::default();
            for p in &screen {
                mesh.colored_vertex(*p, fill);
            }
            for [a, b, c] in triangles {
                mesh.add_triangle(a as u32, b as u32, c as u32);
            }
            painter.add(egui::Shape::mesh(mesh));
        }
        painter.add(egui::Shape::closed_line(
            screen,
            egui::Stroke::new(tx.width(path.stroke_width), color(path.stroke, 1.0)),
        ));
    }

    for line in &projection.surface_lines {
        painter.line_segment(
            [tx.point(line.a), tx.point(line.b)],
            egui::Stroke::new(tx.width(line.stroke_width), color(line.stroke, 1.0)),
        );
    }
}
