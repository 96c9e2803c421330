mod plan_view;
mod scene_view;

use anyhow::Result;
use eframe::egui;
use gbview_algo::projection::{project, ScaleControl};
use gbview_algo::session::{RenderSession, SessionConfig, SurfaceSize};
use gbview_core::ingest::{load, IngestSource};
use gbview_core::model::Building;
use gbview_core::transform::{SharedTransform, TransformCommand, Vec3};
use scene_view::{ManipulationMode, ViewOptions};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "gbview",
        native_options,
        Box::new(|cc| Ok(Box::new(GbViewApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Sample,
    File,
    Paste,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewMode {
    Plan,
    Massing,
}

struct GbViewApp {
    input_mode: InputMode,
    paste_text: String,
    building: Option<Building>,
    error: Option<String>,

    selected_level: usize,
    view_mode: ViewMode,
    scale: ScaleControl,

    transform: SharedTransform,
    session: Option<RenderSession>,
    manipulation: ManipulationMode,
    show_grid: bool,
    wireframe: bool,

    status: String,
}

impl GbViewApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self {
            input_mode: InputMode::Sample,
            paste_text: String::new(),
            building: None,
            error: None,
            selected_level: 0,
            view_mode: ViewMode::Plan,
            scale: ScaleControl::default(),
            transform: SharedTransform::new(),
            session: None,
            manipulation: ManipulationMode::Detached,
            show_grid: true,
            wireframe: false,
            status: String::new(),
        };
        app.ingest(IngestSource::Sample);
        app
    }

    fn pick_input(&mut self) {
        let file = rfd::FileDialog::new()
            .add_filter("Graph building", &["json"])
            .pick_file();
        if let Some(path) = file {
            self.load_file(&path);
        }
    }

    fn load_file(&mut self, path: &Path) {
        self.ingest(IngestSource::File(path.to_path_buf()));
    }

    /// Replaces the current building; a failure clears the display and shows the error.
    fn ingest(&mut self, source: IngestSource) {
        match load(&source) {
            Ok(building) => {
                self.status = format!(
                    "Loaded {} levels, {} units",
                    building.levels.len(),
                    building.units.len()
                );
                info!(levels = building.levels.len(), "building loaded");
                self.building = Some(building);
                self.error = None;
                self.selected_level = 0;
                self.scale = ScaleControl::default();
                // New building, new scene and camera framing.
                self.session = None;
            }
            Err(e) => {
                warn!(error = %e, "ingest failed");
                self.error = Some(e.to_string());
                self.building = None;
                self.session = None;
                self.status.clear();
            }
        }
    }

    fn handle_file_drop(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().find(|f| f.path.is_some()) else {
            return;
        };
        if let Some(path) = file.path {
            self.input_mode = InputMode::File;
            self.load_file(&path);
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if self.view_mode != ViewMode::Massing || ctx.wants_keyboard_input() {
            return;
        }
        ctx.input(|i| {
            if i.key_pressed(egui::Key::G) {
                self.manipulation = ManipulationMode::Translate;
            }
            if i.key_pressed(egui::Key::R) {
                self.manipulation = ManipulationMode::Rotate;
            }
            if i.key_pressed(egui::Key::S) {
                self.manipulation = ManipulationMode::Scale;
            }
            if i.key_pressed(egui::Key::Escape) {
                self.manipulation = ManipulationMode::Detached;
            }
        });
    }

    fn input_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.input_mode, InputMode::Sample, "Sample");
            ui.selectable_value(&mut self.input_mode, InputMode::File, "Open file");
            ui.selectable_value(&mut self.input_mode, InputMode::Paste, "Paste JSON");
        });
        match self.input_mode {
            InputMode::Sample => {
                if ui.button("Load sample building").clicked() {
                    self.ingest(IngestSource::Sample);
                }
            }
            InputMode::File => {
                if ui.button("Choose JSON…").clicked() {
                    self.pick_input();
                }
                ui.label("or drop a file onto the window.");
            }
            InputMode::Paste => {
                ui.add(
                    egui::TextEdit::multiline(&mut self.paste_text)
                        .code_editor()
                        .desired_rows(10)
                        .hint_text("{ \"levels\": [...], \"units\": [...] }"),
                );
                if ui
                    .add_enabled(!self.paste_text.trim().is_empty(), egui::Button::new("Load"))
                    .clicked()
                {
                    self.ingest(IngestSource::Text(self.paste_text.clone()));
                }
            }
        }

        if let Some(err) = &self.error {
            egui::Frame::new()
                .fill(egui::Color32::from_rgb(0xfd, 0xec, 0xec))
                .inner_margin(egui::Margin::same(6))
                .show(ui, |ui| {
                    ui.colored_label(egui::Color32::from_rgb(0xb0, 0x20, 0x20), err);
                });
        }
    }

    fn info_panel(&mut self, ui: &mut egui::Ui) {
        let Some(building) = &self.building else {
            ui.label("No building loaded.");
            return;
        };

        let count = building.levels.len();
        egui::ComboBox::from_label("Level")
            .selected_text(format!("Level {}", self.selected_level + 1))
            .show_ui(ui, |ui| {
                for i in 0..count {
                    ui.selectable_value(&mut self.selected_level, i, format!("Level {}", i + 1));
                }
            });

        if let Some(level) = building.level(self.selected_level) {
            ui.label(format!("Height: {}", level.height));
            ui.label(format!("Spaces: {}", level.spaces.len()));
            ui.label(format!("Surfaces: {}", level.surfaces.len()));
        }

        ui.separator();
        ui.strong(format!("Units ({})", building.units.len()));
        egui::ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
            for unit in &building.units {
                ui.group(|ui| {
                    ui.label(format!("Unit {}", unit.id));
                    ui.label(format!("Function: {}", or_na(&unit.properties.function)));
                    ui.label(format!("Program: {}", or_na(&unit.properties.program)));
                    ui.label(format!("Spaces: {}", unit.space_ids.join(", ")));
                });
            }
        });

        ui.collapsing("Converted JSON", |ui| {
            if let Ok(json) = serde_json::to_string_pretty(building) {
                egui::ScrollArea::vertical().id_salt("converted-json").show(ui, |ui| {
                    ui.monospace(json);
                });
            }
        });
    }

    fn transform_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.manipulation, ManipulationMode::Translate, "Move (G)");
            ui.selectable_value(&mut self.manipulation, ManipulationMode::Rotate, "Rotate (R)");
            ui.selectable_value(&mut self.manipulation, ManipulationMode::Scale, "Scale (S)");
            ui.selectable_value(&mut self.manipulation, ManipulationMode::Detached, "Orbit (Esc)");
        });

        let mut offset = self.transform.get();
        let mut changed = false;
        ui.horizontal(|ui| {
            ui.label("Position");
            changed |= drag_vec3(ui, &mut offset.position, 0.1, "");
        });
        ui.horizontal(|ui| {
            ui.label("Rotation");
            let mut deg = Vec3::new(
                offset.rotation.x.to_degrees(),
                offset.rotation.y.to_degrees(),
                offset.rotation.z.to_degrees(),
            );
            if drag_vec3(ui, &mut deg, 1.0, "°") {
                offset.rotation = Vec3::new(
                    deg.x.to_radians(),
                    deg.y.to_radians(),
                    deg.z.to_radians(),
                );
                changed = true;
            }
        });
        ui.horizontal(|ui| {
            ui.label("Scale");
            changed |= drag_vec3(ui, &mut offset.scale, 0.01, "");
        });
        if changed {
            self.transform.apply(TransformCommand::Set(offset));
        }

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!self.transform.get().is_identity(), egui::Button::new("Reset transform"))
                .clicked()
            {
                self.transform.apply(TransformCommand::Reset);
            }
            if ui.button("Reset camera").clicked() {
                if let Some(session) = &mut self.session {
                    session.camera_mut().reset();
                }
            }
        });
        ui.horizontal(|ui| {
            if ui.checkbox(&mut self.show_grid, "Grid").changed() {
                if let Some(session) = &mut self.session {
                    session.set_grid_visible(self.show_grid);
                }
            }
            ui.checkbox(&mut self.wireframe, "Wireframe");
        });
    }

    fn plan_view(&mut self, ui: &mut egui::Ui) {
        let Some(level) = self.building.as_ref().and_then(|b| b.level(self.selected_level)) else {
            ui.label("Nothing to show.");
            return;
        };
        ui.horizontal(|ui| {
            if ui.button("−").clicked() {
                self.scale.zoom_out();
            }
            ui.label(format!("{}%", self.scale.percent()));
            if ui.button("+").clicked() {
                self.scale.zoom_in();
            }
        });
        let projection = project(level, self.scale.scale());
        plan_view::draw(ui, &projection);
    }

    fn massing_view(&mut self, ui: &mut egui::Ui) {
        let Some(building) = &self.building else {
            ui.label("Nothing to show.");
            return;
        };

        let size = ui.available_size();
        let session = self.session.get_or_insert_with(|| {
            RenderSession::mount(
                building,
                self.selected_level,
                SurfaceSize::new(size.x as f64, size.y as f64),
                SessionConfig {
                    show_grid: self.show_grid,
                    ..SessionConfig::default()
                },
                self.transform.clone(),
            )
        });
        session.select_level(building, self.selected_level);

        scene_view::show(
            ui,
            session,
            ViewOptions {
                mode: self.manipulation,
                wireframe: self.wireframe,
            },
        );
        if self.transform.is_dragging() {
            ui.ctx().request_repaint();
        }
    }
}

impl eframe::App for GbViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_file_drop(ctx);
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Graph Building");
                ui.separator();
                ui.selectable_value(&mut self.view_mode, ViewMode::Plan, "2D plan");
                ui.selectable_value(&mut self.view_mode, ViewMode::Massing, "3D massing");
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(&self.status);
        });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.input_panel(ui);
                    ui.separator();
                    self.info_panel(ui);
                    if self.view_mode == ViewMode::Massing {
                        ui.separator();
                        self.transform_panel(ui);
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| match self.view_mode {
            ViewMode::Plan => {
                // Leaving the 3D view unmounts it.
                self.session = None;
                self.plan_view(ui);
            }
            ViewMode::Massing => self.massing_view(ui),
        });
    }
}

fn or_na(s: &str) -> &str {
    if s.is_empty() {
        "N/A"
    } else {
        s
    }
}

fn drag_vec3(ui: &mut egui::Ui, v: &mut Vec3, speed: f64, suffix: &str) -> bool {
    let mut changed = false;
    for (axis, value) in [("x ", &mut v.x), ("y ", &mut v.y), ("z ", &mut v.z)] {
        changed |= ui
            .add(egui::DragValue::new(value).speed(speed).prefix(axis).suffix(suffix))
            .changed();
    }
    changed
}

