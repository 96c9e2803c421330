//! One mounted 3D view: scene, renderer and camera with an explicit lifetime.

use crate::bounds::{compute_bounds, SceneBounds};
use crate::camera::{Camera, CameraFraming};
use crate::extrusion::{ExtrusionRenderer, MaterialOptions, RenderStats};
use crate::scene::{GridHelper, Scene, SceneObject, SceneTag, TaggedObject};
use gbview_core::model::Building;
use gbview_core::transform::{SharedTransform, TransformOffset};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const GRID_DIVISIONS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub materials: MaterialOptions,
    pub show_grid: bool,
    pub grid_divisions: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            materials: MaterialOptions::default(),
            show_grid: true,
            grid_divisions: GRID_DIVISIONS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl SurfaceSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Zero, negative or non-finite extent: nothing can be drawn into it.
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone)]
pub struct FrameSnapshot<'a> {
    pub surface: SurfaceSize,
    pub camera: &'a Camera,
    pub objects: &'a [TaggedObject],
    pub transform: TransformOffset,
}

pub struct RenderSession {
    scene: Scene,
    renderer: ExtrusionRenderer,
    camera: Camera,
    bounds: SceneBounds,
    surface: SurfaceSize,
    transform: SharedTransform,
    rendered_level: usize,
    running: bool,
}

impl RenderSession {
    /// Builds the scene for `building` and starts producing frames.
    pub fn mount(
        building: &Building,
        selected_level: usize,
        surface: SurfaceSize,
        config: SessionConfig,
        transform: SharedTransform,
    ) -> Self {
        let bounds = compute_bounds(building);
        let camera = Camera::new(CameraFraming::from_bounds(&bounds), surface.aspect());

        let mut scene = Scene::new();
        scene.add(
            SceneTag::Helper,
            SceneObject::Grid(GridHelper {
                size: bounds.max_dimension() * 2.0,
                divisions: config.grid_divisions,
                visible: config.show_grid,
            }),
        );

        let mut session = Self {
            scene,
            renderer: ExtrusionRenderer::new(config.materials),
            camera,
            bounds,
            surface,
            transform,
            rendered_level: selected_level,
            running: true,
        };
        session.render(building, selected_level);
        info!(width = surface.width, height = surface.height, "mounted render session");
        session
    }

    /// Full rebuild of the building objects. Helpers are left alone.
    pub fn render(&mut self, building: &Building, selected_level: usize) -> RenderStats {
        self.rendered_level = selected_level;
        self.renderer.render(&mut self.scene, building, selected_level)
    }

    /// Re-renders only when `selected_level` differs from the last render.
    pub fn select_level(&mut self, building: &Building, selected_level: usize) -> Option<RenderStats> {
        if selected_level == self.rendered_level {
            return None;
        }
        Some(self.render(building, selected_level))
    }

    pub fn rendered_level(&self) -> usize {
        self.rendered_level
    }

    pub fn render_passes(&self) -> u64 {
        self.renderer.passes()
    }

    /// Empty sizes (a collapsed panel) are ignored; the last usable size stays.
    pub fn resize(&mut self, width: f64, height: f64) {
        let next = SurfaceSize::new(width, height);
        if next == self.surface {
            return;
        }
        if next.is_empty() {
            debug!(width, height, "ignoring empty render surface");
            return;
        }
        self.surface = next;
        self.camera.set_aspect(next.aspect());
        debug!(width, height, "resized render surface");
    }

    /// `None` once the session has stopped.
    pub fn frame(&self) -> Option<FrameSnapshot<'_>> {
        if !self.running {
            return None;
        }
        Some(FrameSnapshot {
            surface: self.surface,
            camera: &self.camera,
            objects: self.scene.objects(),
            transform: self.transform.get(),
        })
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.renderer.dispose(&mut self.scene);
        self.scene.clear();
        info!("stopped render session");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn bounds(&self) -> &SceneBounds {
        &self.bounds
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn transform(&self) -> &SharedTransform {
        &self.transform
    }

    pub fn set_grid_visible(&mut self, visible: bool) {
        if let Some(grid) = self.scene.grid_mut() {
            grid.visible = visible;
        }
    }

    pub fn grid_visible(&self) -> bool {
        self.scene.grid().is_some_and(|g| g.visible)
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        self.stop();
    }
}
