//! Render-only placement of the whole building.
//!
//! The offset is not part of the model. One [`SharedTransform`] cell is handed
//! to every writer (numeric fields, the drag widget) so they all observe and
//! update the same value; the last write wins.

use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Translation, Euler rotation (radians, XYZ order) and per-axis scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformOffset {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for TransformOffset {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl TransformOffset {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformCommand {
    Set(TransformOffset),
    Translate(Vec3),
    Rotate(Vec3),
    /// Multiplies the current scale per axis.
    Scale(Vec3),
    Reset,
}

impl TransformCommand {
    pub fn apply_to(self, t: TransformOffset) -> TransformOffset {
        match self {
            Self::Set(next) => next,
            Self::Translate(d) => TransformOffset {
                position: Vec3::new(t.position.x + d.x, t.position.y + d.y, t.position.z + d.z),
                ..t
            },
            Self::Rotate(d) => TransformOffset {
                rotation: Vec3::new(t.rotation.x + d.x, t.rotation.y + d.y, t.rotation.z + d.z),
                ..t
            },
            Self::Scale(f) => TransformOffset {
                scale: Vec3::new(t.scale.x * f.x, t.scale.y * f.y, t.scale.z * f.z),
                ..t
            },
            Self::Reset => TransformOffset::default(),
        }
    }
}

#[derive(Debug, Default)]
struct TransformState {
    offset: TransformOffset,
    revision: u64,
}

/// Cloneable handle; every clone refers to the same cell.
#[derive(Debug, Clone, Default)]
pub struct SharedTransform {
    state: Rc<RefCell<TransformState>>,
    dragging: Rc<Cell<bool>>,
}

impl SharedTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> TransformOffset {
        self.state.borrow().offset
    }

    /// Bumped on every write; lets readers detect changes cheaply.
    pub fn revision(&self) -> u64 {
        self.state.borrow().revision
    }

    pub fn apply(&self, cmd: TransformCommand) -> TransformOffset {
        let mut state = self.state.borrow_mut();
        state.offset = cmd.apply_to(state.offset);
        state.revision += 1;
        state.offset
    }

    pub fn set(&self, offset: TransformOffset) {
        self.apply(TransformCommand::Set(offset));
    }

    /// True while the manipulation widget holds a drag.
    pub fn is_dragging(&self) -> bool {
        self.dragging.get()
    }

    pub fn set_dragging(&self, dragging: bool) {
        self.dragging.set(dragging);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_cell() {
        let fields = SharedTransform::new();
        let gizmo = fields.clone();

        fields.apply(TransformCommand::Translate(Vec3::new(1.0, 0.0, 0.0)));
        gizmo.apply(TransformCommand::Translate(Vec3::new(0.0, 2.0, 0.0)));

        assert_eq!(Vec3::new(1.0, 2.0, 0.0), fields.get().position);
        assert_eq!(fields.get(), gizmo.get());
        assert_eq!(2, gizmo.revision());
    }

    #[test]
    fn scale_multiplies_and_reset_restores_identity() {
        let t = SharedTransform::new();
        t.apply(TransformCommand::Scale(Vec3::new(2.0, 2.0, 0.5)));
        t.apply(TransformCommand::Scale(Vec3::new(2.0, 1.0, 1.0)));
        assert_eq!(Vec3::new(4.0, 2.0, 0.5), t.get().scale);

        t.apply(TransformCommand::Reset);
        assert!(t.get().is_identity());
    }

    #[test]
    fn last_write_wins() {
        let t = SharedTransform::new();
        let mut typed = TransformOffset::default();
        typed.position.x = 5.0;
        t.apply(TransformCommand::Rotate(Vec3::new(0.0, 1.0, 0.0)));
        t.set(typed);
        assert_eq!(typed, t.get());
    }
}
