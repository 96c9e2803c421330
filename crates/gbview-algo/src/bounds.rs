use gbview_core::model::Building;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Overall extent in the building frame: plan x/y, elevation z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneBounds {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
    pub center: Point3<f64>,
    pub size: Vector3<f64>,
}

impl SceneBounds {
    pub fn max_dimension(&self) -> f64 {
        self.size.x.max(self.size.y).max(self.size.z)
    }
}

/// Union of every level's point table, stacked to the sum of level heights.
/// A building without points yields non-finite x/y.
pub fn compute_bounds(building: &Building) -> SceneBounds {
    let plan = building.plan_extents();
    let min = Point3::new(plan.min.x, plan.min.y, 0.0);
    let max = Point3::new(plan.max.x, plan.max.y, building.total_height());
    SceneBounds {
        min,
        max,
        center: nalgebra::center(&min, &max),
        size: max - min,
    }
}
