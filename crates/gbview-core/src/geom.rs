use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

/// Axis-aligned plan extent. `empty()` starts at `(+inf, -inf)` so folding
/// over zero points leaves a box that reports `is_empty()`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl BBox2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Vec2::new(f64::INFINITY, f64::INFINITY),
            max: Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points<I: IntoIterator<Item = Vec2>>(points: I) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.include_point(p);
        }
        bbox
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn include_point(&mut self, point: Vec2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            min: Vec2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vec2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Raw extent along x. Not clamped: an empty box yields `-inf`.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Raw extent along y. Not clamped: an empty box yields `-inf`.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn expand(&self, delta: f64) -> Self {
        Self {
            min: Vec2::new(self.min.x - delta, self.min.y - delta),
            max: Vec2::new(self.max.x + delta, self.max.y + delta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_stays_empty_under_union() {
        let b = BBox2::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 1.0));
        assert_eq!(b, BBox2::empty().union(&b));
        assert_eq!(b, b.union(&BBox2::empty()));
        assert!(BBox2::from_points(Vec::new()).is_empty());
    }

    #[test]
    fn expand_grows_every_side() {
        let b = BBox2::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 4.0)).expand(1.0);
        assert_eq!(Vec2::new(-1.0, -1.0), b.min);
        assert_eq!(Vec2::new(11.0, 5.0), b.max);
        assert_eq!(12.0, b.width());
        assert_eq!(6.0, b.height());
    }
}
