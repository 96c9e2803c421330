//! Cap triangulation for simple polygons (no holes).

use crate::error::{GeometryError, Result};
use gbview_core::geom::Vec2;

/// Twice the signed area; positive for counter-clockwise loops.
pub fn signed_area2(points: &[Vec2]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum()
}

/// Triangle indices into `points`, each triangle counter-clockwise.
pub fn triangulate_polygon(points: &[Vec2]) -> Result<Vec<[usize; 3]>> {
    let n = points.len();
    if n < 3 {
        return Err(GeometryError::TooFewVertices(n));
    }

    let flat = if n == 3 {
        vec![0, 1, 2]
    } else {
        let mut coords = Vec::with_capacity(n * 2);
        for p in points {
            coords.push(p.x);
            coords.push(p.y);
        }
        earcutr::earcut(&coords, &[], 2).map_err(|e| GeometryError::Triangulation(format!("{e:?}")))?
    };

    let triangles = flat
        .chunks_exact(3)
        .map(|t| {
            let [a, b, c] = [t[0], t[1], t[2]];
            if signed_area2(&[points[a], points[b], points[c]]) < 0.0 {
                [a, c, b]
            } else {
                [a, b, c]
            }
        })
        .collect();
    Ok(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concave_l_shape_needs_four_triangles() {
        let l = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let tris = triangulate_polygon(&l).expect("simple polygon");
        assert_eq!(4, tris.len());
        let area: f64 = tris
            .iter()
            .map(|t| signed_area2(&[l[t[0]], l[t[1]], l[t[2]]]) * 0.5)
            .sum();
        assert!((area - 3.0).abs() < 1e-9);
    }

    #[test]
    fn clockwise_input_still_yields_ccw_triangles() {
        let cw = [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
        ];
        assert!(signed_area2(&cw) < 0.0);
        for t in triangulate_polygon(&cw).expect("square") {
            assert!(signed_area2(&[cw[t[0]], cw[t[1]], cw[t[2]]]) > 0.0);
        }
    }

    #[test]
    fn rejects_two_points() {
        let err = triangulate_polygon(&[Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)]).unwrap_err();
        assert_eq!(GeometryError::TooFewVertices(2), err);
    }
}
