//! Circle geometry shared by collision, culling and hit testing

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Circular approximation of the area an entity occupies
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingCircle {
    pub center: DVec2,
    pub radius: f64,
}

impl BoundingCircle {
    pub const fn new(center: DVec2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Zero-radius circle at `point`, used for hit testing
    pub const fn point(point: DVec2) -> Self {
        Self::new(point, 0.0)
    }

    /// True if `other` overlaps this circle (touching counts)
    #[inline]
    pub fn overlaps(&self, other: &BoundingCircle) -> bool {
        circles_overlap(self, other)
    }
}

/// Visible area, in the same units as entity coordinates
///
/// The origin is the top-left corner; supplied fresh every frame since the
/// canvas can be resized at any time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Extent along an axis (0 = x, 1 = y)
    #[inline]
    pub fn dim(&self, axis: usize) -> f64 {
        if axis == 0 { self.width } else { self.height }
    }
}

/// Euclidean length of a vector
#[inline]
pub fn norm(v: DVec2) -> f64 {
    (v.x * v.x + v.y * v.y).sqrt()
}

/// True iff the distance between centers is at most the sum of radii
#[inline]
pub fn circles_overlap(a: &BoundingCircle, b: &BoundingCircle) -> bool {
    norm(b.center - a.center) <= a.radius + b.radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_norm() {
        assert_eq!(norm(DVec2::new(3.0, 4.0)), 5.0);
        assert_eq!(norm(DVec2::ZERO), 0.0);
        assert_eq!(norm(DVec2::new(-6.0, 8.0)), 10.0);
    }

    #[test]
    fn test_touching_circles_overlap() {
        let a = BoundingCircle::new(DVec2::new(0.0, 0.0), 20.0);
        let b = BoundingCircle::new(DVec2::new(40.0, 0.0), 20.0);
        assert!(circles_overlap(&a, &b));

        let c = BoundingCircle::new(DVec2::new(50.0, 0.0), 20.0);
        assert!(!circles_overlap(&a, &c));
    }

    #[test]
    fn test_point_inside_circle() {
        let c = BoundingCircle::new(DVec2::new(100.0, 100.0), 10.0);
        assert!(c.overlaps(&BoundingCircle::point(DVec2::new(105.0, 100.0))));
        assert!(c.overlaps(&BoundingCircle::point(DVec2::new(110.0, 100.0))));
        assert!(!c.overlaps(&BoundingCircle::point(DVec2::new(111.0, 100.0))));
    }

    fn circle() -> impl Strategy<Value = BoundingCircle> {
        (-1000.0..1000.0f64, -1000.0..1000.0f64, 0.0..200.0f64)
            .prop_map(|(x, y, r)| BoundingCircle::new(DVec2::new(x, y), r))
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in circle(), b in circle()) {
            prop_assert_eq!(circles_overlap(&a, &b), circles_overlap(&b, &a));
        }

        #[test]
        fn circle_overlaps_itself(a in circle()) {
            prop_assert!(circles_overlap(&a, &a));
        }

        #[test]
        fn touching_on_an_axis_overlaps(x in -500.0..500.0f64, ra in 0.0..100.0f64, rb in 0.0..100.0f64) {
            // Integer-valued offsets keep the distance exact
            let (x, ra, rb) = (x.round(), ra.round(), rb.round());
            let a = BoundingCircle::new(DVec2::new(x, 0.0), ra);
            let b = BoundingCircle::new(DVec2::new(x + ra + rb, 0.0), rb);
            prop_assert!(circles_overlap(&a, &b));
        }
    }
}
