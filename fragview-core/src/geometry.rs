//! Geometry primitives shared by the fragment generators
use nalgebra::{Point2, Point3, Vector3, Vector4};

/// Finiteness predicate over every component of a vector-like value.
///
/// Any NaN or infinite component marks the value as unusable; generators use
/// this as their "no data here" signal.
pub trait Finite {
    fn all_finite(&self) -> bool;
}

impl Finite for Point3<f64> {
    fn all_finite(&self) -> bool {
        self.iter().all(|c| c.is_finite())
    }
}

impl Finite for Point2<f64> {
    fn all_finite(&self) -> bool {
        self.iter().all(|c| c.is_finite())
    }
}

impl Finite for Vector3<f64> {
    fn all_finite(&self) -> bool {
        self.iter().all(|c| c.is_finite())
    }
}

impl Finite for Vector4<f64> {
    fn all_finite(&self) -> bool {
        self.iter().all(|c| c.is_finite())
    }
}

/// Sum of two points as a single finiteness proxy: NaN and infinities
/// propagate through addition, so this is finite only if both are.
pub fn pair_finite(a: &Point3<f64>, b: &Point3<f64>) -> bool {
    (a.coords + b.coords).all_finite()
}

/// Drop the depth component of a projected point.
pub fn to_2d(p: &Point3<f64>) -> Point2<f64> {
    Point2::new(p.x, p.y)
}

/// Unnormalized face normal of the triangle `p0, p1, p2`
pub fn face_normal(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Vector3<f64> {
    (p1 - p0).cross(&(p2 - p0))
}

/// Twice the signed area of `a, b, c`; positive when counter-clockwise.
fn orientation(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Do the segments `p1-p2` and `q1-q2` properly cross in 2D?
///
/// Both segments must straddle each other's supporting line. Segments that
/// only touch at an endpoint, collinear overlaps and non-finite input do not
/// count as crossing.
pub fn segments_cross(p1: &Point2<f64>, p2: &Point2<f64>, q1: &Point2<f64>, q2: &Point2<f64>) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

/// Average of the finite members of `vals`.
///
/// With no finite members this is `0/0`, i.e. NaN, which suppresses any
/// geometry built from it further down.
pub fn finite_mean(vals: &[f64]) -> f64 {
    let (total, count) = vals
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0u32), |(t, c), v| (t + v, c + 1));
    total / f64::from(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_predicates() {
        assert!(Point3::new(1.0, 2.0, 3.0).all_finite());
        assert!(!Point3::new(1.0, f64::NAN, 3.0).all_finite());
        assert!(!Vector4::new(0.0, 0.0, f64::INFINITY, 1.0).all_finite());
        assert!(!pair_finite(&Point3::origin(), &Point3::new(0.0, 0.0, f64::NEG_INFINITY)));
        assert!(pair_finite(&Point3::origin(), &Point3::new(4.0, 5.0, 6.0)));
    }

    #[test]
    fn test_segments_cross() {
        let p = |x, y| Point2::new(x, y);
        assert!(segments_cross(&p(0.0, 0.0), &p(2.0, 2.0), &p(0.0, 2.0), &p(2.0, 0.0)));
        assert!(!segments_cross(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0), &p(1.0, 1.0)));
        // touching at an endpoint
        assert!(!segments_cross(&p(0.0, 0.0), &p(1.0, 1.0), &p(1.0, 1.0), &p(2.0, 0.0)));
        // collinear overlap
        assert!(!segments_cross(&p(0.0, 0.0), &p(2.0, 0.0), &p(1.0, 0.0), &p(3.0, 0.0)));
        assert!(!segments_cross(&p(f64::NAN, 0.0), &p(2.0, 2.0), &p(0.0, 2.0), &p(2.0, 0.0)));
    }

    #[test]
    fn test_finite_mean() {
        assert_eq!(finite_mean(&[1.0, 3.0]), 2.0);
        assert_eq!(finite_mean(&[1.0, f64::NAN, 5.0, f64::INFINITY]), 3.0);
        assert!(finite_mean(&[f64::NAN, f64::NAN]).is_nan());
    }

    #[test]
    fn test_face_normal() {
        let n = face_normal(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(n, Vector3::new(0.0, 0.0, 1.0));
    }
}
