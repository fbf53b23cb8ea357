//! Single triangles, optionally culled when facing away from the viewer
use nalgebra::{Matrix4, Point3};

use crate::fragment::{Fragment, SurfaceProp};
use crate::geometry::face_normal;
use crate::object::{Fragments, ObjectId};
use crate::transform::{faces_viewer, project};

/// A filled triangle
#[derive(Debug, Clone)]
pub struct Triangle {
    id: ObjectId,
    pub points: [Point3<f64>; 3],
    pub surface: Option<SurfaceProp>,
}

impl Triangle {
    pub fn new(p0: Point3<f64>, p1: Point3<f64>, p2: Point3<f64>, surface: Option<SurfaceProp>) -> Self {
        Self {
            id: ObjectId::next(),
            points: [p0, p1, p2],
            surface,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }
}

impl Fragments for Triangle {
    // Points are not checked for finiteness here, unlike the line and mesh
    // generators.
    fn get_fragments<'a>(&'a self, outer: &Matrix4<f64>, out: &mut Vec<Fragment<'a>>) {
        let points = self.points.map(|p| project(outer, &p));
        out.push(Fragment::triangle(self.id, self.surface, points, 0));
    }
}

/// A triangle drawn only when its normal points toward the viewer.
///
/// The normal follows the winding of the points: `(p1 - p0) x (p2 - p0)`.
#[derive(Debug, Clone)]
pub struct TriangleFacing {
    pub triangle: Triangle,
}

impl TriangleFacing {
    pub fn new(p0: Point3<f64>, p1: Point3<f64>, p2: Point3<f64>, surface: Option<SurfaceProp>) -> Self {
        Self {
            triangle: Triangle::new(p0, p1, p2, surface),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.triangle.id()
    }
}

impl From<Triangle> for TriangleFacing {
    fn from(triangle: Triangle) -> Self {
        Self { triangle }
    }
}

impl Fragments for TriangleFacing {
    fn get_fragments<'a>(&'a self, outer: &Matrix4<f64>, out: &mut Vec<Fragment<'a>>) {
        let [p0, p1, p2] = &self.triangle.points;
        if faces_viewer(outer, &face_normal(p0, p1, p2)) {
            self.triangle.get_fragments(outer, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::FragmentKind;
    use crate::transform::Transform;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Some(SurfaceProp(7)),
        )
    }

    #[test]
    fn test_identity_keeps_points() {
        let tri = unit_triangle();
        let mut out = Vec::new();
        tri.get_fragments(&Matrix4::identity(), &mut out);

        assert_eq!(out.len(), 1);
        let frag = &out[0];
        assert_eq!(frag.kind, FragmentKind::Triangle);
        assert_eq!(frag.points, tri.points);
        assert_eq!(frag.surface, Some(SurfaceProp(7)));
        assert_eq!(frag.line, None);
        assert_eq!(frag.owner, tri.id());
    }

    #[test]
    fn test_non_finite_points_still_emitted() {
        let tri = Triangle::new(
            Point3::new(f64::NAN, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            None,
        );
        let mut out = Vec::new();
        tri.get_fragments(&Matrix4::identity(), &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_facing_toggles_with_depth_sign() {
        let facing = TriangleFacing::from(unit_triangle());

        let mut front = Vec::new();
        facing.get_fragments(&Matrix4::identity(), &mut front);
        assert_eq!(front.len(), 1);
        assert_eq!(front[0].owner, facing.id());

        let mut back = Vec::new();
        facing.get_fragments(&Transform::scale_matrix(1.0, 1.0, -1.0), &mut back);
        assert!(back.is_empty());
    }
}
