//! The scene object tree
use nalgebra::Matrix4;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::axis_labels::AxisTickLabels;
use crate::container::{FacingContainer, ObjectContainer};
use crate::data_mesh::DataMesh;
use crate::fragment::Fragment;
use crate::lines::{LineSegments, PolyLine};
use crate::mesh::Mesh;
use crate::points::Points;
use crate::text::Text;
use crate::triangle::{Triangle, TriangleFacing};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of the object that emitted a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    /// A process-unique id
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Anything that can describe itself as camera-space fragments.
///
/// Implementations only append to `out`, in a deterministic order, and never
/// mutate the object. `outer` maps the object's local coordinates into scene
/// space.
pub trait Fragments {
    fn get_fragments<'a>(&'a self, outer: &Matrix4<f64>, out: &mut Vec<Fragment<'a>>);
}

#[derive(Debug)]
pub enum Object {
    Triangle(Triangle),
    TriangleFacing(TriangleFacing),
    PolyLine(PolyLine),
    LineSegments(LineSegments),
    Mesh(Mesh),
    DataMesh(DataMesh),
    Points(Points),
    Text(Text),
    AxisTickLabels(AxisTickLabels),
    Container(ObjectContainer),
    FacingContainer(FacingContainer),
}

impl Object {
    pub fn id(&self) -> ObjectId {
        match self {
            Object::Triangle(o) => o.id(),
            Object::TriangleFacing(o) => o.id(),
            Object::PolyLine(o) => o.id(),
            Object::LineSegments(o) => o.id(),
            Object::Mesh(o) => o.id(),
            Object::DataMesh(o) => o.id(),
            Object::Points(o) => o.id(),
            Object::Text(o) => o.id(),
            Object::AxisTickLabels(o) => o.id(),
            Object::Container(o) => o.id(),
            Object::FacingContainer(o) => o.id(),
        }
    }

    /// Fragments of this object under `outer`, in a fresh vector
    pub fn fragments(&self, outer: &Matrix4<f64>) -> Vec<Fragment<'_>> {
        let mut out = Vec::new();
        self.get_fragments(outer, &mut out);
        out
    }
}

impl Fragments for Object {
    fn get_fragments<'a>(&'a self, outer: &Matrix4<f64>, out: &mut Vec<Fragment<'a>>) {
        match self {
            Object::Triangle(o) => o.get_fragments(outer, out),
            Object::TriangleFacing(o) => o.get_fragments(outer, out),
            Object::PolyLine(o) => o.get_fragments(outer, out),
            Object::LineSegments(o) => o.get_fragments(outer, out),
            Object::Mesh(o) => o.get_fragments(outer, out),
            Object::DataMesh(o) => o.get_fragments(outer, out),
            Object::Points(o) => o.get_fragments(outer, out),
            Object::Text(o) => o.get_fragments(outer, out),
            Object::AxisTickLabels(o) => o.get_fragments(outer, out),
            Object::Container(o) => o.get_fragments(outer, out),
            Object::FacingContainer(o) => o.get_fragments(outer, out),
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Object {
                fn from(value: $ty) -> Self {
                    Object::$variant(value)
                }
            }
        )*
    };
}

impl_from_variant! {
    Triangle => Triangle,
    TriangleFacing => TriangleFacing,
    PolyLine => PolyLine,
    LineSegments => LineSegments,
    Mesh => Mesh,
    DataMesh => DataMesh,
    Points => Points,
    Text => Text,
    AxisTickLabels => AxisTickLabels,
    Container => ObjectContainer,
    FacingContainer => FacingContainer,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{FragmentKind, LineProp, SurfaceProp};
    use crate::mesh::HeightAxis;
    use crate::paint::MarkerPath;
    use crate::transform::{RotationState, Transform};
    use nalgebra::Point3;

    fn scene() -> ObjectContainer {
        let mut root = ObjectContainer::default();
        root.add_object(Triangle::new(
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Some(SurfaceProp(1)),
        ));
        root.add_object(Mesh::new(
            vec![0.0, 1.0, 2.0],
            vec![0.0, 1.0],
            vec![0.0, 0.5, 1.0, 1.5, 2.0, 2.5],
            HeightAxis::Z,
            Some(LineProp(2)),
            Some(SurfaceProp(3)),
        ));
        root.add_object(Points::new(
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![0.5, 0.5],
            MarkerPath::square(),
            None,
            Some(LineProp(4)),
        ));
        root
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ObjectId::next();
        let b = ObjectId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_generation_is_repeatable() {
        let root = Object::from(scene());
        let m = Transform::rotation_matrix(&RotationState::new(0.3, 0.2, 0.1));
        let first = root.fragments(&m);
        let second = root.fragments(&m);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_output_is_appended_in_child_order() {
        let root = scene();
        let ids: Vec<ObjectId> = root.objects.iter().map(Object::id).collect();

        let mut out = Vec::new();
        out.push(Fragment::segment(ObjectId::next(), None, Point3::origin(), Point3::origin(), 0));
        root.get_fragments(&Matrix4::identity(), &mut out);

        // pre-existing entry untouched
        assert_eq!(out[0].kind, FragmentKind::LineSegment);
        assert!(!ids.contains(&out[0].owner));

        let owners: Vec<ObjectId> = out[1..].iter().map(|f| f.owner).collect();
        let mut seen: Vec<ObjectId> = owners.clone();
        seen.dedup();
        assert_eq!(seen, ids);
        // triangle, 3 + 4 mesh lines, 4 mesh triangles, 2 markers
        assert_eq!(owners.len(), 1 + 7 + 4 + 2);
    }
}
