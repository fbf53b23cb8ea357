//! Grouping of objects under a shared local transform
use nalgebra::{Matrix4, Vector3};

use crate::fragment::Fragment;
use crate::object::{Fragments, Object, ObjectId};
use crate::transform::faces_viewer;

/// Children drawn under `outer * transform`
#[derive(Debug)]
pub struct ObjectContainer {
    id: ObjectId,
    pub transform: Matrix4<f64>,
    pub objects: Vec<Object>,
}

impl ObjectContainer {
    pub fn new(transform: Matrix4<f64>) -> Self {
        Self {
            id: ObjectId::next(),
            transform,
            objects: Vec::new(),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn add_object(&mut self, object: impl Into<Object>) {
        self.objects.push(object.into());
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for ObjectContainer {
    fn default() -> Self {
        Self::new(Matrix4::identity())
    }
}

impl Fragments for ObjectContainer {
    fn get_fragments<'a>(&'a self, outer: &Matrix4<f64>, out: &mut Vec<Fragment<'a>>) {
        let total = outer * self.transform;
        for object in &self.objects {
            object.get_fragments(&total, out);
        }
    }
}

/// A container drawn only while `normal` points toward the viewer, e.g. one
/// face of a bounding box. The test uses the outer transform, not the
/// container's own.
#[derive(Debug)]
pub struct FacingContainer {
    pub container: ObjectContainer,
    pub normal: Vector3<f64>,
}

impl FacingContainer {
    pub fn new(normal: Vector3<f64>, transform: Matrix4<f64>) -> Self {
        Self {
            container: ObjectContainer::new(transform),
            normal,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.container.id()
    }

    pub fn add_object(&mut self, object: impl Into<Object>) {
        self.container.add_object(object);
    }
}

impl Fragments for FacingContainer {
    fn get_fragments<'a>(&'a self, outer: &Matrix4<f64>, out: &mut Vec<Fragment<'a>>) {
        if faces_viewer(outer, &self.normal) {
            self.container.get_fragments(outer, out);
        }
    }
}
