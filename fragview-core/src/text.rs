//! Text items anchored in 3D, drawn through an injected callback
use nalgebra::{Matrix4, Point2, Point3};
use std::fmt;

use crate::fragment::{Fragment, PathParams};
use crate::object::{Fragments, ObjectId};
use crate::paint::{PaintSurface, PathCallback, TextDraw};
use crate::transform::project;

/// Items anchored at pairs of 3D points. `pos1` and `pos2` are flat
/// `x, y, z, ...` sequences; the first point anchors an item and the second
/// gives its orientation.
pub struct Text {
    id: ObjectId,
    pub pos1: Vec<f64>,
    pub pos2: Vec<f64>,
    drawer: Box<dyn TextDraw>,
}

impl Text {
    pub fn new(pos1: Vec<f64>, pos2: Vec<f64>, drawer: impl TextDraw + 'static) -> Self {
        Self {
            id: ObjectId::next(),
            pos1,
            pos2,
            drawer: Box::new(drawer),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.pos1.len().min(self.pos2.len()) / 3
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Text")
            .field("id", &self.id)
            .field("items", &self.len())
            .finish()
    }
}

impl PathCallback for Text {
    fn call(
        &self,
        surface: &mut dyn PaintSurface,
        pt1: Point2<f64>,
        pt2: Point2<f64>,
        index: usize,
        scale: f64,
        line_scale: f64,
    ) {
        self.drawer.draw(surface, pt1, pt2, index, scale, line_scale);
    }
}

impl Fragments for Text {
    fn get_fragments<'a>(&'a self, outer: &Matrix4<f64>, out: &mut Vec<Fragment<'a>>) {
        let triplets = self.pos1.chunks_exact(3).zip(self.pos2.chunks_exact(3));
        for (index, (a, b)) in triplets.enumerate() {
            let p1 = project(outer, &Point3::new(a[0], a[1], a[2]));
            let p2 = project(outer, &Point3::new(b[0], b[1], b[2]));
            out.push(Fragment::path(self.id, PathParams::Callback(self), p1, p2, index));
        }
    }
}
