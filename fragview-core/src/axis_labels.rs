//! Tick labels for one axis of a bounding box
//!
//! An axis can usually be drawn along any of several parallel box edges.
//! Each edge is registered as a candidate; on every pass the candidate whose
//! screen projection stays clear of the box faces is chosen, preferring ones
//! to the left, below and in front of the box centre.
use nalgebra::{Matrix4, Point2, Point3, Vector3};
use std::fmt;

use crate::fragment::{Fragment, PathParams};
use crate::geometry::{segments_cross, to_2d};
use crate::object::{Fragments, ObjectId};
use crate::paint::{LabelDraw, PaintSurface, PathCallback, SurfaceGuard};
use crate::transform::project;

// Corners of the box are indexed i2 + i1*2 + i0*4, with i0/i1/i2 picking
// box1 or box2 for x/y/z.
const BOX_FACES: [[usize; 4]; 6] = [
    [0, 1, 3, 2], // x == 0
    [4, 5, 7, 6], // x == 1
    [0, 1, 5, 4], // y == 0
    [2, 3, 7, 6], // y == 1
    [0, 4, 6, 2], // z == 0
    [1, 5, 7, 3], // z == 1
];

// Offset along the axis giving each tick its local direction
const TANGENT_EPS: f64 = 1e-3;

pub struct AxisTickLabels {
    id: ObjectId,
    pub box1: Point3<f64>,
    pub box2: Point3<f64>,
    /// Tick positions as fractions of the axis length
    pub tick_fracs: Vec<f64>,
    starts: Vec<Point3<f64>>,
    ends: Vec<Point3<f64>>,
    labeller: Box<dyn LabelDraw>,
}

impl AxisTickLabels {
    pub fn new(
        box1: Point3<f64>,
        box2: Point3<f64>,
        tick_fracs: Vec<f64>,
        labeller: impl LabelDraw + 'static,
    ) -> Self {
        Self {
            id: ObjectId::next(),
            box1,
            box2,
            tick_fracs,
            starts: Vec::new(),
            ends: Vec::new(),
            labeller: Box::new(labeller),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Register one possible placement of the axis.
    pub fn add_axis_choice(&mut self, start: Point3<f64>, end: Point3<f64>) {
        self.starts.push(start);
        self.ends.push(end);
    }

    pub fn choices(&self) -> usize {
        self.starts.len().min(self.ends.len())
    }

    fn box_corners(&self, outer: &Matrix4<f64>) -> [Point3<f64>; 8] {
        let bounds = [self.box1, self.box2];
        std::array::from_fn(|i| {
            let (i0, i1, i2) = (i / 4, (i / 2) % 2, i % 2);
            project(outer, &Point3::new(bounds[i0].x, bounds[i1].y, bounds[i2].z))
        })
    }

    fn overlaps_face(line: &[Point2<f64>; 2], face: &[Point2<f64>; 4]) -> bool {
        (0..4).any(|edge| segments_cross(&line[0], &line[1], &face[edge], &face[(edge + 1) % 4]))
    }

    /// Index of the candidate the labels are drawn along, or `None` without
    /// candidates.
    pub fn choose_axis(&self, outer: &Matrix4<f64>) -> Option<usize> {
        let count = self.choices();
        if count == 0 {
            return None;
        }

        let corners = self.box_corners(outer);
        let faces: Vec<[Point2<f64>; 4]> = BOX_FACES
            .iter()
            .map(|face| face.map(|c| to_2d(&corners[c])))
            .collect();

        let starts: Vec<Point3<f64>> = self.starts[..count].iter().map(|p| project(outer, p)).collect();
        let ends: Vec<Point3<f64>> = self.ends[..count].iter().map(|p| project(outer, p)).collect();

        let mut choices: Vec<usize> = (0..count)
            .filter(|&axis| {
                let line = [to_2d(&starts[axis]), to_2d(&ends[axis])];
                !faces.iter().any(|face| Self::overlaps_face(&line, face))
            })
            .collect();
        if choices.is_empty() {
            choices = (0..count).collect();
        }

        let centre = corners.iter().fold(Vector3::<f64>::zeros(), |acc, c| acc + c.coords) / 8.0;

        // left, then below (screen y grows down), then in front
        let mut best_score = -1;
        let mut best_axis = 0;
        for &axis in &choices {
            let mid = (starts[axis].coords + ends[axis].coords) * 0.5;
            let score = i32::from(mid.x <= centre.x) * 10
                + i32::from(mid.y > centre.y) * 11
                + i32::from(mid.z > centre.z) * 12;
            if score > best_score {
                best_score = score;
                best_axis = axis;
            }
        }
        Some(best_axis)
    }
}

impl fmt::Debug for AxisTickLabels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxisTickLabels")
            .field("id", &self.id)
            .field("box1", &self.box1)
            .field("box2", &self.box2)
            .field("tick_fracs", &self.tick_fracs)
            .field("choices", &self.choices())
            .finish()
    }
}

impl PathCallback for AxisTickLabels {
    fn call(
        &self,
        surface: &mut dyn PaintSurface,
        pt1: Point2<f64>,
        _pt2: Point2<f64>,
        index: usize,
        _scale: f64,
        _line_scale: f64,
    ) {
        let mut guard = SurfaceGuard::new(surface);
        guard.translate(pt1.coords);
        self.labeller.draw_label(&mut *guard, index, 0, 0);
    }
}

impl Fragments for AxisTickLabels {
    fn get_fragments<'a>(&'a self, outer: &Matrix4<f64>, out: &mut Vec<Fragment<'a>>) {
        let Some(axis) = self.choose_axis(outer) else {
            return;
        };
        log::debug!("axis labels {:?}: drawing along choice {axis} of {}", self.id, self.choices());

        let start = self.starts[axis];
        let delta = self.ends[axis] - start;
        for (index, &frac) in self.tick_fracs.iter().enumerate() {
            let p1 = project(outer, &(start + delta * frac));
            let p2 = project(outer, &(start + delta * (frac + TANGENT_EPS)));
            out.push(Fragment::path(self.id, PathParams::Callback(self), p1, p2, index));
        }
    }
}
