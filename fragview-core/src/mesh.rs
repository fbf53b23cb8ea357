//! Height-field meshes over regular grids
use nalgebra::{Matrix4, Point3};

use crate::error::GeometryError;
use crate::fragment::{Fragment, LineProp, SurfaceProp};
use crate::geometry::{pair_finite, Finite};
use crate::object::{Fragments, ObjectId};
use crate::transform::project;

/// Which coordinate the mesh heights are plotted along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightAxis {
    X,
    Y,
    Z,
}

impl HeightAxis {
    /// Coordinate slots for (height, pos1, pos2)
    pub fn slots(self) -> (usize, usize, usize) {
        match self {
            HeightAxis::X => (0, 1, 2),
            HeightAxis::Y => (1, 2, 0),
            HeightAxis::Z => (2, 0, 1),
        }
    }
}

// Two complementary cell triangulations, alternated per cell to make a
// symmetric diamond pattern. Corner i sits at (i1 + i % 2, i2 + i / 2).
const CELL_TRIANGLES: [[[usize; 3]; 2]; 2] = [[[0, 1, 2], [3, 1, 2]], [[1, 0, 3], [2, 0, 3]]];

/// A surface and/or wireframe over a grid of `pos1` x `pos2`, with
/// `heights[i1 * n2 + i2]` giving the height at `(pos1[i1], pos2[i2])`
#[derive(Debug, Clone)]
pub struct Mesh {
    id: ObjectId,
    pub pos1: Vec<f64>,
    pub pos2: Vec<f64>,
    pub heights: Vec<f64>,
    pub axis: HeightAxis,
    pub line: Option<LineProp>,
    pub surface: Option<SurfaceProp>,
}

impl Mesh {
    pub fn new(
        pos1: Vec<f64>,
        pos2: Vec<f64>,
        heights: Vec<f64>,
        axis: HeightAxis,
        line: Option<LineProp>,
        surface: Option<SurfaceProp>,
    ) -> Self {
        Self {
            id: ObjectId::next(),
            pos1,
            pos2,
            heights,
            axis,
            line,
            surface,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        let (n1, n2) = (self.pos1.len(), self.pos2.len());
        if self.heights.len() < n1 * n2 {
            return Err(GeometryError::HeightsSize {
                heights: self.heights.len(),
                n1,
                n2,
            });
        }
        Ok(())
    }

    fn grid_point(&self, height: f64, p1: f64, p2: f64) -> Point3<f64> {
        let (vh, v1, v2) = self.axis.slots();
        let mut pt = Point3::origin();
        pt[vh] = height;
        pt[v1] = p1;
        pt[v2] = p2;
        pt
    }

    /// Wireframe: lines of constant pos2 walking pos1, then lines of constant
    /// pos1 walking pos2. The index counts every grid point visited.
    pub fn line_fragments<'a>(&'a self, outer: &Matrix4<f64>, out: &mut Vec<Fragment<'a>>) {
        if self.line.is_none() {
            return;
        }

        let n2 = self.pos2.len();
        let mut index = 0;

        for step_first in [true, false] {
            let (steps, consts) = if step_first {
                (&self.pos1, &self.pos2)
            } else {
                (&self.pos2, &self.pos1)
            };

            for (ci, &c) in consts.iter().enumerate() {
                let mut previous: Option<Point3<f64>> = None;
                for (si, &s) in steps.iter().enumerate() {
                    let (height, p1, p2) = if step_first {
                        (self.heights[si * n2 + ci], s, c)
                    } else {
                        (self.heights[ci * n2 + si], c, s)
                    };
                    let current = project(outer, &self.grid_point(height, p1, p2));

                    if let Some(prev) = previous {
                        if pair_finite(&current, &prev) {
                            out.push(Fragment::segment(self.id, self.line, current, prev, index));
                        }
                    }
                    previous = Some(current);
                    index += 1;
                }
            }
        }
    }

    /// Two triangles per grid cell. The index counts cells.
    pub fn surface_fragments<'a>(&'a self, outer: &Matrix4<f64>, out: &mut Vec<Fragment<'a>>) {
        if self.surface.is_none() {
            return;
        }

        let (n1, n2) = (self.pos1.len(), self.pos2.len());
        let mut index = 0;

        for i1 in 0..n1.saturating_sub(1) {
            for i2 in 0..n2.saturating_sub(1) {
                let corners: [Point3<f64>; 4] = std::array::from_fn(|i| {
                    let (j1, j2) = (i1 + i % 2, i2 + i / 2);
                    self.grid_point(self.heights[j1 * n2 + j2], self.pos1[j1], self.pos2[j2])
                });
                let projected = corners.map(|c| project(outer, &c));

                for tri in &CELL_TRIANGLES[(i1 + i2) % 2] {
                    // finiteness of the source corners, before projection
                    let sum = corners[tri[0]].coords + corners[tri[1]].coords + corners[tri[2]].coords;
                    if sum.all_finite() {
                        let points = [projected[tri[0]], projected[tri[1]], projected[tri[2]]];
                        out.push(Fragment::triangle(self.id, self.surface, points, index));
                    }
                }
                index += 1;
            }
        }
    }
}

/// Evaluate `f` on a `steps x steps` grid spanning `range1 x range2`.
///
/// Returns `(pos1, pos2, heights)` laid out for [`Mesh::new`]. Fewer than two
/// steps give a single sample at the start of each range.
pub fn sample_grid(
    f: impl Fn(f64, f64) -> f64,
    range1: (f64, f64),
    range2: (f64, f64),
    steps: usize,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let axis = |(lo, hi): (f64, f64)| -> Vec<f64> {
        if steps < 2 {
            return vec![lo; steps];
        }
        let step = (hi - lo) / (steps - 1) as f64;
        (0..steps).map(|i| lo + step * i as f64).collect()
    };
    let pos1 = axis(range1);
    let pos2 = axis(range2);
    let heights = pos1
        .iter()
        .flat_map(|&a| pos2.iter().map(move |&b| (a, b)))
        .map(|(a, b)| f(a, b))
        .collect();
    (pos1, pos2, heights)
}

impl Fragments for Mesh {
    fn get_fragments<'a>(&'a self, outer: &Matrix4<f64>, out: &mut Vec<Fragment<'a>>) {
        if let Err(err) = self.validate() {
            log::error!("{err}");
            return;
        }
        self.line_fragments(outer, out);
        self.surface_fragments(outer, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::FragmentKind;

    fn grid(n1: usize, n2: usize, line: Option<LineProp>, surface: Option<SurfaceProp>) -> Mesh {
        let pos1: Vec<f64> = (0..n1).map(|i| i as f64).collect();
        let pos2: Vec<f64> = (0..n2).map(|i| i as f64 * 0.5).collect();
        let heights = (0..n1 * n2).map(|i| (i as f64).sin()).collect();
        Mesh::new(pos1, pos2, heights, HeightAxis::Z, line, surface)
    }

    fn count(out: &[Fragment<'_>], kind: FragmentKind) -> usize {
        out.iter().filter(|f| f.kind == kind).count()
    }

    #[test]
    fn test_surface_count() {
        let mesh = grid(4, 5, None, Some(SurfaceProp(1)));
        let mut out = Vec::new();
        mesh.get_fragments(&Matrix4::identity(), &mut out);
        assert_eq!(out.len(), 2 * 3 * 4);
        assert_eq!(count(&out, FragmentKind::Triangle), 24);
        // one index per cell, shared by its two triangles
        assert_eq!(out[0].index, 0);
        assert_eq!(out[1].index, 0);
        assert_eq!(out[23].index, 11);
    }

    #[test]
    fn test_no_styles_no_fragments() {
        let mesh = grid(4, 5, None, None);
        let mut out = Vec::new();
        mesh.get_fragments(&Matrix4::identity(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_wireframe_count_and_order() {
        let mesh = grid(3, 4, Some(LineProp(2)), Some(SurfaceProp(1)));
        let mut out = Vec::new();
        mesh.get_fragments(&Matrix4::identity(), &mut out);

        // 4 lines of 3 points, then 3 lines of 4 points
        let lines = 4 * 2 + 3 * 3;
        assert_eq!(count(&out, FragmentKind::LineSegment), lines);
        assert!(out[..lines].iter().all(|f| f.kind == FragmentKind::LineSegment));
        assert_eq!(count(&out, FragmentKind::Triangle), 2 * 2 * 3);

        // the index counts points visited, so the first segment of each
        // line skips the line's first point
        assert_eq!(out[0].index, 1);
        assert_eq!(out[1].index, 2);
        assert_eq!(out[2].index, 4);
    }

    #[test]
    fn test_nan_height_holes() {
        let mut mesh = grid(3, 3, Some(LineProp(2)), Some(SurfaceProp(1)));
        // centre point
        mesh.heights[4] = f64::NAN;
        let mut out = Vec::new();
        mesh.get_fragments(&Matrix4::identity(), &mut out);

        // every cell touches the centre; each cell keeps the one triangle
        // avoiding it
        assert_eq!(count(&out, FragmentKind::Triangle), 4);
        // 12 grid edges, 4 touch the centre
        assert_eq!(count(&out, FragmentKind::LineSegment), 8);
    }

    #[test]
    fn test_height_axis_slots() {
        let mesh = Mesh::new(
            vec![10.0, 11.0],
            vec![20.0],
            vec![1.0, 2.0],
            HeightAxis::Y,
            Some(LineProp(0)),
            None,
        );
        let mut out = Vec::new();
        mesh.get_fragments(&Matrix4::identity(), &mut out);
        assert_eq!(out.len(), 1);
        // Y height: (x, y, z) = (pos2, height, pos1)
        assert_eq!(out[0].points[0], Point3::new(20.0, 2.0, 11.0));
        assert_eq!(out[0].points[1], Point3::new(20.0, 1.0, 10.0));
    }

    #[test]
    fn test_sample_grid_layout() {
        let (pos1, pos2, heights) = sample_grid(|a, b| a * 10.0 + b, (0.0, 2.0), (-1.0, 1.0), 3);
        assert_eq!(pos1, vec![0.0, 1.0, 2.0]);
        assert_eq!(pos2, vec![-1.0, 0.0, 1.0]);
        // (i1, i2) = (1, 2) sits at i1 * n2 + i2
        assert_eq!(heights[5], 11.0);
        assert_eq!(heights.len(), 9);

        let mesh = Mesh::new(pos1, pos2, heights, HeightAxis::Z, None, Some(SurfaceProp(0)));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_short_heights_rejected() {
        let mut mesh = grid(3, 3, Some(LineProp(2)), Some(SurfaceProp(1)));
        mesh.heights.truncate(8);
        assert_eq!(
            mesh.validate(),
            Err(GeometryError::HeightsSize { heights: 8, n1: 3, n2: 3 })
        );
        let mut out = Vec::new();
        mesh.get_fragments(&Matrix4::identity(), &mut out);
        assert!(out.is_empty());
    }
}
