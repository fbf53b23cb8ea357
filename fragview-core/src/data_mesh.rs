//! Irregular-grid cell data drawn as a smoothed surface
//!
//! Each finite cell value becomes a patch whose corners and edge midpoints
//! are averaged with the neighbouring cells, so adjacent patches meet without
//! gaps. Grid lines shared by two cells are emitted once.
use nalgebra::{Matrix4, Point3};

use crate::error::GeometryError;
use crate::fragment::{Fragment, LineProp, SurfaceProp};
use crate::geometry::{finite_mean, Finite};
use crate::object::{Fragments, ObjectId};
use crate::transform::project;

// Patch points run clockwise from the (i1, i2) corner: corners are even,
// edge midpoints odd, 8 is the centre.
//
//   0 -- 1 -- 2        i1 grows to the right
//   |         |        i2 grows downward
//   7    8    3
//   |         |
//   6 -- 5 -- 4

const TRIS_HIGH_RES: [[usize; 3]; 8] = [
    [8, 0, 1],
    [8, 1, 2],
    [8, 2, 3],
    [8, 3, 4],
    [8, 4, 5],
    [8, 5, 6],
    [8, 6, 7],
    [8, 7, 0],
];
// alternated per cell for a symmetric pattern
const TRIS_LOW_RES: [[[usize; 3]; 2]; 2] = [[[0, 2, 4], [0, 6, 4]], [[2, 0, 6], [2, 4, 6]]];

/// Grid lines of one cell with the (d1, d2, slot) key owning each. A side at
/// constant i2 belongs to the cell at its lower i2 edge, a side at constant
/// i1 to the cell at its lower i1 edge, so neighbours resolve to one key.
/// Low resolution slots: 0 = constant-i2 side, 1 = constant-i1 side.
const LINES_LOW_RES: [([usize; 2], (usize, usize, usize)); 4] = [
    ([0, 2], (0, 0, 0)),
    ([0, 6], (0, 0, 1)),
    ([4, 2], (1, 0, 1)),
    ([4, 6], (0, 1, 0)),
];
/// High resolution halves: slots 0/1 split the constant-i2 side, 2/3 the
/// constant-i1 side.
const LINES_HIGH_RES: [([usize; 2], (usize, usize, usize)); 8] = [
    ([0, 1], (0, 0, 0)),
    ([1, 2], (0, 0, 1)),
    ([2, 3], (1, 0, 2)),
    ([3, 4], (1, 0, 3)),
    ([4, 5], (0, 1, 1)),
    ([5, 6], (0, 1, 0)),
    ([6, 7], (0, 0, 3)),
    ([7, 0], (0, 0, 2)),
];

const SLOTS: usize = 4;

/// Records which (cell, slot) grid lines have been emitted during one call
pub struct LineCellTracker {
    n2: usize,
    drawn: Vec<bool>,
}

impl LineCellTracker {
    pub fn new(n1: usize, n2: usize) -> Self {
        Self {
            n2,
            drawn: vec![false; n1 * n2 * SLOTS],
        }
    }

    fn slot(&self, i1: usize, i2: usize, slot: usize) -> usize {
        (i1 * self.n2 + i2) * SLOTS + slot
    }

    pub fn is_set(&self, i1: usize, i2: usize, slot: usize) -> bool {
        self.drawn[self.slot(i1, i2, slot)]
    }

    pub fn set(&mut self, i1: usize, i2: usize, slot: usize) {
        let idx = self.slot(i1, i2, slot);
        self.drawn[idx] = true;
    }
}

/// A 2D field of cell values bounded by `edges1` x `edges2`, drawn with the
/// value along coordinate `idx_val` and the edges along `idx_edge1`,
/// `idx_edge2`.
#[derive(Debug, Clone)]
pub struct DataMesh {
    id: ObjectId,
    pub edges1: Vec<f64>,
    pub edges2: Vec<f64>,
    /// `vals[i1 * m2 + i2]` for cell `(i1, i2)`
    pub vals: Vec<f64>,
    pub idx_val: usize,
    pub idx_edge1: usize,
    pub idx_edge2: usize,
    /// Fan eight triangles from the cell centre instead of two across it
    pub high_res: bool,
    pub line: Option<LineProp>,
    pub surface: Option<SurfaceProp>,
}

impl DataMesh {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        edges1: Vec<f64>,
        edges2: Vec<f64>,
        vals: Vec<f64>,
        idx_val: usize,
        idx_edge1: usize,
        idx_edge2: usize,
        high_res: bool,
        line: Option<LineProp>,
        surface: Option<SurfaceProp>,
    ) -> Self {
        Self {
            id: ObjectId::next(),
            edges1,
            edges2,
            vals,
            idx_val,
            idx_edge1,
            idx_edge2,
            high_res,
            line,
            surface,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Number of cells along each direction
    pub fn cells(&self) -> (usize, usize) {
        (self.edges1.len().saturating_sub(1), self.edges2.len().saturating_sub(1))
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        let idxs = [self.idx_val, self.idx_edge1, self.idx_edge2];
        let mut found = [false; 3];
        for &i in &idxs {
            if let Some(slot) = found.get_mut(i) {
                *slot = true;
            }
        }
        if found.contains(&false) {
            return Err(GeometryError::InvalidIndices {
                idx_val: self.idx_val,
                idx_edge1: self.idx_edge1,
                idx_edge2: self.idx_edge2,
            });
        }

        let (m1, m2) = self.cells();
        if m1 * m2 != self.vals.len() {
            return Err(GeometryError::SizeMismatch {
                cells: m1 * m2,
                values: self.vals.len(),
            });
        }
        Ok(())
    }

    fn patch_point(&self, val: f64, e1: f64, e2: f64) -> Point3<f64> {
        let mut pt = Point3::origin();
        pt[self.idx_val] = val;
        pt[self.idx_edge1] = e1;
        pt[self.idx_edge2] = e2;
        pt
    }

    /// The nine patch points of cell `(i1, i2)` in scene coordinates.
    fn patch(&self, i1: usize, i2: usize) -> [Point3<f64>; 9] {
        let (m1, m2) = self.cells();

        // neighbour values, clamped at the grid boundary
        let mut n = [0.0; 9];
        for (d1, row) in n.chunks_exact_mut(3).enumerate() {
            let c1 = (i1 + d1).saturating_sub(1).min(m1 - 1);
            for (d2, v) in row.iter_mut().enumerate() {
                let c2 = (i2 + d2).saturating_sub(1).min(m2 - 1);
                *v = self.vals[c1 * m2 + c2];
            }
        }

        let (a1, b1) = (self.edges1[i1], self.edges1[i1 + 1]);
        let (a2, b2) = (self.edges2[i2], self.edges2[i2 + 1]);
        let (mid1, mid2) = (0.5 * (a1 + b1), 0.5 * (a2 + b2));

        [
            self.patch_point(finite_mean(&[n[0], n[3], n[4], n[1]]), a1, a2),
            self.patch_point(finite_mean(&[n[4], n[3]]), mid1, a2),
            self.patch_point(finite_mean(&[n[3], n[6], n[7], n[4]]), b1, a2),
            self.patch_point(finite_mean(&[n[4], n[7]]), b1, mid2),
            self.patch_point(finite_mean(&[n[4], n[7], n[8], n[5]]), b1, b2),
            self.patch_point(finite_mean(&[n[4], n[5]]), mid1, b2),
            self.patch_point(finite_mean(&[n[1], n[4], n[5], n[2]]), a1, b2),
            self.patch_point(finite_mean(&[n[4], n[1]]), a1, mid2),
            self.patch_point(n[4], mid1, mid2),
        ]
    }
}

impl Fragments for DataMesh {
    fn get_fragments<'a>(&'a self, outer: &Matrix4<f64>, out: &mut Vec<Fragment<'a>>) {
        if let Err(err) = self.validate() {
            log::error!("DataMesh: {err}");
            return;
        }
        if self.line.is_none() && self.surface.is_none() {
            return;
        }

        let (m1, m2) = self.cells();
        let lines: &[([usize; 2], (usize, usize, usize))] = if self.high_res {
            &LINES_HIGH_RES
        } else {
            &LINES_LOW_RES
        };
        let mut tracker = LineCellTracker::new(m1 + 1, m2 + 1);
        let start = out.len();

        for i1 in 0..m1 {
            for i2 in 0..m2 {
                let index = i1 * m2 + i2;
                if !self.vals[index].is_finite() {
                    continue;
                }

                let projected = self.patch(i1, i2).map(|p| project(outer, &p));

                if self.surface.is_some() {
                    let tris: &[[usize; 3]] = if self.high_res {
                        &TRIS_HIGH_RES
                    } else {
                        &TRIS_LOW_RES[(i1 + i2) % 2]
                    };
                    for tri in tris {
                        let points = tri.map(|i| projected[i]);
                        out.push(Fragment::triangle(self.id, self.surface, points, index));
                    }
                }

                if self.line.is_some() {
                    for &([a, b], (d1, d2, slot)) in lines {
                        let (c1, c2) = (i1 + d1, i2 + d2);
                        if tracker.is_set(c1, c2, slot) {
                            continue;
                        }
                        let (p0, p1) = (projected[a], projected[b]);
                        if p0.all_finite() && p1.all_finite() {
                            out.push(Fragment::segment(self.id, self.line, p0, p1, index));
                        }
                        tracker.set(c1, c2, slot);
                    }
                }
            }
        }

        log::trace!("DataMesh {:?}: {} fragments from {}x{} cells", self.id, out.len() - start, m1, m2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::FragmentKind;
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    fn two_by_two(vals: Vec<f64>, high_res: bool) -> DataMesh {
        DataMesh::new(
            vec![0.0, 1.0, 2.0],
            vec![0.0, 1.0, 2.0],
            vals,
            2,
            0,
            1,
            high_res,
            Some(LineProp(3)),
            Some(SurfaceProp(4)),
        )
    }

    fn fragments(mesh: &DataMesh) -> Vec<Fragment<'_>> {
        let mut out = Vec::new();
        mesh.get_fragments(&Matrix4::identity(), &mut out);
        out
    }

    // Segment footprint in the edge plane, independent of direction. Values
    // are on a half-unit lattice so scaling by 2 is exact.
    fn footprint(f: &Fragment<'_>) -> ((i64, i64), (i64, i64)) {
        let key = |p: &Point3<f64>| ((p.x * 2.0) as i64, (p.y * 2.0) as i64);
        let (a, b) = (key(&f.points[0]), key(&f.points[1]));
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    fn segments<'f, 'a>(out: &'f [Fragment<'a>]) -> Vec<&'f Fragment<'a>> {
        out.iter().filter(|f| f.kind == FragmentKind::LineSegment).collect()
    }

    #[test]
    fn test_low_res_edges_drawn_once() {
        let mesh = two_by_two(vec![1.0, 2.0, 3.0, 4.0], false);
        let out = fragments(&mesh);
        let segs = segments(&out);

        // 3 grid lines of 2 cells in each direction
        assert_eq!(segs.len(), 12);
        let unique: HashSet<_> = segs.iter().map(|f| footprint(f)).collect();
        assert_eq!(unique.len(), 12);

        let tris = out.iter().filter(|f| f.kind == FragmentKind::Triangle).count();
        assert_eq!(tris, 2 * 4);
    }

    #[test]
    fn test_high_res_half_edges_drawn_once() {
        let mesh = two_by_two(vec![1.0, 2.0, 3.0, 4.0], true);
        let out = fragments(&mesh);
        let segs = segments(&out);

        assert_eq!(segs.len(), 24);
        let unique: HashSet<_> = segs.iter().map(|f| footprint(f)).collect();
        assert_eq!(unique.len(), 24);

        let tris = out.iter().filter(|f| f.kind == FragmentKind::Triangle).count();
        assert_eq!(tris, 8 * 4);
    }

    #[test]
    fn test_non_finite_cell_leaves_hole() {
        let mesh = two_by_two(vec![1.0, 2.0, f64::NAN, 4.0], false);
        let out = fragments(&mesh);

        let tris = out.iter().filter(|f| f.kind == FragmentKind::Triangle).count();
        assert_eq!(tris, 6);
        // the two outer sides owned only by the missing cell are gone
        assert_eq!(segments(&out).len(), 10);
        assert!(out.iter().all(|f| f.index != 2));
    }

    #[test]
    fn test_index_is_cell_index() {
        let mesh = two_by_two(vec![1.0, 2.0, 3.0, 4.0], false);
        let out = fragments(&mesh);
        let indices: Vec<usize> = out
            .iter()
            .filter(|f| f.kind == FragmentKind::Triangle)
            .map(|f| f.index)
            .collect();
        assert_eq!(indices, vec![0, 0, 1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn test_corner_averaging() {
        let mesh = two_by_two(vec![1.0, 2.0, 3.0, 4.0], true);
        let out = fragments(&mesh);

        // first cell, fan triangle (centre, corner 0, midpoint 1)
        let first = &out[0];
        assert_relative_eq!(first.points[0], Point3::new(0.5, 0.5, 1.0));
        assert_relative_eq!(first.points[1], Point3::new(0.0, 0.0, 1.0));
        // boundary midpoint: the missing neighbour clamps to the cell itself
        assert_relative_eq!(first.points[2], Point3::new(0.5, 0.0, 1.0));

        // fan triangle (centre, midpoint 3, corner 4): midpoint 3 is shared
        // with cell (1, 0), corner 4 averages all four cells
        let fourth = &out[3];
        assert_relative_eq!(fourth.points[1], Point3::new(1.0, 0.5, 2.0));
        assert_relative_eq!(fourth.points[2], Point3::new(1.0, 1.0, 2.5));
    }

    #[test]
    fn test_invalid_indices_rejected() {
        let mut mesh = two_by_two(vec![1.0, 2.0, 3.0, 4.0], false);
        mesh.idx_val = 0;
        mesh.idx_edge1 = 0;
        mesh.idx_edge2 = 1;
        assert!(matches!(mesh.validate(), Err(GeometryError::InvalidIndices { .. })));
        assert!(fragments(&mesh).is_empty());

        mesh.idx_val = 3;
        mesh.idx_edge2 = 2;
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let mesh = two_by_two(vec![1.0, 2.0, 3.0], false);
        assert_eq!(
            mesh.validate(),
            Err(GeometryError::SizeMismatch { cells: 4, values: 3 })
        );
        assert!(fragments(&mesh).is_empty());
    }

    #[test]
    fn test_no_styles_emits_nothing() {
        let mut mesh = two_by_two(vec![1.0, 2.0, 3.0, 4.0], false);
        mesh.line = None;
        mesh.surface = None;
        assert!(mesh.validate().is_ok());
        assert!(fragments(&mesh).is_empty());
    }

    #[test]
    fn test_tracker() {
        let mut tracker = LineCellTracker::new(3, 3);
        assert!(!tracker.is_set(2, 1, 3));
        tracker.set(2, 1, 3);
        assert!(tracker.is_set(2, 1, 3));
        assert!(!tracker.is_set(2, 1, 2));
    }
}
