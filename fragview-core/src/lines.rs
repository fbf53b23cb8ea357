//! Connected polylines and independent line segments
use nalgebra::{Matrix4, Point3};

use crate::fragment::{Fragment, LineProp};
use crate::geometry::pair_finite;
use crate::object::{Fragments, ObjectId};
use crate::transform::project;

/// Zip three coordinate sequences into points, truncating to the shortest.
pub(crate) fn zip_points<'v>(xs: &'v [f64], ys: &'v [f64], zs: &'v [f64]) -> impl Iterator<Item = Point3<f64>> + 'v {
    xs.iter()
        .zip(ys)
        .zip(zs)
        .map(|((&x, &y), &z)| Point3::new(x, y, z))
}

/// A connected sequence of points sharing one line style
#[derive(Debug, Clone)]
pub struct PolyLine {
    id: ObjectId,
    pub points: Vec<Point3<f64>>,
    pub line: Option<LineProp>,
}

impl PolyLine {
    pub fn new(line: Option<LineProp>) -> Self {
        Self {
            id: ObjectId::next(),
            points: Vec::new(),
            line,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Append `min(|xs|, |ys|, |zs|)` points built by zipping the coordinates
    pub fn add_points(&mut self, xs: &[f64], ys: &[f64], zs: &[f64]) {
        let count = xs.len().min(ys.len()).min(zs.len());
        self.points.reserve(count);
        self.points.extend(zip_points(xs, ys, zs));
    }
}

impl Fragments for PolyLine {
    fn get_fragments<'a>(&'a self, outer: &Matrix4<f64>, out: &mut Vec<Fragment<'a>>) {
        let mut previous: Option<Point3<f64>> = None;
        for (index, point) in self.points.iter().enumerate() {
            let current = project(outer, point);
            if let Some(prev) = previous {
                if pair_finite(&current, &prev) {
                    out.push(Fragment::segment(self.id, self.line, current, prev, index));
                }
            }
            previous = Some(current);
        }
    }
}

/// Independent start/end point pairs sharing one line style
#[derive(Debug, Clone)]
pub struct LineSegments {
    id: ObjectId,
    /// Flattened as start0, end0, start1, end1, ...
    pub points: Vec<Point3<f64>>,
    pub line: Option<LineProp>,
}

impl LineSegments {
    /// Zip six coordinate sequences into segments, truncating to the
    /// shortest.
    pub fn from_coords(
        starts: (&[f64], &[f64], &[f64]),
        ends: (&[f64], &[f64], &[f64]),
        line: Option<LineProp>,
    ) -> Self {
        let points = zip_points(starts.0, starts.1, starts.2)
            .zip(zip_points(ends.0, ends.1, ends.2))
            .flat_map(|(s, e)| [s, e])
            .collect();
        Self {
            id: ObjectId::next(),
            points,
            line,
        }
    }

    /// Build segments from two flat `x, y, z, x, y, z, ...` sequences of
    /// start and end points. A trailing partial triplet is ignored.
    pub fn from_triplets(starts: &[f64], ends: &[f64], line: Option<LineProp>) -> Self {
        let points = starts
            .chunks_exact(3)
            .zip(ends.chunks_exact(3))
            .flat_map(|(s, e)| [Point3::new(s[0], s[1], s[2]), Point3::new(e[0], e[1], e[2])])
            .collect();
        Self {
            id: ObjectId::next(),
            points,
            line,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.points.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.points.len() < 2
    }
}

impl Fragments for LineSegments {
    // No finiteness filter: every pair is emitted.
    fn get_fragments<'a>(&'a self, outer: &Matrix4<f64>, out: &mut Vec<Fragment<'a>>) {
        for (pair, ends) in self.points.chunks_exact(2).enumerate() {
            let p0 = project(outer, &ends[0]);
            let p1 = project(outer, &ends[1]);
            out.push(Fragment::segment(self.id, self.line, p0, p1, pair * 2));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::FragmentKind;
    use crate::transform::Transform;

    #[test]
    fn test_add_points_truncates_to_shortest() {
        let mut line = PolyLine::new(Some(LineProp(1)));
        line.add_points(&[0.0, 1.0, 2.0], &[0.0, 1.0], &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(line.points.len(), 2);
        line.add_points(&[5.0], &[5.0], &[5.0]);
        assert_eq!(line.points.len(), 3);
    }

    #[test]
    fn test_single_point_emits_nothing() {
        let mut line = PolyLine::new(Some(LineProp(1)));
        line.add_points(&[1.0], &[2.0], &[3.0]);
        let mut out = Vec::new();
        line.get_fragments(&Matrix4::identity(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_nan_point_drops_both_adjacent_segments() {
        let mut line = PolyLine::new(Some(LineProp(1)));
        line.add_points(&[0.0, 1.0, 2.0, 3.0], &[0.0, f64::NAN, 0.0, 0.0], &[0.0; 4]);

        let mut out = Vec::new();
        line.get_fragments(&Matrix4::identity(), &mut out);

        assert_eq!(out.len(), 1);
        let seg = &out[0];
        assert_eq!(seg.kind, FragmentKind::LineSegment);
        assert_eq!(seg.index, 3);
        assert_eq!(seg.points[0], Point3::new(3.0, 0.0, 0.0));
        assert_eq!(seg.points[1], Point3::new(2.0, 0.0, 0.0));
        assert_eq!(seg.line, Some(LineProp(1)));
        assert_eq!(seg.surface, None);
    }

    #[test]
    fn test_finite_polyline_emits_every_pair() {
        let mut line = PolyLine::new(None);
        line.add_points(&[0.0, 1.0, 2.0, 3.0, 4.0], &[0.0; 5], &[1.0; 5]);
        let mut out = Vec::new();
        line.get_fragments(&Transform::translation_matrix(1.0, 1.0, 1.0), &mut out);
        assert_eq!(out.len(), 4);
        let indices: Vec<usize> = out.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_segments_from_coords() {
        let segs = LineSegments::from_coords(
            (&[0.0, 1.0], &[0.0, 1.0], &[0.0, 1.0]),
            (&[2.0, 3.0, 9.0], &[2.0, 3.0], &[2.0, 3.0]),
            Some(LineProp(4)),
        );
        assert_eq!(segs.len(), 2);

        let mut out = Vec::new();
        segs.get_fragments(&Matrix4::identity(), &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].index, 2);
        assert_eq!(out[1].points[0], Point3::new(1.0, 1.0, 1.0));
        assert_eq!(out[1].points[1], Point3::new(3.0, 3.0, 3.0));
    }

    #[test]
    fn test_segments_from_triplets_keep_non_finite() {
        let segs = LineSegments::from_triplets(
            &[0.0, 0.0, 0.0, f64::NAN, 1.0, 1.0, 7.0],
            &[1.0, 1.0, 1.0, 2.0, 2.0, 2.0],
            None,
        );
        assert_eq!(segs.len(), 2);

        let mut out = Vec::new();
        segs.get_fragments(&Matrix4::identity(), &mut out);
        assert_eq!(out.len(), 2);
        assert!(out[1].points[0].x.is_nan());
    }
}
