//! The fragment record: the flat, paintable output of every object
use nalgebra::Point3;
use std::fmt;

use crate::object::ObjectId;
use crate::paint::{MarkerPath, PathCallback};

/// Which of a fragment's points are meaningful
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Triangle,
    LineSegment,
    Path,
}

impl FragmentKind {
    pub fn point_count(self) -> usize {
        match self {
            FragmentKind::Triangle => 3,
            FragmentKind::LineSegment => 2,
            FragmentKind::Path => 1,
        }
    }
}

/// Opaque surface style handle, passed through to the rasterizer verbatim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceProp(pub u32);

/// Opaque line style handle, passed through to the rasterizer verbatim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineProp(pub u32);

/// Extra payload of a path fragment, borrowed from the emitting object
#[derive(Clone, Copy)]
pub enum PathParams<'a> {
    /// Draw the marker outline at the point, scaled by the fragment's size.
    Marker {
        path: &'a MarkerPath,
        scale_edges: bool,
    },
    /// Run the object's draw callback for this item.
    Callback(&'a dyn PathCallback),
}

impl PathParams<'_> {
    pub fn runs_callback(&self) -> bool {
        matches!(self, PathParams::Callback(_))
    }
}

impl fmt::Debug for PathParams<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathParams::Marker { path, scale_edges } => f
                .debug_struct("Marker")
                .field("vertices", &path.vertices.len())
                .field("scale_edges", scale_edges)
                .finish(),
            PathParams::Callback(cb) => {
                write!(f, "Callback({:p})", *cb)
            }
        }
    }
}

// Identity comparison: two params are equal when they borrow the same payload.
impl PartialEq for PathParams<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                PathParams::Marker { path: a, scale_edges: sa },
                PathParams::Marker { path: b, scale_edges: sb },
            ) => std::ptr::eq(*a, *b) && sa == sb,
            (PathParams::Callback(a), PathParams::Callback(b)) => std::ptr::addr_eq(*a, *b),
            _ => false,
        }
    }
}

/// One renderable unit in camera space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment<'a> {
    pub kind: FragmentKind,
    pub points: [Point3<f64>; 3],
    pub surface: Option<SurfaceProp>,
    pub line: Option<LineProp>,
    pub owner: ObjectId,
    /// Sequence number within the emitting object
    pub index: usize,
    /// Marker size for path fragments
    pub path_size: f64,
    pub params: Option<PathParams<'a>>,
}

impl<'a> Fragment<'a> {
    pub fn triangle(
        owner: ObjectId,
        surface: Option<SurfaceProp>,
        points: [Point3<f64>; 3],
        index: usize,
    ) -> Self {
        Self {
            kind: FragmentKind::Triangle,
            points,
            surface,
            line: None,
            owner,
            index,
            path_size: 1.0,
            params: None,
        }
    }

    pub fn segment(
        owner: ObjectId,
        line: Option<LineProp>,
        p0: Point3<f64>,
        p1: Point3<f64>,
        index: usize,
    ) -> Self {
        Self {
            kind: FragmentKind::LineSegment,
            points: [p0, p1, Point3::origin()],
            surface: None,
            line,
            owner,
            index,
            path_size: 1.0,
            params: None,
        }
    }

    pub fn path(
        owner: ObjectId,
        params: PathParams<'a>,
        p0: Point3<f64>,
        p1: Point3<f64>,
        index: usize,
    ) -> Self {
        Self {
            kind: FragmentKind::Path,
            points: [p0, p1, Point3::origin()],
            surface: None,
            line: None,
            owner,
            index,
            path_size: 1.0,
            params: Some(params),
        }
    }

    pub fn with_styles(mut self, surface: Option<SurfaceProp>, line: Option<LineProp>) -> Self {
        self.surface = surface;
        self.line = line;
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.path_size = size;
        self
    }

    /// The points meaningful for this fragment's kind
    pub fn used_points(&self) -> &[Point3<f64>] {
        &self.points[..self.kind.point_count()]
    }
}
