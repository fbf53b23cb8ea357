//! Point clouds drawn with a marker outline
use nalgebra::{Matrix4, Point3};

use crate::fragment::{Fragment, LineProp, PathParams, SurfaceProp};
use crate::geometry::Finite;
use crate::object::{Fragments, ObjectId};
use crate::paint::MarkerPath;
use crate::transform::project;

/// Scattered markers with optional per-point sizes
#[derive(Debug, Clone)]
pub struct Points {
    id: ObjectId,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    /// Per-point sizes; when empty every point uses `size`
    pub sizes: Vec<f64>,
    pub size: f64,
    pub path: MarkerPath,
    /// Scale the marker outline width along with its size
    pub scale_edges: bool,
    pub fill: Option<SurfaceProp>,
    pub edge: Option<LineProp>,
}

impl Points {
    pub fn new(
        x: Vec<f64>,
        y: Vec<f64>,
        z: Vec<f64>,
        path: MarkerPath,
        fill: Option<SurfaceProp>,
        edge: Option<LineProp>,
    ) -> Self {
        Self {
            id: ObjectId::next(),
            x,
            y,
            z,
            sizes: Vec::new(),
            size: 1.0,
            path,
            scale_edges: true,
            fill,
            edge,
        }
    }

    pub fn with_sizes(mut self, sizes: Vec<f64>) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Number of markers emitted for finite input
    pub fn len(&self) -> usize {
        let count = self.x.len().min(self.y.len()).min(self.z.len());
        if self.sizes.is_empty() {
            count
        } else {
            count.min(self.sizes.len())
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Fragments for Points {
    fn get_fragments<'a>(&'a self, outer: &Matrix4<f64>, out: &mut Vec<Fragment<'a>>) {
        let params = PathParams::Marker {
            path: &self.path,
            scale_edges: self.scale_edges,
        };

        for index in 0..self.len() {
            let p = project(outer, &Point3::new(self.x[index], self.y[index], self.z[index]));
            if !p.all_finite() {
                continue;
            }
            let size = self.sizes.get(index).copied().unwrap_or(self.size);
            out.push(
                Fragment::path(self.id, params, p, p, index)
                    .with_styles(self.fill, self.edge)
                    .with_size(size),
            );
        }
    }
}
