//! Fragview Core - scene objects to camera-space fragments
//!
//! Builds flat lists of paintable triangles, line segments and marker/text
//! paths from a tree of 3D objects under composable 4x4 transforms. Pixel
//! painting is left to a downstream rasterizer.

pub mod axis_labels;
pub mod container;
pub mod data_mesh;
pub mod error;
pub mod fragment;
pub mod geometry;
pub mod lines;
pub mod mesh;
pub mod object;
pub mod paint;
pub mod points;
pub mod projection;
pub mod text;
pub mod transform;
pub mod triangle;

// Re-export commonly used types
pub use axis_labels::AxisTickLabels;
pub use container::{FacingContainer, ObjectContainer};
pub use data_mesh::{DataMesh, LineCellTracker};
pub use error::GeometryError;
pub use fragment::{Fragment, FragmentKind, LineProp, PathParams, SurfaceProp};
pub use lines::{LineSegments, PolyLine};
pub use mesh::{sample_grid, HeightAxis, Mesh};
pub use object::{Fragments, Object, ObjectId};
pub use paint::{LabelDraw, MarkerPath, PaintSurface, PathCallback, SurfaceGuard, TextDraw};
pub use points::Points;
pub use projection::{Camera, ProjectionMode};
pub use text::Text;
pub use transform::{RotationState, Transform};
pub use triangle::{Triangle, TriangleFacing};
