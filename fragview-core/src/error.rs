//! Validation errors for scene objects
//!
//! Objects check their inputs when asked for fragments. An invalid object
//! logs one of these and contributes nothing; fragment generation itself
//! never fails.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// The three coordinate slot indices must be a permutation of 0, 1, 2.
    #[error("invalid coordinate indices (value {idx_val}, edge1 {idx_edge1}, edge2 {idx_edge2})")]
    InvalidIndices {
        idx_val: usize,
        idx_edge1: usize,
        idx_edge2: usize,
    },

    #[error("size mismatch: {cells} cells but {values} values")]
    SizeMismatch { cells: usize, values: usize },

    #[error("{heights} heights cannot cover a {n1}x{n2} grid")]
    HeightsSize { heights: usize, n1: usize, n2: usize },
}
