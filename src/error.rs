//! Error types for mesh building and export.

use thiserror::Error;

/// Result type alias using ExportError.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Main error type for mesh building and export operations.
///
/// Every variant corresponds to a distinct input-validation failure; once a
/// mesh is built, the downstream split/pack/emit steps cannot fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// Corner colors and point colors were both supplied.
    #[error("can't provide both corner colors and point colors")]
    ConflictingColorBuffers,

    /// A flat attribute buffer does not match its expected length.
    #[error("{buffer} has length {actual}, expected {expected}")]
    BufferLength {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A loop's vertex index points past the end of the position buffer.
    #[error("loop {loop_index}: position offset {offset} out of bounds (positions length {len})")]
    VertexOutOfBounds {
        loop_index: usize,
        offset: usize,
        len: usize,
    },

    /// A triangle references a loop that does not exist.
    #[error("triangle {triangle}: loop {loop_index} out of bounds (loop count {loop_count})")]
    LoopOutOfBounds {
        triangle: usize,
        loop_index: u32,
        loop_count: usize,
    },

    /// A loop's vertex index points past the end of the point color buffer.
    #[error("loop {loop_index}: point color offset {offset} out of bounds (length {len})")]
    PointColorOutOfBounds {
        loop_index: usize,
        offset: usize,
        len: usize,
    },

    /// A material declares more texture tiles than the hardware has.
    #[error("material {material:?} declares {actual} tiles, at most 8 allowed")]
    TileCount { material: String, actual: usize },
}
