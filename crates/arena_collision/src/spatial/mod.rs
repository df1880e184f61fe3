//! Spatial partitioning data structures
//!
//! Provides the broad phase for movement resolution, ray casting and
//! visibility queries.

mod grid;
pub mod spatial_query;

pub use grid::{CellKey, CellRange, WorldIndex};
pub use spatial_query::SpatialQuery;
