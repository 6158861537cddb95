//! Spatial acceleration structures for 2D proximity queries.

pub mod kdtree;
