//! # Graph Analysis Module
//!
//! This module provides the connectivity and ring-perception algorithms that
//! the layout engine builds on. All algorithms are read-only: they observe
//! the live topology of a graph through the [`GraphBackend`] seam and never
//! mutate it, so the graph's derived-data cache can memoize their results
//! safely.
//!
//! ## Contents
//!
//! - **`backend`**: The read-only topology view the algorithms consume.
//! - **`components`**: Connected components, with an optional skip-edge probe.
//! - **`paths`**: Shortest paths with avoidance sets, and graph diameter.
//! - **`bridges`**: Cut-edge detection, batch and single-edge.
//! - **`rings`**: Minimum cycle basis ("smallest set of smallest rings").
//! - **`pgraph`**: Exhaustive enumeration of all simple cycles.
//!
//! [`GraphBackend`]: backend::GraphBackend

pub mod backend;
pub mod bridges;
pub mod components;
pub mod paths;
pub mod pgraph;
pub mod rings;
