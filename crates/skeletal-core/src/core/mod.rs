//! # Core Module
//!
//! This module provides the fundamental building blocks and algorithms for
//! molecular-graph modeling, serving as the computational core of the library.
//!
//! ## Overview
//!
//! The core module implements the essential data structures, algorithms, and
//! utilities required for representing skeletal molecular graphs and reasoning
//! about their structure. It provides a complete framework for storing
//! connectivity, deriving topological properties, and querying geometry.
//!
//! ## Architecture
//!
//! The module is organized into specialized submodules that handle different
//! aspects of graph modeling:
//!
//! - **Graph Representation** ([`models`]) - Data structures for vertices, edges, and graphs
//! - **Topology Analysis** ([`analysis`]) - Connectivity, bridges, paths, and ring perception
//! - **Spatial Queries** ([`index`]) - Proximity search over generated coordinates
//! - **Geometry Utilities** ([`utils`]) - Planar vector math shared by the layout engine
//!
//! ## Key Capabilities
//!
//! - **Stable vertex and edge identity** across arbitrary mutation sequences
//! - **Generation-stamped caching** of derived topology, invalidated on mutation
//! - **Ring perception** producing a minimum cycle basis and exhaustive cycle sets
//! - **Efficient proximity search** with brute-force fallback for small point sets

pub mod analysis;
pub mod index;
pub mod models;
pub mod utils;
