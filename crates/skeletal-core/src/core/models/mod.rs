//! # Core Models Module
//!
//! This module contains the fundamental data structures used to represent
//! skeletal molecular graphs, providing the foundation for all analysis and
//! layout operations.
//!
//! ## Overview
//!
//! The models module defines the core abstractions for molecular connectivity:
//! vertices, edges, and the graph that owns them. These models are designed to:
//!
//! - **Represent structure** - Complete description of vertices, bonds, and coordinates
//! - **Survive mutation** - Keyed storage whose identifiers stay valid across removals
//! - **Support efficient queries** - Adjacency lists and cached derived properties
//! - **Maintain type safety** - Distinct identifier types for vertices and edges
//!
//! ## Key Components
//!
//! - [`vertex`] - Individual vertex representation with coordinates and payload
//! - [`edge`] - Bond between two vertices with its own payload slot
//! - [`graph`] - The mutable graph, its adjacency maps, and the derived-data cache
//! - [`ids`] - Unique identifier types for vertices and edges
//!
//! ## Usage
//!
//! Most operations start by constructing a graph and declaring its bonds.
//!
//! ```ignore
//! use skeletal::core::models::graph::MolecularGraph;
//!
//! let mut graph = MolecularGraph::new();
//! let a = graph.add_vertex();
//! let b = graph.add_vertex();
//! let bond = graph.add_edge(a, b);
//! ```

pub mod edge;
pub mod graph;
pub mod ids;
pub mod vertex;
