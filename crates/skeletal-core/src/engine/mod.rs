//! # Engine Module
//!
//! This module implements the coordinate-generation engine for skeletal
//! molecular graphs, providing the computational framework that turns bare
//! connectivity into a clean 2D drawing.
//!
//! ## Overview
//!
//! The engine module orchestrates the layout process for one connected
//! component at a time. It manages per-invocation placement state, carries the
//! ring analysis the phases share, and hosts the template library for ring
//! systems whose conventional drawings are not unions of regular polygons.
//!
//! ## Architecture
//!
//! The module is organized into specialized submodules that handle different
//! aspects of coordinate generation:
//!
//! - **Configuration** ([`config`]) - Layout parameters, spacing factors, and validation
//! - **Placement State** ([`state`]) - Ring systems, placement provenance, and turn tracking
//! - **Template Drawings** ([`templates`]) - Canonical coordinates for known ring systems
//! - **Generator Phases** ([`phases`]) - Ring construction, chain growth, collision
//!   resolution, and force refinement
//!
//! ## Key Capabilities
//!
//! - **Exact ring geometry** from templates and regular-polygon expansion
//! - **Zigzag chain growth** with even distribution at branch points
//! - **Landmark-preserving placement** that never moves pre-placed vertices
//! - **Deterministic refinement** with damped movement inside ring systems

pub mod config;
pub(crate) mod phases;
pub(crate) mod state;
pub(crate) mod templates;
