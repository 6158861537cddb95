//! # Workflows Module
//!
//! This module provides the high-level workflow that orchestrates complete
//! coordinate generation for molecular graphs.
//!
//! ## Overview
//!
//! Workflows are the top-level entry points for users of the crate. They
//! encapsulate the entire layout pipeline, from ring analysis through final
//! component packing. The workflow handles parameter validation, phase
//! sequencing, and placement bookkeeping, providing a clean and simple API
//! over the generator phases.
//!
//! ## Architecture
//!
//! The module is organized around a single generation workflow:
//!
//! - **Layout Workflow** ([`layout`]) - Complete 2D coordinate generation
//!   including ring system construction, chain growth, collision resolution,
//!   and force-directed refinement phases.
//!
//! ## Key Capabilities
//!
//! - **End-to-end generation** from bare connectivity to drawable coordinates
//! - **Incremental placement** that preserves and extends pre-placed vertices
//! - **Batch processing** over independent graphs, parallel when enabled
//! - **Deterministic output** with identical coordinates on repeated runs
//! - **Flexible configuration** of bond length, spacing, and refinement

pub mod layout;
