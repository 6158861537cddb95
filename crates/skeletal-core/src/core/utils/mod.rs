//! Utility functions shared across the library.
//!
//! This module provides the planar vector and bounding-box math that supports
//! coordinate generation, including angle bookkeeping, reflections, and
//! regular-polygon measurements used throughout the layout phases.

pub mod geometry;
