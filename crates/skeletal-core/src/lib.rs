//! # Skeletal Core Library
//!
//! A library for modeling skeletal molecular graphs and generating clean 2D
//! depiction coordinates from bare connectivity.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a
//! clear separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains the mutable graph model
//!   (`MolecularGraph`), read-only topology algorithms (components, bridges,
//!   ring perception), spatial indexing, and planar geometry utilities.
//!
//! - **[`engine`]: The Logic Core.** This stateful layer drives coordinate
//!   generation. It includes the per-invocation `LayoutState`, the ring
//!   template library, and the generator phases (ring construction, chain
//!   growth, collision resolution, refinement).
//!
//! - **[`workflows`]: The Public API.** This is the highest-level, user-facing
//!   layer. It ties the `engine` and `core` together to execute complete
//!   procedures, such as laying out a molecule or a batch of molecules. It
//!   provides a simple and powerful entry point for end-users of the library.

pub mod core;
pub mod engine;
pub mod workflows;
