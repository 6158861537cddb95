//! The individual passes of the coordinate generator.
//!
//! Phases run in a fixed order over each connected component: ring systems
//! are drawn first, chains grow outward from them, colliding branches are
//! flipped or nudged apart, and a bounded force-directed pass smooths what
//! remains. Each phase only ever moves vertices placed during the current
//! invocation; coordinates that arrived placed are landmarks, not work.

pub(crate) mod chain_placement;
pub(crate) mod collision;
pub(crate) mod refinement;
pub(crate) mod ring_placement;
