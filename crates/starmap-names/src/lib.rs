//! Starmap Name Decomposition
//!
//! Pure functions that turn the weakly-typed textual designators found in
//! observation records into structured hierarchy paths.
//!
//! # Designators
//!
//! A body designator is the system name followed by a path:
//! `Sol A 1 a` is moon `a` of planet `1` of star `A` in system `Sol`.
//! Bodies of the primary star omit the star letter (`Sol 3`), multi-letter
//! designators (`Sol AB 2`) name a barycentre group rather than a star, and
//! belt clusters carry a four or five token suffix (`Sol A Belt Cluster 4`).
//!
//! # Failure
//!
//! A designator that yields no segments, or more than [`MAX_SEGMENTS`], is
//! rejected. Callers must drop such records rather than guess a position.

mod custom;
mod decompose;

pub use custom::custom_name;
pub use decompose::{decompose, related_remainder, DecomposeError, DecomposedPath, RootKind};

/// Own name of the synthetic root standing in for the primary star.
pub const MAIN_STAR: &str = "Main Star";

/// Deepest path a body designator may decompose into.
pub const MAX_SEGMENTS: usize = 5;
