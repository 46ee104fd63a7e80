//! Tour-construction heuristics for the Euclidean TSP.

pub mod construction;

pub use construction::*;
