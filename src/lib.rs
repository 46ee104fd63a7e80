//! Euclidean TSP Solver Library
//!
//! Approximate solutions to the Euclidean Traveling Salesman Problem with
//! fast constructive heuristics.
//!
//! # Features
//!
//! - Nearest-Neighbor construction (greedy stepping to the closest
//!   unvisited node)
//! - Cheapest-Insertion construction (random triangle grown by inserting
//!   random nodes at their cheapest edge position)
//! - Seeded, reproducible randomness
//! - Repeated-run comparison driver with CSV export
//! - SVG tour visualization
//!
//! # Example
//!
//! ```no_run
//! use euclid_tsp_solver::instance::TspInstance;
//! use euclid_tsp_solver::heuristics::construction::{
//!     CheapestInsertionHeuristic, ConstructionHeuristic, NearestNeighborHeuristic,
//! };
//!
//! let instance = TspInstance::from_file("data.csv").unwrap();
//!
//! let nn = NearestNeighborHeuristic::with_seed(42);
//! let tour = nn.construct(&instance).unwrap();
//! println!("NN tour length: {:.2}", tour.length);
//!
//! let insertion = CheapestInsertionHeuristic::with_seed(42);
//! let tour = insertion.construct(&instance).unwrap();
//! println!("Insertion tour length: {:.2}", tour.length);
//! ```

pub mod benchmark;
pub mod error;
pub mod heuristics;
pub mod instance;
pub mod solution;
pub mod visualization;

pub use error::{Error, Result};
pub use instance::TspInstance;
pub use solution::Solution;
