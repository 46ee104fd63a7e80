//! Solution representation for Euclidean TSP tours.
//!
//! A delivered solution holds a *closed* tour: the visiting order of all
//! node indices with the starting index repeated once at the end, plus the
//! incrementally accumulated total length.

use serde::{Deserialize, Serialize};

use crate::instance::TspInstance;

/// A tour through a TSP instance together with its length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The closed tour as node indices; first and last entries are the same
    /// node, every other node appears exactly once.
    pub tour: Vec<usize>,
    /// Total Euclidean tour length, including the closing edge
    pub length: f64,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
}

impl Solution {
    /// Create an empty solution
    pub fn new() -> Self {
        Solution {
            tour: Vec::new(),
            length: f64::INFINITY,
            algorithm: String::new(),
            computation_time: 0.0,
        }
    }

    /// Wrap a closed tour and its accumulated length.
    pub fn from_closed_tour(tour: Vec<usize>, length: f64, algorithm: &str) -> Self {
        Solution {
            tour,
            length,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
        }
    }

    /// The visiting order without the closing repeat of the start node.
    pub fn visiting_order(&self) -> &[usize] {
        if self.tour.len() < 2 {
            &self.tour
        } else {
            &self.tour[..self.tour.len() - 1]
        }
    }

    /// Whether the tour starts and ends at the same node.
    pub fn is_closed(&self) -> bool {
        self.tour.len() >= 2 && self.tour.first() == self.tour.last()
    }

    /// Whether the tour is a closed Hamiltonian cycle over the instance:
    /// closed, and every node index appears exactly once in the visiting
    /// order.
    pub fn is_complete(&self, instance: &TspInstance) -> bool {
        let n = instance.dimension();
        if self.tour.len() != n + 1 || !self.is_closed() {
            return false;
        }

        let mut seen = vec![false; n];
        for &node in self.visiting_order() {
            if node >= n || seen[node] {
                return false;
            }
            seen[node] = true;
        }
        true
    }

    /// Recompute the length from the instance, replacing the accumulated
    /// value. Useful as a consistency check against incremental bookkeeping.
    pub fn validate(&mut self, instance: &TspInstance) {
        self.length = instance.tour_length(&self.tour);
    }
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Length: {:.2}", self.length)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        writeln!(f, "  Tour: {:?}", self.tour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> TspInstance {
        TspInstance::from_points("square", &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)])
    }

    #[test]
    fn test_solution_creation() {
        let sol = Solution::new();
        assert!(sol.tour.is_empty());
        assert_eq!(sol.length, f64::INFINITY);
        assert!(!sol.is_closed());
    }

    #[test]
    fn test_closed_complete_tour() {
        let instance = square();
        let sol = Solution::from_closed_tour(vec![2, 1, 0, 3, 2], 4.0, "test");

        assert!(sol.is_closed());
        assert!(sol.is_complete(&instance));
        assert_eq!(sol.visiting_order(), &[2, 1, 0, 3]);
    }

    #[test]
    fn test_incomplete_tours_rejected() {
        let instance = square();

        // Not closed
        let open = Solution::from_closed_tour(vec![0, 1, 2, 3], 3.0, "test");
        assert!(!open.is_complete(&instance));

        // Repeated node in the visiting order
        let repeated = Solution::from_closed_tour(vec![0, 1, 1, 3, 0], 0.0, "test");
        assert!(!repeated.is_complete(&instance));

        // Missing node
        let short = Solution::from_closed_tour(vec![0, 1, 2, 0], 0.0, "test");
        assert!(!short.is_complete(&instance));
    }

    #[test]
    fn test_validate_recomputes_length() {
        let instance = square();
        let mut sol = Solution::from_closed_tour(vec![0, 1, 2, 3, 0], 0.0, "test");
        sol.validate(&instance);
        assert!((sol.length - 4.0).abs() < 1e-10);
    }
}
