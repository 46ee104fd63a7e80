//! Module for parsing and representing Euclidean TSP instances.
//!
//! Instances are loaded from semicolon-delimited coordinate files with `x`
//! and `y` columns; each row becomes one node, in row order. Distances are
//! straight-line Euclidean.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A node in the TSP instance.
///
/// Identity is the positional index `id`, never the coordinate pair: two
/// nodes with identical coordinates are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Index of the node in the instance (row order in the input file)
    pub id: usize,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Node {
    pub fn new(id: usize, x: f64, y: f64) -> Self {
        Node { id, x, y }
    }

    /// Euclidean distance to another node. Symmetric, non-negative, zero
    /// iff the coordinates coincide; NaN and infinities propagate.
    #[inline]
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One row of a coordinate file. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct CoordRecord {
    x: f64,
    y: f64,
}

/// A Euclidean TSP instance: a fixed, ordered, non-empty set of 2D nodes.
///
/// The node list is never mutated after load; constructors borrow it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TspInstance {
    /// Name of the instance
    pub name: String,
    /// All nodes, indexed 0..dimension-1
    pub nodes: Vec<Node>,
}

impl TspInstance {
    pub fn new(name: impl Into<String>, nodes: Vec<Node>) -> Self {
        TspInstance {
            name: name.into(),
            nodes,
        }
    }

    /// Build an instance from bare coordinate pairs, in order.
    pub fn from_points(name: impl Into<String>, points: &[(f64, f64)]) -> Self {
        let nodes = points
            .iter()
            .enumerate()
            .map(|(id, &(x, y))| Node::new(id, x, y))
            .collect();
        Self::new(name, nodes)
    }

    /// Parse an instance from a semicolon-delimited coordinate file.
    ///
    /// The file must carry a header row naming `x` and `y` columns.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string());
        let file = File::open(path)?;
        Self::from_reader(name, file)
    }

    /// Parse an instance from any reader producing semicolon-delimited rows.
    pub fn from_reader<R: Read>(name: impl Into<String>, rdr: R) -> Result<Self> {
        let name = name.into();
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .trim(csv::Trim::All)
            .from_reader(rdr);

        let headers = reader.headers()?.clone();
        for required in ["x", "y"] {
            if !headers.iter().any(|h| h == required) {
                return Err(Error::invalid_input(format!(
                    "instance '{}' is missing required column '{}'",
                    name, required
                )));
            }
        }

        let mut nodes = Vec::new();
        for record in reader.deserialize::<CoordRecord>() {
            let record = record?;
            nodes.push(Node::new(nodes.len(), record.x, record.y));
        }

        if nodes.is_empty() {
            return Err(Error::invalid_input(format!(
                "instance '{}' contains no nodes",
                name
            )));
        }

        log::info!("loaded instance '{}' with {} nodes", name, nodes.len());

        Ok(TspInstance::new(name, nodes))
    }

    /// Number of nodes in the instance.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.nodes.len()
    }

    /// Euclidean distance between the nodes at indices `i` and `j`.
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.nodes[i].distance_to(&self.nodes[j])
    }

    /// Total length of a tour given as a sequence of node indices: the sum
    /// of distances between consecutive entries. Delivered tours are closed
    /// (the start index repeated at the end), so no implicit return edge is
    /// added here.
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        tour.windows(2).map(|w| self.distance(w[0], w[1])).sum()
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for node in &self.nodes {
            min_x = min_x.min(node.x);
            max_x = max_x.max(node.x);
            min_y = min_y.min(node.y);
            max_y = max_y.max(node.y);
        }

        let mut distances: Vec<f64> = Vec::new();
        for i in 0..self.dimension() {
            for j in i + 1..self.dimension() {
                distances.push(self.distance(i, j));
            }
        }
        let avg_distance = if distances.is_empty() {
            0.0
        } else {
            distances.iter().sum::<f64>() / distances.len() as f64
        };
        let min_distance = distances.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_distance = distances.iter().cloned().fold(0.0, f64::max);

        InstanceStatistics {
            name: self.name.clone(),
            dimension: self.dimension(),
            min_x,
            max_x,
            min_y,
            max_y,
            avg_distance,
            min_distance,
            max_distance,
        }
    }
}

/// Statistics about a TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub avg_distance: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(f, "  Nodes: {}", self.dimension)?;
        writeln!(
            f,
            "  Bounding box: [{:.2}, {:.2}] x [{:.2}, {:.2}]",
            self.min_x, self.max_x, self.min_y, self.max_y
        )?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Min distance: {:.2}", self.min_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)
    }
}
