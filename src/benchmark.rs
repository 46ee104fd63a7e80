//! Comparison driver for the construction heuristics.
//!
//! Runs Nearest-Neighbor once and Cheapest-Insertion repeatedly with
//! independent seeds, collects the resulting tour lengths, and exports
//! results and per-algorithm statistics.

use crate::error::Result;
use crate::heuristics::construction::{
    CheapestInsertionHeuristic, ConstructionHeuristic, NearestNeighborHeuristic,
};
use crate::instance::TspInstance;
use crate::solution::Solution;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Result of one heuristic run on an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Algorithm name
    pub algorithm: String,
    /// Instance name
    pub instance: String,
    /// Instance dimension
    pub dimension: usize,
    /// Run index (0 for the single NN run)
    pub run: usize,
    /// Tour length
    pub length: f64,
    /// Computation time in seconds
    pub time: f64,
}

/// Aggregated statistics for an algorithm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmStatistics {
    pub algorithm: String,
    pub num_runs: usize,
    pub best_length: f64,
    pub avg_length: f64,
    pub worst_length: f64,
    pub std_length: f64,
    pub avg_time: f64,
}

/// Comparison configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of independent Cheapest-Insertion runs per instance
    pub insertion_runs: usize,
    /// Base seed; run `r` uses `seed + r`
    pub seed: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            insertion_runs: 10,
            seed: 42,
        }
    }
}

/// Collects heuristic runs across instances and aggregates them.
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<RunResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// Run the full comparison on one instance: Nearest-Neighbor once,
    /// Cheapest-Insertion `insertion_runs` times with fresh randomness per
    /// run. No state is shared between runs.
    pub fn run_comparison(&mut self, instance: &TspInstance) -> Result<()> {
        log::info!(
            "comparing heuristics on '{}' (n={})",
            instance.name,
            instance.dimension()
        );

        let nn = NearestNeighborHeuristic::with_seed(self.config.seed);
        let solution = nn.construct(instance)?;
        self.record_result(instance, &solution, 0);

        for run in 0..self.config.insertion_runs {
            let insertion = CheapestInsertionHeuristic::with_seed(self.config.seed + run as u64);
            let solution = insertion.construct(instance)?;
            self.record_result(instance, &solution, run);
        }

        Ok(())
    }

    fn record_result(&mut self, instance: &TspInstance, solution: &Solution, run: usize) {
        self.results.push(RunResult {
            algorithm: solution.algorithm.clone(),
            instance: instance.name.clone(),
            dimension: instance.dimension(),
            run,
            length: solution.length,
            time: solution.computation_time,
        });
    }

    /// Compute statistics for each algorithm
    pub fn compute_statistics(&self) -> Vec<AlgorithmStatistics> {
        let mut by_algorithm: HashMap<String, Vec<&RunResult>> = HashMap::new();

        for result in &self.results {
            by_algorithm
                .entry(result.algorithm.clone())
                .or_default()
                .push(result);
        }

        let mut statistics = Vec::new();

        for (algorithm, results) in by_algorithm {
            let lengths: Vec<f64> = results.iter().map(|r| r.length).collect();
            let times: Vec<f64> = results.iter().map(|r| r.time).collect();

            let avg_length = lengths.iter().sum::<f64>() / lengths.len() as f64;
            let best_length = lengths.iter().cloned().fold(f64::INFINITY, f64::min);
            let worst_length = lengths.iter().cloned().fold(0.0, f64::max);

            let variance = lengths
                .iter()
                .map(|l| (l - avg_length).powi(2))
                .sum::<f64>()
                / lengths.len() as f64;
            let std_length = variance.sqrt();

            let avg_time = times.iter().sum::<f64>() / times.len() as f64;

            statistics.push(AlgorithmStatistics {
                algorithm,
                num_runs: results.len(),
                best_length,
                avg_length,
                worst_length,
                std_length,
                avg_time,
            });
        }

        statistics.sort_by(|a, b| {
            a.avg_length
                .partial_cmp(&b.avg_length)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        statistics
    }

    /// Export raw run results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Export aggregated statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("   Euclidean TSP Heuristic Comparison\n");
        report.push_str("========================================\n\n");

        let stats = self.compute_statistics();

        report.push_str(&format!(
            "{:<20} {:>6} {:>12} {:>12} {:>12} {:>12} {:>10}\n",
            "Algorithm", "Runs", "Best", "Average", "Worst", "Std Dev", "Avg Time"
        ));
        report.push_str("-".repeat(90).as_str());
        report.push('\n');

        for stat in &stats {
            report.push_str(&format!(
                "{:<20} {:>6} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>10.4}\n",
                stat.algorithm,
                stat.num_runs,
                stat.best_length,
                stat.avg_length,
                stat.worst_length,
                stat.std_length,
                stat.avg_time
            ));
        }

        report.push_str("-".repeat(90).as_str());
        report.push('\n');

        report
    }

    /// Get all results
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }
}

/// Load every `.csv` instance in a directory, sorted by dimension.
pub fn load_instances_from_dir<P: AsRef<Path>>(dir: P) -> Vec<TspInstance> {
    let mut instances = Vec::new();

    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map(|e| e == "csv").unwrap_or(false) {
                match TspInstance::from_file(&path) {
                    Ok(instance) => instances.push(instance),
                    Err(e) => log::warn!("skipping {:?}: {}", path, e),
                }
            }
        }
    }

    instances.sort_by_key(|i| i.dimension());

    instances
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> TspInstance {
        TspInstance::from_points("square", &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)])
    }

    #[test]
    fn test_benchmark_config() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.insertion_runs, 10);
    }

    #[test]
    fn test_run_comparison_collects_all_runs() {
        let instance = unit_square();
        let mut benchmark = Benchmark::new(BenchmarkConfig::default());
        benchmark.run_comparison(&instance).unwrap();

        // One NN run plus ten insertion runs.
        assert_eq!(benchmark.results().len(), 11);

        let nn_runs = benchmark
            .results()
            .iter()
            .filter(|r| r.algorithm == "NearestNeighbor")
            .count();
        assert_eq!(nn_runs, 1);

        // Every heuristic finds the square perimeter.
        for result in benchmark.results() {
            assert!((result.length - 4.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_statistics_aggregation() {
        let instance = unit_square();
        let mut benchmark = Benchmark::new(BenchmarkConfig::default());
        benchmark.run_comparison(&instance).unwrap();

        let stats = benchmark.compute_statistics();
        assert_eq!(stats.len(), 2);

        let insertion = stats
            .iter()
            .find(|s| s.algorithm == "CheapestInsertion")
            .unwrap();
        assert_eq!(insertion.num_runs, 10);
        assert!((insertion.best_length - 4.0).abs() < 1e-9);
        assert!((insertion.avg_length - 4.0).abs() < 1e-9);
        assert!(insertion.std_length.abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_instance_propagates_error() {
        let instance = TspInstance::from_points("pair", &[(0.0, 0.0), (1.0, 0.0)]);
        let mut benchmark = Benchmark::new(BenchmarkConfig::default());
        assert!(benchmark.run_comparison(&instance).is_err());
    }
}
