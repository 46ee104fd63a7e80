//! Euclidean TSP Solver - Command Line Interface
//!
//! Constructive heuristics for the Euclidean Traveling Salesman Problem.

use clap::{Parser, Subcommand, ValueEnum};
use euclid_tsp_solver::benchmark::{Benchmark, BenchmarkConfig};
use euclid_tsp_solver::heuristics::construction::{
    CheapestInsertionHeuristic, ConstructionHeuristic, NearestNeighborHeuristic,
};
use euclid_tsp_solver::instance::TspInstance;
use euclid_tsp_solver::visualization::Visualizer;

use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "euclid-tsp-solver")]
#[command(version = "1.0")]
#[command(about = "Constructive heuristics for the Euclidean TSP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one tour with a single heuristic
    Solve {
        /// Semicolon-delimited coordinate file with x and y columns
        #[arg(short, long)]
        instance: PathBuf,

        /// Heuristic to use
        #[arg(short, long, value_enum, default_value = "nn")]
        algorithm: Algorithm,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Write the solution as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Generate SVG visualization next to the instance file
        #[arg(long)]
        visualize: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compare Nearest-Neighbor against repeated Cheapest-Insertion runs
    Compare {
        /// Semicolon-delimited coordinate file with x and y columns
        #[arg(short, long)]
        instance: PathBuf,

        /// Number of independent Cheapest-Insertion runs
        #[arg(short, long, default_value = "10")]
        runs: usize,

        /// Base random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output CSV file for the raw run results
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print statistics about an instance
    Analyze {
        /// Semicolon-delimited coordinate file with x and y columns
        #[arg(short, long)]
        instance: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Algorithm {
    /// Nearest-Neighbor construction
    Nn,
    /// Cheapest-Insertion construction
    Insertion,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Solve {
            instance,
            algorithm,
            seed,
            output,
            visualize,
            verbose,
        } => solve_instance(&instance, algorithm, seed, output, visualize, verbose),

        Commands::Compare {
            instance,
            runs,
            seed,
            output,
        } => compare_heuristics(&instance, runs, seed, output),

        Commands::Analyze { instance } => analyze_instance(&instance),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn solve_instance(
    path: &PathBuf,
    algorithm: Algorithm,
    seed: u64,
    output: Option<PathBuf>,
    visualize: bool,
    verbose: bool,
) -> euclid_tsp_solver::Result<()> {
    let instance = TspInstance::from_file(path)?;

    if verbose {
        println!("{}", instance.statistics());
    }

    let heuristic: Box<dyn ConstructionHeuristic> = match algorithm {
        Algorithm::Nn => Box::new(NearestNeighborHeuristic::with_seed(seed)),
        Algorithm::Insertion => Box::new(CheapestInsertionHeuristic::with_seed(seed)),
    };

    let solution = heuristic.construct(&instance)?;

    println!("\n========== Results ==========");
    println!("Algorithm: {}", solution.algorithm);
    println!("Tour length: {:.2}", solution.length);
    println!("Time: {:.4}s", solution.computation_time);

    if verbose {
        println!("\nTour: {:?}", solution.tour);
    }

    if let Some(out_path) = output {
        let json = serde_json::to_string_pretty(&solution)?;
        std::fs::write(&out_path, json)?;
        println!("\nSolution saved to {:?}", out_path);
    }

    if visualize {
        let viz = Visualizer::new();
        let svg = viz.generate_svg(&instance, &solution);
        let svg_path = path.with_extension("svg");
        viz.save_svg(&svg, &svg_path)?;
        println!("Visualization saved to {:?}", svg_path);
    }

    Ok(())
}

fn compare_heuristics(
    path: &PathBuf,
    runs: usize,
    seed: u64,
    output: Option<PathBuf>,
) -> euclid_tsp_solver::Result<()> {
    let instance = TspInstance::from_file(path)?;

    println!(
        "Comparing heuristics on {} (n={})...\n",
        instance.name,
        instance.dimension()
    );

    let config = BenchmarkConfig {
        insertion_runs: runs,
        seed,
    };
    let mut benchmark = Benchmark::new(config);
    benchmark.run_comparison(&instance)?;

    let nn_length = benchmark
        .results()
        .iter()
        .find(|r| r.algorithm == "NearestNeighbor")
        .map(|r| r.length);
    let insertion_lengths: Vec<f64> = benchmark
        .results()
        .iter()
        .filter(|r| r.algorithm == "CheapestInsertion")
        .map(|r| r.length)
        .collect();

    if let Some(length) = nn_length {
        println!("NearestNeighbor length: {:.2}", length);
    }
    println!(
        "CheapestInsertion lengths over {} runs: {:?}",
        insertion_lengths.len(),
        insertion_lengths
            .iter()
            .map(|l| (l * 100.0).round() / 100.0)
            .collect::<Vec<_>>()
    );

    println!("\n{}", benchmark.generate_report());

    if let Some(out_path) = output {
        benchmark.export_to_csv(&out_path)?;
        println!("Results exported to {:?}", out_path);
    }

    Ok(())
}

fn analyze_instance(path: &PathBuf) -> euclid_tsp_solver::Result<()> {
    let instance = TspInstance::from_file(path)?;

    println!("========== Instance Analysis ==========\n");
    println!("{}", instance.statistics());

    // Quick single-run estimate for scale.
    let nn = NearestNeighborHeuristic::new();
    let solution = nn.construct(&instance)?;
    println!(
        "\nQuick estimate (NearestNeighbor): {:.2} in {:.4}s",
        solution.length, solution.computation_time
    );

    Ok(())
}
