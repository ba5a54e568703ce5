//! ACO Solver - Command Line Interface
//!
//! Ant colony optimization for short tours over randomly generated
//! weighted graphs.

use clap::{Parser, Subcommand, ValueEnum};

use aco_solver::benchmark::{Sweep, SweepConfig};
use aco_solver::colony::{ColonyConfig, ColonyEngine, ColonyOptimizer, RunResult};
use aco_solver::generator::GraphGenerator;
use aco_solver::graph::GraphView;
use aco_solver::CudaColonyOptimizer;

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aco-solver")]
#[command(version = "1.0")]
#[command(about = "Ant colony optimization over generated weighted graphs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a graph and run the optimizer on it
    Solve {
        /// Number of vertices
        #[arg(short = 'n', long, default_value = "50")]
        vertices: usize,

        /// Edge density in [0, 1]
        #[arg(short, long, default_value = "0.6")]
        density: f64,

        /// Graph representation
        #[arg(long, value_enum, default_value = "dense")]
        representation: ReprArg,

        /// Engine to run
        #[arg(short, long, value_enum, default_value = "cpu")]
        engine: Engine,

        /// Number of ants per iteration
        #[arg(short, long, default_value = "20")]
        ants: usize,

        /// Number of iterations
        #[arg(short, long, default_value = "100")]
        iterations: usize,

        /// Pheromone importance
        #[arg(long, default_value = "1.0")]
        alpha: f64,

        /// Heuristic importance
        #[arg(long, default_value = "2.5")]
        beta: f64,

        /// Evaporation rate
        #[arg(long, default_value = "0.1")]
        rho: f64,

        /// Initial pheromone level
        #[arg(long, default_value = "1.0")]
        initial_pheromone: f64,

        /// Deposit numerator (each tour deposits this divided by its length)
        #[arg(long, default_value = "1000.0")]
        deposit_factor: f64,

        /// Evaluate tours as closed cycles
        #[arg(long)]
        closed: bool,

        /// Random seed (graph and colony)
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Explicit path to the CUDA kernel module
        #[arg(long)]
        module_path: Option<PathBuf>,

        /// Write the result as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Sweep graph sizes and densities with both representations
    Sweep {
        /// Graph sizes, comma separated
        #[arg(long, value_delimiter = ',', default_value = "25,50,100")]
        sizes: Vec<usize>,

        /// Edge densities, comma separated
        #[arg(long, value_delimiter = ',', default_value = "0.3,0.6,0.9")]
        densities: Vec<f64>,

        /// Runs per cell
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Number of ants per iteration
        #[arg(short, long, default_value = "20")]
        ants: usize,

        /// Number of iterations
        #[arg(short, long, default_value = "100")]
        iterations: usize,

        /// Run cells sequentially instead of in parallel
        #[arg(long)]
        sequential: bool,

        /// Output directory for CSV exports
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum ReprArg {
    /// Adjacency matrix
    Dense,
    /// Adjacency lists
    Sparse,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Engine {
    /// Sequential engine on the host
    Cpu,
    /// CUDA-offloaded engine (requires the dense representation)
    Cuda,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            vertices,
            density,
            representation,
            engine,
            ants,
            iterations,
            alpha,
            beta,
            rho,
            initial_pheromone,
            deposit_factor,
            closed,
            seed,
            module_path,
            output,
            verbose,
        } => {
            let config = ColonyConfig {
                ants,
                iterations,
                alpha,
                beta,
                evaporation_rate: rho,
                initial_pheromone,
                deposit_factor,
                closed_tour: closed,
                seed,
            };
            solve(vertices, density, representation, engine, config, module_path, output, verbose);
        }

        Commands::Sweep { sizes, densities, runs, ants, iterations, sequential, output } => {
            run_sweep(sizes, densities, runs, ants, iterations, !sequential, &output);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn solve(
    vertices: usize,
    density: f64,
    representation: ReprArg,
    engine: Engine,
    config: ColonyConfig,
    module_path: Option<PathBuf>,
    output: Option<PathBuf>,
    verbose: bool,
) {
    if !(0.0..=1.0).contains(&density) {
        eprintln!("Error: density {} is outside [0, 1]", density);
        std::process::exit(1);
    }

    println!(
        "Generating {} graph (n={}, density={}, seed={})...",
        match representation {
            ReprArg::Dense => "dense",
            ReprArg::Sparse => "sparse",
        },
        vertices,
        density,
        config.seed
    );
    let generator = GraphGenerator::new(vertices, density, config.seed);

    let result = match (engine, representation) {
        (Engine::Cpu, ReprArg::Dense) => run_sequential(generator.dense(), config, verbose),
        (Engine::Cpu, ReprArg::Sparse) => run_sequential(generator.sparse(), config, verbose),
        (Engine::Cuda, ReprArg::Dense) => {
            let optimizer = CudaColonyOptimizer::new(generator.dense(), config, module_path);
            match optimizer.and_then(|mut o| o.run()) {
                Ok(result) => result,
                Err(e) => {
                    eprintln!("CUDA engine error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        (Engine::Cuda, ReprArg::Sparse) => {
            eprintln!("Error: the CUDA engine requires the dense representation");
            std::process::exit(1);
        }
    };

    println!("\n========== Results ==========");
    print!("{}", result);

    if verbose {
        println!("\nTour: {:?}", result.best_tour);
        println!("History (last 10): {:?}", last_n(&result.history, 10));
    }

    if let Some(out_path) = output {
        let json = match serde_json::to_string_pretty(&result) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Error serializing result: {}", e);
                std::process::exit(1);
            }
        };
        if let Err(e) = std::fs::write(&out_path, json) {
            eprintln!("Error writing {:?}: {}", out_path, e);
            std::process::exit(1);
        }
        println!("\nResult saved to {:?}", out_path);
    }
}

fn run_sequential<G: GraphView>(graph: G, config: ColonyConfig, verbose: bool) -> RunResult {
    if verbose {
        println!("Colony config: {:?}", config);
    }
    let mut optimizer = match ColonyOptimizer::new(graph, config) {
        Ok(optimizer) => optimizer,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    optimizer.optimize()
}

fn run_sweep(
    sizes: Vec<usize>,
    densities: Vec<f64>,
    runs: usize,
    ants: usize,
    iterations: usize,
    parallel: bool,
    output: &PathBuf,
) {
    let config = SweepConfig {
        sizes,
        densities,
        runs,
        colony: ColonyConfig { ants, iterations, ..Default::default() },
        parallel,
        output_dir: output.to_string_lossy().to_string(),
    };

    let mut sweep = Sweep::new(config);
    sweep.run();

    println!("\n{}", sweep.generate_report());

    if let Err(e) = sweep.save() {
        eprintln!("Error writing results to {:?}: {}", output, e);
        std::process::exit(1);
    }
    println!("Records, statistics, and report saved to {:?}", output);
}

fn last_n(history: &[f64], n: usize) -> &[f64] {
    &history[history.len().saturating_sub(n)..]
}
