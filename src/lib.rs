//! ACO Solver Library
//!
//! Ant colony optimization for finding short tours that visit as many
//! vertices as possible in weighted graphs, directed or undirected.
//!
//! # Features
//!
//! - Dense (adjacency matrix) and sparse (adjacency list) graph
//!   representations behind one [`GraphView`] trait
//! - Seeded random graph generation producing identical graphs in both
//!   representations
//! - Sequential optimizer with roulette-wheel tour construction and
//!   evaporate-then-deposit pheromone reinforcement
//! - CUDA-offloaded optimizer behind the `cuda` feature, sharing the
//!   sequential engine's contract
//! - Parameter sweeps with CSV export and summary statistics
//!
//! # Example
//!
//! ```no_run
//! use aco_solver::colony::{ColonyConfig, ColonyOptimizer};
//! use aco_solver::generator::GraphGenerator;
//!
//! // Generate a graph
//! let graph = GraphGenerator::new(50, 0.6, 42).dense();
//!
//! // Run the optimizer
//! let config = ColonyConfig { ants: 20, iterations: 100, ..Default::default() };
//! let mut optimizer = ColonyOptimizer::new(graph, config).unwrap();
//! let result = optimizer.optimize();
//!
//! println!("Best length: {:.2}", result.best_length);
//! ```
//!
//! [`GraphView`]: graph::GraphView

pub mod accel;
pub mod benchmark;
pub mod colony;
pub mod generator;
pub mod graph;
pub mod pheromone;
pub mod tour;

pub use accel::CudaColonyOptimizer;
pub use colony::{ColonyConfig, ColonyEngine, ColonyOptimizer, RunResult};
pub use graph::{DenseGraph, GraphView, SparseGraph};
pub use pheromone::PheromoneField;
