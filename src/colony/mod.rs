//! Colony orchestration: configuration, the engine seam, and the two
//! interchangeable orchestrators (sequential and CUDA-offloaded).

pub mod construct;
pub mod sequential;
pub mod update;

pub use construct::TourConstructor;
pub use sequential::ColonyOptimizer;
pub use update::PheromoneUpdateEngine;

use serde::{Deserialize, Serialize};

/// ACO run parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColonyConfig {
    /// Number of ants per iteration
    pub ants: usize,
    /// Number of iterations
    pub iterations: usize,
    /// Pheromone importance (alpha)
    pub alpha: f64,
    /// Heuristic importance (beta)
    pub beta: f64,
    /// Evaporation rate (rho), in [0, 1]
    pub evaporation_rate: f64,
    /// Initial pheromone level (Q0)
    pub initial_pheromone: f64,
    /// Deposit numerator: each tour deposits `deposit_factor / length`
    pub deposit_factor: f64,
    /// Evaluate tours as closed cycles (include the edge back to the start)
    pub closed_tour: bool,
    /// Random seed
    pub seed: u64,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        ColonyConfig {
            ants: 20,
            iterations: 100,
            alpha: 1.0,
            beta: 2.5,
            evaporation_rate: 0.1,
            initial_pheromone: 1.0,
            deposit_factor: 1000.0,
            closed_tour: false,
            seed: 42,
        }
    }
}

impl ColonyConfig {
    /// Reject malformed configurations before any run starts.
    pub fn validate(&self, vertices: usize) -> Result<(), ConfigError> {
        if vertices == 0 {
            return Err(ConfigError::NoVertices);
        }
        if self.ants == 0 {
            return Err(ConfigError::NoAnts);
        }
        if self.iterations == 0 {
            return Err(ConfigError::NoIterations);
        }
        if !(0.0..=1.0).contains(&self.evaporation_rate) {
            return Err(ConfigError::EvaporationOutOfRange(self.evaporation_rate));
        }
        if !self.alpha.is_finite() || !self.beta.is_finite() {
            return Err(ConfigError::NonFiniteExponent);
        }
        if !self.initial_pheromone.is_finite() || self.initial_pheromone < 0.0 {
            return Err(ConfigError::InvalidInitialPheromone(self.initial_pheromone));
        }
        if !self.deposit_factor.is_finite() || self.deposit_factor <= 0.0 {
            return Err(ConfigError::InvalidDepositFactor(self.deposit_factor));
        }
        Ok(())
    }
}

/// Configuration rejected before a run.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NoVertices,
    NoAnts,
    NoIterations,
    EvaporationOutOfRange(f64),
    NonFiniteExponent,
    InvalidInitialPheromone(f64),
    InvalidDepositFactor(f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NoVertices => write!(f, "graph must have at least one vertex"),
            ConfigError::NoAnts => write!(f, "ant count must be positive"),
            ConfigError::NoIterations => write!(f, "iteration count must be positive"),
            ConfigError::EvaporationOutOfRange(rho) => {
                write!(f, "evaporation rate {} is outside [0, 1]", rho)
            }
            ConfigError::NonFiniteExponent => write!(f, "alpha and beta must be finite"),
            ConfigError::InvalidInitialPheromone(q0) => {
                write!(f, "initial pheromone {} must be finite and non-negative", q0)
            }
            ConfigError::InvalidDepositFactor(k) => {
                write!(f, "deposit factor {} must be finite and positive", k)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Lifecycle of one optimizer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColonyState {
    Idle,
    Running,
    Converged,
}

/// Outcome of one optimization run.
///
/// `best_length` is `+inf` (and `best_tour` empty) when no tour with at
/// least one edge was ever constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Best tour found, possibly shorter than `n`
    pub best_tour: Vec<usize>,
    /// Length of the best tour
    pub best_length: f64,
    /// Iterations executed
    pub iterations: usize,
    /// Best length recorded after each iteration (non-increasing)
    pub history: Vec<f64>,
    /// Engine that produced this result
    pub engine: String,
    /// Computation time in seconds
    pub computation_time: f64,
}

impl std::fmt::Display for RunResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Run ({})", self.engine)?;
        writeln!(f, "  Best length: {:.2}", self.best_length)?;
        writeln!(f, "  Vertices visited: {}", self.best_tour.len())?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)
    }
}

/// Seam shared by the sequential and accelerated orchestrators: both expose
/// the same contract (best tour and best length after `iterations`
/// iterations), so the caller can swap engines without touching the
/// construction or update logic.
pub trait ColonyEngine {
    fn run(&mut self) -> Result<RunResult, String>;
}
