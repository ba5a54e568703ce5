//! Sequential colony orchestrator.
//!
//! One logical thread of control per run: ants construct tours one at a time
//! against a read-only pheromone view, then the whole batch is handed to the
//! update engine. The optimizer owns the pheromone field and the per-run RNG
//! for the run's entire lifetime.

use crate::colony::{
    ColonyConfig, ColonyEngine, ColonyState, ConfigError, PheromoneUpdateEngine, RunResult,
    TourConstructor,
};
use crate::graph::GraphView;
use crate::tour::tour_length;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Ant colony optimizer over either graph representation.
pub struct ColonyOptimizer<G: GraphView> {
    config: ColonyConfig,
    graph: G,
    pheromone: G::Pheromone,
    best_tour: Vec<usize>,
    best_length: f64,
    state: ColonyState,
    rng: ChaCha8Rng,
}

impl<G: GraphView> ColonyOptimizer<G> {
    /// Validate the configuration and initialize the pheromone field.
    pub fn new(graph: G, config: ColonyConfig) -> Result<Self, ConfigError> {
        config.validate(graph.vertex_count())?;
        let pheromone = graph.init_pheromone(config.initial_pheromone);
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        Ok(ColonyOptimizer {
            config,
            graph,
            pheromone,
            best_tour: Vec::new(),
            best_length: f64::INFINITY,
            state: ColonyState::Idle,
            rng,
        })
    }

    /// Run the configured number of iterations and return the global best.
    pub fn optimize(&mut self) -> RunResult {
        let start = std::time::Instant::now();
        self.state = ColonyState::Running;

        let n = self.graph.vertex_count();
        let update = PheromoneUpdateEngine::new(
            self.config.evaporation_rate,
            self.config.deposit_factor,
            self.config.closed_tour,
        );
        let mut history = Vec::with_capacity(self.config.iterations);

        for iteration in 0..self.config.iterations {
            let mut tours = Vec::with_capacity(self.config.ants);

            // Construction phase: read-only pheromone access, one ant at a
            // time sharing the run's RNG.
            {
                let constructor = TourConstructor::new(
                    &self.graph,
                    &self.pheromone,
                    self.config.alpha,
                    self.config.beta,
                );

                for _ in 0..self.config.ants {
                    let start_vertex = self.rng.gen_range(0..n);
                    let tour = constructor.construct(start_vertex, &mut self.rng);

                    match tour_length(&self.graph, &tour, self.config.closed_tour) {
                        Ok(length) if length < self.best_length => {
                            self.best_length = length;
                            self.best_tour = tour.clone();
                        }
                        // Ties keep the earlier tour; unevaluable candidates
                        // stay in the batch but never become the best.
                        _ => {}
                    }

                    tours.push(tour);
                }
            }

            // Reinforcement phase: exclusive field access.
            update.update(&self.graph, &mut self.pheromone, &tours);

            history.push(self.best_length);
            log::debug!("iteration {}: best length {:.2}", iteration, self.best_length);
        }

        self.state = ColonyState::Converged;

        RunResult {
            best_tour: self.best_tour.clone(),
            best_length: self.best_length,
            iterations: self.config.iterations,
            history,
            engine: "sequential".to_string(),
            computation_time: start.elapsed().as_secs_f64(),
        }
    }

    pub fn state(&self) -> ColonyState {
        self.state
    }

    pub fn best_tour(&self) -> &[usize] {
        &self.best_tour
    }

    pub fn best_length(&self) -> f64 {
        self.best_length
    }

    pub fn pheromone(&self) -> &G::Pheromone {
        &self.pheromone
    }
}

impl<G: GraphView> ColonyEngine for ColonyOptimizer<G> {
    fn run(&mut self) -> Result<RunResult, String> {
        Ok(self.optimize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GraphGenerator;
    use crate::graph::DenseGraph;
    use crate::pheromone::PheromoneField;

    fn complete4() -> DenseGraph {
        let mut m = vec![vec![1.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            row[i] = 0.0;
        }
        DenseGraph::new(m).unwrap()
    }

    #[test]
    fn test_single_iteration_on_complete_graph() {
        let config = ColonyConfig {
            ants: 1,
            iterations: 1,
            alpha: 1.0,
            beta: 1.0,
            evaporation_rate: 0.0,
            initial_pheromone: 0.1,
            deposit_factor: 1000.0,
            closed_tour: false,
            seed: 42,
        };
        let mut optimizer = ColonyOptimizer::new(complete4(), config).unwrap();
        assert_eq!(optimizer.state(), ColonyState::Idle);

        let result = optimizer.optimize();
        assert_eq!(optimizer.state(), ColonyState::Converged);
        assert_eq!(result.best_tour.len(), 4);
        assert!((result.best_length - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_closed_tour_length_on_complete_graph() {
        let config = ColonyConfig {
            ants: 1,
            iterations: 1,
            closed_tour: true,
            ..Default::default()
        };
        let mut optimizer = ColonyOptimizer::new(complete4(), config).unwrap();
        let result = optimizer.optimize();
        assert!((result.best_length - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_best_length_is_monotonic() {
        let graph = GraphGenerator::new(25, 0.7, 5).dense();
        let config = ColonyConfig { ants: 8, iterations: 30, ..Default::default() };
        let mut optimizer = ColonyOptimizer::new(graph, config).unwrap();
        let result = optimizer.optimize();

        assert_eq!(result.history.len(), 30);
        for window in result.history.windows(2) {
            assert!(window[1] <= window[0]);
        }
        assert_eq!(result.best_length, *result.history.last().unwrap());
    }

    #[test]
    fn test_pheromone_stays_non_negative() {
        let graph = GraphGenerator::new(20, 0.5, 13).sparse();
        let config = ColonyConfig { ants: 5, iterations: 20, ..Default::default() };
        let mut optimizer = ColonyOptimizer::new(graph, config).unwrap();
        optimizer.optimize();

        let field = optimizer.pheromone();
        for u in 0..20 {
            for v in 0..20 {
                assert!(field.get(u, v) >= 0.0);
            }
        }
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let config = ColonyConfig { ants: 6, iterations: 10, seed: 77, ..Default::default() };
        let graph = GraphGenerator::new(18, 0.6, 4);

        let a = ColonyOptimizer::new(graph.dense(), config.clone()).unwrap().optimize();
        let b = ColonyOptimizer::new(graph.dense(), config).unwrap().optimize();

        assert_eq!(a.best_tour, b.best_tour);
        assert_eq!(a.best_length, b.best_length);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_edgeless_graph_finds_nothing() {
        let graph = GraphGenerator::new(10, 0.0, 1).dense();
        let config = ColonyConfig { ants: 3, iterations: 2, ..Default::default() };
        let mut optimizer = ColonyOptimizer::new(graph, config).unwrap();
        let result = optimizer.optimize();

        assert!(result.best_tour.is_empty());
        assert_eq!(result.best_length, f64::INFINITY);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ColonyConfig { ants: 0, ..Default::default() };
        assert!(ColonyOptimizer::new(complete4(), config).is_err());
    }
}
