//! Pheromone reinforcement.
//!
//! One call per iteration: evaporate the whole field, then deposit
//! `deposit_factor / length` on every edge of every tour in the batch, in
//! both directions. Evaporation strictly precedes all deposits of the
//! iteration; the exclusive field borrow serializes the writes.

use crate::graph::GraphView;
use crate::pheromone::PheromoneField;
use crate::tour::tour_length;

/// Applies the evaporation/deposit cycle to a batch of tours.
#[derive(Debug, Clone)]
pub struct PheromoneUpdateEngine {
    pub evaporation_rate: f64,
    pub deposit_factor: f64,
    pub closed_tour: bool,
}

impl PheromoneUpdateEngine {
    pub fn new(evaporation_rate: f64, deposit_factor: f64, closed_tour: bool) -> Self {
        PheromoneUpdateEngine { evaporation_rate, deposit_factor, closed_tour }
    }

    /// Evaporate once over the entire field, then deposit each tour's
    /// reinforcement. Tours that cannot be evaluated (single-vertex
    /// candidates, or a requested closing edge the graph lacks) are reported
    /// and skipped; they must not contribute deposits.
    pub fn update<G: GraphView>(
        &self,
        graph: &G,
        pheromone: &mut G::Pheromone,
        tours: &[Vec<usize>],
    ) {
        pheromone.evaporate(self.evaporation_rate);

        for tour in tours {
            let length = match tour_length(graph, tour, self.closed_tour) {
                Ok(length) => length,
                Err(e) => {
                    log::warn!("skipping pheromone deposit: {}", e);
                    continue;
                }
            };

            let amount = self.deposit_factor / length;
            for pair in tour.windows(2) {
                // Trails are undirected regardless of the graph's direction.
                pheromone.deposit(pair[0], pair[1], amount);
                pheromone.deposit(pair[1], pair[0], amount);
            }
            if self.closed_tour {
                let last = tour[tour.len() - 1];
                let first = tour[0];
                pheromone.deposit(last, first, amount);
                pheromone.deposit(first, last, amount);
            }
        }
    }
}
