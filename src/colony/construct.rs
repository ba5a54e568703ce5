//! Stochastic tour construction.
//!
//! One ant builds one candidate tour by roulette-wheel selection over the
//! feasible neighbors of its current vertex, weighted by
//! `pheromone^alpha * (1/distance)^beta`.

use crate::graph::GraphView;
use crate::pheromone::PheromoneField;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Builds candidate tours against a read-only pheromone view.
///
/// The shared references enforce that construction never mutates the field;
/// all writes happen later in the update phase. Start vertex selection and
/// RNG ownership belong to the caller so the sequential and accelerated
/// orchestrators share one contract.
pub struct TourConstructor<'a, G: GraphView> {
    graph: &'a G,
    pheromone: &'a G::Pheromone,
    alpha: f64,
    beta: f64,
}

impl<'a, G: GraphView> TourConstructor<'a, G> {
    pub fn new(graph: &'a G, pheromone: &'a G::Pheromone, alpha: f64, beta: f64) -> Self {
        TourConstructor { graph, pheromone, alpha, beta }
    }

    /// Construct one tour from `start`.
    ///
    /// Stops early (returning the partial tour, never an error) when the
    /// feasible set is empty or carries no usable weight. Every vertex
    /// appears at most once.
    pub fn construct(&self, start: usize, rng: &mut ChaCha8Rng) -> Vec<usize> {
        let n = self.graph.vertex_count();
        let mut tour = Vec::with_capacity(n);
        tour.push(start);
        let mut visited = vec![false; n];
        visited[start] = true;

        let mut current = start;
        let mut candidates: Vec<(usize, f64)> = Vec::new();

        while tour.len() < n {
            candidates.clear();
            let mut total = 0.0;

            for (v, distance) in self.graph.neighbors(current) {
                // Feasible set: unvisited, positive distance (re-checked here
                // even though neighbors() already filters zero weights).
                if visited[v] || distance <= 0.0 {
                    continue;
                }
                let tau = self.pheromone.get(current, v).powf(self.alpha);
                let eta = (1.0 / distance).powf(self.beta);
                let weight = tau * eta;
                if !weight.is_finite() {
                    continue;
                }
                candidates.push((v, weight));
                total += weight;
            }

            if candidates.is_empty() || total <= 0.0 {
                break;
            }

            let r = rng.gen::<f64>() * total;
            let next = roulette_pick(&candidates, r);

            tour.push(next);
            visited[next] = true;
            current = next;
        }

        tour
    }
}

/// Standard roulette-wheel selection: walk the candidates in their fixed
/// order and take the first whose running sum reaches `r`. Ties on the
/// boundary resolve to the earlier candidate, which keeps selection
/// deterministic for a given draw.
fn roulette_pick(candidates: &[(usize, f64)], r: f64) -> usize {
    let mut cumulative = 0.0;
    for &(v, weight) in candidates {
        cumulative += weight;
        if cumulative >= r {
            return v;
        }
    }
    // Floating-point drift can leave the running sum a hair under r.
    candidates[candidates.len() - 1].0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DenseGraph, GraphView, SparseGraph};

    fn seeded(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn test_roulette_boundary_picks_first_in_order() {
        // Equal weights, draw lands exactly on the boundary between the two:
        // the earlier candidate crosses the threshold first.
        let candidates = vec![(7, 1.0), (9, 1.0)];
        assert_eq!(roulette_pick(&candidates, 1.0), 7);
        assert_eq!(roulette_pick(&candidates, 0.0), 7);
        assert_eq!(roulette_pick(&candidates, 1.5), 9);
    }

    #[test]
    fn test_roulette_drift_falls_back_to_last() {
        let candidates = vec![(1, 0.3), (2, 0.3)];
        assert_eq!(roulette_pick(&candidates, 0.6000000001), 2);
    }

    #[test]
    fn test_complete_graph_yields_full_tour() {
        // 4-vertex complete symmetric graph, all edges = 1.
        let mut m = vec![vec![1.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            row[i] = 0.0;
        }
        let g = DenseGraph::new(m).unwrap();
        let p = g.init_pheromone(0.1);
        let constructor = TourConstructor::new(&g, &p, 1.0, 1.0);

        let mut rng = seeded(42);
        let tour = constructor.construct(0, &mut rng);
        assert_eq!(tour.len(), 4);

        let mut seen = vec![false; 4];
        for &v in &tour {
            assert!(!seen[v], "vertex {} repeated", v);
            seen[v] = true;
        }
    }

    #[test]
    fn test_directed_path_completes_then_stops() {
        // 0 -> 1 -> 2 with no way back: the only possible tour from 0.
        let g = SparseGraph::new(vec![vec![(1, 1.0)], vec![(2, 1.0)], vec![]]).unwrap();
        let p = g.init_pheromone(1.0);
        let constructor = TourConstructor::new(&g, &p, 1.0, 1.0);

        let mut rng = seeded(0);
        assert_eq!(constructor.construct(0, &mut rng), vec![0, 1, 2]);
    }

    #[test]
    fn test_isolated_start_yields_singleton() {
        let mut adjacency = vec![vec![(0, 1.0)]; 6];
        adjacency[5] = Vec::new(); // vertex 5 has no outgoing edges
        let g = SparseGraph::new(adjacency).unwrap();
        let p = g.init_pheromone(1.0);
        let constructor = TourConstructor::new(&g, &p, 1.0, 1.0);

        let mut rng = seeded(1);
        assert_eq!(constructor.construct(5, &mut rng), vec![5]);
    }

    #[test]
    fn test_zero_pheromone_stops_construction() {
        // Q0 = 0 with alpha > 0 zeroes every weight; S <= 0 ends the tour.
        let g = SparseGraph::new(vec![vec![(1, 1.0)], vec![(0, 1.0)]]).unwrap();
        let p = g.init_pheromone(0.0);
        let constructor = TourConstructor::new(&g, &p, 1.0, 1.0);

        let mut rng = seeded(2);
        assert_eq!(constructor.construct(0, &mut rng), vec![0]);
    }

    #[test]
    fn test_same_seed_same_tour() {
        let gen = crate::generator::GraphGenerator::new(30, 0.6, 11);
        let g = gen.dense();
        let p = g.init_pheromone(0.5);
        let constructor = TourConstructor::new(&g, &p, 1.0, 2.0);

        let a = constructor.construct(3, &mut seeded(9));
        let b = constructor.construct(3, &mut seeded(9));
        assert_eq!(a, b);
    }
}
