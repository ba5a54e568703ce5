//! Pheromone fields paired with the graph representations.
//!
//! A field maps every edge present in the graph to a non-negative intensity.
//! Evaporation is a single bulk multiplicative pass; deposits are additive
//! point updates. Deposits targeting edges absent from the graph no-op (and
//! return `false`) so the field's support always equals the graph's edge set.

use crate::graph::{DenseGraph, GraphView, SparseGraph};

/// Mutable per-edge intensity, mirroring the paired graph's indexing scheme.
pub trait PheromoneField {
    /// Intensity stored for edge `(u, v)`; 0 for edges not in the graph.
    fn get(&self, u: usize, v: usize) -> f64;

    /// Multiply every stored intensity by `1 - rate`, touching each edge
    /// exactly once.
    fn evaporate(&mut self, rate: f64);

    /// Add `amount` to edge `(u, v)`. Returns `false` (without mutating
    /// anything) when `(u, v)` is not a graph edge. The field is
    /// direction-agnostic; symmetric trails are the caller's responsibility.
    fn deposit(&mut self, u: usize, v: usize, amount: f64) -> bool;
}

/// Matrix-shaped field for [`DenseGraph`], with an edge mask so deposits
/// cannot widen the support beyond the graph's edges.
#[derive(Debug, Clone)]
pub struct DensePheromone {
    n: usize,
    values: Vec<Vec<f64>>,
    edges: Vec<Vec<bool>>,
}

impl DensePheromone {
    /// Initialize every graph edge to `initial`; non-edges stay at 0.
    pub fn for_graph(graph: &DenseGraph, initial: f64) -> Self {
        let n = graph.vertex_count();
        let mut values = vec![vec![0.0; n]; n];
        let mut edges = vec![vec![false; n]; n];
        for u in 0..n {
            for v in 0..n {
                if graph.weight(u, v) > 0.0 {
                    values[u][v] = initial;
                    edges[u][v] = true;
                }
            }
        }
        DensePheromone { n, values, edges }
    }

    /// Row-major flattened copy for device upload.
    pub fn flatten(&self) -> Vec<f64> {
        let mut flat = Vec::with_capacity(self.n * self.n);
        for row in &self.values {
            flat.extend_from_slice(row);
        }
        flat
    }

    /// Overwrite intensities from a row-major device download. Cells outside
    /// the edge mask are ignored to keep the support invariant.
    pub fn load_flat(&mut self, flat: &[f64]) {
        debug_assert_eq!(flat.len(), self.n * self.n);
        for u in 0..self.n {
            for v in 0..self.n {
                if self.edges[u][v] {
                    self.values[u][v] = flat[u * self.n + v];
                }
            }
        }
    }
}

impl PheromoneField for DensePheromone {
    #[inline]
    fn get(&self, u: usize, v: usize) -> f64 {
        self.values[u][v]
    }

    fn evaporate(&mut self, rate: f64) {
        let keep = 1.0 - rate;
        for row in &mut self.values {
            for value in row {
                *value *= keep;
            }
        }
    }

    fn deposit(&mut self, u: usize, v: usize, amount: f64) -> bool {
        if u >= self.n || v >= self.n || !self.edges[u][v] {
            return false;
        }
        self.values[u][v] += amount;
        true
    }
}

/// Adjacency-shaped field for [`SparseGraph`], entries in the same insertion
/// order as the graph's lists.
#[derive(Debug, Clone)]
pub struct SparsePheromone {
    trails: Vec<Vec<(usize, f64)>>,
}

impl SparsePheromone {
    /// One trail entry per graph edge, all set to `initial`.
    pub fn for_graph(graph: &SparseGraph, initial: f64) -> Self {
        let trails = graph
            .adjacency()
            .iter()
            .map(|list| list.iter().map(|&(v, _)| (v, initial)).collect())
            .collect();
        SparsePheromone { trails }
    }
}

impl PheromoneField for SparsePheromone {
    fn get(&self, u: usize, v: usize) -> f64 {
        self.trails
            .get(u)
            .and_then(|list| list.iter().find(|&&(to, _)| to == v))
            .map(|&(_, tau)| tau)
            .unwrap_or(0.0)
    }

    fn evaporate(&mut self, rate: f64) {
        let keep = 1.0 - rate;
        for list in &mut self.trails {
            for (_, tau) in list {
                *tau *= keep;
            }
        }
    }

    fn deposit(&mut self, u: usize, v: usize, amount: f64) -> bool {
        let Some(list) = self.trails.get_mut(u) else {
            return false;
        };
        match list.iter_mut().find(|&&mut (to, _)| to == v) {
            Some((_, tau)) => {
                *tau += amount;
                true
            }
            // Never create entries for edges absent from the graph.
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DenseGraph, SparseGraph};

    fn dense_pair() -> (DenseGraph, DensePheromone) {
        let g = DenseGraph::new(vec![
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 2.0],
            vec![0.0, 2.0, 0.0],
        ])
        .unwrap();
        let p = g.init_pheromone(0.5);
        (g, p)
    }

    #[test]
    fn test_dense_init_matches_edge_set() {
        let (_, p) = dense_pair();
        assert_eq!(p.get(0, 1), 0.5);
        assert_eq!(p.get(1, 2), 0.5);
        assert_eq!(p.get(0, 2), 0.0);
        assert_eq!(p.get(0, 0), 0.0);
    }

    #[test]
    fn test_dense_deposit_on_missing_edge_noops() {
        let (_, mut p) = dense_pair();
        assert!(!p.deposit(0, 2, 10.0));
        assert_eq!(p.get(0, 2), 0.0);
        assert!(p.deposit(0, 1, 10.0));
        assert_eq!(p.get(0, 1), 10.5);
    }

    #[test]
    fn test_evaporation_is_multiplicative() {
        let (_, mut p) = dense_pair();
        p.evaporate(0.1);
        assert!((p.get(0, 1) - 0.45).abs() < 1e-12);
        p.evaporate(1.0);
        assert_eq!(p.get(0, 1), 0.0);
    }

    #[test]
    fn test_flatten_load_round_trip_respects_mask() {
        let (_, mut p) = dense_pair();
        let mut flat = p.flatten();
        // A download that sneaks a value into a non-edge cell is ignored.
        flat[2] = 99.0; // (0, 2) is not an edge
        flat[1] = 3.0; // (0, 1) is
        p.load_flat(&flat);
        assert_eq!(p.get(0, 2), 0.0);
        assert_eq!(p.get(0, 1), 3.0);
    }

    #[test]
    fn test_sparse_field_mirrors_adjacency() {
        let g = SparseGraph::new(vec![vec![(1, 1.0)], vec![(0, 1.0), (2, 2.0)], vec![]]).unwrap();
        let mut p = g.init_pheromone(1.0);

        assert_eq!(p.get(1, 2), 1.0);
        assert_eq!(p.get(2, 1), 0.0);

        assert!(p.deposit(1, 2, 0.5));
        assert_eq!(p.get(1, 2), 1.5);

        // No new entries for edges the graph does not have.
        assert!(!p.deposit(2, 1, 0.5));
        assert_eq!(p.get(2, 1), 0.0);

        p.evaporate(0.5);
        assert!((p.get(1, 2) - 0.75).abs() < 1e-12);
        assert!(p.get(0, 1) >= 0.0);
    }
}
