//! Seeded random graph generation.
//!
//! Each directed edge exists with probability `density`; weights are uniform
//! in [1, 10] rounded to two decimals. `dense()` and `sparse()` for the same
//! generator describe the identical graph, and the sparse lists are built in
//! index order so both representations iterate neighbors identically.

use crate::graph::{DenseGraph, SparseGraph};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Random graph generator with a fixed seed.
#[derive(Debug, Clone)]
pub struct GraphGenerator {
    pub vertices: usize,
    pub density: f64,
    pub seed: u64,
}

impl GraphGenerator {
    pub fn new(vertices: usize, density: f64, seed: u64) -> Self {
        GraphGenerator { vertices, density, seed }
    }

    fn matrix(&self) -> Vec<Vec<f64>> {
        let n = self.vertices;
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut weights = vec![vec![0.0; n]; n];

        for (i, row) in weights.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                // Strict comparison: density 0.0 can never produce an edge,
                // even when the draw is exactly 0.0.
                if i != j && rng.gen::<f64>() < self.density {
                    let weight = 1.0 + rng.gen::<f64>() * 9.0;
                    *cell = (weight * 100.0).round() / 100.0;
                }
            }
        }

        weights
    }

    /// Generate the dense matrix form.
    pub fn dense(&self) -> DenseGraph {
        DenseGraph::from_parts(self.matrix())
    }

    /// Generate the adjacency-list form of the same graph.
    pub fn sparse(&self) -> SparseGraph {
        let matrix = self.matrix();
        let adjacency = matrix
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|&(_, &w)| w > 0.0)
                    .map(|(j, &w)| (j, w))
                    .collect()
            })
            .collect();
        SparseGraph::from_parts(adjacency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphView;

    #[test]
    fn test_same_seed_same_graph() {
        let gen = GraphGenerator::new(12, 0.5, 7);
        let a = gen.dense();
        let b = gen.dense();
        for u in 0..12 {
            for v in 0..12 {
                assert_eq!(a.weight(u, v), b.weight(u, v));
            }
        }
    }

    #[test]
    fn test_dense_and_sparse_describe_one_graph() {
        let gen = GraphGenerator::new(15, 0.4, 99);
        let dense = gen.dense();
        let sparse = gen.sparse();

        assert_eq!(dense.vertex_count(), sparse.vertex_count());
        for u in 0..15 {
            assert_eq!(dense.weight(u, u), 0.0);
            let d: Vec<_> = dense.neighbors(u).collect();
            let s: Vec<_> = sparse.neighbors(u).collect();
            assert_eq!(d, s);
        }
    }

    #[test]
    fn test_weights_in_range() {
        let gen = GraphGenerator::new(20, 1.0, 3);
        let g = gen.dense();
        for u in 0..20 {
            for (v, w) in g.neighbors(u) {
                assert_ne!(u, v);
                assert!((1.0..=10.0).contains(&w), "weight {} out of range", w);
            }
        }
    }

    #[test]
    fn test_density_extremes() {
        for seed in 0..50 {
            let empty = GraphGenerator::new(10, 0.0, seed).dense();
            assert_eq!(empty.edge_count(), 0);
        }

        let full = GraphGenerator::new(10, 1.0, 1).dense();
        assert_eq!(full.edge_count(), 10 * 9);
    }
}
