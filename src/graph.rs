//! Graph representations for the colony engines.
//!
//! Two interchangeable read-only views over a weighted directed graph:
//! a dense n×n matrix (0 = no edge) and a sparse adjacency list. Both expose
//! the same queries through [`GraphView`] so the construction and update
//! algorithms are written once, generic over the representation.

use crate::pheromone::{DensePheromone, PheromoneField, SparsePheromone};
use serde::{Deserialize, Serialize};

/// Which graph representation an experiment uses.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Representation {
    Dense,
    Sparse,
}

impl std::fmt::Display for Representation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Representation::Dense => write!(f, "dense"),
            Representation::Sparse => write!(f, "sparse"),
        }
    }
}

/// Errors raised while validating graph input.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// The graph has no vertices.
    Empty,
    /// A matrix row has the wrong length.
    NotSquare { row: usize, len: usize, expected: usize },
    /// A matrix entry is negative or non-finite.
    InvalidWeight { from: usize, to: usize, weight: f64 },
    /// An adjacency entry points outside `[0, n)`.
    NeighborOutOfRange { from: usize, to: usize, vertices: usize },
    /// An adjacency entry carries a weight that is not strictly positive.
    NonPositiveWeight { from: usize, to: usize, weight: f64 },
    /// The same neighbor appears twice in one adjacency list.
    DuplicateNeighbor { from: usize, to: usize },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::Empty => write!(f, "graph has no vertices"),
            GraphError::NotSquare { row, len, expected } => {
                write!(f, "matrix row {} has {} entries, expected {}", row, len, expected)
            }
            GraphError::InvalidWeight { from, to, weight } => {
                write!(f, "invalid weight {} on edge ({}, {})", weight, from, to)
            }
            GraphError::NeighborOutOfRange { from, to, vertices } => {
                write!(f, "neighbor {} of vertex {} is outside [0, {})", to, from, vertices)
            }
            GraphError::NonPositiveWeight { from, to, weight } => {
                write!(f, "non-positive weight {} on edge ({}, {})", weight, from, to)
            }
            GraphError::DuplicateNeighbor { from, to } => {
                write!(f, "neighbor {} listed twice for vertex {}", to, from)
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// Read-only access to edge weights, shared by both representations.
///
/// `neighbors` yields `(vertex, weight)` pairs with weight > 0 in a fixed,
/// reproducible order: array index order for the dense form, insertion order
/// for the sparse form. Roulette tie-breaking in the constructor depends on
/// this order, so implementations must not reorder.
pub trait GraphView {
    /// Pheromone field type sharing this representation's indexing scheme.
    type Pheromone: PheromoneField;

    /// Number of vertices `n`; vertex ids are `[0, n)`.
    fn vertex_count(&self) -> usize;

    /// Weight of edge `(u, v)`; 0 means "no edge".
    fn weight(&self, u: usize, v: usize) -> f64;

    /// Feasible out-neighbors of `u` in the representation's fixed order.
    fn neighbors(&self, u: usize) -> Neighbors<'_>;

    /// Build the paired pheromone field, every graph edge set to `initial`.
    fn init_pheromone(&self, initial: f64) -> Self::Pheromone;
}

/// Iterator over `(neighbor, weight)` pairs of one vertex.
pub enum Neighbors<'a> {
    Dense { row: &'a [f64], next: usize },
    Sparse(std::slice::Iter<'a, (usize, f64)>),
}

impl Iterator for Neighbors<'_> {
    type Item = (usize, f64);

    fn next(&mut self) -> Option<(usize, f64)> {
        match self {
            Neighbors::Dense { row, next } => {
                while *next < row.len() {
                    let v = *next;
                    *next += 1;
                    if row[v] > 0.0 {
                        return Some((v, row[v]));
                    }
                }
                None
            }
            Neighbors::Sparse(iter) => iter.next().copied(),
        }
    }
}

/// Dense matrix representation: `weights[u][v]`, 0 = no edge.
#[derive(Debug, Clone)]
pub struct DenseGraph {
    n: usize,
    weights: Vec<Vec<f64>>,
}

impl DenseGraph {
    /// Validate and wrap an n×n weight matrix.
    ///
    /// Entries must be finite and non-negative; the diagonal is expected to
    /// be 0 but is not special-cased (a 0 entry is simply "no edge").
    pub fn new(weights: Vec<Vec<f64>>) -> Result<Self, GraphError> {
        let n = weights.len();
        if n == 0 {
            return Err(GraphError::Empty);
        }
        for (u, row) in weights.iter().enumerate() {
            if row.len() != n {
                return Err(GraphError::NotSquare { row: u, len: row.len(), expected: n });
            }
            for (v, &w) in row.iter().enumerate() {
                if !w.is_finite() || w < 0.0 {
                    return Err(GraphError::InvalidWeight { from: u, to: v, weight: w });
                }
            }
        }
        Ok(DenseGraph { n, weights })
    }

    /// Construct without validation; the generator guarantees shape.
    pub(crate) fn from_parts(weights: Vec<Vec<f64>>) -> Self {
        let n = weights.len();
        DenseGraph { n, weights }
    }

    /// Row-major flattened copy of the matrix for device upload.
    pub fn flatten(&self) -> Vec<f64> {
        let mut flat = Vec::with_capacity(self.n * self.n);
        for row in &self.weights {
            flat.extend_from_slice(row);
        }
        flat
    }

    /// Number of directed edges (positive-weight entries).
    pub fn edge_count(&self) -> usize {
        self.weights.iter().flatten().filter(|&&w| w > 0.0).count()
    }

    /// Approximate resident size of the matrix in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.n * self.n * std::mem::size_of::<f64>()
    }
}

impl GraphView for DenseGraph {
    type Pheromone = DensePheromone;

    #[inline]
    fn vertex_count(&self) -> usize {
        self.n
    }

    #[inline]
    fn weight(&self, u: usize, v: usize) -> f64 {
        self.weights[u][v]
    }

    fn neighbors(&self, u: usize) -> Neighbors<'_> {
        Neighbors::Dense { row: &self.weights[u], next: 0 }
    }

    fn init_pheromone(&self, initial: f64) -> DensePheromone {
        DensePheromone::for_graph(self, initial)
    }
}

/// Sparse adjacency-list representation: one `(neighbor, weight)` list per
/// vertex, weights strictly positive, neighbors unique per source vertex.
#[derive(Debug, Clone)]
pub struct SparseGraph {
    adjacency: Vec<Vec<(usize, f64)>>,
}

impl SparseGraph {
    /// Validate and wrap adjacency lists; the vertex count is the outer
    /// length. Insertion order of each list is preserved.
    pub fn new(adjacency: Vec<Vec<(usize, f64)>>) -> Result<Self, GraphError> {
        let n = adjacency.len();
        if n == 0 {
            return Err(GraphError::Empty);
        }
        for (u, list) in adjacency.iter().enumerate() {
            for (i, &(v, w)) in list.iter().enumerate() {
                if v >= n {
                    return Err(GraphError::NeighborOutOfRange { from: u, to: v, vertices: n });
                }
                if !w.is_finite() || w <= 0.0 {
                    return Err(GraphError::NonPositiveWeight { from: u, to: v, weight: w });
                }
                if list[..i].iter().any(|&(prev, _)| prev == v) {
                    return Err(GraphError::DuplicateNeighbor { from: u, to: v });
                }
            }
        }
        Ok(SparseGraph { adjacency })
    }

    /// Construct without validation; the generator guarantees shape.
    pub(crate) fn from_parts(adjacency: Vec<Vec<(usize, f64)>>) -> Self {
        SparseGraph { adjacency }
    }

    pub(crate) fn adjacency(&self) -> &[Vec<(usize, f64)>] {
        &self.adjacency
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Approximate resident size of the adjacency lists in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.adjacency.len() * std::mem::size_of::<Vec<(usize, f64)>>()
            + self.edge_count() * std::mem::size_of::<(usize, f64)>()
    }
}

impl GraphView for SparseGraph {
    type Pheromone = SparsePheromone;

    #[inline]
    fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    fn weight(&self, u: usize, v: usize) -> f64 {
        self.adjacency[u]
            .iter()
            .find(|&&(to, _)| to == v)
            .map(|&(_, w)| w)
            .unwrap_or(0.0)
    }

    fn neighbors(&self, u: usize) -> Neighbors<'_> {
        Neighbors::Sparse(self.adjacency[u].iter())
    }

    fn init_pheromone(&self, initial: f64) -> SparsePheromone {
        SparsePheromone::for_graph(self, initial)
    }
}
