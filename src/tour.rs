//! Tour evaluation.
//!
//! A tour is an ordered vertex sequence with no repeats, possibly shorter
//! than `n` when construction ran out of feasible neighbors. Its numeric
//! length sums consecutive edge weights, plus the closing edge back to the
//! start when a closed cycle is requested.

use crate::graph::GraphView;

/// Domain errors raised while evaluating a tour's length.
#[derive(Debug, Clone, PartialEq)]
pub enum TourError {
    /// Fewer than 2 vertices: there is no edge to sum.
    TooShort { len: usize },
    /// A consecutive pair (or the requested closing pair) has no edge.
    MissingEdge { from: usize, to: usize },
}

impl std::fmt::Display for TourError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TourError::TooShort { len } => {
                write!(f, "tour with {} vertices is too short to have a length", len)
            }
            TourError::MissingEdge { from, to } => {
                write!(f, "no edge between vertices {} and {}", from, to)
            }
        }
    }
}

impl std::error::Error for TourError {}

/// Sum the edge weights along `tour`.
///
/// With `closed` set, the edge from the last vertex back to the first is
/// included; requesting a closing edge the graph does not have is a
/// [`TourError::MissingEdge`], not a silent omission.
pub fn tour_length<G: GraphView>(graph: &G, tour: &[usize], closed: bool) -> Result<f64, TourError> {
    if tour.len() < 2 {
        return Err(TourError::TooShort { len: tour.len() });
    }

    let mut length = 0.0;
    for pair in tour.windows(2) {
        let w = graph.weight(pair[0], pair[1]);
        if w <= 0.0 {
            return Err(TourError::MissingEdge { from: pair[0], to: pair[1] });
        }
        length += w;
    }

    if closed {
        let last = tour[tour.len() - 1];
        let first = tour[0];
        let w = graph.weight(last, first);
        if w <= 0.0 {
            return Err(TourError::MissingEdge { from: last, to: first });
        }
        length += w;
    }

    Ok(length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DenseGraph;

    fn ring() -> DenseGraph {
        DenseGraph::new(vec![
            vec![0.0, 1.0, 0.0, 4.0],
            vec![1.0, 0.0, 2.0, 0.0],
            vec![0.0, 2.0, 0.0, 3.0],
            vec![4.0, 0.0, 3.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_open_path_length() {
        let g = ring();
        let len = tour_length(&g, &[0, 1, 2, 3], false).unwrap();
        assert!((len - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_closed_cycle_adds_return_edge() {
        let g = ring();
        let len = tour_length(&g, &[0, 1, 2, 3], true).unwrap();
        assert!((len - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_vertex_is_too_short() {
        let g = ring();
        assert_eq!(tour_length(&g, &[2], false), Err(TourError::TooShort { len: 1 }));
        assert_eq!(tour_length(&g, &[], false), Err(TourError::TooShort { len: 0 }));
    }

    #[test]
    fn test_disconnected_pair_is_a_domain_error() {
        let g = ring();
        assert_eq!(
            tour_length(&g, &[0, 2], false),
            Err(TourError::MissingEdge { from: 0, to: 2 })
        );
    }

    #[test]
    fn test_missing_closing_edge() {
        let g = DenseGraph::new(vec![
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.0, 0.0, 0.0],
        ])
        .unwrap();
        assert!(tour_length(&g, &[0, 1, 2], false).is_ok());
        assert_eq!(
            tour_length(&g, &[0, 1, 2], true),
            Err(TourError::MissingEdge { from: 2, to: 0 })
        );
    }
}
