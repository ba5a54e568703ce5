//! Accelerated colony orchestrator.
//!
//! The CUDA engine offloads tour construction and pheromone update to an
//! externally compiled kernel module, exchanging only flattened buffers with
//! the host. It shares the sequential engine's external contract (best tour,
//! best length after the configured iterations) behind [`ColonyEngine`].
//!
//! [`ColonyEngine`]: crate::colony::ColonyEngine

// When built with the `cuda` feature, expose the real implementation
#[cfg(feature = "cuda")]
mod cuda;
#[cfg(feature = "cuda")]
pub use cuda::*;

// Otherwise provide a lightweight stub so the rest of the codebase can compile
#[cfg(not(feature = "cuda"))]
mod cuda_stub {
    use crate::colony::{ColonyConfig, ColonyEngine, RunResult};
    use crate::graph::{DenseGraph, GraphView};
    use std::path::PathBuf;

    #[derive(Debug)]
    pub struct CudaColonyOptimizer {
        pub config: ColonyConfig,
    }

    impl CudaColonyOptimizer {
        pub fn new(
            graph: DenseGraph,
            config: ColonyConfig,
            _module_path: Option<PathBuf>,
        ) -> Result<Self, String> {
            config.validate(graph.vertex_count()).map_err(|e| e.to_string())?;
            if graph.vertex_count() > super::MAX_DEVICE_VERTICES {
                return Err(format!(
                    "graph has {} vertices; the CUDA engine supports at most {}",
                    graph.vertex_count(),
                    super::MAX_DEVICE_VERTICES
                ));
            }
            Ok(CudaColonyOptimizer { config })
        }
    }

    impl ColonyEngine for CudaColonyOptimizer {
        fn run(&mut self) -> Result<RunResult, String> {
            Err("CUDA feature not enabled in this build".to_string())
        }
    }
}

#[cfg(not(feature = "cuda"))]
pub use cuda_stub::*;

use crate::graph::{DenseGraph, GraphView};
use crate::tour::tour_length;
use ordered_float::OrderedFloat;

/// Largest graph the device engine accepts. The construct kernel tracks
/// visited vertices in a fixed 2048-bit mask, so larger graphs would index
/// past it; both constructors reject them up front.
pub const MAX_DEVICE_VERTICES: usize = 2048;

/// Extract one lane's tour from the flattened `ants × n` buffer.
///
/// Lanes pad unreached positions with -1; an index outside `[0, n)`
/// terminates the lane (a truncated or invalid tour is still a candidate).
pub fn lane_tour(buffer: &[i32], lane: usize, vertices: usize) -> Vec<usize> {
    let offset = lane * vertices;
    buffer[offset..offset + vertices]
        .iter()
        .take_while(|&&v| v >= 0 && (v as usize) < vertices)
        .map(|&v| v as usize)
        .collect()
}

/// Reduce a downloaded tour buffer to its minimum-length tour, if any lane
/// produced an evaluable one.
pub fn best_tour_in_buffer(
    graph: &DenseGraph,
    buffer: &[i32],
    ants: usize,
    closed: bool,
) -> Option<(Vec<usize>, f64)> {
    let n = graph.vertex_count();
    (0..ants)
        .filter_map(|lane| {
            let tour = lane_tour(buffer, lane, n);
            let length = tour_length(graph, &tour, closed).ok()?;
            Some((tour, length))
        })
        .min_by_key(|&(_, length)| OrderedFloat(length))
}
