//! CUDA-offloaded colony optimizer.
//!
//! Construction and update run as bulk-parallel kernel passes on the device;
//! the host exchanges only flattened buffers. The kernel module is supplied
//! externally (compiled out of band from `kernels/ant_kernels.cu`) and
//! resolved at run time: an explicit path, then a cubin matching the device's
//! compute capability, then plain PTX. A missing module is a fatal
//! configuration error for the run; there is no automatic fallback to the
//! sequential engine.

use crate::accel::best_tour_in_buffer;
use crate::colony::{ColonyConfig, ColonyEngine, RunResult};
use crate::graph::{DenseGraph, GraphView};
use crate::pheromone::DensePheromone;
use cust::device::DeviceAttribute;
use cust::prelude::*;
use std::path::{Path, PathBuf};

const BLOCK_SIZE: u32 = 256;
const MODULE_STEM: &str = "ant_kernels";

/// Colony optimizer backed by an externally supplied CUDA module exposing
/// the `construct_tours` and `update_pheromones` entry points.
pub struct CudaColonyOptimizer {
    pub config: ColonyConfig,
    graph: DenseGraph,
    pheromone: DensePheromone,
    module_path: Option<PathBuf>,
    best_tour: Vec<usize>,
    best_length: f64,
}

impl CudaColonyOptimizer {
    /// Validate the configuration and stage the host-side state. Device
    /// resources are only acquired inside [`ColonyEngine::run`] and released
    /// when it returns, on success and failure alike.
    pub fn new(
        graph: DenseGraph,
        config: ColonyConfig,
        module_path: Option<PathBuf>,
    ) -> Result<Self, String> {
        config.validate(graph.vertex_count()).map_err(|e| e.to_string())?;
        if graph.vertex_count() > crate::accel::MAX_DEVICE_VERTICES {
            return Err(format!(
                "graph has {} vertices; the CUDA engine supports at most {}",
                graph.vertex_count(),
                crate::accel::MAX_DEVICE_VERTICES
            ));
        }
        let pheromone = graph.init_pheromone(config.initial_pheromone);

        Ok(CudaColonyOptimizer {
            config,
            graph,
            pheromone,
            module_path,
            best_tour: Vec::new(),
            best_length: f64::INFINITY,
        })
    }

    pub fn best_tour(&self) -> &[usize] {
        &self.best_tour
    }

    pub fn best_length(&self) -> f64 {
        self.best_length
    }

    /// Pheromone matrix as of the last completed run.
    pub fn pheromone(&self) -> &DensePheromone {
        &self.pheromone
    }

    fn resolve_module(&self, device: &Device) -> Result<PathBuf, String> {
        if let Some(path) = &self.module_path {
            if path.exists() {
                return Ok(path.clone());
            }
            return Err(format!("CUDA module {:?} not found", path));
        }

        // Prefer a cubin built for this device's compute capability.
        let major = device
            .get_attribute(DeviceAttribute::ComputeCapabilityMajor)
            .map_err(|e| format!("failed to query compute capability: {}", e))?;
        let minor = device
            .get_attribute(DeviceAttribute::ComputeCapabilityMinor)
            .map_err(|e| format!("failed to query compute capability: {}", e))?;

        let cubin = PathBuf::from(format!("{}.sm{}{}.cubin", MODULE_STEM, major, minor));
        if cubin.exists() {
            return Ok(cubin);
        }

        let ptx = PathBuf::from(format!("{}.ptx", MODULE_STEM));
        if ptx.exists() {
            return Ok(ptx);
        }

        Err(format!(
            "no suitable CUDA module found; expected {}.sm{}{}.cubin or {}.ptx in the working directory",
            MODULE_STEM, major, minor, MODULE_STEM
        ))
    }

    fn load_module(path: &Path) -> Result<Module, String> {
        if path.extension().map(|e| e == "cubin").unwrap_or(false) {
            let bytes = std::fs::read(path)
                .map_err(|e| format!("failed to read CUDA module {:?}: {}", path, e))?;
            Module::from_cubin(&bytes, &[])
                .map_err(|e| format!("failed to load cubin {:?}: {}", path, e))
        } else {
            let ptx = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read CUDA module {:?}: {}", path, e))?;
            Module::from_ptx(&ptx, &[])
                .map_err(|e| format!("failed to load PTX {:?}: {}", path, e))
        }
    }
}

impl ColonyEngine for CudaColonyOptimizer {
    fn run(&mut self) -> Result<RunResult, String> {
        let start = std::time::Instant::now();

        let n = self.graph.vertex_count();
        let ants = self.config.ants;

        // Context and buffers are scoped to this call; dropping them on any
        // exit path releases the device resources.
        let _context =
            cust::quick_init().map_err(|e| format!("failed to initialize CUDA: {}", e))?;
        let device =
            Device::get_device(0).map_err(|e| format!("failed to open CUDA device: {}", e))?;

        let module_path = self.resolve_module(&device)?;
        let module = Self::load_module(&module_path)?;
        let stream = Stream::new(StreamFlags::NON_BLOCKING, None)
            .map_err(|e| format!("failed to create stream: {}", e))?;

        let construct_tours = module
            .get_function("construct_tours")
            .map_err(|e| format!("kernel construct_tours missing from module: {}", e))?;
        let update_pheromones = module
            .get_function("update_pheromones")
            .map_err(|e| format!("kernel update_pheromones missing from module: {}", e))?;

        // One-time upload of the flattened matrices.
        let d_graph = DeviceBuffer::from_slice(&self.graph.flatten())
            .map_err(|e| format!("failed to upload distance matrix: {}", e))?;
        let d_pheromone = DeviceBuffer::from_slice(&self.pheromone.flatten())
            .map_err(|e| format!("failed to upload pheromone matrix: {}", e))?;
        let mut host_tours = vec![-1i32; ants * n];
        let d_tours = DeviceBuffer::from_slice(&host_tours)
            .map_err(|e| format!("failed to allocate tour buffer: {}", e))?;

        let ant_grid = (ants as u32).div_ceil(BLOCK_SIZE);
        let vertex_grid = (n as u32).div_ceil(BLOCK_SIZE);
        let closed = i32::from(self.config.closed_tour);
        let mut history = Vec::with_capacity(self.config.iterations);

        for iteration in 0..self.config.iterations {
            let seed = self.config.seed.wrapping_add(iteration as u64);

            // Construct pass: one lane per ant, lane-local random state,
            // pheromone read-only until the update pass.
            unsafe {
                launch!(construct_tours<<<ant_grid, BLOCK_SIZE, 0, stream>>>(
                    d_graph.as_device_ptr(),
                    d_pheromone.as_device_ptr(),
                    d_tours.as_device_ptr(),
                    ants as i32,
                    n as i32,
                    self.config.alpha,
                    self.config.beta,
                    seed
                ))
            }
            .map_err(|e| format!("construct_tours launch failed: {}", e))?;
            stream
                .synchronize()
                .map_err(|e| format!("construct_tours did not complete: {}", e))?;

            // Fold this iteration's tours into the global best. The original
            // design reduced only the final iteration; tracking across all
            // iterations matches the sequential engine's contract.
            d_tours
                .copy_to(&mut host_tours)
                .map_err(|e| format!("failed to download tour buffer: {}", e))?;
            if let Some((tour, length)) =
                best_tour_in_buffer(&self.graph, &host_tours, ants, self.config.closed_tour)
            {
                if length < self.best_length {
                    self.best_length = length;
                    self.best_tour = tour;
                }
            }

            // Update pass, two launches of the one entry point: phase 0
            // evaporates (one lane per vertex), phase 1 deposits with atomic
            // adds (one lane per ant). The launch boundary between them is
            // the evaporation-before-deposit barrier.
            for (phase, grid) in [(0i32, vertex_grid), (1i32, ant_grid)] {
                unsafe {
                    launch!(update_pheromones<<<grid, BLOCK_SIZE, 0, stream>>>(
                        d_pheromone.as_device_ptr(),
                        d_graph.as_device_ptr(),
                        d_tours.as_device_ptr(),
                        ants as i32,
                        n as i32,
                        self.config.evaporation_rate,
                        self.config.deposit_factor,
                        closed,
                        phase
                    ))
                }
                .map_err(|e| format!("update_pheromones phase {} launch failed: {}", phase, e))?;
                stream
                    .synchronize()
                    .map_err(|e| format!("update_pheromones phase {} did not complete: {}", phase, e))?;
            }

            history.push(self.best_length);
            log::debug!("iteration {}: best length {:.2}", iteration, self.best_length);
        }

        // Download the final pheromone state for inspection on the host.
        let mut flat = vec![0.0f64; n * n];
        d_pheromone
            .copy_to(&mut flat)
            .map_err(|e| format!("failed to download pheromone matrix: {}", e))?;
        self.pheromone.load_flat(&flat);

        Ok(RunResult {
            best_tour: self.best_tour.clone(),
            best_length: self.best_length,
            iterations: self.config.iterations,
            history,
            engine: "cuda".to_string(),
            computation_time: start.elapsed().as_secs_f64(),
        })
    }
}
