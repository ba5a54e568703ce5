//! Parameter sweeps and experimentation.
//!
//! Runs the sequential optimizer over a grid of graph sizes and densities,
//! with both representations per cell, collects per-run records and
//! per-cell statistics, and exports everything to CSV.

use crate::colony::{ColonyConfig, ColonyOptimizer, RunResult};
use crate::generator::GraphGenerator;
use crate::graph::{GraphView, Representation};

use indicatif::{ProgressBar, ProgressStyle};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Sweep configuration.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Graph sizes to sweep
    pub sizes: Vec<usize>,
    /// Edge densities to sweep
    pub densities: Vec<f64>,
    /// Runs per (size, density, representation) cell, seeded 0..runs
    pub runs: usize,
    /// Colony parameters shared by every run
    pub colony: ColonyConfig,
    /// Run cells in parallel
    pub parallel: bool,
    /// Output directory for CSV exports
    pub output_dir: String,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            sizes: vec![25, 50, 100],
            densities: vec![0.3, 0.6, 0.9],
            runs: 5,
            colony: ColonyConfig::default(),
            parallel: true,
            output_dir: "results".to_string(),
        }
    }
}

/// Result of a single run within the sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepRecord {
    /// Graph size
    pub vertices: usize,
    /// Edge density used by the generator
    pub density: f64,
    /// Graph representation
    pub representation: Representation,
    /// Run index (doubles as the graph seed)
    pub run: usize,
    /// Best tour length found
    pub best_length: f64,
    /// Vertices visited by the best tour
    pub visited: usize,
    /// Computation time in seconds
    pub time: f64,
    /// Approximate graph memory in bytes
    pub memory_bytes: usize,
}

/// Aggregated statistics for one (size, density, representation) cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepStatistics {
    pub vertices: usize,
    pub density: f64,
    pub representation: Representation,
    /// Runs that found at least one tour
    pub solved: usize,
    pub runs: usize,
    pub avg_length: f64,
    pub best_length: f64,
    pub std_length: f64,
    pub avg_time: f64,
    pub avg_memory_bytes: f64,
}

/// Sweep engine.
pub struct Sweep {
    config: SweepConfig,
    records: Vec<SweepRecord>,
}

impl Sweep {
    pub fn new(config: SweepConfig) -> Self {
        Sweep { config, records: Vec::new() }
    }

    /// Execute the full grid. Each cell runs both representations over the
    /// same generated graphs so their results are directly comparable.
    pub fn run(&mut self) {
        let mut cells = Vec::new();
        for &vertices in &self.config.sizes {
            for &density in &self.config.densities {
                for run in 0..self.config.runs {
                    cells.push((vertices, density, run));
                }
            }
        }

        log::info!(
            "sweeping {} sizes x {} densities, {} runs per cell",
            self.config.sizes.len(),
            self.config.densities.len(),
            self.config.runs
        );

        let bar = ProgressBar::new(cells.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} cells {elapsed_precise}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let colony = self.config.colony.clone();
        let run_cell = |&(vertices, density, run): &(usize, f64, usize)| {
            let records = run_pair(vertices, density, run, &colony);
            bar.inc(1);
            records
        };

        let mut records: Vec<SweepRecord> = if self.config.parallel {
            cells.par_iter().flat_map_iter(run_cell).collect()
        } else {
            cells.iter().flat_map(run_cell).collect()
        };
        bar.finish();

        self.records.append(&mut records);
    }

    /// Aggregate records per cell.
    pub fn compute_statistics(&self) -> Vec<SweepStatistics> {
        let mut groups: HashMap<(usize, OrderedFloat<f64>, Representation), Vec<&SweepRecord>> =
            HashMap::new();
        for record in &self.records {
            groups
                .entry((record.vertices, OrderedFloat(record.density), record.representation))
                .or_default()
                .push(record);
        }

        let mut statistics = Vec::new();
        for ((vertices, density, representation), records) in groups {
            let solved: Vec<f64> = records
                .iter()
                .filter(|r| r.best_length.is_finite())
                .map(|r| r.best_length)
                .collect();
            let times: Vec<f64> = records.iter().map(|r| r.time).collect();
            let memory: Vec<f64> = records.iter().map(|r| r.memory_bytes as f64).collect();

            let (avg_length, best_length, std_length) = if solved.is_empty() {
                (f64::INFINITY, f64::INFINITY, 0.0)
            } else {
                (
                    solved.clone().mean(),
                    solved.iter().copied().fold(f64::INFINITY, f64::min),
                    if solved.len() > 1 { solved.clone().std_dev() } else { 0.0 },
                )
            };

            statistics.push(SweepStatistics {
                vertices,
                density: density.into_inner(),
                representation,
                solved: solved.len(),
                runs: records.len(),
                avg_length,
                best_length,
                std_length,
                avg_time: times.mean(),
                avg_memory_bytes: memory.mean(),
            });
        }

        statistics.sort_by_key(|s| {
            (s.vertices, OrderedFloat(s.density), s.representation.to_string())
        });
        statistics
    }

    /// Export per-run records to CSV.
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for record in &self.records {
            writer.serialize(record)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Write records, statistics, and the text report under the configured
    /// output directory.
    pub fn save(&self) -> std::io::Result<()> {
        let dir = Path::new(&self.config.output_dir);
        std::fs::create_dir_all(dir)?;
        self.export_to_csv(dir.join("records.csv"))?;
        self.export_statistics_csv(dir.join("statistics.csv"))?;
        std::fs::write(dir.join("report.txt"), self.generate_report())?;
        Ok(())
    }

    /// Export per-cell statistics to CSV.
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report.
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("         ACO Sweep Report\n");
        report.push_str("========================================\n");
        report.push_str(&format!(
            "Generated: {}\n\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));

        report.push_str(&format!(
            "{:<10} {:>8} {:>8} {:>8} {:>12} {:>12} {:>10} {:>10}\n",
            "Repr", "Vertices", "Density", "Solved", "Avg Len", "Best Len", "Std", "Avg Time"
        ));
        report.push_str("-".repeat(84).as_str());
        report.push('\n');

        for stat in self.compute_statistics() {
            let (avg, best) = if stat.solved == 0 {
                ("-".to_string(), "-".to_string())
            } else {
                (format!("{:.2}", stat.avg_length), format!("{:.2}", stat.best_length))
            };
            report.push_str(&format!(
                "{:<10} {:>8} {:>8.2} {:>8} {:>12} {:>12} {:>10.2} {:>10.4}\n",
                stat.representation.to_string(),
                stat.vertices,
                stat.density,
                format!("{}/{}", stat.solved, stat.runs),
                avg,
                best,
                stat.std_length,
                stat.avg_time,
            ));
        }
        report.push_str("-".repeat(84).as_str());
        report.push('\n');

        report
    }

    pub fn records(&self) -> &[SweepRecord] {
        &self.records
    }
}

/// Run one seeded cell through both representations of the same graph.
fn run_pair(vertices: usize, density: f64, run: usize, colony: &ColonyConfig) -> Vec<SweepRecord> {
    let generator = GraphGenerator::new(vertices, density, run as u64);
    let mut config = colony.clone();
    config.seed = colony.seed.wrapping_add(run as u64);

    let dense = generator.dense();
    let dense_record = run_one(
        dense.memory_bytes(),
        Representation::Dense,
        vertices,
        density,
        run,
        ColonyOptimizer::new(dense, config.clone()),
    );

    let sparse = generator.sparse();
    let sparse_record = run_one(
        sparse.memory_bytes(),
        Representation::Sparse,
        vertices,
        density,
        run,
        ColonyOptimizer::new(sparse, config),
    );

    dense_record.into_iter().chain(sparse_record).collect()
}

fn run_one<G: GraphView>(
    memory_bytes: usize,
    representation: Representation,
    vertices: usize,
    density: f64,
    run: usize,
    optimizer: Result<ColonyOptimizer<G>, crate::colony::ConfigError>,
) -> Option<SweepRecord> {
    let mut optimizer = match optimizer {
        Ok(optimizer) => optimizer,
        Err(e) => {
            log::error!("skipping sweep cell n={} d={}: {}", vertices, density, e);
            return None;
        }
    };

    let result: RunResult = optimizer.optimize();
    Some(SweepRecord {
        vertices,
        density,
        representation,
        run,
        best_length: result.best_length,
        visited: result.best_tour.len(),
        time: result.computation_time,
        memory_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_config_default() {
        let config = SweepConfig::default();
        assert_eq!(config.runs, 5);
        assert!(config.parallel);
    }

    #[test]
    fn test_small_sweep_produces_records_for_both_representations() {
        let config = SweepConfig {
            sizes: vec![8],
            densities: vec![0.8],
            runs: 2,
            colony: ColonyConfig { ants: 4, iterations: 5, ..Default::default() },
            parallel: false,
            output_dir: "results".to_string(),
        };
        let mut sweep = Sweep::new(config);
        sweep.run();

        // 1 size x 1 density x 2 runs x 2 representations.
        assert_eq!(sweep.records().len(), 4);
        assert!(sweep
            .records()
            .iter()
            .any(|r| r.representation == Representation::Dense));
        assert!(sweep
            .records()
            .iter()
            .any(|r| r.representation == Representation::Sparse));
    }

    #[test]
    fn test_representations_agree_on_same_seed() {
        let config = SweepConfig {
            sizes: vec![12],
            densities: vec![0.7],
            runs: 1,
            colony: ColonyConfig { ants: 5, iterations: 10, ..Default::default() },
            parallel: false,
            output_dir: "results".to_string(),
        };
        let mut sweep = Sweep::new(config);
        sweep.run();

        let dense = sweep
            .records()
            .iter()
            .find(|r| r.representation == Representation::Dense)
            .unwrap();
        let sparse = sweep
            .records()
            .iter()
            .find(|r| r.representation == Representation::Sparse)
            .unwrap();
        assert_eq!(dense.best_length, sparse.best_length);
        assert_eq!(dense.visited, sparse.visited);
    }

    #[test]
    fn test_statistics_group_per_cell() {
        let config = SweepConfig {
            sizes: vec![8, 10],
            densities: vec![0.9],
            runs: 2,
            colony: ColonyConfig { ants: 3, iterations: 3, ..Default::default() },
            parallel: false,
            output_dir: "results".to_string(),
        };
        let mut sweep = Sweep::new(config);
        sweep.run();

        let stats = sweep.compute_statistics();
        // 2 sizes x 1 density x 2 representations.
        assert_eq!(stats.len(), 4);
        for stat in &stats {
            assert_eq!(stat.runs, 2);
            assert!(stat.best_length <= stat.avg_length);
        }
    }

    #[test]
    fn test_save_writes_exports_to_output_dir() {
        let dir = std::env::temp_dir().join(format!("aco-sweep-{}", std::process::id()));
        let config = SweepConfig {
            sizes: vec![6],
            densities: vec![0.9],
            runs: 1,
            colony: ColonyConfig { ants: 2, iterations: 2, ..Default::default() },
            parallel: false,
            output_dir: dir.to_string_lossy().to_string(),
        };
        let mut sweep = Sweep::new(config);
        sweep.run();
        sweep.save().unwrap();

        assert!(dir.join("records.csv").exists());
        assert!(dir.join("statistics.csv").exists());
        assert!(dir.join("report.txt").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_report_mentions_every_cell() {
        let config = SweepConfig {
            sizes: vec![6],
            densities: vec![1.0],
            runs: 1,
            colony: ColonyConfig { ants: 2, iterations: 2, ..Default::default() },
            parallel: false,
            output_dir: "results".to_string(),
        };
        let mut sweep = Sweep::new(config);
        sweep.run();

        let report = sweep.generate_report();
        assert!(report.contains("dense"));
        assert!(report.contains("sparse"));
    }
}
