//! Top-level run: spawn workers, drive the coordinator, join, report.

use std::thread;

use strata_comm::{Fabric, RootEndpoint};
use strata_core::{
    CellGrid, CommError, ConfigError, Generation, Pattern, Rank, SimError, VerificationMismatch,
};

use crate::checkpoint::Checkpoint;
use crate::config::SimConfig;
use crate::coordinator::Coordinator;
use crate::metrics::{RunReport, WorkerMetrics};
use crate::worker::Worker;

/// A configured, seeded simulation waiting to run.
///
/// # Examples
///
/// ```
/// use strata_core::{Pattern, Rect};
/// use strata_engine::{Checkpoint, SimConfig, Simulation};
///
/// let beehive = Pattern::from_rows(&[[0, 1, 1, 0], [1, 0, 0, 1], [0, 1, 1, 0]]);
/// let mut sim = Simulation::new(SimConfig::new(20, 20)).unwrap();
/// sim.place(&beehive, 10, 10).unwrap();
/// sim.add_checkpoint(Checkpoint::region("beehive", Rect::new(10, 10, 3, 4), 6));
///
/// let report = sim.run().unwrap();
/// assert!(report.verified());
/// assert_eq!(report.population(), 6);
/// ```
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    coordinator: Coordinator,
}

/// What the coordinator saw by the end of its loop.
struct Progress {
    last: Generation,
    extinct_at: Option<Generation>,
    checks_passed: usize,
    mismatches: Vec<VerificationMismatch>,
}

impl Simulation {
    /// Validate `config` and allocate an all-dead global grid.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let coordinator = Coordinator::new(&config)?;
        Ok(Self {
            config,
            coordinator,
        })
    }

    /// The run configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The seed grid.
    pub fn grid(&self) -> &CellGrid {
        self.coordinator.grid()
    }

    /// Mutable access to the seed grid.
    pub fn grid_mut(&mut self) -> &mut CellGrid {
        self.coordinator.grid_mut()
    }

    /// Overlay `pattern` at `(row, col)`.
    pub fn place(&mut self, pattern: &Pattern, row: usize, col: usize) -> Result<usize, ConfigError> {
        self.coordinator.place(pattern, row, col)
    }

    /// Register a checkpoint.
    pub fn add_checkpoint(&mut self, checkpoint: Checkpoint) {
        self.coordinator.add_checkpoint(checkpoint);
    }

    /// Run to completion.
    pub fn run(self) -> Result<RunReport, SimError> {
        self.run_with(|_, _| {})
    }

    /// Run to completion, calling `observer` with every gathered grid
    /// (generation 0 included).
    pub fn run_with<F>(self, mut observer: F) -> Result<RunReport, SimError>
    where
        F: FnMut(Generation, &CellGrid),
    {
        let Self {
            config,
            mut coordinator,
        } = self;
        tracing::info!(
            rows = config.rows,
            cols = config.cols,
            workers = config.workers,
            generations = config.generations,
            "simulation starting"
        );

        let (root, peers) = Fabric::new(config.workers)
            .with_timeout(config.exchange_timeout)
            .build();
        let workers = peers
            .into_iter()
            .map(|p| Worker::new(p, &config))
            .collect::<Result<Vec<_>, _>>()?;

        let (progress, metrics) = thread::scope(|s| -> Result<(Progress, Vec<WorkerMetrics>), SimError> {
            // Moved in so that every exit path drops it before the scope
            // joins, unblocking workers still waiting on the coordinator.
            let root = root;
            let mut handles = Vec::with_capacity(workers.len());
            for worker in workers {
                let rank = worker.rank();
                let handle = thread::Builder::new()
                    .name(format!("strata-worker-{}", rank.0))
                    .spawn_scoped(s, move || worker.run())
                    .map_err(|e| ConfigError::ThreadSpawnFailed {
                        reason: e.to_string(),
                    })?;
                handles.push((rank, handle));
            }

            let outcome = coordinate(&config, &mut coordinator, &root, &mut observer);
            drop(root);

            let mut metrics = Vec::with_capacity(handles.len());
            let mut failures = Vec::new();
            for (rank, handle) in handles {
                match handle.join() {
                    Ok(Ok(m)) => metrics.push(m),
                    Ok(Err(e)) => {
                        tracing::error!(rank = rank.0, error = %e, "worker failed");
                        failures.push(Failure::Comm(e));
                    }
                    Err(_) => {
                        tracing::error!(rank = rank.0, "worker panicked");
                        failures.push(Failure::Panicked(rank));
                    }
                }
            }
            match outcome {
                Ok(progress) if failures.is_empty() => Ok((progress, metrics)),
                Ok(_) => Err(root_cause(None, failures)),
                Err(e) => Err(root_cause(Some(e), failures)),
            }
        })?;

        let report = RunReport {
            generations_run: progress.last,
            checks_passed: progress.checks_passed,
            mismatches: progress.mismatches,
            unchecked: coordinator.unchecked(),
            extinct_at: progress.extinct_at,
            metrics,
            final_grid: coordinator.into_grid(),
        };
        tracing::info!(
            generations = report.generations_run.0,
            population = report.population(),
            checks_passed = report.checks_passed,
            mismatches = report.mismatches.len(),
            "simulation finished"
        );
        Ok(report)
    }
}

enum Failure {
    Comm(CommError),
    Panicked(Rank),
}

/// Pick the error to report when one or more parties failed.
///
/// A failure in one party shows up as `Disconnected` everywhere else, so
/// a panic wins over any communication error, and a non-disconnect error
/// wins over a disconnect.
fn root_cause(coordinator: Option<SimError>, failures: Vec<Failure>) -> SimError {
    let mut fallback = coordinator;
    for failure in failures {
        match failure {
            Failure::Panicked(rank) => return SimError::WorkerPanicked { rank },
            Failure::Comm(e) => {
                let replace = match &fallback {
                    None => true,
                    Some(SimError::Comm(CommError::Disconnected { .. })) => {
                        !matches!(e, CommError::Disconnected { .. })
                    }
                    Some(_) => false,
                };
                if replace {
                    fallback = Some(SimError::Comm(e));
                }
            }
        }
    }
    fallback.unwrap_or(SimError::Comm(CommError::Disconnected {
        rank: None,
        peer: "worker".into(),
    }))
}

/// The coordinator's side of a run.
fn coordinate<F>(
    config: &SimConfig,
    coordinator: &mut Coordinator,
    root: &RootEndpoint,
    observer: &mut F,
) -> Result<Progress, SimError>
where
    F: FnMut(Generation, &CellGrid),
{
    coordinator.scatter(root)?;

    let mut progress = Progress {
        last: Generation::ZERO,
        extinct_at: None,
        checks_passed: 0,
        mismatches: Vec::new(),
    };
    let mut checkpoint = |coordinator: &mut Coordinator, generation: Generation| {
        observer(generation, coordinator.grid());
        let eval = coordinator.verify(generation);
        progress.checks_passed += eval.passed;
        progress.mismatches.extend(eval.mismatches);
    };
    checkpoint(coordinator, Generation::ZERO);

    let mut extinct_at = None;
    let mut last = Generation::ZERO;
    for g in 1..=config.generations {
        let generation = Generation(g);
        let mut proceed = true;
        if config.stop_on_extinction {
            let live = root.reduce_sum(generation)?;
            proceed = live > 0;
            root.broadcast_verdict(generation, proceed)?;
        }
        last = generation;
        if !proceed || config.gathers_at(generation) {
            coordinator.gather(root, generation)?;
            checkpoint(coordinator, generation);
        }
        if !proceed {
            tracing::info!(generation = g, "grid extinct, stopping early");
            extinct_at = Some(generation);
            break;
        }
    }

    progress.last = last;
    progress.extinct_at = extinct_at;
    Ok(progress)
}
