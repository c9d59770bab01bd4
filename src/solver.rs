//! End-to-end pipeline: construction, guided local search and extraction.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::constructive::cheapest_arc_insertion;
use crate::error::{Result, RoutingError};
use crate::evaluation::{CapacityTracker, CostEvaluator};
use crate::local_search::{perturb, LocalSearchEngine, SearchConfig, SearchOutcome, StopFlag};
use crate::models::{Instance, Solution};
use crate::report::{extract, SolutionReport};

/// Result of a solve: a report, or the nodes no vehicle could take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SolveOutcome {
    /// A feasible solution was found.
    Solved(SolutionReport),
    /// Construction could not place these nodes; no search was run.
    NoSolution {
        /// Nodes left unassigned.
        unassigned: Vec<usize>,
    },
}

impl SolveOutcome {
    /// The report, if a solution was found.
    pub fn report(&self) -> Option<&SolutionReport> {
        match self {
            SolveOutcome::Solved(report) => Some(report),
            SolveOutcome::NoSolution { .. } => None,
        }
    }
}

/// Solves a heterogeneous-fleet capacitated routing instance.
///
/// Restart 0 searches from the cheapest-arc construction; restart `k > 0`
/// first applies random feasible relocations seeded with `seed + k`. Each
/// restart owns its solution, loads and penalties, and gets the full time
/// budget. The cheapest result wins, ties going to the lower restart.
///
/// # Examples
///
/// ```
/// use u_fleet::models::{Instance, InstanceData};
/// use u_fleet::local_search::SearchConfig;
/// use u_fleet::solver::{SolveOutcome, Solver};
///
/// let data = InstanceData::new(
///     vec![
///         vec![0.0, 1.0, 2.0, 3.0],
///         vec![1.0, 0.0, 1.0, 2.0],
///         vec![2.0, 1.0, 0.0, 1.0],
///         vec![3.0, 2.0, 1.0, 0.0],
///     ],
///     2,
/// )
/// .with_dimension("load", vec![0.0, 1.0, 1.0, 1.0], vec![2.0, 2.0]);
/// let instance = Instance::new(&data).unwrap();
///
/// let config = SearchConfig::default().with_max_iterations(100);
/// match Solver::new(&instance, config).solve().unwrap() {
///     SolveOutcome::Solved(report) => assert_eq!(report.routes.len(), 2),
///     SolveOutcome::NoSolution { .. } => unreachable!(),
/// }
/// ```
pub struct Solver<'a> {
    instance: &'a Instance,
    config: SearchConfig,
    stop: StopFlag,
}

impl<'a> Solver<'a> {
    /// Creates a solver over `instance`.
    pub fn new(instance: &'a Instance, config: SearchConfig) -> Self {
        Self {
            instance,
            config,
            stop: StopFlag::new(),
        }
    }

    /// Uses a shared stop flag for every restart.
    pub fn with_stop_flag(mut self, stop: StopFlag) -> Self {
        self.stop = stop;
        self
    }

    /// Runs construction, search and extraction.
    ///
    /// Infeasibility is returned as [`SolveOutcome::NoSolution`]; `Err` is
    /// reserved for engine failures.
    #[tracing::instrument(
        skip(self),
        fields(
            nodes = self.instance.num_nodes(),
            vehicles = self.instance.num_vehicles()
        )
    )]
    pub fn solve(&self) -> Result<SolveOutcome> {
        let initial = match cheapest_arc_insertion(self.instance) {
            Ok(solution) => solution,
            Err(RoutingError::InfeasibleInstance { unassigned }) => {
                warn!(?unassigned, "instance is infeasible");
                return Ok(SolveOutcome::NoSolution { unassigned });
            }
            Err(e) => return Err(e),
        };
        let initial_cost = CostEvaluator::new(self.instance).solution_cost(&initial)?;
        info!(
            cost = initial_cost,
            used = initial.used_vehicles().count(),
            "initial solution constructed"
        );

        let best = self.run_restarts(&initial)?;
        info!(
            cost = best.best_cost,
            improvement = initial_cost - best.best_cost,
            state = ?best.final_state,
            "search finished"
        );

        let mut report = extract(self.instance, &best.best)?;
        report.iterations = best.iterations;
        report.final_state = Some(best.final_state);
        Ok(SolveOutcome::Solved(report))
    }

    #[cfg(not(feature = "parallel"))]
    fn run_restarts(&self, initial: &Solution) -> Result<SearchOutcome> {
        let outcomes = (0..self.config.restarts.max(1))
            .map(|k| self.restart(k, initial))
            .collect::<Result<Vec<_>>>()?;
        cheapest(outcomes)
    }

    #[cfg(feature = "parallel")]
    fn run_restarts(&self, initial: &Solution) -> Result<SearchOutcome> {
        use rayon::prelude::*;

        let outcomes = (0..self.config.restarts.max(1))
            .into_par_iter()
            .map(|k| self.restart(k, initial))
            .collect::<Result<Vec<_>>>()?;
        cheapest(outcomes)
    }

    fn restart(&self, k: usize, initial: &Solution) -> Result<SearchOutcome> {
        let mut start = initial.clone();
        if k > 0 {
            let mut tracker = CapacityTracker::from_solution(self.instance, &start)?;
            let mut rng = u_numflow::random::create_rng(self.config.seed.wrapping_add(k as u64));
            let applied = perturb(
                &mut start,
                &mut tracker,
                self.config.perturbation_moves,
                &mut rng,
            )?;
            debug!(restart = k, applied, "perturbed starting point");
        }
        LocalSearchEngine::new(self.instance, self.config.clone())
            .with_stop_flag(self.stop.clone())
            .run(start)
    }
}

/// Lowest true cost, the earliest restart on ties.
fn cheapest(outcomes: Vec<SearchOutcome>) -> Result<SearchOutcome> {
    outcomes
        .into_iter()
        .min_by_key(|o| o.best_cost)
        .ok_or_else(|| RoutingError::engine("no restart ran"))
}
