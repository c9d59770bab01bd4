//! Guided local search engine.
//!
//! # Algorithm
//!
//! Each outer iteration first checks the time budget and the stop flag,
//! then asks every operator for its best move under the current objective
//! and commits the overall best one:
//!
//! 1. **Improving**: evaluate relocate, swap, 2-opt, Or-opt and 2-opt*.
//! 2. **Accepted**: an improving move was committed; if the true cost beats
//!    the incumbent, the incumbent is replaced by a copy.
//! 3. **Stalled**: no move improves the objective. On the first stall the
//!    penalty weight `λ` is derived from this local optimum.
//! 4. **Diversifying**: the max-utility arcs of the current solution are
//!    penalized and search resumes under `cost + λ × penalty`.
//!
//! The run ends in **TimedOut** when the budget is spent and in **Done**
//! on an external stop, on the iteration cap or when there is no arc left
//! to penalize. Moves are evaluated, checked and committed as one step, so
//! the engine never stops with a half-applied move.
//!
//! # Reference
//!
//! Voudouris, C. & Tsang, E. (2003). "Guided Local Search", in *Handbook of
//! Metaheuristics*, Springer, 185-218.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::penalties::{self, ArcPenalties, GuidedObjective};
use super::{Neighborhood, SearchConfig};
use crate::error::{Result, RoutingError};
use crate::evaluation::{CapacityTracker, CostEvaluator};
use crate::models::{Instance, Solution};

/// States of the search loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchState {
    /// Evaluating candidate moves.
    Improving,
    /// A move was committed.
    Accepted,
    /// No improving move under the current penalties.
    Stalled,
    /// Penalties were raised to leave a local optimum.
    Diversifying,
    /// The time budget ran out.
    TimedOut,
    /// Stopped by request, by the iteration cap or for lack of anything to
    /// penalize.
    Done,
}

impl SearchState {
    /// Returns `true` for `TimedOut` and `Done`.
    pub fn is_terminal(self) -> bool {
        matches!(self, SearchState::TimedOut | SearchState::Done)
    }
}

/// Shared flag for stopping a running search from another thread.
///
/// The engine polls it at the start of every outer iteration.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    /// Creates a flag that is not set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a stop.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once a stop was requested.
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of one local search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best solution found (never worse than the start).
    pub best: Solution,
    /// True cost of `best`.
    pub best_cost: i64,
    /// True cost of the starting solution.
    pub initial_cost: i64,
    /// Terminal state.
    pub final_state: SearchState,
    /// Outer iterations run.
    pub iterations: usize,
    /// Moves committed.
    pub accepted: usize,
    /// Times the search stalled.
    pub stalls: usize,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

/// Guided local search over a feasible solution.
///
/// # Examples
///
/// ```
/// use u_fleet::models::{Instance, InstanceData, Solution};
/// use u_fleet::local_search::{LocalSearchEngine, SearchConfig, SearchState};
///
/// let data = InstanceData::new(
///     vec![
///         vec![0.0, 1.0, 2.0, 3.0],
///         vec![1.0, 0.0, 1.0, 2.0],
///         vec![2.0, 1.0, 0.0, 1.0],
///         vec![3.0, 2.0, 1.0, 0.0],
///     ],
///     1,
/// );
/// let instance = Instance::new(&data).unwrap();
/// let config = SearchConfig::default().with_max_iterations(50);
///
/// let start = Solution::from_sequences(vec![vec![3, 1, 2]]);
/// let outcome = LocalSearchEngine::new(&instance, config).run(start).unwrap();
/// assert!(outcome.best_cost < outcome.initial_cost);
/// assert_eq!(outcome.final_state, SearchState::Done);
/// ```
pub struct LocalSearchEngine<'a> {
    instance: &'a Instance,
    config: SearchConfig,
    stop: StopFlag,
}

impl<'a> LocalSearchEngine<'a> {
    /// Creates an engine over `instance` with the given configuration.
    pub fn new(instance: &'a Instance, config: SearchConfig) -> Self {
        Self {
            instance,
            config,
            stop: StopFlag::new(),
        }
    }

    /// Uses a shared stop flag.
    pub fn with_stop_flag(mut self, stop: StopFlag) -> Self {
        self.stop = stop;
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs the search from `initial` and returns the best solution found.
    ///
    /// Fails with [`RoutingError::EngineError`] if `initial` is not a
    /// feasible solution of the instance.
    pub fn run(&self, initial: Solution) -> Result<SearchOutcome> {
        let start = Instant::now();
        let instance = self.instance;
        let evaluator = CostEvaluator::new(instance);

        let violations = initial.violations(instance);
        if !violations.is_empty() {
            return Err(RoutingError::engine(format!(
                "initial solution is infeasible: {:?}",
                violations[0].kind
            )));
        }

        let mut tracker = CapacityTracker::from_solution(instance, &initial)?;
        let initial_cost = evaluator.solution_cost(&initial)?;
        let mut current = initial;
        let mut best = current.clone();
        let mut best_cost = initial_cost;

        let mut penalties = ArcPenalties::new(instance.num_nodes());
        let mut lambda: Option<i64> = None;

        let mut iterations = 0usize;
        let mut accepted = 0usize;
        let mut stalls = 0usize;
        let final_state;

        loop {
            if start.elapsed() >= self.config.time_limit {
                final_state = SearchState::TimedOut;
                break;
            }
            if self.stop.is_stopped()
                || self
                    .config
                    .max_iterations
                    .is_some_and(|max| iterations >= max)
            {
                final_state = SearchState::Done;
                break;
            }
            iterations += 1;

            let max_segment = self.config.or_opt_max_segment;
            let candidate = match lambda {
                None => Neighborhood::new(instance, &current, &tracker, &evaluator)
                    .best_move(max_segment),
                Some(l) => {
                    let guided = GuidedObjective::new(instance, &penalties, l);
                    Neighborhood::new(instance, &current, &tracker, &guided).best_move(max_segment)
                }
            };

            match candidate {
                Some(c) => {
                    c.mv.apply(&mut current, &mut tracker)?;
                    accepted += 1;
                    debug_assert!(current.violations(instance).is_empty());
                    trace!(state = ?SearchState::Accepted, mv = ?c.mv, delta = c.delta);

                    let cost = evaluator.solution_cost(&current)?;
                    if cost < best_cost {
                        best_cost = cost;
                        best = current.clone();
                        debug!(iteration = iterations, cost = best_cost, "new incumbent");
                    }
                }
                None => {
                    stalls += 1;
                    trace!(state = ?SearchState::Stalled, iteration = iterations);
                    let l = *lambda.get_or_insert_with(|| {
                        penalties::lambda(instance, &current, self.config.lambda_coefficient)
                    });
                    let penalized = penalties.penalize_max_utility(instance, &current);
                    if penalized == 0 {
                        final_state = SearchState::Done;
                        break;
                    }
                    trace!(state = ?SearchState::Diversifying, penalized, lambda = l);
                }
            }
        }

        let elapsed = start.elapsed();
        info!(
            state = ?final_state,
            iterations,
            accepted,
            stalls,
            initial_cost,
            best_cost,
            elapsed_ms = elapsed.as_millis() as u64,
            "local search finished"
        );

        Ok(SearchOutcome {
            best,
            best_cost,
            initial_cost,
            final_state,
            iterations,
            accepted,
            stalls,
            elapsed,
        })
    }
}
