//! Guided local search arc penalties and the augmented objective.
//!
//! # Algorithm
//!
//! Every directed arc `(i, j)` carries a penalty count `p(i, j)`. Move
//! selection sees
//!
//! ```text
//! t'(v, i, j) = t(v, i, j) + λ × p(i, j)
//! ```
//!
//! When the search stalls, the arcs of the current solution with the
//! largest utility `d(i, j) / (1 + p(i, j))` are penalized. Long arcs that
//! keep showing up in local optima are pushed out first.
//!
//! # Reference
//!
//! Voudouris, C. & Tsang, E. (1999). "Guided Local Search and its
//! Application to the Traveling Salesman Problem", *European Journal of
//! Operational Research* 113(2), 469-499.

use crate::evaluation::{ArcObjective, CostEvaluator};
use crate::models::{Instance, Solution};

/// Dense row-major penalty counts, one per directed arc.
///
/// Increments saturate at `u32::MAX`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcPenalties {
    counts: Vec<u32>,
    size: usize,
}

impl ArcPenalties {
    /// Creates zero penalties for `size` nodes.
    pub fn new(size: usize) -> Self {
        Self {
            counts: vec![0; size * size],
            size,
        }
    }

    /// Penalty count of arc `from → to`.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> u32 {
        self.counts[from * self.size + to]
    }

    /// Adds one to the penalty of arc `from → to`.
    #[inline]
    pub fn increment(&mut self, from: usize, to: usize) {
        let c = &mut self.counts[from * self.size + to];
        *c = c.saturating_add(1);
    }

    /// Sum of all penalty counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    /// Penalizes every arc of `solution` with maximum utility and returns how
    /// many arcs were penalized.
    ///
    /// Returns 0 when the solution has no arc with positive distance, in
    /// which case there is nothing left to diversify on.
    pub fn penalize_max_utility(&mut self, instance: &Instance, solution: &Solution) -> usize {
        let depot = instance.depot();
        let mut best: Vec<(usize, usize)> = Vec::new();
        // utility as the fraction distance / (1 + penalty)
        let mut best_num = 0i128;
        let mut best_den = 1i128;

        for route in solution.routes() {
            for (from, to) in route.arcs(depot) {
                let num = i128::from(instance.distance(from, to));
                let den = 1 + i128::from(self.get(from, to));
                if num <= 0 {
                    continue;
                }
                let lhs = num * best_den;
                let rhs = best_num * den;
                if lhs > rhs {
                    best.clear();
                    best.push((from, to));
                    best_num = num;
                    best_den = den;
                } else if lhs == rhs {
                    best.push((from, to));
                }
            }
        }

        for &(from, to) in &best {
            self.increment(from, to);
        }
        best.len()
    }
}

/// Penalty weight `λ` for a first local optimum.
///
/// `λ = coefficient × variable cost / arcs`, at least 1 so penalties always
/// bite.
pub fn lambda(instance: &Instance, solution: &Solution, coefficient: f64) -> i64 {
    let evaluator = CostEvaluator::new(instance);
    let depot = instance.depot();
    let mut arcs = 0usize;
    let mut variable = 0i128;
    for route in solution.routes() {
        let vehicle = route.vehicle_id();
        for (from, to) in route.arcs(depot) {
            arcs += 1;
            variable += evaluator.transit(vehicle, from, to);
        }
    }
    if arcs == 0 {
        return 1;
    }
    let raw = coefficient * variable as f64 / arcs as f64;
    if raw.is_finite() && raw >= 1.0 {
        // saturating float-to-int cast
        raw as i64
    } else {
        1
    }
}

/// True arc costs augmented with `λ × penalty`.
///
/// Fixed costs are not penalized. The augmented cost is exact: `λ` and the
/// true arc cost are `i64` and penalty counts `u32`, so it never leaves the
/// `i128` range however long the search runs.
#[derive(Debug, Clone, Copy)]
pub struct GuidedObjective<'p, 'a> {
    evaluator: CostEvaluator<'a>,
    penalties: &'p ArcPenalties,
    lambda: i64,
}

impl<'p, 'a> GuidedObjective<'p, 'a> {
    /// Wraps the true costs of `instance` with the given penalties.
    pub fn new(instance: &'a Instance, penalties: &'p ArcPenalties, lambda: i64) -> Self {
        Self {
            evaluator: CostEvaluator::new(instance),
            penalties,
            lambda,
        }
    }
}

impl ArcObjective for GuidedObjective<'_, '_> {
    #[inline]
    fn transit(&self, vehicle: usize, from: usize, to: usize) -> i128 {
        let penalty = i128::from(self.lambda) * i128::from(self.penalties.get(from, to));
        self.evaluator.transit(vehicle, from, to) + penalty
    }

    #[inline]
    fn fixed(&self, vehicle: usize) -> i128 {
        self.evaluator.fixed(vehicle)
    }
}
