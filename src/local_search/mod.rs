//! Guided local search over multi-vehicle solutions.
//!
//! - [`relocate`](best_relocate) — Single-node relocation within or between routes
//! - [`swap`](best_swap) — Inter-route node exchange
//! - [`two_opt`](best_two_opt) — Intra-route segment reversal
//! - [`or_opt`](best_or_opt) — Segment relocation, optionally reversed
//! - [`exchange`](best_cross) — 2-opt* tail exchange between routes
//! - [`LocalSearchEngine`] — Guided local search state machine

mod config;
mod engine;
mod exchange;
mod moves;
mod neighborhood;
mod or_opt;
mod penalties;
mod perturb;
mod relocate;
mod swap;
mod two_opt;

pub use config::SearchConfig;
pub use engine::{LocalSearchEngine, SearchOutcome, SearchState, StopFlag};
pub use exchange::best_cross;
pub use moves::{Candidate, Move};
pub use neighborhood::Neighborhood;
pub use or_opt::best_or_opt;
pub use penalties::{lambda, ArcPenalties, GuidedObjective};
pub use perturb::perturb;
pub use relocate::best_relocate;
pub use swap::best_swap;
pub use two_opt::best_two_opt;
