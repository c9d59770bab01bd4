//! Random feasible relocations used to diversify independent restarts.

use rand::Rng;

use super::moves::Move;
use crate::error::Result;
use crate::evaluation::CapacityTracker;
use crate::models::Solution;

/// Applies up to `moves` random relocations that keep every vehicle within
/// capacity, and returns how many were applied.
///
/// A relocation picks a random served node, a random vehicle and a random
/// position. Infeasible draws are skipped; the number of draws is bounded
/// so a tightly packed fleet cannot stall the caller.
///
/// # Examples
///
/// ```
/// use u_fleet::models::{Instance, InstanceData, Solution};
/// use u_fleet::evaluation::CapacityTracker;
/// use u_fleet::local_search::perturb;
///
/// let data = InstanceData::new(
///     vec![
///         vec![0.0, 1.0, 2.0],
///         vec![1.0, 0.0, 1.0],
///         vec![2.0, 1.0, 0.0],
///     ],
///     2,
/// );
/// let instance = Instance::new(&data).unwrap();
/// let mut sol = Solution::from_sequences(vec![vec![1, 2], vec![]]);
/// let mut tracker = CapacityTracker::from_solution(&instance, &sol).unwrap();
///
/// let mut rng = u_numflow::random::create_rng(7);
/// perturb(&mut sol, &mut tracker, 5, &mut rng).unwrap();
/// assert_eq!(sol.num_served(), 2);
/// assert!(sol.violations(&instance).is_empty());
/// ```
pub fn perturb<R: Rng>(
    solution: &mut Solution,
    tracker: &mut CapacityTracker<'_>,
    moves: usize,
    rng: &mut R,
) -> Result<usize> {
    let vehicles = solution.num_routes();
    let mut applied = 0;
    let max_draws = moves.saturating_mul(10);

    for _ in 0..max_draws {
        if applied == moves {
            break;
        }
        let served = solution.num_served();
        if served == 0 || vehicles == 0 {
            break;
        }

        // Pick random served node
        let target = rng.random_range(0..served as u64) as usize;
        let mut count = 0;
        let mut picked = None;
        for route in solution.routes() {
            if count + route.len() > target {
                picked = Some((route.vehicle_id(), target - count));
                break;
            }
            count += route.len();
        }
        let Some((from_vehicle, from_pos)) = picked else {
            break;
        };
        let node = solution.route(from_vehicle).nodes()[from_pos];

        let to_vehicle = rng.random_range(0..vehicles as u64) as usize;
        let slots = if to_vehicle == from_vehicle {
            solution.route(to_vehicle).len()
        } else {
            if !tracker.can_append(to_vehicle, node) {
                continue;
            }
            solution.route(to_vehicle).len() + 1
        };
        let to_pos = rng.random_range(0..slots as u64) as usize;

        Move::Relocate {
            from_vehicle,
            from_pos,
            to_vehicle,
            to_pos,
        }
        .apply(solution, tracker)?;
        applied += 1;
    }
    Ok(applied)
}
