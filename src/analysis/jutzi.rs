//! Peeling heuristic: start from everything and drop unbound particles
//! until a pass drops nobody.

use tracing::debug;

use crate::analysis::solver::{count, lowest_potential, Outcome, Workspace};
use crate::error::Result;

/// Each pass recomputes potentials inside the current candidate set and the
/// set's center-of-mass velocity, then removes every candidate whose total
/// specific energy in that frame is positive. Membership only shrinks.
///
/// The candidate with the lowest potential anchors the set and is never removed,
/// so the set never empties.
pub(crate) fn bound_jutzi(ws: &Workspace) -> Result<Outcome> {
    let n = ws.cloud.len();
    let mut members = vec![true; n];
    let mut history = vec![n];
    let mut iterations = 0;
    let mut converged = false;

    while iterations < ws.max_iterations {
        iterations += 1;

        let u = ws.potentials(Some(members.as_slice()))?;
        let Some(r) = lowest_potential(&u, Some(members.as_slice())) else {
            break;
        };
        let (_, _, frame) = ws.cloud.center_of_mass(&members);

        let unbound: Vec<usize> = (0..n)
            .filter(|&i| members[i] && i != r)
            .filter(|&i| ws.kinetic(i, &frame) + u[i] > 0.0)
            .collect();

        for &i in &unbound {
            members[i] = false;
        }
        history.push(count(&members));
        debug!(
            pass = iterations,
            reference = r,
            com_speed = frame.norm(),
            removed = unbound.len(),
            candidates = count(&members),
            "jutzi pass"
        );

        if unbound.is_empty() {
            converged = true;
            break;
        }
    }

    Ok(Outcome { members, converged, iterations, history, num_clumps: None })
}
