//! Single-pass heuristic: energies in the rest frame of the deepest particle.

use tracing::debug;

use crate::analysis::solver::{count, lowest_potential, Outcome, Workspace};
use crate::error::Result;

/// Mark every particle with negative total specific energy in the rest frame of
/// the particle with the lowest lab-frame potential. The reference particle
/// itself is always bound.
pub(crate) fn bound_kory(ws: &Workspace) -> Result<Outcome> {
    let n = ws.cloud.len();
    let u = ws.potentials(None)?;
    let mut members = vec![false; n];

    let Some(r) = lowest_potential(&u, None) else {
        return Ok(Outcome { members, converged: true, iterations: 0, history: vec![n], num_clumps: None });
    };
    let frame = ws.cloud.vel[r];
    debug!(reference = r, potential = u[r], "kory reference particle");

    for i in 0..n {
        members[i] = i == r || ws.kinetic(i, &frame) + u[i] < 0.0;
    }

    let bound = count(&members);
    Ok(Outcome {
        members,
        converged: true,
        iterations: 1,
        history: vec![n, bound],
        num_clumps: None,
    })
}
