//! Growing heuristics seeded either by the deepest particle (naor1) or by the
//! heaviest proximity clump (naor2). Both treat the current bound set as a
//! single point mass at its center of mass.

use tracing::debug;

use crate::analysis::clumps::fast_clumps;
use crate::analysis::solver::{count, lowest_potential, Outcome, Workspace};
use crate::error::Result;

/// Start from the particle with the lowest potential. Each pass moves to the
/// set's center-of-mass frame and adds every outside particle with negative
/// energy relative to the set's aggregate mass. Membership only grows.
pub(crate) fn bound_naor1(ws: &Workspace) -> Result<Outcome> {
    let n = ws.cloud.len();
    let u = ws.potentials(None)?;
    let mut members = vec![false; n];

    let Some(seed) = lowest_potential(&u, None) else {
        return Ok(Outcome { members, converged: true, iterations: 0, history: vec![n], num_clumps: None });
    };
    members[seed] = true;

    let mut history = vec![1];
    let mut iterations = 0;
    let mut converged = false;

    while iterations < ws.max_iterations {
        iterations += 1;

        let (mass, center, frame) = ws.cloud.center_of_mass(&members);
        let mut captured = Vec::new();
        for i in (0..n).filter(|&i| !members[i]) {
            let e = ws.kinetic(i, &frame) + ws.point_mass_potential(i, mass, &center);
            if e < 0.0 {
                captured.push(i);
            }
        }

        for &i in &captured {
            members[i] = true;
        }
        history.push(count(&members));
        debug!(
            pass = iterations,
            set_mass = mass,
            added = captured.len(),
            members = count(&members),
            "naor1 pass"
        );

        if captured.is_empty() {
            converged = true;
            break;
        }
    }

    Ok(Outcome { members, converged, iterations, history, num_clumps: None })
}

/// Take the heaviest clump under `length_scale` as bound, then make one pass over
/// the remaining particles: a particle joins when its lab-frame kinetic energy
/// plus the clump's point-mass potential is negative. The clump's mass and
/// center are not updated during the pass.
pub(crate) fn bound_naor2(ws: &Workspace, length_scale: f64) -> Result<Outcome> {
    let n = ws.cloud.len();
    let labels = fast_clumps(&ws.cloud.pos, length_scale)?;
    let num_clumps = labels.num_clumps();

    let Some(major) = labels.largest_by_mass(&ws.cloud.m) else {
        return Ok(Outcome { members: vec![false; n], converged: true, iterations: 0, history: vec![n], num_clumps: Some(0) });
    };
    let mut members: Vec<bool> = (0..n).map(|i| labels.label(i) == major).collect();
    let clump_size = count(&members);

    let (mass, center, _) = ws.cloud.center_of_mass(&members);
    debug!(clumps = num_clumps, major, clump_size, clump_mass = mass, "naor2 major clump");

    let mut captured = Vec::new();
    for i in (0..n).filter(|&i| !members[i]) {
        let e = 0.5 * ws.cloud.vel[i].norm_squared() + ws.point_mass_potential(i, mass, &center);
        if e < 0.0 {
            captured.push(i);
        }
    }
    for &i in &captured {
        members[i] = true;
    }

    let bound = count(&members);
    Ok(Outcome {
        members,
        converged: true,
        iterations: 1,
        history: vec![clump_size, bound],
        num_clumps: Some(num_clumps),
    })
}
