//! Bound-mass solver entry point
//!
//! Validates the inputs, rescales G to the cloud's units and dispatches to
//! one of the four heuristics. Each heuristic returns an [`Outcome`]; the
//! solver turns it into a [`BoundMassResult`].

use tracing::{info, warn};

use crate::analysis::params::{Method, SolverParams};
use crate::analysis::potential::{backend, PairPotential};
use crate::analysis::states::{NVec3, ParticleCloud, UnitScale};
use crate::analysis::{jutzi, kory, naor};
use crate::error::{BoundMassError, Result};

/// Largest bound subset found by one solver run
#[derive(Debug, Clone, PartialEq)]
pub struct BoundMassResult {
    pub method: Method,
    pub bound_mass: f64, // sum of m[i] over members
    pub members: Vec<bool>, // membership per particle, same order as the cloud
    pub converged: bool, // false when the iteration cap was hit first
    pub iterations: usize, // energy passes performed
    pub history: Vec<usize>, // candidate set size before the first pass and after each pass
    pub num_clumps: Option<usize>, // proximity clumps found (naor2 only)
}

impl BoundMassResult {
    pub fn bound_count(&self) -> usize {
        self.members.iter().filter(|&&b| b).count()
    }

    pub fn bound_fraction(&self, total_mass: f64) -> f64 {
        self.bound_mass / total_mass
    }

    /// Fail with [`BoundMassError::NonConvergence`] unless a fixed point was reached
    pub fn require_converged(self) -> Result<Self> {
        if self.converged {
            Ok(self)
        } else {
            Err(BoundMassError::NonConvergence {
                method: self.method,
                iterations: self.iterations,
            })
        }
    }
}

/// What a heuristic hands back before the mass is summed
pub(crate) struct Outcome {
    pub members: Vec<bool>,
    pub converged: bool,
    pub iterations: usize,
    pub history: Vec<usize>,
    pub num_clumps: Option<usize>,
}

/// Shared inputs for the heuristics
pub(crate) struct Workspace<'a> {
    pub cloud: &'a ParticleCloud,
    pub G: f64,
    pub potential: Box<dyn PairPotential + Send + Sync>,
    pub max_iterations: usize,
}

impl Workspace<'_> {
    /// Specific potential of every particle, optionally restricted to `mask`
    pub fn potentials(&self, mask: Option<&[bool]>) -> Result<Vec<f64>> {
        let mut u = vec![0.0; self.cloud.len()];
        self.potential.potential(&self.cloud.pos, &self.cloud.m, mask, &mut u)?;
        Ok(u)
    }

    /// Specific kinetic energy of particle `i` in a frame moving at `frame`
    pub fn kinetic(&self, i: usize, frame: &NVec3) -> f64 {
        0.5 * (self.cloud.vel[i] - frame).norm_squared()
    }

    /// Specific potential of particle `i` in the field of a point mass `mass` at `center`.
    /// A particle sitting on the center is infinitely deep, hence always captured
    pub fn point_mass_potential(&self, i: usize, mass: f64, center: &NVec3) -> f64 {
        let d = (self.cloud.pos[i] - center).norm();
        if d == 0.0 {
            return f64::NEG_INFINITY;
        }
        -self.G * mass / d
    }
}

/// Index of the lowest (most negative) potential among the selected particles.
/// Ties go to the smallest index
pub(crate) fn lowest_potential(u: &[f64], mask: Option<&[bool]>) -> Option<usize> {
    let mut best: Option<usize> = None;
    for i in 0..u.len() {
        if mask.map_or(false, |mk| !mk[i]) {
            continue;
        }
        if best.map_or(true, |b| u[i] < u[b]) {
            best = Some(i);
        }
    }
    best
}

pub(crate) fn count(members: &[bool]) -> usize {
    members.iter().filter(|&&b| b).count()
}

/// Find the largest gravitationally bound subset of `cloud` with `method`.
///
/// All four heuristics are approximations; the only sure test is integrating
/// the system for many dynamical times. Invalid inputs are rejected before any
/// work is done. Coincident particles abort the run with
/// [`BoundMassError::NumericalSingularity`]. Hitting the iteration cap does not
/// fail: check [`BoundMassResult::converged`].
pub fn solve(cloud: &ParticleCloud, units: &UnitScale, method: Method, params: &SolverParams) -> Result<BoundMassResult> {
    cloud.validate()?;
    units.validate()?;
    if params.max_iterations == 0 {
        return Err(BoundMassError::invalid("max_iterations must be at least 1"));
    }
    let length_scale = match (method, params.length_scale) {
        (Method::Naor2, Some(l)) if l.is_finite() && l > 0.0 => l,
        (Method::Naor2, other) => {
            return Err(BoundMassError::invalid(format!(
                "naor2 needs a positive finite length scale, got {:?}",
                other
            )))
        }
        (_, _) => 0.0,
    };

    let G = units.gravitational_constant();
    let ws = Workspace {
        cloud,
        G,
        potential: backend(G, params.parallel),
        max_iterations: params.max_iterations,
    };

    let outcome = match method {
        Method::Kory => kory::bound_kory(&ws)?,
        Method::Jutzi => jutzi::bound_jutzi(&ws)?,
        Method::Naor1 => naor::bound_naor1(&ws)?,
        Method::Naor2 => naor::bound_naor2(&ws, length_scale)?,
    };

    let bound_mass: f64 = cloud
        .m
        .iter()
        .zip(&outcome.members)
        .filter(|(_, &b)| b)
        .map(|(mi, _)| mi)
        .sum();

    let result = BoundMassResult {
        method,
        bound_mass,
        members: outcome.members,
        converged: outcome.converged,
        iterations: outcome.iterations,
        history: outcome.history,
        num_clumps: outcome.num_clumps,
    };

    if !result.converged {
        warn!(
            method = %method,
            iterations = result.iterations,
            "iteration cap reached before a fixed point"
        );
    }
    info!(
        method = %method,
        bound = result.bound_count(),
        n = cloud.len(),
        bound_mass = result.bound_mass,
        "bound mass found"
    );

    Ok(result)
}
