//! Algorithm selection and numerical parameters for the solver
//!
//! `Method` names one of the four bound-mass heuristics,
//! `SolverParams` holds the knobs they need:
//! - clustering length scale (naor2 only),
//! - iteration cap for the iterative variants (jutzi, naor1),
//! - whether to evaluate potentials on the rayon pool

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BoundMassError;

pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Which bound-mass heuristic to run
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Kory,  // single pass, rest frame of the deepest particle
    Jutzi, // peel off unbound particles until stable
    Naor1, // grow from the deepest particle until stable
    Naor2, // largest proximity clump plus a point-mass capture pass
}

impl Method {
    pub const ALL: [Method; 4] = [Method::Kory, Method::Jutzi, Method::Naor1, Method::Naor2];

    pub fn name(&self) -> &'static str {
        match self {
            Method::Kory => "kory",
            Method::Jutzi => "jutzi",
            Method::Naor1 => "naor1",
            Method::Naor2 => "naor2",
        }
    }

    /// True for the variants that iterate to a fixed point
    pub fn is_iterative(&self) -> bool {
        matches!(self, Method::Jutzi | Method::Naor1)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = BoundMassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| {
                BoundMassError::invalid(format!(
                    "unknown method {:?}, expected one of kory, jutzi, naor1, naor2",
                    s
                ))
            })
    }
}

#[derive(Debug, Clone)]
pub struct SolverParams {
    pub length_scale: Option<f64>, // proximity threshold for naor2
    pub max_iterations: usize, // cap on jutzi / naor1 passes
    pub parallel: bool, // rayon potential evaluation
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            length_scale: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            parallel: false,
        }
    }
}

impl SolverParams {
    pub fn with_length_scale(mut self, length_scale: f64) -> Self {
        self.length_scale = Some(length_scale);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
