//! Configuration types for loading solver settings from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! bound-mass run. It only names the algorithm and its knobs; the particle
//! data comes from the snapshot file.
//!
//! # YAML format
//! An example matching these types:
//!
//! ```yaml
//! method: naor2            # kory | jutzi | naor1 | naor2
//! units: [1.0, 1.0, 1.0]   # length, mass, time of the snapshot, in MKS
//! length_scale: 2.0e3      # clump proximity threshold (naor2 only)
//! max_iterations: 500      # cap for jutzi / naor1
//! parallel: true           # evaluate potentials on the rayon pool
//! ```
//!
//! [`SolverConfig::build`] maps this into the runtime types the solver takes.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::analysis::params::{Method, SolverParams, DEFAULT_MAX_ITERATIONS};
use crate::analysis::states::UnitScale;

/// Top-level solver configuration loaded from YAML
#[derive(Deserialize, Debug, Clone)]
pub struct SolverConfig {
    pub method: Method, // which heuristic to run
    pub units: Option<[f64; 3]>, // length, mass, time in MKS; defaults to (1, 1, 1)
    pub length_scale: Option<f64>, // proximity threshold, required by naor2
    pub max_iterations: Option<usize>, // iteration cap for the fixed-point variants
    pub parallel: Option<bool>, // rayon potential evaluation
}

impl SolverConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("cannot open config {}", path.display()))?;
        let cfg = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("cannot parse config {}", path.display()))?;
        Ok(cfg)
    }

    /// Runtime triple handed to `solve`
    pub fn build(&self) -> (UnitScale, Method, SolverParams) {
        let units = self
            .units
            .map(|[l, m, t]| UnitScale::new(l, m, t))
            .unwrap_or_default();

        let params = SolverParams {
            length_scale: self.length_scale,
            max_iterations: self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
            parallel: self.parallel.unwrap_or(false),
        };

        (units, self.method, params)
    }
}
