//! Core state types for the bound-mass analysis.
//!
//! Defines the particle cloud a snapshot is reduced to and the unit scale
//! used to express the gravitational constant in the cloud's units:
//! - `ParticleCloud` using `NVec3` positions and velocities plus masses
//! - `UnitScale` the (length, mass, time) triple in MKS
//!
//! Clouds are transient: built per invocation and never mutated by the solver.

use nalgebra::Vector3;

use crate::error::{BoundMassError, Result};

pub type NVec3 = Vector3<f64>;

/// Gravitational constant in MKS.
pub const BIG_G_MKS: f64 = 6.67384e-11;

/// A snapshot of point masses as parallel arrays.
/// Order only matters to the clustering tie-break, not to the physics.
#[derive(Debug, Clone, Default)]
pub struct ParticleCloud {
    pub pos: Vec<NVec3>, // positions
    pub vel: Vec<NVec3>, // velocities
    pub m: Vec<f64>, // masses
}

impl ParticleCloud {
    pub fn new(pos: Vec<NVec3>, vel: Vec<NVec3>, m: Vec<f64>) -> Self {
        Self { pos, vel, m }
    }

    /// Build a cloud from plain `[x, y, z]` rows
    pub fn from_rows(pos: &[[f64; 3]], vel: &[[f64; 3]], m: &[f64]) -> Self {
        Self {
            pos: pos.iter().map(|p| NVec3::new(p[0], p[1], p[2])).collect(),
            vel: vel.iter().map(|v| NVec3::new(v[0], v[1], v[2])).collect(),
            m: m.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.m.is_empty()
    }

    pub fn total_mass(&self) -> f64 {
        self.m.iter().sum()
    }

    /// Reject clouds the solver cannot work with.
    /// Nothing is computed before this passes.
    pub fn validate(&self) -> Result<()> {
        let n = self.m.len();
        if n == 0 {
            return Err(BoundMassError::invalid("particle cloud is empty"));
        }
        if self.pos.len() != n || self.vel.len() != n {
            return Err(BoundMassError::invalid(format!(
                "array lengths differ: pos = {}, vel = {}, m = {}",
                self.pos.len(),
                self.vel.len(),
                n
            )));
        }
        if let Some(i) = self.m.iter().position(|&mi| !(mi.is_finite() && mi > 0.0)) {
            return Err(BoundMassError::invalid(format!(
                "mass of particle {} must be positive and finite, got {}",
                i, self.m[i]
            )));
        }
        if let Some(i) = self.pos.iter().position(|x| !x.iter().all(|c| c.is_finite())) {
            return Err(BoundMassError::invalid(format!("position of particle {} is not finite", i)));
        }
        if let Some(i) = self.vel.iter().position(|v| !v.iter().all(|c| c.is_finite())) {
            return Err(BoundMassError::invalid(format!("velocity of particle {} is not finite", i)));
        }
        Ok(())
    }

    /// Aggregate mass, center-of-mass position and center-of-mass velocity
    /// of the particles selected by `mask`.
    /// Returns zero mass and zero vectors for an empty selection.
    pub fn center_of_mass(&self, mask: &[bool]) -> (f64, NVec3, NVec3) {
        let mut mass = 0.0;
        let mut r = NVec3::zeros();
        let mut v = NVec3::zeros();
        for i in (0..self.len()).filter(|&i| mask[i]) {
            mass += self.m[i];
            r += self.m[i] * self.pos[i];
            v += self.m[i] * self.vel[i];
        }
        if mass > 0.0 {
            r /= mass;
            v /= mass;
        }
        (mass, r, v)
    }
}

/// Length, mass and time units, in MKS, of the stored coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitScale {
    pub length: f64,
    pub mass: f64,
    pub time: f64,
}

impl Default for UnitScale {
    fn default() -> Self {
        Self { length: 1.0, mass: 1.0, time: 1.0 }
    }
}

impl UnitScale {
    pub fn new(length: f64, mass: f64, time: f64) -> Self {
        Self { length, mass, time }
    }

    pub fn validate(&self) -> Result<()> {
        let ok = |x: f64| x.is_finite() && x > 0.0;
        if ok(self.length) && ok(self.mass) && ok(self.time) {
            Ok(())
        } else {
            Err(BoundMassError::invalid(format!(
                "unit scale components must be positive, got ({}, {}, {})",
                self.length, self.mass, self.time
            )))
        }
    }

    /// G expressed in these units: G_mks * L^-3 * M * T^2
    pub fn gravitational_constant(&self) -> f64 {
        BIG_G_MKS * self.length.powi(-3) * self.mass * self.time.powi(2)
    }
}
