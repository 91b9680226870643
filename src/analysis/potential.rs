//! Gravitational potential for the bound-mass solver
//!
//! Defines the pairwise potential trait plus a direct sequential
//! n^2 kernel and a rayon row-parallel variant of the same sum

use rayon::prelude::*;

use crate::analysis::states::NVec3;
use crate::error::{BoundMassError, Result};

/// Trait for pairwise potential sources over a set of point masses
/// Implementations overwrite `out[i]` with the specific potential of particle `i`
///
/// With a mask, only pairs whose both ends are selected contribute and
/// unselected entries are left at zero
pub trait PairPotential {
    fn potential(&self, pos: &[NVec3], m: &[f64], mask: Option<&[bool]>, out: &mut [f64]) -> Result<()>;
}

/// Direct n^2 Newtonian potential, no softening
/// Coincident particles are a hard error instead of being smoothed
pub struct DirectPotential {
    pub G: f64, // gravitational constant in cloud units
}

impl PairPotential for DirectPotential {
    fn potential(&self, pos: &[NVec3], m: &[f64], mask: Option<&[bool]>, out: &mut [f64]) -> Result<()> {
        check_lengths(pos, m, mask, out)?;
        let n = pos.len();
        let active = |i: usize| mask.map_or(true, |mk| mk[i]);

        // Zero buffer
        for u in out.iter_mut() {
            *u = 0.0;
        }

        // Loop over each unordered pair (i, j) with i < j
        for i in 0..n {
            if !active(i) {
                continue;
            }
            let xi = pos[i]; // position of particle i
            let mi = m[i];   // mass of particle i

            for j in (i + 1)..n {
                if !active(j) {
                    continue;
                }

                // Separation |x_j - x_i|
                let r = (pos[j] - xi).norm();
                if r == 0.0 {
                    return Err(BoundMassError::NumericalSingularity { i, j });
                }

                // One distance, two contributions:
                // U_i -= G m_j / r
                // U_j -= G m_i / r
                let coef = self.G * r.recip();
                out[i] -= coef * m[j];
                out[j] -= coef * mi;
            }
        }
        Ok(())
    }
}

/// Same sum as [`DirectPotential`], split by rows over the rayon pool
/// Each row visits every partner so pairs are evaluated twice; the result
/// differs from the direct kernel only by summation order
pub struct ParallelPotential {
    pub G: f64,
}

impl PairPotential for ParallelPotential {
    fn potential(&self, pos: &[NVec3], m: &[f64], mask: Option<&[bool]>, out: &mut [f64]) -> Result<()> {
        check_lengths(pos, m, mask, out)?;
        let active = |i: usize| mask.map_or(true, |mk| mk[i]);

        out.par_iter_mut().enumerate().try_for_each(|(i, ui)| {
            *ui = 0.0;
            if !active(i) {
                return Ok(());
            }
            let xi = pos[i];
            let mut acc = 0.0;
            for (j, (xj, mj)) in pos.iter().zip(m).enumerate() {
                if j == i || !active(j) {
                    continue;
                }
                let r = (xj - xi).norm();
                if r == 0.0 {
                    return Err(BoundMassError::NumericalSingularity { i: i.min(j), j: i.max(j) });
                }
                acc -= mj / r;
            }
            *ui = self.G * acc;
            Ok(())
        })
    }
}

/// Convenience wrapper returning a fresh potential vector from the direct kernel
pub fn potential_energy(pos: &[NVec3], m: &[f64], G: f64, mask: Option<&[bool]>) -> Result<Vec<f64>> {
    let mut out = vec![0.0; pos.len()];
    DirectPotential { G }.potential(pos, m, mask, &mut out)?;
    Ok(out)
}

/// Pick the backend requested by the solver parameters
pub(crate) fn backend(G: f64, parallel: bool) -> Box<dyn PairPotential + Send + Sync> {
    if parallel {
        Box::new(ParallelPotential { G })
    } else {
        Box::new(DirectPotential { G })
    }
}

fn check_lengths(pos: &[NVec3], m: &[f64], mask: Option<&[bool]>, out: &[f64]) -> Result<()> {
    let n = pos.len();
    let mask_ok = mask.map_or(true, |mk| mk.len() == n);
    if m.len() != n || out.len() != n || !mask_ok {
        return Err(BoundMassError::invalid(format!(
            "potential inputs differ in length: pos = {}, m = {}, out = {}, mask = {:?}",
            n,
            m.len(),
            out.len(),
            mask.map(|mk| mk.len())
        )));
    }
    Ok(())
}
