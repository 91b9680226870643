//! # Proximity clumps
//!
//! Partitions a cloud into connected components ("clumps"): two particles
//! share a clump iff a chain of pairwise separations, each below the
//! threshold `L`, links them.
//!
//! ## Algorithm
//!
//! This is the incremental equivalence-class method (eclazz) specialised to a
//! euclidean distance test. Particles are inserted in input order. Each new
//! particle `j` starts as its own class; it is then compared with every earlier
//! particle `k`, and before the comparison `k`'s label is moved one step closer to
//! its root (path halving). When `j` and `k` are close, the root of `k`'s class is
//! redirected to `j`. A final single pass points every label straight at its root.
//!
//! The partition does not depend on input order. The root ids do: every root is
//! the largest index of its class.
//!
//! Cost is O(n²) time and O(n) extra space. Insertion `j` reads labels left by all
//! earlier insertions, so this loop stays sequential.

use crate::analysis::states::NVec3;
use crate::error::{BoundMassError, Result};

/// Label-redirection array: `parent[i]` points at another member of `i`'s class,
/// and roots point at themselves
struct EquivalenceClasses {
    parent: Vec<usize>,
}

impl EquivalenceClasses {
    fn with_capacity(n: usize) -> Self {
        Self { parent: Vec::with_capacity(n) }
    }

    /// New singleton class whose root is the element's own index
    fn push(&mut self) -> usize {
        let j = self.parent.len();
        self.parent.push(j);
        j
    }

    /// One path-halving step: `k` now points where its target pointed
    fn resolve(&mut self, k: usize) -> usize {
        self.parent[k] = self.parent[self.parent[k]];
        self.parent[k]
    }

    /// Two-step redirection of `k`'s class onto `j`.
    /// Only valid right after `resolve(k)` during insertion of `j`
    fn union_into(&mut self, k: usize, j: usize) {
        let target = self.parent[self.parent[k]];
        self.parent[target] = j;
    }

    fn finish(mut self) -> Vec<usize> {
        for j in 0..self.parent.len() {
            self.resolve(j);
        }
        debug_assert!(self.parent.iter().all(|&r| self.parent[r] == r));
        self.parent
    }
}

/// Result of [`fast_clumps`]: `labels[i]` is the root id of `i`'s clump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClumpLabeling {
    labels: Vec<usize>,
}

impl ClumpLabeling {
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, i: usize) -> usize {
        self.labels[i]
    }

    /// Distinct root ids, ascending
    pub fn roots(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.labels[i] == i).collect()
    }

    pub fn num_clumps(&self) -> usize {
        self.labels.iter().enumerate().filter(|&(i, &r)| i == r).count()
    }

    pub fn members(&self, root: usize) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.labels[i] == root).collect()
    }

    pub fn same_clump(&self, i: usize, j: usize) -> bool {
        self.labels[i] == self.labels[j]
    }

    /// `(root, total mass)` per clump, ordered by root id
    pub fn clump_masses(&self, m: &[f64]) -> Vec<(usize, f64)> {
        let mut totals = vec![0.0; self.len()];
        for (i, &r) in self.labels.iter().enumerate() {
            totals[r] += m[i];
        }
        self.roots().into_iter().map(|r| (r, totals[r])).collect()
    }

    /// Root of the heaviest clump; ties go to the smallest root id.
    /// `None` only for an empty labeling
    pub fn largest_by_mass(&self, m: &[f64]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (r, mass) in self.clump_masses(m) {
            if best.map_or(true, |(_, b)| mass > b) {
                best = Some((r, mass));
            }
        }
        best.map(|(r, _)| r)
    }
}

/// Label the clumps of `pos` under the proximity threshold `L`.
///
/// `L == 0` leaves every particle alone; `L == f64::INFINITY` puts them all
/// in one clump. Negative or NaN thresholds are rejected.
pub fn fast_clumps(pos: &[NVec3], L: f64) -> Result<ClumpLabeling> {
    if L.is_nan() || L < 0.0 {
        return Err(BoundMassError::invalid(format!(
            "clump threshold must be non-negative, got {}",
            L
        )));
    }
    let L2 = L * L;
    let n = pos.len();

    let mut classes = EquivalenceClasses::with_capacity(n);
    for j in 0..n {
        classes.push();
        let pj = pos[j];
        for k in 0..j {
            classes.resolve(k);
            if (pj - pos[k]).norm_squared() < L2 {
                classes.union_into(k, j);
            }
        }
    }

    Ok(ClumpLabeling { labels: classes.finish() })
}
