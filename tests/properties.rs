//! Property-based tests for clumping and the bound-mass solver using proptest
//!
//! These tests check invariants across random clouds:
//! - clump partitions ignore input order and match a plain union-find
//! - bound mass is positive, at most the total, and equals the member sum
//! - jutzi only shrinks, naor1 only grows, both within the iteration cap
//! - naor2 never drops below its seed clump
//! - repeated runs agree

use boundmass::{fast_clumps, solve, BIG_G_MKS};
use boundmass::{Method, NVec3, ParticleCloud, SolverParams, UnitScale};
use proptest::prelude::*;

const MAX_PARTICLES: usize = 14;
const BOX: f64 = 10.0; // positions in [-BOX, BOX)^3
const MAX_SPEED: f64 = 2.0;

fn unit_g() -> UnitScale {
    UnitScale::new(1.0, 1.0 / BIG_G_MKS, 1.0)
}

fn vec3(range: f64) -> impl Strategy<Value = NVec3> {
    (-range..range, -range..range, -range..range).prop_map(|(x, y, z)| NVec3::new(x, y, z))
}

/// Random cloud with pairwise distinct positions
fn cloud() -> impl Strategy<Value = ParticleCloud> {
    (1..=MAX_PARTICLES)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(vec3(BOX), n),
                prop::collection::vec(vec3(MAX_SPEED), n),
                prop::collection::vec(0.1..10.0f64, n),
            )
        })
        .prop_map(|(pos, vel, m)| ParticleCloud::new(pos, vel, m))
        .prop_filter("coincident particles", |c| {
            (0..c.len()).all(|i| (0..i).all(|j| c.pos[i] != c.pos[j]))
        })
}

/// Reference connected components: plain union-find with full path walks
fn reference_components(pos: &[NVec3], L: f64) -> Vec<usize> {
    let mut parent: Vec<usize> = (0..pos.len()).collect();
    fn find(parent: &[usize], mut x: usize) -> usize {
        while parent[x] != x {
            x = parent[x];
        }
        x
    }
    for i in 0..pos.len() {
        for j in 0..i {
            if (pos[i] - pos[j]).norm_squared() < L * L {
                let (ri, rj) = (find(&parent, i), find(&parent, j));
                parent[ri] = rj;
            }
        }
    }
    (0..pos.len()).map(|i| find(&parent, i)).collect()
}

fn params_with(length_scale: f64) -> SolverParams {
    SolverParams::default()
        .with_length_scale(length_scale)
        .with_max_iterations(50)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn clumps_match_reference(c in cloud(), L in 0.0..12.0f64) {
        let labels = fast_clumps(&c.pos, L).unwrap();
        let reference = reference_components(&c.pos, L);

        for i in 0..c.len() {
            prop_assert_eq!(labels.label(labels.label(i)), labels.label(i), "label {} not resolved", i);
            for j in 0..c.len() {
                prop_assert_eq!(labels.same_clump(i, j), reference[i] == reference[j]);
            }
        }
    }

    #[test]
    fn clumps_ignore_input_order(
        (c, perm) in cloud().prop_flat_map(|c| {
            let n = c.len();
            (Just(c), Just((0..n).collect::<Vec<usize>>()).prop_shuffle())
        }),
        L in 0.0..12.0f64,
    ) {
        let shuffled: Vec<NVec3> = perm.iter().map(|&k| c.pos[k]).collect();
        let mut inverse = vec![0; perm.len()];
        for (k, &i) in perm.iter().enumerate() {
            inverse[i] = k;
        }

        let a = fast_clumps(&c.pos, L).unwrap();
        let b = fast_clumps(&shuffled, L).unwrap();
        prop_assert_eq!(a.num_clumps(), b.num_clumps());
        for i in 0..c.len() {
            for j in 0..c.len() {
                prop_assert_eq!(a.same_clump(i, j), b.same_clump(inverse[i], inverse[j]));
            }
        }
    }

    #[test]
    fn bound_mass_is_consistent(c in cloud(), length_scale in 0.5..8.0f64) {
        let total = c.total_mass();
        for method in Method::ALL {
            let r = solve(&c, &unit_g(), method, &params_with(length_scale)).unwrap();

            let member_sum: f64 = c.m.iter().zip(&r.members).filter(|(_, &b)| b).map(|(m, _)| m).sum();
            prop_assert_eq!(r.members.len(), c.len());
            prop_assert_eq!(r.bound_mass, member_sum);
            prop_assert!(r.bound_mass > 0.0);
            prop_assert!(r.bound_mass <= total * (1.0 + 1e-12));
        }
    }

    #[test]
    fn iterative_variants_are_monotone(c in cloud()) {
        let params = params_with(1.0);

        let jutzi = solve(&c, &unit_g(), Method::Jutzi, &params).unwrap();
        prop_assert!(jutzi.history.windows(2).all(|w| w[1] <= w[0]), "jutzi grew: {:?}", jutzi.history);
        prop_assert!(jutzi.iterations <= params.max_iterations);
        prop_assert_eq!(jutzi.history.len(), jutzi.iterations + 1);

        let naor1 = solve(&c, &unit_g(), Method::Naor1, &params).unwrap();
        prop_assert!(naor1.history.windows(2).all(|w| w[1] >= w[0]), "naor1 shrank: {:?}", naor1.history);
        prop_assert!(naor1.iterations <= params.max_iterations);
        prop_assert_eq!(naor1.history[0], 1);

        // each pass changes membership or ends the run, so n passes always suffice
        prop_assert!(jutzi.converged && naor1.converged);
    }

    #[test]
    fn naor2_keeps_its_seed_clump(c in cloud(), length_scale in 0.5..8.0f64) {
        let labels = fast_clumps(&c.pos, length_scale).unwrap();
        let major = labels.largest_by_mass(&c.m).unwrap();
        let clump_mass: f64 = labels.clump_masses(&c.m).into_iter().find(|&(r, _)| r == major).unwrap().1;

        let r = solve(&c, &unit_g(), Method::Naor2, &params_with(length_scale)).unwrap();
        for i in labels.members(major) {
            prop_assert!(r.members[i]);
        }
        prop_assert!(r.bound_mass >= clump_mass * (1.0 - 1e-12));
        prop_assert_eq!(r.num_clumps, Some(labels.num_clumps()));
    }

    #[test]
    fn solves_are_deterministic(c in cloud(), length_scale in 0.5..8.0f64) {
        for method in Method::ALL {
            let params = params_with(length_scale);
            let a = solve(&c, &unit_g(), method, &params).unwrap();
            let b = solve(&c, &unit_g(), method, &params).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
