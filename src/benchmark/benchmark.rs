use std::time::Instant;

use crate::analysis::clumps::fast_clumps;
use crate::analysis::potential::{DirectPotential, PairPotential, ParallelPotential};
use crate::analysis::states::{NVec3, ParticleCloud};

/// Helper to build a deterministic cloud of size `n`, no rand needed
pub fn make_cloud(n: usize) -> ParticleCloud {
    let mut pos = Vec::with_capacity(n);
    let mut vel = Vec::with_capacity(n);

    for i in 0..n {
        let i_f = i as f64;
        pos.push(NVec3::new(
            (i_f * 0.37).sin() * 5.0,
            (i_f * 0.13).cos() * 5.0,
            (i_f * 0.07).sin() * 5.0,
        ));
        vel.push(NVec3::new((i_f * 0.11).cos(), 0.0, 0.0) * 1.0e-3);
    }

    ParticleCloud::new(pos, vel, vec![1.0; n])
}

/// Time the direct and rayon potential kernels for a range of n
pub fn bench_potential() {
    let ns = [200, 400, 800, 1600, 3200, 6400];
    let G = 1.0;

    for n in ns {
        let cloud = make_cloud(n);
        let mut out = vec![0.0; n];

        let direct = DirectPotential { G };
        let parallel = ParallelPotential { G };

        // Warm up
        let warm = direct
            .potential(&cloud.pos, &cloud.m, None, &mut out)
            .and_then(|_| parallel.potential(&cloud.pos, &cloud.m, None, &mut out));
        if let Err(e) = warm {
            println!("N = {n:5}, skipped: {e}");
            continue;
        }

        // Time direct
        let t0 = Instant::now();
        direct.potential(&cloud.pos, &cloud.m, None, &mut out).ok();
        let dt_direct = t0.elapsed().as_secs_f64();

        // Time rayon
        let t1 = Instant::now();
        parallel.potential(&cloud.pos, &cloud.m, None, &mut out).ok();
        let dt_parallel = t1.elapsed().as_secs_f64();

        println!("N = {n:5}, direct = {:8.6} s, parallel = {:8.6} s", dt_direct, dt_parallel);
    }
}

/// Time the proximity clusterer for a range of n
/// Paste output directly into a spreadsheet to graph
pub fn bench_clumps() {
    println!("N,clumps,ms");

    for n in (400..=6400).step_by(400) {
        let cloud = make_cloud(n);

        let t0 = Instant::now();
        let labels = match fast_clumps(&cloud.pos, 0.25) {
            Ok(labels) => labels,
            Err(e) => {
                println!("{},error: {}", n, e);
                continue;
            }
        };
        let ms = t0.elapsed().as_secs_f64() * 1000.0;

        println!("{},{},{:.6}", n, labels.num_clumps(), ms);
    }
}
