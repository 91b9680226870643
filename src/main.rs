use boundmass::{load_fnl, merge_clouds, solve, SolverConfig};
use boundmass::{Method, SolverParams, UnitScale};
use boundmass::{bench_clumps, bench_potential};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use std::io::Write;
use std::path::PathBuf;

/// Find the largest gravitationally bound mass in a flattened node list snapshot
#[derive(Parser, Debug)]
struct Args {
    /// Flattened node list file
    filename: Option<PathBuf>,

    /// Algorithm: kory, jutzi, naor1 or naor2
    #[arg(short, long)]
    method: Option<String>,

    /// Clump proximity threshold (naor2)
    #[arg(short, long)]
    length_scale: Option<f64>,

    /// Length, mass and time units of the snapshot, in MKS
    #[arg(long, num_args = 3, value_names = ["L", "M", "T"])]
    units: Option<Vec<f64>>,

    /// Iteration cap for jutzi and naor1
    #[arg(long)]
    max_iter: Option<usize>,

    /// Only analyse this node list instead of the merged cloud
    #[arg(long)]
    list: Option<usize>,

    /// YAML solver config; command line flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Evaluate potentials on all cores
    #[arg(long)]
    parallel: bool,

    /// Run the timing harness and exit
    #[arg(long)]
    bench: bool,
}

// merge config file and flags here to keep main clean
fn solver_settings(args: &Args) -> Result<(UnitScale, Method, SolverParams)> {
    let (mut units, mut method, mut params) = match &args.config {
        Some(path) => SolverConfig::load(path)?.build(),
        None => (UnitScale::default(), Method::Jutzi, SolverParams::default()),
    };

    if let Some(name) = &args.method {
        method = name.parse()?;
    }
    if let Some(u) = &args.units {
        units = UnitScale::new(u[0], u[1], u[2]);
    }
    if let Some(l) = args.length_scale {
        params.length_scale = Some(l);
    }
    if let Some(n) = args.max_iter {
        params.max_iterations = n;
    }
    params.parallel |= args.parallel;

    Ok((units, method, params))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.bench {
        bench_potential();
        bench_clumps();
        return Ok(());
    }

    let Some(filename) = args.filename.clone() else {
        bail!("no snapshot file given");
    };
    let (units, method, params) = solver_settings(&args)?;

    print!("Reading file...");
    std::io::stdout().flush()?;
    let lists = load_fnl(&filename).with_context(|| format!("failed to load {}", filename.display()))?;
    println!("Done.");

    let cloud = match args.list {
        Some(id) => match lists.iter().find(|nl| nl.id == id) {
            Some(nl) => nl.cloud(),
            None => bail!("node list {} not found in {}", id, filename.display()),
        },
        None => merge_clouds(&lists),
    };
    let total = cloud.total_mass();
    println!(
        "Found {} particles (in {} node lists) totaling {} kg.",
        cloud.len(),
        lists.len(),
        total
    );

    let result = solve(&cloud, &units, method, &params)?;

    if let Some(clumps) = result.num_clumps {
        println!("Found {} clumps at length scale {:?}.", clumps, params.length_scale);
    }
    println!(
        "Found {} bound particles totaling {} kg.",
        result.bound_count(),
        result.bound_mass
    );
    println!("M_bound/M_tot = {}.", result.bound_fraction(total));
    if method.is_iterative() && result.converged {
        println!("Converged after {} iterations.", result.iterations);
    }
    if !result.converged {
        println!(
            "WARNING: {} stopped after {} iterations without reaching a fixed point.",
            method, result.iterations
        );
    }

    Ok(())
}
