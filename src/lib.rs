pub mod analysis;
pub mod configuration;
pub mod snapshot;
pub mod benchmark;
pub mod error;

pub use analysis::states::{NVec3, ParticleCloud, UnitScale, BIG_G_MKS};
pub use analysis::params::{Method, SolverParams, DEFAULT_MAX_ITERATIONS};
pub use analysis::potential::{potential_energy, DirectPotential, PairPotential, ParallelPotential};
pub use analysis::clumps::{fast_clumps, ClumpLabeling};
pub use analysis::solver::{solve, BoundMassResult};

pub use configuration::config::SolverConfig;

pub use snapshot::fnl::{load_fnl, merge_clouds, parse_fnl, FnlColumns, NodeList};

pub use error::{BoundMassError, Result, SnapshotError};

pub use benchmark::benchmark::{bench_clumps, bench_potential, make_cloud};
