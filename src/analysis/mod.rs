pub mod states;
pub mod params;
pub mod potential;
pub mod clumps;
pub mod solver;
mod kory;
mod jutzi;
mod naor;
