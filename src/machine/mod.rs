//! The rotor machine and its stepping mechanism.

pub mod engine;
pub mod stepping;

pub use engine::{Machine, MachineState};
pub use stepping::{Pawl, plan_advances};
