//! Core abstractions: spaces, observations, environments and agents.
mod agent;
mod env;
mod spaces;

pub use agent::{Agent, EvalMode};
pub use env::{Env, EnvStep, Obs};
pub use spaces::{ActionSpace, ObservationSpace, ObservationType};
