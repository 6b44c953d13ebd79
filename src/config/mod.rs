//! Configuration module.

mod parameters;

pub use parameters::{EngineParameters, Parameters, ScenarioParameters};
