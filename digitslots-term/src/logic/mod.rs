pub mod reports;
pub mod simulation;

pub use simulation::{SimulationPlan, SimulationReport, run_simulation};
