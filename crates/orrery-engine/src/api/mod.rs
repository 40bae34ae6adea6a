pub mod types;
pub mod simulation;
pub mod runner;
