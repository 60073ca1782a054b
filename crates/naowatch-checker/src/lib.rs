//! # NaoWatch Checker
//! Composes the probe and the dispatcher into one run: sequential
//! museum × date sweep, result aggregation, notification on hits.

pub mod orchestrator;

pub use orchestrator::Orchestrator;
