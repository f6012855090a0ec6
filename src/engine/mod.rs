// src/engine/mod.rs

//! Orchestration engine for packsync.
//!
//! This module ties together, per pack:
//! - the initial mirror pass
//! - derived artifact generation
//! - the script bundler
//! - the watch loop that applies change events until shutdown
//!
//! A [`Pipeline`] drives one pack; the [`BuildOrchestrator`] runs every
//! pipeline concurrently and collects their reports without letting one
//! failure cancel the others.

pub mod orchestrator;
pub mod pipeline;
pub mod report;
pub mod shutdown;

pub use orchestrator::BuildOrchestrator;
pub use pipeline::Pipeline;
pub use report::{BuildReport, PackOutcome, PackReport};
pub use shutdown::{shutdown_channel, ShutdownSignal, ShutdownTrigger};
