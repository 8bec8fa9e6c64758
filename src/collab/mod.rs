//! Collaborator Module
//!
//! Boundary traits for the external services the coordinator talks to:
//! the generative-AI backend and the managed persistence backend. The
//! coordinator only ever sees these traits; HTTP implementations and an
//! in-memory storage live alongside them.

mod generator;
mod storage;

pub use generator::{HttpScenarioGenerator, ScenarioGenerator};
pub use storage::{HttpScenarioStorage, MemoryScenarioStorage, ScenarioStorage, SCHEMA_VERSION};
