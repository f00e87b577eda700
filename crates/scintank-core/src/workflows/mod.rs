//! # Workflows Module
//!
//! High-level entry points tying the engine and the core model together.
//!
//! - **Build Workflow** ([`build`]) - turns a configuration into a complete
//!   detector model: spectrum loading, material catalog, volume hierarchy,
//!   boundary surfaces and sensor rings.
//! - **Simulation Workflow** ([`simulate`]) - runs a synthetic photon batch
//!   through the detection scorer and merges the per-worker datasets.

pub mod build;
pub mod simulate;
