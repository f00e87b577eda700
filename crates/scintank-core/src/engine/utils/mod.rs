//! Utility functions for the engine module.
//!
//! Sampling helpers for primary photon generation, shared by the simulation
//! workflow and any external driver that wants matching source geometry.

pub mod sampling;
