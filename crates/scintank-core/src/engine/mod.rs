//! # Engine Module
//!
//! The stateful layer between the core data model and the workflows: it
//! turns a configuration into a populated detector model and scores photon
//! steps against it.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - the full parameter surface with
//!   defaults, validation and TOML loading
//! - **Construction** ([`construction`]) - materials, geometry, surfaces
//!   and sensor builders
//! - **Quantum efficiency** ([`qe`]) - the sensor sensitivity curve with
//!   nearest-neighbor lookup
//! - **Scoring** ([`scorer`]) - the per-worker detection scorer
//! - **Progress Monitoring** ([`progress`]) - callback-based progress
//!   reporting for workflow phases
//! - **Error Handling** ([`error`]) - engine-wide error type
//! - **Sampling** ([`utils`]) - primary photon source sampling

pub mod config;
pub mod construction;
pub mod error;
pub mod progress;
pub mod qe;
pub mod scorer;
pub mod utils;
