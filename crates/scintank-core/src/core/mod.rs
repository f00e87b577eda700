//! # Core Module
//!
//! Stateless building blocks of the detector model: the data structures for
//! materials, volumes, optical surfaces and sensors, the registries that own
//! them, and the I/O utilities that feed and drain them.
//!
//! - **Model data** ([`models`]) - property tables, bulk materials, nested
//!   volumes, skin surfaces, sensor placements and the owning
//!   `DetectorModel` registry
//! - **File I/O** ([`io`]) - emission-spectrum parsing and the detection
//!   event dataset
//! - **Static data** ([`utils`]) - the chemical element table

pub mod io;
pub mod models;
pub mod utils;
