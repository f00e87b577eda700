//! # Scintank Core Library
//!
//! A library for modeling a cylindrical liquid-scintillator detector: a
//! steel tank holding a buffer liquid, a transparent acrylic vessel with a
//! gadolinium-loaded scintillating target, two rings of photon sensors, and
//! the scoring logic that turns optical-photon steps into detection events.
//!
//! ## Architectural Philosophy
//!
//! The library keeps a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (materials,
//!   volumes, surfaces, sensors, property tables), the owning
//!   `DetectorModel` registry, and I/O utilities for spectra and event
//!   datasets.
//!
//! - **[`engine`]: The Logic Core.** The stateful layer: configuration with
//!   validation, the construction builders that populate a model, the
//!   quantum-efficiency table and the per-worker detection scorer.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures: building a
//!   detector model from a configuration and running a synthetic photon
//!   batch through the scorer.

pub mod core;
pub mod engine;
pub mod workflows;
