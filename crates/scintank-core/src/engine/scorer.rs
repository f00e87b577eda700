use super::error::EngineError;
use super::qe::QeTable;
use crate::core::io::events::{DetectionDataset, DetectionEvent};
use crate::core::models::ids::VolumeId;
use crate::core::models::model::DetectorModel;
use rand::Rng;

/// Particle kind of the track driving a step. Only optical photons are
/// scored; everything else passes through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    OpticalPhoton,
    Electron,
    Positron,
    Gamma,
    Neutron,
    Other,
}

/// One transport step as handed over by the external transport engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackStep {
    pub particle: ParticleKind,
    pub kinetic_energy_ev: f64,
    pub global_time_ns: f64,
    /// Volume the step starts in (pre-step point).
    pub volume: VolumeId,
}

/// What the scorer did with a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Wrong particle kind or wrong volume; no effect.
    Ignored,
    /// Optical photon in the scoring volume that failed the acceptance
    /// draw; no effect.
    Rejected,
    /// Accepted: one dataset row appended, energy deposited.
    Detected,
}

/// Per-worker photon-detection scorer.
///
/// Holds the QE curve, the worker-local output dataset and the worker-local
/// energy-deposit accumulator. The scoring volume is resolved from the
/// geometry model on the first step and cached; the model is handed in
/// explicitly rather than fetched from ambient run state.
#[derive(Debug, Clone)]
pub struct DetectionScorer {
    qe: QeTable,
    scoring_volume: Option<VolumeId>,
    dataset: DetectionDataset,
    deposited_energy_ev: f64,
}

impl DetectionScorer {
    pub fn new(qe: QeTable) -> Self {
        Self {
            qe,
            scoring_volume: None,
            dataset: DetectionDataset::new(),
            deposited_energy_ev: 0.0,
        }
    }

    /// Processes one transport step.
    ///
    /// Exactly one dataset row and one deposit contribution are produced
    /// per accepted photon; every other path leaves the scorer's output
    /// untouched.
    ///
    /// # Errors
    ///
    /// Fails with [`EngineError::NoScoringVolume`] if the model has no
    /// scoring volume at the first invocation. That resolution happens
    /// before any per-step filtering, so an incomplete geometry model
    /// surfaces immediately.
    pub fn process_step(
        &mut self,
        model: &DetectorModel,
        step: &TrackStep,
        rng: &mut impl Rng,
    ) -> Result<StepOutcome, EngineError> {
        let scoring_volume = match self.scoring_volume {
            Some(id) => id,
            None => {
                let id = model.scoring_volume().ok_or(EngineError::NoScoringVolume)?;
                self.scoring_volume = Some(id);
                id
            }
        };

        if step.particle != ParticleKind::OpticalPhoton {
            return Ok(StepOutcome::Ignored);
        }
        if step.volume != scoring_volume {
            return Ok(StepOutcome::Ignored);
        }

        let probability = self.qe.lookup(step.kinetic_energy_ev);
        // A draw exactly equal to the QE value is accepted.
        if rng.r#gen::<f64>() > probability {
            return Ok(StepOutcome::Rejected);
        }

        self.dataset.append(DetectionEvent {
            energy_ev: step.kinetic_energy_ev,
            time_ns: step.global_time_ns,
        });
        self.deposited_energy_ev += step.kinetic_energy_ev;
        Ok(StepOutcome::Detected)
    }

    pub fn dataset(&self) -> &DetectionDataset {
        &self.dataset
    }

    pub fn deposited_energy_ev(&self) -> f64 {
        self.deposited_energy_ev
    }

    /// Tears the scorer down into its output dataset and deposit sum, for
    /// end-of-run merging.
    pub fn into_results(self) -> (DetectionDataset, f64) {
        (self.dataset, self.deposited_energy_ev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::material::{Composition, ElementCount, Material};
    use crate::core::models::volume::Shape;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scoring_model() -> (DetectorModel, VolumeId, VolumeId) {
        let mut model = DetectorModel::new();
        let material = model
            .add_material(Material::new(
                "LAB",
                0.853,
                Composition::Elements(vec![
                    ElementCount {
                        symbol: "C".into(),
                        count: 17,
                    },
                    ElementCount {
                        symbol: "H".into(),
                        count: 27,
                    },
                ]),
            ))
            .unwrap();
        let world = model
            .add_world(
                "World",
                Shape::Box {
                    half_extent_mm: 1000.0,
                },
                material,
            )
            .unwrap();
        let target = model
            .place_volume(
                "Target",
                Shape::Tube {
                    inner_radius_mm: 0.0,
                    outer_radius_mm: 590.0,
                    half_height_mm: 350.0,
                },
                material,
                world,
                nalgebra::Vector3::zeros(),
            )
            .unwrap();
        model.mark_scoring(target).unwrap();
        (model, world, target)
    }

    fn photon_step(volume: VolumeId) -> TrackStep {
        TrackStep {
            particle: ParticleKind::OpticalPhoton,
            kinetic_energy_ev: 2.9,
            global_time_ns: 17.0,
            volume,
        }
    }

    #[test]
    fn missing_scoring_volume_is_fatal_on_first_step() {
        let (mut model_without_scoring, material) = {
            let mut model = DetectorModel::new();
            let material = model
                .add_material(Material::new(
                    "LAB",
                    0.853,
                    Composition::Elements(vec![ElementCount {
                        symbol: "C".into(),
                        count: 1,
                    }]),
                ))
                .unwrap();
            (model, material)
        };
        let world = model_without_scoring
            .add_world(
                "World",
                Shape::Box {
                    half_extent_mm: 10.0,
                },
                material,
            )
            .unwrap();

        let mut scorer = DetectionScorer::new(QeTable::default());
        let mut rng = StdRng::seed_from_u64(1);
        // Resolution precedes the particle filter, so even a non-photon
        // step trips the error.
        let step = TrackStep {
            particle: ParticleKind::Electron,
            kinetic_energy_ev: 3.0e6,
            global_time_ns: 0.0,
            volume: world,
        };
        let err = scorer
            .process_step(&model_without_scoring, &step, &mut rng)
            .unwrap_err();
        assert!(matches!(err, EngineError::NoScoringVolume));
    }

    #[test]
    fn non_photon_tracks_are_ignored() {
        let (model, _, target) = scoring_model();
        let mut scorer = DetectionScorer::new(QeTable::flat(1.0).unwrap());
        let mut rng = StdRng::seed_from_u64(2);

        for particle in [
            ParticleKind::Electron,
            ParticleKind::Positron,
            ParticleKind::Gamma,
            ParticleKind::Neutron,
            ParticleKind::Other,
        ] {
            let step = TrackStep {
                particle,
                ..photon_step(target)
            };
            let outcome = scorer.process_step(&model, &step, &mut rng).unwrap();
            assert_eq!(outcome, StepOutcome::Ignored);
        }
        assert!(scorer.dataset().is_empty());
        assert_eq!(scorer.deposited_energy_ev(), 0.0);
    }

    #[test]
    fn photons_outside_scoring_volume_are_ignored() {
        let (model, world, _) = scoring_model();
        let mut scorer = DetectionScorer::new(QeTable::flat(1.0).unwrap());
        let mut rng = StdRng::seed_from_u64(3);

        let outcome = scorer
            .process_step(&model, &photon_step(world), &mut rng)
            .unwrap();
        assert_eq!(outcome, StepOutcome::Ignored);
        assert!(scorer.dataset().is_empty());
    }

    #[test]
    fn accepted_photon_appends_exactly_one_row_and_one_deposit() {
        let (model, _, target) = scoring_model();
        let mut scorer = DetectionScorer::new(QeTable::flat(1.0).unwrap());
        let mut rng = StdRng::seed_from_u64(4);

        let outcome = scorer
            .process_step(&model, &photon_step(target), &mut rng)
            .unwrap();
        assert_eq!(outcome, StepOutcome::Detected);
        assert_eq!(scorer.dataset().len(), 1);
        let row = scorer.dataset().rows()[0];
        assert_eq!(row.energy_ev, 2.9);
        assert_eq!(row.time_ns, 17.0);
        assert_eq!(scorer.deposited_energy_ev(), 2.9);
    }

    #[test]
    fn zero_efficiency_rejects_everything() {
        let (model, _, target) = scoring_model();
        let mut scorer = DetectionScorer::new(QeTable::flat(0.0).unwrap());
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..100 {
            let outcome = scorer
                .process_step(&model, &photon_step(target), &mut rng)
                .unwrap();
            assert_eq!(outcome, StepOutcome::Rejected);
        }
        assert!(scorer.dataset().is_empty());
    }

    #[test]
    fn acceptance_fraction_converges_to_qe() {
        let (model, _, target) = scoring_model();
        let p = 0.28;
        let mut scorer = DetectionScorer::new(QeTable::flat(p).unwrap());
        let mut rng = StdRng::seed_from_u64(6);

        let trials = 20_000;
        for _ in 0..trials {
            scorer
                .process_step(&model, &photon_step(target), &mut rng)
                .unwrap();
        }
        let fraction = scorer.dataset().len() as f64 / trials as f64;
        // ~4.5 sigma of binomial sampling error.
        let tolerance = 4.5 * (p * (1.0 - p) / trials as f64).sqrt();
        assert!(
            (fraction - p).abs() < tolerance,
            "fraction {fraction} not within {tolerance} of {p}"
        );
        // The accumulator and the row sum perform the same additions in the
        // same order, so they agree exactly.
        let expected_deposit: f64 = scorer.dataset().rows().iter().map(|row| row.energy_ev).sum();
        assert_eq!(scorer.deposited_energy_ev(), expected_deposit);
    }
}
