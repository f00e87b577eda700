use crate::core::io::spectrum;
use crate::core::models::model::DetectorModel;
use crate::core::models::properties::EmissionTable;
use crate::engine::config::DetectorConfig;
use crate::engine::construction::{
    geometry::build_geometry, materials::register_materials, sensors::place_sensor_array,
    surfaces::attach_boundary_surfaces,
};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

/// Builds the complete detector model from a validated configuration.
///
/// Runs the construction phases in dependency order: emission spectrum,
/// material catalog, volume hierarchy, boundary surfaces, sensor rings.
/// Any construction error aborts the build; a missing spectrum file does
/// not, it degrades to the built-in fallback spectrum.
#[instrument(skip_all, name = "build_workflow")]
pub fn build_detector(
    config: &DetectorConfig,
    reporter: &ProgressReporter,
) -> Result<DetectorModel, EngineError> {
    config.validate()?;

    reporter.report(Progress::PhaseStart { name: "Spectrum" });
    let mut emission = match &config.spectrum_path {
        Some(path) => spectrum::load(path),
        None => EmissionTable::fallback(),
    };
    if emission.len() < 2 {
        warn!(
            points = emission.len(),
            "Emission spectrum too short to tabulate; using fallback two-point spectrum"
        );
        emission = EmissionTable::fallback();
    }
    info!(points = emission.len(), "Emission spectrum ready");
    reporter.report(Progress::PhaseFinish);

    let mut model = DetectorModel::new();

    reporter.report(Progress::PhaseStart { name: "Materials" });
    let materials = register_materials(&mut model, config, &emission)?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Geometry" });
    let volumes = build_geometry(&mut model, config, &materials)?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Surfaces" });
    attach_boundary_surfaces(&mut model, config, &volumes)?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Sensors" });
    place_sensor_array(&mut model, config, &materials, &volumes)?;
    reporter.report(Progress::PhaseFinish);

    info!(
        volumes = model.volumes_iter().count(),
        materials = model.materials_iter().count(),
        sensors = model.sensor_count(),
        "Detector model complete"
    );
    Ok(model)
}
