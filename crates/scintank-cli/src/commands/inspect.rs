use crate::cli::InspectArgs;
use crate::error::Result;
use crate::progress::CliProgressHandler;
use scintank::core::models::ids::VolumeId;
use scintank::core::models::model::DetectorModel;
use scintank::core::models::sensor::SensorPlane;
use scintank::core::models::volume::Shape;
use scintank::engine::progress::ProgressReporter;
use scintank::workflows::build::build_detector;
use tracing::info;

pub fn run(args: InspectArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Building detector model for inspection...");
    let model = build_detector(&config, &reporter)?;
    drop(reporter);

    println!("\nVolume hierarchy:");
    if let Some(world) = model.world() {
        print_volume_tree(&model, world, 0);
    }

    println!("\nMaterials:");
    for (_, material) in model.materials_iter() {
        let tables = material
            .properties
            .as_ref()
            .map(|table| table.arrays_iter().count())
            .unwrap_or(0);
        println!(
            "  {:<16} {:>8.5} g/cm3  ({} property table(s))",
            material.name, material.density_g_cm3, tables
        );
    }

    let top = model
        .sensors_iter()
        .filter(|(_, s)| s.plane == SensorPlane::Top)
        .count();
    let bottom = model.sensor_count() - top;
    println!("\nSensors: {} total ({top} top, {bottom} bottom)", model.sensor_count());
    if let Some((_, sensor)) = model.sensors_iter().next() {
        let ring_radius = sensor.position_mm.x.hypot(sensor.position_mm.y);
        println!(
            "  ring radius {ring_radius:.1} mm, axial offset ±{:.1} mm",
            sensor.position_mm.z.abs()
        );
    }

    Ok(())
}

fn print_volume_tree(model: &DetectorModel, id: VolumeId, depth: usize) {
    let Some(volume) = model.volume(id) else {
        return;
    };
    let marker = if volume.is_scoring { " [scoring]" } else { "" };
    let material = model
        .material(volume.material)
        .map(|m| m.name.as_str())
        .unwrap_or("?");
    println!(
        "{:indent$}{} ({}, {}){}",
        "",
        volume.name,
        shape_summary(&volume.shape),
        material,
        marker,
        indent = depth * 2
    );
    for &child in &volume.children {
        print_volume_tree(model, child, depth + 1);
    }
}

fn shape_summary(shape: &Shape) -> String {
    match *shape {
        Shape::Box { half_extent_mm } => format!("box, half extent {half_extent_mm} mm"),
        Shape::Tube {
            inner_radius_mm,
            outer_radius_mm,
            half_height_mm,
        } => format!(
            "tube, r {inner_radius_mm}..{outer_radius_mm} mm, half height {half_height_mm} mm"
        ),
    }
}
