use crate::cli::SimulateArgs;
use crate::error::{CliError, Result};
use crate::progress::CliProgressHandler;
use scintank::engine::progress::ProgressReporter;
use scintank::workflows::build::build_detector;
use scintank::workflows::simulate::{self, SimulationConfig};
use tracing::info;

pub fn run(args: SimulateArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Building detector model...");
    let model = build_detector(&config, &reporter)?;

    let simulation_config = SimulationConfig {
        n_photons: args.photons,
        seed: args.seed,
        ..Default::default()
    };
    println!("Scoring {} photons...", args.photons);
    let result = simulate::run(&model, &simulation_config, &reporter)?;
    drop(reporter);

    result
        .dataset
        .write_csv_path(&args.output)
        .map_err(|e| CliError::FileWrite {
            path: args.output.clone(),
            source: e.into(),
        })?;

    println!(
        "✓ {} of {} photons detected (acceptance {:.4}), {:.1} eV deposited",
        result.dataset.len(),
        result.generated,
        result.acceptance(),
        result.deposited_energy_ev
    );
    println!("✓ Detection dataset written to: {}", args.output.display());

    Ok(())
}
