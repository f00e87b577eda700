use crate::core::models::ids::MaterialId;
use crate::core::models::material::{
    Composition, ElementCount, MassFraction, Material, MixtureComponent, MixturePart,
};
use crate::core::models::model::DetectorModel;
use crate::core::models::properties::{
    ConstPropertyKind, EmissionTable, PropertyKind, PropertyTable,
};
use crate::engine::config::DetectorConfig;
use crate::engine::error::EngineError;
use tracing::info;

/// The 8-point energy grid shared by the fixed-spectrum property tables, in
/// eV. The doped target liquid does NOT use this grid; its table lives on
/// the emission spectrum's own grid.
pub const SHARED_GRID_EV: [f64; 8] = [2.00, 2.25, 2.50, 2.75, 3.00, 3.25, 3.40, 3.50];

const RINDEX_LAB: f64 = 1.48;
const RINDEX_ACRYLIC: f64 = 1.49;
const RINDEX_WINDOW: f64 = 1.52;
const ABSLENGTH_BUFFER_MM: f64 = 12_000.0;
const ABSLENGTH_TARGET_MM: f64 = 6_000.0;
const ABSLENGTH_ACRYLIC_MM: f64 = 5_000.0;
const ABSLENGTH_WINDOW_MM: f64 = 1.0e-6;

/// Handles to the six catalog materials.
#[derive(Debug, Clone, Copy)]
pub struct MaterialSet {
    pub air: MaterialId,
    pub steel: MaterialId,
    pub acrylic: MaterialId,
    pub window: MaterialId,
    pub buffer: MaterialId,
    pub target: MaterialId,
}

fn broadcast(grid: &[f64], value: f64) -> (Vec<f64>, Vec<f64>) {
    (grid.to_vec(), vec![value; grid.len()])
}

fn fixed_grid_table(rindex: f64, abslength_mm: f64) -> Result<PropertyTable, EngineError> {
    let mut table = PropertyTable::new();
    let (grid, values) = broadcast(&SHARED_GRID_EV, rindex);
    table.insert_array(PropertyKind::RefractiveIndex, grid, values)?;
    let (grid, values) = broadcast(&SHARED_GRID_EV, abslength_mm);
    table.insert_array(PropertyKind::AbsorptionLength, grid, values)?;
    Ok(table)
}

fn target_table(
    config: &DetectorConfig,
    emission: &EmissionTable,
) -> Result<PropertyTable, EngineError> {
    let grid = emission.energies_ev();
    let intensities = emission.intensities();

    let mut table = PropertyTable::new();
    table.insert_array(
        PropertyKind::RefractiveIndex,
        grid.clone(),
        vec![RINDEX_LAB; grid.len()],
    )?;
    table.insert_array(
        PropertyKind::AbsorptionLength,
        grid.clone(),
        vec![ABSLENGTH_TARGET_MM; grid.len()],
    )?;
    // The emission spectrum drives both scintillation components.
    table.insert_array(PropertyKind::FastComponent, grid.clone(), intensities.clone())?;
    table.insert_array(PropertyKind::SlowComponent, grid, intensities)?;

    table.insert_constant(
        ConstPropertyKind::ScintillationYield,
        config.scintillation_yield_per_mev,
    );
    table.insert_constant(ConstPropertyKind::ResolutionScale, config.resolution_scale);
    table.insert_constant(
        ConstPropertyKind::FastTimeConstant,
        config.fast_time_constant_ns,
    );
    table.insert_constant(ConstPropertyKind::YieldRatio, config.yield_ratio);
    Ok(table)
}

fn elements(pairs: &[(&str, u32)]) -> Composition {
    Composition::Elements(
        pairs
            .iter()
            .map(|&(symbol, count)| ElementCount {
                symbol: symbol.into(),
                count,
            })
            .collect(),
    )
}

fn mass_fractions(pairs: &[(&str, f64)]) -> Composition {
    Composition::MassFractions(
        pairs
            .iter()
            .map(|&(symbol, fraction)| MassFraction {
                symbol: symbol.into(),
                fraction,
            })
            .collect(),
    )
}

/// Registers the material catalog: air, tank steel, acrylic vessel, sensor
/// window, undoped buffer liquid and the doped target liquid.
///
/// The buffer, acrylic and window materials carry property tables on the
/// shared 8-point grid; the target's table is built on the emission
/// spectrum's own grid with the spectrum as both scintillation components.
pub fn register_materials(
    model: &mut DetectorModel,
    config: &DetectorConfig,
    emission: &EmissionTable,
) -> Result<MaterialSet, EngineError> {
    let air = model.add_material(Material::new(
        "Air",
        0.0012,
        mass_fractions(&[("N", 0.7547), ("O", 0.2320), ("Ar", 0.0133)]),
    ))?;

    let steel = model.add_material(Material::new(
        "StainlessSteel",
        8.0,
        mass_fractions(&[("Fe", 0.746), ("Cr", 0.169), ("Ni", 0.085)]),
    ))?;

    let acrylic = model.add_material(
        Material::new("Acrylic", 1.19, elements(&[("C", 5), ("H", 8), ("O", 2)])).with_properties(
            fixed_grid_table(RINDEX_ACRYLIC, ABSLENGTH_ACRYLIC_MM)?,
        ),
    )?;

    let window = model.add_material(
        Material::new("SensorWindow", 2.33, elements(&[("Si", 1)]))
            .with_properties(fixed_grid_table(RINDEX_WINDOW, ABSLENGTH_WINDOW_MM)?),
    )?;

    let buffer = model.add_material(
        Material::new(
            "LabBuffer",
            config.buffer_density_g_cm3,
            elements(&[("C", 17), ("H", 27)]),
        )
        .with_properties(fixed_grid_table(RINDEX_LAB, ABSLENGTH_BUFFER_MM)?),
    )?;

    let target = model.add_material(
        Material::new(
            "LabGd",
            config.target_density_g_cm3,
            Composition::Mixture(vec![
                MixturePart {
                    component: MixtureComponent::Material(buffer),
                    mass_fraction: 1.0 - config.dopant_mass_fraction,
                },
                MixturePart {
                    component: MixtureComponent::Element("Gd".into()),
                    mass_fraction: config.dopant_mass_fraction,
                },
            ]),
        )
        .with_properties(target_table(config, emission)?),
    )?;

    info!(
        materials = model.materials_iter().count(),
        spectrum_points = emission.len(),
        "Material catalog registered"
    );

    Ok(MaterialSet {
        air,
        steel,
        acrylic,
        window,
        buffer,
        target,
    })
}
