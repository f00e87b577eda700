use thiserror::Error;

/// Minimum number of points a property energy grid must carry.
const MIN_GRID_POINTS: usize = 2;

/// Wavelength-dependent optical properties that can be tabulated for a
/// material or an optical surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    RefractiveIndex,
    AbsorptionLength,
    FastComponent,
    SlowComponent,
    Reflectivity,
    Efficiency,
}

/// Scalar (energy-independent) scintillation constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstPropertyKind {
    ScintillationYield,
    ResolutionScale,
    FastTimeConstant,
    YieldRatio,
}

#[derive(Debug, Error, PartialEq)]
pub enum PropertyError {
    #[error(
        "Property {kind:?} has {values} values for a {grid}-point energy grid; lengths must match"
    )]
    LengthMismatch {
        kind: PropertyKind,
        grid: usize,
        values: usize,
    },

    #[error("Property {kind:?} needs at least {MIN_GRID_POINTS} grid points, got {got}")]
    GridTooShort { kind: PropertyKind, got: usize },

    #[error("Property {kind:?} energy grid is not strictly ascending")]
    GridNotAscending { kind: PropertyKind },
}

/// One tabulated property: an ascending energy grid and the property value at
/// each grid point. Grids are private to the property that owns them; two
/// properties of the same table may use different grids.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyArray {
    grid_ev: Vec<f64>,
    values: Vec<f64>,
}

impl PropertyArray {
    pub fn grid_ev(&self) -> &[f64] {
        &self.grid_ev
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.grid_ev.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid_ev.is_empty()
    }
}

/// Optical property table attached to a material or surface.
///
/// Mirrors the structure of a material-properties table in optical transport
/// codes: named arrays over per-property energy grids, plus named scalar
/// constants. Array length mismatches are rejected at insertion time, never
/// deferred to lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyTable {
    arrays: Vec<(PropertyKind, PropertyArray)>,
    constants: Vec<(ConstPropertyKind, f64)>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a tabulated property, replacing any previous entry of the
    /// same kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the value array length differs from the grid
    /// length, the grid is shorter than two points, or the grid is not
    /// strictly ascending.
    pub fn insert_array(
        &mut self,
        kind: PropertyKind,
        grid_ev: Vec<f64>,
        values: Vec<f64>,
    ) -> Result<(), PropertyError> {
        if grid_ev.len() < MIN_GRID_POINTS {
            return Err(PropertyError::GridTooShort {
                kind,
                got: grid_ev.len(),
            });
        }
        if grid_ev.len() != values.len() {
            return Err(PropertyError::LengthMismatch {
                kind,
                grid: grid_ev.len(),
                values: values.len(),
            });
        }
        if grid_ev.windows(2).any(|w| w[1] <= w[0]) {
            return Err(PropertyError::GridNotAscending { kind });
        }

        let array = PropertyArray { grid_ev, values };
        match self.arrays.iter_mut().find(|(k, _)| *k == kind) {
            Some(slot) => slot.1 = array,
            None => self.arrays.push((kind, array)),
        }
        Ok(())
    }

    /// Inserts or replaces a scalar constant.
    pub fn insert_constant(&mut self, kind: ConstPropertyKind, value: f64) {
        match self.constants.iter_mut().find(|(k, _)| *k == kind) {
            Some(slot) => slot.1 = value,
            None => self.constants.push((kind, value)),
        }
    }

    pub fn array(&self, kind: PropertyKind) -> Option<&PropertyArray> {
        self.arrays
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, a)| a)
    }

    pub fn constant(&self, kind: ConstPropertyKind) -> Option<f64> {
        self.constants
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, v)| *v)
    }

    pub fn arrays_iter(&self) -> impl Iterator<Item = (PropertyKind, &PropertyArray)> {
        self.arrays.iter().map(|(k, a)| (*k, a))
    }
}

/// One sample of an emission spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumPoint {
    pub energy_ev: f64,
    pub intensity: f64,
}

/// A normalized scintillation emission spectrum, sorted ascending in energy.
///
/// After construction the maximum intensity is exactly 1.0. An input whose
/// intensities are all zero (or negative) is replaced by a uniform spectrum
/// of 1.0 rather than dividing by zero.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionTable {
    points: Vec<SpectrumPoint>,
}

impl EmissionTable {
    /// Builds a normalized table from raw samples.
    ///
    /// Samples are sorted by ascending energy. Exact energy ties (a repeated
    /// wavelength in the input file) collapse to a single point carrying the
    /// largest of the tied intensities, so the resulting grid is strictly
    /// ascending. Intensities are then divided by the maximum.
    pub fn from_points(mut points: Vec<SpectrumPoint>) -> Self {
        points.sort_by(|a, b| {
            a.energy_ev
                .partial_cmp(&b.energy_ev)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        points.dedup_by(|curr, prev| {
            if curr.energy_ev == prev.energy_ev {
                prev.intensity = prev.intensity.max(curr.intensity);
                true
            } else {
                false
            }
        });

        let max = points.iter().fold(0.0_f64, |m, p| m.max(p.intensity));
        if max <= 0.0 {
            for p in &mut points {
                p.intensity = 1.0;
            }
        } else {
            for p in &mut points {
                p.intensity /= max;
            }
        }

        Self { points }
    }

    /// The two-point spectrum used when no dataset is available:
    /// (2.0 eV, 0.0) and (3.5 eV, 1.0).
    pub fn fallback() -> Self {
        Self {
            points: vec![
                SpectrumPoint {
                    energy_ev: 2.0,
                    intensity: 0.0,
                },
                SpectrumPoint {
                    energy_ev: 3.5,
                    intensity: 1.0,
                },
            ],
        }
    }

    pub fn points(&self) -> &[SpectrumPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn energies_ev(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.energy_ev).collect()
    }

    pub fn intensities(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.intensity).collect()
    }
}
