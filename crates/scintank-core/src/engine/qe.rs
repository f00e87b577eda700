use super::error::EngineError;

/// Default quantum-efficiency grid of the scorer, in eV.
///
/// Distinct from the photocathode skin surface table: the two default to
/// the same flat 0.28 but are configured independently.
const DEFAULT_QE_GRID_EV: [f64; 23] = [
    2.175, 2.214, 2.254, 2.296, 2.339, 2.384, 2.431, 2.480, 2.530, 2.583, 2.638, 2.695, 2.755,
    2.818, 2.883, 2.952, 3.024, 3.100, 3.179, 3.263, 3.351, 3.444, 3.542,
];

const DEFAULT_QE: f64 = 0.28;

/// Sensor sensitivity curve sampled on a fixed energy grid.
///
/// The grid is not required to be sorted; lookups scan every entry.
#[derive(Debug, Clone, PartialEq)]
pub struct QeTable {
    energies_ev: Vec<f64>,
    efficiencies: Vec<f64>,
}

impl QeTable {
    /// Builds a table from parallel energy/efficiency arrays.
    ///
    /// # Errors
    ///
    /// Fails if the arrays differ in length, are empty, or any efficiency
    /// falls outside [0, 1].
    pub fn new(energies_ev: Vec<f64>, efficiencies: Vec<f64>) -> Result<Self, EngineError> {
        if energies_ev.len() != efficiencies.len() || energies_ev.is_empty() {
            return Err(EngineError::QeTableLengthMismatch {
                energies: energies_ev.len(),
                efficiencies: efficiencies.len(),
            });
        }
        for (index, &value) in efficiencies.iter().enumerate() {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::QeOutOfRange { index, value });
            }
        }
        Ok(Self {
            energies_ev,
            efficiencies,
        })
    }

    /// Flat table at `efficiency` over the default 23-point grid.
    pub fn flat(efficiency: f64) -> Result<Self, EngineError> {
        Self::new(
            DEFAULT_QE_GRID_EV.to_vec(),
            vec![efficiency; DEFAULT_QE_GRID_EV.len()],
        )
    }

    pub fn len(&self) -> usize {
        self.energies_ev.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies_ev.is_empty()
    }

    pub fn energies_ev(&self) -> &[f64] {
        &self.energies_ev
    }

    /// Nearest-neighbor efficiency lookup.
    ///
    /// Linear left-to-right scan keeping the first minimum under a strict
    /// less-than comparison, so a query exactly equidistant between two
    /// entries resolves to the earlier one.
    pub fn lookup(&self, energy_ev: f64) -> f64 {
        let mut min_diff = (self.energies_ev[0] - energy_ev).abs();
        let mut index = 0;
        for (i, &grid_energy) in self.energies_ev.iter().enumerate().skip(1) {
            let diff = (grid_energy - energy_ev).abs();
            if diff < min_diff {
                min_diff = diff;
                index = i;
            }
        }
        self.efficiencies[index]
    }
}

impl Default for QeTable {
    /// The baseline 23-point, uniformly 0.28 table.
    fn default() -> Self {
        Self {
            energies_ev: DEFAULT_QE_GRID_EV.to_vec(),
            efficiencies: vec![DEFAULT_QE; DEFAULT_QE_GRID_EV.len()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_flat_28_percent() {
        let table = QeTable::default();
        assert_eq!(table.len(), 23);
        assert_eq!(table.lookup(2.5), 0.28);
        assert_eq!(table.lookup(0.1), 0.28);
        assert_eq!(table.lookup(10.0), 0.28);
    }

    #[test]
    fn nearest_entry_wins() {
        let table = QeTable::new(vec![2.0, 3.0, 4.0], vec![0.1, 0.2, 0.3]).unwrap();
        assert_eq!(table.lookup(2.1), 0.1);
        assert_eq!(table.lookup(2.9), 0.2);
        assert_eq!(table.lookup(5.0), 0.3);
    }

    #[test]
    fn equidistant_query_resolves_to_earlier_entry() {
        let table = QeTable::new(vec![2.0, 3.0], vec![0.1, 0.2]).unwrap();
        assert_eq!(table.lookup(2.5), 0.1);
    }

    #[test]
    fn unsorted_grid_still_finds_nearest() {
        let table = QeTable::new(vec![3.0, 2.0, 2.4], vec![0.3, 0.2, 0.24]).unwrap();
        assert_eq!(table.lookup(2.39), 0.24);
        assert_eq!(table.lookup(2.05), 0.2);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = QeTable::new(vec![2.0, 3.0], vec![0.1]).unwrap_err();
        assert!(matches!(err, EngineError::QeTableLengthMismatch { .. }));
    }

    #[test]
    fn out_of_range_efficiency_is_rejected() {
        let err = QeTable::new(vec![2.0, 3.0], vec![0.1, 1.5]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::QeOutOfRange { index: 1, value } if value == 1.5
        ));
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(QeTable::new(vec![], vec![]).is_err());
    }
}
