use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One accepted photon detection.
///
/// Events are created by the scorer on acceptance and never mutated
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetectionEvent {
    #[serde(rename = "energy_eV")]
    pub energy_ev: f64,
    #[serde(rename = "time_ns")]
    pub time_ns: f64,
}

/// Append-only dataset of detection events.
///
/// Each worker owns its own dataset during a run; at end of run the
/// per-worker datasets are concatenated with [`DetectionDataset::merge`].
/// Within one dataset, rows keep step-processing order; ordering across
/// workers is unspecified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionDataset {
    rows: Vec<DetectionEvent>,
}

impl DetectionDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: DetectionEvent) {
        self.rows.push(event);
    }

    pub fn rows(&self) -> &[DetectionEvent] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends all rows of `other`, preserving their internal order.
    pub fn merge(&mut self, other: DetectionDataset) {
        self.rows.extend(other.rows);
    }

    /// Writes the dataset as CSV with an `energy_eV,time_ns` header.
    ///
    /// The header is written unconditionally, so a run with zero detections
    /// still produces a valid, readable table.
    pub fn write_csv(&self, writer: impl Write) -> Result<(), csv::Error> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv_writer.write_record(["energy_eV", "time_ns"])?;
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<(), csv::Error> {
        let file = File::create(path)?;
        self.write_csv(file)
    }
}
