use crate::core::models::properties::{EmissionTable, SpectrumPoint};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

/// nm-to-eV conversion: E[eV] = 1240 / lambda[nm].
const EV_NM_FACTOR: f64 = 1240.0;

/// Reads an emission spectrum from a whitespace-separated token stream of
/// `(wavelength_nm, intensity)` pairs.
///
/// Parsing follows stream-extraction semantics: tokens are consumed in
/// pairs across line boundaries, and the first token that fails to parse as
/// a float (including a dangling wavelength with no intensity) silently
/// terminates reading. Whatever parsed up to that point is kept. Pairs with
/// a non-positive wavelength are discarded. The result is sorted ascending
/// by photon energy and normalized to a peak intensity of 1.0.
pub fn read_from(reader: &mut impl BufRead) -> EmissionTable {
    let mut content = String::new();
    if reader.read_to_string(&mut content).is_err() {
        warn!("Spectrum stream could not be read; using fallback emission spectrum");
        return EmissionTable::fallback();
    }

    let mut points = Vec::new();
    let mut tokens = content.split_whitespace();
    loop {
        let Some(lambda_token) = tokens.next() else {
            break;
        };
        let Ok(lambda_nm) = lambda_token.parse::<f64>() else {
            break;
        };
        let Some(intensity_token) = tokens.next() else {
            break;
        };
        let Ok(intensity) = intensity_token.parse::<f64>() else {
            break;
        };

        if lambda_nm <= 0.0 {
            continue;
        }
        points.push(SpectrumPoint {
            energy_ev: EV_NM_FACTOR / lambda_nm,
            intensity,
        });
    }

    EmissionTable::from_points(points)
}

/// Loads an emission spectrum from a file.
///
/// A missing or unreadable file is not fatal: a warning is logged and the
/// two-point fallback spectrum is returned, so model construction always
/// proceeds.
pub fn load<P: AsRef<Path>>(path: P) -> EmissionTable {
    let path = path.as_ref();
    match File::open(path) {
        Ok(file) => read_from(&mut BufReader::new(file)),
        Err(err) => {
            warn!(
                "Cannot open emission spectrum file '{}': {}; using fallback two-point spectrum",
                path.display(),
                err
            );
            EmissionTable::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;
    use tempfile::tempdir;

    fn read_str(input: &str) -> EmissionTable {
        read_from(&mut Cursor::new(input.as_bytes()))
    }

    #[test]
    fn parses_sorts_and_normalizes() {
        let table = read_str("400 0.0\n450 1.0\n500 0.5\n");
        let energies = table.energies_ev();
        assert!((energies[0] - 2.48).abs() < 1e-12);
        assert!((energies[1] - 1240.0 / 450.0).abs() < 1e-12);
        assert!((energies[2] - 3.1).abs() < 1e-12);
        assert_eq!(table.intensities(), vec![0.5, 1.0, 0.0]);
    }

    #[test]
    fn malformed_token_stops_reading_but_keeps_prefix() {
        let table = read_str("400 0.2\n450 1.0\nnot-a-number 0.5\n500 0.9\n");
        assert_eq!(table.len(), 2);
        // 450 nm is the lower energy of the two surviving points.
        assert!((table.energies_ev()[0] - 1240.0 / 450.0).abs() < 1e-12);
    }

    #[test]
    fn dangling_wavelength_is_dropped() {
        let table = read_str("400 0.5 450");
        assert_eq!(table.len(), 1);
        assert_eq!(table.intensities(), vec![1.0]);
    }

    #[test]
    fn pairs_may_span_lines() {
        let table = read_str("400\n0.5 450 1.0");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn non_positive_wavelengths_are_discarded() {
        let table = read_str("-5 0.3\n0 0.4\n400 0.5\n");
        assert_eq!(table.len(), 1);
        assert!((table.energies_ev()[0] - 3.1).abs() < 1e-12);
    }

    #[test]
    fn all_zero_intensities_become_uniform() {
        let table = read_str("400 0\n500 0\n");
        assert_eq!(table.intensities(), vec![1.0, 1.0]);
    }

    #[test]
    fn empty_stream_yields_empty_table() {
        let table = read_str("");
        assert!(table.is_empty());
    }

    #[test]
    fn missing_file_falls_back() {
        let table = load("/definitely/not/a/real/spectrum.dat");
        assert_eq!(table, EmissionTable::fallback());
    }

    #[test]
    fn readable_file_is_parsed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("emission.dat");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "420 0.8").unwrap();
        writeln!(file, "430 1.6").unwrap();
        drop(file);

        let table = load(&path);
        assert_eq!(table.len(), 2);
        assert_eq!(table.intensities(), vec![1.0, 0.5]);
    }
}
