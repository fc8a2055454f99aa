//! Text export of the analytic curves for external plotting.

use flipfield_analytic::AnalyticSample;
use flipfield_core::EngineError;
use serde_json::Value;
use std::io::Write;

/// Header row written by [`write_csv`].
pub const CSV_HEADER: &str = "radius,orientation,divergence";

/// Writes samples as CSV with a header row.
pub fn write_csv<W: Write>(
    samples: impl IntoIterator<Item = AnalyticSample>,
    mut out: W,
) -> Result<(), EngineError> {
    let io = |e: std::io::Error| EngineError::Io(e.to_string());
    writeln!(out, "{CSV_HEADER}").map_err(io)?;
    for s in samples {
        writeln!(out, "{},{},{}", s.radius, s.orientation, s.divergence).map_err(io)?;
    }
    out.flush().map_err(io)
}

/// Collects samples into a JSON array of `{radius, orientation, divergence}`.
pub fn to_json(samples: impl IntoIterator<Item = AnalyticSample>) -> Value {
    Value::Array(
        samples
            .into_iter()
            .map(|s| {
                serde_json::json!({
                    "radius": s.radius,
                    "orientation": s.orientation,
                    "divergence": s.divergence,
                    "sign": s.orientation_sign().signum(),
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use flipfield_analytic::{sample_curve, CurveParams};

    #[test]
    fn csv_has_header_and_one_row_per_sample() {
        let mut buf = Vec::new();
        write_csv(sample_curve(&CurveParams::default()), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines.len(), 1 + 98);
        assert!(lines[1].starts_with("1,"), "first row: {}", lines[1]);
        assert!(lines.last().unwrap().starts_with("199,"));
    }

    #[test]
    fn csv_rows_parse_back_to_numbers() {
        let mut buf = Vec::new();
        write_csv(sample_curve(&CurveParams::default()), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        for row in text.lines().skip(1) {
            let cols: Vec<f64> = row.split(',').map(|c| c.parse().unwrap()).collect();
            assert_eq!(cols.len(), 3);
            assert!(cols[2] <= 10.0);
        }
    }

    #[test]
    fn json_export_carries_orientation_sign() {
        let v = to_json(sample_curve(&CurveParams::default()));
        let arr = v.as_array().unwrap();
        assert_eq!(arr.len(), 98);
        assert_eq!(arr[0]["sign"], -1);
        assert_eq!(arr[97]["sign"], 1);
    }

    #[test]
    fn failing_writer_maps_to_io_error() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("pipe closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let err = write_csv(sample_curve(&CurveParams::default()), Broken).unwrap_err();
        assert!(err.to_string().contains("pipe closed"), "got: {err}");
    }
}
