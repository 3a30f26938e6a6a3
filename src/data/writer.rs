use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::{debug, info};

use super::model::{Row, TableView};
use super::noise::noise_estimate;
use crate::config::FitParameters;
use crate::error::{ConvertError, Result};

/// Column-label comment line, written verbatim as one field.
pub const COLUMN_LABELS: &str = "#offset(ppm)     Intensity     error";

// ---------------------------------------------------------------------------
// OutputBlock – one residue, ready to serialise
// ---------------------------------------------------------------------------

/// One `(offset, intensity, noise)` data line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub offset_ppm: f64,
    pub intensity: f64,
    pub noise: f64,
}

/// Everything written for one residue.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputBlock {
    pub residue: String,
    pub noise: f64,
    pub points: Vec<DataPoint>,
}

impl OutputBlock {
    /// Build the block for `row`.  `offsets` pairs each usable column index
    /// (into the row's intensities) with its offset in ppm.
    pub fn from_row(row: &Row, offsets: &[(usize, f64)]) -> Result<Self> {
        let noise = noise_estimate(&row.intensities).ok_or_else(|| {
            ConvertError::InsufficientData {
                residue: row.label().to_string(),
                found: row.intensities.len(),
            }
        })?;

        let points: Vec<DataPoint> = offsets
            .iter()
            .filter_map(|&(col, offset_ppm)| {
                row.intensities.get(col).map(|&intensity| DataPoint {
                    offset_ppm,
                    intensity,
                    noise,
                })
            })
            .collect();

        if points.len() < offsets.len() {
            debug!(
                "Residue '{}' is short: {} of {} offsets written",
                row.label(),
                points.len(),
                offsets.len()
            );
        }

        Ok(OutputBlock {
            residue: row.label().to_string(),
            noise,
            points,
        })
    }
}

/// Parse a frequency header label.  `None` means "skip this column".
pub fn parse_offset(label: &str) -> Option<f64> {
    label.trim().parse::<f64>().ok()
}

/// Usable offset columns of a header: `(intensity index, offset ppm)`.
pub fn offset_columns(offset_labels: &[String]) -> Vec<(usize, f64)> {
    offset_labels
        .iter()
        .enumerate()
        .filter_map(|(col, label)| match parse_offset(label) {
            Some(ppm) => Some((col, ppm)),
            None => {
                debug!("Skipping non-numeric offset column '{label}'");
                None
            }
        })
        .collect()
}

/// Render a number the way ONEST input files carry them: shortest
/// round-trip digits, a decimal point on integral values (`15.0`), and
/// scientific notation with a signed two-digit exponent outside
/// `1e-4 ..< 1e16` (`2e+16`, `1e-05`).
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        let text = if v > 0.0 { "inf" } else { "-inf" };
        return text.to_string();
    }

    // `{:e}` yields the shortest round-trip mantissa, e.g. "1.5e-7".
    let sci = format!("{v:e}");
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if v == 0.0 || (-4..16).contains(&exp) {
        let fixed = v.to_string();
        if fixed.contains('.') {
            fixed
        } else {
            format!("{fixed}.0")
        }
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    }
}

// ---------------------------------------------------------------------------
// OnestWriter – tab-delimited record sink
// ---------------------------------------------------------------------------

/// Serialises the ONEST header and residue blocks to any byte sink.
pub struct OnestWriter<W: Write> {
    inner: csv::Writer<W>,
}

impl<W: Write> OnestWriter<W> {
    pub fn new(sink: W) -> Self {
        let inner = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(sink);
        OnestWriter { inner }
    }

    /// The three experiment lines plus the column-label comment.
    pub fn write_header(&mut self, params: &FitParameters) -> io::Result<()> {
        self.inner.write_record([format_value(params.frequency)])?;
        self.inner.write_record([format_value(params.mixing_time)])?;
        self.inner.write_record([
            format_value(params.sat_freq),
            format_value(params.sat_freq / 10.0),
        ])?;
        self.inner.write_record([COLUMN_LABELS])?;
        Ok(())
    }

    /// One residue comment line followed by its data lines.
    pub fn write_block(&mut self, block: &OutputBlock, params: &FitParameters) -> io::Result<()> {
        self.inner.write_record([
            "#".to_string(),
            block.residue.clone(),
            "R2a:".to_string(),
            format_value(params.ini_r2a),
            "R2b:".to_string(),
            format_value(params.ini_r2b),
            "dw:".to_string(),
            format_value(params.ini_dw),
        ])?;
        for p in &block.points {
            self.inner.write_record([
                format_value(p.offset_ppm),
                format_value(p.intensity),
                format_value(p.noise),
            ])?;
        }
        Ok(())
    }

    /// Flush buffered records and hand back the sink.
    pub fn finish(self) -> io::Result<W> {
        self.inner
            .into_inner()
            .map_err(|e| io::Error::new(e.error().kind(), e.error().to_string()))
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Write `view` as an ONEST input file at `path`.
///
/// Output already written when an error occurs is left in place.
pub fn write_onest(view: &TableView<'_>, params: &FitParameters, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| write_failure(path, e))?;
    let blocks = write_onest_to(BufWriter::new(file), view, params, path)?;
    info!("Wrote {blocks} residue block(s) to {}", path.display());
    Ok(())
}

/// Write `view` to any sink; returns the number of residue blocks.
/// `path` names the destination in error messages.
pub fn write_onest_to<W: Write>(
    sink: W,
    view: &TableView<'_>,
    params: &FitParameters,
    path: &Path,
) -> Result<usize> {
    let offsets = offset_columns(view.offset_labels());
    let mut out = OnestWriter::new(sink);
    out.write_header(params).map_err(|e| write_failure(path, e))?;

    let mut blocks = 0;
    for row in view.rows() {
        let block = OutputBlock::from_row(row, &offsets)?;
        out.write_block(&block, params)
            .map_err(|e| write_failure(path, e))?;
        blocks += 1;
    }

    out.finish()
        .and_then(|mut sink| sink.flush())
        .map_err(|e| write_failure(path, e))?;
    Ok(blocks)
}

fn write_failure(path: &Path, source: io::Error) -> ConvertError {
    ConvertError::OutputWriteFailure {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_table;
    use crate::data::model::Table;

    fn table(text: &str) -> Table {
        parse_table(text.as_bytes(), Path::new("test.tsv")).unwrap()
    }

    fn render(table: &Table, params: &FitParameters) -> Result<String> {
        let mut buf = Vec::new();
        write_onest_to(&mut buf, &table.view(), params, Path::new("memory"))?;
        Ok(String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(15.0), "15.0");
        assert_eq!(format_value(1.5), "1.5");
        assert_eq!(format_value(80.12), "80.12");
        assert_eq!(format_value(0.0), "0.0");
        assert_eq!(format_value(-3.25), "-3.25");
        assert_eq!(format_value(f64::NAN), "nan");
        assert_eq!(format_value(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_format_value_exponent_range() {
        assert_eq!(format_value(1.0e-4), "0.0001");
        assert_eq!(format_value(1.0e-5), "1e-05");
        assert_eq!(format_value(-1.5e-7), "-1.5e-07");
        assert_eq!(format_value(1.0e15), "1000000000000000.0");
        assert_eq!(format_value(2.0e16), "2e+16");
        assert_eq!(format_value(1.25e300), "1.25e+300");
        assert_eq!(format_value(-0.0), "-0.0");
    }

    #[test]
    fn test_offset_columns_skip_non_numeric() {
        let labels: Vec<String> = ["8.0", "note", "-2.5", ""].iter().map(|s| s.to_string()).collect();
        assert_eq!(offset_columns(&labels), vec![(0, 8.0), (2, -2.5)]);
    }

    #[test]
    fn test_header_lines() {
        let t = table("ResID\t8.0\nG10\t1\n");
        let t = Table::new(t.header, Vec::new());
        let text = render(&t, &FitParameters::default()).unwrap();
        assert_eq!(
            text,
            "80.12\n0.4\n15.0\t1.5\n#offset(ppm)     Intensity     error\n"
        );
    }

    #[test]
    fn test_three_point_residue() {
        let t = table("ResID\t8.0\t8.5\t9.0\nG10\t100\t95\t90\n");
        let text = render(&t, &FitParameters::default()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[4], "#\tG10\tR2a:\t25.0\tR2b:\t0.0\tdw:\t0.0");
        assert_eq!(lines[5], "8.0\t100.0\t5.0");
        assert_eq!(lines[6], "8.5\t95.0\t5.0");
        assert_eq!(lines[7], "9.0\t90.0\t5.0");
    }

    #[test]
    fn test_seeds_come_from_params() {
        let t = table("ResID\t1.0\t2.0\nK5\t1\t3\n");
        let params = FitParameters {
            ini_r2a: 12.5,
            ini_r2b: 40.0,
            ini_dw: 2.0,
            ..Default::default()
        };
        let text = render(&t, &params).unwrap();
        assert!(text.contains("#\tK5\tR2a:\t12.5\tR2b:\t40.0\tdw:\t2.0\n"));
    }

    #[test]
    fn test_non_numeric_column_skipped_but_counted_in_noise() {
        let t = table("ResID\t8.0\tflag\t9.0\nG10\t100\t0\t90\n");
        let text = render(&t, &FitParameters::default()).unwrap();
        let data: Vec<&str> = text.lines().skip(5).collect();
        let noise = format_value(sample(&[100.0, 0.0, 90.0]));
        assert_eq!(data, vec![format!("8.0\t100.0\t{noise}"), format!("9.0\t90.0\t{noise}")]);
    }

    #[test]
    fn test_short_row_writes_available_offsets() {
        let t = table("ResID\t8.0\t8.5\t9.0\nG10\t4\t6\n");
        let text = render(&t, &FitParameters::default()).unwrap();
        let data: Vec<&str> = text.lines().skip(5).collect();
        assert_eq!(data.len(), 2);
        assert!(data[1].starts_with("8.5\t6.0\t"));
    }

    #[test]
    fn test_single_intensity_is_insufficient() {
        let t = table("ResID\t8.0\nG10\t100\n");
        let err = render(&t, &FitParameters::default()).unwrap_err();
        match err {
            ConvertError::InsufficientData { residue, found } => {
                assert_eq!(residue, "G10");
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn sample(v: &[f64]) -> f64 {
        crate::data::noise::sample_std(v).unwrap()
    }
}
