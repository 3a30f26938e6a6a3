use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use log::{debug, info};

use super::model::{Row, Table};
use crate::error::{ConvertError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a CEST intensity table from a tab-delimited text file.
///
/// Layout (one header line, then one line per residue):
///
/// ```text
/// ResID   8.0     8.5     9.0
/// G10     100     95      90
/// A11     210     204     199
/// ```
///
/// Rows may be shorter or longer than the header; no schema is enforced
/// beyond splitting on tabs.
pub fn load_table(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConvertError::InputNotFound(path.to_path_buf()),
        _ => parse_failure(path, e),
    })?;
    let table = parse_table(file, path)?;
    info!(
        "Loaded {} residue(s) x {} offset column(s) from {}",
        table.len(),
        table.offset_labels().len(),
        path.display()
    );
    Ok(table)
}

/// Parse a table from any reader.  `path` is only used in error messages.
pub fn parse_table<R: Read>(source: R, path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| parse_failure(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if header.iter().all(String::is_empty) {
        return Err(ConvertError::ParseFailure {
            path: path.to_path_buf(),
            reason: "missing header line".into(),
        });
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| parse_failure(path, e))?;
        let cells: Vec<String> = record.iter().map(|c| c.to_string()).collect();

        if cells.len() != header.len() {
            debug!(
                "Row {} has {} cell(s), header has {}",
                row_no + 1,
                cells.len(),
                header.len()
            );
        }

        let intensities = cells
            .iter()
            .enumerate()
            .skip(1)
            .map(|(col, cell)| parse_intensity(cell, row_no, col, path))
            .collect::<Result<Vec<f64>>>()?;

        rows.push(Row { cells, intensities });
    }

    Ok(Table::new(header, rows))
}

// -- helpers --

/// Empty cells are missing measurements and load as NaN.
fn parse_intensity(cell: &str, row_no: usize, col: usize, path: &Path) -> Result<f64> {
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>().map_err(|_| ConvertError::ParseFailure {
        path: path.to_path_buf(),
        reason: format!(
            "row {}, column {}: '{cell}' is not a number",
            row_no + 1,
            col + 1
        ),
    })
}

fn parse_failure(path: &Path, err: impl std::fmt::Display) -> ConvertError {
    ConvertError::ParseFailure {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Table> {
        parse_table(text.as_bytes(), Path::new("test.tsv"))
    }

    #[test]
    fn test_parse_basic_table() {
        let table = parse("ResID\t8.0\t8.5\t9.0\nG10\t100\t95\t90\nA11\t1.5\t2.5\t3.5\n").unwrap();
        assert_eq!(table.header, vec!["ResID", "8.0", "8.5", "9.0"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].label(), "G10");
        assert_eq!(table.rows[0].intensities, vec![100.0, 95.0, 90.0]);
        assert_eq!(table.rows[1].intensities, vec![1.5, 2.5, 3.5]);
    }

    #[test]
    fn test_jagged_rows_are_accepted() {
        let table = parse("ResID\t8.0\t8.5\nG10\t100\nA11\t1\t2\t3\n").unwrap();
        assert_eq!(table.rows[0].intensities, vec![100.0]);
        assert_eq!(table.rows[1].intensities, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_empty_cell_is_nan() {
        let table = parse("ResID\t8.0\t8.5\nG10\t\t5\n").unwrap();
        assert!(table.rows[0].intensities[0].is_nan());
        assert_eq!(table.rows[0].intensities[1], 5.0);
    }

    #[test]
    fn test_non_numeric_intensity_fails() {
        let err = parse("ResID\t8.0\nG10\tabc\n").unwrap_err();
        match err {
            ConvertError::ParseFailure { reason, .. } => {
                assert!(reason.contains("row 1, column 2"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_fails() {
        let bytes: &[u8] = b"ResID\t8.0\nG\xff10\t1\n";
        let err = parse_table(bytes, Path::new("bad.tsv")).unwrap_err();
        assert!(matches!(err, ConvertError::ParseFailure { .. }));
    }

    #[test]
    fn test_empty_input_fails() {
        for text in ["", "\n\n"] {
            match parse(text).unwrap_err() {
                ConvertError::ParseFailure { reason, .. } => {
                    assert_eq!(reason, "missing header line");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_header_only_table_is_empty() {
        let table = parse("ResID\t8.0\t8.5\n").unwrap();
        assert_eq!(table.offset_labels().len(), 2);
        assert!(table.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_input_is_not_missing() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        let path = locked.join("peaks.tsv");
        std::fs::write(&path, "ResID\t8.0\nG10\t1\n").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        let result = load_table(&path);
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        // Running as root bypasses directory permissions.
        if let Err(err) = result {
            assert!(matches!(err, ConvertError::ParseFailure { .. }), "{err:?}");
        }
    }

    #[test]
    fn test_missing_file() {
        let err = load_table(Path::new("/definitely/not/here.tsv")).unwrap_err();
        assert!(matches!(err, ConvertError::InputNotFound(_)));
    }
}
