//! Turning free text and CSV files into name entries.
//!
//! Pure parsing. The caller feeds the result to [`crate::roster::Roster::add`].
//! CSV parsing is all-or-nothing: a malformed file yields an error and
//! no entries at all.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{info, warn};

use crate::error::IngestError;

/// UTF-8 byte-order mark, as written by spreadsheet exports.
const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Split bulk text on newlines and commas, trim, drop empties.
pub fn split_bulk_text(text: &str) -> Vec<String> {
    text.split(['\n', '\r', ','])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse CSV from any reader. Every non-empty cell is one entry.
///
/// No header row is assumed and rows may have different lengths.
///
/// # Errors
/// Returns the first parse error; nothing is returned alongside it.
pub fn parse_csv<R: Read>(mut reader: R) -> Result<Vec<String>, IngestError> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    let body = raw.strip_prefix(BOM).unwrap_or(&raw);

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body);

    let mut entries = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        entries.extend(
            record
                .iter()
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .map(str::to_string),
        );
    }
    Ok(entries)
}

/// Read and parse a CSV file.
///
/// # Errors
/// Returns an error if the file cannot be opened or is not valid CSV.
pub fn read_csv_file(path: &Path) -> Result<Vec<String>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match parse_csv(BufReader::new(file)) {
        Ok(entries) => {
            info!(path = %path.display(), entries = entries.len(), "CSV parsed");
            Ok(entries)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "CSV rejected");
            Err(e)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // -- bulk text --

    #[test]
    fn bulk_text_splits_on_newlines_and_commas() {
        let entries = split_bulk_text("张三\n李四, 王五,,\n\n  赵六  ");
        assert_eq!(entries, vec!["张三", "李四", "王五", "赵六"]);
    }

    #[test]
    fn bulk_text_handles_crlf() {
        assert_eq!(split_bulk_text("A\r\nB\r\n"), vec!["A", "B"]);
    }

    #[test]
    fn bulk_text_of_only_separators_is_empty() {
        assert!(split_bulk_text(" ,\n, \n").is_empty());
    }

    // -- CSV --

    #[test]
    fn csv_takes_every_non_empty_cell() {
        let data = "Alice,Bob\n,Carol\n  Dave  ,\n";
        let entries = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(entries, vec!["Alice", "Bob", "Carol", "Dave"]);
    }

    #[test]
    fn csv_allows_ragged_rows() {
        let data = "A\nB,C,D\nE,F\n";
        let entries = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(entries, vec!["A", "B", "C", "D", "E", "F"]);
    }

    #[test]
    fn csv_unquotes_cells() {
        let data = "\"Smith, John\",\"He said \"\"hi\"\"\"\n";
        let entries = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(entries, vec!["Smith, John", "He said \"hi\""]);
    }

    #[test]
    fn csv_strips_byte_order_mark() {
        let data = "\u{feff}姓名\n张三\n";
        let entries = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(entries, vec!["姓名", "张三"]);
    }

    #[test]
    fn csv_with_invalid_utf8_is_rejected() {
        let data: &[u8] = b"Alice\n\xff\xfe\xfd\nBob\n";
        let result = parse_csv(data);
        assert!(matches!(result, Err(IngestError::Csv(_))));
    }

    #[test]
    fn csv_file_round_trip() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "name,dept").unwrap();
        writeln!(file, "Alice,HR").unwrap();

        let entries = read_csv_file(file.path()).unwrap();
        assert_eq!(entries, vec!["name", "dept", "Alice", "HR"]);
    }

    #[test]
    fn missing_file_reports_io_error() {
        let result = read_csv_file(Path::new("/nonexistent/names.csv"));
        assert!(matches!(result, Err(IngestError::Io { .. })));
    }
}
