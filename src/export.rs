//! Export formatting for group sets.
//!
//! Pure functions, `&[Group]` in, text or bytes out. The only I/O is
//! [`write_csv`], which writes the CSV under its fixed filename.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ExportError;
use crate::types::{ExportFormat, Group, GroupRecord};

/// Fixed filename of the CSV export.
pub const CSV_FILENAME: &str = "分组结果.csv";

/// UTF-8 byte-order mark so spreadsheet tools detect the encoding.
const BOM: &str = "\u{feff}";

/// Group label as shown to people: "第 1 组", "第 2 组", ...
pub fn group_label(index: usize) -> String {
    format!("第 {} 组", index + 1)
}

/// Format a group set in the requested format.
///
/// # Errors
/// Only the CSV and JSON encoders can fail.
pub fn format_groups(groups: &[Group], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Text => Ok(to_clipboard_text(groups)),
        ExportFormat::Csv => to_csv_string(groups),
        ExportFormat::Json => to_json(groups),
    }
}

// ============================================================================
// TEXT FORMAT
// ============================================================================

/// Clipboard layout: one `第 n 组:` block per group, blank line between.
pub fn to_clipboard_text(groups: &[Group]) -> String {
    groups
        .iter()
        .enumerate()
        .map(|(i, group)| format!("{}:\n{}", group_label(i), group.join(", ")))
        .collect::<Vec<_>>()
        .join("\n\n")
}

// ============================================================================
// CSV FORMAT
// ============================================================================

/// CSV bytes with a leading BOM.
///
/// Header `组别,成员1..成员N` where N is the largest group, written bare;
/// one row per group after it. Every row field is quoted, embedded
/// quotes are doubled.
///
/// # Errors
/// Returns an error if the CSV writer fails.
pub fn to_csv_bytes(groups: &[Group]) -> Result<Vec<u8>, ExportError> {
    let widest = groups.iter().map(Vec::len).max().unwrap_or(0);

    // Header cells never contain separators or quotes
    let header = std::iter::once("组别".to_string())
        .chain((1..=widest).map(|i| format!("成员{}", i)))
        .collect::<Vec<_>>()
        .join(",");
    let mut out = String::from(BOM);
    out.push_str(&header);
    out.push('\n');

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(out.into_bytes());

    for (i, group) in groups.iter().enumerate() {
        let row = std::iter::once(group_label(i)).chain(group.iter().cloned());
        writer.write_record(row)?;
    }

    writer.into_inner().map_err(|e| ExportError::Flush(e.into_error()))
}

fn to_csv_string(groups: &[Group]) -> Result<String, ExportError> {
    Ok(String::from_utf8(to_csv_bytes(groups)?)?)
}

/// Write the CSV export as `dir/分组结果.csv`, replacing any previous one.
///
/// # Errors
/// Returns an error if encoding or the file write fails.
pub fn write_csv(groups: &[Group], dir: &Path) -> Result<PathBuf, ExportError> {
    let bytes = to_csv_bytes(groups)?;
    let path = dir.join(CSV_FILENAME);
    fs::write(&path, bytes).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), groups = groups.len(), "CSV exported");
    Ok(path)
}

// ============================================================================
// JSON FORMAT
// ============================================================================

/// Numbered records as pretty-printed JSON.
pub fn to_json(groups: &[Group]) -> Result<String, ExportError> {
    let records: Vec<GroupRecord> = groups
        .iter()
        .enumerate()
        .map(|(i, members)| GroupRecord {
            group: i + 1,
            members: members.clone(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

// ============================================================================
// TESTS
// ============================================================================
