//! JSON record output
//!
//! Records are written as one pretty-printed array, indented with four
//! spaces. Non-ASCII text is written as-is.

use crate::crawler::Record;
use crate::output::OutputResult;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes the records to `output_path`, replacing any existing file
///
/// # Arguments
///
/// * `records` - The records to write, in output order
/// * `output_path` - Destination file
///
/// # Returns
///
/// * `Ok(())` - The file was written
/// * `Err(OutputError)` - Failed to create or write the file
pub fn save_records(records: &[Record], output_path: &Path) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(output_path)?);
    write_records(records, &mut writer)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    tracing::info!(
        "Saved {} records to {}",
        records.len(),
        output_path.display()
    );

    Ok(())
}

/// Formats the records exactly as [`save_records`] writes them, without the
/// trailing newline
pub fn format_records(records: &[Record]) -> OutputResult<String> {
    let mut buffer = Vec::new();
    write_records(records, &mut buffer)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn write_records<W: Write>(records: &[Record], writer: W) -> OutputResult<()> {
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(writer, formatter);
    records.serialize(&mut serializer)?;
    Ok(())
}
