//! Output formatting and persistence for figures, reports and per-over rows.
//!
//! Supports JSON printing, JSON files, CSV append and gzip-compressed CSV.

use anyhow::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use tracing::{debug, info};

use csv::WriterBuilder;
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a value as pretty-printed JSON to `path`, replacing any existing file.
pub fn write_json(path: &str, value: &impl Serialize) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, value)?;
    debug!(path, "JSON written");
    Ok(())
}

/// Appends records as rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_records<T: Serialize>(path: &str, records: &[T]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = records.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes records as a gzip-compressed CSV file with a header row.
pub fn write_records_gz<T: Serialize>(path: &str, records: &[T]) -> Result<()> {
    let file = File::create(path)?;
    let encoder = GzEncoder::new(file, Compression::default());

    let mut writer = WriterBuilder::new().has_headers(true).from_writer(encoder);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    let encoder = writer.into_inner().map_err(|e| e.into_error())?;
    encoder.finish()?;

    debug!(path, rows = records.len(), "Gzip CSV written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use serde::Serialize;
    use std::env;
    use std::fs;
    use std::io::Read;

    #[derive(Serialize)]
    struct Row {
        over: u32,
        run_rate: f64,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                over: 1,
                run_rate: 8.0,
            },
            Row {
                over: 2,
                run_rate: 7.5,
            },
        ]
    }

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&rows()).unwrap();
    }

    #[test]
    fn test_write_json() {
        let path = temp_path("cricstat_test_write.json");
        write_json(&path, &rows()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[1]["run_rate"], 7.5);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_records_writes_header_once() {
        let path = temp_path("cricstat_test_header.csv");
        let _ = fs::remove_file(&path);

        append_records(&path, &rows()).unwrap();
        append_records(&path, &rows()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("run_rate")).count();
        assert_eq!(header_count, 1);
        // 1 header + 4 data rows
        assert_eq!(content.lines().count(), 5);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_records_gz() {
        let path = temp_path("cricstat_test_rows.csv.gz");
        write_records_gz(&path, &rows()).unwrap();

        let mut content = String::new();
        GzDecoder::new(File::open(&path).unwrap())
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "over,run_rate\n1,8.0\n2,7.5\n");

        fs::remove_file(&path).unwrap();
    }
}
