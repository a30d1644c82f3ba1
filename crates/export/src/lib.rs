//! Export helpers for CSV tables and JSON summaries.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod table {
    use std::io;
    use std::path::Path;

    use super::writer_for_path;

    /// Write a header and numeric rows as CSV; the first column is the epoch by convention.
    pub fn write_rows<I>(path: &Path, header: &[String], rows: I) -> io::Result<usize>
    where
        I: IntoIterator<Item = Vec<f64>>,
    {
        let mut writer = csv::Writer::from_writer(writer_for_path(path)?);
        writer.write_record(header)?;
        let mut count = 0;
        for row in rows {
            if row.len() != header.len() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("row {count} has {} columns, header has {}", row.len(), header.len()),
                ));
            }
            writer.write_record(row.iter().map(|v| format!("{v:e}")))?;
            count += 1;
        }
        writer.flush()?;
        Ok(count)
    }

    /// Header for a Cartesian state table.
    pub fn state_header() -> Vec<String> {
        ["epoch_s", "x_km", "y_km", "z_km", "vx_km_s", "vy_km_s", "vz_km_s"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

pub mod summary {
    use std::io::{self, Write};
    use std::path::Path;

    use serde::Serialize;
    use serde_json::to_writer_pretty;

    use super::writer_for_path;

    /// Write any serializable summary as pretty JSON.
    pub fn write_json<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
        let mut writer = writer_for_path(path)?;
        to_writer_pretty(&mut writer, value)?;
        writeln!(writer)?;
        writer.flush()
    }
}
