use super::table::SeriesRow;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::io::{Read, Write};

/// Write rows as CSV with an `index,age,weight,cumulative` header.
pub fn write_series_csv<W: Write>(writer: W, rows: &[SeriesRow]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("writing row {}", row.index))?;
    }
    writer.flush().context("flushing csv")?;
    Ok(())
}

/// Read rows previously written by [`write_series_csv`].
pub fn read_series_csv<R: Read>(reader: R) -> Result<Vec<SeriesRow>> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for (idx, row) in reader.deserialize::<SeriesRow>().enumerate() {
        rows.push(row.with_context(|| format!("parsing series row {}", idx + 1))?);
    }
    Ok(rows)
}
