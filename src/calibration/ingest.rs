//! CSV ingestion of anchor tables.
//!
//! Expected header: `width,height,quantity,total,factor_override`, with an
//! empty `factor_override` cell for anchors priced on the ladder.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;

use crate::calibration::types::AnchorObservation;

/// Read anchors from any CSV source.
pub fn read_anchors<R: Read>(source: R) -> Result<Vec<AnchorObservation>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut anchors = Vec::new();
    for (index, row) in reader.deserialize().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let anchor: AnchorObservation =
            row.with_context(|| format!("malformed anchor on line {}", index + 2))?;
        anchors.push(anchor);
    }
    Ok(anchors)
}

/// Read anchors from a CSV file.
pub fn load_anchors_csv(path: impl AsRef<Path>) -> Result<Vec<AnchorObservation>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open anchor table {}", path.display()))?;
    read_anchors(file).with_context(|| format!("failed to read anchor table {}", path.display()))
}
