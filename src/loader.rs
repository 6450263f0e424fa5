//! Loading the delivery table and deriving the `ball` and `res` columns.

use std::io::Read;

use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};

use crate::delivery::{Delivery, DeliveryTable, ball_index, coerce_res};
use crate::error::Result;
use crate::fetch::read_source;

/// Decodes a delivery table from CSV with a header row.
///
/// `innings`, `over`, `score` and `wicketfell` must hold whole numbers
/// (`20.0` or a blank cell is rejected). `delivery` and `res` are kept raw
/// and only parsed by [`normalize`].
///
/// # Errors
///
/// Returns [`crate::error::CricError::MalformedTable`] if a required column
/// is missing or a required numeric cell cannot be decoded.
pub fn read_table<R: Read>(reader: R) -> Result<DeliveryTable> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: Delivery = result?;
        rows.push(record);
    }

    Ok(DeliveryTable::new(rows))
}

/// Reads a whole match source (local path or URL) into memory.
pub fn load(source: &str) -> Result<DeliveryTable> {
    let bytes = read_source(source)?;
    let table = read_table(bytes.as_slice())?;
    info!(source, rows = table.len(), "Delivery table loaded");
    Ok(table)
}

/// Fills the derived `ball` and `res` columns.
///
/// A cell that cannot be parsed becomes `None` for that row only; the rest
/// of the table is still normalised.
pub fn normalize(mut table: DeliveryTable) -> DeliveryTable {
    let mut missing_balls = 0usize;
    let mut missing_res = 0usize;

    for row in table.rows_mut() {
        row.ball = match ball_index(&row.delivery) {
            Ok(ball) => Some(ball),
            Err(e) => {
                debug!(error = %e, "Ball index left missing");
                missing_balls += 1;
                None
            }
        };

        row.res = coerce_res(row.res_raw.as_deref()).unwrap_or_else(|e| {
            debug!(error = %e, "Result code left missing");
            None
        });
        if row.res.is_none() {
            missing_res += 1;
        }
    }

    info!(
        rows = table.len(),
        missing_balls, missing_res, "Delivery table normalised"
    );
    table
}
