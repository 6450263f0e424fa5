//! Rewrites the player reference table into the column naming used by the
//! match files.

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use tracing::info;

static COLUMN_RENAMES: &[(&str, &str)] = &[
    ("Player Name", "player"),
    ("Team Acronym", "team"),
    ("Batting Hand", "battinghand"),
    ("Bowling Hand", "bowlinghand"),
    ("Bowling Type", "bowlingtype"),
    ("Nationality", "nationality"),
];

static DROPPED_COLUMNS: &[&str] = &["Team Name"];

fn rename(column: &str) -> &str {
    COLUMN_RENAMES
        .iter()
        .find(|(from, _)| *from == column)
        .map_or(column, |&(_, to)| to)
}

/// Copies a player table from `reader` to `writer`, renaming the known
/// columns and dropping the redundant team name. Returns the number of rows.
pub fn rewrite_player_table<R: Read, W: Write>(reader: R, writer: W) -> Result<usize> {
    let mut rdr = ReaderBuilder::new().from_reader(reader);
    let headers = rdr.headers()?.clone();
    info!(columns = ?headers.iter().collect::<Vec<_>>(), "Player table columns");

    let missing: Vec<&str> = DROPPED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !headers.iter().any(|h| h == *c))
        .collect();
    if !missing.is_empty() {
        bail!("player table is missing column(s) {missing:?}");
    }

    let kept: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !DROPPED_COLUMNS.contains(h))
        .map(|(i, _)| i)
        .collect();

    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(kept.iter().map(|&i| rename(&headers[i])))?;

    let mut count = 0;
    for result in rdr.records() {
        let record: StringRecord = result?;
        wtr.write_record(kept.iter().map(|&i| record.get(i).unwrap_or("")))?;
        count += 1;
    }
    wtr.flush()?;

    Ok(count)
}

/// File-to-file variant of [`rewrite_player_table`].
pub fn rewrite_player_file(input: &str, output: &str) -> Result<usize> {
    let reader = File::open(input).with_context(|| format!("Failed to open {input}"))?;
    let writer = File::create(output).with_context(|| format!("Failed to create {output}"))?;
    let count = rewrite_player_table(reader, writer)?;
    info!(input, output, rows = count, "Player table rewritten");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_renames_and_drops() {
        let input = "Player Name,Team Name,Team Acronym,Batting Hand,Bowling Hand,Bowling Type,Nationality\n\
                     MS Dhoni,Chennai Super Kings,CSK,Right,Right,Medium,India\n";
        let mut out = Vec::new();

        let count = rewrite_player_table(input.as_bytes(), &mut out).unwrap();

        assert_eq!(count, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "player,team,battinghand,bowlinghand,bowlingtype,nationality\n\
             MS Dhoni,CSK,Right,Right,Medium,India\n"
        );
    }

    #[test]
    fn test_rewrite_keeps_unknown_columns() {
        let input = "Player Name,Team Name,Age\nA,B,30\n";
        let mut out = Vec::new();
        rewrite_player_table(input.as_bytes(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "player,Age\nA,30\n");
    }

    #[test]
    fn test_rewrite_requires_team_name() {
        let input = "Player Name,Team Acronym\nA,CSK\n";
        let err = rewrite_player_table(input.as_bytes(), Vec::<u8>::new()).unwrap_err();
        assert!(err.to_string().contains("missing column(s) [\"Team Name\"]"));
    }
}
