//! Error taxonomy for loading and aggregating match data.

use thiserror::Error;

/// All errors produced while loading, normalising and aggregating a match.
#[derive(Error, Debug)]
pub enum CricError {
    /// The match source does not exist, could not be opened, or could not be fetched.
    #[error("Match source '{location}' not found or unreadable: {reason}")]
    SourceNotFound { location: String, reason: String },

    /// An operation needed a delivery table but none has been loaded.
    #[error("No delivery table loaded. Read the match source first")]
    UninitializedTable,

    /// A single cell could not be parsed. Callers treat the cell as missing.
    #[error("Cannot parse {column} value '{value}'")]
    UnparseableCell { column: &'static str, value: String },

    /// A phase name other than Powerplay, Middle Overs or Death Overs.
    #[error("Invalid phase: {0}")]
    InvalidPhase(String),

    /// An innings selector other than 1, 2, "Inning 1" or "Inning 2".
    #[error("Invalid innings: {0}")]
    InvalidInnings(String),

    /// A team identifier with no entry in the palette table.
    #[error("Unknown team: {0}")]
    UnknownTeam(String),

    /// A palette colour that is not a `#rrggbb` hex triplet.
    #[error("Invalid colour '{colour}' for team {team}")]
    InvalidColour { team: String, colour: String },

    /// A row whose required columns could not be decoded.
    #[error("Malformed delivery table: {0}")]
    MalformedTable(#[from] csv::Error),

    /// A configuration file is missing or not valid JSON.
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CricError>;
