//! Delivery-level records and the in-memory match table.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CricError, Result};

/// One batting turn. A completed limited-overs match has two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Innings {
    First,
    Second,
}

impl Innings {
    pub const ALL: [Innings; 2] = [Innings::First, Innings::Second];

    /// The value stored in the `innings` column.
    pub fn number(self) -> u8 {
        match self {
            Innings::First => 1,
            Innings::Second => 2,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Innings::First),
            2 => Some(Innings::Second),
            _ => None,
        }
    }
}

impl fmt::Display for Innings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Inning {}", self.number())
    }
}

/// Accepts the bare number (`"2"`) or the selector label (`"Inning 2"`).
impl FromStr for Innings {
    type Err = CricError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        let number = lower
            .strip_prefix("innings")
            .or_else(|| lower.strip_prefix("inning"))
            .unwrap_or(lower.as_str())
            .trim();

        number
            .parse::<u8>()
            .ok()
            .and_then(Innings::from_number)
            .ok_or_else(|| CricError::InvalidInnings(trimmed.to_string()))
    }
}

/// A single row of the match file: one ball bowled.
///
/// `ball` and `res` are derived by [`crate::loader::normalize`] and stay
/// `None` until then, or when the raw cell cannot be parsed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Delivery {
    pub innings: u8,
    /// Raw "overs.balls" notation, e.g. `4.3` is the third ball after four completed overs.
    pub delivery: String,
    pub over: u32,
    #[serde(rename = "battingteam")]
    pub batting_team: String,
    /// Cumulative score after this ball.
    pub score: u32,
    /// Cumulative wickets fallen after this ball.
    #[serde(rename = "wicketfell")]
    pub wickets: u32,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub powerplay: bool,
    #[serde(rename = "strategictimeout", default, deserialize_with = "deserialize_flag")]
    pub strategic_timeout: bool,
    #[serde(rename = "res", default)]
    pub res_raw: Option<String>,

    #[serde(skip)]
    pub ball: Option<u32>,
    #[serde(skip)]
    pub res: Option<f64>,
}

/// Converts "overs.balls" notation into a sequential ball index (`overs * 6 + balls`).
///
/// A bare whole number such as `7` is read as `7.0`, the form a
/// float-typed spreadsheet column writes it in.
///
/// # Errors
///
/// Returns [`CricError::UnparseableCell`] when either side of the decimal
/// point is not a non-negative integer.
pub fn ball_index(notation: &str) -> Result<u32> {
    let unparseable = || CricError::UnparseableCell {
        column: "delivery",
        value: notation.to_string(),
    };

    let trimmed = notation.trim();
    let (overs, balls) = trimmed.split_once('.').unwrap_or((trimmed, "0"));
    let overs: u32 = overs.parse().map_err(|_| unparseable())?;
    let balls: u32 = balls.parse().map_err(|_| unparseable())?;

    overs
        .checked_mul(6)
        .and_then(|b| b.checked_add(balls))
        .ok_or_else(unparseable)
}

/// Coerces a raw result-code cell to a number. Blank cells are `Ok(None)`.
pub fn coerce_res(raw: Option<&str>) -> Result<Option<f64>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<f64>() {
        Ok(v) if v.is_nan() => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(CricError::UnparseableCell {
            column: "res",
            value: raw.to_string(),
        }),
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "0.0" | "false" | "no" => Ok(false),
        "1" | "1.0" | "true" | "yes" => Ok(true),
        other => Err(serde::de::Error::custom(format!(
            "expected a 0/1 flag, got '{other}'"
        ))),
    }
}

/// The delivery table for one match, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryTable {
    rows: Vec<Delivery>,
}

impl DeliveryTable {
    pub fn new(rows: Vec<Delivery>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Delivery] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Delivery] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows belonging to `innings`, in file order.
    pub fn innings(&self, innings: Innings) -> Vec<&Delivery> {
        self.rows
            .iter()
            .filter(|d| d.innings == innings.number())
            .collect()
    }

    /// The batting team of an innings, taken from its first row.
    pub fn batting_team(&self, innings: Innings) -> Option<&str> {
        self.rows
            .iter()
            .find(|d| d.innings == innings.number())
            .map(|d| d.batting_team.as_str())
    }

    /// A new table holding the rows that satisfy `predicate`.
    pub fn filter<F>(&self, predicate: F) -> DeliveryTable
    where
        F: Fn(&Delivery) -> bool,
    {
        DeliveryTable::new(self.rows.iter().filter(|d| predicate(d)).cloned().collect())
    }
}

impl FromIterator<Delivery> for DeliveryTable {
    fn from_iter<I: IntoIterator<Item = Delivery>>(iter: I) -> Self {
        DeliveryTable::new(iter.into_iter().collect())
    }
}
