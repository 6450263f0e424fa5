//! Over phases of a twenty-over innings.

use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::delivery::DeliveryTable;
use crate::error::{CricError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    Powerplay,
    #[serde(rename = "Middle Overs")]
    MiddleOvers,
    #[serde(rename = "Death Overs")]
    DeathOvers,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Powerplay, Phase::MiddleOvers, Phase::DeathOvers];

    pub fn label(self) -> &'static str {
        match self {
            Phase::Powerplay => "Powerplay",
            Phase::MiddleOvers => "Middle Overs",
            Phase::DeathOvers => "Death Overs",
        }
    }

    /// 1-based inclusive over numbers covered by this phase.
    pub fn overs(self) -> RangeInclusive<u32> {
        match self {
            Phase::Powerplay => 1..=6,
            Phase::MiddleOvers => 7..=15,
            Phase::DeathOvers => 16..=20,
        }
    }

    pub fn contains(self, over: u32) -> bool {
        self.overs().contains(&over)
    }

    /// The phase an over belongs to; `None` outside overs 1-20.
    pub fn of_over(over: u32) -> Option<Phase> {
        Phase::ALL.into_iter().find(|p| p.contains(over))
    }

    /// Number of overs bowled before the phase starts. Seeds the
    /// over counter of a phase-restricted run-rate series.
    pub fn initial_offset(self) -> u32 {
        self.overs().start() - 1
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Phase {
    type Err = CricError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s
            .trim()
            .to_ascii_lowercase()
            .replace(['-', '_'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        match key.as_str() {
            "powerplay" => Ok(Phase::Powerplay),
            "middle overs" => Ok(Phase::MiddleOvers),
            "death overs" => Ok(Phase::DeathOvers),
            _ => Err(CricError::InvalidPhase(s.trim().to_string())),
        }
    }
}

/// Rows whose over number falls inside `phase`.
pub fn filter_by_phase(table: &DeliveryTable, phase: Phase) -> DeliveryTable {
    table.filter(|d| phase.contains(d.over))
}
