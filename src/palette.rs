//! Team colour palettes.
//!
//! [`Team`] enumerates the franchises with a known palette. [`PaletteTable`]
//! starts from the built-in colours and can be overridden from a JSON file:
//! ```json
//! {
//!   "CSK": { "primary": ["#ffcb05"], "secondary": ["#0066b3"] }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::error::{CricError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Team {
    Csk,
    Dc,
    Gg,
    Kkr,
    Lsg,
    Mi,
    Pbks,
    Rr,
    Rcb,
    Srh,
}

static BUILTIN: &[(Team, &[&str], &[&str])] = &[
    (Team::Csk, &["#ffcb05", "#ffce32", "#f36f21"], &["#0066b3", "#1d63ff", "#002349", "#0091ff"]),
    (Team::Dc, &["#17479e", "#113577"], &["#d71921", "#fd1d26", "#fb042d"]),
    (Team::Gg, &["#1d314d", "#1993ff"], &["#dec16d", "#ffe67d"]),
    (Team::Kkr, &["#53367d", "#704fa1", "#5d3696"], &["#f2bf26", "#e3ad3e"]),
    (Team::Lsg, &["#0257e0", "#1c2c78"], &["#f08800", "#e2250f"]),
    (
        Team::Mi,
        &["#1140be", "#0e3889", "#345ecc", "#0155c8", "#083f88"],
        &["#c19a3c", "#d8ba63", "#dfc667"],
    ),
    (Team::Pbks, &["#dd1f2d", "#ed1c24"], &["#d0aa82", "#f3d6a9"]),
    (Team::Rr, &["#ff4690", "#e50693", "#a00048", "#fe0085"], &["#254aa5", "#cba92b", "#0c1679"]),
    (Team::Rcb, &["#fc0e17", "#e00c0b"], &["#000000", "#deb04e", "#d4a23d", "#ccba70"]),
    (Team::Srh, &["#fe4f34", "#fc642c", "#e27a07"], &["#000000"]),
];

impl Team {
    pub const ALL: [Team; 10] = [
        Team::Csk,
        Team::Dc,
        Team::Gg,
        Team::Kkr,
        Team::Lsg,
        Team::Mi,
        Team::Pbks,
        Team::Rr,
        Team::Rcb,
        Team::Srh,
    ];

    /// The identifier used in the `battingteam` column.
    pub fn code(self) -> &'static str {
        match self {
            Team::Csk => "CSK",
            Team::Dc => "DC",
            Team::Gg => "GG",
            Team::Kkr => "KKR",
            Team::Lsg => "LSG",
            Team::Mi => "MI",
            Team::Pbks => "PBKS",
            Team::Rr => "RR",
            Team::Rcb => "RCB",
            Team::Srh => "SRH",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Team {
    type Err = CricError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        Team::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| CricError::UnknownTeam(code.to_string()))
    }
}

/// Ordered primary and secondary colours of one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: Vec<String>,
    #[serde(default)]
    pub secondary: Vec<String>,
}

impl Palette {
    fn validate(&self, team: Team) -> Result<()> {
        if self.primary.is_empty() {
            return Err(CricError::Config(format!("{team} has no primary colours")));
        }
        for colour in self.primary.iter().chain(&self.secondary) {
            if !is_hex_colour(colour) {
                return Err(CricError::InvalidColour {
                    team: team.to_string(),
                    colour: colour.clone(),
                });
            }
        }
        Ok(())
    }
}

fn is_hex_colour(colour: &str) -> bool {
    colour
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Palette lookup keyed by [`Team`].
#[derive(Debug, Clone)]
pub struct PaletteTable {
    entries: HashMap<Team, Palette>,
}

impl PaletteTable {
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(team, primary, secondary)| {
                let palette = Palette {
                    primary: primary.iter().map(|c| c.to_string()).collect(),
                    secondary: secondary.iter().map(|c| c.to_string()).collect(),
                };
                (*team, palette)
            })
            .collect();
        Self { entries }
    }

    /// Built-in palettes with the entries of a JSON override applied on top.
    ///
    /// Every key must name a known team and every colour must be `#rrggbb`.
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: HashMap<String, Palette> =
            serde_json::from_str(json).map_err(|e| CricError::Config(e.to_string()))?;

        let mut table = Self::builtin();
        for (code, palette) in overrides {
            let team: Team = code.parse()?;
            palette.validate(team)?;
            table.entries.insert(team, palette);
        }
        Ok(table)
    }

    /// Loads an override file from `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CricError::Config(format!("cannot read palette file {path}: {e}")))?;
        let table = Self::from_json(&content)?;
        info!(path, "Palette overrides loaded");
        Ok(table)
    }

    /// Palette for a team identifier as it appears in the match file.
    pub fn get(&self, team_id: &str) -> Result<&Palette> {
        let team: Team = team_id.parse()?;
        self.entries
            .get(&team)
            .ok_or_else(|| CricError::UnknownTeam(team_id.to_string()))
    }

    /// First primary colour of a team, the one used for its chart series.
    pub fn series_colour(&self, team_id: &str) -> Result<&str> {
        let palette = self.get(team_id)?;
        palette
            .primary
            .first()
            .map(String::as_str)
            .ok_or_else(|| CricError::Config(format!("{team_id} has no primary colours")))
    }
}

impl Default for PaletteTable {
    fn default() -> Self {
        Self::builtin()
    }
}
