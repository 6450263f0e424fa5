//! Match-level summaries for export.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregate::{InningsSeries, PhaseSummary, phase_breakdown, run_rate, wickets};
use crate::delivery::{DeliveryTable, Innings};

/// Batting team of one innings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InningsTeam {
    pub innings: u8,
    pub batting_team: String,
}

/// Complete per-over analysis of a match, written as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub deliveries: usize,
    pub teams: Vec<InningsTeam>,
    pub run_rate: InningsSeries<f64>,
    pub wickets: InningsSeries<u32>,
    pub phases: Vec<PhaseSummary>,
}

impl MatchReport {
    pub fn build(source: &str, table: &DeliveryTable) -> Self {
        let teams = Innings::ALL
            .into_iter()
            .filter_map(|innings| {
                table.batting_team(innings).map(|team| InningsTeam {
                    innings: innings.number(),
                    batting_team: team.to_string(),
                })
            })
            .collect();

        MatchReport {
            generated_at: Utc::now(),
            source: source.to_string(),
            deliveries: table.len(),
            teams,
            run_rate: run_rate(table, None),
            wickets: wickets(table),
            phases: phase_breakdown(table),
        }
    }
}

/// One CSV row of the per-over export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverRow {
    pub source: String,
    pub innings: u8,
    pub batting_team: String,
    pub over: u32,
    pub run_rate: f64,
    pub wickets: u32,
}

/// Flattens run rate and wickets into rows, joined on innings and over.
pub fn over_rows(source: &str, table: &DeliveryTable) -> Vec<OverRow> {
    let rates = run_rate(table, None);
    let fallen = wickets(table);

    let mut rows = Vec::new();
    for innings in Innings::ALL {
        let team = table.batting_team(innings).unwrap_or_default();
        for (rate, wkts) in rates.get(innings).iter().zip(fallen.get(innings)) {
            rows.push(OverRow {
                source: source.to_string(),
                innings: innings.number(),
                batting_team: team.to_string(),
                over: rate.over,
                run_rate: rate.value,
                wickets: wkts.value,
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::Delivery;

    fn table() -> DeliveryTable {
        (0..12u32)
            .map(|i| Delivery {
                innings: 1,
                over: i / 6 + 1,
                batting_team: "RCB".to_string(),
                score: (i + 1) * 2,
                wickets: u32::from(i >= 8),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_over_rows() {
        let rows = over_rows("0.csv", &table());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].batting_team, "RCB");
        assert_eq!(rows[0].run_rate, 12.0);
        assert_eq!(rows[1].run_rate, 12.0);
        assert_eq!(rows[1].wickets, 1);
    }

    #[test]
    fn test_report_build() {
        let report = MatchReport::build("0.csv", &table());
        assert_eq!(report.deliveries, 12);
        assert_eq!(report.teams.len(), 1);
        assert_eq!(report.run_rate.first.len(), 2);
        assert_eq!(report.phases.len(), 1);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["phases"][0]["phase"], "Powerplay");
        assert_eq!(json["teams"][0]["batting_team"], "RCB");
    }
}
