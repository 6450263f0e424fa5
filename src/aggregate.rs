//! Per-over aggregation of the delivery table.
//!
//! Over boundaries are found by position: every sixth row of an innings
//! (indices 5, 11, 17, ...) is taken as the last ball of a completed over.
//! This assumes the table holds exactly six rows per over, with no extra
//! rows for wides or no-balls.

use serde::Serialize;
use tracing::warn;

use crate::delivery::{Delivery, DeliveryTable, Innings};
use crate::phase::{Phase, filter_by_phase};

pub const BALLS_PER_OVER: usize = 6;

/// A metric value attached to a 1-based over number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverPoint<T> {
    pub over: u32,
    pub value: T,
}

/// One over-indexed sequence per innings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InningsSeries<T> {
    pub first: Vec<OverPoint<T>>,
    pub second: Vec<OverPoint<T>>,
}

impl<T> Default for InningsSeries<T> {
    fn default() -> Self {
        Self {
            first: Vec::new(),
            second: Vec::new(),
        }
    }
}

impl<T> InningsSeries<T> {
    pub fn get(&self, innings: Innings) -> &[OverPoint<T>] {
        match innings {
            Innings::First => &self.first,
            Innings::Second => &self.second,
        }
    }

    fn set(&mut self, innings: Innings, points: Vec<OverPoint<T>>) {
        match innings {
            Innings::First => self.first = points,
            Innings::Second => self.second = points,
        }
    }
}

/// Cumulative score against the sequential ball index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BallPoint {
    pub ball: u32,
    pub score: u32,
}

/// Runs and wickets of one innings within one phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseSummary {
    pub innings: u8,
    pub phase: Phase,
    pub deliveries: usize,
    pub runs: u32,
    pub wickets: u32,
    pub run_rate: f64,
}

/// `numerator / divisor` to two decimal places, rounding ties to the even digit.
///
/// Works on integers so that exact halves such as 65 / 8 = 8.125 are
/// detected and resolve to 8.12.
pub fn ratio2(numerator: u64, divisor: u64) -> f64 {
    if divisor == 0 {
        return 0.0;
    }
    let n = numerator * 100;
    let (mut q, r) = (n / divisor, n % divisor);
    if 2 * r > divisor || (2 * r == divisor && q % 2 == 1) {
        q += 1;
    }
    q as f64 / 100.0
}

fn over_ends<'a>(rows: &'a [&'a Delivery]) -> impl Iterator<Item = &'a Delivery> {
    rows.iter()
        .copied()
        .skip(BALLS_PER_OVER - 1)
        .step_by(BALLS_PER_OVER)
}

/// Cumulative run rate at the end of each completed over.
///
/// With a phase, rows are first restricted to that phase. The second
/// innings then numbers its overs from the phase's initial offset, while
/// the first innings always counts from zero.
pub fn run_rate(table: &DeliveryTable, phase: Option<Phase>) -> InningsSeries<f64> {
    let scoped;
    let table = match phase {
        Some(p) => {
            scoped = filter_by_phase(table, p);
            &scoped
        }
        None => table,
    };

    let mut series = InningsSeries::default();
    for innings in Innings::ALL {
        let offset = match (innings, phase) {
            (Innings::Second, Some(p)) => p.initial_offset(),
            _ => 0,
        };

        let rows = table.innings(innings);
        let points = over_ends(&rows)
            .enumerate()
            .map(|(i, row)| {
                let over = offset + i as u32 + 1;
                OverPoint {
                    over,
                    value: ratio2(u64::from(row.score), u64::from(over)),
                }
            })
            .collect();
        series.set(innings, points);
    }
    series
}

/// Wickets that fell within each completed over.
pub fn wickets(table: &DeliveryTable) -> InningsSeries<u32> {
    let mut series = InningsSeries::default();
    for innings in Innings::ALL {
        let rows = table.innings(innings);
        let mut previous = 0u32;

        let points = over_ends(&rows)
            .enumerate()
            .map(|(i, row)| {
                let over = i as u32 + 1;
                let fell = row.wickets.checked_sub(previous).unwrap_or_else(|| {
                    warn!(
                        innings = innings.number(),
                        over,
                        previous,
                        current = row.wickets,
                        "Cumulative wickets decreased"
                    );
                    0
                });
                previous = row.wickets;
                OverPoint { over, value: fell }
            })
            .collect();
        series.set(innings, points);
    }
    series
}

/// Score progression of one innings. Rows without a ball index are skipped.
pub fn score_progression(table: &DeliveryTable, innings: Innings) -> Vec<BallPoint> {
    table
        .innings(innings)
        .into_iter()
        .filter_map(|d| {
            d.ball.map(|ball| BallPoint {
                ball,
                score: d.score,
            })
        })
        .collect()
}

/// Runs, wickets and run rate of every innings in every phase it reached.
pub fn phase_breakdown(table: &DeliveryTable) -> Vec<PhaseSummary> {
    let mut summaries = Vec::new();

    for innings in Innings::ALL {
        let rows = table.innings(innings);

        for phase in Phase::ALL {
            let in_phase = |d: &&Delivery| phase.contains(d.over);
            let (Some(first), Some(last)) =
                (rows.iter().position(in_phase), rows.iter().rposition(in_phase))
            else {
                continue;
            };

            let (base_score, base_wickets) = match first.checked_sub(1) {
                Some(prev) => (rows[prev].score, rows[prev].wickets),
                None => (0, 0),
            };
            let deliveries = rows[first..=last]
                .iter()
                .filter(|d| phase.contains(d.over))
                .count();
            let runs = rows[last].score.saturating_sub(base_score);

            summaries.push(PhaseSummary {
                innings: innings.number(),
                phase,
                deliveries,
                runs,
                wickets: rows[last].wickets.saturating_sub(base_wickets),
                run_rate: ratio2(
                    u64::from(runs) * BALLS_PER_OVER as u64,
                    deliveries as u64,
                ),
            });
        }
    }

    summaries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn innings_rows(innings: u8, scores: &[u32], wickets: &[u32]) -> Vec<Delivery> {
        scores
            .iter()
            .zip(wickets)
            .enumerate()
            .map(|(i, (&score, &wickets))| Delivery {
                innings,
                delivery: format!("{}.{}", i / 6, i % 6 + 1),
                over: (i / 6) as u32 + 1,
                batting_team: if innings == 1 { "CSK" } else { "MI" }.to_string(),
                score,
                wickets,
                ball: Some(i as u32 + 1),
                ..Default::default()
            })
            .collect()
    }

    /// Both innings of `overs` overs, one run per ball, no wickets.
    fn steady_match(overs: usize) -> DeliveryTable {
        let scores: Vec<u32> = (1..=(overs * 6) as u32).collect();
        let wickets = vec![0; scores.len()];
        let mut rows = innings_rows(1, &scores, &wickets);
        rows.extend(innings_rows(2, &scores, &wickets));
        DeliveryTable::new(rows)
    }

    #[test]
    fn test_run_rate_three_overs() {
        let scores = [
            4, 7, 9, 15, 18, 20, 25, 30, 33, 38, 40, 44, 50, 55, 58, 60, 65, 70,
        ];
        let table = DeliveryTable::new(innings_rows(1, &scores, &[0; 18]));

        let rates = run_rate(&table, None);
        let values: Vec<_> = rates.first.iter().map(|p| (p.over, p.value)).collect();
        assert_eq!(values, vec![(1, 20.0), (2, 22.0), (3, 23.33)]);
        assert!(rates.second.is_empty());
    }

    #[test]
    fn test_run_rate_ignores_partial_over() {
        let scores: Vec<u32> = (1..=17).collect();
        let table = DeliveryTable::new(innings_rows(1, &scores, &[0; 17]));
        assert_eq!(run_rate(&table, None).first.len(), 2);
        assert_eq!(wickets(&table).first.len(), 2);
    }

    #[test]
    fn test_run_rate_phase_offset_applies_to_second_innings_only() {
        let table = steady_match(10);
        let rates = run_rate(&table, Some(Phase::MiddleOvers));

        let first: Vec<_> = rates.first.iter().map(|p| (p.over, p.value)).collect();
        let second: Vec<_> = rates.second.iter().map(|p| (p.over, p.value)).collect();
        assert_eq!(first, vec![(1, 42.0), (2, 24.0), (3, 18.0), (4, 15.0)]);
        assert_eq!(second, vec![(7, 6.0), (8, 6.0), (9, 6.0), (10, 6.0)]);
    }

    #[test]
    fn test_run_rate_powerplay_has_no_offset() {
        let table = steady_match(8);
        let rates = run_rate(&table, Some(Phase::Powerplay));
        assert_eq!(rates.first, rates.second);
        assert_eq!(rates.second.len(), 6);
        assert_eq!(rates.second[0].over, 1);
    }

    #[test]
    fn test_wickets_per_over() {
        let wkts = [0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 3];
        let table = DeliveryTable::new(innings_rows(2, &[0; 12], &wkts));

        let series = wickets(&table);
        let values: Vec<_> = series.second.iter().map(|p| (p.over, p.value)).collect();
        assert_eq!(values, vec![(1, 1), (2, 2)]);
        assert!(series.first.is_empty());
    }

    #[test]
    fn test_wickets_sum_to_final_total() {
        let wkts: Vec<u32> = (0..24).map(|i| i / 5).collect();
        let table = DeliveryTable::new(innings_rows(1, &[0; 24], &wkts));

        let total: u32 = wickets(&table).first.iter().map(|p| p.value).sum();
        assert_eq!(total, wkts[23]);
    }

    #[test]
    fn test_wickets_never_underflow() {
        let mut wkts = vec![2; 6];
        wkts.extend([1; 6]);
        let table = DeliveryTable::new(innings_rows(1, &[0; 12], &wkts));

        let values: Vec<_> = wickets(&table).first.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![2, 0]);
    }

    #[test]
    fn test_over_numbers_non_decreasing() {
        let table = steady_match(20);
        for phase in [None, Some(Phase::DeathOvers)] {
            let rates = run_rate(&table, phase);
            for innings in Innings::ALL {
                let overs: Vec<_> = rates.get(innings).iter().map(|p| p.over).collect();
                assert!(overs.windows(2).all(|w| w[0] <= w[1]));
            }
        }
    }

    #[test]
    fn test_score_progression_skips_missing_balls() {
        let mut rows = innings_rows(1, &[1, 2, 3], &[0, 0, 0]);
        rows[1].ball = None;
        let table = DeliveryTable::new(rows);

        let points = score_progression(&table, Innings::First);
        assert_eq!(
            points,
            vec![BallPoint { ball: 1, score: 1 }, BallPoint { ball: 3, score: 3 }]
        );
        assert!(score_progression(&table, Innings::Second).is_empty());
    }

    #[test]
    fn test_phase_breakdown() {
        let table = steady_match(8);
        let summary = phase_breakdown(&table);

        // Powerplay and Middle Overs for each innings; no death overs bowled.
        assert_eq!(summary.len(), 4);
        let middle = &summary[1];
        assert_eq!(middle.innings, 1);
        assert_eq!(middle.phase, Phase::MiddleOvers);
        assert_eq!(middle.deliveries, 12);
        assert_eq!(middle.runs, 12);
        assert_eq!(middle.run_rate, 6.0);
        assert!(summary.iter().all(|s| s.phase != Phase::DeathOvers));
    }

    #[test]
    fn test_ratio2() {
        assert_eq!(ratio2(70, 3), 23.33);
        assert_eq!(ratio2(8, 1), 8.0);
        assert_eq!(ratio2(1, 6), 0.17);
        assert_eq!(ratio2(5, 0), 0.0);
    }

    #[test]
    fn test_ratio2_ties_round_to_even() {
        assert_eq!(ratio2(65, 8), 8.12);
        assert_eq!(ratio2(101, 8), 12.62);
        assert_eq!(ratio2(130, 16), 8.12);
        assert_eq!(ratio2(67, 8), 8.38);
    }

    #[test]
    fn test_run_rate_half_cent_ties() {
        for (final_score, expected) in [(65, 8.12), (101, 12.62)] {
            let mut scores = vec![0u32; 48];
            scores[47] = final_score;
            let table = DeliveryTable::new(innings_rows(1, &scores, &[0; 48]));

            let last = run_rate(&table, None).first.last().copied().unwrap();
            assert_eq!((last.over, last.value), (8, expected));
        }
    }

    #[test]
    fn test_phase_breakdown_half_cent_tie() {
        // Overs 7..=14 hold 48 deliveries and 65 runs: 65 * 6 / 48 = 8.125.
        let mut scores = vec![0u32; 84];
        scores[83] = 65;
        let table = DeliveryTable::new(innings_rows(1, &scores, &[0; 84]));

        let middle = phase_breakdown(&table)
            .into_iter()
            .find(|s| s.phase == Phase::MiddleOvers)
            .unwrap();
        assert_eq!(middle.deliveries, 48);
        assert_eq!(middle.runs, 65);
        assert_eq!(middle.run_rate, 8.12);
    }
}
