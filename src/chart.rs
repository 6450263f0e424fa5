//! Renderer-agnostic chart descriptions built from aggregate series.
//!
//! Builders here are stateless: they take the sequences produced by
//! [`crate::aggregate`] and return a serialisable [`Figure`]. Drawing the
//! figure is left to whatever front end consumes the JSON.

use serde::Serialize;
use tracing::warn;

use crate::aggregate::{BallPoint, InningsSeries, OverPoint};
use crate::delivery::Innings;
use crate::palette::PaletteTable;
use crate::phase::Phase;

const DEFAULT_COLOURS: [&str; 2] = ["#1f77b4", "#ff7f0e"];
const WICKET_COLOUR: &str = "#ff0000";
/// Vertical gap between stacked wicket markers in the same over.
const WICKET_STACK_STEP: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    Lines,
    Markers,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    pub mode: TraceMode,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub colour: String,
    /// Shade the area under a line down to the x axis.
    pub fill_to_zero: bool,
    pub show_legend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    pub x_axis: String,
    pub y_axis: String,
    pub legend_title: String,
    pub traces: Vec<Trace>,
}

impl Figure {
    fn new(title: impl Into<String>, x_axis: &str, y_axis: &str) -> Self {
        Self {
            title: title.into(),
            x_axis: x_axis.to_string(),
            y_axis: y_axis.to_string(),
            legend_title: "Innings".to_string(),
            traces: Vec::new(),
        }
    }
}

/// Batting team of each innings, as read from the match file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Teams<'a> {
    pub first: Option<&'a str>,
    pub second: Option<&'a str>,
}

impl<'a> Teams<'a> {
    pub fn get(&self, innings: Innings) -> Option<&'a str> {
        match innings {
            Innings::First => self.first,
            Innings::Second => self.second,
        }
    }
}

fn series_name(team: Option<&str>, innings: Innings) -> String {
    match team {
        Some(team) => format!("{team} ({innings})"),
        None => innings.to_string(),
    }
}

/// Team colour from the palette, or the default colour of the innings.
fn series_colour(palette: &PaletteTable, team: Option<&str>, innings: Innings) -> String {
    let fallback = DEFAULT_COLOURS[usize::from(innings.number() - 1)];
    let Some(team) = team else {
        return fallback.to_string();
    };

    match palette.series_colour(team) {
        Ok(colour) => colour.to_string(),
        Err(e) => {
            warn!(error = %e, team, "No palette for team, using default colour");
            fallback.to_string()
        }
    }
}

fn line_trace(name: String, colour: String, points: impl Iterator<Item = (f64, f64)>) -> Trace {
    let (x, y) = points.unzip();
    Trace {
        name,
        mode: TraceMode::Lines,
        x,
        y,
        colour,
        fill_to_zero: false,
        show_legend: true,
    }
}

fn over_points(points: &[OverPoint<f64>]) -> impl Iterator<Item = (f64, f64)> + '_ {
    points.iter().map(|p| (f64::from(p.over), p.value))
}

fn ball_points(points: &[BallPoint]) -> impl Iterator<Item = (f64, f64)> + '_ {
    points
        .iter()
        .map(|p| (f64::from(p.ball), f64::from(p.score)))
}

/// Filled score-progression lines for both innings.
pub fn score_progression_figure(
    first: &[BallPoint],
    second: &[BallPoint],
    teams: Teams<'_>,
    palette: &PaletteTable,
) -> Figure {
    let mut figure = Figure::new(
        "Score Progression - Innings 1 vs Innings 2",
        "Delivery",
        "Score",
    );

    for (innings, points) in [(Innings::First, first), (Innings::Second, second)] {
        let team = teams.get(innings);
        let mut trace = line_trace(
            series_name(team, innings),
            series_colour(palette, team, innings),
            ball_points(points),
        );
        trace.fill_to_zero = true;
        figure.traces.push(trace);
    }
    figure
}

/// Run-rate lines for both innings, with a red marker per fallen wicket.
pub fn run_rate_figure(
    rates: &InningsSeries<f64>,
    wickets: Option<&InningsSeries<u32>>,
    teams: Teams<'_>,
    palette: &PaletteTable,
) -> Figure {
    let mut figure = Figure::new(
        "Run Rate Over Time - Innings 1 vs Innings 2",
        "Over",
        "Run Rate (Runs per Over)",
    );

    for innings in Innings::ALL {
        let team = teams.get(innings);
        figure.traces.push(line_trace(
            series_name(team, innings),
            series_colour(palette, team, innings),
            over_points(rates.get(innings)),
        ));
    }

    if let Some(wickets) = wickets {
        for innings in Innings::ALL {
            let markers = wicket_markers(rates.get(innings), wickets.get(innings));
            if markers.is_empty() {
                continue;
            }
            let (x, y) = markers.into_iter().unzip();
            figure.traces.push(Trace {
                name: "Wicket".to_string(),
                mode: TraceMode::Markers,
                x,
                y,
                colour: WICKET_COLOUR.to_string(),
                fill_to_zero: false,
                show_legend: innings == Innings::First,
            });
        }
    }
    figure
}

/// One `(over, y)` marker per wicket, stacked above the run-rate line.
///
/// Overs with wickets but no run-rate point are skipped.
pub fn wicket_markers(rates: &[OverPoint<f64>], wickets: &[OverPoint<u32>]) -> Vec<(f64, f64)> {
    let mut markers = Vec::new();
    for w in wickets.iter().filter(|w| w.value > 0) {
        let Some(rate) = rates.iter().find(|r| r.over == w.over) else {
            continue;
        };
        for i in 0..w.value {
            markers.push((
                f64::from(w.over),
                rate.value + f64::from(i) * WICKET_STACK_STEP,
            ));
        }
    }
    markers
}

/// Score against delivery for a single innings, optionally within one phase.
pub fn score_vs_delivery_figure(
    points: &[BallPoint],
    innings: Innings,
    phase: Option<Phase>,
    team: Option<&str>,
    palette: &PaletteTable,
) -> Figure {
    let title = match phase {
        Some(phase) => format!("Score vs Delivery - {innings}, {phase}"),
        None => format!("Score vs Delivery - {innings}"),
    };
    let mut figure = Figure::new(title, "Delivery", "Score");
    figure.traces.push(line_trace(
        series_name(team, innings),
        series_colour(palette, team, innings),
        ball_points(points),
    ));
    figure
}
