//! The per-match analysis session.
//!
//! [`Match`] owns the delivery table for one match. Its operations never
//! return errors: failures are logged where they occur and the operation
//! yields `None`, so a caller such as a dashboard callback can simply show
//! an empty chart.

use tracing::{error, warn};

use crate::aggregate::{self, BallPoint, InningsSeries, PhaseSummary};
use crate::chart::{self, Figure, Teams};
use crate::delivery::{DeliveryTable, Innings};
use crate::error::{CricError, Result};
use crate::loader;
use crate::palette::PaletteTable;
use crate::phase::{self, Phase};
use crate::report::MatchReport;

fn logged<T>(result: Result<T>) -> Option<T> {
    result.map_err(|e| error!(error = %e, "Operation skipped")).ok()
}

fn parse_phase(name: Option<&str>) -> Result<Option<Phase>> {
    name.map(str::parse::<Phase>).transpose()
}

#[derive(Debug, Clone)]
pub struct Match {
    source: String,
    table: Option<DeliveryTable>,
}

impl Match {
    /// Creates an empty session for `source`; nothing is read yet.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            table: None,
        }
    }

    /// Reads and normalises `source` in one step.
    pub fn open(source: impl Into<String>) -> Self {
        let mut session = Self::new(source);
        if session.read_csv() {
            session.preprocess();
        }
        session
    }

    /// Wraps an already loaded table.
    pub fn from_table(source: impl Into<String>, table: DeliveryTable) -> Self {
        Self {
            source: source.into(),
            table: Some(table),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn table(&self) -> Option<&DeliveryTable> {
        self.table.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    /// Loads the source into memory. On failure the table is left empty
    /// and `false` is returned.
    pub fn read_csv(&mut self) -> bool {
        match loader::load(&self.source) {
            Ok(table) => {
                self.table = Some(table);
                true
            }
            Err(e) => {
                error!(error = %e, source = %self.source, "Failed to load match");
                self.table = None;
                false
            }
        }
    }

    /// Derives the `ball` and `res` columns. Does nothing without a table.
    pub fn preprocess(&mut self) {
        match self.table.take() {
            Some(table) => self.table = Some(loader::normalize(table)),
            None => warn!(error = %CricError::UninitializedTable, "Preprocessing skipped"),
        }
    }

    fn loaded(&self) -> Result<&DeliveryTable> {
        self.table.as_ref().ok_or(CricError::UninitializedTable)
    }

    pub fn teams(&self) -> Teams<'_> {
        match &self.table {
            Some(table) => Teams {
                first: table.batting_team(Innings::First),
                second: table.batting_team(Innings::Second),
            },
            None => Teams::default(),
        }
    }

    /// Run rate per over for both innings, optionally restricted to a phase name.
    pub fn run_rate(&self, phase: Option<&str>) -> Option<InningsSeries<f64>> {
        logged(self.loaded().and_then(|table| {
            let phase = parse_phase(phase)?;
            Ok(aggregate::run_rate(table, phase))
        }))
    }

    /// Wickets fallen per over for both innings.
    pub fn wickets(&self) -> Option<InningsSeries<u32>> {
        logged(self.loaded().map(aggregate::wickets))
    }

    /// Rows within the named phase.
    pub fn filter_by_phase(&self, phase: &str) -> Option<DeliveryTable> {
        logged(self.loaded().and_then(|table| {
            let phase: Phase = phase.parse()?;
            Ok(phase::filter_by_phase(table, phase))
        }))
    }

    pub fn phase_breakdown(&self) -> Option<Vec<PhaseSummary>> {
        logged(self.loaded().map(aggregate::phase_breakdown))
    }

    pub fn score_progression(&self, innings: Innings) -> Option<Vec<BallPoint>> {
        logged(
            self.loaded()
                .map(|table| aggregate::score_progression(table, innings)),
        )
    }

    pub fn report(&self) -> Option<MatchReport> {
        logged(
            self.loaded()
                .map(|table| MatchReport::build(&self.source, table)),
        )
    }

    pub fn score_progression_figure(&self, palette: &PaletteTable) -> Option<Figure> {
        let first = self.score_progression(Innings::First)?;
        let second = self.score_progression(Innings::Second)?;
        Some(chart::score_progression_figure(
            &first,
            &second,
            self.teams(),
            palette,
        ))
    }

    pub fn run_rate_figure(&self, palette: &PaletteTable) -> Option<Figure> {
        let rates = self.run_rate(None)?;
        let wickets = self.wickets()?;
        Some(chart::run_rate_figure(
            &rates,
            Some(&wickets),
            self.teams(),
            palette,
        ))
    }

    /// Score against delivery for the selected innings and phase, as driven
    /// by the innings and phase selectors of a dashboard.
    pub fn score_vs_delivery_figure(
        &self,
        innings: &str,
        phase: Option<&str>,
        palette: &PaletteTable,
    ) -> Option<Figure> {
        logged(self.loaded().and_then(|table| {
            let innings: Innings = innings.parse()?;
            let phase = parse_phase(phase)?;
            let scoped = match phase {
                Some(p) => phase::filter_by_phase(table, p),
                None => table.clone(),
            };
            let points = aggregate::score_progression(&scoped, innings);
            Ok(chart::score_vs_delivery_figure(
                &points,
                innings,
                phase,
                table.batting_team(innings),
                palette,
            ))
        }))
    }
}
