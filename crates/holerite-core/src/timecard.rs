//! Time-card ("cartão de ponto") report extraction.
//!
//! A report lists one record per day:
//!
//! ```text
//! 02/05/2024 QUI-Útil 08:02 12:00 13:01 18:00r 08:00 001 HORAS NORMAIS- 00:30 002 HORA EXTRA-
//! ```
//!
//! The date and weekday are followed by the punches of the day and then by
//! event durations (`HH:MM CODE DESCRIPTION-`). Decoders often put each cell
//! on its own line, so records are delimited by their leading date rather
//! than by line breaks.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extract::rules::{
    TIMECARD_EVENT, TIMECARD_EVENT_START, TIMECARD_PUNCH, TIMECARD_ROW_START,
};
use crate::models::payslip::PageText;
use crate::models::record::normalize_key;

/// One day of a time-card report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimecardRow {
    /// Date as printed (`dd/mm/yyyy`).
    pub date: String,

    /// Weekday abbreviation (`SEG`, `TER`, ...).
    pub weekday: String,

    /// Day type after the weekday (`Útil`, `Feriado`, ...).
    pub day_type: Option<String>,

    /// Clock punches in order, with their marker suffix if any.
    pub punches: Vec<String>,

    /// Event durations (`HH:MM`) keyed by normalized description.
    /// Repeated events are summed.
    pub events: IndexMap<String, String>,
}

/// Time-card rows laid out as a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimecardTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl TimecardTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as column → cell maps.
    pub fn records(&self) -> impl Iterator<Item = IndexMap<&str, Option<&str>>> + '_ {
        self.rows.iter().map(move |row| {
            self.columns
                .iter()
                .map(String::as_str)
                .zip(row.iter().map(|cell| cell.as_deref()))
                .collect()
        })
    }
}

/// Extracts daily records from time-card report text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimecardExtractor;

impl TimecardExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the table of a whole report.
    pub fn extract(&self, pages: &[PageText]) -> TimecardTable {
        let text = pages
            .iter()
            .map(|page| page.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let rows = self.extract_rows(&text);
        debug!("Parsed {} time-card rows from {} pages", rows.len(), pages.len());

        Self::tabulate(&rows)
    }

    /// Extract every well-formed daily record from `text`.
    ///
    /// Records without punches or without events are skipped.
    pub fn extract_rows(&self, text: &str) -> Vec<TimecardRow> {
        let starts: Vec<_> = TIMECARD_ROW_START.captures_iter(text).collect();

        starts
            .iter()
            .enumerate()
            .filter_map(|(i, caps)| {
                let whole = caps.get(0)?;
                let end = starts
                    .get(i + 1)
                    .and_then(|next| next.get(0))
                    .map_or(text.len(), |m| m.start());

                parse_record(&caps["data"], &caps["dia"], &text[whole.end()..end])
            })
            .collect()
    }

    /// Lay rows out as `data`, event columns, `dia_semana`, `tipo_dia` and
    /// one `marcacao_N` column per punch position.
    pub fn tabulate(rows: &[TimecardRow]) -> TimecardTable {
        let events: IndexSet<&str> = rows
            .iter()
            .flat_map(|row| row.events.keys().map(String::as_str))
            .collect();
        let max_punches = rows.iter().map(|row| row.punches.len()).max().unwrap_or(0);

        let mut columns = vec!["data".to_string()];
        columns.extend(events.iter().map(|key| key.to_string()));
        columns.push("dia_semana".to_string());
        columns.push("tipo_dia".to_string());
        columns.extend((1..=max_punches).map(|n| format!("marcacao_{}", n)));

        let rows = rows
            .iter()
            .map(|row| {
                let mut cells = vec![Some(row.date.clone())];
                cells.extend(events.iter().map(|key| row.events.get(*key).cloned()));
                cells.push(Some(row.weekday.clone()));
                cells.push(row.day_type.clone());
                cells.extend((0..max_punches).map(|n| row.punches.get(n).cloned()));
                cells
            })
            .collect();

        TimecardTable { columns, rows }
    }
}

fn parse_record(date: &str, weekday: &str, rest: &str) -> Option<TimecardRow> {
    let rest = rest.split_whitespace().collect::<Vec<_>>().join(" ");
    let events_at = TIMECARD_EVENT_START.find(&rest)?.start();

    let punches: Vec<String> = rest[..events_at]
        .split_whitespace()
        .take_while(|token| TIMECARD_PUNCH.is_match(token))
        .map(str::to_string)
        .collect();
    if punches.is_empty() {
        return None;
    }

    let events = parse_events(&rest[events_at..]);
    if events.is_empty() {
        return None;
    }

    let (weekday, day_type) = match weekday.split_once('-') {
        Some((day, kind)) if !kind.is_empty() => (day.to_string(), Some(kind.to_string())),
        Some((day, _)) => (day.to_string(), None),
        None => (weekday.to_string(), None),
    };

    Some(TimecardRow {
        date: date.to_string(),
        weekday,
        day_type,
        punches,
        events,
    })
}

fn parse_events(text: &str) -> IndexMap<String, String> {
    let starts: Vec<usize> = TIMECARD_EVENT_START.find_iter(text).map(|m| m.start()).collect();
    let mut minutes: IndexMap<String, u32> = IndexMap::new();

    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        let Some(caps) = TIMECARD_EVENT.captures(text[start..end].trim()) else {
            continue;
        };

        // Descriptions end at the first '-'
        let description = caps["descricao"].split('-').next().unwrap_or_default().trim();
        if description.is_empty() {
            continue;
        }

        let hours: u32 = caps["tempo"].parse().unwrap_or(0);
        let mins: u32 = caps["minutos"].parse().unwrap_or(0);
        *minutes.entry(normalize_key(description)).or_insert(0) += hours * 60 + mins;
    }

    minutes
        .into_iter()
        .map(|(key, total)| (key, format!("{:02}:{:02}", total / 60, total % 60)))
        .collect()
}
