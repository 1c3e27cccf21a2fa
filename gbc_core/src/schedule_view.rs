//! Derived views over extracted bin schedules.
//!
//! Everything here is pure date arithmetic on already-extracted data;
//! nothing touches the network.

use chrono::{Datelike, NaiveDate};

use crate::bins_client::BinSchedule;

/// Parse a collection date in the council's "March 2025 3" notation.
///
/// Returns [`None`] for anything that does not parse so callers can skip
/// malformed entries instead of failing.
pub fn parse_collection_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%B %Y %d").ok()
}

/// The earliest collection date on or after `today`. Unparsable entries
/// never match.
pub fn next_occurrence(dates: &[String], today: NaiveDate) -> Option<NaiveDate> {
    dates
        .iter()
        .filter_map(|raw| parse_collection_date(raw))
        .filter(|date| *date >= today)
        .min()
}

/// Whole days between `today` and `date`, negative when `date` is past.
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

/// Render a date the way it is spoken here, e.g. "Monday 3rd March 2025".
pub fn format_localized(date: NaiveDate) -> String {
    format!(
        "{} {}{} {} {}",
        date.format("%A"),
        date.day(),
        ordinal_suffix(date.day()),
        date.format("%B"),
        date.year()
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    }
}

/// A Monday-first month grid, padded with [`None`] so day 1 lands in its
/// weekday column and the length is always a multiple of seven. Empty for
/// an invalid month.
pub fn month_grid(year: i32, month: u32) -> Vec<Option<u32>> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return vec![];
    };
    let days_in_month = match month {
        12 => NaiveDate::from_ymd_opt(year + 1, 1, 1),
        _ => NaiveDate::from_ymd_opt(year, month + 1, 1),
    }
    .and_then(|next_first| next_first.pred_opt())
    .map_or(31, |last| last.day());
    let mut grid: Vec<Option<u32>> = vec![None; first.weekday().num_days_from_monday() as usize];
    grid.extend((1..=days_in_month).map(Some));
    while grid.len() % 7 != 0 {
        grid.push(None);
    }
    grid
}

/// Ephemeral per-bin view pairing a schedule with its next collection.
#[derive(Debug, Clone, PartialEq)]
pub struct BinView {
    pub schedule: BinSchedule,
    pub next_date: Option<NaiveDate>,
    pub days_until: Option<i64>,
}

impl BinView {
    pub fn derive(schedule: BinSchedule, today: NaiveDate) -> Self {
        let next_date = next_occurrence(&schedule.dates, today);
        let days_until = next_date.map(|date| days_until(date, today));
        Self {
            schedule,
            next_date,
            days_until,
        }
    }
}

/// Sort views by how soon the next collection is due; bins with nothing
/// left this year go last. The sort is stable.
pub fn sort_by_urgency(views: &mut [BinView]) {
    views.sort_by_key(|view| (view.days_until.is_none(), view.days_until));
}
