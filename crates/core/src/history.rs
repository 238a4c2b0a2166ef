//! Auto-generated patient history.
//!
//! Demo patients rarely carry a real history, so a stable one is synthesised from a pool of
//! disease names. Choices and dates come from [`random::derive`] with the keys
//! `mockhist:{pid}:{i}` (which disease) and `mockhist-days:{pid}:{i}` (how long before the last
//! visit), so a patient always sees the same history.

use crate::config::HistoryParams;
use crate::constants::DEFAULT_LAST_VISIT;
use crate::context::HistoryEntry;
use crate::name::DiseaseName;
use crate::random;
use chrono::{Days, NaiveDate};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date, falling back to the default last-visit date.
pub fn parse_visit_date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(DEFAULT_LAST_VISIT, DATE_FORMAT))
        .unwrap_or(NaiveDate::MIN)
}

/// Builds up to `params.count` distinct history entries dated before `last_visit`.
///
/// Entries are returned most recent first. An empty pool yields an empty history.
pub fn generate_mock_history(
    patient_id: &str,
    last_visit: &str,
    pool: &[DiseaseName],
    params: HistoryParams,
) -> Vec<HistoryEntry> {
    let anchor = parse_visit_date(last_visit);

    let mut candidates: Vec<&DiseaseName> = Vec::with_capacity(pool.len());
    for name in pool {
        if !name.is_empty() && !candidates.contains(&name) {
            candidates.push(name);
        }
    }

    let span = params.max_days.saturating_sub(params.min_days).max(0);
    let take = params.count.min(candidates.len());
    let mut picked: Vec<(NaiveDate, &DiseaseName)> = Vec::with_capacity(take);

    for i in 0..take {
        let choice = random::derive(&format!("mockhist:{patient_id}:{i}"));
        let idx = ((choice * candidates.len() as f64) as usize).min(candidates.len() - 1);
        let disease = candidates.remove(idx);

        let spread = random::derive(&format!("mockhist-days:{patient_id}:{i}"));
        let step = ((spread * (span as f64 + 1.0)) as i64).min(span);
        let offset = params.min_days.saturating_add(step);
        let date = anchor
            .checked_sub_days(Days::new(offset.max(0) as u64))
            .unwrap_or(NaiveDate::MIN);

        picked.push((date, disease));
    }

    picked.sort_by(|a, b| b.0.cmp(&a.0));

    picked
        .into_iter()
        .map(|(date, disease)| {
            HistoryEntry::new(disease.as_str(), date.format(DATE_FORMAT).to_string())
        })
        .collect()
}
