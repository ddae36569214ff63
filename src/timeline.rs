use std::collections::HashMap;

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use tracing::warn;

use crate::models::{DayRecord, IncidentRecord, IncidentSummary, StatusLog};
use crate::severity::{self, Severity};

/// Days of history, ending at the build date.
pub const HISTORY_DAYS: i64 = 90;

/// Builds the day-by-day history from the curated status log, oldest day
/// first. Days without a dated incident read as operational.
pub fn build(log: &StatusLog, now: DateTime<Local>) -> Vec<DayRecord> {
    let indexed = index_incidents(log);

    let mut history = Vec::with_capacity(HISTORY_DAYS as usize);
    for offset in 0..HISTORY_DAYS {
        let day = now - Duration::days(offset);
        let date = day.date_naive();

        match indexed.get(&date) {
            Some(entries) => history.push(DayRecord {
                date,
                severity: severity::resolve(&entries.status_ids),
                incidents: entries.incidents.clone(),
                timestamp: day.timestamp(),
            }),
            None => history.push(DayRecord {
                date,
                severity: Severity::Operational,
                incidents: Vec::new(),
                timestamp: day.timestamp(),
            }),
        }
    }

    history.reverse();
    history
}

#[derive(Default)]
struct DayEntries {
    status_ids: Vec<i64>,
    incidents: Vec<IncidentSummary>,
}

fn index_incidents(log: &StatusLog) -> HashMap<NaiveDate, DayEntries> {
    let mut indexed: HashMap<NaiveDate, DayEntries> = HashMap::new();

    for incident in &log.past {
        let Some(started_at) = incident.started_at else {
            continue;
        };
        // an incident listed as both past and ongoing is contradictory;
        // keep the ongoing entry and let the current walk below index it
        if log.current.iter().any(|current| {
            current.fixed_at.is_none()
                && current.started_at == incident.started_at
                && current.title == incident.title
        }) {
            warn!(
                title = %incident.title,
                "incident listed as both past and ongoing, keeping the ongoing entry"
            );
            continue;
        }
        if incident.fixed_at.is_none() {
            warn!(title = %incident.title, "past incident has no fix time");
        }
        let Some(date) = local_date(started_at) else {
            continue;
        };
        push_entry(&mut indexed, date, incident, "Unknown Incident", started_at);
    }

    for incident in &log.current {
        if incident.fixed_at.is_some() {
            // resolved entries belong in the past list
            continue;
        }
        let Some(started_at) = incident.started_at else {
            continue;
        };
        let Some(date) = local_date(started_at) else {
            continue;
        };
        push_entry(&mut indexed, date, incident, "Ongoing Issue", started_at);
    }

    indexed
}

fn push_entry(
    indexed: &mut HashMap<NaiveDate, DayEntries>,
    date: NaiveDate,
    incident: &IncidentRecord,
    fallback_title: &str,
    started_at: i64,
) {
    let title = if incident.title.is_empty() {
        fallback_title.to_string()
    } else {
        incident.title.clone()
    };

    let entries = indexed.entry(date).or_default();
    entries.status_ids.extend(&incident.status_ids);
    entries.incidents.push(IncidentSummary {
        title,
        kind: severity::resolve(&incident.status_ids),
        description: incident.description.clone(),
        by: incident.author.clone(),
        started_at,
        fixed_at: incident.fixed_at,
    });
}

fn local_date(timestamp: i64) -> Option<NaiveDate> {
    Local
        .timestamp_opt(timestamp, 0)
        .single()
        .map(|dt| dt.date_naive())
}
