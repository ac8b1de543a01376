//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with microsecond precision.
//! Rows written by other tools may carry SQLite's `YYYY-MM-DD HH:MM:SS` form
//! instead; that is read as UTC.
//! Tags are stored as a compact JSON array. Moderation status is stored as its
//! lowercase name.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use incident_core::{
  incident::{IncidentChanges, IncidentRecord, Tags},
  status::ModerationStatus,
};
use rusqlite::types::Value;

use crate::{Error, Result};

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Format written by SQLite's own `datetime()` and `CURRENT_TIMESTAMP`.
const SQLITE_DATETIME: &str = "%Y-%m-%d %H:%M:%S%.f";

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .or_else(|e| {
      NaiveDateTime::parse_from_str(s, SQLITE_DATETIME)
        .map(|naive| naive.and_utc())
        .map_err(|_| e)
    })
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Tags ────────────────────────────────────────────────────────────────────

pub fn encode_tags(tags: &Tags) -> Result<String> {
  Ok(serde_json::to_string(tags)?)
}

// ─── ModerationStatus
// ─────────────────────────────────────────────────────────

pub fn encode_status(status: ModerationStatus) -> &'static str { status.as_str() }

// ─── Change sets ─────────────────────────────────────────────────────────────

fn text(value: Option<String>) -> Value {
  value.map_or(Value::Null, Value::Text)
}

fn real(value: Option<f64>) -> Value {
  value.map_or(Value::Null, Value::Real)
}

fn integer(value: Option<i64>) -> Value {
  value.map_or(Value::Null, Value::Integer)
}

/// Flatten a change set into `(column, value)` assignments, in column order.
/// Only fields present in the patch are returned; an explicit null becomes
/// [`Value::Null`].
pub fn encode_changes(changes: IncidentChanges) -> Result<Vec<(&'static str, Value)>> {
  let IncidentChanges {
    incident_id,
    date_created,
    date,
    city,
    state,
    lat,
    long,
    title,
    desc,
    tags,
    force_rank,
    confidence,
    status,
    user_name,
    tweet_id,
  } = changes;

  let mut sets: Vec<(&'static str, Value)> = Vec::new();

  if let Some(v) = incident_id {
    sets.push(("incident_id", text(v)));
  }
  if let Some(v) = date_created {
    sets.push(("date_created", text(v.map(encode_dt))));
  }
  if let Some(v) = date {
    sets.push(("date", text(v.map(encode_dt))));
  }
  if let Some(v) = city {
    sets.push(("city", text(v)));
  }
  if let Some(v) = state {
    sets.push(("state", text(v)));
  }
  if let Some(v) = lat {
    sets.push(("lat", real(v)));
  }
  if let Some(v) = long {
    sets.push(("long", real(v)));
  }
  if let Some(v) = title {
    sets.push(("title", text(v)));
  }
  if let Some(v) = desc {
    sets.push(("\"desc\"", text(v)));
  }
  if let Some(v) = tags {
    sets.push(("tags", Value::Text(encode_tags(&v)?)));
  }
  if let Some(v) = force_rank {
    sets.push(("force_rank", integer(v)));
  }
  if let Some(v) = confidence {
    sets.push(("confidence", real(v)));
  }
  if let Some(v) = status {
    sets.push(("status", text(v.map(|s| encode_status(s).to_owned()))));
  }
  if let Some(v) = user_name {
    sets.push(("user_name", text(v)));
  }
  if let Some(v) = tweet_id {
    sets.push(("tweet_id", text(v)));
  }

  Ok(sets)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `incidents` row.
pub struct RawIncident {
  pub id:           i64,
  pub incident_id:  Option<String>,
  pub date_created: Option<String>,
  pub date:         Option<String>,
  pub city:         Option<String>,
  pub state:        Option<String>,
  pub lat:          Option<f64>,
  pub long:         Option<f64>,
  pub title:        Option<String>,
  pub desc:         Option<String>,
  pub tags:         String,
  pub force_rank:   Option<i64>,
  pub confidence:   Option<f64>,
  pub status:       Option<String>,
  pub user_name:    Option<String>,
  pub tweet_id:     Option<String>,
}

impl RawIncident {
  /// Read a row selected with [`crate::schema::INCIDENT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      incident_id:  row.get(1)?,
      date_created: row.get(2)?,
      date:         row.get(3)?,
      city:         row.get(4)?,
      state:        row.get(5)?,
      lat:          row.get(6)?,
      long:         row.get(7)?,
      title:        row.get(8)?,
      desc:         row.get(9)?,
      tags:         row.get(10)?,
      force_rank:   row.get(11)?,
      confidence:   row.get(12)?,
      status:       row.get(13)?,
      user_name:    row.get(14)?,
      tweet_id:     row.get(15)?,
    })
  }

  pub fn into_record(self) -> Result<IncidentRecord> {
    let date_created = self.date_created.as_deref().map(decode_dt).transpose()?;
    let date = self.date.as_deref().map(decode_dt).transpose()?;

    Ok(IncidentRecord {
      id: self.id,
      incident_id: self.incident_id,
      date_created,
      date,
      city: self.city,
      state: self.state,
      lat: self.lat,
      long: self.long,
      title: self.title,
      desc: self.desc,
      tags: self.tags,
      force_rank: self.force_rank,
      confidence: self.confidence,
      status: self.status,
      user_name: self.user_name,
      tweet_id: self.tweet_id,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_are_fixed_width_utc() {
    let whole = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let fractional = whole + chrono::Duration::milliseconds(500);

    assert_eq!(encode_dt(whole), "2024-03-01T12:00:00.000000Z");
    assert_eq!(encode_dt(fractional), "2024-03-01T12:00:00.500000Z");
    assert!(encode_dt(whole) < encode_dt(fractional));
    assert_eq!(decode_dt(&encode_dt(fractional)).unwrap(), fractional);
  }

  #[test]
  fn decode_dt_reads_sqlite_datetime_text() {
    assert_eq!(
      decode_dt("2024-03-01 12:00:00").unwrap(),
      Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    );
    assert_eq!(
      decode_dt("2024-03-01 12:00:00.250").unwrap(),
      Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
        + chrono::Duration::milliseconds(250)
    );
  }

  #[test]
  fn decode_dt_rejects_garbage() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }

  #[test]
  fn changes_only_emit_present_fields() {
    let changes = IncidentChanges {
      status: Some(Some(ModerationStatus::Approved)),
      date: Some(None),
      desc: Some(Some("updated".into())),
      ..Default::default()
    };
    let sets = encode_changes(changes).unwrap();
    let columns: Vec<_> = sets.iter().map(|(c, _)| *c).collect();

    assert_eq!(columns, ["date", "\"desc\"", "status"]);
    assert_eq!(sets[0].1, Value::Null);
    assert_eq!(sets[2].1, Value::Text("approved".into()));
  }

  #[test]
  fn explicit_nulls_encode_as_null() {
    let changes = IncidentChanges {
      city: Some(None),
      lat: Some(None),
      force_rank: Some(None),
      status: Some(None),
      title: Some(Some("x".into())),
      ..Default::default()
    };
    let sets = encode_changes(changes).unwrap();

    assert_eq!(sets, [
      ("city", Value::Null),
      ("lat", Value::Null),
      ("title", Value::Text("x".into())),
      ("force_rank", Value::Null),
      ("status", Value::Null),
    ]);
  }
}
