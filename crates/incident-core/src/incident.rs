//! Incident types — the raw stored record, the submission, and the change set.
//!
//! [`IncidentRecord`] mirrors the `incidents` columns one-to-one and is what
//! every unshaped read returns. [`NewIncident`] is the caller-facing
//! submission, which names two fields differently from storage (`date` lands
//! in `date_created`, `username` lands in `user_name`).

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::status::ModerationStatus;

/// A decoded tag set.
pub type Tags = BTreeSet<String>;

// ─── Stored record ───────────────────────────────────────────────────────────

/// One row of the `incidents` relation, with storage field names.
///
/// `tags` and `status` are kept as stored; decoding happens only when the
/// record is shaped into a [`crate::moderation::ModeratedIncident`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
  /// Store-assigned surrogate id; strictly increasing, never reused.
  pub id:           i64,
  /// Externally supplied business identifier.
  pub incident_id:  Option<String>,
  /// Null until the incident is considered created.
  pub date_created: Option<DateTime<Utc>>,
  /// Real-world occurrence time; null keeps the record off the timeline.
  pub date:         Option<DateTime<Utc>>,
  pub city:         Option<String>,
  pub state:        Option<String>,
  pub lat:          Option<f64>,
  pub long:         Option<f64>,
  pub title:        Option<String>,
  pub desc:         Option<String>,
  /// Serialized JSON array of tag strings.
  pub tags:         String,
  pub force_rank:   Option<i64>,
  pub confidence:   Option<f64>,
  /// Stored text; only the moderation queues require it to be a known
  /// [`ModerationStatus`].
  pub status:       Option<String>,
  pub user_name:    Option<String>,
  pub tweet_id:     Option<String>,
}

impl IncidentRecord {
  /// Parse the stored status text. `Ok(None)` when the column is null.
  pub fn moderation_status(&self) -> crate::Result<Option<ModerationStatus>> {
    self.status.as_deref().map(str::parse).transpose()
  }
}

// ─── Submission ──────────────────────────────────────────────────────────────

/// Input to [`crate::store::IncidentStore::create_incident`].
///
/// Omitted fields are stored as null; nothing is defaulted here except an
/// absent tag list, which is the empty set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewIncident {
  pub incident_id: Option<String>,
  /// Stored as `date_created`.
  pub date:        Option<DateTime<Utc>>,
  pub city:        Option<String>,
  pub state:       Option<String>,
  pub lat:         Option<f64>,
  pub long:        Option<f64>,
  pub title:       Option<String>,
  pub desc:        Option<String>,
  #[serde(default)]
  pub tags:        Tags,
  pub force_rank:  Option<i64>,
  pub confidence:  Option<f64>,
  pub status:      Option<ModerationStatus>,
  /// Stored as `user_name`.
  pub username:    Option<String>,
  pub tweet_id:    Option<String>,
}

// ─── Change set ──────────────────────────────────────────────────────────────

/// A partial patch for [`crate::store::IncidentStore::update_incident`].
///
/// Every nullable column takes a nested option: `None` leaves the column
/// untouched, `Some(None)` writes null, `Some(Some(v))` writes `v`. In JSON a
/// missing key is `None` and an explicit `null` is `Some(None)`. `tags` is
/// never null in storage, so it only takes a replacement set.
///
/// No transition rules are applied to `status`; any of the three values may
/// replace any other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncidentChanges {
  #[serde(
    default,
    deserialize_with = "nullable",
    skip_serializing_if = "Option::is_none"
  )]
  pub incident_id:  Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "nullable",
    skip_serializing_if = "Option::is_none"
  )]
  pub date_created: Option<Option<DateTime<Utc>>>,
  #[serde(
    default,
    deserialize_with = "nullable",
    skip_serializing_if = "Option::is_none"
  )]
  pub date:         Option<Option<DateTime<Utc>>>,
  #[serde(
    default,
    deserialize_with = "nullable",
    skip_serializing_if = "Option::is_none"
  )]
  pub city:         Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "nullable",
    skip_serializing_if = "Option::is_none"
  )]
  pub state:        Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "nullable",
    skip_serializing_if = "Option::is_none"
  )]
  pub lat:          Option<Option<f64>>,
  #[serde(
    default,
    deserialize_with = "nullable",
    skip_serializing_if = "Option::is_none"
  )]
  pub long:         Option<Option<f64>>,
  #[serde(
    default,
    deserialize_with = "nullable",
    skip_serializing_if = "Option::is_none"
  )]
  pub title:        Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "nullable",
    skip_serializing_if = "Option::is_none"
  )]
  pub desc:         Option<Option<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tags:         Option<Tags>,
  #[serde(
    default,
    deserialize_with = "nullable",
    skip_serializing_if = "Option::is_none"
  )]
  pub force_rank:   Option<Option<i64>>,
  #[serde(
    default,
    deserialize_with = "nullable",
    skip_serializing_if = "Option::is_none"
  )]
  pub confidence:   Option<Option<f64>>,
  #[serde(
    default,
    deserialize_with = "nullable",
    skip_serializing_if = "Option::is_none"
  )]
  pub status:       Option<Option<ModerationStatus>>,
  #[serde(
    default,
    deserialize_with = "nullable",
    skip_serializing_if = "Option::is_none"
  )]
  pub user_name:    Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "nullable",
    skip_serializing_if = "Option::is_none"
  )]
  pub tweet_id:     Option<Option<String>>,
}

impl IncidentChanges {
  /// A change set that only moves the record to `status`.
  pub fn status(status: ModerationStatus) -> Self {
    Self { status: Some(Some(status)), ..Default::default() }
  }

  pub fn is_empty(&self) -> bool { *self == Self::default() }
}

/// Present-but-null deserializes to `Some(None)`; a missing key falls back to
/// `#[serde(default)]`, i.e. `None`.
fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}
