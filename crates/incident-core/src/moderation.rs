//! The moderated view of an incident and the shaping transform that builds it.
//!
//! Moderation queues never hand out raw records. Each record is shaped:
//! tags are decoded from their stored JSON, a `src` link back to the source
//! tweet is derived, and `tweet_id` is dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  incident::{IncidentRecord, Tags},
  status::ModerationStatus,
};

/// An incident as returned by the status-filtered queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeratedIncident {
  pub id:           i64,
  pub incident_id:  Option<String>,
  pub date_created: Option<DateTime<Utc>>,
  pub date:         Option<DateTime<Utc>>,
  pub city:         Option<String>,
  pub state:        Option<String>,
  pub lat:          Option<f64>,
  pub long:         Option<f64>,
  pub title:        Option<String>,
  pub desc:         Option<String>,
  pub tags:         Tags,
  pub force_rank:   Option<i64>,
  pub confidence:   Option<f64>,
  pub status:       ModerationStatus,
  pub user_name:    Option<String>,
  /// Link to the originating tweet.
  pub src:          String,
}

/// `https://twitter.com/{user_name}/status/{tweet_id}`; a missing part renders
/// as the empty string.
pub fn tweet_src(user_name: Option<&str>, tweet_id: Option<&str>) -> String {
  format!(
    "https://twitter.com/{}/status/{}",
    user_name.unwrap_or_default(),
    tweet_id.unwrap_or_default()
  )
}

/// Decode the stored tag text of incident `id`.
pub fn decode_tags(id: i64, text: &str) -> Result<Tags> {
  serde_json::from_str(text).map_err(|source| Error::MalformedTags { id, source })
}

impl TryFrom<IncidentRecord> for ModeratedIncident {
  type Error = Error;

  fn try_from(record: IncidentRecord) -> Result<Self> {
    let tags = decode_tags(record.id, &record.tags)?;
    let status = record
      .moderation_status()?
      .ok_or(Error::MissingStatus(record.id))?;
    let src = tweet_src(record.user_name.as_deref(), record.tweet_id.as_deref());

    Ok(Self {
      id: record.id,
      incident_id: record.incident_id,
      date_created: record.date_created,
      date: record.date,
      city: record.city,
      state: record.state,
      lat: record.lat,
      long: record.long,
      title: record.title,
      desc: record.desc,
      tags,
      force_rank: record.force_rank,
      confidence: record.confidence,
      status,
      user_name: record.user_name,
      src,
    })
  }
}

/// Shape a whole result set. The first malformed record fails the batch.
pub fn shape_all(records: Vec<IncidentRecord>) -> Result<Vec<ModeratedIncident>> {
  records.into_iter().map(ModeratedIncident::try_from).collect()
}
