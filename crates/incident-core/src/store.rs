//! The `IncidentStore` trait — the repository contract over the `incidents`
//! relation.
//!
//! The trait is implemented by storage backends (e.g. `incident-store-sqlite`).
//! Higher layers depend on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  incident::{IncidentChanges, IncidentRecord, NewIncident},
  moderation::ModeratedIncident,
  status::ModerationStatus,
};

/// Abstraction over an incident store backend.
///
/// Every method is a single, independent round trip to the store except
/// [`update_incident`](Self::update_incident), which writes and then re-reads.
/// Implementations hold no state of their own beyond the store handle.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes.
pub trait IncidentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Raw reads ─────────────────────────────────────────────────────────

  /// All incidents with a non-null `date_created`, newest `date` first.
  fn get_incidents(
    &self,
  ) -> impl Future<Output = Result<Vec<IncidentRecord>, Self::Error>> + Send + '_;

  /// Every incident whose `incident_id` equals `incident_id`. The business
  /// identifier is not guaranteed unique, so callers handle multiplicity.
  fn get_incident_by_id<'a>(
    &'a self,
    incident_id: &'a str,
  ) -> impl Future<Output = Result<Vec<IncidentRecord>, Self::Error>> + Send + 'a;

  /// Up to `limit` incidents with a non-null `date`, newest `date_created`
  /// first.
  fn get_timeline_incidents(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<IncidentRecord>, Self::Error>> + Send + '_;

  // ── Moderation queues ─────────────────────────────────────────────────

  /// Incidents in `status`, newest `date_created` first, each shaped into a
  /// [`ModeratedIncident`]. A record whose tags fail to decode fails the
  /// whole query.
  fn get_moderated_incidents(
    &self,
    status: ModerationStatus,
  ) -> impl Future<Output = Result<Vec<ModeratedIncident>, Self::Error>> + Send + '_;

  fn get_all_pending_incidents(
    &self,
  ) -> impl Future<Output = Result<Vec<ModeratedIncident>, Self::Error>> + Send + '_
  {
    self.get_moderated_incidents(ModerationStatus::Pending)
  }

  fn get_all_approved_incidents(
    &self,
  ) -> impl Future<Output = Result<Vec<ModeratedIncident>, Self::Error>> + Send + '_
  {
    self.get_moderated_incidents(ModerationStatus::Approved)
  }

  fn get_all_rejected_incidents(
    &self,
  ) -> impl Future<Output = Result<Vec<ModeratedIncident>, Self::Error>> + Send + '_
  {
    self.get_moderated_incidents(ModerationStatus::Rejected)
  }

  // ── Identity ──────────────────────────────────────────────────────────

  /// The largest surrogate `id` currently stored, or `None` when empty.
  fn get_last_id(
    &self,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert a submission and return its store-assigned `id`.
  fn create_incident(
    &self,
    input: NewIncident,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Patch every record matching `incident_id`, then return them as re-read
  /// by [`get_incident_by_id`](Self::get_incident_by_id). The re-read is a
  /// separate round trip and may come back empty if the record was deleted
  /// in between.
  fn update_incident<'a>(
    &'a self,
    incident_id: &'a str,
    changes: IncidentChanges,
  ) -> impl Future<Output = Result<Vec<IncidentRecord>, Self::Error>> + Send + 'a;

  /// Delete by surrogate `id`; returns the number of rows removed.
  fn delete_incident(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Delete every incident; returns the number of rows removed.
  fn delete_db(&self) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
