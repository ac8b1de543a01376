//! [`SqliteStore`] — the SQLite implementation of [`IncidentStore`].

use std::path::Path;

use incident_core::{
  incident::{IncidentChanges, IncidentRecord, NewIncident},
  moderation::{ModeratedIncident, shape_all},
  status::ModerationStatus,
  store::IncidentStore,
};
use rusqlite::types::Value;

use crate::{
  Error, Result,
  encode::{RawIncident, encode_changes, encode_dt, encode_status, encode_tags},
  schema::{INCIDENT_COLUMNS, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An incident store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted and every
/// clone talks to the same database.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Release the connection. Other clones of this handle fail afterwards.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `SELECT <all columns> FROM incidents <tail>` and decode every row.
  async fn select_incidents(
    &self,
    tail: &'static str,
    params: Vec<Value>,
  ) -> Result<Vec<IncidentRecord>> {
    let sql = format!("SELECT {INCIDENT_COLUMNS} FROM incidents {tail}");

    let raws: Vec<RawIncident> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawIncident::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIncident::into_record).collect()
  }

  #[cfg(test)]
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── IncidentStore impl ──────────────────────────────────────────────────────

impl IncidentStore for SqliteStore {
  type Error = Error;

  // ── Raw reads ─────────────────────────────────────────────────────────────

  async fn get_incidents(&self) -> Result<Vec<IncidentRecord>> {
    self
      .select_incidents(
        "WHERE date_created IS NOT NULL ORDER BY date DESC, id DESC",
        vec![],
      )
      .await
  }

  async fn get_incident_by_id(&self, incident_id: &str) -> Result<Vec<IncidentRecord>> {
    self
      .select_incidents(
        "WHERE incident_id = ?1 ORDER BY id",
        vec![Value::Text(incident_id.to_owned())],
      )
      .await
  }

  async fn get_timeline_incidents(&self, limit: usize) -> Result<Vec<IncidentRecord>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    self
      .select_incidents(
        "WHERE date IS NOT NULL ORDER BY date_created DESC, id DESC LIMIT ?1",
        vec![Value::Integer(limit)],
      )
      .await
  }

  // ── Moderation queues ─────────────────────────────────────────────────────

  async fn get_moderated_incidents(
    &self,
    status: ModerationStatus,
  ) -> Result<Vec<ModeratedIncident>> {
    let records = self
      .select_incidents(
        "WHERE status = ?1 ORDER BY date_created DESC, id DESC",
        vec![Value::Text(encode_status(status).to_owned())],
      )
      .await?;

    Ok(shape_all(records)?)
  }

  // ── Identity ──────────────────────────────────────────────────────────────

  async fn get_last_id(&self) -> Result<Option<i64>> {
    let id = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT MAX(id) FROM incidents", [], |row| {
          row.get::<_, Option<i64>>(0)
        })?)
      })
      .await?;
    Ok(id)
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create_incident(&self, input: NewIncident) -> Result<i64> {
    let tags_str         = encode_tags(&input.tags)?;
    let date_created_str = input.date.map(encode_dt);
    let status_str       = input.status.map(encode_status);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO incidents (
             incident_id, date_created, city, state, lat, long, title, \"desc\",
             tags, force_rank, confidence, status, user_name, tweet_id
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
          rusqlite::params![
            input.incident_id,
            date_created_str,
            input.city,
            input.state,
            input.lat,
            input.long,
            input.title,
            input.desc,
            tags_str,
            input.force_rank,
            input.confidence,
            status_str,
            input.username,
            input.tweet_id,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id, "created incident");
    Ok(id)
  }

  async fn update_incident(
    &self,
    incident_id: &str,
    changes: IncidentChanges,
  ) -> Result<Vec<IncidentRecord>> {
    let sets = encode_changes(changes)?;
    if sets.is_empty() {
      return Err(Error::Update {
        incident_id: incident_id.to_owned(),
        message:     "no fields to update".to_owned(),
      });
    }

    let assignments = sets
      .iter()
      .enumerate()
      .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!(
      "UPDATE incidents SET {assignments} WHERE incident_id = ?{}",
      sets.len() + 1
    );
    let mut params: Vec<Value> = sets.into_iter().map(|(_, value)| value).collect();
    params.push(Value::Text(incident_id.to_owned()));

    let written = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params_from_iter(params))?))
      .await;

    match written {
      Ok(rows) => tracing::debug!(incident_id, rows, "updated incident"),
      Err(e) => {
        tracing::warn!(incident_id, error = %e, "incident update failed");
        // Forward SQLite's own text, not the wrapper's debug rendering.
        let message = match &e {
          tokio_rusqlite::Error::Rusqlite(inner) => inner.to_string(),
          other => other.to_string(),
        };
        return Err(Error::Update {
          incident_id: incident_id.to_owned(),
          message,
        });
      }
    }

    self.get_incident_by_id(incident_id).await
  }

  async fn delete_incident(&self, id: i64) -> Result<usize> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM incidents WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;

    tracing::debug!(id, removed, "deleted incident");
    Ok(removed)
  }

  async fn delete_db(&self) -> Result<usize> {
    let removed = self
      .conn
      .call(|conn| Ok(conn.execute("DELETE FROM incidents", [])?))
      .await?;

    tracing::debug!(removed, "cleared incidents");
    Ok(removed)
  }
}
