//! Administrative surface for the incident store.
//!
//! Every subcommand maps onto one [`IncidentStore`] operation and produces a
//! JSON value for the binary to print. Commands are generic over the store so
//! they run unchanged against an in-memory database in tests.

use std::{
  io::Read,
  path::{Path, PathBuf},
};

use anyhow::{Context as _, bail};
use clap::Subcommand;
use incident_core::{
  incident::{IncidentChanges, NewIncident},
  status::ModerationStatus,
  store::IncidentStore,
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `incidents.toml` and
/// `INCIDENTS_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_store_path() -> PathBuf { PathBuf::from("incidents.db") }

/// Layer the (optional) config file under the environment.
pub fn load_config(path: &Path) -> anyhow::Result<AdminConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(path.to_path_buf()).required(false))
    .add_source(config::Environment::with_prefix("INCIDENTS"))
    .build()
    .context("failed to read config file")?;

  settings
    .try_deserialize()
    .context("failed to deserialise AdminConfig")
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Commands ─────────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Every created incident, most recent occurrence first.
  List,
  /// Incidents with an occurrence date, most recently created first.
  Timeline {
    #[arg(short, long, default_value_t = 10)]
    limit: usize,
  },
  /// A moderation queue (pending, approved, or rejected).
  Queue { status: ModerationStatus },
  /// All records carrying an incident id.
  Show { incident_id: String },
  /// Insert one incident read as JSON from stdin.
  Create,
  /// Apply a JSON change set from stdin to an incident id.
  Update { incident_id: String },
  /// Move an incident to another moderation status.
  SetStatus {
    incident_id: String,
    status:      ModerationStatus,
  },
  /// Delete one record by surrogate id.
  Delete { id: i64 },
  /// Delete every incident.
  Purge {
    /// Required; there is no undo.
    #[arg(long)]
    yes: bool,
  },
  /// Print the highest surrogate id.
  LastId,
}

fn read_json<T: DeserializeOwned>(input: impl Read) -> anyhow::Result<T> {
  serde_json::from_reader(input).context("failed to parse JSON input")
}

/// Run `command` against `store`. `input` supplies the JSON body for
/// `create` and `update`.
pub async fn run<S, R>(store: &S, command: Command, input: R) -> anyhow::Result<Value>
where
  S: IncidentStore,
  R: Read,
{
  let output = match command {
    Command::List => serde_json::to_value(store.get_incidents().await?)?,
    Command::Timeline { limit } => {
      serde_json::to_value(store.get_timeline_incidents(limit).await?)?
    }
    Command::Queue { status } => {
      serde_json::to_value(store.get_moderated_incidents(status).await?)?
    }
    Command::Show { incident_id } => {
      serde_json::to_value(store.get_incident_by_id(&incident_id).await?)?
    }
    Command::Create => {
      let incident: NewIncident = read_json(input)?;
      let id = store.create_incident(incident).await?;
      tracing::info!(id, "created incident");
      json!({ "id": id })
    }
    Command::Update { incident_id } => {
      let changes: IncidentChanges = read_json(input)?;
      serde_json::to_value(store.update_incident(&incident_id, changes).await?)?
    }
    Command::SetStatus { incident_id, status } => {
      let updated = store
        .update_incident(&incident_id, IncidentChanges::status(status))
        .await?;
      tracing::info!(%incident_id, %status, matched = updated.len(), "status changed");
      serde_json::to_value(updated)?
    }
    Command::Delete { id } => {
      json!({ "deleted": store.delete_incident(id).await? })
    }
    Command::Purge { yes } => {
      if !yes {
        bail!("refusing to delete every incident without --yes");
      }
      let deleted = store.delete_db().await?;
      tracing::warn!(deleted, "purged incident store");
      json!({ "deleted": deleted })
    }
    Command::LastId => json!({ "id": store.get_last_id().await? }),
  };

  Ok(output)
}
