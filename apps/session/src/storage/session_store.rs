use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{KeyValueStore, StorageError};
use crate::models::comparison::JobDetails;
use crate::models::resume::{BaseResume, TailoredResume};
use crate::models::snapshot::SessionSnapshot;

pub const SESSION_KEY: &str = "tailor.session";
pub const LAST_VIEWED_KEY: &str = "tailor.last_tailored_resume_id";
pub const ONBOARDING_KEY: &str = "tailor.onboarding_completed";

/// Bump when `SessionSnapshot` changes shape. Unknown versions are dropped on read.
pub const SNAPSHOT_SCHEMA_VERSION: u64 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    schema_version: u64,
    snapshot: &'a SessionSnapshot,
}

#[derive(Deserialize)]
struct Envelope {
    #[allow(dead_code)]
    schema_version: u64,
    snapshot: SessionSnapshot,
}

/// The unversioned camelCase object the browser frontend kept in localStorage.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySnapshot {
    #[serde(default)]
    selected_resume: Option<BaseResume>,
    #[serde(default)]
    tailored_resume: Option<TailoredResume>,
    #[serde(default)]
    job_url: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    job_title: Option<String>,
    #[serde(default)]
    analysis: Option<Value>,
    #[serde(default)]
    keywords: Option<Value>,
    #[serde(default)]
    match_score: Option<Value>,
    /// Milliseconds since the epoch (`Date.now()`).
    #[serde(default)]
    timestamp: Option<i64>,
}

impl LegacySnapshot {
    fn migrate(self) -> SessionSnapshot {
        SessionSnapshot {
            selected_resume: self.selected_resume,
            tailored_resume: self.tailored_resume,
            job: JobDetails {
                job_url: self.job_url.unwrap_or_default(),
                company: self.company.unwrap_or_default(),
                job_title: self.job_title.unwrap_or_default(),
            },
            analysis: self.analysis,
            keywords: self.keywords,
            match_score: self.match_score,
            timestamp: self
                .timestamp
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .unwrap_or_else(Utc::now),
        }
    }
}

/// Typed access to the three persisted keys of the tailoring workspace.
#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Reads the stored snapshot.
    ///
    /// Returns `None` when nothing is stored, when the payload is unreadable or of
    /// an unknown schema version (both are deleted), and when the snapshot lacks
    /// either resume (left in place, just not restorable).
    pub async fn load_snapshot(&self) -> Result<Option<SessionSnapshot>, StorageError> {
        let Some(raw) = self.kv.get(SESSION_KEY).await? else {
            return Ok(None);
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Dropping unreadable session snapshot: {e}");
                self.kv.remove(SESSION_KEY).await?;
                return Ok(None);
            }
        };

        let snapshot = match value.get("schema_version").map(Value::as_u64) {
            Some(Some(SNAPSHOT_SCHEMA_VERSION)) => {
                match serde_json::from_value::<Envelope>(value) {
                    Ok(envelope) => envelope.snapshot,
                    Err(e) => {
                        warn!("Dropping malformed session snapshot: {e}");
                        self.kv.remove(SESSION_KEY).await?;
                        return Ok(None);
                    }
                }
            }
            Some(version) => {
                warn!("Dropping session snapshot with unsupported schema version {version:?}");
                self.kv.remove(SESSION_KEY).await?;
                return Ok(None);
            }
            None => match serde_json::from_value::<LegacySnapshot>(value) {
                Ok(legacy) => {
                    let snapshot = legacy.migrate();
                    info!("Migrated legacy session snapshot to schema v{SNAPSHOT_SCHEMA_VERSION}");
                    self.save_snapshot(&snapshot).await?;
                    snapshot
                }
                Err(e) => {
                    warn!("Dropping unrecognized session snapshot: {e}");
                    self.kv.remove(SESSION_KEY).await?;
                    return Ok(None);
                }
            },
        };

        if !snapshot.is_complete() {
            debug!("Ignoring incomplete session snapshot");
            return Ok(None);
        }
        Ok(Some(snapshot))
    }

    pub async fn save_snapshot(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&EnvelopeRef {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            snapshot,
        })?;
        self.kv.set(SESSION_KEY, &raw).await
    }

    pub async fn clear_snapshot(&self) -> Result<(), StorageError> {
        self.kv.remove(SESSION_KEY).await
    }

    /// A pointer that is not an integer is removed and reported as absent.
    pub async fn last_viewed_id(&self) -> Result<Option<i64>, StorageError> {
        let Some(raw) = self.kv.get(LAST_VIEWED_KEY).await? else {
            return Ok(None);
        };
        match raw.trim().parse::<i64>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                warn!("Dropping non-numeric last viewed id {raw:?}");
                self.kv.remove(LAST_VIEWED_KEY).await?;
                Ok(None)
            }
        }
    }

    pub async fn set_last_viewed_id(&self, id: i64) -> Result<(), StorageError> {
        self.kv.set(LAST_VIEWED_KEY, &id.to_string()).await
    }

    pub async fn clear_last_viewed_id(&self) -> Result<(), StorageError> {
        self.kv.remove(LAST_VIEWED_KEY).await
    }

    pub async fn onboarding_completed(&self) -> Result<bool, StorageError> {
        Ok(self.kv.get(ONBOARDING_KEY).await?.as_deref() == Some("true"))
    }

    pub async fn set_onboarding_completed(&self, completed: bool) -> Result<(), StorageError> {
        if completed {
            self.kv.set(ONBOARDING_KEY, "true").await
        } else {
            self.kv.remove(ONBOARDING_KEY).await
        }
    }

    /// Forgets the session and the last-viewed pointer. The onboarding flag stays.
    pub async fn clear_all(&self) -> Result<(), StorageError> {
        self.clear_snapshot().await?;
        self.clear_last_viewed_id().await
    }
}
