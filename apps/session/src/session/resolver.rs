//! Decides, once per page load, which source populates the comparison view.
//!
//! Sources are tried in `PRECEDENCE` order and the first eligible one decides
//! the outcome: a higher source that fails never falls through to a lower one.
//!
//! | Source           | Eligible when                                              |
//! |------------------|------------------------------------------------------------|
//! | `UrlComparison`  | a non-blank `comparison` id is given                       |
//! | `LocalSession`   | no `comparison` id and a complete snapshot is stored       |
//! | `LastViewedId`   | no id, no snapshot, nothing in memory, a pointer is stored |

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::WorkspaceSession;
use crate::backend::TailorBackend;
use crate::models::comparison::JobDetails;
use crate::storage::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestorationSource {
    UrlComparison,
    LocalSession,
    LastViewedId,
    None,
}

pub const PRECEDENCE: [RestorationSource; 3] = [
    RestorationSource::UrlComparison,
    RestorationSource::LocalSession,
    RestorationSource::LastViewedId,
];

#[derive(Debug, Clone, Default)]
pub struct ResolutionInputs {
    /// Value of the `comparison` query parameter.
    pub comparison: Option<String>,
    /// Whether the page already holds a tailored resume.
    pub tailored_in_memory: bool,
}

impl ResolutionInputs {
    fn comparison_id(&self) -> Option<&str> {
        self.comparison
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub source: RestorationSource,
    pub session: Option<WorkspaceSession>,
    /// User-visible banner text. Never set for a stale pointer.
    pub error: Option<String>,
}

impl Resolution {
    fn empty(error: Option<String>) -> Self {
        Self {
            source: RestorationSource::None,
            session: None,
            error,
        }
    }
}

enum Step {
    /// Guard not eligible; try the next source.
    Skip,
    Resolved(WorkspaceSession),
    /// Guard was eligible but failed; resolution ends empty.
    Stop(Option<String>),
}

/// Runs the guards in precedence order. Never fails: errors end up in
/// `Resolution::error`. A resolved session is written back to the store.
pub async fn resolve(
    backend: &dyn TailorBackend,
    store: &SessionStore,
    inputs: &ResolutionInputs,
) -> Resolution {
    for source in PRECEDENCE {
        let step = match source {
            RestorationSource::UrlComparison => from_url_comparison(backend, inputs).await,
            RestorationSource::LocalSession => from_local_session(store, inputs).await,
            RestorationSource::LastViewedId => from_last_viewed_id(backend, store, inputs).await,
            RestorationSource::None => Step::Skip,
        };

        match step {
            Step::Skip => continue,
            Step::Resolved(session) => {
                info!(
                    "Restored tailored resume {} from {source:?}",
                    session.tailored_id()
                );
                write_through(store, &session).await;
                return Resolution {
                    source,
                    session: Some(session),
                    error: None,
                };
            }
            Step::Stop(error) => return Resolution::empty(error),
        }
    }

    debug!("No restoration source matched, showing setup state");
    Resolution::empty(None)
}

async fn from_url_comparison(backend: &dyn TailorBackend, inputs: &ResolutionInputs) -> Step {
    let Some(id) = inputs.comparison_id() else {
        return Step::Skip;
    };

    match backend.saved_comparison(id).await {
        Ok(comparison) => Step::Resolved(WorkspaceSession::from_comparison(comparison)),
        Err(e) => {
            warn!("Failed to load saved comparison {id}: {e}");
            Step::Stop(Some(format!("Failed to load saved comparison: {e}")))
        }
    }
}

async fn from_local_session(store: &SessionStore, inputs: &ResolutionInputs) -> Step {
    if inputs.comparison_id().is_some() {
        return Step::Skip;
    }

    match store.load_snapshot().await {
        Ok(Some(snapshot)) => match WorkspaceSession::from_snapshot(snapshot) {
            Some(session) => Step::Resolved(session),
            None => Step::Skip,
        },
        Ok(None) => Step::Skip,
        Err(e) => {
            warn!("Could not read the session snapshot: {e}");
            Step::Skip
        }
    }
}

async fn from_last_viewed_id(
    backend: &dyn TailorBackend,
    store: &SessionStore,
    inputs: &ResolutionInputs,
) -> Step {
    if inputs.comparison_id().is_some() || inputs.tailored_in_memory {
        return Step::Skip;
    }

    let id = match store.last_viewed_id().await {
        Ok(Some(id)) => id,
        Ok(None) => return Step::Skip,
        Err(e) => {
            warn!("Could not read the last viewed id: {e}");
            return Step::Skip;
        }
    };

    let record = match backend.tailored_resume(id).await {
        Ok(record) => record,
        Err(e) if e.is_not_found() => {
            info!("Last viewed tailored resume {id} no longer exists, clearing pointer");
            if let Err(e) = store.clear_last_viewed_id().await {
                warn!("Failed to clear stale last viewed id {id}: {e}");
            }
            return Step::Stop(None);
        }
        Err(e) => {
            warn!("Failed to load tailored resume {id}: {e}");
            return Step::Stop(Some(format!("Failed to load tailored resume: {e}")));
        }
    };

    let tailored = record.into_tailored();
    let selected = match backend.base_resume(tailored.base_resume_id).await {
        Ok(base) => base,
        Err(e) => {
            warn!(
                "Failed to load base resume {} for tailored resume {id}: {e}",
                tailored.base_resume_id
            );
            return Step::Stop(Some(format!("Failed to load original resume: {e}")));
        }
    };

    let job = JobDetails {
        job_url: String::new(),
        company: tailored.company.clone(),
        job_title: tailored.title.clone(),
    };
    Step::Resolved(WorkspaceSession::new(selected, tailored, job))
}

async fn write_through(store: &SessionStore, session: &WorkspaceSession) {
    if let Err(e) = store.save_snapshot(&session.to_snapshot()).await {
        warn!("Failed to persist restored session: {e}");
    }
}
