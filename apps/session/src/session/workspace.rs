use std::fmt;
use std::str::FromStr;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use super::resolver::{resolve, ResolutionInputs, RestorationSource};
use super::WorkspaceSession;
use crate::backend::{AnalysisKind, TailorBackend};
use crate::models::comparison::JobDetails;
use crate::models::resume::{BaseResume, TailoredResume};
use crate::models::snapshot::SessionSnapshot;
use crate::storage::{SessionStore, StorageError};

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("No tailored resume is loaded")]
    NoSession,

    #[error("Unknown resume section '{0}'")]
    UnknownSection(String),

    #[error("Invalid value for section '{section}': {reason}")]
    InvalidValue { section: Section, reason: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Editable sections of the tailored resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    Skills,
    Experience,
    Education,
    Certifications,
    AlignmentStatement,
}

impl Section {
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Summary => "summary",
            Section::Skills => "skills",
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Certifications => "certifications",
            Section::AlignmentStatement => "alignment_statement",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = WorkspaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(Section::Summary),
            "skills" => Ok(Section::Skills),
            "experience" => Ok(Section::Experience),
            "education" => Ok(Section::Education),
            "certifications" => Ok(Section::Certifications),
            "alignment_statement" => Ok(Section::AlignmentStatement),
            other => Err(WorkspaceError::UnknownSection(other.to_string())),
        }
    }
}

/// What the page renders: the current session, where it came from, and the
/// error banner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkspaceView {
    pub source: RestorationSource,
    pub session: Option<WorkspaceSession>,
    pub error: Option<String>,
}

/// In-memory state of the tailoring page.
///
/// Every mutation that leaves a complete session behind is written through to
/// the `SessionStore`, so the next load can pick up where this one stopped.
pub struct Workspace {
    store: SessionStore,
    session: Option<WorkspaceSession>,
    /// Where `session` was restored from. `None` for sessions created in place.
    source: RestorationSource,
    error: Option<String>,
}

impl Workspace {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            session: None,
            source: RestorationSource::None,
            error: None,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn view(&self) -> WorkspaceView {
        WorkspaceView {
            source: self.source,
            session: self.session.clone(),
            error: self.error.clone(),
        }
    }

    pub fn tailored_id(&self) -> Option<i64> {
        self.session.as_ref().map(WorkspaceSession::tailored_id)
    }

    /// Page load. Runs the resolver once and adopts its outcome.
    ///
    /// When the only remaining source is the last-viewed pointer and the page
    /// already holds a tailored resume, the in-memory session is kept.
    pub async fn mount(
        &mut self,
        backend: &dyn TailorBackend,
        comparison: Option<String>,
    ) -> WorkspaceView {
        let inputs = ResolutionInputs {
            comparison,
            tailored_in_memory: self.session.is_some(),
        };
        let resolution = resolve(backend, &self.store, &inputs).await;

        match resolution.session {
            Some(session) => {
                self.session = Some(session);
                self.source = resolution.source;
                self.error = None;
            }
            None if resolution.error.is_none() && inputs.tailored_in_memory => {
                debug!("Nothing to restore, keeping the session already in memory");
            }
            None => {
                self.session = None;
                self.source = RestorationSource::None;
                self.error = resolution.error;
            }
        }

        self.view()
    }

    /// A tailoring request succeeded: show it, remember its id, persist it.
    pub async fn record_tailoring(
        &mut self,
        selected_resume: BaseResume,
        tailored_resume: TailoredResume,
        job: JobDetails,
    ) -> Result<WorkspaceView, WorkspaceError> {
        let id = tailored_resume.id;
        self.session = Some(WorkspaceSession::new(selected_resume, tailored_resume, job));
        self.source = RestorationSource::None;
        self.error = None;

        self.store.set_last_viewed_id(id).await?;
        self.persist().await?;
        info!("Recorded tailored resume {id}");
        Ok(self.view())
    }

    /// Replaces one section of the tailored resume with `value`.
    /// Text sections take a string, `skills` a string list and `experience`
    /// a list of `{header, bullets}` entries.
    pub async fn edit_section(
        &mut self,
        section: &str,
        value: Value,
    ) -> Result<WorkspaceView, WorkspaceError> {
        let section: Section = section.parse()?;
        let session = self.session.as_mut().ok_or(WorkspaceError::NoSession)?;
        let tailored = &mut session.tailored_resume;

        match section {
            Section::Summary => tailored.summary = parse_value(section, value)?,
            Section::Skills => tailored.skills = parse_value(section, value)?,
            Section::Experience => tailored.experience = parse_value(section, value)?,
            Section::Education => tailored.education = parse_value(section, value)?,
            Section::Certifications => tailored.certifications = parse_value(section, value)?,
            Section::AlignmentStatement => {
                tailored.alignment_statement = parse_value(section, value)?
            }
        }

        self.persist().await?;
        Ok(self.view())
    }

    /// Stores one analysis payload. Returns `false` and changes nothing when the
    /// payload belongs to a resume the page no longer shows.
    pub async fn apply_panel(
        &mut self,
        tailored_resume_id: i64,
        kind: AnalysisKind,
        data: Value,
    ) -> Result<bool, StorageError> {
        let Some(session) = self
            .session
            .as_mut()
            .filter(|s| s.tailored_id() == tailored_resume_id)
        else {
            return Ok(false);
        };

        match kind {
            AnalysisKind::Changes => session.analysis = Some(data),
            AnalysisKind::Keywords => session.keywords = Some(data),
            AnalysisKind::MatchScore => session.match_score = Some(data),
        }

        self.persist().await?;
        Ok(true)
    }

    /// Stores a snapshot pushed by the frontend. A complete one also becomes
    /// the in-memory session; an incomplete one is kept only on disk.
    pub async fn replace_snapshot(
        &mut self,
        snapshot: SessionSnapshot,
    ) -> Result<WorkspaceView, WorkspaceError> {
        self.store.save_snapshot(&snapshot).await?;
        self.session = WorkspaceSession::from_snapshot(snapshot);
        self.source = RestorationSource::None;
        self.error = None;
        Ok(self.view())
    }

    pub fn dismiss_error(&mut self) -> WorkspaceView {
        self.error = None;
        self.view()
    }

    /// New resume or form reset: drop the session and its persisted copies.
    pub async fn reset(&mut self) -> Result<WorkspaceView, WorkspaceError> {
        self.session = None;
        self.source = RestorationSource::None;
        self.error = None;
        self.store.clear_all().await?;
        info!("Workspace reset");
        Ok(self.view())
    }

    async fn persist(&self) -> Result<(), StorageError> {
        match &self.session {
            Some(session) => self.store.save_snapshot(&session.to_snapshot()).await,
            None => Ok(()),
        }
    }
}

fn parse_value<T: DeserializeOwned>(section: Section, value: Value) -> Result<T, WorkspaceError> {
    serde_json::from_value(value).map_err(|e| WorkspaceError::InvalidValue {
        section,
        reason: e.to_string(),
    })
}
