//! Tailoring workspace: which session the page shows on load, how it is kept
//! in sync with local storage, and the analysis panels attached to it.

pub mod analysis;
pub mod handlers;
pub mod resolver;
pub mod workspace;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::comparison::{JobDetails, SavedComparison};
use crate::models::resume::{BaseResume, TailoredResume};
use crate::models::snapshot::SessionSnapshot;

pub use analysis::{AnalysisBundle, PanelState};
pub use resolver::{resolve, Resolution, ResolutionInputs, RestorationSource};
pub use workspace::{Workspace, WorkspaceError, WorkspaceView};

/// A restorable session: both resumes are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSession {
    pub selected_resume: BaseResume,
    pub tailored_resume: TailoredResume,
    pub job: JobDetails,
    pub analysis: Option<Value>,
    pub keywords: Option<Value>,
    pub match_score: Option<Value>,
}

impl WorkspaceSession {
    pub fn new(selected_resume: BaseResume, tailored_resume: TailoredResume, job: JobDetails) -> Self {
        Self {
            selected_resume,
            tailored_resume,
            job,
            analysis: None,
            keywords: None,
            match_score: None,
        }
    }

    /// `None` unless the snapshot holds both resumes.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Option<Self> {
        Some(Self {
            selected_resume: snapshot.selected_resume?,
            tailored_resume: snapshot.tailored_resume?,
            job: snapshot.job,
            analysis: snapshot.analysis,
            keywords: snapshot.keywords,
            match_score: snapshot.match_score,
        })
    }

    pub fn from_comparison(comparison: SavedComparison) -> Self {
        Self {
            selected_resume: comparison.base_resume,
            tailored_resume: comparison.tailored_resume.into_tailored(),
            job: comparison.job.into(),
            analysis: comparison.analysis,
            keywords: comparison.keywords,
            match_score: comparison.match_score,
        }
    }

    pub fn to_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            selected_resume: Some(self.selected_resume.clone()),
            tailored_resume: Some(self.tailored_resume.clone()),
            job: self.job.clone(),
            analysis: self.analysis.clone(),
            keywords: self.keywords.clone(),
            match_score: self.match_score.clone(),
            timestamp: Utc::now(),
        }
    }

    pub fn tailored_id(&self) -> i64 {
        self.tailored_resume.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake;

    #[test]
    fn test_from_snapshot_requires_both_resumes() {
        let session = WorkspaceSession::from_comparison(fake::comparison(42, 1));
        let mut snapshot = session.to_snapshot();
        snapshot.selected_resume = None;
        assert!(WorkspaceSession::from_snapshot(snapshot).is_none());
    }

    #[test]
    fn test_snapshot_conversion_keeps_everything() {
        let session = WorkspaceSession::from_comparison(fake::comparison(42, 1));
        let restored = WorkspaceSession::from_snapshot(session.to_snapshot()).unwrap();
        assert_eq!(restored, session);
        assert_eq!(restored.tailored_id(), 42);
        assert_eq!(restored.job.company, "Initech");
    }
}
