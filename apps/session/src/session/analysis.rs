//! Parallel analysis fan-out.
//!
//! The three analysis requests are in flight together. Each panel is applied to
//! the workspace as soon as its own response lands, so a slow or failing
//! `keywords` call never holds back `analysis` or `match_score`.

use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::Workspace;
use crate::backend::{AnalysisKind, TailorBackend};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PanelState {
    Loaded { data: Value },
    Failed { message: String },
}

impl PanelState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, PanelState::Loaded { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisBundle {
    pub analysis: PanelState,
    pub keywords: PanelState,
    pub match_score: PanelState,
}

/// Fetches all three panels for `tailored_resume_id` concurrently.
pub async fn fetch_analysis(
    backend: &dyn TailorBackend,
    workspace: &Mutex<Workspace>,
    tailored_resume_id: i64,
) -> AnalysisBundle {
    let (analysis, keywords, match_score) = tokio::join!(
        fetch_panel(backend, workspace, AnalysisKind::Changes, tailored_resume_id),
        fetch_panel(backend, workspace, AnalysisKind::Keywords, tailored_resume_id),
        fetch_panel(backend, workspace, AnalysisKind::MatchScore, tailored_resume_id),
    );

    AnalysisBundle {
        analysis,
        keywords,
        match_score,
    }
}

async fn fetch_panel(
    backend: &dyn TailorBackend,
    workspace: &Mutex<Workspace>,
    kind: AnalysisKind,
    tailored_resume_id: i64,
) -> PanelState {
    let data = match backend.analyze(kind, tailored_resume_id).await {
        Ok(data) => data,
        Err(e) => {
            warn!("{} failed for tailored resume {tailored_resume_id}: {e}", kind.endpoint());
            return PanelState::Failed {
                message: e.to_string(),
            };
        }
    };

    let mut workspace = workspace.lock().await;
    match workspace
        .apply_panel(tailored_resume_id, kind, data.clone())
        .await
    {
        Ok(true) => debug!("Applied {} for {tailored_resume_id}", kind.endpoint()),
        Ok(false) => debug!(
            "Dropped {} for {tailored_resume_id}: workspace moved on",
            kind.endpoint()
        ),
        Err(e) => warn!("Failed to persist {}: {e}", kind.endpoint()),
    }

    PanelState::Loaded { data }
}
