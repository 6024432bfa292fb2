use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::comparison::JobDetails;
use crate::models::resume::{BaseResume, TailoredResume};

/// Persisted unit of work-in-progress on the tailoring page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub selected_resume: Option<BaseResume>,
    #[serde(default)]
    pub tailored_resume: Option<TailoredResume>,
    #[serde(default)]
    pub job: JobDetails,
    #[serde(default)]
    pub analysis: Option<Value>,
    #[serde(default)]
    pub keywords: Option<Value>,
    #[serde(default)]
    pub match_score: Option<Value>,
    /// Write time. Informational only, snapshots never expire.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl SessionSnapshot {
    /// Only a snapshot holding both resumes can be restored.
    pub fn is_complete(&self) -> bool {
        self.selected_resume.is_some() && self.tailored_resume.is_some()
    }
}
