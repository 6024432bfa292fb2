use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::resume::{BaseResume, TailoredResumeRecord};

/// Free-text job identifiers the user typed into the job-detail form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobDetails {
    pub job_url: String,
    pub company: String,
    pub job_title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonJob {
    pub company: String,
    pub title: String,
    pub url: String,
}

impl From<ComparisonJob> for JobDetails {
    fn from(job: ComparisonJob) -> Self {
        JobDetails {
            job_url: job.url,
            company: job.company,
            job_title: job.title,
        }
    }
}

/// Payload of `GET /api/saved-comparisons/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedComparison {
    pub base_resume: BaseResume,
    pub tailored_resume: TailoredResumeRecord,
    #[serde(default)]
    pub job: ComparisonJob,
    #[serde(default)]
    pub analysis: Option<Value>,
    #[serde(default)]
    pub keywords: Option<Value>,
    #[serde(default)]
    pub match_score: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_comparison_full_payload() {
        let json = r#"{
            "base_resume": {"id": 1, "filename": "cv.pdf", "summary": "Engineer"},
            "tailored_resume": {"id": 42, "base_resume_id": 1, "tailored_summary": "Rust engineer"},
            "job": {"company": "Acme", "title": "SRE", "url": "https://acme.test/jobs/1"},
            "analysis": {"changes": []},
            "match_score": {"score": 81}
        }"#;
        let comparison: SavedComparison = serde_json::from_str(json).unwrap();

        assert_eq!(comparison.tailored_resume.id, 42);
        assert!(comparison.analysis.is_some());
        assert!(comparison.keywords.is_none());
        assert_eq!(comparison.match_score.unwrap()["score"], 81);

        let job = JobDetails::from(comparison.job);
        assert_eq!(job.company, "Acme");
        assert_eq!(job.job_title, "SRE");
        assert_eq!(job.job_url, "https://acme.test/jobs/1");
    }

    #[test]
    fn test_saved_comparison_without_job_defaults() {
        let json = r#"{
            "base_resume": {"id": 1},
            "tailored_resume": {"id": 2}
        }"#;
        let comparison: SavedComparison = serde_json::from_str(json).unwrap();
        assert_eq!(comparison.job.company, "");
    }
}
