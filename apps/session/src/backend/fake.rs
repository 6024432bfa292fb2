//! Scripted in-process backend for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{AnalysisKind, BackendError, TailorBackend};
use crate::models::comparison::{ComparisonJob, SavedComparison};
use crate::models::resume::{BaseResume, ExperienceEntry, TailoredResumeRecord};

#[derive(Debug, Clone)]
pub enum Failure {
    NotFound,
    Api(u16, String),
}

impl Failure {
    fn into_error(self, what: &str) -> BackendError {
        match self {
            Failure::NotFound => BackendError::NotFound(what.to_string()),
            Failure::Api(status, message) => BackendError::Api { status, message },
        }
    }
}

#[derive(Default)]
pub struct FakeBackend {
    comparisons: HashMap<String, Result<SavedComparison, Failure>>,
    tailored: HashMap<i64, Result<TailoredResumeRecord, Failure>>,
    bases: HashMap<i64, Result<BaseResume, Failure>>,
    analysis: HashMap<&'static str, Result<Value, Failure>>,
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comparison(mut self, id: &str, result: Result<SavedComparison, Failure>) -> Self {
        self.comparisons.insert(id.to_string(), result);
        self
    }

    pub fn with_tailored(mut self, id: i64, result: Result<TailoredResumeRecord, Failure>) -> Self {
        self.tailored.insert(id, result);
        self
    }

    pub fn with_base(mut self, id: i64, result: Result<BaseResume, Failure>) -> Self {
        self.bases.insert(id, result);
        self
    }

    pub fn with_analysis(mut self, kind: AnalysisKind, result: Result<Value, Failure>) -> Self {
        self.analysis.insert(kind.endpoint(), result);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock poisoned").push(call);
    }
}

#[async_trait]
impl TailorBackend for FakeBackend {
    async fn saved_comparison(&self, id: &str) -> Result<SavedComparison, BackendError> {
        self.record(format!("comparison:{id}"));
        match self.comparisons.get(id) {
            Some(Ok(c)) => Ok(c.clone()),
            Some(Err(f)) => Err(f.clone().into_error(id)),
            None => Err(BackendError::NotFound(id.to_string())),
        }
    }

    async fn tailored_resume(&self, id: i64) -> Result<TailoredResumeRecord, BackendError> {
        self.record(format!("tailored:{id}"));
        match self.tailored.get(&id) {
            Some(Ok(r)) => Ok(r.clone()),
            Some(Err(f)) => Err(f.clone().into_error(&id.to_string())),
            None => Err(BackendError::NotFound(id.to_string())),
        }
    }

    async fn base_resume(&self, id: i64) -> Result<BaseResume, BackendError> {
        self.record(format!("base:{id}"));
        match self.bases.get(&id) {
            Some(Ok(b)) => Ok(b.clone()),
            Some(Err(f)) => Err(f.clone().into_error(&id.to_string())),
            None => Err(BackendError::NotFound(id.to_string())),
        }
    }

    async fn analyze(
        &self,
        kind: AnalysisKind,
        tailored_resume_id: i64,
    ) -> Result<Value, BackendError> {
        self.record(format!("{}:{tailored_resume_id}", kind.endpoint()));
        match self.analysis.get(kind.endpoint()) {
            Some(Ok(v)) => Ok(v.clone()),
            Some(Err(f)) => Err(f.clone().into_error(kind.endpoint())),
            None => Err(BackendError::NotFound(kind.endpoint().to_string())),
        }
    }
}

pub fn base_resume(id: i64) -> BaseResume {
    BaseResume {
        id,
        filename: format!("resume-{id}.pdf"),
        summary: "Backend engineer with eight years of distributed systems work".to_string(),
        skills: vec!["Rust".to_string(), "PostgreSQL".to_string()],
        experience: vec![ExperienceEntry {
            header: "Acme Corp, Senior Engineer, 2019-2024".to_string(),
            bullets: vec!["Cut checkout latency by 40%".to_string()],
        }],
        education: "BSc Computer Science".to_string(),
        certifications: String::new(),
    }
}

pub fn tailored_record(id: i64, base_id: i64) -> TailoredResumeRecord {
    TailoredResumeRecord {
        id,
        base_resume_id: Some(base_id),
        tailored_summary: Some("Rust engineer focused on low-latency services".to_string()),
        tailored_skills: Some(vec!["Rust".to_string(), "Tokio".to_string()]),
        company: Some("Initech".to_string()),
        title: Some("Staff Engineer".to_string()),
        ..Default::default()
    }
}

pub fn comparison(tailored_id: i64, base_id: i64) -> SavedComparison {
    SavedComparison {
        base_resume: base_resume(base_id),
        tailored_resume: tailored_record(tailored_id, base_id),
        job: ComparisonJob {
            company: "Initech".to_string(),
            title: "Staff Engineer".to_string(),
            url: "https://initech.test/jobs/42".to_string(),
        },
        analysis: Some(serde_json::json!({"changes": ["summary rewritten"]})),
        keywords: None,
        match_score: Some(serde_json::json!({"score": 78})),
    }
}
