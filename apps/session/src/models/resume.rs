use serde::{Deserialize, Serialize};

/// One experience block: a header line ("Role, Company, Dates") plus its bullets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub header: String,
    pub bullets: Vec<String>,
}

/// The untailored resume the user picked as the source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseResume {
    pub id: i64,
    pub filename: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: String,
    pub certifications: String,
}

/// The AI-produced variant of a `BaseResume`, in the shape the workspace works with.
///
/// The `tailored_*` aliases accept the backend's field names so a record copied
/// verbatim from an API payload still deserializes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TailoredResume {
    pub id: i64,
    pub base_resume_id: i64,
    #[serde(alias = "tailored_summary")]
    pub summary: String,
    #[serde(alias = "tailored_skills")]
    pub skills: Vec<String>,
    #[serde(alias = "tailored_experience")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(alias = "tailored_education")]
    pub education: String,
    #[serde(alias = "tailored_certifications")]
    pub certifications: String,
    pub alignment_statement: String,
    pub quality_score: Option<f64>,
    pub docx_path: Option<String>,
    pub company: String,
    pub title: String,
}

/// Raw tailored-resume record as returned by `GET /api/tailor/tailored/{id}`.
/// Every content field may be missing; see `into_tailored`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TailoredResumeRecord {
    pub id: i64,
    #[serde(default)]
    pub base_resume_id: Option<i64>,
    #[serde(default)]
    pub tailored_summary: Option<String>,
    #[serde(default)]
    pub tailored_skills: Option<Vec<String>>,
    #[serde(default)]
    pub tailored_experience: Option<Vec<ExperienceEntry>>,
    #[serde(default)]
    pub tailored_education: Option<String>,
    #[serde(default)]
    pub tailored_certifications: Option<String>,
    #[serde(default)]
    pub alignment_statement: Option<String>,
    #[serde(default)]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub docx_path: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl TailoredResumeRecord {
    /// Rebuilds a `TailoredResume`, defaulting absent arrays and strings to empty.
    pub fn into_tailored(self) -> TailoredResume {
        TailoredResume {
            id: self.id,
            base_resume_id: self.base_resume_id.unwrap_or_default(),
            summary: self.tailored_summary.unwrap_or_default(),
            skills: self.tailored_skills.unwrap_or_default(),
            experience: self.tailored_experience.unwrap_or_default(),
            education: self.tailored_education.unwrap_or_default(),
            certifications: self.tailored_certifications.unwrap_or_default(),
            alignment_statement: self.alignment_statement.unwrap_or_default(),
            quality_score: self.quality_score,
            docx_path: self.docx_path,
            company: self.company.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
        }
    }
}
