use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::evidence::EvidenceReport;
use crate::roadmap::WeekPlan;

/// One persisted analysis run. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub resume_text: String,
    pub jd_text: String,
    pub github_url: String,
    #[serde(rename = "extractedSkillsJD")]
    pub extracted_skills_jd: Vec<String>,
    pub extracted_skills_resume: Vec<String>,
    pub missing_skills: Vec<String>,
    pub match_score: i32,
    pub evidence_score: i32,
    pub readiness_score: i32,
    pub roadmap: Json<Vec<WeekPlan>>,
    pub evidence: Json<EvidenceReport>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fully assembled analysis, ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnalysis {
    pub resume_text: String,
    pub jd_text: String,
    pub github_url: String,
    pub extracted_skills_jd: Vec<String>,
    pub extracted_skills_resume: Vec<String>,
    pub missing_skills: Vec<String>,
    pub match_score: u32,
    pub evidence_score: u32,
    pub readiness_score: u32,
    pub roadmap: Vec<WeekPlan>,
    pub evidence: EvidenceReport,
}
