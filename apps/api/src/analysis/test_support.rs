//! In-memory doubles for the store and skill matcher.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use crate::analysis::history::HistoryCache;
use crate::analysis::pipeline::AnalysisPipeline;
use crate::analysis::store::AnalysisStore;
use crate::errors::{AppError, UpstreamError};
use crate::evidence::github::GithubClient;
use crate::evidence::tech::TechDictionary;
use crate::evidence::EvidenceMiner;
use crate::models::analysis::{AnalysisRecord, NewAnalysis};
use crate::roadmap::RoadmapBuilder;
use crate::skills::{SkillMatch, SkillMatcher};

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<AnalysisRecord>>,
    fail_reads: bool,
    slow_first_read: Option<Duration>,
    first_read_done: AtomicBool,
}

impl MemoryStore {
    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    /// The first `list_recent` takes its snapshot, then stalls for `delay`.
    pub fn with_slow_first_read(mut self, delay: Duration) -> Self {
        self.slow_first_read = Some(delay);
        self
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    async fn create(&self, analysis: NewAnalysis) -> Result<AnalysisRecord, AppError> {
        let now = Utc::now();
        let record = AnalysisRecord {
            id: Uuid::new_v4(),
            resume_text: analysis.resume_text,
            jd_text: analysis.jd_text,
            github_url: analysis.github_url,
            extracted_skills_jd: analysis.extracted_skills_jd,
            extracted_skills_resume: analysis.extracted_skills_resume,
            missing_skills: analysis.missing_skills,
            match_score: analysis.match_score as i32,
            evidence_score: analysis.evidence_score as i32,
            readiness_score: analysis.readiness_score as i32,
            roadmap: Json(analysis.roadmap),
            evidence: Json(analysis.evidence),
            created_at: now,
            updated_at: now,
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<AnalysisRecord>, AppError> {
        if self.fail_reads {
            return Err(AppError::Internal(anyhow::anyhow!("store offline")));
        }
        let records: Vec<AnalysisRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect();
        if let Some(delay) = self.slow_first_read {
            if !self.first_read_done.swap(true, Ordering::SeqCst) {
                tokio::time::sleep(delay).await;
            }
        }
        Ok(records)
    }

    async fn get(&self, id: Uuid) -> Result<Option<AnalysisRecord>, AppError> {
        if self.fail_reads {
            return Err(AppError::Internal(anyhow::anyhow!("store offline")));
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }
}

pub struct StubMatcher {
    response: Option<SkillMatch>,
    calls: AtomicUsize,
    last_resume: Mutex<Option<String>>,
}

impl StubMatcher {
    pub fn ok(response: SkillMatch) -> Self {
        Self {
            response: Some(response),
            calls: AtomicUsize::new(0),
            last_resume: Mutex::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: None,
            calls: AtomicUsize::new(0),
            last_resume: Mutex::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_resume(&self) -> Option<String> {
        self.last_resume.lock().unwrap().clone()
    }
}

#[async_trait]
impl SkillMatcher for StubMatcher {
    async fn analyze(&self, resume_text: &str, _jd_text: &str) -> Result<SkillMatch, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_resume.lock().unwrap() = Some(resume_text.to_string());
        self.response.clone().ok_or_else(|| UpstreamError::Api {
            status: 500,
            message: "nlp service down".to_string(),
        })
    }
}

pub fn skill_match(jd: &[&str], resume: &[&str], score: f64, missing: &[&str]) -> SkillMatch {
    let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    SkillMatch {
        skills_jd: owned(jd),
        skills_resume: owned(resume),
        match_score: score,
        missing_skills: owned(missing),
    }
}

pub fn pipeline_with_history(
    matcher: Arc<dyn SkillMatcher>,
    store: Arc<dyn AnalysisStore>,
    github_api: &str,
    history: HistoryCache,
) -> AnalysisPipeline {
    let github = GithubClient::new(github_api, None, Duration::from_secs(5)).unwrap();
    AnalysisPipeline::new(
        matcher,
        EvidenceMiner::new(github, TechDictionary::default()),
        RoadmapBuilder::default(),
        store,
        history,
    )
}

pub fn pipeline(
    matcher: Arc<dyn SkillMatcher>,
    store: Arc<dyn AnalysisStore>,
    github_api: &str,
) -> AnalysisPipeline {
    pipeline_with_history(matcher, store, github_api, HistoryCache::default())
}
