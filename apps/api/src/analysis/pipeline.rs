//! Analysis Orchestrator: runs one resume/JD analysis end to end.
//!
//! Flow: validate JD → resolve resume text (upload or plain text) →
//!       skill matching → GitHub evidence → readiness score → roadmap →
//!       persist → background history refresh.
//!
//! Nothing is written unless every step succeeds.

use std::sync::Arc;

use tracing::info;

use crate::analysis::history::HistoryCache;
use crate::analysis::store::AnalysisStore;
use crate::errors::{AppError, UpstreamError};
use crate::evidence::EvidenceMiner;
use crate::extraction::{extract, StagedDocument};
use crate::models::analysis::{AnalysisRecord, NewAnalysis};
use crate::roadmap::RoadmapBuilder;
use crate::skills::{SkillMatch, SkillMatcher};

/// Inputs for one run. An uploaded document takes precedence over
/// `resume_text`; its staged file is released when the input is dropped.
#[derive(Debug, Default)]
pub struct AnalysisInput {
    pub jd_text: Option<String>,
    pub resume_text: Option<String>,
    pub resume_file: Option<StagedDocument>,
    pub github_url: Option<String>,
}

pub struct AnalysisPipeline {
    matcher: Arc<dyn SkillMatcher>,
    miner: EvidenceMiner,
    roadmap: RoadmapBuilder,
    store: Arc<dyn AnalysisStore>,
    history: HistoryCache,
}

impl AnalysisPipeline {
    pub fn new(
        matcher: Arc<dyn SkillMatcher>,
        miner: EvidenceMiner,
        roadmap: RoadmapBuilder,
        store: Arc<dyn AnalysisStore>,
        history: HistoryCache,
    ) -> Self {
        Self {
            matcher,
            miner,
            roadmap,
            store,
            history,
        }
    }

    pub async fn run(&self, input: AnalysisInput) -> Result<AnalysisRecord, AppError> {
        let AnalysisInput {
            jd_text,
            resume_text,
            resume_file,
            github_url,
        } = input;

        // Step 1: JD is mandatory
        let jd_text = jd_text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::MissingInput("jdText is required".to_string()))?;

        // Step 2: resume text, preferring the upload
        let resume_text = match resume_file {
            Some(document) => {
                info!("Extracting resume from {} upload", document.media_type());
                extract(&document).await?
            }
            None => resume_text.unwrap_or_default(),
        };
        if resume_text.trim().is_empty() {
            return Err(AppError::MissingInput(
                "Upload a resume file OR provide resumeText".to_string(),
            ));
        }
        info!(
            "Resolved inputs: resume_chars={}, jd_chars={}",
            resume_text.len(),
            jd_text.len()
        );

        // Step 3: external skill matching
        let matched = self.matcher.analyze(&resume_text, &jd_text).await?;
        let match_score = validated_match_score(&matched)?;
        info!(
            "Skill match: score={match_score}, missing={}",
            matched.missing_skills.len()
        );

        // Step 4: GitHub evidence for the JD skills
        let github_url = github_url.map(|u| u.trim().to_string()).unwrap_or_default();
        let evidence = self
            .miner
            .mine(&github_url, &matched.skills_jd)
            .await?;

        // Step 5: readiness
        let readiness_score = readiness_score(match_score, evidence.score);

        // Step 6: roadmap
        let roadmap = self.roadmap.build(&matched.missing_skills);

        // Step 7: persist
        let record = self
            .store
            .create(NewAnalysis {
                resume_text,
                jd_text,
                github_url,
                extracted_skills_jd: matched.skills_jd,
                extracted_skills_resume: matched.skills_resume,
                missing_skills: matched.missing_skills,
                match_score,
                evidence_score: evidence.score,
                readiness_score,
                roadmap,
                evidence: evidence.report,
            })
            .await?;
        info!(
            "Analysis {} stored: match={}, evidence={}, readiness={}",
            record.id, record.match_score, record.evidence_score, record.readiness_score
        );

        // Step 8: best-effort, does not delay the response
        self.history.spawn_refresh(Arc::clone(&self.store));

        Ok(record)
    }
}

/// round(0.6 * match + 0.4 * evidence), computed in integers.
pub fn readiness_score(match_score: u32, evidence_score: u32) -> u32 {
    (6 * match_score + 4 * evidence_score + 5) / 10
}

fn validated_match_score(matched: &SkillMatch) -> Result<u32, UpstreamError> {
    let score = matched.match_score;
    if !score.is_finite() || !(0.0..=100.0).contains(&score) {
        return Err(UpstreamError::Malformed(format!(
            "matchScore {score} is outside 0–100"
        )));
    }
    Ok(score.round() as u32)
}
