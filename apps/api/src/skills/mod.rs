//! Skill Matcher: client for the external NLP service that extracts skills
//! from the resume and JD and scores their overlap.
//!
//! The pipeline only sees the `SkillMatcher` trait; `NlpClient` is the HTTP
//! implementation wired in at startup.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::UpstreamError;

/// Decoded `/analyze` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMatch {
    #[serde(rename = "skillsJD")]
    pub skills_jd: Vec<String>,
    pub skills_resume: Vec<String>,
    /// 0 – 100, may arrive as a float.
    pub match_score: f64,
    pub missing_skills: Vec<String>,
}

#[async_trait]
pub trait SkillMatcher: Send + Sync {
    async fn analyze(&self, resume_text: &str, jd_text: &str) -> Result<SkillMatch, UpstreamError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest<'a> {
    resume_text: &'a str,
    jd_text: &'a str,
}

#[derive(Clone)]
pub struct NlpClient {
    client: Client,
    base_url: String,
}

impl NlpClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .context("Failed to build NLP HTTP client")?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SkillMatcher for NlpClient {
    async fn analyze(&self, resume_text: &str, jd_text: &str) -> Result<SkillMatch, UpstreamError> {
        let url = format!("{}/analyze", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&AnalyzeRequest {
                resume_text,
                jd_text,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let matched: SkillMatch = serde_json::from_str(&body)
            .map_err(|e| UpstreamError::Malformed(format!("NLP /analyze response: {e}")))?;

        debug!(
            "NLP analyze succeeded: jd_skills={}, resume_skills={}, missing={}",
            matched.skills_jd.len(),
            matched.skills_resume.len(),
            matched.missing_skills.len()
        );

        Ok(matched)
    }
}
