use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::{AnalysisRecord, NewAnalysis};

/// Append-only record store for analysis runs.
///
/// Carried in `AppState` as `Arc<dyn AnalysisStore>`.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn create(&self, analysis: NewAnalysis) -> Result<AnalysisRecord, AppError>;

    /// Newest first.
    async fn list_recent(&self, limit: i64) -> Result<Vec<AnalysisRecord>, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<AnalysisRecord>, AppError>;
}

pub struct PgAnalysisStore {
    pool: PgPool,
}

impl PgAnalysisStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn create(&self, analysis: NewAnalysis) -> Result<AnalysisRecord, AppError> {
        let id = Uuid::new_v4();
        let record = sqlx::query_as::<_, AnalysisRecord>(
            r#"
            INSERT INTO analyses
                (id, resume_text, jd_text, github_url,
                 extracted_skills_jd, extracted_skills_resume, missing_skills,
                 match_score, evidence_score, readiness_score, roadmap, evidence)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&analysis.resume_text)
        .bind(&analysis.jd_text)
        .bind(&analysis.github_url)
        .bind(analysis.extracted_skills_jd.as_slice())
        .bind(analysis.extracted_skills_resume.as_slice())
        .bind(analysis.missing_skills.as_slice())
        .bind(score_column(analysis.match_score))
        .bind(score_column(analysis.evidence_score))
        .bind(score_column(analysis.readiness_score))
        .bind(Json(&analysis.roadmap))
        .bind(Json(&analysis.evidence))
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted analysis {id}");
        Ok(record)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<AnalysisRecord>, AppError> {
        Ok(sqlx::query_as::<_, AnalysisRecord>(
            "SELECT * FROM analyses ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get(&self, id: Uuid) -> Result<Option<AnalysisRecord>, AppError> {
        Ok(
            sqlx::query_as::<_, AnalysisRecord>("SELECT * FROM analyses WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }
}

/// Scores are bounded to 0–100 upstream, so the cast cannot truncate.
fn score_column(score: u32) -> i32 {
    score.min(100) as i32
}
