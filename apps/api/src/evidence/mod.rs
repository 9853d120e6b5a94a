//! GitHub Evidence Miner: correlates target skills with a candidate's public
//! repositories and turns the result into an explainable 0–100 score.
//!
//! Score = min(40, round(repos / 2)) + min(60, matched_skills * 6), capped at 100.

pub mod github;
pub mod tech;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::UpstreamError;
use github::{extract_username, GithubClient, Repo};
use tech::{push_unique, TechDictionary};

/// Repos examined for tech inference (most recently updated first).
const INFERENCE_WINDOW: usize = 20;
const MAX_INFERRED_TECH: usize = 15;
const MAX_REPOS_PER_SKILL: usize = 5;

const MAX_REPO_POINTS: u32 = 40;
const MAX_EVIDENCE_POINTS: u32 = 60;
const POINTS_PER_SKILL: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEvidence {
    pub skill: String,
    pub repos: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceReport {
    pub repo_count: u32,
    pub inferred_tech: Vec<String>,
    pub matched_skill_evidence: Vec<SkillEvidence>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evidence {
    pub score: u32,
    pub report: EvidenceReport,
}

pub struct EvidenceMiner {
    github: GithubClient,
    dictionary: TechDictionary,
}

impl EvidenceMiner {
    pub fn new(github: GithubClient, dictionary: TechDictionary) -> Self {
        Self { github, dictionary }
    }

    /// Mines evidence for `target_skills` from the profile at `profile_ref`.
    ///
    /// An empty or unusable profile reference yields zero evidence without a
    /// network call. A failed repository fetch is returned as an error.
    pub async fn mine(
        &self,
        profile_ref: &str,
        target_skills: &[String],
    ) -> Result<Evidence, UpstreamError> {
        let Some(username) = extract_username(profile_ref) else {
            info!("No usable GitHub profile supplied, skipping evidence mining");
            return Ok(Evidence::default());
        };

        let repos = self.github.list_repos(&username).await?;
        let evidence = evaluate(&repos, target_skills, &self.dictionary);
        info!(
            "GitHub evidence for {username}: repos={}, matched_skills={}, score={}",
            evidence.report.repo_count,
            evidence.report.matched_skill_evidence.len(),
            evidence.score
        );
        Ok(evidence)
    }
}

/// Builds the evidence report and score from an already-fetched repo list.
pub fn evaluate(repos: &[Repo], target_skills: &[String], dictionary: &TechDictionary) -> Evidence {
    let mut inferred_tech = Vec::new();
    for repo in repos.iter().take(INFERENCE_WINDOW) {
        for tag in dictionary.infer(repo) {
            push_unique(&mut inferred_tech, tag);
        }
    }
    inferred_tech.truncate(MAX_INFERRED_TECH);

    let matched_skill_evidence = match_skills(repos, target_skills);
    let repo_count = u32::try_from(repos.len()).unwrap_or(u32::MAX);
    let score = evidence_score(repo_count, matched_skill_evidence.len());

    Evidence {
        score,
        report: EvidenceReport {
            repo_count,
            inferred_tech,
            matched_skill_evidence,
        },
    }
}

fn match_skills(repos: &[Repo], target_skills: &[String]) -> Vec<SkillEvidence> {
    let blobs: Vec<String> = repos
        .iter()
        .map(|r| {
            format!(
                "{} {} {}",
                r.name,
                r.description.as_deref().unwrap_or_default(),
                r.language.as_deref().unwrap_or_default()
            )
            .to_lowercase()
        })
        .collect();

    target_skills
        .iter()
        .map(|s| s.to_lowercase())
        .filter(|s| !s.trim().is_empty())
        .filter_map(|skill| {
            let matched: Vec<String> = repos
                .iter()
                .zip(&blobs)
                .filter(|(_, blob)| blob.contains(skill.as_str()))
                .take(MAX_REPOS_PER_SKILL)
                .map(|(repo, _)| repo.name.clone())
                .collect();
            (!matched.is_empty()).then_some(SkillEvidence {
                skill,
                repos: matched,
            })
        })
        .collect()
}

/// Every 2 repos earn 1 point (max 40); every matched skill earns 6 (max 60).
pub fn evidence_score(repo_count: u32, matched_skill_count: usize) -> u32 {
    let repo_points = (repo_count.saturating_add(1) / 2).min(MAX_REPO_POINTS);
    let matched = u32::try_from(matched_skill_count).unwrap_or(u32::MAX);
    let evidence_points = matched
        .saturating_mul(POINTS_PER_SKILL)
        .min(MAX_EVIDENCE_POINTS);
    (repo_points + evidence_points).min(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo(name: &str, description: Option<&str>, language: Option<&str>) -> Repo {
        Repo {
            name: name.to_string(),
            description: description.map(String::from),
            language: language.map(String::from),
        }
    }

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_score_examples() {
        assert_eq!(evidence_score(80, 0), 40);
        assert_eq!(evidence_score(0, 10), 60);
        assert_eq!(evidence_score(0, 0), 0);
        // round(3 / 2) = 2
        assert_eq!(evidence_score(3, 0), 2);
        assert_eq!(evidence_score(1, 0), 1);
        assert_eq!(evidence_score(500, 50), 100);
    }

    #[test]
    fn test_score_is_monotonic_and_bounded() {
        for matched in 0..15 {
            let mut prev = 0;
            for repos in 0..120 {
                let s = evidence_score(repos, matched);
                assert!(s >= prev, "repos={repos} matched={matched}");
                assert!(s <= 100);
                prev = s;
            }
        }
        for repos in 0..120 {
            let mut prev = 0;
            for matched in 0..15 {
                let s = evidence_score(repos, matched);
                assert!(s >= prev, "repos={repos} matched={matched}");
                prev = s;
            }
        }
    }

    #[test]
    fn test_skill_matches_name_description_and_language() {
        let repos = vec![
            repo("chat-app", Some("Realtime chat with React"), Some("JavaScript")),
            repo("api", Some("REST service"), Some("Python")),
            repo("dotfiles", None, None),
        ];
        let evidence = evaluate(
            &repos,
            &skills(&["React", "python", "rust"]),
            &TechDictionary::default(),
        );
        assert_eq!(
            evidence.report.matched_skill_evidence,
            vec![
                SkillEvidence {
                    skill: "react".to_string(),
                    repos: vec!["chat-app".to_string()],
                },
                SkillEvidence {
                    skill: "python".to_string(),
                    repos: vec!["api".to_string()],
                },
            ]
        );
        // 3 repos → 2 points, 2 skills → 12 points
        assert_eq!(evidence.score, 14);
    }

    #[test]
    fn test_matched_repos_capped_at_five_in_fetch_order() {
        let repos: Vec<Repo> = (0..8)
            .map(|i| repo(&format!("sql-drill-{i}"), None, None))
            .collect();
        let evidence = evaluate(&repos, &skills(&["sql"]), &TechDictionary::default());
        let matched = &evidence.report.matched_skill_evidence[0];
        assert_eq!(
            matched.repos,
            vec!["sql-drill-0", "sql-drill-1", "sql-drill-2", "sql-drill-3", "sql-drill-4"]
        );
    }

    #[test]
    fn test_inference_window_and_cap() {
        let languages = [
            "Rust", "Go", "C", "C++", "Java", "Kotlin", "Swift", "Ruby", "PHP", "Perl", "Lua",
            "Haskell", "OCaml", "Elixir", "Erlang", "Scala", "Dart", "Zig", "Nim", "Julia",
            "Fortran",
        ];
        let repos: Vec<Repo> = languages
            .iter()
            .enumerate()
            .map(|(i, l)| repo(&format!("r{i}"), None, Some(l)))
            .collect();
        let evidence = evaluate(&repos, &[], &TechDictionary::default());
        assert_eq!(evidence.report.repo_count, 21);
        assert_eq!(evidence.report.inferred_tech.len(), 15);
        assert_eq!(evidence.report.inferred_tech[0], "rust");
        assert_eq!(evidence.report.inferred_tech[14], "erlang");
        assert!(!evidence.report.inferred_tech.contains(&"scala".to_string()));
        assert!(!evidence.report.inferred_tech.contains(&"fortran".to_string()));
    }

    #[test]
    fn test_inferred_tech_deduplicates_across_repos() {
        let repos = vec![
            repo("react-todo", None, Some("JavaScript")),
            repo("react-blog", None, Some("JavaScript")),
        ];
        let evidence = evaluate(&repos, &[], &TechDictionary::default());
        assert_eq!(evidence.report.inferred_tech, vec!["javascript", "react"]);
    }

    #[test]
    fn test_blank_target_skills_earn_no_evidence() {
        let repos = vec![repo("todo-app", Some("react"), Some("JavaScript"))];
        let evidence = evaluate(&repos, &skills(&["", "  ", "react"]), &TechDictionary::default());
        let matched: Vec<&str> = evidence
            .report
            .matched_skill_evidence
            .iter()
            .map(|e| e.skill.as_str())
            .collect();
        assert_eq!(matched, vec!["react"]);
        // 1 repo → 1 point, 1 skill → 6 points
        assert_eq!(evidence.score, 7);
    }

    fn miner(base: &str) -> EvidenceMiner {
        let github = GithubClient::new(base, None, Duration::from_secs(5)).unwrap();
        EvidenceMiner::new(github, TechDictionary::default())
    }

    #[tokio::test]
    async fn test_blank_profile_yields_zero_without_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let miner = miner(&server.uri());
        for profile in ["", "   ", "https://github.com/"] {
            let evidence = miner.mine(profile, &skills(&["react"])).await.unwrap();
            assert_eq!(evidence.score, 0);
            assert_eq!(evidence.report, EvidenceReport::default());
        }
    }

    #[tokio::test]
    async fn test_mine_fetches_and_scores() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/alice/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "node-express-api", "description": "JWT auth demo", "language": "JavaScript"},
                {"name": "ml-notebooks", "description": null, "language": "Jupyter Notebook"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let evidence = miner(&server.uri())
            .mine("https://github.com/alice/", &skills(&["express", "jwt", "docker"]))
            .await
            .unwrap();
        assert_eq!(evidence.report.repo_count, 2);
        assert_eq!(
            evidence.report.inferred_tech,
            vec!["javascript", "nodejs", "express", "jupyter notebook", "ml"]
        );
        assert_eq!(evidence.report.matched_skill_evidence.len(), 2);
        // 2 repos → 1 point, 2 skills → 12 points
        assert_eq!(evidence.score, 13);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/alice/repos"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = miner(&server.uri())
            .mine("alice", &skills(&["react"]))
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Api { status: 500, .. }));
    }
}
