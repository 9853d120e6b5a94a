//! Roadmap Builder: files missing skills into topic buckets and lays out a
//! fixed four-week plan.
//!
//! Week 1 covers DSA, week 2 backend, week 3 frontend, week 4 is always the
//! project/deployment week. DevOps and ML buckets are computed but no week
//! surfaces them yet.

pub mod buckets;

use serde::{Deserialize, Serialize};

pub use buckets::{Bucket, BucketDictionary, BucketedSkills};

/// Only the head of the missing-skill list is planned for.
const MAX_PLANNED_SKILLS: usize = 12;
const WEEKS: u8 = 4;

const FALLBACK_FOCUS: &str = "Core improvements";
const FALLBACK_TASK: &str = "Pick 2 missing skills and create a mini-project proving them.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekPlan {
    pub week: u8,
    pub focus: Vec<String>,
    pub tasks: Vec<String>,
}

impl WeekPlan {
    fn empty(week: u8) -> Self {
        Self {
            week,
            focus: Vec::new(),
            tasks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoadmapBuilder {
    dictionary: BucketDictionary,
}

impl RoadmapBuilder {
    pub fn new(dictionary: BucketDictionary) -> Self {
        Self { dictionary }
    }

    /// Buckets the first 12 missing skills, preserving input order per bucket.
    pub fn bucketize(&self, missing_skills: &[String]) -> BucketedSkills {
        let mut bucketed = BucketedSkills::default();
        for skill in missing_skills.iter().take(MAX_PLANNED_SKILLS) {
            bucketed.push(self.dictionary.classify(skill), skill.clone());
        }
        bucketed
    }

    /// Always returns exactly four weeks, each with at least one focus and task.
    pub fn build(&self, missing_skills: &[String]) -> Vec<WeekPlan> {
        let buckets = self.bucketize(missing_skills);
        let mut plan: Vec<WeekPlan> = (1..=WEEKS).map(WeekPlan::empty).collect();

        if !buckets.dsa.is_empty() {
            plan[0].focus.push("DSA fundamentals".to_string());
            plan[0]
                .tasks
                .push(format!("Solve 25 problems on: {}", head(&buckets.dsa, 5)));
        }

        if !buckets.backend.is_empty() {
            plan[1].focus.push("Backend core".to_string());
            plan[1]
                .tasks
                .push(format!("Build APIs for: {}", head(&buckets.backend, 4)));
            plan[1]
                .tasks
                .push("Implement JWT auth + role-based access".to_string());
        }

        if !buckets.frontend.is_empty() {
            plan[2].focus.push("Frontend + state".to_string());
            plan[2]
                .tasks
                .push(format!("Build UI modules for: {}", head(&buckets.frontend, 4)));
            plan[2]
                .tasks
                .push("Add forms + validation + loading/error states".to_string());
        }

        plan[3].focus.push("Project + deployment".to_string());
        plan[3]
            .tasks
            .push("Deploy frontend (Vercel) + backend (Render) + MongoDB Atlas".to_string());
        plan[3]
            .tasks
            .push("Write strong README + add screenshots + record 2-min demo video".to_string());

        for week in &mut plan {
            if week.focus.is_empty() {
                week.focus.push(FALLBACK_FOCUS.to_string());
            }
            if week.tasks.is_empty() {
                week.tasks.push(FALLBACK_TASK.to_string());
            }
        }

        plan
    }
}

fn head(skills: &[String], n: usize) -> String {
    skills
        .iter()
        .take(n)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
