/// Topic bucket a missing skill is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Dsa,
    Backend,
    Frontend,
    Devops,
    Ml,
    Misc,
}

/// Ordered bucket → keyword phrases. The first bucket with a keyword contained
/// in the skill wins; no hit means `Misc`.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketDictionary {
    buckets: Vec<(Bucket, Vec<String>)>,
}

impl BucketDictionary {
    pub fn new<K: Into<String>>(
        buckets: impl IntoIterator<Item = (Bucket, Vec<K>)>,
    ) -> Self {
        Self {
            buckets: buckets
                .into_iter()
                .map(|(bucket, keywords)| {
                    (
                        bucket,
                        keywords.into_iter().map(|k| k.into().to_lowercase()).collect(),
                    )
                })
                .collect(),
        }
    }

    pub fn classify(&self, skill: &str) -> Bucket {
        let skill = skill.to_lowercase();
        self.buckets
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| skill.contains(k.as_str())))
            .map(|(bucket, _)| *bucket)
            .unwrap_or(Bucket::Misc)
    }
}

impl Default for BucketDictionary {
    fn default() -> Self {
        Self::new([
            (
                Bucket::Dsa,
                vec![
                    "arrays",
                    "strings",
                    "hashmap",
                    "two pointers",
                    "stack",
                    "queue",
                    "binary search",
                    "recursion",
                    "dp",
                    "graphs",
                ],
            ),
            (
                Bucket::Backend,
                vec![
                    "node.js",
                    "express",
                    "rest api",
                    "jwt",
                    "authentication",
                    "mongodb",
                    "sql",
                    "redis",
                ],
            ),
            (
                Bucket::Frontend,
                vec!["react", "html", "css", "tailwind", "typescript", "redux"],
            ),
            (Bucket::Devops, vec!["docker", "ci/cd", "aws", "deployment"]),
            (Bucket::Ml, vec!["python", "ml", "nlp", "pytorch", "tensorflow"]),
        ])
    }
}

/// Skills grouped by bucket, each group in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketedSkills {
    pub dsa: Vec<String>,
    pub backend: Vec<String>,
    pub frontend: Vec<String>,
    pub devops: Vec<String>,
    pub ml: Vec<String>,
    pub misc: Vec<String>,
}

impl BucketedSkills {
    pub fn push(&mut self, bucket: Bucket, skill: String) {
        match bucket {
            Bucket::Dsa => self.dsa.push(skill),
            Bucket::Backend => self.backend.push(skill),
            Bucket::Frontend => self.frontend.push(skill),
            Bucket::Devops => self.devops.push(skill),
            Bucket::Ml => self.ml.push(skill),
            Bucket::Misc => self.misc.push(skill),
        }
    }
}
