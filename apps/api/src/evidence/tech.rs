use super::github::Repo;

/// Ordered keyword → technology-tag table used to infer tech from repo names
/// and descriptions.
#[derive(Debug, Clone, PartialEq)]
pub struct TechDictionary {
    hints: Vec<(String, String)>,
}

impl TechDictionary {
    pub fn new<K, T>(hints: impl IntoIterator<Item = (K, T)>) -> Self
    where
        K: Into<String>,
        T: Into<String>,
    {
        Self {
            hints: hints
                .into_iter()
                .map(|(k, t)| (k.into().to_lowercase(), t.into()))
                .collect(),
        }
    }

    /// Tags for one repo: its primary language first, then dictionary hits in
    /// table order.
    pub fn infer(&self, repo: &Repo) -> Vec<String> {
        let mut tags = Vec::new();
        if let Some(language) = repo.language.as_deref().filter(|l| !l.is_empty()) {
            push_unique(&mut tags, language.to_lowercase());
        }

        let name = repo.name.to_lowercase();
        let description = repo.description.as_deref().unwrap_or_default().to_lowercase();
        for (keyword, tag) in &self.hints {
            if name.contains(keyword.as_str()) || description.contains(keyword.as_str()) {
                push_unique(&mut tags, tag.clone());
            }
        }
        tags
    }
}

impl Default for TechDictionary {
    fn default() -> Self {
        Self::new([
            ("react", "react"),
            ("next", "nextjs"),
            ("node", "nodejs"),
            ("express", "express"),
            ("mongo", "mongodb"),
            ("firebase", "firebase"),
            ("fastapi", "fastapi"),
            ("flask", "flask"),
            ("django", "django"),
            ("sql", "sql"),
            ("ml", "ml"),
            ("tensorflow", "tensorflow"),
            ("pytorch", "pytorch"),
        ])
    }
}

/// Set-insert that keeps first-seen order.
pub(crate) fn push_unique(tags: &mut Vec<String>, tag: String) {
    if !tags.contains(&tag) {
        tags.push(tag);
    }
}
