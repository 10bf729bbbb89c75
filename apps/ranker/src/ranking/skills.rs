//! Skill vocabulary and skill detection over normalized text.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ranking::normalize::{normalize, NormalizedText};

/// Built-in vocabulary. Union of every skill list the ranker has shipped with,
/// in first-seen order.
pub const DEFAULT_SKILLS: &[&str] = &[
    "python",
    "java",
    "machine learning",
    "deep learning",
    "sql",
    "aws",
    "docker",
    "tensorflow",
    "pytorch",
    "pandas",
    "numpy",
    "react",
    "fastapi",
    "kubernetes",
    "azure",
    "nlp",
    "data science",
    "flask",
    "django",
    "scikit-learn",
];

/// How a skill needle has to appear in the text to count as detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillMatchMode {
    /// Plain substring containment: "sql" matches inside "mysql".
    #[default]
    Substring,
    /// The needle must start and end on a word boundary of the normalized text.
    WordBoundary,
}

impl FromStr for SkillMatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(Self::Substring),
            "word_boundary" | "word-boundary" => Ok(Self::WordBoundary),
            other => Err(format!(
                "unknown skill match mode '{other}' (expected 'substring' or 'word_boundary')"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Skill {
    /// Reported name, as configured (lowercased).
    name: String,
    /// The name run through `normalize`, so it is comparable with normalized text.
    needle: String,
}

/// Ordered, duplicate-free set of lowercase skills. Fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillVocabulary {
    skills: Vec<Skill>,
}

impl SkillVocabulary {
    /// Builds a vocabulary, lowercasing and trimming entries. Empty entries,
    /// entries that normalize to nothing, and duplicates are dropped; first
    /// occurrence wins.
    pub fn new<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();

        for raw in skills {
            let name = raw.as_ref().trim().to_lowercase();
            let needle = normalize(&name).as_str().trim().to_string();
            if needle.is_empty() || !seen.insert(name.clone()) {
                continue;
            }
            out.push(Skill { name, needle });
        }

        Self { skills: out }
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Skill names in vocabulary order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(|s| s.name.as_str())
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_SKILLS)
    }
}

impl Serialize for SkillVocabulary {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

impl<'de> Deserialize<'de> for SkillVocabulary {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        Ok(Self::new(names))
    }
}

/// Returns every vocabulary skill found in `text`. The result is always a
/// subset of the vocabulary.
pub fn extract_skills(
    text: &NormalizedText,
    vocabulary: &SkillVocabulary,
    mode: SkillMatchMode,
) -> BTreeSet<String> {
    let haystack = text.as_str();

    vocabulary
        .skills
        .iter()
        .filter(|skill| match mode {
            SkillMatchMode::Substring => haystack.contains(&skill.needle),
            SkillMatchMode::WordBoundary => contains_word(haystack, &skill.needle),
        })
        .map(|skill| skill.name.clone())
        .collect()
}

/// Normalized text only separates words with single spaces, so a boundary is
/// either a space or an end of the string.
fn contains_word(haystack: &str, needle: &str) -> bool {
    let bytes = haystack.as_bytes();
    haystack.match_indices(needle).any(|(start, matched)| {
        let end = start + matched.len();
        let left_ok = start == 0 || bytes[start - 1] == b' ';
        let right_ok = end == bytes.len() || bytes[end] == b' ';
        left_ok && right_ok
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(skills: &[&str]) -> SkillVocabulary {
        SkillVocabulary::new(skills.iter().copied())
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detects_python_and_sql_in_sample_sentence() {
        let text = normalize("i have 5 years of experience in python and sql");
        let found = extract_skills(&text, &vocab(&["python", "sql", "docker"]), SkillMatchMode::Substring);
        assert_eq!(found, set(&["python", "sql"]));
    }

    #[test]
    fn test_multi_word_skill_detected() {
        let text = normalize("Worked on Machine Learning pipelines");
        let found = extract_skills(&text, &SkillVocabulary::default(), SkillMatchMode::Substring);
        assert!(found.contains("machine learning"));
    }

    #[test]
    fn test_substring_mode_matches_inside_longer_token() {
        let text = normalize("Built dashboards in JavaScript backed by MySQL");
        let found = extract_skills(&text, &vocab(&["java", "sql"]), SkillMatchMode::Substring);
        assert_eq!(found, set(&["java", "sql"]));
    }

    #[test]
    fn test_word_boundary_mode_rejects_partial_tokens() {
        let text = normalize("Built dashboards in JavaScript backed by MySQL");
        let found = extract_skills(&text, &vocab(&["java", "sql"]), SkillMatchMode::WordBoundary);
        assert!(found.is_empty(), "got {found:?}");
    }

    #[test]
    fn test_word_boundary_mode_accepts_whole_words_at_edges() {
        let text = normalize("SQL and deep learning, then java");
        let found = extract_skills(
            &text,
            &vocab(&["sql", "deep learning", "java"]),
            SkillMatchMode::WordBoundary,
        );
        assert_eq!(found, set(&["sql", "deep learning", "java"]));
    }

    #[test]
    fn test_word_boundary_finds_later_whole_occurrence() {
        // first hit is inside "mysql", the second one stands alone
        let text = normalize("mysql then sql");
        let found = extract_skills(&text, &vocab(&["sql"]), SkillMatchMode::WordBoundary);
        assert_eq!(found, set(&["sql"]));
    }

    #[test]
    fn test_punctuated_skill_matches_normalized_text() {
        let text = normalize("Models in scikit-learn and pandas");
        let found = extract_skills(&text, &SkillVocabulary::default(), SkillMatchMode::Substring);
        assert!(found.contains("scikit-learn"));
        assert!(found.contains("pandas"));
    }

    #[test]
    fn test_empty_text_detects_nothing() {
        let found = extract_skills(&normalize(""), &SkillVocabulary::default(), SkillMatchMode::Substring);
        assert!(found.is_empty());
    }

    #[test]
    fn test_result_is_subset_of_vocabulary() {
        let v = SkillVocabulary::default();
        let texts = [
            "python java sql aws docker react",
            "machine learning engineer with pytorch and tensorflow",
            "no skills here",
            "mysqldockerpythonic",
        ];
        for t in texts {
            for mode in [SkillMatchMode::Substring, SkillMatchMode::WordBoundary] {
                for skill in extract_skills(&normalize(t), &v, mode) {
                    assert!(v.names().any(|n| n == skill), "{skill} not in vocabulary");
                }
            }
        }
    }

    #[test]
    fn test_vocabulary_dedups_and_lowercases() {
        let v = vocab(&["Python", "python", " SQL ", "", "++"]);
        assert_eq!(v.names().collect::<Vec<_>>(), vec!["python", "sql"]);
    }

    #[test]
    fn test_default_vocabulary_has_no_duplicates() {
        let v = SkillVocabulary::default();
        assert_eq!(v.len(), DEFAULT_SKILLS.len());
    }

    #[test]
    fn test_match_mode_parses() {
        assert_eq!("substring".parse::<SkillMatchMode>().unwrap(), SkillMatchMode::Substring);
        assert_eq!(
            "Word_Boundary".parse::<SkillMatchMode>().unwrap(),
            SkillMatchMode::WordBoundary
        );
        assert!("fuzzy".parse::<SkillMatchMode>().is_err());
    }

    #[test]
    fn test_vocabulary_serializes_as_name_list() {
        let json = serde_json::to_value(vocab(&["python", "sql"])).unwrap();
        assert_eq!(json, serde_json::json!(["python", "sql"]));
    }
}
