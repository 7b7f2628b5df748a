// src/scoring.rs
//! Keyword scorer and tier classifier: config types, TOML loading, and the
//! pure scoring function the pipeline runs on every fresh item.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

// --- env defaults & names ---
pub const DEFAULT_KEYWORDS_PATH: &str = "config/keywords.toml";

pub const ENV_KEYWORDS_PATH: &str = "SENTINEL_KEYWORDS_PATH";
pub const ENV_THRESHOLD_LOW: &str = "SENTINEL_THRESHOLD_LOW";
pub const ENV_THRESHOLD_HIGH: &str = "SENTINEL_THRESHOLD_HIGH";

/// Disposition of an item after scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    /// Not relevant enough; no further action.
    Drop,
    /// Forward the raw item without consulting the judge.
    Raw,
    /// Consult the LLM judge; forward only on a relevant verdict.
    Escalate,
}

/// Result of scoring one text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub score: f32,
    /// Names of the categories that matched, sorted for determinism.
    pub matched: Vec<String>,
}

/* ----------------------------
Config schema (from TOML)
---------------------------- */

#[derive(Debug, Clone, Deserialize)]
pub struct KeywordRoot {
    pub scoring: ScoringSection,
    pub categories: HashMap<String, CategoryCfg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSection {
    pub threshold_low: f32,
    pub threshold_high: f32,
    /// Optional global cap applied after summing category weights.
    #[serde(default)]
    pub max_score: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCfg {
    pub weight: f32,
    pub keywords: Vec<String>,
}

/* ----------------------------
Scorer
---------------------------- */

/// Immutable keyword table + thresholds, loaded once at startup.
#[derive(Debug)]
pub struct KeywordScorer {
    cfg: KeywordRoot,
    // (category, weight, lowercased keywords), sorted by category name so
    // iteration order never depends on HashMap internals.
    compiled: Vec<(String, f32, Vec<String>)>,
}

impl KeywordScorer {
    /// Load from a TOML file. Uses SENTINEL_KEYWORDS_PATH or defaults to
    /// "config/keywords.toml". Env threshold overrides apply on top.
    pub fn from_toml() -> anyhow::Result<Self> {
        let path = std::env::var(ENV_KEYWORDS_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_KEYWORDS_PATH));

        let content = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read keyword config at {}: {}", path.display(), e)
        })?;

        let mut scorer = Self::from_toml_str(&content)?;

        if let Some(low) = parse_threshold_env(std::env::var(ENV_THRESHOLD_LOW).ok()) {
            scorer.cfg.scoring.threshold_low = low;
        }
        if let Some(high) = parse_threshold_env(std::env::var(ENV_THRESHOLD_HIGH).ok()) {
            scorer.cfg.scoring.threshold_high = high;
        }
        scorer.validate()?;
        Ok(scorer)
    }

    /// Load from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let cfg: KeywordRoot = toml::from_str(toml_str)?;

        let mut compiled: Vec<(String, f32, Vec<String>)> = cfg
            .categories
            .iter()
            .map(|(name, c)| {
                let kws = c
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect::<Vec<_>>();
                (name.clone(), c.weight, kws)
            })
            .collect();
        compiled.sort_by(|a, b| a.0.cmp(&b.0));

        let scorer = Self { cfg, compiled };
        scorer.validate()?;
        Ok(scorer)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let s = &self.cfg.scoring;
        if !(s.threshold_low.is_finite() && s.threshold_high.is_finite()) {
            anyhow::bail!("thresholds must be finite");
        }
        if s.threshold_low >= s.threshold_high {
            anyhow::bail!(
                "threshold_low ({}) must be below threshold_high ({})",
                s.threshold_low,
                s.threshold_high
            );
        }
        for (name, w, kws) in &self.compiled {
            if *w < 0.0 {
                anyhow::bail!("category `{}` has a negative weight", name);
            }
            if kws.is_empty() {
                anyhow::bail!("category `{}` has no usable keywords", name);
            }
        }
        Ok(())
    }

    pub fn thresholds(&self) -> (f32, f32) {
        (
            self.cfg.scoring.threshold_low,
            self.cfg.scoring.threshold_high,
        )
    }

    /// Score a text: case-insensitive substring match, each category counted
    /// at most once no matter how many of its keywords occur. Pure; no I/O.
    pub fn score(&self, text: &str) -> ScoreBreakdown {
        if text.trim().is_empty() {
            return ScoreBreakdown::default();
        }
        let haystack = text.to_lowercase();

        let mut score = 0.0f32;
        let mut matched = Vec::new();
        for (name, weight, keywords) in &self.compiled {
            if keywords.iter().any(|k| haystack.contains(k.as_str())) {
                score += weight;
                matched.push(name.clone());
            }
        }
        if let Some(cap) = self.cfg.scoring.max_score {
            score = score.min(cap);
        }
        ScoreBreakdown { score, matched }
    }

    /// Map a score onto a tier against the configured `(low, high)` pair.
    pub fn classify(&self, score: f32) -> Tier {
        let (low, high) = self.thresholds();
        if score >= high {
            Tier::Escalate
        } else if score >= low {
            Tier::Raw
        } else {
            Tier::Drop
        }
    }
}

// parse optional float env, reject non-finite values
fn parse_threshold_env(raw: Option<String>) -> Option<f32> {
    raw.and_then(|s| s.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
}

/* ----------------------------
Tests
---------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TOML: &str = r#"
[scoring]
threshold_low = 5.0
threshold_high = 8.0
max_score = 10.0

[categories.macro]
weight = 5.0
keywords = ["interest rates", "inflation"]

[categories.indices]
weight = 4.0
keywords = ["dow jones", "nasdaq"]

[categories.crypto]
weight = 1.0
keywords = ["dogecoin"]
"#;

    fn scorer() -> KeywordScorer {
        KeywordScorer::from_toml_str(TEST_TOML).expect("load test config")
    }

    #[test]
    fn empty_text_scores_zero_and_drops() {
        let s = scorer();
        let bk = s.score("   ");
        assert_eq!(bk.score, 0.0);
        assert!(bk.matched.is_empty());
        assert_eq!(s.classify(bk.score), Tier::Drop);
    }

    #[test]
    fn category_counts_once_regardless_of_keyword_hits() {
        let s = scorer();
        // Both macro keywords occur; the category still contributes 5, not 10.
        let bk = s.score("Fed raises interest rates amid inflation fears");
        assert_eq!(bk.score, 5.0);
        assert_eq!(bk.matched, vec!["macro".to_string()]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let s = scorer();
        let bk = s.score("DOW JONES rallies; DOGECOIN follows");
        assert_eq!(bk.score, 5.0);
        assert_eq!(bk.matched, vec!["crypto".to_string(), "indices".to_string()]);
    }

    #[test]
    fn score_is_deterministic() {
        let s = scorer();
        let text = "Inflation data pushes the Dow Jones and Dogecoin higher";
        let a = s.score(text);
        for _ in 0..20 {
            assert_eq!(s.score(text), a);
        }
    }

    #[test]
    fn max_score_caps_the_sum() {
        let s = scorer();
        // macro 5 + indices 4 + crypto 1 = 10, capped at 10 anyway; widen the
        // cap check with a tighter config.
        let tight = KeywordScorer::from_toml_str(
            r#"
[scoring]
threshold_low = 1.0
threshold_high = 2.0
max_score = 6.0

[categories.a]
weight = 5.0
keywords = ["alpha"]

[categories.b]
weight = 4.0
keywords = ["beta"]
"#,
        )
        .unwrap();
        assert_eq!(tight.score("alpha beta").score, 6.0);
    }

    #[test]
    fn tier_boundaries_are_inclusive_low_and_high() {
        let s = scorer();
        assert_eq!(s.classify(4.999), Tier::Drop);
        assert_eq!(s.classify(5.0), Tier::Raw);
        assert_eq!(s.classify(7.999), Tier::Raw);
        assert_eq!(s.classify(8.0), Tier::Escalate);
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let bad = r#"
[scoring]
threshold_low = 8.0
threshold_high = 5.0

[categories.a]
weight = 1.0
keywords = ["x"]
"#;
        assert!(KeywordScorer::from_toml_str(bad).is_err());
    }

    #[test]
    fn empty_category_is_rejected() {
        let bad = r#"
[scoring]
threshold_low = 1.0
threshold_high = 2.0

[categories.a]
weight = 1.0
keywords = ["  "]
"#;
        assert!(KeywordScorer::from_toml_str(bad).is_err());
    }
}
