//! Mood scoring.
//!
//! A place's mood score (0 = chill, 100 = hype) is built from:
//! 1. A baseline: the mean prior of the place's mapped types
//! 2. A busy-ness nudge from the real-time crowd signal, when present
//! 3. A sentiment adjustment of up to `sentiment_weight` points from the review
//! 4. A keyword adjustment from the dominant vocabulary, capped at `keyword_cap`
//!
//! The sum is clamped to [0, 100] and rounded; the label follows from the score.
//! Every number here lives in `MoodConfig` so it can be tuned without code changes.

use futures::stream::{self, StreamExt};
use place_data::{Candidate, ScoredCandidate};
use sentiment_client::{Sentiment, SentimentAnalyzer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Default cap on concurrent sentiment calls per batch
pub const DEFAULT_SENTIMENT_CONCURRENCY: usize = 4;

/// Tunable scoring data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MoodConfig {
    /// Upstream place type -> baseline score
    pub type_priors: HashMap<String, u8>,
    /// Baseline when none of a place's types are mapped
    pub default_prior: u8,
    /// Points added at sentiment score +1.0 (and removed at -1.0)
    pub sentiment_weight: f64,
    /// Points per unit of busy-ness above (or below) 50
    pub busyness_weight: f64,
    /// Points per matched keyword in the dominant vocabulary
    pub keyword_weight: f64,
    /// Maximum absolute keyword contribution
    pub keyword_cap: f64,
    pub hype_keywords: Vec<String>,
    pub chill_keywords: Vec<String>,
    pub neutral_keywords: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for MoodConfig {
    fn default() -> Self {
        let type_priors = [
            ("night_club", 90),
            ("karaoke", 85),
            ("stadium", 85),
            ("amusement_park", 80),
            ("bar", 75),
            ("bowling_alley", 70),
            ("gym", 65),
            ("tourist_attraction", 55),
            ("restaurant", 55),
            ("meal_takeaway", 50),
            ("zoo", 50),
            ("movie_theater", 45),
            ("aquarium", 40),
            ("cafe", 35),
            ("bakery", 35),
            ("museum", 30),
            ("art_gallery", 30),
            ("book_store", 25),
            ("park", 20),
            ("church", 15),
            ("spa", 10),
            ("library", 10),
        ]
        .into_iter()
        .map(|(t, score)| (t.to_string(), score))
        .collect();

        Self {
            type_priors,
            default_prior: 50,
            sentiment_weight: 15.0,
            busyness_weight: 0.2,
            keyword_weight: 7.0,
            keyword_cap: 20.0,
            hype_keywords: words(&[
                "party", "lively", "loud", "dance", "dj", "live music", "energetic", "crowded",
                "vibrant", "nightlife", "rooftop", "karaoke", "festive", "buzzing", "wild",
            ]),
            chill_keywords: words(&[
                "quiet", "cozy", "calm", "relaxing", "peaceful", "serene", "chill", "laid back",
                "intimate", "tranquil", "garden", "reading", "slow",
            ]),
            neutral_keywords: words(&["casual", "family", "friendly", "classic", "local", "simple"]),
        }
    }
}

/// How a score was put together
#[derive(Debug, Clone, PartialEq)]
pub struct MoodBreakdown {
    pub baseline: f64,
    pub busyness: f64,
    /// `None` when no review was scored or sentiment was unavailable
    pub sentiment: Option<f64>,
    pub keywords: f64,
    pub hype_matches: usize,
    pub chill_matches: usize,
    pub neutral_matches: usize,
    pub score: u8,
}

/// Compatibility of a mood score with the requested mood, 0-100
pub fn compatibility(mood_score: u8, target: u8) -> u8 {
    100u8.saturating_sub(mood_score.abs_diff(target))
}

/// Lowercase alphanumeric word tokens
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Occurrences of each keyword (single or multi-word) in `tokens`
fn count_matches(tokens: &[String], keywords: &[String]) -> usize {
    keywords
        .iter()
        .map(|keyword| {
            let needle = tokenize(keyword);
            if needle.is_empty() || needle.len() > tokens.len() {
                return 0;
            }
            tokens
                .windows(needle.len())
                .filter(|window| *window == needle.as_slice())
                .count()
        })
        .sum()
}

/// Scores candidates for mood, optionally consulting a sentiment service.
#[derive(Clone)]
pub struct MoodScorer {
    config: MoodConfig,
    sentiment: Option<Arc<dyn SentimentAnalyzer>>,
    concurrency: usize,
}

impl MoodScorer {
    pub fn new(config: MoodConfig) -> Self {
        Self {
            config,
            sentiment: None,
            concurrency: DEFAULT_SENTIMENT_CONCURRENCY,
        }
    }

    /// Use `analyzer` for review sentiment
    pub fn with_sentiment(mut self, analyzer: Arc<dyn SentimentAnalyzer>) -> Self {
        self.sentiment = Some(analyzer);
        self
    }

    /// Configure the sentiment fan-out cap (default: 4, minimum 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn config(&self) -> &MoodConfig {
        &self.config
    }

    /// Score one candidate. `review` is analyzed for sentiment when a
    /// sentiment service is configured.
    pub async fn score(&self, candidate: &Candidate, review: Option<&str>) -> ScoredCandidate {
        let breakdown = self.explain(candidate, review).await;
        ScoredCandidate::new(candidate.clone(), breakdown.score)
    }

    /// Same as `score`, returning the component breakdown
    pub async fn explain(&self, candidate: &Candidate, review: Option<&str>) -> MoodBreakdown {
        let sentiment = self.sentiment_for(&candidate.id, review).await;
        self.compose(candidate, review, sentiment)
    }

    /// Score many candidates, running sentiment calls concurrently up to the
    /// configured cap. Output order matches input order. Each candidate's own
    /// `review` field is the review text.
    pub async fn score_batch(&self, candidates: Vec<Candidate>) -> Vec<ScoredCandidate> {
        debug!(
            "Scoring {} candidates (sentiment concurrency {})",
            candidates.len(),
            self.concurrency
        );
        stream::iter(candidates.into_iter().map(|candidate| async move {
            let sentiment = self
                .sentiment_for(&candidate.id, candidate.review.as_deref())
                .await;
            let breakdown = self.compose(&candidate, candidate.review.as_deref(), sentiment);
            ScoredCandidate::new(candidate, breakdown.score)
        }))
        .buffered(self.concurrency)
        .collect()
        .await
    }

    async fn sentiment_for(&self, place_id: &str, review: Option<&str>) -> Option<Sentiment> {
        let analyzer = self.sentiment.as_ref()?;
        let review = review.map(str::trim).filter(|r| !r.is_empty())?;

        match analyzer.analyze(review).await {
            Ok(sentiment) => Some(sentiment),
            Err(e) => {
                warn!("Sentiment unavailable for {}, using baseline and keywords: {}", place_id, e);
                None
            }
        }
    }

    /// Deterministic scoring given an already-fetched sentiment
    pub fn compose(
        &self,
        candidate: &Candidate,
        review: Option<&str>,
        sentiment: Option<Sentiment>,
    ) -> MoodBreakdown {
        let baseline = self.baseline(candidate);
        let busyness = candidate
            .busyness
            .map(|b| (f64::from(b.min(100)) - 50.0) * self.config.busyness_weight)
            .unwrap_or(0.0);
        let sentiment =
            sentiment.map(|s| f64::from(s.score.clamp(-1.0, 1.0)) * self.config.sentiment_weight);

        let before_keywords = baseline + busyness + sentiment.unwrap_or(0.0);

        let mut tokens = tokenize(&candidate.name);
        for text in [candidate.description.as_deref(), review].into_iter().flatten() {
            tokens.extend(tokenize(text));
        }
        let hype = count_matches(&tokens, &self.config.hype_keywords);
        let chill = count_matches(&tokens, &self.config.chill_keywords);
        let neutral = count_matches(&tokens, &self.config.neutral_keywords);
        let keywords = self.keyword_adjustment(hype, chill, neutral, before_keywords);

        let score = (before_keywords + keywords).clamp(0.0, 100.0).round() as u8;

        MoodBreakdown {
            baseline,
            busyness,
            sentiment,
            keywords,
            hype_matches: hype,
            chill_matches: chill,
            neutral_matches: neutral,
            score,
        }
    }

    fn baseline(&self, candidate: &Candidate) -> f64 {
        let priors: Vec<f64> = candidate
            .types
            .iter()
            .filter_map(|t| self.config.type_priors.get(t))
            .map(|&p| f64::from(p.min(100)))
            .collect();

        if priors.is_empty() {
            f64::from(self.config.default_prior.min(100))
        } else {
            priors.iter().sum::<f64>() / priors.len() as f64
        }
    }

    /// Only the dominant vocabulary counts. Hype pushes up, chill pushes down,
    /// neutral (or an even hype/chill split) pulls toward 50 without crossing it.
    fn keyword_adjustment(&self, hype: usize, chill: usize, neutral: usize, current: f64) -> f64 {
        let cap = self.config.keyword_cap.abs();
        let nudge = |count: usize| (count as f64 * self.config.keyword_weight).min(cap);

        if hype > chill && hype >= neutral {
            nudge(hype)
        } else if chill > hype && chill >= neutral {
            -nudge(chill)
        } else {
            let pull = nudge(neutral);
            let gap = 50.0 - current;
            pull.min(gap.abs()).copysign(gap)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use place_data::{GeoPoint, MoodLabel};
    use sentiment_client::SentimentError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedSentiment(f32);

    #[async_trait]
    impl SentimentAnalyzer for FixedSentiment {
        async fn analyze(&self, _text: &str) -> Result<Sentiment, SentimentError> {
            Ok(Sentiment::new(self.0, 1.0))
        }
    }

    struct FailingSentiment(AtomicUsize);

    #[async_trait]
    impl SentimentAnalyzer for FailingSentiment {
        async fn analyze(&self, _text: &str) -> Result<Sentiment, SentimentError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(SentimentError::Request("unavailable".into()))
        }
    }

    fn place(id: &str, types: &[&str]) -> Candidate {
        Candidate::new(id, "Plain Place", GeoPoint::new(14.55, 121.02)).with_types(types.iter().copied())
    }

    /// Config whose only prior maps "blank" to 0
    fn zero_baseline_config() -> MoodConfig {
        MoodConfig {
            type_priors: HashMap::from([("blank".to_string(), 0)]),
            ..MoodConfig::default()
        }
    }

    #[tokio::test]
    async fn test_baseline_priors() {
        let scorer = MoodScorer::new(MoodConfig::default());

        let club = scorer.score(&place("c", &["night_club"]), None).await;
        assert_eq!(club.mood_score, 90);
        assert_eq!(club.mood_label, MoodLabel::Hype);

        let library = scorer.score(&place("l", &["library"]), None).await;
        assert_eq!(library.mood_label, MoodLabel::Chill);

        // Mean of mapped types; unmapped ones are ignored
        let mixed = scorer.score(&place("m", &["bar", "cafe", "point_of_interest"]), None).await;
        assert_eq!(mixed.mood_score, 55);

        let unknown = scorer.score(&place("u", &["point_of_interest"]), None).await;
        assert_eq!(unknown.mood_score, 50);
        assert_eq!(unknown.mood_label, MoodLabel::Neutral);
    }

    #[tokio::test]
    async fn test_sentiment_adjustment() {
        let positive = MoodScorer::new(MoodConfig::default()).with_sentiment(Arc::new(FixedSentiment(1.0)));
        let negative = MoodScorer::new(MoodConfig::default()).with_sentiment(Arc::new(FixedSentiment(-0.5)));
        let candidate = place("r", &["restaurant"]);

        assert_eq!(positive.score(&candidate, Some("great")).await.mood_score, 70);
        assert_eq!(negative.score(&candidate, Some("meh")).await.mood_score, 48);
        // No review, no sentiment call
        assert_eq!(positive.score(&candidate, None).await.mood_score, 55);
    }

    #[tokio::test]
    async fn test_sentiment_failure_falls_back() {
        let failing = Arc::new(FailingSentiment(AtomicUsize::new(0)));
        let scorer = MoodScorer::new(MoodConfig::default()).with_sentiment(failing.clone());

        let breakdown = scorer.explain(&place("r", &["restaurant"]), Some("some review")).await;
        assert_eq!(breakdown.sentiment, None);
        assert_eq!(breakdown.score, 55);
        assert_eq!(failing.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hype_keywords_raise_score() {
        let scorer = MoodScorer::new(MoodConfig::default());
        let plain = place("a", &["restaurant"]);
        let lively = plain
            .clone()
            .with_description("A lively rooftop with a DJ every weekend");

        let plain_score = scorer.score(&plain, None).await.mood_score;
        let lively_score = scorer.score(&lively, None).await.mood_score;
        assert!(lively_score > plain_score);
    }

    #[tokio::test]
    async fn test_keyword_contribution_is_capped() {
        let scorer = MoodScorer::new(zero_baseline_config());
        let quiet = place("q", &["blank"]);
        let loud = place("l", &["blank"])
            .with_description("party party party dance dance lively loud vibrant buzzing festive");

        assert_eq!(scorer.score(&quiet, None).await.mood_score, 0);
        let loud_score = scorer.score(&loud, None).await.mood_score;
        assert_eq!(loud_score, 20);

        let breakdown = scorer.explain(&loud, None).await;
        assert_eq!(breakdown.keywords, 20.0);
        assert!(breakdown.hype_matches >= 10);
    }

    #[tokio::test]
    async fn test_three_hype_keywords_vs_none() {
        let scorer = MoodScorer::new(zero_baseline_config());
        let none = place("n", &["blank"]);
        let three = place("t", &["blank"]).with_description("party, karaoke and nightlife");

        let none_score = scorer.score(&none, None).await.mood_score;
        let three_score = scorer.score(&three, None).await.mood_score;
        assert!(three_score > none_score);
        assert!(three_score <= 20);
    }

    #[tokio::test]
    async fn test_chill_and_neutral_keywords() {
        let scorer = MoodScorer::new(MoodConfig::default());

        let cozy = place("c", &["restaurant"]).with_description("quiet and cozy");
        assert_eq!(scorer.score(&cozy, None).await.mood_score, 41);

        // Neutral pulls toward 50 without overshooting
        let family = place("f", &["bar"]).with_description("casual family friendly spot");
        assert_eq!(scorer.score(&family, None).await.mood_score, 54);

        let near_mid = place("m", &["restaurant"]).with_description("casual family friendly spot");
        assert_eq!(scorer.score(&near_mid, None).await.mood_score, 50);
    }

    #[tokio::test]
    async fn test_multi_word_keywords() {
        let scorer = MoodScorer::new(MoodConfig::default());
        let breakdown = scorer
            .explain(&place("p", &["bar"]).with_description("Live-music nights"), None)
            .await;
        assert_eq!(breakdown.hype_matches, 1);
    }

    #[tokio::test]
    async fn test_score_always_clamped() {
        let config = MoodConfig {
            sentiment_weight: 500.0,
            busyness_weight: 10.0,
            ..MoodConfig::default()
        };
        let up = MoodScorer::new(config.clone()).with_sentiment(Arc::new(FixedSentiment(1.0)));
        let down = MoodScorer::new(config).with_sentiment(Arc::new(FixedSentiment(-1.0)));

        let packed = place("p", &["night_club"]).with_busyness(100).with_description("party party");
        assert_eq!(up.score(&packed, Some("best party ever")).await.mood_score, 100);

        let empty = place("e", &["library"]).with_busyness(0).with_description("quiet quiet");
        assert_eq!(down.score(&empty, Some("dead")).await.mood_score, 0);
    }

    #[tokio::test]
    async fn test_busyness_nudge() {
        let scorer = MoodScorer::new(MoodConfig::default());
        let busy = place("b", &["restaurant"]).with_busyness(100);
        let empty = place("e", &["restaurant"]).with_busyness(0);

        assert_eq!(scorer.score(&busy, None).await.mood_score, 65);
        assert_eq!(scorer.score(&empty, None).await.mood_score, 45);
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let scorer = MoodScorer::new(MoodConfig::default())
            .with_sentiment(Arc::new(FixedSentiment(0.0)))
            .with_concurrency(2);
        let batch: Vec<Candidate> = ["night_club", "library", "cafe", "bar", "park"]
            .iter()
            .enumerate()
            .map(|(i, t)| place(&format!("p{}", i), &[*t]).with_review("fine"))
            .collect();

        let scored = scorer.score_batch(batch).await;
        let ids: Vec<&str> = scored.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["p0", "p1", "p2", "p3", "p4"]);
        assert_eq!(scored[0].mood_score, 90);
        assert_eq!(scored[1].mood_score, 10);
    }

    #[test]
    fn test_compatibility() {
        assert_eq!(compatibility(40, 40), 100);
        assert_eq!(compatibility(0, 100), 0);
        assert_eq!(compatibility(70, 50), 80);
    }

    #[test]
    fn test_config_partial_json() {
        let config: MoodConfig = serde_json::from_str(r#"{ "keywordCap": 10, "defaultPrior": 40 }"#).unwrap();
        assert_eq!(config.keyword_cap, 10.0);
        assert_eq!(config.default_prior, 40);
        assert_eq!(config.sentiment_weight, 15.0);
        assert!(config.type_priors.contains_key("night_club"));
    }
}
