//! Turns the loosely-structured service response into an [`AnalysisReport`].
//!
//! Nothing here fails. Absent or mistyped fields are replaced with defaults so
//! the views never have to look at raw JSON.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::types::*;

/// Shown when the service returns no usable key terms.
pub const FALLBACK_KEY_TERMS: [&str; 6] = ["news", "analysis", "credibility", "source", "facts", "bias"];

/// Shown when the service returns no quick tips.
pub const DEFAULT_QUICK_TIPS: [&str; 4] = [
    "Check the source and its track record before sharing.",
    "Look for the same story from other reputable outlets.",
    "Read past the headline; sensational titles often mislead.",
    "Check the publication date and whether quotes are attributed.",
];

const CREDIBILITY_FIELDS: [(&str, &str); 4] = [
    ("Source Reliability", "sourceReliability"),
    ("Content Analysis", "contentScore"),
    ("Fact Verification", "factScore"),
    ("Language Analysis", "languageScore"),
];

pub fn normalize(raw: &Value) -> AnalysisReport {
    AnalysisReport {
        credibility: credibility_factors(raw),
        bias: normalize_bias(raw.get("bias")),
        sentiment: normalize_sentiment(raw.get("sentiment")),
        source_reputation: normalize_reputation(raw),
        social: normalize_social_metrics(raw.get("socialMetrics")),
        key_terms: normalize_key_terms(raw.get("keyTerms")),
        education: normalize_education(raw.get("educationalResources")),
        detection: normalize_detection(raw),
    }
}

// `value || d`: missing, non-numeric, zero and NaN all fall back.
fn or_num(v: Option<&Value>, d: f64) -> f64 {
    match v.and_then(Value::as_f64) {
        Some(n) if n != 0.0 && n.is_finite() => n,
        _ => d,
    }
}

// `typeof value === 'number' ? value : d`
fn num_or(v: Option<&Value>, d: f64) -> f64 {
    match v.and_then(Value::as_f64) {
        Some(n) if n.is_finite() => n,
        _ => d,
    }
}

fn str_or(v: Option<&Value>, d: &str) -> String {
    match v.and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => d.to_string(),
    }
}

fn strings(v: Option<&Value>) -> Vec<String> {
    v.and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn objects(v: Option<&Value>) -> impl Iterator<Item = &Map<String, Value>> {
    v.and_then(Value::as_array).into_iter().flatten().filter_map(Value::as_object)
}

fn count(v: Option<&Value>) -> u64 {
    or_num(v, 0.0).max(0.0).round() as u64
}

pub fn credibility_factors(raw: &Value) -> Vec<CredibilityFactor> {
    CREDIBILITY_FIELDS
        .iter()
        .map(|(label, key)| CredibilityFactor {
            label: (*label).to_string(),
            value: or_num(raw.get(*key), 0.0).clamp(0.0, 100.0),
        })
        .collect()
}

pub fn normalize_bias(v: Option<&Value>) -> f64 {
    or_num(v, 0.0).clamp(-100.0, 100.0)
}

pub fn normalize_sentiment(v: Option<&Value>) -> Sentiment {
    let Some(obj) = v.and_then(Value::as_object) else {
        return Sentiment::default();
    };
    Sentiment {
        positive: num_or(obj.get("positive"), 0.0),
        negative: num_or(obj.get("negative"), 0.0),
        neutral: num_or(obj.get("neutral"), 100.0),
        tone: str_or(obj.get("tone"), "neutral"),
    }
}

/// Reads `sourceReputation`; flat `sourceAccuracy` on the root is used when the
/// nested record lacks an accuracy rating.
pub fn normalize_reputation(raw: &Value) -> SourceReputation {
    let rep = raw.get("sourceReputation").and_then(Value::as_object);
    let field = |k: &str| rep.and_then(|r| r.get(k));
    let rating = |v: Option<&Value>| or_num(v, 0.0).clamp(0.0, 5.0);

    let accuracy = match field("accuracy") {
        Some(v) => rating(Some(v)),
        None => rating(raw.get("sourceAccuracy")),
    };
    SourceReputation {
        source_name: str_or(field("sourceName"), "Unknown source"),
        accuracy,
        fact_checking: rating(field("factChecking")),
        editorial_standards: rating(field("editorialStandards")),
        transparency: rating(field("transparency")),
        known_for: strings(field("knownFor")),
    }
}

pub fn normalize_social_metrics(v: Option<&Value>) -> SocialMetrics {
    let Some(obj) = v.and_then(Value::as_object) else {
        return SocialMetrics::default();
    };

    let mut platforms = Vec::new();
    for (name, metrics) in obj.iter().filter(|(k, _)| k.as_str() != "overall") {
        let Some(m) = metrics.as_object() else {
            debug!(platform = %name, "skipping non-object platform metrics");
            continue;
        };
        platforms.push(PlatformMetrics {
            platform: name.clone(),
            shares: count(m.get("shares")),
            engagement: count(m.get("engagement")),
            sentiment: or_num(m.get("sentiment"), 0.0),
            hashtags: strings(m.get("hashtags"))
                .into_iter()
                .map(|t| t.trim_start_matches('#').to_string())
                .collect(),
        });
    }

    let overall = obj.get("overall").and_then(Value::as_object).map(|o| OverallSocial {
        virality_score: or_num(o.get("viralityScore"), 50.0),
        public_interest: or_num(o.get("publicInterest"), 50.0),
        discussion_polarity: str_or(o.get("discussionPolarity"), "balanced"),
    });

    let social = SocialMetrics { platforms, overall };
    if social.is_empty() && !obj.is_empty() {
        warn!(keys = ?obj.keys().collect::<Vec<_>>(), "social metrics are not in the expected format");
    }
    social
}

pub fn normalize_key_terms(v: Option<&Value>) -> Vec<KeyTerm> {
    let terms: Vec<KeyTerm> = v
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Some(KeyTerm { text: s.clone(), value: 1.0 }),
            Value::Object(o) => match o.get("text").and_then(Value::as_str) {
                Some(t) if !t.trim().is_empty() => Some(KeyTerm {
                    text: t.to_string(),
                    value: or_num(o.get("value"), 1.0),
                }),
                _ => None,
            },
            _ => None,
        })
        .collect();

    if terms.is_empty() {
        debug!("no usable key terms; using fallback set");
        return FALLBACK_KEY_TERMS
            .iter()
            .map(|t| KeyTerm { text: (*t).to_string(), value: 1.0 })
            .collect();
    }
    terms
}

pub fn normalize_education(v: Option<&Value>) -> EducationalResources {
    let obj = v.and_then(Value::as_object);
    let field = |k: &str| obj.and_then(|o| o.get(k));

    let mut quick_tips = strings(field("quickTips"));
    if quick_tips.is_empty() {
        quick_tips = DEFAULT_QUICK_TIPS.iter().map(|t| (*t).to_string()).collect();
    }

    let guides = objects(field("guides"))
        .map(|g| Guide {
            title: str_or(g.get("title"), "Guide"),
            tips: objects(g.get("tips"))
                .map(|t| Tip {
                    title: str_or(t.get("title"), ""),
                    description: str_or(t.get("description"), ""),
                })
                .filter(|t| !t.title.is_empty() || !t.description.is_empty())
                .collect(),
        })
        .collect();

    let recommended_resources = objects(field("recommendedResources"))
        .filter_map(|r| {
            let title = str_or(r.get("title"), "");
            if title.is_empty() {
                return None;
            }
            Some(Resource {
                title,
                description: str_or(r.get("description"), ""),
                url: str_or(r.get("url"), ""),
            })
        })
        .collect();

    EducationalResources { quick_tips, guides, recommended_resources }
}

pub fn normalize_detection(raw: &Value) -> Detection {
    let d = Detection::default();

    let key_features = objects(raw.get("keyFeatures"))
        .filter_map(|f| {
            let term = f.get("term").and_then(Value::as_str)?.trim();
            if term.is_empty() {
                return None;
            }
            let effect = match f.get("effect").and_then(Value::as_str) {
                Some("CREDIBILITY") => FeatureEffect::Credibility,
                Some("SKEPTICISM") => FeatureEffect::Skepticism,
                _ => FeatureEffect::Neutral,
            };
            Some(KeyFeature {
                term: term.to_string(),
                explanation: str_or(f.get("explanation"), "Key feature in analysis"),
                effect,
            })
        })
        .take(5)
        .collect();

    let readability = match raw.get("readabilityMetrics") {
        Some(Value::Object(m)) => Some(Readability {
            readability_score: num_or(m.get("readabilityScore"), 0.0).clamp(0.0, 100.0),
            average_word_length: num_or(m.get("averageWordLength"), 0.0),
            average_sentence_length: num_or(m.get("averageSentenceLength"), 0.0),
        }),
        Some(Value::Number(n)) => n.as_f64().map(|score| Readability {
            readability_score: score.clamp(0.0, 100.0),
            ..Readability::default()
        }),
        _ => None,
    };

    let patterns = raw
        .get("patternAnalysis")
        .map(|p| objects(p.get("fakeNewsPatterns")))
        .into_iter()
        .flatten()
        .filter_map(|p| p.get("category").and_then(Value::as_str))
        .map(|c| c.replace('_', " "))
        .collect();

    Detection {
        fake_probability: num_or(raw.get("fakeProbability"), d.fake_probability).clamp(0.0, 100.0),
        is_likely_fake: raw.get("isLikelyFake").and_then(Value::as_bool).unwrap_or(d.is_likely_fake),
        confidence: num_or(raw.get("confidence"), d.confidence).clamp(0.0, 100.0),
        content_type: raw
            .get("contentType")
            .and_then(Value::as_str)
            .map(ContentType::parse)
            .unwrap_or_default(),
        key_features,
        readability,
        patterns,
        message: str_or(raw.get("message"), ""),
    }
}
