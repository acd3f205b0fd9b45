//! Plain-text cards for the terminal, and the JSON envelope used by `--json`.

use serde::Serialize;
use std::fmt::Write as _;

use crate::scoring::{self, BiasLeaning, Verdict};
use crate::types::*;

pub const NO_SOCIAL_DATA: &str = "No Social Media Data Available";

const BAR_WIDTH: usize = 20;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct JsonErr<'a> {
    pub ok: bool,
    pub error: &'a str,
}

#[derive(Serialize)]
pub struct ReportOut<'a> {
    pub summary: scoring::Summary,
    pub report: &'a AnalysisReport,
}

pub fn to_json(report: &AnalysisReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonOut {
        ok: true,
        data: ReportOut { summary: scoring::summarize(report), report },
    })
}

pub fn error_json(message: &str) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonErr { ok: false, error: message })
}

pub fn bar(value: f64, max: f64) -> String {
    let filled = if max > 0.0 {
        ((value / max).clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn stars(rating: f64) -> String {
    let full = rating.round().clamp(0.0, 5.0) as usize;
    format!("{}{}", "★".repeat(full), "☆".repeat(5 - full))
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n== {title} ==");
}

pub fn credibility_card(out: &mut String, factors: &[CredibilityFactor]) {
    heading(out, "Credibility Breakdown");
    for f in factors {
        let _ = writeln!(out, "{:<20} {} {:>3.0}%", f.label, bar(f.value, 100.0), f.value);
    }
    let _ = writeln!(out, "Overall Score: {}%", scoring::overall_credibility(factors));
}

pub fn bias_card(out: &mut String, bias: f64) {
    heading(out, "Political Bias Compass");
    let leaning = BiasLeaning::from_score(bias);
    // -100..100 laid out on a 21-cell line, needle at the score
    let pos = (((bias + 100.0) / 200.0) * 20.0).round() as usize;
    let line: String = (0..=20).map(|i| if i == pos { '▲' } else { '─' }).collect();
    let _ = writeln!(out, "L {line} R");
    let _ = writeln!(out, "{} ({:+.0}, {:.0}°)", leaning.label(), bias, scoring::bias_angle(bias));
}

pub fn sentiment_card(out: &mut String, s: &Sentiment) {
    heading(out, "Sentiment Analysis");
    for (name, value) in [("Positive", s.positive), ("Negative", s.negative), ("Neutral", s.neutral)] {
        let _ = writeln!(out, "{:<9} {} {:>3.0}%", name, bar(value, 100.0), value);
    }
    let _ = writeln!(out, "Overall Tone: {}", scoring::dominant_sentiment(s).to_uppercase());
    if s.tone != "neutral" {
        let _ = writeln!(out, "Reported tone: {}", s.tone);
    }
}

pub fn reputation_card(out: &mut String, rep: &SourceReputation) {
    heading(out, "Source Reputation Analysis");
    let _ = writeln!(out, "{}", rep.source_name);
    for (label, v) in [
        ("Historical Accuracy", rep.accuracy),
        ("Fact-Checking Score", rep.fact_checking),
        ("Editorial Standards", rep.editorial_standards),
        ("Transparency", rep.transparency),
    ] {
        let _ = writeln!(out, "{:<20} {}", label, stars(v));
    }
    let _ = writeln!(out, "Overall Reputation Score: {}%", scoring::reputation_percent(rep));
    if !rep.known_for.is_empty() {
        let _ = writeln!(out, "Known For: {}", rep.known_for.join(", "));
    }
}

pub fn key_terms_card(out: &mut String, terms: &[KeyTerm]) {
    heading(out, "Key Terms Analysis");
    let max = terms.iter().map(|t| t.value).fold(0.0, f64::max);
    for t in terms {
        let _ = writeln!(out, "{:<20} {}", t.text, bar(t.value, max));
    }
}

pub fn social_card(out: &mut String, social: &SocialMetrics) {
    heading(out, "Social Media Impact");
    if social.is_empty() {
        let _ = writeln!(out, "{NO_SOCIAL_DATA}");
        return;
    }
    for p in &social.platforms {
        let _ = writeln!(
            out,
            "{:<10} shares {:>8}  engagement {:>8}  sentiment {:>3.0}%",
            p.platform, p.shares, p.engagement, p.sentiment
        );
        if !p.hashtags.is_empty() {
            let tags: Vec<String> = p.hashtags.iter().map(|h| format!("#{h}")).collect();
            let _ = writeln!(out, "{:<10} {}", "", tags.join(" "));
        }
    }
    if let Some(o) = &social.overall {
        let _ = writeln!(
            out,
            "Virality {:.0}  Public interest {:.0}  Discussion {}",
            o.virality_score, o.public_interest, o.discussion_polarity
        );
    }
}

pub fn detection_card(out: &mut String, d: &Detection) {
    heading(out, "AI-Powered Detection Results");
    let verdict = Verdict::from_probability(d.fake_probability);
    let _ = writeln!(out, "{}", verdict.label());
    if !d.message.is_empty() {
        let _ = writeln!(out, "{}", d.message);
    }
    let _ = writeln!(out, "Content Type: {}", d.content_type.label());
    let _ = writeln!(out, "Misleading Score {:.0}%  Model Confidence {:.0}%", d.fake_probability, d.confidence);
    if let Some(r) = &d.readability {
        let _ = writeln!(
            out,
            "Readability {:.0} ({})  avg word {:.1}  avg sentence {:.1}",
            r.readability_score,
            scoring::readability_level(r.readability_score),
            r.average_word_length,
            r.average_sentence_length
        );
    }
    for f in &d.key_features {
        let mark = match f.effect {
            FeatureEffect::Credibility => '+',
            FeatureEffect::Skepticism => '!',
            FeatureEffect::Neutral => '-',
        };
        let _ = writeln!(out, " {mark} {}: {}", f.term, f.explanation);
    }
    if !d.patterns.is_empty() {
        let _ = writeln!(out, "Detected Patterns of Concern: {}", d.patterns.join(", "));
    }
}

pub fn education_card(out: &mut String, e: &EducationalResources) {
    heading(out, "Fact-Checking Education");
    for tip in &e.quick_tips {
        let _ = writeln!(out, " * {tip}");
    }
    for g in &e.guides {
        let _ = writeln!(out, "{}", g.title);
        for t in &g.tips {
            let _ = writeln!(out, "   - {}: {}", t.title, t.description);
        }
    }
    for r in &e.recommended_resources {
        let _ = writeln!(out, " > {} {}", r.title, r.url);
    }
}

pub fn report_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    detection_card(&mut out, &report.detection);
    credibility_card(&mut out, &report.credibility);
    bias_card(&mut out, report.bias);
    sentiment_card(&mut out, &report.sentiment);
    reputation_card(&mut out, &report.source_reputation);
    key_terms_card(&mut out, &report.key_terms);
    social_card(&mut out, &report.social);
    education_card(&mut out, &report.education);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use serde_json::json;

    #[test]
    fn bar_is_fixed_width() {
        assert_eq!(bar(50.0, 100.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(250.0, 100.0), "█".repeat(BAR_WIDTH));
        assert_eq!(bar(3.0, 0.0), "░".repeat(BAR_WIDTH));
    }

    #[test]
    fn empty_response_renders_every_card() {
        let text = report_text(&normalize(&json!({})));
        assert!(text.contains("Overall Score: 0%"));
        assert!(text.contains("Overall Tone: NEUTRAL"));
        assert!(text.contains(NO_SOCIAL_DATA));
        assert!(text.contains("Unknown source"));
        assert!(text.contains("credibility"));
    }

    #[test]
    fn json_envelope_carries_summary() {
        let report = normalize(&json!({"sourceReliability": 90, "contentScore": 70}));
        let v: serde_json::Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();
        assert_eq!(v["ok"], true);
        assert_eq!(v["data"]["summary"]["overall_credibility"], 40);
        assert_eq!(v["data"]["report"]["sentiment"]["neutral"], 100.0);
    }
}
