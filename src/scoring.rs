use crate::types::*;
use serde::Serialize;

/// Rounded mean of the factor values; 0 with no factors.
pub fn overall_credibility(factors: &[CredibilityFactor]) -> u32 {
    if factors.is_empty() {
        return 0;
    }
    let sum: f64 = factors.iter().map(|f| f.value).sum();
    (sum / factors.len() as f64).round() as u32
}

/// Mean of the four star ratings scaled to a percentage.
pub fn reputation_percent(rep: &SourceReputation) -> u32 {
    let mean = (rep.accuracy + rep.fact_checking + rep.editorial_standards + rep.transparency) / 4.0;
    (mean * 20.0).round() as u32
}

/// Largest of positive/negative/neutral. Ties keep the earlier one.
pub fn dominant_sentiment(s: &Sentiment) -> &'static str {
    let mut best = ("neutral", 0.0);
    for (name, value) in [("positive", s.positive), ("negative", s.negative), ("neutral", s.neutral)] {
        if value > best.1 {
            best = (name, value);
        }
    }
    best.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BiasLeaning {
    Left,
    CenterLeft,
    Center,
    CenterRight,
    Right,
}

impl BiasLeaning {
    pub fn from_score(bias: f64) -> Self {
        match bias {
            b if b <= -60.0 => BiasLeaning::Left,
            b if b <= -20.0 => BiasLeaning::CenterLeft,
            b if b < 20.0 => BiasLeaning::Center,
            b if b < 60.0 => BiasLeaning::CenterRight,
            _ => BiasLeaning::Right,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BiasLeaning::Left => "Left",
            BiasLeaning::CenterLeft => "Center-Left",
            BiasLeaning::Center => "Center",
            BiasLeaning::CenterRight => "Center-Right",
            BiasLeaning::Right => "Right",
        }
    }
}

/// Needle angle on the compass: -100..100 maps to -180..180 degrees.
pub fn bias_angle(bias: f64) -> f64 {
    bias / 100.0 * 180.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    PotentiallyMisleading,
    ExerciseCaution,
    LikelyCredible,
}

impl Verdict {
    pub fn from_probability(p: f64) -> Self {
        if p >= 70.0 {
            Verdict::PotentiallyMisleading
        } else if p >= 40.0 {
            Verdict::ExerciseCaution
        } else {
            Verdict::LikelyCredible
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::PotentiallyMisleading => "Potentially Misleading",
            Verdict::ExerciseCaution => "Exercise Caution",
            Verdict::LikelyCredible => "Likely Credible",
        }
    }
}

pub fn readability_level(score: f64) -> &'static str {
    if score >= 80.0 {
        "Academic/Professional"
    } else if score >= 60.0 {
        "Advanced"
    } else if score >= 40.0 {
        "Moderate"
    } else if score >= 20.0 {
        "Easy"
    } else {
        "Very Easy"
    }
}

/// Derived numbers shown next to the report, serialized with `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub overall_credibility: u32,
    pub reputation_percent: u32,
    pub dominant_sentiment: &'static str,
    pub bias_leaning: BiasLeaning,
    pub verdict: Verdict,
}

pub fn summarize(report: &AnalysisReport) -> Summary {
    Summary {
        overall_credibility: overall_credibility(&report.credibility),
        reputation_percent: reputation_percent(&report.source_reputation),
        dominant_sentiment: dominant_sentiment(&report.sentiment),
        bias_leaning: BiasLeaning::from_score(report.bias),
        verdict: Verdict::from_probability(report.detection.fake_probability),
    }
}
