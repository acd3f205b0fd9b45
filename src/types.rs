use serde::{Deserialize, Serialize};
use std::fmt;

/// Which single field of the request is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Url,
    Title,
    Content,
}

impl InputMode {
    pub const ALL: [InputMode; 3] = [InputMode::Url, InputMode::Title, InputMode::Content];

    pub fn label(self) -> &'static str {
        match self {
            InputMode::Url => "URL",
            InputMode::Title => "Title",
            InputMode::Content => "Content",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            InputMode::Url => "https://example.com/news-article",
            InputMode::Title => "Enter the news title",
            InputMode::Content => "Enter the news content",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InputMode::Url => "url",
            InputMode::Title => "title",
            InputMode::Content => "content",
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("please enter a {0} to analyze")]
    Empty(InputMode),
}

/// Wire body of `POST /analyze`. Exactly one field is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub url: String,
    pub title: String,
    pub content: String,
}

impl AnalysisRequest {
    pub fn new(mode: InputMode, text: &str) -> Result<Self, InputError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(InputError::Empty(mode));
        }
        let pick = |m: InputMode| if m == mode { text.to_string() } else { String::new() };
        Ok(Self {
            url: pick(InputMode::Url),
            title: pick(InputMode::Title),
            content: pick(InputMode::Content),
        })
    }

    /// First field with non-blank text, in url, title, content order.
    pub fn mode(&self) -> InputMode {
        if !self.url.trim().is_empty() {
            InputMode::Url
        } else if !self.title.trim().is_empty() {
            InputMode::Title
        } else {
            InputMode::Content
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CredibilityFactor {
    pub label: String,
    pub value: f64, // 0..=100
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sentiment {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub tone: String,
}

impl Default for Sentiment {
    fn default() -> Self {
        Self { positive: 0.0, negative: 0.0, neutral: 100.0, tone: "neutral".into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReputation {
    pub source_name: String,
    pub accuracy: f64, // star ratings, 0..=5
    pub fact_checking: f64,
    pub editorial_standards: f64,
    pub transparency: f64,
    pub known_for: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformMetrics {
    pub platform: String,
    pub shares: u64,
    pub engagement: u64,
    pub sentiment: f64,
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallSocial {
    pub virality_score: f64,
    pub public_interest: f64,
    pub discussion_polarity: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SocialMetrics {
    pub platforms: Vec<PlatformMetrics>,
    pub overall: Option<OverallSocial>,
}

impl SocialMetrics {
    /// Nothing worth rendering; views show a "no data" state.
    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty() && self.overall.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyTerm {
    pub text: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tip {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Guide {
    pub title: String,
    pub tips: Vec<Tip>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub title: String,
    pub description: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EducationalResources {
    pub quick_tips: Vec<String>,
    pub guides: Vec<Guide>,
    pub recommended_resources: Vec<Resource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    News,
    Opinion,
    Satire,
    PotentialSatire,
    Clickbait,
    #[default]
    Unknown,
}

impl ContentType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "NEWS" => ContentType::News,
            "OPINION" => ContentType::Opinion,
            "SATIRE" => ContentType::Satire,
            "POTENTIAL_SATIRE" => ContentType::PotentialSatire,
            "CLICKBAIT" => ContentType::Clickbait,
            _ => ContentType::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentType::News => "News Article",
            ContentType::Opinion => "Opinion Piece",
            ContentType::Satire => "Satire",
            ContentType::PotentialSatire => "Likely Satire",
            ContentType::Clickbait => "Clickbait",
            ContentType::Unknown => "Unknown Type",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureEffect {
    Credibility,
    Skepticism,
    #[default]
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyFeature {
    pub term: String,
    pub explanation: String,
    pub effect: FeatureEffect,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Readability {
    pub readability_score: f64,
    pub average_word_length: f64,
    pub average_sentence_length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub fake_probability: f64,
    pub is_likely_fake: bool,
    pub confidence: f64,
    pub content_type: ContentType,
    pub key_features: Vec<KeyFeature>, // at most 5
    pub readability: Option<Readability>,
    pub patterns: Vec<String>,
    pub message: String,
}

impl Default for Detection {
    fn default() -> Self {
        Self {
            fake_probability: 50.0,
            is_likely_fake: false,
            confidence: 50.0,
            content_type: ContentType::Unknown,
            key_features: Vec::new(),
            readability: None,
            patterns: Vec::new(),
            message: String::new(),
        }
    }
}

/// The service response after normalization: every field populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub credibility: Vec<CredibilityFactor>,
    pub bias: f64, // -100..=100
    pub sentiment: Sentiment,
    pub source_reputation: SourceReputation,
    pub social: SocialMetrics,
    pub key_terms: Vec<KeyTerm>,
    pub education: EducationalResources,
    pub detection: Detection,
}
