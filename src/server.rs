// src/server.rs
use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::gateway::{AnalysisError, Analyzer, FALLBACK_ERROR};
use crate::normalize::normalize;
use crate::render::{stars, JsonErr, JsonOut, ReportOut, NO_SOCIAL_DATA};
use crate::scoring::{self, BiasLeaning, Verdict};
use crate::session::{Session, SessionError, Status};
use crate::theme::Theme;
use crate::types::*;

pub struct AppState {
    pub analyzer: Arc<dyn Analyzer>,
    pub session: Mutex<Session>,
    pub theme: Theme,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(analyzer: Arc<dyn Analyzer>, theme: Theme) -> SharedState {
        Arc::new(Self { analyzer, session: Mutex::new(Session::new()), theme })
    }
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/analyze", get(analyzer_view).post(analyzer_submit))
        .route("/api/analyze", post(api_analyze))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(state: SharedState, addr: &str) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "serving analyzer views");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

// ---- pages ----

struct NavLink {
    href: &'static str,
    label: &'static str,
    active: bool,
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{{ title }} · NewsLens</title>
    <style>
      {{ css|safe }}
      body { margin: 0; background: var(--bg); color: var(--text); font-family: var(--font); }
      nav { display: flex; gap: 1.5rem; padding: 1rem 2rem; border-bottom: 1px solid var(--primary); }
      nav a { color: var(--muted); text-decoration: none; }
      nav a.active { color: var(--primary); font-weight: bold; }
      main { max-width: 1100px; margin: 0 auto; padding: 2rem; }
      .card { background: var(--paper); border-radius: 12px; padding: 1rem 1.5rem; margin-top: 1.5rem; }
      .grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap: 1.5rem; }
      .meter { background: rgba(127, 127, 127, 0.2); border-radius: 4px; height: 8px; }
      .meter span { display: block; height: 8px; border-radius: 4px; background: var(--primary); }
      .error { color: var(--error); border: 1px solid var(--error); padding: 0.75rem; border-radius: 8px; }
      .tabs a { margin-right: 1rem; color: var(--muted); }
      .tabs a.active { color: var(--primary); font-weight: bold; }
      .chip { display: inline-block; padding: 0.2rem 0.7rem; margin: 0.2rem; border-radius: 8px; border: 1px solid var(--secondary); }
      .verdict-misleading { color: var(--error); }
      .verdict-caution { color: var(--warning); }
      .verdict-credible { color: var(--success); }
      input, textarea { width: 100%; box-sizing: border-box; padding: 0.6rem; margin: 1rem 0; }
      button { width: 100%; padding: 0.8rem; font-size: 1.1rem; }
    </style>
  </head>
  <body>
    <nav>
      {% for link in nav %}<a href="{{ link.href }}"{% if link.active %} class="active"{% endif %}>{{ link.label }}</a>{% endfor %}
    </nav>
    <main>{{ body|safe }}</main>
  </body>
</html>"#,
    ext = "html"
)]
struct LayoutTemplate<'a> {
    title: &'a str,
    css: String,
    nav: Vec<NavLink>,
    body: String,
}

fn page(theme: Theme, title: &str, active: &str, body: askama::Result<String>, status: StatusCode) -> Response {
    let body = match body {
        Ok(b) => b,
        Err(err) => {
            error!(error = %err, "template render failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "template error").into_response();
        }
    };
    let nav = [("/", "Home"), ("/about", "About"), ("/analyze", "Analyzer")]
        .into_iter()
        .map(|(href, label)| NavLink { href, label, active: href == active })
        .collect();
    let layout = LayoutTemplate { title, css: theme.css_vars(), nav, body };
    match layout.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            error!(error = %err, "layout render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "template error").into_response()
        }
    }
}

struct Feature {
    title: &'static str,
    description: &'static str,
}

const HOME_FEATURES: [Feature; 4] = [
    Feature {
        title: "News Analysis",
        description: "Analyze news articles for bias, credibility, and factual accuracy.",
    },
    Feature {
        title: "Fact Verification",
        description: "Verify claims against trusted sources to separate fact from fiction.",
    },
    Feature {
        title: "Trend Detection",
        description: "See how a story spreads across social platforms and how people react to it.",
    },
    Feature {
        title: "Educational Resources",
        description: "Guides and tips on how to identify fake news and improve media literacy.",
    },
];

pub const ABOUT_TEXT: &str = "NewsLens sends a news item (a URL, a headline, or the article text) to a \
fake-news analysis service and presents what comes back: credibility factors, political bias, \
sentiment, source reputation, social-media spread, key terms and fact-checking tips. \
The analysis service does the scoring; NewsLens only asks and displays.";

const ABOUT_FEATURES: [Feature; 3] = [
    Feature {
        title: "One question, one answer",
        description: "Each submission is a single request. Nothing is cached or stored.",
    },
    Feature {
        title: "Defensive display",
        description: "Missing or malformed fields in the service response are shown with safe defaults.",
    },
    Feature {
        title: "Terminal or browser",
        description: "The same report is available from the command line and from these pages.",
    },
];

#[derive(Template)]
#[template(
    source = r#"<section class="card">
  <h1>Detect fake news before you share it</h1>
  <p>Paste a link, a headline, or the full text of an article.</p>
  <p><a href="/analyze">Start analyzing</a></p>
</section>
<div class="grid">
  {% for f in features %}
  <section class="card"><h3>{{ f.title }}</h3><p>{{ f.description }}</p></section>
  {% endfor %}
</div>"#,
    ext = "html"
)]
struct HomeTemplate<'a> {
    features: &'a [Feature],
}

#[derive(Template)]
#[template(
    source = r#"<section class="card">
  <h1>About</h1>
  <p>{{ text }}</p>
</section>
<div class="grid">
  {% for f in features %}
  <section class="card"><h3>{{ f.title }}</h3><p>{{ f.description }}</p></section>
  {% endfor %}
</div>"#,
    ext = "html"
)]
struct AboutTemplate<'a> {
    text: &'a str,
    features: &'a [Feature],
}

async fn home(State(state): State<SharedState>) -> Response {
    let body = HomeTemplate { features: &HOME_FEATURES }.render();
    page(state.theme, "Home", "/", body, StatusCode::OK)
}

async fn about(State(state): State<SharedState>) -> Response {
    let body = AboutTemplate { text: ABOUT_TEXT, features: &ABOUT_FEATURES }.render();
    page(state.theme, "About", "/about", body, StatusCode::OK)
}

// ---- analyzer ----

struct Tab {
    value: &'static str,
    label: &'static str,
    active: bool,
}

struct Meter {
    label: String,
    value: u32,
}

struct Rating {
    label: &'static str,
    stars: String,
}

struct Term {
    text: String,
    size: u32,
}

struct Feat {
    term: String,
    explanation: String,
    effect: &'static str,
}

/// Display-ready numbers and strings for one report.
struct ReportView<'a> {
    verdict: &'static str,
    verdict_class: &'static str,
    message: &'a str,
    content_type: &'static str,
    fake_probability: u32,
    confidence: u32,
    readability: Option<String>,
    features: Vec<Feat>,
    patterns: &'a [String],
    factors: Vec<Meter>,
    overall: u32,
    bias: i32,
    bias_label: &'static str,
    bias_angle: i32,
    sentiments: Vec<Meter>,
    tone: String,
    reputation: &'a SourceReputation,
    ratings: Vec<Rating>,
    reputation_percent: u32,
    terms: Vec<Term>,
    social: &'a SocialMetrics,
    no_social: &'static str,
    education: &'a EducationalResources,
}

fn percent(v: f64) -> u32 {
    v.round().clamp(0.0, 100.0) as u32
}

impl<'a> ReportView<'a> {
    fn new(r: &'a AnalysisReport) -> Self {
        let verdict = Verdict::from_probability(r.detection.fake_probability);
        let verdict_class = match verdict {
            Verdict::PotentiallyMisleading => "verdict-misleading",
            Verdict::ExerciseCaution => "verdict-caution",
            Verdict::LikelyCredible => "verdict-credible",
        };
        let max_term = r.key_terms.iter().map(|t| t.value).fold(0.0, f64::max);
        let rep = &r.source_reputation;

        Self {
            verdict: verdict.label(),
            verdict_class,
            message: &r.detection.message,
            content_type: r.detection.content_type.label(),
            fake_probability: percent(r.detection.fake_probability),
            confidence: percent(r.detection.confidence),
            readability: r.detection.readability.as_ref().map(|m| {
                format!(
                    "{:.0} ({}) · Avg word length {:.1} · Avg sentence length {:.1}",
                    m.readability_score,
                    scoring::readability_level(m.readability_score),
                    m.average_word_length,
                    m.average_sentence_length
                )
            }),
            features: r
                .detection
                .key_features
                .iter()
                .map(|f| Feat {
                    term: f.term.clone(),
                    explanation: f.explanation.clone(),
                    effect: match f.effect {
                        FeatureEffect::Credibility => "credibility",
                        FeatureEffect::Skepticism => "skepticism",
                        FeatureEffect::Neutral => "neutral",
                    },
                })
                .collect(),
            patterns: &r.detection.patterns,
            factors: r
                .credibility
                .iter()
                .map(|f| Meter { label: f.label.clone(), value: percent(f.value) })
                .collect(),
            overall: scoring::overall_credibility(&r.credibility),
            bias: r.bias.round() as i32,
            bias_label: BiasLeaning::from_score(r.bias).label(),
            bias_angle: scoring::bias_angle(r.bias).round() as i32,
            sentiments: [
                ("Positive", r.sentiment.positive),
                ("Negative", r.sentiment.negative),
                ("Neutral", r.sentiment.neutral),
            ]
            .into_iter()
            .map(|(label, v)| Meter { label: label.to_string(), value: percent(v) })
            .collect(),
            tone: scoring::dominant_sentiment(&r.sentiment).to_uppercase(),
            reputation: rep,
            ratings: vec![
                Rating { label: "Historical Accuracy", stars: stars(rep.accuracy) },
                Rating { label: "Fact-Checking Score", stars: stars(rep.fact_checking) },
                Rating { label: "Editorial Standards", stars: stars(rep.editorial_standards) },
                Rating { label: "Transparency", stars: stars(rep.transparency) },
            ],
            reputation_percent: scoring::reputation_percent(rep),
            terms: r
                .key_terms
                .iter()
                .map(|t| Term { text: t.text.clone(), size: term_size(t.value, max_term) })
                .collect(),
            social: &r.social,
            no_social: NO_SOCIAL_DATA,
            education: &r.education,
        }
    }
}

/// Word-cloud font size in px, square-root scaled into 12..=60.
fn term_size(value: f64, max: f64) -> u32 {
    if max <= 0.0 {
        return 12;
    }
    (12.0 + 48.0 * (value / max).clamp(0.0, 1.0).sqrt()).round() as u32
}

#[derive(Template)]
#[template(
    source = r#"<section class="card">
  <h1>News Analyzer</h1>
  <div class="tabs">
    {% for tab in tabs %}<a href="/analyze?mode={{ tab.value }}"{% if tab.active %} class="active"{% endif %}>{{ tab.label }}</a>{% endfor %}
  </div>
  <form method="post" action="/analyze">
    <input type="hidden" name="mode" value="{{ mode }}">
    {% if multiline %}
    <textarea name="text" rows="4" placeholder="{{ placeholder }}" aria-label="{{ label }}">{{ text }}</textarea>
    {% else %}
    <input type="text" name="text" value="{{ text }}" placeholder="{{ placeholder }}" aria-label="{{ label }}">
    {% endif %}
    <button type="submit"{% if loading %} disabled{% endif %}>{% if loading %}Analyzing...{% else %}Analyze{% endif %}</button>
  </form>
  {% if let Some(e) = error %}<p class="error">{{ e }}</p>{% endif %}
</section>
{% if let Some(r) = report %}
<section class="card">
  <h2>AI-Powered Detection Results</h2>
  <h3 class="{{ r.verdict_class }}">{{ r.verdict }}</h3>
  <p>{{ r.message }}</p>
  <span class="chip">Content Type: {{ r.content_type }}</span>
  <p>Misleading Score {{ r.fake_probability }}% · Model Confidence {{ r.confidence }}%{% if let Some(read) = r.readability %} · Readability {{ read }}{% endif %}</p>
  {% if !r.features.is_empty() %}
  <h4>Key Linguistic Features</h4>
  <ul>{% for f in r.features %}<li class="{{ f.effect }}"><strong>{{ f.term }}</strong>: {{ f.explanation }}</li>{% endfor %}</ul>
  {% endif %}
  {% if !r.patterns.is_empty() %}
  <h4>Detected Patterns of Concern</h4>
  <p>{% for p in r.patterns %}<span class="chip">{{ p }}</span>{% endfor %}</p>
  {% endif %}
</section>
<div class="grid">
  <section class="card">
    <h2>Credibility Breakdown</h2>
    {% for m in r.factors %}<p>{{ m.label }} <span>{{ m.value }}%</span></p><div class="meter"><span style="width: {{ m.value }}%"></span></div>{% endfor %}
    <h3>Overall Score {{ r.overall }}%</h3>
  </section>
  <section class="card">
    <h2>Political Bias Compass</h2>
    <p>{{ r.bias_label }} ({{ r.bias }})</p>
    <div style="font-size: 3rem; text-align: center; transform: rotate({{ r.bias_angle }}deg)">&#x2191;</div>
  </section>
  <section class="card">
    <h2>Sentiment Analysis</h2>
    {% for m in r.sentiments %}<p>{{ m.label }}: {{ m.value }}%</p><div class="meter"><span style="width: {{ m.value }}%"></span></div>{% endfor %}
    <h3>Overall Tone {{ r.tone }}</h3>
  </section>
  <section class="card">
    <h2>Source Reputation Analysis</h2>
    <h3>{{ r.reputation.source_name }}</h3>
    {% for rating in r.ratings %}<p>{{ rating.label }} {{ rating.stars }}</p>{% endfor %}
    <h3>Overall Reputation Score {{ r.reputation_percent }}%</h3>
    {% if !r.reputation.known_for.is_empty() %}<p>Known For {% for tag in r.reputation.known_for %}<span class="chip">{{ tag }}</span>{% endfor %}</p>{% endif %}
  </section>
</div>
<section class="card">
  <h2>Key Terms Analysis</h2>
  <p>{% for t in r.terms %}<span style="font-size: {{ t.size }}px; margin: 0 0.4rem">{{ t.text }}</span>{% endfor %}</p>
</section>
<section class="card">
  <h2>Social Media Impact</h2>
  {% if r.social.is_empty() %}
  <p>{{ r.no_social }}</p>
  {% else %}
  {% for p in r.social.platforms %}
  <div>
    <h3>{{ p.platform }}</h3>
    <p>Shares {{ p.shares }} · Engagement {{ p.engagement }} · Sentiment {{ p.sentiment }}%</p>
    <p>{% for tag in p.hashtags %}<span class="chip">#{{ tag }}</span>{% endfor %}</p>
  </div>
  {% endfor %}
  {% if let Some(o) = r.social.overall %}
  <p>Virality {{ o.virality_score }} · Public interest {{ o.public_interest }} · Discussion {{ o.discussion_polarity }}</p>
  {% endif %}
  {% endif %}
</section>
<section class="card">
  <h2>Fact-Checking Education</h2>
  <h3>Quick Tips for Spotting Fake News</h3>
  <ul>{% for tip in r.education.quick_tips %}<li>{{ tip }}</li>{% endfor %}</ul>
  {% for g in r.education.guides %}
  <details><summary>{{ g.title }}</summary><ul>{% for t in g.tips %}<li><strong>{{ t.title }}</strong> {{ t.description }}</li>{% endfor %}</ul></details>
  {% endfor %}
  {% if !r.education.recommended_resources.is_empty() %}
  <h3>Recommended Resources</h3>
  <ul>{% for res in r.education.recommended_resources %}<li><a href="{{ res.url }}" target="_blank" rel="noopener">{{ res.title }}</a> {{ res.description }}</li>{% endfor %}</ul>
  {% endif %}
</section>
{% endif %}"#,
    ext = "html"
)]
struct AnalyzerTemplate<'a> {
    tabs: Vec<Tab>,
    mode: &'static str,
    label: &'static str,
    placeholder: &'static str,
    multiline: bool,
    text: &'a str,
    loading: bool,
    error: Option<String>,
    report: Option<ReportView<'a>>,
}

/// `notice` is an inline message not tied to the session status (busy, empty input).
fn render_analyzer(session: &Session, theme: Theme, notice: Option<String>, status: StatusCode) -> Response {
    let mode = session.mode();
    let (error, report) = match session.status() {
        Status::Error(msg) => (notice.or_else(|| Some(msg.clone())), None),
        Status::Success(r) => (notice, Some(ReportView::new(r))),
        Status::Idle | Status::Loading => (notice, None),
    };
    let tpl = AnalyzerTemplate {
        tabs: InputMode::ALL
            .into_iter()
            .map(|m| Tab { value: m.as_str(), label: m.label(), active: m == mode })
            .collect(),
        mode: mode.as_str(),
        label: mode.label(),
        placeholder: mode.placeholder(),
        multiline: mode == InputMode::Content,
        text: session.input(mode),
        loading: session.is_loading(),
        error,
        report,
    };
    page(theme, "Analyzer", "/analyze", tpl.render(), status)
}

#[derive(Debug, Deserialize)]
struct ModeQuery {
    mode: Option<InputMode>,
}

async fn analyzer_view(State(state): State<SharedState>, Query(q): Query<ModeQuery>) -> Response {
    let mut session = state.session.lock().await;
    // tab changes are ignored while a request is in flight
    if let Some(mode) = q.mode {
        if !session.is_loading() {
            session.select_mode(mode);
        }
    }
    render_analyzer(&session, state.theme, None, StatusCode::OK)
}

#[derive(Debug, Deserialize)]
struct AnalyzeForm {
    mode: InputMode,
    #[serde(default)]
    text: String,
}

async fn analyzer_submit(State(state): State<SharedState>, Form(form): Form<AnalyzeForm>) -> Response {
    let begun = state.session.lock().await.begin_with(form.mode, form.text);
    let (ticket, req) = match begun {
        Ok(started) => started,
        Err(err) => {
            let status = match err {
                SessionError::Busy => StatusCode::CONFLICT,
                SessionError::Input(_) => StatusCode::UNPROCESSABLE_ENTITY,
            };
            let session = state.session.lock().await;
            return render_analyzer(&session, state.theme, Some(err.to_string()), status);
        }
    };

    // the lock is not held across the service call; the call runs on its own
    // task so a dropped connection still completes the ticket
    info!(mode = %req.mode(), "analysis submitted");
    let task_state = state.clone();
    let call = tokio::spawn(async move {
        let outcome = task_state.analyzer.analyze(&req).await.map(|raw| normalize(&raw));
        task_state.session.lock().await.complete(ticket, outcome);
    });
    if let Err(err) = call.await {
        error!(error = %err, "analysis task failed");
        let failed = AnalysisError::RequestFailed(FALLBACK_ERROR.to_string());
        state.session.lock().await.complete(ticket, Err(failed));
    }

    let session = state.session.lock().await;
    render_analyzer(&session, state.theme, None, StatusCode::OK)
}

/// JSON counterpart of the analyzer form; stateless.
async fn api_analyze(State(state): State<SharedState>, Json(body): Json<AnalysisRequest>) -> Response {
    let mode = body.mode();
    let text = match mode {
        InputMode::Url => &body.url,
        InputMode::Title => &body.title,
        InputMode::Content => &body.content,
    };
    let req = match AnalysisRequest::new(mode, text) {
        Ok(req) => req,
        Err(err) => {
            let msg = err.to_string();
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(JsonErr { ok: false, error: &msg })).into_response();
        }
    };
    match state.analyzer.analyze(&req).await {
        Ok(raw) => {
            let report = normalize(&raw);
            let data = ReportOut { summary: scoring::summarize(&report), report: &report };
            Json(JsonOut { ok: true, data }).into_response()
        }
        Err(err) => {
            let msg = err.to_string();
            (StatusCode::BAD_GATEWAY, Json(JsonErr { ok: false, error: &msg })).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_sizes_scale_between_bounds() {
        assert_eq!(term_size(10.0, 10.0), 60);
        assert_eq!(term_size(0.0, 10.0), 12);
        assert_eq!(term_size(1.0, 0.0), 12);
        assert_eq!(term_size(2.5, 10.0), 36);
    }
}
