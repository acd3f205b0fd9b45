//! One analysis session: active input mode, the text typed for each mode, and
//! the idle → loading → success|error status of the current submission.

use serde::Serialize;
use tracing::{debug, info};

use crate::gateway::{AnalysisError, Analyzer};
use crate::normalize::normalize;
use crate::types::{AnalysisReport, AnalysisRequest, InputError, InputMode};

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Success(Box<AnalysisReport>),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("an analysis is already in progress")]
    Busy,
    #[error(transparent)]
    Input(#[from] InputError),
}

/// Identifies one submission. Completions carrying an older ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct Session {
    mode: InputMode,
    inputs: [String; 3],
    status: Status,
    generation: u64,
}

fn slot(mode: InputMode) -> usize {
    match mode {
        InputMode::Url => 0,
        InputMode::Title => 1,
        InputMode::Content => 2,
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, Status::Loading)
    }

    pub fn input(&self, mode: InputMode) -> &str {
        &self.inputs[slot(mode)]
    }

    pub fn set_input(&mut self, mode: InputMode, text: impl Into<String>) {
        self.inputs[slot(mode)] = text.into();
    }

    /// Switching tabs clears the previous result or error. A request still in
    /// flight is orphaned: its completion no longer matches the generation.
    pub fn select_mode(&mut self, mode: InputMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.status = Status::Idle;
        self.generation += 1;
    }

    pub fn begin_submission(&mut self) -> Result<(Ticket, AnalysisRequest), SessionError> {
        if self.is_loading() {
            return Err(SessionError::Busy);
        }
        let req = AnalysisRequest::new(self.mode, self.input(self.mode))?;
        self.generation += 1;
        self.status = Status::Loading;
        Ok((Ticket(self.generation), req))
    }

    /// Form-style submission: mode and text arrive together. Checked for an
    /// in-flight request before the mode switch can clear it.
    pub fn begin_with(&mut self, mode: InputMode, text: impl Into<String>) -> Result<(Ticket, AnalysisRequest), SessionError> {
        if self.is_loading() {
            return Err(SessionError::Busy);
        }
        self.select_mode(mode);
        self.set_input(mode, text);
        self.begin_submission()
    }

    /// Returns false when the ticket is stale and the outcome was discarded.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<AnalysisReport, AnalysisError>) -> bool {
        if ticket.0 != self.generation {
            debug!(ticket = ticket.0, current = self.generation, "discarding stale analysis outcome");
            return false;
        }
        self.status = match outcome {
            Ok(report) => Status::Success(Box::new(report)),
            Err(err) => Status::Error(err.to_string()),
        };
        true
    }

    /// Full round trip for callers that own the session across the await.
    pub async fn submit(&mut self, analyzer: &dyn Analyzer) -> Result<&Status, SessionError> {
        let (ticket, req) = self.begin_submission()?;
        info!(mode = %req.mode(), "analysis submitted");
        let outcome = analyzer.analyze(&req).await.map(|raw| normalize(&raw));
        self.complete(ticket, outcome);
        Ok(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        reply: Result<Value, AnalysisError>,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Analyzer for Fixed {
        async fn analyze(&self, _req: &AnalysisRequest) -> Result<Value, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn fixed(reply: Result<Value, AnalysisError>) -> Fixed {
        Fixed { reply, calls: AtomicUsize::new(0) }
    }

    #[tokio::test]
    async fn submit_stores_normalized_report() {
        let gw = fixed(Ok(json!({"bias": 30})));
        let mut s = Session::new();
        s.set_input(InputMode::Url, "https://example.com/a");
        match s.submit(&gw).await.unwrap() {
            Status::Success(r) => assert_eq!(r.bias, 30.0),
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[tokio::test]
    async fn failure_leaves_session_retryable() {
        let gw = fixed(Err(AnalysisError::RequestFailed("boom".into())));
        let mut s = Session::new();
        s.set_input(InputMode::Url, "https://example.com/a");
        assert_eq!(s.submit(&gw).await.unwrap(), &Status::Error("boom".into()));
        assert!(s.submit(&gw).await.is_ok());
        assert_eq!(gw.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_input_never_reaches_the_gateway() {
        let gw = fixed(Ok(json!({})));
        let mut s = Session::new();
        s.select_mode(InputMode::Content);
        let err = s.submit(&gw).await.unwrap_err();
        assert_eq!(err, SessionError::Input(InputError::Empty(InputMode::Content)));
        assert_eq!(gw.calls.load(Ordering::SeqCst), 0);
        assert_eq!(s.status(), &Status::Idle);
    }

    #[test]
    fn second_submission_while_loading_is_rejected() {
        let mut s = Session::new();
        s.set_input(InputMode::Title, "Headline");
        s.select_mode(InputMode::Title);
        let (_ticket, req) = s.begin_submission().unwrap();
        assert_eq!(req.title, "Headline");
        assert!(s.is_loading());
        assert_eq!(s.begin_submission().unwrap_err(), SessionError::Busy);
    }

    #[test]
    fn form_submission_cannot_switch_mode_while_loading() {
        let mut s = Session::new();
        s.begin_with(InputMode::Url, "https://example.com/a").unwrap();
        assert_eq!(s.begin_with(InputMode::Title, "Other").unwrap_err(), SessionError::Busy);
        assert_eq!(s.mode(), InputMode::Url);
        assert!(s.is_loading());
    }

    #[test]
    fn mode_switch_clears_and_orphans_pending_request() {
        let mut s = Session::new();
        s.set_input(InputMode::Url, "https://example.com/a");
        let (ticket, _) = s.begin_submission().unwrap();

        s.select_mode(InputMode::Title);
        assert_eq!(s.status(), &Status::Idle);
        assert!(!s.complete(ticket, Err(AnalysisError::RequestFailed("late".into()))));
        assert_eq!(s.status(), &Status::Idle);
        assert_eq!(s.input(InputMode::Url), "https://example.com/a");
    }
}
