#![allow(dead_code)]

use async_trait::async_trait;
use newslens_rs::gateway::{AnalysisError, Analyzer};
use newslens_rs::types::AnalysisRequest;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

/// Replies with a canned result and records every request it sees.
pub struct FakeAnalyzer {
    pub reply: Result<Value, AnalysisError>,
    pub seen: Mutex<Vec<AnalysisRequest>>,
}

impl FakeAnalyzer {
    pub fn ok(body: Value) -> Self {
        Self { reply: Ok(body), seen: Mutex::default() }
    }

    pub fn failing(message: &str) -> Self {
        Self { reply: Err(AnalysisError::RequestFailed(message.into())), seen: Mutex::default() }
    }

    pub fn requests(&self) -> Vec<AnalysisRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Analyzer for FakeAnalyzer {
    async fn analyze(&self, req: &AnalysisRequest) -> Result<Value, AnalysisError> {
        self.seen.lock().unwrap().push(req.clone());
        self.reply.clone()
    }
}

/// Holds every call open until `release` is notified.
#[derive(Default)]
pub struct GatedAnalyzer {
    pub started: Notify,
    pub release: Notify,
    pub calls: AtomicUsize,
}

impl GatedAnalyzer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Analyzer for GatedAnalyzer {
    async fn analyze(&self, _req: &AnalysisRequest) -> Result<Value, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        self.release.notified().await;
        Ok(serde_json::json!({"factScore": 90}))
    }
}
