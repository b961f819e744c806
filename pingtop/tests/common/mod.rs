//! Shared fakes for the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pingtop::api::{ApiRequest, RawResponse, Transport};
use pingtop::{ApiError, ProbeApi, ProbeResult};
use tokio::sync::Semaphore;

pub fn result(url: &str, available: bool, latency: Option<f64>) -> ProbeResult {
    ProbeResult {
        url: url.to_string(),
        is_available: available,
        http_code: if available { Some(200) } else { None },
        error_message: None,
        latency_ms: latency,
        checked_at: Some("2025-10-01T12:00:00Z".into()),
    }
}

pub fn ok(body: &str) -> Result<RawResponse, ApiError> {
    reply(200, body)
}

pub fn reply(status: u16, body: &str) -> Result<RawResponse, ApiError> {
    Ok(RawResponse {
        status,
        body: body.to_string(),
    })
}

/// Transport that answers from a queue and records every request.
#[derive(Default)]
pub struct FakeTransport {
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<ApiRequest>>,
    replies: Mutex<VecDeque<Result<RawResponse, ApiError>>>,
}

impl FakeTransport {
    pub fn with_replies(replies: Vec<Result<RawResponse, ApiError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, req: ApiRequest) -> Result<RawResponse, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted reply".into())))
    }
}

/// Probe API whose probes block until released, counting submissions.
pub struct GatedApi {
    pub probes: AtomicUsize,
    pub gate: Semaphore,
    pub fail: bool,
}

impl GatedApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            probes: AtomicUsize::new(0),
            gate: Semaphore::new(0),
            fail: false,
        })
    }

    pub fn open() -> Arc<Self> {
        Arc::new(Self {
            probes: AtomicUsize::new(0),
            gate: Semaphore::new(Semaphore::MAX_PERMITS),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            probes: AtomicUsize::new(0),
            gate: Semaphore::new(Semaphore::MAX_PERMITS),
            fail: true,
        })
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }
}

#[async_trait]
impl ProbeApi for GatedApi {
    async fn submit_check(&self, url: &str) -> Result<ProbeResult, ApiError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.gate
            .acquire()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?
            .forget();
        if self.fail {
            return Err(ApiError::Api {
                status: 502,
                message: "upstream down".into(),
            });
        }
        Ok(result(url, true, Some(42.0)))
    }

    async fn fetch_recent(&self, _limit: usize) -> Result<Vec<ProbeResult>, ApiError> {
        Ok(Vec::new())
    }

    async fn clear_all(&self) -> Result<(), ApiError> {
        Ok(())
    }

    async fn health(&self) -> Result<(), ApiError> {
        Ok(())
    }
}
