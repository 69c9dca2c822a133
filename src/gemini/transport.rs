//! Delivery of a serialized request to the generation endpoint.
//!
//! Transports make exactly one HTTP exchange per call. Retrying is the
//! orchestrator's job so that attempt counting and backoff live in one place.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{header, Client};
use tokio::sync::oneshot;

use crate::{
    config::ApiKeyPlacement,
    error::{GenerationError, GenerationResult},
};

pub const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: String,
    pub api_key: String,
    pub key_placement: ApiKeyPlacement,
    pub body: Vec<u8>,
    pub timeout: Duration,
}

/// Status code and body exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// POST the request once.
    ///
    /// Returns `Ok` for any HTTP status; only failures that never produced a
    /// status (connect, TLS, timeout) are `Err(GenerationError::Transport)`.
    async fn send(&self, request: &TransportRequest) -> GenerationResult<RawResponse>;
}

#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn describe_reqwest_error(e: &reqwest::Error, timeout: Duration) -> String {
    if e.is_timeout() {
        format!("request timed out after {:.1}s", timeout.as_secs_f64())
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &TransportRequest) -> GenerationResult<RawResponse> {
        let mut builder = self
            .client
            .post(&request.url)
            .header(header::CONTENT_TYPE, "application/json")
            .timeout(request.timeout)
            .body(request.body.clone());

        builder = match request.key_placement {
            ApiKeyPlacement::Header => builder.header(API_KEY_HEADER, &request.api_key),
            ApiKeyPlacement::Query => builder.query(&[("key", request.api_key.as_str())]),
        };

        log::debug!(
            "Sending generation request to {} ({} KB)",
            request.url,
            request.body.len() / 1024
        );

        let response = builder.send().await.map_err(|e| {
            let message = describe_reqwest_error(&e, request.timeout);
            log::warn!("Generation request failed: {}", message);
            GenerationError::Transport(message)
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| GenerationError::Transport(describe_reqwest_error(&e, request.timeout)))?;

        log::debug!("Response status code: {} ({} bytes)", status, body.len());

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// Scripted transport for tests.
///
/// Responses are served in FIFO order. A response added with
/// [`MockTransport::push_gated`] is held until its trigger fires, which lets
/// tests cancel while a call is in flight.
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    calls: Arc<Mutex<Vec<TransportRequest>>>,
    in_flight: Arc<AtomicUsize>,
}

enum MockResponse {
    Immediate(GenerationResult<RawResponse>),
    Gated {
        response: GenerationResult<RawResponse>,
        trigger: oneshot::Receiver<()>,
    },
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: GenerationResult<RawResponse>) {
        self.responses
            .lock()
            .push_back(MockResponse::Immediate(response));
    }

    pub fn push_status(&self, status: u16, body: impl Into<Vec<u8>>) {
        self.push(Ok(RawResponse::new(status, body)));
    }

    /// Queue a response that completes only after the returned sender fires or is dropped.
    pub fn push_gated(&self, response: GenerationResult<RawResponse>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.responses.lock().push_back(MockResponse::Gated {
            response,
            trigger: rx,
        });
        tx
    }

    pub fn calls(&self) -> Vec<TransportRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &TransportRequest) -> GenerationResult<RawResponse> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlightGuard(self.in_flight.clone());

        self.calls.lock().push(request.clone());

        let next = self.responses.lock().pop_front();
        match next {
            Some(MockResponse::Immediate(response)) => response,
            Some(MockResponse::Gated { response, trigger }) => {
                let _ = trigger.await;
                response
            }
            None => Err(GenerationError::Transport(
                "no mock response configured".into(),
            )),
        }
    }
}
