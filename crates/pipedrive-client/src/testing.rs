//! In-memory transport for tests.
//!
//! `MockTransport` records every request it receives and answers with
//! responses queued in advance, in order. Available to dependent crates
//! through the `test-utils` feature.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};
use crate::response::ApiResponse;
use crate::transport::{ApiRequest, Transport};

#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<ClientResult<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a decoded envelope as the next response.
    pub fn push_json(&self, body: Value) -> &Self {
        guard(&self.responses).push_back(Ok(ApiResponse::new(body)));
        self
    }

    /// Queue an error as the next response.
    pub fn push_error(&self, error: ClientError) -> &Self {
        guard(&self.responses).push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        guard(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        guard(&self.requests).len()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        guard(&self.requests).last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        guard(&self.requests).push(request.clone());
        let next = guard(&self.responses).pop_front();
        next.unwrap_or_else(|| {
            Err(ClientError::invalid_response(
                "mock",
                format!("no response queued for {} {}", request.method, request.path),
            ))
        })
    }
}
