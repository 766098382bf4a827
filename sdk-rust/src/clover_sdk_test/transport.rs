use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
    time::Duration,
};

use serde_json::Value;

use crate::{
    errors::{ApiError, ApiResult},
    transport::{ApiRequest, Method, Transport},
};

/// Result for a mocked request.
/// It can either be a JSON body or an error to return.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Json(Value),
    Error(ApiError),
}

impl MockResponse {
    /// Construct a result that yields the provided JSON body.
    pub fn json(value: Value) -> Self {
        Self::Json(value)
    }

    /// Construct a result that yields the provided error.
    pub fn error(error: ApiError) -> Self {
        Self::Error(error)
    }
}

impl From<Value> for MockResponse {
    fn from(value: Value) -> Self {
        Self::json(value)
    }
}

impl From<ApiError> for MockResponse {
    fn from(error: ApiError) -> Self {
        Self::error(error)
    }
}

impl From<ApiResult<Value>> for MockResponse {
    fn from(result: ApiResult<Value>) -> Self {
        match result {
            Ok(value) => Self::Json(value),
            Err(error) => Self::Error(error),
        }
    }
}

#[derive(Default)]
struct MockTransportState {
    routed_responses: HashMap<(Method, String), VecDeque<MockResponse>>,
    responses: VecDeque<MockResponse>,
    tracked_requests: Vec<ApiRequest>,
    latency: Option<Duration>,
}

impl MockTransportState {
    fn next_response(&mut self, request: &ApiRequest) -> Option<MockResponse> {
        let routed = self
            .routed_responses
            .get_mut(&(request.method, request.path.clone()))
            .and_then(VecDeque::pop_front);
        routed.or_else(|| self.responses.pop_front())
    }

    fn reset(&mut self) {
        self.tracked_requests.clear();
    }

    fn restore(&mut self) {
        self.routed_responses.clear();
        self.responses.clear();
        self.latency = None;
        self.reset();
    }
}

/// A mock transport for testing that tracks requests and yields predefined
/// responses.
///
/// Responses enqueued for a specific method and path are used first; other
/// requests take from a shared FIFO queue.
#[derive(Default)]
pub struct MockTransport {
    state: Mutex<MockTransportState>,
}

impl MockTransport {
    /// Construct a new mock transport instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response by `latency`, so concurrent callers overlap.
    pub fn set_latency(&self, latency: Option<Duration>) -> &Self {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.latency = latency;
        drop(state);
        self
    }

    /// Enqueue a response for whichever request comes next.
    pub fn enqueue<R>(&self, response: R) -> &Self
    where
        R: Into<MockResponse>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.responses.push_back(response.into());
        drop(state);
        self
    }

    /// Enqueue a response for the next request to `method path`.
    pub fn enqueue_for<R>(&self, method: Method, path: &str, response: R) -> &Self
    where
        R: Into<MockResponse>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        state
            .routed_responses
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response.into());
        drop(state);
        self
    }

    /// Retrieve the tracked requests accumulated so far.
    pub fn tracked_requests(&self) -> Vec<ApiRequest> {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_requests.clone()
    }

    /// Number of tracked requests sent to `path`.
    pub fn request_count(&self, path: &str) -> usize {
        let state = self.state.lock().expect("mock state poisoned");
        state
            .tracked_requests
            .iter()
            .filter(|request| request.path == path)
            .count()
    }

    /// Reset tracked requests without touching enqueued responses.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.reset();
    }

    /// Clear tracked requests, enqueued responses and latency.
    pub fn restore(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.restore();
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn send(&self, request: ApiRequest) -> ApiResult<Value> {
        let (response, latency) = {
            let mut state = self.state.lock().expect("mock state poisoned");
            state.tracked_requests.push(request.clone());
            (state.next_response(&request), state.latency)
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        match response {
            Some(MockResponse::Json(value)) => Ok(value),
            Some(MockResponse::Error(error)) => Err(error),
            None => Err(ApiError::Transport(format!(
                "no mocked responses available for {} {}",
                request.method.as_str(),
                request.path
            ))),
        }
    }
}
