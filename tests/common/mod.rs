#![allow(dead_code)]

use async_trait::async_trait;
use exlink::core::errors::ExchangeError;
use exlink::core::kernel::rest::{HttpRequest, RestClient};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};

/// Install a tracing subscriber once so traced paths show up under
/// `--nocapture`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Transport stand-in: records every outbound request and serves queued
/// responses in order. Cloning yields a handle to the same state, so a
/// test can keep inspecting after handing the mock to a facade.
#[derive(Clone)]
pub struct MockRest {
    inner: Arc<Inner>,
}

struct Inner {
    responses: Mutex<VecDeque<Result<Value, ExchangeError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockRest {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                responses: Mutex::new(VecDeque::new()),
                requests: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn enqueue_ok(&self, value: Value) {
        self.inner.responses.lock().unwrap().push_back(Ok(value));
    }

    pub fn enqueue_err(&self, err: ExchangeError) {
        self.inner.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.inner.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl RestClient for MockRest {
    async fn execute(&self, request: &HttpRequest) -> Result<Value, ExchangeError> {
        self.inner.requests.lock().unwrap().push(request.clone());
        self.inner
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ExchangeError::ApiError {
                    status: 500,
                    body: "mock response queue exhausted".to_string(),
                })
            })
    }
}
