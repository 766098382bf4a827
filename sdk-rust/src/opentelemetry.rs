use crate::{transport::Method, ApiError};
use opentelemetry::trace::Status;
use std::time::Instant;
use tracing::{info_span, Span};
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Span around a single backend request.
pub struct RequestSpan {
    span: Span,
    start_time: Instant,
    status_code: Option<u16>,
}

impl RequestSpan {
    pub fn new(transport: &str, method: Method, path: &str) -> Self {
        let span = info_span!("clover_sdk.request", method = method.as_str(), path = path);
        span.set_attribute("http.request.method", method.as_str());
        span.set_attribute("url.path", path.to_string());
        span.set_attribute("clover_sdk.transport", transport.to_string());

        Self {
            span,
            start_time: Instant::now(),
            status_code: None,
        }
    }

    pub fn span(&self) -> Span {
        self.span.clone()
    }

    pub fn on_status(&mut self, status_code: u16) {
        self.status_code = Some(status_code);
    }

    pub fn on_error(&mut self, error: &ApiError) {
        if let ApiError::StatusCode(status_code, _) = error {
            self.status_code = Some(*status_code);
        }
        self.span.set_attribute("error.type", error.kind());
        self.span.set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }

    pub fn on_end(&mut self) {
        if let Some(status_code) = self.status_code {
            self.span
                .set_attribute("http.response.status_code", i64::from(status_code));
        }
        self.span.set_attribute(
            "clover_sdk.duration_seconds",
            self.start_time.elapsed().as_secs_f64(),
        );
        self.span.in_scope(|| {
            tracing::debug!(
                status_code = self.status_code,
                elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0,
                "request finished"
            );
        });
    }
}
