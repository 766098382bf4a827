use crate::{
    client_utils,
    http::HttpTransportOptions,
    opentelemetry::RequestSpan,
    transport::{ApiRequest, Method, Transport},
    ApiError, ApiResult,
};
use futures::lock::Mutex;
use reqwest::{
    header::{ACCEPT, COOKIE},
    Client, RequestBuilder,
};
use serde_json::Value;
use tracing_futures::Instrument;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_CSRF_CONFIG_PATH: &str = "/api/auth/config/";
const CSRF_COOKIE: &str = "csrftoken";
const CSRF_HEADER: &str = "X-CSRFToken";

/// Production [`Transport`] over `reqwest`.
pub struct HttpTransport {
    base_url: String,
    client: Client,
    session_cookie: Option<String>,
    csrf_config_path: String,
    csrf_token: Mutex<Option<String>>,
}

impl HttpTransport {
    pub fn new(options: HttpTransportOptions) -> ApiResult<Self> {
        let mut builder = Client::builder().gzip(true);
        if let Some(user_agent) = &options.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let client = builder.build()?;

        Ok(Self::with_client(client, options))
    }

    #[must_use]
    pub fn with_client(client: Client, options: HttpTransportOptions) -> Self {
        let base_url = options
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            base_url,
            client,
            session_cookie: options.session_cookie,
            csrf_config_path: options
                .csrf_config_path
                .unwrap_or_else(|| DEFAULT_CSRF_CONFIG_PATH.to_string()),
            csrf_token: Mutex::new(options.csrf_token),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_credentials(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(ACCEPT, "application/json");
        match &self.session_cookie {
            Some(cookie) => builder.header(COOKIE, cookie),
            None => builder,
        }
    }

    /// Resolve the CSRF token once and reuse it for the lifetime of the
    /// transport.
    async fn csrf_token(&self) -> ApiResult<String> {
        let mut cached = self.csrf_token.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let from_cookie = self
            .session_cookie
            .as_deref()
            .and_then(|cookie| client_utils::cookie_value(cookie, CSRF_COOKIE))
            .map(ToString::to_string);

        let token = match from_cookie {
            Some(token) => token,
            None => self.fetch_csrf_token().await?,
        };
        *cached = Some(token.clone());
        Ok(token)
    }

    async fn fetch_csrf_token(&self) -> ApiResult<String> {
        tracing::debug!(path = %self.csrf_config_path, "fetching csrf token from bootstrap config");
        let response = self
            .with_credentials(self.client.get(self.url(&self.csrf_config_path)))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::StatusCode(
                status.as_u16(),
                client_utils::error_message(status, &body),
            ));
        }

        let config = client_utils::parse_json_body(&body)?;
        ["csrfToken", "csrf_token"]
            .iter()
            .find_map(|field| config.get(field).and_then(Value::as_str))
            .filter(|token| !token.is_empty())
            .map(ToString::to_string)
            .ok_or_else(|| ApiError::Decode("bootstrap config has no csrfToken".to_string()))
    }

    async fn execute(&self, request: &ApiRequest, span: &mut RequestSpan) -> ApiResult<Value> {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        builder = self.with_credentials(builder);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if request.method.is_state_changing() {
            builder = builder.header(CSRF_HEADER, self.csrf_token().await?);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        span.on_status(status.as_u16());
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::StatusCode(
                status.as_u16(),
                client_utils::error_message(status, &body),
            ));
        }

        client_utils::parse_json_body(&body)
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn send(&self, request: ApiRequest) -> ApiResult<Value> {
        let mut span = RequestSpan::new(self.name(), request.method, &request.path);
        let tracing_span = span.span();
        let result = self
            .execute(&request, &mut span)
            .instrument(tracing_span)
            .await;
        if let Err(error) = &result {
            span.on_error(error);
        }
        span.on_end();
        result
    }
}
