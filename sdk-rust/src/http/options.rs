use std::env;

#[derive(Debug, Clone, Default)]
pub struct HttpTransportOptions {
    /// Origin of the backend, e.g. `https://app.cloverbooks.com`.
    /// Defaults to `http://localhost:8000`.
    pub base_url: Option<String>,
    /// Raw `Cookie` header carrying the authenticated session.
    pub session_cookie: Option<String>,
    /// CSRF token for state-changing requests. When unset, the token is read
    /// from the `csrftoken` cookie, then from the bootstrap config endpoint.
    pub csrf_token: Option<String>,
    /// Path of the bootstrap config endpoint. Defaults to `/api/auth/config/`.
    pub csrf_config_path: Option<String>,
    pub user_agent: Option<String>,
}

impl HttpTransportOptions {
    /// Read options from `CLOVER_API_BASE_URL`, `CLOVER_SESSION_COOKIE` and
    /// `CLOVER_CSRF_TOKEN`. Unset variables keep their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("CLOVER_API_BASE_URL").ok(),
            session_cookie: env::var("CLOVER_SESSION_COOKIE").ok(),
            csrf_token: env::var("CLOVER_CSRF_TOKEN").ok(),
            ..Default::default()
        }
    }
}
