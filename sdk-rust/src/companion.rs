use crate::{
    client_utils::from_json_value,
    transport::{ApiRequest, Transport},
    ActionResponse, ApiError, ApiResult, ApplyActionRequest, CompanionContext, CompanionOverview,
    CompanionSummary, ContextSeenRequest, ContextSeenResponse, PeriodRange,
};
use serde_json::Value;
use std::sync::Arc;

pub const OVERVIEW_PATH: &str = "/api/companion/overview/";
pub const SUMMARY_PATH: &str = "/api/agentic/companion/summary";
pub const CONTEXT_SEEN_PATH: &str = "/api/companion/context-seen/";

/// Typed Companion endpoints over any [`Transport`].
#[derive(Clone)]
pub struct CompanionApi {
    transport: Arc<dyn Transport>,
}

impl CompanionApi {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// `GET /api/companion/overview/?context=..[&period_start=..&period_end=..]`
    pub async fn overview(
        &self,
        context: CompanionContext,
        period: Option<PeriodRange>,
    ) -> ApiResult<CompanionOverview> {
        let mut request = ApiRequest::get(OVERVIEW_PATH).with_query("context", context.as_str());
        if let Some(period) = period {
            request = request
                .with_query("period_start", period.start.to_string())
                .with_query("period_end", period.end.to_string());
        }
        let value = self.transport.send(request).await?;
        from_json_value(value)
    }

    /// `GET /api/agentic/companion/summary`
    pub async fn summary(&self) -> ApiResult<CompanionSummary> {
        let value = self.transport.send(ApiRequest::get(SUMMARY_PATH)).await?;
        from_json_value(value)
    }

    /// `POST /api/companion/actions/{id}/apply/`. The body is empty unless
    /// override splits are given.
    pub async fn apply_action(
        &self,
        action_id: &str,
        request: ApplyActionRequest,
    ) -> ApiResult<ActionResponse> {
        let path = action_path(action_id, "apply")?;
        let body = if request.override_splits.is_some() {
            Some(serde_json::to_value(&request)?)
        } else {
            None
        };
        let value = self.transport.send(ApiRequest::post(path, body)).await?;
        from_json_value(value)
    }

    /// `POST /api/companion/actions/{id}/dismiss/`
    pub async fn dismiss_action(&self, action_id: &str) -> ApiResult<ActionResponse> {
        let path = action_path(action_id, "dismiss")?;
        let value = self.transport.send(ApiRequest::post(path, None)).await?;
        from_json_value(value)
    }

    /// `POST /api/companion/context-seen/` with `{ "context": .. }`.
    pub async fn mark_context_seen(
        &self,
        context: CompanionContext,
    ) -> ApiResult<ContextSeenResponse> {
        let body: Value = serde_json::to_value(ContextSeenRequest { context })?;
        let value = self
            .transport
            .send(ApiRequest::post(CONTEXT_SEEN_PATH, Some(body)))
            .await?;
        from_json_value(value)
    }
}

fn action_path(action_id: &str, verb: &str) -> ApiResult<String> {
    let valid = !action_id.is_empty()
        && action_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(ApiError::InvalidInput(format!(
            "invalid action id: {action_id:?}"
        )));
    }
    Ok(format!("/api/companion/actions/{action_id}/{verb}/"))
}
