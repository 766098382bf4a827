use crate::{
    cache::{CachedResult, TtlCache},
    poller::Poller,
    CompanionConfig, ConfigError,
};
use clover_sdk::{
    ActionResponse, ApiError, ApiResult, ApplyActionRequest, CompanionApi, CompanionContext,
    CompanionOverview, CompanionSummary, ContextSeenResponse, PeriodRange, Transport,
};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tokio::sync::watch;
use tracing::{info, warn};

const SUMMARY_KEY: &str = "summary";

/// Cache key of an overview: `context` or `context|start|end`.
#[must_use]
pub fn overview_key(context: CompanionContext, period: Option<PeriodRange>) -> String {
    match period {
        Some(period) => format!("{}|{}|{}", context.as_str(), period.start, period.end),
        None => context.as_str().to_string(),
    }
}

fn key_has_context(key: &str, context: CompanionContext) -> bool {
    let context = context.as_str();
    key == context
        || key
            .strip_prefix(context)
            .is_some_and(|rest| rest.starts_with('|'))
}

/// Companion data shared by every view of a session: cached overviews per
/// context and period, the agentic summary, and the mutations that
/// invalidate or patch them.
pub struct CompanionStore {
    api: CompanionApi,
    config: CompanionConfig,
    overviews: TtlCache<CompanionOverview>,
    summary: TtlCache<CompanionSummary>,
}

impl CompanionStore {
    #[must_use]
    pub fn new(api: CompanionApi, config: CompanionConfig) -> Self {
        let policy = config.cache_policy();
        Self {
            api,
            config,
            overviews: TtlCache::new(policy),
            summary: TtlCache::new(policy),
        }
    }

    #[must_use]
    pub fn from_transport(transport: Arc<dyn Transport>, config: CompanionConfig) -> Self {
        Self::new(CompanionApi::new(transport), config)
    }

    #[must_use]
    pub fn config(&self) -> &CompanionConfig {
        &self.config
    }

    #[must_use]
    pub fn overviews(&self) -> &TtlCache<CompanionOverview> {
        &self.overviews
    }

    #[must_use]
    pub fn summaries(&self) -> &TtlCache<CompanionSummary> {
        &self.summary
    }

    /// Overview of `context`, served from the cache while fresh.
    pub async fn get_overview(
        &self,
        context: CompanionContext,
        period: Option<PeriodRange>,
    ) -> CachedResult<CompanionOverview> {
        let api = self.api.clone();
        self.overviews
            .get_or_fetch(&overview_key(context, period), move || async move {
                api.overview(context, period).await
            })
            .await
    }

    /// Drop the cached overview and fetch it again.
    pub async fn refresh_overview(
        &self,
        context: CompanionContext,
        period: Option<PeriodRange>,
    ) -> CachedResult<CompanionOverview> {
        self.overviews.invalidate(&overview_key(context, period));
        self.get_overview(context, period).await
    }

    /// The agentic summary, served from the cache while fresh.
    pub async fn get_summary(&self) -> CachedResult<CompanionSummary> {
        let api = self.api.clone();
        self.summary
            .get_or_fetch(SUMMARY_KEY, move || async move { api.summary().await })
            .await
    }

    /// Invalidate every cached overview of `context` plus the summary.
    /// Returns the number of overview entries dropped.
    pub fn invalidate_context(&self, context: CompanionContext) -> usize {
        self.summary.invalidate(SUMMARY_KEY);
        self.overviews
            .invalidate_where(|key| key_has_context(key, context))
    }

    /// Apply a suggested action. On success the context's cached data is
    /// invalidated so the next read shows the server-side result.
    pub async fn apply_action(
        &self,
        context: CompanionContext,
        action_id: &str,
        override_splits: Option<Vec<Value>>,
    ) -> ApiResult<ActionResponse> {
        let response = self
            .api
            .apply_action(action_id, ApplyActionRequest { override_splits })
            .await
            .inspect_err(|error| warn!(action_id, %error, "failed to apply companion action"))?;
        info!(action_id, context = %context, "applied companion action");
        self.invalidate_context(context);
        Ok(response)
    }

    /// Dismiss a suggested action. On success the context's cached data is
    /// invalidated.
    pub async fn dismiss_action(
        &self,
        context: CompanionContext,
        action_id: &str,
    ) -> ApiResult<ActionResponse> {
        let response = self
            .api
            .dismiss_action(action_id)
            .await
            .inspect_err(|error| warn!(action_id, %error, "failed to dismiss companion action"))?;
        info!(action_id, context = %context, "dismissed companion action");
        self.invalidate_context(context);
        Ok(response)
    }

    /// Tell the backend the user has seen `context`. On success every cached
    /// overview of that context has its "new actions" flags cleared in
    /// place; other contexts are untouched.
    pub async fn mark_seen(&self, context: CompanionContext) -> ApiResult<ContextSeenResponse> {
        let response = self
            .api
            .mark_context_seen(context)
            .await
            .inspect_err(|error| warn!(context = %context, %error, "failed to mark context seen"))?;
        if response.ok {
            self.overviews.patch(
                |key| key_has_context(key, context),
                CompanionOverview::marked_seen,
            );
        }
        Ok(response)
    }

    /// Keep an overview up to date: load it now, then invalidate and refetch
    /// it every `interval` (the configured poll interval when `None`) until
    /// the returned watch is dropped or its poller cancelled. A zero interval
    /// is rejected before anything is fetched.
    pub fn watch_overview(
        self: &Arc<Self>,
        context: CompanionContext,
        period: Option<PeriodRange>,
        interval: Option<Duration>,
    ) -> Result<OverviewWatch, ConfigError> {
        let (sender, receiver) = watch::channel(OverviewState::Loading);
        let sender = Arc::new(sender);

        let poller = Poller::spawn(
            interval.unwrap_or(self.config.poll_interval),
            true,
            {
                let store = Arc::clone(self);
                let sender = Arc::clone(&sender);
                move || {
                    let store = Arc::clone(&store);
                    let sender = Arc::clone(&sender);
                    async move {
                        let result = store.refresh_overview(context, period).await;
                        sender.send_replace(result.into());
                    }
                }
            },
        )?;

        let initial = tokio::spawn({
            let store = Arc::clone(self);
            async move {
                let result = store.get_overview(context, period).await;
                sender.send_replace(result.into());
            }
        });

        Ok(OverviewWatch {
            receiver,
            poller,
            initial,
        })
    }
}

/// Latest known state of a watched overview.
#[derive(Debug, Clone)]
pub enum OverviewState {
    Loading,
    Ready(Arc<CompanionOverview>),
    Failed(ApiError),
}

impl OverviewState {
    #[must_use]
    pub fn overview(&self) -> Option<&CompanionOverview> {
        match self {
            Self::Ready(overview) => Some(overview),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn has_error(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl From<CachedResult<CompanionOverview>> for OverviewState {
    fn from(result: CachedResult<CompanionOverview>) -> Self {
        match result {
            Ok(overview) => Self::Ready(overview),
            Err(error) => Self::Failed(error),
        }
    }
}

/// Handle returned by [`CompanionStore::watch_overview`]. Dropping it stops
/// polling.
pub struct OverviewWatch {
    receiver: watch::Receiver<OverviewState>,
    poller: Poller,
    initial: tokio::task::JoinHandle<()>,
}

impl OverviewWatch {
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<OverviewState> {
        self.receiver.clone()
    }

    #[must_use]
    pub fn current(&self) -> OverviewState {
        self.receiver.borrow().clone()
    }

    #[must_use]
    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    /// Stop polling. The last published state stays readable.
    pub fn cancel(&self) {
        self.initial.abort();
        self.poller.cancel();
    }
}

impl Drop for OverviewWatch {
    fn drop(&mut self) {
        self.initial.abort();
    }
}
