mod cache;
mod config;
mod errors;
mod permissions;
mod poller;
mod seen;
mod store;
mod strip;
mod view_model;

pub use cache::{CachePolicy, CachedResult, TtlCache};
pub use config::CompanionConfig;
pub use errors::ConfigError;
pub use permissions::{Permissions, PermissionLevel, SessionPermissions, DEFAULT_ALIASES};
pub use poller::{Poller, DEFAULT_POLL_INTERVAL};
pub use seen::{MarkSeenOnce, SeenState};
pub use store::{overview_key, CompanionStore, OverviewState, OverviewWatch};
pub use strip::{
    build_strip_view, AttentionStrip, StripInsight, StripSuggestion, StripView,
    ALL_CLEAR_MESSAGE, UNAVAILABLE_MESSAGE,
};
pub use view_model::{
    build_view_model, build_view_model_at_hour, coverage_sentence, greeting, headline,
    top_playbook_step, CompanionViewModel, FocusMode, ALL_CLEAR_MIN_SCORE, WATCHLIST_MIN_SCORE,
};
