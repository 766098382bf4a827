use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// The UI area a piece of Companion data applies to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum CompanionContext {
    Bank,
    Invoices,
    Expenses,
    Reports,
    TaxFx,
    Dashboard,
}

/// Severity of an insight, or the overall severity of a context. Unknown
/// severities deserialize as `Info`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning = 1,
    Critical = 2,
    #[serde(other)]
    Info = 0,
}

/// Severity used by the agentic summary (playbook steps, issue counts).
/// Unknown severities deserialize as `Low`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Medium = 1,
    High = 2,
    #[serde(other)]
    Low = 0,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Open,
    Applied,
    Dismissed,
}

/// The kind of remediation an action proposes. Kinds this client does not
/// know about deserialize as `Other`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    CategorizeTransactions,
    ReconcileBank,
    MatchInvoicePayment,
    FixTaxMapping,
    ReviewExpense,
    AdjustFxRate,
    #[serde(other)]
    Other,
}

/// An inclusive calendar date range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct PeriodRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A server-generated observation about the user's books.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Insight {
    pub id: String,
    pub context: CompanionContext,
    pub severity: Severity,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_dismissed: bool,
}

/// A suggested remediation the user may apply or dismiss.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Action {
    pub id: String,
    pub context: CompanionContext,
    pub action_type: ActionType,
    pub status: ActionStatus,
    /// Model confidence in the range 0.0 to 1.0.
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub payload: Value,
    pub severity: Severity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct HealthIndex {
    pub score: f64,
    #[serde(default)]
    pub breakdown: HashMap<String, f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct LlmNarrative {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Per-insight explanations keyed by insight id.
    #[serde(default)]
    pub insight_explanations: HashMap<String, String>,
}

/// Snapshot returned by `GET /api/companion/overview/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct CompanionOverview {
    pub health_index: Option<HealthIndex>,
    pub insights: Vec<Insight>,
    pub actions: Vec<Action>,
    pub llm_narrative: Option<LlmNarrative>,
    pub context: Option<CompanionContext>,
    pub context_all_clear: bool,
    pub context_reasons: Vec<String>,
    pub context_severity: Option<Severity>,
    pub has_new_actions: bool,
    pub new_actions_count: u32,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct RadarAxis {
    pub score: f64,
    #[serde(default)]
    pub open_issues: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Coverage {
    pub overall_coverage_pct: f64,
    #[serde(default)]
    pub domains: HashMap<String, f64>,
}

/// Where a playbook step belongs. Surfaces without a matching context are
/// kept by name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(untagged)]
pub enum PlaybookSurface {
    Context(CompanionContext),
    Other(String),
}

/// One recommended next step in the Companion playbook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct PlaybookStep {
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub severity: IssueSeverity,
    /// The context this step belongs to. `None` applies to every context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<PlaybookSurface>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum CloseReadinessStatus {
    Ready,
    NotReady,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct CloseReadiness {
    #[serde(default)]
    pub status: CloseReadinessStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_label: Option<String>,
    #[serde(default)]
    pub blocking_reasons: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct CompanionStory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_summary: Option<String>,
    #[serde(default)]
    pub timeline_bullets: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct IssueCounts {
    pub low: u32,
    pub medium: u32,
    pub high: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct GlobalStatus {
    pub open_issues_by_severity: IssueCounts,
}

/// Richer summary returned by `GET /api/agentic/companion/summary`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct CompanionSummary {
    pub ai_companion_enabled: bool,
    pub generated_at: Option<DateTime<Utc>>,
    pub health_score: Option<f64>,
    pub radar: HashMap<String, RadarAxis>,
    pub coverage: Option<Coverage>,
    pub playbook: Vec<PlaybookStep>,
    pub close_readiness: Option<CloseReadiness>,
    /// LLM-written subtitles keyed by surface (`bank`, `invoices`, ...).
    pub llm_subtitles: HashMap<String, String>,
    pub story: Option<CompanionStory>,
    pub global: Option<GlobalStatus>,
}

/// Body of `POST /api/companion/actions/{id}/apply/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ApplyActionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_splits: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ActionResponse {
    #[serde(default = "default_ok")]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ContextSeenRequest {
    pub context: CompanionContext,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ContextSeenResponse {
    #[serde(default = "default_ok")]
    pub ok: bool,
}

// A 2xx response with an empty body counts as success.
fn default_ok() -> bool {
    true
}
