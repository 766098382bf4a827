use chrono::{Local, Timelike};
use clover_sdk::{CompanionContext, CompanionSummary, IssueSeverity, PlaybookStep};
use serde::Serialize;

pub const ALL_CLEAR_MIN_SCORE: f64 = 80.0;
pub const WATCHLIST_MIN_SCORE: f64 = 50.0;

const STRONG_COVERAGE_PCT: f64 = 90.0;
const PARTIAL_COVERAGE_PCT: f64 = 60.0;

const UNAVAILABLE_GREETING: &str = "Hello";
const UNAVAILABLE_HEADLINE: &str = "Companion temporarily unavailable";
const UNAVAILABLE_SUBTITLE: &str =
    "Insights will be back shortly. Nothing in your books has changed.";
const ANALYZING_SUBTITLE: &str = "Companion is still analyzing your latest activity.";

/// Qualitative status of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusMode {
    AllClear,
    Watchlist,
    FireDrill,
}

impl FocusMode {
    /// `score >= 80` without high-severity issues is all clear, `score >= 50`
    /// is a watchlist, anything lower is a fire drill.
    #[must_use]
    pub fn from_score(score: f64, has_high_severity_issues: bool) -> Self {
        if score >= ALL_CLEAR_MIN_SCORE && !has_high_severity_issues {
            Self::AllClear
        } else if score >= WATCHLIST_MIN_SCORE {
            Self::Watchlist
        } else {
            Self::FireDrill
        }
    }
}

/// Banner copy for a Companion surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanionViewModel {
    pub greeting: String,
    pub headline: String,
    pub subtitle: String,
    pub focus_mode: FocusMode,
    /// True only when `subtitle` is the server's LLM narrative. Drives the
    /// "AI generated" badge.
    pub is_llm_subtitle: bool,
}

impl CompanionViewModel {
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            greeting: UNAVAILABLE_GREETING.to_string(),
            headline: UNAVAILABLE_HEADLINE.to_string(),
            subtitle: UNAVAILABLE_SUBTITLE.to_string(),
            focus_mode: FocusMode::Watchlist,
            is_llm_subtitle: false,
        }
    }
}

/// Build the banner view model using the local clock for the greeting.
#[must_use]
pub fn build_view_model(
    context: CompanionContext,
    summary: Option<&CompanionSummary>,
    user_name: Option<&str>,
    has_error: bool,
) -> CompanionViewModel {
    build_view_model_at_hour(context, summary, user_name, has_error, Local::now().hour())
}

/// Build the banner view model for a given local hour (0-23).
#[must_use]
pub fn build_view_model_at_hour(
    context: CompanionContext,
    summary: Option<&CompanionSummary>,
    user_name: Option<&str>,
    has_error: bool,
    hour: u32,
) -> CompanionViewModel {
    let Some(summary) = summary.filter(|_| !has_error) else {
        return CompanionViewModel::unavailable();
    };

    let focus_mode = FocusMode::from_score(summary.score(), summary.has_high_severity_issues(context));
    let (subtitle, is_llm_subtitle) = match summary.llm_subtitle(context) {
        Some(subtitle) => (subtitle.to_string(), true),
        None => (fallback_subtitle(context, summary), false),
    };

    CompanionViewModel {
        greeting: greeting(hour, user_name),
        headline: headline(context, focus_mode).to_string(),
        subtitle,
        focus_mode,
        is_llm_subtitle,
    }
}

/// "Good morning" from 5:00, "Good afternoon" from 12:00, "Good evening"
/// from 18:00 until 5:00, personalized with the first word of `name`.
#[must_use]
pub fn greeting(hour: u32, name: Option<&str>) -> String {
    let salutation = match hour {
        5..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    };
    match name.and_then(|name| name.split_whitespace().next()) {
        Some(first_name) => format!("{salutation}, {first_name}"),
        None => salutation.to_string(),
    }
}

#[must_use]
pub fn headline(context: CompanionContext, focus_mode: FocusMode) -> &'static str {
    use CompanionContext as C;
    use FocusMode as F;

    match (context, focus_mode) {
        (C::Bank, F::AllClear) => "Your bank feeds are reconciled and calm.",
        (C::Bank, F::Watchlist) => "A few bank items need a look.",
        (C::Bank, F::FireDrill) => "Bank reconciliation needs attention now.",
        (C::Invoices, F::AllClear) => "Invoices are on track.",
        (C::Invoices, F::Watchlist) => "Some invoices need follow-up.",
        (C::Invoices, F::FireDrill) => "Overdue invoices need action.",
        (C::Expenses, F::AllClear) => "Expenses are categorized and tidy.",
        (C::Expenses, F::Watchlist) => "A few expenses need review.",
        (C::Expenses, F::FireDrill) => "Expense issues are piling up.",
        (C::Reports, F::AllClear) => "Your reports are ready to trust.",
        (C::Reports, F::Watchlist) => "Reports have a few open questions.",
        (C::Reports, F::FireDrill) => "Reports are blocked by open issues.",
        (C::TaxFx, F::AllClear) => "Tax and FX look consistent.",
        (C::TaxFx, F::Watchlist) => "Some tax or FX items need review.",
        (C::TaxFx, F::FireDrill) => "Tax and FX issues need attention now.",
        (C::Dashboard, F::AllClear) => "Your books look healthy.",
        (C::Dashboard, F::Watchlist) => "A few areas need your attention.",
        (C::Dashboard, F::FireDrill) => "Several issues need attention today.",
    }
}

fn fallback_subtitle(context: CompanionContext, summary: &CompanionSummary) -> String {
    if let Some(step) = top_playbook_step(context, &summary.playbook) {
        return format!("Top next step: {}", step.label);
    }
    if let Some(coverage) = &summary.coverage {
        return coverage_sentence(coverage.overall_coverage_pct);
    }
    ANALYZING_SUBTITLE.to_string()
}

/// First medium or high severity step for `context`. Steps without a surface
/// apply everywhere, and the dashboard takes steps from every surface.
#[must_use]
pub fn top_playbook_step(
    context: CompanionContext,
    playbook: &[PlaybookStep],
) -> Option<&PlaybookStep> {
    playbook.iter().find(|step| {
        matches!(step.severity, IssueSeverity::Medium | IssueSeverity::High)
            && step.applies_to(context)
    })
}

/// Sentence for the coverage band of `pct`: `>= 90`, `>= 60`, or below.
#[must_use]
pub fn coverage_sentence(pct: f64) -> String {
    let shown = pct.clamp(0.0, 100.0).floor();
    if pct >= STRONG_COVERAGE_PCT {
        format!("Coverage is strong: {shown:.0}% of activity has been reviewed.")
    } else if pct >= PARTIAL_COVERAGE_PCT {
        format!("Coverage is at {shown:.0}%; a few areas still need review.")
    } else {
        format!("Coverage is light at {shown:.0}%; start with the highest-impact items.")
    }
}
