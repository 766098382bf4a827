use crate::{
    Action, ActionStatus, ApiError, ApiResult, CompanionContext, CompanionOverview,
    CompanionSummary, Insight, IssueSeverity, PeriodRange, PlaybookStep, PlaybookSurface,
};
use chrono::NaiveDate;
use std::{fmt, str::FromStr};

impl CompanionContext {
    pub const ALL: [Self; 6] = [
        Self::Bank,
        Self::Invoices,
        Self::Expenses,
        Self::Reports,
        Self::TaxFx,
        Self::Dashboard,
    ];

    /// The wire name of the context, also used as the surface key of
    /// `llm_subtitles`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Invoices => "invoices",
            Self::Expenses => "expenses",
            Self::Reports => "reports",
            Self::TaxFx => "tax_fx",
            Self::Dashboard => "dashboard",
        }
    }
}

impl fmt::Display for CompanionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompanionContext {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|context| context.as_str() == s)
            .ok_or_else(|| ApiError::InvalidInput(format!("unknown companion context: {s}")))
    }
}

impl PeriodRange {
    /// Create an inclusive range. Fails when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> ApiResult<Self> {
        if start > end {
            return Err(ApiError::InvalidInput(format!(
                "period start {start} is after period end {end}"
            )));
        }
        Ok(Self { start, end })
    }
}

impl Action {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == ActionStatus::Open
    }
}

impl CompanionOverview {
    /// Undismissed insights tagged with `context`.
    pub fn insights_for(&self, context: CompanionContext) -> impl Iterator<Item = &Insight> {
        self.insights
            .iter()
            .filter(move |insight| insight.context == context && !insight.is_dismissed)
    }

    /// Open actions tagged with `context`.
    pub fn open_actions_for(&self, context: CompanionContext) -> impl Iterator<Item = &Action> {
        self.actions
            .iter()
            .filter(move |action| action.context == context && action.is_open())
    }

    /// Copy of the overview with the "new actions" flags cleared.
    #[must_use]
    pub fn marked_seen(&self) -> Self {
        Self {
            has_new_actions: false,
            new_actions_count: 0,
            ..self.clone()
        }
    }
}

impl CompanionSummary {
    /// The health score used for focus decisions: `health_score` when the
    /// server sends one, else the mean radar axis score, else 0.
    #[must_use]
    pub fn score(&self) -> f64 {
        if let Some(score) = self.health_score {
            return score;
        }
        if self.radar.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let count = self.radar.len() as f64;
        self.radar.values().map(|axis| axis.score).sum::<f64>() / count
    }

    /// Open high-severity issues anywhere in the books, or a high-severity
    /// playbook step on `context`.
    #[must_use]
    pub fn has_high_severity_issues(&self, context: CompanionContext) -> bool {
        let global_high = self
            .global
            .as_ref()
            .is_some_and(|global| global.open_issues_by_severity.high > 0);
        global_high
            || self
                .playbook
                .iter()
                .any(|step| step.severity == IssueSeverity::High && step.applies_to(context))
    }

    /// The LLM subtitle for a surface, if the server sent a non-blank one.
    #[must_use]
    pub fn llm_subtitle(&self, context: CompanionContext) -> Option<&str> {
        self.llm_subtitles
            .get(context.as_str())
            .map(|subtitle| subtitle.trim())
            .filter(|subtitle| !subtitle.is_empty())
    }
}

impl PlaybookSurface {
    #[must_use]
    pub fn context(&self) -> Option<CompanionContext> {
        match self {
            Self::Context(context) => Some(*context),
            Self::Other(_) => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Context(context) => context.as_str(),
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for PlaybookSurface {
    fn from(name: &str) -> Self {
        name.parse().map_or_else(|_| Self::Other(name.to_string()), Self::Context)
    }
}

impl From<CompanionContext> for PlaybookSurface {
    fn from(context: CompanionContext) -> Self {
        Self::Context(context)
    }
}

impl PlaybookStep {
    /// Whether the step shows on `context`. Steps without a surface apply
    /// everywhere, and the dashboard takes steps from every surface.
    #[must_use]
    pub fn applies_to(&self, context: CompanionContext) -> bool {
        if context == CompanionContext::Dashboard {
            return true;
        }
        match &self.surface {
            None => true,
            Some(surface) => surface.context() == Some(context),
        }
    }
}
