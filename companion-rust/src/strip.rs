use clover_sdk::{ActionType, CompanionContext, CompanionOverview, Severity};
use serde::Serialize;

pub const UNAVAILABLE_MESSAGE: &str = "Companion temporarily unavailable";
pub const ALL_CLEAR_MESSAGE: &str = "Everything looks good here";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StripInsight {
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub body: String,
    /// LLM explanation of the insight, when the overview carries one.
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StripSuggestion {
    pub id: String,
    pub action_type: ActionType,
    pub summary: String,
    pub severity: Severity,
    /// Confidence rounded to a whole percentage.
    pub confidence_pct: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttentionStrip {
    pub context: CompanionContext,
    pub severity: Option<Severity>,
    pub reasons: Vec<String>,
    pub insights: Vec<StripInsight>,
    pub suggestions: Vec<StripSuggestion>,
    pub has_new_actions: bool,
    pub new_actions_count: u32,
}

/// What the per-context Companion strip shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StripView {
    Loading,
    Unavailable { message: String },
    AllClear { message: String },
    Attention(AttentionStrip),
}

/// Derive the strip for `context` from a cached overview.
#[must_use]
pub fn build_strip_view(
    context: CompanionContext,
    overview: Option<&CompanionOverview>,
    has_error: bool,
    loading: bool,
) -> StripView {
    if loading {
        return StripView::Loading;
    }
    let Some(overview) = overview.filter(|_| !has_error) else {
        return StripView::Unavailable {
            message: UNAVAILABLE_MESSAGE.to_string(),
        };
    };

    let explanations = overview
        .llm_narrative
        .as_ref()
        .map(|narrative| &narrative.insight_explanations);

    let mut insights: Vec<_> = overview.insights_for(context).collect();
    insights.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    let insights: Vec<StripInsight> = insights
        .into_iter()
        .map(|insight| StripInsight {
            id: insight.id.clone(),
            severity: insight.severity,
            title: insight.title.clone(),
            body: insight.body.clone(),
            explanation: explanations
                .and_then(|explanations| explanations.get(&insight.id))
                .filter(|text| !text.trim().is_empty())
                .cloned(),
        })
        .collect();

    let mut actions: Vec<_> = overview.open_actions_for(context).collect();
    actions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    let suggestions: Vec<StripSuggestion> = actions
        .into_iter()
        .map(|action| StripSuggestion {
            id: action.id.clone(),
            action_type: action.action_type,
            summary: action.summary.clone(),
            severity: action.severity,
            confidence_pct: confidence_pct(action.confidence),
        })
        .collect();

    if overview.context_all_clear && insights.is_empty() && suggestions.is_empty() {
        return StripView::AllClear {
            message: ALL_CLEAR_MESSAGE.to_string(),
        };
    }

    StripView::Attention(AttentionStrip {
        context,
        severity: overview.context_severity,
        reasons: overview.context_reasons.clone(),
        insights,
        suggestions,
        has_new_actions: overview.has_new_actions,
        new_actions_count: overview.new_actions_count,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn confidence_pct(confidence: f64) -> u8 {
    if confidence.is_nan() {
        return 0;
    }
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u8
}

impl StripView {
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Unavailable { message } | Self::AllClear { message } => Some(message),
            Self::Loading | Self::Attention(_) => None,
        }
    }

    /// Plain-text rendering, one line per row.
    #[must_use]
    pub fn render_lines(&self) -> Vec<String> {
        match self {
            Self::Loading => vec!["Loading Companion...".to_string()],
            Self::Unavailable { message } | Self::AllClear { message } => vec![message.clone()],
            Self::Attention(strip) => render_attention(strip),
        }
    }
}

fn render_attention(strip: &AttentionStrip) -> Vec<String> {
    let mut lines = Vec::new();

    let mut header = format!("Companion · {}", strip.context);
    if let Some(severity) = strip.severity {
        header.push_str(&format!(" [{}]", severity_label(severity)));
    }
    if strip.has_new_actions {
        header.push_str(&format!(" ({} new)", strip.new_actions_count));
    }
    lines.push(header);

    lines.extend(strip.reasons.iter().map(|reason| format!("  {reason}")));

    for insight in &strip.insights {
        lines.push(format!(
            "  {} {}",
            severity_marker(insight.severity),
            insight.title
        ));
        if let Some(explanation) = &insight.explanation {
            lines.push(format!("      {explanation}"));
        }
    }

    if !strip.suggestions.is_empty() {
        lines.push("  Suggestions:".to_string());
        for suggestion in &strip.suggestions {
            lines.push(format!(
                "    - {} ({}% confidence)",
                suggestion.summary, suggestion.confidence_pct
            ));
        }
    }

    lines
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Warning => "warning",
        Severity::Critical => "critical",
    }
}

fn severity_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "·",
        Severity::Warning => "!",
        Severity::Critical => "!!",
    }
}
