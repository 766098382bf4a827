#![allow(dead_code)]

use clover_companion::{CompanionConfig, CompanionStore};
use clover_sdk::{
    clover_sdk_test::MockTransport, Coverage, CompanionSummary, GlobalStatus, IssueCounts,
    IssueSeverity, PlaybookStep, PlaybookSurface,
};
use serde_json::{json, Value};
use std::{collections::HashMap, sync::Arc, time::Duration};

pub const TTL: Duration = Duration::from_secs(60);

pub fn store() -> (Arc<MockTransport>, Arc<CompanionStore>) {
    store_with(CompanionConfig::default().with_ttl(TTL).with_error_ttl(TTL))
}

pub fn store_with(config: CompanionConfig) -> (Arc<MockTransport>, Arc<CompanionStore>) {
    let transport = Arc::new(MockTransport::new());
    let store = Arc::new(CompanionStore::from_transport(transport.clone(), config));
    (transport, store)
}

pub fn overview_json(context: &str, has_new_actions: bool) -> Value {
    json!({
        "context": context,
        "health_index": { "score": 74.0, "breakdown": {} },
        "insights": [{
            "id": format!("{context}_ins_1"),
            "context": context,
            "severity": "warning",
            "title": "Unmatched deposit",
            "body": "A deposit of $1,200.00 has no matching invoice.",
            "created_at": "2025-03-04T09:30:00Z"
        }],
        "actions": [{
            "id": format!("{context}_act_1"),
            "context": context,
            "action_type": "match_invoice_payment",
            "status": "open",
            "confidence": 0.9,
            "summary": "Match to INV-1042",
            "payload": { "invoice_id": 1042 },
            "severity": "warning"
        }],
        "context_all_clear": false,
        "context_reasons": ["1 deposit needs a match"],
        "context_severity": "warning",
        "has_new_actions": has_new_actions,
        "new_actions_count": u32::from(has_new_actions)
    })
}

pub fn calm_overview_json(context: &str) -> Value {
    json!({
        "context": context,
        "insights": [],
        "actions": [],
        "context_all_clear": true,
        "context_reasons": [],
        "has_new_actions": false
    })
}

pub fn summary(score: f64) -> CompanionSummary {
    CompanionSummary {
        ai_companion_enabled: true,
        health_score: Some(score),
        ..CompanionSummary::default()
    }
}

pub fn with_high_issues(mut summary: CompanionSummary, high: u32) -> CompanionSummary {
    summary.global = Some(GlobalStatus {
        open_issues_by_severity: IssueCounts {
            high,
            ..IssueCounts::default()
        },
    });
    summary
}

pub fn with_coverage(mut summary: CompanionSummary, pct: f64) -> CompanionSummary {
    summary.coverage = Some(Coverage {
        overall_coverage_pct: pct,
        domains: HashMap::new(),
    });
    summary
}

pub fn step(label: &str, severity: IssueSeverity, surface: Option<&str>) -> PlaybookStep {
    PlaybookStep {
        label: label.to_string(),
        description: String::new(),
        severity,
        surface: surface.map(PlaybookSurface::from),
        url: None,
    }
}
