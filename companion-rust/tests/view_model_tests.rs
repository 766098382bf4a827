mod common;

use clover_companion::{
    build_view_model, build_view_model_at_hour, coverage_sentence, greeting, headline,
    CompanionViewModel, FocusMode,
};
use clover_sdk::{CompanionContext, CompanionSummary, IssueSeverity, RadarAxis};
use common::{step, summary, with_coverage, with_high_issues};
use serde_json::json;

const MORNING: u32 = 9;

#[test]
fn high_score_without_high_issues_is_all_clear() {
    for context in CompanionContext::ALL {
        for score in [80.0, 80.5, 93.0, 100.0] {
            let vm = build_view_model_at_hour(context, Some(&summary(score)), None, false, MORNING);
            assert_eq!(vm.focus_mode, FocusMode::AllClear, "{context} at {score}");
        }
    }
}

#[test]
fn high_score_with_high_issues_is_watchlist() {
    let summary = with_high_issues(summary(95.0), 1);
    let vm = build_view_model_at_hour(CompanionContext::Bank, Some(&summary), None, false, MORNING);
    assert_eq!(vm.focus_mode, FocusMode::Watchlist);
}

#[test]
fn high_severity_playbook_step_counts_as_high_issue() {
    let mut summary = summary(85.0);
    summary.playbook = vec![step("Fix VAT mapping", IssueSeverity::High, Some("tax_fx"))];
    let vm =
        build_view_model_at_hour(CompanionContext::TaxFx, Some(&summary), None, false, MORNING);
    assert_eq!(vm.focus_mode, FocusMode::Watchlist);
}

#[test]
fn high_severity_step_only_caps_its_own_surface() {
    let mut summary = summary(85.0);
    summary.playbook = vec![
        step("Send invoice reminders", IssueSeverity::High, Some("invoices")),
        step("Tidy receipts", IssueSeverity::Medium, None),
    ];

    let focus = |context| {
        build_view_model_at_hour(context, Some(&summary), None, false, MORNING).focus_mode
    };
    assert_eq!(focus(CompanionContext::Bank), FocusMode::AllClear);
    assert_eq!(focus(CompanionContext::Invoices), FocusMode::Watchlist);
    assert_eq!(focus(CompanionContext::Dashboard), FocusMode::Watchlist);
}

#[test]
fn unknown_playbook_surface_does_not_blank_the_banner() {
    let summary: CompanionSummary = serde_json::from_value(json!({
        "health_score": 92,
        "llm_subtitles": { "bank": "Bank is calm." },
        "playbook": [
            { "label": "Run payroll", "severity": "high", "surface": "payroll" },
            { "label": "File payroll taxes", "severity": "medium", "surface": "payroll" }
        ]
    }))
    .unwrap();

    let bank =
        build_view_model_at_hour(CompanionContext::Bank, Some(&summary), None, false, MORNING);
    assert_eq!(bank.focus_mode, FocusMode::AllClear);
    assert_eq!(bank.subtitle, "Bank is calm.");
    assert!(bank.is_llm_subtitle);

    let expenses =
        build_view_model_at_hour(CompanionContext::Expenses, Some(&summary), None, false, MORNING);
    assert_eq!(
        expenses.subtitle,
        "Companion is still analyzing your latest activity."
    );

    let dashboard =
        build_view_model_at_hour(CompanionContext::Dashboard, Some(&summary), None, false, MORNING);
    assert_eq!(dashboard.focus_mode, FocusMode::Watchlist);
    assert_eq!(dashboard.subtitle, "Top next step: Run payroll");
}

#[test]
fn middle_scores_are_watchlist_and_low_scores_fire_drill() {
    for (score, expected) in [
        (79.99, FocusMode::Watchlist),
        (50.0, FocusMode::Watchlist),
        (49.99, FocusMode::FireDrill),
        (0.0, FocusMode::FireDrill),
    ] {
        let summary = with_high_issues(summary(score), 2);
        let vm = build_view_model_at_hour(
            CompanionContext::Invoices,
            Some(&summary),
            None,
            false,
            MORNING,
        );
        assert_eq!(vm.focus_mode, expected, "score {score}");
        assert_eq!(FocusMode::from_score(score, false), expected, "score {score}");
    }
}

#[test]
fn score_falls_back_to_radar_mean() {
    let mut summary = summary(0.0);
    summary.health_score = None;
    summary.radar.insert(
        "cash_reconciliation".to_string(),
        RadarAxis {
            score: 100.0,
            open_issues: 0,
        },
    );
    summary.radar.insert(
        "expenses".to_string(),
        RadarAxis {
            score: 60.0,
            open_issues: 3,
        },
    );

    let vm = build_view_model_at_hour(
        CompanionContext::Dashboard,
        Some(&summary),
        None,
        false,
        MORNING,
    );
    assert_eq!(vm.focus_mode, FocusMode::AllClear);
    assert_eq!(vm.headline, "Your books look healthy.");
}

#[test]
fn llm_subtitle_wins_and_is_flagged() {
    let mut summary = with_coverage(summary(70.0), 95.0);
    summary.playbook = vec![step("Reconcile March", IssueSeverity::High, Some("bank"))];
    summary
        .llm_subtitles
        .insert("bank".to_string(), "X".to_string());

    let vm = build_view_model_at_hour(CompanionContext::Bank, Some(&summary), None, false, MORNING);
    assert_eq!(vm.subtitle, "X");
    assert!(vm.is_llm_subtitle);
}

#[test]
fn blank_llm_subtitle_falls_back_to_playbook() {
    let mut summary = with_coverage(summary(70.0), 95.0);
    summary.playbook = vec![
        step("Tidy old receipts", IssueSeverity::Low, Some("bank")),
        step("Send invoice reminders", IssueSeverity::High, Some("invoices")),
        step("Reconcile March", IssueSeverity::Medium, Some("bank")),
    ];
    summary
        .llm_subtitles
        .insert("bank".to_string(), "   ".to_string());

    let vm = build_view_model_at_hour(CompanionContext::Bank, Some(&summary), None, false, MORNING);
    assert_eq!(vm.subtitle, "Top next step: Reconcile March");
    assert!(!vm.is_llm_subtitle);
}

#[test]
fn llm_subtitle_for_another_surface_is_ignored() {
    let mut summary = with_coverage(summary(70.0), 95.0);
    summary
        .llm_subtitles
        .insert("invoices".to_string(), "Invoices narrative".to_string());

    let vm = build_view_model_at_hour(CompanionContext::Bank, Some(&summary), None, false, MORNING);
    assert_eq!(vm.subtitle, coverage_sentence(95.0));
    assert!(!vm.is_llm_subtitle);
}

#[test]
fn dashboard_takes_steps_from_any_surface() {
    let mut summary = summary(70.0);
    summary.playbook = vec![step("Send invoice reminders", IssueSeverity::Medium, Some("invoices"))];

    let dashboard = build_view_model_at_hour(
        CompanionContext::Dashboard,
        Some(&summary),
        None,
        false,
        MORNING,
    );
    assert_eq!(dashboard.subtitle, "Top next step: Send invoice reminders");

    let bank =
        build_view_model_at_hour(CompanionContext::Bank, Some(&summary), None, false, MORNING);
    assert_eq!(
        bank.subtitle,
        "Companion is still analyzing your latest activity."
    );
}

#[test]
fn coverage_bands_are_inclusive_at_their_lower_bound() {
    let strong = coverage_sentence(90.0);
    let partial = coverage_sentence(89.0);
    let partial_floor = coverage_sentence(60.0);
    let light = coverage_sentence(59.0);

    assert!(strong.starts_with("Coverage is strong"), "{strong}");
    assert!(partial.starts_with("Coverage is at 89%"), "{partial}");
    assert!(partial_floor.starts_with("Coverage is at 60%"), "{partial_floor}");
    assert!(light.starts_with("Coverage is light at 59%"), "{light}");

    let vm = build_view_model_at_hour(
        CompanionContext::Expenses,
        Some(&with_coverage(summary(70.0), 90.0)),
        None,
        false,
        MORNING,
    );
    assert_eq!(vm.subtitle, strong);
}

#[test]
fn missing_summary_or_error_is_unavailable() {
    let unavailable = CompanionViewModel::unavailable();

    assert_eq!(
        build_view_model(CompanionContext::Bank, None, Some("Ana Lopez"), false),
        unavailable
    );
    assert_eq!(
        build_view_model(
            CompanionContext::Bank,
            Some(&summary(99.0)),
            Some("Ana Lopez"),
            true
        ),
        unavailable
    );
    assert_eq!(unavailable.headline, "Companion temporarily unavailable");
    assert!(!unavailable.is_llm_subtitle);
}

#[test]
fn greeting_follows_the_clock_and_first_name() {
    assert_eq!(greeting(4, None), "Good evening");
    assert_eq!(greeting(5, None), "Good morning");
    assert_eq!(greeting(11, Some("Ana Lopez")), "Good morning, Ana");
    assert_eq!(greeting(12, Some("  Ana  ")), "Good afternoon, Ana");
    assert_eq!(greeting(17, Some("")), "Good afternoon");
    assert_eq!(greeting(18, Some("Ana")), "Good evening, Ana");
    assert_eq!(greeting(23, None), "Good evening");
}

#[test]
fn headline_comes_from_context_and_focus() {
    assert_eq!(
        headline(CompanionContext::Bank, FocusMode::FireDrill),
        "Bank reconciliation needs attention now."
    );
    let vm = build_view_model_at_hour(
        CompanionContext::Invoices,
        Some(&summary(30.0)),
        Some("Sam"),
        false,
        14,
    );
    assert_eq!(vm.greeting, "Good afternoon, Sam");
    assert_eq!(vm.headline, "Overdue invoices need action.");
}
