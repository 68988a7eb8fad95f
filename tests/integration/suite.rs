// tests/integration/suite.rs - Running the check groups against the mock API

use dummyjson_suite::suite::{default_groups, Outcome};
use dummyjson_suite::{CheckFilter, SuiteConfig};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

use super::TestHarness;
use crate::helpers::assertions::{assert_all_passed, assert_contexts_balanced};

fn total_checks() -> usize {
    default_groups().iter().map(|g| g.checks.len()).sum()
}

#[tokio::test]
async fn test_full_suite_passes_against_mock() {
    let harness = TestHarness::new().await;

    let report = harness.runner().run().await;

    assert_all_passed(&report);
    assert_eq!(report.results.len(), total_checks());
    assert_eq!(report.skipped(), 0);
    assert!(report.finished_at >= report.started_at);

    // one context per check, plus the login and bearer contexts of the shared fixture
    let shared_checks = 2;
    assert_contexts_balanced(&harness.observer, total_checks() - shared_checks + 2);
}

#[tokio::test]
async fn test_results_follow_group_declaration_order() {
    let harness = TestHarness::new().await;

    let report = harness.runner().run().await;

    let mut groups: Vec<&str> = report.results.iter().map(|r| r.group.as_str()).collect();
    groups.dedup();
    assert_eq!(
        groups,
        vec![
            "@auth public",
            "@auth authenticated",
            "@users users",
            "@products products",
            "@carts carts",
            "@cross cross",
        ]
    );
}

#[tokio::test]
async fn test_smoke_tag_selects_smoke_checks_only() {
    let harness = TestHarness::new().await;
    let runner = harness.runner().with_filter(CheckFilter::new().tag("@smoke"));

    let selected: usize = runner.selected().iter().map(|(_, checks)| checks.len()).sum();
    assert_eq!(selected, 8);

    let report = runner.run().await;
    assert_all_passed(&report);
    assert_eq!(report.results.len(), 8);
    assert_eq!(report.skipped(), total_checks() - 8);
}

#[tokio::test]
async fn test_shared_auth_logs_in_once_per_group() {
    let harness = TestHarness::new().await;
    let runner = harness
        .runner()
        .with_filter(CheckFilter::new().tag("auth").grep("authenticated"));

    let report = runner.run().await;

    assert_all_passed(&report);
    assert_eq!(report.results.len(), 2);
    assert_eq!(harness.server.login_count().await, 1);
    assert_contexts_balanced(&harness.observer, 2);
}

#[tokio::test]
async fn test_failed_fixture_fails_every_check_in_group() {
    let harness = TestHarness::new().await;
    let mut fixture = NamedTempFile::new().unwrap();
    write!(fixture, r#"{{"username": "emilys", "password": "not-the-password"}}"#).unwrap();

    let config = SuiteConfig {
        test_data_path: Some(fixture.path().to_path_buf()),
        ..harness.config.clone()
    };
    let report = harness
        .runner_with(config)
        .with_filter(CheckFilter::new().grep("authenticated"))
        .run()
        .await;

    assert_eq!(report.results.len(), 2);
    assert_eq!(report.failed(), 2);
    for result in &report.results {
        match &result.outcome {
            Outcome::Failed(reason) => {
                assert!(reason.starts_with("before_all failed"), "reason was {}", reason);
                assert!(reason.contains("400"));
            }
            Outcome::Passed => panic!("{} should not pass", result.title),
        }
    }
    // the login context is still released
    assert_contexts_balanced(&harness.observer, 1);
    assert!(report.to_string().contains("0 passed, 2 failed"));
}

#[tokio::test]
async fn test_slow_login_fails_latency_check() {
    let harness = TestHarness::new().await;
    harness.server.set_delay(150).await;

    let config = SuiteConfig {
        latency_budget_ms: 100,
        latency_samples: 2,
        ..harness.config.clone()
    };
    let report = harness
        .runner_with(config)
        .with_filter(CheckFilter::new().tag("cross").grep("latency"))
        .run()
        .await;

    assert_eq!(report.results.len(), 1);
    assert!(!report.is_success());
    let failure = report.failures().next().unwrap();
    match &failure.outcome {
        Outcome::Failed(reason) => {
            assert!(reason.contains("not under 100ms"), "reason was {}", reason)
        }
        Outcome::Passed => unreachable!(),
    }
    assert_eq!(harness.server.login_count().await, 2);
}

#[tokio::test]
async fn test_grep_with_no_match_runs_nothing() {
    let harness = TestHarness::new().await;

    let report = harness
        .runner()
        .with_filter(CheckFilter::new().grep("no such check"))
        .run()
        .await;

    assert!(report.results.is_empty());
    assert!(report.is_success());
    assert_eq!(report.skipped(), total_checks());
    assert_contexts_balanced(&harness.observer, 0);
}
