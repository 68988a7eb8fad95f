// tests/helpers/assertions.rs - Custom test assertions

use dummyjson_suite::RunReport;

use super::CountingObserver;

/// Assert that every selected check passed, listing the failures otherwise
pub fn assert_all_passed(report: &RunReport) {
    let failures: Vec<String> = report
        .failures()
        .map(|r| format!("{} > {}: {:?}", r.group, r.title, r.outcome))
        .collect();
    assert!(failures.is_empty(), "Checks failed:\n{}", failures.join("\n"));
}

/// Assert that every opened context was released exactly once
pub fn assert_contexts_balanced(observer: &CountingObserver, expected_opened: usize) {
    assert_eq!(
        observer.opened(),
        expected_opened,
        "expected {} contexts to be opened",
        expected_opened
    );
    assert_eq!(
        observer.disposed(),
        observer.opened(),
        "{} contexts opened but {} disposed",
        observer.opened(),
        observer.disposed()
    );
}
