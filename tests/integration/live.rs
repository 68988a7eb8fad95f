// tests/integration/live.rs - Checks against the real service, opt-in via DUMMYJSON_LIVE

use dummyjson_suite::{get_access_token, CheckFilter, LoginOptions, Runner, SuiteConfig};

use crate::helpers::assertions::assert_all_passed;
use crate::helpers::skip_if_no_env;

#[tokio::test]
async fn test_live_login() {
    if skip_if_no_env("DUMMYJSON_LIVE") {
        return;
    }

    let config = SuiteConfig::from_env().unwrap();
    let tokens = get_access_token(&config, &LoginOptions::default().with_expires_in_mins(30))
        .await
        .expect("live login should succeed");
    assert!(!tokens.access_token.is_empty());
    assert!(!tokens.refresh_token.is_empty());
}

#[tokio::test]
async fn test_live_smoke_checks() {
    if skip_if_no_env("DUMMYJSON_LIVE") {
        return;
    }

    let report = Runner::new(SuiteConfig::from_env().unwrap())
        .unwrap()
        .with_filter(CheckFilter::new().tag("@smoke"))
        .run()
        .await;
    println!("{}", report);
    assert_all_passed(&report);
}
