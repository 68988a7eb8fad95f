// src/suite/mod.rs - Check groups, fixtures and the runner that executes them

pub mod auth;
pub mod carts;
pub mod cross;
pub mod products;
pub mod users;

use chrono::{DateTime, Utc};
use futures::future::{join_all, BoxFuture};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::auth::{CredentialAcquirer, LoginOptions};
use crate::client::{ApiContext, ApiContextBuilder, ApiResponse, ContextObserver};
use crate::config::SuiteConfig;
use crate::error::{Result, SuiteError};
use crate::expect::{ensure, expect_rfc3339};
use crate::models::{DeletedResource, TestData, TokenPair};

/// `@name` label used to select checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String);

impl Tag {
    /// Accepts `smoke` or `@smoke`.
    pub fn new(name: &str) -> Self {
        let name = name.trim();
        if name.starts_with('@') {
            Tag(name.to_string())
        } else {
            Tag(format!("@{}", name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a check body gets to work with.
pub struct CheckContext<'a> {
    pub api: &'a ApiContext,
    pub config: &'a SuiteConfig,
    pub data: &'a TestData,
    /// Set for groups running under [`Fixture::SharedAuth`].
    pub tokens: Option<&'a TokenPair>,
}

impl<'a> CheckContext<'a> {
    pub fn login_options(&self) -> LoginOptions {
        LoginOptions::from_test_data(self.data)
    }

    pub fn tokens(&self) -> Result<&'a TokenPair> {
        self.tokens.ok_or_else(|| {
            SuiteError::Configuration("check requires the shared auth fixture".to_string())
        })
    }
}

pub type CheckFn = for<'a> fn(&'a CheckContext<'a>) -> BoxFuture<'a, Result<()>>;

#[derive(Clone)]
pub struct Check {
    pub title: &'static str,
    pub tags: Vec<Tag>,
    run: CheckFn,
}

impl Check {
    pub fn new(title: &'static str, run: CheckFn) -> Self {
        Self {
            title,
            tags: Vec::new(),
            run,
        }
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tags.push(Tag::new(tag));
        self
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("title", &self.title)
            .field("tags", &self.tags)
            .finish()
    }
}

/// How checks in a group obtain their request context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixture {
    /// A fresh unauthenticated context per check, disposed after it.
    PerTest,
    /// One login and one bearer context for the whole group; checks run in
    /// order against it and it is disposed after the last one.
    SharedAuth,
}

#[derive(Debug, Clone)]
pub struct Group {
    pub title: &'static str,
    pub tag: Tag,
    pub fixture: Fixture,
    pub checks: Vec<Check>,
}

impl Group {
    pub fn new(title: &'static str, tag: &str, fixture: Fixture) -> Self {
        Self {
            title,
            tag: Tag::new(tag),
            fixture,
            checks: Vec::new(),
        }
    }

    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    /// `@auth public`
    pub fn full_title(&self) -> String {
        format!("{} {}", self.tag, self.title)
    }
}

/// Every group of the suite, in declaration order.
pub fn default_groups() -> Vec<Group> {
    vec![
        auth::public_group(),
        auth::authenticated_group(),
        users::group(),
        products::group(),
        carts::group(),
        cross::group(),
    ]
}

/// Selects checks by tags and title text.
#[derive(Debug, Clone, Default)]
pub struct CheckFilter {
    tags: Vec<Tag>,
    grep: Option<String>,
}

impl CheckFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a tag; all required tags must be present.
    pub fn tag(mut self, tag: &str) -> Self {
        self.tags.push(Tag::new(tag));
        self
    }

    /// Require `text` in `"<group title> <check title>"`.
    pub fn grep(mut self, text: impl Into<String>) -> Self {
        self.grep = Some(text.into());
        self
    }

    pub fn matches(&self, group: &Group, check: &Check) -> bool {
        let tagged = self
            .tags
            .iter()
            .all(|tag| *tag == group.tag || check.tags.contains(tag));
        let grepped = match &self.grep {
            Some(text) => format!("{} {}", group.full_title(), check.title).contains(text.as_str()),
            None => true,
        };
        tagged && grepped
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub group: String,
    pub title: String,
    pub outcome: Outcome,
    pub duration: Duration,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<CheckResult>,
    /// Checks left out by the filter.
    pub skipped: usize,
}

impl RunReport {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.passed())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            let mark = if result.passed() { "ok  " } else { "FAIL" };
            writeln!(
                f,
                "{} {} > {} ({}ms)",
                mark,
                result.group,
                result.title,
                result.duration.as_millis()
            )?;
            if let Outcome::Failed(reason) = &result.outcome {
                writeln!(f, "     {}", reason)?;
            }
        }
        let elapsed = self.finished_at - self.started_at;
        write!(
            f,
            "{} passed, {} failed, {} skipped in {}ms",
            self.passed(),
            self.failed(),
            self.skipped(),
            elapsed.num_milliseconds()
        )
    }
}

/// Runs groups concurrently; checks inside a group run one after another.
pub struct Runner {
    config: SuiteConfig,
    data: TestData,
    groups: Vec<Group>,
    filter: CheckFilter,
    observer: Option<Arc<dyn ContextObserver>>,
}

impl Runner {
    /// Runner over [`default_groups`] with the credentials fixture from `config`.
    pub fn new(config: SuiteConfig) -> Result<Self> {
        config.validate()?;
        let data = config.test_data()?;
        Ok(Self {
            config,
            data,
            groups: default_groups(),
            filter: CheckFilter::default(),
            observer: None,
        })
    }

    pub fn with_groups(mut self, groups: Vec<Group>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_filter(mut self, filter: CheckFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Observe every context the runner opens, including fixture logins.
    pub fn with_observer(mut self, observer: Arc<dyn ContextObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Checks passing the filter, grouped; groups with none are left out.
    pub fn selected(&self) -> Vec<(&Group, Vec<&Check>)> {
        self.groups
            .iter()
            .map(|group| {
                let checks = group
                    .checks
                    .iter()
                    .filter(|check| self.filter.matches(group, check))
                    .collect::<Vec<_>>();
                (group, checks)
            })
            .filter(|(_, checks)| !checks.is_empty())
            .collect()
    }

    pub async fn run(&self) -> RunReport {
        let started_at = Utc::now();
        let selected = self.selected();
        let total: usize = self.groups.iter().map(|g| g.checks.len()).sum();
        let chosen: usize = selected.iter().map(|(_, checks)| checks.len()).sum();

        info!(
            base_url = %self.config.base_url,
            groups = selected.len(),
            checks = chosen,
            "Running checks"
        );

        let runs = selected
            .into_iter()
            .map(|(group, checks)| self.run_group(group, checks));
        let results: Vec<CheckResult> = join_all(runs).await.into_iter().flatten().collect();

        let report = RunReport {
            started_at,
            finished_at: Utc::now(),
            results,
            skipped: total - chosen,
        };
        info!(
            passed = report.passed(),
            failed = report.failed(),
            skipped = report.skipped(),
            "Run finished"
        );
        report
    }

    fn context_builder(&self) -> ApiContextBuilder {
        let builder = ApiContext::from_config(&self.config);
        match &self.observer {
            Some(observer) => builder.observer(observer.clone()),
            None => builder,
        }
    }

    async fn run_group(&self, group: &Group, checks: Vec<&Check>) -> Vec<CheckResult> {
        match group.fixture {
            Fixture::PerTest => {
                let mut results = Vec::with_capacity(checks.len());
                for check in checks {
                    let started = Instant::now();
                    let outcome = match self.context_builder().build() {
                        Ok(api) => {
                            let outcome = self.execute(check, &api, None).await;
                            api.dispose();
                            outcome
                        }
                        Err(e) => Err(e),
                    };
                    results.push(self.record(group, check, outcome, started.elapsed()));
                }
                results
            }
            Fixture::SharedAuth => self.run_shared_auth(group, checks).await,
        }
    }

    async fn run_shared_auth(&self, group: &Group, checks: Vec<&Check>) -> Vec<CheckResult> {
        let started = Instant::now();
        let fixture = self.before_all().await;

        let (api, tokens) = match fixture {
            Ok(fixture) => fixture,
            Err(e) => {
                error!(group = %group.full_title(), error = %e, "before_all failed");
                let reason = format!("before_all failed: {}", e);
                return checks
                    .into_iter()
                    .map(|check| CheckResult {
                        group: group.full_title(),
                        title: check.title.to_string(),
                        outcome: Outcome::Failed(reason.clone()),
                        duration: started.elapsed(),
                    })
                    .collect();
            }
        };

        let mut results = Vec::with_capacity(checks.len());
        for check in checks {
            let started = Instant::now();
            let outcome = self.execute(check, &api, Some(&tokens)).await;
            results.push(self.record(group, check, outcome, started.elapsed()));
        }

        // after_all
        api.dispose();
        results
    }

    async fn before_all(&self) -> Result<(ApiContext, TokenPair)> {
        let mut acquirer = CredentialAcquirer::from_config(&self.config);
        if let Some(observer) = &self.observer {
            acquirer = acquirer.with_observer(observer.clone());
        }
        let tokens = acquirer
            .acquire(&LoginOptions::from_test_data(&self.data))
            .await?;
        let api = self.context_builder().bearer(&tokens.access_token).build()?;
        Ok((api, tokens))
    }

    async fn execute(
        &self,
        check: &Check,
        api: &ApiContext,
        tokens: Option<&TokenPair>,
    ) -> Result<()> {
        let cx = CheckContext {
            api,
            config: &self.config,
            data: &self.data,
            tokens,
        };
        debug!(check = check.title, "Starting check");
        (check.run)(&cx).await
    }

    fn record(
        &self,
        group: &Group,
        check: &Check,
        outcome: Result<()>,
        duration: Duration,
    ) -> CheckResult {
        let outcome = match outcome {
            Ok(()) => {
                info!(group = %group.full_title(), check = check.title, "passed");
                Outcome::Passed
            }
            Err(e) => {
                warn!(group = %group.full_title(), check = check.title, error = %e, "failed");
                Outcome::Failed(e.to_string())
            }
        };
        CheckResult {
            group: group.full_title(),
            title: check.title.to_string(),
            outcome,
            duration,
        }
    }
}

/// A simulated delete: `isDeleted` is true and `deletedOn` is a timestamp.
pub(crate) fn expect_deleted(response: ApiResponse) -> Result<DeletedResource> {
    let body = response.expect_ok()?.json_value()?;
    expect_rfc3339(&body, "deletedOn")?;
    let deleted: DeletedResource = serde_json::from_value(body)?;
    ensure(deleted.is_deleted, format!("resource {} is not marked deleted", deleted.id))?;
    Ok(deleted)
}
