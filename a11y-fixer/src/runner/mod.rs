//! Orchestrates filing, assignment and linked pull request discovery.
//!
//! A `fix` run takes one batch of issues (one issue by default), assigns each
//! to the automated fixer and then polls for the pull request the fixer opens.
//! Polling is bounded by the [`RetryPolicy`][`crate::retry::RetryPolicy`]; every
//! request of a poll is itself subject to the transport's rate limit retries,
//! so the worst case number of requests per issue is
//! `max_attempts × timeline pages × (1 + 2 × rate_limit.max_retries)`.
//!
//! The first fatal error halts the run and no partial results are returned.

mod batch;
mod config;
mod error;
mod fixing;
mod report;
mod tracker;

pub use batch::{BatchPolicy, DEFAULT_BATCH_SIZE};
pub use config::RunnerConfig;
pub use error::RunnerError;
pub use fixing::{Fixing, FixingState};
pub use report::{FileReport, FixReport};
pub use tracker::IssueTracker;

use crate::config::load_issue_template;
use crate::github::{build_octocrab, GitHubClient};
use crate::issues::{Finding, Issue, IssueError, IssueRef, NewIssue, RepoSlug};
use crate::retry::{retry, RetryPolicy};
use crate::summary::RunSummary;
use crate::templates::{generate_issue_labels, generate_issue_title, TemplateRenderer};
use serde::de::DeserializeOwned;
use tracing::{error, info, info_span, warn, Instrument};

/// Parses the `issues` input of a `fix` run. Blank input is an empty list.
///
/// # Errors
///
/// Returns [`RunnerError::MalformedInput`] if the input is not a JSON array of issues.
pub fn parse_issues(input: &str) -> Result<Vec<IssueRef>, RunnerError> {
    parse_input("issues", input)
}

/// Parses the `findings` input of a `file` run. Blank input is an empty list.
///
/// # Errors
///
/// Returns [`RunnerError::MalformedInput`] if the input is not a JSON array of findings.
pub fn parse_findings(input: &str) -> Result<Vec<Finding>, RunnerError> {
    parse_input("findings", input)
}

fn parse_input<T: DeserializeOwned>(name: &'static str, input: &str) -> Result<Vec<T>, RunnerError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(input).map_err(|source| RunnerError::MalformedInput {
        input: name,
        source,
    })
}

/// Runs the fixer against one repository.
pub struct Runner<C = GitHubClient> {
    config: RunnerConfig,
    repository: RepoSlug,
    tracker: C,
}

impl Runner<GitHubClient> {
    /// Builds a runner talking to GitHub with the configured token.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the token is empty, the repository slug is
    /// malformed, or the HTTP client cannot be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        if config.token().trim().is_empty() {
            return Err(RunnerError::MissingValue { name: "token" });
        }

        let octocrab = build_octocrab(config.token(), config.api_url())?;
        let client = GitHubClient::from_octocrab(octocrab, config.settings().rate_limit_policy());

        Self::with_tracker(config, client)
    }
}

impl<C: IssueTracker> Runner<C> {
    /// Builds a runner over an arbitrary [`IssueTracker`].
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::InvalidRepository`] if the repository slug is malformed.
    pub fn with_tracker(config: RunnerConfig, tracker: C) -> Result<Self, RunnerError> {
        let repository =
            RepoSlug::parse(config.repository()).map_err(|source| RunnerError::InvalidRepository {
                slug: config.repository().to_string(),
                source,
            })?;

        Ok(Self {
            config,
            repository,
            tracker,
        })
    }

    /// Returns the runner configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Assigns each issue of the batch to the fixer and polls for its pull request.
    ///
    /// Issues beyond the batch size are deferred and reported in the summary.
    /// Every issue of the batch is normalized before the first network call.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Input`] for malformed issues,
    /// [`RunnerError::Assignment`] when the fixer cannot be assigned, and
    /// [`RunnerError::Discovery`] when polling fails.
    pub async fn fix(&self, issues: Vec<IssueRef>) -> Result<FixReport, RunnerError> {
        let mut summary = RunSummary {
            issues_received: issues.len(),
            ..RunSummary::default()
        };

        let (batch, deferred) = self.config.settings().batch_policy().split(issues);
        summary.issues_deferred = deferred.len();
        if !deferred.is_empty() {
            warn!(
                processing = batch.len(),
                deferred = deferred.len(),
                "More issues than the batch size, deferring the rest"
            );
        }

        let mut work = Vec::with_capacity(batch.len());
        for reference in batch {
            let issue = Issue::from_ref(&reference).map_err(|source| RunnerError::Input {
                url: reference.url.clone(),
                source,
            })?;
            work.push((Fixing::new(reference), issue));
        }

        let policy = self.config.settings().retry_policy();
        let mut fixings = Vec::with_capacity(work.len());
        for (mut fixing, issue) in work {
            self.process_fixing(&mut fixing, &issue, &policy).await?;
            summary.record_fixing(&fixing);
            fixings.push(fixing);
        }

        Ok(FixReport { fixings, summary })
    }

    /// Files one issue per finding, in order.
    ///
    /// The issue template is loaded here rather than up front, so `fix` runs
    /// never depend on it.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Config`] or [`RunnerError::Template`] if the issue
    /// template cannot be loaded, and [`RunnerError::Filing`] for the first
    /// finding that could not be filed; nothing filed before it is returned.
    pub async fn file(&self, findings: Vec<Finding>) -> Result<FileReport, RunnerError> {
        let template = load_issue_template(self.config.settings())?;
        let renderer = TemplateRenderer::new(&template)?;

        let mut summary = RunSummary {
            findings_received: findings.len(),
            ..RunSummary::default()
        };

        let mut issues = Vec::with_capacity(findings.len());
        for finding in &findings {
            let span = info_span!("file_finding", rule_id = %finding.rule_id, url = %finding.url);
            let created = async {
                let new_issue = build_issue(&renderer, finding)?;
                self.tracker.create_issue(&self.repository, &new_issue).await
            }
            .instrument(span)
            .await
            .map_err(|source| RunnerError::Filing {
                repository: self.repository.to_string(),
                rule_id: finding.rule_id.clone(),
                url: finding.url.clone(),
                source,
            })?;

            info!(url = %created.url, "Filed issue");
            summary.issues_filed += 1;
            issues.push(created);
        }

        Ok(FileReport { issues, summary })
    }

    async fn process_fixing(
        &self,
        fixing: &mut Fixing,
        issue: &Issue,
        policy: &RetryPolicy,
    ) -> Result<(), RunnerError> {
        let span = info_span!("fix_issue", issue = %issue);

        async {
            let fixer = self.config.settings().fixer.login.as_str();

            fixing.transition(FixingState::Assigning);
            if let Err(source) = self.tracker.assign_issue(issue, fixer).await {
                fixing.transition(FixingState::Failed);
                error!(error = %source, "Failed to assign fixer");
                return Err(RunnerError::Assignment {
                    repository: issue.slug().to_string(),
                    number: issue.number(),
                    fixer: fixer.to_string(),
                    source,
                });
            }
            info!(fixer, "Assigned issue to fixer");

            fixing.transition(FixingState::Polling);
            match retry(policy, || self.tracker.get_linked_pr(issue)).await {
                Ok(Some(pull_request)) => {
                    info!(url = %pull_request.url, "Found linked pull request");
                    fixing.link(pull_request);
                }
                Ok(None) => {
                    info!(
                        attempts = policy.max_attempts(),
                        "No linked pull request was found"
                    );
                    fixing.transition(FixingState::Unlinked);
                }
                Err(source) => {
                    fixing.transition(FixingState::Failed);
                    error!(error = %source, "Failed to look up linked pull request");
                    return Err(RunnerError::Discovery {
                        repository: issue.slug().to_string(),
                        number: issue.number(),
                        source,
                    });
                }
            }

            Ok(())
        }
        .instrument(span)
        .await
    }
}

/// Renders title, labels and body for a finding.
fn build_issue(renderer: &TemplateRenderer, finding: &Finding) -> Result<NewIssue, IssueError> {
    Ok(NewIssue {
        title: generate_issue_title(finding)?,
        body: renderer.render_issue_body(finding)?,
        labels: generate_issue_labels(finding),
    })
}
