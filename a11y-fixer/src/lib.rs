#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod github;
pub mod issues;
pub mod output;
pub mod pull_requests;
pub mod rate_limit;
pub mod retry;
pub mod runner;
pub mod summary;
pub mod templates;

pub use config::{load_issue_template, load_settings, resolve_settings, ConfigError, Settings};
pub use github::{build_octocrab, ApiError, GitHubClient, OctocrabTransport, RawResponse, Transport};
pub use issues::{
    assign_issue, create_issue, Finding, Issue, IssueError, IssueRef, IssueState, NewIssue,
    RepoSlug, DEFAULT_FIXER_LOGIN,
};
pub use output::{set_failed, set_output, OutputError};
pub use pull_requests::{get_linked_pr, PrError, PullRequest};
pub use rate_limit::{
    detect, wait_for_retry_after, RateLimitInfo, RateLimitKind, RateLimitPolicy,
    RateLimitSignal,
};
pub use retry::{retry, RetryPolicy};
pub use runner::{
    parse_findings, parse_issues, BatchPolicy, FileReport, FixReport, Fixing, FixingState,
    IssueTracker, Runner, RunnerConfig, RunnerError,
};
pub use summary::RunSummary;
pub use templates::{
    create_handlebars_registry, format_solution_long, generate_issue_labels,
    generate_issue_title, TemplateError, TemplateRenderer, DEFAULT_ISSUE_TEMPLATE,
};
