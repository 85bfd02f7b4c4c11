//! Issue creation payload.

/// An issue to be filed in a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    /// Issue title.
    pub title: String,

    /// Rendered issue body.
    pub body: String,

    /// Labels applied on creation.
    pub labels: Vec<String>,
}
