//! Contains definitions of common types (user, repository name, changed file)
//! needed for working with GitHub repositories.
use std::fmt::{Debug, Display, Formatter};

use url::Url;

pub mod api;
pub mod process;
pub mod server;
mod webhook;

pub use webhook::WebhookSecret;

/// Unique identifier of a GitHub repository
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct GithubRepoName {
    owner: String,
    name: String,
}

impl GithubRepoName {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_lowercase(),
            name: name.to_lowercase(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for GithubRepoName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}/{}", self.owner, self.name))
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct GithubUser {
    pub username: String,
    pub html_url: Url,
}

/// Change statistics of a single file of a pull request diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestFile {
    pub additions: u64,
    pub deletions: u64,
}
