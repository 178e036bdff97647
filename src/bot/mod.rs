use axum::async_trait;

pub mod command;
pub mod event;
mod handlers;

pub use command::CommandParser;
pub use handlers::handle_bot_event;

use crate::bot::event::CommentEvent;
use crate::config::BotConfig;
use crate::github::{GithubRepoName, PullRequestFile};

/// Provides functionality for working with a remote repository.
/// The remote repository is the only source of truth; no state is kept
/// between events.
#[async_trait]
pub trait RepositoryClient {
    fn repository(&self) -> &GithubRepoName;

    /// Return the names of the labels currently attached to an issue/PR.
    async fn list_labels(&self, issue: u64) -> anyhow::Result<Vec<String>>;

    /// Add a set of labels to an issue/PR.
    async fn add_labels(&self, issue: u64, labels: &[String]) -> anyhow::Result<()>;

    /// Remove a single label from an issue/PR. Removing a label that is not
    /// present must be a no-op.
    async fn remove_label(&self, issue: u64, label: &str) -> anyhow::Result<()>;

    /// Post a comment to the issue/PR with the given number.
    async fn post_comment(&self, issue: u64, text: &str) -> anyhow::Result<()>;

    /// Change the title of an issue.
    async fn edit_issue_title(&self, issue: u64, title: &str) -> anyhow::Result<()>;

    /// Change the title of a pull request.
    async fn edit_pull_request_title(&self, pr: u64, title: &str) -> anyhow::Result<()>;

    /// Assign the given users to an issue/PR.
    async fn add_assignees(&self, issue: u64, assignees: &[&str]) -> anyhow::Result<()>;

    /// Is the user a member of the repository's organization?
    async fn is_org_member(&self, username: &str) -> anyhow::Result<bool>;

    /// Was the user granted direct write access to the repository?
    async fn is_collaborator(&self, username: &str) -> anyhow::Result<bool>;

    /// Return per-file change statistics of a pull request.
    async fn list_pull_request_files(&self, pr: u64) -> anyhow::Result<Vec<PullRequestFile>>;
}

/// State shared by all event handlers.
pub struct BotContext {
    pub parser: CommandParser,
    pub config: BotConfig,
    /// Login of the account the bot acts as, if known.
    bot_login: Option<String>,
}

impl BotContext {
    pub fn new(parser: CommandParser, config: BotConfig, bot_login: Option<String>) -> Self {
        Self {
            parser,
            config,
            bot_login,
        }
    }

    /// Was the comment created by the bot itself?
    pub fn is_own_comment(&self, comment: &CommentEvent) -> bool {
        self.bot_login.as_deref() == Some(comment.author.username.as_str())
    }
}
