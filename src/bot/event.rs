use crate::github::{GithubRepoName, GithubUser};

#[derive(Debug)]
pub enum BotEvent {
    /// A comment was posted on an issue or a pull request.
    Comment(CommentEvent),
    /// Something happened with a pull request (it was opened, new commits
    /// were pushed to it, ...).
    PullRequest(PullRequestEvent),
}

impl BotEvent {
    pub fn repository(&self) -> &GithubRepoName {
        match self {
            BotEvent::Comment(comment) => &comment.repository,
            BotEvent::PullRequest(payload) => &payload.repository,
        }
    }
}

/// A single issue/PR comment, constructed once per inbound webhook and
/// consumed by all command handlers for that event.
#[derive(Debug)]
pub struct CommentEvent {
    pub repository: GithubRepoName,
    pub issue_number: u64,
    pub author: GithubUser,
    pub body: String,
    /// Is the commented-on issue actually a pull request?
    pub is_pull_request: bool,
    pub issue_state: IssueState,
    /// Login of the user that opened the issue/PR.
    pub issue_author: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    Open,
    Closed,
    Other,
}

impl From<&str> for IssueState {
    fn from(value: &str) -> Self {
        match value {
            "open" => IssueState::Open,
            "closed" => IssueState::Closed,
            _ => IssueState::Other,
        }
    }
}

#[derive(Debug)]
pub struct PullRequestEvent {
    pub repository: GithubRepoName,
    pub pr_number: u64,
    pub action: PullRequestAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestAction {
    Opened,
    Reopened,
    Synchronize,
    Edited,
    Other,
}

impl PullRequestAction {
    /// These are the only actions indicating that the code diff may have
    /// changed.
    pub fn diff_may_have_changed(self) -> bool {
        matches!(
            self,
            PullRequestAction::Opened
                | PullRequestAction::Reopened
                | PullRequestAction::Synchronize
                | PullRequestAction::Edited
        )
    }
}

impl From<&str> for PullRequestAction {
    fn from(value: &str) -> Self {
        match value {
            "opened" => PullRequestAction::Opened,
            "reopened" => PullRequestAction::Reopened,
            "synchronize" => PullRequestAction::Synchronize,
            "edited" => PullRequestAction::Edited,
            _ => PullRequestAction::Other,
        }
    }
}
