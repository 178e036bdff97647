//! In-memory mocks and event builders used by the test suite.
use std::collections::HashSet;
use std::sync::Mutex;

use axum::async_trait;

use crate::bot::event::{CommentEvent, IssueState, PullRequestEvent};
use crate::bot::{BotContext, CommandParser, RepositoryClient};
use crate::config::BotConfig;
use crate::github::{GithubRepoName, GithubUser, PullRequestFile};

pub(crate) fn default_repo_name() -> GithubRepoName {
    GithubRepoName::new("some-org", "some-repo")
}

pub(crate) fn user(login: &str) -> GithubUser {
    GithubUser {
        username: login.to_string(),
        html_url: format!("https://github.com/{login}").parse().unwrap(),
    }
}

pub(crate) fn test_context() -> BotContext {
    BotContext::new(
        CommandParser::new(),
        BotConfig::default(),
        Some("labelbot".to_string()),
    )
}

/// Builds a comment event on PR #1 of the default repository, commented by
/// `reviewer` on a PR opened by `author`.
pub(crate) fn comment(body: &str) -> CommentBuilder {
    CommentBuilder {
        event: CommentEvent {
            repository: default_repo_name(),
            issue_number: 1,
            author: user("reviewer"),
            body: body.to_string(),
            is_pull_request: true,
            issue_state: IssueState::Open,
            issue_author: "author".to_string(),
        },
    }
}

pub(crate) struct CommentBuilder {
    event: CommentEvent,
}

impl CommentBuilder {
    pub(crate) fn author(mut self, login: &str) -> Self {
        self.event.author = user(login);
        self
    }

    pub(crate) fn on_issue(mut self) -> Self {
        self.event.is_pull_request = false;
        self
    }

    pub(crate) fn state(mut self, state: IssueState) -> Self {
        self.event.issue_state = state;
        self
    }

    pub(crate) fn create(self) -> CommentEvent {
        self.event
    }
}

pub(crate) fn pr_event(action: crate::bot::event::PullRequestAction) -> PullRequestEvent {
    PullRequestEvent {
        repository: default_repo_name(),
        pr_number: 1,
        action,
    }
}

/// In-memory stand-in for the remote repository gateway.
///
/// Mutating operations are recorded so tests can assert on the final state
/// and on the number of remote mutations performed.
pub(crate) struct TestClient {
    repo_name: GithubRepoName,
    labels: Mutex<Vec<String>>,
    comments: Mutex<Vec<String>>,
    assignees: Mutex<Vec<String>>,
    issue_title_edits: Mutex<Vec<String>>,
    pr_title_edits: Mutex<Vec<String>>,
    org_members: HashSet<String>,
    collaborators: HashSet<String>,
    files: Vec<PullRequestFile>,
    failing_removals: HashSet<String>,
    fail_org_member_query: bool,
    fail_collaborator_query: bool,
    fail_add_assignees: bool,
    mutations: Mutex<u64>,
    trust_queries: Mutex<u64>,
}

impl TestClient {
    pub(crate) fn new() -> Self {
        Self {
            repo_name: default_repo_name(),
            labels: Mutex::new(Vec::new()),
            comments: Mutex::new(Vec::new()),
            assignees: Mutex::new(Vec::new()),
            issue_title_edits: Mutex::new(Vec::new()),
            pr_title_edits: Mutex::new(Vec::new()),
            org_members: HashSet::new(),
            collaborators: HashSet::new(),
            files: Vec::new(),
            failing_removals: HashSet::new(),
            fail_org_member_query: false,
            fail_collaborator_query: false,
            fail_add_assignees: false,
            mutations: Mutex::new(0),
            trust_queries: Mutex::new(0),
        }
    }

    pub(crate) fn with_labels(self, labels: &[&str]) -> Self {
        *self.labels.lock().unwrap() = labels.iter().map(|label| label.to_string()).collect();
        self
    }

    pub(crate) fn with_org_member(mut self, login: &str) -> Self {
        self.org_members.insert(login.to_string());
        self
    }

    pub(crate) fn with_collaborator(mut self, login: &str) -> Self {
        self.collaborators.insert(login.to_string());
        self
    }

    /// Sets the (additions, deletions) statistics of the PR diff.
    pub(crate) fn with_files(mut self, files: &[(u64, u64)]) -> Self {
        self.files = files
            .iter()
            .map(|&(additions, deletions)| PullRequestFile {
                additions,
                deletions,
            })
            .collect();
        self
    }

    pub(crate) fn failing_removal(mut self, label: &str) -> Self {
        self.failing_removals.insert(label.to_string());
        self
    }

    pub(crate) fn fail_org_member_query(mut self) -> Self {
        self.fail_org_member_query = true;
        self
    }

    pub(crate) fn fail_collaborator_query(mut self) -> Self {
        self.fail_collaborator_query = true;
        self
    }

    pub(crate) fn fail_add_assignees(mut self) -> Self {
        self.fail_add_assignees = true;
        self
    }

    #[track_caller]
    pub(crate) fn check_labels(&self, expected: &[&str]) {
        assert_eq!(*self.labels.lock().unwrap(), expected);
    }

    #[track_caller]
    pub(crate) fn check_comments(&self, expected: &[&str]) {
        assert_eq!(*self.comments.lock().unwrap(), expected);
    }

    #[track_caller]
    pub(crate) fn check_assignees(&self, expected: &[&str]) {
        assert_eq!(*self.assignees.lock().unwrap(), expected);
    }

    #[track_caller]
    pub(crate) fn check_issue_title_edits(&self, expected: &[&str]) {
        assert_eq!(*self.issue_title_edits.lock().unwrap(), expected);
    }

    #[track_caller]
    pub(crate) fn check_pr_title_edits(&self, expected: &[&str]) {
        assert_eq!(*self.pr_title_edits.lock().unwrap(), expected);
    }

    pub(crate) fn mutation_count(&self) -> u64 {
        *self.mutations.lock().unwrap()
    }

    pub(crate) fn trust_query_count(&self) -> u64 {
        *self.trust_queries.lock().unwrap()
    }

    fn record_mutation(&self) {
        *self.mutations.lock().unwrap() += 1;
    }
}

#[async_trait]
impl RepositoryClient for TestClient {
    fn repository(&self) -> &GithubRepoName {
        &self.repo_name
    }

    async fn list_labels(&self, _issue: u64) -> anyhow::Result<Vec<String>> {
        Ok(self.labels.lock().unwrap().clone())
    }

    async fn add_labels(&self, _issue: u64, labels: &[String]) -> anyhow::Result<()> {
        self.record_mutation();
        let mut current = self.labels.lock().unwrap();
        for label in labels {
            if !current.contains(label) {
                current.push(label.clone());
            }
        }
        Ok(())
    }

    async fn remove_label(&self, _issue: u64, label: &str) -> anyhow::Result<()> {
        self.record_mutation();
        if self.failing_removals.contains(label) {
            return Err(anyhow::anyhow!("Cannot remove label {label}"));
        }
        self.labels.lock().unwrap().retain(|name| name != label);
        Ok(())
    }

    async fn post_comment(&self, _issue: u64, text: &str) -> anyhow::Result<()> {
        self.record_mutation();
        self.comments.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn edit_issue_title(&self, _issue: u64, title: &str) -> anyhow::Result<()> {
        self.record_mutation();
        self.issue_title_edits.lock().unwrap().push(title.to_string());
        Ok(())
    }

    async fn edit_pull_request_title(&self, _pr: u64, title: &str) -> anyhow::Result<()> {
        self.record_mutation();
        self.pr_title_edits.lock().unwrap().push(title.to_string());
        Ok(())
    }

    async fn add_assignees(&self, _issue: u64, assignees: &[&str]) -> anyhow::Result<()> {
        self.record_mutation();
        if self.fail_add_assignees {
            return Err(anyhow::anyhow!("Cannot assign {assignees:?}"));
        }
        self.assignees
            .lock()
            .unwrap()
            .extend(assignees.iter().map(|login| login.to_string()));
        Ok(())
    }

    async fn is_org_member(&self, username: &str) -> anyhow::Result<bool> {
        *self.trust_queries.lock().unwrap() += 1;
        if self.fail_org_member_query {
            return Err(anyhow::anyhow!("Membership query failed"));
        }
        Ok(self.org_members.contains(username))
    }

    async fn is_collaborator(&self, username: &str) -> anyhow::Result<bool> {
        *self.trust_queries.lock().unwrap() += 1;
        if self.fail_collaborator_query {
            return Err(anyhow::anyhow!("Collaborator query failed"));
        }
        Ok(self.collaborators.contains(username))
    }

    async fn list_pull_request_files(&self, _pr: u64) -> anyhow::Result<Vec<PullRequestFile>> {
        Ok(self.files.clone())
    }
}
