use anyhow::Context;
use axum::async_trait;
use http::StatusCode;
use octocrab::{Error, Octocrab};

use crate::bot::RepositoryClient;
use crate::github::{GithubRepoName, PullRequestFile};

/// Provides access to a single repository using the GitHub API.
/// One instance is bound per repository per handled event.
pub struct GithubRepositoryClient {
    client: Octocrab,
    repo_name: GithubRepoName,
}

impl GithubRepositoryClient {
    pub fn new(client: Octocrab, repo_name: GithubRepoName) -> Self {
        Self { client, repo_name }
    }

    fn format_issue(&self, issue: u64) -> String {
        format!("{}#{issue}", self.repo_name)
    }

    /// Performs a GET request whose status code encodes a yes/no answer
    /// (204 = yes, 404 = no). Any other status is an error.
    async fn boolean_probe(&self, path: String) -> anyhow::Result<bool> {
        let response = self.client._get(path).await?;
        match response.status() {
            StatusCode::NO_CONTENT => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(anyhow::anyhow!("Unexpected status code {status}")),
        }
    }
}

#[async_trait]
impl RepositoryClient for GithubRepositoryClient {
    fn repository(&self) -> &GithubRepoName {
        &self.repo_name
    }

    async fn list_labels(&self, issue: u64) -> anyhow::Result<Vec<String>> {
        let labels = self
            .client
            .issues(self.repo_name.owner(), self.repo_name.name())
            .list_labels_for_issue(issue)
            .per_page(100)
            .send()
            .await
            .with_context(|| format!("Cannot list labels of {}", self.format_issue(issue)))?;
        Ok(labels.into_iter().map(|label| label.name).collect())
    }

    async fn add_labels(&self, issue: u64, labels: &[String]) -> anyhow::Result<()> {
        if labels.is_empty() {
            return Ok(());
        }
        self.client
            .issues(self.repo_name.owner(), self.repo_name.name())
            .add_labels(issue, labels)
            .await
            .with_context(|| format!("Cannot add label(s) to {}", self.format_issue(issue)))?;
        Ok(())
    }

    async fn remove_label(&self, issue: u64, label: &str) -> anyhow::Result<()> {
        let result = self
            .client
            .issues(self.repo_name.owner(), self.repo_name.name())
            .remove_label(issue, label)
            .await;
        match result {
            Ok(_) => Ok(()),
            // Removing a label that is not present on the issue is a no-op
            // for us, so this error is swallowed.
            Err(Error::GitHub { source, .. })
                if source.message.contains("Label does not exist") =>
            {
                tracing::trace!(
                    "Label {label} does not exist on {}",
                    self.format_issue(issue)
                );
                Ok(())
            }
            Err(error) => Err(error).with_context(|| {
                format!(
                    "Cannot remove label {label} from {}",
                    self.format_issue(issue)
                )
            }),
        }
    }

    async fn post_comment(&self, issue: u64, text: &str) -> anyhow::Result<()> {
        self.client
            .issues(self.repo_name.owner(), self.repo_name.name())
            .create_comment(issue, text)
            .await
            .with_context(|| format!("Cannot post comment to {}", self.format_issue(issue)))?;
        Ok(())
    }

    async fn edit_issue_title(&self, issue: u64, title: &str) -> anyhow::Result<()> {
        self.client
            .issues(self.repo_name.owner(), self.repo_name.name())
            .update(issue)
            .title(title)
            .send()
            .await
            .with_context(|| format!("Cannot edit title of {}", self.format_issue(issue)))?;
        Ok(())
    }

    async fn edit_pull_request_title(&self, pr: u64, title: &str) -> anyhow::Result<()> {
        self.client
            .pulls(self.repo_name.owner(), self.repo_name.name())
            .update(pr)
            .title(title)
            .send()
            .await
            .with_context(|| format!("Cannot edit title of {}", self.format_issue(pr)))?;
        Ok(())
    }

    async fn add_assignees(&self, issue: u64, assignees: &[&str]) -> anyhow::Result<()> {
        self.client
            .issues(self.repo_name.owner(), self.repo_name.name())
            .add_assignees(issue, assignees)
            .await
            .with_context(|| format!("Cannot assign {assignees:?} to {}", self.format_issue(issue)))?;
        Ok(())
    }

    async fn is_org_member(&self, username: &str) -> anyhow::Result<bool> {
        self.boolean_probe(format!(
            "/orgs/{}/members/{username}",
            self.repo_name.owner()
        ))
        .await
        .with_context(|| format!("Cannot check org membership of {username}"))
    }

    async fn is_collaborator(&self, username: &str) -> anyhow::Result<bool> {
        self.boolean_probe(format!(
            "/repos/{}/{}/collaborators/{username}",
            self.repo_name.owner(),
            self.repo_name.name()
        ))
        .await
        .with_context(|| format!("Cannot check collaborator status of {username}"))
    }

    async fn list_pull_request_files(&self, pr: u64) -> anyhow::Result<Vec<PullRequestFile>> {
        let files = self
            .client
            .pulls(self.repo_name.owner(), self.repo_name.name())
            .list_files(pr)
            .await
            .with_context(|| format!("Cannot list files of {}", self.format_issue(pr)))?;
        Ok(files
            .into_iter()
            .map(|file| PullRequestFile {
                additions: file.additions,
                deletions: file.deletions,
            })
            .collect())
    }
}
