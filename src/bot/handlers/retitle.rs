use anyhow::Context;

use crate::bot::event::CommentEvent;
use crate::bot::RepositoryClient;

const EMPTY_TITLE_NOTIFICATION: &str = "Titles may not be empty.";

/// Applies a `/retitle` request.
///
/// An empty requested title is a validation failure that blocks the edit
/// entirely; an untrusted actor gets a rejection comment. Otherwise exactly
/// one of the two title-edit operations is invoked, depending on whether
/// the target is a pull request or a plain issue.
pub(super) async fn handle_retitle<Client: RepositoryClient>(
    client: &Client,
    comment: &CommentEvent,
    new_title: &str,
    trusted: bool,
) -> anyhow::Result<()> {
    let new_title = new_title.trim();
    if new_title.is_empty() {
        tracing::info!("Commenting with {EMPTY_TITLE_NOTIFICATION:?}");
        return client
            .post_comment(comment.issue_number, EMPTY_TITLE_NOTIFICATION)
            .await;
    }

    if !trusted {
        let response = format!(
            "Hi @{} Re-titling can only be requested by trusted users, like repository collaborators.",
            comment.author.username
        );
        tracing::info!("Commenting with {response:?}");
        return client.post_comment(comment.issue_number, &response).await;
    }

    if comment.is_pull_request {
        client
            .edit_pull_request_title(comment.issue_number, new_title)
            .await
            .context("Cannot edit pull request title")
    } else {
        client
            .edit_issue_title(comment.issue_number, new_title)
            .await
            .context("Cannot edit issue title")
    }
}
