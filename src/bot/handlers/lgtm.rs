use anyhow::Context;

use crate::bot::event::{CommentEvent, IssueState};
use crate::bot::RepositoryClient;

/// Name of the approval label. Its presence on the pull request is the
/// authoritative state of the approval machine; nothing is persisted
/// locally, so the machine is re-derived from the remote label set on
/// every event.
pub const LGTM_LABEL: &str = "lgtm";

const LGTM_REMOVED_NOTIFICATION: &str = "New changes are detected. LGTM label has been removed.";

/// The two triggers of the approval state machine.
pub(super) enum LgtmEvent<'a> {
    /// New commits were pushed to the pull request. Bypasses trust and
    /// comment-grammar checks entirely.
    Synchronize,
    /// A `/lgtm` (`cancel == false`) or `/lgtm cancel` (`cancel == true`)
    /// comment.
    Command {
        cancel: bool,
        comment: &'a CommentEvent,
        trusted: bool,
    },
}

pub(super) async fn handle_lgtm_event<Client: RepositoryClient>(
    client: &Client,
    pr_number: u64,
    event: LgtmEvent<'_>,
) -> anyhow::Result<()> {
    match event {
        LgtmEvent::Synchronize => {
            let labels = client
                .list_labels(pr_number)
                .await
                .context("Cannot list labels")?;
            if !labels.iter().any(|label| label == LGTM_LABEL) {
                return Ok(());
            }
            client
                .remove_label(pr_number, LGTM_LABEL)
                .await
                .context("Cannot remove LGTM label")?;
            tracing::info!("Commenting with {LGTM_REMOVED_NOTIFICATION:?}");
            client.post_comment(pr_number, LGTM_REMOVED_NOTIFICATION).await
        }
        LgtmEvent::Command {
            cancel,
            comment,
            trusted,
        } => {
            if !trusted {
                return Ok(());
            }
            if !comment.is_pull_request || comment.issue_state != IssueState::Open {
                return Ok(());
            }

            let actor = &comment.author.username;
            if *actor == comment.issue_author {
                let response = format!("@{actor} you cannot LGTM your own PR.");
                tracing::info!("Commenting with {response:?}");
                return client.post_comment(pr_number, &response).await;
            }

            // A trusted review interaction assigns the reviewer to the PR,
            // best effort.
            tracing::info!("Assigning {}#{pr_number} to {actor}", comment.repository);
            if let Err(error) = client.add_assignees(pr_number, &[actor]).await {
                tracing::error!("Failed to assign {actor}: {error:?}");
            }

            if cancel {
                client
                    .remove_label(pr_number, LGTM_LABEL)
                    .await
                    .context("Cannot remove LGTM label")
            } else {
                client
                    .add_labels(pr_number, &[LGTM_LABEL.to_string()])
                    .await
                    .context("Cannot add LGTM label")
            }
        }
    }
}
