use tracing::Instrument;

use crate::bot::command::BotCommand;
use crate::bot::event::{BotEvent, CommentEvent, PullRequestAction, PullRequestEvent};
use crate::bot::handlers::lgtm::LgtmEvent;
use crate::bot::{BotContext, RepositoryClient};
use crate::permissions::resolve_trust;
use crate::utils::LogError;

mod labels;
mod lgtm;
mod retitle;
mod size;

/// Executes a single bot event.
///
/// Failures of individual remote operations are logged where they happen;
/// they never prevent the remaining commands of the same comment, or
/// subsequent events, from being processed.
pub async fn handle_bot_event<Client: RepositoryClient>(
    event: BotEvent,
    client: &Client,
    ctx: &BotContext,
) -> anyhow::Result<()> {
    match event {
        BotEvent::Comment(comment) => {
            // We want to ignore comments made by this bot
            if ctx.is_own_comment(&comment) {
                tracing::trace!("Ignoring comment {comment:?} because it was authored by this bot");
                return Ok(());
            }

            let span = tracing::info_span!(
                "Comment",
                issue = format!("{}#{}", comment.repository, comment.issue_number),
                author = comment.author.username
            );
            handle_comment(client, ctx, &comment).instrument(span).await
        }
        BotEvent::PullRequest(payload) => {
            let span = tracing::info_span!(
                "Pull request",
                pr = format!("{}#{}", payload.repository, payload.pr_number),
                action = ?payload.action
            );
            handle_pull_request(client, ctx, &payload)
                .instrument(span)
                .await;
            Ok(())
        }
    }
}

async fn handle_comment<Client: RepositoryClient>(
    client: &Client,
    ctx: &BotContext,
    comment: &CommentEvent,
) -> anyhow::Result<()> {
    let commands = ctx.parser.parse_commands(&comment.body);
    if commands.is_empty() {
        return Ok(());
    }
    tracing::debug!("Commands: {commands:?}");

    // Trust is resolved once per event; a resolution failure is reported
    // and treated as "not trusted".
    let trusted = match resolve_trust(client, &comment.author.username).await {
        Ok(trusted) => trusted,
        Err(error) => {
            tracing::error!(
                "Cannot resolve trust for {}: {error:?}",
                comment.author.username
            );
            false
        }
    };

    let mut label_commands = Vec::new();
    for command in commands {
        match command {
            BotCommand::LabelAdd { .. }
            | BotCommand::LabelRemove { .. }
            | BotCommand::CustomLabelAdd { .. }
            | BotCommand::CustomLabelRemove { .. } => label_commands.push(command),
            BotCommand::Retitle { title } => {
                let span = tracing::info_span!("Retitle");
                if let Err(error) = retitle::handle_retitle(client, comment, &title, trusted)
                    .instrument(span.clone())
                    .await
                {
                    span.log_error(error);
                }
            }
            BotCommand::LgtmAdd => {
                let span = tracing::info_span!("LGTM");
                if let Err(error) = lgtm::handle_lgtm_event(
                    client,
                    comment.issue_number,
                    LgtmEvent::Command {
                        cancel: false,
                        comment,
                        trusted,
                    },
                )
                .instrument(span.clone())
                .await
                {
                    span.log_error(error);
                }
            }
            BotCommand::LgtmCancel => {
                let span = tracing::info_span!("Cancel LGTM");
                if let Err(error) = lgtm::handle_lgtm_event(
                    client,
                    comment.issue_number,
                    LgtmEvent::Command {
                        cancel: true,
                        comment,
                        trusted,
                    },
                )
                .instrument(span.clone())
                .await
                {
                    span.log_error(error);
                }
            }
        }
    }

    if !label_commands.is_empty() {
        let span = tracing::info_span!("Labels");
        labels::handle_label_commands(client, comment.issue_number, &label_commands, trusted)
            .instrument(span)
            .await;
    }
    Ok(())
}

async fn handle_pull_request<Client: RepositoryClient>(
    client: &Client,
    ctx: &BotContext,
    payload: &PullRequestEvent,
) {
    if payload.action.diff_may_have_changed() {
        let span = tracing::info_span!("Size");
        if let Err(error) = size::update_size_label(client, payload.pr_number, &ctx.config.size)
            .instrument(span.clone())
            .await
        {
            span.log_error(error);
        }
    }
    if payload.action == PullRequestAction::Synchronize {
        let span = tracing::info_span!("Reset LGTM");
        if let Err(error) = lgtm::handle_lgtm_event(client, payload.pr_number, LgtmEvent::Synchronize)
            .instrument(span.clone())
            .await
        {
            span.log_error(error);
        }
    }
}
