use std::future::Future;
use std::sync::Arc;

use octocrab::Octocrab;
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::bot::event::BotEvent;
use crate::bot::{handle_bot_event, BotContext};
use crate::github::api::client::GithubRepositoryClient;
use crate::utils::LogError;

pub type WebhookSender = mpsc::Sender<BotEvent>;

/// Asynchronous process that receives webhook events and reacts to them.
///
/// Each event is an independent unit of work; a failed event is logged and
/// never prevents subsequent events from being processed.
pub fn github_webhook_process(
    client: Octocrab,
    ctx: BotContext,
) -> (WebhookSender, impl Future<Output = ()>) {
    let (tx, mut rx) = mpsc::channel::<BotEvent>(1024);
    let ctx = Arc::new(ctx);

    let service = async move {
        while let Some(event) = rx.recv().await {
            tracing::trace!("Received webhook: {event:#?}");

            let repo_client =
                GithubRepositoryClient::new(client.clone(), event.repository().clone());
            let span = tracing::info_span!("Event", repo = event.repository().to_string());
            if let Err(error) = handle_bot_event(event, &repo_client, &ctx)
                .instrument(span.clone())
                .await
            {
                span.log_error(error);
            }
        }
    };
    (tx, service)
}
