use itertools::Itertools;

use crate::bot::command::BotCommand;
use crate::bot::RepositoryClient;

/// Applies the label commands collected from one comment body.
///
/// Built-in category labels may be modified by anyone; custom labels are
/// free-form and therefore restricted to trusted actors. Additions are
/// performed in one batch first, then removals are swept one by one; a
/// failed removal is reported and does not stop the rest of the sweep.
pub(super) async fn handle_label_commands<Client: RepositoryClient>(
    client: &Client,
    issue: u64,
    commands: &[BotCommand],
    trusted: bool,
) {
    let mut add = Vec::new();
    let mut remove = Vec::new();
    for command in commands {
        match command {
            BotCommand::LabelAdd { category, value } => add.push(category_label(category, value)),
            BotCommand::LabelRemove { category, value } => {
                remove.push(category_label(category, value))
            }
            BotCommand::CustomLabelAdd { name } if trusted => add.push(name.clone()),
            BotCommand::CustomLabelRemove { name } if trusted => remove.push(name.clone()),
            BotCommand::CustomLabelAdd { .. } | BotCommand::CustomLabelRemove { .. } => {
                tracing::debug!("Dropping custom label command from untrusted actor");
            }
            _ => {}
        }
    }
    let add: Vec<String> = add.into_iter().unique().collect();
    let remove: Vec<String> = remove.into_iter().unique().collect();

    if !add.is_empty() {
        tracing::info!("Adding label(s) {add:?}");
        if let Err(error) = client.add_labels(issue, &add).await {
            tracing::error!("Cannot add label(s) {add:?}: {error:?}");
        }
    }
    for label in &remove {
        tracing::info!("Removing label {label}");
        if let Err(error) = client.remove_label(issue, label).await {
            tracing::error!("Cannot remove label {label}: {error:?}");
        }
    }
}

/// Canonical name of a built-in category label.
fn category_label(category: &str, value: &str) -> String {
    format!("{category}/{value}").to_lowercase()
}

#[cfg(test)]
mod tests {
    use crate::bot::event::BotEvent;
    use crate::bot::handle_bot_event;
    use crate::tests::mocks::{comment, test_context, TestClient};

    #[tokio::test]
    async fn category_labels_applied_regardless_of_trust() {
        let ctx = test_context();
        let client = TestClient::new();
        handle_bot_event(
            BotEvent::Comment(comment("/kind bug\n/priority high").create()),
            &client,
            &ctx,
        )
        .await
        .unwrap();
        client.check_labels(&["kind/bug", "priority/high"]);
        client.check_comments(&[]);
    }

    #[tokio::test]
    async fn category_labels_are_lowercased() {
        let ctx = test_context();
        let client = TestClient::new();
        handle_bot_event(
            BotEvent::Comment(comment("/kind Bug").create()),
            &client,
            &ctx,
        )
        .await
        .unwrap();
        client.check_labels(&["kind/bug"]);
    }

    #[tokio::test]
    async fn custom_label_requires_trust() {
        let ctx = test_context();
        let client = TestClient::new();
        handle_bot_event(
            BotEvent::Comment(comment("/label custom-thing").create()),
            &client,
            &ctx,
        )
        .await
        .unwrap();
        client.check_labels(&[]);
        client.check_comments(&[]);
    }

    #[tokio::test]
    async fn custom_label_from_trusted_actor_keeps_case() {
        let ctx = test_context();
        let client = TestClient::new().with_org_member("reviewer");
        handle_bot_event(
            BotEvent::Comment(comment("/label Custom-Thing").create()),
            &client,
            &ctx,
        )
        .await
        .unwrap();
        client.check_labels(&["Custom-Thing"]);
    }

    #[tokio::test]
    async fn duplicate_labels_added_once() {
        let ctx = test_context();
        let client = TestClient::new();
        handle_bot_event(
            BotEvent::Comment(comment("/kind bug bug\n/kind bug").create()),
            &client,
            &ctx,
        )
        .await
        .unwrap();
        client.check_labels(&["kind/bug"]);
        assert_eq!(client.mutation_count(), 1);
    }

    #[tokio::test]
    async fn removal_failure_does_not_stop_the_sweep() {
        let ctx = test_context();
        let client = TestClient::new()
            .with_labels(&["kind/bug", "kind/docs"])
            .failing_removal("kind/bug");
        handle_bot_event(
            BotEvent::Comment(comment("/remove-kind bug docs").create()),
            &client,
            &ctx,
        )
        .await
        .unwrap();
        client.check_labels(&["kind/bug"]);
    }

    #[tokio::test]
    async fn custom_label_removal_requires_trust() {
        let ctx = test_context();
        let client = TestClient::new().with_labels(&["custom-thing"]);
        handle_bot_event(
            BotEvent::Comment(comment("/remove-label custom-thing").create()),
            &client,
            &ctx,
        )
        .await
        .unwrap();
        client.check_labels(&["custom-thing"]);
    }
}
