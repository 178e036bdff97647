//! Parsing and verification of inbound GitHub webhooks.
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use url::Url;

use crate::bot::event::{BotEvent, CommentEvent, IssueState, PullRequestAction, PullRequestEvent};
use crate::github::server::ServerStateRef;
use crate::github::{GithubRepoName, GithubUser};

/// Maximum accepted size of a webhook body.
const REQUEST_BODY_LIMIT: usize = 2 * 1024 * 1024;

#[derive(serde::Deserialize, Debug)]
struct UserPayload {
    login: String,
    html_url: Url,
}

#[derive(serde::Deserialize, Debug)]
struct RepositoryPayload {
    name: String,
    owner: UserPayload,
}

#[derive(serde::Deserialize, Debug)]
struct PullRequestLinkPayload {
    url: Url,
}

#[derive(serde::Deserialize, Debug)]
struct IssuePayload {
    number: u64,
    state: String,
    user: UserPayload,
    /// Present iff the issue is actually a pull request.
    pull_request: Option<PullRequestLinkPayload>,
}

#[derive(serde::Deserialize, Debug)]
struct CommentPayload {
    body: Option<String>,
    user: UserPayload,
}

#[derive(serde::Deserialize, Debug)]
struct WebhookIssueComment {
    action: String,
    repository: RepositoryPayload,
    issue: IssuePayload,
    comment: CommentPayload,
}

#[derive(serde::Deserialize, Debug)]
struct PullRequestPayload {
    number: u64,
}

#[derive(serde::Deserialize, Debug)]
struct WebhookPullRequest {
    action: String,
    repository: RepositoryPayload,
    pull_request: PullRequestPayload,
}

/// axum extractor for GitHub webhook events.
#[derive(Debug)]
pub struct GitHubWebhook(pub BotEvent);

/// Extracts a webhook event from a HTTP request.
#[async_trait]
impl FromRequest<ServerStateRef> for GitHubWebhook {
    type Rejection = StatusCode;

    async fn from_request(
        request: Request,
        state: &ServerStateRef,
    ) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();

        // Eagerly load body
        let body: Bytes = axum::body::to_bytes(body, REQUEST_BODY_LIMIT)
            .await
            .map_err(|error| {
                tracing::error!("Parsing webhook body failed: {error:?}");
                StatusCode::BAD_REQUEST
            })?;

        // Verify that the request is valid
        if !verify_gh_signature(&parts.headers, &body, state.get_webhook_secret()) {
            tracing::error!("Webhook request failed, could not authenticate webhook");
            return Err(StatusCode::BAD_REQUEST);
        }

        // Parse webhook content
        match parse_webhook_event(parts, &body) {
            Ok(Some(event)) => Ok(GitHubWebhook(event)),
            Ok(None) => Err(StatusCode::OK),
            Err(error) => {
                tracing::error!("Cannot parse webhook event: {error:?}");
                Err(StatusCode::BAD_REQUEST)
            }
        }
    }
}

fn parse_webhook_event(request: Parts, body: &[u8]) -> anyhow::Result<Option<BotEvent>> {
    let Some(event_type) = request.headers.get("x-github-event") else {
        return Err(anyhow::anyhow!("x-github-event header not found"));
    };

    match event_type.as_bytes() {
        b"issue_comment" => {
            let payload: WebhookIssueComment = serde_json::from_slice(body)?;
            // Edited and deleted comments must not re-trigger commands.
            if payload.action != "created" {
                return Ok(None);
            }
            Ok(Some(BotEvent::Comment(parse_comment_event(payload))))
        }
        b"pull_request" => {
            let payload: WebhookPullRequest = serde_json::from_slice(body)?;
            Ok(Some(BotEvent::PullRequest(PullRequestEvent {
                repository: parse_repository_name(&payload.repository),
                pr_number: payload.pull_request.number,
                action: PullRequestAction::from(payload.action.as_str()),
            })))
        }
        _ => {
            tracing::debug!("Ignoring unknown event type {:?}", event_type.to_str());
            Ok(None)
        }
    }
}

fn parse_comment_event(payload: WebhookIssueComment) -> CommentEvent {
    CommentEvent {
        repository: parse_repository_name(&payload.repository),
        issue_number: payload.issue.number,
        author: GithubUser {
            username: payload.comment.user.login,
            html_url: payload.comment.user.html_url,
        },
        body: payload.comment.body.unwrap_or_default(),
        is_pull_request: payload.issue.pull_request.is_some(),
        issue_state: IssueState::from(payload.issue.state.as_str()),
        issue_author: payload.issue.user.login,
    }
}

fn parse_repository_name(repository: &RepositoryPayload) -> GithubRepoName {
    GithubRepoName::new(&repository.owner.login, &repository.name)
}

type HmacSha256 = Hmac<Sha256>;

/// Verifies that the request is properly signed by GitHub with SHA-256 and
/// the passed `secret`.
fn verify_gh_signature(
    headers: &HeaderMap<HeaderValue>,
    body: &[u8],
    secret: &WebhookSecret,
) -> bool {
    let Some(signature) = headers.get("x-hub-signature-256").map(|v| v.as_bytes()) else {
        return false;
    };
    let Some(signature) = signature
        .get(b"sha256=".len()..)
        .and_then(|v| hex::decode(v).ok())
    else {
        return false;
    };

    let mut mac =
        HmacSha256::new_from_slice(secret.expose().as_bytes()).expect("Cannot create HMAC key");
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

pub struct WebhookSecret(SecretString);

impl WebhookSecret {
    pub fn new(secret: String) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret().as_str()
    }
}
