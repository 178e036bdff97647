//! Trust resolution for commenting actors.
use crate::bot::RepositoryClient;

/// Returns whether the given user is trusted for the client's repository.
///
/// An actor is trusted iff they are a member of the repository's
/// organization or a collaborator of the repository. Trust is re-resolved
/// on every event and never cached, so a membership change takes effect on
/// the next comment.
///
/// The resolution fails closed: a failed remote query never grants trust.
/// Each check keeps its own result; if neither check answered `true`, any
/// query error is surfaced to the caller instead of being folded into the
/// boolean.
pub async fn resolve_trust<Client: RepositoryClient>(
    client: &Client,
    username: &str,
) -> anyhow::Result<bool> {
    let member = client.is_org_member(username).await;
    if matches!(member, Ok(true)) {
        return Ok(true);
    }
    let collaborator = client.is_collaborator(username).await;
    if matches!(collaborator, Ok(true)) {
        return Ok(true);
    }
    member?;
    collaborator?;
    Ok(false)
}
