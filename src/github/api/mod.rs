use anyhow::Context;
use octocrab::Octocrab;

pub mod client;

/// Creates a GitHub client authenticated with a personal access token.
pub fn create_github_client(token: String) -> anyhow::Result<Octocrab> {
    Octocrab::builder()
        .personal_token(token)
        .build()
        .context("Cannot create GitHub client")
}

/// Login of the account the client authenticates as.
/// Used to recognize (and ignore) the bot's own comments.
pub async fn load_bot_login(client: &Octocrab) -> anyhow::Result<String> {
    let user = client
        .current()
        .user()
        .await
        .context("Cannot load the authenticated user")?;
    Ok(user.login)
}
