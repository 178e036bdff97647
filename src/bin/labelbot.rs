use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use labelbot::bot::{BotContext, CommandParser};
use labelbot::config::BotConfig;
use labelbot::github::api::{create_github_client, load_bot_login};
use labelbot::github::process::github_webhook_process;
use labelbot::github::server::{create_app, ServerState};
use labelbot::github::WebhookSecret;

#[derive(clap::Parser)]
struct Opts {
    /// Secret used to authenticate webhooks.
    #[arg(long, env = "WEBHOOK_SECRET")]
    webhook_secret: String,

    /// Personal access token used to call the GitHub API.
    #[arg(long, env = "GITHUB_TOKEN")]
    github_token: String,

    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Port to listen on for webhooks.
    #[arg(long, env = "PORT", default_value = "8181")]
    port: u16,
}

async fn server(state: ServerState, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot bind to {addr}"))?;
    tracing::info!("Listening on {addr}");
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}

fn try_main(opts: Opts) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Cannot build tokio runtime")?;

    let config = match &opts.config {
        Some(path) => BotConfig::load(path)?,
        None => BotConfig::default(),
    };

    let client = create_github_client(opts.github_token)?;
    let bot_login = match runtime.block_on(load_bot_login(&client)) {
        Ok(login) => Some(login),
        Err(error) => {
            tracing::warn!("Cannot load bot login, own comments will not be filtered: {error:?}");
            None
        }
    };

    let ctx = BotContext::new(CommandParser::new(), config, bot_login);
    let (tx, webhook_process) = github_webhook_process(client, ctx);

    let state = ServerState::new(tx, WebhookSecret::new(opts.webhook_secret));
    let server_process = server(state, opts.port);

    runtime.block_on(async move {
        tokio::select! {
            () = webhook_process => {
                tracing::warn!("Webhook process has ended");
                Ok(())
            },
            res = server_process => {
                tracing::warn!("Server has ended: {res:?}");
                res
            }
        }
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = Opts::parse();
    if let Err(error) = try_main(opts) {
        eprintln!("Error: {error:?}");
        std::process::exit(1);
    }
}
