//! Command handlers behind the CLI flags.

use tracing::info;

use crate::cli::render::{render_reply, render_session_list};
use crate::cli::Cli;
use crate::client::{SessionApi, SessionClient};
use crate::config::ClientConfig;
use crate::conversation::Conversation;
use crate::error::Result;
use crate::session::{resolve_session, SessionResolution};

/// Load configuration, apply flag overrides, and run the selected mode.
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::load_from(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    let client = SessionClient::new(config)?;

    if cli.list_sessions {
        return list_sessions(&client).await;
    }
    converse(&client, &cli).await
}

async fn list_sessions(client: &SessionClient) -> Result<()> {
    let sessions = client
        .list_sessions(client.app_name(), client.user_id())
        .await?;
    print!("{}", render_session_list(&sessions));
    Ok(())
}

async fn converse(client: &SessionClient, cli: &Cli) -> Result<()> {
    let app_name = client.app_name();
    let user_id = client.user_id();

    let resolution = resolve_session(client, app_name, user_id, &cli.strategy()).await;
    match &resolution {
        SessionResolution::Found(session) => info!(session_id = %session.id, "Session verified"),
        SessionResolution::Created(session) => {
            info!(session_id = %session.id, "Fresh session created and verified")
        }
        SessionResolution::Failed(_) => {}
    }
    let session = resolution.into_result()?;

    let mut conversation = Conversation::new(client, app_name, user_id, session);
    let kind = cli.query_kind();

    let questions = std::iter::once(cli.query_text()).chain(cli.follow_up.iter().cloned());
    for question in questions {
        println!("Query: {question}");
        let reply = conversation.send(&question).await?;
        print!("{}", render_reply(&reply, kind));
    }

    info!(
        session_id = conversation.session_id(),
        turns = conversation.turns(),
        "Conversation finished"
    );
    Ok(())
}
