//! Telegram bot front door.
//!
//! Answers `/start` with a button that launches the mini-app and `/help` with
//! usage text. Handlers are stateless; delivery failures are classified by
//! [`TransportError`] and handled per [`ErrorPolicy`].

mod transport;

pub use transport::*;

use std::sync::Arc;

use teloxide::{dispatching::DefaultKey, prelude::*, utils::command::BotCommands, RequestError};
use url::Url;

/// Commands understood by the bot.
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "RoadTop commands:")]
pub enum Command {
    #[command(description = "open RoadTop")]
    Start,
    #[command(description = "how RoadTop works")]
    Help,
}

pub const WELCOME_TEXT: &str = "🌟 <b>RoadTop</b>: the best places along your way.\n\n\
📍 Enter an address and we will build a route\n\
🎯 Add the best coffee shops, barbers and lunch spots\n\n\
Tap the button below!";

pub const HELP_TEXT: &str = "📌 RoadTop is your personal road guide.\n\n\
🔹 Enter where you start and where you are going\n\
🔹 Follow the route on the map\n\
🔹 Find the top places along the way\n\n\
Everything works inside the mini app!";

pub const LAUNCH_BUTTON_LABEL: &str = "📍 Open RoadTop";

pub const FAILURE_TEXT: &str = "Something went wrong. Please try again later.";

/// Settings the command handlers need.
#[derive(Debug, Clone)]
pub struct BotSettings {
    pub web_app_url: Url,
}

/// The reply for a command.
pub fn reply_for(command: &Command, settings: &BotSettings) -> Reply {
    match command {
        Command::Start => {
            Reply::text(WELCOME_TEXT).with_web_app(LAUNCH_BUTTON_LABEL, settings.web_app_url.clone())
        }
        Command::Help => Reply::text(HELP_TEXT),
    }
}

/// Answer a command, applying the error policy if delivery fails.
pub async fn respond<T>(transport: &T, chat_id: i64, command: &Command, settings: &BotSettings)
where
    T: ChatTransport + ?Sized,
{
    let reply = reply_for(command, settings);
    let Err(err) = transport.send_reply(chat_id, &reply).await else {
        return;
    };

    match err.policy() {
        ErrorPolicy::Suppress => {
            tracing::debug!(chat_id, ?command, error = %err, "Reply dropped");
        }
        ErrorPolicy::Log => {
            tracing::warn!(chat_id, ?command, error = %err, "Failed to send reply");
        }
        ErrorPolicy::Notify => {
            tracing::error!(chat_id, ?command, error = ?err, "Unexpected failure while replying");
            if let Err(notify_err) = transport.send_reply(chat_id, &Reply::text(FAILURE_TEXT)).await {
                tracing::debug!(chat_id, error = %notify_err, "Could not notify user about failure");
            }
        }
    }
}

async fn on_command(
    bot: Bot,
    msg: Message,
    command: Command,
    settings: Arc<BotSettings>,
) -> ResponseResult<()> {
    tracing::debug!(chat_id = msg.chat.id.0, ?command, "Command received");
    respond(&bot, msg.chat.id.0, &command, &settings).await;
    Ok(())
}

/// Build the long-polling dispatcher. Run it with `dispatch()` and stop it
/// through its shutdown token.
pub fn build_dispatcher(bot: Bot, settings: BotSettings) -> Dispatcher<Bot, RequestError, DefaultKey> {
    let handler = Update::filter_message()
        .filter_command::<Command>()
        .endpoint(on_command);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![Arc::new(settings)])
        .default_handler(|update| async move {
            tracing::trace!(update_id = ?update.id, "Ignoring non-command update");
        })
        .build()
}
