//! Command and conversation handlers

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use super::reply::{reply_to_callback, reply_to_message};
use super::types::{user_id_of, HandlerDeps, HandlerError};
use crate::registration::{CallbackAction, Input, Prompt, Reply};
use crate::telegram::bot::Command;

/// Handles `/start`, `/cancel` and `/help`.
pub(super) async fn handle_command(
    bot: &Bot,
    msg: &Message,
    cmd: Command,
    deps: &HandlerDeps,
) -> Result<(), HandlerError> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let Some(user_id) = user_id_of(user) else {
        return Ok(());
    };

    log::info!("Received command {:?} from user {} in chat {}", cmd, user_id, msg.chat.id);

    let reply = match cmd {
        Command::Start => {
            deps.conversation
                .handle(user_id, Input::Start { first_name: &user.first_name })
                .await
        }
        Command::Cancel => deps.conversation.handle(user_id, Input::Cancel).await,
        Command::Help => Reply::Send(Prompt::text(Command::descriptions().to_string())),
    };

    if let Err(e) = reply_to_message(bot, msg.chat.id, reply).await {
        log::error!("Failed to answer command from user {}: {}", user_id, e);
    }
    Ok(())
}

/// Free text typed by the user; the session step decides what it means.
pub(super) async fn handle_text(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let (Some(user), Some(text)) = (msg.from.as_ref(), msg.text()) else {
        return Ok(());
    };
    let Some(user_id) = user_id_of(user) else {
        return Ok(());
    };

    let reply = deps.conversation.handle(user_id, Input::Text(text)).await;
    if let Err(e) = reply_to_message(bot, msg.chat.id, reply).await {
        log::error!("Failed to reply to user {}: {}", user_id, e);
    }
    Ok(())
}

/// Inline button presses.
pub(super) async fn handle_callback(bot: &Bot, q: &CallbackQuery, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let Some(user_id) = user_id_of(&q.from) else {
        return Ok(());
    };

    let reply = match q.data.as_deref().and_then(CallbackAction::parse) {
        Some(action) => deps.conversation.handle(user_id, Input::Action(action)).await,
        None => {
            log::debug!("Ignoring unknown callback data {:?} from user {}", q.data, user_id);
            Reply::Ignore
        }
    };

    if let Err(e) = reply_to_callback(bot, q, reply).await {
        log::error!("Failed to answer callback from user {}: {}", user_id, e);
    }
    Ok(())
}
