//! Turns engine replies into Bot API calls

use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId};
use teloxide::RequestError;

use crate::registration::{Menu, Prompt, Reply};

/// Builds an inline keyboard with one callback button per menu entry.
pub fn keyboard(menu: &Menu) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = menu
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| InlineKeyboardButton::callback(button.label.clone(), button.action.to_string()))
                .collect()
        })
        .collect();
    InlineKeyboardMarkup::new(rows)
}

async fn send_prompt(bot: &Bot, chat_id: ChatId, prompt: Prompt) -> Result<(), RequestError> {
    let markup = prompt.menu.as_ref().map(keyboard);
    let mut request = bot.send_message(chat_id, prompt.text);
    if let Some(markup) = markup {
        request = request.reply_markup(markup);
    }
    request.await?;
    Ok(())
}

async fn edit_prompt(bot: &Bot, chat_id: ChatId, message_id: MessageId, prompt: Prompt) -> Result<(), RequestError> {
    let mut request = bot.edit_message_text(chat_id, message_id, prompt.text.clone());
    if let Some(menu) = &prompt.menu {
        request = request.reply_markup(keyboard(menu));
    }

    match request.await {
        Ok(_) => Ok(()),
        Err(e) => {
            // Old or deleted messages can't be edited
            log::warn!("Failed to edit message {} in chat {}: {}, sending a new one", message_id.0, chat_id, e);
            send_prompt(bot, chat_id, prompt).await
        }
    }
}

/// Delivers a reply to an input that arrived as a message.
///
/// There is no button message to edit here, so `Edit` is sent as a new message.
pub async fn reply_to_message(bot: &Bot, chat_id: ChatId, reply: Reply) -> Result<(), RequestError> {
    match reply {
        Reply::Send(prompt) | Reply::Edit(prompt) => send_prompt(bot, chat_id, prompt).await,
        Reply::Alert(text) => send_prompt(bot, chat_id, Prompt::text(text)).await,
        Reply::Ignore => Ok(()),
    }
}

/// Delivers a reply to a button press.
///
/// The callback query is always answered so the client stops its spinner.
pub async fn reply_to_callback(bot: &Bot, q: &CallbackQuery, reply: Reply) -> Result<(), RequestError> {
    if let Reply::Alert(text) = reply {
        bot.answer_callback_query(q.id.clone()).text(text).show_alert(true).await?;
        return Ok(());
    }

    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        log::warn!("Failed to answer callback query from user {}: {}", q.from.id, e);
    }

    let chat_id = q
        .message
        .as_ref()
        .map(|message| message.chat().id)
        .unwrap_or_else(|| ChatId::from(q.from.id));

    match reply {
        Reply::Edit(prompt) => match q.message.as_ref() {
            Some(message) => edit_prompt(bot, chat_id, message.id(), prompt).await,
            None => send_prompt(bot, chat_id, prompt).await,
        },
        Reply::Send(prompt) => send_prompt(bot, chat_id, prompt).await,
        Reply::Alert(_) | Reply::Ignore => Ok(()),
    }
}
