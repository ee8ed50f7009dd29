//! Telegram front-end: long polling updates in, [`Messenger`] calls out.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::payloads::{EditMessageTextSetters, SendMessageSetters};
use teloxide::prelude::*;
use teloxide::types::{
    BotCommand, ChatId as TgChatId, InlineKeyboardButton, InlineKeyboardMarkup, Me,
    MessageId as TgMessageId, ParseMode,
};
use tracing::{error, info, warn};

use crate::conversation::{Conversation, Event};
use crate::core::messenger::{Menu, MenuAction, MessageId, Messenger};
use crate::core::session::{ChatId, Peer};

type HandlerError = Box<dyn std::error::Error + Send + Sync>;
type HandlerResult = Result<(), HandlerError>;

pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        TelegramMessenger { bot }
    }
}

/// One button per row, in menu order.
pub fn keyboard(menu: &Menu) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(menu.options.iter().map(|option| {
        vec![InlineKeyboardButton::callback(
            option.label.clone(),
            option.action.to_string(),
        )]
    }))
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send(&self, chat: ChatId, text: &str, menu: Option<&Menu>) -> Result<MessageId> {
        let mut request = self
            .bot
            .send_message(TgChatId(chat.0), text)
            .parse_mode(ParseMode::Html);
        if let Some(menu) = menu {
            request = request.reply_markup(keyboard(menu));
        }
        let message = request
            .await
            .with_context(|| format!("Failed to send message to chat {chat}"))?;
        Ok(MessageId(message.id.0))
    }

    async fn edit(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
        menu: Option<&Menu>,
    ) -> Result<()> {
        let mut request = self
            .bot
            .edit_message_text(TgChatId(chat.0), TgMessageId(message.0), text)
            .parse_mode(ParseMode::Html);
        if let Some(menu) = menu {
            request = request.reply_markup(keyboard(menu));
        }
        request
            .await
            .with_context(|| format!("Failed to edit message {} in chat {chat}", message.0))?;
        Ok(())
    }

    async fn delete(&self, chat: ChatId, message: MessageId) -> Result<()> {
        self.bot
            .delete_message(TgChatId(chat.0), TgMessageId(message.0))
            .await
            .with_context(|| format!("Failed to delete message {} in chat {chat}", message.0))?;
        Ok(())
    }
}

/// True for `/start`, deep links such as `/start payload`, and `/start@<bot_username>`.
/// A start addressed to another bot in the same group is not ours.
pub fn is_start_command(text: &str, bot_username: &str) -> bool {
    let Some(command) = text.split_whitespace().next() else {
        return false;
    };
    match command.split_once('@') {
        Some((name, mention)) => name == "/start" && mention.eq_ignore_ascii_case(bot_username),
        None => command == "/start",
    }
}

pub fn schema() -> UpdateHandler<HandlerError> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback))
}

async fn on_message(
    bot: Bot,
    msg: Message,
    me: Me,
    conversation: Arc<Conversation>,
) -> HandlerResult {
    // Channel posts have no sender to hold a session for
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    let peer = Peer::new(msg.chat.id.0, from.id.0);

    // Non-text messages count as text that is neither a command nor an amount
    let text = msg.text().unwrap_or_default();
    let event = if is_start_command(text, me.username()) {
        Event::Start
    } else {
        Event::Text(text.to_string())
    };

    dispatch(bot, &conversation, peer, event).await;
    Ok(())
}

async fn on_callback(bot: Bot, q: CallbackQuery, conversation: Arc<Conversation>) -> HandlerResult {
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        warn!(error = %e, "Failed to answer callback query");
    }

    let Some(message) = q.message.as_ref() else {
        warn!("Callback query without a message");
        return Ok(());
    };

    let action = match q.data.as_deref().map(str::parse::<MenuAction>) {
        Some(Ok(action)) => action,
        _ => {
            warn!(data = ?q.data, "Ignoring unknown callback data");
            return Ok(());
        }
    };

    let event = Event::Select {
        action,
        message: MessageId(message.id().0),
    };
    let peer = Peer::new(message.chat().id.0, q.from.id.0);
    dispatch(bot, &conversation, peer, event).await;
    Ok(())
}

async fn dispatch(bot: Bot, conversation: &Conversation, peer: Peer, event: Event) {
    let messenger = TelegramMessenger::new(bot);
    if let Err(e) = conversation.handle(&messenger, peer, event).await {
        error!(error = ?e, %peer, "Failed to handle interaction");
    }
}

/// Verifies the token, registers the command list and polls until Ctrl-C.
pub async fn run_polling(token: &str, conversation: Arc<Conversation>) -> Result<()> {
    let bot = Bot::new(token);

    let me = bot
        .get_me()
        .await
        .context("Failed to authenticate with Telegram, check the bot token")?;
    info!(username = me.username(), "Connected to Telegram");

    if let Err(e) = bot
        .set_my_commands(vec![BotCommand::new("start", "Convert an amount")])
        .await
    {
        warn!(error = %e, "Failed to register bot commands");
    }

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![conversation, me])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Stopped polling");
    Ok(())
}
