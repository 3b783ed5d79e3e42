//! Telegram update handlers.
//!
//! Commands return static usage text; any other text message is treated as a
//! ticker symbol and fed through the report pipeline. A handler failure is
//! logged and answered in-chat, never propagated into the dispatcher.

use std::sync::Arc;

use teloxide::prelude::*;

use crate::router::AppState;

mod commands;
mod ticker;

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;

    if let Some(text) = msg.text() {
        if text.starts_with('/') {
            return commands::handle_command(msg, state).await;
        }

        // Sequentialize ticker lookups per chat.
        let _guard = state.chat_locks.lock_chat(chat_id).await;
        return ticker::handle_ticker(msg, state).await;
    }

    // Photos, voice notes, stickers: nothing to analyze.
    let _ = bot
        .send_message(msg.chat.id, "Send a stock ticker symbol as text, e.g. AAPL.")
        .await;

    Ok(())
}
