use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{info, warn};

use tickerbot_core::domain::ChatId;

use crate::router::AppState;

const WELCOME_TEXT: &str = "👋 <b>Welcome to the Stock Analysis Bot!</b>\n\n\
Send me any stock symbol:\n\
• For Indian stocks: add <code>.NS</code> for NSE or <code>.BO</code> for BSE\n\
  Examples: <code>RELIANCE.NS</code>, <code>TCS.NS</code>, <code>INFY.BO</code>\n\
• For US stocks: just the symbol\n\
  Examples: <code>AAPL</code>, <code>MSFT</code>\n\n\
Try sending <code>RELIANCE.NS</code> for a Reliance Industries analysis!";

const HELP_TEXT: &str = "🤖 <b>Stock Analysis Bot Help</b>\n\n\
For Indian stocks (NSE/BSE):\n\
• Add <code>.NS</code> for NSE: <code>RELIANCE.NS</code>, <code>TCS.NS</code>\n\
• Add <code>.BO</code> for BSE: <code>INFY.BO</code>, <code>SBIN.BO</code>\n\n\
For US stocks:\n\
• Just type the symbol: <code>AAPL</code>, <code>MSFT</code>\n\n\
You get back the key metrics, a 30-day price chart and a short analysis.\n\n\
Commands:\n\
/start - Start the bot\n\
/help - Show this help message";

const UNKNOWN_COMMAND_TEXT: &str =
    "Unknown command. Send /help for usage, or just send a stock symbol like <code>AAPL</code>.";

/// Split `/cmd@botname arg1 ...` into a lowercase command and its argument
/// string.
fn parse_command(text: &str) -> (String, String) {
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

/// Commands never touch the market data, chart, or AI ports.
pub async fn handle_command(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let (cmd, _args) = parse_command(text);
    let chat_id = ChatId(msg.chat.id.0);

    let reply = match cmd.as_str() {
        "start" => WELCOME_TEXT,
        "help" => HELP_TEXT,
        _ => UNKNOWN_COMMAND_TEXT,
    };

    info!(command = %cmd, chat_id = chat_id.0, "command handled");
    if let Err(e) = state.messenger.send_html(chat_id, reply).await {
        warn!(error = %e, "failed to send command reply");
    }

    Ok(())
}
