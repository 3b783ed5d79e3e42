use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{error, info};

use tickerbot_core::{
    domain::ChatId, formatting::escape_html, messaging::types::ChatAction, pipeline::error_reply,
};

use crate::router::AppState;

/// Run the full report pipeline for one ticker message.
///
/// A status message goes out immediately; on success it is deleted and
/// replaced by the chart photo with the metrics caption, on failure it is
/// edited into a plain-language error reply. The dispatcher keeps serving
/// other messages either way.
pub async fn handle_ticker(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text().map(|s| s.to_string()) else {
        return Ok(());
    };
    if text.trim().is_empty() {
        return Ok(());
    }

    let chat_id = ChatId(msg.chat.id.0);
    let symbol_guess = text.trim().to_uppercase();

    info!(chat_id = chat_id.0, symbol = %symbol_guess, "processing ticker request");

    let processing = state
        .messenger
        .send_html(
            chat_id,
            &format!(
                "🔄 Processing {}... Please wait.",
                escape_html(&symbol_guess)
            ),
        )
        .await
        .ok();

    // Typing indicator while the pipeline runs (best-effort).
    let (stop_tx, mut stop_rx) = tokio::sync::oneshot::channel::<()>();
    let messenger_for_typing = state.messenger.clone();
    let typing_task = tokio::spawn(async move {
        let mut tick = tokio::time::interval(std::time::Duration::from_secs(3));
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let _ = messenger_for_typing
                        .send_chat_action(chat_id, ChatAction::Typing)
                        .await;
                }
                _ = &mut stop_rx => break,
            }
        }
    });

    let outcome = state.pipeline.run(&text).await;

    let _ = stop_tx.send(());
    let _ = typing_task.await;

    match outcome {
        Ok(report) => {
            let _ = state
                .messenger
                .send_chat_action(chat_id, ChatAction::UploadPhoto)
                .await;

            let sent = state
                .messenger
                .send_photo(chat_id, report.chart.png.clone(), &report.caption_html)
                .await;

            match sent {
                Ok(_) => {
                    info!(chat_id = chat_id.0, symbol = %report.ticker, "report sent");
                    if let Some(p) = processing {
                        let _ = state.messenger.delete_message(p).await;
                    }
                }
                Err(e) => {
                    // Chart delivery failed; salvage the metrics as text.
                    error!(chat_id = chat_id.0, error = %e, "failed to send report photo");
                    match processing {
                        Some(p) => {
                            let _ = state.messenger.edit_html(p, &report.caption_html).await;
                        }
                        None => {
                            let _ = state.messenger.send_html(chat_id, &report.caption_html).await;
                        }
                    }
                }
            }
        }
        Err(e) => {
            error!(chat_id = chat_id.0, symbol = %symbol_guess, error = %e, "pipeline failed");
            let reply = error_reply(&e, &text);
            match processing {
                Some(p) => {
                    let _ = state.messenger.edit_html(p, &reply).await;
                }
                None => {
                    let _ = state.messenger.send_html(chat_id, &reply).await;
                }
            }
        }
    }

    Ok(())
}
