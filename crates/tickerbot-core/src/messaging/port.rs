use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::{ChatAction, MessagingCapabilities},
    Result,
};

/// Cross-messenger port.
///
/// Telegram is the first implementation; the shape leaves room for other
/// adapters behind the same interface with capability flags.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    fn capabilities(&self) -> MessagingCapabilities;

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef>;
    async fn edit_html(&self, msg: MessageRef, html: &str) -> Result<()>;
    async fn delete_message(&self, msg: MessageRef) -> Result<()>;

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()>;

    /// Send a photo from memory with an HTML caption.
    async fn send_photo(
        &self,
        chat_id: ChatId,
        png: Vec<u8>,
        caption_html: &str,
    ) -> Result<MessageRef>;
}
