/// Core error type for the bot.
///
/// Adapter crates map their specific failures into this type so the pipeline
/// can handle them consistently (user-facing reply vs degraded report).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("no data for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("chart render failed: {0}")]
    Render(String),

    #[error("ai service error: {0}")]
    AiService(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
