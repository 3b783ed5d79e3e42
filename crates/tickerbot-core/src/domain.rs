use crate::{errors::Error, Result};

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// A stock ticker symbol, optionally exchange-suffixed (`.NS`, `.BO`).
///
/// Created per incoming message, discarded after the reply is sent.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ticker(String);

impl Ticker {
    /// Normalize raw chat text into a ticker symbol.
    ///
    /// Trims surrounding whitespace and upper-cases the rest. Exchange
    /// suffixes are the user's responsibility and pass through untouched.
    /// Empty or multi-word input is rejected before any external call.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidSymbol("empty symbol".to_string()));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(Error::InvalidSymbol(format!(
                "not a single symbol: {trimmed}"
            )));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_uppercases() {
        assert_eq!(Ticker::parse("  aapl ").unwrap().as_str(), "AAPL");
    }

    #[test]
    fn exchange_suffix_passes_through() {
        assert_eq!(
            Ticker::parse("reliance.ns").unwrap().as_str(),
            "RELIANCE.NS"
        );
        assert_eq!(Ticker::parse("INFY.BO").unwrap().as_str(), "INFY.BO");
    }

    #[test]
    fn rejects_empty_and_whitespace_only() {
        assert!(matches!(Ticker::parse(""), Err(Error::InvalidSymbol(_))));
        assert!(matches!(
            Ticker::parse("   \t "),
            Err(Error::InvalidSymbol(_))
        ));
    }

    #[test]
    fn rejects_multi_word_input() {
        assert!(matches!(
            Ticker::parse("tell me about AAPL"),
            Err(Error::InvalidSymbol(_))
        ));
    }
}
