//! AI analysis port + prompt building.
//!
//! Prompt text is built here so provider adapters only have to wrap it in
//! their own request payloads.

use async_trait::async_trait;

use crate::{
    domain::Ticker,
    formatting::{format_count, format_market_cap, format_money, format_ratio},
    market::QuoteSnapshot,
    Result,
};

/// System prompt sent with every analysis request.
pub const ANALYST_SYSTEM_PROMPT: &str =
    "You are a financial analyst providing concise stock analysis.";

/// Shown in place of the analysis when the AI service fails; metrics and
/// chart are still delivered.
pub const ANALYSIS_UNAVAILABLE_NOTICE: &str =
    "Analysis unavailable right now. Please try again later.";

/// A short free-text analysis, relayed to the chat as-is.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisSummary(pub String);

/// AI completion port.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        ticker: &Ticker,
        snapshot: &QuoteSnapshot,
    ) -> Result<AnalysisSummary>;
}

/// Build the user prompt for one analysis request from the fetched metrics.
pub fn build_analysis_prompt(ticker: &Ticker, snapshot: &QuoteSnapshot) -> String {
    format!(
        "Analyze the following stock data and provide a very concise 3-4 sentence summary:\n\
         Symbol: {symbol}\n\
         Current Price: {price}\n\
         Market Cap: {cap}\n\
         P/E Ratio: {pe}\n\
         52-Week High: {high}\n\
         52-Week Low: {low}\n\
         Volume: {volume}\n\n\
         Focus on: 1) Current position vs 52-week range, 2) Key valuation insight from the P/E ratio, 3) Brief outlook. \
         Use plain text without markdown formatting.",
        symbol = ticker,
        price = format_money(snapshot.price),
        cap = format_market_cap(snapshot.market_cap),
        pe = format_ratio(snapshot.pe_ratio),
        high = format_money(snapshot.fifty_two_week_high),
        low = format_money(snapshot.fifty_two_week_low),
        volume = format_count(snapshot.volume),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_includes_metrics_and_instructions() {
        let ticker = Ticker::parse("AAPL").unwrap();
        let snapshot = QuoteSnapshot {
            price: Some(189.45),
            market_cap: Some(2.95e12),
            pe_ratio: Some(29.41),
            fifty_two_week_high: Some(199.62),
            fifty_two_week_low: Some(164.08),
            volume: Some(48_211_904),
            ..QuoteSnapshot::default()
        };

        let prompt = build_analysis_prompt(&ticker, &snapshot);
        assert!(prompt.contains("Symbol: AAPL"));
        assert!(prompt.contains("Current Price: $189.45"));
        assert!(prompt.contains("Market Cap: $2.95T"));
        assert!(prompt.contains("Volume: 48,211,904"));
        assert!(prompt.contains("plain text without markdown"));
    }

    #[test]
    fn prompt_tolerates_missing_fields() {
        let ticker = Ticker::parse("NEWIPO").unwrap();
        let prompt = build_analysis_prompt(&ticker, &QuoteSnapshot::default());
        assert!(prompt.contains("Current Price: N/A"));
        assert!(prompt.contains("P/E Ratio: N/A"));
    }
}
