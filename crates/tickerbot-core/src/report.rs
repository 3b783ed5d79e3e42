//! Report assembly: metrics caption + chart image + analysis text.

use crate::{
    chart::ChartImage,
    domain::Ticker,
    formatting::{
        escape_html, format_market_cap, format_money, format_ratio, strip_markdown, truncate_chars,
    },
    market::QuoteSnapshot,
    summary::AnalysisSummary,
};

/// The bot's reply for one ticker: an HTML caption paired with the chart.
/// Sent once, then discarded.
#[derive(Clone, Debug)]
pub struct Report {
    pub ticker: Ticker,
    pub caption_html: String,
    pub chart: ChartImage,
}

impl Report {
    /// Pure composition; no external calls, no failure modes.
    pub fn assemble(
        ticker: &Ticker,
        snapshot: &QuoteSnapshot,
        chart: ChartImage,
        summary: &AnalysisSummary,
        caption_limit: usize,
    ) -> Self {
        let analysis = escape_html(strip_markdown(&summary.0).trim());
        let caption = format!(
            "📊 <b>{symbol} Stock Analysis</b>\n\n\
             💰 Current Price: {price}\n\
             📈 Previous Close: {prev}\n\
             💹 Market Cap: {cap}\n\
             📊 P/E Ratio: {pe}\n\n\
             📝 <b>Analysis</b>:\n{analysis}",
            symbol = escape_html(ticker.as_str()),
            price = format_money(snapshot.price),
            prev = format_money(snapshot.previous_close),
            cap = format_market_cap(snapshot.market_cap),
            pe = format_ratio(snapshot.pe_ratio),
        );

        Self {
            ticker: ticker.clone(),
            caption_html: truncate_chars(&caption, caption_limit),
            chart,
        }
    }
}
