//! The message-to-report pipeline.
//!
//! One linear run per incoming message:
//! normalize → fetch → render chart → summarize → assemble, with early exit
//! on a failed stage. The AI stage is the exception: its failure degrades
//! the report to an "analysis unavailable" notice instead of failing the
//! whole request, since metrics and chart are already in hand.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    chart::ChartRenderer,
    config::Config,
    domain::Ticker,
    errors::Error,
    formatting::escape_html,
    market::MarketData,
    report::Report,
    summary::{AnalysisSummary, Summarizer, ANALYSIS_UNAVAILABLE_NOTICE},
    Result,
};

pub struct Pipeline {
    cfg: Arc<Config>,
    market: Arc<dyn MarketData>,
    chart: Arc<dyn ChartRenderer>,
    summarizer: Arc<dyn Summarizer>,
}

impl Pipeline {
    pub fn new(
        cfg: Arc<Config>,
        market: Arc<dyn MarketData>,
        chart: Arc<dyn ChartRenderer>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            cfg,
            market,
            chart,
            summarizer,
        }
    }

    /// Run the full pipeline for one raw chat message.
    pub async fn run(&self, raw_text: &str) -> Result<Report> {
        let ticker = Ticker::parse(raw_text)?;

        info!(symbol = %ticker, "fetching market data");
        let (snapshot, history) = self.market.fetch(&ticker).await?;
        info!(symbol = %ticker, points = history.len(), "market data fetched");

        let chart = self.chart.render(&history)?;
        info!(symbol = %ticker, "chart rendered");

        let summary = match self.summarizer.summarize(&ticker, &snapshot).await {
            Ok(s) => s,
            Err(e) => {
                warn!(symbol = %ticker, error = %e, "analysis failed, sending report without it");
                AnalysisSummary(ANALYSIS_UNAVAILABLE_NOTICE.to_string())
            }
        };

        Ok(Report::assemble(
            &ticker,
            &snapshot,
            chart,
            &summary,
            self.cfg.caption_safe_limit,
        ))
    }
}

/// Map a pipeline error to the plain-language reply sent to the chat.
///
/// Names the failed stage without exposing provider or transport details;
/// those go to the logs.
pub fn error_reply(err: &Error, raw_text: &str) -> String {
    match err {
        Error::InvalidSymbol(_) => {
            "Please send a single stock symbol, e.g. AAPL — or RELIANCE.NS for NSE listings."
                .to_string()
        }
        Error::DataUnavailable { symbol, .. } => {
            let escaped = escape_html(symbol);
            if symbol.contains('.') {
                format!(
                    "❌ Could not fetch data for {escaped}. Please check the symbol and try again."
                )
            } else {
                format!(
                    "❌ Could not fetch data for {escaped}. If this is an Indian stock, \
                     try adding .NS (for NSE) or .BO (for BSE) to the symbol."
                )
            }
        }
        Error::Render(_) => {
            let symbol = escape_html(&raw_text.trim().to_uppercase());
            format!("❌ Could not draw the price chart for {symbol}. Please try again later.")
        }
        _ => {
            let symbol = escape_html(&raw_text.trim().to_uppercase());
            format!("❌ Something went wrong while processing {symbol}. Please try again later.")
        }
    }
}
