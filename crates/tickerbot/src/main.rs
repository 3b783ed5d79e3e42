use std::sync::Arc;

use tickerbot_ai::{CompletionOptions, PerplexityClient};
use tickerbot_chart::PriceChartRenderer;
use tickerbot_core::{config::Config, pipeline::Pipeline};
use tickerbot_market::YahooFinanceClient;

#[tokio::main]
async fn main() -> Result<(), tickerbot_core::Error> {
    tickerbot_core::logging::init("tickerbot")?;

    let cfg = Arc::new(Config::load()?);

    let market = Arc::new(YahooFinanceClient::new(cfg.market_timeout, cfg.history_days));
    let chart = Arc::new(PriceChartRenderer::new(cfg.chart_width, cfg.chart_height));
    let summarizer = Arc::new(PerplexityClient::new(
        cfg.perplexity_api_key.clone(),
        CompletionOptions {
            model: cfg.perplexity_model.clone(),
            max_tokens: cfg.ai_max_tokens,
            temperature: cfg.ai_temperature,
            top_p: cfg.ai_top_p,
        },
        cfg.ai_timeout,
    ));

    let pipeline = Arc::new(Pipeline::new(cfg.clone(), market, chart, summarizer));

    tickerbot_telegram::router::run_polling(cfg, pipeline)
        .await
        .map_err(|e| tickerbot_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
