//! Market data adapter (Yahoo Finance).
//!
//! Hand-rolled over the public JSON endpoints: the quote call supplies the
//! snapshot metrics, the chart call supplies the trailing daily close
//! series. One attempt per call, no retries; every failure maps to
//! `Error::DataUnavailable` so the user sees one consistent reply whether
//! the symbol is unknown or the provider is unreachable.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use tickerbot_core::{
    domain::Ticker,
    errors::Error,
    market::{MarketData, PriceHistory, PricePoint, QuoteSnapshot},
    Result,
};

const QUOTE_URL: &str = "https://query1.finance.yahoo.com/v7/finance/quote";
const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo rejects requests without a browser-ish user agent.
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

#[derive(Clone, Debug)]
pub struct YahooFinanceClient {
    http: reqwest::Client,
    history_days: u32,
}

impl YahooFinanceClient {
    pub fn new(timeout: Duration, history_days: u32) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .expect("reqwest client build");
        Self { http, history_days }
    }

    async fn fetch_quote(&self, ticker: &Ticker) -> Result<QuoteSnapshot> {
        let resp = self
            .http
            .get(QUOTE_URL)
            .query(&[("symbols", ticker.as_str())])
            .send()
            .await
            .map_err(|e| unavailable(ticker, format!("quote request error: {e}")))?;

        if !resp.status().is_success() {
            return Err(unavailable(
                ticker,
                format!("quote endpoint returned {}", resp.status()),
            ));
        }

        let body: QuoteEnvelope = resp
            .json()
            .await
            .map_err(|e| unavailable(ticker, format!("quote decode error: {e}")))?;

        parse_quote(ticker, body)
    }

    async fn fetch_history(&self, ticker: &Ticker) -> Result<PriceHistory> {
        let end = Utc::now();
        let start = end - chrono::Duration::days(i64::from(self.history_days));

        let resp = self
            .http
            .get(format!("{CHART_URL}/{}", ticker.as_str()))
            .query(&[
                ("period1", start.timestamp().to_string()),
                ("period2", end.timestamp().to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await
            .map_err(|e| unavailable(ticker, format!("chart request error: {e}")))?;

        if !resp.status().is_success() {
            return Err(unavailable(
                ticker,
                format!("chart endpoint returned {}", resp.status()),
            ));
        }

        let body: ChartEnvelope = resp
            .json()
            .await
            .map_err(|e| unavailable(ticker, format!("chart decode error: {e}")))?;

        parse_history(ticker, body, self.history_days as usize)
    }
}

#[async_trait]
impl MarketData for YahooFinanceClient {
    async fn fetch(&self, ticker: &Ticker) -> Result<(QuoteSnapshot, PriceHistory)> {
        debug!(symbol = %ticker, "requesting quote snapshot");
        let snapshot = self.fetch_quote(ticker).await?;
        debug!(symbol = %ticker, days = self.history_days, "requesting close history");
        let history = self.fetch_history(ticker).await?;
        Ok((snapshot, history))
    }
}

fn unavailable(ticker: &Ticker, reason: String) -> Error {
    Error::DataUnavailable {
        symbol: ticker.as_str().to_string(),
        reason,
    }
}

// ============== Quote endpoint wire format ==============

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(rename = "quoteResponse")]
    quote_response: Option<QuoteBody>,
}

#[derive(Debug, Deserialize)]
struct QuoteBody {
    result: Option<Vec<QuoteFields>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteFields {
    regular_market_price: Option<f64>,
    regular_market_previous_close: Option<f64>,
    market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<f64>,
    fifty_two_week_high: Option<f64>,
    fifty_two_week_low: Option<f64>,
    regular_market_volume: Option<u64>,
    currency: Option<String>,
}

fn parse_quote(ticker: &Ticker, body: QuoteEnvelope) -> Result<QuoteSnapshot> {
    let fields = body
        .quote_response
        .and_then(|b| b.result)
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or_else(|| unavailable(ticker, "no quote result for symbol".to_string()))?;

    // A quote with no market price is as good as no quote.
    if fields.regular_market_price.is_none() {
        return Err(unavailable(ticker, "quote has no market price".to_string()));
    }

    Ok(QuoteSnapshot {
        price: fields.regular_market_price,
        previous_close: fields.regular_market_previous_close,
        market_cap: fields.market_cap,
        pe_ratio: fields.trailing_pe,
        fifty_two_week_high: fields.fifty_two_week_high,
        fifty_two_week_low: fields.fifty_two_week_low,
        volume: fields.regular_market_volume,
        currency: fields.currency,
    })
}

// ============== Chart endpoint wire format ==============

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Option<ChartBody>,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

fn parse_history(ticker: &Ticker, body: ChartEnvelope, max_points: usize) -> Result<PriceHistory> {
    let result = body
        .chart
        .and_then(|b| b.result)
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or_else(|| unavailable(ticker, "no chart result for symbol".to_string()))?;

    let closes = result
        .indicators
        .and_then(|i| i.quote.into_iter().next())
        .map(|q| q.close)
        .unwrap_or_default();

    // Days with a null close (holidays, partial sessions) are skipped.
    let points: Vec<PricePoint> = result
        .timestamp
        .iter()
        .zip(closes.iter())
        .filter_map(|(&ts, close)| {
            let close = (*close)?;
            let date = DateTime::from_timestamp(ts, 0)?.date_naive();
            Some(PricePoint { date, close })
        })
        .collect();

    if points.is_empty() {
        return Err(unavailable(ticker, "no historical data".to_string()));
    }

    let mut history = PriceHistory::new(points);
    history.truncate_to_recent(max_points);
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker(s: &str) -> Ticker {
        Ticker::parse(s).unwrap()
    }

    const FULL_QUOTE: &str = r#"{
        "quoteResponse": {
            "result": [{
                "symbol": "AAPL",
                "currency": "USD",
                "regularMarketPrice": 189.45,
                "regularMarketPreviousClose": 187.2,
                "marketCap": 2950000000000,
                "trailingPE": 29.41,
                "fiftyTwoWeekHigh": 199.62,
                "fiftyTwoWeekLow": 164.08,
                "regularMarketVolume": 48211904
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_full_quote() {
        let body: QuoteEnvelope = serde_json::from_str(FULL_QUOTE).unwrap();
        let snapshot = parse_quote(&ticker("AAPL"), body).unwrap();

        assert_eq!(snapshot.price, Some(189.45));
        assert_eq!(snapshot.previous_close, Some(187.2));
        assert_eq!(snapshot.market_cap, Some(2.95e12));
        assert_eq!(snapshot.pe_ratio, Some(29.41));
        assert_eq!(snapshot.volume, Some(48_211_904));
        assert_eq!(snapshot.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn tolerates_missing_optional_fields() {
        let body: QuoteEnvelope = serde_json::from_str(
            r#"{"quoteResponse":{"result":[{"regularMarketPrice":12.5}],"error":null}}"#,
        )
        .unwrap();
        let snapshot = parse_quote(&ticker("NEWIPO"), body).unwrap();

        assert_eq!(snapshot.price, Some(12.5));
        assert_eq!(snapshot.market_cap, None);
        assert_eq!(snapshot.pe_ratio, None);
    }

    #[test]
    fn empty_result_is_data_unavailable() {
        let body: QuoteEnvelope =
            serde_json::from_str(r#"{"quoteResponse":{"result":[],"error":null}}"#).unwrap();
        let err = parse_quote(&ticker("ZZZZZZ"), body).unwrap_err();
        assert!(matches!(err, Error::DataUnavailable { .. }));
    }

    #[test]
    fn quote_without_price_is_data_unavailable() {
        let body: QuoteEnvelope = serde_json::from_str(
            r#"{"quoteResponse":{"result":[{"currency":"USD"}],"error":null}}"#,
        )
        .unwrap();
        let err = parse_quote(&ticker("HALTED"), body).unwrap_err();
        assert!(matches!(err, Error::DataUnavailable { .. }));
    }

    fn chart_json(n: usize) -> String {
        // Daily timestamps starting 2026-07-01 00:00 UTC.
        let base = 1_782_864_000_i64;
        let timestamps: Vec<String> = (0..n)
            .map(|i| (base + i as i64 * 86_400).to_string())
            .collect();
        let closes: Vec<String> = (0..n).map(|i| format!("{}.0", 100 + i)).collect();
        format!(
            r#"{{"chart":{{"result":[{{"timestamp":[{}],"indicators":{{"quote":[{{"close":[{}]}}]}}}}],"error":null}}}}"#,
            timestamps.join(","),
            closes.join(",")
        )
    }

    #[test]
    fn parses_daily_close_history() {
        let body: ChartEnvelope = serde_json::from_str(&chart_json(22)).unwrap();
        let history = parse_history(&ticker("AAPL"), body, 30).unwrap();

        assert_eq!(history.len(), 22);
        let (first, last) = history.date_span().unwrap();
        assert!(first < last);
        assert_eq!(history.points()[0].close, 100.0);
    }

    #[test]
    fn null_closes_are_skipped() {
        let body: ChartEnvelope = serde_json::from_str(
            r#"{"chart":{"result":[{"timestamp":[1782864000,1782950400,1783036800],
                "indicators":{"quote":[{"close":[100.0,null,102.0]}]}}],"error":null}}"#,
        )
        .unwrap();
        let history = parse_history(&ticker("AAPL"), body, 30).unwrap();
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn history_is_capped_to_window() {
        let body: ChartEnvelope = serde_json::from_str(&chart_json(40)).unwrap();
        let history = parse_history(&ticker("AAPL"), body, 30).unwrap();

        assert_eq!(history.len(), 30);
        // The most recent points survive the cap.
        assert_eq!(history.points().last().unwrap().close, 139.0);
    }

    #[test]
    fn empty_history_is_data_unavailable() {
        let body: ChartEnvelope = serde_json::from_str(
            r#"{"chart":{"result":[{"timestamp":[],"indicators":{"quote":[{"close":[]}]}}],"error":null}}"#,
        )
        .unwrap();
        let err = parse_history(&ticker("ZZZZZZ"), body, 30).unwrap_err();
        assert!(matches!(err, Error::DataUnavailable { .. }));
    }
}
