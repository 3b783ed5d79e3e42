//! AI summarizer adapter (Perplexity chat completions).

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use tickerbot_core::{
    domain::Ticker,
    errors::Error,
    market::QuoteSnapshot,
    summary::{build_analysis_prompt, AnalysisSummary, Summarizer, ANALYST_SYSTEM_PROMPT},
    Result,
};

const COMPLETIONS_URL: &str = "https://api.perplexity.ai/chat/completions";

/// Generation knobs for one client instance.
#[derive(Clone, Debug)]
pub struct CompletionOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
}

#[derive(Clone, Debug)]
pub struct PerplexityClient {
    api_key: String,
    opts: CompletionOptions,
    http: reqwest::Client,
}

impl PerplexityClient {
    pub fn new(api_key: impl Into<String>, opts: CompletionOptions, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client build");
        Self {
            api_key: api_key.into(),
            opts,
            http,
        }
    }

    /// One chat completion round-trip; returns the first choice's content.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let payload = serde_json::json!({
            "model": self.opts.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "max_tokens": self.opts.max_tokens,
            "temperature": self.opts.temperature,
            "top_p": self.opts.top_p,
        });

        let resp = self
            .http
            .post(COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::AiService(format!("request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::AiService(format!(
                "completion failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let v: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| Error::AiService(format!("json error: {e}")))?;

        parse_completion(&v)
    }
}

/// Extract the first choice's message content from a completions response.
fn parse_completion(v: &serde_json::Value) -> Result<String> {
    let text = v
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
        .unwrap_or("")
        .to_string();

    if text.trim().is_empty() {
        return Err(Error::AiService(
            "completion returned empty text".to_string(),
        ));
    }

    Ok(text)
}

#[async_trait]
impl Summarizer for PerplexityClient {
    async fn summarize(
        &self,
        ticker: &Ticker,
        snapshot: &QuoteSnapshot,
    ) -> Result<AnalysisSummary> {
        let prompt = build_analysis_prompt(ticker, snapshot);
        debug!(symbol = %ticker, model = %self.opts.model, "requesting analysis");
        let text = self.complete(ANALYST_SYSTEM_PROMPT, &prompt).await?;
        Ok(AnalysisSummary(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_choice_content() {
        let v = serde_json::json!({
            "id": "cmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "Looks healthy." } }
            ]
        });
        assert_eq!(parse_completion(&v).unwrap(), "Looks healthy.");
    }

    #[test]
    fn empty_content_is_an_error() {
        let v = serde_json::json!({
            "choices": [ { "message": { "content": "   " } } ]
        });
        assert!(matches!(
            parse_completion(&v).unwrap_err(),
            Error::AiService(_)
        ));
    }

    #[test]
    fn missing_choices_is_an_error() {
        let v = serde_json::json!({ "error": { "message": "quota exceeded" } });
        assert!(matches!(
            parse_completion(&v).unwrap_err(),
            Error::AiService(_)
        ));
    }
}
