use std::{env, fs, path::Path, time::Duration};

use crate::{errors::Error, Result};

/// Typed configuration, built once at startup and passed by reference into
/// the API-calling adapters. No ambient global state.
#[derive(Clone, Debug)]
pub struct Config {
    // Required secrets
    pub telegram_bot_token: String,
    pub perplexity_api_key: String,

    // AI completion
    pub perplexity_model: String,
    pub ai_max_tokens: u32,
    pub ai_temperature: f64,
    pub ai_top_p: f64,
    pub ai_timeout: Duration,

    // Market data
    pub history_days: u32,
    pub market_timeout: Duration,

    // Chart
    pub chart_width: u32,
    pub chart_height: u32,

    // Telegram caption length (hard limit is 1024; stay under it)
    pub caption_safe_limit: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        // Required env vars
        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN")
            .and_then(non_empty)
            .ok_or_else(|| {
                Error::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
            })?;
        let perplexity_api_key = env_str("PERPLEXITY_API_KEY")
            .and_then(non_empty)
            .ok_or_else(|| {
                Error::Config("PERPLEXITY_API_KEY environment variable is required".to_string())
            })?;

        // AI completion knobs
        let perplexity_model = env_str("PERPLEXITY_MODEL")
            .and_then(non_empty)
            .unwrap_or_else(|| "sonar-pro".to_string());
        let ai_max_tokens = env_u32("AI_MAX_TOKENS").unwrap_or(500);
        let ai_temperature = env_f64("AI_TEMPERATURE").unwrap_or(0.7);
        let ai_top_p = env_f64("AI_TOP_P").unwrap_or(0.9);
        let ai_timeout = Duration::from_millis(env_u64("AI_TIMEOUT_MS").unwrap_or(30_000));

        // Market data
        let history_days = env_u32("HISTORY_DAYS").unwrap_or(30);
        let market_timeout = Duration::from_millis(env_u64("MARKET_TIMEOUT_MS").unwrap_or(10_000));

        // Chart dimensions
        let chart_width = env_u32("CHART_WIDTH").unwrap_or(1000);
        let chart_height = env_u32("CHART_HEIGHT").unwrap_or(600);

        // Caption length
        let caption_safe_limit = env_usize("CAPTION_SAFE_LIMIT").unwrap_or(1000);

        Ok(Self {
            telegram_bot_token,
            perplexity_api_key,
            perplexity_model,
            ai_max_tokens,
            ai_temperature,
            ai_top_p,
            ai_timeout,
            history_days,
            market_timeout,
            chart_width,
            chart_height,
            caption_safe_limit,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_u32(key: &str) -> Option<u32> {
    env_str(key).and_then(|s| s.trim().parse::<u32>().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn env_f64(key: &str) -> Option<f64> {
    env_str(key).and_then(|s| s.trim().parse::<f64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
