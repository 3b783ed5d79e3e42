//! Market data model + provider port.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{domain::Ticker, Result};

/// Point-in-time quote fields for one ticker, immutable once fetched.
///
/// Every metric is optional: the provider may omit any of them, and missing
/// values render as "N/A" in the report instead of failing the request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuoteSnapshot {
    pub price: Option<f64>,
    pub previous_close: Option<f64>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub volume: Option<u64>,
    pub currency: Option<String>,
}

/// One daily close.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Ordered daily closes covering the trailing history window, oldest first.
///
/// Used only to render a chart; discarded after rendering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceHistory {
    points: Vec<PricePoint>,
}

impl PriceHistory {
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last date of the series, if any.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.points.first()?.date, self.points.last()?.date))
    }

    /// Lowest and highest close in the series, if any.
    pub fn close_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.points.iter();
        let first = iter.next()?.close;
        let (mut lo, mut hi) = (first, first);
        for p in iter {
            lo = lo.min(p.close);
            hi = hi.max(p.close);
        }
        Some((lo, hi))
    }

    /// Keep only the most recent `max` points.
    pub fn truncate_to_recent(&mut self, max: usize) {
        if self.points.len() > max {
            self.points.drain(..self.points.len() - max);
        }
    }
}

/// Market data provider port: one quote snapshot + the trailing daily close
/// series, fetched in a single attempt per request. Callers surface failures
/// to the user rather than retrying.
#[async_trait]
pub trait MarketData: Send + Sync {
    async fn fetch(&self, ticker: &Ticker) -> Result<(QuoteSnapshot, PriceHistory)>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, day).unwrap()
    }

    fn p(day: u32, close: f64) -> PricePoint {
        PricePoint {
            date: d(day),
            close,
        }
    }

    #[test]
    fn history_is_sorted_by_date() {
        let h = PriceHistory::new(vec![p(3, 10.0), p(1, 12.0), p(2, 11.0)]);
        let dates: Vec<_> = h.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(1), d(2), d(3)]);
        assert_eq!(h.date_span(), Some((d(1), d(3))));
    }

    #[test]
    fn close_range_covers_extremes() {
        let h = PriceHistory::new(vec![p(1, 12.0), p(2, 9.5), p(3, 15.25)]);
        assert_eq!(h.close_range(), Some((9.5, 15.25)));
    }

    #[test]
    fn empty_history_has_no_span_or_range() {
        let h = PriceHistory::default();
        assert!(h.is_empty());
        assert_eq!(h.date_span(), None);
        assert_eq!(h.close_range(), None);
    }

    #[test]
    fn truncate_keeps_most_recent_points() {
        let mut h = PriceHistory::new((1..=10).map(|i| p(i, f64::from(i))).collect());
        h.truncate_to_recent(3);
        assert_eq!(h.len(), 3);
        assert_eq!(h.date_span(), Some((d(8), d(10))));

        // No-op when already within the limit.
        h.truncate_to_recent(30);
        assert_eq!(h.len(), 3);
    }
}
