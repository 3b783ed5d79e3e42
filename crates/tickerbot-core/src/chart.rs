//! Chart rendering port.

use crate::{market::PriceHistory, Result};

/// A rendered raster chart, attached to one outgoing reply and never cached.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Number of price points drawn.
    pub points: usize,
}

/// Renders a price history into a line-chart image.
///
/// Implementations must be deterministic: identical input produces identical
/// output bytes. An empty history is a render failure, not an empty image.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, history: &PriceHistory) -> Result<ChartImage>;
}
