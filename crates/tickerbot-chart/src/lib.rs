//! Chart renderer adapter (plotters bitmap backend).
//!
//! Draws the trailing close series as a line chart, dates on the x axis and
//! closing price on the y axis, and encodes it as PNG in memory. Rendering
//! uses no text so the output bytes depend only on the input series and the
//! configured dimensions, never on host fonts.

use std::io::Cursor;

use chrono::NaiveDate;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

use tickerbot_core::{
    chart::{ChartImage, ChartRenderer},
    errors::Error,
    market::PriceHistory,
    Result,
};

/// Line color, matching the plain blue of the original chart style.
const LINE_COLOR: RGBColor = BLUE;
const FRAME_COLOR: RGBColor = RGBColor(120, 120, 120);

#[derive(Clone, Copy, Debug)]
pub struct PriceChartRenderer {
    width: u32,
    height: u32,
}

impl PriceChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        // Keep enough room for margins on tiny configs.
        Self {
            width: width.max(100),
            height: height.max(100),
        }
    }
}

impl ChartRenderer for PriceChartRenderer {
    fn render(&self, history: &PriceHistory) -> Result<ChartImage> {
        let (first, last) = history
            .date_span()
            .ok_or_else(|| Error::Render("empty price history".to_string()))?;
        let (lo, hi) = history
            .close_range()
            .ok_or_else(|| Error::Render("empty price history".to_string()))?;

        let (x0, x1) = date_axis_range(first, last);
        let (y0, y1) = price_axis_range(lo, hi);

        let mut buf = vec![0u8; (self.width * self.height * 3) as usize];
        {
            let root =
                BitMapBackend::with_buffer(&mut buf, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;
            root.draw(&Rectangle::new(
                [
                    (0, 0),
                    (self.width as i32 - 1, self.height as i32 - 1),
                ],
                ShapeStyle::from(&FRAME_COLOR),
            ))
            .map_err(render_err)?;

            let mut chart = ChartBuilder::on(&root)
                .margin(24)
                .build_cartesian_2d(x0..x1, y0..y1)
                .map_err(render_err)?;

            chart
                .draw_series(LineSeries::new(
                    history.points().iter().map(|p| (p.date, p.close)),
                    ShapeStyle::from(&LINE_COLOR).stroke_width(2),
                ))
                .map_err(render_err)?;

            root.present().map_err(render_err)?;
        }

        let image = image::RgbImage::from_raw(self.width, self.height, buf)
            .ok_or_else(|| Error::Render("chart buffer size mismatch".to_string()))?;
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| Error::Render(format!("png encode error: {e}")))?;

        Ok(ChartImage {
            png,
            width: self.width,
            height: self.height,
            points: history.len(),
        })
    }
}

fn render_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> Error {
    Error::Render(e.to_string())
}

/// Padded close-price range; a flat series is widened so the line stays
/// visible instead of collapsing the axis.
pub fn price_axis_range(lo: f64, hi: f64) -> (f64, f64) {
    if (hi - lo).abs() < f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

/// Date range spanning exactly the supplied history; a single-day series is
/// widened by one day to keep the coordinate system non-degenerate.
pub fn date_axis_range(first: NaiveDate, last: NaiveDate) -> (NaiveDate, NaiveDate) {
    if first == last {
        (first, last + chrono::Duration::days(1))
    } else {
        (first, last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickerbot_core::market::PricePoint;

    fn history(n: u32) -> PriceHistory {
        let start = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        PriceHistory::new(
            (0..n)
                .map(|i| PricePoint {
                    date: start + chrono::Duration::days(i64::from(i)),
                    close: 100.0 + f64::from(i) * 1.5,
                })
                .collect(),
        )
    }

    #[test]
    fn renders_png_with_point_count() {
        let renderer = PriceChartRenderer::new(400, 240);
        let chart = renderer.render(&history(30)).unwrap();

        assert_eq!(chart.points, 30);
        assert_eq!((chart.width, chart.height), (400, 240));
        assert_eq!(&chart.png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = PriceChartRenderer::new(400, 240);
        let a = renderer.render(&history(30)).unwrap();
        let b = renderer.render(&history(30)).unwrap();
        assert_eq!(a.png, b.png);
    }

    #[test]
    fn empty_history_is_a_render_failure() {
        let renderer = PriceChartRenderer::new(400, 240);
        let err = renderer.render(&PriceHistory::default()).unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }

    #[test]
    fn single_point_still_renders() {
        let renderer = PriceChartRenderer::new(400, 240);
        let chart = renderer.render(&history(1)).unwrap();
        assert_eq!(chart.points, 1);
    }

    #[test]
    fn axis_ranges_are_stable_and_padded() {
        assert_eq!(price_axis_range(100.0, 110.0), (99.5, 110.5));
        assert_eq!(price_axis_range(100.0, 110.0), price_axis_range(100.0, 110.0));

        let (lo, hi) = price_axis_range(42.0, 42.0);
        assert!(lo < 42.0 && hi > 42.0);

        let d = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        let (x0, x1) = date_axis_range(d, d);
        assert!(x0 < x1);
    }
}
