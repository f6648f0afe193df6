//! Function sampling and viewport math for graph mode.

use serde::{Deserialize, Serialize};

use crate::constants::PLOT_SAMPLES;
use crate::error::{CalcError, Result};
use crate::expr::Expr;

/// Default axis range on both axes.
pub const DEFAULT_RANGE: (f64, f64) = (-10.0, 10.0);

/// Grid lines beyond this count are thinned by powers of ten.
const MAX_TICKS: f64 = 40.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

/// Sample `expr` at [`PLOT_SAMPLES`] evenly spaced x values, endpoints
/// included. Samples that fail or are not finite are dropped.
pub fn sample_function(expr: &Expr, x_min: f64, x_max: f64) -> Result<Vec<PlotPoint>> {
    if !(x_min < x_max) || !x_min.is_finite() || !x_max.is_finite() {
        return Err(CalcError::InvalidPlotRange);
    }

    let step = (x_max - x_min) / (PLOT_SAMPLES - 1) as f64;
    let points = (0..PLOT_SAMPLES)
        .filter_map(|i| {
            let x = x_min + i as f64 * step;
            match expr.eval(x) {
                Ok(y) if y.is_finite() => Some(PlotPoint { x, y }),
                _ => None,
            }
        })
        .collect();
    Ok(points)
}

/// Parse and sample in one step.
pub fn plot(text: &str, x_min: f64, x_max: f64) -> Result<Vec<PlotPoint>> {
    let expr = Expr::parse(text)?;
    sample_function(&expr, x_min, x_max)
}

/// Maps graph coordinates onto a `width` x `height` surface with the
/// origin at the top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(x: (f64, f64), y: (f64, f64), width: f64, height: f64) -> Result<Self> {
        if !(x.0 < x.1) || !(y.0 < y.1) || width <= 0.0 || height <= 0.0 {
            return Err(CalcError::InvalidPlotRange);
        }
        Ok(Self {
            x_min: x.0,
            x_max: x.1,
            y_min: y.0,
            y_max: y.1,
            width,
            height,
        })
    }

    pub fn to_screen(&self, point: PlotPoint) -> (f64, f64) {
        let sx = (point.x - self.x_min) / (self.x_max - self.x_min) * self.width;
        let sy = self.height - (point.y - self.y_min) / (self.y_max - self.y_min) * self.height;
        (sx, sy)
    }

    pub fn contains(&self, point: PlotPoint) -> bool {
        (self.x_min..=self.x_max).contains(&point.x) && (self.y_min..=self.y_max).contains(&point.y)
    }

    /// Screen-space polylines. A point outside the viewport ends the
    /// current line, so asymptotes are not drawn across the screen.
    pub fn segments(&self, points: &[PlotPoint]) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for &point in points {
            if self.contains(point) {
                current.push(self.to_screen(point));
            } else if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    pub fn x_ticks(&self) -> Vec<f64> {
        integer_ticks(self.x_min, self.x_max)
    }

    pub fn y_ticks(&self) -> Vec<f64> {
        integer_ticks(self.y_min, self.y_max)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x_min: DEFAULT_RANGE.0,
            x_max: DEFAULT_RANGE.1,
            y_min: DEFAULT_RANGE.0,
            y_max: DEFAULT_RANGE.1,
            width: 800.0,
            height: 400.0,
        }
    }
}

/// Ticks at multiples of a power-of-ten step. Empty when the span or the
/// step needed to cover it is not finite.
fn integer_ticks(min: f64, max: f64) -> Vec<f64> {
    let span = max - min;
    if !span.is_finite() {
        return Vec::new();
    }
    let mut step = 1.0_f64;
    while span / step > MAX_TICKS {
        step *= 10.0;
        if !step.is_finite() {
            return Vec::new();
        }
    }
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_count_and_endpoints() {
        let points = plot("x", -10.0, 10.0).unwrap();
        assert_eq!(points.len(), PLOT_SAMPLES);
        assert_eq!(points[0].x, -10.0);
        assert!((points[PLOT_SAMPLES - 1].x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_samples_dropped() {
        let points = plot("sqrt(x)", -1.0, 1.0).unwrap();
        assert!(!points.is_empty());
        assert!(points.len() < PLOT_SAMPLES);
        assert!(points.iter().all(|p| p.x >= 0.0 && p.y.is_finite()));

        // division by zero at a sample is dropped, not fatal
        let points = plot("1 / x", -1.0, 1.0).unwrap();
        assert!(points.iter().all(|p| p.y.is_finite()));
    }

    #[test]
    fn test_bad_range() {
        assert_eq!(plot("x", 1.0, 1.0), Err(CalcError::InvalidPlotRange));
        assert_eq!(plot("x", 2.0, 1.0), Err(CalcError::InvalidPlotRange));
        assert!(Viewport::new((0.0, 1.0), (1.0, 0.0), 10.0, 10.0).is_err());
    }

    #[test]
    fn test_to_screen() {
        let vp = Viewport::new((-10.0, 10.0), (-10.0, 10.0), 200.0, 100.0).unwrap();
        assert_eq!(vp.to_screen(PlotPoint { x: 0.0, y: 0.0 }), (100.0, 50.0));
        assert_eq!(vp.to_screen(PlotPoint { x: -10.0, y: 10.0 }), (0.0, 0.0));
        assert_eq!(vp.to_screen(PlotPoint { x: 10.0, y: -10.0 }), (200.0, 100.0));
    }

    #[test]
    fn test_segments_break_off_screen() {
        let vp = Viewport::default();
        let points = plot("tan(x)", -3.0, 3.0).unwrap();
        let segments = vp.segments(&points);
        // tan has asymptotes at ±pi/2 inside the range
        assert!(segments.len() >= 3);
    }

    #[test]
    fn test_ticks() {
        let vp = Viewport::new((-2.5, 3.2), (0.0, 1000.0), 10.0, 10.0).unwrap();
        assert_eq!(vp.x_ticks(), vec![-2.0, -1.0, 0.0, 1.0, 2.0, 3.0]);
        let y = vp.y_ticks();
        assert_eq!(y.first(), Some(&0.0));
        assert_eq!(y.last(), Some(&1000.0));
        assert_eq!(y.len(), 11);
    }

    #[test]
    fn test_ticks_over_extreme_ranges() {
        let vp = Viewport::new((-1e308, 1e308), (-f64::MAX, f64::MAX), 10.0, 10.0).unwrap();
        assert!(vp.x_ticks().is_empty());
        assert!(vp.y_ticks().iter().all(|t| t.is_finite()));

        let vp = Viewport::new((-1e307, 1e307), (0.0, 1.0), 10.0, 10.0).unwrap();
        let ticks = vp.x_ticks();
        assert!(!ticks.is_empty() && ticks.len() <= 41);
        assert!(ticks.iter().all(|t| t.is_finite()));
    }
}
