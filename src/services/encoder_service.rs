use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};

use crate::models::{Encoded, Rgb};

/// Bubble area range in square pixels
pub const MIN_SIZE: f64 = 100.0;
pub const MAX_SIZE: f64 = 2100.0;

/// Map each value to a visual size and color.
///
/// Size rescales `|value|` linearly into [MIN_SIZE, MAX_SIZE]; color normalizes
/// the signed value over [min, max] into viridis. A constant input collapses to
/// the size midpoint and the middle color. Values are expected to be finite.
pub fn encode(values: &[f64]) -> Vec<Encoded> {
    if values.is_empty() {
        return Vec::new();
    }

    let (abs_min, abs_max) = bounds(values.iter().map(|v| v.abs()));
    let (min, max) = bounds(values.iter().copied());

    values
        .iter()
        .map(|&v| Encoded {
            size: MIN_SIZE + normalize(v.abs(), abs_min, abs_max) * (MAX_SIZE - MIN_SIZE),
            color: viridis(normalize(v, min, max)),
        })
        .collect()
}

/// Colors only, for charts whose geometry carries the magnitude
pub fn encode_colors(values: &[f64]) -> Vec<Rgb> {
    encode(values).into_iter().map(|e| e.color).collect()
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Position of `v` in [min, max]; 0.5 when the range is degenerate
fn normalize(v: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span <= 0.0 || !span.is_finite() {
        0.5
    } else {
        ((v - min) / span).clamp(0.0, 1.0)
    }
}

/// Sample viridis at `t` in [0, 1]
pub fn viridis(t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let color = ViridisRGB.get_color(t);
    Rgb(color.0, color.1, color.2)
}
