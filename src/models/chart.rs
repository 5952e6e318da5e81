//! Chart generation models

use super::metric::MetricField;

/// Which renderer a chart spec drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bubble,
    Bar,
    Treemap,
}

/// Declarative configuration for one chart.
///
/// Bubble charts read `x_field`, `y_field` and `size_field`; bar charts rank by
/// `x_field`; treemaps size cells by `size_field`. `color_field` falls back to
/// the size field when unset.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub name: String,
    pub kind: ChartKind,
    pub title: String,
    pub x_field: Option<MetricField>,
    pub y_field: Option<MetricField>,
    pub size_field: Option<MetricField>,
    pub color_field: Option<MetricField>,
    pub x_label: String,
    pub y_label: String,
}

impl ChartSpec {
    pub fn bubble(name: &str, title: &str, x: MetricField, y: MetricField, size: MetricField) -> Self {
        ChartSpec {
            name: name.to_string(),
            kind: ChartKind::Bubble,
            title: title.to_string(),
            x_field: Some(x),
            y_field: Some(y),
            size_field: Some(size),
            color_field: None,
            x_label: x.label().to_string(),
            y_label: y.label().to_string(),
        }
    }

    pub fn bar(name: &str, title: &str, metric: MetricField) -> Self {
        ChartSpec {
            name: name.to_string(),
            kind: ChartKind::Bar,
            title: title.to_string(),
            x_field: Some(metric),
            y_field: None,
            size_field: None,
            color_field: None,
            x_label: metric.label().to_string(),
            y_label: "Ticker".to_string(),
        }
    }

    pub fn treemap(name: &str, title: &str, size: MetricField) -> Self {
        ChartSpec {
            name: name.to_string(),
            kind: ChartKind::Treemap,
            title: title.to_string(),
            x_field: None,
            y_field: None,
            size_field: Some(size),
            color_field: None,
            x_label: String::new(),
            y_label: String::new(),
        }
    }

    pub fn with_color(mut self, field: MetricField) -> Self {
        self.color_field = Some(field);
        self
    }

    /// The built-in chart catalogue, one entry per comparative view
    pub fn catalogue() -> Vec<ChartSpec> {
        vec![
            ChartSpec::bubble(
                "bubble_volume",
                "Volume * Price vs. Price Variation",
                MetricField::PriceVariation,
                MetricField::VolumeValue,
                MetricField::VolumeValue,
            ),
            ChartSpec::bubble(
                "bubble_range",
                "Intraday Range vs. Open/Close Spread",
                MetricField::OpenClose,
                MetricField::Range,
                MetricField::MarketValue,
            )
            .with_color(MetricField::PriceVariation),
            ChartSpec::bar("bar_variation", "Price Variation Ranking", MetricField::PriceVariation),
            ChartSpec::bar("bar_volume", "Volume * Price Ranking", MetricField::VolumeValue),
            ChartSpec::treemap("treemap_market_value", "Market Value", MetricField::MarketValue)
                .with_color(MetricField::PriceVariation),
        ]
    }
}

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Visual encoding of one value: bubble area in square pixels and a color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Encoded {
    pub size: f64,
    pub color: Rgb,
}

/// Title and axis captions shared by every figure
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

/// A bubble to draw
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: Rgb,
}

/// A horizontal bar to draw, already in ranked order
#[derive(Debug, Clone, PartialEq)]
pub struct BarItem {
    pub label: String,
    pub value: f64,
    pub color: Rgb,
}

/// An axis-aligned rectangle in canvas units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// A laid-out treemap cell
#[derive(Debug, Clone, PartialEq)]
pub struct TreemapCell {
    pub label: String,
    pub value: f64,
    pub rect: Rect,
    pub color: Rgb,
}
