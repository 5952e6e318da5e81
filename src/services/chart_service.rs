use tracing::{info, warn};

use crate::models::{
    BarItem, ChartKind, ChartSpec, Frame, MetricField, MetricRecord, Rect, ScatterPoint, Snapshot,
    TreemapCell,
};
use crate::services::encoder_service::{encode, encode_colors};
use crate::services::treemap_layout::squarify;
use crate::utils::{PipelineError, RenderError};

/// The 2-D drawing backend a renderer issues primitive commands to.
///
/// Each chart is one primitive call followed by `display`.
pub trait RenderingSurface {
    /// Drawable canvas size, used to lay out treemap cells
    fn canvas_size(&self) -> (f64, f64);
    fn scatter(&mut self, frame: &Frame, points: &[ScatterPoint]) -> Result<(), RenderError>;
    fn bars(&mut self, frame: &Frame, bars: &[BarItem]) -> Result<(), RenderError>;
    fn treemap(&mut self, frame: &Frame, cells: &[TreemapCell]) -> Result<(), RenderError>;
    fn display(&mut self, name: &str) -> Result<(), RenderError>;
}

/// Render every chart spec for a snapshot.
///
/// An empty snapshot halts before anything is drawn. Otherwise each chart is
/// rendered independently and its outcome returned; one failing chart does not
/// stop its siblings.
pub fn render_all<S: RenderingSurface>(
    snapshot: &Snapshot,
    specs: &[ChartSpec],
    surface: &mut S,
) -> Result<Vec<(String, Result<(), RenderError>)>, PipelineError> {
    if snapshot.is_empty() {
        return Err(PipelineError::EmptySnapshot(snapshot.reference_date));
    }

    let outcomes = specs
        .iter()
        .map(|spec| {
            let outcome = render(snapshot, spec, surface);
            match &outcome {
                Ok(()) => info!("Rendered chart '{}' for {}", spec.name, snapshot.reference_date),
                Err(e) => warn!("Skipped chart '{}': {}", spec.name, e),
            }
            (spec.name.clone(), outcome)
        })
        .collect();

    Ok(outcomes)
}

/// Dispatch a spec to the renderer for its kind
pub fn render<S: RenderingSurface>(snapshot: &Snapshot, spec: &ChartSpec, surface: &mut S) -> Result<(), RenderError> {
    match spec.kind {
        ChartKind::Bubble => render_bubble(snapshot, spec, surface),
        ChartKind::Bar => render_bar(snapshot, spec, surface),
        ChartKind::Treemap => render_treemap(snapshot, spec, surface),
    }
}

/// Scatter `x_field` against `y_field`, bubble size and color from the encoder.
///
/// Points are ordered largest first so small bubbles are drawn on top.
pub fn render_bubble<S: RenderingSurface>(
    snapshot: &Snapshot,
    spec: &ChartSpec,
    surface: &mut S,
) -> Result<(), RenderError> {
    let x_field = required(spec, spec.x_field, "x_field")?;
    let y_field = required(spec, spec.y_field, "y_field")?;
    let size_field = required(spec, spec.size_field, "size_field")?;
    let color_field = spec.color_field.unwrap_or(size_field);

    let rows: Vec<(&MetricRecord, [f64; 4])> = snapshot
        .records()
        .iter()
        .filter_map(|r| {
            let values = [
                finite(r, x_field)?,
                finite(r, y_field)?,
                finite(r, size_field)?,
                finite(r, color_field)?,
            ];
            Some((r, values))
        })
        .collect();

    if rows.is_empty() {
        return Err(RenderError::NothingToDisplay(spec.name.clone()));
    }

    let sizes = encode(&rows.iter().map(|(_, v)| v[2]).collect::<Vec<_>>());
    let colors = encode_colors(&rows.iter().map(|(_, v)| v[3]).collect::<Vec<_>>());

    let mut points: Vec<ScatterPoint> = rows
        .iter()
        .zip(sizes.iter().zip(colors))
        .map(|((record, v), (size, color))| ScatterPoint {
            label: record.ticker.clone(),
            x: v[0],
            y: v[1],
            size: size.size,
            color,
        })
        .collect();
    points.sort_by(|a, b| b.size.total_cmp(&a.size).then_with(|| a.label.cmp(&b.label)));

    surface.scatter(&frame(snapshot, spec), &points)?;
    surface.display(&chart_name(snapshot, spec))
}

/// One horizontal bar per ticker, ranked by `x_field` descending.
///
/// Absent and non-finite values are excluded before sorting; zero is ranked
/// like any other value.
pub fn render_bar<S: RenderingSurface>(snapshot: &Snapshot, spec: &ChartSpec, surface: &mut S) -> Result<(), RenderError> {
    let metric = required(spec, spec.x_field, "x_field")?;

    let mut ranked = snapshot.series(metric);
    if ranked.is_empty() {
        return Err(RenderError::NothingToDisplay(spec.name.clone()));
    }
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let colors = encode_colors(&ranked.iter().map(|(_, v)| *v).collect::<Vec<_>>());
    let bars: Vec<BarItem> = ranked
        .iter()
        .zip(colors)
        .map(|((ticker, value), color)| BarItem {
            label: ticker.to_string(),
            value: *value,
            color,
        })
        .collect();

    surface.bars(&frame(snapshot, spec), &bars)?;
    surface.display(&chart_name(snapshot, spec))
}

/// Area-proportional cells sized by `size_field`.
///
/// Only strictly positive sizes can be laid out; records without a positive
/// size or a finite color value are left out.
pub fn render_treemap<S: RenderingSurface>(
    snapshot: &Snapshot,
    spec: &ChartSpec,
    surface: &mut S,
) -> Result<(), RenderError> {
    let size_field = required(spec, spec.size_field, "size_field")?;
    let color_field = spec.color_field.unwrap_or(size_field);

    let mut rows: Vec<(&str, f64, f64)> = snapshot
        .records()
        .iter()
        .filter_map(|r| {
            let size = finite(r, size_field).filter(|s| *s > 0.0)?;
            let color = finite(r, color_field)?;
            Some((r.ticker.as_str(), size, color))
        })
        .collect();

    if rows.is_empty() {
        return Err(RenderError::NothingToDisplay(spec.name.clone()));
    }
    rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let (width, height) = surface.canvas_size();
    let bounds = Rect { x: 0.0, y: 0.0, width, height };
    let weights: Vec<f64> = rows.iter().map(|(_, size, _)| *size).collect();
    let rects = squarify(&weights, bounds);
    if rects.len() != rows.len() {
        return Err(RenderError::Surface(format!(
            "canvas {}x{} too small for treemap '{}'",
            width, height, spec.name
        )));
    }

    let colors = encode_colors(&rows.iter().map(|(_, _, c)| *c).collect::<Vec<_>>());
    let cells: Vec<TreemapCell> = rows
        .iter()
        .zip(rects)
        .zip(colors)
        .map(|(((ticker, size, _), rect), color)| TreemapCell {
            label: ticker.to_string(),
            value: *size,
            rect,
            color,
        })
        .collect();

    surface.treemap(&frame(snapshot, spec), &cells)?;
    surface.display(&chart_name(snapshot, spec))
}

fn required(spec: &ChartSpec, field: Option<MetricField>, what: &str) -> Result<MetricField, RenderError> {
    field.ok_or_else(|| RenderError::InvalidSpec(spec.name.clone(), format!("{} is required", what)))
}

fn finite(record: &MetricRecord, field: MetricField) -> Option<f64> {
    record.get(field).filter(|v| v.is_finite())
}

fn chart_name(snapshot: &Snapshot, spec: &ChartSpec) -> String {
    format!("{}_{}", snapshot.reference_date, spec.name)
}

fn frame(snapshot: &Snapshot, spec: &ChartSpec) -> Frame {
    Frame {
        name: chart_name(snapshot, spec),
        title: format!("{} ({})", spec.title, snapshot.reference_date),
        x_label: spec.x_label.clone(),
        y_label: spec.y_label.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::encoder_service::{MAX_SIZE, MIN_SIZE};
    use crate::services::test_support::{record, snapshot_of, DrawCall, RecordingSurface};

    #[test]
    fn test_empty_snapshot_halts_before_drawing() {
        let mut surface = RecordingSurface::default();
        let result = render_all(&snapshot_of(vec![]), &ChartSpec::catalogue(), &mut surface);

        assert!(matches!(result, Err(PipelineError::EmptySnapshot(_))));
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn test_treemap_keeps_only_positive_sizes() {
        let snapshot = snapshot_of(vec![
            record("NEG.BA", 1.0, Some(-3.0)),
            record("ZERO.BA", 2.0, Some(0.0)),
            record("POS.BA", 3.0, Some(7.0)),
            record("^MERV", 4.0, None),
        ]);
        let spec = ChartSpec::treemap("tm", "Market Value", MetricField::MarketValue);
        let mut surface = RecordingSurface::default();

        render_treemap(&snapshot, &spec, &mut surface).unwrap();

        match &surface.calls[0] {
            DrawCall::Treemap(_, cells) => {
                assert_eq!(cells.len(), 1);
                assert_eq!(cells[0].label, "POS.BA");
                assert!((cells[0].rect.area() - 1400.0 * 1000.0).abs() < 1e-6);
            }
            other => panic!("unexpected call {:?}", other),
        }
        assert_eq!(surface.calls[1], DrawCall::Display("2024-03-05_tm".to_string()));
    }

    #[test]
    fn test_treemap_without_positive_sizes_reports_nothing() {
        let snapshot = snapshot_of(vec![record("NEG.BA", 1.0, Some(-3.0)), record("^MERV", 1.0, None)]);
        let spec = ChartSpec::treemap("tm", "Market Value", MetricField::MarketValue);
        let mut surface = RecordingSurface::default();

        let err = render_treemap(&snapshot, &spec, &mut surface).unwrap_err();
        assert_eq!(err, RenderError::NothingToDisplay("tm".to_string()));
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn test_bar_ranks_descending_and_keeps_zero() {
        let snapshot = snapshot_of(vec![
            record("B.BA", 0.0, None),
            record("A.BA", 5.0, None),
            record("C.BA", -2.0, None),
            record("D.BA", 5.0, None),
        ]);
        let spec = ChartSpec::bar("bars", "Ranking", MetricField::PriceVariation);
        let mut surface = RecordingSurface::default();

        render_bar(&snapshot, &spec, &mut surface).unwrap();

        match &surface.calls[0] {
            DrawCall::Bars(frame, bars) => {
                let order: Vec<&str> = bars.iter().map(|b| b.label.as_str()).collect();
                assert_eq!(order, vec!["A.BA", "D.BA", "B.BA", "C.BA"]);
                assert_eq!(frame.title, "Ranking (2024-03-05)");
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_bar_skips_absent_metric() {
        let snapshot = snapshot_of(vec![record("A.BA", 1.0, Some(10.0)), record("^MERV", 1.0, None)]);
        let spec = ChartSpec::bar("bars", "Ranking", MetricField::MarketValue);
        let mut surface = RecordingSurface::default();

        render_bar(&snapshot, &spec, &mut surface).unwrap();
        match &surface.calls[0] {
            DrawCall::Bars(_, bars) => assert_eq!(bars.len(), 1),
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_bubble_points_carry_encoding() {
        let snapshot = snapshot_of(vec![
            record("A.BA", 1.0, None),
            record("B.BA", -4.0, None),
            record("C.BA", 2.0, None),
        ]);
        let spec = ChartSpec::bubble(
            "bubbles",
            "Bubbles",
            MetricField::PriceVariation,
            MetricField::VolumeValue,
            MetricField::VolumeValue,
        );
        let mut surface = RecordingSurface::default();

        render_bubble(&snapshot, &spec, &mut surface).unwrap();

        match &surface.calls[0] {
            DrawCall::Scatter(frame, points) => {
                assert_eq!(points.len(), 3);
                // Largest magnitude first
                assert_eq!(points[0].label, "B.BA");
                assert_eq!(points[0].size, MAX_SIZE);
                assert_eq!(points[2].label, "A.BA");
                assert_eq!(points[2].size, MIN_SIZE);
                assert_eq!(points[0].x, -4.0);
                assert_eq!(frame.x_label, "Price Variation (%)");
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_bubble_missing_field_is_invalid_spec() {
        let snapshot = snapshot_of(vec![record("A.BA", 1.0, None)]);
        let mut spec = ChartSpec::bar("bad", "Bad", MetricField::Range);
        spec.kind = ChartKind::Bubble;
        let mut surface = RecordingSurface::default();

        let err = render(&snapshot, &spec, &mut surface).unwrap_err();
        assert!(matches!(err, RenderError::InvalidSpec(name, _) if name == "bad"));
    }

    #[test]
    fn test_sibling_charts_still_render() {
        // No market values: the treemap has nothing to show, the bar chart does
        let snapshot = snapshot_of(vec![record("A.BA", 1.0, None)]);
        let specs = vec![
            ChartSpec::treemap("tm", "Market Value", MetricField::MarketValue),
            ChartSpec::bar("bars", "Ranking", MetricField::PriceVariation),
        ];
        let mut surface = RecordingSurface::default();

        let outcomes = render_all(&snapshot, &specs, &mut surface).unwrap();
        assert!(outcomes[0].1.is_err());
        assert!(outcomes[1].1.is_ok());
        assert_eq!(surface.calls.len(), 2);
    }
}
