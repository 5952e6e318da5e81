use plotters::prelude::*;
use std::f64::consts::PI;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::models::{BarItem, Frame, Rgb, ScatterPoint, TreemapCell};
use crate::services::chart_service::RenderingSurface;
use crate::utils::{format_large_number, RenderError};

/// Vertical space reserved for the title above a treemap
const TITLE_HEIGHT: u32 = 60;
/// Pixel offset of a bubble's label from its center
const LABEL_OFFSET: i32 = 10;

/// A figure waiting for `display`
enum Figure {
    Scatter(Frame, Vec<ScatterPoint>),
    Bars(Frame, Vec<BarItem>),
    Treemap(Frame, Vec<TreemapCell>),
}

/// Rendering surface that writes each displayed chart as a PNG file
pub struct PlottersSurface {
    output_dir: PathBuf,
    width: u32,
    height: u32,
    pending: Option<Figure>,
    written: Vec<PathBuf>,
}

impl PlottersSurface {
    pub fn new(output_dir: PathBuf, width: u32, height: u32) -> Self {
        PlottersSurface {
            output_dir,
            width,
            height,
            pending: None,
            written: Vec::new(),
        }
    }

    /// Files written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl RenderingSurface for PlottersSurface {
    fn canvas_size(&self) -> (f64, f64) {
        (self.width as f64, self.height.saturating_sub(TITLE_HEIGHT) as f64)
    }

    fn scatter(&mut self, frame: &Frame, points: &[ScatterPoint]) -> Result<(), RenderError> {
        self.pending = Some(Figure::Scatter(frame.clone(), points.to_vec()));
        Ok(())
    }

    fn bars(&mut self, frame: &Frame, bars: &[BarItem]) -> Result<(), RenderError> {
        self.pending = Some(Figure::Bars(frame.clone(), bars.to_vec()));
        Ok(())
    }

    fn treemap(&mut self, frame: &Frame, cells: &[TreemapCell]) -> Result<(), RenderError> {
        self.pending = Some(Figure::Treemap(frame.clone(), cells.to_vec()));
        Ok(())
    }

    fn display(&mut self, name: &str) -> Result<(), RenderError> {
        let figure = self
            .pending
            .take()
            .ok_or_else(|| RenderError::Surface(format!("nothing drawn for '{}'", name)))?;

        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| RenderError::Surface(format!("Failed to create {}: {}", self.output_dir.display(), e)))?;
        let path = self.output_dir.join(format!("{}.png", name));
        let size = (self.width, self.height);

        match &figure {
            Figure::Scatter(frame, points) => draw_scatter(&path, size, frame, points)?,
            Figure::Bars(frame, bars) => draw_bars(&path, size, frame, bars)?,
            Figure::Treemap(frame, cells) => draw_treemap(&path, size, self.canvas_size(), frame, cells)?,
        }

        info!("Chart written to {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

fn surface_err<E: Display>(context: &'static str) -> impl Fn(E) -> RenderError {
    move |e| RenderError::Surface(format!("Failed to {}: {}", context, e))
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// Axis tick text; ticks are rounded first so float noise doesn't leak into labels
fn tick_label(v: &f64) -> String {
    format_large_number((v * 1e6).round() / 1e6)
}

/// Bubble radius in pixels for an area in square pixels
fn bubble_radius(area: f64) -> u32 {
    (area / PI).sqrt().round().max(1.0) as u32
}

/// Min/max of the values with 10% padding on each side
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !min.is_finite() || !max.is_finite() {
        return (-1.0, 1.0);
    }
    let span = max - min;
    let padding = if span > 0.0 { span * 0.1 } else { (max.abs() * 0.1).max(1.0) };
    (min - padding, max + padding)
}

fn draw_scatter(path: &Path, size: (u32, u32), frame: &Frame, points: &[ScatterPoint]) -> Result<(), RenderError> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(surface_err("fill canvas"))?;

    let (x_min, x_max) = padded_range(points.iter().map(|p| p.x));
    let (y_min, y_max) = padded_range(points.iter().map(|p| p.y));

    let mut chart = ChartBuilder::on(&root)
        .caption(&frame.title, ("sans-serif", 32).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(surface_err("build chart"))?;

    chart
        .configure_mesh()
        .x_desc(frame.x_label.as_str())
        .y_desc(frame.y_label.as_str())
        .x_label_formatter(&tick_label)
        .y_label_formatter(&tick_label)
        .draw()
        .map_err(surface_err("draw mesh"))?;

    // Bubble with a white edge, then a short leader line to an offset label
    chart
        .draw_series(points.iter().map(|p| {
            let radius = bubble_radius(p.size);
            EmptyElement::at((p.x, p.y))
                + Circle::new((0, 0), radius, rgb(p.color).mix(0.6).filled())
                + Circle::new((0, 0), radius, WHITE.stroke_width(2))
                + PathElement::new(vec![(0, 0), (LABEL_OFFSET, -LABEL_OFFSET)], &BLACK)
                + Text::new(
                    p.label.clone(),
                    (LABEL_OFFSET + 2, -LABEL_OFFSET - 14),
                    ("sans-serif", 14).into_font(),
                )
        }))
        .map_err(surface_err("draw bubbles"))?;

    root.present().map_err(surface_err("render chart"))?;
    Ok(())
}

fn draw_bars(path: &Path, size: (u32, u32), frame: &Frame, bars: &[BarItem]) -> Result<(), RenderError> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(surface_err("fill canvas"))?;

    let n = bars.len();
    let (x_min, x_max) = padded_range(bars.iter().map(|b| b.value).chain(std::iter::once(0.0)));
    // First bar at the top
    let row_of = |i: usize| (n - 1 - i) as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption(&frame.title, ("sans-serif", 32).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(110)
        .build_cartesian_2d(x_min..x_max, -0.5f64..(n as f64 - 0.5))
        .map_err(surface_err("build chart"))?;

    let label_for = |y: &f64| {
        let row = y.round();
        if (y - row).abs() > 1e-6 || row < 0.0 || row as usize >= n {
            return String::new();
        }
        bars.get(n - 1 - row as usize)
            .map(|b| b.label.clone())
            .unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .x_desc(frame.x_label.as_str())
        .y_desc(frame.y_label.as_str())
        .x_label_formatter(&tick_label)
        .y_label_formatter(&label_for)
        .draw()
        .map_err(surface_err("draw mesh"))?;

    chart
        .draw_series(bars.iter().enumerate().map(|(i, b)| {
            let y = row_of(i);
            Rectangle::new([(0.0, y - 0.4), (b.value, y + 0.4)], rgb(b.color).filled())
        }))
        .map_err(surface_err("draw bars"))?;

    chart
        .draw_series(bars.iter().enumerate().map(|(i, b)| {
            Text::new(
                format_large_number((b.value * 100.0).round() / 100.0),
                (b.value, row_of(i)),
                ("sans-serif", 13).into_font(),
            )
        }))
        .map_err(surface_err("draw bar labels"))?;

    root.present().map_err(surface_err("render chart"))?;
    Ok(())
}

fn draw_treemap(
    path: &Path,
    size: (u32, u32),
    layout_size: (f64, f64),
    frame: &Frame,
    cells: &[TreemapCell],
) -> Result<(), RenderError> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(surface_err("fill canvas"))?;
    let area = root
        .titled(&frame.title, ("sans-serif", 32))
        .map_err(surface_err("draw title"))?;

    // Cells were laid out on `layout_size`; fit them to the area left under the title
    let (area_w, area_h) = area.dim_in_pixel();
    let sx = if layout_size.0 > 0.0 { area_w as f64 / layout_size.0 } else { 1.0 };
    let sy = if layout_size.1 > 0.0 { area_h as f64 / layout_size.1 } else { 1.0 };

    for cell in cells {
        let x0 = (cell.rect.x * sx).round() as i32;
        let y0 = (cell.rect.y * sy).round() as i32;
        let x1 = ((cell.rect.x + cell.rect.width) * sx).round() as i32;
        let y1 = ((cell.rect.y + cell.rect.height) * sy).round() as i32;

        area.draw(&Rectangle::new([(x0, y0), (x1, y1)], rgb(cell.color).filled()))
            .map_err(surface_err("draw cell"))?;
        area.draw(&Rectangle::new([(x0, y0), (x1, y1)], WHITE.stroke_width(2)))
            .map_err(surface_err("draw cell border"))?;

        // Only label cells big enough to hold the text
        if x1 - x0 >= 60 && y1 - y0 >= 40 {
            let style = ("sans-serif", 16).into_font().color(&WHITE);
            area.draw(&Text::new(cell.label.clone(), (x0 + 6, y0 + 6), style.clone()))
                .map_err(surface_err("draw cell label"))?;
            area.draw(&Text::new(format_large_number(cell.value), (x0 + 6, y0 + 24), style))
                .map_err(surface_err("draw cell value"))?;
        }
    }

    root.present().map_err(surface_err("render chart"))?;
    Ok(())
}
