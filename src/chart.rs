//! The chart: named series, viewport math, and the paint pipeline.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::axis;
use crate::dataset::DataSet;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::loader::SeriesSink;
use crate::render::{Antialias, Color, Surface};
use crate::transform::ChartTransform;
use crate::view::{Range, Viewport};

const MARGIN_LEFT: f32 = 50.0;
const MARGIN_RIGHT: f32 = 10.0;
const MARGIN_TOP: f32 = 8.0;
const MARGIN_BOTTOM: f32 = 2.0;
const X_TICK_STRIP: f32 = 18.0;

const TICK_LENGTH: f32 = 4.0;
const TICK_FONT_SIZE: f32 = 12.0;
const TICK_LABEL_PADDING: f32 = 30.0;

const LEGEND_POSITION: (f32, f32) = (8.0, 8.0);
const LEGEND_MARGIN: (f32, f32) = (6.0, 3.0);
const LEGEND_SWATCH_THICKNESS: f32 = 3.0;
const LEGEND_SWATCH_WIDTH: f32 = 9.0;
const LEGEND_FONT_SIZE: f32 = 12.0;
const LEGEND_LINE_SPACING: f32 = 1.0;

const INDICATOR_THICKNESS: f32 = 2.0;

/// Minimum pixel spacing between points before markers are drawn.
/// A heuristic, not a contract; tune if markers clutter or vanish too early.
const MARKER_MIN_SPACING: f32 = 2.0;

const BORDER_COLOR: Color = Color::BLACK.with_alpha(0.8);
const GRID_COLOR: Color = Color::BLACK.with_alpha(0.2);
const ZERO_AXIS_COLOR: Color = Color::BLACK.with_alpha(0.3);
const TICK_COLOR: Color = Color::BLACK;
const LEGEND_FILL: Color = Color::WHITE.with_alpha(0.75);
const LEGEND_BORDER: Color = Color::BLACK.with_alpha(0.5);
const INDICATOR_COLOR: Color = Color::new(1.0, 0.2, 0.2, 0.8);

const PALETTE: [Color; 6] = [
    Color::rgb(0.0, 0.0, 0.7),
    Color::rgb(0.0, 0.7, 0.0),
    Color::rgb(0.7, 0.0, 0.0),
    Color::rgb(0.0, 0.7, 0.7),
    Color::rgb(0.7, 0.0, 0.7),
    Color::rgb(0.7, 0.7, 0.0),
];

#[derive(Debug, Clone)]
struct SeriesEntry {
    name: String,
    data: DataSet,
}

/// A chart of named series over a shared time axis.
///
/// Series draw and legend order follow first insertion, independent of later
/// appends. The desired zoom per axis is optional; `None` fits the data
/// extent. The displayed viewport rounds the zoom outward to whole tick
/// intervals, so it always contains it.
#[derive(Debug, Clone)]
pub struct Chart {
    series: Vec<SeriesEntry>,

    width: f32,
    height: f32,
    plot_rect: ScreenRect,

    palette_offset: usize,
    show_lines: bool,
    show_points: bool,
    show_x_ticks: bool,

    x_zoom: Option<Range>,
    y_zoom: Option<Range>,
    x_interval: Option<f64>,
    y_interval: Option<f64>,
    view: Option<Viewport>,

    x_indicator: Option<f64>,
}

impl Chart {
    /// Create an empty chart with a default size.
    pub fn new() -> Self {
        let mut chart = Self {
            series: Vec::new(),
            width: 400.0,
            height: 400.0,
            plot_rect: ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(1.0, 1.0)),
            palette_offset: 0,
            show_lines: true,
            show_points: true,
            show_x_ticks: true,
            x_zoom: None,
            y_zoom: None,
            x_interval: None,
            y_interval: None,
            view: None,
            x_indicator: None,
        };
        chart.layout();
        chart
    }

    // Data

    /// Append a point to the named series, creating it on first use.
    pub fn add_point(&mut self, series: &str, x: f64, y: f64) {
        match self.series.iter_mut().find(|entry| entry.name == series) {
            Some(entry) => entry.data.add(x, y),
            None => {
                let mut data = DataSet::new();
                data.add(x, y);
                self.series.push(SeriesEntry {
                    name: series.to_string(),
                    data,
                });
            }
        }
    }

    /// Drop all points from one series, keeping its draw/legend position.
    pub fn clear_series(&mut self, series: &str) {
        if let Some(entry) = self.series.iter_mut().find(|entry| entry.name == series) {
            entry.data.clear();
        }
    }

    /// Remove every series.
    pub fn clear(&mut self) {
        self.series.clear();
    }

    /// Total points across all series.
    pub fn num_points(&self) -> usize {
        self.series.iter().map(|entry| entry.data.len()).sum()
    }

    /// Number of series.
    pub fn num_series(&self) -> usize {
        self.series.len()
    }

    /// Series names in draw/legend order.
    pub fn series_names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|entry| entry.name.as_str())
    }

    /// Color assigned to the named series.
    pub fn series_color(&self, series: &str) -> Option<Color> {
        let index = self.series.iter().position(|entry| entry.name == series)?;
        Some(self.color_for(index))
    }

    /// Data bounds across all series.
    pub fn data_bounds(&self) -> Option<Viewport> {
        let mut x_range: Option<Range> = None;
        let mut y_range: Option<Range> = None;
        for entry in &self.series {
            if let Some(bounds) = entry.data.bounds() {
                x_range = Some(match x_range {
                    None => bounds.x,
                    Some(existing) => Range::union(existing, bounds.x)?,
                });
                y_range = Some(match y_range {
                    None => bounds.y,
                    Some(existing) => Range::union(existing, bounds.y)?,
                });
            }
        }
        match (x_range, y_range) {
            (Some(x), Some(y)) => Some(Viewport::new(x, y)),
            _ => None,
        }
    }

    // View state

    /// Resize to the widget's client area and recompute the plot rectangle.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.layout();
    }

    /// Desired x window; `None` fits the data extent.
    pub fn set_x_zoom(&mut self, zoom: Option<Range>) {
        self.x_zoom = zoom;
    }

    /// Desired y window; `None` fits the data extent.
    pub fn set_y_zoom(&mut self, zoom: Option<Range>) {
        self.y_zoom = zoom;
    }

    /// Playhead position on the time axis; `None` hides the indicator.
    pub fn set_x_indicator(&mut self, x: Option<f64>) {
        self.x_indicator = x;
    }

    /// Rotate series colors through the palette.
    pub fn set_palette_offset(&mut self, offset: usize) {
        self.palette_offset = offset;
    }

    /// Toggle the connected polyline pass.
    pub fn set_show_lines(&mut self, show: bool) {
        self.show_lines = show;
    }

    /// Toggle the point-marker pass.
    pub fn set_show_points(&mut self, show: bool) {
        self.show_points = show;
    }

    /// Toggle x tick marks and labels (off for all but the bottom chart of a
    /// stack sharing a time axis). Reclaims the label strip when disabled.
    pub fn set_show_x_ticks(&mut self, show: bool) {
        self.show_x_ticks = show;
        self.layout();
    }

    /// The plot rectangle in pixels.
    pub fn plot_rect(&self) -> ScreenRect {
        self.plot_rect
    }

    /// The displayed (interval-rounded) viewport from the last paint.
    pub fn viewport(&self) -> Option<Viewport> {
        self.view
    }

    /// The x tick interval from the last paint.
    pub fn x_interval(&self) -> Option<f64> {
        self.x_interval
    }

    /// The y tick interval from the last paint.
    pub fn y_interval(&self) -> Option<f64> {
        self.y_interval
    }

    /// Transform for the currently displayed viewport, for host interactions.
    pub fn transform(&self) -> Option<ChartTransform> {
        ChartTransform::new(self.view?, self.plot_rect)
    }

    fn layout(&mut self) {
        let mut bottom = self.height - MARGIN_BOTTOM;
        if self.show_x_ticks {
            bottom -= X_TICK_STRIP;
        }
        self.plot_rect = ScreenRect::new(
            ScreenPoint::new(MARGIN_LEFT, MARGIN_TOP),
            ScreenPoint::new(self.width - MARGIN_RIGHT, bottom),
        );
    }

    fn color_for(&self, index: usize) -> Color {
        PALETTE[(self.palette_offset + index) % PALETTE.len()]
    }

    fn x_zoom_range(&self) -> Option<Range> {
        self.x_zoom.or_else(|| Some(self.data_bounds()?.x))
    }

    fn y_zoom_range(&self) -> Option<Range> {
        self.y_zoom.or_else(|| Some(self.data_bounds()?.y))
    }

    // Painting

    /// Paint the chart.
    ///
    /// Recomputes intervals and the displayed viewport first, since label
    /// sizes depend on the surface's text metrics. With fewer than two points
    /// in total only the border is drawn.
    pub fn paint(&mut self, surface: &mut dyn Surface) {
        self.draw_border(surface);

        if self.num_points() < 2 {
            return;
        }

        surface.save();
        surface.clip(self.plot_rect);

        self.update_axes(surface);
        let transform = self
            .view
            .and_then(|view| ChartTransform::new(view, self.plot_rect));

        if let Some(transform) = &transform {
            self.draw_grid(surface, transform);
            self.draw_zero_axes(surface, transform);
            self.draw_data(surface, transform);
            self.draw_x_indicator(surface, transform);
        }
        self.draw_legend(surface);

        surface.restore();

        if let Some(transform) = &transform {
            self.draw_ticks(surface, transform);
        }
    }

    /// Calculate tick intervals and round the zoom out to the displayed view.
    fn update_axes(&mut self, surface: &mut dyn Surface) {
        let (Some(x_zoom), Some(y_zoom)) = (self.x_zoom_range(), self.y_zoom_range()) else {
            self.view = None;
            return;
        };

        surface.set_font_size(TICK_FONT_SIZE);

        // X labels vary in width; budget for the wider zoom bound, doubled.
        let min_label = axis::format_value(x_zoom.min, self.x_interval);
        let max_label = axis::format_value(x_zoom.max, self.x_interval);
        let label_width = surface
            .text_extents(&min_label)
            .0
            .max(surface.text_extents(&max_label).0)
            * 2.0
            + TICK_LABEL_PADDING;
        let num_ticks = f64::from(self.plot_rect.width() / label_width);
        self.x_interval = axis::choose_interval(x_zoom.span() / num_ticks, &axis::NICE_STEPS);

        let label_height = surface.font_height() + TICK_LABEL_PADDING;
        let num_ticks = f64::from(self.plot_rect.height() / label_height);
        self.y_interval = axis::choose_interval(y_zoom.span() / num_ticks, &axis::NICE_STEPS);

        let x_view = match self.x_interval {
            Some(interval) => Range {
                min: axis::round_min_to_interval(x_zoom.min, interval),
                max: axis::round_max_to_interval(x_zoom.max, interval),
            },
            None => x_zoom,
        };
        let y_view = match self.y_interval {
            Some(interval) => Range {
                min: axis::round_min_to_interval(y_zoom.min, interval),
                max: axis::round_max_to_interval(y_zoom.max, interval),
            },
            None => y_zoom,
        };
        self.view = Some(Viewport::new(x_view, y_view));
    }

    fn draw_border(&self, surface: &mut dyn Surface) {
        surface.set_antialias(Antialias::None);
        surface.set_line_width(1.0);
        surface.set_color(BORDER_COLOR);
        surface.stroke_rect(ScreenRect::new(
            ScreenPoint::new(self.plot_rect.min.x, self.plot_rect.min.y - 1.0),
            self.plot_rect.max,
        ));
    }

    fn draw_grid(&self, surface: &mut dyn Surface, transform: &ChartTransform) {
        let view = transform.viewport();

        surface.set_antialias(Antialias::None);
        surface.set_line_width(1.0);
        surface.set_dash(&[2.0, 4.0]);
        surface.set_color(GRID_COLOR);

        if let Some(interval) = self.x_interval {
            for value in axis::tick_values(view.x, interval) {
                if let Some(px) = transform.x_to_screen(value) {
                    surface.move_to(ScreenPoint::new(px, self.plot_rect.max.y));
                    surface.line_to(ScreenPoint::new(px, self.plot_rect.min.y));
                }
            }
            surface.stroke();
        }

        if let Some(interval) = self.y_interval {
            for value in axis::tick_values(view.y, interval) {
                if let Some(py) = transform.y_to_screen(value) {
                    surface.move_to(ScreenPoint::new(self.plot_rect.min.x, py));
                    surface.line_to(ScreenPoint::new(self.plot_rect.max.x, py));
                }
            }
            surface.stroke();
        }

        surface.set_dash(&[]);
    }

    /// Solid faint lines where the axes cross zero; the clip rectangle
    /// swallows them when zero is out of view.
    fn draw_zero_axes(&self, surface: &mut dyn Surface, transform: &ChartTransform) {
        surface.set_antialias(Antialias::None);
        surface.set_line_width(1.0);
        surface.set_color(ZERO_AXIS_COLOR);

        if let Some(py) = transform.y_to_screen(0.0) {
            surface.move_to(ScreenPoint::new(self.plot_rect.min.x, py));
            surface.line_to(ScreenPoint::new(self.plot_rect.max.x, py));
            surface.stroke();
        }

        if let Some(px) = transform.x_to_screen(0.0) {
            surface.move_to(ScreenPoint::new(px, self.plot_rect.max.y));
            surface.line_to(ScreenPoint::new(px, self.plot_rect.min.y));
            surface.stroke();
        }
    }

    fn draw_data(&self, surface: &mut dyn Surface, transform: &ChartTransform) {
        surface.set_antialias(Antialias::Subpixel);

        for (index, entry) in self.series.iter().enumerate() {
            let coords: Vec<ScreenPoint> = entry
                .data
                .points()
                .iter()
                .filter_map(|point| transform.point_to_screen(*point))
                .collect();
            if coords.is_empty() {
                continue;
            }

            surface.set_color(self.color_for(index));

            if self.show_lines {
                surface.set_line_width(1.0);
                surface.move_to(coords[0]);
                for point in &coords[1..] {
                    surface.line_to(*point);
                }
                surface.stroke();
            }

            if self.show_points && self.markers_distinguishable(&entry.data, transform) {
                surface.set_line_width(1.5);
                for point in &coords {
                    surface.move_to(ScreenPoint::new(point.x - 1.0, point.y - 1.0));
                    surface.line_to(ScreenPoint::new(point.x + 1.0, point.y + 1.0));
                    surface.move_to(ScreenPoint::new(point.x + 1.0, point.y - 1.0));
                    surface.line_to(ScreenPoint::new(point.x - 1.0, point.y + 1.0));
                }
                surface.stroke();
            }
        }
    }

    fn markers_distinguishable(&self, data: &DataSet, transform: &ChartTransform) -> bool {
        data.min_dx()
            .and_then(|dx| transform.dx_to_screen(dx))
            .is_some_and(|px| px > MARKER_MIN_SPACING)
    }

    fn draw_x_indicator(&self, surface: &mut dyn Surface, transform: &ChartTransform) {
        let Some(x) = self.x_indicator else {
            return;
        };
        let Some(px) = transform.x_to_screen(x) else {
            return;
        };

        surface.set_antialias(Antialias::None);
        surface.set_line_width(INDICATOR_THICKNESS);
        surface.set_color(INDICATOR_COLOR);
        surface.move_to(ScreenPoint::new(px, self.plot_rect.min.y));
        surface.line_to(ScreenPoint::new(px, self.plot_rect.max.y));
        surface.stroke();
    }

    fn draw_legend(&self, surface: &mut dyn Surface) {
        if self.series.is_empty() {
            return;
        }

        surface.set_antialias(Antialias::None);
        surface.set_font_size(LEGEND_FONT_SIZE);
        let font_height = surface.font_height();

        surface.save();
        surface.translate(
            self.plot_rect.min.x + LEGEND_POSITION.0,
            self.plot_rect.min.y + LEGEND_POSITION.1,
        );

        let mut legend_width = 0.0f32;
        for entry in &self.series {
            let label_width = surface.text_extents(&entry.name).0;
            legend_width = legend_width
                .max(LEGEND_MARGIN.0 + LEGEND_SWATCH_WIDTH + 3.0 + label_width + LEGEND_MARGIN.0);
        }
        let rows = self.series.len() as f32;
        let legend_height =
            LEGEND_MARGIN.1 * 2.0 + font_height * rows + LEGEND_LINE_SPACING * (rows - 1.0);

        let box_rect = ScreenRect::new(
            ScreenPoint::new(0.0, 0.0),
            ScreenPoint::new(legend_width, legend_height),
        );
        surface.set_color(LEGEND_FILL);
        surface.fill_rect(box_rect);
        surface.set_line_width(1.0);
        surface.set_color(LEGEND_BORDER);
        surface.stroke_rect(box_rect);

        surface.set_line_width(LEGEND_SWATCH_THICKNESS);
        surface.translate(LEGEND_MARGIN.0, LEGEND_MARGIN.1);

        for (index, entry) in self.series.iter().enumerate() {
            surface.set_color(self.color_for(index));
            surface.move_to(ScreenPoint::new(0.0, font_height / 2.0));
            surface.line_to(ScreenPoint::new(LEGEND_SWATCH_WIDTH, font_height / 2.0));
            surface.stroke();

            surface.translate(0.0, font_height);
            surface.show_text(
                ScreenPoint::new(LEGEND_SWATCH_WIDTH + 3.0, -3.0),
                &entry.name,
            );
            surface.translate(0.0, LEGEND_LINE_SPACING);
        }

        surface.restore();
    }

    /// Tick marks and labels, drawn outside the clip region.
    fn draw_ticks(&self, surface: &mut dyn Surface, transform: &ChartTransform) {
        let view = transform.viewport();

        surface.set_antialias(Antialias::None);
        surface.set_line_width(1.0);
        surface.set_font_size(TICK_FONT_SIZE);
        surface.set_color(TICK_COLOR);

        if self.show_x_ticks && let Some(interval) = self.x_interval {
            let mut ticks = Vec::new();
            for value in axis::tick_values(view.x, interval) {
                if let Some(px) = transform.x_to_screen(value) {
                    surface.move_to(ScreenPoint::new(px, self.plot_rect.max.y));
                    surface.line_to(ScreenPoint::new(px, self.plot_rect.max.y + TICK_LENGTH));
                    ticks.push((px, value));
                }
            }
            surface.stroke();

            for (px, value) in ticks {
                let label = axis::format_value(value, Some(interval));
                let (text_width, text_height) = surface.text_extents(&label);
                surface.show_text(
                    ScreenPoint::new(
                        px - text_width / 2.0,
                        self.plot_rect.max.y + TICK_LENGTH + 3.0 + text_height,
                    ),
                    &label,
                );
            }
        }

        if let Some(interval) = self.y_interval {
            let mut ticks = Vec::new();
            for value in axis::tick_values(view.y, interval) {
                if let Some(py) = transform.y_to_screen(value) {
                    surface.move_to(ScreenPoint::new(self.plot_rect.min.x - TICK_LENGTH, py));
                    surface.line_to(ScreenPoint::new(self.plot_rect.min.x, py));
                    ticks.push((py, value));
                }
            }
            surface.stroke();

            for (py, value) in ticks {
                let label = axis::format_value(value, Some(interval));
                let (text_width, text_height) = surface.text_extents(&label);
                surface.show_text(
                    ScreenPoint::new(
                        self.plot_rect.min.x - TICK_LENGTH - text_width - 3.0,
                        py + text_height / 2.0,
                    ),
                    &label,
                );
            }
        }
    }
}

impl Default for Chart {
    fn default() -> Self {
        Self::new()
    }
}

/// Chart handle shared between the renderer and loaders.
///
/// One exclusive lock guards both data mutation and painting, so a loader
/// append can never interleave with an in-progress paint traversal. Loader
/// appends take the lock for a single insertion only.
#[derive(Debug, Clone)]
pub struct SharedChart {
    inner: Arc<Mutex<Chart>>,
}

impl SharedChart {
    /// Wrap a chart for sharing.
    pub fn new(chart: Chart) -> Self {
        Self {
            inner: Arc::new(Mutex::new(chart)),
        }
    }

    /// Lock the chart for direct access.
    pub fn lock(&self) -> MutexGuard<'_, Chart> {
        self.inner.lock()
    }

    /// Paint under the chart lock.
    pub fn paint(&self, surface: &mut dyn Surface) {
        self.inner.lock().paint(surface);
    }

    /// Resize under the chart lock.
    pub fn set_size(&self, width: f32, height: f32) {
        self.inner.lock().set_size(width, height);
    }

    /// Set the desired x window under the chart lock.
    pub fn set_x_zoom(&self, zoom: Option<Range>) {
        self.inner.lock().set_x_zoom(zoom);
    }

    /// Move the playhead indicator under the chart lock.
    pub fn set_x_indicator(&self, x: Option<f64>) {
        self.inner.lock().set_x_indicator(x);
    }
}

impl Default for SharedChart {
    fn default() -> Self {
        Self::new(Chart::new())
    }
}

impl SeriesSink for SharedChart {
    fn append(&self, series: &str, x: f64, y: f64) {
        self.inner.lock().add_point(series, x, y);
    }

    fn clear(&self, series: &str) {
        self.inner.lock().clear_series(series);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RecordingSurface, SurfaceOp};

    fn three_point_chart() -> Chart {
        let mut chart = Chart::new();
        chart.set_size(400.0, 400.0);
        for (x, y) in [(0.0, 0.0), (1.0, 1.0), (2.0, 4.0)] {
            chart.add_point("sq", x, y);
        }
        chart
    }

    fn dashed_strokes(surface: &RecordingSurface) -> usize {
        surface
            .ops()
            .iter()
            .filter(|op| matches!(op, SurfaceOp::Stroke { dashed: true, .. }))
            .count()
    }

    #[test]
    fn paint_emits_border_grid_and_polyline() {
        let mut chart = three_point_chart();
        let mut surface = RecordingSurface::new();
        chart.paint(&mut surface);

        assert!(matches!(surface.ops()[0], SurfaceOp::StrokeRect { .. }));
        assert!(dashed_strokes(&surface) >= 1);

        let polyline = surface.ops().iter().find_map(|op| match op {
            SurfaceOp::Stroke {
                polylines,
                color,
                dashed: false,
                ..
            } if *color == PALETTE[0] && polylines.len() == 1 => Some(&polylines[0]),
            _ => None,
        });
        let polyline = polyline.expect("series polyline pass");
        assert_eq!(polyline.len(), 3);
    }

    #[test]
    fn displayed_viewport_contains_the_data() {
        let mut chart = three_point_chart();
        let mut surface = RecordingSurface::new();
        chart.paint(&mut surface);

        let view = chart.viewport().unwrap();
        assert!(view.x.min <= 0.0 && view.x.max >= 2.0);
        assert!(view.y.min <= 0.0 && view.y.max >= 4.0);

        let x_interval = chart.x_interval().unwrap();
        let y_interval = chart.y_interval().unwrap();
        assert!((view.x.min / x_interval - (view.x.min / x_interval).round()).abs() < 1e-9);
        assert!((view.y.max / y_interval - (view.y.max / y_interval).round()).abs() < 1e-9);
    }

    #[test]
    fn single_point_paints_only_the_border() {
        let mut chart = Chart::new();
        chart.set_size(400.0, 400.0);
        chart.add_point("lonely", 1.0, 1.0);

        let mut surface = RecordingSurface::new();
        chart.paint(&mut surface);

        assert_eq!(surface.ops().len(), 1);
        assert!(matches!(surface.ops()[0], SurfaceOp::StrokeRect { .. }));
    }

    #[test]
    fn empty_chart_paints_only_the_border() {
        let mut chart = Chart::new();
        chart.set_size(400.0, 400.0);
        let mut surface = RecordingSurface::new();
        chart.paint(&mut surface);
        assert_eq!(surface.ops().len(), 1);
    }

    #[test]
    fn palette_follows_insertion_order_and_offset() {
        let mut chart = Chart::new();
        for name in ["a", "b", "c"] {
            chart.add_point(name, 0.0, 0.0);
        }
        for (index, name) in ["a", "b", "c"].iter().enumerate() {
            assert_eq!(chart.series_color(name), Some(PALETTE[index]));
        }

        chart.set_palette_offset(2);
        assert_eq!(chart.series_color("a"), Some(PALETTE[2]));
        assert_eq!(chart.series_color("b"), Some(PALETTE[3]));

        chart.set_palette_offset(PALETTE.len() + 1);
        assert_eq!(chart.series_color("a"), Some(PALETTE[1]));
    }

    #[test]
    fn series_order_survives_reinsertion() {
        let mut chart = Chart::new();
        chart.add_point("first", 0.0, 0.0);
        chart.add_point("second", 0.0, 0.0);
        chart.add_point("first", 1.0, 1.0);

        let names: Vec<&str> = chart.series_names().collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn clearing_a_series_keeps_its_legend_slot() {
        let mut chart = Chart::new();
        chart.add_point("first", 0.0, 0.0);
        chart.add_point("second", 0.0, 0.0);
        chart.clear_series("first");

        let names: Vec<&str> = chart.series_names().collect();
        assert_eq!(names, ["first", "second"]);
        assert_eq!(chart.series_color("second"), Some(PALETTE[1]));
    }

    #[test]
    fn legend_lists_every_series() {
        let mut chart = three_point_chart();
        chart.add_point("other", 0.5, 2.0);
        let mut surface = RecordingSurface::new();
        chart.paint(&mut surface);

        let texts: Vec<&str> = surface.texts().collect();
        assert!(texts.contains(&"sq"));
        assert!(texts.contains(&"other"));
        assert!(
            surface
                .ops()
                .iter()
                .any(|op| matches!(op, SurfaceOp::FillRect { color, .. } if *color == LEGEND_FILL))
        );
    }

    #[test]
    fn indicator_draws_only_when_set() {
        let mut chart = three_point_chart();
        let mut surface = RecordingSurface::new();
        chart.paint(&mut surface);
        let without = surface
            .ops()
            .iter()
            .filter(
                |op| matches!(op, SurfaceOp::Stroke { color, .. } if *color == INDICATOR_COLOR),
            )
            .count();
        assert_eq!(without, 0);

        chart.set_x_indicator(Some(1.0));
        let mut surface = RecordingSurface::new();
        chart.paint(&mut surface);
        let with = surface
            .ops()
            .iter()
            .filter(
                |op| matches!(op, SurfaceOp::Stroke { color, .. } if *color == INDICATOR_COLOR),
            )
            .count();
        assert_eq!(with, 1);
    }

    #[test]
    fn dense_points_suppress_markers() {
        let mut chart = Chart::new();
        chart.set_size(400.0, 400.0);
        chart.add_point("dense", 0.0, 0.0);
        chart.add_point("dense", 0.0001, 1.0);
        chart.add_point("dense", 2.0, 4.0);

        let mut surface = RecordingSurface::new();
        chart.paint(&mut surface);

        let marker_pass = surface
            .ops()
            .iter()
            .any(|op| matches!(op, SurfaceOp::Stroke { width, .. } if *width == 1.5));
        assert!(!marker_pass);
    }

    #[test]
    fn spread_points_draw_markers() {
        let mut chart = three_point_chart();
        let mut surface = RecordingSurface::new();
        chart.paint(&mut surface);

        let marker_pass = surface.ops().iter().any(|op| {
            matches!(op, SurfaceOp::Stroke { width, polylines, .. }
                if *width == 1.5 && polylines.len() == 6)
        });
        assert!(marker_pass, "expected two cross strokes per point");
    }

    #[test]
    fn degenerate_y_axis_skips_its_gridlines_and_data() {
        let mut chart = Chart::new();
        chart.set_size(400.0, 400.0);
        chart.add_point("flat", 0.0, 3.0);
        chart.add_point("flat", 2.0, 3.0);

        let mut surface = RecordingSurface::new();
        chart.paint(&mut surface);

        // vertical x gridlines survive, horizontal y gridlines do not
        let has_horizontal_grid = surface.ops().iter().any(|op| {
            matches!(op, SurfaceOp::Stroke { dashed: true, polylines, .. }
                if polylines
                    .iter()
                    .any(|line| line.len() == 2 && line[0].y == line[1].y))
        });
        assert!(!has_horizontal_grid);
        assert!(dashed_strokes(&surface) >= 1);

        let data_pass = surface
            .ops()
            .iter()
            .any(|op| matches!(op, SurfaceOp::Stroke { color, .. } if *color == PALETTE[0]));
        assert!(!data_pass);
    }

    #[test]
    fn x_ticks_can_be_disabled() {
        let mut chart = three_point_chart();
        let strip_rect = chart.plot_rect();
        chart.set_show_x_ticks(false);
        assert!(chart.plot_rect().height() > strip_rect.height());

        let mut surface = RecordingSurface::new();
        chart.paint(&mut surface);

        // y tick labels may dip a few pixels under the plot edge; x tick
        // labels sit well below the tick marks
        let below_strip = chart.plot_rect().max.y + TICK_LENGTH + 3.0;
        let below_plot = surface.ops().iter().any(|op| match op {
            SurfaceOp::Text { position, .. } => position.y > below_strip,
            _ => false,
        });
        assert!(!below_plot, "no x tick labels expected below the plot");
    }

    #[test]
    fn tick_labels_land_outside_the_plot() {
        let mut chart = three_point_chart();
        let mut surface = RecordingSurface::new();
        chart.paint(&mut surface);
        let rect = chart.plot_rect();

        let x_labels = surface.ops().iter().any(|op| match op {
            SurfaceOp::Text { position, .. } => position.y > rect.max.y,
            _ => false,
        });
        let y_labels = surface.ops().iter().any(|op| match op {
            SurfaceOp::Text { position, .. } => position.x < rect.min.x,
            _ => false,
        });
        assert!(x_labels);
        assert!(y_labels);
    }

    #[test]
    fn shared_chart_appends_through_the_sink() {
        let shared = SharedChart::default();
        SeriesSink::append(&shared, "s", 0.0, 1.0);
        SeriesSink::append(&shared, "s", 1.0, 2.0);
        assert_eq!(shared.lock().num_points(), 2);

        SeriesSink::clear(&shared, "s");
        assert_eq!(shared.lock().num_points(), 0);
        assert_eq!(shared.lock().num_series(), 1);
    }
}
