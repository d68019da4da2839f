//! Headless surface that records draw passes.

use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::{Antialias, Color, Surface};

// Fixed-metric font: good enough for layout without a text system.
const GLYPH_ASPECT: f32 = 0.6;
const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// One recorded drawing pass.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    /// Clip pushed onto the state stack.
    Clip(ScreenRect),
    /// A stroked path; each inner vec is one polyline started by a `move_to`.
    Stroke {
        /// Polylines in the stroked path.
        polylines: Vec<Vec<ScreenPoint>>,
        /// Stroke color.
        color: Color,
        /// Stroke width in pixels.
        width: f32,
        /// Whether a dash pattern was active.
        dashed: bool,
    },
    /// A stroked rectangle outline.
    StrokeRect {
        /// Rectangle bounds.
        rect: ScreenRect,
        /// Stroke color.
        color: Color,
    },
    /// A filled rectangle.
    FillRect {
        /// Rectangle bounds.
        rect: ScreenRect,
        /// Fill color.
        color: Color,
    },
    /// Drawn text.
    Text {
        /// Left end of the baseline.
        position: ScreenPoint,
        /// Text content.
        text: String,
        /// Font size in pixels.
        size: f32,
        /// Text color.
        color: Color,
    },
}

/// A [`Surface`] that records operations instead of drawing.
///
/// Translation is folded into the recorded coordinates, so assertions see
/// absolute positions. Text is measured with a fixed-metric font.
#[derive(Debug)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
    stack: Vec<(f32, f32)>,
    offset: (f32, f32),
    path: Vec<Vec<ScreenPoint>>,
    color: Color,
    line_width: f32,
    dashed: bool,
    font_size: f32,
}

impl RecordingSurface {
    /// Create an empty recording surface.
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            stack: Vec::new(),
            offset: (0.0, 0.0),
            path: Vec::new(),
            color: Color::BLACK,
            line_width: 1.0,
            dashed: false,
            font_size: 12.0,
        }
    }

    /// Access the recorded operations.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Recorded stroke passes.
    pub fn strokes(&self) -> impl Iterator<Item = &SurfaceOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::Stroke { .. }))
    }

    /// Recorded text passes.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            SurfaceOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    fn shift(&self, point: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(point.x + self.offset.0, point.y + self.offset.1)
    }

    fn shift_rect(&self, rect: ScreenRect) -> ScreenRect {
        ScreenRect::new(self.shift(rect.min), self.shift(rect.max))
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for RecordingSurface {
    fn save(&mut self) {
        self.stack.push(self.offset);
    }

    fn restore(&mut self) {
        if let Some(offset) = self.stack.pop() {
            self.offset = offset;
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.offset.0 += dx;
        self.offset.1 += dy;
    }

    fn clip(&mut self, rect: ScreenRect) {
        let rect = self.shift_rect(rect);
        self.ops.push(SurfaceOp::Clip(rect));
    }

    fn set_antialias(&mut self, _mode: Antialias) {}

    fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    fn set_dash(&mut self, pattern: &[f32]) {
        self.dashed = !pattern.is_empty();
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    fn move_to(&mut self, point: ScreenPoint) {
        let point = self.shift(point);
        self.path.push(vec![point]);
    }

    fn line_to(&mut self, point: ScreenPoint) {
        let point = self.shift(point);
        match self.path.last_mut() {
            Some(polyline) => polyline.push(point),
            None => self.path.push(vec![point]),
        }
    }

    fn stroke(&mut self) {
        if self.path.is_empty() {
            return;
        }
        self.ops.push(SurfaceOp::Stroke {
            polylines: std::mem::take(&mut self.path),
            color: self.color,
            width: self.line_width,
            dashed: self.dashed,
        });
    }

    fn stroke_rect(&mut self, rect: ScreenRect) {
        let rect = self.shift_rect(rect);
        self.ops.push(SurfaceOp::StrokeRect {
            rect,
            color: self.color,
        });
    }

    fn fill_rect(&mut self, rect: ScreenRect) {
        let rect = self.shift_rect(rect);
        self.ops.push(SurfaceOp::FillRect {
            rect,
            color: self.color,
        });
    }

    fn text_extents(&self, text: &str) -> (f32, f32) {
        let width = text.chars().count() as f32 * self.font_size * GLYPH_ASPECT;
        (width, self.font_size)
    }

    fn font_height(&self) -> f32 {
        self.font_size * LINE_HEIGHT_FACTOR
    }

    fn show_text(&mut self, position: ScreenPoint, text: &str) {
        let position = self.shift(position);
        self.ops.push(SurfaceOp::Text {
            position,
            text: text.to_string(),
            size: self.font_size,
            color: self.color,
        });
    }
}
