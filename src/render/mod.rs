//! The drawing-surface seam.
//!
//! The chart never talks to a windowing toolkit directly; it draws against
//! [`Surface`], an immediate-mode 2D context the host supplies. The
//! [`RecordingSurface`] backend records passes for headless use and tests.

mod recorder;

pub use recorder::{RecordingSurface, SurfaceOp};

use crate::geom::{ScreenPoint, ScreenRect};

/// RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Replace the alpha channel.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
}

/// Antialiasing mode for subsequent drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Antialias {
    /// No antialiasing (crisp single-pixel grid and axis lines).
    None,
    /// Subpixel antialiasing (data polylines and markers).
    Subpixel,
}

/// Immediate-mode 2D drawing context supplied by the host.
///
/// Mirrors what the chart needs from a cairo-style context: stroke state,
/// path construction, rectangles, rectangular clipping under save/restore,
/// translation, and measured text at a settable font size.
///
/// State set through the `set_*` methods applies to subsequent operations
/// until changed. `save`/`restore` bracket clip and translation state only.
pub trait Surface {
    /// Push the current clip and translation state.
    fn save(&mut self);

    /// Restore the most recently saved state.
    fn restore(&mut self);

    /// Translate the coordinate origin.
    fn translate(&mut self, dx: f32, dy: f32);

    /// Intersect the clip region with a rectangle, until the matching restore.
    fn clip(&mut self, rect: ScreenRect);

    /// Set the antialiasing mode.
    fn set_antialias(&mut self, mode: Antialias);

    /// Set the stroke width in pixels.
    fn set_line_width(&mut self, width: f32);

    /// Set the dash pattern for strokes; an empty pattern is solid.
    fn set_dash(&mut self, pattern: &[f32]);

    /// Set the color for strokes, fills, and text.
    fn set_color(&mut self, color: Color);

    /// Set the font size for text measurement and drawing.
    fn set_font_size(&mut self, size: f32);

    /// Begin a new subpath at the point.
    fn move_to(&mut self, point: ScreenPoint);

    /// Extend the current subpath with a line.
    fn line_to(&mut self, point: ScreenPoint);

    /// Stroke and clear the current path.
    fn stroke(&mut self);

    /// Stroke a rectangle outline.
    fn stroke_rect(&mut self, rect: ScreenRect);

    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: ScreenRect);

    /// Width and height of `text` at the current font size.
    fn text_extents(&self, text: &str) -> (f32, f32);

    /// Line height at the current font size.
    fn font_height(&self) -> f32;

    /// Draw `text` with `position` at the left end of its baseline.
    fn show_text(&mut self, position: ScreenPoint, text: &str);
}
