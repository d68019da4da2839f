//! Coordinate transforms between data space and the plot rectangle.

use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::view::Viewport;

/// Affine map from a data-space viewport onto the plot's pixel rectangle.
///
/// Pixel rows grow downward, so the y mapping is inverted: increasing data y
/// moves toward smaller pixel rows. Each axis maps independently; a degenerate
/// axis (zero span) yields `None` from the mappings that need it, which lets
/// callers keep drawing along the surviving axis.
#[derive(Debug, Clone, Copy)]
pub struct ChartTransform {
    viewport: Viewport,
    screen: ScreenRect,
}

impl ChartTransform {
    /// Create a transform; `None` when the rectangle is empty or a bound is
    /// not finite.
    pub fn new(viewport: Viewport, screen: ScreenRect) -> Option<Self> {
        if !screen.is_valid() || !viewport.x.is_finite() || !viewport.y.is_finite() {
            return None;
        }
        Some(Self { viewport, screen })
    }

    /// Access the viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Access the pixel rectangle.
    pub fn screen(&self) -> ScreenRect {
        self.screen
    }

    /// Map a data x value to a pixel column.
    pub fn x_to_screen(&self, x: f64) -> Option<f32> {
        let dx = self.dx_to_screen(x - self.viewport.x.min)?;
        Some(self.screen.min.x + dx)
    }

    /// Map a data y value to a pixel row.
    pub fn y_to_screen(&self, y: f64) -> Option<f32> {
        let dy = self.dy_to_screen(y - self.viewport.y.min)?;
        Some(self.screen.max.y - dy)
    }

    /// Map a data point into screen space.
    pub fn point_to_screen(&self, point: Point) -> Option<ScreenPoint> {
        Some(ScreenPoint::new(
            self.x_to_screen(point.x)?,
            self.y_to_screen(point.y)?,
        ))
    }

    /// Map an x distance to pixels (no translation).
    pub fn dx_to_screen(&self, dx: f64) -> Option<f32> {
        let span = self.viewport.x.span();
        if span <= 0.0 {
            return None;
        }
        Some((dx / span * f64::from(self.screen.width())) as f32)
    }

    /// Map a y distance to pixels (no translation).
    pub fn dy_to_screen(&self, dy: f64) -> Option<f32> {
        let span = self.viewport.y.span();
        if span <= 0.0 {
            return None;
        }
        Some((dy / span * f64::from(self.screen.height())) as f32)
    }

    /// Map a pixel column back to a data x value.
    pub fn x_to_data(&self, px: f32) -> Option<f64> {
        let span = self.viewport.x.span();
        if span <= 0.0 {
            return None;
        }
        let norm = f64::from(px - self.screen.min.x) / f64::from(self.screen.width());
        Some(self.viewport.x.min + norm * span)
    }

    /// Map a pixel row back to a data y value.
    pub fn y_to_data(&self, py: f32) -> Option<f64> {
        let span = self.viewport.y.span();
        if span <= 0.0 {
            return None;
        }
        let norm = f64::from(self.screen.max.y - py) / f64::from(self.screen.height());
        Some(self.viewport.y.min + norm * span)
    }

    /// Map a screen point back into data space.
    pub fn point_to_data(&self, point: ScreenPoint) -> Option<Point> {
        Some(Point::new(self.x_to_data(point.x)?, self.y_to_data(point.y)?))
    }
}
