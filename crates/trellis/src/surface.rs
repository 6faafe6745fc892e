//! The drawing surface abstraction.
//!
//! Widgets never talk to a GPU or a windowing system directly. They draw
//! through a [`DrawSurface`], which a platform backend implements on top of
//! its vector renderer. All coordinates are absolute screen pixels.
//!
//! [`RecordingSurface`] is a headless implementation that measures text with
//! a fixed-advance rule and records every command, which is what the tests
//! and the headless demo use.

use std::sync::Arc;

use parking_lot::Mutex;
use trellis_core::{Color, Rect, Vector2i};

/// A renderer that widgets draw into.
///
/// Implementations are expected to be cheap to call repeatedly; the draw
/// pass walks the whole visible tree every frame.
pub trait DrawSurface {
    // =========================================================================
    // Measurement
    // =========================================================================

    /// Measure `text` rendered with `font` at `size` pixels.
    fn text_bounds(&self, font: &str, size: i32, text: &str) -> Vector2i;

    // =========================================================================
    // Shapes
    // =========================================================================

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Fill a rectangle with rounded corners.
    ///
    /// Backends without rounded primitives can rely on the square default.
    fn fill_rounded_rect(&mut self, rect: Rect, radius: i32, color: Color) {
        let _ = radius;
        self.fill_rect(rect, color);
    }

    /// Stroke the outline of a rectangle with a one pixel line.
    fn stroke_rect(&mut self, rect: Rect, color: Color);

    /// Draw a one pixel line.
    fn draw_line(&mut self, from: Vector2i, to: Vector2i, color: Color);

    // =========================================================================
    // Text and images
    // =========================================================================

    /// Draw text with its top-left corner at `pos`.
    fn draw_text(&mut self, pos: Vector2i, font: &str, size: i32, text: &str, color: Color);

    /// Blit a CPU-side RGBA buffer with its top-left corner at `pos`.
    fn draw_pixels(&mut self, pos: Vector2i, pixels: &PixelBuffer);

    // =========================================================================
    // Clipping
    // =========================================================================

    /// Intersect the clip region with `rect` until the matching [`pop_clip`](Self::pop_clip).
    fn push_clip(&mut self, rect: Rect);

    /// Restore the clip region saved by the last [`push_clip`](Self::push_clip).
    fn pop_clip(&mut self);
}

// =========================================================================
// PixelBuffer
// =========================================================================

/// A straight-alpha RGBA8 image held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: i32,
    height: i32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a fully transparent buffer. Negative dimensions are treated as zero.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            pixels: vec![0; byte_len(width, height)],
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Buffer dimensions as a vector.
    #[inline]
    pub fn size(&self) -> Vector2i {
        Vector2i::new(self.width, self.height)
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Read one pixel, or `None` outside the buffer.
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let offset = self.offset(x, y)?;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[offset..offset + 4]);
        Some(rgba)
    }

    /// Overwrite one pixel. Writes outside the buffer are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(offset) = self.offset(x, y) {
            self.pixels[offset..offset + 4].copy_from_slice(&color.to_rgba8());
        }
    }

    /// Fill a rectangle, clipped to the buffer.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let clipped = rect.intersect(&Rect::new(0, 0, self.width, self.height));
        for y in clipped.top()..clipped.bottom() {
            for x in clipped.left()..clipped.right() {
                self.set_pixel(x, y, color);
            }
        }
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(byte_len(self.width, y) + x as usize * 4)
    }
}

/// Bytes in `height` rows of `width` RGBA pixels, for non-negative sizes.
fn byte_len(width: i32, height: i32) -> usize {
    width as usize * height as usize * 4
}

// =========================================================================
// RecordingSurface
// =========================================================================

/// A draw call captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { rect: Rect, color: Color },
    FillRoundedRect { rect: Rect, radius: i32, color: Color },
    StrokeRect { rect: Rect, color: Color },
    Line { from: Vector2i, to: Vector2i, color: Color },
    Text {
        pos: Vector2i,
        font: String,
        size: i32,
        text: String,
        color: Color,
    },
    Pixels { pos: Vector2i, size: Vector2i },
    PushClip(Rect),
    PopClip,
}

impl DrawCommand {
    /// The text of a [`DrawCommand::Text`], if this is one.
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawCommand::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// A headless surface that records commands instead of rasterizing.
///
/// Text is measured as `size / 2` pixels per character and `size` pixels
/// high, so layouts over it are deterministic.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Arc<Mutex<Vec<DrawCommand>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A shared handle to the command log.
    ///
    /// The handle stays valid after the surface is moved into a screen.
    pub fn commands_handle(&self) -> Arc<Mutex<Vec<DrawCommand>>> {
        Arc::clone(&self.commands)
    }

    /// Copy out the recorded commands.
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.commands.lock().clone()
    }

    /// Discard all recorded commands.
    pub fn clear(&self) {
        self.commands.lock().clear();
    }

    fn record(&self, command: DrawCommand) {
        self.commands.lock().push(command);
    }
}

impl DrawSurface for RecordingSurface {
    fn text_bounds(&self, _font: &str, size: i32, text: &str) -> Vector2i {
        Vector2i::new(text.chars().count() as i32 * size / 2, size)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.record(DrawCommand::FillRect { rect, color });
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: i32, color: Color) {
        self.record(DrawCommand::FillRoundedRect {
            rect,
            radius,
            color,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        self.record(DrawCommand::StrokeRect { rect, color });
    }

    fn draw_line(&mut self, from: Vector2i, to: Vector2i, color: Color) {
        self.record(DrawCommand::Line { from, to, color });
    }

    fn draw_text(&mut self, pos: Vector2i, font: &str, size: i32, text: &str, color: Color) {
        self.record(DrawCommand::Text {
            pos,
            font: font.to_owned(),
            size,
            text: text.to_owned(),
            color,
        });
    }

    fn draw_pixels(&mut self, pos: Vector2i, pixels: &PixelBuffer) {
        self.record(DrawCommand::Pixels {
            pos,
            size: pixels.size(),
        });
    }

    fn push_clip(&mut self, rect: Rect) {
        self.record(DrawCommand::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        self.record(DrawCommand::PopClip);
    }
}

static_assertions::assert_impl_all!(RecordingSurface: Send, Sync);
static_assertions::assert_impl_all!(PixelBuffer: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_text_bounds() {
        let surface = RecordingSurface::new();
        assert_eq!(surface.text_bounds("sans", 16, "abcd"), Vector2i::new(32, 16));
        assert_eq!(surface.text_bounds("sans", 16, ""), Vector2i::new(0, 16));
    }

    #[test]
    fn test_recording_shares_log() {
        let mut surface = RecordingSurface::new();
        let handle = surface.commands_handle();
        surface.fill_rect(Rect::new(0, 0, 4, 4), Color::BLACK);
        surface.draw_text(Vector2i::ZERO, "sans", 12, "hi", Color::WHITE);
        let log = handle.lock();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].text(), Some("hi"));
    }

    #[test]
    fn test_pixel_buffer_fill_clips() {
        let mut buffer = PixelBuffer::new(4, 3);
        buffer.fill_rect(Rect::new(2, 1, 10, 10), Color::WHITE);
        assert_eq!(buffer.pixel(3, 2), Some([255, 255, 255, 255]));
        assert_eq!(buffer.pixel(1, 1), Some([0, 0, 0, 0]));
        assert_eq!(buffer.pixel(4, 0), None);
    }

    #[test]
    fn test_byte_len_exceeds_i32() {
        assert_eq!(byte_len(50_000, 20_000), 4_000_000_000);
        assert_eq!(byte_len(4, 3), 48);
        assert_eq!(PixelBuffer::new(-3, 5).as_bytes().len(), 0);
    }
}
