//! Paginated drawing surfaces the renderer writes to.
//!
//! A [`PdfCapability`] is the handle produced by the [`crate::loader::Loader`]: it knows how to open
//! a fresh [`Canvas`] for every render.  The canvas mirrors a small imperative drawing API (font,
//! colours, lines, positioned text, page breaks) using top-left based millimetre coordinates where
//! text is placed on its baseline.

pub mod builtin;
pub mod embedded;
pub mod metrics;
pub mod recording;

use thiserror::Error;

use crate::wrap;

pub use builtin::{BuiltinCanvas, BuiltinCapability};
pub use embedded::{EmbeddedCapability, GenpdfCanvas};
pub use recording::{DrawOp, RecordingCanvas, RecordingCapability};

/// Width of an A4 page in millimetres.
pub const A4_WIDTH_MM: f64 = 210.0;
/// Height of an A4 page in millimetres.
pub const A4_HEIGHT_MM: f64 = 297.0;

/// Failures raised by a drawing backend.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// The PDF backend rejected an operation.
    #[error("PDF backend error: {0}")]
    Backend(String),
    /// The fonts required by the canvas could not be registered with the document.
    #[error("Failed to register fonts with the document: {0}")]
    Fonts(String),
    /// Writing the finished document failed.
    #[error("Failed to write PDF output: {0}")]
    Write(String),
}

/// Weight/slant variant of the active font.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

/// An sRGB colour with 8-bit channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Shorthand for a neutral grey where all channels share the same value.
    pub const fn grey(level: u8) -> Self {
        Self(level, level, level)
    }

    /// Returns the channels scaled to `0.0..=1.0`.
    pub fn to_unit(self) -> (f64, f64, f64) {
        (
            f64::from(self.0) / 255.0,
            f64::from(self.1) / 255.0,
            f64::from(self.2) / 255.0,
        )
    }
}

/// Imperative drawing surface with manual pagination.
///
/// Coordinates are millimetres measured from the top-left corner of the current page.  Text is
/// positioned on its baseline, matching the behaviour of the common browser PDF libraries.
pub trait Canvas {
    /// Selects the weight/slant used by subsequent text operations.
    fn set_font_style(&mut self, style: FontStyle);

    /// Selects the font size in points used by subsequent text operations.
    fn set_font_size(&mut self, size: u8);

    /// Selects the fill colour used for text.
    fn set_text_color(&mut self, color: Rgb);

    /// Selects the stroke colour used for lines.
    fn set_draw_color(&mut self, color: Rgb);

    /// Draws a straight line on the current page.
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<(), CanvasError>;

    /// Draws a single line of text with its baseline at `(x, y)` on the current page.
    fn text(&mut self, text: &str, x: f64, y: f64) -> Result<(), CanvasError>;

    /// Measures `text` in millimetres using the active font and size.
    fn text_width(&self, text: &str) -> f64;

    /// Appends a new page and makes it current.
    fn add_page(&mut self) -> Result<(), CanvasError>;

    /// Number of pages created so far (at least one).
    fn page_count(&self) -> usize;

    /// Serializes the document into PDF bytes.
    fn finish(self: Box<Self>) -> Result<Vec<u8>, CanvasError>;

    /// Splits `text` into lines no wider than `max_width` using the active font metrics.
    fn split_text_to_size(&self, text: &str, max_width: f64) -> Vec<String> {
        wrap::split_text(text, max_width, |candidate| self.text_width(candidate))
    }
}

/// A loaded drawing capability able to open canvases.
///
/// Handles are shared behind an `Arc` by the loader, so implementations must be thread-safe and
/// cheap to reuse across renders.
pub trait PdfCapability: Send + Sync {
    /// Short human readable name, used in logs.
    fn name(&self) -> &str;

    /// Opens a new single-page A4 portrait canvas for a document titled `title`.
    fn open_canvas(&self, title: &str) -> Result<Box<dyn Canvas>, CanvasError>;
}
