//! A canvas that records drawing operations instead of producing a PDF.
//!
//! Measurements use the standard Helvetica widths, so a recorded plan paginates exactly like the
//! [`BuiltinCanvas`](super::BuiltinCanvas).

use std::fmt;

use super::metrics::helvetica_width;
use super::{Canvas, CanvasError, FontStyle, PdfCapability, Rgb};

/// One recorded drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// A line of text placed on `page` (1-based).
    Text {
        page: usize,
        x: f64,
        y: f64,
        size: u8,
        style: FontStyle,
        color: Rgb,
        text: String,
    },
    /// A straight stroke on `page` (1-based).
    Line {
        page: usize,
        from: (f64, f64),
        to: (f64, f64),
        color: Rgb,
    },
    /// A page break; `page` is the number of the newly created page.
    PageBreak { page: usize },
}

impl fmt::Display for DrawOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text {
                page, y, size, text, ..
            } => write!(f, "p{page} y={y:>6.1} {size:>2}pt  {text}"),
            Self::Line { page, from, to, .. } => write!(
                f,
                "p{page} y={:>6.1} line {:.0}..{:.0}",
                from.1, from.0, to.0
            ),
            Self::PageBreak { page } => write!(f, "--- page {page} ---"),
        }
    }
}

/// Capability handing out [`RecordingCanvas`] instances.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecordingCapability;

impl PdfCapability for RecordingCapability {
    fn name(&self) -> &str {
        "recording"
    }

    fn open_canvas(&self, _title: &str) -> Result<Box<dyn Canvas>, CanvasError> {
        Ok(Box::new(RecordingCanvas::new()))
    }
}

/// In-memory canvas keeping the list of [`DrawOp`] values.
#[derive(Clone, Debug)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
    pages: usize,
    style: FontStyle,
    size: u8,
    text_color: Rgb,
    draw_color: Rgb,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingCanvas {
    /// Creates an empty single-page recording.
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            pages: 1,
            style: FontStyle::Normal,
            size: 16,
            text_color: Rgb::default(),
            draw_color: Rgb::default(),
        }
    }

    /// Returns the operations recorded so far.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Returns every text line together with the page it was placed on.
    pub fn text_pages(&self) -> Vec<(usize, &str)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { page, text, .. } => Some((*page, text.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Returns the page of the first text line equal to `needle`.
    pub fn page_of(&self, needle: &str) -> Option<usize> {
        self.text_pages()
            .into_iter()
            .find(|(_, text)| *text == needle)
            .map(|(page, _)| page)
    }
}

impl Canvas for RecordingCanvas {
    fn set_font_style(&mut self, style: FontStyle) {
        self.style = style;
    }

    fn set_font_size(&mut self, size: u8) {
        self.size = size;
    }

    fn set_text_color(&mut self, color: Rgb) {
        self.text_color = color;
    }

    fn set_draw_color(&mut self, color: Rgb) {
        self.draw_color = color;
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<(), CanvasError> {
        self.ops.push(DrawOp::Line {
            page: self.pages,
            from: (x1, y1),
            to: (x2, y2),
            color: self.draw_color,
        });
        Ok(())
    }

    fn text(&mut self, text: &str, x: f64, y: f64) -> Result<(), CanvasError> {
        self.ops.push(DrawOp::Text {
            page: self.pages,
            x,
            y,
            size: self.size,
            style: self.style,
            color: self.text_color,
            text: text.to_owned(),
        });
        Ok(())
    }

    fn text_width(&self, text: &str) -> f64 {
        helvetica_width(text, self.style, self.size)
    }

    fn add_page(&mut self) -> Result<(), CanvasError> {
        self.pages += 1;
        self.ops.push(DrawOp::PageBreak { page: self.pages });
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn finish(self: Box<Self>) -> Result<Vec<u8>, CanvasError> {
        let listing = self
            .ops
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        Ok(listing.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_page_of_each_line() {
        let mut canvas = RecordingCanvas::new();
        canvas.text("one", 20.0, 20.0).unwrap();
        canvas.add_page().unwrap();
        canvas.text("two", 20.0, 20.0).unwrap();

        assert_eq!(canvas.text_pages(), vec![(1, "one"), (2, "two")]);
        assert_eq!(canvas.page_of("two"), Some(2));
        assert_eq!(canvas.page_of("three"), None);
    }

    #[test]
    fn finish_lists_operations() {
        let mut canvas = Box::new(RecordingCanvas::new());
        canvas.set_font_size(12);
        canvas.text("Gerando", 20.0, 30.0).unwrap();
        canvas.add_page().unwrap();
        let listing = String::from_utf8(canvas.finish().unwrap()).unwrap();
        assert_eq!(listing, "p1 y=  30.0 12pt  Gerando\n--- page 2 ---");
    }
}
