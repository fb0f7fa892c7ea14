//! Canvas drawing through `genpdf`'s low-level renderer with an embedded TrueType family.
//!
//! Unlike the standard-font canvas, every glyph is measured from the loaded font files, so the
//! wrapping matches what is actually embedded in the document.

use genpdf::error::Error;
use genpdf::fonts::{FontCache, FontData, FontFamily};
use genpdf::render::Renderer;
use genpdf::style::{Color, Style};
use genpdf::{Mm, PaperSize, Position};

use super::{Canvas, CanvasError, FontStyle, PdfCapability, Rgb};

fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

fn backend(err: Error) -> CanvasError {
    CanvasError::Backend(err.to_string())
}

/// Capability holding a loaded font family; every canvas embeds a copy of it.
#[derive(Clone)]
pub struct EmbeddedCapability {
    name: String,
    family: FontFamily<FontData>,
}

impl EmbeddedCapability {
    /// Wraps a loaded family under the given display name.
    pub fn new(name: impl Into<String>, family: FontFamily<FontData>) -> Self {
        Self {
            name: name.into(),
            family,
        }
    }
}

impl PdfCapability for EmbeddedCapability {
    fn name(&self) -> &str {
        &self.name
    }

    fn open_canvas(&self, title: &str) -> Result<Box<dyn Canvas>, CanvasError> {
        Ok(Box::new(GenpdfCanvas::new(title, self.family.clone())?))
    }
}

/// A4 portrait canvas backed by [`genpdf::render::Renderer`].
pub struct GenpdfCanvas {
    renderer: Renderer,
    font_cache: FontCache,
    style: FontStyle,
    size: u8,
    text_color: Rgb,
    draw_color: Rgb,
}

impl GenpdfCanvas {
    /// Creates a renderer with one page and registers `family` as the document font.
    pub fn new(title: &str, family: FontFamily<FontData>) -> Result<Self, CanvasError> {
        let renderer = Renderer::new(PaperSize::A4, title).map_err(backend)?;
        let mut font_cache = FontCache::new(family);
        font_cache
            .load_pdf_fonts(&renderer)
            .map_err(|err| CanvasError::Fonts(err.to_string()))?;

        Ok(Self {
            renderer,
            font_cache,
            style: FontStyle::Normal,
            size: 16,
            text_color: Rgb::default(),
            draw_color: Rgb::default(),
        })
    }

    fn text_style(&self) -> Style {
        let Rgb(r, g, b) = self.text_color;
        let style = Style::new()
            .with_font_size(self.size)
            .with_color(Color::Rgb(r, g, b));
        match self.style {
            FontStyle::Normal => style,
            FontStyle::Bold => style.bold(),
            FontStyle::Italic => style.italic(),
            FontStyle::BoldItalic => style.bold().italic(),
        }
    }
}

impl Canvas for GenpdfCanvas {
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
        let Rgb(r, g, b) = self.draw_color;
        let area = self.renderer.last_page().first_layer().area();
        area.draw_line(
            vec![
                Position::new(mm_from_f64(x1), mm_from_f64(y1)),
                Position::new(mm_from_f64(x2), mm_from_f64(y2)),
            ],
            Style::new().with_color(Color::Rgb(r, g, b)),
        );
        Ok(())
    }

    fn text(&mut self, text: &str, x: f64, y: f64) -> Result<(), CanvasError> {
        if text.is_empty() {
            return Ok(());
        }
        let style = self.text_style();
        // genpdf positions the top of the line box; shift up so `y` is the baseline.
        let ascent = style.font(&self.font_cache).glyph_height(style.font_size());
        let top = mm_from_f64(y) - ascent;
        let area = self.renderer.last_page().first_layer().area();
        area.print_str(
            &self.font_cache,
            Position::new(mm_from_f64(x), top),
            style,
            text,
        )
        .map_err(backend)?;
        Ok(())
    }

    fn text_width(&self, text: &str) -> f64 {
        mm_to_f64(self.text_style().str_width(&self.font_cache, text))
    }

    fn add_page(&mut self) -> Result<(), CanvasError> {
        self.renderer.add_page(PaperSize::A4);
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.renderer.page_count()
    }

    fn finish(self: Box<Self>) -> Result<Vec<u8>, CanvasError> {
        let mut bytes = Vec::new();
        self.renderer
            .write(&mut bytes)
            .map_err(|err| CanvasError::Write(err.to_string()))?;
        Ok(bytes)
    }
}
