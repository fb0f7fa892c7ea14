//! Canvas backed by `printpdf` using the non-embedded standard Helvetica faces.

use std::io::BufWriter;

use printpdf::indices::{PdfLayerIndex, PdfPageIndex};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point,
};

use super::metrics::helvetica_width;
use super::{Canvas, CanvasError, FontStyle, PdfCapability, Rgb, A4_HEIGHT_MM, A4_WIDTH_MM};

const LAYER_NAME: &str = "Layer 1";
const LINE_THICKNESS_PT: f64 = 0.2;

struct HelveticaFonts {
    normal: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    bold_italic: IndirectFontRef,
}

impl HelveticaFonts {
    fn register(document: &PdfDocumentReference) -> Result<Self, CanvasError> {
        let add = |font: BuiltinFont| {
            document
                .add_builtin_font(font)
                .map_err(|err| CanvasError::Fonts(err.to_string()))
        };

        Ok(Self {
            normal: add(BuiltinFont::Helvetica)?,
            bold: add(BuiltinFont::HelveticaBold)?,
            italic: add(BuiltinFont::HelveticaOblique)?,
            bold_italic: add(BuiltinFont::HelveticaBoldOblique)?,
        })
    }

    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Normal => &self.normal,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
            FontStyle::BoldItalic => &self.bold_italic,
        }
    }
}

/// Capability that is always present: the standard fonts need no loading.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinCapability;

impl PdfCapability for BuiltinCapability {
    fn name(&self) -> &str {
        "builtin-helvetica"
    }

    fn open_canvas(&self, title: &str) -> Result<Box<dyn Canvas>, CanvasError> {
        Ok(Box::new(BuiltinCanvas::new(title)?))
    }
}

/// A4 portrait canvas drawing with `printpdf` primitives.
pub struct BuiltinCanvas {
    document: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    fonts: HelveticaFonts,
    style: FontStyle,
    size: u8,
    text_color: Rgb,
    draw_color: Rgb,
}

impl BuiltinCanvas {
    /// Creates a document with a single empty page.
    pub fn new(title: &str) -> Result<Self, CanvasError> {
        let (document, page, layer) =
            PdfDocument::new(title, Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), LAYER_NAME);
        let fonts = HelveticaFonts::register(&document)?;

        Ok(Self {
            document,
            pages: vec![(page, layer)],
            fonts,
            style: FontStyle::Normal,
            size: 16,
            text_color: Rgb::default(),
            draw_color: Rgb::default(),
        })
    }

    fn current_layer(&self) -> Result<PdfLayerReference, CanvasError> {
        let (page, layer) = self
            .pages
            .last()
            .cloned()
            .ok_or_else(|| CanvasError::Backend("document has no pages".to_owned()))?;
        Ok(self.document.get_page(page).get_layer(layer))
    }
}

fn pdf_color(color: Rgb) -> Color {
    let (r, g, b) = color.to_unit();
    Color::Rgb(printpdf::Rgb::new(r, g, b, None))
}

// printpdf measures from the bottom edge.
fn flip(y: f64) -> Mm {
    Mm(A4_HEIGHT_MM - y)
}

impl Canvas for BuiltinCanvas {
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
        let layer = self.current_layer()?;
        layer.set_outline_color(pdf_color(self.draw_color));
        layer.set_outline_thickness(LINE_THICKNESS_PT);
        layer.add_shape(Line {
            points: vec![
                (Point::new(Mm(x1), flip(y1)), false),
                (Point::new(Mm(x2), flip(y2)), false),
            ],
            is_closed: false,
            has_fill: false,
            has_stroke: true,
            is_clipping_path: false,
        });
        Ok(())
    }

    fn text(&mut self, text: &str, x: f64, y: f64) -> Result<(), CanvasError> {
        if text.is_empty() {
            return Ok(());
        }
        let layer = self.current_layer()?;
        layer.set_fill_color(pdf_color(self.text_color));
        layer.use_text(
            text,
            f64::from(self.size),
            Mm(x),
            flip(y),
            self.fonts.get(self.style),
        );
        Ok(())
    }

    fn text_width(&self, text: &str) -> f64 {
        helvetica_width(text, self.style, self.size)
    }

    fn add_page(&mut self) -> Result<(), CanvasError> {
        let (page, layer) = self
            .document
            .add_page(Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), LAYER_NAME);
        self.pages.push((page, layer));
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn finish(self: Box<Self>) -> Result<Vec<u8>, CanvasError> {
        let mut bytes = Vec::new();
        {
            let mut writer = BufWriter::new(&mut bytes);
            self.document
                .save(&mut writer)
                .map_err(|err| CanvasError::Write(err.to_string()))?;
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_one_page_and_counts_additions() {
        let mut canvas = BuiltinCanvas::new("test").expect("open canvas");
        assert_eq!(canvas.page_count(), 1);
        canvas.add_page().expect("add page");
        assert_eq!(canvas.page_count(), 2);
    }

    #[test]
    fn finished_output_is_a_pdf() {
        let mut canvas = Box::new(BuiltinCanvas::new("test").expect("open canvas"));
        canvas.set_font_size(12);
        canvas.text("Gracas", 20.0, 20.0).expect("draw text");
        canvas.line(20.0, 25.0, 190.0, 25.0).expect("draw line");
        let bytes = canvas.finish().expect("finish");
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn measures_with_the_selected_style() {
        let mut canvas = BuiltinCanvas::new("test").expect("open canvas");
        canvas.set_font_size(11);
        let regular = canvas.text_width("Versao 2 Minutos");
        canvas.set_font_style(FontStyle::Bold);
        assert!(canvas.text_width("Versao 2 Minutos") > regular);
    }
}
