//! Single-pass renderer streaming a [`Document`] onto a [`Canvas`].
//!
//! Pagination is purely cumulative: the cursor advances by fixed steps per wrapped line and a new
//! page is started whenever the cursor has moved past the chapter or prayer limit of the
//! [`LayoutConfig`].  No glyph measurement happens beyond the canvas' wrapping primitive.

use log::debug;
use thiserror::Error;

use crate::canvas::{Canvas, CanvasError};
use crate::content::Document;
use crate::layout::{LayoutConfig, TextStyle};

/// Failures raised while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The canvas rejected a drawing operation or could not serialize the document.
    #[error("Rendering failed: {0}")]
    Canvas(#[from] CanvasError),
}

/// Outcome of a render pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Total number of pages.
    pub pages: usize,
    /// 1-based page on which each chapter heading was placed.
    pub chapter_pages: Vec<usize>,
}

struct Cursor<'a> {
    canvas: &'a mut dyn Canvas,
    layout: &'a LayoutConfig,
    y: f64,
}

impl<'a> Cursor<'a> {
    fn new(canvas: &'a mut dyn Canvas, layout: &'a LayoutConfig) -> Self {
        Self {
            canvas,
            layout,
            y: layout.margin,
        }
    }

    fn page(&self) -> usize {
        self.canvas.page_count()
    }

    fn break_page_after(&mut self, limit: f64) -> Result<(), CanvasError> {
        if self.y > limit {
            self.canvas.add_page()?;
            debug!(
                "y={:.1} passed {:.1}, continuing on page {}",
                self.y,
                limit,
                self.page()
            );
            self.y = self.layout.margin;
        }
        Ok(())
    }

    fn apply(&mut self, style: &TextStyle) {
        self.canvas.set_font_size(style.size);
        self.canvas.set_font_style(style.font);
        self.canvas.set_text_color(style.color);
    }

    fn single_line(
        &mut self,
        text: &str,
        style: &TextStyle,
        advance: f64,
    ) -> Result<(), CanvasError> {
        self.apply(style);
        self.canvas.text(text, self.layout.margin, self.y)?;
        self.y += advance;
        Ok(())
    }

    /// Draws `text` wrapped to the content width and returns the number of lines.
    ///
    /// Lines are drawn `line_step` apart, the same step the caller advances the cursor by, rather
    /// than at a leading derived from the font size.
    fn wrapped(
        &mut self,
        text: &str,
        style: &TextStyle,
        line_step: f64,
    ) -> Result<usize, CanvasError> {
        self.apply(style);
        let lines = self
            .canvas
            .split_text_to_size(text, self.layout.content_width);
        for (index, line) in lines.iter().enumerate() {
            let y = self.y + index as f64 * line_step;
            self.canvas.text(line, self.layout.margin, y)?;
        }
        Ok(lines.len())
    }

    fn rule(&mut self) -> Result<(), CanvasError> {
        self.canvas.set_draw_color(self.layout.theme.separator);
        self.canvas
            .line(self.layout.margin, self.y, self.layout.rule_end, self.y)?;
        self.y += self.layout.after_rule;
        Ok(())
    }
}

/// Renders `document` onto `canvas` using `layout`.
///
/// The canvas is expected to be freshly opened (one empty page).  On success the canvas holds the
/// complete document and can be finished by the caller.
pub fn render(
    document: &Document<'_>,
    canvas: &mut dyn Canvas,
    layout: &LayoutConfig,
) -> Result<RenderSummary, RenderError> {
    let theme = layout.theme;
    let mut cursor = Cursor::new(canvas, layout);
    let mut chapter_pages = Vec::with_capacity(document.chapters.len());

    cursor.single_line(document.title, &theme.title, layout.after_title)?;
    cursor.single_line(document.subtitle, &theme.subtitle, layout.after_subtitle)?;
    cursor.rule()?;

    for (index, chapter) in document.chapters.iter().enumerate() {
        cursor.break_page_after(layout.chapter_limit())?;
        chapter_pages.push(cursor.page());

        let heading = document.chapter_heading(index).unwrap_or_default();
        cursor.single_line(&heading, &theme.chapter_heading, layout.after_heading)?;

        let verse_lines = cursor.wrapped(chapter.verse, &theme.verse, layout.verse_line)?;
        cursor.y += verse_lines as f64 * layout.verse_line + layout.after_verse;

        for prayer in chapter.prayers {
            cursor.break_page_after(layout.prayer_limit())?;
            cursor.single_line(prayer.title, &theme.prayer_title, layout.after_prayer_title)?;
            let body_lines = cursor.wrapped(prayer.text, &theme.prayer_body, layout.body_line)?;
            cursor.y += body_lines as f64 * layout.body_line + layout.after_prayer;
        }

        cursor.y += layout.after_chapter;
    }

    cursor.break_page_after(layout.prayer_limit())?;
    cursor.rule()?;
    cursor.wrapped(document.closing, &theme.closing, layout.closing_line)?;

    let summary = RenderSummary {
        pages: cursor.page(),
        chapter_pages,
    };
    debug!("rendered {} page(s)", summary.pages);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawOp, RecordingCanvas};
    use crate::content::{self, Chapter, Prayer};

    fn plan(document: &Document<'_>, layout: &LayoutConfig) -> (RecordingCanvas, RenderSummary) {
        let mut canvas = RecordingCanvas::new();
        let summary = render(document, &mut canvas, layout).expect("render");
        (canvas, summary)
    }

    #[test]
    fn guide_renders_every_block_in_order() {
        let guide = content::guide();
        let (canvas, summary) = plan(guide, &LayoutConfig::default());
        let texts: Vec<&str> = canvas.text_pages().into_iter().map(|(_, text)| text).collect();

        assert_eq!(texts.first(), Some(&"A Regra das 3 Ancoras"));
        assert_eq!(texts.get(1), Some(&"Guia de Oracoes Diarias"));
        assert!(texts.contains(&"Capitulo 1: Ancora da Manha (O Despertar na Graca)"));
        assert!(texts.contains(&"Versao 7 Minutos - Exame de Consciencia Gentil"));
        assert_eq!(summary.chapter_pages.len(), 3);
        assert_eq!(summary.pages, canvas.page_count());
    }

    #[test]
    fn guide_title_block_uses_the_accent_style() {
        let (canvas, _) = plan(content::guide(), &LayoutConfig::default());
        match canvas.ops().first() {
            Some(DrawOp::Text { y, size, color, .. }) => {
                assert_eq!(*y, 20.0);
                assert_eq!(*size, 20);
                assert_eq!(*color, crate::layout::ACCENT);
            }
            other => panic!("unexpected first op: {other:?}"),
        }
        let rule = canvas
            .ops()
            .iter()
            .find(|op| matches!(op, DrawOp::Line { .. }));
        assert_eq!(
            rule,
            Some(&DrawOp::Line {
                page: 1,
                from: (20.0, 45.0),
                to: (190.0, 45.0),
                color: crate::layout::ACCENT,
            })
        );
    }

    #[test]
    fn guide_spills_onto_a_second_page() {
        let (canvas, summary) = plan(content::guide(), &LayoutConfig::default());
        assert_eq!(summary.chapter_pages[0], 1);
        assert!(summary.pages >= 2);
        let last_chapter = summary.chapter_pages[2];
        assert!(last_chapter >= summary.chapter_pages[1]);
        assert_eq!(
            canvas.page_of("Capitulo 3: Ancora da Noite (O Pouso Seguro)"),
            Some(last_chapter)
        );
    }

    #[test]
    fn rendering_twice_assigns_text_to_the_same_pages() {
        let layout = LayoutConfig::default();
        let (first, first_summary) = plan(content::guide(), &layout);
        let (second, second_summary) = plan(content::guide(), &layout);
        assert_eq!(first_summary, second_summary);
        assert_eq!(first.ops(), second.ops());
    }

    #[test]
    fn long_verse_breaks_the_page_before_the_next_heading() {
        let long_verse = "palavra ".repeat(1200);
        let prayers = [Prayer {
            title: "Breve",
            text: "Amem.",
        }];
        let chapters = [
            Chapter {
                title: "Primeira",
                verse: &long_verse,
                prayers: &[],
            },
            Chapter {
                title: "Segunda",
                verse: "curto",
                prayers: &prayers,
            },
        ];
        let document = Document {
            title: "Titulo",
            subtitle: "Subtitulo",
            chapters: &chapters,
            closing: "Fim",
        };

        let layout = LayoutConfig::default();
        let (canvas, summary) = plan(&document, &layout);

        // The verse itself never splits, so page 1 ends past the chapter limit.
        let last_verse_y = canvas
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { page: 1, y, text, .. } if text.starts_with("palavra") => Some(*y),
                _ => None,
            })
            .fold(0.0_f64, f64::max);
        assert!(last_verse_y > layout.chapter_limit());

        assert_eq!(summary.chapter_pages, vec![1, 2]);
        let ops = canvas.ops();
        let break_index = ops
            .iter()
            .position(|op| matches!(op, DrawOp::PageBreak { page: 2 }))
            .expect("page break");
        let heading_index = ops
            .iter()
            .position(|op| matches!(op, DrawOp::Text { text, .. } if text == "Capitulo 2: Segunda"))
            .expect("second heading");
        assert!(break_index < heading_index);
        assert!(matches!(
            &ops[heading_index],
            DrawOp::Text { page: 2, y, .. } if *y == layout.margin
        ));
    }

    #[test]
    fn wrapped_lines_are_drawn_one_step_apart() {
        let layout = LayoutConfig::default().with_content_width(30.0);
        let (canvas, _) = plan(content::guide(), &layout);
        let verse_ys: Vec<f64> = canvas
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { size: 9, y, .. } => Some(*y),
                _ => None,
            })
            .take(3)
            .collect();

        assert_eq!(verse_ys.len(), 3);
        assert_eq!(verse_ys[1] - verse_ys[0], layout.verse_line);
        assert_eq!(verse_ys[2] - verse_ys[1], layout.verse_line);
    }

    #[test]
    fn headings_are_numbered_from_one() {
        let (canvas, _) = plan(content::guide(), &LayoutConfig::default());
        let headings: Vec<&str> = canvas
            .text_pages()
            .into_iter()
            .map(|(_, text)| text)
            .filter(|text| text.starts_with("Capitulo "))
            .collect();
        assert_eq!(
            headings,
            vec![
                "Capitulo 1: Ancora da Manha (O Despertar na Graca)",
                "Capitulo 2: Ancora do Meio-Dia (A Pausa do Descanso)",
                "Capitulo 3: Ancora da Noite (O Pouso Seguro)",
            ]
        );
    }

    #[test]
    fn prayers_move_to_a_new_page_at_the_smaller_threshold() {
        let prayers = [
            Prayer {
                title: "Primeira oracao",
                text: "Amem.",
            },
            Prayer {
                title: "Segunda oracao",
                text: "Amem.",
            },
        ];
        let chapters = [Chapter {
            title: "Unico",
            verse: "verso",
            prayers: &prayers,
        }];
        let document = Document {
            title: "Titulo",
            subtitle: "Subtitulo",
            chapters: &chapters,
            closing: "Fim",
        };

        // Heading at 55, first prayer at 73, second prayer would start at 92.
        let layout = LayoutConfig::default()
            .with_page_height(110.0)
            .with_reserves(40.0, 30.0);
        let (canvas, summary) = plan(&document, &layout);

        assert_eq!(summary.chapter_pages, vec![1]);
        assert_eq!(canvas.page_of("Primeira oracao"), Some(1));
        assert_eq!(canvas.page_of("Segunda oracao"), Some(2));
        assert_eq!(canvas.page_of("Fim"), Some(2));
        assert_eq!(summary.pages, 2);
    }
}
