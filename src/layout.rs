//! Page geometry, pagination thresholds and text styles used by the renderer.
//!
//! All distances are millimetres on an A4 portrait page, measured from the top edge.  The defaults
//! reproduce the layout of the published guide.

use crate::canvas::{FontStyle, Rgb};

/// Gold accent used for the title, prayer titles and separators.
pub const ACCENT: Rgb = Rgb(198, 168, 124);

/// Font, size and colour of one kind of text block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextStyle {
    pub size: u8,
    pub font: FontStyle,
    pub color: Rgb,
}

impl TextStyle {
    /// Creates a style with the given size, font variant and colour.
    pub const fn new(size: u8, font: FontStyle, color: Rgb) -> Self {
        Self { size, font, color }
    }
}

/// Styles of every text block in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub title: TextStyle,
    pub subtitle: TextStyle,
    pub chapter_heading: TextStyle,
    pub verse: TextStyle,
    pub prayer_title: TextStyle,
    pub prayer_body: TextStyle,
    pub closing: TextStyle,
    pub separator: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: TextStyle::new(20, FontStyle::Normal, ACCENT),
            subtitle: TextStyle::new(12, FontStyle::Normal, Rgb::grey(100)),
            chapter_heading: TextStyle::new(14, FontStyle::Bold, Rgb::grey(40)),
            verse: TextStyle::new(9, FontStyle::Italic, Rgb::grey(80)),
            prayer_title: TextStyle::new(11, FontStyle::Bold, ACCENT),
            prayer_body: TextStyle::new(10, FontStyle::Normal, Rgb::grey(60)),
            closing: TextStyle::new(10, FontStyle::Italic, Rgb::grey(80)),
            separator: ACCENT,
        }
    }
}

/// Geometry and spacing of the rendered document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Left margin and top starting position of every page.
    pub margin: f64,
    /// Vertical extent used for pagination decisions.
    pub page_height: f64,
    /// Right end of the separator lines.
    pub rule_end: f64,
    /// Width text is wrapped to.
    pub content_width: f64,
    /// A chapter starts on a new page when less than this remains above `page_height`.
    pub chapter_reserve: f64,
    /// A prayer starts on a new page when less than this remains above `page_height`.
    pub prayer_reserve: f64,
    pub after_title: f64,
    pub after_subtitle: f64,
    pub after_rule: f64,
    pub after_heading: f64,
    pub verse_line: f64,
    pub after_verse: f64,
    pub after_prayer_title: f64,
    pub body_line: f64,
    pub after_prayer: f64,
    pub after_chapter: f64,
    pub closing_line: f64,
    pub theme: Theme,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 20.0,
            page_height: 280.0,
            rule_end: 190.0,
            content_width: 170.0,
            chapter_reserve: 40.0,
            prayer_reserve: 30.0,
            after_title: 10.0,
            after_subtitle: 15.0,
            after_rule: 10.0,
            after_heading: 8.0,
            verse_line: 4.0,
            after_verse: 6.0,
            after_prayer_title: 6.0,
            body_line: 5.0,
            after_prayer: 8.0,
            after_chapter: 5.0,
            closing_line: 5.0,
            theme: Theme::default(),
        }
    }
}

impl LayoutConfig {
    /// Creates the default layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pagination height and returns the updated layout.
    pub fn with_page_height(mut self, page_height: f64) -> Self {
        self.page_height = page_height;
        self
    }

    /// Sets the wrapping width and returns the updated layout.
    pub fn with_content_width(mut self, content_width: f64) -> Self {
        self.content_width = content_width;
        self
    }

    /// Sets both pagination reserves and returns the updated layout.
    pub fn with_reserves(mut self, chapter_reserve: f64, prayer_reserve: f64) -> Self {
        self.chapter_reserve = chapter_reserve;
        self.prayer_reserve = prayer_reserve;
        self
    }

    /// Y position beyond which a chapter heading moves to the next page.
    pub fn chapter_limit(&self) -> f64 {
        self.page_height - self.chapter_reserve
    }

    /// Y position beyond which a prayer or the closing block moves to the next page.
    pub fn prayer_limit(&self) -> f64 {
        self.page_height - self.prayer_reserve
    }
}
