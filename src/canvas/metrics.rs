//! Advance widths of the PDF standard Helvetica faces.
//!
//! The standard 14 fonts are not embedded, so text measurement relies on the published AFM widths
//! (in 1/1000 em).  Oblique faces share the widths of their upright counterparts.

use super::FontStyle;

/// Points per millimetre.
pub const PT_PER_MM: f64 = 72.0 / 25.4;

const FALLBACK_WIDTH: u16 = 556;

// Printable ASCII, starting at U+0020.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
    389, 280, 389, 584, // '{'..'~'
];

fn glyph_width(table: &[u16; 95], ch: char) -> u16 {
    let code = ch as usize;
    if (0x20..0x7f).contains(&code) {
        table[code - 0x20]
    } else {
        FALLBACK_WIDTH
    }
}

/// Returns the width in millimetres of `text` set in Helvetica at `size` points.
pub fn helvetica_width(text: &str, style: FontStyle, size: u8) -> f64 {
    let table = match style {
        FontStyle::Normal | FontStyle::Italic => &HELVETICA,
        FontStyle::Bold | FontStyle::BoldItalic => &HELVETICA_BOLD,
    };
    let units: u32 = text.chars().map(|ch| u32::from(glyph_width(table, ch))).sum();
    f64::from(units) / 1000.0 * f64::from(size) / PT_PER_MM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_is_a_quarter_em_and_a_bit() {
        let width = helvetica_width(" ", FontStyle::Normal, 10);
        assert!((width - 0.278 * 10.0 / PT_PER_MM).abs() < 1e-9);
    }

    #[test]
    fn bold_is_at_least_as_wide_as_regular() {
        let text = "Ancora da Manha";
        assert!(
            helvetica_width(text, FontStyle::Bold, 11) >= helvetica_width(text, FontStyle::Normal, 11)
        );
    }

    #[test]
    fn italic_shares_regular_widths() {
        let text = "Orem continuamente.";
        assert_eq!(
            helvetica_width(text, FontStyle::Italic, 9),
            helvetica_width(text, FontStyle::Normal, 9)
        );
    }

    #[test]
    fn unknown_glyphs_use_the_fallback_width() {
        let width = helvetica_width("\u{00e7}", FontStyle::Normal, 10);
        assert!((width - 0.556 * 10.0 / PT_PER_MM).abs() < 1e-9);
    }
}
