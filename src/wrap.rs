//! Greedy line breaking driven by a width measurement callback.

/// Splits `text` into lines whose measured width does not exceed `max_width`.
///
/// Explicit `\n` characters always start a new line and an empty paragraph yields an empty line,
/// so blank lines in the source survive wrapping.  Words are packed greedily; a single word wider
/// than `max_width` is broken between characters, keeping at least one character per line.
pub fn split_text<F>(text: &str, max_width: f64, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut emitted = false;

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_owned()
            } else {
                format!("{current} {word}")
            };

            if measure(&candidate) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                emitted = true;
            }

            if measure(word) <= max_width {
                current = word.to_owned();
            } else {
                let (full, rest) = break_word(word, max_width, &measure);
                emitted |= !full.is_empty();
                lines.extend(full);
                current = rest;
            }
        }

        if !current.is_empty() || !emitted {
            lines.push(current);
        }
    }

    lines
}

fn break_word<F>(word: &str, max_width: f64, measure: &F) -> (Vec<String>, String)
where
    F: Fn(&str) -> f64,
{
    let mut full = Vec::new();
    let mut chunk = String::new();

    for ch in word.chars() {
        chunk.push(ch);
        if measure(&chunk) > max_width && chunk.chars().count() > 1 {
            chunk.pop();
            full.push(std::mem::take(&mut chunk));
            chunk.push(ch);
        }
    }

    (full, chunk)
}

#[cfg(test)]
mod tests {
    use super::split_text;

    fn chars(s: &str) -> f64 {
        s.chars().count() as f64
    }

    #[test]
    fn packs_words_greedily() {
        let lines = split_text("aa bb cc dd", 5.0, chars);
        assert_eq!(lines, vec!["aa bb", "cc dd"]);
    }

    #[test]
    fn keeps_explicit_breaks_and_blank_lines() {
        let lines = split_text("intro:\n\n1. one\n2. two", 40.0, chars);
        assert_eq!(lines, vec!["intro:", "", "1. one", "2. two"]);
    }

    #[test]
    fn breaks_overlong_words() {
        let lines = split_text("ab abcdefgh c", 3.0, chars);
        assert_eq!(lines, vec!["ab", "abc", "def", "gh", "c"]);
    }

    #[test]
    fn empty_text_yields_one_empty_line() {
        assert_eq!(split_text("", 10.0, chars), vec![String::new()]);
    }

    #[test]
    fn never_returns_an_empty_chunk_for_tiny_widths() {
        let lines = split_text("abc", 0.5, chars);
        assert_eq!(lines, vec!["a", "b", "c"]);
    }
}
