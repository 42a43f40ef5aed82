//! Provenance snippets: the source line around an anchor, bounded in size.

const ELISION: &str = " [...] ";

/// Return the trimmed line containing `text[start..end]`.
///
/// Lines longer than `max_chars` keep their first and last `max_chars / 2`
/// characters joined by an elision marker. Offsets must lie on char boundaries.
pub fn line_snippet(text: &str, start: usize, end: usize, max_chars: usize) -> String {
    let line_start = text[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = text[end..].find('\n').map(|i| end + i).unwrap_or(text.len());
    abbreviate(text[line_start..line_end].trim(), max_chars)
}

/// Collapse a long snippet to head + marker + tail.
pub fn abbreviate(line: &str, max_chars: usize) -> String {
    let count = line.chars().count();
    if count <= max_chars {
        return line.to_string();
    }
    let half = max_chars / 2;
    let head: String = line.chars().take(half).collect();
    let tail: String = line.chars().skip(count - half).collect();
    format!("{head}{ELISION}{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_containing_line_trimmed() {
        let text = "first line\n   revenue of $5 million   \nlast";
        let start = text.find('$').unwrap();
        assert_eq!(line_snippet(text, start, start + 2, 500), "revenue of $5 million");
    }

    #[test]
    fn first_and_last_lines() {
        let text = "$1 here\nmiddle\nend $2";
        assert_eq!(line_snippet(text, 0, 2, 500), "$1 here");
        let start = text.rfind('$').unwrap();
        assert_eq!(line_snippet(text, start, text.len(), 500), "end $2");
    }

    #[test]
    fn long_lines_are_abbreviated() {
        let line = format!("{}{}", "a".repeat(400), "b".repeat(400));
        let snippet = abbreviate(&line, 500);
        assert!(snippet.starts_with(&"a".repeat(250)));
        assert!(snippet.ends_with(&"b".repeat(250)));
        assert!(snippet.contains(" [...] "));
        assert_eq!(snippet.chars().count(), 500 + ELISION.len());
    }

    #[test]
    fn abbreviation_respects_multibyte_chars() {
        let line = "€".repeat(600);
        let snippet = abbreviate(&line, 100);
        assert_eq!(snippet.chars().filter(|c| *c == '€').count(), 100);
    }
}
