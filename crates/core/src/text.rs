//! Raw-text helpers for queries that work on the document instead of the
//! tree, such as hovering a dotted reference that the grammar could not
//! fully parse.

/// The word under a 0-based line/character position. Word characters are
/// ASCII alphanumerics, `_` and `.`, so dotted references come back whole.
pub fn cursor_word(document: &str, line: usize, character: usize) -> Option<String> {
    let line_text = document.lines().nth(line)?;
    let bytes = line_text.as_bytes();
    let anchor = character.min(bytes.len());

    let mut start = anchor;
    while start > 0 && is_word_byte(bytes[start - 1]) {
        start -= 1;
    }
    let mut end = anchor;
    while end < bytes.len() && is_word_byte(bytes[end]) {
        end += 1;
    }

    if start == end {
        return None;
    }
    line_text.get(start..end).map(str::to_string)
}

fn is_word_byte(byte: u8) -> bool {
    byte == b'_' || byte == b'.' || byte.is_ascii_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_word_around_the_cursor() {
        let doc = "path = local.root_path\n";
        assert_eq!(cursor_word(doc, 0, 1), Some("path".to_string()));
        assert_eq!(cursor_word(doc, 0, 10), Some("local.root_path".to_string()));
        assert_eq!(cursor_word(doc, 0, 20), Some("local.root_path".to_string()));
    }

    #[test]
    fn word_at_line_start_and_end() {
        let doc = "foo = bar";
        assert_eq!(cursor_word(doc, 0, 0), Some("foo".to_string()));
        assert_eq!(cursor_word(doc, 0, 9), Some("bar".to_string()));
    }

    #[test]
    fn misses_on_whitespace_and_punctuation() {
        let doc = "foo = {\n}\n";
        assert_eq!(cursor_word(doc, 0, 4), None);
        assert_eq!(cursor_word(doc, 1, 0), None);
    }

    #[test]
    fn misses_past_the_last_line() {
        assert_eq!(cursor_word("foo\n", 5, 0), None);
    }

    #[test]
    fn clamps_characters_past_the_line_end() {
        assert_eq!(cursor_word("foo", 0, 99), Some("foo".to_string()));
    }
}
