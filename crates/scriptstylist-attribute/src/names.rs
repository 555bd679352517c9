//! Name normalization helpers shared by matching and discovery.

use unicode_segmentation::UnicodeSegmentation;

/// Base form of a qualified name: `"Anjali (bahu)"` → `"Anjali"`.
///
/// Returns `None` when the name has no qualifier or nothing precedes it.
pub fn base_name(name: &str) -> Option<&str> {
    let (head, _) = name.split_once('(')?;
    let head = head.trim();
    if head.is_empty() {
        None
    } else {
        Some(head)
    }
}

/// Remove every trailing `( ... )` group: `"JOHN (V.O.) (CONT'D)"` → `"JOHN"`.
pub fn strip_trailing_parentheticals(text: &str) -> &str {
    let mut s = text.trim_end();
    while s.ends_with(')') {
        match s.rfind('(') {
            Some(open) => s = s[..open].trim_end(),
            None => break,
        }
    }
    s
}

/// Length of `text` in characters, not bytes.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Byte offset in `line` just past a case-insensitive `name` prefix.
pub fn prefix_end(line: &str, name: &str) -> Option<usize> {
    let mut line_chars = line.char_indices();
    for n in name.chars() {
        let (_, l) = line_chars.next()?;
        if !eq_ignore_case(l, n) {
            return None;
        }
    }
    Some(line_chars.next().map_or(line.len(), |(i, _)| i))
}

/// True when `rest` begins at end-of-line or with a non-alphanumeric char.
pub fn is_boundary(rest: &str) -> bool {
    rest.chars().next().map_or(true, |c| !c.is_alphanumeric())
}

/// True when byte offset `end` does not split a grapheme cluster of `line`.
///
/// A combining mark after the name (virama, decomposed accent) continues the
/// last letter, so `"सत"` must not end inside `"सत्य"`.
pub fn is_grapheme_boundary(line: &str, end: usize) -> bool {
    end == line.len()
        || line
            .grapheme_indices(true)
            .map(|(i, _)| i)
            .take_while(|&i| i <= end)
            .any(|i| i == end)
}

/// Case-insensitive "line starts with name" that also requires a boundary
/// right after the name.
pub fn starts_with_name(line: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    match prefix_end(line, name) {
        Some(end) => is_grapheme_boundary(line, end) && is_boundary(&line[end..]),
        None => false,
    }
}
