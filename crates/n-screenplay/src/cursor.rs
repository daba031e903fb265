//! Cursor positions across line reformatting.
//!
//! The input widget reports the cursor as a single linear offset into the
//! document. Formatting replaces one line with text of a different length
//! (centering adds 70 columns, trimming removes indentation), so the offset
//! has to be mapped to a line, then back to a linear offset afterwards.
//!
//! Offsets count chars (Unicode scalar values), never bytes. Lines are split
//! on `\n` only; ropey is built without `unicode_lines`, so `\r`, form feeds
//! and Unicode separators stay ordinary characters. A line's span includes
//! its end (`line_start..=line_start + len`), where the cursor sits after the
//! last character.

use ropey::Rope;

use crate::formatter::leading_whitespace;

// ---------------------------------------------------------------------------
// RemapPolicy
// ---------------------------------------------------------------------------

/// How the in-line cursor column survives a reformat.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemapPolicy {
    /// Keep the column, clamped to the new line length.
    #[default]
    Clamp,
    /// Shift the column by the change in indentation, then clamp. Keeps the
    /// cursor on the same character when a name is centered.
    IndentAware,
}

impl RemapPolicy {
    /// Parse the `:set cursorremap=` keyword.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "clamp" => Some(Self::Clamp),
            "indent" => Some(Self::IndentAware),
            _ => None,
        }
    }

    /// The `:set` keyword for this policy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clamp => "clamp",
            Self::IndentAware => "indent",
        }
    }

    /// New column for a cursor at `col` in `old_line` once the line reads
    /// `new_line`.
    #[must_use]
    pub fn remap_column(self, old_line: &str, new_line: &str, col: usize) -> usize {
        let new_len = new_line.chars().count();
        match self {
            Self::Clamp => col.min(new_len),
            Self::IndentAware => {
                let old_indent = leading_whitespace(old_line);
                let new_indent = leading_whitespace(new_line);
                let shifted = (col + new_indent).saturating_sub(old_indent);
                shifted.clamp(new_indent.min(new_len), new_len)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// CursorLocation
// ---------------------------------------------------------------------------

/// Where a linear offset falls in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorLocation {
    /// 0-indexed line containing the offset.
    pub line: usize,
    /// Char offset of the first character of that line.
    pub line_start: usize,
    /// Char offset within the line.
    pub column: usize,
}

/// Locate `offset` in a rope. Offsets past the end land at the end of the
/// last line.
#[must_use]
pub fn locate_in(rope: &Rope, offset: usize) -> CursorLocation {
    let offset = offset.min(rope.len_chars());
    let line = rope.char_to_line(offset);
    let line_start = rope.line_to_char(line);
    CursorLocation {
        line,
        line_start,
        column: offset - line_start,
    }
}

/// Locate `offset` in document text.
#[must_use]
pub fn locate(text: &str, offset: usize) -> CursorLocation {
    locate_in(&Rope::from_str(text), offset)
}

/// Index of the line containing `offset`. Offsets past the end return the
/// last line.
#[must_use]
pub fn locate_line(text: &str, offset: usize) -> usize {
    locate(text, offset).line
}

/// Char offset at which `line` starts. Lines past the end clamp to the end
/// of the document.
#[must_use]
pub fn line_start(text: &str, line: usize) -> usize {
    let rope = Rope::from_str(text);
    if line >= rope.len_lines() {
        return rope.len_chars();
    }
    rope.line_to_char(line)
}

/// Length of `line` in chars, without its line break.
#[must_use]
pub fn line_len(rope: &Rope, line: usize) -> usize {
    if line >= rope.len_lines() {
        return 0;
    }
    let slice = rope.line(line);
    let len = slice.len_chars();
    if len > 0 && slice.char(len - 1) == '\n' {
        len - 1
    } else {
        len
    }
}

/// Linear offset of the cursor after `old_line` (starting at `prefix_len`)
/// has been replaced by `new_line`.
#[must_use]
pub fn remap_after_format(
    prefix_len: usize,
    old_line: &str,
    new_line: &str,
    offset_within_line: usize,
    policy: RemapPolicy,
) -> usize {
    prefix_len + policy.remap_column(old_line, new_line, offset_within_line)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "INT. HOUSE\njohn\n    Hi.";

    // -- locate_line --------------------------------------------------------

    #[test]
    fn locate_line_boundaries() {
        // Line 0 spans 0..=10, line 1 spans 11..=15, line 2 spans 16..=23.
        assert_eq!(locate_line(DOC, 0), 0);
        assert_eq!(locate_line(DOC, 10), 0);
        assert_eq!(locate_line(DOC, 11), 1);
        assert_eq!(locate_line(DOC, 15), 1);
        assert_eq!(locate_line(DOC, 16), 2);
        assert_eq!(locate_line(DOC, 23), 2);
    }

    #[test]
    fn locate_line_past_end_is_last_line() {
        assert_eq!(locate_line(DOC, 500), 2);
        assert_eq!(locate_line("", 3), 0);
        assert_eq!(locate_line("abc\n", 99), 1);
    }

    #[test]
    fn every_offset_falls_inside_its_line_span() {
        let text = "a\n\nbcd\nef\n";
        let lines: Vec<&str> = text.split('\n').collect();
        let total = text.chars().count();
        for offset in 0..=total {
            let loc = locate(text, offset);
            let start: usize = lines[..loc.line].iter().map(|l| l.chars().count() + 1).sum();
            assert_eq!(loc.line_start, start, "offset {offset}");
            assert!(offset >= start && offset <= start + lines[loc.line].chars().count());
        }
    }

    #[test]
    fn carriage_returns_are_not_line_breaks() {
        assert_eq!(locate_line("a\rb\nc", 3), 0);
        assert_eq!(locate_line("a\rb\nc", 4), 1);
    }

    #[test]
    fn offsets_count_chars() {
        let text = "café\nbar";
        assert_eq!(locate(text, 5), CursorLocation { line: 1, line_start: 5, column: 0 });
    }

    // -- line_start / line_len ----------------------------------------------

    #[test]
    fn line_starts() {
        assert_eq!(line_start(DOC, 0), 0);
        assert_eq!(line_start(DOC, 1), 11);
        assert_eq!(line_start(DOC, 2), 16);
        assert_eq!(line_start(DOC, 9), 23);
    }

    #[test]
    fn line_lengths_exclude_newline() {
        let rope = Rope::from_str(DOC);
        assert_eq!(line_len(&rope, 0), 10);
        assert_eq!(line_len(&rope, 1), 4);
        assert_eq!(line_len(&rope, 2), 7);
        assert_eq!(line_len(&rope, 3), 0);
    }

    // -- remap --------------------------------------------------------------

    #[test]
    fn clamp_keeps_column_when_line_grows() {
        let old = "a".repeat(10);
        let new = "b".repeat(20);
        assert_eq!(remap_after_format(100, &old, &new, 5, RemapPolicy::Clamp), 105);
    }

    #[test]
    fn clamp_limits_column_when_line_shrinks() {
        assert_eq!(
            remap_after_format(7, "    hello", "Hello", 9, RemapPolicy::Clamp),
            12
        );
    }

    #[test]
    fn indent_aware_follows_the_text() {
        let new = format!("{}JOHN{}", " ".repeat(36), " ".repeat(40));
        assert_eq!(RemapPolicy::IndentAware.remap_column("john", &new, 4), 40);
        assert_eq!(RemapPolicy::IndentAware.remap_column("john", &new, 0), 36);
        assert_eq!(RemapPolicy::IndentAware.remap_column("    hi", "Hi", 2), 0);
        assert_eq!(RemapPolicy::IndentAware.remap_column("    hi", "Hi", 6), 2);
    }

    #[test]
    fn indent_aware_on_blank_lines() {
        assert_eq!(RemapPolicy::IndentAware.remap_column("", "", 0), 0);
        assert_eq!(RemapPolicy::IndentAware.remap_column("abc", "    ", 3), 4);
    }

    #[test]
    fn policy_keywords() {
        assert_eq!(RemapPolicy::parse("indent"), Some(RemapPolicy::IndentAware));
        assert_eq!(RemapPolicy::parse("table"), None);
        assert_eq!(RemapPolicy::Clamp.as_str(), "clamp");
    }
}
