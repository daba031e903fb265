//! Line formatting — typographic conventions per element kind.
//!
//! | Kind            | Case                   | Placement                      |
//! |-----------------|------------------------|--------------------------------|
//! | `SceneHeading`  | all upper              | `PREFIX LOCATION`, flush left  |
//! | `CharacterName` | all upper              | right edge at col 40, pad to 80 |
//! | `Transition`    | all upper              | right edge at col 80           |
//! | `Parenthetical` | unchanged              | 4-space indent                 |
//! | `Dialogue`      | unchanged              | 4-space indent                 |
//! | `Action`        | first letter upper     | flush left                     |
//!
//! Every transform starts from the trimmed line, which makes formatting
//! idempotent: `format(format(l, k), k) == format(l, k)`. Widths are display
//! columns (`unicode-width`), so wide glyphs don't push names off center.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::classifier::split_scene_prefix;
use crate::element::{CENTER_COLUMN, ElementKind, Margin, PAGE_WIDTH};

/// Format `line` as an element of `kind`.
#[must_use]
pub fn format(line: &str, kind: ElementKind) -> String {
    let trimmed = line.trim();
    let text = match kind {
        ElementKind::SceneHeading => scene_heading(trimmed),
        ElementKind::CharacterName | ElementKind::Transition => trimmed.to_uppercase(),
        ElementKind::Parenthetical | ElementKind::Dialogue => trimmed.to_string(),
        ElementKind::Action => capitalize_first(trimmed),
    };
    place(&text, kind.margin())
}

/// Re-pad `line` for `kind` without touching its case.
///
/// Used when Tab changes the mode and the active line should move to the
/// new element's position on the page.
#[must_use]
pub fn apply_margins(line: &str, kind: ElementKind) -> String {
    place(line.trim(), kind.margin())
}

/// Number of leading whitespace chars, the column where the text starts.
#[must_use]
pub fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn place(text: &str, margin: Margin) -> String {
    match margin {
        Margin::None => text.to_string(),
        Margin::Indent(n) => {
            let mut out = " ".repeat(n);
            out.push_str(text);
            out
        }
        Margin::Center => pad_end(&pad_start(text, CENTER_COLUMN), PAGE_WIDTH),
        Margin::Right => pad_start(text, PAGE_WIDTH),
    }
}

fn scene_heading(trimmed: &str) -> String {
    match split_scene_prefix(trimmed) {
        Some((prefix, rest)) => {
            let location = rest.trim().to_uppercase();
            if location.is_empty() {
                prefix.to_string()
            } else {
                format!("{prefix} {location}")
            }
        }
        None => trimmed.to_uppercase(),
    }
}

/// Uppercase the first grapheme cluster, keeping any combining marks on it.
fn capitalize_first(text: &str) -> String {
    let mut graphemes = text.graphemes(true);
    let Some(first) = graphemes.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase();
    out.push_str(graphemes.as_str());
    out
}

/// Left-pad with spaces until `text` is `width` columns wide.
fn pad_start(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width());
    let mut out = String::with_capacity(text.len() + pad);
    out.extend(std::iter::repeat_n(' ', pad));
    out.push_str(text);
    out
}

/// Right-pad with spaces until `text` is `width` columns wide.
fn pad_end(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width());
    let mut out = String::with_capacity(text.len() + pad);
    out.push_str(text);
    out.extend(std::iter::repeat_n(' ', pad));
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
