//! Scene segmentation and time-of-day completion.
//!
//! A script is a run of scenes, each opened by a scene heading. The scene
//! navigator lists [`SceneSegment`]s and jumps to them; these helpers only
//! do the text work, driven by the session's classifier.

use crate::classifier::LineClassifier;
use crate::cursor;
use crate::element::ElementKind;

/// Times of day offered after the `-` of a scene heading.
pub const TIME_OF_DAY: [&str; 5] = ["DAY", "NIGHT", "MORNING", "AFTERNOON", "EVENING"];

/// One scene: its heading and everything up to the next heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSegment {
    /// Trimmed heading text.
    pub heading: String,
    /// 0-indexed line of the heading.
    pub start_line: usize,
    /// Lines after the heading, as written (blank lines included).
    pub body: Vec<String>,
}

impl SceneSegment {
    /// Lines covered by this scene, heading included.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.body.len() + 1
    }
}

/// Split `text` into scenes. Lines before the first heading belong to none.
pub fn extract_scenes(text: &str, classifier: &mut LineClassifier) -> Vec<SceneSegment> {
    let mut scenes: Vec<SceneSegment> = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        let trimmed = line.trim();
        if !trimmed.is_empty() && classifier.classify(trimmed) == ElementKind::SceneHeading {
            scenes.push(SceneSegment {
                heading: trimmed.to_string(),
                start_line: index,
                body: Vec::new(),
            });
        } else if let Some(current) = scenes.last_mut() {
            current.body.push(line.to_string());
        }
    }
    scenes
}

/// Char offset where a scene's heading line starts, for cursor jumps.
#[must_use]
pub fn scene_start_offset(text: &str, scene: &SceneSegment) -> usize {
    cursor::line_start(text, scene.start_line)
}

/// Should the time-of-day menu open with the cursor at `col`?
///
/// Yes when the line is a scene heading, the char just typed is `-`, and it
/// is the first `-` on the line.
pub fn offers_time_of_day(line: &str, col: usize, classifier: &mut LineClassifier) -> bool {
    if col == 0 || classifier.classify(line) != ElementKind::SceneHeading {
        return false;
    }
    let before: Vec<char> = line.chars().take(col).collect();
    before.len() == col && before[col - 1] == '-' && !before[..col - 1].contains(&'-')
}

/// Replace any ` - TIME` suffix of a heading with ` - time`.
///
/// Only the last ` - ` separates the time, so hyphenated locations survive.
/// A dangling `-` (the one that opened the menu) is dropped too.
#[must_use]
pub fn with_time_of_day(heading: &str, time: &str) -> String {
    let heading = heading.trim();
    let base = heading
        .rsplit_once(" - ")
        .map_or(heading, |(base, _)| base)
        .trim_end()
        .trim_end_matches('-')
        .trim_end();
    format!("{base} - {}", time.trim())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
