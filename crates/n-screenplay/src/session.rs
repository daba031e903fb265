//! Screenplay session — one editing session's worth of state.
//!
//! A [`ScreenplaySession`] owns the classifier (and its cache), the mode
//! machine, and the two suggestion indexes. It is the surface the input
//! widget talks to:
//!
//! ```text
//! keystroke ─► reformat_active_line ─► resolve kind + format + splice + remap
//! Enter     ─► advance_on_enter      ─► next mode, index the completed line
//! Tab       ─► advance_on_tab        ─► next mode
//! typing    ─► suggest_characters / suggest_scenes
//! ```
//!
//! Sessions share nothing. Serving many documents means many sessions.

use ropey::Rope;

use crate::classifier::LineClassifier;
use crate::cursor::{self, CursorLocation};
use crate::element::ElementKind;
use crate::formatter;
use crate::index::BoundedFrequencyIndex;
use crate::machine::{EditingModeMachine, EditingState, ModeHint};
use crate::options::ScreenplayOptions;
use crate::scene::{self, SceneSegment};

// ---------------------------------------------------------------------------
// Reformat
// ---------------------------------------------------------------------------

/// Outcome of reformatting the line under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reformat {
    /// The whole document after the edit.
    pub text: String,
    /// The cursor's new linear offset.
    pub cursor: usize,
    /// The line that was formatted.
    pub line: usize,
    /// How that line classified.
    pub kind: ElementKind,
    /// False when formatting left the line as it was.
    pub changed: bool,
}

// ---------------------------------------------------------------------------
// ScreenplaySession
// ---------------------------------------------------------------------------

/// Classifier, mode machine and indexes for a single document.
#[derive(Debug, Clone)]
pub struct ScreenplaySession {
    options: ScreenplayOptions,
    classifier: LineClassifier,
    machine: EditingModeMachine,
    characters: BoundedFrequencyIndex,
    scenes: BoundedFrequencyIndex,
}

impl Default for ScreenplaySession {
    fn default() -> Self {
        Self::new(ScreenplayOptions::default())
    }
}

impl ScreenplaySession {
    /// Start a session with the given options.
    #[must_use]
    pub fn new(options: ScreenplayOptions) -> Self {
        Self {
            classifier: LineClassifier::new(&options),
            machine: EditingModeMachine::new(),
            characters: BoundedFrequencyIndex::new(options.max_characters),
            scenes: BoundedFrequencyIndex::new(options.max_scenes),
            options,
        }
    }

    /// The options this session was built with.
    #[must_use]
    pub const fn options(&self) -> &ScreenplayOptions {
        &self.options
    }

    /// The classifier, for cache diagnostics.
    #[must_use]
    pub const fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    // -- Classification & formatting ----------------------------------------

    /// Classify one line.
    pub fn classify(&mut self, line: &str) -> ElementKind {
        self.classifier.classify(line)
    }

    /// Classify and format one line.
    pub fn format(&mut self, line: &str) -> String {
        let kind = self.classifier.classify(line);
        formatter::format(line, kind)
    }

    /// Format one line as a given kind.
    #[must_use]
    pub fn format_as(&self, line: &str, kind: ElementKind) -> String {
        formatter::format(line, kind)
    }

    /// Re-pad `line` for the current mode without changing its case.
    #[must_use]
    pub fn place_for_mode(&self, line: &str) -> String {
        formatter::apply_margins(line, self.machine.mode())
    }

    /// The kind `line` should take given the current mode.
    ///
    /// Classification wins, except that plain text typed inside a dialogue
    /// block (mode `Parenthetical` or `Dialogue`) is dialogue even when it
    /// isn't indented.
    pub fn resolve_kind(&mut self, line: &str) -> ElementKind {
        let kind = self.classifier.classify(line);
        if self.mode_claims(kind, line) {
            ElementKind::Dialogue
        } else {
            kind
        }
    }

    /// Format `line` as the element it is in the current mode.
    pub fn format_for_mode(&mut self, line: &str) -> String {
        let kind = self.classifier.classify(line);
        if self.mode_claims(kind, line) {
            self.place_for_mode(line)
        } else {
            formatter::format(line, kind)
        }
    }

    fn mode_claims(&self, kind: ElementKind, line: &str) -> bool {
        kind == ElementKind::Action
            && matches!(
                self.machine.mode(),
                ElementKind::Parenthetical | ElementKind::Dialogue
            )
            && !line.trim().is_empty()
    }

    // -- Modes --------------------------------------------------------------

    /// Current machine state.
    #[must_use]
    pub const fn state(&self) -> &EditingState {
        self.machine.state()
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> ElementKind {
        self.machine.mode()
    }

    /// Enter pressed on `line`. Character names and scene headings are
    /// indexed as they are completed.
    pub fn advance_on_enter(&mut self, line: &str) -> ModeHint {
        let kind = self.classifier.classify(line);
        match kind {
            ElementKind::CharacterName => self.characters.track(line),
            ElementKind::SceneHeading => self.scenes.track(line),
            _ => {}
        }
        self.machine.advance_with_kind(line, kind)
    }

    /// Tab (or Shift-Tab) pressed.
    pub fn advance_on_tab(&mut self, reverse: bool) -> ModeHint {
        self.machine.advance_on_tab(reverse)
    }

    // -- Cursor -------------------------------------------------------------

    /// Line containing `offset`.
    #[must_use]
    pub fn locate_line(&self, text: &str, offset: usize) -> usize {
        cursor::locate_line(text, offset)
    }

    /// Cursor offset after a line starting at `prefix_len` was reformatted,
    /// using the session's remap policy.
    #[must_use]
    pub fn remap_after_format(
        &self,
        prefix_len: usize,
        old_line: &str,
        new_line: &str,
        offset_within_line: usize,
    ) -> usize {
        cursor::remap_after_format(
            prefix_len,
            old_line,
            new_line,
            offset_within_line,
            self.options.cursor_remap,
        )
    }

    /// Format the line under `cursor` and splice it back into `text`.
    pub fn reformat_active_line(&mut self, text: &str, cursor_offset: usize) -> Reformat {
        let mut rope = Rope::from_str(text);
        let CursorLocation {
            line,
            line_start,
            column,
        } = cursor::locate_in(&rope, cursor_offset);
        let mut old_len = cursor::line_len(&rope, line);
        // The `\r` of a CRLF line ending stays outside the formatted span.
        if old_len > 0 && rope.char(line_start + old_len - 1) == '\r' {
            old_len -= 1;
        }
        let old: String = rope.slice(line_start..line_start + old_len).chars().collect();

        let kind = self.resolve_kind(&old);
        let new = formatter::format(&old, kind);
        if new == old {
            return Reformat {
                text: text.to_string(),
                cursor: line_start + column,
                line,
                kind,
                changed: false,
            };
        }

        rope.remove(line_start..line_start + old_len);
        rope.insert(line_start, &new);
        let cursor = self.remap_after_format(line_start, &old, &new, column);
        log::trace!("reformatted line {line} as {kind}, cursor {cursor_offset} -> {cursor}");
        Reformat {
            text: rope.to_string(),
            cursor,
            line,
            kind,
            changed: true,
        }
    }

    // -- Indexes ------------------------------------------------------------

    /// Count a character name.
    pub fn track_character(&mut self, name: &str) {
        self.characters.track(name);
    }

    /// Count a scene heading.
    pub fn track_scene(&mut self, heading: &str) {
        self.scenes.track(heading);
    }

    /// Character names matching `partial`, up to the configured limit.
    #[must_use]
    pub fn suggest_characters(&self, partial: &str) -> Vec<String> {
        self.characters.suggest(partial, self.options.suggest_limit)
    }

    /// Scene headings matching `partial`, up to the configured limit.
    #[must_use]
    pub fn suggest_scenes(&self, partial: &str) -> Vec<String> {
        self.scenes.suggest(partial, self.options.suggest_limit)
    }

    /// Most frequent character names.
    #[must_use]
    pub fn top_characters(&self, limit: usize) -> Vec<String> {
        self.characters.top_entries(limit)
    }

    /// Most frequent scene headings.
    #[must_use]
    pub fn top_scenes(&self, limit: usize) -> Vec<String> {
        self.scenes.top_entries(limit)
    }

    /// The character-name index.
    #[must_use]
    pub const fn characters(&self) -> &BoundedFrequencyIndex {
        &self.characters
    }

    /// The scene-heading index.
    #[must_use]
    pub const fn scenes(&self) -> &BoundedFrequencyIndex {
        &self.scenes
    }

    /// Rebuild both indexes from a whole document.
    pub fn index_document(&mut self, text: &str) {
        self.characters.clear();
        self.scenes.clear();
        for line in text.split('\n') {
            match self.classifier.classify(line) {
                ElementKind::CharacterName => self.characters.track(line),
                ElementKind::SceneHeading => self.scenes.track(line),
                _ => {}
            }
        }
        log::debug!(
            "indexed document: {} characters, {} scenes",
            self.characters.len(),
            self.scenes.len()
        );
    }

    // -- Scenes -------------------------------------------------------------

    /// The document's scenes.
    pub fn scene_segments(&mut self, text: &str) -> Vec<SceneSegment> {
        scene::extract_scenes(text, &mut self.classifier)
    }

    /// Whether the time-of-day menu should open at `col` of `line`.
    pub fn offers_time_of_day(&mut self, line: &str, col: usize) -> bool {
        scene::offers_time_of_day(line, col, &mut self.classifier)
    }

    /// `line` with its time of day set, or `None` if it isn't a scene heading.
    pub fn complete_time_of_day(&mut self, line: &str, time: &str) -> Option<String> {
        (self.classifier.classify(line) == ElementKind::SceneHeading)
            .then(|| scene::with_time_of_day(line, time))
    }

    // -- Reset --------------------------------------------------------------

    /// Clear the cache, both indexes, and the machine state.
    pub fn reset(&mut self) {
        self.classifier.clear_cache();
        self.characters.clear();
        self.scenes.clear();
        self.machine.reset();
        log::debug!("session reset");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
