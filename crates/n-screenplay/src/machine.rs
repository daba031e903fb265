//! Editing mode machine — what kind of line is the user writing?
//!
//! The mode is an [`ElementKind`]. It starts at `SceneHeading` and moves on
//! two triggers:
//!
//! **Enter** completes a line. The next mode depends on the mode the user was
//! in *and* on how the completed line classifies:
//!
//! | Current mode    | Completed line          | Next mode       |
//! |-----------------|-------------------------|-----------------|
//! | `SceneHeading`  | a scene heading         | `Action`        |
//! | `SceneHeading`  | anything else           | `SceneHeading`  |
//! | `Action`        | a character name        | `CharacterName` |
//! | `Action`        | anything else           | `SceneHeading`  |
//! | `CharacterName` | non-empty               | `Parenthetical` |
//! | `CharacterName` | empty                   | `SceneHeading`  |
//! | `Parenthetical` | anything                | `Dialogue`      |
//! | `Dialogue`      | non-empty               | `Dialogue`      |
//! | `Dialogue`      | empty                   | `SceneHeading`  |
//! | `Transition`    | anything                | `SceneHeading`  |
//!
//! **Tab** cycles through [`ElementKind::TAB_ORDER`] regardless of content;
//! Shift-Tab cycles backward.

use crate::classifier::LineClassifier;
use crate::element::ElementKind;

// ---------------------------------------------------------------------------
// EditingState
// ---------------------------------------------------------------------------

/// The machine's observable state.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EditingState {
    /// The kind of line being composed.
    pub mode: ElementKind,
    /// The speaker named by the last character line, if the dialogue block
    /// is still open.
    pub character: Option<String>,
}

/// A mode plus the line-length hint the input widget should apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeHint {
    pub mode: ElementKind,
    pub max_line_length: usize,
}

impl ModeHint {
    #[must_use]
    pub const fn for_mode(mode: ElementKind) -> Self {
        Self {
            mode,
            max_line_length: mode.max_line_length(),
        }
    }
}

// ---------------------------------------------------------------------------
// EditingModeMachine
// ---------------------------------------------------------------------------

/// Finite state machine over editing modes.
#[derive(Debug, Default, Clone)]
pub struct EditingModeMachine {
    state: EditingState,
}

impl EditingModeMachine {
    /// A machine in its initial state (`SceneHeading`, no character).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &EditingState {
        &self.state
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> ElementKind {
        self.state.mode
    }

    /// The open speaker, if any.
    #[must_use]
    pub fn character(&self) -> Option<&str> {
        self.state.character.as_deref()
    }

    /// Force a mode, e.g. when the user picks one from a menu.
    pub fn set_mode(&mut self, mode: ElementKind) {
        self.state.mode = mode;
    }

    /// Enter was pressed on `line`: classify it and advance.
    pub fn advance_on_enter(&mut self, line: &str, classifier: &mut LineClassifier) -> ModeHint {
        let kind = classifier.classify(line);
        self.advance_with_kind(line, kind)
    }

    /// Enter was pressed on `line`, already classified as `kind`.
    pub fn advance_with_kind(&mut self, line: &str, kind: ElementKind) -> ModeHint {
        let trimmed = line.trim();
        let from = self.state.mode;
        let next = match from {
            ElementKind::SceneHeading if kind == ElementKind::SceneHeading => ElementKind::Action,
            ElementKind::SceneHeading => ElementKind::SceneHeading,
            ElementKind::Action => {
                if kind == ElementKind::CharacterName {
                    self.state.character = Some(trimmed.to_string());
                    ElementKind::CharacterName
                } else {
                    self.state.character = None;
                    ElementKind::SceneHeading
                }
            }
            ElementKind::CharacterName | ElementKind::Dialogue if trimmed.is_empty() => {
                ElementKind::SceneHeading
            }
            ElementKind::CharacterName => ElementKind::Parenthetical,
            ElementKind::Parenthetical | ElementKind::Dialogue => ElementKind::Dialogue,
            ElementKind::Transition => ElementKind::SceneHeading,
        };
        log::debug!("enter: {from} + {kind} -> {next}");
        self.state.mode = next;
        ModeHint::for_mode(next)
    }

    /// Tab (or Shift-Tab when `reverse`) was pressed.
    ///
    /// A mode outside the Tab order (a transition) goes to the first entry
    /// forward and the last entry backward.
    pub fn advance_on_tab(&mut self, reverse: bool) -> ModeHint {
        let order = ElementKind::TAB_ORDER;
        let len = order.len();
        let next = match (self.state.mode.tab_index(), reverse) {
            (Some(i), false) => order[(i + 1) % len],
            (Some(i), true) => order[(i + len - 1) % len],
            (None, false) => order[0],
            (None, true) => order[len - 1],
        };
        log::debug!("tab: {} -> {next}", self.state.mode);
        self.state.mode = next;
        ModeHint::for_mode(next)
    }

    /// Back to `SceneHeading` with no open speaker.
    pub fn reset(&mut self) {
        self.state = EditingState::default();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
