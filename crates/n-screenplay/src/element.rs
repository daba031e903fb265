//! Screenplay element kinds.
//!
//! Every line of a script is exactly one [`ElementKind`]. The same enum also
//! names the editing modes of the [`machine`](crate::machine): "the kind of
//! line the user is currently composing."
//!
//! | Kind            | Margin     | Max line | In Tab order |
//! |-----------------|------------|----------|--------------|
//! | `SceneHeading`  | none       | 60       | yes          |
//! | `Action`        | none       | 60       | yes          |
//! | `CharacterName` | centered   | 80       | yes          |
//! | `Parenthetical` | indent 4   | 40       | yes          |
//! | `Dialogue`      | indent 4   | 50       | yes          |
//! | `Transition`    | right      | 80       | no           |

use std::fmt;

/// Width of the physical page in monospace columns.
pub const PAGE_WIDTH: usize = 80;

/// Column that centered elements are right-aligned against.
pub const CENTER_COLUMN: usize = 40;

/// Indentation used for dialogue and parentheticals.
pub const DIALOGUE_INDENT: usize = 4;

// ---------------------------------------------------------------------------
// Margin
// ---------------------------------------------------------------------------

/// Horizontal placement of an element on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Margin {
    /// Flush left, no padding.
    None,
    /// A fixed number of leading spaces.
    Indent(usize),
    /// Right-aligned at [`CENTER_COLUMN`], then padded out to [`PAGE_WIDTH`].
    Center,
    /// Right-aligned at [`PAGE_WIDTH`].
    Right,
}

// ---------------------------------------------------------------------------
// ElementKind
// ---------------------------------------------------------------------------

/// The classification tag of a screenplay line.
///
/// `Action` is the fallback: any line no other rule claims is action.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `INT. KITCHEN - DAY`. Opens a scene.
    #[default]
    SceneHeading,
    /// Who speaks next.
    CharacterName,
    /// What they say.
    Dialogue,
    /// `(whispering)`, a direction under the character name.
    Parenthetical,
    /// `CUT TO:`, an editorial break between scenes.
    Transition,
    /// Scene description.
    Action,
}

impl ElementKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::SceneHeading,
        Self::CharacterName,
        Self::Dialogue,
        Self::Parenthetical,
        Self::Transition,
        Self::Action,
    ];

    /// The order Tab cycles through. Transitions are never reached by Tab.
    pub const TAB_ORDER: [Self; 5] = [
        Self::SceneHeading,
        Self::Action,
        Self::CharacterName,
        Self::Parenthetical,
        Self::Dialogue,
    ];

    /// Upper-snake name, as shown in the status line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SceneHeading => "SCENE_HEADING",
            Self::CharacterName => "CHARACTER_NAME",
            Self::Dialogue => "DIALOGUE",
            Self::Parenthetical => "PARENTHETICAL",
            Self::Transition => "TRANSITION",
            Self::Action => "ACTION",
        }
    }

    /// Where this element sits on the page.
    #[must_use]
    pub const fn margin(self) -> Margin {
        match self {
            Self::SceneHeading | Self::Action => Margin::None,
            Self::CharacterName => Margin::Center,
            Self::Dialogue | Self::Parenthetical => Margin::Indent(DIALOGUE_INDENT),
            Self::Transition => Margin::Right,
        }
    }

    /// Recommended maximum line length, a hint for the input widget.
    #[must_use]
    pub const fn max_line_length(self) -> usize {
        match self {
            Self::SceneHeading | Self::Action => 60,
            Self::CharacterName | Self::Transition => PAGE_WIDTH,
            Self::Parenthetical => 40,
            Self::Dialogue => 50,
        }
    }

    /// Position in [`TAB_ORDER`](Self::TAB_ORDER), if any.
    #[must_use]
    pub fn tab_index(self) -> Option<usize> {
        Self::TAB_ORDER.iter().position(|&k| k == self)
    }

    /// True for kinds that feed the suggestion indexes.
    #[inline]
    #[must_use]
    pub const fn is_indexed(self) -> bool {
        matches!(self, Self::SceneHeading | Self::CharacterName)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Names --------------------------------------------------------------

    #[test]
    fn display_names() {
        assert_eq!(ElementKind::SceneHeading.to_string(), "SCENE_HEADING");
        assert_eq!(ElementKind::CharacterName.to_string(), "CHARACTER_NAME");
        assert_eq!(ElementKind::Dialogue.to_string(), "DIALOGUE");
        assert_eq!(ElementKind::Parenthetical.to_string(), "PARENTHETICAL");
        assert_eq!(ElementKind::Transition.to_string(), "TRANSITION");
        assert_eq!(ElementKind::Action.to_string(), "ACTION");
    }

    #[test]
    fn default_is_scene_heading() {
        assert_eq!(ElementKind::default(), ElementKind::SceneHeading);
    }

    // -- Margins & hints ----------------------------------------------------

    #[test]
    fn margins() {
        assert_eq!(ElementKind::CharacterName.margin(), Margin::Center);
        assert_eq!(ElementKind::Transition.margin(), Margin::Right);
        assert_eq!(ElementKind::Dialogue.margin(), Margin::Indent(4));
        assert_eq!(ElementKind::Parenthetical.margin(), Margin::Indent(4));
        assert_eq!(ElementKind::Action.margin(), Margin::None);
    }

    #[test]
    fn max_line_lengths() {
        assert_eq!(ElementKind::SceneHeading.max_line_length(), 60);
        assert_eq!(ElementKind::Action.max_line_length(), 60);
        assert_eq!(ElementKind::CharacterName.max_line_length(), 80);
        assert_eq!(ElementKind::Parenthetical.max_line_length(), 40);
        assert_eq!(ElementKind::Dialogue.max_line_length(), 50);
    }

    // -- Tab order ----------------------------------------------------------

    #[test]
    fn tab_index_excludes_transition() {
        assert_eq!(ElementKind::SceneHeading.tab_index(), Some(0));
        assert_eq!(ElementKind::Dialogue.tab_index(), Some(4));
        assert_eq!(ElementKind::Transition.tab_index(), None);
    }

    #[test]
    fn indexed_kinds() {
        let indexed: Vec<_> = ElementKind::ALL.into_iter().filter(|k| k.is_indexed()).collect();
        assert_eq!(
            indexed,
            vec![ElementKind::SceneHeading, ElementKind::CharacterName]
        );
    }
}
