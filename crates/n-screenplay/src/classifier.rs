//! Line classification — which screenplay element is this line?
//!
//! Rules are checked in a fixed precedence order, first match wins:
//!
//! | # | Kind            | Test (on the trimmed line unless noted)           |
//! |---|-----------------|---------------------------------------------------|
//! | 1 | `SceneHeading`  | `INT.`/`EXT.`/`EST.`/`INT/EXT.`/`I/E.` + space + text |
//! | 2 | `CharacterName` | uppercase letters and spaces, leading letter      |
//! | 3 | `Transition`    | starts with `FADE IN:`, `FADE OUT:`, `CUT TO:`... |
//! | 4 | `Parenthetical` | `(` ... `)` wrapping the whole line               |
//! | 5 | `Dialogue`      | 4+ leading whitespace, then a letter (raw line)   |
//! | 6 | `Action`        | everything else, including blank lines            |
//!
//! Rule 2 also claims all-caps action lines and transitions typed without a
//! colon. That ambiguity is part of the convention; the order above is kept
//! exactly so classification stays reproducible.
//!
//! Rules 1-4 only look at trimmed text, so their outcome is memoized in a
//! [`BoundedCache`] keyed by the trimmed line. Rule 5 depends on the raw
//! indentation and always runs uncached.

use std::sync::LazyLock;

use regex::Regex;

use crate::cache::{BoundedCache, CacheEviction};
use crate::element::ElementKind;
use crate::options::ScreenplayOptions;

/// Scene heading prefixes, longest first so `INT/EXT.` wins over `INT.`.
pub const SCENE_HEADING_PREFIXES: [&str; 5] = ["INT/EXT.", "INT.", "EXT.", "EST.", "I/E."];

/// Transitions recognized by default.
pub const TRANSITIONS: [&str; 3] = ["FADE IN:", "FADE OUT:", "CUT TO:"];

/// Transitions added by `extendedtransitions`.
pub const EXTENDED_TRANSITIONS: [&str; 2] = ["DISSOLVE TO:", "SMASH CUT TO:"];

static SCENE_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:INT/EXT\.|INT\.|EXT\.|EST\.|I/E\.)\s+\S")
        .expect("scene heading regex should compile")
});

static CHARACTER_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][A-Z\s]*$").expect("character name regex should compile")
});

static TRANSITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:FADE IN:|FADE OUT:|CUT TO:)").expect("transition regex should compile")
});

static EXTENDED_TRANSITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:FADE IN:|FADE OUT:|CUT TO:|DISSOLVE TO:|SMASH CUT TO:)")
        .expect("extended transition regex should compile")
});

static PARENTHETICAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\([^)]+\)$").expect("parenthetical regex should compile")
});

static DIALOGUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s{4,}\p{L}").expect("dialogue regex should compile")
});

/// Split a trimmed line into its scene heading prefix and the remainder.
///
/// The prefix match is case-insensitive; the returned prefix is canonical
/// (uppercase) and the remainder is the original text after it, untrimmed.
#[must_use]
pub fn split_scene_prefix(trimmed: &str) -> Option<(&'static str, &str)> {
    SCENE_HEADING_PREFIXES.iter().find_map(|&prefix| {
        let head = trimmed.get(..prefix.len())?;
        head.eq_ignore_ascii_case(prefix)
            .then(|| (prefix, &trimmed[prefix.len()..]))
    })
}

// ---------------------------------------------------------------------------
// DialogueDetection
// ---------------------------------------------------------------------------

/// Which text the dialogue rule is tested against.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogueDetection {
    /// The line as typed, so indentation counts.
    #[default]
    Raw,
    /// The trimmed line. Dialogue then never matches by classification and
    /// only arises from the editing mode.
    Trimmed,
}

impl DialogueDetection {
    /// Parse the `:set dialoguedetect=` keyword.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "raw" => Some(Self::Raw),
            "trimmed" => Some(Self::Trimmed),
            _ => None,
        }
    }

    /// The `:set` keyword for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Trimmed => "trimmed",
        }
    }
}

// ---------------------------------------------------------------------------
// LineClassifier
// ---------------------------------------------------------------------------

/// Maps a line of text to its [`ElementKind`].
///
/// One classifier belongs to one editing session. The cache it carries is a
/// pure optimization: a classifier with capacity 0 returns the same answers.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    cache: BoundedCache<String, Option<ElementKind>>,
    dialogue: DialogueDetection,
    extended_transitions: bool,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new(&ScreenplayOptions::default())
    }
}

impl LineClassifier {
    /// Build a classifier from session options.
    #[must_use]
    pub fn new(options: &ScreenplayOptions) -> Self {
        Self {
            cache: BoundedCache::new(options.max_cache, options.cache_eviction),
            dialogue: options.dialogue_detection,
            extended_transitions: options.extended_transitions,
        }
    }

    /// A classifier that never caches, for comparisons and one-off checks.
    #[must_use]
    pub fn uncached() -> Self {
        Self {
            cache: BoundedCache::new(0, CacheEviction::Lru),
            ..Self::default()
        }
    }

    /// Classify a line.
    pub fn classify(&mut self, line: &str) -> ElementKind {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ElementKind::Action;
        }

        let anchored = if let Some(hit) = self.cache.get(trimmed) {
            hit
        } else {
            let kind = self.anchored_kind(trimmed);
            self.cache.insert(trimmed.to_string(), kind);
            kind
        };

        let kind = anchored.unwrap_or_else(|| {
            let subject = match self.dialogue {
                DialogueDetection::Raw => line,
                DialogueDetection::Trimmed => trimmed,
            };
            if DIALOGUE_RE.is_match(subject) {
                ElementKind::Dialogue
            } else {
                ElementKind::Action
            }
        });
        log::trace!("classified {trimmed:?} as {kind}");
        kind
    }

    /// Drop every cached classification.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// The memoization cache, for diagnostics.
    #[must_use]
    pub const fn cache(&self) -> &BoundedCache<String, Option<ElementKind>> {
        &self.cache
    }

    /// True when `trimmed` is a configured transition.
    #[must_use]
    pub fn is_transition(&self, trimmed: &str) -> bool {
        if self.extended_transitions {
            EXTENDED_TRANSITION_RE.is_match(trimmed)
        } else {
            TRANSITION_RE.is_match(trimmed)
        }
    }

    /// Rules 1-4, which only need the trimmed text.
    fn anchored_kind(&self, trimmed: &str) -> Option<ElementKind> {
        if SCENE_HEADING_RE.is_match(trimmed) {
            Some(ElementKind::SceneHeading)
        } else if CHARACTER_NAME_RE.is_match(trimmed) {
            Some(ElementKind::CharacterName)
        } else if self.is_transition(trimmed) {
            Some(ElementKind::Transition)
        } else if PARENTHETICAL_RE.is_match(trimmed) {
            Some(ElementKind::Parenthetical)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
