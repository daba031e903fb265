//! Session options — the `:set` system.
//!
//! Provides parsed `:set` directives, option name validation, and the
//! [`ScreenplayOptions`] value they act on. A session is built from one
//! `ScreenplayOptions`; the caches and indexes read their capacities from it.
//!
//! # Supported syntax
//!
//! | Syntax           | Effect                        |
//! |------------------|-------------------------------|
//! | `:set option`    | Enable boolean / show value   |
//! | `:set nooption`  | Disable boolean               |
//! | `:set option!`   | Toggle boolean                |
//! | `:set option?`   | Query current value           |
//! | `:set option=V`  | Assign a value                |
//! | `:set`           | Show changed options          |
//! | `:set all`       | Show all options              |
//!
//! # Option names
//!
//! | Full name             | Abbrev | Type    | Default |
//! |-----------------------|--------|---------|---------|
//! | `maxcache`            | `mc`   | integer | 1000    |
//! | `cacheeviction`       | `ce`   | enum    | `lru`   |
//! | `maxcharacters`       | `mch`  | integer | 50      |
//! | `maxscenes`           | `msc`  | integer | 50      |
//! | `suggestlimit`        | `sl`   | integer | 5       |
//! | `extendedtransitions` | `et`   | bool    | true    |
//! | `dialoguedetect`      | `dd`   | enum    | `raw`   |
//! | `cursorremap`         | `cr`   | enum    | `clamp` |

use thiserror::Error;

use crate::cache::CacheEviction;
use crate::classifier::DialogueDetection;
use crate::cursor::RemapPolicy;

/// Largest accepted classification cache capacity.
const MAX_CACHE_LIMIT: usize = 100_000;

/// Largest accepted index capacity.
const MAX_INDEX_LIMIT: usize = 10_000;

/// Largest accepted suggestion count.
const MAX_SUGGEST_LIMIT: usize = 100;

// ---------------------------------------------------------------------------
// OptionsError
// ---------------------------------------------------------------------------

/// Why a `:set` directive could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("unknown option: {0}")]
    UnknownOption(String),
    #[error("invalid number for {name}: {value}")]
    InvalidNumber { name: String, value: String },
    #[error("invalid value for {name}: {value} (expected {expected})")]
    InvalidValue {
        name: String,
        value: String,
        expected: &'static str,
    },
    #[error("{0} is not a boolean option")]
    NotBoolean(String),
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: String,
        value: usize,
        min: usize,
        max: usize,
    },
}

// ---------------------------------------------------------------------------
// SetDirective
// ---------------------------------------------------------------------------

/// A parsed `:set` directive.
///
/// Produced by [`parse_set`] from the arguments to `:set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `:set option`: enable a boolean option.
    On(String),

    /// `:set nooption`: disable a boolean option.
    Off(String),

    /// `:set option!`: toggle a boolean option.
    Toggle(String),

    /// `:set option?`: query the current value.
    Query(String),

    /// `:set option=value`: assign a value.
    Assign(String, String),

    /// Bare `:set`: show changed options.
    ShowChanged,

    /// `:set all`: show all options.
    ShowAll,
}

/// Returns `true` if `name` is a known boolean option (full name or abbreviation).
#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    matches!(name, "extendedtransitions" | "et")
}

/// Returns `true` if `name` is a known numeric option (full name or abbreviation).
#[must_use]
pub fn is_numeric_option(name: &str) -> bool {
    matches!(
        name,
        "maxcache" | "mc" | "maxcharacters" | "mch" | "maxscenes" | "msc" | "suggestlimit" | "sl"
    )
}

/// Returns `true` if `name` is a known keyword-valued option.
#[must_use]
pub fn is_enum_option(name: &str) -> bool {
    matches!(
        name,
        "cacheeviction" | "ce" | "dialoguedetect" | "dd" | "cursorremap" | "cr"
    )
}

/// Returns `true` if `name` is any known option.
#[must_use]
pub fn is_known_option(name: &str) -> bool {
    is_bool_option(name) || is_numeric_option(name) || is_enum_option(name)
}

/// Expand an abbreviation to its full option name.
#[must_use]
pub fn full_name(name: &str) -> Option<&'static str> {
    Some(match name {
        "maxcache" | "mc" => "maxcache",
        "cacheeviction" | "ce" => "cacheeviction",
        "maxcharacters" | "mch" => "maxcharacters",
        "maxscenes" | "msc" => "maxscenes",
        "suggestlimit" | "sl" => "suggestlimit",
        "extendedtransitions" | "et" => "extendedtransitions",
        "dialoguedetect" | "dd" => "dialoguedetect",
        "cursorremap" | "cr" => "cursorremap",
        _ => return None,
    })
}

/// Parse the full `:set` arguments string into directives.
///
/// Multiple space-separated arguments are supported (e.g., `maxcache=50 noet`).
/// An empty argument string produces [`SetDirective::ShowChanged`].
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return vec![SetDirective::ShowChanged];
    }
    trimmed.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single `:set` argument into a directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if arg == "all" {
        return SetDirective::ShowAll;
    }

    if let Some(eq_pos) = arg.find('=') {
        let name = &arg[..eq_pos];
        let value = &arg[eq_pos + 1..];
        return SetDirective::Assign(name.to_string(), value.to_string());
    }

    if let Some(name) = arg.strip_suffix('?') {
        return SetDirective::Query(name.to_string());
    }

    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }

    // Negation only when the remainder is a known boolean option.
    if let Some(name) = arg.strip_prefix("no") {
        if !name.is_empty() && is_bool_option(name) {
            return SetDirective::Off(name.to_string());
        }
    }

    // Bare valued option name = query its value (Vim behavior).
    if is_numeric_option(arg) || is_enum_option(arg) {
        return SetDirective::Query(arg.to_string());
    }

    SetDirective::On(arg.to_string())
}

/// Format a boolean option for display (`:set` output).
///
/// Returns `"name"` when true, `"noname"` when false.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// ScreenplayOptions
// ---------------------------------------------------------------------------

/// Every tunable of a screenplay session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenplayOptions {
    /// Classification cache capacity. Zero disables caching.
    pub max_cache: usize,
    /// What the classification cache drops when full.
    pub cache_eviction: CacheEviction,
    /// Capacity of the character-name index.
    pub max_characters: usize,
    /// Capacity of the scene-heading index.
    pub max_scenes: usize,
    /// Default number of suggestions returned.
    pub suggest_limit: usize,
    /// Recognize `DISSOLVE TO:` and `SMASH CUT TO:` as transitions.
    pub extended_transitions: bool,
    /// Whether the dialogue rule sees the raw or the trimmed line.
    pub dialogue_detection: DialogueDetection,
    /// How the cursor is repositioned after a line is reformatted.
    pub cursor_remap: RemapPolicy,
}

impl Default for ScreenplayOptions {
    fn default() -> Self {
        Self {
            max_cache: 1000,
            cache_eviction: CacheEviction::Lru,
            max_characters: 50,
            max_scenes: 50,
            suggest_limit: 5,
            extended_transitions: true,
            dialogue_detection: DialogueDetection::Raw,
            cursor_remap: RemapPolicy::Clamp,
        }
    }
}

/// Full option names in display order.
const OPTION_NAMES: [&str; 8] = [
    "maxcache",
    "cacheeviction",
    "maxcharacters",
    "maxscenes",
    "suggestlimit",
    "extendedtransitions",
    "dialoguedetect",
    "cursorremap",
];

impl ScreenplayOptions {
    /// Parse and apply a whole `:set` argument string.
    ///
    /// Stops at the first failing directive. Returns the display lines
    /// produced by queries, in order.
    pub fn set(&mut self, args: &str) -> Result<Vec<String>, OptionsError> {
        let mut shown = Vec::new();
        for directive in parse_set(args) {
            if let Some(text) = self.apply(&directive)? {
                shown.push(text);
            }
        }
        Ok(shown)
    }

    /// Apply one directive. Queries and listings return the text to show.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>, OptionsError> {
        match directive {
            SetDirective::On(name) => self.set_bool(name, |_| true).map(|()| None),
            SetDirective::Off(name) => self.set_bool(name, |_| false).map(|()| None),
            SetDirective::Toggle(name) => self.set_bool(name, |v| !v).map(|()| None),
            SetDirective::Query(name) => self.show(name).map(Some),
            SetDirective::Assign(name, value) => self.assign(name, value).map(|()| None),
            SetDirective::ShowChanged => Ok(Some(self.changed().join("  "))),
            SetDirective::ShowAll => {
                let all: Vec<String> = OPTION_NAMES
                    .iter()
                    .filter_map(|name| self.show(name).ok())
                    .collect();
                Ok(Some(all.join("  ")))
            }
        }
    }

    /// Render one option as `:set` would print it.
    pub fn show(&self, name: &str) -> Result<String, OptionsError> {
        let full = full_name(name).ok_or_else(|| OptionsError::UnknownOption(name.to_string()))?;
        Ok(match full {
            "extendedtransitions" => format_bool(full, self.extended_transitions),
            "maxcache" => format!("{full}={}", self.max_cache),
            "maxcharacters" => format!("{full}={}", self.max_characters),
            "maxscenes" => format!("{full}={}", self.max_scenes),
            "suggestlimit" => format!("{full}={}", self.suggest_limit),
            "cacheeviction" => format!("{full}={}", self.cache_eviction.as_str()),
            "dialoguedetect" => format!("{full}={}", self.dialogue_detection.as_str()),
            _ => format!("{full}={}", self.cursor_remap.as_str()),
        })
    }

    /// Options whose value differs from the default, rendered for display.
    #[must_use]
    pub fn changed(&self) -> Vec<String> {
        let defaults = Self::default();
        OPTION_NAMES
            .iter()
            .filter_map(|name| {
                let ours = self.show(name).ok()?;
                (defaults.show(name).ok()? != ours).then_some(ours)
            })
            .collect()
    }

    fn set_bool(&mut self, name: &str, f: impl FnOnce(bool) -> bool) -> Result<(), OptionsError> {
        match full_name(name) {
            Some("extendedtransitions") => {
                self.extended_transitions = f(self.extended_transitions);
                Ok(())
            }
            Some(_) => Err(OptionsError::NotBoolean(name.to_string())),
            None => Err(OptionsError::UnknownOption(name.to_string())),
        }
    }

    fn assign(&mut self, name: &str, value: &str) -> Result<(), OptionsError> {
        let full = full_name(name).ok_or_else(|| OptionsError::UnknownOption(name.to_string()))?;
        match full {
            "maxcache" => self.max_cache = parse_number(full, value, 0, MAX_CACHE_LIMIT)?,
            "maxcharacters" => {
                self.max_characters = parse_number(full, value, 1, MAX_INDEX_LIMIT)?;
            }
            "maxscenes" => self.max_scenes = parse_number(full, value, 1, MAX_INDEX_LIMIT)?,
            "suggestlimit" => {
                self.suggest_limit = parse_number(full, value, 1, MAX_SUGGEST_LIMIT)?;
            }
            "cacheeviction" => {
                self.cache_eviction =
                    CacheEviction::parse(value).ok_or_else(|| invalid(full, value, "lru|fifo"))?;
            }
            "dialoguedetect" => {
                self.dialogue_detection = DialogueDetection::parse(value)
                    .ok_or_else(|| invalid(full, value, "raw|trimmed"))?;
            }
            "cursorremap" => {
                self.cursor_remap =
                    RemapPolicy::parse(value).ok_or_else(|| invalid(full, value, "clamp|indent"))?;
            }
            _ => {
                self.extended_transitions = match value {
                    "true" | "on" | "1" => true,
                    "false" | "off" | "0" => false,
                    _ => return Err(invalid(full, value, "true|false")),
                };
            }
        }
        Ok(())
    }
}

fn parse_number(name: &str, value: &str, min: usize, max: usize) -> Result<usize, OptionsError> {
    let n: usize = value.parse().map_err(|_| OptionsError::InvalidNumber {
        name: name.to_string(),
        value: value.to_string(),
    })?;
    if n < min || n > max {
        return Err(OptionsError::OutOfRange {
            name: name.to_string(),
            value: n,
            min,
            max,
        });
    }
    Ok(n)
}

fn invalid(name: &str, value: &str, expected: &'static str) -> OptionsError {
    OptionsError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
        expected,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── parse_set_arg ─────────────────────────────────────────────────────

    #[test]
    fn parse_boolean_on_off_toggle() {
        assert_eq!(parse_set_arg("et"), SetDirective::On("et".into()));
        assert_eq!(
            parse_set_arg("noextendedtransitions"),
            SetDirective::Off("extendedtransitions".into())
        );
        assert_eq!(parse_set_arg("et!"), SetDirective::Toggle("et".into()));
    }

    #[test]
    fn parse_assign_and_query() {
        assert_eq!(
            parse_set_arg("maxcache=20"),
            SetDirective::Assign("maxcache".into(), "20".into())
        );
        assert_eq!(parse_set_arg("sl?"), SetDirective::Query("sl".into()));
    }

    #[test]
    fn parse_bare_valued_option_is_query() {
        assert_eq!(parse_set_arg("maxscenes"), SetDirective::Query("maxscenes".into()));
        assert_eq!(parse_set_arg("dd"), SetDirective::Query("dd".into()));
    }

    #[test]
    fn parse_no_prefix_only_for_booleans() {
        // "nomaxcache" is not a boolean negation.
        assert_eq!(parse_set_arg("nomaxcache"), SetDirective::On("nomaxcache".into()));
    }

    #[test]
    fn parse_empty_and_all() {
        assert_eq!(parse_set("  "), vec![SetDirective::ShowChanged]);
        assert_eq!(parse_set("all"), vec![SetDirective::ShowAll]);
    }

    // ── apply ─────────────────────────────────────────────────────────────

    #[test]
    fn assign_numbers() {
        let mut opts = ScreenplayOptions::default();
        opts.set("mc=10 mch=3 msc=4 sl=2").unwrap();
        assert_eq!(opts.max_cache, 10);
        assert_eq!(opts.max_characters, 3);
        assert_eq!(opts.max_scenes, 4);
        assert_eq!(opts.suggest_limit, 2);
    }

    #[test]
    fn assign_enums() {
        let mut opts = ScreenplayOptions::default();
        opts.set("ce=fifo dd=trimmed cr=indent").unwrap();
        assert_eq!(opts.cache_eviction, CacheEviction::Fifo);
        assert_eq!(opts.dialogue_detection, DialogueDetection::Trimmed);
        assert_eq!(opts.cursor_remap, RemapPolicy::IndentAware);
    }

    #[test]
    fn toggle_boolean() {
        let mut opts = ScreenplayOptions::default();
        opts.set("et!").unwrap();
        assert!(!opts.extended_transitions);
        opts.set("et").unwrap();
        assert!(opts.extended_transitions);
        opts.set("noet").unwrap();
        assert!(!opts.extended_transitions);
    }

    #[test]
    fn errors() {
        let mut opts = ScreenplayOptions::default();
        assert_eq!(
            opts.set("foo=1"),
            Err(OptionsError::UnknownOption("foo".into()))
        );
        assert_eq!(
            opts.set("mc=lots"),
            Err(OptionsError::InvalidNumber {
                name: "maxcache".into(),
                value: "lots".into()
            })
        );
        assert_eq!(
            opts.set("mch=0"),
            Err(OptionsError::OutOfRange {
                name: "maxcharacters".into(),
                value: 0,
                min: 1,
                max: MAX_INDEX_LIMIT
            })
        );
        assert!(matches!(
            opts.set("ce=random"),
            Err(OptionsError::InvalidValue { .. })
        ));
        assert_eq!(
            opts.set("maxcache!"),
            Err(OptionsError::NotBoolean("maxcache".into()))
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            OptionsError::UnknownOption("x".into()).to_string(),
            "unknown option: x"
        );
    }

    #[test]
    fn query_and_changed() {
        let mut opts = ScreenplayOptions::default();
        assert_eq!(opts.set("").unwrap(), vec![String::new()]);
        opts.set("mc=7 noet").unwrap();
        assert_eq!(opts.set("mc?").unwrap(), vec!["maxcache=7".to_string()]);
        assert_eq!(
            opts.changed(),
            vec!["maxcache=7".to_string(), "noextendedtransitions".to_string()]
        );
    }

    #[test]
    fn show_all_lists_every_option() {
        let mut opts = ScreenplayOptions::default();
        let shown = opts.set("all").unwrap();
        assert_eq!(shown.len(), 1);
        for name in OPTION_NAMES {
            assert!(shown[0].contains(name), "missing {name}");
        }
    }

    #[test]
    fn failed_directive_keeps_earlier_changes() {
        let mut opts = ScreenplayOptions::default();
        assert!(opts.set("mc=9 bogus").is_err());
        assert_eq!(opts.max_cache, 9);
    }
}
