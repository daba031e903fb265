//! # n-screenplay — Screenplay editing core for n-script
//!
//! This crate turns free text into screenplay elements as the user types:
//!
//! - **[`element`]** — `ElementKind` and its page geometry (margins, line lengths)
//! - **[`classifier`]** — `LineClassifier`, precedence-ordered rules with a bounded cache
//! - **[`cache`]** — `BoundedCache`, LRU or FIFO memoization
//! - **[`formatter`]** — case and placement per element, idempotent
//! - **[`machine`]** — `EditingModeMachine`, mode transitions on Enter and Tab
//! - **[`cursor`]** — linear offsets to lines and back across a reformat
//! - **[`index`]** — `BoundedFrequencyIndex`, ranked names for autocomplete
//! - **[`scene`]** — scene segmentation and time-of-day completion
//! - **[`options`]** — `:set`-style configuration
//! - **[`session`]** — `ScreenplaySession`, everything above for one document
//!
//! Nothing here touches the DOM, a terminal, or the filesystem. The input
//! widget feeds lines and offsets in and renders whatever comes back.

pub mod cache;
pub mod classifier;
pub mod cursor;
pub mod element;
pub mod formatter;
pub mod index;
pub mod machine;
pub mod options;
pub mod scene;
pub mod session;

pub use classifier::LineClassifier;
pub use element::ElementKind;
pub use options::{OptionsError, ScreenplayOptions};
pub use session::{Reformat, ScreenplaySession};
