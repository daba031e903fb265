// SPDX-License-Identifier: MIT
//
// n-script — replay a plain-text screenplay through the n-screenplay core.
//
// Each line of the input is treated as if it had been typed and completed
// with Enter:
//
//   line → classify (+ current mode) → format → print
//        → advance_on_enter → next mode, character/scene indexes
//
// The mode matters inside a dialogue block: plain text under a character
// name or parenthetical is placed as dialogue even when it isn't indented.
//
// Output is one of:
//
//   (default)      the formatted script
//   --scenes       one `<line>: <heading>` per scene, 1-indexed
//   --characters   one `<count> <name>` per speaker, most frequent first
//
// Options use the same `:set` syntax as the editor (`--set "mc=200 noet"`).
// Logging goes through env_logger; set RUST_LOG=debug to watch the mode
// machine.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use n_screenplay::{ScreenplayOptions, ScreenplaySession};

const USAGE: &str = "\
usage: n-script [--set DIRECTIVES]... [--scenes | --characters] [FILE]

Reads FILE (or stdin) and prints it formatted as a screenplay.

  --set DIRECTIVES   apply :set directives, e.g. --set \"maxcache=200 noet\"
  --scenes           list scene headings with their line numbers
  --characters       list character names by frequency
  -h, --help         show this help";

// ─── Arguments ──────────────────────────────────────────────────────────────

/// What to print after replaying the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Output {
    #[default]
    Script,
    Scenes,
    Characters,
}

/// Parsed command line.
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    sets: Vec<String>,
    output: Output,
    file: Option<String>,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if let Some(value) = arg.strip_prefix("--set=") {
            parsed.sets.push(value.to_string());
            continue;
        }
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "--set" => {
                let value = args.next().ok_or("--set needs an argument")?;
                parsed.sets.push(value);
            }
            "--scenes" | "--characters" => {
                let output = if arg == "--scenes" {
                    Output::Scenes
                } else {
                    Output::Characters
                };
                if parsed.output != Output::Script && parsed.output != output {
                    return Err("--scenes and --characters are exclusive".to_string());
                }
                parsed.output = output;
            }
            _ if arg.starts_with('-') && arg != "-" => {
                return Err(format!("unknown flag: {arg}"));
            }
            _ => {
                if parsed.file.is_some() {
                    return Err(format!("unexpected argument: {arg}"));
                }
                parsed.file = Some(arg);
            }
        }
    }
    Ok(parsed)
}

fn build_options(sets: &[String]) -> Result<ScreenplayOptions, String> {
    let mut options = ScreenplayOptions::default();
    for directives in sets {
        options.set(directives).map_err(|e| e.to_string())?;
    }
    Ok(options)
}

fn read_input(file: Option<&str>) -> Result<String, String> {
    match file {
        Some(path) if path != "-" => fs::read_to_string(path).map_err(|e| format!("{path}: {e}")),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("stdin: {e}"))?;
            Ok(text)
        }
    }
}

// ─── Replay ─────────────────────────────────────────────────────────────────

/// Format every line and drive the mode machine as if it had been typed.
fn replay(session: &mut ScreenplaySession, text: &str) -> Vec<String> {
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.split('\n')
        .map(|line| {
            let formatted = session.format_for_mode(line);
            let hint = session.advance_on_enter(line);
            log::trace!("{line:?} -> next mode {}", hint.mode);
            formatted
        })
        .collect()
}

fn render(session: &mut ScreenplaySession, text: &str, output: Output) -> Vec<String> {
    let formatted = replay(session, text);
    match output {
        Output::Script => formatted,
        Output::Scenes => session
            .scene_segments(text)
            .iter()
            .map(|scene| format!("{}: {}", scene.start_line + 1, scene.heading))
            .collect(),
        Output::Characters => {
            session.index_document(text);
            session
                .characters()
                .ranked()
                .into_iter()
                .map(|(name, count)| format!("{count} {name}"))
                .collect()
        }
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn run(args: Args) -> Result<(), String> {
    let options = build_options(&args.sets)?;
    let text = read_input(args.file.as_deref())?;
    let mut session = ScreenplaySession::new(options);

    for line in render(&mut session, &text, args.output) {
        println!("{line}");
    }
    log::debug!(
        "replay done: cache {} hits, {} misses",
        session.classifier().cache().hits(),
        session.classifier().cache().misses()
    );
    Ok(())
}

fn main() {
    env_logger::init();

    let args = parse_args(env::args().skip(1)).unwrap_or_else(|e| {
        eprintln!("n-script: {e}");
        eprintln!("{USAGE}");
        process::exit(1);
    });

    if args.help {
        println!("{USAGE}");
        return;
    }

    if let Err(e) = run(args) {
        eprintln!("n-script: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| (*s).to_string()))
    }

    const SCRIPT: &str = "int. house - day\nJOHN\n(quietly)\nhello.\n    Bye.\n\next. park\nshe waits.\nJOHN\n    Over here.\n";

    // ── Argument parsing ──────────────────────────────────────────────────

    #[test]
    fn no_arguments_reads_stdin_as_script() {
        assert_eq!(args(&[]).unwrap(), Args::default());
    }

    #[test]
    fn flags_and_file() {
        let parsed = args(&["--set", "mc=10", "--scenes", "draft.txt"]).unwrap();
        assert_eq!(parsed.sets, vec!["mc=10".to_string()]);
        assert_eq!(parsed.output, Output::Scenes);
        assert_eq!(parsed.file.as_deref(), Some("draft.txt"));
    }

    #[test]
    fn set_with_equals_sign() {
        let parsed = args(&["--set=noet", "--set", "sl=3"]).unwrap();
        assert_eq!(parsed.sets, vec!["noet".to_string(), "sl=3".to_string()]);
    }

    #[test]
    fn help_flag() {
        assert!(args(&["-h"]).unwrap().help);
        assert!(args(&["--help"]).unwrap().help);
    }

    #[test]
    fn bad_arguments() {
        assert!(args(&["--set"]).is_err());
        assert!(args(&["--scenes", "--characters"]).is_err());
        assert!(args(&["--bogus"]).is_err());
        assert!(args(&["a.txt", "b.txt"]).is_err());
        assert_eq!(args(&["-"]).unwrap().file.as_deref(), Some("-"));
    }

    #[test]
    fn options_from_directives() {
        let options = build_options(&["sl=3 noet".to_string()]).unwrap();
        assert_eq!(options.suggest_limit, 3);
        assert!(!options.extended_transitions);
        assert!(build_options(&["nosuch=1".to_string()]).is_err());
    }

    // ── Replay ────────────────────────────────────────────────────────────

    #[test]
    fn replay_formats_each_line() {
        let mut session = ScreenplaySession::default();
        let out = replay(&mut session, SCRIPT);
        let john = format!("{}JOHN{}", " ".repeat(36), " ".repeat(40));
        assert_eq!(
            out,
            vec![
                "INT. HOUSE - DAY".to_string(),
                john.clone(),
                "    (quietly)".to_string(),
                "    hello.".to_string(),
                "    Bye.".to_string(),
                String::new(),
                "EXT. PARK".to_string(),
                "She waits.".to_string(),
                john,
                "    Over here.".to_string(),
            ]
        );
    }

    #[test]
    fn scene_listing() {
        let mut session = ScreenplaySession::default();
        let out = render(&mut session, SCRIPT, Output::Scenes);
        assert_eq!(out, vec!["1: int. house - day".to_string(), "7: ext. park".to_string()]);
    }

    #[test]
    fn character_listing() {
        let mut session = ScreenplaySession::default();
        let out = render(&mut session, SCRIPT, Output::Characters);
        assert_eq!(out, vec!["2 JOHN".to_string()]);
    }
}
