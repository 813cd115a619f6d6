#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Flags are parsed by hand. `DECK_DEMO_*` environment variables supply
//! defaults that explicit flags override.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Deck demo: headless trading workspace walkthrough

USAGE:
    deck-demo [OPTIONS]

OPTIONS:
    --width=N            Viewport width in cells (default: 120)
    --height=N           Viewport height in cells (default: 40)
    --template=ID        Template for the first workspace (default: trading)
    --drag=N             Cells to drag the first divider by (default: -12)
    --ephemeral          Keep workspaces in memory instead of the state directory
    --export             Print the current workspace as an export document
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    DECK_LOG                   Log filter (default: info)
    DECK_STATE_DIR             Directory holding persisted workspaces
    DECK_STORAGE_KEY           Key of the persisted workspace record
    DECK_SEED_TEMPLATE         Template seeded into an empty store
    DECK_DEMO_WIDTH            Override --width
    DECK_DEMO_HEIGHT           Override --height";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub width: u16,
    pub height: u16,
    pub template: String,
    /// Signed drag distance along the divider's axis.
    pub drag: i32,
    pub ephemeral: bool,
    pub export: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            width: 120,
            height: 40,
            template: "trading".into(),
            drag: -12,
            ephemeral: false,
            export: false,
        }
    }
}

/// Outcome of parsing that does not produce options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    Help,
    Version,
    Invalid(String),
}

impl Opts {
    /// Parse environment variables and process arguments, exiting on
    /// `--help`, `--version` or a bad flag.
    pub fn parse() -> Self {
        let mut opts = Self::default();
        if let Ok(val) = env::var("DECK_DEMO_WIDTH")
            && let Ok(n) = val.parse()
        {
            opts.width = n;
        }
        if let Ok(val) = env::var("DECK_DEMO_HEIGHT")
            && let Ok(n) = val.parse()
        {
            opts.height = n;
        }

        match opts.apply_args(env::args().skip(1)) {
            Ok(()) => opts,
            Err(Exit::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(Exit::Version) => {
                println!("deck-demo {VERSION}");
                process::exit(0);
            }
            Err(Exit::Invalid(msg)) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Apply flags on top of the current values.
    pub fn apply_args(&mut self, args: impl IntoIterator<Item = String>) -> Result<(), Exit> {
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Err(Exit::Help),
                "--version" | "-V" => return Err(Exit::Version),
                "--ephemeral" => self.ephemeral = true,
                "--export" => self.export = true,
                other => {
                    if let Some(val) = other.strip_prefix("--width=") {
                        self.width = parse_value("--width", val)?;
                    } else if let Some(val) = other.strip_prefix("--height=") {
                        self.height = parse_value("--height", val)?;
                    } else if let Some(val) = other.strip_prefix("--drag=") {
                        self.drag = parse_value("--drag", val)?;
                    } else if let Some(val) = other.strip_prefix("--template=") {
                        self.template = val.to_string();
                    } else {
                        return Err(Exit::Invalid(format!("Unknown argument: {other}")));
                    }
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, val: &str) -> Result<T, Exit> {
    val.parse()
        .map_err(|_| Exit::Invalid(format!("Invalid {flag} value: {val}")))
}
