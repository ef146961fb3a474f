// src/args.rs
//
// Command line surface of the imagesaver binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::editor::ConfigureCommand;

#[derive(Parser, Debug)]
#[command(name = "imagesaver", version, about = "A screensaver that emits animated images")]
pub struct Cli {
    /// Settings store directory (defaults to the per-user config directory)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the screensaver fullscreen
    Run,
    /// Run the screensaver in a preview window
    Window,
    /// Show or change the settings
    Configure {
        #[command(subcommand)]
        command: ConfigureCommand,
    },
}

impl Cli {
    /// The requested command; no subcommand runs the saver
    pub fn take_command(&mut self) -> Command {
        self.command.take().unwrap_or(Command::Run)
    }
}

/// Rewrite the screensaver host switches (`/s`, `/c`, `/p <hwnd>`, also with a
/// `:value` suffix or a leading `-`) into subcommands. Other arguments pass
/// through untouched. The first argument is the program name.
pub fn normalize_legacy_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut normalized: Vec<String> = args.next().into_iter().collect();
    let rest: Vec<String> = args.collect();

    let Some(first) = rest.first() else {
        return normalized;
    };

    let switch = first
        .strip_prefix('/')
        .or_else(|| first.strip_prefix('-').filter(|s| s.len() == 1 || s.contains(':')))
        .map(|s| s.split(':').next().unwrap_or_default().to_ascii_lowercase());

    let replacement: &[&str] = match switch.as_deref() {
        Some("s") => &["run"],
        Some("c") => &["configure", "show"],
        Some("p") => &["window"],
        _ => {
            normalized.extend(rest);
            return normalized;
        }
    };

    normalized.extend(replacement.iter().map(|s| s.to_string()));
    // the host window handle after /p or /c is not used
    let skip = if rest.get(1).is_some_and(|arg| arg.parse::<u64>().is_ok()) {
        2
    } else {
        1
    };
    normalized.extend(rest.into_iter().skip(skip));
    normalized
}
