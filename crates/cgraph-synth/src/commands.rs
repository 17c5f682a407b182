//! Command language
//!
//! A command string holds sub-commands separated by `;`. Each sub-command is
//! a whitespace-separated name, `-x` flags and positional arguments.

use crate::error::{SynthError, SynthResult};
use std::path::PathBuf;

/// One parsed sub-command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `read <file>` / `r <file>`: replace the current network
    Read { path: PathBuf },
    /// `strash [-c]` / `st [-c]`: structurally hash the current network
    Strash { keep_dangling: bool },
    /// `cleanup`: drop dangling nodes
    Cleanup,
    /// `print_stats` / `ps`
    PrintStats,
}

impl Command {
    /// Canonical command name
    pub fn name(&self) -> &'static str {
        match self {
            Command::Read { .. } => "read",
            Command::Strash { .. } => "strash",
            Command::Cleanup => "cleanup",
            Command::PrintStats => "print_stats",
        }
    }

    /// Parse one sub-command
    pub fn parse(text: &str) -> SynthResult<Command> {
        let mut tokens = text.split_whitespace();
        let name = tokens
            .next()
            .ok_or_else(|| SynthError::UnknownCommand(String::new()))?;

        let mut flags = Vec::new();
        let mut args = Vec::new();
        for tok in tokens {
            match tok.strip_prefix('-') {
                Some(flag) if !flag.is_empty() => flags.push(flag),
                _ => args.push(tok),
            }
        }

        let reject_flags = |allowed: &[&str]| -> SynthResult<()> {
            match flags.iter().find(|f| !allowed.contains(*f)) {
                Some(flag) => Err(SynthError::UnknownFlag {
                    command: name.to_string(),
                    flag: flag.to_string(),
                }),
                None => Ok(()),
            }
        };

        match name {
            "read" | "r" => {
                reject_flags(&[])?;
                match args.as_slice() {
                    [path] => Ok(Command::Read {
                        path: PathBuf::from(path),
                    }),
                    _ => Err(SynthError::MissingArgument(name.to_string())),
                }
            }
            "strash" | "st" => {
                reject_flags(&["c"])?;
                // -c toggles cleanup, which is on by default
                let toggles = flags.iter().filter(|f| **f == "c").count();
                Ok(Command::Strash {
                    keep_dangling: toggles % 2 == 1,
                })
            }
            "cleanup" => {
                reject_flags(&[])?;
                Ok(Command::Cleanup)
            }
            "print_stats" | "ps" => {
                reject_flags(&[])?;
                Ok(Command::PrintStats)
            }
            other => Err(SynthError::UnknownCommand(other.to_string())),
        }
    }
}

/// Split a command string into non-empty sub-command texts
pub fn split_script(script: &str) -> impl Iterator<Item = &str> {
    script.split(';').map(str::trim).filter(|s| !s.is_empty())
}
