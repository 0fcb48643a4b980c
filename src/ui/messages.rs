//! User-facing CLI output.
//!
//! Colors are dropped when `NO_COLOR` is set or the stream is not a terminal.

use std::env;
use std::fmt;
use std::io::{self, IsTerminal, Write};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn icon(self) -> &'static str {
        match self {
            Level::Info => "ℹ️",
            Level::Success => "✅",
            Level::Warning => "⚠️",
            Level::Error => "❌",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Level::Info => "\x1b[34m",
            Level::Success => "\x1b[32m",
            Level::Warning => "\x1b[33m",
            Level::Error => "\x1b[31m",
        }
    }
}

/// One message line, `styled` adds the ANSI color around the icon.
pub fn format_line(level: Level, msg: &dyn fmt::Display, styled: bool) -> String {
    if styled {
        format!("{}{}{}{} {}", level.color(), BOLD, level.icon(), RESET, msg)
    } else {
        format!("{} {}", level.icon(), msg)
    }
}

fn use_color(is_terminal: bool) -> bool {
    is_terminal && env::var_os("NO_COLOR").is_none()
}

fn emit(level: Level, msg: &dyn fmt::Display) {
    if level == Level::Error {
        let stderr = io::stderr();
        let line = format_line(level, msg, use_color(stderr.is_terminal()));
        let _ = writeln!(stderr.lock(), "{line}");
    } else {
        let stdout = io::stdout();
        let line = format_line(level, msg, use_color(stdout.is_terminal()));
        let _ = writeln!(stdout.lock(), "{line}");
    }
}

pub fn info<T: fmt::Display>(msg: T) {
    emit(Level::Info, &msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    emit(Level::Success, &msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    emit(Level::Warning, &msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    emit(Level::Error, &msg);
}
