#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Developer terminal that parses typed command lines into world commands.
//!
//! The terminal never touches the world directly. Each command inspects a
//! read-only [`TerminalContext`], writes human-readable lines to the
//! terminal output and pushes [`Command`] values for the caller to apply.

mod commands;

use std::collections::VecDeque;
use std::fmt;

use creep_defence_core::{Command, CreepView, GameStatus, TowerView};
use tracing::info;

pub use commands::{GiveBuff, GiveHealth, GiveMoney, Help, ListCreeps, ListTowers};

/// Longest line the terminal prints before truncating.
pub const MAX_LINE_LENGTH: usize = 100;

/// Number of output lines retained as scrollback.
pub const MAX_OUTPUT_LINES: usize = 29;

/// Marker appended to truncated lines.
const TRUNCATION_MARKER: &str = " [...]";

/// Styling class of a terminal output line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// Command failure.
    Error,
    /// Table header.
    Header,
    /// Regular output.
    Info,
    /// Echo of the line the user typed.
    InputRecord,
}

/// Single line written to the terminal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLine {
    /// Styling class of the line.
    pub kind: OutputKind,
    /// Line contents, already truncated.
    pub text: String,
}

impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OutputKind::Error => write!(f, "ERROR: {}", self.text),
            OutputKind::InputRecord => write!(f, "> {}", self.text),
            OutputKind::Header | OutputKind::Info => f.write_str(&self.text),
        }
    }
}

/// Scrollback buffer of the terminal.
#[derive(Clone, Debug, Default)]
pub struct TerminalOutput {
    lines: VecDeque<OutputLine>,
}

impl TerminalOutput {
    /// Appends a line, truncating it and dropping the oldest scrollback.
    pub fn write(&mut self, kind: OutputKind, text: impl Into<String>) {
        let text = truncate_line(text.into());
        self.lines.push_back(OutputLine { kind, text });
        while self.lines.len() > MAX_OUTPUT_LINES {
            let _ = self.lines.pop_front();
        }
    }

    /// Lines currently retained, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &OutputLine> {
        self.lines.iter()
    }

    /// Most recently written line.
    #[must_use]
    pub fn last(&self) -> Option<&OutputLine> {
        self.lines.back()
    }

    /// Removes every retained line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Read-only game state the terminal commands may inspect.
#[derive(Clone, Copy, Debug)]
pub struct TerminalContext<'a> {
    /// Current match gate.
    pub status: GameStatus,
    /// Active creep roster; creep identifiers typed in the terminal are
    /// indices into this view.
    pub creeps: &'a CreepView,
    /// Towers on the board.
    pub towers: &'a TowerView,
}

impl TerminalContext<'_> {
    /// Reports whether state-touching commands may run.
    #[must_use]
    pub fn accepts_changes(&self) -> bool {
        self.status.is_running()
    }
}

/// Everything a command may read or write while executing.
#[derive(Debug)]
pub struct Session<'a> {
    /// Game state visible to the command.
    pub context: TerminalContext<'a>,
    /// Every registered command, in registration order.
    pub catalogue: &'a [Box<dyn TerminalCommand>],
    /// Output buffer for human-readable lines.
    pub output: &'a mut TerminalOutput,
    /// World commands produced by the command.
    pub commands: &'a mut Vec<Command>,
}

/// Command the developer terminal can run.
pub trait TerminalCommand: fmt::Debug {
    /// Names the command answers to. The first alias is its display name.
    fn aliases(&self) -> &'static [&'static str];

    /// One-line description shown by `help`.
    fn description(&self) -> &'static str;

    /// Example invocation shown by `help` and in errors.
    fn usage(&self) -> &'static str;

    /// Runs the command with the whitespace-separated arguments.
    fn execute(&self, args: &[&str], session: &mut Session<'_>);
}

/// Developer terminal with its registered commands, history and scrollback.
#[derive(Debug)]
pub struct Terminal {
    commands: Vec<Box<dyn TerminalCommand>>,
    history: Vec<String>,
    output: TerminalOutput,
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal {
    /// Creates a terminal with the standard command set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: vec![
                Box::new(GiveHealth),
                Box::new(GiveMoney),
                Box::new(GiveBuff),
                Box::new(ListCreeps),
                Box::new(ListTowers),
                Box::new(Help),
            ],
            history: Vec::new(),
            output: TerminalOutput::default(),
        }
    }

    /// Registers an additional command.
    pub fn register(&mut self, command: Box<dyn TerminalCommand>) {
        self.commands.push(command);
    }

    /// Parses and runs a typed line, pushing resulting world commands to `out`.
    ///
    /// Blank input and the lone terminal toggle key are ignored.
    pub fn run(&mut self, input: &str, context: TerminalContext<'_>, out: &mut Vec<Command>) {
        let line = input.trim();
        if line.is_empty() || line == "`" {
            return;
        }

        self.history.push(line.to_owned());
        self.output.write(OutputKind::InputRecord, line);

        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return;
        };
        let args: Vec<&str> = words.collect();

        let Some(command) = self
            .commands
            .iter()
            .find(|command| command.aliases().contains(&name))
        else {
            self.output
                .write(OutputKind::Error, format!("Command '{name}' does not exist"));
            return;
        };

        info!(command = line, "executing terminal command");
        let mut session = Session {
            context,
            catalogue: &self.commands,
            output: &mut self.output,
            commands: out,
        };
        command.execute(&args, &mut session);
    }

    /// Lines typed so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Scrollback buffer.
    #[must_use]
    pub fn output(&self) -> &TerminalOutput {
        &self.output
    }

    /// Empties the scrollback buffer.
    pub fn clear_output(&mut self) {
        self.output.clear();
    }
}

/// Pads three cells into a 20/30/50 column row.
#[must_use]
pub fn format_row(first: &str, second: &str, third: &str) -> String {
    format!("{first:<20}{second:<30}{third:<50}")
}

fn truncate_line(text: String) -> String {
    match text.char_indices().nth(MAX_LINE_LENGTH) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &text[..cut]),
        None => text,
    }
}
