//! Timed terminal scripts replayed by the `run` subcommand.
//!
//! Each non-empty line is a terminal command, optionally prefixed with
//! `@<seconds>` to hold it back until the simulation clock reaches that
//! point. Lines starting with `#` are comments.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};

/// Terminal command scheduled at a simulation time.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ScriptLine {
    pub(crate) at: Duration,
    pub(crate) command: String,
}

/// Parses a script, returning its lines ordered by their due time.
pub(crate) fn parse(source: &str) -> Result<Vec<ScriptLine>> {
    let mut lines = Vec::new();
    for (number, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parsed =
            parse_line(line).with_context(|| format!("script line {}: '{line}'", number + 1))?;
        lines.push(parsed);
    }
    lines.sort_by_key(|line| line.at);
    Ok(lines)
}

fn parse_line(line: &str) -> Result<ScriptLine> {
    let Some(rest) = line.strip_prefix('@') else {
        return Ok(ScriptLine {
            at: Duration::ZERO,
            command: line.to_owned(),
        });
    };

    let (time, command) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| anyhow!("timed line has no command"))?;
    let seconds: f32 = time
        .parse()
        .with_context(|| format!("'{time}' is not a number of seconds"))?;
    let at = Duration::try_from_secs_f32(seconds)
        .with_context(|| format!("'{time}' is not a valid time"))?;

    Ok(ScriptLine {
        at,
        command: command.trim().to_owned(),
    })
}
