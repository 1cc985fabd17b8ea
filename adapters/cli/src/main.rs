#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Creep Defence headlessly.
//!
//! `run` drives a match at a fixed tick rate and prints a summary, while the
//! remaining subcommands inspect or export the data files the game reads.

mod script;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, ensure, Context, Result};
use clap::{Args, Parser, Subcommand};
use creep_defence_core::{
    BoardPick, Event, GameConfig, PlatformId, RemovalReason, SlotId, SocketRef, TowerKind,
    WavePlaylist,
};
use creep_defence_simulation::{config_or_inert, load_playlist, playlist_or_none, Simulation};
use creep_defence_world::query;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::script::ScriptLine;

const ALL_WAVES_COMPLETE: &str = "All waves complete!";

/// Headless driver for the Creep Defence simulation.
#[derive(Debug, Parser)]
#[command(name = "creep-defence", version, about)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Plays a match until every wave is done, the player dies or time runs out.
    Run(RunArgs),
    /// Loads a wave playlist and reports its contents.
    CheckPlaylist {
        /// JSON playlist to inspect.
        path: PathBuf,
    },
    /// Writes the built-in wave playlist as JSON.
    ExportPlaylist {
        /// Destination file.
        path: PathBuf,
    },
    /// Writes the built-in game configuration as TOML.
    ExportConfig {
        /// Destination file.
        path: PathBuf,
    },
}

#[derive(Debug, Args)]
struct RunArgs {
    /// TOML game configuration; the built-in values are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON wave playlist; the built-in playlist is used when omitted.
    #[arg(long)]
    playlist: Option<PathBuf>,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 50)]
    tick_ms: u64,
    /// Upper bound on simulated seconds.
    #[arg(long, default_value_t = 300)]
    seconds: u64,
    /// Builds a platform with a cannon and a bleed tower before the first wave.
    #[arg(long)]
    demo: bool,
    /// Terminal script, one command per line, optionally prefixed with `@<seconds>`.
    #[arg(long)]
    script: Option<PathBuf>,
}

/// Entry point for the Creep Defence command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        CliCommand::Run(args) => run(&args),
        CliCommand::CheckPlaylist { path } => check_playlist(&path),
        CliCommand::ExportPlaylist { path } => export_playlist(&path),
        CliCommand::ExportConfig { path } => export_config(&path),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(args: &RunArgs) -> Result<()> {
    ensure!(args.tick_ms > 0, "--tick-ms must be positive");

    let config = config_or_inert(args.config.as_deref());
    let playlist = match &args.playlist {
        Some(path) => playlist_or_none(path),
        None => Some(WavePlaylist::builtin()),
    };
    let script = match &args.script {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read script {}", path.display()))?;
            script::parse(&source)?
        }
        None => Vec::new(),
    };

    let mut sim = Simulation::new(config, playlist);
    println!("{}", sim.welcome_banner());

    let mut summary = Summary::default();
    let mut events = Vec::new();
    sim.start_game(&mut events);
    if args.demo {
        build_demo_defence(&mut sim, &mut events);
    }
    summary.record(&events);

    let dt = Duration::from_millis(args.tick_ms);
    let limit = Duration::from_secs(args.seconds);
    let mut pending = script.into_iter().peekable();
    let mut message = String::new();

    while sim.status().in_progress && query::clock(sim.world()) < limit {
        let clock = query::clock(sim.world());
        while let Some(line) = pending.next_if(|line: &ScriptLine| line.at <= clock) {
            events.clear();
            sim.run_terminal(&line.command, &mut events);
            summary.record(&events);
            print_terminal(&mut sim);
        }

        events.clear();
        sim.tick(dt, &mut events);
        summary.record(&events);
        log_events(&events);

        let current = sim.wave_status_message();
        if current != message {
            info!(wave = sim.current_wave_number(), "{current}");
            message = current;
        }
        if message == ALL_WAVES_COMPLETE || summary.game_over {
            break;
        }
    }

    for line in pending {
        warn!(at = ?line.at, command = %line.command, "script line never ran");
    }

    summary.print(&sim);
    Ok(())
}

/// Spends the starting funds on one platform holding both tower kinds.
fn build_demo_defence(sim: &mut Simulation, out: &mut Vec<Event>) {
    sim.select(Some(BoardPick::Slot(SlotId::new(0))), out);
    sim.buy_platform(out);

    for (index, kind) in TowerKind::ALL.into_iter().enumerate() {
        let socket = SocketRef::new(PlatformId::new(0), index as u32);
        sim.select(Some(BoardPick::Socket(socket)), out);
        if sim.can_buy_tower(kind) {
            sim.buy_tower(kind, out);
        } else {
            warn!(?kind, "cannot afford demo tower");
        }
    }
}

fn print_terminal(sim: &mut Simulation) {
    for line in sim.terminal().output().lines() {
        println!("{line}");
    }
    sim.clear_terminal_output();
}

fn log_events(events: &[Event]) {
    for event in events {
        match event {
            Event::CreepSpawned { creep, kind, .. } => info!(?creep, ?kind, "creep spawned"),
            Event::CreepSpawnRejected { kind, .. } => warn!(?kind, "creep spawn rejected"),
            Event::CreepKilled { creep, killer, .. } => info!(?creep, ?killer, "creep killed"),
            Event::CreepReachedEnd { creep, damage } => {
                warn!(?creep, damage, "creep reached the end of the path")
            }
            Event::WaveRewardPaid { wave, amount } => {
                info!(wave = wave.number(), amount, "wave reward paid")
            }
            Event::GameOver => warn!("player health ran out"),
            Event::TimeAdvanced { .. } => {}
            other => debug!(event = ?other),
        }
    }
}

/// Running totals printed after a match.
#[derive(Debug, Default)]
struct Summary {
    spawned: u32,
    killed: u32,
    escaped: u32,
    shots: u32,
    rewards: i64,
    game_over: bool,
}

impl Summary {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::CreepSpawned { .. } => self.spawned += 1,
                Event::CreepRemoved { reason, .. } => match reason {
                    RemovalReason::Killed => self.killed += 1,
                    RemovalReason::ReachedEnd => self.escaped += 1,
                },
                Event::ProjectileFired { .. } => self.shots += 1,
                Event::WaveRewardPaid { amount, .. } => self.rewards += amount,
                Event::GameOver => self.game_over = true,
                _ => {}
            }
        }
    }

    fn print(&self, sim: &Simulation) {
        let player = query::player(sim.world());
        println!(
            "after {:.1}s: wave {} '{}'",
            query::clock(sim.world()).as_secs_f32(),
            sim.current_wave_number(),
            sim.wave_status_message()
        );
        println!(
            "creeps spawned {}, killed {}, escaped {}; shots fired {}",
            self.spawned, self.killed, self.escaped, self.shots
        );
        println!(
            "wave rewards ${}; player ${} with {} HP{}",
            self.rewards,
            player.money,
            player.health,
            if self.game_over { " (game over)" } else { "" }
        );
    }
}

fn check_playlist(path: &Path) -> Result<()> {
    let playlist = load_playlist(path)
        .with_context(|| format!("failed to load playlist {}", path.display()))?;

    println!(
        "{} waves, {}s between waves",
        playlist.waves.len(),
        playlist.inter_wave_delay
    );
    let mut unknown = Vec::new();
    for (index, wave) in playlist.waves.iter().enumerate() {
        let span: f32 = wave.spawns.iter().map(|spawn| spawn.delay_before_next).sum();
        println!(
            "wave {}: '{}', {} spawns over {span:.1}s, reward ${}",
            index + 1,
            wave.status_message,
            wave.spawns.len(),
            wave.reward_amount
        );
        unknown.extend(
            wave.spawns
                .iter()
                .filter(|spawn| spawn.creep().is_none())
                .map(|spawn| format!("wave {}: '{}'", index + 1, spawn.creep_kind)),
        );
    }

    if !unknown.is_empty() {
        bail!("unknown creep kinds: {}", unknown.join(", "));
    }
    Ok(())
}

fn export_playlist(path: &Path) -> Result<()> {
    let playlist = WavePlaylist::builtin();
    let json = playlist
        .to_json_string()
        .context("failed to encode the built-in playlist")?;
    fs::write(path, &json).with_context(|| format!("failed to write {}", path.display()))?;

    let reread = load_playlist(path)
        .with_context(|| format!("failed to reload {}", path.display()))?;
    ensure!(reread == playlist, "exported playlist does not round-trip");
    info!(path = %path.display(), waves = playlist.waves.len(), "playlist exported");
    Ok(())
}

fn export_config(path: &Path) -> Result<()> {
    let toml = toml::to_string_pretty(&GameConfig::default())
        .context("failed to encode the built-in configuration")?;
    fs::write(path, toml).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "configuration exported");
    Ok(())
}
