#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduler that walks a playlist and emits creep spawn commands.
//!
//! Simulated time is accumulated from `TimeAdvanced` events, so the scheduler
//! never observes paused frames. Deadlines are absolute points on that clock.

use std::time::Duration;

use creep_defence_core::{Command, CreepView, Event, WaveIndex, WavePlaylist};
use tracing::{info, warn};

/// Extra time granted before the first wave on top of the inter-wave delay.
pub const STARTUP_GRACE: Duration = Duration::from_secs(6);

/// Configuration parameters required to construct the scheduler.
#[derive(Clone, Debug)]
pub struct Config {
    playlist: Option<WavePlaylist>,
    startup_grace: Duration,
}

impl Config {
    /// Creates a configuration for the provided playlist.
    ///
    /// `None` produces a scheduler that never spawns.
    #[must_use]
    pub fn new(playlist: Option<WavePlaylist>) -> Self {
        Self {
            playlist,
            startup_grace: STARTUP_GRACE,
        }
    }

    /// Overrides the delay added before the first wave.
    #[must_use]
    pub fn with_startup_grace(mut self, startup_grace: Duration) -> Self {
        self.startup_grace = startup_grace;
        self
    }
}

/// Coarse state of the spawn state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// Spawning has not started.
    Idle,
    /// Counting down to the next wave.
    WaitingForWave,
    /// Spawning creeps for the current wave.
    WaveActive,
    /// Every wave has been spawned.
    AllWavesComplete,
}

#[derive(Clone, Copy, Debug, Default)]
struct WaveProgress {
    started: bool,
    spawn_cursor: usize,
    reward_given: bool,
}

/// Pure system that turns a playlist into timed spawn and reward commands.
#[derive(Debug)]
pub struct WaveScheduler {
    playlist: Option<WavePlaylist>,
    progress: Vec<WaveProgress>,
    state: SchedulerState,
    current_wave: usize,
    now: Duration,
    next_wave_at: Duration,
    next_spawn_at: Duration,
    startup_grace: Duration,
}

impl WaveScheduler {
    /// Creates a new scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let waves = config
            .playlist
            .as_ref()
            .map_or(0, |playlist| playlist.waves.len());
        Self {
            playlist: config.playlist,
            progress: vec![WaveProgress::default(); waves],
            state: SchedulerState::Idle,
            current_wave: 0,
            now: Duration::ZERO,
            next_wave_at: Duration::ZERO,
            next_spawn_at: Duration::ZERO,
            startup_grace: config.startup_grace,
        }
    }

    /// Begins playing the playlist.
    ///
    /// Returns `false` when no playlist is loaded or spawning already began.
    pub fn start(&mut self) -> bool {
        let Some(playlist) = &self.playlist else {
            return false;
        };
        if self.state != SchedulerState::Idle {
            return false;
        }

        if playlist.waves.is_empty() {
            self.state = SchedulerState::AllWavesComplete;
            return true;
        }

        self.next_wave_at = self
            .now
            .saturating_add(playlist.inter_wave_delay())
            .saturating_add(self.startup_grace);
        self.state = SchedulerState::WaitingForWave;
        true
    }

    /// Consumes world events and emits at most one spawn command.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.now = self.now.saturating_add(*dt);
            }
        }

        if self.state == SchedulerState::WaitingForWave && self.now >= self.next_wave_at {
            self.state = SchedulerState::WaveActive;
            self.next_spawn_at = self.now;
            if let Some(progress) = self.progress.get_mut(self.current_wave) {
                progress.started = true;
            }
            info!(wave = self.current_wave_number(), "wave started");
        }

        if self.state == SchedulerState::WaveActive && self.now >= self.next_spawn_at {
            self.spawn_next(out);
        }
    }

    fn spawn_next(&mut self, out: &mut Vec<Command>) {
        let Some(playlist) = &self.playlist else {
            return;
        };
        let Some(wave) = playlist.waves.get(self.current_wave) else {
            return;
        };
        let Some(progress) = self.progress.get_mut(self.current_wave) else {
            return;
        };
        let wave_index = WaveIndex::new(u32::try_from(self.current_wave).unwrap_or(u32::MAX));

        if let Some(spec) = wave.spawns.get(progress.spawn_cursor) {
            progress.spawn_cursor += 1;
            self.next_spawn_at = self.now.saturating_add(spec.delay());
            match spec.creep() {
                Some(kind) => out.push(Command::SpawnCreep {
                    kind,
                    wave: wave_index,
                }),
                None => warn!(
                    creep = spec.creep_kind.as_str(),
                    wave = wave_index.number(),
                    "unknown creep kind, spawn skipped"
                ),
            }
        }

        if progress.spawn_cursor < wave.spawns.len() {
            return;
        }

        if self.current_wave + 1 < playlist.waves.len() {
            self.next_wave_at = self.now.saturating_add(playlist.inter_wave_delay());
            self.current_wave += 1;
            self.state = SchedulerState::WaitingForWave;
        } else {
            info!("final wave spawned");
            self.state = SchedulerState::AllWavesComplete;
        }
    }

    /// Pays the reward of every fully spawned wave whose creeps are all gone.
    ///
    /// `creeps` must reflect the roster after this tick's combat resolved.
    pub fn pay_rewards(&mut self, creeps: &CreepView, out: &mut Vec<Command>) {
        let Some(playlist) = &self.playlist else {
            return;
        };

        for ((index, wave), progress) in playlist
            .waves
            .iter()
            .enumerate()
            .zip(self.progress.iter_mut())
        {
            if !progress.started || progress.reward_given {
                continue;
            }
            if progress.spawn_cursor < wave.spawns.len() {
                continue;
            }

            let wave_index = WaveIndex::new(u32::try_from(index).unwrap_or(u32::MAX));
            if creeps.count_in_wave(wave_index) > 0 {
                continue;
            }

            progress.reward_given = true;
            info!(
                wave = wave_index.number(),
                reward = wave.reward_amount,
                "wave complete"
            );
            out.push(Command::AwardWaveReward {
                wave: wave_index,
                amount: wave.reward_amount,
            });
        }
    }

    /// Current state of the spawn state machine.
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Simulated time observed by the scheduler.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Reports whether a playlist is loaded.
    #[must_use]
    pub fn has_playlist(&self) -> bool {
        self.playlist.is_some()
    }

    /// Number of spawn entries consumed from the provided wave.
    #[must_use]
    pub fn spawn_cursor(&self, wave: WaveIndex) -> Option<usize> {
        let index = usize::try_from(wave.get()).ok()?;
        self.progress.get(index).map(|progress| progress.spawn_cursor)
    }

    /// Reports whether the provided wave's reward has been paid.
    #[must_use]
    pub fn reward_given(&self, wave: WaveIndex) -> bool {
        usize::try_from(wave.get())
            .ok()
            .and_then(|index| self.progress.get(index))
            .is_some_and(|progress| progress.reward_given)
    }

    /// One-based number of the wave being spawned or counted down to.
    ///
    /// Zero when no playlist is loaded or the playlist has no waves.
    #[must_use]
    pub fn current_wave_number(&self) -> u32 {
        match &self.playlist {
            Some(playlist) if !playlist.waves.is_empty() => {
                u32::try_from(self.current_wave + 1).unwrap_or(u32::MAX)
            }
            _ => 0,
        }
    }

    /// Message describing the scheduler's progress for the HUD.
    #[must_use]
    pub fn status_message(&self) -> String {
        let Some(playlist) = &self.playlist else {
            return String::new();
        };

        if self
            .progress
            .last()
            .is_some_and(|progress| progress.reward_given)
        {
            return "All waves complete!".to_owned();
        }

        match self.state {
            SchedulerState::Idle => String::new(),
            SchedulerState::WaveActive | SchedulerState::AllWavesComplete => playlist
                .waves
                .get(self.current_wave)
                .map(|wave| wave.status_message.clone())
                .unwrap_or_default(),
            SchedulerState::WaitingForWave => {
                let seconds = self.next_wave_at.saturating_sub(self.now).as_secs();
                countdown_message(seconds, self.current_wave == 0)
            }
        }
    }
}

fn countdown_message(seconds: u64, first_wave: bool) -> String {
    if seconds == 0 {
        return "Wave starting now!".to_owned();
    }

    let unit = if seconds == 1 { "second" } else { "seconds" };
    let subject = if first_wave { "Game" } else { "Next wave" };
    format!("{subject} starting in {seconds} {unit}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_wording_follows_remaining_time() {
        assert_eq!(countdown_message(0, true), "Wave starting now!");
        assert_eq!(countdown_message(1, true), "Game starting in 1 second");
        assert_eq!(countdown_message(12, true), "Game starting in 12 seconds");
        assert_eq!(countdown_message(1, false), "Next wave starting in 1 second");
        assert_eq!(countdown_message(3, false), "Next wave starting in 3 seconds");
    }

    #[test]
    fn schedulers_without_a_playlist_stay_idle() {
        let mut scheduler = WaveScheduler::new(Config::new(None));
        assert!(!scheduler.start());
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.status_message(), "");
        assert_eq!(scheduler.current_wave_number(), 0);
    }

    #[test]
    fn empty_playlists_complete_immediately() {
        let mut scheduler = WaveScheduler::new(Config::new(Some(WavePlaylist::default())));
        assert!(scheduler.start());
        assert_eq!(scheduler.state(), SchedulerState::AllWavesComplete);
        assert_eq!(scheduler.current_wave_number(), 0);
        assert!(!scheduler.start());
    }
}
