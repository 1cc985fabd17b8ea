#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Buff engine that ticks timed status effects and emits their damage.
//!
//! Buffs live in a flat registry keyed by target and kind, so a target never
//! carries two buffs of the same kind. New buffs enter through
//! `Event::BuffRequested`; the world has already checked that the target is
//! alive when it broadcasts that event.

use std::{collections::BTreeMap, time::Duration};

use creep_defence_core::{BuffKind, BuffSpec, Command, DamageSource, EntityId, Event};
use tracing::debug;

/// Outcome of ticking one buff.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Repeat,
    Expired,
}

/// Buff attached to a single target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ActiveBuff {
    spec: BuffSpec,
    remaining: Duration,
    to_repeat: Duration,
}

impl ActiveBuff {
    fn new(spec: BuffSpec) -> Self {
        Self {
            spec,
            remaining: spec.duration,
            to_repeat: spec.repeat_interval,
        }
    }

    fn step(&mut self, dt: Duration) -> Step {
        self.remaining = self.remaining.saturating_sub(dt);
        if self.remaining.is_zero() {
            return Step::Expired;
        }

        if !self.spec.repeating {
            return Step::Continue;
        }

        self.to_repeat = self.to_repeat.saturating_sub(dt);
        if self.to_repeat.is_zero() {
            self.to_repeat = self.spec.repeat_interval;
            Step::Repeat
        } else {
            Step::Continue
        }
    }
}

/// System that owns every active buff.
#[derive(Debug, Default)]
pub struct BuffEngine {
    active: BTreeMap<(EntityId, BuffKind), ActiveBuff>,
    expired: Vec<(EntityId, BuffKind)>,
}

impl BuffEngine {
    /// Creates an engine without active buffs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks the registry by the time carried in `events`, then registers
    /// the buffs requested in the same batch.
    ///
    /// `is_alive` reports whether a target still exists in the world.
    pub fn handle<F>(&mut self, events: &[Event], is_alive: F, out: &mut Vec<Command>)
    where
        F: Fn(EntityId) -> bool,
    {
        let dt = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);

        if !dt.is_zero() {
            self.tick(dt, &is_alive, out);
        }

        for event in events {
            if let Event::BuffRequested { target, kind } = event {
                self.register(*target, *kind, &is_alive, out);
            }
        }
    }

    fn tick<F>(&mut self, dt: Duration, is_alive: &F, out: &mut Vec<Command>)
    where
        F: Fn(EntityId) -> bool,
    {
        self.expired.clear();

        for (&(target, kind), buff) in &mut self.active {
            if !is_alive(target) {
                debug!(target = target.get(), buff = kind.name(), "buff target is gone");
                self.expired.push((target, kind));
                continue;
            }

            match buff.step(dt) {
                Step::Continue => {}
                Step::Repeat => out.push(Command::DamageEntity {
                    target,
                    amount: buff.spec.damage_per_repeat,
                    source: DamageSource::Buff(kind),
                }),
                Step::Expired => {
                    debug!(target = target.get(), buff = kind.name(), "buff expired");
                    out.push(Command::ShowBuffEffect {
                        target,
                        kind,
                        visible: false,
                    });
                    self.expired.push((target, kind));
                }
            }
        }

        for key in self.expired.drain(..) {
            let _ = self.active.remove(&key);
        }
    }

    fn register<F>(&mut self, target: EntityId, kind: BuffKind, is_alive: &F, out: &mut Vec<Command>)
    where
        F: Fn(EntityId) -> bool,
    {
        if !is_alive(target) || self.active.contains_key(&(target, kind)) {
            return;
        }

        let _ = self.active.insert((target, kind), ActiveBuff::new(kind.spec()));
        debug!(target = target.get(), buff = kind.name(), "buff applied");
        out.push(Command::ShowBuffEffect {
            target,
            kind,
            visible: true,
        });
    }

    /// Number of buffs currently active across all targets.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Reports whether the target carries the provided buff.
    #[must_use]
    pub fn is_active(&self, target: EntityId, kind: BuffKind) -> bool {
        self.active.contains_key(&(target, kind))
    }

    /// Lifetime left on the provided buff.
    #[must_use]
    pub fn remaining(&self, target: EntityId, kind: BuffKind) -> Option<Duration> {
        self.active.get(&(target, kind)).map(|buff| buff.remaining)
    }
}
