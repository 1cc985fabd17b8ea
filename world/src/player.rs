//! Player resources and match gate.

use creep_defence_core::{Event, GameStatus, PlayerConfig, PlayerSnapshot, Selection};
use tracing::{info, warn};

/// Money, health, selection and the match gate.
#[derive(Debug)]
pub(crate) struct Player {
    pub(crate) status: GameStatus,
    pub(crate) selection: Selection,
    money: i64,
    health: i32,
}

impl Player {
    pub(crate) fn new(config: &PlayerConfig) -> Self {
        Self {
            status: GameStatus::default(),
            selection: Selection::default(),
            money: config.starting_money,
            health: config.starting_health,
        }
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            money: self.money,
            health: self.health,
        }
    }

    /// Changes funds while a match is in progress.
    pub(crate) fn adjust_money(&mut self, delta: i64, out_events: &mut Vec<Event>) {
        if !self.status.in_progress {
            return;
        }

        self.money = self.money.saturating_add(delta);
        if self.money < 0 {
            warn!(money = self.money, "player funds went negative");
        }
        out_events.push(Event::MoneyChanged {
            money: self.money,
            delta,
        });
    }

    /// Changes health while a match is in progress, ending the match when it
    /// runs out.
    pub(crate) fn adjust_health(&mut self, delta: i32, out_events: &mut Vec<Event>) {
        if !self.status.in_progress {
            return;
        }

        self.health = self.health.saturating_add(delta).max(0);
        out_events.push(Event::HealthChanged {
            health: self.health,
            delta,
        });

        if self.health == 0 {
            info!("player health depleted, game over");
            self.status.in_progress = false;
            out_events.push(Event::GameOver);
            out_events.push(Event::GameStatusChanged {
                status: self.status,
            });
        }
    }
}
