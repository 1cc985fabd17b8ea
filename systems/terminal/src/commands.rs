//! Built-in terminal commands.

use creep_defence_core::{BuffKind, Command, PlatformId, SocketRef};

use crate::{format_row, OutputKind, Session, TerminalCommand};

/// Adds money to the player's balance.
#[derive(Clone, Copy, Debug, Default)]
pub struct GiveMoney;

impl TerminalCommand for GiveMoney {
    fn aliases(&self) -> &'static [&'static str] {
        &["givemoney", "give_money"]
    }

    fn description(&self) -> &'static str {
        "Gives the player the given amount of money"
    }

    fn usage(&self) -> &'static str {
        "givemoney 100"
    }

    fn execute(&self, args: &[&str], session: &mut Session<'_>) {
        if !session.context.accepts_changes() {
            session.output.write(
                OutputKind::Error,
                "Game is not in progress or is paused, cannot give player money",
            );
            return;
        }

        let Some(amount) = parse_amount::<i64>(args, self.usage(), session) else {
            return;
        };

        session
            .output
            .write(OutputKind::Info, format!("Giving player ${amount}"));
        session.commands.push(Command::AdjustMoney { amount });
    }
}

/// Adds health to the player.
#[derive(Clone, Copy, Debug, Default)]
pub struct GiveHealth;

impl TerminalCommand for GiveHealth {
    fn aliases(&self) -> &'static [&'static str] {
        &["give_health", "givehealth"]
    }

    fn description(&self) -> &'static str {
        "Gives the player the given amount of health"
    }

    fn usage(&self) -> &'static str {
        "give_health 100"
    }

    fn execute(&self, args: &[&str], session: &mut Session<'_>) {
        if !session.context.accepts_changes() {
            session.output.write(
                OutputKind::Error,
                "Game is not in progress or is paused, cannot give player health",
            );
            return;
        }

        let Some(amount) = parse_amount::<i32>(args, self.usage(), session) else {
            return;
        };

        session
            .output
            .write(OutputKind::Info, format!("Giving player {amount} HP"));
        session.commands.push(Command::AdjustHealth { amount });
    }
}

/// Parses the optional amount argument; a missing amount means zero.
fn parse_amount<T>(args: &[&str], usage: &str, session: &mut Session<'_>) -> Option<T>
where
    T: std::str::FromStr + Default,
{
    let Some(raw) = args.first() else {
        return Some(T::default());
    };

    match raw.parse() {
        Ok(amount) => Some(amount),
        Err(_) => {
            session.output.write(
                OutputKind::Error,
                format!("'{raw}' could not be parsed to an integer, Usage: '{usage}'"),
            );
            None
        }
    }
}

/// Applies a buff to a tower or creep by name.
#[derive(Clone, Copy, Debug, Default)]
pub struct GiveBuff;

impl TerminalCommand for GiveBuff {
    fn aliases(&self) -> &'static [&'static str] {
        &["give_buff", "givebuff"]
    }

    fn description(&self) -> &'static str {
        "Gives a buff to a creep or tower"
    }

    fn usage(&self) -> &'static str {
        "give_buff tower 0,0 bleed"
    }

    fn execute(&self, args: &[&str], session: &mut Session<'_>) {
        if !session.context.accepts_changes() {
            session.output.write(
                OutputKind::Error,
                "Game is not in progress or is paused, cannot give buff",
            );
            return;
        }

        let [kind, id, buff_name] = args else {
            session.output.write(
                OutputKind::Error,
                "Invalid number of arguments, run 'help' for more details",
            );
            return;
        };

        let target = match *kind {
            "tower" => {
                let Some(socket) = parse_socket(id) else {
                    session.output.write(
                        OutputKind::Error,
                        format!("Could not parse tower ID from '{id}', Usage: '{}'", self.usage()),
                    );
                    return;
                };
                session
                    .context
                    .towers
                    .in_socket(socket)
                    .map(|tower| (tower.id, tower.kind.name()))
            }
            "creep" => {
                let Ok(index) = id.parse::<usize>() else {
                    session.output.write(
                        OutputKind::Error,
                        format!("Could not parse creep ID from '{id}', Usage: '{}'", self.usage()),
                    );
                    return;
                };
                let creep = session.context.creeps.get(index);
                if creep.is_none() {
                    session.output.write(
                        OutputKind::Error,
                        format!("Creep ID '{index}' does not exist"),
                    );
                }
                creep.map(|creep| (creep.id, creep.kind.name()))
            }
            _ => None,
        };

        let Some((target, target_name)) = target else {
            session
                .output
                .write(OutputKind::Error, "Invalid target, cannot give buff");
            return;
        };

        let Some(buff) = BuffKind::from_name(buff_name) else {
            session
                .output
                .write(OutputKind::Error, format!("Buff '{buff_name}' does not exist"));
            return;
        };

        session.output.write(
            OutputKind::Info,
            format!("Applying buff '{buff_name}' to {kind} '{target_name}'"),
        );
        session.commands.push(Command::RequestBuff { target, kind: buff });
    }
}

/// Parses a `platform,socket` pair.
fn parse_socket(raw: &str) -> Option<SocketRef> {
    let (platform, socket) = raw.split_once(',')?;
    let platform = platform.trim().parse().ok()?;
    let socket = socket.trim().parse().ok()?;
    Some(SocketRef::new(PlatformId::new(platform), socket))
}

/// Prints the active creep roster.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListCreeps;

impl TerminalCommand for ListCreeps {
    fn aliases(&self) -> &'static [&'static str] {
        &["list_creeps", "list_creep", "listcreep", "listcreeps"]
    }

    fn description(&self) -> &'static str {
        "Prints a list of creeps currently in play"
    }

    fn usage(&self) -> &'static str {
        "list_creeps"
    }

    fn execute(&self, _args: &[&str], session: &mut Session<'_>) {
        if !session.context.accepts_changes() {
            session.output.write(
                OutputKind::Error,
                "Game is not in progress or is paused, cannot list creeps",
            );
            return;
        }

        session.output.write(
            OutputKind::Header,
            format_row("Creep Type", "Creep ID", "Creep Health"),
        );
        for (index, creep) in session.context.creeps.iter().enumerate() {
            session.output.write(
                OutputKind::Info,
                format_row(
                    creep.kind.name(),
                    &index.to_string(),
                    &format!("{}/{}", creep.health, creep.starting_health),
                ),
            );
        }
    }
}

/// Prints the towers on the board with their sockets.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListTowers;

impl TerminalCommand for ListTowers {
    fn aliases(&self) -> &'static [&'static str] {
        &["list_towers", "list_tower", "listtower", "listtowers"]
    }

    fn description(&self) -> &'static str {
        "Prints a list of towers currently in play"
    }

    fn usage(&self) -> &'static str {
        "list_towers"
    }

    fn execute(&self, _args: &[&str], session: &mut Session<'_>) {
        if !session.context.accepts_changes() {
            session.output.write(
                OutputKind::Error,
                "Game is not in progress or is paused, cannot list towers",
            );
            return;
        }

        session.output.write(
            OutputKind::Header,
            format_row("Tower Type", "Platform Number", "Socket Number"),
        );
        for tower in session.context.towers.iter() {
            session.output.write(
                OutputKind::Info,
                format_row(
                    tower.kind.name(),
                    &tower.socket.platform().get().to_string(),
                    &tower.socket.index().to_string(),
                ),
            );
        }
    }
}

/// Lists every registered command.
#[derive(Clone, Copy, Debug, Default)]
pub struct Help;

impl TerminalCommand for Help {
    fn aliases(&self) -> &'static [&'static str] {
        &["help", "h"]
    }

    fn description(&self) -> &'static str {
        "Displays all available commands and their help information"
    }

    fn usage(&self) -> &'static str {
        "help"
    }

    fn execute(&self, _args: &[&str], session: &mut Session<'_>) {
        session.output.write(
            OutputKind::Header,
            format_row("Command Name", "Usage Info", "Description"),
        );
        for command in session.catalogue {
            let name = command.aliases().first().copied().unwrap_or_default();
            session.output.write(
                OutputKind::Info,
                format_row(name, command.usage(), command.description()),
            );
        }
    }
}
