use crate::world::Direction;

/// Shown whenever a command is not recognised.
pub const COMMAND_LIST: &str = "`/look`, `/move <direction>`, `/attack <direction>`, `/pickup`, `/inventory`, or `/use <item>`";

/// One parsed line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Spawn,
    Look,
    Inventory,
    /// Lower-cased item query.
    Use(String),
    Pickup,
    Move(Direction),
    Attack(Direction),
    Unknown,
}

/// What a handled command costs in game time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnCost {
    /// Nothing advances.
    Free,
    /// The turn counter advances but monsters hold still.
    Inspect,
    /// The turn counter advances and every monster acts.
    Action,
}

impl Command {
    /// Case-insensitive; surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Command::Empty;
        }
        let lower = trimmed.to_lowercase();

        if lower.starts_with("/spawn") {
            return Command::Spawn;
        }

        match lower.as_str() {
            "/look" => return Command::Look,
            "/inventory" => return Command::Inventory,
            "/pickup" => return Command::Pickup,
            _ => {}
        }

        if let Some(rest) = lower.strip_prefix("/use ") {
            return Command::Use(rest.trim().to_string());
        }

        let tokens: Vec<&str> = lower.split_whitespace().collect();
        if let [verb, dir] = tokens.as_slice() {
            if let Some(dir) = Direction::parse(dir) {
                match *verb {
                    "/move" => return Command::Move(dir),
                    "/attack" => return Command::Attack(dir),
                    _ => {}
                }
            }
        }

        Command::Unknown
    }
}
