use std::collections::HashMap;
use std::fmt;

use super::model::{Pos, WorldState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    fn new(msg: impl Into<String>) -> Self {
        ValidationError {
            message: msg.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Check the invariants a state must hold at the end of every turn. Returns
/// every violation found; an empty list means the state is sound.
pub fn validate_state(state: &WorldState) -> Vec<ValidationError> {
    let mut errors: Vec<ValidationError> = Vec::new();
    let map = &state.map;

    // Map must be a non-empty rectangle
    if map.height() == 0 || map.width() == 0 {
        errors.push(ValidationError::new("map is empty"));
    }
    let width = map.width();
    if map.row_widths().any(|w| w != width) {
        errors.push(ValidationError::new("map rows differ in width"));
    }

    let mut player_tiles: HashMap<Pos, &str> = HashMap::new();
    for (name, player) in &state.players {
        if !map.is_floor(player.pos) {
            errors.push(ValidationError::new(format!(
                "player '{}' at {} is not on a floor tile",
                name, player.pos
            )));
        }
        if player.hp <= 0 || player.hp > player.max_hp {
            errors.push(ValidationError::new(format!(
                "player '{}' has hp {} outside 1..={}",
                name, player.hp, player.max_hp
            )));
        }
        if player.level == 0 {
            errors.push(ValidationError::new(format!(
                "player '{}' has level 0",
                name
            )));
        }
        player_tiles.entry(player.pos).or_insert(name.as_str());
    }

    let mut monster_tiles: HashMap<Pos, u32> = HashMap::new();
    for (id, monster) in state.monsters.iter() {
        if monster.id != id {
            errors.push(ValidationError::new(format!(
                "monster stored under id {} claims id {}",
                id, monster.id
            )));
        }
        if !map.is_floor(monster.pos) {
            errors.push(ValidationError::new(format!(
                "monster {} at {} is not on a floor tile",
                id, monster.pos
            )));
        }
        if monster.hp <= 0 {
            errors.push(ValidationError::new(format!(
                "monster {} is still present with hp {}",
                id, monster.hp
            )));
        }
        if let Some(other) = monster_tiles.insert(monster.pos, id) {
            errors.push(ValidationError::new(format!(
                "monsters {} and {} share tile {}",
                other, id, monster.pos
            )));
        }
        if let Some(name) = player_tiles.get(&monster.pos) {
            errors.push(ValidationError::new(format!(
                "monster {} stands on player '{}' at {}",
                id, name, monster.pos
            )));
        }
        if id >= state.monsters.next_id() {
            errors.push(ValidationError::new(format!(
                "monster id {} is not below the next id {}",
                id,
                state.monsters.next_id()
            )));
        }
    }

    for (id, item) in state.items.iter() {
        if !map.in_bounds(item.pos) {
            errors.push(ValidationError::new(format!(
                "item {} at {} is out of bounds",
                id, item.pos
            )));
        }
        if id >= state.items.next_id() {
            errors.push(ValidationError::new(format!(
                "item id {} is not below the next id {}",
                id,
                state.items.next_id()
            )));
        }
    }

    errors
}
