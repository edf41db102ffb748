//! Small hand-drawn worlds for unit tests.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::world::{Grid, Player, Pos, WorldState};

pub fn world(rows: &[&str]) -> WorldState {
    WorldState::new(Grid::from_rows(rows))
}

/// Insert (or move) a default player to `pos`.
pub fn with_player(state: &mut WorldState, name: &str, pos: Pos) {
    state
        .players
        .entry(name.to_string())
        .and_modify(|p| p.pos = pos)
        .or_insert_with(|| Player::new(pos));
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
