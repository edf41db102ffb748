use tracing::debug;

use crate::engine::command::TurnCost;
use crate::engine::output::Output;
use crate::world::{Direction, WorldState};

/// One step in `dir`. Edges, walls and monsters stop the player; other
/// players do not. A bump still costs the turn.
pub fn handle_move(
    out: &mut Output,
    state: &mut WorldState,
    username: &str,
    dir: Direction,
) -> TurnCost {
    let Some(from) = state.players.get(username).map(|p| p.pos) else {
        return TurnCost::Free;
    };
    let to = from.step(dir);

    if !state.map.in_bounds(to) {
        out.say(format!("**{}** bumps into the edge of the dungeon.", username));
        return TurnCost::Action;
    }

    if !state.map.is_floor(to) {
        out.say(format!("**{}** bumps into a wall.", username));
        return TurnCost::Action;
    }

    if let Some(monster) = state.monster_at(to) {
        out.say(format!(
            "**{}** cannot move: a {} blocks the way!",
            username, monster.kind
        ));
        return TurnCost::Action;
    }

    if let Some(player) = state.players.get_mut(username) {
        player.pos = to;
    }
    debug!(username, from = %from, to = %to, "player moved");
    out.say(format!("**{}** moves {}.", username, dir.as_str()));
    TurnCost::Action
}
