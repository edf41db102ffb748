use rand::Rng;
use tracing::{debug, info};

use crate::engine::command::TurnCost;
use crate::engine::helpers::{respawn, try_level_up};
use crate::engine::output::Output;
use crate::world::{Direction, ItemKind, WorldState};

/// `max(1, atk + U{-1,0,1})`
pub fn player_strike_damage<R: Rng + ?Sized>(atk: i32, rng: &mut R) -> i32 {
    (atk + rng.gen_range(-1..=1)).max(1)
}

/// `max(1, atk + U{0,1})`, used for counterattacks and monster turns alike.
pub fn monster_strike_damage<R: Rng + ?Sized>(atk: i32, rng: &mut R) -> i32 {
    (atk + rng.gen_range(0..=1)).max(1)
}

/// Strike whatever monster stands one step away in `dir`. A miss still costs
/// the turn.
pub fn handle_attack<R: Rng + ?Sized>(
    out: &mut Output,
    state: &mut WorldState,
    username: &str,
    dir: Direction,
    rng: &mut R,
) -> TurnCost {
    let Some(from) = state.players.get(username).map(|p| p.pos) else {
        return TurnCost::Free;
    };
    let target = from.step(dir);

    if !state.map.in_bounds(target) {
        out.say(format!("**{}** swings at nothing.", username));
        return TurnCost::Action;
    }

    let Some(monster_id) = state.monster_id_at(target) else {
        out.say(format!(
            "**{}** swings at empty air (no monster there).",
            username
        ));
        return TurnCost::Action;
    };

    let player_atk = state.players.get(username).map_or(0, |p| p.atk);
    let dmg = player_strike_damage(player_atk, rng);

    let Some(monster) = state.monsters.get_mut(monster_id) else {
        return TurnCost::Action;
    };
    monster.hp -= dmg;
    let (kind, monster_hp, monster_atk, monster_pos) =
        (monster.kind, monster.hp, monster.atk, monster.pos);

    let mut narrative = format!(
        "**{}** attacks the {} for {} damage (HP left: {}).",
        username,
        kind,
        dmg,
        monster_hp.max(0)
    );
    debug!(username, monster_id, dmg, monster_hp, "player attack");

    if monster_hp <= 0 {
        let xp = kind.stats().xp;
        narrative.push_str(&format!(" The {} dies! Gained {} XP.", kind, xp));

        if rng.gen_bool(0.5) {
            let drop = if rng.gen_bool(0.5) {
                ItemKind::Gem
            } else {
                ItemKind::Potion
            };
            if state.spawn_item(monster_pos, drop).is_some() {
                narrative.push_str(&format!(" It dropped {}.", drop.display_name()));
            }
        }
        state.monsters.remove(monster_id);
        info!(username, monster_id, kind = kind.as_str(), "monster slain");

        if let Some(player) = state.players.get_mut(username) {
            player.xp += xp;
            if try_level_up(player) > 0 {
                info!(username, level = player.level, "level up");
                narrative.push_str(&format!(
                    "\n**{}** leveled up to level {}! (+4 HP, +1 ATK)",
                    username, player.level
                ));
            }
        }

        out.say(narrative);
        return TurnCost::Action;
    }

    let counter = monster_strike_damage(monster_atk, rng);
    let mut defeated = false;
    if let Some(player) = state.players.get_mut(username) {
        player.hp -= counter;
        narrative.push_str(&format!(
            " The {} counterattacks for {} damage (Your HP: {}/{}).",
            kind,
            counter,
            player.hp.max(0),
            player.max_hp
        ));
        defeated = player.hp <= 0;
    }

    if defeated {
        respawn(state, username);
        if let Some(player) = state.players.get(username) {
            narrative.push_str(&format!(
                "\n**{}** was defeated and wakes up at the dungeon center (HP: {}/{}).",
                username, player.hp, player.max_hp
            ));
        }
    }

    out.say(narrative);
    TurnCost::Action
}
