use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::engine::combat::monster_strike_damage;
use crate::engine::helpers::respawn;
use crate::engine::output::Output;
use crate::world::{Direction, Pos, WorldState};

/// Monsters within this Manhattan distance chase the nearest player.
pub const AGGRO_RADIUS: i32 = 5;
/// Chance an idle monster tries to wander.
pub const WANDER_CHANCE: f64 = 0.3;

fn nearest_player(state: &WorldState, from: Pos) -> Option<(String, Pos, i32)> {
    let mut best: Option<(String, Pos, i32)> = None;
    for (name, player) in &state.players {
        let d = from.manhattan(player.pos);
        if best.as_ref().is_none_or(|(_, _, bd)| d < *bd) {
            best = Some((name.clone(), player.pos, d));
        }
    }
    best
}

fn free(state: &WorldState, occupied: &HashSet<Pos>, pos: Pos) -> bool {
    state.map.is_floor(pos) && !occupied.contains(&pos)
}

/// One AI pass. Monsters act in id order against live player positions;
/// the occupancy set moves with every reservation so no two entities can
/// claim one tile, and monster positions are written once the pass ends.
pub fn monsters_act<R: Rng + ?Sized>(state: &mut WorldState, rng: &mut R, out: &mut Output) {
    let mut occupied: HashSet<Pos> = state.monsters.values().map(|m| m.pos).collect();
    occupied.extend(state.players.values().map(|p| p.pos));

    let mut pending: Vec<(u32, Pos)> = Vec::new();

    for id in state.monsters.ids() {
        let Some(monster) = state.monsters.get(id) else {
            continue;
        };
        if monster.hp <= 0 {
            continue;
        }
        let (pos, kind, atk) = (monster.pos, monster.kind, monster.atk);

        let Some((target, target_pos, dist)) = nearest_player(state, pos) else {
            continue;
        };

        if dist == 1 {
            let dmg = monster_strike_damage(atk, rng);
            out.event(format!("The {} attacks {} for {} damage.", kind, target, dmg));
            debug!(monster_id = id, target = %target, dmg, "monster attack");

            let mut defeated = false;
            if let Some(player) = state.players.get_mut(&target) {
                player.hp -= dmg;
                defeated = player.hp <= 0;
            }
            if defeated {
                info!(monster_id = id, target = %target, "player slain by monster");
                respawn(state, &target);
                if !state.players.values().any(|p| p.pos == target_pos) {
                    occupied.remove(&target_pos);
                }
                occupied.insert(state.map.center());
                if let Some(player) = state.players.get(&target) {
                    out.event(format!(
                        "**{}** was defeated and wakes up at the dungeon center (HP: {}/{}).",
                        target, player.hp, player.max_hp
                    ));
                }
            }
            continue;
        }

        let step = if dist <= AGGRO_RADIUS {
            let dx = (target_pos.x - pos.x).signum();
            let dy = (target_pos.y - pos.y).signum();
            [pos.offset(dx, 0), pos.offset(0, dy), pos.offset(dx, dy)]
                .into_iter()
                .find(|p| free(state, &occupied, *p))
        } else if rng.gen_bool(WANDER_CHANCE) {
            let mut dirs = Direction::ALL;
            dirs.shuffle(rng);
            dirs.into_iter()
                .map(|d| pos.step(d))
                .find(|p| free(state, &occupied, *p))
        } else {
            None
        };

        if let Some(to) = step {
            occupied.remove(&pos);
            occupied.insert(to);
            pending.push((id, to));
            debug!(
                monster_id = id,
                from = %pos,
                to = %to,
                chasing = dist <= AGGRO_RADIUS,
                "monster step"
            );
        }
    }

    for (id, to) in pending {
        if let Some(monster) = state.monsters.get_mut(id) {
            monster.pos = to;
        }
    }
}
