mod combat;
mod command;
mod helpers;
mod items;
mod monsters;
mod movement;
mod output;
mod render;

#[cfg(test)]
pub(crate) mod fixtures;

pub use combat::{handle_attack, monster_strike_damage, player_strike_damage};
pub use command::{COMMAND_LIST, Command, TurnCost};
pub use helpers::{ensure_player, respawn, try_level_up, xp_to_next_level};
pub use items::{POTION_HEAL, SWORD_ATK_BONUS, handle_inventory, handle_pickup, handle_use};
pub use monsters::{AGGRO_RADIUS, WANDER_CHANCE, monsters_act};
pub use movement::handle_move;
pub use output::{Output, OutputBlock};
pub use render::{LOOK_RADIUS, describe_nearby, render_map};
