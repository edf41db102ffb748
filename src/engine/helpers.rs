use tracing::{info, warn};

use crate::world::{PLAYER_ICONS, Player, WorldState};

/// Bonus applied on every level gained.
pub const LEVEL_HP_BONUS: i32 = 4;
pub const LEVEL_ATK_BONUS: i32 = 1;

pub fn xp_to_next_level(level: u32) -> u32 {
    20 * level
}

/// Create the player on first contact. Existing players are left untouched.
pub fn ensure_player(state: &mut WorldState, username: &str) {
    if state.players.contains_key(username) {
        return;
    }

    let icon = PLAYER_ICONS[state.next_player_icon_index % PLAYER_ICONS.len()];
    state
        .player_icons
        .insert(username.to_string(), icon.to_string());
    state.next_player_icon_index += 1;

    let center = state.map.center();
    let spawn = if state.map.is_floor(center) {
        center
    } else {
        state.map.floor_tiles().first().copied().unwrap_or(center)
    };

    state
        .players
        .insert(username.to_string(), Player::new(spawn));
    info!(username, x = spawn.x, y = spawn.y, icon, "player joined");
}

/// Death handling: scatter the inventory where the player fell, heal to half,
/// and move them back to the map center. Returns how many items dropped.
pub fn respawn(state: &mut WorldState, username: &str) -> Option<usize> {
    let center = state.map.center();
    let player = state.players.get_mut(username)?;

    let fell_at = player.pos;
    let dropped: Vec<_> = player.inventory.drain(..).collect();
    player.hp = player.max_hp / 2;
    player.pos = center;

    let count = dropped.len();
    for it in dropped {
        if state.place_item(fell_at, it.kind, it.name).is_none() {
            warn!(username, "item id space exhausted, dropped item lost");
        }
    }

    info!(username, x = fell_at.x, y = fell_at.y, dropped = count, "player defeated");
    Some(count)
}

/// Apply every level-up the player's XP pays for. Returns the number gained.
pub fn try_level_up(player: &mut Player) -> u32 {
    let mut gained = 0;
    while player.xp >= xp_to_next_level(player.level) {
        player.xp -= xp_to_next_level(player.level);
        player.level += 1;
        player.max_hp += LEVEL_HP_BONUS;
        player.atk += LEVEL_ATK_BONUS;
        player.hp = player.max_hp;
        gained += 1;
    }
    gained
}
