use std::collections::HashMap;

use crate::world::{ItemKind, MonsterKind, Pos, Tile, WorldState};

pub const WALL_ICON: &str = "🟥";
pub const FLOOR_ICON: &str = "⬜";
/// Shown for a player with no recorded icon.
pub const UNKNOWN_PLAYER_ICON: &str = "👤";

/// How far `/look` can see, in Manhattan distance.
pub const LOOK_RADIUS: i32 = 4;

fn monster_icon(kind: MonsterKind) -> &'static str {
    match kind {
        MonsterKind::Demon => "👹",
        MonsterKind::Snake => "🐍",
        MonsterKind::Zombie => "🧟",
    }
}

fn item_icon(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Sword => "🗡️",
        ItemKind::Potion => "🧪",
        ItemKind::Gem => "💎",
    }
}

/// The map as one emoji per tile, rows joined by newlines. Overlays are
/// painted lowest first so that the viewer beats other players, players beat
/// monsters and monsters beat items.
pub fn render_map(state: &WorldState, viewer: &str) -> String {
    let mut overlay: HashMap<Pos, &str> = HashMap::new();

    for item in state.items.values() {
        overlay.insert(item.pos, item_icon(item.kind));
    }
    for monster in state.monsters.values() {
        overlay.insert(monster.pos, monster_icon(monster.kind));
    }
    for (name, player) in &state.players {
        if name != viewer {
            overlay.insert(
                player.pos,
                state.icon_for(name).unwrap_or(UNKNOWN_PLAYER_ICON),
            );
        }
    }
    if let Some(me) = state.players.get(viewer) {
        overlay.insert(me.pos, state.icon_for(viewer).unwrap_or(UNKNOWN_PLAYER_ICON));
    }

    let map = &state.map;
    let mut rows: Vec<String> = Vec::with_capacity(map.height());
    for (y, width) in map.row_widths().enumerate() {
        let mut row = String::new();
        for x in 0..width {
            let pos = Pos::new(x as i32, y as i32);
            let glyph = overlay.get(&pos).copied().unwrap_or(match map.get(pos) {
                Some(Tile::Floor) => FLOOR_ICON,
                _ => WALL_ICON,
            });
            row.push_str(glyph);
        }
        rows.push(row);
    }
    rows.join("\n")
}

/// Monsters then items within `radius` of `pos`, each in id order.
pub fn describe_nearby(state: &WorldState, pos: Pos, radius: i32) -> String {
    let mut found: Vec<String> = Vec::new();

    for m in state.monsters.values() {
        if m.pos.manhattan(pos) <= radius {
            found.push(format!("Monster: {} at {} HP:{}", m.kind, m.pos, m.hp));
        }
    }
    for it in state.items.values() {
        if it.pos.manhattan(pos) <= radius {
            found.push(format!("Item: {} at {}", it.name, it.pos));
        }
    }

    if found.is_empty() {
        return "_No monsters or items nearby._".to_string();
    }
    found.join("\n")
}
