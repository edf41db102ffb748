use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::debug;

use super::model::{Grid, ItemKind, MonsterKind, Pos, Tile, WorldState};

/// Knobs for a freshly generated dungeon.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneratorParams {
    pub width: usize,
    pub height: usize,
    pub monster_count: usize,
    pub item_count: usize,
    /// Chance that an interior tile becomes a wall.
    pub wall_chance: f64,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        GeneratorParams {
            width: 11,
            height: 9,
            monster_count: 6,
            item_count: 6,
            wall_chance: 0.18,
        }
    }
}

impl GeneratorParams {
    pub fn new(width: usize, height: usize, monster_count: usize, item_count: usize) -> Self {
        GeneratorParams {
            width,
            height,
            monster_count,
            item_count,
            ..Default::default()
        }
    }
}

/// Build a new world: walled border, random interior walls, a clear strip at
/// the center, then monsters and items on shuffled floor tiles.
pub fn generate<R: Rng + ?Sized>(params: &GeneratorParams, rng: &mut R) -> WorldState {
    // odd sizes give a single center tile
    let width = params.width | 1;
    let height = params.height | 1;
    let wall_chance = params.wall_chance.clamp(0.0, 1.0);

    let mut map = Grid::filled(width, height, Tile::Floor);
    for y in 0..height {
        for x in 0..width {
            let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
            if border || rng.gen_bool(wall_chance) {
                map.set(Pos::new(x as i32, y as i32), Tile::Wall);
            }
        }
    }

    let center = map.center();
    map.set(center, Tile::Floor);
    if center.x + 1 < width as i32 - 1 {
        map.set(center.offset(1, 0), Tile::Floor);
    }
    if center.x - 1 > 0 {
        map.set(center.offset(-1, 0), Tile::Floor);
    }

    let mut state = WorldState::new(map);

    let mut floor = state.map.floor_tiles();
    floor.shuffle(rng);

    let monster_slots = params.monster_count.min(floor.len());
    for &pos in &floor[..monster_slots] {
        let kind = MonsterKind::ALL[rng.gen_range(0..MonsterKind::ALL.len())];
        state.spawn_monster(pos, kind);
    }

    let mut leftover = floor.split_off(monster_slots);
    leftover.shuffle(rng);
    for (i, &pos) in leftover.iter().take(params.item_count).enumerate() {
        let kind = ItemKind::ROTATION[i % ItemKind::ROTATION.len()];
        state.spawn_item(pos, kind);
    }

    debug!(
        width,
        height,
        monsters = state.monsters.len(),
        items = state.items.len(),
        "generated dungeon"
    );

    state
}
