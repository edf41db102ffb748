use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Icons handed out to new players, in order, wrapping around.
pub const PLAYER_ICONS: [&str; 15] = [
    "🧙‍♂️", "🧝‍♂️", "🧚‍♂️", "🧛‍♂️", "🧞‍♂️", "👨‍🚀", "👩‍🚀", "🤺", "🕵️‍♂️", "🧟‍♂️", "👨‍🔬", "👩‍🎨",
    "👨‍🎤", "👨‍💻", "👩‍💻",
];

pub const PLAYER_START_HP: i32 = 20;
pub const PLAYER_START_ATK: i32 = 3;

////////////////////////
/// GRID AND TILES   ///
////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Pos { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Pos::new(self.x + dx, self.y + dy)
    }

    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        self.offset(dx, dy)
    }

    pub fn manhattan(self, other: Pos) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Floor,
}

impl Tile {
    pub fn symbol(self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Floor => '.',
        }
    }

    /// Anything that is not `.` is solid.
    pub fn from_symbol(c: char) -> Self {
        if c == '.' { Tile::Floor } else { Tile::Wall }
    }
}

/// Row-major tile grid. Rows are expected to share one width; the validator
/// reports ragged maps rather than this type rejecting them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid {
    rows: Vec<Vec<Tile>>,
}

impl Grid {
    pub fn filled(width: usize, height: usize, tile: Tile) -> Self {
        Grid {
            rows: vec![vec![tile; width]; height],
        }
    }

    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        Grid {
            rows: rows
                .iter()
                .map(|r| r.as_ref().chars().map(Tile::from_symbol).collect())
                .collect(),
        }
    }

    pub fn to_rows(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.iter().map(|t| t.symbol()).collect())
            .collect()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn row_widths(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().map(Vec::len)
    }

    pub fn get(&self, pos: Pos) -> Option<Tile> {
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    pub fn set(&mut self, pos: Pos, tile: Tile) {
        let (Ok(x), Ok(y)) = (usize::try_from(pos.x), usize::try_from(pos.y)) else {
            return;
        };
        if let Some(cell) = self.rows.get_mut(y).and_then(|r| r.get_mut(x)) {
            *cell = tile;
        }
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        self.get(pos).is_some()
    }

    pub fn is_floor(&self, pos: Pos) -> bool {
        self.get(pos) == Some(Tile::Floor)
    }

    /// Center tile, `(width / 2, height / 2)` measured on the first row.
    pub fn center(&self) -> Pos {
        Pos::new((self.width() / 2) as i32, (self.height() / 2) as i32)
    }

    /// Every floor tile in row-major order.
    pub fn floor_tiles(&self) -> Vec<Pos> {
        let mut tiles = Vec::new();
        for (y, row) in self.rows.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                if *tile == Tile::Floor {
                    tiles.push(Pos::new(x as i32, y as i32));
                }
            }
        }
        tiles
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "north" => Some(Direction::North),
            "south" => Some(Direction::South),
            "east" => Some(Direction::East),
            "west" => Some(Direction::West),
            _ => None,
        }
    }
}

//////////////////////////////
/// MONSTERS AND ITEMS     ///
//////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonsterStats {
    pub hp: i32,
    pub atk: i32,
    pub xp: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonsterKind {
    Demon,
    Snake,
    Zombie,
}

impl MonsterKind {
    pub const ALL: [MonsterKind; 3] = [
        MonsterKind::Demon,
        MonsterKind::Snake,
        MonsterKind::Zombie,
    ];

    pub fn stats(self) -> MonsterStats {
        match self {
            MonsterKind::Demon => MonsterStats { hp: 12, atk: 4, xp: 20 },
            MonsterKind::Snake => MonsterStats { hp: 6, atk: 2, xp: 8 },
            MonsterKind::Zombie => MonsterStats { hp: 8, atk: 3, xp: 12 },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MonsterKind::Demon => "demon",
            MonsterKind::Snake => "snake",
            MonsterKind::Zombie => "zombie",
        }
    }
}

impl fmt::Display for MonsterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Sword,
    Potion,
    Gem,
}

impl ItemKind {
    /// Placement order used by the generator.
    pub const ROTATION: [ItemKind; 3] = [ItemKind::Sword, ItemKind::Potion, ItemKind::Gem];

    pub fn display_name(self) -> &'static str {
        match self {
            ItemKind::Sword => "Rusty Sword (+2 ATK)",
            ItemKind::Potion => "Healing Potion (+8 HP)",
            ItemKind::Gem => "Shiny Gem ($50)",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Sword => "sword",
            ItemKind::Potion => "potion",
            ItemKind::Gem => "gem",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monster {
    pub id: u32,
    pub pos: Pos,
    pub kind: MonsterKind,
    pub hp: i32,
    pub atk: i32,
}

impl Monster {
    pub fn new(id: u32, pos: Pos, kind: MonsterKind) -> Self {
        let stats = kind.stats();
        Monster {
            id,
            pos,
            kind,
            hp: stats.hp,
            atk: stats.atk,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: u32,
    pub pos: Pos,
    pub kind: ItemKind,
    pub name: String,
}

/// An item carried by a player. Keeps the id it had in the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    pub id: u32,
    pub kind: ItemKind,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub pos: Pos,
    pub hp: i32,
    pub max_hp: i32,
    pub atk: i32,
    pub inventory: Vec<InventoryItem>,
    pub xp: u32,
    pub level: u32,
}

impl Player {
    pub fn new(pos: Pos) -> Self {
        Player {
            pos,
            hp: PLAYER_START_HP,
            max_hp: PLAYER_START_HP,
            atk: PLAYER_START_ATK,
            inventory: Vec::new(),
            xp: 0,
            level: 1,
        }
    }
}

/////////////////
/// REGISTRY  ///
/////////////////

/// Id-keyed entity store. Ids come from a counter that only moves forward,
/// so an id freed by `remove` is never handed out again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry<T> {
    entries: BTreeMap<u32, T>,
    next_id: u32,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Registry {
            entries: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from persisted parts. The counter is bumped past the
    /// largest present id if it lags behind.
    pub fn from_parts(entries: BTreeMap<u32, T>, next_id: u32) -> Self {
        let floor = entries
            .keys()
            .next_back()
            .map_or(1, |max| max.saturating_add(1));
        Registry {
            entries,
            next_id: next_id.max(floor),
        }
    }

    /// Store a new entry under the next id. Returns `None`, storing nothing,
    /// once the id space is used up.
    pub fn insert_with(&mut self, build: impl FnOnce(u32) -> T) -> Option<u32> {
        let id = self.next_id;
        self.next_id = id.checked_add(1)?;
        self.entries.insert(id, build(id));
        Some(id)
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut T> {
        self.entries.get_mut(&id)
    }

    pub fn remove(&mut self, id: u32) -> Option<T> {
        self.entries.remove(&id)
    }

    pub fn ids(&self) -> Vec<u32> {
        self.entries.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.entries.iter().map(|(id, v)| (*id, v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//////////////////////
/// WORLD STATE    ///
//////////////////////

/// The whole session: map, every entity, and the counters that keep ids and
/// icons stable across saves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorldState {
    pub map: Grid,
    pub players: BTreeMap<String, Player>,
    pub monsters: Registry<Monster>,
    pub items: Registry<Item>,
    pub turn: u64,
    pub player_icons: BTreeMap<String, String>,
    pub next_player_icon_index: usize,
}

impl WorldState {
    pub fn new(map: Grid) -> Self {
        WorldState {
            map,
            ..Default::default()
        }
    }

    pub fn monster_id_at(&self, pos: Pos) -> Option<u32> {
        self.monsters
            .iter()
            .find(|(_, m)| m.pos == pos)
            .map(|(id, _)| id)
    }

    pub fn monster_at(&self, pos: Pos) -> Option<&Monster> {
        self.monsters.values().find(|m| m.pos == pos)
    }

    /// First item on the tile, lowest id first.
    pub fn item_id_at(&self, pos: Pos) -> Option<u32> {
        self.items
            .iter()
            .find(|(_, it)| it.pos == pos)
            .map(|(id, _)| id)
    }

    pub fn spawn_monster(&mut self, pos: Pos, kind: MonsterKind) -> Option<u32> {
        self.monsters.insert_with(|id| Monster::new(id, pos, kind))
    }

    pub fn spawn_item(&mut self, pos: Pos, kind: ItemKind) -> Option<u32> {
        self.place_item(pos, kind, kind.display_name().to_string())
    }

    /// Put an item into the world under a fresh id, keeping the given name.
    pub fn place_item(&mut self, pos: Pos, kind: ItemKind, name: String) -> Option<u32> {
        self.items.insert_with(|id| Item {
            id,
            pos,
            kind,
            name,
        })
    }

    pub fn icon_for(&self, username: &str) -> Option<&str> {
        self.player_icons.get(username).map(String::as_str)
    }
}
