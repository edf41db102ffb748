use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::migration::{CURRENT_STATE_VERSION, migrate_state};
use super::model::{
    Grid, InventoryItem, Item, ItemKind, Monster, MonsterKind, Player, Pos, Registry, WorldState,
};
use super::validator::validate_state;
use crate::error::{DecodeError, StateError};

////////////////////
/// JSON STRUCTS ///
////////////////////

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateFile {
    version: u64,
    map: Vec<String>,
    players: BTreeMap<String, PlayerRecord>,
    monsters: BTreeMap<u32, MonsterRecord>,
    items: BTreeMap<u32, ItemRecord>,
    turn: u64,
    next_monster_id: u32,
    next_item_id: u32,
    player_icons: BTreeMap<String, String>,
    next_player_icon_index: usize,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerRecord {
    x: i32,
    y: i32,
    hp: i32,
    max_hp: i32,
    atk: i32,
    inventory: Vec<InventoryRecord>,
    xp: u32,
    level: u32,
}

#[derive(Serialize, Deserialize)]
struct InventoryRecord {
    id: u32,
    #[serde(rename = "type")]
    kind: ItemKind,
    name: String,
}

#[derive(Serialize, Deserialize)]
struct MonsterRecord {
    id: u32,
    x: i32,
    y: i32,
    #[serde(rename = "type")]
    kind: MonsterKind,
    hp: i32,
    atk: i32,
}

#[derive(Serialize, Deserialize)]
struct ItemRecord {
    id: u32,
    x: i32,
    y: i32,
    #[serde(rename = "type")]
    kind: ItemKind,
    name: String,
}

impl From<StateFile> for WorldState {
    fn from(file: StateFile) -> Self {
        let players = file
            .players
            .into_iter()
            .map(|(name, p)| {
                let inventory = p
                    .inventory
                    .into_iter()
                    .map(|it| InventoryItem {
                        id: it.id,
                        kind: it.kind,
                        name: it.name,
                    })
                    .collect();
                let player = Player {
                    pos: Pos::new(p.x, p.y),
                    hp: p.hp,
                    max_hp: p.max_hp,
                    atk: p.atk,
                    inventory,
                    xp: p.xp,
                    level: p.level,
                };
                (name, player)
            })
            .collect();

        // the map key wins over a disagreeing `id` field
        let monsters = file
            .monsters
            .into_iter()
            .map(|(id, m)| {
                let monster = Monster {
                    id,
                    pos: Pos::new(m.x, m.y),
                    kind: m.kind,
                    hp: m.hp,
                    atk: m.atk,
                };
                (id, monster)
            })
            .collect();

        let items = file
            .items
            .into_iter()
            .map(|(id, it)| {
                let item = Item {
                    id,
                    pos: Pos::new(it.x, it.y),
                    kind: it.kind,
                    name: it.name,
                };
                (id, item)
            })
            .collect();

        WorldState {
            map: Grid::from_rows(&file.map),
            players,
            monsters: Registry::from_parts(monsters, file.next_monster_id),
            items: Registry::from_parts(items, file.next_item_id),
            turn: file.turn,
            player_icons: file.player_icons,
            next_player_icon_index: file.next_player_icon_index,
        }
    }
}

impl From<&WorldState> for StateFile {
    fn from(state: &WorldState) -> Self {
        let players = state
            .players
            .iter()
            .map(|(name, p)| {
                let record = PlayerRecord {
                    x: p.pos.x,
                    y: p.pos.y,
                    hp: p.hp,
                    max_hp: p.max_hp,
                    atk: p.atk,
                    inventory: p
                        .inventory
                        .iter()
                        .map(|it| InventoryRecord {
                            id: it.id,
                            kind: it.kind,
                            name: it.name.clone(),
                        })
                        .collect(),
                    xp: p.xp,
                    level: p.level,
                };
                (name.clone(), record)
            })
            .collect();

        let monsters = state
            .monsters
            .iter()
            .map(|(id, m)| {
                let record = MonsterRecord {
                    id,
                    x: m.pos.x,
                    y: m.pos.y,
                    kind: m.kind,
                    hp: m.hp,
                    atk: m.atk,
                };
                (id, record)
            })
            .collect();

        let items = state
            .items
            .iter()
            .map(|(id, it)| {
                let record = ItemRecord {
                    id,
                    x: it.pos.x,
                    y: it.pos.y,
                    kind: it.kind,
                    name: it.name.clone(),
                };
                (id, record)
            })
            .collect();

        StateFile {
            version: CURRENT_STATE_VERSION,
            map: state.map.to_rows(),
            players,
            monsters,
            items,
            turn: state.turn,
            next_monster_id: state.monsters.next_id(),
            next_item_id: state.items.next_id(),
            player_icons: state.player_icons.clone(),
            next_player_icon_index: state.next_player_icon_index,
        }
    }
}

/////////////////////////
/// ENCODE / DECODE   ///
/////////////////////////

/// Decode a persisted state of any supported vintage.
pub fn decode_state(json: &str) -> Result<WorldState, DecodeError> {
    let raw: serde_json::Value = serde_json::from_str(json)?;
    let migrated = migrate_state(raw)?;
    let file: StateFile = serde_json::from_value(migrated)?;
    Ok(WorldState::from(file))
}

pub fn encode_state(state: &WorldState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&StateFile::from(state))
}

/////////////////////
/// SESSION STORE ///
/////////////////////

/// One JSON file per session under a directory:
/// `<dir>/session-<id>.json`.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SessionStore { dir: dir.into() }
    }

    pub fn path_for(&self, session_id: &str) -> PathBuf {
        self.dir.join(format!("session-{session_id}.json"))
    }

    pub fn exists(&self, session_id: &str) -> bool {
        self.path_for(session_id).is_file()
    }

    pub fn load(&self, session_id: &str) -> Result<WorldState, StateError> {
        let path = self.path_for(session_id);
        let contents = fs::read_to_string(&path).map_err(|source| StateError::Read {
            session_id: session_id.to_string(),
            source,
        })?;

        let state = decode_state(&contents).map_err(|source| StateError::Decode {
            session_id: session_id.to_string(),
            source,
        })?;

        for problem in validate_state(&state) {
            warn!(session_id, %problem, "loaded state violates an invariant");
        }
        debug!(session_id, turn = state.turn, "loaded session");

        Ok(state)
    }

    /// Write through a temp file and rename so a crash never leaves half a
    /// state on disk.
    pub fn save(&self, session_id: &str, state: &WorldState) -> Result<(), StateError> {
        let json = encode_state(state).map_err(|source| StateError::Encode {
            session_id: session_id.to_string(),
            source,
        })?;

        let write = |path: &Path| -> io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, json.as_bytes())?;
            fs::rename(&tmp, path)
        };

        write(&self.path_for(session_id)).map_err(|source| StateError::Write {
            session_id: session_id.to_string(),
            source,
        })?;
        debug!(session_id, turn = state.turn, "saved session");

        Ok(())
    }
}
