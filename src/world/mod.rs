mod generator;
mod loader;
mod migration;
mod model;
mod validator;

pub use generator::{GeneratorParams, generate};
pub use loader::{SessionStore, decode_state, encode_state};
pub use migration::{CURRENT_STATE_VERSION, migrate_state};

pub use model::{
    Direction, Grid, InventoryItem, Item, ItemKind, Monster, MonsterKind, MonsterStats,
    PLAYER_ICONS, PLAYER_START_ATK, PLAYER_START_HP, Player, Pos, Registry, Tile, WorldState,
};
pub use validator::{ValidationError, validate_state};
