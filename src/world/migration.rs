//! Versioned upgrade of persisted state.
//!
//! Runs on the raw JSON before typed decoding:
//! - a blob without `version` is version 1 (the first, unversioned layout)
//! - each step moves v(N) to v(N+1) and back-fills what that version added
//! - versions newer than `CURRENT_STATE_VERSION` are refused
//! - id counters with no room left for another id are refused

use serde_json::{Map, Value, json};

use crate::error::MigrationError;

pub const CURRENT_STATE_VERSION: u64 = 2;

/// Bring a parsed state blob up to `CURRENT_STATE_VERSION`.
pub fn migrate_state(mut data: Value) -> Result<Value, MigrationError> {
    let version = match data.as_object() {
        Some(obj) => obj.get("version").and_then(Value::as_u64).unwrap_or(1),
        None => return Err(MigrationError::NotAnObject),
    };

    if version > CURRENT_STATE_VERSION {
        return Err(MigrationError::FutureVersion {
            found: version,
            supported: CURRENT_STATE_VERSION,
        });
    }

    let mut current = version;
    while current < CURRENT_STATE_VERSION {
        apply_step(&mut data, current)?;
        current += 1;
        if let Some(obj) = data.as_object_mut() {
            obj.insert("version".to_string(), json!(current));
        }
    }

    check_counters(&data)?;
    Ok(data)
}

/// A counter at `u32::MAX` or beyond could never hand out another id.
fn check_counters(data: &Value) -> Result<(), MigrationError> {
    for counter in ["nextMonsterId", "nextItemId"] {
        let next = data.get(counter).and_then(Value::as_u64);
        if next.is_some_and(|n| n >= u64::from(u32::MAX)) {
            return Err(MigrationError::Malformed(counter.to_string()));
        }
    }
    Ok(())
}

fn apply_step(data: &mut Value, from_version: u64) -> Result<(), MigrationError> {
    match from_version {
        1 => migrate_v1_to_v2(data),
        _ => Ok(()),
    }
}

/// v1 → v2: every collection and counter becomes mandatory.
fn migrate_v1_to_v2(data: &mut Value) -> Result<(), MigrationError> {
    let obj = data.as_object_mut().ok_or(MigrationError::NotAnObject)?;

    for key in ["players", "monsters", "items", "playerIcons"] {
        obj.entry(key).or_insert_with(|| json!({}));
    }
    obj.entry("turn").or_insert_with(|| json!(0));

    for (counter, registry) in [("nextMonsterId", "monsters"), ("nextItemId", "items")] {
        if obj.get(counter).and_then(Value::as_u64).is_none() {
            let next = max_id(obj, registry)?.saturating_add(1);
            obj.insert(counter.to_string(), json!(next));
        }
    }

    if obj.get("nextPlayerIconIndex").and_then(Value::as_u64).is_none() {
        let assigned = obj
            .get("playerIcons")
            .and_then(Value::as_object)
            .map_or(0, Map::len);
        obj.insert("nextPlayerIconIndex".to_string(), json!(assigned));
    }

    let players = obj
        .get_mut("players")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| MigrationError::Malformed("players".to_string()))?;
    for player in players.values_mut() {
        let p = player
            .as_object_mut()
            .ok_or_else(|| MigrationError::Malformed("players".to_string()))?;
        p.entry("xp").or_insert_with(|| json!(0));
        p.entry("level").or_insert_with(|| json!(1));
        p.entry("inventory").or_insert_with(|| json!([]));
    }

    Ok(())
}

/// Largest id in a registry object, checking both the keys and the `id`
/// fields. Zero when empty.
fn max_id(obj: &Map<String, Value>, registry: &str) -> Result<u64, MigrationError> {
    let entries = obj
        .get(registry)
        .and_then(Value::as_object)
        .ok_or_else(|| MigrationError::Malformed(registry.to_string()))?;

    let mut max = 0;
    for (key, entry) in entries {
        if let Ok(id) = key.parse::<u64>() {
            max = max.max(id);
        }
        if let Some(id) = entry.get("id").and_then(Value::as_u64) {
            max = max.max(id);
        }
    }
    Ok(max)
}
