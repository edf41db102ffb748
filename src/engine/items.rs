use tracing::debug;

use crate::engine::command::TurnCost;
use crate::engine::output::Output;
use crate::world::{InventoryItem, ItemKind, WorldState};

pub const POTION_HEAL: i32 = 8;
pub const SWORD_ATK_BONUS: i32 = 2;

/// Read-only listing in carry order.
pub fn handle_inventory(out: &mut Output, state: &WorldState, username: &str) -> TurnCost {
    let Some(player) = state.players.get(username) else {
        return TurnCost::Free;
    };

    out.say(format!("**{}** opens their inventory:", username));
    if player.inventory.is_empty() {
        out.say("_empty_");
        return TurnCost::Free;
    }
    for (i, item) in player.inventory.iter().enumerate() {
        out.say(format!("{}. {}", i + 1, item.name));
    }
    TurnCost::Free
}

fn matches_query(item: &InventoryItem, query: &str) -> bool {
    item.kind.as_str() == query || item.name.to_lowercase().contains(query)
}

/// Consume the first carried item whose type is `query` or whose name
/// contains it. A miss changes nothing and costs nothing.
pub fn handle_use(
    out: &mut Output,
    state: &mut WorldState,
    username: &str,
    query: &str,
) -> TurnCost {
    let Some(player) = state.players.get_mut(username) else {
        return TurnCost::Free;
    };

    let Some(idx) = player.inventory.iter().position(|it| matches_query(it, query)) else {
        out.say(format!("**{}** doesn't have \"{}\".", username, query));
        return TurnCost::Free;
    };

    let item = player.inventory.remove(idx);
    let effect = match item.kind {
        ItemKind::Potion => {
            player.hp = (player.hp + POTION_HEAL).min(player.max_hp);
            format!(
                " Restored {} HP (HP: {}/{}).",
                POTION_HEAL, player.hp, player.max_hp
            )
        }
        ItemKind::Sword => {
            player.atk += SWORD_ATK_BONUS;
            format!(" {} feels stronger (+{} ATK).", username, SWORD_ATK_BONUS)
        }
        ItemKind::Gem => " Nothing happens.".to_string(),
    };

    debug!(username, item = item.kind.as_str(), "item used");
    out.say(format!("**{}** uses {}.{}", username, item.name, effect));
    TurnCost::Action
}

/// Move the lowest-id item on the player's tile into their inventory. Costs
/// the turn whether or not anything was there.
pub fn handle_pickup(out: &mut Output, state: &mut WorldState, username: &str) -> TurnCost {
    let Some(pos) = state.players.get(username).map(|p| p.pos) else {
        return TurnCost::Free;
    };

    let taken = state.item_id_at(pos).and_then(|id| state.items.remove(id));
    let Some(item) = taken else {
        out.say(format!("**{}** finds nothing to pick up here.", username));
        return TurnCost::Action;
    };

    out.say(format!("**{}** picked up {}.", username, item.name));
    debug!(username, item_id = item.id, "item picked up");
    if let Some(player) = state.players.get_mut(username) {
        player.inventory.push(InventoryItem {
            id: item.id,
            kind: item.kind,
            name: item.name,
        });
    }
    TurnCost::Action
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::{with_player, world};
    use crate::world::Pos;
    use rstest::rstest;

    fn carrying(kinds: &[ItemKind]) -> WorldState {
        let mut state = world(&["#####", "#...#", "#####"]);
        with_player(&mut state, "ann", Pos::new(1, 1));
        if let Some(p) = state.players.get_mut("ann") {
            for (i, kind) in kinds.iter().enumerate() {
                p.inventory.push(InventoryItem {
                    id: i as u32 + 1,
                    kind: *kind,
                    name: kind.display_name().to_string(),
                });
            }
        }
        state
    }

    #[test]
    fn inventory_lists_one_indexed() {
        let state = carrying(&[ItemKind::Gem, ItemKind::Sword]);
        let mut out = Output::new();
        assert_eq!(handle_inventory(&mut out, &state, "ann"), TurnCost::Free);
        assert_eq!(
            out.into_narrative(),
            "**ann** opens their inventory:\n1. Shiny Gem ($50)\n2. Rusty Sword (+2 ATK)"
        );
    }

    #[test]
    fn empty_inventory_says_so() {
        let state = carrying(&[]);
        let mut out = Output::new();
        handle_inventory(&mut out, &state, "ann");
        assert_eq!(out.into_narrative(), "**ann** opens their inventory:\n_empty_");
    }

    #[test]
    fn potion_heal_is_capped() {
        let mut state = carrying(&[ItemKind::Potion]);
        if let Some(p) = state.players.get_mut("ann") {
            p.hp = 15;
        }
        let mut out = Output::new();
        assert_eq!(
            handle_use(&mut out, &mut state, "ann", "potion"),
            TurnCost::Action
        );
        assert_eq!(state.players["ann"].hp, 20);
        assert!(state.players["ann"].inventory.is_empty());
        assert_eq!(
            out.into_narrative(),
            "**ann** uses Healing Potion (+8 HP). Restored 8 HP (HP: 20/20)."
        );
    }

    #[rstest]
    #[case("sword")]
    #[case("rusty")]
    #[case("(+2 atk)")]
    fn sword_matches_by_type_or_name(#[case] query: &str) {
        let mut state = carrying(&[ItemKind::Gem, ItemKind::Sword]);
        let mut out = Output::new();
        handle_use(&mut out, &mut state, "ann", query);
        let p = &state.players["ann"];
        assert_eq!(p.atk, 5);
        assert_eq!(p.inventory.len(), 1);
        assert_eq!(p.inventory[0].kind, ItemKind::Gem);
    }

    #[test]
    fn first_match_wins() {
        let mut state = carrying(&[ItemKind::Gem, ItemKind::Gem]);
        let mut out = Output::new();
        handle_use(&mut out, &mut state, "ann", "gem");
        assert_eq!(state.players["ann"].inventory[0].id, 2);
        assert!(out.into_narrative().ends_with("Nothing happens."));
    }

    #[test]
    fn missing_item_is_free_and_harmless() {
        let mut state = carrying(&[ItemKind::Gem]);
        let before = state.clone();
        let mut out = Output::new();
        assert_eq!(
            handle_use(&mut out, &mut state, "ann", "potion"),
            TurnCost::Free
        );
        assert_eq!(state, before);
        assert_eq!(out.into_narrative(), "**ann** doesn't have \"potion\".");
    }

    #[test]
    fn pickup_takes_lowest_id_on_tile() {
        let mut state = carrying(&[]);
        state.spawn_item(Pos::new(2, 1), ItemKind::Sword);
        let first = state.spawn_item(Pos::new(1, 1), ItemKind::Gem).unwrap();
        state.spawn_item(Pos::new(1, 1), ItemKind::Potion);

        let mut out = Output::new();
        assert_eq!(handle_pickup(&mut out, &mut state, "ann"), TurnCost::Action);

        let inv = &state.players["ann"].inventory;
        assert_eq!(inv.len(), 1);
        assert_eq!(inv[0].id, first);
        assert!(state.items.get(first).is_none());
        assert_eq!(state.items.len(), 2);
        assert_eq!(out.into_narrative(), "**ann** picked up Shiny Gem ($50).");
    }

    #[test]
    fn pickup_on_empty_tile_still_costs_a_turn() {
        let mut state = carrying(&[]);
        state.spawn_item(Pos::new(3, 1), ItemKind::Gem);
        let mut out = Output::new();
        assert_eq!(handle_pickup(&mut out, &mut state, "ann"), TurnCost::Action);
        assert_eq!(state.items.len(), 1);
        assert_eq!(
            out.into_narrative(),
            "**ann** finds nothing to pick up here."
        );
    }
}
