use dungeon_crawl::engine::{COMMAND_LIST, ensure_player, try_level_up};
use dungeon_crawl::world::{
    GeneratorParams, Grid, InventoryItem, ItemKind, MonsterKind, Player, Pos, WorldState,
    generate,
};
use dungeon_crawl::{CommandResult, process_command};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rstest::rstest;

fn run(state: WorldState, user: &str, input: &str, seed: u64) -> CommandResult {
    let mut rng = StdRng::seed_from_u64(seed);
    process_command(state, user, input, &GeneratorParams::default(), &mut rng)
}

fn room(rows: &[&str]) -> WorldState {
    WorldState::new(Grid::from_rows(rows))
}

fn place(state: &mut WorldState, user: &str, pos: Pos) {
    ensure_player(state, user);
    if let Some(p) = state.players.get_mut(user) {
        p.pos = pos;
    }
}

#[test]
fn pickup_off_tile_then_on_tile() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut state = generate(&GeneratorParams::new(11, 9, 0, 1), &mut rng);
    let (item_id, item_pos) = state
        .items
        .iter()
        .map(|(id, it)| (id, it.pos))
        .next()
        .expect("one item generated");

    let elsewhere = state
        .map
        .floor_tiles()
        .into_iter()
        .find(|p| *p != item_pos)
        .expect("more than one floor tile");
    place(&mut state, "ann", elsewhere);

    let result = run(state, "ann", "/pickup", 1);
    assert_eq!(result.narrative, "**ann** finds nothing to pick up here.");
    assert_eq!(result.state.turn, 1);
    assert!(result.state.items.get(item_id).is_some());

    let mut state = result.state;
    place(&mut state, "ann", item_pos);
    let result = run(state, "ann", "/pickup", 2);

    assert_eq!(result.state.turn, 2);
    assert!(result.state.items.is_empty());
    let inv = &result.state.players["ann"].inventory;
    assert_eq!(inv.len(), 1);
    assert_eq!(inv[0].id, item_id);
    assert_eq!(inv[0].kind, ItemKind::Sword);
    assert_eq!(result.narrative, "**ann** picked up Rusty Sword (+2 ATK).");
}

#[test]
fn killing_a_weakened_monster() {
    let mut state = room(&["#######", "#.....#", "#######"]);
    place(&mut state, "ann", Pos::new(2, 1));
    let id = state.spawn_monster(Pos::new(3, 1), MonsterKind::Zombie).unwrap();
    if let Some(m) = state.monsters.get_mut(id) {
        m.hp = 1;
    }

    let result = run(state, "ann", "/attack east", 7);

    assert!(result.state.monsters.get(id).is_none());
    assert_eq!(result.state.players["ann"].xp, 12);
    assert_eq!(result.state.turn, 1);
    assert!(result.narrative.contains("The zombie dies!"));
}

#[test]
fn unknown_command_only_creates_the_player() {
    let state = room(&["#####", "#...#", "#####"]);
    let mut expected = state.clone();
    ensure_player(&mut expected, "ann");

    let result = run(state, "ann", "/dance", 3);

    assert_eq!(result.state, expected);
    assert_eq!(
        result.narrative,
        format!("**ann** tried an unknown command. Use {}.", COMMAND_LIST)
    );
}

#[rstest]
#[case("/look", 1)]
#[case("/inventory", 0)]
fn inspection_leaves_the_world_alone(#[case] input: &str, #[case] turns: u64) {
    let mut rng = StdRng::seed_from_u64(5);
    let mut state = generate(&GeneratorParams::default(), &mut rng);
    ensure_player(&mut state, "ann");
    let before = state.clone();

    let result = run(state, "ann", input, 9);
    let after = &result.state;

    assert_eq!(after.map, before.map);
    assert_eq!(after.players, before.players);
    assert_eq!(after.monsters, before.monsters);
    assert_eq!(after.items, before.items);
    assert_eq!(after.turn, before.turn + turns);
}

#[test]
fn monster_in_the_way_blocks_and_still_acts() {
    let mut state = room(&["#######", "#.....#", "#######"]);
    place(&mut state, "ann", Pos::new(2, 1));
    state.spawn_monster(Pos::new(3, 1), MonsterKind::Snake);

    let result = run(state, "ann", "/move east", 4);

    let p = &result.state.players["ann"];
    assert_eq!(p.pos, Pos::new(2, 1));
    assert_eq!(result.state.turn, 1);
    // the snake is adjacent, so its turn is an attack
    assert!(p.hp == 17 || p.hp == 18);
    assert!(
        result
            .narrative
            .starts_with("**ann** cannot move: a snake blocks the way!\n\nThe snake attacks ann")
    );
}

#[test]
fn death_in_the_monster_pass_drops_everything() {
    let mut state = room(&["#########", "#.......#", "#.......#", "#########"]);
    place(&mut state, "ann", Pos::new(1, 1));
    if let Some(p) = state.players.get_mut("ann") {
        p.hp = 2;
        p.max_hp = 30;
        for kind in [ItemKind::Potion, ItemKind::Sword] {
            p.inventory.push(InventoryItem {
                id: 50,
                kind,
                name: kind.display_name().to_string(),
            });
        }
    }
    state.spawn_monster(Pos::new(2, 1), MonsterKind::Demon);

    let result = run(state, "ann", "/pickup", 8);
    let s = &result.state;
    let p = &s.players["ann"];

    assert_eq!(p.hp, 15);
    assert_eq!(p.pos, s.map.center());
    assert!(p.inventory.is_empty());
    let dropped: Vec<_> = s.items.values().filter(|it| it.pos == Pos::new(1, 1)).collect();
    assert_eq!(dropped.len(), 2);
    assert!(result.narrative.contains("was defeated and wakes up at the dungeon center"));
}

#[test]
fn big_xp_gain_crosses_several_levels() {
    let mut p = Player::new(Pos::new(1, 1));
    p.xp = 20 + 40 + 60;
    assert_eq!(try_level_up(&mut p), 3);
    assert_eq!(p.level, 4);
    assert_eq!(p.xp, 0);
    assert_eq!(p.max_hp, 32);
    assert_eq!(p.atk, 6);
    assert_eq!(p.hp, 32);
}

#[test]
fn using_a_sword_then_potion() {
    let mut state = room(&["#####", "#...#", "#####"]);
    place(&mut state, "ann", Pos::new(2, 1));
    if let Some(p) = state.players.get_mut("ann") {
        p.hp = 5;
        for kind in [ItemKind::Sword, ItemKind::Potion] {
            p.inventory.push(InventoryItem {
                id: 1,
                kind,
                name: kind.display_name().to_string(),
            });
        }
    }

    let result = run(state, "ann", "/use RUSTY", 1);
    assert_eq!(result.state.players["ann"].atk, 5);
    assert_eq!(result.state.turn, 1);
    assert_eq!(
        result.narrative,
        "**ann** uses Rusty Sword (+2 ATK). ann feels stronger (+2 ATK)."
    );

    let result = run(result.state, "ann", "/use potion", 2);
    assert_eq!(result.state.players["ann"].hp, 13);
    assert_eq!(result.state.turn, 2);
    assert!(result.state.players["ann"].inventory.is_empty());
}
