pub mod config;
pub mod engine;
pub mod error;
pub mod world;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use config::GameConfig;
use engine::{
    COMMAND_LIST, Command, LOOK_RADIUS, Output, TurnCost, describe_nearby, ensure_player,
    handle_attack, handle_inventory, handle_move, handle_pickup, handle_use, monsters_act,
    render_map,
};
use error::StateError;
use world::{GeneratorParams, SessionStore, WorldState, generate};

/// Everything one command produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub state: WorldState,
    pub narrative: String,
    /// The map as seen by the acting player.
    pub ascii_map: String,
}

#[cfg(feature = "wasm")]
mod wasm_bindings {
    use super::*;
    use serde::Serialize;
    use serde_wasm_bindgen::to_value;
    use wasm_bindgen::prelude::*;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct WasmStepResult {
        narrative: String,
        ascii_map: String,
        turn: u64,
    }

    /// A single in-memory session driven from JavaScript.
    #[wasm_bindgen]
    pub struct WasmGame {
        engine: Engine,
        state: WorldState,
    }

    #[wasm_bindgen]
    impl WasmGame {
        /// Start a fresh dungeon. Pass a TOML config string, or an empty one
        /// for the defaults.
        #[wasm_bindgen(constructor)]
        pub fn new(config_toml: &str) -> Result<WasmGame, JsValue> {
            let config = GameConfig::from_toml_str(config_toml)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            config
                .validate()
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            let mut engine = Engine::from_config(&config);
            let state = engine.new_world();
            Ok(WasmGame { engine, state })
        }

        /// Apply one command for `username`.
        #[wasm_bindgen]
        pub fn step(&mut self, username: &str, input: &str) -> JsValue {
            let state = std::mem::take(&mut self.state);
            let result = self.engine.step(state, username, input);
            self.state = result.state;
            to_value(&WasmStepResult {
                narrative: result.narrative,
                ascii_map: result.ascii_map,
                turn: self.state.turn,
            })
            .unwrap_or(JsValue::NULL)
        }

        /// The persisted JSON form of the current world.
        #[wasm_bindgen(js_name = saveState)]
        pub fn save_state(&self) -> Result<String, JsValue> {
            world::encode_state(&self.state).map_err(|e| JsValue::from_str(&e.to_string()))
        }
    }
}

////////////////////////
/// COMMAND DISPATCH ///
////////////////////////

/// Apply one line of input from `username` to `state`.
///
/// `/spawn` replaces the world with a fresh one built from `params`, carrying
/// the turn counter forward. Every other non-empty command first makes sure
/// the player exists, then runs its handler; turn-consuming actions are
/// followed by one monster pass.
pub fn process_command<R: Rng + ?Sized>(
    mut state: WorldState,
    username: &str,
    input: &str,
    params: &GeneratorParams,
    rng: &mut R,
) -> CommandResult {
    let command = Command::parse(input);
    debug!(username, ?command, turn = state.turn, "processing command");

    let mut out = Output::new();

    let cost = match command {
        Command::Empty => {
            out.say(format!("**{}** sent an empty command.", username));
            TurnCost::Free
        }
        Command::Spawn => {
            let next_turn = state.turn + 1;
            state = generate(params, rng);
            state.turn = next_turn;
            info!(username, turn = next_turn, "dungeon regenerated");
            out.say(format!("**{}** regenerated the dungeon.", username));
            TurnCost::Free
        }
        other => {
            ensure_player(&mut state, username);
            dispatch(&mut out, &mut state, username, other, rng)
        }
    };

    match cost {
        TurnCost::Free => {}
        TurnCost::Inspect => state.turn += 1,
        TurnCost::Action => {
            state.turn += 1;
            monsters_act(&mut state, rng, &mut out);
        }
    }

    let ascii_map = render_map(&state, username);
    CommandResult {
        state,
        narrative: out.into_narrative(),
        ascii_map,
    }
}

fn dispatch<R: Rng + ?Sized>(
    out: &mut Output,
    state: &mut WorldState,
    username: &str,
    command: Command,
    rng: &mut R,
) -> TurnCost {
    match command {
        Command::Look => {
            let Some(pos) = state.players.get(username).map(|p| p.pos) else {
                return TurnCost::Free;
            };
            out.say(format!(
                "**{}** looks around the dungeon.\n\n{}",
                username,
                describe_nearby(state, pos, LOOK_RADIUS)
            ));
            TurnCost::Inspect
        }
        Command::Inventory => handle_inventory(out, state, username),
        Command::Use(query) => handle_use(out, state, username, &query),
        Command::Pickup => handle_pickup(out, state, username),
        Command::Move(dir) => handle_move(out, state, username, dir),
        Command::Attack(dir) => handle_attack(out, state, username, dir, rng),
        Command::Unknown | Command::Empty | Command::Spawn => {
            out.say(format!(
                "**{}** tried an unknown command. Use {}.",
                username, COMMAND_LIST
            ));
            TurnCost::Free
        }
    }
}

//////////////
/// ENGINE ///
//////////////

/// Owns the generator settings and the random source so callers only deal
/// with states and input lines.
pub struct Engine<R = StdRng> {
    params: GeneratorParams,
    rng: R,
}

impl Engine<StdRng> {
    /// Seeded from the config when it names a seed, from the OS otherwise.
    pub fn from_config(config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Engine::with_rng(config.generator.clone(), rng)
    }
}

impl<R: Rng> Engine<R> {
    pub fn with_rng(params: GeneratorParams, rng: R) -> Self {
        Engine { params, rng }
    }

    pub fn new_world(&mut self) -> WorldState {
        generate(&self.params, &mut self.rng)
    }

    pub fn step(&mut self, state: WorldState, username: &str, input: &str) -> CommandResult {
        process_command(state, username, input, &self.params, &mut self.rng)
    }

    /// Load the session, or generate and save a fresh world when none exists.
    pub fn load_or_init(
        &mut self,
        store: &SessionStore,
        session_id: &str,
    ) -> Result<WorldState, StateError> {
        if store.exists(session_id) {
            return store.load(session_id);
        }
        let state = self.new_world();
        store.save(session_id, &state)?;
        info!(session_id, "new session created");
        Ok(state)
    }

    /// One full load, process, save cycle.
    pub fn step_session(
        &mut self,
        store: &SessionStore,
        session_id: &str,
        username: &str,
        input: &str,
    ) -> Result<CommandResult, StateError> {
        let state = self.load_or_init(store, session_id)?;
        let result = self.step(state, username, input);
        store.save(session_id, &result.state)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Grid, ItemKind, MonsterKind, PLAYER_ICONS, Pos};

    fn engine(seed: u64) -> Engine {
        Engine::with_rng(GeneratorParams::new(11, 9, 3, 3), StdRng::seed_from_u64(seed))
    }

    fn corridor() -> WorldState {
        WorldState::new(Grid::from_rows(&["#######", "#.....#", "#######"]))
    }

    #[test]
    fn empty_input_touches_nothing() {
        let mut eng = engine(1);
        let state = corridor();
        let result = eng.step(state.clone(), "ann", "   ");
        assert_eq!(result.state, state);
        assert_eq!(result.narrative, "**ann** sent an empty command.");
    }

    #[test]
    fn spawn_regenerates_and_advances_turn() {
        let mut eng = engine(2);
        let mut state = corridor();
        state.turn = 41;
        let result = eng.step(state, "ann", "/SPAWN");
        assert_eq!(result.state.turn, 42);
        assert_eq!(result.state.map.width(), 11);
        assert!(result.state.players.is_empty());
        assert_eq!(result.narrative, "**ann** regenerated the dungeon.");
    }

    #[test]
    fn look_advances_turn_without_moving_monsters() {
        let mut eng = engine(3);
        let mut state = corridor();
        state.spawn_monster(Pos::new(5, 1), MonsterKind::Snake);
        let result = eng.step(state, "ann", "/look");

        assert_eq!(result.state.turn, 1);
        assert_eq!(
            result.state.monster_at(Pos::new(5, 1)).map(|m| m.kind),
            Some(MonsterKind::Snake)
        );
        assert_eq!(
            result.narrative,
            "**ann** looks around the dungeon.\n\nMonster: snake at (5,1) HP:6"
        );
    }

    #[test]
    fn move_runs_the_monster_pass() {
        let mut eng = engine(4);
        let mut state = corridor();
        state.spawn_monster(Pos::new(5, 1), MonsterKind::Zombie);
        // ann spawns at the center (3,1); moving east puts the zombie adjacent.
        let result = eng.step(state, "ann", "/move east");

        assert_eq!(result.state.turn, 1);
        assert_eq!(result.state.players["ann"].pos, Pos::new(4, 1));
        assert!(result.state.players["ann"].hp < 20);
        assert!(
            result
                .narrative
                .starts_with("**ann** moves east.\n\nThe zombie attacks ann for ")
        );
    }

    #[test]
    fn failed_use_costs_nothing() {
        let mut eng = engine(5);
        let mut state = corridor();
        state.spawn_item(Pos::new(3, 1), ItemKind::Gem);
        let result = eng.step(state, "ann", "/use sword");
        assert_eq!(result.state.turn, 0);
        assert_eq!(result.narrative, "**ann** doesn't have \"sword\".");
    }

    #[test]
    fn unknown_lists_the_commands() {
        let mut eng = engine(6);
        let result = eng.step(corridor(), "ann", "/dance");
        assert_eq!(result.state.turn, 0);
        assert!(result.state.players.contains_key("ann"));
        assert!(result.narrative.contains(COMMAND_LIST));
    }

    #[test]
    fn ascii_map_is_from_the_actor() {
        let mut eng = engine(7);
        let result = eng.step(corridor(), "ann", "/inventory");
        let icon = result.state.icon_for("ann").map(str::to_string);
        assert_eq!(icon.as_deref(), Some(PLAYER_ICONS[0]));
        assert!(result.ascii_map.contains(PLAYER_ICONS[0]));
    }

    #[test]
    fn session_cycle_creates_then_reuses_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        let mut eng = engine(8);

        let first = eng.step_session(&store, "s1", "ann", "/look").unwrap();
        assert!(store.exists("s1"));
        let second = eng.step_session(&store, "s1", "ann", "/look").unwrap();
        assert_eq!(second.state.turn, first.state.turn + 1);
        assert_eq!(store.load("s1").unwrap(), second.state);
    }
}
