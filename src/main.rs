use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use dungeon_crawl::Engine;
use dungeon_crawl::config::GameConfig;
use dungeon_crawl::world::SessionStore;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const USAGE: &str = "usage: dungeon-crawl [--config <path>] <session-id> <username>";

struct Args {
    config_path: PathBuf,
    session_id: String,
    username: String,
}

fn parse_args() -> Result<Args, String> {
    let mut config_path = PathBuf::from("dungeon.toml");
    let mut positional: Vec<String> = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            let path = args.next().ok_or("--config needs a path")?;
            config_path = PathBuf::from(path);
        } else {
            positional.push(arg);
        }
    }

    match <[String; 2]>::try_from(positional) {
        Ok([session_id, username]) => Ok(Args {
            config_path,
            session_id,
            username,
        }),
        Err(_) => Err(USAGE.to_string()),
    }
}

/// Logs go to stderr so they never mix with the game transcript.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .init();
}

fn main() -> io::Result<()> {
    init_tracing();

    let args = match parse_args() {
        Ok(a) => a,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(1);
        }
    };

    let config = match GameConfig::load(&args.config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    let store = SessionStore::new(&config.state_dir);
    let mut engine = Engine::from_config(&config);

    match engine.load_or_init(&store, &args.session_id) {
        Ok(state) => {
            println!(
                "Session '{}' (turn {}), playing as {}.",
                args.session_id, state.turn, args.username
            );
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
    println!("Type '/look' to look around, 'quit' to exit.\n");

    let stdin = io::stdin();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        let bytes_read = stdin.read_line(&mut input)?;
        if bytes_read == 0 {
            println!("\nGoodbye.");
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            println!("Goodbye.");
            break;
        }

        match engine.step_session(&store, &args.session_id, &args.username, input) {
            Ok(result) => {
                println!("{}\n", result.narrative);
                println!("{}\n", result.ascii_map);
            }
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
