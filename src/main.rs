//! Binary entrypoint for the zorkcore CLI.
//!
//! Commands:
//! - `play [--data <dir>]` - load the world and run a line-oriented game loop on stdin/stdout
//! - `init` - write a starter `config.toml`
//! - `check [--data <dir>]` - load the world and report counts, max score and invariant problems
//!
//! See the library crate docs for module-level details: `zorkcore::`.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use zorkcore::config::Config;
use zorkcore::game::{CommandProcessor, GameSession, GameState, JsonWorldLoader, World};

#[derive(Parser)]
#[command(name = "zorkcore")]
#[command(about = "Command resolution and world-state engine for a Zork-style adventure")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the game interactively
    Play {
        /// World data directory (overrides game.data_dir)
        #[arg(short, long)]
        data: Option<String>,
    },
    /// Write a default configuration file
    Init,
    /// Load the world and report on it
    Check {
        /// World data directory (overrides game.data_dir)
        #[arg(short, long)]
        data: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        Config::create_default(&cli.config).await?;
        println!("Wrote default configuration to {}", cli.config);
        return Ok(());
    }

    // A missing config file is fine; every setting has a default.
    let config = match Config::load(&cli.config).await {
        Ok(config) => Some(config),
        Err(e) => {
            if std::path::Path::new(&cli.config).exists() {
                return Err(e);
            }
            None
        }
    };
    init_logging(&config, cli.verbose);
    let config = config.unwrap_or_default();

    match cli.command {
        Commands::Play { data } => {
            let data_dir = data.unwrap_or_else(|| config.game.data_dir.clone());
            let world = load_world(&data_dir)?;
            let processor = CommandProcessor::from_world(world, &config.game)
                .with_context(|| format!("Failed to start game in {}", config.game.starting_scene))?;
            info!("Starting game in {}", config.game.starting_scene);
            run_repl(GameSession::new(processor)).await?;
        }
        Commands::Check { data } => {
            let data_dir = data.unwrap_or_else(|| config.game.data_dir.clone());
            let world = load_world(&data_dir)?;
            let item_count = world.items.len();
            let scene_count = world.scenes.len();
            let state = GameState::new(world, &config.game.starting_scene)
                .with_context(|| format!("World in {} is not playable", data_dir))?;

            println!("Items:     {}", item_count);
            println!("Scenes:    {}", scene_count);
            println!("Max score: {}", state.max_score());
            let problems = state.check_invariants();
            if problems.is_empty() {
                println!("Invariants: ok");
            } else {
                for problem in &problems {
                    warn!("Invariant: {}", problem);
                    println!("  - {}", problem);
                }
                anyhow::bail!("{} invariant problem(s) found", problems.len());
            }
        }
        // Written before any config was loaded.
        Commands::Init => {}
    }

    Ok(())
}

/// A world that fails to load is fatal.
fn load_world(data_dir: &str) -> Result<World> {
    let loader = JsonWorldLoader::new(data_dir);
    World::load(&loader).with_context(|| format!("Failed to load world from {}", data_dir))
}

async fn run_repl(session: GameSession) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let opening = session.process("look").await;
    stdout.write_all(format!("{}\n", opening.message).as_bytes()).await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input.to_lowercase().as_str(), "quit" | "q") {
            break;
        }

        let result = session.process(input).await;
        let mut output = format!("{}\n", result.message);
        if result.score_change != 0 {
            output.push_str(&format!(
                "[Your score has gone up by {} to {}.]\n",
                result.score_change,
                session.score().await
            ));
        }
        stdout.write_all(output.as_bytes()).await?;
    }

    let farewell = format!(
        "Final score: {} in {} moves.\n",
        session.score().await,
        session.moves().await
    );
    stdout.write_all(farewell.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|cfg| cfg.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|cfg| cfg.logging.file.as_ref())
        .and_then(|file| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .ok()
        });

    match log_file {
        Some(f) => {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            // Game output owns stdout; only echo log lines when attached to a terminal.
            let is_tty = atty::is(atty::Stream::Stdout);
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if is_tty && record.level() <= log::Level::Warn {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
        None => {
            builder.format(|fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
            });
        }
    }
    let _ = builder.try_init();
}
