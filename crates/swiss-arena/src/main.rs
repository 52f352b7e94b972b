use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufReader};
use std::path::PathBuf;
use swiss_arena::config::{ArenaConfig, PresetConfig};
use swiss_arena::display::ConsoleAnnouncer;
use swiss_arena::input::{PromptInput, ScriptedInput};
use swiss_arena::json_output;
use swiss_arena::queries::{self, PlayerOrder};
use swiss_arena::runner::TournamentRunner;
use swiss_arena::storage::Storage;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "swiss-arena")]
#[command(about = "Swiss-system tournament desk")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a tournament from prompts or a script
    Run {
        /// TOML script with settings, roster and results
        #[arg(short, long)]
        script: Option<PathBuf>,
        /// Preset filling settings the input leaves out
        #[arg(short, long)]
        preset: Option<String>,
        /// Do not write to the database
        #[arg(long)]
        no_save: bool,
    },
    /// List saved players
    Players {
        /// Tournament to list; omit with --all
        tournament: Option<String>,
        /// Players of every saved tournament
        #[arg(long, conflicts_with = "tournament")]
        all: bool,
        /// Sort by ranking instead of name
        #[arg(long)]
        by_rank: bool,
    },
    /// List saved tournaments
    Tournaments,
    /// List the rounds of a saved tournament
    Rounds { tournament: String },
    /// List the matches of a saved tournament
    Matches { tournament: String },
    /// Amend a saved tournament
    Amend {
        tournament: String,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// Rank override, LASTNAME=RANK; may be repeated
        #[arg(short, long = "rank", value_parser = parse_rank_override)]
        ranks: Vec<(String, u32)>,
    },
    /// Write the whole database as JSON
    Export {
        /// Output file; defaults to a timestamped file in the export directory
        path: Option<PathBuf>,
    },
}

fn parse_rank_override(s: &str) -> Result<(String, u32), String> {
    let (name, rank) = s
        .split_once('=')
        .ok_or_else(|| format!("expected LASTNAME=RANK, got '{s}'"))?;
    let rank = rank
        .trim()
        .parse()
        .map_err(|_| format!("invalid rank '{rank}'"))?;
    Ok((name.trim().to_string(), rank))
}

fn open_storage(config: &ArenaConfig) -> Result<Storage> {
    if let Some(parent) = config.database.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    Storage::open(&config.database)
        .with_context(|| format!("opening database {}", config.database.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ArenaConfig::load()?;

    match cli.command {
        Commands::Run {
            script,
            preset,
            no_save,
        } => {
            let preset = match &preset {
                Some(name) => {
                    info!(preset = %name, "using preset");
                    config.get_preset(name)?.clone()
                }
                None => PresetConfig::default(),
            };
            let storage = if no_save {
                None
            } else {
                Some(open_storage(&config)?)
            };
            let now = chrono::Local::now().naive_local();
            let announcer = ConsoleAnnouncer::new(io::stdout());

            let tournament = match script {
                Some(path) => {
                    let input = ScriptedInput::from_path(&path)
                        .with_context(|| format!("reading script {}", path.display()))?;
                    let mut runner =
                        TournamentRunner::new(input, announcer, now).with_preset(preset);
                    if let Some(storage) = &storage {
                        runner = runner.with_storage(storage, config.autosave);
                    }
                    runner.run()?
                }
                None => {
                    let input = PromptInput::new(BufReader::new(io::stdin()), io::stdout());
                    let mut runner =
                        TournamentRunner::new(input, announcer, now).with_preset(preset);
                    if let Some(storage) = &storage {
                        runner = runner.with_storage(storage, config.autosave);
                    }
                    runner.run()?
                }
            };
            println!("{} is {}", tournament.name(), tournament.stage());
        }

        Commands::Players {
            tournament,
            all,
            by_rank,
        } => {
            let storage = open_storage(&config)?;
            let order = if by_rank {
                PlayerOrder::Ranking
            } else {
                PlayerOrder::Alphabetical
            };
            let players = match (tournament, all) {
                (Some(name), _) => queries::tournament_players(&storage, &name, order)?,
                (None, true) => queries::all_players(&storage, order)?,
                (None, false) => bail!("name a tournament or pass --all"),
            };
            for player in players {
                println!("{player}");
            }
        }

        Commands::Tournaments => {
            let storage = open_storage(&config)?;
            for summary in queries::tournaments(&storage)? {
                println!("{summary}");
            }
        }

        Commands::Rounds { tournament } => {
            let storage = open_storage(&config)?;
            for round in queries::rounds(&storage, &tournament)? {
                println!("{round}");
            }
        }

        Commands::Matches { tournament } => {
            let storage = open_storage(&config)?;
            for m in queries::matches(&storage, &tournament)? {
                println!("{m}");
            }
        }

        Commands::Amend {
            tournament,
            description,
            ranks,
        } => {
            let storage = open_storage(&config)?;
            let mut t = storage.load_tournament(&tournament)?;
            if let Some(text) = description {
                if !t.set_description(&text) {
                    println!("Empty description, keeping the current one");
                }
            }
            for (name, rank) in ranks {
                t.override_rank(&name, rank)?;
            }
            let snapshot = storage.save_tournament(&t)?;
            println!("Saved {} (snapshot {snapshot})", t.name());
        }

        Commands::Export { path } => {
            let storage = open_storage(&config)?;
            let path = path.unwrap_or_else(|| {
                let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S");
                config.export_dir.join(format!("arena-{stamp}.json"))
            });
            json_output::write_json(&path, &storage.dump()?)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
    }

    Ok(())
}
