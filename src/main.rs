use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swiss_pairing::config::AppConfig;
use swiss_pairing::models::{PlayerId, TournamentId};
use swiss_pairing::{next_round, preview_round};
use swiss_pairing::storage::{JsonlStore, StorageConfig, TournamentStore};

#[derive(Parser)]
#[command(name = "swiss-pairing")]
#[command(about = "Swiss-system tournament pairing")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a tournament and print its ID
    Create {
        /// Tournament name
        name: String,
    },

    /// List stored tournaments
    List,

    /// Register a player
    Register {
        #[arg(long)]
        tournament: String,

        /// Player name
        name: String,
    },

    /// Count registered players
    Count {
        #[arg(long)]
        tournament: String,
    },

    /// Report a match result
    Report {
        #[arg(long)]
        tournament: String,

        #[arg(long)]
        winner: u32,

        #[arg(long)]
        loser: u32,
    },

    /// Show current standings
    Standings {
        #[arg(long)]
        tournament: String,
    },

    /// Pair the next round
    Pair {
        #[arg(long)]
        tournament: String,

        /// RNG seed (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Print pairings as JSON
        #[arg(long)]
        json: bool,

        /// Show the pairings without committing the bye or the round
        #[arg(long)]
        dry_run: bool,
    },

    /// Mark the tournament complete
    Finish {
        #[arg(long)]
        tournament: String,
    },

    /// Delete all matches and reset standings
    ResetMatches {
        #[arg(long)]
        tournament: String,
    },

    /// Delete all registered players
    DeletePlayers {
        #[arg(long)]
        tournament: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    config.validate()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::debug!("Starting swiss-pairing v{}", env!("CARGO_PKG_VERSION"));

    let mut store = JsonlStore::new(StorageConfig::new(config.data_dir.clone()));

    match cli.command {
        Commands::Create { name } => {
            if name.trim().is_empty() {
                bail!("Tournament name must not be empty");
            }
            let tournament = store.create_tournament(&name)?;
            println!("{}", tournament.id);
        }

        Commands::List => {
            for id in store.list_tournaments()? {
                let tournament = store.tournament(&id)?;
                println!(
                    "{}  {:<30} round {:>2}  {}",
                    tournament.id, tournament.name, tournament.current_round, tournament.phase
                );
            }
        }

        Commands::Register { tournament, name } => {
            let player = store.register_player(&TournamentId::from(tournament), &name)?;
            println!("Registered {} as player {}", player.name, player.id);
        }

        Commands::Count { tournament } => {
            println!("{}", store.count_players(&TournamentId::from(tournament))?);
        }

        Commands::Report {
            tournament,
            winner,
            loser,
        } => {
            let record = store.report_match(
                &TournamentId::from(tournament),
                PlayerId(winner),
                PlayerId(loser),
            )?;
            println!(
                "Round {}: {} beat {}",
                record.round, record.winner_id, record.loser_id
            );
        }

        Commands::Standings { tournament } => {
            let standings = store.player_standings(
                &TournamentId::from(tournament),
                config.pairing.tie_break,
                &mut config.pairing.rng(),
            )?;
            println!("{:>4}  {:<30} {:>5} {:>7}", "ID", "Name", "Wins", "Matches");
            println!("{}", "-".repeat(50));
            for entry in standings {
                println!(
                    "{:>4}  {:<30} {:>5} {:>7}",
                    entry.id, entry.name, entry.wins, entry.matches_played
                );
            }
        }

        Commands::Pair {
            tournament,
            seed,
            json,
            dry_run,
        } => {
            let mut pairing_config = config.pairing.clone();
            if seed.is_some() {
                pairing_config.seed = seed;
            }
            let mut rng = pairing_config.rng();
            let id = TournamentId::from(tournament);

            let round = if dry_run {
                preview_round(&store, &id, &pairing_config, &mut rng)?
            } else {
                next_round(&mut store, &id, &pairing_config, &mut rng)?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&round)?);
            } else {
                if dry_run {
                    println!("(dry run, nothing saved)");
                }
                if let Some((player_id, name, tag)) = round.bye.as_ref().map(|b| b.as_tuple()) {
                    println!("{:>4}  {:>4} {}", tag.to_uppercase(), player_id, name);
                }
                for (board, p) in round.pairings.iter().enumerate() {
                    println!(
                        "{:>4}  {:>4} {:<24} vs {:>4} {}{}",
                        board + 1,
                        p.player1_id,
                        p.player1_name,
                        p.player2_id,
                        p.player2_name,
                        if p.rematch { "  (rematch)" } else { "" }
                    );
                }
            }
        }

        Commands::Finish { tournament } => {
            let id = TournamentId::from(tournament);
            let mut record = store.tournament(&id)?;
            record.complete();
            store.save_tournament(&record)?;
            println!("Tournament {} complete after {} rounds", id, record.current_round);
        }

        Commands::ResetMatches { tournament } => {
            store.delete_matches(&TournamentId::from(tournament))?;
            println!("Matches deleted");
        }

        Commands::DeletePlayers { tournament } => {
            store.delete_players(&TournamentId::from(tournament))?;
            println!("Players deleted");
        }
    }

    Ok(())
}
