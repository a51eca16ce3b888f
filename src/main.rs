use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tournament_engine::config::AppConfig;
use tournament_engine::storage::{export_summary, StateFile};
use tournament_engine::{parse_games, MatchId, PlayerId, RoundOutcome, Tournament};

#[derive(Parser)]
#[command(name = "tournament-engine")]
#[command(about = "Run Swiss, Round Robin, elimination and league tournaments")]
#[command(version)]
struct Cli {
    /// Tournament state file
    #[arg(long, default_value = "./tournament.json")]
    state: PathBuf,

    /// Log level (trace, debug, info, warn, error); defaults to the
    /// config file's `log_level` for `new`, otherwise info
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a tournament from a TOML config and register its players
    New {
        /// Path to configuration file
        #[arg(long, default_value = "./config.toml")]
        config: PathBuf,

        /// Overwrite an existing state file
        #[arg(long)]
        force: bool,
    },

    /// Register a player before the tournament starts
    Register {
        /// Display name
        name: String,

        /// Opaque deck reference
        #[arg(long)]
        deck: Option<String>,
    },

    /// Start the tournament and pair round 1
    Start,

    /// Pair the next round (finishes the tournament after the last round)
    NextRound,

    /// Report a match result
    Report {
        /// Match id, e.g. R1M2
        #[arg(long = "match")]
        match_id: String,

        /// Winning player id
        #[arg(long, conflicts_with = "draw")]
        winner: Option<u32>,

        /// Record a draw
        #[arg(long)]
        draw: bool,

        /// Games won by player 1 and player 2, e.g. "2,1"
        #[arg(long)]
        games: Option<String>,
    },

    /// Drop a player from further rounds
    Drop {
        /// Player id
        #[arg(long)]
        player: u32,
    },

    /// Show pairings for a round (default: latest)
    Pairings {
        #[arg(long)]
        round: Option<u32>,
    },

    /// Show current standings
    Standings,

    /// Compute tiebreakers and finish the tournament
    Finalize,

    /// Write the tournament summary as JSON
    Export {
        /// Output path
        #[arg(long, default_value = "./summary.json")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // A config that fails to load here is reported by `new` itself.
    let app = match &cli.command {
        Commands::New { config, .. } => AppConfig::from_file(config).ok(),
        _ => None,
    };
    let level = AppConfig::resolve_log_level(cli.log_level.as_deref(), app.as_ref());

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = StateFile::new(cli.state.clone());

    match cli.command {
        Commands::New { config, force } => {
            if state.exists() && !force {
                bail!(
                    "State file {:?} already exists (use --force to overwrite)",
                    state.path()
                );
            }

            let app = AppConfig::from_file(&config)
                .with_context(|| format!("Failed to load config {:?}", config))?;
            let mut tournament = Tournament::new(app.tournament)?;
            for player in app.players {
                tournament.register(&player.name, player.deck)?;
            }

            state.save(&tournament)?;
            println!(
                "Created '{}' ({}) with {} players",
                tournament.name(),
                tournament.format(),
                tournament.players().count()
            );
        }

        Commands::Register { name, deck } => {
            let mut tournament = state.load()?;
            let id = tournament.register(&name, deck)?;
            state.save(&tournament)?;
            println!("Registered {} as player {}", name, id);
        }

        Commands::Start => {
            let mut tournament = state.load()?;
            let outcome = tournament.start()?;
            state.save(&tournament)?;
            print_outcome(&tournament, &outcome);
        }

        Commands::NextRound => {
            let mut tournament = state.load()?;
            let outcome = tournament.generate_round()?;
            state.save(&tournament)?;
            print_outcome(&tournament, &outcome);
        }

        Commands::Report {
            match_id,
            winner,
            draw,
            games,
        } => {
            let mut tournament = state.load()?;
            let match_id = MatchId::from(match_id);
            let winner = winner.map(PlayerId::new);

            let games = match games {
                Some(games) => parse_games(&games)
                    .with_context(|| format!("Invalid --games value '{}'", games))?,
                None => default_games(&tournament, &match_id, winner),
            };

            tournament.report(&match_id, winner, draw, games)?;
            state.save(&tournament)?;
            println!("Recorded result for {}", match_id);
        }

        Commands::Drop { player } => {
            let mut tournament = state.load()?;
            let round = tournament.rounds_played();
            tournament.drop_player(PlayerId::new(player), round)?;
            state.save(&tournament)?;
            println!("Dropped player {} after round {}", player, round);
        }

        Commands::Pairings { round } => {
            let tournament = state.load()?;
            let round = round.unwrap_or_else(|| tournament.rounds_played());
            print_round(&tournament, round);
        }

        Commands::Standings => {
            let tournament = state.load()?;
            print_standings(&tournament);
        }

        Commands::Finalize => {
            let mut tournament = state.load()?;
            tournament.finalize()?;
            state.save(&tournament)?;
            print_standings(&tournament);
            if let Some(leader) = tournament.summary().leader() {
                println!("Winner: {} ({} points)", leader.name, leader.match_points);
            }
        }

        Commands::Export { out } => {
            let tournament = state.load()?;
            export_summary(&out, &tournament.summary())?;
            println!("Wrote summary to {:?}", out);
        }
    }

    Ok(())
}

/// Games for a report given without `--games`: the winner takes the
/// minimum needed to win the match.
fn default_games(tournament: &Tournament, match_id: &MatchId, winner: Option<PlayerId>) -> [u32; 2] {
    let needed = tournament.config().best_of / 2 + 1;
    match (tournament.match_by_id(match_id), winner) {
        (Some(m), Some(winner)) if m.player1_id == winner => [needed, 0],
        (Some(m), Some(winner)) if m.player2_id == winner => [0, needed],
        _ => [0, 0],
    }
}

fn print_outcome(tournament: &Tournament, outcome: &RoundOutcome) {
    match outcome {
        RoundOutcome::Paired { round, .. } => print_round(tournament, *round),
        RoundOutcome::Finished => {
            println!("Tournament finished.");
            print_standings(tournament);
        }
    }
}

fn print_round(tournament: &Tournament, round: u32) {
    println!("\n=== Round {} ===", round);
    for m in tournament.round_matches(round) {
        let result = if m.is_draw {
            "draw".to_string()
        } else {
            match m.winner_id {
                Some(winner) => format!("winner {}", winner),
                None => "pending".to_string(),
            }
        };
        println!(
            "{:<6} {:>3} {:<20} vs {:>3} {:<20} {}",
            m.id.as_str(),
            m.player1_id.get(),
            m.player1_name,
            m.player2_id.get(),
            m.player2_name,
            result
        );
    }
    for bye in tournament.byes().iter().filter(|b| b.round == round) {
        println!("{:<6} {:>3} {}", "BYE", bye.player_id.get(), bye.player_name);
    }
    println!();
}

fn print_standings(tournament: &Tournament) {
    println!(
        "\n=== {} ({}, {}) ===",
        tournament.name(),
        tournament.format(),
        tournament.status()
    );
    println!(
        "{:>4} {:>4} {:<24} {:>4} {:>8} {:>7} {:>7}",
        "Rank", "ID", "Player", "Pts", "W-L-D", "OMW%", "GW%"
    );
    println!("{}", "-".repeat(64));
    for s in tournament.standings() {
        let record = format!("{}-{}-{}", s.wins, s.losses, s.draws);
        let name = if s.is_active {
            s.name.clone()
        } else {
            format!("{} (dropped)", s.name)
        };
        println!(
            "{:>4} {:>4} {:<24} {:>4} {:>8} {:>6.1}% {:>6.1}%",
            s.rank,
            s.player_id.get(),
            name,
            s.match_points,
            record,
            s.opponent_match_win_pct * 100.0,
            s.game_win_pct * 100.0
        );
    }
    println!();
}
