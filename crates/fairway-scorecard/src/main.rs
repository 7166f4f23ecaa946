use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fairway_bingo::Mark;
use fairway_bloodsome::Drive;
use fairway_core::format::{ValueClass, classify_value, format_currency};
use fairway_core::game_trait::GameType;
use fairway_core::player::Side;
use fairway_scorecard::autosave::spawn_autosave;
use fairway_scorecard::persist::{self, export_file_name, export_round, import_round};
use fairway_scorecard::{FileStore, GameRegistry, RoundState, ScorecardConfig};
use fairway_wolf::WolfChoice;

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(author, version, about = "Score golf side games and settle up")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available games
    Games {
        /// Only games playable by this many players
        #[arg(long)]
        players: Option<usize>,
    },
    /// Start a new round, replacing the saved one
    New {
        game: GameType,
        /// Player names in slot order (teams take two each)
        #[arg(long = "player", value_name = "NAME")]
        players: Vec<String>,
    },
    /// Record strokes; omit STROKES to clear the hole
    Score {
        player: usize,
        hole: usize,
        strokes: Option<u8>,
    },
    /// Set par for a hole; omit PAR to clear it
    Par { hole: usize, par: Option<u8> },
    /// Wolf: record the wolf's pick (alone, p1..p4, or none)
    Select { hole: usize, choice: String },
    /// Bingo-Bango-Bongo: award a mark; omit PLAYER to clear it
    Mark {
        hole: usize,
        mark: Mark,
        player: Option<usize>,
    },
    /// Bloodsome: choose the drive a team plays (first or second)
    Drive {
        team: usize,
        hole: usize,
        drive: String,
    },
    /// Banker: elect the banker for a hole; omit SLOT to rotate
    Banker { hole: usize, slot: Option<u8> },
    /// Nassau: press for the trailing player (p1 or p2)
    Press {
        #[arg(value_parser = parse_side)]
        side: Side,
    },
    /// Show the current result
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Write the round to a shareable JSON file
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the current round with one from a file
    Import { file: PathBuf },
    /// Forget the saved round
    Clear,
}

fn parse_side(s: &str) -> Result<Side, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "p1" | "1" => Ok(Side::One),
        "p2" | "2" => Ok(Side::Two),
        other => Err(format!("expected p1 or p2, got '{other}'")),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ScorecardConfig::load();
    if let Err(e) = config.validate() {
        tracing::error!("invalid configuration: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
    }
}

async fn run(command: Command, config: &ScorecardConfig) -> CliResult {
    let mut store = FileStore::new(&config.data_dir);
    let key = config.storage_key.as_str();
    let registry = GameRegistry::new();

    let state = match command {
        Command::Games { players } => {
            let entries = match players {
                Some(n) => registry.for_players(n),
                None => registry.entries().collect(),
            };
            for entry in entries {
                let meta = &entry.metadata;
                println!(
                    "{:<11} {:<18} {}-{} players  {}",
                    entry.id.as_str(),
                    meta.name,
                    meta.min_players,
                    meta.max_players,
                    meta.description
                );
            }
            return Ok(());
        },
        Command::Show { json } => {
            let state = current(&mut store, key)?;
            if json {
                println!("{}", serde_json::to_string_pretty(state.result())?);
            } else {
                print_settlement(&state);
            }
            return Ok(());
        },
        Command::Export { out } => {
            let state = current(&mut store, key)?;
            let path = out.unwrap_or_else(|| {
                PathBuf::from(export_file_name(
                    state.game_type(),
                    chrono::Local::now().date_naive(),
                ))
            });
            std::fs::write(&path, export_round(&state)?)?;
            println!("Exported to {}", path.display());
            return Ok(());
        },
        Command::Clear => {
            if !persist::clear(&mut store, key) {
                return Err("could not clear the saved round".into());
            }
            println!("Round cleared");
            return Ok(());
        },
        Command::New { game, players } => {
            let mut state = registry
                .start(game, &config.defaults)
                .ok_or_else(|| format!("{game} is not available"))?;
            if !players.is_empty() {
                state.edit(|r| {
                    r.set_names(&players);
                    Ok(())
                })?;
            }
            state
        },
        Command::Import { file } => import_round(&std::fs::read(&file)?)?,
        Command::Press { side } => {
            let mut state = current(&mut store, key)?;
            let press = state
                .request_press(side)
                .map_err(|e| format!("{e} ({})", e.reason()))?;
            println!("Press opened on hole {}", press.hole_started);
            state
        },
        edit => {
            let mut state = current(&mut store, key)?;
            apply_edit(&mut state, edit)?;
            state
        },
    };

    print_settlement(&state);

    let autosave = spawn_autosave(store, key.to_string(), config.autosave.quiet_period());
    autosave.submit(state);
    if autosave.shutdown().await.is_none() {
        return Err("autosave worker stopped before saving".into());
    }
    Ok(())
}

fn apply_edit(state: &mut RoundState, command: Command) -> CliResult {
    match command {
        Command::Score {
            player,
            hole,
            strokes,
        } => state.edit(|r| r.set_score(player, hole, strokes))?,
        Command::Par { hole, par } => state.edit(|r| r.set_par(hole, par))?,
        Command::Select { hole, choice } => {
            state.edit(|r| r.select(hole, WolfChoice::parse(&choice)))?
        },
        Command::Mark { hole, mark, player } => state.edit(|r| r.mark(hole, mark, player))?,
        Command::Drive { team, hole, drive } => {
            state.edit(|r| r.drive(team, hole, Drive::parse(&drive)))?
        },
        Command::Banker { hole, slot } => state.edit(|r| r.banker(hole, slot))?,
        other => return Err(format!("{other:?} is not an edit").into()),
    }
    Ok(())
}

fn current(store: &mut FileStore, key: &str) -> Result<RoundState, String> {
    persist::load(store, key)
        .ok_or_else(|| "no round in progress; start one with `fairway new <game>`".to_string())
}

fn print_settlement(state: &RoundState) {
    for balance in &state.result().settlement().balances {
        let sign = match classify_value(balance.amount) {
            ValueClass::Positive => "+",
            ValueClass::Negative => "-",
            ValueClass::Neutral => " ",
        };
        println!(
            "  {:<20} {sign}{}",
            balance.party,
            format_currency(balance.amount)
        );
    }
    println!("{}", state.summary_line());
}
