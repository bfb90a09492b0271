//! Pixel Slots terminal front-end
//!
//! Usage:
//!   pixel-slots status              - Show wallet
//!   pixel-slots spin [--count N]    - Pull the lever
//!   pixel-slots bet inc|dec|set|min|max [AMOUNT]
//!   pixel-slots reset               - Restore the starting balance
//!   pixel-slots paytable            - Show multipliers
//!   pixel-slots evaluate A B C      - Score a payline without betting

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use ps_core::{
    GameConfig, GameSession, JsonFileStore, PayTable, SessionStats, SpinGrid, SpinRejected,
    SpinReport, Symbol, WinKind,
};

#[derive(Parser)]
#[command(name = "pixel-slots", version, about = "Retro three-reel slot machine")]
struct Cli {
    /// Wallet file (defaults to the platform config directory)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Game config (.json, .yaml or .yml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// RNG seed for reproducible spins
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show balance and bet
    Status,
    /// Spin the reels
    Spin {
        /// Number of spins (stops early when funds run out)
        #[arg(short, long, default_value_t = 1)]
        count: u32,
    },
    /// Adjust the bet
    Bet {
        #[arg(value_enum)]
        action: BetAction,
        /// Amount for inc/dec (defaults to the bet step) or set
        amount: Option<u64>,
    },
    /// Restore the starting balance
    Reset,
    /// Show the paytable
    Paytable,
    /// Score a payline (glyphs or symbol names) without touching the wallet
    Evaluate {
        #[arg(num_args = 3, required = true)]
        symbols: Vec<String>,
        #[arg(short, long, default_value_t = 10)]
        bet: u64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BetAction {
    Inc,
    Dec,
    Set,
    Min,
    Max,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpinSummary<'a> {
    spins: Vec<(SpinGrid, SpinReport)>,
    rejected: Option<SpinRejected>,
    stats: &'a SessionStats,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let stdout = io::stdout();
    run(cli, &mut stdout.lock())
}

fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let config = match &cli.config {
        Some(path) => GameConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };

    if let Commands::Evaluate { symbols, bet } = &cli.command {
        return evaluate(&config, symbols, *bet, cli.json, out);
    }

    let state = cli.state.clone().unwrap_or_else(JsonFileStore::default_path);
    log::debug!("Using wallet file {}", state.display());
    let seed = cli.seed.unwrap_or_else(rand::random);
    let mut game = GameSession::open(config, JsonFileStore::open(&state), seed);

    match cli.command {
        Commands::Status => {}
        Commands::Spin { count } => return spin(&mut game, count, cli.json, out),
        Commands::Bet { action, amount } => {
            let step = game.config().wallet.bet_step;
            match action {
                BetAction::Inc => game.increase_bet(amount.unwrap_or(step)),
                BetAction::Dec => game.decrease_bet(amount.unwrap_or(step)),
                BetAction::Set => {
                    let amount = amount.context("`bet set` needs an AMOUNT")?;
                    game.set_bet(amount)
                }
                BetAction::Min => game.min_bet(),
                BetAction::Max => game.max_bet(),
            };
        }
        Commands::Reset => {
            game.reset_balance();
        }
        Commands::Paytable => return paytable(game.paytable(), cli.json, out),
        Commands::Evaluate { .. } => {}
    }

    status(&game, cli.json, out)
}

fn status<S: ps_core::WalletStore>(
    game: &GameSession<S>,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&game.snapshot())?)?;
        return Ok(());
    }

    let wallet = game.wallet();
    writeln!(out, "Wallet: ${}", wallet.balance())?;
    writeln!(out, "Bet:    ${}", wallet.current_bet())?;
    if wallet.is_broke() {
        writeln!(out, "OUT OF FUNDS! Run `pixel-slots reset` to play again.")?;
    }
    Ok(())
}

fn spin<S: ps_core::WalletStore>(
    game: &mut GameSession<S>,
    count: u32,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let mut spins = Vec::new();
    let mut rejected = None;

    for _ in 0..count {
        match game.spin() {
            Ok(result) => {
                if !json {
                    print_spin(&result.0, &result.1, out)?;
                }
                spins.push(result);
            }
            Err(reason) => {
                if !json {
                    writeln!(out, "INSUFFICIENT FUNDS: {}", reason)?;
                }
                rejected = Some(reason);
                break;
            }
        }
    }

    if json {
        let summary = SpinSummary {
            spins,
            rejected,
            stats: game.stats(),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
        return Ok(());
    }

    let stats = game.stats();
    writeln!(out)?;
    writeln!(
        out,
        "Spins: {}  Wins: {} ({}%)  Session: {:+}  RTP: {:.1}%",
        stats.total_spins,
        stats.wins,
        stats.win_percentage(),
        stats.session_balance,
        stats.rtp()
    )?;
    if stats.is_hot_streak() {
        writeln!(out, "HOT STREAK x{}", stats.streak.count)?;
    }
    status(game, false, out)
}

fn print_spin(grid: &SpinGrid, report: &SpinReport, out: &mut impl Write) -> Result<()> {
    for row in 0..3 {
        let glyphs: Vec<&str> = grid.row(row).iter().map(|s| s.glyph()).collect();
        let marker = if row == 1 { ">" } else { " " };
        writeln!(out, "{} {}", marker, glyphs.join(" "))?;
    }

    let line = match &report.outcome.kind {
        WinKind::Triple { glyph, multiplier } => {
            format!("TRIPLE {} x{}! WIN ${}", glyph, multiplier, report.outcome.payout)
        }
        WinKind::Pair { multiplier, .. } => {
            format!("PAIR x{}! WIN ${}", multiplier, report.outcome.payout)
        }
        WinKind::NoMatch | WinKind::Malformed => format!("LOST ${}", report.bet),
    };
    writeln!(out, "{}  (balance ${})", line, report.balance)?;
    Ok(())
}

fn paytable(table: &PayTable, json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&table.entries())?)?;
        return Ok(());
    }

    for (glyph, multiplier) in table.entries() {
        writeln!(out, "{glyph} {glyph} {glyph}  x{multiplier}")?;
    }
    writeln!(out, "ANY PAIR  x{}", table.pair_multiplier())?;
    Ok(())
}

fn evaluate(
    config: &GameConfig,
    symbols: &[String],
    bet: u64,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    // Names resolve to glyphs, anything else is scored as given
    let payline: Vec<String> = symbols
        .iter()
        .map(|s| match s.parse::<Symbol>() {
            Ok(symbol) => symbol.glyph().to_string(),
            Err(_) => s.clone(),
        })
        .collect();

    let outcome = PayTable::from_config(&config.paytable).evaluate(&payline, bet);
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&outcome)?)?;
    } else if outcome.is_win {
        writeln!(out, "{} -> WIN ${}", payline.join(" "), outcome.payout)?;
    } else {
        writeln!(out, "{} -> no win", payline.join(" "))?;
    }
    Ok(())
}
