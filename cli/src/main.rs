use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use rand::prelude::*;
use serde::Serialize;
use sweeper_core::*;

/// Plays headless games with a player that reveals random hidden cells.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    /// Board side length
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: Coord,

    /// Number of mines
    #[arg(long, default_value_t = DEFAULT_MINES)]
    mines: CellCount,

    /// How many games to play
    #[arg(short, long, default_value_t = 100)]
    games: u32,

    /// Force a seed instead of the clock
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    size: Coord,
    mines: CellCount,
    seed: u64,
    games: u32,
    wins: u32,
    losses: u32,
    moves: u64,
}

fn clock_seed() -> u64 {
    use web_time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

/// Picks a hidden, unflagged cell uniformly at random.
fn pick_cell(grid: &Grid, rng: &mut SmallRng) -> Option<Coord2> {
    let hidden: Vec<_> = grid
        .iter_cells()
        .filter(|(_, cell)| !cell.is_revealed() && !cell.is_flagged())
        .map(|(coords, _)| coords)
        .collect();
    if hidden.is_empty() {
        return None;
    }
    Some(hidden[rng.random_range(0..hidden.len())])
}

fn play_round(session: &mut GameSession, rng: &mut SmallRng) -> anyhow::Result<GameState> {
    while !session.is_finished() {
        let Some(coords) = pick_cell(session.grid(), rng) else {
            break;
        };
        let outcome = session
            .reveal(coords)
            .with_context(|| format!("revealing {:?}", coords))?;
        log::trace!("{:?} -> {:?} {}", coords, outcome, session.face().emoji());
        session.tick();
    }
    Ok(session.state())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = GameConfig::new(args.size, args.mines).context("invalid board configuration")?;
    let seed = args.seed.unwrap_or_else(clock_seed);
    log::debug!("seed: {}", seed);

    let mut session = GameSession::new(config, seed)?;
    let mut rng = SmallRng::seed_from_u64(!seed);
    let mut summary = Summary {
        size: config.size,
        mines: config.mines,
        seed,
        ..Default::default()
    };

    for game in 0..args.games {
        if game > 0 {
            session.replay();
        }

        let state = play_round(&mut session, &mut rng)?;
        summary.games += 1;
        summary.moves += u64::from(session.move_count());
        match state {
            GameState::Win => summary.wins += 1,
            GameState::Lose => summary.losses += 1,
            GameState::Play => log::warn!("Game {} stopped without an ending", game),
        }
        log::info!(
            "game {}: {:?} {} after {} moves, {} of {} mines flagged",
            game,
            state,
            session.face().emoji(),
            session.move_count(),
            session.grid().flagged_mine_count(),
            config.mines
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} games on {}x{} with {} mines (seed {}): {} won, {} lost",
            summary.games,
            summary.size,
            summary.size,
            summary.mines,
            summary.seed,
            summary.wins,
            summary.losses
        );
    }

    Ok(())
}
