use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Play -> Win
/// - Play -> Lose
/// - Win -> Play, only through a replay
/// - Lose -> Play, only through a replay
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Play,
    Win,
    Lose,
}

impl GameState {
    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Win | Self::Lose)
    }
}

/// Status face shown above the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Face {
    Neutral,
    Surprise,
    Dead,
    Cool,
}

impl Face {
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Neutral => "🙂",
            Self::Surprise => "😯",
            Self::Dead => "😵",
            Self::Cool => "😎",
        }
    }
}

/// One player's game from first click to replay: the grid, the phase, and the face.
///
/// Input collaborators call [`reveal`](Self::reveal), [`flag`](Self::flag) and
/// [`replay`](Self::replay); the render loop reads the queries and calls
/// [`tick`](Self::tick) once per frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    grid: Grid,
    state: GameState,
    surprise_frames: u8,
    seed: u64,
    round: u64,
    move_count: u32,
}

impl GameSession {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        Ok(Self {
            grid: Grid::new(config)?,
            state: GameState::Play,
            surprise_frames: 0,
            seed,
            round: 0,
            move_count: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_final()
    }

    pub fn face(&self) -> Face {
        match self.state {
            GameState::Win => Face::Cool,
            GameState::Lose => Face::Dead,
            GameState::Play if self.surprise_frames > 0 => Face::Surprise,
            GameState::Play => Face::Neutral,
        }
    }

    /// Number of reveals and flag toggles that changed the board this round.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// How many replays happened since the session started.
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Seed the random layout of the current round is drawn from.
    pub fn round_seed(&self) -> u64 {
        self.seed.wrapping_add(self.round)
    }

    /// How many mines have not been flagged yet, negative with too many flags.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.grid.mine_count()) - i32::from(self.grid.flagged_count())
    }

    /// Color for the renderer. After a loss a revealed mine shows as a mine even
    /// when it carries a flag.
    pub fn cell_color(&self, coords: Coord2) -> Result<CellColor> {
        let cell = self.grid.cell(coords)?;
        Ok(match self.state {
            GameState::Lose if cell.is_mine() && cell.is_revealed() => CellColor::RevealedMine,
            _ => cell.color(),
        })
    }

    /// Reveal with a random layout seeded from [`round_seed`](Self::round_seed) if the
    /// board is not generated yet.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let generator = RandomMinefieldGenerator::new(self.round_seed());
        self.reveal_with(coords, generator)
    }

    /// Reveal `coords`, generating the board with `generator` first when this is the
    /// first reveal of the round. The clicked cell is always the safe cell.
    pub fn reveal_with(
        &mut self,
        coords: Coord2,
        generator: impl MinefieldGenerator,
    ) -> Result<RevealOutcome> {
        let cell = self.grid.cell(coords)?;

        if self.state.is_final() || cell.is_flagged() || cell.is_revealed() {
            return Ok(RevealOutcome::NoChange);
        }

        if !self.grid.is_generated() {
            self.grid.generate(coords, generator)?;
        }

        self.surprise_frames = SURPRISE_FRAMES;
        let outcome = self.grid.reveal(coords)?;
        if outcome.has_update() {
            self.move_count += 1;
        }

        match outcome {
            RevealOutcome::HitMine => self.end_game(false),
            RevealOutcome::BoardCleared => self.end_game(true),
            RevealOutcome::Continue | RevealOutcome::NoChange => {}
        }

        Ok(outcome)
    }

    pub fn flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.grid.validate_coords(coords)?;

        if self.state.is_final() {
            return Ok(MarkOutcome::NoChange);
        }

        let outcome = self.grid.flag(coords)?;
        if outcome.has_update() {
            self.move_count += 1;
        }
        Ok(outcome)
    }

    /// Back to a fresh, ungenerated board; the next round draws from a new seed.
    pub fn replay(&mut self) {
        self.grid.reset();
        self.state = GameState::Play;
        self.surprise_frames = 0;
        self.move_count = 0;
        self.round = self.round.wrapping_add(1);
        log::debug!("Replay, round {}", self.round);
    }

    /// Advances the face animation by one frame.
    pub fn tick(&mut self) {
        self.surprise_frames = self.surprise_frames.saturating_sub(1);
    }

    fn end_game(&mut self, won: bool) {
        self.surprise_frames = 0;
        if won {
            self.state = GameState::Win;
            self.grid.flag_all_mines();
        } else {
            self.state = GameState::Lose;
        }
        log::debug!(
            "Game over after {} moves: {:?}",
            self.move_count,
            self.state
        );
    }
}
