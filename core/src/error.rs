use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates out of bounds")]
    OutOfBounds,
    #[error("Board size must be at least 1")]
    InvalidSize,
    #[error("Too many mines, the first revealed cell must stay safe")]
    TooManyMines,
    #[error("Mine layout does not match the board configuration")]
    LayoutMismatch,
}

pub type Result<T> = core::result::Result<T, GameError>;
