use thiserror::Error;

#[derive(Error, Debug)]
pub enum FoamrunError {
    #[error(
        "Reservation too short: stop margin of {scaled:.0}s does not fit in the {total}s walltime"
    )]
    ReservationTooShort { total: u64, scaled: f64 },

    #[error("Invalid walltime '{0}', expected [D-]HH:MM:SS")]
    InvalidWalltime(String),

    #[error("Stop control failed: {0}")]
    StopControl(String),

    #[error("Solver launch failed: {0}")]
    Launch(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FoamrunError>;
