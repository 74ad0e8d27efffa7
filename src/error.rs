use thiserror::Error;

#[derive(Error, Debug)]
pub enum TellerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0} is an invalid command!")]
    UnknownCommand(String),
}

pub type Result<T> = std::result::Result<T, TellerError>;
