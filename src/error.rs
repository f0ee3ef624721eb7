#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid door {0}, it has to be one of {doors:?}", doors = crate::DOORS)]
    InvalidDoor(u32),
    #[error("Invalid door input {0:?}, expected a door number")]
    InvalidDoorInput(String),
    #[error("Invalid decision input {0:?}, it has to be \"y\" or \"n\"")]
    InvalidDecisionInput(String),
    #[error("Invalid mode {0:?}, expected 1 (interactive) or 2 (experiment)")]
    InvalidMode(String),
    #[error("Invalid operation: `{operation}` called at stage {stage}")]
    Sequence {
        operation: &'static str,
        stage: &'static str,
    },
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error("Impossible")]
    Impossible,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
