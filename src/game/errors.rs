use thiserror::Error;

/// Errors raised by the world loader and the game state store.
///
/// Player mistakes never surface as `GameError`; the command processor turns
/// them into failed `CommandResult`s. These are for missing data, bad files and
/// broken invariants.
#[derive(Debug, Error)]
pub enum GameError {
    /// Requested item id does not exist. The message carries the id verbatim.
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// Requested scene id does not exist.
    #[error("scene not found: {0}")]
    SceneNotFound(String),

    /// Wrapper around IO errors (missing data directory, unreadable file).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapper around JSON parse failures.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// World data is structurally wrong (duplicate ids, bad references).
    #[error("invalid world data: {0}")]
    InvalidData(String),

    /// Restore was requested but nothing has been saved.
    #[error("no saved game")]
    NoSavedGame,

    /// Internal error (unexpected conditions)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Category of a refused player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    NotCarrying,
    AlreadyCarrying,
    ClosedContainer,
    NotContainer,
    NotInContainer,
    AlreadyOpen,
    AlreadyClosed,
    Locked,
    NotOpenable,
    NotPortable,
    NoRoom,
    NotReadable,
    BlockedExit,
    NoExit,
    Unsupported,
}

/// A precondition failure with the message shown to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refusal {
    pub kind: FailureKind,
    pub message: String,
}

impl Refusal {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
