use thiserror::Error;

/// Every failure a command can hit. All of them are recovered by the loop that
/// issued the command: the message is printed and the prompt comes back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("File already exists: {0}")]
    AlreadyExists(String),
    #[error("Invalid {0}")]
    InvalidIndex(&'static str),
    #[error("No active tab")]
    NoActiveTab,
    #[error("No history")]
    InsufficientHistory,
    #[error("Invalid choice or no environments installed.")]
    InvalidChoice,
    #[error("Unknown command: {0}\nType 'help' for list of commands.")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

pub type ShellResult<T> = Result<T, ShellError>;
