use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// Transport or connection failure. Fatal to the current call.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The store answered but rejected the command.
    #[error("Store command failed: {0}")]
    Store(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid sort key: {0:?}")]
    InvalidDescriptor(String),

    #[error("Invalid sort direction: {0:?}")]
    InvalidDirection(String),

    #[error("Identifier must not be empty")]
    InvalidIdentifier,

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

pub type Result<T> = std::result::Result<T, RosterError>;
