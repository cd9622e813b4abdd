use thiserror::Error;

/// Reasons a table operation is refused. None of these change any state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("another change is still pending; confirm or cancel it first")]
    Busy,

    #[error("no row is selected")]
    NothingSelected,

    #[error("there is nothing to confirm or cancel")]
    NotArmed,

    #[error("the button bar is already bound to a pending change")]
    AlreadyArmed,

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("'{0}' is not available right now")]
    ActionDisabled(String),

    #[error("{0} needs a selected parent record")]
    ScopeMissing(String),
}
