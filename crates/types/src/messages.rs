use crate::{CallOutcome, RemoteCall, Route};

/// Messages delivered to the application by the runtime.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Periodic UI tick
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// A remote call finished, successfully or not
    CallCompleted(CallOutcome),
}

/// Side effects requested by components and panels.
///
/// Components never perform I/O directly; they describe what should happen
/// and the runtime carries it out.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Switch the workspace to another section
    SwitchTo(Route),
    /// Execute a request against the backend
    Remote(RemoteCall),
    /// Append a line to the status log
    Log(String),
    /// Leave the application
    Quit,
}
