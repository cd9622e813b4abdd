//! Action availability for one table.
//!
//! A [`ButtonBar`] owns the enabled/disabled flag of every action shown under
//! a table and the confirm/discard protocol used while a row is being added
//! or edited:
//!
//! - `Idle`: default availability, driven by the row count.
//! - `Armed`: a draft exists; `ok`/`cancel` are live and route to the
//!   [`Handlers`] bound by [`ButtonBar::set`].
//! - `Awaiting`: a change was sent; every mutating action stays disabled
//!   until the owner calls [`ButtonBar::reset`] from the response.

use indexmap::IndexMap;

use crate::error::EngineError;
use crate::row::RowKey;

/// One button in the bar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Add,
    Edit,
    Remove,
    Refresh,
    Ok,
    Cancel,
    /// Panel-specific action registered through [`ButtonBar::subscribe`].
    Custom(String),
}

impl Action {
    pub fn label(&self) -> &str {
        match self {
            Action::Add => "add",
            Action::Edit => "edit",
            Action::Remove => "remove",
            Action::Refresh => "refresh",
            Action::Ok => "ok",
            Action::Cancel => "cancel",
            Action::Custom(name) => name,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Action::Custom(_))
    }
}

/// How a confirmed draft is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Create,
    Update,
}

/// How an abandoned draft is undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discard {
    /// Drop the unsaved row.
    RemoveDraft,
    /// Put the row back the way it was before editing started.
    RestoreSnapshot,
}

/// The continuation pair bound to `ok` and `cancel` while armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handlers {
    pub ok: Commit,
    pub cancel: Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarMode {
    #[default]
    Idle,
    Armed {
        target: RowKey,
        handlers: Handlers,
    },
    Awaiting,
}

/// What a click asks the owning table to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Add,
    Edit,
    Remove,
    Refresh,
    /// Send the draft on `target`. The handlers come back so the owner can
    /// re-arm the bar when the draft cannot be sent.
    Commit { target: RowKey, handlers: Handlers },
    Discard { target: RowKey, discard: Discard },
    Custom(String),
}

#[derive(Debug, Clone)]
pub struct ButtonBar {
    actions: IndexMap<Action, bool>,
    mode: BarMode,
    rows: usize,
}

impl Default for ButtonBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonBar {
    /// A bar carrying the six built-in actions.
    pub fn new() -> Self {
        let mut actions = IndexMap::new();
        for action in [Action::Remove, Action::Ok, Action::Cancel, Action::Add, Action::Edit, Action::Refresh] {
            actions.insert(action, false);
        }
        let mut bar = Self {
            actions,
            mode: BarMode::Idle,
            rows: 0,
        };
        bar.apply_mode();
        bar
    }

    /// Drops built-in actions a table does not offer.
    pub fn without(mut self, removed: &[Action]) -> Self {
        self.actions.retain(|action, _| !removed.contains(action));
        self
    }

    /// Registers a custom action. It starts out active.
    pub fn subscribe(&mut self, name: impl Into<String>) {
        self.actions.entry(Action::Custom(name.into())).or_insert(true);
    }

    /// Marks a custom action active or inactive. Built-in actions are driven
    /// by the bar's own state and cannot be toggled from outside.
    pub fn set_active(&mut self, action: &Action, active: bool) -> bool {
        if !action.is_custom() {
            return false;
        }
        match self.actions.get_mut(action) {
            Some(flag) => {
                *flag = active;
                true
            }
            None => false,
        }
    }

    pub fn has(&self, action: &Action) -> bool {
        self.actions.contains_key(action)
    }

    pub fn is_enabled(&self, action: &Action) -> bool {
        self.actions.get(action).copied().unwrap_or(false)
    }

    /// Actions in display order with their enabled flag.
    pub fn actions(&self) -> impl Iterator<Item = (&Action, bool)> {
        self.actions.iter().map(|(action, enabled)| (action, *enabled))
    }

    pub fn mode(&self) -> BarMode {
        self.mode
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.mode, BarMode::Armed { .. })
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.mode, BarMode::Awaiting)
    }

    /// Binds `ok`/`cancel` to a draft on `target`.
    pub fn set(&mut self, target: RowKey, handlers: Handlers) -> Result<(), EngineError> {
        if self.mode != BarMode::Idle {
            return Err(EngineError::AlreadyArmed);
        }
        self.mode = BarMode::Armed { target, handlers };
        self.apply_mode();
        Ok(())
    }

    /// Detaches any handlers and restores default availability.
    pub fn reset(&mut self) {
        self.mode = BarMode::Idle;
        self.apply_mode();
    }

    /// Locks mutating actions while a request is in flight.
    pub fn begin_request(&mut self) {
        self.mode = BarMode::Awaiting;
        self.apply_mode();
    }

    /// Tracks the table's row count; `edit` and `remove` need a row.
    pub fn sync_rows(&mut self, rows: usize) {
        self.rows = rows;
        self.apply_mode();
    }

    /// Resolves a click into the work the table has to do. Clicking an
    /// inactive or missing action is refused.
    pub fn click(&mut self, action: &Action) -> Result<Dispatch, EngineError> {
        if !self.is_enabled(action) {
            return Err(EngineError::ActionDisabled(action.label().to_string()));
        }
        match action {
            Action::Add => Ok(Dispatch::Add),
            Action::Edit => Ok(Dispatch::Edit),
            Action::Remove => Ok(Dispatch::Remove),
            Action::Refresh => Ok(Dispatch::Refresh),
            Action::Custom(name) => Ok(Dispatch::Custom(name.clone())),
            Action::Ok => {
                let BarMode::Armed { target, handlers } = self.mode else {
                    return Err(EngineError::NotArmed);
                };
                // Handlers detach now; the response resets the bar.
                self.mode = BarMode::Awaiting;
                self.apply_mode();
                Ok(Dispatch::Commit { target, handlers })
            }
            Action::Cancel => {
                let BarMode::Armed { target, handlers } = self.mode else {
                    return Err(EngineError::NotArmed);
                };
                self.reset();
                Ok(Dispatch::Discard {
                    target,
                    discard: handlers.cancel,
                })
            }
        }
    }

    fn apply_mode(&mut self) {
        let has_rows = self.rows > 0;
        let (add, edit, remove, confirm) = match self.mode {
            BarMode::Idle => (true, has_rows, has_rows, false),
            BarMode::Armed { .. } => (false, false, false, true),
            BarMode::Awaiting => (false, false, false, false),
        };
        self.set_flag(&Action::Add, add);
        self.set_flag(&Action::Edit, edit);
        self.set_flag(&Action::Remove, remove);
        self.set_flag(&Action::Refresh, true);
        self.set_flag(&Action::Ok, confirm);
        self.set_flag(&Action::Cancel, confirm);
    }

    fn set_flag(&mut self, action: &Action, enabled: bool) {
        if let Some(flag) = self.actions.get_mut(action) {
            *flag = enabled;
        }
    }
}
