//! The selection-aware row collection behind one editable table.
//!
//! A [`RowSet`] never performs I/O. Operations that need the backend return a
//! [`RemoteCall`]; the caller executes it and hands the [`CallOutcome`] back
//! through [`RowSet::complete`]. Every call is registered with the table's
//! current epoch and scope (the parent id of a dependent table), and answers
//! that no longer match are dropped, so a late response can never land on a
//! table the operator has moved away from.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use cffc_types::{CallOutcome, RemoteCall, ResourceRequest, Ticket};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::button_bar::{Action, ButtonBar, Commit, Discard, Dispatch, Handlers};
use crate::error::EngineError;
use crate::lookup::LookupCache;
use crate::pending::PendingEdit;
use crate::row::{Row, RowKey};
use crate::schema::{Answer, ColumnLayout, Endpoints, PayloadMapper, RowFactory, extract_rows, scalar_text};

/// Table operations that talk to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Refresh,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn verb(&self) -> &'static str {
        match self {
            Operation::Refresh => "load",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// Notifications for whoever owns the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    /// The selected row changed. `None` means nothing is selected or the
    /// selection is an unsaved draft.
    SelectionChanged(Option<String>),
    /// A refresh replaced the rows.
    Reloaded { selection: Option<String>, changed: bool },
    Committed { id: String, created: bool },
    Removed { id: String },
    Failed { operation: Operation, message: String },
}

/// What pressing a button produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Reaction {
    Events(Vec<TableEvent>),
    Call(RemoteCall),
    Custom(String),
}

/// A keystroke aimed at the row being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellInput {
    Char(char),
    Backspace,
    NextCell,
    PrevCell,
    NextOption,
    PrevOption,
}

#[derive(Debug, Clone)]
struct InFlight {
    operation: Operation,
    epoch: u64,
    scope: Option<String>,
    target: Option<RowKey>,
}

pub struct RowSet {
    name: &'static str,
    rows: Vec<Row>,
    next_key: u64,
    factory: Arc<dyn RowFactory>,
    mapper: Arc<dyn PayloadMapper>,
    endpoints: Endpoints,
    bar: ButtonBar,
    pending: Option<PendingEdit>,
    in_flight: HashMap<Ticket, InFlight>,
    epoch: u64,
    scope: Option<String>,
}

impl std::fmt::Debug for RowSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowSet")
            .field("name", &self.name)
            .field("rows", &self.rows.len())
            .field("scope", &self.scope)
            .field("epoch", &self.epoch)
            .field("pending", &self.pending.as_ref().map(PendingEdit::key))
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}

impl RowSet {
    /// A table whose rows and payloads both come from `layout`.
    pub fn new(name: &'static str, layout: ColumnLayout, endpoints: Endpoints) -> Self {
        let layout = Arc::new(layout);
        Self::with_parts(name, layout.clone(), layout, endpoints)
    }

    pub fn with_parts(name: &'static str, factory: Arc<dyn RowFactory>, mapper: Arc<dyn PayloadMapper>, endpoints: Endpoints) -> Self {
        let mut bar = ButtonBar::new();
        if endpoints.create.is_none() {
            bar = bar.without(&[Action::Add]);
        }
        if endpoints.update.is_none() {
            bar = bar.without(&[Action::Edit]);
        }
        if endpoints.delete.is_none() {
            bar = bar.without(&[Action::Remove]);
        }
        if endpoints.create.is_none() && endpoints.update.is_none() {
            bar = bar.without(&[Action::Ok, Action::Cancel]);
        }
        Self {
            name,
            rows: Vec::new(),
            next_key: 1,
            factory,
            mapper,
            endpoints,
            bar,
            pending: None,
            in_flight: HashMap::new(),
            epoch: 0,
            scope: None,
        }
    }

    /// Replaces the default button bar, e.g. to drop actions or subscribe
    /// custom ones.
    pub fn with_bar(mut self, bar: ButtonBar) -> Self {
        self.bar = bar;
        self.bar.sync_rows(self.rows.len());
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.factory.headers()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, key: RowKey) -> Option<&Row> {
        self.rows.iter().find(|row| row.key() == key)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.rows.iter().position(|row| row.selected)
    }

    pub fn selected(&self) -> Option<&Row> {
        self.rows.iter().find(|row| row.selected)
    }

    /// Id of the selected row, when it has been saved.
    pub fn selected_id(&self) -> Option<String> {
        self.selected().filter(|row| row.is_saved()).map(|row| row.id.clone())
    }

    pub fn bar(&self) -> &ButtonBar {
        &self.bar
    }

    pub fn bar_mut(&mut self) -> &mut ButtonBar {
        &mut self.bar
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn pending(&self) -> Option<&PendingEdit> {
        self.pending.as_ref()
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    fn current(&self) -> impl Iterator<Item = &InFlight> {
        self.in_flight.values().filter(|flight| flight.epoch == self.epoch)
    }

    /// Whether a create, update or delete is waiting for its answer.
    pub fn is_busy(&self) -> bool {
        self.current().any(|flight| flight.operation != Operation::Refresh)
    }

    pub fn is_loading(&self) -> bool {
        self.current().any(|flight| flight.operation == Operation::Refresh)
    }

    /// Whether `ticket` belongs to this table.
    pub fn owns(&self, ticket: Ticket) -> bool {
        self.in_flight.contains_key(&ticket)
    }

    fn index_of(&self, key: RowKey) -> Option<usize> {
        self.rows.iter().position(|row| row.key() == key)
    }

    fn alloc_key(&mut self) -> RowKey {
        let key = RowKey(self.next_key);
        self.next_key += 1;
        key
    }

    fn sync_bar(&mut self) {
        self.bar.sync_rows(self.rows.len());
    }

    /// Drafts and deletes wait for any load: the answer replaces every row.
    fn ensure_idle(&self) -> Result<(), EngineError> {
        if self.is_busy() || self.is_loading() || self.pending.is_some() {
            return Err(EngineError::Busy);
        }
        Ok(())
    }

    fn register(&mut self, request: ResourceRequest, operation: Operation, target: Option<RowKey>) -> RemoteCall {
        let call = RemoteCall::new(request);
        debug!(
            table = self.name,
            ticket = %call.ticket,
            operation = operation.verb(),
            request = %call.request,
            "table request issued"
        );
        self.in_flight.insert(
            call.ticket,
            InFlight {
                operation,
                epoch: self.epoch,
                scope: self.scope.clone(),
                target,
            },
        );
        call
    }

    /// Invalidates every outstanding request. Their answers are still
    /// recognised when they arrive, and dropped.
    fn abandon_requests(&mut self) {
        if self.is_busy() {
            info!(table = self.name, "abandoning change still in flight");
        }
        self.epoch += 1;
        if self.bar.is_awaiting() {
            self.bar.reset();
        }
    }

    /// Fetches the full list. Any draft is discarded and any change still in
    /// flight is abandoned; the reload shows the backend's state.
    pub fn refresh(&mut self) -> Result<RemoteCall, EngineError> {
        let path = self
            .endpoints
            .list
            .render(self.scope.as_deref(), None)
            .ok_or_else(|| EngineError::ScopeMissing(self.name.to_string()))?;
        self.discard_draft();
        self.abandon_requests();
        Ok(self.register(ResourceRequest::get(path), Operation::Refresh, None))
    }

    /// Points a dependent table at another parent record and reloads it.
    /// With no parent the table is emptied.
    pub fn rescope(&mut self, parent: Option<String>) -> Result<Option<RemoteCall>, EngineError> {
        self.discard_draft();
        self.abandon_requests();
        self.scope = parent;
        if self.scope.is_none() && self.endpoints.list.needs_parent() {
            self.rows.clear();
            self.sync_bar();
            return Ok(None);
        }
        self.refresh().map(Some)
    }

    /// Drops drafts and outstanding requests when the table's section is
    /// left. Rows stay as they are.
    pub fn deactivate(&mut self) {
        self.discard_draft();
        self.abandon_requests();
    }

    /// Replaces all rows with `records`, keeping the selected id when it is
    /// still present and falling back to the first row otherwise.
    pub fn load(&mut self, records: &[Value]) -> Vec<TableEvent> {
        let previous = self.selected_id();
        let selection = self.rebuild(records, previous.as_deref());
        vec![TableEvent::Reloaded {
            changed: selection != previous,
            selection,
        }]
    }

    fn rebuild(&mut self, records: &[Value], prefer: Option<&str>) -> Option<String> {
        if self.pending.take().is_some() && self.bar.is_armed() {
            debug!(table = self.name, "draft replaced by reloaded rows");
            self.bar.reset();
        }
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let key = self.alloc_key();
            rows.push(Row::new(key, self.factory.build(Some(record))));
        }
        let index = prefer
            .and_then(|id| rows.iter().position(|row: &Row| row.id == id))
            .or(if rows.is_empty() { None } else { Some(0) });
        if let Some(index) = index {
            rows[index].selected = true;
        }
        self.rows = rows;
        self.sync_bar();
        self.selected_id()
    }

    /// Selects the row with `key`. Selecting the selected row changes
    /// nothing. An unconfirmed draft is discarded first.
    pub fn select(&mut self, key: RowKey) -> Result<Vec<TableEvent>, EngineError> {
        let index = self.index_of(key).ok_or(EngineError::NothingSelected)?;
        if self.rows[index].selected {
            return Ok(Vec::new());
        }
        if self.is_busy() {
            return Err(EngineError::Busy);
        }
        if self.pending.is_some() {
            debug!(table = self.name, "selection moved away from a draft");
            self.discard_draft();
        }
        let index = self.index_of(key).ok_or(EngineError::NothingSelected)?;
        for row in &mut self.rows {
            row.selected = false;
        }
        self.rows[index].selected = true;
        Ok(vec![TableEvent::SelectionChanged(self.selected_id())])
    }

    pub fn select_index(&mut self, index: usize) -> Result<Vec<TableEvent>, EngineError> {
        let key = self.rows.get(index).map(Row::key).ok_or(EngineError::NothingSelected)?;
        self.select(key)
    }

    pub fn select_id(&mut self, id: &str) -> Result<Vec<TableEvent>, EngineError> {
        let key = self
            .rows
            .iter()
            .find(|row| row.id == id)
            .map(Row::key)
            .ok_or(EngineError::NothingSelected)?;
        self.select(key)
    }

    /// Moves the selection up or down, stopping at either end.
    pub fn move_selection(&mut self, delta: isize) -> Result<Vec<TableEvent>, EngineError> {
        if self.rows.is_empty() {
            return Ok(Vec::new());
        }
        let target = match self.selected_index() {
            Some(index) => index.saturating_add_signed(delta).min(self.rows.len() - 1),
            None => 0,
        };
        self.select_index(target)
    }

    /// Starts a new unsaved row just before the selection (or at the end)
    /// and arms the button bar for it.
    pub fn add(&mut self, lookups: &LookupCache) -> Result<Vec<TableEvent>, EngineError> {
        self.ensure_idle()?;
        if self.endpoints.create.is_none() {
            return Err(EngineError::ActionDisabled(Action::Add.label().to_string()));
        }
        if self.endpoints.list.needs_parent() && self.scope.is_none() {
            return Err(EngineError::ScopeMissing(self.name.to_string()));
        }

        let key = self.alloc_key();
        self.bar.set(
            key,
            Handlers {
                ok: Commit::Create,
                cancel: Discard::RemoveDraft,
            },
        )?;

        let mut row = Row::new(key, self.factory.build(None));
        self.factory.begin_edit(&mut row, lookups);
        row.selected = true;
        row.editing = true;
        row.adding = true;

        let at = self.selected_index();
        for existing in &mut self.rows {
            existing.selected = false;
        }
        match at {
            Some(index) => self.rows.insert(index, row),
            None => self.rows.push(row),
        }
        self.pending = Some(PendingEdit::Adding { key });
        self.sync_bar();
        debug!(table = self.name, "add started");
        Ok(vec![TableEvent::SelectionChanged(None)])
    }

    /// Puts the selected row into edit mode and arms the button bar for it.
    pub fn edit(&mut self, lookups: &LookupCache) -> Result<(), EngineError> {
        self.ensure_idle()?;
        if self.endpoints.update.is_none() {
            return Err(EngineError::ActionDisabled(Action::Edit.label().to_string()));
        }
        let index = self.selected_index().ok_or(EngineError::NothingSelected)?;
        let key = self.rows[index].key();
        self.bar.set(
            key,
            Handlers {
                ok: Commit::Update,
                cancel: Discard::RestoreSnapshot,
            },
        )?;

        let snapshot = Box::new(self.rows[index].clone());
        let row = &mut self.rows[index];
        self.factory.begin_edit(row, lookups);
        row.editing = true;
        self.pending = Some(PendingEdit::Editing { key, snapshot });
        debug!(table = self.name, id = %self.rows[index].id, "edit started");
        Ok(())
    }

    /// Sends the draft. The row keeps its live values until the answer
    /// arrives; until then the table is busy.
    pub fn ok(&mut self) -> Result<RemoteCall, EngineError> {
        if self.is_busy() {
            return Err(EngineError::Busy);
        }
        match self.bar.click(&Action::Ok)? {
            Dispatch::Commit { target, handlers } => self.send_commit(target, handlers),
            _ => Err(EngineError::NotArmed),
        }
    }

    fn send_commit(&mut self, target: RowKey, handlers: Handlers) -> Result<RemoteCall, EngineError> {
        match self.commit_request(target, handlers.ok) {
            Ok((request, operation)) => Ok(self.register(request, operation, Some(target))),
            Err(error) => {
                // Nothing was sent; the draft stays open for correction.
                self.bar.reset();
                self.bar.set(target, handlers)?;
                Err(error)
            }
        }
    }

    fn commit_request(&self, target: RowKey, commit: Commit) -> Result<(ResourceRequest, Operation), EngineError> {
        let index = self.index_of(target).ok_or(EngineError::NotArmed)?;
        let row = &self.rows[index];
        let body = self.mapper.payload(row, commit)?;

        let scope = self.scope.as_deref();
        let (template, id) = match commit {
            Commit::Create => (self.endpoints.create.as_ref(), None),
            Commit::Update => (self.endpoints.update.as_ref(), Some(row.id.as_str())),
        };
        let template = template.ok_or_else(|| EngineError::ActionDisabled(Action::Ok.label().to_string()))?;
        let path = template
            .render(scope, id)
            .ok_or_else(|| EngineError::ScopeMissing(self.name.to_string()))?;
        Ok(match commit {
            Commit::Create => (ResourceRequest::post(path, body), Operation::Create),
            Commit::Update => (ResourceRequest::patch(path, body), Operation::Update),
        })
    }

    /// Abandons the draft without a request.
    pub fn cancel(&mut self) -> Result<Vec<TableEvent>, EngineError> {
        if self.is_busy() {
            return Err(EngineError::Busy);
        }
        match self.bar.click(&Action::Cancel)? {
            Dispatch::Discard { target, discard } => Ok(self.undo_draft(target, discard)),
            _ => Err(EngineError::NotArmed),
        }
    }

    fn discard_draft(&mut self) -> Vec<TableEvent> {
        let Some(pending) = self.pending.as_ref() else {
            return Vec::new();
        };
        let key = pending.key();
        let discard = if pending.is_adding() {
            Discard::RemoveDraft
        } else {
            Discard::RestoreSnapshot
        };
        if self.bar.is_armed() {
            self.bar.reset();
        }
        self.undo_draft(key, discard)
    }

    fn undo_draft(&mut self, key: RowKey, discard: Discard) -> Vec<TableEvent> {
        let pending = self.pending.take();
        match discard {
            Discard::RemoveDraft => self.remove_row(key),
            Discard::RestoreSnapshot => {
                if let Some(PendingEdit::Editing { snapshot, .. }) = pending
                    && let Some(index) = self.index_of(key)
                {
                    self.rows[index] = *snapshot;
                    self.rows[index].clear_live();
                }
                Vec::new()
            }
        }
    }

    /// Sends a delete for the selected row.
    pub fn delete(&mut self) -> Result<RemoteCall, EngineError> {
        self.ensure_idle()?;
        let template = self
            .endpoints
            .delete
            .as_ref()
            .ok_or_else(|| EngineError::ActionDisabled(Action::Remove.label().to_string()))?;
        let row = self.selected().filter(|row| row.is_saved()).ok_or(EngineError::NothingSelected)?;
        let key = row.key();
        let path = template
            .render(self.scope.as_deref(), Some(&row.id))
            .ok_or_else(|| EngineError::ScopeMissing(self.name.to_string()))?;
        self.bar.begin_request();
        Ok(self.register(ResourceRequest::delete(path), Operation::Delete, Some(key)))
    }

    /// Removes the selected row, moving the selection to the next row, or
    /// the previous one when it was last.
    pub fn remove_selected(&mut self) -> Vec<TableEvent> {
        match self.selected() {
            Some(row) => self.remove_row(row.key()),
            None => Vec::new(),
        }
    }

    fn remove_row(&mut self, key: RowKey) -> Vec<TableEvent> {
        let Some(index) = self.index_of(key) else {
            return Vec::new();
        };
        let removed = self.rows.remove(index);
        if removed.selected {
            let next = if index < self.rows.len() { Some(index) } else { index.checked_sub(1) };
            if let Some(next) = next {
                self.rows[next].selected = true;
            }
        }
        self.sync_bar();
        if removed.selected {
            vec![TableEvent::SelectionChanged(self.selected_id())]
        } else {
            Vec::new()
        }
    }

    /// Routes a keystroke to the row being edited.
    pub fn input(&mut self, input: CellInput) -> bool {
        if self.is_busy() {
            return false;
        }
        let Some(key) = self.pending.as_ref().map(PendingEdit::key) else {
            return false;
        };
        let Some(index) = self.index_of(key) else {
            return false;
        };
        let row = &mut self.rows[index];
        match input {
            CellInput::Char(ch) => row.input_char(ch),
            CellInput::Backspace => row.backspace(),
            CellInput::NextCell => {
                row.focus_step(true);
                true
            }
            CellInput::PrevCell => {
                row.focus_step(false);
                true
            }
            CellInput::NextOption => row.cycle_choice(true),
            CellInput::PrevOption => row.cycle_choice(false),
        }
    }

    /// The row being added or edited.
    pub fn draft_mut(&mut self) -> Option<&mut Row> {
        let key = self.pending.as_ref().map(PendingEdit::key)?;
        let index = self.index_of(key)?;
        self.rows.get_mut(index)
    }

    /// Runs the action behind a button, refusing inactive ones.
    pub fn press(&mut self, action: &Action, lookups: &LookupCache) -> Result<Reaction, EngineError> {
        if self.is_busy() && matches!(action, Action::Add | Action::Edit | Action::Remove | Action::Ok | Action::Cancel) {
            return Err(EngineError::Busy);
        }
        match self.bar.click(action)? {
            Dispatch::Add => self.add(lookups).map(Reaction::Events),
            Dispatch::Edit => self.edit(lookups).map(|()| Reaction::Events(Vec::new())),
            Dispatch::Remove => self.delete().map(Reaction::Call),
            Dispatch::Refresh => self.refresh().map(Reaction::Call),
            Dispatch::Commit { target, handlers } => self.send_commit(target, handlers).map(Reaction::Call),
            Dispatch::Discard { target, discard } => Ok(Reaction::Events(self.undo_draft(target, discard))),
            Dispatch::Custom(name) => Ok(Reaction::Custom(name)),
        }
    }

    /// Applies an answer. Returns `None` when the ticket is not this table's;
    /// stale answers are consumed and produce no events.
    pub fn complete(&mut self, outcome: CallOutcome) -> Option<Vec<TableEvent>> {
        let flight = self.in_flight.remove(&outcome.ticket)?;
        if flight.epoch != self.epoch || flight.scope != self.scope {
            debug!(
                table = self.name,
                ticket = %outcome.ticket,
                operation = flight.operation.verb(),
                "discarding stale response"
            );
            return Some(Vec::new());
        }
        let events = match flight.operation {
            Operation::Refresh => self.apply_refresh(outcome.result),
            Operation::Create | Operation::Update => self.apply_commit(&flight, outcome.result),
            Operation::Delete => self.apply_delete(&flight, outcome.result),
        };
        Some(events)
    }

    fn apply_refresh(&mut self, result: Result<Value, String>) -> Vec<TableEvent> {
        let payload = match result {
            Ok(payload) => payload,
            Err(message) => {
                warn!(table = self.name, error = %message, "refresh failed");
                return vec![self.failure(Operation::Refresh, message)];
            }
        };
        match extract_rows(&payload, self.endpoints.list_field) {
            Some(records) => {
                debug!(table = self.name, rows = records.len(), "refresh applied");
                self.load(&records)
            }
            None => {
                warn!(table = self.name, "list response carried no rows");
                vec![self.failure(Operation::Refresh, "unexpected list response".to_string())]
            }
        }
    }

    fn apply_commit(&mut self, flight: &InFlight, result: Result<Value, String>) -> Vec<TableEvent> {
        let created = flight.operation == Operation::Create;
        let Some(index) = flight.target.and_then(|key| self.index_of(key)) else {
            debug!(table = self.name, operation = flight.operation.verb(), "committed row is gone");
            self.pending = None;
            self.bar.reset();
            self.sync_bar();
            return Vec::new();
        };

        let answer = match result {
            Ok(answer) => answer,
            Err(message) => {
                warn!(table = self.name, operation = flight.operation.verb(), error = %message, "change rejected");
                let mut events = self.discard_draft();
                self.bar.reset();
                self.sync_bar();
                events.push(self.failure(flight.operation, message));
                return events;
            }
        };

        // Some nested endpoints echo the child instead of the parent; those
        // answers carry no list and are applied like a record.
        let children = match (self.endpoints.answer, self.endpoints.list_field) {
            (Answer::Parent, Some(field)) => answer.get(field).and_then(Value::as_array).cloned(),
            (Answer::Parent, None) => extract_rows(&answer, None),
            (Answer::Record, _) => None,
        };
        let id = match children {
            Some(records) => {
                let wanted = if created {
                    let known: HashSet<&str> = self.rows.iter().map(|row| row.id.as_str()).collect();
                    records
                        .iter()
                        .filter_map(|record| record.get("id").map(scalar_text))
                        .find(|id| !known.contains(id.as_str()))
                } else {
                    Some(self.rows[index].id.clone())
                };
                self.rebuild(&records, wanted.as_deref()).unwrap_or_default()
            }
            None => {
                let row = &mut self.rows[index];
                let echoed = answer.get("id").map(scalar_text).is_some_and(|id| !id.is_empty());
                if echoed {
                    row.replace_content(self.factory.build(Some(&answer)));
                } else {
                    self.factory.promote(row);
                }
                row.clear_live();
                row.id.clone()
            }
        };

        self.pending = None;
        self.bar.reset();
        self.sync_bar();
        info!(table = self.name, id = %id, operation = flight.operation.verb(), "change committed");

        let mut events = vec![TableEvent::Committed { id, created }];
        if created {
            events.push(TableEvent::SelectionChanged(self.selected_id()));
        }
        events
    }

    fn apply_delete(&mut self, flight: &InFlight, result: Result<Value, String>) -> Vec<TableEvent> {
        self.bar.reset();
        let Some(key) = flight.target else {
            self.sync_bar();
            return Vec::new();
        };
        match result {
            Ok(_) => {
                let Some(id) = self.row(key).map(|row| row.id.clone()) else {
                    self.sync_bar();
                    return Vec::new();
                };
                info!(table = self.name, id = %id, "row deleted");
                let mut events = vec![TableEvent::Removed { id }];
                events.extend(self.remove_row(key));
                events
            }
            Err(message) => {
                warn!(table = self.name, error = %message, "delete rejected");
                self.sync_bar();
                vec![self.failure(Operation::Delete, message)]
            }
        }
    }

    fn failure(&self, operation: Operation, message: String) -> TableEvent {
        TableEvent::Failed {
            operation,
            message: format!("failed to {} {}: {}", operation.verb(), self.name, message),
        }
    }
}
