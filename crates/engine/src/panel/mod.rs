//! Section controllers.
//!
//! A [`Panel`] is one workspace section: a master table, the dependent tables
//! scoped to the master's selection, and the lookup lists its rows draw
//! options from. Panels are pure configuration of [`RowSet`]; the per-section
//! submodules only declare columns and endpoints.
//!
//! Activation fetches the panel's lookups first and refreshes the master
//! table once every one of them has answered, so rows are never put into
//! edit mode against option lists that are still loading.

mod generation;
mod ingredient;
mod lifecycle;
mod stage;
mod strain;
mod substrate;
mod vendor;

use std::collections::HashSet;

use cffc_types::{CallOutcome, RemoteCall, Route, Ticket};
use tracing::{debug, info};

use crate::button_bar::Action;
use crate::error::EngineError;
use crate::lookup::{LookupCache, LookupSource, LookupStatus};
use crate::rowset::{CellInput, Reaction, RowSet, TableEvent};

/// Custom action that flips the visible dependent table.
pub const SWITCH_DEPENDENT: &str = "sources";

/// A table whose rows belong to the master's selected record.
#[derive(Debug)]
pub struct Dependent {
    pub label: &'static str,
    pub table: RowSet,
}

impl Dependent {
    pub fn new(label: &'static str, table: RowSet) -> Self {
        Self { label, table }
    }
}

/// Which of a panel's tables receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFocus {
    #[default]
    Master,
    Dependent,
}

/// Requests to run and status lines to show after a panel call.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PanelUpdate {
    pub calls: Vec<RemoteCall>,
    pub messages: Vec<String>,
}

impl PanelUpdate {
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.messages.is_empty()
    }

    pub fn merge(&mut self, other: PanelUpdate) {
        self.calls.extend(other.calls);
        self.messages.extend(other.messages);
    }

    fn call(call: RemoteCall) -> Self {
        Self {
            calls: vec![call],
            messages: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct Panel {
    route: Route,
    master: RowSet,
    dependents: Vec<Dependent>,
    visible: usize,
    lookups: &'static [LookupSource],
    active: bool,
    awaiting: HashSet<Ticket>,
    focus: TableFocus,
}

impl Panel {
    pub fn new(route: Route, master: RowSet, lookups: &'static [LookupSource]) -> Self {
        Self {
            route,
            master,
            dependents: Vec::new(),
            visible: 0,
            lookups,
            active: false,
            awaiting: HashSet::new(),
            focus: TableFocus::Master,
        }
    }

    pub fn with_dependent(mut self, dependent: Dependent) -> Self {
        self.dependents.push(dependent);
        self
    }

    /// The configured panel for `route`.
    pub fn for_route(route: Route) -> Self {
        match route {
            Route::Strain => strain::panel(),
            Route::Substrate => substrate::panel(),
            Route::Lifecycle => lifecycle::panel(),
            Route::Generation => generation::panel(),
            Route::Vendor => vendor::panel(),
            Route::Stage => stage::panel(),
            Route::Ingredient => ingredient::panel(),
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether lookup lists are still loading.
    pub fn is_preparing(&self) -> bool {
        !self.awaiting.is_empty()
    }

    pub fn master(&self) -> &RowSet {
        &self.master
    }

    pub fn master_mut(&mut self) -> &mut RowSet {
        &mut self.master
    }

    pub fn dependents(&self) -> &[Dependent] {
        &self.dependents
    }

    /// The dependent table currently shown, if the panel has any.
    pub fn dependent(&self) -> Option<&Dependent> {
        self.dependents.get(self.visible)
    }

    pub fn dependent_mut(&mut self) -> Option<&mut Dependent> {
        self.dependents.get_mut(self.visible)
    }

    pub fn focus(&self) -> TableFocus {
        self.focus
    }

    /// The table keys go to.
    pub fn focused(&self) -> &RowSet {
        match (self.focus, self.dependents.get(self.visible)) {
            (TableFocus::Dependent, Some(dependent)) => &dependent.table,
            _ => &self.master,
        }
    }

    fn focused_mut(&mut self) -> &mut RowSet {
        match (self.focus, self.dependents.get_mut(self.visible)) {
            (TableFocus::Dependent, Some(dependent)) => &mut dependent.table,
            _ => &mut self.master,
        }
    }

    /// Moves keyboard focus between the master and the visible dependent.
    /// Refused while the focused table holds a draft or a change in flight.
    pub fn toggle_focus(&mut self) -> Result<(), EngineError> {
        let table = self.focused();
        if table.pending().is_some() || table.is_busy() {
            return Err(EngineError::Busy);
        }
        self.focus = match self.focus {
            TableFocus::Master if !self.dependents.is_empty() => TableFocus::Dependent,
            _ => TableFocus::Master,
        };
        Ok(())
    }

    /// Starts the section: reloads every lookup list, then the master table.
    pub fn activate(&mut self, lookups: &mut LookupCache) -> PanelUpdate {
        info!(panel = %self.route, "activating");
        self.active = true;
        self.awaiting.clear();
        let mut update = PanelUpdate::default();
        for source in self.lookups {
            let call = lookups.fetch(*source);
            self.awaiting.insert(call.ticket);
            update.calls.push(call);
        }
        if self.awaiting.is_empty() {
            update.merge(self.refresh_master());
        }
        update
    }

    /// Leaves the section. Drafts are discarded and late answers ignored.
    pub fn deactivate(&mut self) {
        debug!(panel = %self.route, "deactivating");
        self.active = false;
        self.awaiting.clear();
        self.master.deactivate();
        for dependent in &mut self.dependents {
            dependent.table.deactivate();
        }
        self.focus = TableFocus::Master;
    }

    fn refresh_master(&mut self) -> PanelUpdate {
        match self.master.refresh() {
            Ok(call) => PanelUpdate::call(call),
            Err(error) => message(error.to_string()),
        }
    }

    /// Points every dependent at the master's selection.
    fn rescope_dependents(&mut self) -> PanelUpdate {
        let parent = self.master.selected_id();
        let mut update = PanelUpdate::default();
        for dependent in &mut self.dependents {
            match dependent.table.rescope(parent.clone()) {
                Ok(Some(call)) => update.calls.push(call),
                Ok(None) => {}
                Err(error) => update.messages.push(error.to_string()),
            }
        }
        update
    }

    fn master_events(&mut self, events: Vec<TableEvent>) -> PanelUpdate {
        let mut update = PanelUpdate::default();
        let mut rescope = false;
        for event in events {
            match event {
                TableEvent::SelectionChanged(_) | TableEvent::Reloaded { .. } => rescope = true,
                other => update.messages.extend(describe(self.master.name(), other)),
            }
        }
        if rescope && !self.dependents.is_empty() {
            update.merge(self.rescope_dependents());
        }
        update
    }

    fn focused_events(&mut self, events: Vec<TableEvent>) -> PanelUpdate {
        match self.focus {
            TableFocus::Master => self.master_events(events),
            TableFocus::Dependent => {
                let name = self.focused().name();
                PanelUpdate {
                    calls: Vec::new(),
                    messages: events.into_iter().filter_map(|event| describe(name, event)).collect(),
                }
            }
        }
    }

    /// Applies an answer. Returns `None` when no table of this panel (and no
    /// lookup it is waiting for) issued the ticket.
    pub fn complete(&mut self, outcome: CallOutcome, lookups: &mut LookupCache) -> Option<PanelUpdate> {
        if self.awaiting.remove(&outcome.ticket) {
            let mut update = PanelUpdate::default();
            if let Some(resolved) = lookups.complete(&outcome)
                && resolved.status == LookupStatus::Failed
            {
                update.messages.push(format!("could not load {}", resolved.name));
            }
            if self.awaiting.is_empty() && self.active {
                update.merge(self.refresh_master());
            }
            return Some(update);
        }

        if self.master.owns(outcome.ticket) {
            let events = self.master.complete(outcome)?;
            return Some(self.master_events(events));
        }

        for dependent in &mut self.dependents {
            if dependent.table.owns(outcome.ticket) {
                let name = dependent.table.name();
                let events = dependent.table.complete(outcome)?;
                return Some(PanelUpdate {
                    calls: Vec::new(),
                    messages: events.into_iter().filter_map(|event| describe(name, event)).collect(),
                });
            }
        }
        None
    }

    /// Presses a button of the focused table.
    pub fn press(&mut self, action: &Action, lookups: &LookupCache) -> Result<PanelUpdate, EngineError> {
        match self.focused_mut().press(action, lookups)? {
            Reaction::Events(events) => Ok(self.focused_events(events)),
            Reaction::Call(call) => Ok(PanelUpdate::call(call)),
            Reaction::Custom(name) => Ok(self.custom(&name)),
        }
    }

    fn custom(&mut self, name: &str) -> PanelUpdate {
        if name == SWITCH_DEPENDENT && self.dependents.len() > 1 {
            if let Some(current) = self.dependents.get_mut(self.visible) {
                current.table.deactivate();
            }
            self.visible = (self.visible + 1) % self.dependents.len();
            debug!(panel = %self.route, dependent = self.dependents[self.visible].label, "switched dependent table");
            // The hidden table may have missed selection changes.
            let parent = self.master.selected_id();
            return match self.dependents[self.visible].table.rescope(parent) {
                Ok(Some(call)) => PanelUpdate::call(call),
                Ok(None) => PanelUpdate::default(),
                Err(error) => message(error.to_string()),
            };
        }
        debug!(panel = %self.route, action = name, "custom action has no handler");
        PanelUpdate::default()
    }

    /// Moves the focused table's selection.
    pub fn move_selection(&mut self, delta: isize) -> Result<PanelUpdate, EngineError> {
        let events = self.focused_mut().move_selection(delta)?;
        Ok(self.focused_events(events))
    }

    /// Selects a row of the master table by id.
    pub fn select_master(&mut self, id: &str) -> Result<PanelUpdate, EngineError> {
        let events = self.master.select_id(id)?;
        Ok(self.master_events(events))
    }

    /// Sends a keystroke to the focused table's draft.
    pub fn input(&mut self, input: CellInput) -> bool {
        self.focused_mut().input(input)
    }
}

fn message(text: String) -> PanelUpdate {
    PanelUpdate {
        calls: Vec::new(),
        messages: vec![text],
    }
}

/// Status line for an event worth telling the operator about.
fn describe(table: &str, event: TableEvent) -> Option<String> {
    match event {
        TableEvent::Failed { message, .. } => Some(message),
        TableEvent::Committed { id, created: true } => Some(format!("created {table} {id}")),
        TableEvent::Committed { id, created: false } => Some(format!("updated {table} {id}")),
        TableEvent::Removed { id } => Some(format!("deleted {table} {id}")),
        TableEvent::SelectionChanged(_) | TableEvent::Reloaded { .. } => None,
    }
}

/// Every section with the shared lookup cache.
#[derive(Debug)]
pub struct Workspace {
    panels: Vec<Panel>,
    current: Option<Route>,
    lookups: LookupCache,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self::with_panels(Route::ALL.into_iter().map(Panel::for_route).collect())
    }

    pub fn with_panels(panels: Vec<Panel>) -> Self {
        Self {
            panels,
            current: None,
            lookups: LookupCache::new(),
        }
    }

    pub fn current_route(&self) -> Option<Route> {
        self.current
    }

    pub fn lookups(&self) -> &LookupCache {
        &self.lookups
    }

    pub fn panel(&self, route: Route) -> Option<&Panel> {
        self.panels.iter().find(|panel| panel.route == route)
    }

    pub fn panel_mut(&mut self, route: Route) -> Option<&mut Panel> {
        self.panels.iter_mut().find(|panel| panel.route == route)
    }

    pub fn current(&self) -> Option<&Panel> {
        self.current.and_then(|route| self.panel(route))
    }

    /// Activates `route`, deactivating the section that was showing.
    /// Switching to the active section changes nothing.
    pub fn switch_to(&mut self, route: Route) -> PanelUpdate {
        if self.current == Some(route) && self.panel(route).is_some_and(Panel::is_active) {
            return PanelUpdate::default();
        }
        if let Some(previous) = self.current
            && let Some(panel) = self.panel_mut(previous)
        {
            panel.deactivate();
        }
        self.current = Some(route);
        let Some(panel) = self.panels.iter_mut().find(|panel| panel.route == route) else {
            return message(format!("no panel for {}", route.hash()));
        };
        panel.activate(&mut self.lookups)
    }

    /// Routes an answer to whichever panel issued it.
    pub fn complete(&mut self, outcome: CallOutcome) -> PanelUpdate {
        let ticket = outcome.ticket;
        let Some(panel) = self
            .panels
            .iter_mut()
            .find(|panel| panel.awaiting.contains(&ticket) || panel.master.owns(ticket) || panel.dependents.iter().any(|dependent| dependent.table.owns(ticket)))
        else {
            // A lookup whose section was left before it answered.
            if self.lookups.complete(&outcome).is_none() {
                debug!(ticket = %ticket, "answer matches no request");
            }
            return PanelUpdate::default();
        };
        panel.complete(outcome, &mut self.lookups).unwrap_or_default()
    }

    fn current_mut(&mut self) -> Result<&mut Panel, EngineError> {
        let route = self.current.ok_or(EngineError::NothingSelected)?;
        self.panels
            .iter_mut()
            .find(|panel| panel.route == route)
            .ok_or(EngineError::NothingSelected)
    }

    pub fn press(&mut self, action: &Action) -> Result<PanelUpdate, EngineError> {
        let route = self.current.ok_or(EngineError::NothingSelected)?;
        let Some(panel) = self.panels.iter_mut().find(|panel| panel.route == route) else {
            return Err(EngineError::NothingSelected);
        };
        panel.press(action, &self.lookups)
    }

    pub fn move_selection(&mut self, delta: isize) -> Result<PanelUpdate, EngineError> {
        self.current_mut()?.move_selection(delta)
    }

    pub fn toggle_focus(&mut self) -> Result<(), EngineError> {
        self.current_mut()?.toggle_focus()
    }

    pub fn input(&mut self, input: CellInput) -> bool {
        self.current_mut().map(|panel| panel.input(input)).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::VENDORS;
    use crate::schema::{Column, ColumnLayout, Endpoints};
    use serde_json::{Value, json};

    fn answer(workspace: &mut Workspace, call: &RemoteCall, value: Value) -> PanelUpdate {
        workspace.complete(CallOutcome::ok(call.ticket, value))
    }

    fn find<'a>(update: &'a PanelUpdate, path: &str) -> &'a RemoteCall {
        update
            .calls
            .iter()
            .find(|call| call.request.path == path)
            .unwrap_or_else(|| panic!("no call to {path} in {update:?}"))
    }

    #[test]
    fn master_refresh_waits_for_lookups() {
        let mut workspace = Workspace::new();
        let update = workspace.switch_to(Route::Strain);
        let paths: Vec<&str> = update.calls.iter().map(|call| call.request.path.as_str()).collect();
        assert_eq!(paths, vec!["/vendors", "/strainattributenames"]);

        let vendors = find(&update, "/vendors").clone();
        let names = find(&update, "/strainattributenames").clone();
        assert!(answer(&mut workspace, &vendors, json!([{"id": "v1", "name": "Spore Depot"}])).calls.is_empty());

        let update = answer(&mut workspace, &names, json!(["colour"]));
        assert_eq!(update.calls.len(), 1);
        assert_eq!(update.calls[0].request.path, "/strains");
        assert_eq!(workspace.lookups().get("vendors").len(), 1);
    }

    #[test]
    fn failed_lookup_still_releases_refresh() {
        let mut workspace = Workspace::new();
        let update = workspace.switch_to(Route::Substrate);
        let mut refresh = None;
        for call in &update.calls {
            let update = workspace.complete(CallOutcome::err(call.ticket, "HTTP 503: down"));
            if !update.calls.is_empty() {
                refresh = Some(update);
            }
        }
        let refresh = refresh.expect("master refresh after last lookup");
        assert_eq!(refresh.calls[0].request.path, "/substrates");
        assert!(refresh.messages.iter().any(|line| line.contains("could not load")));
    }

    #[test]
    fn returning_to_a_section_ignores_its_earlier_lookup_answers() {
        let mut workspace = Workspace::new();
        let first = workspace.switch_to(Route::Strain);
        let old_vendors = find(&first, "/vendors").clone();
        workspace.switch_to(Route::Vendor);
        let again = workspace.switch_to(Route::Strain);
        let vendors = find(&again, "/vendors").clone();
        let names = find(&again, "/strainattributenames").clone();

        answer(&mut workspace, &vendors, json!([{"id": "v2", "name": "New"}, {"id": "v3", "name": "Added"}]));
        let update = answer(&mut workspace, &names, json!(["colour"]));
        assert_eq!(update.calls[0].request.path, "/strains");

        let update = answer(&mut workspace, &old_vendors, json!([{"id": "v1", "name": "Old"}]));
        assert!(update.is_empty());
        let labels: Vec<&str> = workspace.lookups().get("vendors").iter().map(|choice| choice.label.as_str()).collect();
        assert_eq!(labels, vec!["New", "Added"]);
    }

    #[test]
    fn sections_without_lookups_refresh_immediately() {
        let mut workspace = Workspace::new();
        let update = workspace.switch_to(Route::Vendor);
        assert_eq!(update.calls.len(), 1);
        assert_eq!(update.calls[0].request.path, "/vendors");
    }

    #[test]
    fn switching_to_current_route_is_a_no_op() {
        let mut workspace = Workspace::new();
        workspace.switch_to(Route::Stage);
        assert!(workspace.switch_to(Route::Stage).is_empty());
    }

    #[test]
    fn leaving_a_section_drops_its_late_answers() {
        let mut workspace = Workspace::new();
        let refresh = workspace.switch_to(Route::Stage).calls.remove(0);
        workspace.switch_to(Route::Vendor);
        let update = answer(&mut workspace, &refresh, json!([{"id": "s1", "name": "Pinning"}]));
        assert!(update.is_empty());
        assert!(workspace.panel(Route::Stage).expect("stage panel").master().is_empty());
    }

    #[test]
    fn master_selection_rescopes_dependents() {
        let master = RowSet::new("strain", ColumnLayout::new(vec![Column::text("name", "Name")]), Endpoints::collection("strain"));
        let attributes = RowSet::new(
            "attribute",
            ColumnLayout::new(vec![Column::text("name", "Name")]),
            Endpoints::nested("/strain/{parent}", "attributes"),
        );
        let panel = Panel::new(Route::Strain, master, &[]).with_dependent(Dependent::new("Attributes", attributes));
        let mut workspace = Workspace::with_panels(vec![panel]);

        let refresh = workspace.switch_to(Route::Strain).calls.remove(0);
        let update = answer(&mut workspace, &refresh, json!([{"id": "1", "name": "A"}, {"id": "2", "name": "B"}]));
        assert_eq!(update.calls.len(), 1);
        assert_eq!(update.calls[0].request.path, "/strain/1");

        let update = workspace.move_selection(1).expect("move");
        assert_eq!(update.calls[0].request.path, "/strain/2");

        let update = workspace.move_selection(1).expect("move");
        assert!(update.is_empty(), "already on the last row");
    }

    #[test]
    fn panel_lookups_cover_vendor_choices() {
        let panel = Panel::for_route(Route::Strain);
        assert!(panel.lookups.iter().any(|source| source.name == VENDORS.name));
    }

    #[test]
    fn custom_action_switches_dependent() {
        let mut workspace = Workspace::new();
        let update = workspace.switch_to(Route::Generation);
        let mut refresh = None;
        for call in &update.calls {
            let update = answer(&mut workspace, call, json!([]));
            if !update.calls.is_empty() {
                refresh = Some(update.calls[0].clone());
            }
        }
        let refresh = refresh.expect("generation refresh");
        let update = answer(&mut workspace, &refresh, json!([{"id": "g1", "sources": []}]));
        assert_eq!(update.calls.len(), 2);

        let panel = workspace.current().expect("generation panel");
        assert_eq!(panel.dependent().map(|dependent| dependent.label), Some("Events"));

        let update = workspace.press(&Action::Custom(SWITCH_DEPENDENT.into())).expect("switch");
        assert_eq!(update.calls[0].request.path, "/generation/g1");
        let panel = workspace.current().expect("generation panel");
        assert_eq!(panel.dependent().map(|dependent| dependent.label), Some("Sources"));
    }

    #[test]
    fn focus_cannot_leave_a_draft() {
        let mut workspace = Workspace::new();
        let refresh = workspace.switch_to(Route::Ingredient).calls.remove(0);
        answer(&mut workspace, &refresh, json!([]));
        workspace.press(&Action::Add).expect("add");
        assert_eq!(workspace.toggle_focus(), Err(EngineError::Busy));
    }
}
