//! Application state shared by every component.
//!
//! [`App`] owns the engine [`Workspace`] plus the view state of each pane.
//! Components mutate it in response to input; anything effectful leaves as
//! an [`Effect`] for the runtime to carry out.

use std::rc::Rc;

use cffc_engine::{EngineError, PanelUpdate, Workspace};
use cffc_types::{Effect, Msg, Route};
use rat_focus::{Focus, FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::{debug, warn};

use crate::ui::components::logs::LogsState;
use crate::ui::components::nav_bar::VerticalNavBarState;
use crate::ui::components::table::TablesState;
use crate::ui::theme::{NordTheme, Theme};

pub struct App {
    pub workspace: Workspace,
    pub nav_bar: VerticalNavBarState,
    pub tables: TablesState,
    pub logs: LogsState,
    pub theme: Box<dyn Theme>,
    /// Focus tree over the three panes, rebuilt before every frame.
    pub focus: Rc<Focus>,
    root_focus: FocusFlag,
    /// Requests spawned and not yet answered.
    pub in_flight: usize,
    pub throbber_idx: usize,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Workspace::new())
    }
}

impl App {
    pub fn new(workspace: Workspace) -> Self {
        let mut app = Self {
            workspace,
            nav_bar: VerticalNavBarState::sections(),
            tables: TablesState::default(),
            logs: LogsState::default(),
            theme: Box::new(NordTheme::new()),
            focus: Rc::new(Focus::default()),
            root_focus: FocusFlag::named("root"),
            in_flight: 0,
            throbber_idx: 0,
        };
        app.focus = Rc::new(FocusBuilder::build_for(&app));
        app.focus.focus(&app.tables);
        app
    }

    /// Shows `route`, starting its lookups and master refresh.
    pub fn switch_to(&mut self, route: Route) -> Vec<Effect> {
        let update = self.workspace.switch_to(route);
        self.nav_bar.set_route(route);
        if !update.is_empty() {
            self.tables.reset();
        }
        self.absorb(update)
    }

    /// Logs a panel's status lines and hands its calls to the runtime.
    pub fn absorb(&mut self, update: PanelUpdate) -> Vec<Effect> {
        for message in update.messages {
            if message.starts_with("failed") || message.starts_with("could not") {
                self.logs.error(message);
            } else {
                self.logs.info(message);
            }
        }
        update.calls.into_iter().map(Effect::Remote).collect()
    }

    /// Reports an operation the engine refused; nothing changed.
    pub fn reject(&mut self, error: &EngineError) {
        warn!(%error, "operation refused");
        self.logs.warn(error.to_string());
    }

    /// Whether the focused table holds a draft, so keystrokes edit cells.
    pub fn is_editing(&self) -> bool {
        self.workspace.current().is_some_and(|panel| panel.focused().pending().is_some())
    }

    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                if self.in_flight > 0 {
                    self.throbber_idx = self.throbber_idx.wrapping_add(1);
                }
                Vec::new()
            }
            Msg::Resize(width, height) => {
                debug!(width, height, "terminal resized");
                Vec::new()
            }
            Msg::CallCompleted(outcome) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                if self.in_flight == 0 {
                    self.throbber_idx = 0;
                }
                let update = self.workspace.complete(outcome.clone());
                self.absorb(update)
            }
        }
    }
}

impl HasFocus for App {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.widget(&self.nav_bar);
        builder.widget(&self.tables);
        builder.widget(&self.logs);
    }

    fn focus(&self) -> FocusFlag {
        self.root_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cffc_engine::Action;
    use cffc_types::{CallOutcome, RequestMethod};
    use serde_json::json;

    fn remote_paths(effects: &[Effect]) -> Vec<String> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Remote(call) => Some(call.request.path.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn switching_sections_requests_lookups_first() {
        let mut app = App::default();
        let effects = app.switch_to(Route::Substrate);
        assert_eq!(remote_paths(&effects), vec!["/vendors", "/ingredients"]);
        assert_eq!(app.nav_bar.selected_index, Route::Substrate.ordinal());
        assert!(app.switch_to(Route::Substrate).is_empty());
    }

    #[test]
    fn completed_calls_reach_the_workspace() {
        let mut app = App::default();
        let effects = app.switch_to(Route::Stage);
        let Some(Effect::Remote(call)) = effects.first() else {
            panic!("expected a refresh call, got {effects:?}");
        };
        assert_eq!(call.request.method, RequestMethod::Get);
        app.in_flight = 1;

        let follow_up = app.update(&Msg::CallCompleted(CallOutcome::ok(
            call.ticket,
            json!([{"id": "st1", "name": "Fruiting"}]),
        )));
        assert!(follow_up.is_empty());
        assert_eq!(app.in_flight, 0);
        let panel = app.workspace.current().expect("stage panel");
        assert_eq!(panel.master().selected_id().as_deref(), Some("st1"));
    }

    #[test]
    fn failures_are_logged_as_errors() {
        let mut app = App::default();
        let effects = app.switch_to(Route::Vendor);
        let Some(Effect::Remote(call)) = effects.first() else {
            panic!("expected a refresh call");
        };
        app.update(&Msg::CallCompleted(CallOutcome::err(call.ticket, "HTTP 500 Internal Server Error: boom")));
        let last = app.logs.entries.back().expect("log line");
        assert_eq!(last.level, crate::ui::components::logs::LogLevel::Error);
        assert_eq!(last.message, "failed to load vendor: HTTP 500 Internal Server Error: boom");
    }

    #[test]
    fn refused_operations_are_logged_as_warnings() {
        let mut app = App::default();
        app.switch_to(Route::Stage);
        let error = app.workspace.press(&Action::Edit).expect_err("nothing selected yet");
        app.reject(&error);
        assert_eq!(
            app.logs.entries.back().map(|entry| entry.level),
            Some(crate::ui::components::logs::LogLevel::Warn)
        );
        assert!(!app.is_editing());
    }
}
