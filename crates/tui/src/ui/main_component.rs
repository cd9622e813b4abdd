//! Top-level view: section list on the left, tables in the centre, the
//! status log below them and a hint line at the bottom.

use cffc_types::{Effect, Msg};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::Span,
};

use crate::app::App;
use crate::ui::components::{Component, LogsComponent, TableComponent, VerticalNavBarComponent, render_hint_bar};

const NAV_WIDTH: u16 = 18;
const LOG_HEIGHT: u16 = 8;

/// Which pane receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Nav,
    Tables,
    Logs,
}

#[derive(Debug, Default)]
pub struct MainView {
    nav: VerticalNavBarComponent,
    tables: TableComponent,
    logs: LogsComponent,
}

impl MainView {
    pub fn new() -> Self {
        Self::default()
    }

    fn focused_pane(app: &App) -> Pane {
        let nav = &app.nav_bar;
        if nav.container_focus.get() || nav.item_focus_flags.iter().any(|flag| flag.get()) {
            Pane::Nav
        } else if app.logs.focus.get() {
            Pane::Logs
        } else {
            Pane::Tables
        }
    }

    fn pane_at(app: &App, column: u16, row: u16) -> Option<Pane> {
        let position = Position::new(column, row);
        if app.nav_bar.last_area.contains(position) {
            Some(Pane::Nav)
        } else if app.tables.last_area.contains(position) {
            Some(Pane::Tables)
        } else if app.logs.last_area.contains(position) {
            Some(Pane::Logs)
        } else {
            None
        }
    }

    /// Puts focus back on the tables when nothing holds it.
    pub fn restore_focus(&self, app: &mut App) {
        app.focus.focus(&app.tables);
    }

    /// Keys that work from every pane unless a draft is being typed into.
    fn global_key(app: &mut App, key: KeyEvent) -> Option<Vec<Effect>> {
        if app.is_editing() {
            return None;
        }
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => Some(vec![Effect::Quit]),
            KeyCode::Char(ch) if ch.is_ascii_digit() => {
                let route = app.nav_bar.route_for_key(ch)?;
                Some(vec![Effect::SwitchTo(route)])
            }
            KeyCode::BackTab => {
                app.focus.next();
                Some(Vec::new())
            }
            _ => None,
        }
    }

    fn hint_spans<'a>(&'a self, app: &'a App) -> Vec<Span<'a>> {
        match Self::focused_pane(app) {
            Pane::Nav => self.nav.get_hint_spans(app),
            Pane::Tables => self.tables.get_hint_spans(app),
            Pane::Logs => self.logs.get_hint_spans(app),
        }
    }
}

impl Component for MainView {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Effect::Quit];
        }
        if let Some(effects) = Self::global_key(app, key) {
            return effects;
        }
        match Self::focused_pane(app) {
            Pane::Nav => self.nav.handle_key_events(app, key),
            Pane::Tables => self.tables.handle_key_events(app, key),
            Pane::Logs => self.logs.handle_key_events(app, key),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        match Self::pane_at(app, mouse.column, mouse.row) {
            Some(Pane::Nav) => self.nav.handle_mouse_events(app, mouse),
            Some(Pane::Tables) => {
                if matches!(mouse.kind, MouseEventKind::Down(_)) {
                    app.focus.focus(&app.tables);
                }
                self.tables.handle_mouse_events(app, mouse)
            }
            Some(Pane::Logs) => {
                if matches!(mouse.kind, MouseEventKind::Down(_)) {
                    app.focus.focus(&app.logs);
                }
                self.logs.handle_mouse_events(app, mouse)
            }
            None => Vec::new(),
        }
    }

    fn update(&mut self, app: &mut App, msg: &Msg) -> Vec<Effect> {
        app.update(msg)
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let [body, hints] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(rect);
        let [nav, main] = Layout::horizontal([Constraint::Length(NAV_WIDTH), Constraint::Min(0)]).areas(body);
        let [tables, logs] = Layout::vertical([Constraint::Min(0), Constraint::Length(LOG_HEIGHT)]).areas(main);

        self.nav.render(frame, nav, app);
        self.tables.render(frame, tables, app);
        self.logs.render(frame, logs, app);
        let spans = self.hint_spans(app);
        render_hint_bar(frame, hints, app, spans);
    }
}
