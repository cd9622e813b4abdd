//! Centre pane: the master table of the current section and its visible
//! dependent table, each followed by its button bar.

use cffc_engine::{Action, ButtonBar, CellInput, EngineError, Live, PanelUpdate, Row, RowSet, TableFocus};
use cffc_types::Effect;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row as TableRow, Table, TableState},
};
use unicode_width::UnicodeWidthStr;

use super::state::{Hit, HitTarget};
use crate::app::App;
use crate::ui::components::Component;
use crate::ui::theme::{Theme, theme_helpers as th};

const MAX_COLUMN_WIDTH: u16 = 32;
const THROBBER: [&str; 4] = ["|", "/", "-", "\\"];

/// Maps a letter to the bar action it triggers. Custom actions answer to
/// the first letter of their name.
pub fn action_for_key(key: char, bar: &ButtonBar) -> Option<Action> {
    let action = match key {
        'a' => Action::Add,
        'e' => Action::Edit,
        'd' => Action::Remove,
        'r' => Action::Refresh,
        other => {
            return bar
                .actions()
                .map(|(action, _)| action)
                .find(|action| action.is_custom() && action.label().starts_with(other))
                .cloned();
        }
    };
    bar.has(&action).then_some(action)
}

/// Table title with a throbber frame while work is pending, or a note when
/// a dependent table has no parent row.
fn heading(title: &str, table: &RowSet, throbber: Option<usize>) -> String {
    match throbber {
        Some(frame) => format!("{title} {}", THROBBER[frame % THROBBER.len()]),
        None if table.endpoints().list.needs_parent() && table.scope().is_none() => format!("{title} (nothing selected)"),
        None => title.to_string(),
    }
}

/// Column widths that fit the header and every visible value.
pub fn column_widths(headers: &[&str], rows: &[Row]) -> Vec<u16> {
    headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let widest = rows
                .iter()
                .filter_map(|row| row.cells.get(index))
                .map(|cell| cell_text(cell).width() + 2)
                .max()
                .unwrap_or_default();
            (widest.max(header.width()) as u16).clamp(4, MAX_COLUMN_WIDTH)
        })
        .collect()
}

/// What a cell shows: the live value while editing, otherwise the display.
fn cell_text(cell: &cffc_engine::Cell) -> String {
    match &cell.live {
        Some(live @ Live::Choice { .. }) => format!("‹{}›", live.text()),
        Some(live @ Live::Text { .. }) => live.text().to_string(),
        None => cell.display.clone(),
    }
}

#[derive(Debug, Default)]
pub struct TableComponent;

impl TableComponent {
    /// Points keys and clicks at `target`, refusing while the other table
    /// holds a draft.
    fn focus_table(app: &mut App, target: TableFocus) -> Result<(), EngineError> {
        let current = app.workspace.current().map(|panel| panel.focus());
        if current.is_some_and(|focus| focus != target) {
            app.workspace.toggle_focus()
        } else {
            Ok(())
        }
    }

    fn press(app: &mut App, action: &Action) -> Result<Option<PanelUpdate>, EngineError> {
        app.workspace.press(action).map(Some)
    }

    fn input(app: &mut App, input: CellInput) -> Result<Option<PanelUpdate>, EngineError> {
        app.workspace.input(input);
        Ok(None)
    }

    fn settle(app: &mut App, outcome: Result<Option<PanelUpdate>, EngineError>) -> Vec<Effect> {
        match outcome {
            Ok(Some(update)) => app.absorb(update),
            Ok(None) => Vec::new(),
            Err(error) => {
                app.reject(&error);
                Vec::new()
            }
        }
    }

    fn click(app: &mut App, target: HitTarget) -> Result<Option<PanelUpdate>, EngineError> {
        match target {
            HitTarget::Row { table, index } => {
                Self::focus_table(app, table)?;
                let current = app
                    .workspace
                    .current()
                    .and_then(|panel| panel.focused().selected_index())
                    .unwrap_or_default();
                let delta = index as isize - current as isize;
                if delta == 0 {
                    return Ok(None);
                }
                app.workspace.move_selection(delta).map(Some)
            }
            HitTarget::Button { table, action } => {
                Self::focus_table(app, table)?;
                Self::press(app, &action)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn render_table(
        frame: &mut Frame,
        area: Rect,
        theme: &dyn Theme,
        table: &RowSet,
        title: &str,
        focused: bool,
        throbber: Option<usize>,
        view: &mut TableState,
        which: TableFocus,
        hits: &mut Vec<Hit>,
    ) {
        let heading = heading(title, table, throbber);
        let block = th::block(theme, Some(heading.as_str()), focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [body, bar] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        let headers = table.headers();
        let widths = column_widths(&headers, table.rows());
        let header = TableRow::new(headers.iter().map(|header| Cell::from(*header))).style(th::table_header_row_style(theme));
        let rows: Vec<TableRow> = table
            .rows()
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let drafting = row.cells.iter().any(|cell| cell.live.is_some());
                let cells = row.cells.iter().enumerate().map(|(column, cell)| {
                    let text = cell_text(cell);
                    if drafting && row.focus_index() == Some(column) {
                        Cell::from(format!("{text}▏")).style(th::draft_cell_style(theme))
                    } else {
                        Cell::from(text)
                    }
                });
                let style = if drafting {
                    th::draft_row_style(theme)
                } else {
                    th::table_row_style(theme, index)
                };
                TableRow::new(cells).style(style)
            })
            .collect();

        view.select(table.selected_index());
        let widget = Table::new(rows, widths.iter().map(|width| Constraint::Length(*width)))
            .header(header)
            .column_spacing(1)
            .row_highlight_style(th::table_selected_style(theme));
        frame.render_stateful_widget(widget, body, view);

        let first_body_row = body.y.saturating_add(1);
        let visible = body.height.saturating_sub(1) as usize;
        let offset = view.offset();
        for (slot, index) in (offset..table.len()).take(visible).enumerate() {
            hits.push(Hit {
                area: Rect::new(body.x, first_body_row + slot as u16, body.width, 1),
                target: HitTarget::Row { table: which, index },
            });
        }

        Self::render_bar(frame, bar, theme, table.bar(), which, hits);
    }

    fn render_bar(frame: &mut Frame, area: Rect, theme: &dyn Theme, bar: &ButtonBar, which: TableFocus, hits: &mut Vec<Hit>) {
        let mut spans = Vec::new();
        let mut x = area.x;
        for (action, enabled) in bar.actions() {
            let label = format!("[{}]", action.label());
            let width = label.width() as u16;
            let emphasized = bar.is_armed() && matches!(action, Action::Ok | Action::Cancel);
            hits.push(Hit {
                area: Rect::new(x, area.y, width.min(area.right().saturating_sub(x)), 1),
                target: HitTarget::Button {
                    table: which,
                    action: action.clone(),
                },
            });
            spans.push(Span::styled(label, th::button_style(theme, enabled, emphasized)));
            spans.push(Span::raw(" "));
            x = x.saturating_add(width + 1);
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Component for TableComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let editing = app.is_editing();
        let outcome = match (key.code, editing) {
            (KeyCode::Up, _) => app.workspace.move_selection(-1).map(Some),
            (KeyCode::Down, _) => app.workspace.move_selection(1).map(Some),
            (KeyCode::Tab, true) => Self::input(app, CellInput::NextCell),
            (KeyCode::BackTab, true) => Self::input(app, CellInput::PrevCell),
            (KeyCode::Tab, false) => app.workspace.toggle_focus().map(|_| None),
            (KeyCode::Left, true) => Self::input(app, CellInput::PrevOption),
            (KeyCode::Right, true) => Self::input(app, CellInput::NextOption),
            (KeyCode::Backspace, true) => Self::input(app, CellInput::Backspace),
            (KeyCode::Enter, true) => Self::press(app, &Action::Ok),
            (KeyCode::Esc, true) => Self::press(app, &Action::Cancel),
            (KeyCode::Char(ch), true) => Self::input(app, CellInput::Char(ch)),
            (KeyCode::Char(ch), false) => {
                let action = app.workspace.current().and_then(|panel| action_for_key(ch, panel.focused().bar()));
                match action {
                    Some(action) => Self::press(app, &action),
                    None => Ok(None),
                }
            }
            _ => Ok(None),
        };
        Self::settle(app, outcome)
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let outcome = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => match app.tables.hit_test(mouse.column, mouse.row).cloned() {
                Some(target) => Self::click(app, target),
                None => Ok(None),
            },
            MouseEventKind::ScrollUp => app.workspace.move_selection(-1).map(Some),
            MouseEventKind::ScrollDown => app.workspace.move_selection(1).map(Some),
            _ => Ok(None),
        };
        Self::settle(app, outcome)
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let App {
            workspace,
            tables,
            theme,
            throbber_idx,
            ..
        } = app;
        let theme: &dyn Theme = &**theme;
        tables.last_area = rect;
        tables.hits.clear();

        let Some(panel) = workspace.current() else {
            frame.render_widget(Paragraph::new("Pick a section").block(th::block(theme, None, false)), rect);
            return;
        };
        let pane_focused = tables.focus.get();
        let dependent = panel.dependent();
        let areas = if dependent.is_some() {
            Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)]).split(rect)
        } else {
            Layout::vertical([Constraint::Min(0)]).split(rect)
        };

        Self::render_table(
            frame,
            areas[0],
            theme,
            panel.master(),
            panel.route().label(),
            pane_focused && panel.focus() == TableFocus::Master,
            Some(*throbber_idx).filter(|_| panel.is_preparing() || panel.master().is_loading() || panel.master().is_busy()),
            &mut tables.master_view,
            TableFocus::Master,
            &mut tables.hits,
        );
        if let (Some(dependent), Some(area)) = (dependent, areas.get(1)) {
            let title = match panel.master().selected() {
                Some(parent) => format!("{} of {}", dependent.label, parent.cells.first().map(|cell| cell.display.as_str()).unwrap_or(parent.id.as_str())),
                None => dependent.label.to_string(),
            };
            Self::render_table(
                frame,
                *area,
                theme,
                &dependent.table,
                &title,
                pane_focused && panel.focus() == TableFocus::Dependent,
                Some(*throbber_idx).filter(|_| dependent.table.is_loading() || dependent.table.is_busy()),
                &mut tables.dependent_view,
                TableFocus::Dependent,
                &mut tables.hits,
            );
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let hints: &[(&str, &str)] = if app.is_editing() {
            &[
                (" Tab", " next field "),
                (" ←/→", " choose "),
                (" Enter", " ok "),
                (" Esc", " cancel "),
            ]
        } else {
            &[
                (" ↑/↓", " select "),
                (" a", " add "),
                (" e", " edit "),
                (" d", " remove "),
                (" r", " refresh "),
                (" Tab", " switch table "),
            ]
        };
        th::build_hint_spans(&*app.theme, hints)
    }
}
