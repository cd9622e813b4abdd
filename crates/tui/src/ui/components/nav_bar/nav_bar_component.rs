use cffc_types::Effect;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::VerticalNavBarState;
use crate::app::App;
use crate::ui::components::{Component, find_target_index_by_mouse_position};
use crate::ui::theme::{Theme, theme_helpers as th};

/// Vertical list of sections.
///
/// Selecting an item emits [`Effect::SwitchTo`]; the runtime performs the
/// switch so the workspace can deactivate the section being left.
#[derive(Debug, Default)]
pub struct VerticalNavBarComponent;

impl VerticalNavBarComponent {
    fn any_item_focused(state: &VerticalNavBarState) -> bool {
        state.container_focus.get() || state.item_focus_flags.iter().any(|flag| flag.get())
    }

    fn item_rects(state: &VerticalNavBarState, area: Rect) -> Vec<Rect> {
        let constraints = vec![Constraint::Length(1); state.items.len()];
        Layout::vertical(constraints).margin(1).split(area).to_vec()
    }
}

impl Component for VerticalNavBarComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let mut effects = Vec::new();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(flag) = app.nav_bar.cycle_focus(true) {
                    app.focus.by_widget_id(flag.widget_id());
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(flag) = app.nav_bar.cycle_focus(false) {
                    app.focus.by_widget_id(flag.widget_id());
                }
            }
            KeyCode::Enter => {
                if let Some((item, _)) = app.nav_bar.get_focused_list_item() {
                    effects.push(Effect::SwitchTo(item.route));
                }
            }
            _ => {}
        }
        effects
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let state = &app.nav_bar;
        let Some(index) = find_target_index_by_mouse_position(&state.last_area, &state.per_item_areas, mouse.column, mouse.row) else {
            return Vec::new();
        };
        let Some(item) = state.items.get(index).cloned() else {
            return Vec::new();
        };
        if let Some(flag) = app.nav_bar.item_focus_flags.get(index) {
            app.focus.focus(flag);
        }
        vec![Effect::SwitchTo(item.route)]
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &*app.theme;
        let focused = Self::any_item_focused(&app.nav_bar);
        frame.render_widget(th::block(theme, Some("Sections"), focused), area);

        let rects = Self::item_rects(&app.nav_bar, area);
        for (index, item) in app.nav_bar.items.iter().enumerate() {
            let Some(row) = rects.get(index).copied() else {
                continue;
            };
            let is_selected = index == app.nav_bar.selected_index;
            let is_focused = app.nav_bar.item_focus_flags.get(index).is_some_and(|flag| flag.get());
            let mut style = if is_selected {
                th::table_selected_style(theme)
            } else {
                theme.text_primary_style()
            };
            if is_focused {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            let line = Line::from(vec![
                Span::styled(format!(" {} ", item.key), theme.accent_primary_style()),
                Span::styled(item.label.clone(), style),
            ]);
            frame.render_widget(Paragraph::new(line), row);
        }
        app.nav_bar.last_area = area;
        app.nav_bar.per_item_areas = rects;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        th::build_hint_spans(&*app.theme, &[(" Enter", " open section "), (" ↑/↓", " navigate ")])
    }
}
