use cffc_types::Effect;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::state::LogLevel;
use crate::app::App;
use crate::ui::components::Component;
use crate::ui::theme::{Theme, theme_helpers as th};

/// Bottom pane with timestamped status lines.
#[derive(Debug, Default)]
pub struct LogsComponent;

impl Component for LogsComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let page = app.logs.last_area.height.saturating_sub(2).max(1) as usize;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.logs.scroll_up(1),
            KeyCode::Down | KeyCode::Char('j') => app.logs.scroll_down(1),
            KeyCode::PageUp => app.logs.scroll_up(page),
            KeyCode::PageDown => app.logs.scroll_down(page),
            KeyCode::End => app.logs.scroll = 0,
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if !app.logs.last_area.contains(Position::new(mouse.column, mouse.row)) {
            return Vec::new();
        }
        match mouse.kind {
            MouseEventKind::ScrollUp => app.logs.scroll_up(1),
            MouseEventKind::ScrollDown => app.logs.scroll_down(1),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.theme;
        let block = th::block(theme, Some("Log"), app.logs.focus.get());
        let inner = block.inner(rect);
        let lines: Vec<Line> = app
            .logs
            .visible(inner.height as usize)
            .map(|entry| {
                let style = match entry.level {
                    LogLevel::Info => theme.text_primary_style(),
                    LogLevel::Warn => theme.status_warning(),
                    LogLevel::Error => theme.status_error(),
                };
                Line::from(vec![
                    Span::styled(entry.at.format("%H:%M:%S ").to_string(), theme.status_info()),
                    Span::styled(entry.message.clone(), style),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).block(block), rect);
        app.logs.last_area = rect;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        th::build_hint_spans(&*app.theme, &[(" ↑/↓", " scroll "), (" End", " newest ")])
    }
}
