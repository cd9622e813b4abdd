use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::App;
use crate::ui::theme::theme_helpers as th;

/// One-line footer: the focused pane's keys followed by the global ones.
pub fn render_hint_bar(frame: &mut Frame, rect: Rect, app: &App, mut spans: Vec<Span<'_>>) {
    let global: &[(&str, &str)] = if app.is_editing() {
        &[]
    } else {
        &[(" 1-7", " section "), (" S-Tab", " next pane "), (" q", " quit ")]
    };
    spans.extend(th::build_hint_spans(&*app.theme, global));
    frame.render_widget(Paragraph::new(Line::from(spans)).style(th::panel_style(&*app.theme)), rect);
}
