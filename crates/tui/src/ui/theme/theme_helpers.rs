use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
};

use super::roles::{Theme, ThemeRoles};

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(t, theme.text_secondary_style().add_modifier(Modifier::BOLD)));
    }
    block
}

/// Style for panel-like containers.
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    Style::default().bg(surface).fg(text)
}

/// Background style for the entire header row to avoid gaps between columns.
pub fn table_header_row_style<T: Theme + ?Sized>(theme: &T) -> Style {
    Style::default()
        .bg(theme.roles().surface_muted)
        .fg(theme.roles().text_secondary)
        .add_modifier(Modifier::BOLD)
}

/// Darken an RGB color by a multiplicative factor (0.0..=1.0).
/// If the color is not RGB, returns it unchanged.
pub fn darken_rgb(color: Color, factor: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let f = factor.clamp(0.0, 1.0);
            let dr = (r as f32 * f).round().clamp(0.0, 255.0) as u8;
            let dg = (g as f32 * f).round().clamp(0.0, 255.0) as u8;
            let db = (b as f32 * f).round().clamp(0.0, 255.0) as u8;
            Color::Rgb(dr, dg, db)
        }
        other => other,
    }
}

/// Zebra striping for body rows.
pub fn table_row_style<T: Theme + ?Sized>(theme: &T, row_index: usize) -> Style {
    let ThemeRoles {
        table_row_even,
        table_row_odd,
        text,
        ..
    } = *theme.roles();
    let bg = if row_index % 2 == 0 { table_row_even } else { table_row_odd };
    Style::default().bg(bg).fg(text)
}

/// Style for a selected row.
pub fn table_selected_style<T: Theme + ?Sized>(theme: &T) -> Style {
    theme.selection_style().add_modifier(Modifier::BOLD)
}

/// Style for the row holding a draft.
pub fn draft_row_style<T: Theme + ?Sized>(theme: &T) -> Style {
    Style::default().bg(theme.roles().draft_bg).fg(theme.roles().selection_fg)
}

/// The cell that receives keystrokes while editing.
pub fn draft_cell_style<T: Theme + ?Sized>(theme: &T) -> Style {
    draft_row_style(theme)
        .add_modifier(Modifier::UNDERLINED)
        .add_modifier(Modifier::BOLD)
}

/// Label style for a bar button. Disabled buttons are dimmed.
pub fn button_style<T: Theme + ?Sized>(theme: &T, enabled: bool, emphasized: bool) -> Style {
    if !enabled {
        return theme.text_muted_style().add_modifier(Modifier::DIM);
    }
    if emphasized {
        return theme.accent_emphasis_style();
    }
    Style::default().fg(theme.roles().accent_secondary)
}

/// Key/description pairs rendered as ` key desc  key desc`.
pub fn build_hint_spans<'a, T: Theme + ?Sized>(theme: &T, hints: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, description) in hints {
        spans.push(Span::styled(*key, theme.accent_emphasis_style()));
        spans.push(Span::styled(*description, theme.text_muted_style()));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::NordTheme;

    #[test]
    fn darken_leaves_named_colors_alone() {
        assert_eq!(darken_rgb(Color::Red, 0.5), Color::Red);
        assert_eq!(darken_rgb(Color::Rgb(200, 100, 50), 0.5), Color::Rgb(100, 50, 25));
    }

    #[test]
    fn rows_alternate_backgrounds() {
        let theme = NordTheme::new();
        assert_ne!(table_row_style(&theme, 0).bg, table_row_style(&theme, 1).bg);
        assert_eq!(table_row_style(&theme, 0).bg, table_row_style(&theme, 2).bg);
    }

    #[test]
    fn hints_pair_keys_with_descriptions() {
        let theme = NordTheme::new();
        let spans = build_hint_spans(&theme, &[(" a", " add"), (" q", " quit")]);
        let text: String = spans.iter().map(|span| span.content.as_ref()).collect();
        assert_eq!(text, " a add q quit");
    }
}
