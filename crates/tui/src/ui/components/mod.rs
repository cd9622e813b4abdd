//! UI components of the terminal client.

pub mod component;
pub mod hint_bar;
pub mod logs;
pub mod nav_bar;
pub mod table;

pub(crate) use component::Component;
pub use hint_bar::render_hint_bar;
pub use logs::LogsComponent;
pub use nav_bar::VerticalNavBarComponent;
pub use table::TableComponent;

use ratatui::layout::{Position, Rect};

/// Index of the area under `(x, y)`, if the point lies inside `container`.
pub fn find_target_index_by_mouse_position(container: &Rect, areas: &[Rect], x: u16, y: u16) -> Option<usize> {
    let position = Position::new(x, y);
    if !container.contains(position) {
        return None;
    }
    areas.iter().position(|area| area.contains(position))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_hits_only_inside_the_container() {
        let container = Rect::new(0, 0, 20, 10);
        let areas = [Rect::new(1, 1, 18, 1), Rect::new(1, 2, 18, 1)];
        assert_eq!(find_target_index_by_mouse_position(&container, &areas, 5, 2), Some(1));
        assert_eq!(find_target_index_by_mouse_position(&container, &areas, 5, 5), None);
        assert_eq!(find_target_index_by_mouse_position(&container, &areas, 30, 1), None);
    }
}
