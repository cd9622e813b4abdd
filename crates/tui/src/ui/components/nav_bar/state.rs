use cffc_types::Route;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

/// A single entry in the section list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    /// Shortcut shown in front of the label ("1", "2", ...).
    pub key: char,
    pub label: String,
    pub route: Route,
}

impl NavItem {
    pub fn new(key: char, label: impl Into<String>, route: Route) -> Self {
        Self {
            key,
            label: label.into(),
            route,
        }
    }
}

/// State for the vertical navigation bar.
///
/// Owns the items, the selected section, and rat-focus flags for the
/// container and each item.
#[derive(Debug, Default, Clone)]
pub struct VerticalNavBarState {
    pub items: Vec<NavItem>,
    /// Index of the section currently shown.
    pub selected_index: usize,
    /// Focus flag for the container in the global focus tree.
    pub container_focus: FocusFlag,
    /// Focus flags for each item; kept in sync with `items` length.
    pub item_focus_flags: Vec<FocusFlag>,
    /// Last rendered area of the nav bar; used for hit testing.
    pub last_area: Rect,
    /// Last computed per-item row areas for hit testing.
    pub per_item_areas: Vec<Rect>,
}

impl VerticalNavBarState {
    pub fn new(items: Vec<NavItem>) -> Self {
        let mut state = Self {
            items,
            selected_index: 0,
            container_focus: FocusFlag::named("root.nav"),
            item_focus_flags: Vec::new(),
            last_area: Rect::default(),
            per_item_areas: Vec::new(),
        };
        state.rebuild_item_focus_flags();
        state
    }

    /// One item per section, numbered in navigation order.
    pub fn sections() -> Self {
        Self::new(
            Route::ALL
                .iter()
                .zip('1'..='9')
                .map(|(route, key)| NavItem::new(key, route.label(), *route))
                .collect(),
        )
    }

    pub fn rebuild_item_focus_flags(&mut self) {
        let length = self.items.len();
        self.item_focus_flags = (0..length).map(|i| FocusFlag::named(&format!("root.nav.item.{i}"))).collect();
        if length == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= length {
            self.selected_index = length - 1;
        }
    }

    pub fn get_focused_list_item(&self) -> Option<(NavItem, usize)> {
        let index = self.item_focus_flags.iter().position(|flag| flag.get())?;
        self.items.get(index).map(|item| (item.clone(), index))
    }

    /// The neighbouring item flag, wrapping at both ends.
    pub fn cycle_focus(&self, forward: bool) -> Option<FocusFlag> {
        let len = self.item_focus_flags.len();
        if len == 0 {
            return None;
        }
        let current = self.item_focus_flags.iter().position(|flag| flag.get()).unwrap_or(self.selected_index);
        let next = if forward { (current + 1) % len } else { (current + len - 1) % len };
        self.item_focus_flags.get(next).cloned()
    }

    /// Marks `route` as the shown section.
    pub fn set_route(&mut self, route: Route) -> Route {
        if let Some(index) = self.items.iter().position(|item| item.route == route) {
            self.selected_index = index;
        }
        route
    }

    /// The section bound to a shortcut key.
    pub fn route_for_key(&self, key: char) -> Option<Route> {
        self.items.iter().find(|item| item.key == key).map(|item| item.route)
    }
}

impl HasFocus for VerticalNavBarState {
    /// Builds a focus subtree consisting of each item as a leaf under the
    /// container focus flag.
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        for flag in &self.item_focus_flags {
            builder.leaf_widget(flag);
        }
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        self.last_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_are_numbered_in_route_order() {
        let state = VerticalNavBarState::sections();
        assert_eq!(state.items.len(), Route::ALL.len());
        assert_eq!(state.items[0].key, '1');
        assert_eq!(state.route_for_key('3'), Some(Route::Lifecycle));
        assert_eq!(state.route_for_key('7'), Some(Route::Ingredient));
        assert_eq!(state.route_for_key('8'), None);
    }

    #[test]
    fn set_route_moves_selection() {
        let mut state = VerticalNavBarState::sections();
        state.set_route(Route::Vendor);
        assert_eq!(state.selected_index, 4);
    }

    #[test]
    fn cycle_focus_wraps_from_the_selected_item() {
        let mut state = VerticalNavBarState::sections();
        state.selected_index = 0;
        let previous = state.cycle_focus(false).expect("flag");
        assert_eq!(previous.widget_id(), state.item_focus_flags[6].widget_id());
        let next = state.cycle_focus(true).expect("flag");
        assert_eq!(next.widget_id(), state.item_focus_flags[1].widget_id());
    }
}
