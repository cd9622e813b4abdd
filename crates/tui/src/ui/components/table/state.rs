use cffc_engine::{Action, TableFocus};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::{
    layout::{Position, Rect},
    widgets::TableState,
};

/// Something clickable drawn by the table pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    Row { table: TableFocus, index: usize },
    Button { table: TableFocus, action: Action },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub area: Rect,
    pub target: HitTarget,
}

/// View state of the centre pane: scroll offsets of both tables and the
/// clickable areas of the last frame.
#[derive(Debug)]
pub struct TablesState {
    pub focus: FocusFlag,
    pub master_view: TableState,
    pub dependent_view: TableState,
    pub hits: Vec<Hit>,
    pub last_area: Rect,
}

impl Default for TablesState {
    fn default() -> Self {
        Self {
            focus: FocusFlag::named("root.tables"),
            master_view: TableState::default(),
            dependent_view: TableState::default(),
            hits: Vec::new(),
            last_area: Rect::default(),
        }
    }
}

impl TablesState {
    pub fn hit_test(&self, column: u16, row: u16) -> Option<&HitTarget> {
        let position = Position::new(column, row);
        self.hits.iter().find(|hit| hit.area.contains(position)).map(|hit| &hit.target)
    }

    /// A section switch starts both tables from the top.
    pub fn reset(&mut self) {
        self.master_view = TableState::default();
        self.dependent_view = TableState::default();
        self.hits.clear();
    }
}

impl HasFocus for TablesState {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.focus.clone()
    }

    fn area(&self) -> Rect {
        self.last_area
    }
}
