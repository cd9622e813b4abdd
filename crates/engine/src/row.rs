use serde_json::Value;

use crate::error::EngineError;
use crate::lookup::Choice;

/// Table-local identity of a row. Unlike the record id it exists before the
/// backend has assigned one, and it never changes while the row is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey(pub u64);

/// The in-progress value of an editable cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Live {
    Text { text: String, suggestions: Vec<String> },
    Choice { options: Vec<Choice>, index: Option<usize> },
}

impl Live {
    pub fn text(&self) -> &str {
        match self {
            Live::Text { text, .. } => text,
            Live::Choice { .. } => self.choice().map(|choice| choice.label.as_str()).unwrap_or(""),
        }
    }

    pub fn choice(&self) -> Option<&Choice> {
        match self {
            Live::Choice { options, index } => index.and_then(|index| options.get(index)),
            Live::Text { .. } => None,
        }
    }
}

/// One field of a row: what the table shows, the value it came from, and,
/// while the row is being edited, the live value.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub column: &'static str,
    pub display: String,
    pub value: Value,
    pub live: Option<Live>,
}

impl Cell {
    pub fn new(column: &'static str, display: impl Into<String>, value: Value) -> Self {
        Self {
            column,
            display: display.into(),
            value,
            live: None,
        }
    }
}

/// What a row factory produces from one record.
#[derive(Debug, Clone, PartialEq)]
pub struct RowContent {
    pub id: String,
    pub record: Value,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    key: RowKey,
    pub id: String,
    pub record: Value,
    pub cells: Vec<Cell>,
    pub selected: bool,
    pub editing: bool,
    pub adding: bool,
    focus: Option<usize>,
}

impl Row {
    pub fn new(key: RowKey, content: RowContent) -> Self {
        Self {
            key,
            id: content.id,
            record: content.record,
            cells: content.cells,
            selected: false,
            editing: false,
            adding: false,
            focus: None,
        }
    }

    pub fn key(&self) -> RowKey {
        self.key
    }

    /// Whether the backend knows this row.
    pub fn is_saved(&self) -> bool {
        !self.id.is_empty()
    }

    /// Swaps in freshly built content, keeping identity and selection.
    pub fn replace_content(&mut self, content: RowContent) {
        self.id = content.id;
        self.record = content.record;
        self.cells = content.cells;
        self.focus = None;
    }

    pub fn cell(&self, column: &str) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.column == column)
    }

    pub fn cell_mut(&mut self, column: &str) -> Option<&mut Cell> {
        self.cells.iter_mut().find(|cell| cell.column == column)
    }

    pub fn display(&self, column: &str) -> Option<&str> {
        self.cell(column).map(|cell| cell.display.as_str())
    }

    pub fn focus_index(&self) -> Option<usize> {
        self.focus
    }

    pub fn focused(&self) -> Option<&Cell> {
        self.focus.and_then(|index| self.cells.get(index))
    }

    fn live_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.live.is_some())
            .map(|(index, _)| index)
            .collect()
    }

    /// Puts focus on the first editable cell.
    pub fn focus_first(&mut self) {
        self.focus = self.live_indices().first().copied();
    }

    /// Moves focus to the next (or previous) editable cell, wrapping.
    pub fn focus_step(&mut self, forward: bool) {
        let live = self.live_indices();
        if live.is_empty() {
            self.focus = None;
            return;
        }
        let position = self.focus.and_then(|focus| live.iter().position(|index| *index == focus));
        let next = match (position, forward) {
            (None, _) => 0,
            (Some(position), true) => (position + 1) % live.len(),
            (Some(position), false) => (position + live.len() - 1) % live.len(),
        };
        self.focus = Some(live[next]);
    }

    fn focused_live(&mut self) -> Option<&mut Live> {
        let index = self.focus?;
        self.cells.get_mut(index)?.live.as_mut()
    }

    /// Types a character into the focused text cell.
    pub fn input_char(&mut self, ch: char) -> bool {
        match self.focused_live() {
            Some(Live::Text { text, .. }) => {
                text.push(ch);
                true
            }
            _ => false,
        }
    }

    pub fn backspace(&mut self) -> bool {
        match self.focused_live() {
            Some(Live::Text { text, .. }) => text.pop().is_some(),
            _ => false,
        }
    }

    /// Steps the focused cell through its options. Text cells with
    /// suggestions take the next suggestion as their text.
    pub fn cycle_choice(&mut self, forward: bool) -> bool {
        match self.focused_live() {
            Some(Live::Choice { options, index }) => {
                if options.is_empty() {
                    return false;
                }
                *index = Some(step(*index, options.len(), forward));
                true
            }
            Some(Live::Text { text, suggestions }) => {
                if suggestions.is_empty() {
                    return false;
                }
                let current = suggestions.iter().position(|suggestion| *suggestion == *text);
                *text = suggestions[step(current, suggestions.len(), forward)].clone();
                true
            }
            None => false,
        }
    }

    /// Sets a live value directly. Choice cells accept an option id or label.
    pub fn set_live(&mut self, column: &str, value: &str) -> Result<(), EngineError> {
        let unknown = || EngineError::UnknownField(column.to_string());
        let live = self.cell_mut(column).and_then(|cell| cell.live.as_mut()).ok_or_else(unknown)?;
        match live {
            Live::Text { text, .. } => {
                *text = value.to_string();
                Ok(())
            }
            Live::Choice { options, index } => {
                let found = options
                    .iter()
                    .position(|choice| choice.id == value || choice.label == value)
                    .ok_or_else(|| EngineError::UnknownField(format!("{column}={value}")))?;
                *index = Some(found);
                Ok(())
            }
        }
    }

    pub fn live_text(&self, column: &str) -> Option<&str> {
        self.cell(column).and_then(|cell| cell.live.as_ref()).map(Live::text)
    }

    /// Leaves edit mode without touching the static values.
    pub fn clear_live(&mut self) {
        for cell in &mut self.cells {
            cell.live = None;
        }
        self.focus = None;
        self.editing = false;
        self.adding = false;
    }
}

fn step(current: Option<usize>, len: usize, forward: bool) -> usize {
    match (current, forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(index), true) => (index + 1) % len,
        (Some(index), false) => (index + len - 1) % len,
    }
}
