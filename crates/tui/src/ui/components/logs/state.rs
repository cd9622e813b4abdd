use std::collections::VecDeque;

use chrono::{DateTime, Local};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

/// Oldest lines are dropped beyond this many.
pub const MAX_LOG_ENTRIES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// One status line.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

/// Status lines shown in the bottom pane, newest last.
#[derive(Debug)]
pub struct LogsState {
    pub entries: VecDeque<LogEntry>,
    /// Lines scrolled up from the bottom.
    pub scroll: usize,
    /// Focus flag for rat-focus integration
    pub focus: FocusFlag,
    pub last_area: Rect,
}

impl Default for LogsState {
    fn default() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_LOG_ENTRIES),
            scroll: 0,
            focus: FocusFlag::named("root.logs"),
            last_area: Rect::default(),
        }
    }
}

impl LogsState {
    pub fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        if self.entries.len() == MAX_LOG_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            at: Local::now(),
            level,
            message: message.into(),
        });
        // New lines pull the view back to the bottom.
        self.scroll = 0;
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Error, message);
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = (self.scroll + lines).min(self.entries.len().saturating_sub(1));
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// The entries that fit in `height` rows, honouring the scroll offset.
    pub fn visible(&self, height: usize) -> impl Iterator<Item = &LogEntry> {
        let end = self.entries.len().saturating_sub(self.scroll);
        let start = end.saturating_sub(height);
        self.entries.range(start..end)
    }
}

impl HasFocus for LogsState {
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
