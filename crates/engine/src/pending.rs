use crate::row::{Row, RowKey};

/// The one draft a table may hold between `add`/`edit` and its confirmation
/// or cancellation.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingEdit {
    /// An unsaved row; discarding it removes the row.
    Adding { key: RowKey },
    /// An existing row being changed; discarding it puts `snapshot` back.
    Editing { key: RowKey, snapshot: Box<Row> },
}

impl PendingEdit {
    pub fn key(&self) -> RowKey {
        match self {
            PendingEdit::Adding { key } | PendingEdit::Editing { key, .. } => *key,
        }
    }

    pub fn is_adding(&self) -> bool {
        matches!(self, PendingEdit::Adding { .. })
    }
}
