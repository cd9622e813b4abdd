//! Per-table configuration: how records become rows, how rows become request
//! bodies, and which endpoints a table talks to.
//!
//! [`RowFactory`] and [`PayloadMapper`] are the two seams a table is built
//! around. [`ColumnLayout`] implements both from a declarative column list,
//! which is all the sections in this crate need.

use cffc_types::timestamp::{UNSAVED_TIMESTAMP, display_timestamp};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Map, Number, Value};

use crate::button_bar::Commit;
use crate::error::EngineError;
use crate::lookup::{Choice, LookupCache};
use crate::row::{Cell, Live, Row, RowContent};

/// RFC 3986 unreserved bytes stay as they are; everything else is encoded.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Builds rows from backend records.
pub trait RowFactory: Send + Sync {
    /// Row content for `record`, or a blank row when `None`.
    fn build(&self, record: Option<&Value>) -> RowContent;

    /// Column titles, in cell order.
    fn headers(&self) -> Vec<&'static str>;

    /// Gives every editable cell a live value and focuses the first one.
    fn begin_edit(&self, row: &mut Row, lookups: &LookupCache);

    /// Copies live values over the static ones after a confirmed change
    /// the backend did not echo back.
    fn promote(&self, row: &mut Row);
}

/// Turns a row's live values into a request body.
pub trait PayloadMapper: Send + Sync {
    fn payload(&self, row: &Row, commit: Commit) -> Result<Value, EngineError>;
}

/// Renders a JSON scalar as plain text. `null` is empty.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Parses operator input as a JSON number. Input that is not numeric is sent
/// as typed and left for the backend to reject.
pub fn parse_number(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Value::Number(integer.into());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(trimmed.to_string()))
}

/// Options for a choice column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceSpec {
    /// Lookup list the options come from.
    pub lookup: &'static str,
    /// Field of the nested record shown in the table.
    pub label: &'static str,
    /// Keep only options whose record has `field == value`.
    pub only: Option<(&'static str, &'static str)>,
}

impl ChoiceSpec {
    pub const fn new(lookup: &'static str, label: &'static str) -> Self {
        Self {
            lookup,
            label,
            only: None,
        }
    }

    pub const fn only(mut self, field: &'static str, value: &'static str) -> Self {
        self.only = Some((field, value));
        self
    }

    fn accepts(&self, choice: &Choice) -> bool {
        match self.only {
            Some((field, value)) => choice
                .record
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|actual| actual.eq_ignore_ascii_case(value)),
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    /// Free text with suggestions from a lookup list.
    Suggest { lookup: &'static str },
    Number,
    /// ISO-8601 value shown truncated to the minute.
    Timestamp,
    /// Reference to another record, chosen from a lookup list.
    Choice(ChoiceSpec),
    /// One of a fixed set of strings.
    Fixed(&'static [&'static str]),
    /// Read-only summary of a nested list: `item` of every element of the
    /// list, joined with `separator`.
    Joined {
        item: &'static str,
        separator: &'static str,
    },
}

/// Where a column's live value goes in the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKey {
    Skip,
    /// `{"<key>": value}`; choices are sent as `{"<key>": {"id": ...}}`.
    Field(&'static str),
    /// The chosen record itself is the body.
    Record,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub label: &'static str,
    /// JSON pointers tried in order; the first non-null one wins.
    pub pointers: Vec<String>,
    pub kind: ColumnKind,
    pub editable: bool,
    pub payload: PayloadKey,
}

impl Column {
    pub fn new(name: &'static str, label: &'static str, kind: ColumnKind) -> Self {
        let editable = !matches!(kind, ColumnKind::Timestamp | ColumnKind::Joined { .. });
        Self {
            name,
            label,
            pointers: vec![format!("/{name}")],
            kind,
            editable,
            payload: if editable { PayloadKey::Field(name) } else { PayloadKey::Skip },
        }
    }

    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, ColumnKind::Text)
    }

    pub fn number(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, ColumnKind::Number)
    }

    pub fn timestamp(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, ColumnKind::Timestamp)
    }

    pub fn choice(name: &'static str, label: &'static str, options: ChoiceSpec) -> Self {
        Self::new(name, label, ColumnKind::Choice(options))
    }

    pub fn fixed(name: &'static str, label: &'static str, options: &'static [&'static str]) -> Self {
        Self::new(name, label, ColumnKind::Fixed(options))
    }

    pub fn suggest(name: &'static str, label: &'static str, lookup: &'static str) -> Self {
        Self::new(name, label, ColumnKind::Suggest { lookup })
    }

    pub fn joined(name: &'static str, label: &'static str, item: &'static str, separator: &'static str) -> Self {
        Self::new(name, label, ColumnKind::Joined { item, separator })
    }

    /// Reads the value from these pointers instead of `/<name>`.
    pub fn at(mut self, pointers: &[&str]) -> Self {
        self.pointers = pointers.iter().map(|pointer| pointer.to_string()).collect();
        self
    }

    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self.payload = PayloadKey::Skip;
        self
    }

    pub fn sent_as(mut self, payload: PayloadKey) -> Self {
        self.payload = payload;
        self
    }

    fn value_of(&self, record: &Value) -> Value {
        self.pointers
            .iter()
            .filter_map(|pointer| record.pointer(pointer))
            .find(|value| !value.is_null())
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Text shown for `value`. `unsaved` rows show a placeholder for the
    /// timestamps the server has yet to assign.
    fn display_of(&self, value: &Value, unsaved: bool) -> String {
        match &self.kind {
            ColumnKind::Text | ColumnKind::Suggest { .. } | ColumnKind::Number | ColumnKind::Fixed(_) => scalar_text(value),
            ColumnKind::Timestamp => {
                let text = scalar_text(value);
                if unsaved && text.trim().is_empty() {
                    UNSAVED_TIMESTAMP.to_string()
                } else {
                    display_timestamp(&text)
                }
            }
            ColumnKind::Choice(choice_spec) => match value {
                Value::Object(map) => map.get(choice_spec.label).map(scalar_text).unwrap_or_default(),
                other => scalar_text(other),
            },
            ColumnKind::Joined { item, separator } => value
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|entry| entry.pointer(item))
                        .map(scalar_text)
                        .filter(|text| !text.is_empty())
                        .collect::<Vec<_>>()
                        .join(*separator)
                })
                .unwrap_or_default(),
        }
    }

    fn live_for(&self, value: &Value, lookups: &LookupCache) -> Option<Live> {
        if !self.editable {
            return None;
        }
        let live = match &self.kind {
            ColumnKind::Text | ColumnKind::Number => Live::Text {
                text: scalar_text(value),
                suggestions: Vec::new(),
            },
            ColumnKind::Suggest { lookup } => Live::Text {
                text: scalar_text(value),
                suggestions: lookups.get(lookup).iter().map(|choice| choice.label.clone()).collect(),
            },
            ColumnKind::Choice(choice_spec) => {
                let options: Vec<Choice> = lookups.get(choice_spec.lookup).iter().filter(|choice| choice_spec.accepts(choice)).cloned().collect();
                let current = match value {
                    Value::Object(map) => map.get("id").map(scalar_text).unwrap_or_default(),
                    other => scalar_text(other),
                };
                let index = options.iter().position(|choice| !current.is_empty() && choice.id == current);
                Live::Choice { options, index }
            }
            ColumnKind::Fixed(options) => {
                let current = scalar_text(value);
                let options: Vec<Choice> = options.iter().map(|option| Choice::literal(option)).collect();
                let index = options.iter().position(|choice| choice.id.eq_ignore_ascii_case(&current));
                Live::Choice { options, index }
            }
            ColumnKind::Timestamp | ColumnKind::Joined { .. } => return None,
        };
        Some(live)
    }
}

/// A table described column by column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub columns: Vec<Column>,
    /// Update bodies repeat the record id (nested endpoints key on it).
    pub id_in_update: bool,
}

impl ColumnLayout {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            id_in_update: false,
        }
    }

    pub fn with_id_in_update(mut self) -> Self {
        self.id_in_update = true;
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

impl RowFactory for ColumnLayout {
    fn build(&self, record: Option<&Value>) -> RowContent {
        let unsaved = record.is_none();
        let record = record.cloned().unwrap_or(Value::Null);
        let id = record.get("id").map(scalar_text).unwrap_or_default();
        let cells = self
            .columns
            .iter()
            .map(|column| {
                let value = column.value_of(&record);
                Cell::new(column.name, column.display_of(&value, unsaved), value)
            })
            .collect();
        RowContent { id, record, cells }
    }

    fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|column| column.label).collect()
    }

    fn begin_edit(&self, row: &mut Row, lookups: &LookupCache) {
        for column in &self.columns {
            if let Some(cell) = row.cell_mut(column.name) {
                cell.live = column.live_for(&cell.value, lookups);
            }
        }
        row.focus_first();
    }

    fn promote(&self, row: &mut Row) {
        let mut adopted_id = None;
        for column in &self.columns {
            let Some(cell) = row.cell_mut(column.name) else {
                continue;
            };
            let Some(live) = cell.live.take() else {
                continue;
            };
            match (&column.kind, &live) {
                (ColumnKind::Number, Live::Text { text, .. }) => {
                    cell.value = parse_number(text);
                    cell.display = text.trim().to_string();
                }
                (_, Live::Text { text, .. }) => {
                    cell.value = Value::String(text.trim().to_string());
                    cell.display = text.trim().to_string();
                }
                (kind, Live::Choice { .. }) => match live.choice() {
                    Some(choice) => {
                        cell.value = choice.record.clone();
                        cell.display = match kind {
                            ColumnKind::Choice(choice_spec) => choice
                                .record
                                .get(choice_spec.label)
                                .map(scalar_text)
                                .unwrap_or_else(|| choice.label.clone()),
                            _ => choice.label.clone(),
                        };
                        if column.payload == PayloadKey::Record {
                            adopted_id = Some(choice.id.clone());
                        }
                    }
                    None => {
                        cell.value = Value::Null;
                        cell.display.clear();
                    }
                },
            }
        }
        if let Some(id) = adopted_id
            && !row.is_saved()
        {
            row.id = id;
        }
    }
}

impl PayloadMapper for ColumnLayout {
    fn payload(&self, row: &Row, commit: Commit) -> Result<Value, EngineError> {
        let mut body = Map::new();
        if commit == Commit::Update && self.id_in_update && row.is_saved() {
            body.insert("id".to_string(), Value::String(row.id.clone()));
        }
        for column in &self.columns {
            if column.payload == PayloadKey::Skip {
                continue;
            }
            let cell = row.cell(column.name).ok_or_else(|| EngineError::UnknownField(column.name.to_string()))?;
            let Some(live) = &cell.live else {
                continue;
            };
            match column.payload {
                PayloadKey::Field(key) => {
                    let value = match (&column.kind, live) {
                        (ColumnKind::Number, _) => parse_number(live.text()),
                        (ColumnKind::Choice(_), _) => live
                            .choice()
                            .map(|choice| serde_json::json!({ "id": choice.id }))
                            .unwrap_or(Value::Null),
                        (ColumnKind::Fixed(_), _) => live
                            .choice()
                            .map(|choice| Value::String(choice.id.clone()))
                            .unwrap_or(Value::Null),
                        (_, Live::Text { text, .. }) => Value::String(text.trim().to_string()),
                        (_, Live::Choice { .. }) => live
                            .choice()
                            .map(|choice| Value::String(choice.id.clone()))
                            .unwrap_or(Value::Null),
                    };
                    body.insert(key.to_string(), value);
                }
                PayloadKey::Record => match live.choice().map(|choice| &choice.record) {
                    Some(Value::Object(record)) => {
                        for (key, value) in record {
                            body.insert(key.clone(), value.clone());
                        }
                    }
                    Some(other) => {
                        body.insert("id".to_string(), other.clone());
                    }
                    None => {}
                },
                PayloadKey::Skip => {}
            }
        }
        Ok(Value::Object(body))
    }
}

/// An API path with `{parent}` and `{id}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate(String);

impl PathTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn needs_parent(&self) -> bool {
        self.0.contains("{parent}")
    }

    /// Substitutes placeholders, percent-encoding each value. Returns `None`
    /// when a placeholder has no value.
    pub fn render(&self, parent: Option<&str>, id: Option<&str>) -> Option<String> {
        let mut path = self.0.clone();
        for (placeholder, value) in [("{parent}", parent), ("{id}", id)] {
            if !path.contains(placeholder) {
                continue;
            }
            let value = value.filter(|value| !value.is_empty())?;
            let encoded = utf8_percent_encode(value, PATH_SEGMENT).to_string();
            path = path.replace(placeholder, &encoded);
        }
        Some(path)
    }
}

/// What a create or update answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// The canonical child record.
    Record,
    /// The parent record, carrying the full child list under the table's
    /// list field.
    Parent,
}

/// The endpoints one table talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub list: PathTemplate,
    /// Field of the list response holding the rows, for tables that read
    /// their rows out of a parent record.
    pub list_field: Option<&'static str>,
    pub create: Option<PathTemplate>,
    pub update: Option<PathTemplate>,
    pub delete: Option<PathTemplate>,
    pub answer: Answer,
}

impl Endpoints {
    /// `GET /{name}s`, `POST /{name}`, `PATCH|DELETE /{name}/{id}`.
    pub fn collection(name: &str) -> Self {
        Self {
            list: PathTemplate::new(format!("/{name}s")),
            list_field: None,
            create: Some(PathTemplate::new(format!("/{name}"))),
            update: Some(PathTemplate::new(format!("/{name}/{{id}}"))),
            delete: Some(PathTemplate::new(format!("/{name}/{{id}}"))),
            answer: Answer::Record,
        }
    }

    /// Rows read from `field` of the parent record at `list`. Mutations are
    /// added with the `with_*` builders.
    pub fn nested(list: &str, field: &'static str) -> Self {
        Self {
            list: PathTemplate::new(list),
            list_field: Some(field),
            create: None,
            update: None,
            delete: None,
            answer: Answer::Parent,
        }
    }

    pub fn with_create(mut self, template: &str) -> Self {
        self.create = Some(PathTemplate::new(template));
        self
    }

    pub fn with_update(mut self, template: &str) -> Self {
        self.update = Some(PathTemplate::new(template));
        self
    }

    pub fn with_delete(mut self, template: &str) -> Self {
        self.delete = Some(PathTemplate::new(template));
        self
    }

    pub fn answering(mut self, answer: Answer) -> Self {
        self.answer = answer;
        self
    }
}

/// Pulls the row records out of a list response.
///
/// Extraction order:
/// 1. `field` of an object payload, when configured (absent or `null` means
///    no rows).
/// 2. A top-level array.
/// 3. The single array-valued field of an object payload.
///
/// Returns `None` when the payload has no recognisable list.
pub fn extract_rows(payload: &Value, field: Option<&str>) -> Option<Vec<Value>> {
    if let Some(field) = field {
        return match payload.get(field) {
            Some(Value::Array(items)) => Some(items.clone()),
            Some(Value::Null) | None if payload.is_object() => Some(Vec::new()),
            _ => None,
        };
    }

    match payload {
        Value::Array(items) => Some(items.clone()),
        Value::Null => Some(Vec::new()),
        Value::Object(map) => {
            let mut arrays = map.values().filter_map(Value::as_array);
            let first = arrays.next()?;
            if arrays.next().is_none() {
                return Some(first.clone());
            }
            None
        }
        _ => None,
    }
}
