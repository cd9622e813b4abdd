//! # CFFC Engine
//!
//! The editable-table engine behind every section of the CFFC admin client.
//!
//! ## Key pieces
//!
//! - **`RowSet`**: ordered rows with single selection, add/edit/delete
//!   orchestration, and a guard that drops answers meant for a state the
//!   table has already left
//! - **`ButtonBar`**: which actions are available, and the armed
//!   confirm/discard protocol while a draft exists
//! - **`schema`**: the `RowFactory`/`PayloadMapper` strategies, declared
//!   column by column, plus endpoint templates
//! - **`LookupCache`**: option lists for choice cells, fetched before rows
//!   that need them are edited
//! - **`panel`**: the seven sections, each a master table with optional
//!   dependent tables
//!
//! Nothing here performs I/O. Operations hand back
//! [`cffc_types::RemoteCall`]s and accept [`cffc_types::CallOutcome`]s, which
//! keeps every state transition synchronous and testable.
//!
//! ```rust
//! use cffc_engine::{Action, CallOutcome, Workspace};
//! use cffc_types::Route;
//! use serde_json::json;
//!
//! let mut workspace = Workspace::new();
//! let update = workspace.switch_to(Route::Stage);
//! let refresh = &update.calls[0];
//! workspace.complete(CallOutcome::ok(refresh.ticket, json!([{"id": "1", "name": "Pinning"}])));
//!
//! let panel = workspace.current().expect("stage panel");
//! assert_eq!(panel.master().selected_id().as_deref(), Some("1"));
//! assert!(panel.master().bar().is_enabled(&Action::Edit));
//! ```

pub mod button_bar;
mod error;
pub mod lookup;
pub mod panel;
pub mod pending;
pub mod row;
pub mod rowset;
pub mod schema;

pub use button_bar::{Action, BarMode, ButtonBar, Commit, Discard, Dispatch, Handlers};
pub use cffc_types::{CallOutcome, RemoteCall};
pub use error::EngineError;
pub use lookup::{Choice, LookupCache, LookupResolved, LookupSource, LookupStatus};
pub use panel::{Dependent, Panel, PanelUpdate, TableFocus, Workspace};
pub use pending::PendingEdit;
pub use row::{Cell, Live, Row, RowContent, RowKey};
pub use rowset::{CellInput, Operation, Reaction, RowSet, TableEvent};
pub use schema::{Answer, Column, ColumnKind, ColumnLayout, Endpoints, PathTemplate, PayloadMapper, RowFactory};
