mod state;
mod table_component;

pub use state::{Hit, HitTarget, TablesState};
pub use table_component::{TableComponent, action_for_key, column_widths};
