use cffc_types::Route;

use crate::rowset::RowSet;
use crate::schema::{Column, ColumnLayout, Endpoints};

use super::Panel;

/// The ingredient catalogue. Substrates reference these records.
pub(super) fn panel() -> Panel {
    Panel::new(
        Route::Ingredient,
        RowSet::new(
            "ingredient",
            ColumnLayout::new(vec![Column::text("name", "Name")]),
            Endpoints::collection("ingredient"),
        ),
        &[],
    )
}
