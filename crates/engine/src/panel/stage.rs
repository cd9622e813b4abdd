use cffc_types::Route;

use crate::rowset::RowSet;
use crate::schema::{Column, ColumnLayout, Endpoints};

use super::Panel;

pub(super) fn panel() -> Panel {
    let stages = RowSet::new(
        "stage",
        ColumnLayout::new(vec![Column::text("name", "Name")]),
        Endpoints::collection("stage"),
    );
    Panel::new(Route::Stage, stages, &[])
}
