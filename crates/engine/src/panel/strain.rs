use cffc_types::Route;

use crate::lookup::{LookupSource, STRAIN_ATTRIBUTE_NAMES, VENDORS};
use crate::rowset::RowSet;
use crate::schema::{ChoiceSpec, Column, ColumnLayout, Endpoints};

use super::{Dependent, Panel};

const LOOKUPS: &[LookupSource] = &[VENDORS, STRAIN_ATTRIBUTE_NAMES];

pub(super) fn panel() -> Panel {
    let strains = RowSet::new(
        "strain",
        ColumnLayout::new(vec![
            Column::text("name", "Name"),
            Column::text("species", "Species"),
            Column::choice("vendor", "Vendor", ChoiceSpec::new(VENDORS.name, "name")),
            Column::timestamp("ctime", "Created").at(&["/ctime", "/create_date"]),
        ]),
        Endpoints::collection("strain"),
    );

    // Attribute PATCH identifies the attribute by the id in the body.
    let attributes = RowSet::new(
        "strain attribute",
        ColumnLayout::new(vec![
            Column::suggest("name", "Attribute", STRAIN_ATTRIBUTE_NAMES.name),
            Column::text("value", "Value"),
        ])
        .with_id_in_update(),
        Endpoints::nested("/strain/{parent}", "attributes")
            .with_create("/strain/{parent}/attribute")
            .with_update("/strain/{parent}/attribute")
            .with_delete("/strain/{parent}/attribute/{id}"),
    );

    Panel::new(Route::Strain, strains, LOOKUPS).with_dependent(Dependent::new("Attributes", attributes))
}
