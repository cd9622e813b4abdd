use cffc_types::Route;

use crate::rowset::RowSet;
use crate::schema::{Column, ColumnLayout, Endpoints};

use super::Panel;

pub(super) fn panel() -> Panel {
    let vendors = RowSet::new(
        "vendor",
        ColumnLayout::new(vec![Column::text("name", "Name"), Column::text("website", "Website")]),
        Endpoints::collection("vendor"),
    );
    Panel::new(Route::Vendor, vendors, &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupCache;
    use cffc_types::{CallOutcome, ResourceRequest};
    use serde_json::json;

    #[test]
    fn vendor_edit_patches_by_id() {
        let mut panel = panel();
        let vendors = panel.master_mut();
        let call = vendors.refresh().expect("refresh");
        vendors.complete(CallOutcome::ok(
            call.ticket,
            json!([{"id": "v 1", "name": "Spore Depot", "website": "http://spores.example"}]),
        ));

        vendors.edit(&LookupCache::new()).expect("edit");
        vendors
            .draft_mut()
            .expect("draft")
            .set_live("website", "https://spores.example")
            .expect("website");
        let call = vendors.ok().expect("ok");
        assert_eq!(
            call.request,
            ResourceRequest::patch(
                "/vendor/v%201",
                json!({"name": "Spore Depot", "website": "https://spores.example"})
            )
        );
    }
}
