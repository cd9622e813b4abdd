use cffc_types::Route;

use crate::lookup::{EVENT_TYPES, LookupSource, STRAINS, SUBSTRATES};
use crate::rowset::RowSet;
use crate::schema::{ChoiceSpec, Column, ColumnLayout, Endpoints};

use super::{Dependent, Panel};

const LOOKUPS: &[LookupSource] = &[STRAINS, SUBSTRATES, EVENT_TYPES];

/// Events of a lifecycle or generation. Both owners expose the same nested
/// endpoints and answer with the owner record.
pub(super) fn event_table(owner: &str) -> RowSet {
    RowSet::new(
        "event",
        ColumnLayout::new(vec![
            Column::choice("event_type", "Event", ChoiceSpec::new(EVENT_TYPES.name, "name")),
            Column::number("temperature", "Temp"),
            Column::number("humidity", "Humidity"),
            Column::timestamp("mtime", "Modified").at(&["/mtime", "/modified_date"]),
            Column::timestamp("ctime", "Created").at(&["/ctime", "/create_date"]),
        ])
        .with_id_in_update(),
        Endpoints::nested(&format!("/{owner}/{{parent}}"), "events")
            .with_create(&format!("/{owner}/{{parent}}/events"))
            .with_update(&format!("/{owner}/{{parent}}/events"))
            .with_delete(&format!("/{owner}/{{parent}}/events/{{id}}")),
    )
}

pub(super) fn panel() -> Panel {
    let lifecycles = RowSet::new(
        "lifecycle",
        ColumnLayout::new(vec![
            Column::text("location", "Location"),
            Column::choice("strain", "Strain", ChoiceSpec::new(STRAINS.name, "name")),
            Column::choice(
                "grain_substrate",
                "Grain",
                ChoiceSpec::new(SUBSTRATES.name, "name").only("type", "Grain"),
            ),
            Column::choice(
                "bulk_substrate",
                "Bulk",
                ChoiceSpec::new(SUBSTRATES.name, "name").only("type", "Bulk"),
            ),
            Column::number("strain_cost", "Strain $"),
            Column::number("grain_cost", "Grain $"),
            Column::number("bulk_cost", "Bulk $"),
            Column::number("yield", "Yield"),
            Column::number("count", "Count"),
            Column::number("gross", "Gross"),
            Column::timestamp("mtime", "Modified").at(&["/mtime", "/modified_date"]),
            Column::timestamp("ctime", "Created").at(&["/ctime", "/create_date"]),
        ]),
        Endpoints::collection("lifecycle"),
    );

    Panel::new(Route::Lifecycle, lifecycles, LOOKUPS).with_dependent(Dependent::new("Events", event_table("lifecycle")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupCache;
    use crate::row::Live;
    use cffc_types::{CallOutcome, ResourceRequest};
    use serde_json::json;

    fn lookups() -> LookupCache {
        let mut lookups = LookupCache::new();
        lookups.store(
            &EVENT_TYPES,
            &[json!({"id": "et1", "name": "Pinning", "stage": {"name": "Fruiting"}}), json!({"id": "et2", "name": "Harvest"})],
        );
        lookups.store(
            &SUBSTRATES,
            &[
                json!({"id": "rye", "name": "Rye", "type": "Grain", "vendor": {"name": "A"}}),
                json!({"id": "coir", "name": "Coir", "type": "Bulk", "vendor": {"name": "B"}}),
            ],
        );
        lookups
    }

    #[test]
    fn event_update_sends_id_and_numbers() {
        let mut events = event_table("lifecycle");
        let call = events.rescope(Some("lc1".into())).expect("rescope").expect("call");
        assert_eq!(call.request, ResourceRequest::get("/lifecycle/lc1"));
        events.complete(CallOutcome::ok(
            call.ticket,
            json!({"id": "lc1", "events": [{
                "id": "e1",
                "event_type": {"id": "et1", "name": "Pinning"},
                "temperature": 72,
                "humidity": 90,
                "modified_date": "2024-05-02T08:15:00Z",
                "create_date": "2024-05-01T08:15:00Z"
            }]}),
        ));
        let row = events.selected().expect("event row");
        assert_eq!(row.display("event_type"), Some("Pinning"));
        assert_eq!(row.display("mtime"), Some("2024-05-02 08:15"));

        events.edit(&lookups()).expect("edit");
        let draft = events.draft_mut().expect("draft");
        draft.set_live("humidity", "95").expect("humidity");
        draft.set_live("event_type", "Harvest").expect("event type");
        let call = events.ok().expect("ok");
        assert_eq!(
            call.request,
            ResourceRequest::patch(
                "/lifecycle/lc1/events",
                json!({"id": "e1", "event_type": {"id": "et2"}, "temperature": 72, "humidity": 95})
            )
        );
    }

    #[test]
    fn substrate_choices_are_split_by_type() {
        let mut panel = panel();
        let master = panel.master_mut();
        let call = master.refresh().expect("refresh");
        master.complete(CallOutcome::ok(
            call.ticket,
            json!([{"id": "lc1", "location": "tent", "grain_substrate": {"id": "rye", "name": "Rye"}}]),
        ));
        master.edit(&lookups()).expect("edit");

        let row = master.selected().expect("lifecycle row");
        let options = |column: &str| match row.cell(column).and_then(|cell| cell.live.as_ref()) {
            Some(Live::Choice { options, .. }) => options.iter().map(|choice| choice.id.clone()).collect::<Vec<_>>(),
            other => panic!("expected choice cell, got {other:?}"),
        };
        assert_eq!(options("grain_substrate"), vec!["rye"]);
        assert_eq!(options("bulk_substrate"), vec!["coir"]);
        assert_eq!(row.live_text("grain_substrate"), Some("Rye | Vendor: A"));
    }
}
