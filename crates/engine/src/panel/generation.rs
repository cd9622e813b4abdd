use cffc_types::Route;

use crate::button_bar::{Action, ButtonBar};
use crate::lookup::{EVENT_TYPES, LookupSource, STRAINS, SUBSTRATES};
use crate::rowset::RowSet;
use crate::schema::{ChoiceSpec, Column, ColumnLayout, Endpoints};

use super::lifecycle::event_table;
use super::{Dependent, Panel, SWITCH_DEPENDENT};

const LOOKUPS: &[LookupSource] = &[SUBSTRATES, STRAINS, EVENT_TYPES];

const SOURCE_TYPES: &[&str] = &["Spore", "Clone"];

pub(super) fn panel() -> Panel {
    let mut bar = ButtonBar::new();
    bar.subscribe(SWITCH_DEPENDENT);
    let generations = RowSet::new(
        "generation",
        ColumnLayout::new(vec![
            Column::joined("lineage", "Lineage", "/strain/name", " + ").at(&["/sources"]),
            Column::choice(
                "plating_substrate",
                "Plating",
                ChoiceSpec::new(SUBSTRATES.name, "name").only("type", "Agar"),
            ),
            Column::choice(
                "liquid_substrate",
                "Liquid",
                ChoiceSpec::new(SUBSTRATES.name, "name").only("type", "Liquid"),
            ),
            Column::timestamp("mtime", "Modified").at(&["/mtime", "/modified_date"]),
            Column::timestamp("ctime", "Created").at(&["/ctime", "/create_date"]),
        ]),
        Endpoints::collection("generation"),
    )
    .with_bar(bar);

    // Sources are added from a strain and never edited in place.
    let sources = RowSet::new(
        "source",
        ColumnLayout::new(vec![
            Column::fixed("type", "Type", SOURCE_TYPES),
            Column::choice("strain", "Strain", ChoiceSpec::new(STRAINS.name, "name")),
        ]),
        Endpoints::nested("/generation/{parent}", "sources")
            .with_create("/generation/{parent}/sources/strain")
            .with_delete("/generation/{parent}/sources/{id}"),
    )
    .with_bar(ButtonBar::new().without(&[Action::Edit]));

    Panel::new(Route::Generation, generations, LOOKUPS)
        .with_dependent(Dependent::new("Events", event_table("generation")))
        .with_dependent(Dependent::new("Sources", sources))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupCache;
    use cffc_types::{CallOutcome, ResourceRequest};
    use serde_json::json;

    #[test]
    fn lineage_lists_source_strains() {
        let mut panel = panel();
        let master = panel.master_mut();
        let call = master.refresh().expect("refresh");
        master.complete(CallOutcome::ok(
            call.ticket,
            json!([{"id": "g1", "sources": [{"type": "Spore", "strain": {"name": "Morel"}}, {"type": "Spore", "strain": {"name": "Reishi"}}]}]),
        ));
        assert_eq!(master.selected().and_then(|row| row.display("lineage")), Some("Morel + Reishi"));
    }

    #[test]
    fn source_create_posts_type_and_strain() {
        let mut panel = panel();
        let mut lookups = LookupCache::new();
        lookups.store(&STRAINS, &[json!({"id": "st1", "name": "Morel"})]);
        let sources = &mut panel.dependents.get_mut(1).expect("sources").table;
        let call = sources.rescope(Some("g1".into())).expect("rescope").expect("call");
        sources.complete(CallOutcome::ok(call.ticket, json!({"id": "g1", "sources": null})));
        assert!(sources.is_empty());

        sources.add(&lookups).expect("add");
        let draft = sources.draft_mut().expect("draft");
        draft.set_live("type", "Clone").expect("type");
        draft.set_live("strain", "st1").expect("strain");
        let call = sources.ok().expect("ok");
        assert_eq!(
            call.request,
            ResourceRequest::post("/generation/g1/sources/strain", json!({"type": "Clone", "strain": {"id": "st1"}}))
        );
    }

    #[test]
    fn master_bar_carries_dependent_switch() {
        let panel = panel();
        assert!(panel.master().bar().is_enabled(&Action::Custom(SWITCH_DEPENDENT.into())));
    }
}
