use cffc_types::Route;

use crate::button_bar::{Action, ButtonBar};
use crate::lookup::{INGREDIENTS, LookupSource, VENDORS};
use crate::rowset::RowSet;
use crate::schema::{ChoiceSpec, Column, ColumnLayout, Endpoints, PayloadKey};

use super::{Dependent, Panel};

const LOOKUPS: &[LookupSource] = &[VENDORS, INGREDIENTS];

/// Substrate kinds the backend distinguishes. Generations plate on agar and
/// expand into liquid culture; lifecycles use grain and bulk.
pub(crate) const SUBSTRATE_TYPES: &[&str] = &["Grain", "Bulk", "Agar", "Liquid"];

pub(super) fn panel() -> Panel {
    let substrates = RowSet::new(
        "substrate",
        ColumnLayout::new(vec![
            Column::text("name", "Name"),
            Column::fixed("type", "Type", SUBSTRATE_TYPES),
            Column::choice("vendor", "Vendor", ChoiceSpec::new(VENDORS.name, "name")),
        ]),
        Endpoints::collection("substrate"),
    );

    // An ingredient row is the ingredient record itself; adding one posts
    // the chosen ingredient.
    let ingredients = RowSet::new(
        "substrate ingredient",
        ColumnLayout::new(vec![
            Column::choice("ingredient", "Ingredient", ChoiceSpec::new(INGREDIENTS.name, "name"))
                .at(&[""])
                .sent_as(PayloadKey::Record),
        ]),
        Endpoints::nested("/substrate/{parent}", "ingredients")
            .with_create("/substrate/{parent}/ingredients")
            .with_delete("/substrate/{parent}/ingredients/{id}"),
    )
    .with_bar(ButtonBar::new().without(&[Action::Edit, Action::Refresh]));

    Panel::new(Route::Substrate, substrates, LOOKUPS).with_dependent(Dependent::new("Ingredients", ingredients))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupCache;
    use cffc_types::{CallOutcome, ResourceRequest};
    use serde_json::json;

    #[test]
    fn ingredient_bar_offers_add_and_remove_only() {
        let panel = panel();
        let bar = panel.dependents()[0].table.bar();
        let labels: Vec<&str> = bar.actions().map(|(action, _)| action.label()).collect();
        assert_eq!(labels, vec!["remove", "ok", "cancel", "add"]);
    }

    #[test]
    fn adding_an_ingredient_posts_the_chosen_record() {
        let mut panel = panel();
        let mut lookups = LookupCache::new();
        lookups.store(&INGREDIENTS, &[json!({"id": "i1", "name": "Gypsum"}), json!({"id": "i2", "name": "Vermiculite"})]);

        let table = &mut panel.dependent_mut().expect("ingredients").table;
        let call = table.rescope(Some("sub-1".into())).expect("rescope").expect("call");
        table.complete(CallOutcome::ok(call.ticket, json!({"id": "sub-1", "ingredients": [{"id": "i1", "name": "Gypsum"}]})));

        table.add(&lookups).expect("add");
        table.draft_mut().expect("draft").set_live("ingredient", "Vermiculite").expect("ingredient");
        let call = table.ok().expect("ok");
        assert_eq!(
            call.request,
            ResourceRequest::post("/substrate/sub-1/ingredients", json!({"id": "i2", "name": "Vermiculite"}))
        );

        table.complete(CallOutcome::ok(
            call.ticket,
            json!({"id": "sub-1", "ingredients": [{"id": "i1", "name": "Gypsum"}, {"id": "i2", "name": "Vermiculite"}]}),
        ));
        assert_eq!(table.selected_id().as_deref(), Some("i2"));
        assert_eq!(table.selected().and_then(|row| row.display("ingredient")), Some("Vermiculite"));
    }
}
