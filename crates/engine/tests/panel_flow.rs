use std::collections::{HashMap, VecDeque};

use anyhow::{Context, Result, bail};
use cffc_engine::{Action, CellInput, PanelUpdate, RemoteCall, Workspace};
use cffc_types::{CallOutcome, RequestMethod, ResourceRequest, Route};
use serde_json::{Value, json};

/// Answers requests from canned responses, in order, per method and path.
#[derive(Default)]
struct ScriptedBackend {
    responses: HashMap<(RequestMethod, String), VecDeque<Result<Value, String>>>,
    seen: Vec<ResourceRequest>,
}

impl ScriptedBackend {
    fn on(&mut self, method: RequestMethod, path: &str, response: Result<Value, String>) -> &mut Self {
        self.responses.entry((method, path.to_string())).or_default().push_back(response);
        self
    }

    fn answer(&mut self, call: &RemoteCall) -> Result<CallOutcome> {
        self.seen.push(call.request.clone());
        let key = (call.request.method, call.request.path.clone());
        let response = self
            .responses
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .with_context(|| format!("no scripted response for {}", call.request))?;
        Ok(CallOutcome {
            ticket: call.ticket,
            result: response,
        })
    }

    /// Executes calls until the workspace stops issuing new ones.
    fn drain(&mut self, workspace: &mut Workspace, update: PanelUpdate) -> Result<Vec<String>> {
        let mut queue: VecDeque<RemoteCall> = update.calls.into();
        let mut messages = update.messages;
        let mut rounds = 0;
        while let Some(call) = queue.pop_front() {
            rounds += 1;
            if rounds > 64 {
                bail!("request loop did not settle");
            }
            let outcome = self.answer(&call)?;
            let next = workspace.complete(outcome);
            queue.extend(next.calls);
            messages.extend(next.messages);
        }
        Ok(messages)
    }
}

fn strains() -> Value {
    json!([
        {"id": "s1", "name": "Morel", "species": "M.anatolica", "vendor": {"id": "v1", "name": "Spore Depot"}, "ctime": "2024-01-02T03:04:05Z"},
        {"id": "s2", "name": "Reishi", "species": "G.lingzhi", "vendor": {"id": "v2", "name": "Myco Supply"}, "ctime": "2024-02-03T04:05:06Z"}
    ])
}

fn strain_backend() -> ScriptedBackend {
    let mut backend = ScriptedBackend::default();
    backend
        .on(
            RequestMethod::Get,
            "/vendors",
            Ok(json!([{"id": "v1", "name": "Spore Depot"}, {"id": "v2", "name": "Myco Supply"}])),
        )
        .on(RequestMethod::Get, "/strainattributenames", Ok(json!(["colour", "flush"])))
        .on(RequestMethod::Get, "/strains", Ok(strains()))
        .on(
            RequestMethod::Get,
            "/strain/s1",
            Ok(json!({"id": "s1", "attributes": [{"id": "a1", "name": "colour", "value": "tan"}]})),
        )
        .on(RequestMethod::Get, "/strain/s2", Ok(json!({"id": "s2", "attributes": null})));
    backend
}

#[test]
fn activating_strains_loads_lookups_rows_and_attributes() -> Result<()> {
    let mut backend = strain_backend();
    let mut workspace = Workspace::new();

    let update = workspace.switch_to(Route::Strain);
    backend.drain(&mut workspace, update)?;

    let order: Vec<String> = backend.seen.iter().map(|request| request.path.clone()).collect();
    assert_eq!(order, vec!["/vendors", "/strainattributenames", "/strains", "/strain/s1"]);

    let panel = workspace.current().context("strain panel")?;
    assert_eq!(panel.master().selected_id().as_deref(), Some("s1"));
    assert_eq!(panel.master().rows()[0].display("ctime"), Some("2024-01-02 03:04"));
    let attributes = &panel.dependent().context("attributes")?.table;
    assert_eq!(attributes.selected().and_then(|row| row.display("value")), Some("tan"));
    Ok(())
}

#[test]
fn selecting_another_strain_reloads_attributes_for_it() -> Result<()> {
    let mut backend = strain_backend();
    let mut workspace = Workspace::new();
    let update = workspace.switch_to(Route::Strain);
    backend.drain(&mut workspace, update)?;

    let update = workspace.move_selection(1)?;
    assert_eq!(update.calls.len(), 1);
    assert_eq!(update.calls[0].request, ResourceRequest::get("/strain/s2"));
    backend.drain(&mut workspace, update)?;

    let panel = workspace.current().context("strain panel")?;
    assert_eq!(panel.master().selected_id().as_deref(), Some("s2"));
    assert!(panel.dependent().context("attributes")?.table.is_empty());
    Ok(())
}

#[test]
fn adding_a_strain_round_trips_through_the_backend() -> Result<()> {
    let mut backend = strain_backend();
    let mut workspace = Workspace::new();
    let update = workspace.switch_to(Route::Strain);
    backend.drain(&mut workspace, update)?;

    workspace.press(&Action::Add)?;
    for ch in "Shitake".chars() {
        assert!(workspace.input(CellInput::Char(ch)));
    }
    workspace.input(CellInput::NextCell);
    for ch in "L.edodes".chars() {
        workspace.input(CellInput::Char(ch));
    }
    workspace.input(CellInput::NextCell);
    workspace.input(CellInput::NextOption);
    workspace.input(CellInput::NextOption);

    backend
        .on(
            RequestMethod::Post,
            "/strain",
            Ok(json!({"id": "s3", "name": "Shitake", "species": "L.edodes", "vendor": {"id": "v2", "name": "Myco Supply"}, "ctime": "2024-03-01T00:00:00Z"})),
        )
        .on(RequestMethod::Get, "/strain/s3", Ok(json!({"id": "s3", "attributes": []})));

    let update = workspace.press(&Action::Ok)?;
    assert_eq!(
        update.calls[0].request,
        ResourceRequest::post(
            "/strain",
            json!({"name": "Shitake", "species": "L.edodes", "vendor": {"id": "v2"}})
        )
    );
    let messages = backend.drain(&mut workspace, update)?;
    assert!(messages.iter().any(|line| line == "created strain s3"));

    let panel = workspace.current().context("strain panel")?;
    let ids: Vec<&str> = panel.master().rows().iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, vec!["s3", "s1", "s2"]);
    assert_eq!(panel.master().selected_id().as_deref(), Some("s3"));
    assert!(panel.master().bar().is_enabled(&Action::Add));
    assert!(!panel.master().bar().is_enabled(&Action::Ok));
    assert_eq!(backend.seen.last().map(|request| request.path.as_str()), Some("/strain/s3"));
    Ok(())
}

#[test]
fn failed_delete_is_reported_and_leaves_rows() -> Result<()> {
    let mut backend = strain_backend();
    let mut workspace = Workspace::new();
    let update = workspace.switch_to(Route::Strain);
    backend.drain(&mut workspace, update)?;

    backend.on(
        RequestMethod::Delete,
        "/strain/s1",
        Err("HTTP 409 Conflict: strain is referenced by a lifecycle".into()),
    );
    let update = workspace.press(&Action::Remove)?;
    let messages = backend.drain(&mut workspace, update)?;
    assert_eq!(
        messages,
        vec!["failed to delete strain: HTTP 409 Conflict: strain is referenced by a lifecycle".to_string()]
    );

    let panel = workspace.current().context("strain panel")?;
    assert_eq!(panel.master().len(), 2);
    assert_eq!(panel.master().selected_id().as_deref(), Some("s1"));
    Ok(())
}

#[test]
fn lifecycle_event_added_from_parent_answer() -> Result<()> {
    let mut backend = ScriptedBackend::default();
    backend
        .on(RequestMethod::Get, "/strains", Ok(json!([])))
        .on(RequestMethod::Get, "/substrates", Ok(json!([])))
        .on(
            RequestMethod::Get,
            "/eventtypes",
            Ok(json!([{"id": "et1", "name": "Innoculation"}, {"id": "et2", "name": "Binning"}])),
        )
        .on(RequestMethod::Get, "/lifecycles", Ok(json!([{"id": "lc1", "location": "tent"}])))
        .on(
            RequestMethod::Get,
            "/lifecycle/lc1",
            Ok(json!({"id": "lc1", "events": [{"id": "e1", "event_type": {"id": "et1", "name": "Innoculation"}, "temperature": 77, "humidity": 12}]})),
        );

    let mut workspace = Workspace::new();
    let update = workspace.switch_to(Route::Lifecycle);
    backend.drain(&mut workspace, update)?;

    workspace.toggle_focus()?;
    workspace.press(&Action::Add)?;
    workspace.input(CellInput::NextOption);
    workspace.input(CellInput::NextOption);
    workspace.input(CellInput::NextCell);
    for ch in "74".chars() {
        workspace.input(CellInput::Char(ch));
    }
    workspace.input(CellInput::NextCell);
    for ch in "42".chars() {
        workspace.input(CellInput::Char(ch));
    }

    backend.on(
        RequestMethod::Post,
        "/lifecycle/lc1/events",
        Ok(json!({"id": "lc1", "events": [
            {"id": "e1", "event_type": {"id": "et1", "name": "Innoculation"}, "temperature": 77, "humidity": 12},
            {"id": "e2", "event_type": {"id": "et2", "name": "Binning"}, "temperature": 74, "humidity": 42}
        ]})),
    );
    let update = workspace.press(&Action::Ok)?;
    assert_eq!(
        update.calls[0].request.body,
        Some(json!({"event_type": {"id": "et2"}, "temperature": 74, "humidity": 42}))
    );
    backend.drain(&mut workspace, update)?;

    let panel = workspace.current().context("lifecycle panel")?;
    let events = &panel.dependent().context("events")?.table;
    assert_eq!(events.len(), 2);
    assert_eq!(events.selected_id().as_deref(), Some("e2"));
    assert_eq!(events.selected().and_then(|row| row.display("event_type")), Some("Binning"));
    Ok(())
}

#[test]
fn responses_for_a_left_section_are_ignored() -> Result<()> {
    let mut backend = strain_backend();
    backend.on(RequestMethod::Get, "/stages", Ok(json!([{"id": "st1", "name": "Pinning"}])));
    let mut workspace = Workspace::new();

    let strain_update = workspace.switch_to(Route::Strain);
    let stage_update = workspace.switch_to(Route::Stage);
    backend.drain(&mut workspace, stage_update)?;
    backend.drain(&mut workspace, strain_update)?;

    assert!(
        !backend.seen.iter().any(|request| request.path == "/strains"),
        "strain rows must not load after leaving the section"
    );
    let stage = workspace.current().context("stage panel")?;
    assert_eq!(stage.master().selected_id().as_deref(), Some("st1"));
    let strain = workspace.panel(Route::Strain).context("strain panel")?;
    assert!(strain.master().is_empty());
    Ok(())
}
