//! # Command Execution Layer
//!
//! The boundary where the synchronous engine meets I/O. Components and
//! panels describe work as [`Effect`]s; this module turns the effectful ones
//! into [`Cmd`]s and runs them:
//!
//! - [`Cmd::Remote`] spawns the request on the Tokio runtime. Its
//!   [`CallOutcome`] comes back through the runtime loop as
//!   [`Msg::CallCompleted`](cffc_types::Msg::CallCompleted).
//! - [`Cmd::Log`] appends a status line.
//!
//! Navigation effects (`SwitchTo`, `Quit`) never reach this layer; the
//! runtime handles them before commands are built.

use std::sync::Arc;

use cffc_api::RemoteResource;
use cffc_types::{CallOutcome, Effect, RemoteCall};
use futures_util::stream::FuturesUnordered;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::app::App;

#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Execute a ticketed request against the backend.
    Remote(RemoteCall),
    /// Append a line to the status log.
    Log(String),
}

/// Keeps the effects that need I/O, in order.
pub fn from_effects(effects: Vec<Effect>) -> Vec<Cmd> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::Remote(call) => Some(Cmd::Remote(call)),
            Effect::Log(line) => Some(Cmd::Log(line)),
            Effect::SwitchTo(_) | Effect::Quit => None,
        })
        .collect()
}

/// Runs commands. Remote calls are spawned and pushed onto `pending`.
pub fn run_cmds(
    app: &mut App,
    cmds: Vec<Cmd>,
    resource: &Arc<dyn RemoteResource>,
    pending: &mut FuturesUnordered<JoinHandle<CallOutcome>>,
) {
    for cmd in cmds {
        match cmd {
            Cmd::Remote(call) => {
                debug!(ticket = %call.ticket, request = %call.request, "spawning request");
                let resource = Arc::clone(resource);
                app.in_flight += 1;
                pending.push(tokio::spawn(async move { resource.call(call).await }));
            }
            Cmd::Log(line) => app.logs.info(line),
        }
    }
}
