//! Terminal front end of the CFFC admin client.
//!
//! [`run`] takes over the terminal and shows the workspace sections,
//! executing every request the engine issues through the given
//! [`RemoteResource`].

mod app;
mod cmd;
pub mod ui;

use std::sync::Arc;

use anyhow::Result;
use cffc_api::RemoteResource;
use cffc_types::Route;

/// Runs the UI until the user quits, starting on `initial`.
pub async fn run(resource: Arc<dyn RemoteResource>, initial: Route) -> Result<()> {
    ui::runtime::run_app(resource, initial).await
}
