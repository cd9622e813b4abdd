//! Shared type definitions for the CFFC admin client.
//!
//! These types cross crate boundaries: the engine produces [`RemoteCall`]s,
//! the API crate executes [`ResourceRequest`]s, and the terminal front end
//! moves [`Msg`]s and [`Effect`]s between its components.

mod messages;
mod request;
mod route;
pub mod timestamp;

pub use messages::{Effect, Msg};
pub use request::{CallOutcome, RemoteCall, RequestMethod, ResourceRequest, Ticket};
pub use route::{ParseRouteError, Route};
