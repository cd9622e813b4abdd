//! Terminal user interface: components, theme and the runtime loop.

pub mod components;
pub mod main_component;
pub mod runtime;
pub mod theme;
