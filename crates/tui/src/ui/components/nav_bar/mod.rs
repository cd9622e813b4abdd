//! Vertical navigation bar listing the workspace sections.
//!
//! Each item carries a number key and integrates with rat-focus through a
//! [`FocusFlag`](rat_focus::FocusFlag) per item, so the list can be walked
//! with the arrow keys or clicked.

mod nav_bar_component;
mod state;

pub use nav_bar_component::VerticalNavBarComponent;
pub use state::{NavItem, VerticalNavBarState};
