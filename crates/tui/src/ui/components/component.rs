//! Component system for the CFFC terminal client.
//!
//! Components are self-contained UI elements. They read and mutate the
//! shared [`App`] state, render themselves into a provided `Rect`, and report
//! anything effectful back to the runtime as [`Effect`]s instead of doing it
//! themselves.
//!
//! # Component Lifecycle
//!
//! 1. **Event Handling**: input arrives through `handle_key_events()` and
//!    `handle_mouse_events()`
//! 2. **State Updates**: `update()` processes application messages
//! 3. **Rendering**: `render()` draws the component into the provided area

use cffc_types::{Effect, Msg};
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{Frame, layout::Rect, text::Span};

use crate::app::App;

/// A UI element with its own event handling and rendering.
pub(crate) trait Component {
    /// Handle a key event while this component has focus.
    ///
    /// # Returns
    ///
    /// Effects the runtime should carry out
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle a mouse event. Components hit-test against the areas they
    /// recorded during their last render.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// React to an application message.
    fn update(&mut self, _app: &mut App, _msg: &Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// Draw into `rect`.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown in the hint bar while this component has focus.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'_>> {
        Vec::new()
    }
}
