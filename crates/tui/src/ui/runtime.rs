//! Runtime: unified event loop and input routing for the TUI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode).
//! - Drive a single event loop over input, ticks, finished requests and
//!   Ctrl+C.
//! - Route input to the main view and execute the `Effect`s it returns.
//! - Render only after something changed.
//!
//! Ticking strategy: fast interval (100 ms) while requests are in flight or
//! effects are queued; long interval (5 s) when idle.
use std::{rc::Rc, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use cffc_api::RemoteResource;
use cffc_types::{CallOutcome, Effect, Msg, Route};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use rat_focus::FocusBuilder;
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{info, warn};

use crate::app::App;
use crate::cmd;
use crate::ui::components::Component;
use crate::ui::main_component::MainView;

type Backend = CrosstermBackend<std::io::Stdout>;

/// Spawn a dedicated input thread that blocks on terminal input and forwards
/// `crossterm` events over a Tokio channel.
///
/// Keeping `poll()` and `read()` on the same OS thread avoids lost or delayed
/// events in some terminals. Mouse moves are dropped; nothing hovers.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    std::thread::spawn(move || {
        let poll_interval = Duration::from_millis(16);
        loop {
            match event::poll(poll_interval) {
                Ok(false) => {
                    if sender.is_closed() {
                        break;
                    }
                }
                Ok(true) => match event::read() {
                    Ok(event) => {
                        let is_mouse_move = event.as_mouse_event().is_some_and(|mouse| mouse.kind == MouseEventKind::Moved);
                        if !is_mouse_move && sender.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        warn!("Failed to read event: {}", error);
                        break;
                    }
                },
                Err(error) => {
                    warn!("Failed to poll events: {}", error);
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<Backend>> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).context("enter alternate screen")?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<Backend>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    // Rebuild focus just before rendering so structure changes are reflected
    let old_focus = std::mem::take(&mut app.focus);
    app.focus = Rc::new(FocusBuilder::rebuild_for(app, Some(Rc::unwrap_or_clone(old_focus))));
    if app.focus.focused().is_none() {
        main_view.restore_focus(app);
    }
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) if key_event.kind == KeyEventKind::Press => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => main_view.update(app, &Msg::Resize(width, height)),
        Event::Key(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

/// Applies section switches and reports whether the user asked to quit.
/// Everything else is left in `effects` for the command layer.
fn handle_navigation_effects(app: &mut App, effects: &mut Vec<Effect>, queued_effects: &mut Vec<Effect>) -> bool {
    let navigation_effects = effects
        .extract_if(0.., |effect| matches!(effect, Effect::SwitchTo(_) | Effect::Quit))
        .collect::<Vec<Effect>>();

    let mut quit = false;
    for effect in navigation_effects {
        match effect {
            Effect::SwitchTo(route) => {
                info!(route = %route, "switching section");
                queued_effects.extend(app.switch_to(route));
            }
            Effect::Quit => quit = true,
            Effect::Remote(_) | Effect::Log(_) => {}
        }
    }
    quit
}

/// Entry point for the TUI runtime: sets up the terminal, runs the event
/// loop, and restores the terminal on every exit path.
pub async fn run_app(resource: Arc<dyn RemoteResource>, initial: Route) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let mut main_view = MainView::new();
    let mut app = App::default();
    let mut terminal = setup_terminal()?;

    let outcome = event_loop(&mut terminal, &mut app, &mut main_view, &mut input_receiver, resource, initial).await;
    cleanup_terminal(&mut terminal)?;
    outcome
}

async fn event_loop(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    main_view: &mut MainView,
    input_receiver: &mut mpsc::Receiver<Event>,
    resource: Arc<dyn RemoteResource>,
    initial: Route,
) -> Result<()> {
    let mut pending_calls: FuturesUnordered<JoinHandle<CallOutcome>> = FuturesUnordered::new();
    let mut effects: Vec<Effect> = vec![Effect::SwitchTo(initial)];

    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = fast_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(terminal, app, main_view)?;

    loop {
        let needs_animation = app.in_flight > 0 || !effects.is_empty();
        let target_interval = if needs_animation { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }
        let mut needs_render = false;
        tokio::select! {
            // Terminal input events
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // Input channel closed; shut down cleanly.
                    break;
                };
                effects.extend(handle_input_event(app, main_view, event));
                needs_render = true;
            }

            // Periodic tick: animate and run queued effects
            _ = ticker.tick() => {
                effects.extend(main_view.update(app, &Msg::Tick));
                needs_render = needs_animation;
                if !effects.is_empty() {
                    // move effects out of their Vec so follow-ups queue for the next tick
                    let mut effects_to_process = Vec::with_capacity(effects.len());
                    effects_to_process.append(&mut effects);

                    if handle_navigation_effects(app, &mut effects_to_process, &mut effects) {
                        break;
                    }
                    cmd::run_cmds(app, cmd::from_effects(effects_to_process), &resource, &mut pending_calls);
                    needs_render = true;
                }
            }

            Some(joined) = pending_calls.next(), if !pending_calls.is_empty() => {
                match joined {
                    Ok(outcome) => effects.extend(main_view.update(app, &Msg::CallCompleted(outcome))),
                    Err(error) => {
                        app.in_flight = app.in_flight.saturating_sub(1);
                        app.logs.error(format!("request task failed: {error}"));
                    }
                }
                needs_render = true;
            }

            // Handle Ctrl+C
            _ = signal::ctrl_c() => { break; }
        }

        if needs_render {
            render(terminal, app, main_view)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_stops_navigation_and_keeps_other_effects() {
        let mut app = App::default();
        let mut effects = vec![Effect::Log("kept".into()), Effect::Quit];
        let mut queued = Vec::new();
        assert!(handle_navigation_effects(&mut app, &mut effects, &mut queued));
        assert_eq!(effects, vec![Effect::Log("kept".into())]);
        assert!(queued.is_empty());
    }

    #[test]
    fn switching_queues_the_new_section_requests() {
        let mut app = App::default();
        let mut effects = vec![Effect::SwitchTo(Route::Ingredient)];
        let mut queued = Vec::new();
        assert!(!handle_navigation_effects(&mut app, &mut effects, &mut queued));
        assert!(effects.is_empty());
        assert!(matches!(queued.as_slice(), [Effect::Remote(call)] if call.request.path == "/ingredients"));
        assert_eq!(app.workspace.current_route(), Some(Route::Ingredient));
    }
}
