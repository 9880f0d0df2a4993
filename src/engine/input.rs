use crate::browser;
use crate::engine::Point;
use anyhow::{anyhow, Result};
use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use std::collections::HashMap;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, KeyboardEvent, MouseEvent, WheelEvent};

pub const LEFT_BUTTON: i16 = 0;
pub const RIGHT_BUTTON: i16 = 2;

/// One DOM input event, decoupled from the `web_sys` event types so the
/// update loop can be driven without a live browser.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer position, already multiplied by the device pixel ratio.
    PointerMove { x: f64, y: f64 },
    ButtonDown(i16),
    ButtonUp(i16),
    KeyDown(String),
    KeyUp(String),
    WheelTurn,
}

/// Snapshot of the input devices as of the current tick. Written only
/// by [`process_input`]; entities read it during `advance`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputState {
    pointer: Point,
    lmb: bool,
    rmb: bool,
    keys: HashMap<String, bool>,
    wheel_turns: u32,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            pointer: Point::default(),
            lmb: false,
            rmb: false,
            keys: HashMap::new(),
            wheel_turns: 0,
        }
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    pub fn left_button(&self) -> bool {
        self.lmb
    }

    pub fn right_button(&self) -> bool {
        self.rmb
    }

    /// `key` is the literal `KeyboardEvent.key` identifier, e.g. "w".
    pub fn is_pressed(&self, key: &str) -> bool {
        matches!(self.keys.get(key), Some(true))
    }

    /// Wheel detents seen since the previous tick.
    pub fn wheel_turns(&self) -> u32 {
        self.wheel_turns
    }

    /// The single write path: events land here in arrival order, so the
    /// last writer wins within a tick.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMove { x, y } => self.pointer = Point { x, y },
            InputEvent::ButtonDown(LEFT_BUTTON) => self.lmb = true,
            InputEvent::ButtonDown(RIGHT_BUTTON) => self.rmb = true,
            InputEvent::ButtonUp(LEFT_BUTTON) => self.lmb = false,
            InputEvent::ButtonUp(RIGHT_BUTTON) => self.rmb = false,
            // auxiliary buttons are ignored, same as the page handlers
            InputEvent::ButtonDown(_) | InputEvent::ButtonUp(_) => {}
            InputEvent::KeyDown(key) => {
                self.keys.insert(key, true);
            }
            InputEvent::KeyUp(key) => {
                self.keys.insert(key, false);
            }
            InputEvent::WheelTurn => self.wheel_turns += 1,
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Drain everything that arrived since the previous tick into `state`.
/// Wheel turns are edge-triggered and reset on every drain; pointer,
/// buttons and keys are level state and carry over.
pub fn process_input(state: &mut InputState, events: &mut UnboundedReceiver<InputEvent>) {
    state.wheel_turns = 0;
    loop {
        match events.try_next() {
            Ok(Some(event)) => state.apply(event),
            Ok(None) | Err(_) => break,
        }
    }
}

/// Attach the DOM handlers and hand back the receiving end of the event
/// channel. The closures are leaked on purpose: input is captured for
/// the lifetime of the page.
pub fn capture_input() -> Result<UnboundedReceiver<InputEvent>> {
    let (sender, receiver) = unbounded();
    // captured once at startup, like the surface scale itself
    let scale = browser::device_pixel_ratio()?;
    let container = browser::container()?;
    let document = browser::document()?;

    let tx = sender.clone();
    attach(
        &container,
        "mousemove",
        browser::closure_wrap(Box::new(move |event: MouseEvent| {
            let _ = tx.unbounded_send(InputEvent::PointerMove {
                x: f64::from(event.client_x()) * scale,
                y: f64::from(event.client_y()) * scale,
            });
        }) as Box<dyn FnMut(_)>),
    )?;

    let tx = sender.clone();
    attach(
        &container,
        "mousedown",
        browser::closure_wrap(Box::new(move |event: MouseEvent| {
            let _ = tx.unbounded_send(InputEvent::ButtonDown(event.button()));
        }) as Box<dyn FnMut(_)>),
    )?;

    let tx = sender.clone();
    attach(
        &container,
        "mouseup",
        browser::closure_wrap(Box::new(move |event: MouseEvent| {
            let _ = tx.unbounded_send(InputEvent::ButtonUp(event.button()));
        }) as Box<dyn FnMut(_)>),
    )?;

    // the right button is gameplay, keep the native menu out of the way
    attach(
        &container,
        "contextmenu",
        browser::closure_wrap(Box::new(move |event: Event| {
            event.prevent_default();
            event.stop_propagation();
        }) as Box<dyn FnMut(_)>),
    )?;

    let tx = sender.clone();
    attach(
        &container,
        "wheel",
        browser::closure_wrap(Box::new(move |_event: WheelEvent| {
            let _ = tx.unbounded_send(InputEvent::WheelTurn);
        }) as Box<dyn FnMut(_)>),
    )?;

    let tx = sender.clone();
    attach(
        &document,
        "keydown",
        browser::closure_wrap(Box::new(move |event: KeyboardEvent| {
            let _ = tx.unbounded_send(InputEvent::KeyDown(event.key()));
        }) as Box<dyn FnMut(_)>),
    )?;

    let tx = sender;
    attach(
        &document,
        "keyup",
        browser::closure_wrap(Box::new(move |event: KeyboardEvent| {
            let _ = tx.unbounded_send(InputEvent::KeyUp(event.key()));
        }) as Box<dyn FnMut(_)>),
    )?;

    Ok(receiver)
}

fn attach<T>(target: &EventTarget, name: &str, callback: Closure<dyn FnMut(T)>) -> Result<()>
where
    T: FromWasmAbi + 'static,
{
    target
        .add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())
        .map_err(|err| anyhow!("Cannot listen for '{}' events : {:#?}", name, err))?;
    callback.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::mpsc::unbounded;

    #[test]
    fn pointer_last_writer_wins() {
        let (tx, mut rx) = unbounded();
        tx.unbounded_send(InputEvent::PointerMove { x: 10.0, y: 20.0 })
            .unwrap();
        tx.unbounded_send(InputEvent::PointerMove { x: 30.0, y: 40.0 })
            .unwrap();

        let mut state = InputState::new();
        process_input(&mut state, &mut rx);

        assert_eq!(state.pointer().x, 30.0);
        assert_eq!(state.pointer().y, 40.0);
    }

    #[test]
    fn buttons_set_and_clear_by_index() {
        let mut state = InputState::new();

        state.apply(InputEvent::ButtonDown(LEFT_BUTTON));
        state.apply(InputEvent::ButtonDown(RIGHT_BUTTON));
        assert!(state.left_button());
        assert!(state.right_button());

        state.apply(InputEvent::ButtonUp(LEFT_BUTTON));
        assert!(!state.left_button());
        assert!(state.right_button());

        // middle button maps to nothing
        state.apply(InputEvent::ButtonDown(1));
        assert!(!state.left_button());
        assert!(state.right_button());
    }

    #[test]
    fn keys_track_the_literal_identifier() {
        let mut state = InputState::new();
        assert!(!state.is_pressed("w"));

        state.apply(InputEvent::KeyDown("w".into()));
        assert!(state.is_pressed("w"));
        assert!(!state.is_pressed("W"));

        state.apply(InputEvent::KeyUp("w".into()));
        assert!(!state.is_pressed("w"));
    }

    #[test]
    fn wheel_turns_reset_on_every_drain() {
        let (tx, mut rx) = unbounded();
        let mut state = InputState::new();

        tx.unbounded_send(InputEvent::WheelTurn).unwrap();
        tx.unbounded_send(InputEvent::WheelTurn).unwrap();
        process_input(&mut state, &mut rx);
        assert_eq!(state.wheel_turns(), 2);

        // nothing new arrived: the count does not carry over
        process_input(&mut state, &mut rx);
        assert_eq!(state.wheel_turns(), 0);
    }

    #[test]
    fn level_state_carries_over_between_drains() {
        let (tx, mut rx) = unbounded();
        let mut state = InputState::new();

        tx.unbounded_send(InputEvent::KeyDown("d".into())).unwrap();
        tx.unbounded_send(InputEvent::ButtonDown(LEFT_BUTTON)).unwrap();
        process_input(&mut state, &mut rx);

        process_input(&mut state, &mut rx);
        assert!(state.is_pressed("d"));
        assert!(state.left_button());
    }
}
