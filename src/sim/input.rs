//! Keyboard input snapshots
//!
//! Browser key handlers only ever push [`InputEvent`]s onto an [`InputQueue`].
//! The frame callback drains the queue into an [`InputState`] right before the
//! locomotion step, so the controller always sees one consistent snapshot.

use std::collections::VecDeque;

/// Logical keys the locomotion controller reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
}

impl Key {
    pub const ALL: [Key; 4] = [Key::Forward, Key::Backward, Key::TurnLeft, Key::TurnRight];

    /// Map a DOM `KeyboardEvent.key` value. Unknown keys are ignored.
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "Up" => Some(Key::Forward),
            "ArrowDown" | "Down" => Some(Key::Backward),
            "ArrowLeft" | "Left" => Some(Key::TurnLeft),
            "ArrowRight" | "Right" => Some(Key::TurnRight),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Key::Forward => 1 << 0,
            Key::Backward => 1 << 1,
            Key::TurnLeft => 1 << 2,
            Key::TurnRight => 1 << 3,
        }
    }
}

/// Which keys are held at the start of a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    held: u8,
}

impl InputState {
    /// Snapshot with exactly the given keys held
    pub fn pressed(keys: &[Key]) -> Self {
        let mut state = Self::default();
        for &key in keys {
            state.set(key, true);
        }
        state
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.held & key.bit() != 0
    }

    pub fn set(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.held |= key.bit();
        } else {
            self.held &= !key.bit();
        }
    }

    pub fn any_pressed(&self) -> bool {
        self.held != 0
    }

    pub fn release_all(&mut self) {
        self.held = 0;
    }
}

/// A classified keyboard/window event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A locomotion key went down or up
    Key { key: Key, pressed: bool },
    /// Switch camera framing (host only, never reaches the controller)
    ToggleCamera,
    /// Window lost focus; key-up events may never arrive
    ReleaseAll,
}

impl InputEvent {
    /// Classify a DOM `keydown`
    pub fn from_key_down(key: &str) -> Option<Self> {
        if key == "c" || key == "C" {
            return Some(InputEvent::ToggleCamera);
        }
        Key::from_dom_key(key).map(|key| InputEvent::Key { key, pressed: true })
    }

    /// Classify a DOM `keyup`
    pub fn from_key_up(key: &str) -> Option<Self> {
        Key::from_dom_key(key).map(|key| InputEvent::Key {
            key,
            pressed: false,
        })
    }
}

/// Host commands collected while draining the queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Number of camera toggles seen this frame
    pub camera_toggles: u32,
    /// Number of events consumed
    pub events: usize,
}

/// Single-writer queue between event handlers and the frame callback
#[derive(Debug, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Apply queued events to `state` in arrival order (last write wins)
    pub fn drain_into(&mut self, state: &mut InputState) -> DrainReport {
        let mut report = DrainReport::default();
        for event in self.events.drain(..) {
            report.events += 1;
            match event {
                InputEvent::Key { key, pressed } => state.set(key, pressed),
                InputEvent::ToggleCamera => report.camera_toggles += 1,
                InputEvent::ReleaseAll => state.release_all(),
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_key_mapping() {
        assert_eq!(Key::from_dom_key("ArrowUp"), Some(Key::Forward));
        assert_eq!(Key::from_dom_key("ArrowDown"), Some(Key::Backward));
        assert_eq!(Key::from_dom_key("ArrowLeft"), Some(Key::TurnLeft));
        assert_eq!(Key::from_dom_key("ArrowRight"), Some(Key::TurnRight));
        assert_eq!(Key::from_dom_key("Left"), Some(Key::TurnLeft));
        assert_eq!(Key::from_dom_key("w"), None);
        assert_eq!(Key::from_dom_key(""), None);
    }

    #[test]
    fn test_input_state_set_and_clear() {
        let mut state = InputState::default();
        assert!(!state.any_pressed());

        state.set(Key::Forward, true);
        state.set(Key::TurnRight, true);
        assert!(state.is_pressed(Key::Forward));
        assert!(state.is_pressed(Key::TurnRight));
        assert!(!state.is_pressed(Key::Backward));

        state.set(Key::Forward, false);
        assert!(!state.is_pressed(Key::Forward));
        assert!(state.any_pressed());

        state.release_all();
        assert!(!state.any_pressed());
    }

    #[test]
    fn test_camera_toggle_is_keydown_only() {
        assert_eq!(InputEvent::from_key_down("c"), Some(InputEvent::ToggleCamera));
        assert_eq!(InputEvent::from_key_down("C"), Some(InputEvent::ToggleCamera));
        assert_eq!(InputEvent::from_key_up("c"), None);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        assert_eq!(InputEvent::from_key_down("Shift"), None);
        assert_eq!(InputEvent::from_key_up("Escape"), None);
    }

    #[test]
    fn test_drain_last_write_wins() {
        let mut queue = InputQueue::new();
        let mut state = InputState::default();

        queue.push(InputEvent::Key { key: Key::Forward, pressed: true });
        queue.push(InputEvent::Key { key: Key::Forward, pressed: false });
        queue.push(InputEvent::Key { key: Key::TurnLeft, pressed: true });

        let report = queue.drain_into(&mut state);
        assert_eq!(report.events, 3);
        assert!(!state.is_pressed(Key::Forward));
        assert!(state.is_pressed(Key::TurnLeft));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drain_reports_camera_toggles_without_touching_keys() {
        let mut queue = InputQueue::new();
        let mut state = InputState::pressed(&[Key::Backward]);

        queue.push(InputEvent::ToggleCamera);
        queue.push(InputEvent::ToggleCamera);

        let report = queue.drain_into(&mut state);
        assert_eq!(report.camera_toggles, 2);
        assert_eq!(state, InputState::pressed(&[Key::Backward]));
    }

    #[test]
    fn test_release_all_clears_held_keys() {
        let mut queue = InputQueue::new();
        let mut state = InputState::pressed(&Key::ALL);

        queue.push(InputEvent::ReleaseAll);
        queue.drain_into(&mut state);
        assert!(!state.any_pressed());
    }

    #[test]
    fn test_snapshot_persists_between_drains() {
        let mut queue = InputQueue::new();
        let mut state = InputState::default();

        queue.push(InputEvent::Key { key: Key::TurnRight, pressed: true });
        queue.drain_into(&mut state);

        // Held keys stay held on frames with no new events
        let report = queue.drain_into(&mut state);
        assert_eq!(report.events, 0);
        assert!(state.is_pressed(Key::TurnRight));
    }
}
