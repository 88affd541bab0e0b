//! Raw input events from the pointer, keyboard and gamepad sources

use serde::{Deserialize, Serialize};

/// Milliseconds on the caller's clock
pub type Timestamp = u64;

/// Rectangular screen region covered by the swipe surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Up,
    /// Pointer left the surface
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
}

/// Mouse button or first changed touch point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub kind: PointerKind,
    /// Page coordinates; absent when the source did not report any
    pub position: Option<(f64, f64)>,
    pub timestamp: Timestamp,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64, timestamp: Timestamp) -> Self {
        Self {
            phase: PointerPhase::Down,
            kind: PointerKind::Mouse,
            position: Some((x, y)),
            timestamp,
        }
    }

    pub fn up(x: f64, y: f64, timestamp: Timestamp) -> Self {
        Self {
            phase: PointerPhase::Up,
            kind: PointerKind::Mouse,
            position: Some((x, y)),
            timestamp,
        }
    }

    pub fn leave(timestamp: Timestamp) -> Self {
        Self {
            phase: PointerPhase::Leave,
            kind: PointerKind::Mouse,
            position: None,
            timestamp,
        }
    }

    pub fn touch(mut self) -> Self {
        self.kind = PointerKind::Touch;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPhase {
    Down,
    Up,
}

/// Key event carrying the source's key name (`"ArrowLeft"`, `" "`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub phase: KeyPhase,
    pub key: String,
    pub timestamp: Timestamp,
}

impl KeyEvent {
    pub fn down(key: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            phase: KeyPhase::Down,
            key: key.into(),
            timestamp,
        }
    }

    pub fn up(key: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            phase: KeyPhase::Up,
            key: key.into(),
            timestamp,
        }
    }
}

/// Keys the classifier reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecognizedKey {
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    Activate,
}

impl RecognizedKey {
    /// Resolve a key name; `activate_keys` lists the names treated as activate
    pub fn from_name<S: AsRef<str>>(name: &str, activate_keys: &[S]) -> Option<Self> {
        match name {
            "ArrowLeft" => Some(RecognizedKey::ArrowLeft),
            "ArrowUp" => Some(RecognizedKey::ArrowUp),
            "ArrowRight" => Some(RecognizedKey::ArrowRight),
            "ArrowDown" => Some(RecognizedKey::ArrowDown),
            _ if activate_keys.iter().any(|k| k.as_ref() == name) => Some(RecognizedKey::Activate),
            _ => None,
        }
    }
}

/// State of one gamepad at a poll tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamepadState {
    pub index: usize,
    #[serde(default = "default_connected")]
    pub connected: bool,
    /// Pressed flag per button, standard layout order
    #[serde(default)]
    pub buttons: Vec<bool>,
}

fn default_connected() -> bool {
    true
}

impl GamepadState {
    pub fn new(index: usize, buttons: Vec<bool>) -> Self {
        Self {
            index,
            connected: true,
            buttons,
        }
    }

    /// Convenience for tests and scripts: `pressed` lists the held buttons
    pub fn with_pressed(index: usize, pressed: &[usize]) -> Self {
        let len = pressed.iter().max().map_or(0, |m| m + 1).max(STANDARD_BUTTON_COUNT);
        let mut buttons = vec![false; len];
        for &b in pressed {
            buttons[b] = true;
        }
        Self::new(index, buttons)
    }
}

/// Buttons in the standard gamepad layout (0..=16)
pub const STANDARD_BUTTON_COUNT: usize = 17;

/// Full button state of every connected device at one poll tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamepadPoll {
    pub timestamp: Timestamp,
    pub devices: Vec<GamepadState>,
}

/// Raw event from any input source
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Pointer(PointerEvent),
    Key(KeyEvent),
    GamepadPoll(GamepadPoll),
    GamepadConnection {
        index: usize,
        connected: bool,
        timestamp: Timestamp,
    },
}

impl InputEvent {
    pub fn timestamp(&self) -> Timestamp {
        match self {
            InputEvent::Pointer(e) => e.timestamp,
            InputEvent::Key(e) => e.timestamp,
            InputEvent::GamepadPoll(p) => p.timestamp,
            InputEvent::GamepadConnection { timestamp, .. } => *timestamp,
        }
    }
}

impl From<PointerEvent> for InputEvent {
    fn from(e: PointerEvent) -> Self {
        InputEvent::Pointer(e)
    }
}

impl From<KeyEvent> for InputEvent {
    fn from(e: KeyEvent) -> Self {
        InputEvent::Key(e)
    }
}

impl From<GamepadPoll> for InputEvent {
    fn from(p: GamepadPoll) -> Self {
        InputEvent::GamepadPoll(p)
    }
}
