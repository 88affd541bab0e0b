//! Scripted input playback
//!
//! A script is a TOML list of `[[step]]` tables, each tagged by `kind` and
//! stamped with `at` (milliseconds):
//!
//! ```toml
//! [[step]]
//! kind = "pointer-down"
//! at = 0
//! x = 100.0
//! y = 100.0
//!
//! [[step]]
//! kind = "pointer-up"
//! at = 200
//! x = 100.0
//! y = 130.0
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, trace};

use crate::config::SwipeConfig;
use crate::error::Error;
use crate::input::{
    GamepadPoll, GamepadState, GestureClassifier, InputEvent, KeyEvent, KeyPhase, PointerEvent,
    PointerKind, PointerPhase, SwipeData, SwipeLog, Timestamp,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Step {
    PointerDown {
        at: Timestamp,
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
        #[serde(default)]
        pointer: PointerKind,
    },
    PointerUp {
        at: Timestamp,
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
        #[serde(default)]
        pointer: PointerKind,
    },
    PointerLeave {
        at: Timestamp,
    },
    KeyDown {
        at: Timestamp,
        key: String,
    },
    KeyUp {
        at: Timestamp,
        key: String,
    },
    GamepadPoll {
        at: Timestamp,
        #[serde(default)]
        devices: Vec<GamepadState>,
    },
    GamepadConnection {
        at: Timestamp,
        index: usize,
        connected: bool,
    },
    Lock {
        at: Timestamp,
    },
    Unlock {
        at: Timestamp,
    },
    FocusLost {
        at: Timestamp,
    },
}

impl Step {
    /// The raw input event for this step, if it is one
    pub fn input_event(&self) -> Option<InputEvent> {
        let pointer = |phase, at: Timestamp, x: Option<f64>, y: Option<f64>, kind| {
            InputEvent::Pointer(PointerEvent {
                phase,
                kind,
                position: x.zip(y),
                timestamp: at,
            })
        };
        match self {
            Step::PointerDown { at, x, y, pointer: kind } => {
                Some(pointer(PointerPhase::Down, *at, *x, *y, *kind))
            }
            Step::PointerUp { at, x, y, pointer: kind } => {
                Some(pointer(PointerPhase::Up, *at, *x, *y, *kind))
            }
            Step::PointerLeave { at } => {
                Some(pointer(PointerPhase::Leave, *at, None, None, PointerKind::Mouse))
            }
            Step::KeyDown { at, key } => Some(InputEvent::Key(KeyEvent {
                phase: KeyPhase::Down,
                key: key.clone(),
                timestamp: *at,
            })),
            Step::KeyUp { at, key } => Some(InputEvent::Key(KeyEvent {
                phase: KeyPhase::Up,
                key: key.clone(),
                timestamp: *at,
            })),
            Step::GamepadPoll { at, devices } => Some(InputEvent::GamepadPoll(GamepadPoll {
                timestamp: *at,
                devices: devices.clone(),
            })),
            Step::GamepadConnection {
                at,
                index,
                connected,
            } => Some(InputEvent::GamepadConnection {
                index: *index,
                connected: *connected,
                timestamp: *at,
            }),
            Step::Lock { .. } | Step::Unlock { .. } | Step::FocusLost { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Script {
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_toml_str(contents: &str) -> Result<Self, Error> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Play every step through a fresh classifier and collect the gestures
pub fn replay(script: &Script, config: SwipeConfig) -> Vec<SwipeData> {
    let mut classifier = GestureClassifier::new(config, SwipeLog::default());
    let mut last: Option<Timestamp> = None;
    for step in &script.steps {
        trace!("Replay step {:?}", step);
        match step {
            Step::Lock { .. } => classifier.set_locked(true),
            Step::Unlock { .. } => classifier.set_locked(false),
            Step::FocusLost { .. } => classifier.focus_lost(),
            _ => {
                if let Some(event) = step.input_event() {
                    let at = event.timestamp();
                    if last.is_some_and(|prev| at < prev) {
                        debug!("Script time goes backwards at {}ms", at);
                    }
                    last = Some(at);
                    classifier.handle(&event);
                }
            }
        }
    }
    classifier.into_observer().0
}
