//! Swipe gesture detection for a rectangular screen region
//!
//! Pointer (mouse or touch), keyboard arrow and gamepad button presses are
//! classified into one kind of value, [`SwipeData`]: an angle (or the click
//! angle), a duration, and a release position where one exists.
//!
//! # Usage
//!
//! ```rust
//! use swipe_gesture::{GestureClassifier, PointerEvent, SwipeConfig, SwipeData};
//!
//! let mut classifier = GestureClassifier::new(SwipeConfig::default(), |swipe: SwipeData| {
//!     println!("swipe at {} rad after {}ms", swipe.angle, swipe.duration);
//! });
//! classifier.handle(&PointerEvent::down(100.0, 100.0, 0).into());
//! classifier.handle(&PointerEvent::up(100.0, 130.0, 200).into());
//! ```
//!
//! Gamepads are sampled by a [`gamepad::GamepadPoller`] registered on a calloop
//! event loop.

pub mod config;
pub mod error;
pub mod gamepad;
pub mod input;
pub mod replay;

pub use config::{GamepadConfig, KeyPositionMode, SwipeConfig, CLICK_DIST_THRESHOLD};
pub use error::Error;
pub use input::{
    GestureClassifier, InputEvent, KeyEvent, PointerEvent, PressId, SwipeData, SwipeDirection,
    SwipeLog, SwipeObserver, CLICK_ANGLE, UNKNOWN_POSITION,
};

/// Result type for this crate
pub type Result<T> = std::result::Result<T, Error>;
