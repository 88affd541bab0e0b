//! Gamepad input source
//!
//! Gamepads are not push devices: their button state has to be sampled.
//! A [`GamepadBackend`] reports which devices are present and their current
//! button state, and the [`GamepadPoller`] samples it on a calloop timer and
//! feeds each sample to the classifier as one `GamepadPoll` event.

mod poller;

#[cfg(feature = "gilrs")]
mod gilrs_backend;

pub use poller::{GamepadHost, GamepadPoller, MonotonicClock};

#[cfg(feature = "gilrs")]
pub use gilrs_backend::GilrsBackend;

use crate::input::GamepadState;

/// Source of gamepad state
pub trait GamepadBackend {
    /// Number of devices currently connected
    fn connected_count(&mut self) -> usize;

    /// Button state of every known device, standard layout order
    fn snapshot(&mut self) -> Vec<GamepadState>;
}
