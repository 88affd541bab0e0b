//! gilrs-based gamepad backend (native only)

use gilrs::{Button, Gilrs};

use super::GamepadBackend;
use crate::error::Error;
use crate::input::GamepadState;

/// gilrs buttons in standard layout order, index 12..=15 being the D-pad
const STANDARD_LAYOUT: [Button; 17] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
    Button::Mode,
];

pub struct GilrsBackend {
    gilrs: Gilrs,
}

impl GilrsBackend {
    pub fn new() -> Result<Self, Error> {
        let gilrs = Gilrs::new().map_err(|e| Error::Gamepad(e.to_string()))?;
        Ok(Self { gilrs })
    }

    /// gilrs only updates its cached state while events are drained
    fn pump(&mut self) {
        while self.gilrs.next_event().is_some() {}
    }
}

impl GamepadBackend for GilrsBackend {
    fn connected_count(&mut self) -> usize {
        self.pump();
        self.gilrs
            .gamepads()
            .filter(|(_, pad)| pad.is_connected())
            .count()
    }

    fn snapshot(&mut self) -> Vec<GamepadState> {
        self.pump();
        self.gilrs
            .gamepads()
            .map(|(id, pad)| GamepadState {
                index: usize::from(id),
                connected: pad.is_connected(),
                buttons: STANDARD_LAYOUT.iter().map(|b| pad.is_pressed(*b)).collect(),
            })
            .collect()
    }
}
