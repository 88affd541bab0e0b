//! Input handling - pointer, keyboard, gamepad
//!
//! This module provides:
//! - Raw event types for each input source
//! - The gesture classifier turning presses into swipes and clicks
//! - The completed gesture values handed to observers

mod event;
mod gestures;
mod swipe;

pub use event::*;
pub use gestures::*;
pub use swipe::*;
