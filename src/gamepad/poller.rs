//! Periodic gamepad sampling on a calloop event loop
//!
//! Two timers:
//! - presence: every `presence_interval`, checks for connected devices and
//!   starts or stops the poll timer
//! - poll: every `poll_interval` while a device is connected, sends the
//!   backend snapshot to the classifier
//!
//! Both timers are removed when the poller is stopped or dropped.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use calloop::timer::{TimeoutAction, Timer};
use calloop::{LoopHandle, RegistrationToken};
use tracing::{debug, info, warn};

use super::GamepadBackend;
use crate::config::GamepadConfig;
use crate::error::Error;
use crate::input::{GamepadPoll, GestureClassifier, InputEvent, SwipeObserver, Timestamp};

/// Loop data the poller works on
pub trait GamepadHost {
    type Backend: GamepadBackend;
    type Observer: SwipeObserver;

    fn gamepad_backend(&mut self) -> &mut Self::Backend;
    fn classifier(&mut self) -> &mut GestureClassifier<Self::Observer>;
    /// Milliseconds on the same clock as the other input sources
    fn now_ms(&self) -> Timestamp;
}

/// Milliseconds since creation
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> Timestamp {
        self.origin.elapsed().as_millis() as Timestamp
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Gamepad sampling task bound to one event loop
pub struct GamepadPoller<'l, D> {
    handle: LoopHandle<'l, D>,
    presence: Option<RegistrationToken>,
    polling: Rc<RefCell<Option<RegistrationToken>>>,
}

impl<'l, D: GamepadHost + 'l> GamepadPoller<'l, D> {
    /// Register the presence timer. The first presence check runs on the next dispatch.
    pub fn start(handle: &LoopHandle<'l, D>, config: &GamepadConfig) -> Result<Self, Error> {
        let poll_interval = config.poll_interval();
        let presence_interval = config.presence_interval();
        let polling: Rc<RefCell<Option<RegistrationToken>>> = Rc::new(RefCell::new(None));

        let loop_handle = handle.clone();
        let poll_slot = polling.clone();
        let presence = handle
            .insert_source(Timer::immediate(), move |_, _, host: &mut D| {
                let connected = host.gamepad_backend().connected_count();
                let active = poll_slot.borrow().is_some();
                match (connected > 0, active) {
                    (true, false) => match start_polling(&loop_handle, poll_interval) {
                        Ok(token) => {
                            info!("{} gamepad(s) connected, polling every {:?}", connected, poll_interval);
                            *poll_slot.borrow_mut() = Some(token);
                        }
                        Err(e) => warn!("Failed to start gamepad polling: {}", e),
                    },
                    (false, true) => {
                        if let Some(token) = poll_slot.borrow_mut().take() {
                            loop_handle.remove(token);
                        }
                        // An empty poll drops whatever the last device left pending
                        let timestamp = host.now_ms();
                        host.classifier().handle(&InputEvent::GamepadPoll(GamepadPoll {
                            timestamp,
                            devices: Vec::new(),
                        }));
                        info!("No gamepads connected, polling stopped");
                    }
                    _ => {}
                }
                TimeoutAction::ToDuration(presence_interval)
            })
            .map_err(|e| Error::EventLoop(e.error.to_string()))?;

        debug!("Gamepad presence check every {:?}", presence_interval);
        Ok(Self {
            handle: handle.clone(),
            presence: Some(presence),
            polling,
        })
    }
}

impl<'l, D> GamepadPoller<'l, D> {
    /// True while the poll timer is registered
    pub fn is_polling(&self) -> bool {
        self.polling.borrow().is_some()
    }

    /// Remove both timers from the loop
    pub fn stop(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        if let Some(token) = self.polling.borrow_mut().take() {
            self.handle.remove(token);
        }
        if let Some(token) = self.presence.take() {
            self.handle.remove(token);
            debug!("Gamepad poller stopped");
        }
    }
}

impl<'l, D> Drop for GamepadPoller<'l, D> {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn start_polling<'l, D: GamepadHost + 'l>(
    handle: &LoopHandle<'l, D>,
    interval: Duration,
) -> Result<RegistrationToken, Error> {
    handle
        .insert_source(Timer::immediate(), move |_, _, host: &mut D| {
            let devices = host.gamepad_backend().snapshot();
            let timestamp = host.now_ms();
            let emitted = host
                .classifier()
                .handle(&InputEvent::GamepadPoll(GamepadPoll { timestamp, devices }));
            if emitted > 0 {
                debug!("Gamepad poll at {}ms produced {} gesture(s)", timestamp, emitted);
            }
            TimeoutAction::ToDuration(interval)
        })
        .map_err(|e| Error::EventLoop(e.error.to_string()))
}
