//! Swipe/click classification with per-source pending presses
//!
//! Each input source keeps its own in-progress presses, keyed by [`PressId`]:
//! - Pointer (mouse or first touch) has a single slot
//! - Keyboard has one slot per recognized key
//! - Gamepad has one slot per (device, button) pair
//!
//! A press becomes a [`SwipeData`] when released. Pointer presses that travel
//! further than the click threshold report `atan2(dy, dx)`; everything else
//! reports the click angle. Keys and D-pad buttons map to fixed angles.
//!
//! While locked, no press starts and releases are swallowed.

use std::collections::{HashMap, HashSet};
use std::f64::consts::{FRAC_PI_2, PI};

use tracing::{debug, trace};

use super::event::{
    GamepadPoll, GamepadState, InputEvent, KeyEvent, KeyPhase, PointerEvent, PointerPhase,
    RecognizedKey, Timestamp,
};
use super::swipe::{SwipeData, SwipeDirection, CLICK_ANGLE, UNKNOWN_POSITION};
use crate::config::{KeyPositionMode, SwipeConfig};

/// Standard-layout D-pad buttons
pub const BUTTON_DPAD_UP: usize = 12;
pub const BUTTON_DPAD_DOWN: usize = 13;
pub const BUTTON_DPAD_LEFT: usize = 14;
pub const BUTTON_DPAD_RIGHT: usize = 15;

/// Identifies one pending press
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PressId {
    Pointer,
    /// Key name as reported by the source, so `" "` and `"Enter"` are separate presses
    Key(String),
    Gamepad { device: usize, button: usize },
}

/// In-progress press
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingPress {
    origin: Option<(f64, f64)>,
    started_at: Timestamp,
}

/// Receives completed gestures
pub trait SwipeObserver {
    fn on_swipe(&mut self, swipe: SwipeData);
}

impl<F: FnMut(SwipeData)> SwipeObserver for F {
    fn on_swipe(&mut self, swipe: SwipeData) {
        self(swipe)
    }
}

/// Observer that records every gesture in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwipeLog(pub Vec<SwipeData>);

impl SwipeObserver for SwipeLog {
    fn on_swipe(&mut self, swipe: SwipeData) {
        self.0.push(swipe);
    }
}

/// Fixed angle for a recognized key
pub fn key_angle(key: RecognizedKey) -> f64 {
    match key {
        RecognizedKey::ArrowLeft => -PI,
        RecognizedKey::ArrowUp => -FRAC_PI_2,
        RecognizedKey::ArrowRight => 0.0,
        RecognizedKey::ArrowDown => FRAC_PI_2,
        RecognizedKey::Activate => CLICK_ANGLE,
    }
}

/// Fixed angle for a standard-layout gamepad button
pub fn gamepad_button_angle(button: usize) -> f64 {
    match button {
        BUTTON_DPAD_UP => -FRAC_PI_2,
        BUTTON_DPAD_DOWN => FRAC_PI_2,
        BUTTON_DPAD_LEFT => -PI,
        BUTTON_DPAD_RIGHT => 0.0,
        _ => CLICK_ANGLE,
    }
}

fn valid_position(position: Option<(f64, f64)>) -> Option<(f64, f64)> {
    position.filter(|(x, y)| x.is_finite() && y.is_finite())
}

/// Gesture classifier for one swipe surface
pub struct GestureClassifier<O> {
    config: SwipeConfig,
    locked: bool,
    pending: HashMap<PressId, PendingPress>,
    /// Gamepad buttons whose press was discarded and that are still held
    held_through_lock: HashSet<(usize, usize)>,
    observer: O,
}

impl<O: SwipeObserver> GestureClassifier<O> {
    pub fn new(config: SwipeConfig, observer: O) -> Self {
        Self {
            locked: config.locked_screen,
            config,
            pending: HashMap::new(),
            held_through_lock: HashSet::new(),
            observer,
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Lock or unlock the surface. Locking discards every pending press.
    pub fn set_locked(&mut self, locked: bool) {
        if locked == self.locked {
            return;
        }
        debug!("Swipe surface {}", if locked { "locked" } else { "unlocked" });
        self.locked = locked;
        if locked {
            self.reset(None);
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, id: &PressId) -> bool {
        self.pending.contains_key(id)
    }

    /// Start a press. Returns false when locked or already pending.
    pub fn press_start(
        &mut self,
        id: PressId,
        position: Option<(f64, f64)>,
        timestamp: Timestamp,
    ) -> bool {
        if self.locked || self.pending.contains_key(&id) {
            return false;
        }
        let origin = valid_position(position);
        if id == PressId::Pointer && origin.is_none() {
            trace!("Pointer press without position ignored");
            return false;
        }
        self.pending.insert(
            id,
            PendingPress {
                origin,
                started_at: timestamp,
            },
        );
        true
    }

    /// Finish a press and deliver the gesture, if any
    pub fn press_end(
        &mut self,
        id: PressId,
        position: Option<(f64, f64)>,
        timestamp: Timestamp,
    ) -> Option<SwipeData> {
        let pending = self.pending.remove(&id);
        if self.locked {
            if pending.is_some() {
                debug!("Discarding {:?} press on locked surface", id);
            }
            return None;
        }
        let pending = pending?;
        let duration = timestamp.saturating_sub(pending.started_at);

        let swipe = match &id {
            PressId::Pointer => {
                let (sx, sy) = pending.origin?;
                let Some((ex, ey)) = valid_position(position) else {
                    trace!("Pointer release without position, press discarded");
                    return None;
                };
                let dx = ex - sx;
                let dy = ey - sy;
                let distance = (dx * dx + dy * dy).sqrt();
                let angle = if distance > self.config.click_distance_threshold {
                    dy.atan2(dx)
                } else {
                    CLICK_ANGLE
                };
                SwipeData {
                    angle,
                    duration,
                    x: ex,
                    y: ey,
                }
            }
            PressId::Key(name) => {
                let key = RecognizedKey::from_name(name, &self.config.activate_keys)?;
                self.fixed_swipe(key_angle(key), duration)
            }
            PressId::Gamepad { button, .. } => {
                self.fixed_swipe(gamepad_button_angle(*button), duration)
            }
        };

        debug!(
            "Gesture from {:?}: angle={} duration={}ms at ({}, {})",
            id, swipe.angle, swipe.duration, swipe.x, swipe.y
        );
        self.observer.on_swipe(swipe);
        Some(swipe)
    }

    /// Discard one pending press, or all of them, without emitting
    pub fn reset(&mut self, id: Option<&PressId>) {
        match id {
            Some(id) => {
                if self.pending.remove(id).is_some() {
                    self.hold_if_gamepad(id);
                }
            }
            None => {
                let ids: Vec<PressId> = self.pending.drain().map(|(id, _)| id).collect();
                for id in &ids {
                    self.hold_if_gamepad(id);
                }
            }
        }
    }

    /// Surface lost focus
    pub fn focus_lost(&mut self) {
        self.reset(None);
    }

    /// Feed one raw event. Returns how many gestures were delivered.
    pub fn handle(&mut self, event: &InputEvent) -> usize {
        match event {
            InputEvent::Pointer(e) => self.handle_pointer(e),
            InputEvent::Key(e) => self.handle_key(e),
            InputEvent::GamepadPoll(poll) => self.handle_gamepad_poll(poll),
            InputEvent::GamepadConnection {
                index, connected, ..
            } => {
                if !connected {
                    debug!("Gamepad {} disconnected", index);
                    self.drop_device(*index);
                }
                0
            }
        }
    }

    fn handle_pointer(&mut self, event: &PointerEvent) -> usize {
        let position = valid_position(event.position);
        let inside = match (self.config.surface, position) {
            (Some(surface), Some((x, y))) => surface.contains(x, y),
            _ => true,
        };

        match event.phase {
            PointerPhase::Down => {
                if !inside {
                    trace!("{:?} press outside surface ignored", event.kind);
                    return 0;
                }
                self.press_start(PressId::Pointer, position, event.timestamp);
                0
            }
            PointerPhase::Up => {
                if !inside {
                    trace!("{:?} release outside surface, press discarded", event.kind);
                    self.reset(Some(&PressId::Pointer));
                    return 0;
                }
                self.press_end(PressId::Pointer, position, event.timestamp)
                    .map_or(0, |_| 1)
            }
            PointerPhase::Leave => {
                self.reset(Some(&PressId::Pointer));
                0
            }
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) -> usize {
        if RecognizedKey::from_name(&event.key, &self.config.activate_keys).is_none() {
            trace!("Unrecognized key {:?} ignored", event.key);
            return 0;
        }
        let id = PressId::Key(event.key.clone());
        match event.phase {
            KeyPhase::Down => {
                self.press_start(id, None, event.timestamp);
                0
            }
            KeyPhase::Up => self.press_end(id, None, event.timestamp).map_or(0, |_| 1),
        }
    }

    fn handle_gamepad_poll(&mut self, poll: &GamepadPoll) -> usize {
        // First entry wins when a device index is reported twice
        let mut seen = HashSet::new();
        let devices: Vec<&GamepadState> = poll
            .devices
            .iter()
            .filter(|d| {
                let first = seen.insert(d.index);
                if !first {
                    trace!("Duplicate gamepad {} in poll ignored", d.index);
                }
                first
            })
            .collect();

        // Devices missing from the poll, or reported disconnected, lose their presses
        let live: HashSet<usize> = devices
            .iter()
            .filter(|d| d.connected)
            .map(|d| d.index)
            .collect();
        self.pending.retain(|id, _| match id {
            PressId::Gamepad { device, .. } => live.contains(device),
            _ => true,
        });
        self.held_through_lock.retain(|(device, _)| live.contains(device));

        let mut emitted = 0;
        for pad in devices.iter().filter(|d| d.connected) {
            let count = pad.buttons.len();
            self.pending.retain(|id, _| match id {
                PressId::Gamepad { device, button } => *device != pad.index || *button < count,
                _ => true,
            });

            for (button, &pressed) in pad.buttons.iter().enumerate() {
                let key = (pad.index, button);
                if !pressed {
                    self.held_through_lock.remove(&key);
                    if self
                        .press_end(PressId::Gamepad { device: pad.index, button }, None, poll.timestamp)
                        .is_some()
                    {
                        emitted += 1;
                    }
                } else if self.locked {
                    self.held_through_lock.insert(key);
                } else if !self.held_through_lock.contains(&key) {
                    // Still-held buttons are already pending, so this is a no-op for them
                    self.press_start(PressId::Gamepad { device: pad.index, button }, None, poll.timestamp);
                }
            }
        }
        emitted
    }

    fn drop_device(&mut self, index: usize) {
        self.pending.retain(|id, _| match id {
            PressId::Gamepad { device, .. } => *device != index,
            _ => true,
        });
        self.held_through_lock.retain(|(device, _)| *device != index);
    }

    fn hold_if_gamepad(&mut self, id: &PressId) {
        if let PressId::Gamepad { device, button } = id {
            self.held_through_lock.insert((*device, *button));
        }
    }

    fn fixed_swipe(&self, angle: f64, duration: u64) -> SwipeData {
        let (x, y) = self.anchored_position(angle);
        SwipeData {
            angle,
            duration,
            x,
            y,
        }
    }

    fn anchored_position(&self, angle: f64) -> (f64, f64) {
        let unknown = (UNKNOWN_POSITION, UNKNOWN_POSITION);
        let (KeyPositionMode::SurfaceEdges, Some(surface)) =
            (self.config.key_positions, self.config.surface)
        else {
            return unknown;
        };
        let (cx, cy) = surface.center();
        match SwipeDirection::from_angle(angle) {
            Some(SwipeDirection::Left) => (surface.x, cy),
            Some(SwipeDirection::Up) => (cx, surface.y),
            Some(SwipeDirection::Right) => (surface.x + surface.width, cy),
            Some(SwipeDirection::Down) => (cx, surface.y + surface.height),
            None => unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Surface;

    fn classifier() -> GestureClassifier<SwipeLog> {
        GestureClassifier::new(SwipeConfig::default(), SwipeLog::default())
    }

    fn swipes(c: &GestureClassifier<SwipeLog>) -> &[SwipeData] {
        &c.observer().0
    }

    fn poll(timestamp: Timestamp, devices: Vec<GamepadState>) -> InputEvent {
        InputEvent::GamepadPoll(GamepadPoll { timestamp, devices })
    }

    #[test]
    fn test_pointer_swipe_down() {
        let mut c = classifier();
        c.handle(&PointerEvent::down(100.0, 100.0, 0).into());
        assert_eq!(c.handle(&PointerEvent::up(100.0, 130.0, 200).into()), 1);

        let swipe = swipes(&c)[0];
        assert!((swipe.angle - FRAC_PI_2).abs() < 1e-9);
        assert_eq!(swipe.duration, 200);
        assert_eq!(swipe.position(), Some((100.0, 130.0)));
        assert_eq!(c.pending_count(), 0);
    }

    #[test]
    fn test_pointer_small_move_is_click() {
        let mut c = classifier();
        c.handle(&PointerEvent::down(50.0, 50.0, 0).into());
        c.handle(&PointerEvent::up(52.0, 51.0, 50).into());

        let swipe = swipes(&c)[0];
        assert!(swipe.is_click());
        assert_eq!(swipe.duration, 50);
        assert_eq!(swipe.position(), Some((52.0, 51.0)));
    }

    #[test]
    fn test_threshold_boundary_is_click() {
        let mut c = classifier();
        c.handle(&PointerEvent::down(0.0, 0.0, 0).into());
        c.handle(&PointerEvent::up(6.0, 8.0, 10).into()); // distance exactly 10
        assert!(swipes(&c)[0].is_click());

        c.handle(&PointerEvent::down(0.0, 0.0, 20).into());
        c.handle(&PointerEvent::up(-10.5, 0.0, 30).into());
        let swipe = swipes(&c)[1];
        assert!((swipe.angle - PI).abs() < 1e-9);
    }

    #[test]
    fn test_angle_independent_of_duration() {
        for (i, duration) in [0u64, 1, 500, 60_000].into_iter().enumerate() {
            let mut c = classifier();
            c.press_start(PressId::Pointer, Some((10.0, 10.0)), 1000);
            let swipe = c
                .press_end(PressId::Pointer, Some((40.0, -20.0)), 1000 + duration)
                .unwrap();
            assert!((swipe.angle - (-30.0f64).atan2(30.0)).abs() < 1e-12, "case {}", i);
            assert_eq!(swipe.duration, duration);
        }
    }

    #[test]
    fn test_custom_threshold() {
        let config = SwipeConfig {
            click_distance_threshold: 50.0,
            ..SwipeConfig::default()
        };
        let mut c = GestureClassifier::new(config, SwipeLog::default());
        c.handle(&PointerEvent::down(0.0, 0.0, 0).into());
        c.handle(&PointerEvent::up(30.0, 0.0, 10).into());
        assert!(swipes(&c)[0].is_click());
    }

    #[test]
    fn test_negative_duration_clamped() {
        let mut c = classifier();
        c.handle(&PointerEvent::down(0.0, 0.0, 500).into());
        c.handle(&PointerEvent::up(0.0, 100.0, 400).into());
        assert_eq!(swipes(&c)[0].duration, 0);
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut c = classifier();
        assert_eq!(c.handle(&PointerEvent::up(0.0, 0.0, 10).into()), 0);
        assert_eq!(c.handle(&KeyEvent::up("ArrowUp", 10).into()), 0);
        assert!(swipes(&c).is_empty());
        assert_eq!(c.pending_count(), 0);
    }

    #[test]
    fn test_orphan_release_leaves_other_presses_alone() {
        let mut c = classifier();
        c.handle(&KeyEvent::down("ArrowUp", 1000).into());

        assert_eq!(c.handle(&PointerEvent::up(5.0, 5.0, 1050).into()), 0);
        assert_eq!(c.handle(&KeyEvent::up("ArrowDown", 1100).into()), 0);
        assert_eq!(c.handle(&KeyEvent::up(" ", 1150).into()), 0);
        assert!(swipes(&c).is_empty());
        assert_eq!(c.pending_count(), 1);
        assert!(c.is_pending(&PressId::Key("ArrowUp".into())));

        assert_eq!(c.handle(&KeyEvent::up("ArrowUp", 1250).into()), 1);
        assert_eq!(swipes(&c)[0].angle, -FRAC_PI_2);
        assert_eq!(swipes(&c)[0].duration, 250);
    }

    #[test]
    fn test_activate_keys_have_separate_presses() {
        let mut c = classifier();
        c.handle(&KeyEvent::down(" ", 0).into());
        c.handle(&KeyEvent::down("Enter", 10).into());
        assert_eq!(c.pending_count(), 2);

        assert_eq!(c.handle(&KeyEvent::up("Enter", 20).into()), 1);
        assert!(c.is_pending(&PressId::Key(" ".into())));
        assert_eq!(c.handle(&KeyEvent::up(" ", 30).into()), 1);

        let durations: Vec<u64> = swipes(&c).iter().map(|s| s.duration).collect();
        assert_eq!(durations, vec![10, 30]);
        assert!(swipes(&c).iter().all(|s| s.is_click()));
    }

    #[test]
    fn test_second_pointer_press_does_not_restart() {
        let mut c = classifier();
        c.handle(&PointerEvent::down(0.0, 0.0, 0).into());
        c.handle(&PointerEvent::down(500.0, 500.0, 100).into());
        c.handle(&PointerEvent::up(0.0, 40.0, 300).into());

        let swipe = swipes(&c)[0];
        assert_eq!(swipe.duration, 300);
        assert!((swipe.angle - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_touch_shares_pointer_slot() {
        let mut c = classifier();
        c.handle(&PointerEvent::down(0.0, 0.0, 0).touch().into());
        c.handle(&PointerEvent::up(20.0, 0.0, 80).touch().into());
        assert_eq!(swipes(&c)[0].angle, 0.0);
    }

    #[test]
    fn test_pointer_leave_discards_press() {
        let mut c = classifier();
        c.handle(&PointerEvent::down(0.0, 0.0, 0).into());
        c.handle(&PointerEvent::leave(50).into());
        assert_eq!(c.handle(&PointerEvent::up(0.0, 50.0, 100).into()), 0);
        assert!(swipes(&c).is_empty());
    }

    #[test]
    fn test_missing_position_is_ignored() {
        let mut c = classifier();
        let mut down = PointerEvent::down(0.0, 0.0, 0);
        down.position = None;
        c.handle(&down.into());
        assert_eq!(c.pending_count(), 0);

        c.handle(&PointerEvent::down(0.0, 0.0, 0).into());
        let mut up = PointerEvent::up(0.0, 0.0, 10);
        up.position = Some((f64::NAN, 3.0));
        assert_eq!(c.handle(&up.into()), 0);
        assert_eq!(c.pending_count(), 0);
    }

    #[test]
    fn test_surface_filters_pointer() {
        let config = SwipeConfig {
            surface: Some(Surface::new(0.0, 0.0, 200.0, 200.0)),
            ..SwipeConfig::default()
        };
        let mut c = GestureClassifier::new(config, SwipeLog::default());

        c.handle(&PointerEvent::down(300.0, 10.0, 0).into());
        assert!(!c.is_pending(&PressId::Pointer));

        c.handle(&PointerEvent::down(10.0, 10.0, 0).into());
        assert_eq!(c.handle(&PointerEvent::up(250.0, 10.0, 30).into()), 0);
        assert!(!c.is_pending(&PressId::Pointer));
        assert!(swipes(&c).is_empty());
    }

    #[test]
    fn test_keyboard_mapping() {
        let cases = [
            ("ArrowLeft", -PI),
            ("ArrowUp", -FRAC_PI_2),
            ("ArrowRight", 0.0),
            ("ArrowDown", FRAC_PI_2),
            (" ", CLICK_ANGLE),
        ];
        let mut c = classifier();
        for (i, (key, _)) in cases.iter().enumerate() {
            let t = i as u64 * 100;
            c.handle(&KeyEvent::down(*key, t).into());
            c.handle(&KeyEvent::up(*key, t + 40).into());
        }
        let got: Vec<f64> = swipes(&c).iter().map(|s| s.angle).collect();
        let want: Vec<f64> = cases.iter().map(|(_, a)| *a).collect();
        assert_eq!(got, want);
        assert!(swipes(&c).iter().all(|s| s.position().is_none() && s.duration == 40));
    }

    #[test]
    fn test_unrecognized_key_ignored() {
        let mut c = classifier();
        c.handle(&KeyEvent::down("q", 0).into());
        assert_eq!(c.pending_count(), 0);
        assert_eq!(c.handle(&KeyEvent::up("q", 10).into()), 0);
    }

    #[test]
    fn test_key_repeat_keeps_first_timestamp() {
        let mut c = classifier();
        c.handle(&KeyEvent::down("ArrowUp", 1000).into());
        c.handle(&KeyEvent::down("ArrowUp", 1100).into());
        c.handle(&KeyEvent::up("ArrowUp", 1250).into());

        let swipe = swipes(&c)[0];
        assert_eq!(swipe.angle, -FRAC_PI_2);
        assert_eq!(swipe.duration, 250);
        assert_eq!(swipe.x, UNKNOWN_POSITION);
        assert_eq!(swipe.y, UNKNOWN_POSITION);
    }

    #[test]
    fn test_keys_are_tracked_independently() {
        let mut c = classifier();
        c.handle(&KeyEvent::down("ArrowLeft", 0).into());
        c.handle(&KeyEvent::down("ArrowDown", 10).into());
        assert_eq!(c.pending_count(), 2);
        c.handle(&KeyEvent::up("ArrowDown", 30).into());
        c.handle(&KeyEvent::up("ArrowLeft", 100).into());

        assert_eq!(swipes(&c)[0].angle, FRAC_PI_2);
        assert_eq!(swipes(&c)[0].duration, 20);
        assert_eq!(swipes(&c)[1].angle, -PI);
        assert_eq!(swipes(&c)[1].duration, 100);
    }

    #[test]
    fn test_locked_sequence_emits_nothing() {
        let config = SwipeConfig {
            locked_screen: true,
            ..SwipeConfig::default()
        };
        let mut c = GestureClassifier::new(config, SwipeLog::default());
        c.handle(&KeyEvent::down("ArrowUp", 1000).into());
        assert_eq!(c.pending_count(), 0);
        assert_eq!(c.handle(&KeyEvent::up("ArrowUp", 1250).into()), 0);
        assert!(swipes(&c).is_empty());
    }

    #[test]
    fn test_lock_cancels_in_flight_press() {
        let mut c = classifier();
        c.handle(&PointerEvent::down(0.0, 0.0, 0).into());
        c.handle(&KeyEvent::down("ArrowUp", 0).into());
        c.set_locked(true);
        assert_eq!(c.pending_count(), 0);

        c.handle(&PointerEvent::up(0.0, 90.0, 100).into());
        c.set_locked(false);
        // Unlocking does not bring the press back
        assert_eq!(c.handle(&KeyEvent::up("ArrowUp", 200).into()), 0);
        assert!(swipes(&c).is_empty());
    }

    #[test]
    fn test_reset_single_and_all() {
        let mut c = classifier();
        c.handle(&PointerEvent::down(0.0, 0.0, 0).into());
        c.handle(&KeyEvent::down("ArrowUp", 0).into());
        c.reset(Some(&PressId::Key("ArrowUp".into())));
        assert!(c.is_pending(&PressId::Pointer));
        assert_eq!(c.pending_count(), 1);

        c.focus_lost();
        assert_eq!(c.pending_count(), 0);
    }

    #[test]
    fn test_gamepad_held_button_emits_once() {
        let mut c = classifier();
        for t in [0, 66, 132, 198] {
            assert_eq!(c.handle(&poll(t, vec![GamepadState::with_pressed(0, &[12])])), 0);
        }
        assert_eq!(c.handle(&poll(264, vec![GamepadState::with_pressed(0, &[])])), 1);
        assert_eq!(c.handle(&poll(330, vec![GamepadState::with_pressed(0, &[])])), 0);

        let swipe = swipes(&c)[0];
        assert_eq!(swipe.angle, -FRAC_PI_2);
        assert_eq!(swipe.duration, 264);
        assert!(swipe.position().is_none());
    }

    #[test]
    fn test_gamepad_mapping() {
        let cases = [
            (BUTTON_DPAD_UP, -FRAC_PI_2),
            (BUTTON_DPAD_DOWN, FRAC_PI_2),
            (BUTTON_DPAD_LEFT, -PI),
            (BUTTON_DPAD_RIGHT, 0.0),
            (0, CLICK_ANGLE),
            (9, CLICK_ANGLE),
        ];
        for (button, angle) in cases {
            assert_eq!(gamepad_button_angle(button), angle);
        }

        let mut c = classifier();
        c.handle(&poll(0, vec![GamepadState::with_pressed(0, &[0, 15])]));
        assert_eq!(c.handle(&poll(66, vec![GamepadState::with_pressed(0, &[])])), 2);
        let got: Vec<f64> = swipes(&c).iter().map(|s| s.angle).collect();
        assert_eq!(got, vec![CLICK_ANGLE, 0.0]);
    }

    #[test]
    fn test_duplicate_device_in_poll_uses_first_entry() {
        let mut c = classifier();
        let dup = vec![
            GamepadState::with_pressed(0, &[12]),
            GamepadState::with_pressed(0, &[]),
        ];
        assert_eq!(c.handle(&poll(0, dup)), 0);
        assert!(c.is_pending(&PressId::Gamepad { device: 0, button: 12 }));

        let dup = vec![
            GamepadState::with_pressed(0, &[12]),
            GamepadState::with_pressed(0, &[]),
        ];
        assert_eq!(c.handle(&poll(66, dup)), 0);
        assert!(swipes(&c).is_empty());

        assert_eq!(c.handle(&poll(132, vec![GamepadState::with_pressed(0, &[])])), 1);
        assert_eq!(swipes(&c)[0].duration, 132);
    }

    #[test]
    fn test_gamepad_devices_are_independent() {
        let mut c = classifier();
        c.handle(&poll(
            0,
            vec![
                GamepadState::with_pressed(0, &[14]),
                GamepadState::with_pressed(1, &[14]),
            ],
        ));
        assert_eq!(c.pending_count(), 2);
        c.handle(&poll(
            66,
            vec![
                GamepadState::with_pressed(0, &[14]),
                GamepadState::with_pressed(1, &[]),
            ],
        ));
        assert_eq!(swipes(&c).len(), 1);
        assert!(c.is_pending(&PressId::Gamepad { device: 0, button: 14 }));
    }

    #[test]
    fn test_gamepad_disconnect_discards_press() {
        let mut c = classifier();
        c.handle(&poll(0, vec![GamepadState::with_pressed(0, &[13])]));
        // Device vanished from the poll
        assert_eq!(c.handle(&poll(66, vec![])), 0);
        assert_eq!(c.pending_count(), 0);

        c.handle(&poll(132, vec![GamepadState::with_pressed(2, &[13])]));
        c.handle(&InputEvent::GamepadConnection {
            index: 2,
            connected: false,
            timestamp: 150,
        });
        assert_eq!(c.handle(&poll(198, vec![GamepadState::with_pressed(2, &[])])), 0);

        let mut gone = GamepadState::with_pressed(3, &[1]);
        c.handle(&poll(264, vec![gone.clone()]));
        gone.connected = false;
        c.handle(&poll(330, vec![gone]));
        assert_eq!(c.pending_count(), 0);
        assert!(swipes(&c).is_empty());
    }

    #[test]
    fn test_gamepad_button_held_through_lock() {
        let mut c = classifier();
        c.handle(&poll(0, vec![GamepadState::with_pressed(0, &[15])]));
        c.set_locked(true);
        c.handle(&poll(66, vec![GamepadState::with_pressed(0, &[15, 12])]));
        c.set_locked(false);

        // Both buttons still held after unlock: neither starts a new press
        c.handle(&poll(132, vec![GamepadState::with_pressed(0, &[15, 12])]));
        assert_eq!(c.pending_count(), 0);
        assert_eq!(c.handle(&poll(198, vec![GamepadState::with_pressed(0, &[])])), 0);

        // A fresh press after release works again
        c.handle(&poll(264, vec![GamepadState::with_pressed(0, &[15])]));
        assert_eq!(c.handle(&poll(330, vec![GamepadState::with_pressed(0, &[])])), 1);
        assert_eq!(swipes(&c)[0].duration, 66);
    }

    #[test]
    fn test_surface_edge_positions() {
        let config = SwipeConfig {
            key_positions: KeyPositionMode::SurfaceEdges,
            surface: Some(Surface::new(0.0, 0.0, 400.0, 200.0)),
            ..SwipeConfig::default()
        };
        let mut c = GestureClassifier::new(config, SwipeLog::default());
        for (i, key) in ["ArrowLeft", "ArrowUp", "ArrowRight", "ArrowDown", " "].iter().enumerate() {
            c.handle(&KeyEvent::down(*key, i as u64).into());
            c.handle(&KeyEvent::up(*key, i as u64 + 1).into());
        }
        let positions: Vec<Option<(f64, f64)>> = swipes(&c).iter().map(|s| s.position()).collect();
        assert_eq!(
            positions,
            vec![
                Some((0.0, 100.0)),
                Some((200.0, 0.0)),
                Some((400.0, 100.0)),
                Some((200.0, 200.0)),
                None,
            ]
        );
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        {
            let mut c = GestureClassifier::new(SwipeConfig::default(), |s: SwipeData| seen.push(s));
            c.handle(&KeyEvent::down("Enter", 0).into());
            c.handle(&KeyEvent::up("Enter", 5).into());
        }
        assert_eq!(seen.len(), 1);
        assert!(seen[0].is_click());
    }

    #[test]
    fn test_classifiers_do_not_share_state() {
        let mut a = classifier();
        let mut b = classifier();
        a.handle(&KeyEvent::down("ArrowUp", 0).into());
        assert_eq!(b.handle(&KeyEvent::up("ArrowUp", 10).into()), 0);
        assert_eq!(a.handle(&KeyEvent::up("ArrowUp", 10).into()), 1);
    }
}
