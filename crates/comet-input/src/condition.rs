//! The condition abstraction: gating state machine, fire events, and the
//! [`InputCondition`] trait every concrete condition implements.
//!
//! A condition is a stateful predicate over device input, evaluated once per
//! frame, that "fires" (returns true and notifies subscribers) subject to
//! debounce, min-hold, cooldown, focus, and consumption gates. The timing
//! gates live in [`ConditionPhase`] and are shared by every condition kind.

use crate::error::InputError;
use crate::gamepad::{GamepadButton, GamepadSensor};
use crate::keyboard::LockKey;
use crate::mouse::{MouseButton, MouseSensor};
use crate::state::InputState;
use crate::touch::Gesture;
use crate::value::Value;
use winit::keyboard::KeyCode;

/// Which device family a condition observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Keyboard keys and lock states.
    Keyboard,
    /// Mouse buttons and sensors.
    Mouse,
    /// Gamepad buttons and analog sensors.
    Gamepad,
    /// Touch gestures.
    Touch,
    /// Voice phrases.
    Voice,
    /// An [`AllCondition`](crate::composite::AllCondition) combinator.
    All,
    /// An [`AnyCondition`](crate::composite::AnyCondition) combinator.
    Any,
    /// User-supplied condition types.
    Custom,
}

/// Gating knobs common to every condition.
#[derive(Debug, Clone, Copy)]
pub struct ConditionSettings {
    /// Only fire while the host window has input focus.
    pub window_must_be_active: bool,
    /// On fire, claim the underlying axis for this frame.
    pub consumable: bool,
    /// Allow firing even when the axis was already claimed this frame.
    pub allowed_if_consumed: bool,
    /// The predicate must have held for at least this long before firing.
    pub min_hold_ms: u64,
    /// Minimum gap between two fires.
    pub cooldown_ms: u64,
}

impl Default for ConditionSettings {
    fn default() -> Self {
        Self {
            window_must_be_active: true,
            consumable: true,
            allowed_if_consumed: false,
            min_hold_ms: 0,
            cooldown_ms: 0,
        }
    }
}

/// Active/Inactive tracking plus the timing gates.
///
/// The phase flips whenever the instantaneous predicate result changes, and
/// the flip timestamp anchors the min-hold gate; the last-fire timestamp
/// anchors the cooldown gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionPhase {
    met: bool,
    state_started_ms: u64,
    last_fired_ms: Option<u64>,
}

impl ConditionPhase {
    /// Creates an inactive phase at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the predicate held at the last evaluation.
    #[must_use]
    pub fn met(&self) -> bool {
        self.met
    }

    /// When the phase last flipped.
    #[must_use]
    pub fn state_started_ms(&self) -> u64 {
        self.state_started_ms
    }

    /// When the condition last fired, if ever.
    #[must_use]
    pub fn last_fired_ms(&self) -> Option<u64> {
        self.last_fired_ms
    }

    /// Flips the phase and restamps the start time when `current_valid`
    /// differs from the stored state; no-op otherwise.
    pub fn transition(&mut self, current_valid: bool, now_ms: u64) {
        if current_valid != self.met {
            self.met = current_valid;
            self.state_started_ms = now_ms;
        }
    }

    /// Min-hold gate: `min_hold_ms == 0`, or the phase has held that long.
    #[must_use]
    pub fn hold_satisfied(&self, min_hold_ms: u64, now_ms: u64) -> bool {
        min_hold_ms == 0 || now_ms.saturating_sub(self.state_started_ms) >= min_hold_ms
    }

    /// Cooldown gate: `cooldown_ms == 0`, never fired, or the gap has elapsed.
    #[must_use]
    pub fn cooldown_satisfied(&self, cooldown_ms: u64, now_ms: u64) -> bool {
        cooldown_ms == 0
            || self
                .last_fired_ms
                .is_none_or(|t| now_ms.saturating_sub(t) >= cooldown_ms)
    }

    /// Stamps a successful fire.
    pub fn record_fire(&mut self, now_ms: u64) {
        self.last_fired_ms = Some(now_ms);
    }
}

/// Condition-specific payload carried by a [`FireEvent`].
///
/// Every variant is a plain-data snapshot built fresh at fire time; nothing
/// here aliases tracker internals.
#[derive(Debug, Clone, PartialEq)]
pub enum FireDetails {
    /// A keyboard key condition fired.
    Key {
        /// The observed key.
        key: KeyCode,
    },
    /// A keyboard lock condition fired.
    Lock {
        /// The observed lock.
        lock: LockKey,
        /// The lock state the condition requires.
        enabled: bool,
    },
    /// A mouse button condition fired.
    MouseButton {
        /// The observed button.
        button: MouseButton,
        /// Pointer position at fire time.
        position: glam::Vec2,
    },
    /// A mouse sensor condition fired.
    MouseSensor {
        /// The observed sensor.
        sensor: MouseSensor,
        /// Sensor value at fire time.
        value: Value,
        /// Sensor delta at fire time.
        delta: Value,
    },
    /// A gamepad button condition fired.
    PadButton {
        /// The observed button.
        button: GamepadButton,
        /// The targeted player, or `None` for any/all-pad conditions.
        player: Option<usize>,
    },
    /// A gamepad sensor condition fired.
    PadSensor {
        /// The observed sensor.
        sensor: GamepadSensor,
        /// Sensor value at fire time.
        value: Value,
    },
    /// A touch gesture condition fired.
    Gesture {
        /// The recognized gesture.
        gesture: Gesture,
    },
    /// A voice phrase condition fired.
    Phrase {
        /// The recognized phrase.
        phrase: String,
    },
    /// A composite fired; one cloned snapshot per participating child.
    Many(Vec<FireDetails>),
    /// No device payload.
    None,
}

/// Snapshot handed to fire subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct FireEvent {
    /// The firing condition's device family.
    pub source: Source,
    /// Frame on which the fire happened.
    pub frame: u64,
    /// Host time at the fire.
    pub now_ms: u64,
    /// How long the condition had been in its current phase.
    pub ms_in_state: u64,
    /// Whether the window had focus.
    pub window_active: bool,
    /// Condition-specific payload.
    pub details: FireDetails,
}

/// Ordered list of fire subscribers, invoked synchronously in subscription
/// order. A subscriber that panics propagates to the evaluating caller.
#[derive(Default)]
pub struct EventHooks {
    subscribers: Vec<Box<dyn FnMut(&FireEvent)>>,
}

impl std::fmt::Debug for EventHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHooks")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EventHooks {
    /// Creates an empty subscriber list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a subscriber.
    pub fn subscribe(&mut self, callback: impl FnMut(&FireEvent) + 'static) {
        self.subscribers.push(Box::new(callback));
    }

    /// Whether any subscriber is registered.
    #[must_use]
    pub fn any(&self) -> bool {
        !self.subscribers.is_empty()
    }

    /// Invokes every subscriber in order.
    pub fn dispatch(&mut self, event: &FireEvent) {
        for callback in &mut self.subscribers {
            callback(event);
        }
    }
}

/// A stateful per-frame input predicate.
///
/// Implementations are evaluated every frame (manually or via the tracked
/// registry); [`evaluate`](Self::evaluate) returns whether the condition
/// fired this frame and dispatches fire events internally.
pub trait InputCondition {
    /// The device family this condition observes.
    fn source(&self) -> Source;

    /// The current phase (met-state and timestamps).
    fn phase(&self) -> ConditionPhase;

    /// Runs one evaluation against the current frame.
    ///
    /// # Errors
    /// Runtime faults such as an out-of-range player index. Composites treat
    /// child errors as "no opinion this frame" and log them.
    fn evaluate(&mut self, state: &mut InputState) -> Result<bool, InputError>;

    /// Claims the underlying axis for the current frame.
    fn consume(&mut self, state: &mut InputState);

    /// Whether the underlying axis is already claimed this frame.
    fn is_consumed(&self, state: &InputState) -> bool;

    /// Builds a fresh payload snapshot for the current frame.
    fn details(&self, state: &InputState) -> FireDetails;
}

/// Builds the [`FireEvent`] for a fire happening right now.
pub(crate) fn build_fire_event(
    source: Source,
    phase: &ConditionPhase,
    state: &InputState,
    details: FireDetails,
) -> FireEvent {
    FireEvent {
        source,
        frame: state.frame(),
        now_ms: state.now_ms(),
        ms_in_state: state.now_ms().saturating_sub(phase.state_started_ms()),
        window_active: state.window_active(),
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_restamps_only_on_change() {
        let mut phase = ConditionPhase::new();
        phase.transition(true, 100);
        assert!(phase.met());
        assert_eq!(phase.state_started_ms(), 100);

        // Still true: timestamp preserved.
        phase.transition(true, 200);
        assert_eq!(phase.state_started_ms(), 100);

        phase.transition(false, 300);
        assert!(!phase.met());
        assert_eq!(phase.state_started_ms(), 300);
    }

    #[test]
    fn test_hold_gate() {
        let mut phase = ConditionPhase::new();
        phase.transition(true, 100);
        assert!(phase.hold_satisfied(0, 100));
        assert!(!phase.hold_satisfied(50, 120));
        assert!(phase.hold_satisfied(50, 150));
    }

    #[test]
    fn test_cooldown_gate() {
        let mut phase = ConditionPhase::new();
        // Never fired: cooldown passes.
        assert!(phase.cooldown_satisfied(1000, 0));
        phase.record_fire(100);
        assert!(!phase.cooldown_satisfied(1000, 500));
        assert!(phase.cooldown_satisfied(1000, 1100));
        assert!(phase.cooldown_satisfied(0, 101));
    }

    #[test]
    fn test_hooks_invoked_in_subscription_order() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let order = Rc::new(RefCell::new(Vec::new()));
        let mut hooks = EventHooks::new();
        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            hooks.subscribe(move |_| order.borrow_mut().push(tag));
        }

        let event = FireEvent {
            source: Source::Custom,
            frame: 1,
            now_ms: 16,
            ms_in_state: 0,
            window_active: true,
            details: FireDetails::None,
        };
        hooks.dispatch(&event);
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }
}
