//! `All`/`Any` combinators over child conditions.
//!
//! Composites own their children and evaluate them in insertion order with
//! short-circuiting, so a child that is never reached this frame keeps its
//! consumption untouched. A child that faults (e.g. its pad disconnected) is
//! logged and treated as not fired; one broken child must not take down the
//! whole set.

use crate::condition::{
    ConditionPhase, EventHooks, FireDetails, FireEvent, InputCondition, Source, build_fire_event,
};
use crate::error::InputError;
use crate::state::InputState;
use tracing::warn;

/// Fires when every child fires on the same frame.
///
/// With `order_matters` the children must also have entered their satisfied
/// phase in list order: each child's phase-start timestamp must be no earlier
/// than the previous child's. That is what distinguishes `Ctrl` then `C`
/// from `C` then `Ctrl`.
pub struct AllCondition {
    children: Vec<Box<dyn InputCondition>>,
    order_matters: bool,
    phase: ConditionPhase,
    hooks: EventHooks,
}

impl std::fmt::Debug for AllCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AllCondition")
            .field("children", &self.children.len())
            .field("order_matters", &self.order_matters)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl AllCondition {
    /// Wraps `children`.
    ///
    /// # Errors
    /// [`InputError::EmptyComposite`] when `children` is empty.
    pub fn new(
        children: Vec<Box<dyn InputCondition>>,
        order_matters: bool,
    ) -> Result<Self, InputError> {
        if children.is_empty() {
            return Err(InputError::EmptyComposite);
        }
        Ok(Self {
            children,
            order_matters,
            phase: ConditionPhase::new(),
            hooks: EventHooks::new(),
        })
    }

    /// Registers a fire subscriber (invoked in subscription order).
    pub fn on_fire(&mut self, callback: impl FnMut(&FireEvent) + 'static) {
        self.hooks.subscribe(callback);
    }
}

impl InputCondition for AllCondition {
    fn source(&self) -> Source {
        Source::All
    }

    fn phase(&self) -> ConditionPhase {
        self.phase
    }

    fn evaluate(&mut self, state: &mut InputState) -> Result<bool, InputError> {
        let now_ms = state.now_ms();
        let mut min_started: Option<u64> = None;
        let mut details = Vec::with_capacity(self.children.len());

        for child in &mut self.children {
            let fired = match child.evaluate(state) {
                Ok(fired) => fired,
                Err(e) => {
                    warn!("composite child failed to evaluate: {e}");
                    false
                }
            };
            if !fired {
                // Short-circuit: later children are not evaluated and keep
                // their consumption untouched.
                self.phase.transition(false, now_ms);
                return Ok(false);
            }
            if self.order_matters {
                // Each accepted child must have entered its satisfied phase
                // no earlier than the minimum of the children before it.
                let started = child.phase().state_started_ms();
                if min_started.is_some_and(|min| started < min) {
                    self.phase.transition(false, now_ms);
                    return Ok(false);
                }
                min_started = Some(min_started.map_or(started, |min| min.min(started)));
            }
            details.push(child.details(state));
        }

        self.phase.transition(true, now_ms);
        self.phase.record_fire(now_ms);
        if self.hooks.any() {
            let event = build_fire_event(
                Source::All,
                &self.phase,
                state,
                FireDetails::Many(details),
            );
            self.hooks.dispatch(&event);
        }
        Ok(true)
    }

    fn consume(&mut self, state: &mut InputState) {
        for child in &mut self.children {
            child.consume(state);
        }
    }

    fn is_consumed(&self, state: &InputState) -> bool {
        self.children.iter().all(|c| c.is_consumed(state))
    }

    fn details(&self, state: &InputState) -> FireDetails {
        FireDetails::Many(self.children.iter().map(|c| c.details(state)).collect())
    }
}

/// Fires when any child fires, short-circuiting at the first.
///
/// The composite's fire event carries the winning child's details, so a
/// subscriber can tell which binding triggered a shared action.
pub struct AnyCondition {
    children: Vec<Box<dyn InputCondition>>,
    phase: ConditionPhase,
    hooks: EventHooks,
}

impl std::fmt::Debug for AnyCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyCondition")
            .field("children", &self.children.len())
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl AnyCondition {
    /// Wraps `children`.
    ///
    /// # Errors
    /// [`InputError::EmptyComposite`] when `children` is empty.
    pub fn new(children: Vec<Box<dyn InputCondition>>) -> Result<Self, InputError> {
        if children.is_empty() {
            return Err(InputError::EmptyComposite);
        }
        Ok(Self {
            children,
            phase: ConditionPhase::new(),
            hooks: EventHooks::new(),
        })
    }

    /// Registers a fire subscriber (invoked in subscription order).
    pub fn on_fire(&mut self, callback: impl FnMut(&FireEvent) + 'static) {
        self.hooks.subscribe(callback);
    }
}

impl InputCondition for AnyCondition {
    fn source(&self) -> Source {
        Source::Any
    }

    fn phase(&self) -> ConditionPhase {
        self.phase
    }

    fn evaluate(&mut self, state: &mut InputState) -> Result<bool, InputError> {
        let now_ms = state.now_ms();
        let mut winner = None;

        for child in &mut self.children {
            match child.evaluate(state) {
                Ok(true) => {
                    winner = Some(child.details(state));
                    break;
                }
                Ok(false) => {}
                Err(e) => warn!("composite child failed to evaluate: {e}"),
            }
        }

        let Some(details) = winner else {
            self.phase.transition(false, now_ms);
            return Ok(false);
        };

        self.phase.transition(true, now_ms);
        self.phase.record_fire(now_ms);
        if self.hooks.any() {
            let event = build_fire_event(Source::Any, &self.phase, state, details);
            self.hooks.dispatch(&event);
        }
        Ok(true)
    }

    fn consume(&mut self, state: &mut InputState) {
        for child in &mut self.children {
            child.consume(state);
        }
    }

    fn is_consumed(&self, state: &InputState) -> bool {
        self.children.iter().any(|c| c.is_consumed(state))
    }

    fn details(&self, state: &InputState) -> FireDetails {
        FireDetails::Many(self.children.iter().map(|c| c.details(state)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{ButtonPhase, KeySource, PadButtonSource};
    use crate::boolean::BooleanCondition;
    use crate::condition::ConditionSettings;
    use crate::gamepad::GamepadButton;
    use crate::poll::ManualPoller;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;
    use winit::keyboard::KeyCode;

    fn advance(state: &mut InputState, poller: &mut ManualPoller, ms: u64) {
        state.advance(poller, Duration::from_millis(ms));
    }

    fn key_pressed(key: KeyCode) -> Box<dyn InputCondition> {
        Box::new(BooleanCondition::new(
            KeySource::new(key, ButtonPhase::Pressed),
            ConditionSettings::default(),
        ))
    }

    #[test]
    fn test_empty_composite_rejected() {
        assert!(matches!(
            AllCondition::new(Vec::new(), false).unwrap_err(),
            InputError::EmptyComposite
        ));
        assert!(matches!(
            AnyCondition::new(Vec::new()).unwrap_err(),
            InputError::EmptyComposite
        ));
    }

    #[test]
    fn test_debug_summarizes_children_without_boxed_internals() {
        let all = AllCondition::new(vec![key_pressed(KeyCode::KeyA)], true).unwrap();
        let rendered = format!("{all:?}");
        assert!(rendered.contains("AllCondition"));
        assert!(rendered.contains("children: 1"));
        assert!(rendered.contains("order_matters: true"));

        let any = AnyCondition::new(vec![key_pressed(KeyCode::KeyA)]).unwrap();
        assert!(format!("{any:?}").contains("AnyCondition"));
    }

    #[test]
    fn test_all_fires_when_every_child_fires() {
        let mut all = AllCondition::new(
            vec![key_pressed(KeyCode::ControlLeft), key_pressed(KeyCode::KeyC)],
            false,
        )
        .unwrap();
        let mut state = InputState::default();
        let mut poller = ManualPoller::new();

        poller.press_key(KeyCode::ControlLeft);
        advance(&mut state, &mut poller, 16);
        advance(&mut state, &mut poller, 33);
        assert!(!all.evaluate(&mut state).unwrap());

        poller.press_key(KeyCode::KeyC);
        advance(&mut state, &mut poller, 50);
        advance(&mut state, &mut poller, 66);
        assert!(all.evaluate(&mut state).unwrap());
    }

    #[test]
    fn test_all_short_circuit_leaves_later_children_untouched() {
        // Child 1 cannot fire; child 2 would fire standalone.
        let mut all = AllCondition::new(
            vec![key_pressed(KeyCode::KeyA), key_pressed(KeyCode::KeyB)],
            false,
        )
        .unwrap();
        let mut state = InputState::default();
        let mut poller = ManualPoller::new();

        poller.press_key(KeyCode::KeyB);
        advance(&mut state, &mut poller, 16);
        advance(&mut state, &mut poller, 33);
        assert!(!all.evaluate(&mut state).unwrap());
        // Never evaluated, never consumed.
        assert!(!state.keyboard.is_key_consumed(KeyCode::KeyB, state.frame()));
    }

    #[test]
    fn test_order_matters_rejects_out_of_order_activation() {
        // A chord like "W then E": E held from before W's latest press must
        // not satisfy the ordered composite.
        let mut combo = AllCondition::new(
            vec![key_pressed(KeyCode::KeyW), key_pressed(KeyCode::KeyE)],
            true,
        )
        .unwrap();
        let mut state = InputState::default();
        let mut poller = ManualPoller::new();

        // W first, then E: fires.
        poller.press_key(KeyCode::KeyW);
        advance(&mut state, &mut poller, 16);
        assert!(!combo.evaluate(&mut state).unwrap());
        advance(&mut state, &mut poller, 33);
        assert!(!combo.evaluate(&mut state).unwrap());
        poller.press_key(KeyCode::KeyE);
        advance(&mut state, &mut poller, 50);
        assert!(!combo.evaluate(&mut state).unwrap());
        advance(&mut state, &mut poller, 66);
        assert!(combo.evaluate(&mut state).unwrap());

        // Release W while E stays held, then press W again: E's phase now
        // predates W's, so the order constraint rejects the chord.
        poller.release_key(KeyCode::KeyW);
        advance(&mut state, &mut poller, 83);
        assert!(!combo.evaluate(&mut state).unwrap());
        advance(&mut state, &mut poller, 100);
        assert!(!combo.evaluate(&mut state).unwrap());

        poller.press_key(KeyCode::KeyW);
        advance(&mut state, &mut poller, 116);
        assert!(!combo.evaluate(&mut state).unwrap());
        advance(&mut state, &mut poller, 133);
        assert!(!combo.evaluate(&mut state).unwrap());
    }

    #[test]
    fn test_any_captures_winning_child_details() {
        let mut any = AnyCondition::new(vec![
            key_pressed(KeyCode::KeyA),
            key_pressed(KeyCode::KeyB),
        ])
        .unwrap();
        let captured: Rc<RefCell<Vec<FireDetails>>> = Rc::new(RefCell::new(Vec::new()));
        {
            let captured = Rc::clone(&captured);
            any.on_fire(move |e| captured.borrow_mut().push(e.details.clone()));
        }

        let mut state = InputState::default();
        let mut poller = ManualPoller::new();
        poller.press_key(KeyCode::KeyB);
        advance(&mut state, &mut poller, 16);
        advance(&mut state, &mut poller, 33);
        assert!(any.evaluate(&mut state).unwrap());

        let captured = captured.borrow();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0], FireDetails::Key { key: KeyCode::KeyB });
    }

    #[test]
    fn test_any_short_circuits_after_first_firing_child() {
        let mut any = AnyCondition::new(vec![
            key_pressed(KeyCode::KeyA),
            key_pressed(KeyCode::KeyB),
        ])
        .unwrap();
        let mut state = InputState::default();
        let mut poller = ManualPoller::new();

        poller.press_key(KeyCode::KeyA);
        poller.press_key(KeyCode::KeyB);
        advance(&mut state, &mut poller, 16);
        advance(&mut state, &mut poller, 33);
        assert!(any.evaluate(&mut state).unwrap());
        // Child 1 won; child 2 was never evaluated or consumed.
        assert!(state.keyboard.is_key_consumed(KeyCode::KeyA, state.frame()));
        assert!(!state.keyboard.is_key_consumed(KeyCode::KeyB, state.frame()));
    }

    #[test]
    fn test_faulting_child_logged_and_skipped() {
        let mut state = InputState::default();
        let mut poller = ManualPoller::new();
        poller.connect_pad();
        advance(&mut state, &mut poller, 16);

        let pad_child: Box<dyn InputCondition> = Box::new(BooleanCondition::new(
            PadButtonSource::single(GamepadButton::South, ButtonPhase::Pressed, 0, &state)
                .unwrap(),
            ConditionSettings::default(),
        ));
        let mut any =
            AnyCondition::new(vec![pad_child, key_pressed(KeyCode::Space)]).unwrap();

        // Pad disappears: its child now faults with an out-of-range player.
        poller.disconnect_pad(0);
        poller.press_key(KeyCode::Space);
        advance(&mut state, &mut poller, 100_000);
        advance(&mut state, &mut poller, 100_016);

        // The keyboard child still carries the composite.
        assert!(any.evaluate(&mut state).unwrap());
    }
}
