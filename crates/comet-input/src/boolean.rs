//! The debounced boolean condition.
//!
//! [`BooleanCondition`] pairs the shared gating state machine with a
//! [`BooleanSource`] adapter supplying the `(current, previous)` predicate
//! pair for one concrete input axis. The two-frame rule (both predicates
//! must hold before a fire) is what debounces "Pressed"-style conditions.

use crate::condition::{
    ConditionPhase, ConditionSettings, EventHooks, FireDetails, FireEvent, InputCondition, Source,
    build_fire_event,
};
use crate::error::InputError;
use crate::state::InputState;

/// One concrete boolean input axis, as seen by a [`BooleanCondition`].
///
/// `current`/`previous` are the predicate evaluated against this frame's and
/// last frame's snapshots. Consumption routes to the tracker owning the axis.
pub trait BooleanSource {
    /// The device family of the axis.
    fn source(&self) -> Source;

    /// The predicate against the current frame.
    ///
    /// # Errors
    /// Runtime faults such as an out-of-range player index.
    fn current(&self, state: &InputState) -> Result<bool, InputError>;

    /// The predicate against the previous frame.
    ///
    /// # Errors
    /// Runtime faults such as an out-of-range player index.
    fn previous(&self, state: &InputState) -> Result<bool, InputError>;

    /// Claims the axis for the current frame.
    fn consume(&self, state: &mut InputState);

    /// Whether the axis is already claimed this frame.
    fn is_consumed(&self, state: &InputState) -> bool;

    /// Region gate; only cursor/gesture adapters override this.
    fn in_bounds(&self, _state: &InputState) -> bool {
        true
    }

    /// Payload snapshot for fire events.
    fn details(&self, state: &InputState) -> FireDetails;
}

/// A debounced boolean condition over a single input axis.
pub struct BooleanCondition {
    adapter: Box<dyn BooleanSource>,
    settings: ConditionSettings,
    phase: ConditionPhase,
    hooks: EventHooks,
}

impl std::fmt::Debug for BooleanCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BooleanCondition")
            .field("source", &self.adapter.source())
            .field("settings", &self.settings)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl BooleanCondition {
    /// Wraps `adapter` with the given gating settings.
    #[must_use]
    pub fn new(adapter: impl BooleanSource + 'static, settings: ConditionSettings) -> Self {
        Self {
            adapter: Box::new(adapter),
            settings,
            phase: ConditionPhase::new(),
            hooks: EventHooks::new(),
        }
    }

    /// Registers a fire subscriber (invoked in subscription order).
    pub fn on_fire(&mut self, callback: impl FnMut(&FireEvent) + 'static) {
        self.hooks.subscribe(callback);
    }

    /// The gating settings.
    #[must_use]
    pub fn settings(&self) -> ConditionSettings {
        self.settings
    }
}

impl InputCondition for BooleanCondition {
    fn source(&self) -> Source {
        self.adapter.source()
    }

    fn phase(&self) -> ConditionPhase {
        self.phase
    }

    fn evaluate(&mut self, state: &mut InputState) -> Result<bool, InputError> {
        let current = self.adapter.current(state)?;
        let previous = self.adapter.previous(state)?;
        let now_ms = state.now_ms();
        self.phase.transition(current, now_ms);

        let fired = (!self.settings.window_must_be_active || state.window_active())
            && (self.settings.allowed_if_consumed || !self.adapter.is_consumed(state))
            && self.phase.hold_satisfied(self.settings.min_hold_ms, now_ms)
            && self.phase.cooldown_satisfied(self.settings.cooldown_ms, now_ms)
            && current
            && previous
            && self.adapter.in_bounds(state);

        if fired {
            if self.settings.consumable {
                self.adapter.consume(state);
            }
            self.phase.record_fire(now_ms);
            if self.hooks.any() {
                let details = self.adapter.details(state);
                let event = build_fire_event(self.adapter.source(), &self.phase, state, details);
                self.hooks.dispatch(&event);
            }
        }
        Ok(fired)
    }

    fn consume(&mut self, state: &mut InputState) {
        self.adapter.consume(state);
    }

    fn is_consumed(&self, state: &InputState) -> bool {
        self.adapter.is_consumed(state)
    }

    fn details(&self, state: &InputState) -> FireDetails {
        self.adapter.details(state)
    }
}
