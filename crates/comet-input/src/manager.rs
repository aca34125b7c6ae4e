//! The per-frame driver and tracking registry.
//!
//! [`InputManager`] owns the [`InputState`], the platform poller, and a named
//! registry of conditions to evaluate automatically every tick. Game code
//! calls [`update`](InputManager::update) once per frame with the host clock;
//! tracked conditions fire through their own subscriber hooks, so the return
//! values are not surfaced here.

use crate::condition::InputCondition;
use crate::error::InputError;
use crate::poll::InputPoller;
use crate::settings::InputSettings;
use crate::state::InputState;
use comet_registry::{Registry, RegistryError};
use std::time::Duration;
use tracing::warn;

/// Owns the input context, the poller, and the tracked-condition registry.
///
/// Tracked conditions are evaluated in `(depth, insertion)` order, which
/// doubles as consumption priority: a lower-depth condition claiming an axis
/// blocks same-frame higher-depth conditions on that axis.
pub struct InputManager<P: InputPoller> {
    state: InputState,
    poller: P,
    tracked: Registry<Box<dyn InputCondition>>,
    next_auto_name: u64,
}

impl<P: InputPoller> InputManager<P> {
    /// Creates a manager around `poller`.
    pub fn new(poller: P, settings: InputSettings) -> Self {
        Self {
            state: InputState::new(settings),
            poller,
            tracked: Registry::new(),
            next_auto_name: 0,
        }
    }

    /// The input context.
    #[must_use]
    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// Mutable access to the input context, for manual condition evaluation.
    pub fn state_mut(&mut self) -> &mut InputState {
        &mut self.state
    }

    /// The underlying poller.
    pub fn poller_mut(&mut self) -> &mut P {
        &mut self.poller
    }

    /// Advances one tick and evaluates every tracked condition in registry
    /// order. `now` is the host's monotonic time since start.
    ///
    /// A tracked condition that faults is logged and skipped for the frame;
    /// it stays registered.
    pub fn update(&mut self, now: Duration) {
        self.state.advance(&mut self.poller, now);
        for (name, _, condition) in self.tracked.iter_mut() {
            if let Err(e) = condition.evaluate(&mut self.state) {
                warn!("tracked condition {name:?} failed to evaluate: {e}");
            }
        }
    }

    /// Registers `condition` for automatic evaluation.
    ///
    /// With `name: None` a unique `condition_N` name is generated. Lower
    /// `depth` evaluates earlier. Returns the name the condition was
    /// registered under.
    ///
    /// # Errors
    /// [`InputError::NameCollision`] when `name` is taken and `force` is
    /// false; `force` replaces the existing entry instead.
    pub fn track(
        &mut self,
        condition: Box<dyn InputCondition>,
        name: Option<String>,
        depth: u32,
        force: bool,
    ) -> Result<String, InputError> {
        let name = name.unwrap_or_else(|| {
            let name = format!("condition_{}", self.next_auto_name);
            self.next_auto_name += 1;
            name
        });
        self.tracked
            .add(name.clone(), condition, depth, force)
            .map_err(|RegistryError::NameCollision(n)| InputError::NameCollision(n))?;
        Ok(name)
    }

    /// Unregisters the condition named `name`, returning it with its depth.
    pub fn untrack(&mut self, name: &str) -> Option<(Box<dyn InputCondition>, u32)> {
        self.tracked.remove(name)
    }

    /// Unregisters every condition at `depth`, in evaluation order.
    pub fn untrack_at_depth(&mut self, depth: u32) -> Vec<(String, Box<dyn InputCondition>)> {
        self.tracked.remove_at_depth(depth)
    }

    /// Borrows the tracked condition named `name`.
    #[must_use]
    pub fn tracked_condition(&self, name: &str) -> Option<&dyn InputCondition> {
        self.tracked.get(name).map(Box::as_ref)
    }

    /// Number of tracked conditions.
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{ButtonPhase, KeySource};
    use crate::boolean::BooleanCondition;
    use crate::condition::ConditionSettings;
    use crate::poll::ManualPoller;
    use std::cell::RefCell;
    use std::rc::Rc;
    use winit::keyboard::KeyCode;

    /// A tracked `Pressed` key condition plus a shared fire counter.
    fn counting_key_condition(
        key: KeyCode,
        settings: ConditionSettings,
    ) -> (Box<dyn InputCondition>, Rc<RefCell<u32>>) {
        let fires = Rc::new(RefCell::new(0));
        let mut condition = BooleanCondition::new(KeySource::new(key, ButtonPhase::Pressed), settings);
        {
            let fires = Rc::clone(&fires);
            condition.on_fire(move |_| *fires.borrow_mut() += 1);
        }
        (Box::new(condition), fires)
    }

    fn manager() -> InputManager<ManualPoller> {
        InputManager::new(ManualPoller::new(), InputSettings::default())
    }

    #[test]
    fn test_auto_generated_names() {
        let mut manager = manager();
        let (a, _) = counting_key_condition(KeyCode::KeyA, ConditionSettings::default());
        let (b, _) = counting_key_condition(KeyCode::KeyB, ConditionSettings::default());
        assert_eq!(manager.track(a, None, 0, false).unwrap(), "condition_0");
        assert_eq!(manager.track(b, None, 0, false).unwrap(), "condition_1");
        assert_eq!(manager.tracked_count(), 2);
    }

    #[test]
    fn test_name_collision_and_force() {
        let mut manager = manager();
        let (a, _) = counting_key_condition(KeyCode::KeyA, ConditionSettings::default());
        let (b, _) = counting_key_condition(KeyCode::KeyB, ConditionSettings::default());
        let (c, _) = counting_key_condition(KeyCode::KeyC, ConditionSettings::default());

        manager.track(a, Some("jump".into()), 0, false).unwrap();
        let err = manager.track(b, Some("jump".into()), 0, false).unwrap_err();
        assert!(matches!(err, InputError::NameCollision(ref n) if n == "jump"));

        manager.track(c, Some("jump".into()), 0, true).unwrap();
        assert_eq!(manager.tracked_count(), 1);
    }

    #[test]
    fn test_pressed_fires_once_over_down_down_up() {
        let mut manager = manager();
        let (cond, fires) =
            counting_key_condition(KeyCode::Space, ConditionSettings::default());
        manager.track(cond, Some("jump".into()), 0, false).unwrap();

        manager.poller_mut().press_key(KeyCode::Space);
        manager.update(Duration::from_millis(16));
        // First down frame: debounce holds.
        assert_eq!(*fires.borrow(), 0);

        manager.update(Duration::from_millis(33));
        assert_eq!(*fires.borrow(), 1);

        manager.poller_mut().release_key(KeyCode::Space);
        manager.update(Duration::from_millis(50));
        assert_eq!(*fires.borrow(), 1);
    }

    #[test]
    fn test_lower_depth_wins_consumption() {
        let mut manager = manager();
        let (ui, ui_fires) = counting_key_condition(KeyCode::Space, ConditionSettings::default());
        let (game, game_fires) =
            counting_key_condition(KeyCode::Space, ConditionSettings::default());
        // Registered game first, but UI sits at the shallower depth.
        manager.track(game, Some("game".into()), 5, false).unwrap();
        manager.track(ui, Some("ui".into()), 0, false).unwrap();

        manager.poller_mut().press_key(KeyCode::Space);
        manager.update(Duration::from_millis(16));
        manager.update(Duration::from_millis(33));

        assert_eq!(*ui_fires.borrow(), 1);
        assert_eq!(*game_fires.borrow(), 0);
    }

    #[test]
    fn test_cooldown_spacing_through_manager() {
        let mut manager = manager();
        let (cond, fires) = counting_key_condition(
            KeyCode::Space,
            ConditionSettings {
                cooldown_ms: 200,
                ..ConditionSettings::default()
            },
        );
        manager.track(cond, None, 0, false).unwrap();

        manager.poller_mut().press_key(KeyCode::Space);
        for ms in [16u64, 33, 50, 100, 150, 216, 233] {
            manager.update(Duration::from_millis(ms));
        }
        // Fired at 33ms, then not again until 233ms.
        assert_eq!(*fires.borrow(), 2);
    }

    #[test]
    fn test_min_hold_through_manager() {
        let mut manager = manager();
        let (cond, fires) = counting_key_condition(
            KeyCode::Space,
            ConditionSettings {
                min_hold_ms: 100,
                allowed_if_consumed: true,
                consumable: false,
                ..ConditionSettings::default()
            },
        );
        manager.track(cond, None, 0, false).unwrap();

        manager.poller_mut().press_key(KeyCode::Space);
        manager.update(Duration::from_millis(16));
        manager.update(Duration::from_millis(50));
        assert_eq!(*fires.borrow(), 0);

        manager.update(Duration::from_millis(116));
        assert_eq!(*fires.borrow(), 1);
    }

    #[test]
    fn test_untrack_returns_condition_and_depth() {
        let mut manager = manager();
        let (cond, _) = counting_key_condition(KeyCode::KeyA, ConditionSettings::default());
        manager.track(cond, Some("menu".into()), 3, false).unwrap();

        let (_, depth) = manager.untrack("menu").unwrap();
        assert_eq!(depth, 3);
        assert!(manager.untrack("menu").is_none());
        assert_eq!(manager.tracked_count(), 0);
    }

    #[test]
    fn test_untrack_at_depth_clears_layer() {
        let mut manager = manager();
        for (key, name, depth) in [
            (KeyCode::KeyA, "a", 1),
            (KeyCode::KeyB, "b", 2),
            (KeyCode::KeyC, "c", 2),
        ] {
            let (cond, _) = counting_key_condition(key, ConditionSettings::default());
            manager.track(cond, Some(name.into()), depth, false).unwrap();
        }
        let removed = manager.untrack_at_depth(2);
        let names: Vec<&str> = removed.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
        assert_eq!(manager.tracked_count(), 1);
    }

    #[test]
    fn test_faulting_tracked_condition_does_not_poison_update() {
        use crate::adapters::PadButtonSource;
        use crate::gamepad::GamepadButton;

        let mut manager = manager();
        manager.poller_mut().connect_pad();
        manager.update(Duration::from_millis(16));

        let source = PadButtonSource::single(
            GamepadButton::South,
            ButtonPhase::Pressed,
            0,
            manager.state(),
        )
        .unwrap();
        let pad = Box::new(BooleanCondition::new(source, ConditionSettings::default()));
        manager.track(pad, Some("pad".into()), 0, false).unwrap();

        let (key, fires) = counting_key_condition(KeyCode::Space, ConditionSettings::default());
        manager.track(key, Some("key".into()), 1, false).unwrap();

        // Pad goes away; its condition faults every frame but the keyboard
        // condition keeps firing.
        manager.poller_mut().disconnect_pad(0);
        manager.poller_mut().press_key(KeyCode::Space);
        manager.update(Duration::from_millis(100_000));
        manager.update(Duration::from_millis(100_016));
        assert_eq!(*fires.borrow(), 1);
    }
}
