//! Snapshot-based keyboard state tracker.
//!
//! [`KeyboardTracker`] holds the current and previous frame's full
//! [`KeyboardSnapshot`]; each tick the current snapshot is replaced wholesale
//! by whatever the platform poller produced and the old one becomes the
//! previous. Physical key codes are used throughout so bindings work
//! identically regardless of keyboard layout.

use std::collections::{HashMap, HashSet};
use winit::keyboard::KeyCode;

/// A keyboard lock state axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockKey {
    /// Caps lock.
    CapsLock,
    /// Num lock.
    NumLock,
}

/// Full keyboard state for one frame.
#[derive(Debug, Clone, Default)]
pub struct KeyboardSnapshot {
    pub(crate) pressed: HashSet<KeyCode>,
    /// Whether caps lock is engaged.
    pub caps_lock: bool,
    /// Whether num lock is engaged.
    pub num_lock: bool,
}

impl KeyboardSnapshot {
    /// Creates an empty snapshot with no keys down and locks disengaged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as held.
    pub fn press(&mut self, key: KeyCode) {
        self.pressed.insert(key);
    }

    /// Marks `key` as released.
    pub fn release(&mut self, key: KeyCode) {
        self.pressed.remove(&key);
    }

    /// Whether `key` is held in this snapshot.
    #[must_use]
    pub fn is_down(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Reads a lock state.
    #[must_use]
    pub fn lock(&self, lock: LockKey) -> bool {
        match lock {
            LockKey::CapsLock => self.caps_lock,
            LockKey::NumLock => self.num_lock,
        }
    }
}

/// Current/previous keyboard snapshots plus per-axis consumption stamps.
#[derive(Debug, Default)]
pub struct KeyboardTracker {
    current: KeyboardSnapshot,
    previous: KeyboardSnapshot,
    consumed_keys: HashMap<KeyCode, u64>,
    consumed_locks: HashMap<LockKey, u64>,
}

impl KeyboardTracker {
    /// Creates a tracker with empty snapshots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current snapshot, demoting it to previous. Call once per tick.
    pub fn update(&mut self, snapshot: KeyboardSnapshot) {
        self.previous = std::mem::replace(&mut self.current, snapshot);
    }

    /// Whether `key` is down this frame.
    #[must_use]
    pub fn is_down(&self, key: KeyCode) -> bool {
        self.current.is_down(key)
    }

    /// Whether `key` was down last frame.
    #[must_use]
    pub fn was_down(&self, key: KeyCode) -> bool {
        self.previous.is_down(key)
    }

    /// Whether `lock` is engaged this frame.
    #[must_use]
    pub fn lock_enabled(&self, lock: LockKey) -> bool {
        self.current.lock(lock)
    }

    /// Whether `lock` was engaged last frame.
    #[must_use]
    pub fn lock_was_enabled(&self, lock: LockKey) -> bool {
        self.previous.lock(lock)
    }

    /// Stamps `key` as consumed for `frame`.
    pub fn consume_key(&mut self, key: KeyCode, frame: u64) {
        self.consumed_keys.insert(key, frame);
    }

    /// Whether `key` was consumed on `frame`. Stamps from earlier frames
    /// expire implicitly, so no per-tick reset pass is needed.
    #[must_use]
    pub fn is_key_consumed(&self, key: KeyCode, frame: u64) -> bool {
        self.consumed_keys.get(&key) == Some(&frame)
    }

    /// Stamps `lock` as consumed for `frame`.
    pub fn consume_lock(&mut self, lock: LockKey, frame: u64) {
        self.consumed_locks.insert(lock, frame);
    }

    /// Whether `lock` was consumed on `frame`.
    #[must_use]
    pub fn is_lock_consumed(&self, lock: LockKey, frame: u64) -> bool {
        self.consumed_locks.get(&lock) == Some(&frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_no_keys_down() {
        let kb = KeyboardTracker::new();
        assert!(!kb.is_down(KeyCode::Space));
        assert!(!kb.was_down(KeyCode::Space));
        assert!(!kb.lock_enabled(LockKey::CapsLock));
    }

    #[test]
    fn test_update_shifts_current_to_previous() {
        let mut kb = KeyboardTracker::new();
        let mut snap = KeyboardSnapshot::new();
        snap.press(KeyCode::KeyW);
        kb.update(snap);
        assert!(kb.is_down(KeyCode::KeyW));
        assert!(!kb.was_down(KeyCode::KeyW));

        kb.update(KeyboardSnapshot::new());
        assert!(!kb.is_down(KeyCode::KeyW));
        assert!(kb.was_down(KeyCode::KeyW));
    }

    #[test]
    fn test_lock_states_tracked_per_frame() {
        let mut kb = KeyboardTracker::new();
        let snap = KeyboardSnapshot {
            caps_lock: true,
            ..KeyboardSnapshot::new()
        };
        kb.update(snap);
        assert!(kb.lock_enabled(LockKey::CapsLock));
        assert!(!kb.lock_was_enabled(LockKey::CapsLock));
        assert!(!kb.lock_enabled(LockKey::NumLock));
    }

    #[test]
    fn test_consumption_scoped_to_single_frame() {
        let mut kb = KeyboardTracker::new();
        kb.consume_key(KeyCode::Space, 10);
        assert!(kb.is_key_consumed(KeyCode::Space, 10));
        assert!(!kb.is_key_consumed(KeyCode::Space, 11));
        assert!(!kb.is_key_consumed(KeyCode::KeyW, 10));
    }

    #[test]
    fn test_lock_consumption_independent_of_keys() {
        let mut kb = KeyboardTracker::new();
        kb.consume_lock(LockKey::NumLock, 3);
        assert!(kb.is_lock_consumed(LockKey::NumLock, 3));
        assert!(!kb.is_lock_consumed(LockKey::CapsLock, 3));
        assert!(!kb.is_lock_consumed(LockKey::NumLock, 4));
    }
}
