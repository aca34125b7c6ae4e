//! Generic named registry with layered ordering.
//!
//! [`Registry`] is an ordered mapping from unique string names to values,
//! where each entry also carries a `depth` (layer). Iteration visits entries
//! by ascending depth, then by insertion order within a depth. Entries can be
//! removed individually by name or wholesale by depth.
//!
//! `comet-input` uses this to hold its tracked conditions, but the collection
//! itself is domain-agnostic.

/// Errors produced by [`Registry`] operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// An entry with this name already exists and `force` was not set.
    #[error("an entry named {0:?} is already registered")]
    NameCollision(String),
}

/// One registered entry.
#[derive(Debug)]
struct Entry<T> {
    name: String,
    depth: u32,
    /// Monotonic insertion sequence, used to keep ordering stable within a depth.
    seq: u64,
    value: T,
}

/// Ordered mapping from unique names to `(value, depth)` pairs.
///
/// # Ordering
///
/// Entries are kept sorted by `(depth, insertion order)`. Re-adding a name
/// with `force` replaces the entry and treats it as a fresh insertion.
#[derive(Debug)]
pub struct Registry<T> {
    entries: Vec<Entry<T>>,
    next_seq: u64,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Registry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry named `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Registers `value` under `name` at `depth`.
    ///
    /// Names are unique: a collision is rejected unless `force` is set, in
    /// which case the existing entry is replaced (and re-ordered as a fresh
    /// insertion at `depth`).
    ///
    /// # Errors
    /// [`RegistryError::NameCollision`] if `name` exists and `force` is false.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        value: T,
        depth: u32,
        force: bool,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if let Some(pos) = self.entries.iter().position(|e| e.name == name) {
            if !force {
                return Err(RegistryError::NameCollision(name));
            }
            self.entries.remove(pos);
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        let entry = Entry {
            name,
            depth,
            seq,
            value,
        };
        // Insert before the first entry that sorts after us.
        let pos = self
            .entries
            .iter()
            .position(|e| (e.depth, e.seq) > (depth, seq))
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        Ok(())
    }

    /// Removes the entry named `name`, returning its value and depth.
    pub fn remove(&mut self, name: &str) -> Option<(T, u32)> {
        let pos = self.entries.iter().position(|e| e.name == name)?;
        let entry = self.entries.remove(pos);
        Some((entry.value, entry.depth))
    }

    /// Removes every entry registered at `depth`, in iteration order.
    pub fn remove_at_depth(&mut self, depth: u32) -> Vec<(String, T)> {
        let mut removed = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].depth == depth {
                let entry = self.entries.remove(i);
                removed.push((entry.name, entry.value));
            } else {
                i += 1;
            }
        }
        removed
    }

    /// Borrows the value registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.value)
    }

    /// Mutably borrows the value registered under `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|e| e.name == name)
            .map(|e| &mut e.value)
    }

    /// Iterates `(name, depth, value)` in `(depth, insertion)` order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32, &T)> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), e.depth, &e.value))
    }

    /// Iterates `(name, depth, value)` mutably, in `(depth, insertion)` order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, u32, &mut T)> {
        self.entries
            .iter_mut()
            .map(|e| (e.name.as_str(), e.depth, &mut e.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get() {
        let mut reg = Registry::new();
        reg.add("jump", 1, 0, false).unwrap();
        assert_eq!(reg.get("jump"), Some(&1));
        assert_eq!(reg.len(), 1);
        assert!(reg.contains("jump"));
    }

    #[test]
    fn test_name_collision_rejected() {
        let mut reg = Registry::new();
        reg.add("jump", 1, 0, false).unwrap();
        let err = reg.add("jump", 2, 0, false).unwrap_err();
        assert!(matches!(err, RegistryError::NameCollision(ref n) if n == "jump"));
        assert_eq!(reg.get("jump"), Some(&1));
    }

    #[test]
    fn test_force_overwrites() {
        let mut reg = Registry::new();
        reg.add("jump", 1, 0, false).unwrap();
        reg.add("jump", 2, 0, true).unwrap();
        assert_eq!(reg.get("jump"), Some(&2));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_iteration_order_by_depth_then_insertion() {
        let mut reg = Registry::new();
        reg.add("c", 'c', 2, false).unwrap();
        reg.add("a", 'a', 0, false).unwrap();
        reg.add("b", 'b', 0, false).unwrap();
        reg.add("d", 'd', 1, false).unwrap();
        let order: Vec<&str> = reg.iter().map(|(n, _, _)| n).collect();
        assert_eq!(order, vec!["a", "b", "d", "c"]);
    }

    #[test]
    fn test_remove_returns_value_and_depth() {
        let mut reg = Registry::new();
        reg.add("pause", 7, 3, false).unwrap();
        assert_eq!(reg.remove("pause"), Some((7, 3)));
        assert!(reg.remove("pause").is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_remove_at_depth_clears_layer() {
        let mut reg = Registry::new();
        reg.add("a", 1, 0, false).unwrap();
        reg.add("b", 2, 1, false).unwrap();
        reg.add("c", 3, 1, false).unwrap();
        let removed = reg.remove_at_depth(1);
        assert_eq!(removed, vec![("b".to_string(), 2), ("c".to_string(), 3)]);
        assert_eq!(reg.len(), 1);
        assert!(reg.contains("a"));
    }

    #[test]
    fn test_get_mut_allows_update() {
        let mut reg = Registry::new();
        reg.add("counter", 0, 0, false).unwrap();
        *reg.get_mut("counter").unwrap() += 5;
        assert_eq!(reg.get("counter"), Some(&5));
    }
}
