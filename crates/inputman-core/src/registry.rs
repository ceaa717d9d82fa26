// Inputman Binding Registry
// Registered bindings and per-transition dispatch

use std::fmt;
use std::time::Instant;

use crate::descriptor::{BindingDescriptor, MatchMode};
use crate::matcher::binding_matches;
use crate::state::InputTracker;

/// Callback invoked when a binding matches
pub type BindingFn = Box<dyn FnMut()>;

/// Handle returned at registration, used to unregister and to report firings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(u64);

impl BindingId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An immutable descriptor/callback pair
pub struct Binding {
    id: BindingId,
    source: String,
    descriptor: BindingDescriptor,
    mode: MatchMode,
    callback: BindingFn,
}

impl Binding {
    pub fn id(&self) -> BindingId {
        self.id
    }

    /// The binding string this binding was registered with
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn descriptor(&self) -> &BindingDescriptor {
        &self.descriptor
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Check this binding against the tracker as of `now`
    pub fn matches(&self, tracker: &InputTracker, now: Instant) -> bool {
        binding_matches(&self.descriptor, self.mode, tracker, now)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("descriptor", &self.descriptor)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Holds bindings in registration order
#[derive(Debug, Default)]
pub struct BindingRegistry {
    bindings: Vec<Binding>,
    next_id: u64,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Add a binding; empty descriptors are never stored, so callers parse
    /// and reject those first
    pub fn insert(
        &mut self,
        source: impl Into<String>,
        descriptor: BindingDescriptor,
        mode: MatchMode,
        callback: BindingFn,
    ) -> BindingId {
        let id = BindingId(self.next_id);
        self.next_id += 1;

        let source = source.into();
        log::debug!("registered {} '{}' as {} {}", id, source, mode, descriptor);
        self.bindings.push(Binding {
            id,
            source,
            descriptor,
            mode,
            callback,
        });
        id
    }

    /// Remove a binding; returns false if it was not registered
    pub fn remove(&mut self, id: BindingId) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|b| b.id != id);
        let removed = self.bindings.len() != before;
        if removed {
            log::debug!("unregistered {}", id);
        }
        removed
    }

    pub fn get(&self, id: BindingId) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    /// Ids of every binding matching the tracker, in registration order
    pub fn matching(&self, tracker: &InputTracker, now: Instant) -> Vec<BindingId> {
        self.bindings
            .iter()
            .filter(|b| b.matches(tracker, now))
            .map(|b| b.id)
            .collect()
    }

    /// Evaluate every binding once and invoke the callbacks of those that
    /// match.
    ///
    /// Matches are collected before any callback runs, so the set of
    /// bindings that fire is fixed by the state at the transition.
    pub fn dispatch(&mut self, tracker: &InputTracker, now: Instant) -> Vec<BindingId> {
        let matched: Vec<usize> = self
            .bindings
            .iter()
            .enumerate()
            .filter(|(_, b)| b.matches(tracker, now))
            .map(|(i, _)| i)
            .collect();

        let mut fired = Vec::with_capacity(matched.len());
        for i in matched {
            let binding = &mut self.bindings[i];
            log::trace!("firing {} '{}'", binding.id, binding.source);
            (binding.callback)();
            fired.push(binding.id);
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_binding;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<u32>>, BindingFn) {
        let count = Rc::new(Cell::new(0));
        let handle = Rc::clone(&count);
        let callback: BindingFn = Box::new(move || handle.set(handle.get() + 1));
        (count, callback)
    }

    #[test]
    fn test_insert_and_remove() {
        let mut registry = BindingRegistry::new();
        let (_, cb) = counter();
        let id = registry.insert("KeyD", parse_binding("KeyD"), MatchMode::Simultaneous, cb);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(id).map(Binding::source), Some("KeyD"));

        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut registry = BindingRegistry::new();
        let (_, a) = counter();
        let (_, b) = counter();
        let first = registry.insert("KeyA", parse_binding("KeyA"), MatchMode::Simultaneous, a);
        let second = registry.insert("KeyA", parse_binding("KeyA"), MatchMode::Simultaneous, b);
        assert_ne!(first, second);
    }

    #[test]
    fn test_dispatch_fires_each_matching_binding() {
        let mut registry = BindingRegistry::new();
        let (count_a, a) = counter();
        let (count_b, b) = counter();
        let (count_c, c) = counter();
        let first = registry.insert("KeyD", parse_binding("KeyD"), MatchMode::Simultaneous, a);
        let second = registry.insert("KeyD", parse_binding("KeyD"), MatchMode::Simultaneous, b);
        registry.insert("KeyE", parse_binding("KeyE"), MatchMode::Simultaneous, c);

        let mut tracker = InputTracker::default();
        tracker.press("KeyD");
        let fired = registry.dispatch(&tracker, Instant::now());

        assert_eq!(fired, vec![first, second]);
        assert_eq!(count_a.get(), 1);
        assert_eq!(count_b.get(), 1);
        assert_eq!(count_c.get(), 0);
    }

    #[test]
    fn test_dispatch_after_remove_fires_remaining() {
        let mut registry = BindingRegistry::new();
        let (count_a, a) = counter();
        let (count_b, b) = counter();
        let first = registry.insert("KeyD", parse_binding("KeyD"), MatchMode::Simultaneous, a);
        let second = registry.insert("KeyD", parse_binding("KeyD"), MatchMode::Simultaneous, b);
        registry.remove(first);

        let mut tracker = InputTracker::default();
        tracker.press("KeyD");
        assert_eq!(registry.dispatch(&tracker, Instant::now()), vec![second]);
        assert_eq!(count_a.get(), 0);
        assert_eq!(count_b.get(), 1);
    }

    #[test]
    fn test_binding_id_display() {
        let mut registry = BindingRegistry::new();
        let (_, cb) = counter();
        let id = registry.insert("KeyD", parse_binding("KeyD"), MatchMode::Simultaneous, cb);
        assert_eq!(id.to_string(), "#0");
        assert_eq!(id.get(), 0);
    }
}
