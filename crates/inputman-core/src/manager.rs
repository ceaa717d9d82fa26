// Inputman Manager
// Ties the tracker, the binding registry and settings together

use std::time::Instant;

use indexmap::IndexMap;

use crate::config::{parse_binding_checked, parse_binding_escaped, BindingParseError};
use crate::descriptor::MatchMode;
use crate::event::{normalize, InputEvent, KeyNaming};
use crate::registry::{BindingId, BindingRegistry};
use crate::settings::Settings;
use crate::state::InputTracker;
use crate::InputId;

/// What a handled host event produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// Bindings fired by this event, in registration order
    pub fired: Vec<BindingId>,
    /// Whether the host should suppress the event's default action
    pub prevent_default: bool,
}

/// Entry point for hosts: register bindings, feed presses and releases.
///
/// The manager never captures events itself. A host either calls
/// [`press`](Self::press)/[`unpress`](Self::unpress) with already-normalized
/// identifiers or passes raw [`InputEvent`]s to
/// [`handle_event`](Self::handle_event).
#[derive(Debug)]
pub struct InputManager {
    tracker: InputTracker,
    registry: BindingRegistry,
    settings: Settings,
    /// Physical code -> id each held key was pressed under
    key_codes: IndexMap<String, InputId>,
}

impl InputManager {
    pub fn new(settings: Settings) -> Self {
        Self {
            tracker: InputTracker::from_settings(&settings),
            registry: BindingRegistry::new(),
            settings,
            key_codes: IndexMap::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tracker(&self) -> &InputTracker {
        &self.tracker
    }

    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    /// Register a binding; returns false if the string names no inputs
    pub fn register(&mut self, binding: &str, callback: impl FnMut() + 'static) -> bool {
        match self.try_register(binding, callback) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("rejected binding '{}': {}", binding, e);
                false
            }
        }
    }

    /// Register a binding, returning its id.
    ///
    /// With physical key naming the full grammar applies and the presence
    /// of `>` selects sequential matching. With logical key naming the
    /// escaped flat form is used, so `++` names the `+` key, and matching is
    /// always simultaneous.
    pub fn try_register(
        &mut self,
        binding: &str,
        callback: impl FnMut() + 'static,
    ) -> Result<BindingId, BindingParseError> {
        let (descriptor, mode) = match self.settings.key_naming() {
            KeyNaming::Physical => (parse_binding_checked(binding)?, MatchMode::for_binding(binding)),
            KeyNaming::Logical => {
                let descriptor = parse_binding_escaped(binding);
                if descriptor.is_empty() {
                    return Err(BindingParseError::EmptyBinding);
                }
                (descriptor, MatchMode::Simultaneous)
            }
        };

        Ok(self
            .registry
            .insert(binding, descriptor, mode, Box::new(callback)))
    }

    /// Remove a binding; returns false if it was not registered
    pub fn unregister(&mut self, id: BindingId) -> bool {
        self.registry.remove(id)
    }

    /// Record a press now and fire matching bindings
    pub fn press(&mut self, input: impl Into<InputId>) -> Vec<BindingId> {
        self.press_at(input, Instant::now())
    }

    pub fn press_at(&mut self, input: impl Into<InputId>, now: Instant) -> Vec<BindingId> {
        self.tracker.press_at(input, now);
        self.registry.dispatch(&self.tracker, now)
    }

    /// Record a release now and fire matching bindings
    pub fn unpress(&mut self, input: impl Into<InputId>) -> Vec<BindingId> {
        self.unpress_at(input, Instant::now())
    }

    pub fn unpress_at(&mut self, input: impl Into<InputId>, now: Instant) -> Vec<BindingId> {
        self.tracker.unpress_at(input, now);
        self.registry.dispatch(&self.tracker, now)
    }

    /// Normalize a host event and apply it
    pub fn handle_event(&mut self, event: &InputEvent) -> EventOutcome {
        self.handle_event_at(event, Instant::now())
    }

    /// Normalize a host event and apply it as of `now`.
    ///
    /// Auto-repeat events are not transitions: they change no state and
    /// fire nothing. A key release is applied to the id its code was
    /// pressed under, since with logical naming the key value on release
    /// may differ (`+` going down, `=` coming up once Shift is gone).
    pub fn handle_event_at(&mut self, event: &InputEvent, now: Instant) -> EventOutcome {
        let prevent_default = self.settings.prevents_default();
        let action = event.action();
        if !action.is_transition() {
            return EventOutcome {
                fired: Vec::new(),
                prevent_default,
            };
        }

        let naming = self.settings.key_naming();
        let input = match event {
            InputEvent::Key { code, .. } if !action.just_pressed() => self
                .key_codes
                .shift_remove(code.as_str())
                .or_else(|| normalize(event, naming)),
            _ => normalize(event, naming),
        };
        let Some(input) = input else {
            log::debug!("ignoring event without an identifier: {:?}", event);
            return EventOutcome {
                fired: Vec::new(),
                prevent_default,
            };
        };

        let fired = if action.just_pressed() {
            if let InputEvent::Key { code, .. } = event {
                if !code.is_empty() {
                    self.key_codes.insert(code.clone(), input.clone());
                }
            }
            self.press_at(input, now)
        } else {
            self.unpress_at(input, now)
        };
        EventOutcome {
            fired,
            prevent_default,
        }
    }

    /// Forget all live input state; bindings stay registered
    pub fn clear_inputs(&mut self) {
        self.tracker.clear();
        self.key_codes.clear();
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Action;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
        let count = Rc::new(Cell::new(0));
        let handle = Rc::clone(&count);
        (count, move || handle.set(handle.get() + 1))
    }

    #[test]
    fn test_register_rejects_empty() {
        let mut manager = InputManager::default();
        assert!(!manager.register("", || {}));
        assert!(!manager.register("   ", || {}));
        assert!(!manager.register("+>", || {}));
        assert!(manager.registry().is_empty());
        assert_eq!(
            manager.try_register(" ", || {}).err(),
            Some(BindingParseError::EmptyBinding)
        );
    }

    #[test]
    fn test_register_picks_mode() {
        let mut manager = InputManager::default();
        let simultaneous = manager.try_register("ShiftLeft+KeyW", || {}).unwrap();
        let sequential = manager.try_register("ShiftLeft>KeyW", || {}).unwrap();

        let registry = manager.registry();
        assert_eq!(registry.get(simultaneous).unwrap().mode(), MatchMode::Simultaneous);
        assert_eq!(registry.get(sequential).unwrap().mode(), MatchMode::Sequential);
    }

    #[test]
    fn test_single_key_fires_once() {
        let mut manager = InputManager::default();
        let (count, cb) = counter();
        assert!(manager.register("KeyD", cb));

        manager.press("KeyD");
        assert_eq!(count.get(), 1);
        manager.unpress("KeyD");
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_unregister_stops_firing() {
        let mut manager = InputManager::default();
        let (count, cb) = counter();
        let id = manager.try_register("KeyD", cb).unwrap();
        assert!(manager.unregister(id));

        assert!(manager.press("KeyD").is_empty());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_repeat_is_not_a_transition() {
        let mut manager = InputManager::default();
        let (count, cb) = counter();
        manager.register("KeyD", cb);

        manager.handle_event(&InputEvent::key_down("KeyD", "d"));
        let outcome = manager.handle_event(&InputEvent::Key {
            code: "KeyD".into(),
            key: "d".into(),
            action: Action::Repeat,
        });
        assert!(outcome.fired.is_empty());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_handle_event_reports_prevent_default() {
        let mut manager = InputManager::new(Settings::new().with_prevents_default(false));
        let outcome = manager.handle_event(&InputEvent::key_down("KeyA", "a"));
        assert!(!outcome.prevent_default);

        let mut manager = InputManager::default();
        let outcome = manager.handle_event(&InputEvent::key_down("", ""));
        assert!(outcome.prevent_default);
        assert!(outcome.fired.is_empty());
        assert!(manager.tracker().held().is_empty());
    }

    #[test]
    fn test_key_release_uses_pressed_id() {
        let mut manager = InputManager::new(Settings::new().with_key_naming(KeyNaming::Logical));
        manager.handle_event(&InputEvent::key_down("Equal", "+"));
        assert_eq!(manager.tracker().held(), vec![InputId::from("+")]);

        manager.handle_event(&InputEvent::key_up("Equal", "="));
        assert!(manager.tracker().held().is_empty());
        assert!(manager.key_codes.is_empty());
    }

    #[test]
    fn test_clear_inputs_keeps_bindings() {
        let mut manager = InputManager::default();
        manager.register("KeyA", || {});
        manager.press("KeyA");
        manager.clear_inputs();
        assert!(manager.tracker().held().is_empty());
        assert_eq!(manager.registry().len(), 1);
    }
}
