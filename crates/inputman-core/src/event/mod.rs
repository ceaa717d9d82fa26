// Inputman Host Events
// Host-neutral input events and their normalization into InputIds
//
// Capturing events (window listeners, DOM handlers, evdev, ...) is the
// host's job. The host converts whatever it receives into an InputEvent and
// hands it to the manager; nothing here installs listeners.

use strum_macros::{Display, EnumString};

use crate::{Action, InputId};

/// Which keyboard identifier becomes the InputId
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum KeyNaming {
    /// Layout-independent physical location, e.g. `KeyD`, `ShiftLeft`
    #[default]
    Physical,
    /// The key value produced by the layout, e.g. `d`, `Shift`, `+`
    Logical,
}

/// One raw input event as delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key {
        /// Physical code, e.g. `KeyD`
        code: String,
        /// Logical key value, e.g. `d`
        key: String,
        action: Action,
    },
    Mouse {
        /// Host button index (0 = primary, 1 = auxiliary, 2 = secondary, ...)
        button: u16,
        action: Action,
    },
}

impl InputEvent {
    pub fn key_down(code: impl Into<String>, key: impl Into<String>) -> Self {
        InputEvent::Key {
            code: code.into(),
            key: key.into(),
            action: Action::Press,
        }
    }

    pub fn key_up(code: impl Into<String>, key: impl Into<String>) -> Self {
        InputEvent::Key {
            code: code.into(),
            key: key.into(),
            action: Action::Release,
        }
    }

    pub fn mouse_down(button: u16) -> Self {
        InputEvent::Mouse {
            button,
            action: Action::Press,
        }
    }

    pub fn mouse_up(button: u16) -> Self {
        InputEvent::Mouse {
            button,
            action: Action::Release,
        }
    }

    pub fn action(&self) -> Action {
        match self {
            InputEvent::Key { action, .. } | InputEvent::Mouse { action, .. } => *action,
        }
    }
}

/// Name used for a mouse button that has no standard mapping
pub const MOUSE_INVALID: &str = "MouseInvalid";

/// Map a host mouse button index to its binding name.
///
/// Hosts number the secondary button 2 and the middle button 1, while
/// binding names count Mouse2 as secondary and Mouse3 as middle.
pub fn mouse_button_name(button: u16) -> &'static str {
    match button {
        0 => "Mouse1",
        1 => "Mouse3",
        2 => "Mouse2",
        3 => "Mouse4",
        4 => "Mouse5",
        _ => MOUSE_INVALID,
    }
}

/// Convert a host event into the InputId the tracker records.
///
/// Returns None for events that carry no usable identifier (an empty key
/// name).
pub fn normalize(event: &InputEvent, naming: KeyNaming) -> Option<InputId> {
    let name = match event {
        InputEvent::Key { code, key, .. } => match naming {
            KeyNaming::Physical => code.as_str(),
            KeyNaming::Logical => key.as_str(),
        },
        InputEvent::Mouse { button, .. } => mouse_button_name(*button),
    };

    if name.is_empty() {
        return None;
    }
    Some(InputId::from(name))
}
