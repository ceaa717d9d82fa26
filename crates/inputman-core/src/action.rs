use strum_macros::{Display, EnumString};

/// Represents the action state of a host input event.
///
/// Hosts deliver key auto-repeat as extra "down" events. Those are reported
/// as `Repeat` and never count as a press/release transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Action {
    #[strum(to_string = "release", serialize = "up")]
    Release,
    #[strum(to_string = "press", serialize = "down")]
    Press,
    Repeat,
}

impl Action {
    /// A fresh press; auto-repeat does not count
    pub fn just_pressed(self) -> bool {
        matches!(self, Action::Press)
    }

    pub fn is_repeat(self) -> bool {
        matches!(self, Action::Repeat)
    }

    /// Whether this action changes the held state of an input
    pub fn is_transition(self) -> bool {
        !self.is_repeat()
    }
}
