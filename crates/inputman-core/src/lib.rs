// Inputman Core Library
// Binding grammar, live input tracking and binding matching

pub mod action;
pub mod config;
pub mod descriptor;
pub mod event;
pub mod input_id;
pub mod manager;
pub mod matcher;
pub mod registry;
pub mod settings;
pub mod state;

pub use action::Action;
pub use config::{
    parse_binding, parse_binding_checked, parse_binding_escaped, split_binding,
    split_binding_string_escaped, BindingParseError,
};
pub use descriptor::{descriptors_equal, BindingDescriptor, Group, MatchMode};
pub use event::{mouse_button_name, normalize, InputEvent, KeyNaming};
pub use input_id::InputId;
pub use manager::{EventOutcome, InputManager};
pub use matcher::{array_contains_ord, arrays_equal, binding_matches, cull_sequence};
pub use registry::{Binding, BindingFn, BindingId, BindingRegistry};
pub use settings::{Settings, SettingsError};
pub use state::{InputTracker, Moment, PressEvent};
