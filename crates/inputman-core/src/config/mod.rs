// Inputman Config API
// Binding string grammar and parsing

pub mod binding_parser;

pub use binding_parser::{
    parse_binding, parse_binding_checked, parse_binding_escaped, split_binding,
    split_binding_string_escaped, BindingParseError, SEPARATOR_SEQUENTIAL,
    SEPARATOR_SIMULTANEOUS,
};
