// Inputman Config API - Binding String Parser
// Parses binding strings like "ShiftLeft+KeyD > KeyE" into structured groups

use crate::descriptor::{BindingDescriptor, Group};
use crate::InputId;

/// Joins inputs into the same group
pub const SEPARATOR_SIMULTANEOUS: char = '+';
/// Closes the current group and starts the next one
pub const SEPARATOR_SEQUENTIAL: char = '>';

/// Errors that can occur during binding parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingParseError {
    /// Input contained no input names at all
    #[error("binding string contains no inputs")]
    EmptyBinding,
}

/// Tokenize a binding string.
///
/// Input names are trimmed; each delimiter character is emitted as its own
/// token so group assembly can see it. Runs of whitespace between
/// delimiters never produce empty tokens.
///
/// # Examples
/// ```
/// use inputman_core::config::split_binding;
/// assert_eq!(
///     split_binding("KeyD+KeyC>ShiftLeft"),
///     vec!["KeyD", "+", "KeyC", ">", "ShiftLeft"]
/// );
/// ```
pub fn split_binding(binding: &str) -> Vec<String> {
    let mut split = Vec::new();
    let mut word = String::new();

    for c in binding.chars() {
        if c == SEPARATOR_SIMULTANEOUS || c == SEPARATOR_SEQUENTIAL {
            flush_word(&mut word, &mut split);
            split.push(c.to_string());
            continue;
        }
        word.push(c);
    }
    flush_word(&mut word, &mut split);

    split
}

/// Parse a binding string into a descriptor.
///
/// Stray, leading, trailing and repeated delimiters collapse; they never
/// produce empty groups. An input named twice in one group is kept once.
/// An empty or whitespace-only string yields an empty descriptor.
pub fn parse_binding(binding: &str) -> BindingDescriptor {
    let mut groups = BindingDescriptor::new();
    let mut current = Group::new();

    for token in split_binding(binding) {
        if is_delimiter(&token, SEPARATOR_SEQUENTIAL) {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
        } else if !is_delimiter(&token, SEPARATOR_SIMULTANEOUS) {
            current.insert(InputId::from(token));
        }
    }

    if !current.is_empty() {
        groups.push(current);
    }

    groups
}

/// Parse a binding string, failing if it names no inputs
pub fn parse_binding_checked(binding: &str) -> Result<BindingDescriptor, BindingParseError> {
    let descriptor = parse_binding(binding);
    if descriptor.is_empty() {
        return Err(BindingParseError::EmptyBinding);
    }
    Ok(descriptor)
}

/// Split a flat binding of logical key names, where `+` may itself be a key.
///
/// A doubled `++` is an escaped literal `+` key; a single `+` separates
/// names and is not emitted. No sequencing is supported in this form.
///
/// # Examples
/// ```
/// use inputman_core::config::split_binding_string_escaped;
/// assert_eq!(split_binding_string_escaped("Control++"), vec!["Control", "+"]);
/// assert_eq!(split_binding_string_escaped("A+B"), vec!["A", "B"]);
/// ```
pub fn split_binding_string_escaped(binding: &str) -> Vec<String> {
    let mut split = Vec::new();
    let mut word = String::new();
    let mut chars = binding.chars().peekable();

    while let Some(c) = chars.next() {
        if c != SEPARATOR_SIMULTANEOUS {
            word.push(c);
            continue;
        }

        flush_word(&mut word, &mut split);
        if chars.peek() == Some(&SEPARATOR_SIMULTANEOUS) {
            chars.next();
            split.push(SEPARATOR_SIMULTANEOUS.to_string());
        }
    }
    flush_word(&mut word, &mut split);

    split
}

/// Parse a logical-key binding into a single-group descriptor
pub fn parse_binding_escaped(binding: &str) -> BindingDescriptor {
    let group: Group = split_binding_string_escaped(binding).into_iter().collect();
    let mut descriptor = BindingDescriptor::new();
    descriptor.push(group);
    descriptor
}

fn flush_word(word: &mut String, split: &mut Vec<String>) {
    let trimmed = word.trim();
    if !trimmed.is_empty() {
        split.push(trimmed.to_string());
    }
    word.clear();
}

fn is_delimiter(token: &str, delimiter: char) -> bool {
    let mut chars = token.chars();
    chars.next() == Some(delimiter) && chars.next().is_none()
}
