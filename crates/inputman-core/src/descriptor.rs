// Inputman Descriptor Model
// Ordered sequence of unordered groups of input identifiers

use std::fmt;

use smallvec::SmallVec;
use strum_macros::{Display, EnumString};

use crate::config::{SEPARATOR_SEQUENTIAL, SEPARATOR_SIMULTANEOUS};
use crate::InputId;

/// How a binding is compared against live input state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum MatchMode {
    /// Single group; its inputs must appear, in order, in the held list
    Simultaneous,
    /// Groups must be satisfied one after another
    Sequential,
}

impl MatchMode {
    /// Pick the mode for a binding string from the presence of the
    /// sequential delimiter
    pub fn for_binding(binding: &str) -> Self {
        if binding.contains(SEPARATOR_SEQUENTIAL) {
            MatchMode::Sequential
        } else {
            MatchMode::Simultaneous
        }
    }
}

/// A set of inputs that must be held at the same time.
///
/// Members keep their insertion order for display and for ordered
/// containment checks, but equality ignores order. Inserting an input that
/// is already a member is a no-op. Uses SmallVec because nearly every
/// group has four members or fewer.
#[derive(Debug, Clone, Default)]
pub struct Group {
    members: SmallVec<[InputId; 4]>,
}

impl Group {
    /// Create an empty group
    pub fn new() -> Self {
        Self {
            members: SmallVec::new(),
        }
    }

    /// Add an input; returns false if it was already a member
    pub fn insert(&mut self, input: InputId) -> bool {
        if self.contains(&input) {
            return false;
        }
        self.members.push(input);
        true
    }

    /// Check membership
    pub fn contains(&self, input: &InputId) -> bool {
        self.members.iter().any(|m| m == input)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in insertion order
    pub fn as_slice(&self) -> &[InputId] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputId> {
        self.members.iter()
    }

    /// True if every member of `self` is also in `other`
    pub fn is_subset(&self, other: &Group) -> bool {
        self.members.iter().all(|m| other.contains(m))
    }

    /// Members as plain strings, in insertion order
    pub fn to_strings(&self) -> Vec<String> {
        self.members.iter().map(|m| m.as_str().to_string()).collect()
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        // Members are unique, so equal size plus one-way containment is
        // symmetric containment
        self.len() == other.len() && self.is_subset(other)
    }
}

impl Eq for Group {}

impl<S: Into<InputId>> FromIterator<S> for Group {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut group = Group::new();
        for input in iter {
            group.insert(input.into());
        }
        group
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self.members.iter().map(|m| m.as_str()).collect();
        let sep = format!(" {} ", SEPARATOR_SIMULTANEOUS);
        write!(f, "{}", parts.join(&sep))
    }
}

/// Structured form of a binding: groups of simultaneous inputs connected
/// in temporal sequence
#[derive(Debug, Clone, Default)]
pub struct BindingDescriptor {
    groups: Vec<Group>,
}

impl BindingDescriptor {
    /// Create an empty descriptor
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Build a descriptor from nested string lists
    ///
    /// # Examples
    /// ```
    /// use inputman_core::BindingDescriptor;
    /// let d = BindingDescriptor::from_groups([vec!["ShiftLeft", "KeyD"], vec!["KeyE"]]);
    /// assert_eq!(d.len(), 2);
    /// ```
    pub fn from_groups<G, S>(groups: impl IntoIterator<Item = G>) -> Self
    where
        G: IntoIterator<Item = S>,
        S: Into<InputId>,
    {
        let mut descriptor = Self::new();
        for group in groups {
            descriptor.push(group.into_iter().collect());
        }
        descriptor
    }

    /// Append a group. Empty groups are dropped.
    pub fn push(&mut self, group: Group) {
        if !group.is_empty() {
            self.groups.push(group);
        }
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Every input of every group, in order, flattened into one list
    pub fn flatten(&self) -> Vec<InputId> {
        self.groups
            .iter()
            .flat_map(|g| g.iter().cloned())
            .collect()
    }

    /// Keep only the last `n` groups
    pub fn last_groups(&self, n: usize) -> BindingDescriptor {
        let start = self.groups.len().saturating_sub(n);
        Self {
            groups: self.groups[start..].to_vec(),
        }
    }

    /// Groups as nested string lists, in insertion order
    pub fn to_vecs(&self) -> Vec<Vec<String>> {
        self.groups.iter().map(Group::to_strings).collect()
    }
}

/// Exact structural equality: same number of groups and, index by index,
/// groups with identical membership (order within a group ignored)
pub fn descriptors_equal(a: &BindingDescriptor, b: &BindingDescriptor) -> bool {
    a.groups.len() == b.groups.len() && a.groups.iter().zip(&b.groups).all(|(x, y)| x == y)
}

impl PartialEq for BindingDescriptor {
    fn eq(&self, other: &Self) -> bool {
        descriptors_equal(self, other)
    }
}

impl Eq for BindingDescriptor {}

impl FromIterator<Group> for BindingDescriptor {
    fn from_iter<I: IntoIterator<Item = Group>>(iter: I) -> Self {
        let mut descriptor = Self::new();
        for group in iter {
            descriptor.push(group);
        }
        descriptor
    }
}

impl fmt::Display for BindingDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.groups.iter().map(|g| g.to_string()).collect();
        let sep = format!(" {} ", SEPARATOR_SEQUENTIAL);
        write!(f, "{}", parts.join(&sep))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_insert_dedups() {
        let mut group = Group::new();
        assert!(group.insert(InputId::from("KeyA")));
        assert!(!group.insert(InputId::from("KeyA")));
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn test_equality_ignores_in_group_order() {
        let a = BindingDescriptor::from_groups([vec!["A", "B"]]);
        let b = BindingDescriptor::from_groups([vec!["B", "A"]]);
        assert!(descriptors_equal(&a, &b));
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_respects_group_order() {
        let a = BindingDescriptor::from_groups([vec!["A"], vec!["B"]]);
        let b = BindingDescriptor::from_groups([vec!["B"], vec!["A"]]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_equality_differing_group_count() {
        let a = BindingDescriptor::from_groups([vec!["A", "B"]]);
        let b = BindingDescriptor::from_groups([vec!["A"], vec!["B"]]);
        assert!(!descriptors_equal(&a, &b));
    }

    #[test]
    fn test_equality_differing_membership() {
        let a = BindingDescriptor::from_groups([vec!["A", "B"]]);
        let b = BindingDescriptor::from_groups([vec!["A", "C"]]);
        let c = BindingDescriptor::from_groups([vec!["A", "B", "C"]]);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_empty_groups_are_dropped() {
        let d = BindingDescriptor::from_groups([vec!["A"], vec![], vec!["B"]]);
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn test_last_groups() {
        let d = BindingDescriptor::from_groups([vec!["A"], vec!["B"], vec!["C"]]);
        assert_eq!(d.last_groups(2), BindingDescriptor::from_groups([vec!["B"], vec!["C"]]));
        assert_eq!(d.last_groups(10), d);
    }

    #[test]
    fn test_flatten_preserves_order() {
        let d = BindingDescriptor::from_groups([vec!["ShiftLeft", "KeyD"], vec!["KeyE"]]);
        let flat: Vec<String> = d.flatten().into_iter().map(InputId::into_string).collect();
        assert_eq!(flat, vec!["ShiftLeft", "KeyD", "KeyE"]);
    }

    #[test]
    fn test_display() {
        let d = BindingDescriptor::from_groups([vec!["ShiftLeft", "KeyD"], vec!["KeyE"]]);
        assert_eq!(d.to_string(), "ShiftLeft + KeyD > KeyE");
    }

    #[test]
    fn test_match_mode_for_binding() {
        assert_eq!(MatchMode::for_binding("ShiftLeft+KeyW"), MatchMode::Simultaneous);
        assert_eq!(MatchMode::for_binding("ShiftLeft>KeyE"), MatchMode::Sequential);
        assert_eq!(MatchMode::Sequential.to_string(), "sequential");
    }
}
