// Inputman Matcher
// Decides whether a binding matches the tracker's current state

use std::time::Instant;

use crate::descriptor::{BindingDescriptor, Group, MatchMode};
use crate::state::{InputTracker, Moment};
use crate::InputId;

/// Ordered window equality: same length, same items at each index
pub fn arrays_equal<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

/// Check whether `inner` appears as a contiguous, order-preserving run
/// inside `outer`.
///
/// An empty `inner` is always contained; an `inner` longer than `outer`
/// never is.
///
/// # Examples
/// ```
/// use inputman_core::matcher::array_contains_ord;
/// assert!(array_contains_ord(&[1, 4, 2, 8, 10, 15], &[8, 10, 15]));
/// assert!(!array_contains_ord(&[1, 4, 2, 8, 10, 15], &[4, 15, 1]));
/// ```
pub fn array_contains_ord<T: PartialEq>(outer: &[T], inner: &[T]) -> bool {
    if inner.is_empty() {
        return true;
    }
    if inner.len() > outer.len() {
        return false;
    }
    outer
        .windows(inner.len())
        .any(|window| arrays_equal(window, inner))
}

/// Keep only the last `max_len` items, dropping the oldest first
pub fn cull_sequence<T: Clone>(items: &[T], max_len: usize) -> Vec<T> {
    let start = items.len().saturating_sub(max_len);
    items[start..].to_vec()
}

/// Simultaneous mode: the binding's inputs, in order, form a contiguous run
/// of the held list
pub fn matches_simultaneous(keys: &[InputId], held: &[InputId]) -> bool {
    !keys.is_empty() && array_contains_ord(held, keys)
}

/// Sequential mode: compare the binding's N groups with the last N moments.
///
/// Each binding group must be contained in its moment's snapshot, must
/// include the input whose press opened that moment, and may differ from
/// the snapshot only by inputs that were already down at the previous
/// moment. Older history outside the last N moments is ignored. When no
/// input is carried across a boundary this is exact descriptor equality.
pub fn matches_sequential(binding: &BindingDescriptor, moments: &[Moment]) -> bool {
    let n = binding.len();
    if n == 0 || moments.len() < n {
        return false;
    }

    let start = moments.len() - n;
    let mut previous: Option<&Group> = start.checked_sub(1).map(|i| &moments[i].group);

    for (expected, moment) in binding.groups().iter().zip(&moments[start..]) {
        if !group_matches(expected, moment, previous) {
            return false;
        }
        previous = Some(&moment.group);
    }
    true
}

fn group_matches(expected: &Group, moment: &Moment, previous: Option<&Group>) -> bool {
    if !expected.contains(&moment.fresh) || !expected.is_subset(&moment.group) {
        return false;
    }
    moment
        .group
        .iter()
        .filter(|input| !expected.contains(input))
        .all(|carried| previous.is_some_and(|p| p.contains(carried)))
}

/// Evaluate one binding against the tracker as of `now`.
///
/// Sequential bindings complete on a press: the newest log entry must be
/// the press that opened the final group, and every input named by an
/// earlier group must still be held or released within the release window.
pub fn binding_matches(
    descriptor: &BindingDescriptor,
    mode: MatchMode,
    tracker: &InputTracker,
    now: Instant,
) -> bool {
    match mode {
        MatchMode::Simultaneous => matches_simultaneous(&descriptor.flatten(), &tracker.held()),
        MatchMode::Sequential => {
            if !tracker.last_event_was_press() {
                return false;
            }
            if !matches_sequential(descriptor, &tracker.moments()) {
                return false;
            }
            let Some((_, earlier)) = descriptor.groups().split_last() else {
                return false;
            };
            earlier
                .iter()
                .flat_map(Group::iter)
                .all(|input| tracker.is_held(input) || tracker.released_recently(input, now))
        }
    }
}
