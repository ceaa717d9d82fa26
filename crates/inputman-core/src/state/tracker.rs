// Inputman Input Tracker
// Live held set, bounded event log and time-windowed release history

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use indexmap::{IndexMap, IndexSet};

use crate::descriptor::{BindingDescriptor, Group};
use crate::settings::Settings;
use crate::InputId;

/// One row of the chronological input log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PressEvent {
    pub input: InputId,
    pub pressed: bool,
    pub time: Instant,
}

/// A group snapshot taken when `fresh` was pressed.
///
/// `group` holds every input that was down at that moment, `fresh`
/// included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Moment {
    pub group: Group,
    pub fresh: InputId,
}

/// Owns all live input state.
///
/// Nothing outside the tracker mutates the held set, the log or the release
/// history; matchers only read snapshots derived from them. Release expiry
/// is computed lazily against the instant passed in, so no timers exist and
/// a stale entry can never invalidate another.
#[derive(Debug, Clone)]
pub struct InputTracker {
    /// Inputs currently down, in the order they were pressed
    held: IndexSet<InputId>,
    /// Most recent press/release events, oldest first
    sequence: VecDeque<PressEvent>,
    /// Released input -> instant its release stops counting, oldest release first
    release_history: IndexMap<InputId, Instant>,
    release_window: Duration,
    max_input_sequence_length: usize,
    max_release_sequence_length: usize,
}

impl InputTracker {
    /// Create a tracker with explicit limits; a log length of 0 is raised to 1
    pub fn new(
        release_window: Duration,
        max_input_sequence_length: usize,
        max_release_sequence_length: usize,
    ) -> Self {
        let max_input_sequence_length = max_input_sequence_length.max(1);
        Self {
            held: IndexSet::new(),
            sequence: VecDeque::new(),
            release_history: IndexMap::new(),
            release_window,
            max_input_sequence_length,
            max_release_sequence_length,
        }
    }

    /// Create a tracker using the limits from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.release_window(),
            settings.max_input_sequence_length(),
            settings.max_release_sequence_length(),
        )
    }

    pub fn release_window(&self) -> Duration {
        self.release_window
    }

    /// Record a press happening now
    pub fn press(&mut self, input: impl Into<InputId>) {
        self.press_at(input, Instant::now());
    }

    /// Record a press at a given instant
    pub fn press_at(&mut self, input: impl Into<InputId>, now: Instant) {
        let input = input.into();
        log::trace!("press {}", input);
        self.held.insert(input.clone());
        self.record(input, true, now);
    }

    /// Record a release happening now
    pub fn unpress(&mut self, input: impl Into<InputId>) {
        self.unpress_at(input, Instant::now());
    }

    /// Record a release at a given instant.
    ///
    /// Releasing an input that was never pressed is still logged; it simply
    /// has nothing to remove from the held set.
    pub fn unpress_at(&mut self, input: impl Into<InputId>, now: Instant) {
        let input = input.into();
        log::trace!("release {}", input);
        if !self.held.shift_remove(&input) {
            log::debug!("released {} which was not held", input);
        }
        self.record(input.clone(), false, now);

        self.prune_releases(now);
        // Re-inserting moves a repeated release to the newest position
        self.release_history.shift_remove(&input);
        self.release_history.insert(input, now + self.release_window);
        while self.release_history.len() > self.max_release_sequence_length {
            self.release_history.shift_remove_index(0);
        }
    }

    fn record(&mut self, input: InputId, pressed: bool, time: Instant) {
        self.sequence.push_back(PressEvent {
            input,
            pressed,
            time,
        });
        while self.sequence.len() > self.max_input_sequence_length {
            self.sequence.pop_front();
        }
    }

    /// Inputs currently held, in press order
    pub fn held(&self) -> Vec<InputId> {
        self.held.iter().cloned().collect()
    }

    /// Check if an input is currently held
    pub fn is_held(&self, input: &InputId) -> bool {
        self.held.contains(input)
    }

    /// The retained event log, oldest first
    pub fn sequence(&self) -> impl Iterator<Item = &PressEvent> {
        self.sequence.iter()
    }

    /// True if the newest logged event is a press
    pub fn last_event_was_press(&self) -> bool {
        self.sequence.back().is_some_and(|ev| ev.pressed)
    }

    /// Inputs released within the release window as of `now`, oldest first
    pub fn recent_releases(&self, now: Instant) -> Vec<InputId> {
        self.release_history
            .iter()
            .filter(|(_, expiry)| now <= **expiry)
            .map(|(input, _)| input.clone())
            .collect()
    }

    /// Check if an input was released within the release window as of `now`
    pub fn released_recently(&self, input: &InputId, now: Instant) -> bool {
        self.release_history
            .get(input)
            .is_some_and(|expiry| now <= *expiry)
    }

    /// Drop release entries whose window has passed
    pub fn prune_releases(&mut self, now: Instant) {
        self.release_history.retain(|_, expiry| now <= *expiry);
    }

    /// Forget all held inputs, the event log and the release history
    pub fn clear(&mut self) {
        self.held.clear();
        self.sequence.clear();
        self.release_history.clear();
    }

    /// One snapshot per press in the log, oldest first.
    ///
    /// Walks the log with a running held set: a press adds its input and
    /// snapshots the set, a release removes its input without a snapshot.
    pub fn moments(&self) -> Vec<Moment> {
        let mut held_now: IndexSet<&InputId> = IndexSet::new();
        let mut moments = Vec::new();

        for event in &self.sequence {
            if event.pressed {
                held_now.insert(&event.input);
                moments.push(Moment {
                    group: held_now.iter().map(|input| (*input).clone()).collect(),
                    fresh: event.input.clone(),
                });
            } else {
                held_now.shift_remove(&event.input);
            }
        }

        moments
    }

    /// Derive a descriptor from the log, keeping only the last `window`
    /// groups when given
    pub fn to_binding_descriptor(&self, window: Option<usize>) -> BindingDescriptor {
        let descriptor: BindingDescriptor =
            self.moments().into_iter().map(|m| m.group).collect();
        match window {
            Some(n) => descriptor.last_groups(n),
            None => descriptor,
        }
    }
}

impl Default for InputTracker {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}
