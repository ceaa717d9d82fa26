// Inputman State
// Live input tracking

pub mod tracker;

pub use tracker::{InputTracker, Moment, PressEvent};
