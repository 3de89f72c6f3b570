//! Terminal-condition rules.
//!
//! Win detection scans outward from the last-placed stone, so callers never
//! pay for a full-board rescan inside search loops.

mod win;

pub use win::{is_draw, winner_at, Axis, ALL_AXES};
pub(crate) use win::run_toward;
