use std::cmp::Ordering;
use std::fmt::{self, Display};

use crate::models::Interval;

///
/// An input interval annotated with the id of the track it came from and a
/// flag telling the reshuffling machinery whether it may be moved.
///
/// Ancestors live in multisets: two equal AncestorRegions may legitimately
/// coexist when provenance requires it.
///
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AncestorRegion {
    interval: Interval,
    track_id: u32,
    movable: bool,
}

impl AncestorRegion {
    pub fn new(interval: Interval, track_id: u32, movable: bool) -> Self {
        AncestorRegion {
            interval,
            track_id,
            movable,
        }
    }

    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    pub fn track_id(&self) -> u32 {
        self.track_id
    }

    pub fn movable(&self) -> bool {
        self.movable
    }

    /// Rewrite the coordinates only; identity, name, strand and track id are
    /// untouched. Used by the reshuffling step.
    pub fn set_coords(&mut self, first: u32, last: u32) {
        self.interval.set_coords(first, last);
    }

    /// The attribute string writers render: `trackid:name:strand:first-last`.
    pub fn attr_string(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.track_id,
            self.interval.name(),
            self.interval.strand(),
            self.interval,
        )
    }
}

impl Ord for AncestorRegion {
    /// Track id first, interval order within a track.
    fn cmp(&self, other: &Self) -> Ordering {
        self.track_id
            .cmp(&other.track_id)
            .then_with(|| self.interval.cmp(&other.interval))
            .then_with(|| self.movable.cmp(&other.movable))
    }
}

impl PartialOrd for AncestorRegion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for AncestorRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.attr_string())
    }
}
