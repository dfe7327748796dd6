use std::cmp::Ordering;
use std::fmt::{self, Display};

use crate::models::Strand;

///
/// A genomic interval `[first, last]` with 1-based, inclusive coordinates,
/// a strand and a name.
///
/// The invariant `first <= last` holds at all times: the constructor and the
/// coordinate setter silently swap violating input. `[0, 0]` is the empty
/// interval.
///
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    first: u32,
    last: u32,
    strand: Strand,
    name: String,
}

impl Interval {
    pub fn new(first: u32, last: u32, strand: Strand, name: impl Into<String>) -> Self {
        let (first, last) = ordered(first, last);
        Interval {
            first,
            last,
            strand,
            name: name.into(),
        }
    }

    /// An unnamed, unstranded interval.
    pub fn with_coords(first: u32, last: u32) -> Self {
        Interval::new(first, last, Strand::default(), "")
    }

    pub fn first(&self) -> u32 {
        self.first
    }

    pub fn last(&self) -> u32 {
        self.last
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace both coordinates, swapping if `first > last`.
    pub fn set_coords(&mut self, first: u32, last: u32) {
        let (first, last) = ordered(first, last);
        self.first = first;
        self.last = last;
    }

    /// Number of positions covered: `last - first + 1`, or 0 for the empty
    /// interval `[0, 0]`.
    pub fn length(&self) -> u32 {
        if self.first == 0 && self.last == 0 {
            0
        } else {
            self.last - self.first + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    /// First coordinate widened by `ext`, clamped at 0.
    ///
    /// Extension is a read-time lens for the sweep: the stored coordinates
    /// never change.
    pub fn ext_first(&self, ext: u32) -> u32 {
        self.first.saturating_sub(ext)
    }

    /// Last coordinate widened by `ext`.
    pub fn ext_last(&self, ext: u32) -> u32 {
        self.last.saturating_add(ext)
    }

    /// True iff `other` lies entirely within this interval; exact-boundary
    /// containment counts.
    pub fn contains(&self, other: &Interval) -> bool {
        self.first <= other.first && other.last <= self.last
    }
}

fn ordered(first: u32, last: u32) -> (u32, u32) {
    if first <= last { (first, last) } else { (last, first) }
}

impl Ord for Interval {
    /// (first asc, last desc, strand, name): among intervals starting at the
    /// same position the longer one sorts first.
    fn cmp(&self, other: &Self) -> Ordering {
        self.first
            .cmp(&other.first)
            .then_with(|| other.last.cmp(&self.last))
            .then_with(|| self.strand.cmp(&other.strand))
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}
