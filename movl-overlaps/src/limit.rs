use std::cmp::Ordering;

///
/// One sweep event: the start or the end of an ancestor region.
///
/// A RegionLimit is a view, not an owner: it carries the arena handle of its
/// ancestor inside the owning [`OverlapEngine`](crate::OverlapEngine)
/// together with the event's effective (extension-adjusted) coordinates,
/// resolved at build time. Two limits exist per swept ancestor; they are
/// rebuilt for every sweep and never persisted.
///
/// Ordering is by position ascending with ties broken start-before-end.
/// The tie-break guarantees that at a shared coordinate every interval start
/// is processed before any interval end, which is what lets touching
/// segments be computed without ambiguity.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionLimit {
    handle: usize,
    position: u32,
    other_position: u32,
    is_start: bool,
}

impl RegionLimit {
    /// The start event of an ancestor spanning `[first, last]`.
    pub fn start(handle: usize, first: u32, last: u32) -> Self {
        RegionLimit {
            handle,
            position: first,
            other_position: last,
            is_start: true,
        }
    }

    /// The end event of an ancestor spanning `[first, last]`.
    pub fn end(handle: usize, first: u32, last: u32) -> Self {
        RegionLimit {
            handle,
            position: last,
            other_position: first,
            is_start: false,
        }
    }

    /// Arena handle of the ancestor this event belongs to.
    pub fn handle(&self) -> usize {
        self.handle
    }

    /// The event's own coordinate.
    pub fn position(&self) -> u32 {
        self.position
    }

    /// The ancestor's opposite coordinate.
    pub fn other_position(&self) -> u32 {
        self.other_position
    }

    pub fn is_start(&self) -> bool {
        self.is_start
    }
}

impl Ord for RegionLimit {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position
            .cmp(&other.position)
            // starts before ends at the same position
            .then_with(|| other.is_start.cmp(&self.is_start))
            .then_with(|| self.handle.cmp(&other.handle))
    }
}

impl PartialOrd for RegionLimit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_positions() {
        let start = RegionLimit::start(0, 100, 600);
        let end = RegionLimit::end(0, 100, 600);
        assert_eq!(start.position(), 100);
        assert_eq!(start.other_position(), 600);
        assert_eq!(end.position(), 600);
        assert_eq!(end.other_position(), 100);
    }

    #[rstest]
    fn test_starts_sort_before_ends_at_shared_position() {
        // [100, 300] ends where [300, 500] starts
        let mut limits = vec![
            RegionLimit::end(0, 100, 300),
            RegionLimit::start(1, 300, 500),
        ];
        limits.sort_unstable();
        assert!(limits[0].is_start());
        assert!(!limits[1].is_start());
    }

    #[rstest]
    fn test_sorted_by_position() {
        let mut limits = vec![
            RegionLimit::end(0, 100, 600),
            RegionLimit::start(1, 200, 500),
            RegionLimit::start(0, 100, 600),
            RegionLimit::end(1, 200, 500),
        ];
        limits.sort_unstable();
        let positions: Vec<u32> = limits.iter().map(|l| l.position()).collect();
        assert_eq!(positions, vec![100, 200, 500, 600]);
    }
}
