use std::fmt::{self, Display};

use crate::models::{AncestorRegion, Interval, Strand};

/// Default name given to every detected overlap region.
pub const OVERLAP_NAME: &str = "overlap";

///
/// One detected overlap segment: an interval plus the multiset of ancestors
/// that produced it, the reported multiplicity, and a solitary flag.
///
/// A region is solitary when it has exactly one ancestor whose coordinates
/// equal the region's own, meaning the ancestor was not trimmed by any
/// overlap. MultiRegions are produced fresh by every sweep and are the only
/// externally consumed artifact of the engines.
///
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiRegion {
    interval: Interval,
    ancestors: Vec<AncestorRegion>,
    multiplicity: u32,
    solitary: bool,
}

impl MultiRegion {
    pub fn new(first: u32, last: u32, ancestors: Vec<AncestorRegion>, multiplicity: u32) -> Self {
        MultiRegion::with_extension(first, last, ancestors, multiplicity, 0)
    }

    /// Build a region produced by a sweep that ran with coordinate extension
    /// `ext`. The segment bounds live in extended coordinate space, so the
    /// solitary test compares against the ancestor's effective coordinates;
    /// the stored ancestors keep their original coordinates.
    pub fn with_extension(
        first: u32,
        last: u32,
        mut ancestors: Vec<AncestorRegion>,
        multiplicity: u32,
        ext: u32,
    ) -> Self {
        ancestors.sort();
        let solitary = ancestors.len() == 1 && {
            let anc = ancestors[0].interval();
            anc.ext_first(ext) == first && anc.ext_last(ext) == last
        };
        MultiRegion {
            interval: Interval::new(first, last, Strand::default(), OVERLAP_NAME),
            ancestors,
            multiplicity,
            solitary,
        }
    }

    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    pub fn first(&self) -> u32 {
        self.interval.first()
    }

    pub fn last(&self) -> u32 {
        self.interval.last()
    }

    pub fn length(&self) -> u32 {
        self.interval.length()
    }

    /// The contributing ancestors, held sorted in (track, interval) order.
    pub fn ancestors(&self) -> &[AncestorRegion] {
        &self.ancestors
    }

    pub fn multiplicity(&self) -> u32 {
        self.multiplicity
    }

    pub fn solitary(&self) -> bool {
        self.solitary
    }

    /// The deterministic ancestor-attribute string: entries in ancestor
    /// order, `|`-joined, repeated ancestors collapsed with a `<count>*`
    /// prefix.
    pub fn ancestor_str(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        let mut i = 0;
        while i < self.ancestors.len() {
            let mut j = i + 1;
            while j < self.ancestors.len() && self.ancestors[j] == self.ancestors[i] {
                j += 1;
            }
            let attr = self.ancestors[i].attr_string();
            parts.push(if j - i > 1 {
                format!("{}*{}", j - i, attr)
            } else {
                attr
            });
            i = j;
        }
        parts.join("|")
    }
}

impl Display for MultiRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            self.interval,
            self.multiplicity,
            self.ancestor_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn anc(first: u32, last: u32, track: u32, name: &str) -> AncestorRegion {
        AncestorRegion::new(Interval::new(first, last, Strand::default(), name), track, false)
    }

    #[rstest]
    fn test_solitary_requires_exact_coords() {
        let lone = MultiRegion::new(210, 220, vec![anc(210, 220, 1, "r")], 1);
        assert!(lone.solitary());

        let trimmed = MultiRegion::new(210, 215, vec![anc(210, 220, 1, "r")], 1);
        assert!(!trimmed.solitary());

        let pair = MultiRegion::new(
            210,
            220,
            vec![anc(210, 220, 1, "r"), anc(210, 220, 2, "s")],
            2,
        );
        assert!(!pair.solitary());
    }

    #[rstest]
    fn test_ancestors_kept_sorted() {
        let region = MultiRegion::new(
            300,
            400,
            vec![anc(300, 400, 3, "c"), anc(100, 600, 1, "a"), anc(200, 500, 2, "b")],
            3,
        );
        let tracks: Vec<u32> = region.ancestors().iter().map(|a| a.track_id()).collect();
        assert_eq!(tracks, vec![1, 2, 3]);
    }

    #[rstest]
    fn test_ancestor_str_collapses_repeats() {
        let region = MultiRegion::new(
            100,
            200,
            vec![anc(100, 200, 1, "dup"), anc(100, 200, 1, "dup"), anc(150, 250, 2, "x")],
            3,
        );
        assert_eq!(
            region.ancestor_str(),
            "2*1:dup:.:100-200|2:x:.:150-250"
        );
    }

    #[rstest]
    fn test_solitary_under_extension_compares_effective_coords() {
        // a sweep run with ext=10 reports segment bounds in extended space
        let region = MultiRegion::with_extension(200, 320, vec![anc(210, 310, 1, "r")], 1, 10);
        assert!(region.solitary());
        // the reported ancestor still shows the original coordinates
        assert_eq!(region.ancestor_str(), "1:r:.:210-310");
    }
}
