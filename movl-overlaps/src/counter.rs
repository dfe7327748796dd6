use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::ops::AddAssign;

use movl_core::MultiRegion;

///
/// Post-hoc summary of produced overlap regions, keyed by the sorted,
/// de-duplicated set of contributing track ids.
///
/// Counters from different contigs or worker threads merge with
/// [`merge`](Counter::merge) (also available as `+=`), so cross-contig
/// reports need a single pass per engine.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counter {
    counts: BTreeMap<Vec<u32>, u64>,
}

impl Counter {
    pub fn new() -> Self {
        Counter::default()
    }

    /// Record one region under its track-id combination.
    pub fn count(&mut self, region: &MultiRegion) {
        let mut tracks: Vec<u32> = region
            .ancestors()
            .iter()
            .map(|anc| anc.track_id())
            .collect();
        tracks.sort_unstable();
        tracks.dedup();
        *self.counts.entry(tracks).or_insert(0) += 1;
    }

    pub fn count_all<'a>(&mut self, regions: impl IntoIterator<Item = &'a MultiRegion>) {
        for region in regions {
            self.count(region);
        }
    }

    /// Total number of regions counted.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Fold another counter into this one.
    pub fn merge(&mut self, other: &Counter) {
        for (tracks, n) in &other.counts {
            *self.counts.entry(tracks.clone()).or_insert(0) += n;
        }
    }

    /// The recorded combinations and their counts, in key order.
    pub fn combinations(&self) -> impl Iterator<Item = (&[u32], u64)> {
        self.counts.iter().map(|(tracks, &n)| (tracks.as_slice(), n))
    }
}

impl AddAssign<&Counter> for Counter {
    fn add_assign(&mut self, other: &Counter) {
        self.merge(other);
    }
}

impl Display for Counter {
    /// Space-separated `ids:count` entries in key order, the ids
    /// comma-joined: `"1,2:2 1,2,3:2"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (tracks, n) in &self.counts {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            let ids: Vec<String> = tracks.iter().map(u32::to_string).collect();
            write!(f, "{}:{}", ids.join(","), n)?;
        }
        Ok(())
    }
}
