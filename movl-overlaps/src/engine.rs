use movl_core::{AncestorRegion, Interval, MultiRegion};

use crate::filter::Filter;
use crate::limit::RegionLimit;

///
/// Sweep-line overlap detector for one chromosome/contig.
///
/// The engine owns an arena of [`AncestorRegion`]s populated with [`add`];
/// every ancestor is addressed by the stable handle `add` returned, so the
/// reshuffling machinery can rewrite coordinates or mask an ancestor out of a
/// round without touching the arena layout. Each sweep derives two
/// [`RegionLimit`] events per unmasked ancestor, walks them in coordinate
/// order and stores the accepted [`MultiRegion`]s, replacing the previous
/// results.
///
/// Coordinate extension is a read-time lens: a sweep run with `ext > 0` walks
/// the widened coordinates but the ancestors recorded in every result keep
/// their original ones.
///
/// [`add`]: OverlapEngine::add
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlapEngine {
    ancestors: Vec<AncestorRegion>,
    masked: Vec<bool>,
    overlaps: Vec<MultiRegion>,
}

impl OverlapEngine {
    pub fn new() -> Self {
        OverlapEngine::default()
    }

    /// Append one ancestor region and return its arena handle.
    pub fn add(&mut self, interval: Interval, track_id: u32, movable: bool) -> usize {
        self.ancestors.push(AncestorRegion::new(interval, track_id, movable));
        self.masked.push(false);
        self.ancestors.len() - 1
    }

    /// All ancestors in arena (insertion) order.
    pub fn ancestors(&self) -> &[AncestorRegion] {
        &self.ancestors
    }

    /// The accepted regions of the most recent sweep.
    pub fn overlaps(&self) -> &[MultiRegion] {
        &self.overlaps
    }

    pub fn len(&self) -> usize {
        self.ancestors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ancestors.is_empty()
    }

    /// Rewrite one ancestor's coordinates; track id, name and strand are
    /// untouched. Used by the reshuffling step.
    ///
    /// # Panics
    ///
    /// Panics if `handle` was not returned by [`add`](OverlapEngine::add).
    pub fn set_coords(&mut self, handle: usize, first: u32, last: u32) {
        self.ancestors[handle].set_coords(first, last);
    }

    /// Exclude (or re-include) one ancestor from subsequent sweeps.
    ///
    /// # Panics
    ///
    /// Panics if `handle` was not returned by [`add`](OverlapEngine::add).
    pub fn set_masked(&mut self, handle: usize, masked: bool) {
        self.masked[handle] = masked;
    }

    pub fn is_masked(&self, handle: usize) -> bool {
        self.masked[handle]
    }

    /// Segmented sweep: partition every position covered by at least one
    /// unmasked ancestor into maximal constant-multiplicity runs, keep the
    /// runs accepted by `Filter::new(min_len, min_mult, max_mult, true,
    /// intrack)` and return their count.
    pub fn find_overlaps(
        &mut self,
        min_len: u32,
        min_mult: u32,
        max_mult: u32,
        ext: u32,
        intrack: bool,
    ) -> usize {
        let filter = Filter::new(min_len, min_mult, max_mult, true, intrack);
        let limits = self.build_limits(ext);
        let mut accepted = Vec::new();
        let mut active: Vec<usize> = Vec::new();
        let mut seg_start = 0u32;
        for limit in &limits {
            let pos = limit.position();
            if limit.is_start() {
                if !active.is_empty() && pos > seg_start {
                    // close the pending run with the pre-insertion set
                    self.close_segment(
                        seg_start,
                        pos - 1,
                        &active,
                        active.len() as u32,
                        &filter,
                        ext,
                        &mut accepted,
                    );
                }
                active.push(limit.handle());
                seg_start = pos;
            } else {
                if seg_start <= pos {
                    // close the pending run with the pre-removal set
                    self.close_segment(
                        seg_start,
                        pos,
                        &active,
                        active.len() as u32,
                        &filter,
                        ext,
                        &mut accepted,
                    );
                    seg_start = pos.saturating_add(1);
                }
                if let Some(at) = active.iter().position(|&h| h == limit.handle()) {
                    active.swap_remove(at);
                }
            }
        }
        self.overlaps = accepted;
        self.overlaps.len()
    }

    /// Union sweep: merge each connected stretch of coverage into one region
    /// spanning from its first start to the closing end, with multiplicity
    /// equal to the deepest overlap seen within it and ancestry of everything
    /// touched. Intra-track filtering is not applied in this mode.
    pub fn find_union_overlaps(
        &mut self,
        min_len: u32,
        min_mult: u32,
        max_mult: u32,
        ext: u32,
    ) -> usize {
        let filter = Filter::new(min_len, min_mult, max_mult, false, true);
        let limits = self.build_limits(ext);
        let mut accepted = Vec::new();
        let mut touched: Vec<usize> = Vec::new();
        let mut depth = 0u32;
        let mut max_depth = 0u32;
        let mut union_start = 0u32;
        for limit in &limits {
            if limit.is_start() {
                if depth == 0 {
                    union_start = limit.position();
                    max_depth = 0;
                    touched.clear();
                }
                depth += 1;
                max_depth = max_depth.max(depth);
                touched.push(limit.handle());
            } else {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    self.close_segment(
                        union_start,
                        limit.position(),
                        &touched,
                        max_depth,
                        &filter,
                        ext,
                        &mut accepted,
                    );
                }
            }
        }
        self.overlaps = accepted;
        self.overlaps.len()
    }

    /// Two sweep events per unmasked ancestor, widened by `ext` and sorted.
    fn build_limits(&self, ext: u32) -> Vec<RegionLimit> {
        let mut limits = Vec::with_capacity(2 * self.ancestors.len());
        for (handle, anc) in self.ancestors.iter().enumerate() {
            if self.masked[handle] {
                continue;
            }
            let first = anc.interval().ext_first(ext);
            let last = anc.interval().ext_last(ext);
            limits.push(RegionLimit::start(handle, first, last));
            limits.push(RegionLimit::end(handle, first, last));
        }
        limits.sort_unstable();
        limits
    }

    fn close_segment(
        &self,
        first: u32,
        last: u32,
        handles: &[usize],
        mult: u32,
        filter: &Filter,
        ext: u32,
        out: &mut Vec<MultiRegion>,
    ) {
        let ancestors: Vec<AncestorRegion> = handles
            .iter()
            .map(|&handle| self.ancestors[handle].clone())
            .collect();
        if let Some(mult) = filter.accept(first, last, &ancestors, mult, ext) {
            out.push(MultiRegion::with_extension(first, last, ancestors, mult, ext));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use movl_core::Strand;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    /// The recurring three-track fixture: [100,600], [200,500], [300,400].
    fn three_tracks() -> OverlapEngine {
        let mut engine = OverlapEngine::new();
        engine.add(Interval::new(100, 600, Strand::Unstranded, "a"), 1, false);
        engine.add(Interval::new(200, 500, Strand::Unstranded, "b"), 2, false);
        engine.add(Interval::new(300, 400, Strand::Unstranded, "c"), 3, false);
        engine
    }

    fn spans(engine: &OverlapEngine) -> Vec<(u32, u32, u32)> {
        engine
            .overlaps()
            .iter()
            .map(|r| (r.first(), r.last(), r.multiplicity()))
            .collect()
    }

    #[rstest]
    fn test_three_track_segmentation() {
        let mut engine = three_tracks();
        let accepted = engine.find_overlaps(1, 2, 0, 0, false);
        assert_eq!(accepted, 3);
        assert_eq!(
            spans(&engine),
            vec![(200, 299, 2), (300, 400, 3), (401, 500, 2)]
        );
        assert_eq!(
            engine.overlaps()[1].ancestor_str(),
            "1:a:.:100-600|2:b:.:200-500|3:c:.:300-400"
        );
    }

    #[rstest]
    fn test_three_track_union() {
        let mut engine = three_tracks();
        let accepted = engine.find_union_overlaps(1, 3, 3, 0);
        assert_eq!(accepted, 1);
        assert_eq!(spans(&engine), vec![(100, 600, 3)]);
        assert_eq!(engine.overlaps()[0].ancestors().len(), 3);
    }

    #[rstest]
    fn test_union_separates_disjoint_stretches() {
        let mut engine = OverlapEngine::new();
        engine.add(Interval::with_coords(100, 200), 1, false);
        engine.add(Interval::with_coords(150, 250), 2, false);
        engine.add(Interval::with_coords(300, 400), 3, false);
        let accepted = engine.find_union_overlaps(1, 1, 0, 0);
        assert_eq!(accepted, 2);
        assert_eq!(spans(&engine), vec![(100, 250, 2), (300, 400, 1)]);
    }

    #[rstest]
    fn test_solitary_region_detected() {
        let mut engine = OverlapEngine::new();
        engine.add(Interval::with_coords(210, 220), 1, false);
        let accepted = engine.find_overlaps(1, 1, 1, 0, true);
        assert_eq!(accepted, 1);
        let region = &engine.overlaps()[0];
        assert_eq!((region.first(), region.last()), (210, 220));
        assert!(region.solitary());
    }

    #[rstest]
    fn test_trimmed_fragments_dropped_at_minmult_one() {
        // [100,199] and [501,600] are remnants of trk1 trimmed by trk2;
        // solitary mode keeps whole regions only
        let mut engine = OverlapEngine::new();
        engine.add(Interval::with_coords(100, 600), 1, false);
        engine.add(Interval::with_coords(200, 500), 2, false);
        engine.add(Interval::with_coords(800, 900), 3, false);
        engine.find_overlaps(1, 1, 0, 0, true);
        assert_eq!(spans(&engine), vec![(200, 500, 2), (800, 900, 1)]);
        assert!(engine.overlaps()[1].solitary());
    }

    #[rstest]
    fn test_idempotent_sweep() {
        let mut engine = three_tracks();
        engine.find_overlaps(1, 2, 0, 0, false);
        let once = engine.overlaps().to_vec();
        engine.find_overlaps(1, 2, 0, 0, false);
        assert_eq!(engine.overlaps(), &once[..]);
    }

    #[rstest]
    fn test_covered_positions_partitioned_without_loss() {
        // every input appears on two tracks, so every covered position
        // belongs to a segment the filter accepts
        let mut engine = OverlapEngine::new();
        for track in [1, 2] {
            engine.add(Interval::with_coords(100, 300), track, false);
            engine.add(Interval::with_coords(200, 400), track, false);
            engine.add(Interval::with_coords(600, 700), track, false);
        }
        engine.find_overlaps(1, 1, 0, 0, true);
        let segments = spans(&engine);
        // adjacent, non-overlapping, ascending
        for pair in segments.windows(2) {
            assert!(pair[0].1 < pair[1].0);
        }
        let covered: u32 = engine.overlaps().iter().map(|r| r.length()).sum();
        // [100,400] and [600,700]
        assert_eq!(covered, 301 + 101);
        assert_eq!(segments.first().map(|s| s.0), Some(100));
        assert_eq!(segments.last().map(|s| s.1), Some(700));
    }

    #[rstest]
    fn test_touching_intervals_stay_separate() {
        // [100,300] ends exactly where [300,500] starts
        let mut engine = OverlapEngine::new();
        engine.add(Interval::with_coords(100, 300), 1, false);
        engine.add(Interval::with_coords(300, 500), 2, false);
        engine.find_overlaps(1, 1, 0, 0, true);
        assert_eq!(spans(&engine), vec![(300, 300, 2)]);
    }

    #[rstest]
    fn test_extension_widens_sweep_but_not_ancestors() {
        let mut engine = OverlapEngine::new();
        engine.add(Interval::new(210, 310, Strand::Unstranded, "left"), 1, false);
        engine.add(Interval::new(400, 500, Strand::Unstranded, "right"), 2, false);
        // disjoint as stored, overlapping once widened by 50
        assert_eq!(engine.find_overlaps(1, 2, 0, 0, true), 0);
        let accepted = engine.find_overlaps(1, 2, 0, 50, true);
        assert_eq!(accepted, 1);
        let region = &engine.overlaps()[0];
        assert_eq!((region.first(), region.last()), (350, 360));
        // reported ancestors keep the original coordinates
        assert_eq!(
            region.ancestor_str(),
            "1:left:.:210-310|2:right:.:400-500"
        );
    }

    #[rstest]
    fn test_duplicated_ancestors_are_kept_as_multiset() {
        let mut engine = OverlapEngine::new();
        engine.add(Interval::new(100, 200, Strand::Unstranded, "dup"), 1, false);
        engine.add(Interval::new(100, 200, Strand::Unstranded, "dup"), 1, false);
        engine.find_overlaps(1, 2, 0, 0, true);
        assert_eq!(spans(&engine), vec![(100, 200, 2)]);
        assert_eq!(engine.overlaps()[0].ancestor_str(), "2*1:dup:.:100-200");
    }

    #[rstest]
    fn test_masked_ancestor_sits_out() {
        let mut engine = three_tracks();
        engine.set_masked(2, true);
        engine.find_overlaps(1, 2, 0, 0, false);
        assert_eq!(spans(&engine), vec![(200, 500, 2)]);
        engine.set_masked(2, false);
        engine.find_overlaps(1, 2, 0, 0, false);
        assert_eq!(
            spans(&engine),
            vec![(200, 299, 2), (300, 400, 3), (401, 500, 2)]
        );
    }

    #[rstest]
    fn test_set_coords_moves_ancestor() {
        let mut engine = OverlapEngine::new();
        let handle = engine.add(Interval::with_coords(100, 200), 1, false);
        engine.add(Interval::with_coords(1000, 1100), 2, false);
        assert_eq!(engine.find_overlaps(1, 2, 0, 0, true), 0);
        engine.set_coords(handle, 1050, 1150);
        engine.find_overlaps(1, 2, 0, 0, true);
        assert_eq!(spans(&engine), vec![(1050, 1100, 2)]);
    }
}
