use movl_core::{Interval, MultiRegion};
use movl_overlaps::OverlapEngine;
use rand::Rng;

use crate::errors::PlacementError;
use crate::free::FreeRegions;

///
/// Overlap engine whose movable ancestors are re-randomized inside permitted
/// free space before each sweep.
///
/// One instance covers one chromosome/contig; the permutation driver deep
/// copies the whole engine map per worker thread, which the derived `Clone`
/// provides. A movable ancestor that cannot be placed anywhere is masked out
/// of that round's sweep only and re-enters as soon as a later round places
/// it again; immovable ancestors never change coordinates.
///
#[derive(Debug, Clone)]
pub struct ShuffleEngine {
    engine: OverlapEngine,
    free: FreeRegions,
    movable: Vec<usize>,
}

impl ShuffleEngine {
    /// An empty engine placing movable ancestors inside `free`.
    pub fn new(free: FreeRegions) -> Self {
        ShuffleEngine {
            engine: OverlapEngine::new(),
            free,
            movable: Vec::new(),
        }
    }

    /// Promote an already-populated overlap engine.
    pub fn with_engine(engine: OverlapEngine, free: FreeRegions) -> Self {
        let movable = engine
            .ancestors()
            .iter()
            .enumerate()
            .filter(|(_, anc)| anc.movable())
            .map(|(handle, _)| handle)
            .collect();
        ShuffleEngine {
            engine,
            free,
            movable,
        }
    }

    /// Append one ancestor region and return its arena handle.
    pub fn add(&mut self, interval: Interval, track_id: u32, movable: bool) -> usize {
        let handle = self.engine.add(interval, track_id, movable);
        if movable {
            self.movable.push(handle);
        }
        handle
    }

    pub fn engine(&self) -> &OverlapEngine {
        &self.engine
    }

    pub fn free_regions(&self) -> &FreeRegions {
        &self.free
    }

    /// The accepted regions of the most recent sweep.
    pub fn overlaps(&self) -> &[MultiRegion] {
        self.engine.overlaps()
    }

    /// Number of ancestors eligible for reshuffling.
    pub fn movable_count(&self) -> usize {
        self.movable.len()
    }

    /// Re-randomize the coordinates of every movable ancestor and return how
    /// many were placed.
    ///
    /// Placement picks a free interval of sufficient length via
    /// [`FreeRegions::select`], then a uniform start among every position at
    /// which the ancestor fits entirely inside it; length, track id, name and
    /// strand are preserved. An ancestor that fits nowhere sits out the next
    /// sweep, masked for this round only.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let mut placed = 0;
        for &handle in &self.movable {
            let len = self.engine.ancestors()[handle].interval().length();
            if len == 0 {
                // the empty interval stays where it is
                continue;
            }
            match self.free.select(rng, len) {
                Ok(target) => {
                    let first = target.first() + rng.random_range(0..=target.length() - len);
                    self.engine.set_coords(handle, first, first + len - 1);
                    self.engine.set_masked(handle, false);
                    placed += 1;
                }
                Err(PlacementError::WontFit { .. }) => {
                    self.engine.set_masked(handle, true);
                }
            }
        }
        placed
    }

    /// Run the segmented sweep without reshuffling (the actual pass).
    pub fn find_overlaps(
        &mut self,
        min_len: u32,
        min_mult: u32,
        max_mult: u32,
        ext: u32,
        intrack: bool,
    ) -> usize {
        self.engine.find_overlaps(min_len, min_mult, max_mult, ext, intrack)
    }

    /// Run the union sweep without reshuffling (the actual pass).
    pub fn find_union_overlaps(
        &mut self,
        min_len: u32,
        min_mult: u32,
        max_mult: u32,
        ext: u32,
    ) -> usize {
        self.engine.find_union_overlaps(min_len, min_mult, max_mult, ext)
    }

    /// Reshuffle, then run the segmented sweep with the same parameters the
    /// actual pass used.
    pub fn shuffle_overlaps<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        min_len: u32,
        min_mult: u32,
        max_mult: u32,
        ext: u32,
        intrack: bool,
    ) -> usize {
        self.shuffle(rng);
        self.engine.find_overlaps(min_len, min_mult, max_mult, ext, intrack)
    }

    /// Reshuffle, then run the union sweep.
    pub fn shuffle_union_overlaps<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        min_len: u32,
        min_mult: u32,
        max_mult: u32,
        ext: u32,
    ) -> usize {
        self.shuffle(rng);
        self.engine.find_union_overlaps(min_len, min_mult, max_mult, ext)
    }
}
