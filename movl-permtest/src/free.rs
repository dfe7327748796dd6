use movl_core::Interval;
use rand::Rng;

use crate::errors::PlacementError;

///
/// Length-weighted random selector over the set of permitted placement
/// intervals.
///
/// Construction precomputes cumulative length fractions, the "roulette
/// sectors": `sector[0] = 0`, `sector[i] = Σ length[0..i) / total`. A draw
/// picks `u ∈ [0,1)` and binary-searches the sector boundaries, so longer
/// intervals are chosen proportionally more often. When no permitted
/// interval reaches the requested length the selector fails immediately with
/// [`PlacementError::WontFit`] instead of redrawing forever.
///
#[derive(Debug, Clone, PartialEq)]
pub struct FreeRegions {
    regions: Vec<Interval>,
    sectors: Vec<f64>,
    max_len: u32,
}

impl FreeRegions {
    /// Build the selector from disjoint permitted intervals.
    pub fn new(mut regions: Vec<Interval>) -> Self {
        regions.sort();
        let total: f64 = regions.iter().map(|r| r.length() as f64).sum();
        let max_len = regions.iter().map(Interval::length).max().unwrap_or(0);
        let mut sectors = Vec::with_capacity(regions.len() + 1);
        sectors.push(0.0);
        let mut cum = 0.0;
        for region in &regions {
            cum += region.length() as f64;
            sectors.push(if total > 0.0 { cum / total } else { 1.0 });
        }
        FreeRegions {
            regions,
            sectors,
            max_len,
        }
    }

    /// The permitted intervals in coordinate order.
    pub fn regions(&self) -> &[Interval] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Length of the longest permitted interval, 0 when empty.
    pub fn max_length(&self) -> u32 {
        self.max_len
    }

    /// Pick a random permitted interval of length at least `min_len`,
    /// weighted by length.
    ///
    /// Fails with [`PlacementError::WontFit`] when no interval is long
    /// enough. A first draw over all sectors that lands on a too-short
    /// interval is followed by at most one re-draw restricted to the
    /// qualifying intervals, still weighted by length.
    pub fn select<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        min_len: u32,
    ) -> Result<&Interval, PlacementError> {
        if self.regions.is_empty() || min_len > self.max_len {
            return Err(PlacementError::WontFit { len: min_len });
        }
        let u: f64 = rng.random();
        let candidate = &self.regions[self.sector_index(u)];
        if candidate.length() >= min_len {
            return Ok(candidate);
        }
        let qualifying: Vec<&Interval> = self
            .regions
            .iter()
            .filter(|r| r.length() >= min_len)
            .collect();
        let total: f64 = qualifying.iter().map(|r| r.length() as f64).sum();
        let mut draw = rng.random::<f64>() * total;
        for &region in &qualifying {
            let len = region.length() as f64;
            if draw < len {
                return Ok(region);
            }
            draw -= len;
        }
        // floating-point slack lands on the last qualifying interval
        Ok(qualifying[qualifying.len() - 1])
    }

    /// True iff some permitted interval fully contains `interval`;
    /// exact-boundary containment counts.
    pub fn fit(&self, interval: &Interval) -> bool {
        self.regions.iter().any(|r| r.contains(interval))
    }

    fn sector_index(&self, u: f64) -> usize {
        let i = self.sectors.partition_point(|&s| s <= u);
        (i - 1).min(self.regions.len() - 1)
    }
}
