use movl_core::AncestorRegion;

///
/// Acceptance policy applied to every candidate segment a sweep closes.
///
/// Construction clamps `ovlen` and `minmult` to at least 1; `maxmult == 0`
/// means unbounded, and a `minmult` above a positive `maxmult` is resolved by
/// silently swapping the two. When `check_solitary` is requested and the
/// clamped `minmult` is 1 the filter switches to solitary mode: `ovlen` is
/// forced to 1, intra-track overlaps are kept, and a single-ancestor segment
/// is accepted only when it covers its ancestor exactly, so a minimum
/// multiplicity of 1 reports whole untouched regions instead of the trimmed
/// fragments flanking an overlap.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filter {
    ovlen: u32,
    minmult: u32,
    maxmult: u32,
    solitary: bool,
    intrack: bool,
}

impl Filter {
    pub fn new(ovlen: u32, minmult: u32, maxmult: u32, check_solitary: bool, intrack: bool) -> Self {
        let mut ovlen = ovlen.max(1);
        let mut minmult = minmult.max(1);
        let mut maxmult = maxmult;
        if maxmult > 0 && minmult > maxmult {
            std::mem::swap(&mut minmult, &mut maxmult);
        }
        let solitary = check_solitary && minmult == 1;
        let mut intrack = intrack;
        if solitary {
            ovlen = 1;
            intrack = true;
        }
        Filter {
            ovlen,
            minmult,
            maxmult,
            solitary,
            intrack,
        }
    }

    /// Minimum accepted segment length after clamping.
    pub fn ovlen(&self) -> u32 {
        self.ovlen
    }

    pub fn minmult(&self) -> u32 {
        self.minmult
    }

    /// Maximum accepted multiplicity, 0 for unbounded.
    pub fn maxmult(&self) -> u32 {
        self.maxmult
    }

    pub fn solitary(&self) -> bool {
        self.solitary
    }

    pub fn intrack(&self) -> bool {
        self.intrack
    }

    /// Judge the segment `[first, last]` produced with `ancestors` and the
    /// sweep-reported multiplicity `mult` by a sweep that ran with coordinate
    /// extension `ext`. Returns the accepted multiplicity, which is rewritten
    /// to the distinct-track count when inter-track-only filtering is
    /// requested, or `None` when the segment is rejected.
    pub fn accept(
        &self,
        first: u32,
        last: u32,
        ancestors: &[AncestorRegion],
        mult: u32,
        ext: u32,
    ) -> Option<u32> {
        if self.solitary && ancestors.len() == 1 {
            // only an ancestor untouched by any overlap passes
            let anc = ancestors[0].interval();
            return (anc.ext_first(ext) == first && anc.ext_last(ext) == last).then_some(mult);
        }
        let mut mult = mult;
        if !self.intrack {
            let distinct = distinct_tracks(ancestors);
            if distinct <= 1 {
                return None;
            }
            // approximation: a complex multi-ancestor segment is reported
            // with the number of distinct contributing tracks
            mult = distinct;
        }
        (self.minmult <= mult
            && last - first + 1 >= self.ovlen
            && (self.maxmult == 0 || mult <= self.maxmult))
            .then_some(mult)
    }
}

fn distinct_tracks(ancestors: &[AncestorRegion]) -> u32 {
    let mut tracks: Vec<u32> = ancestors.iter().map(AncestorRegion::track_id).collect();
    tracks.sort_unstable();
    tracks.dedup();
    tracks.len() as u32
}
