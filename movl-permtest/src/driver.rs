use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;

use movl_core::MultiRegion;
use movl_overlaps::Counter;

use crate::shuffle::ShuffleEngine;
use crate::stat::Stat;

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 42;

///
/// Acceptance and permutation configuration for one significance run.
///
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationParams {
    /// Minimum accepted segment length.
    pub ovlen: u32,
    /// Minimum accepted multiplicity.
    pub minmult: u32,
    /// Maximum accepted multiplicity, 0 for unbounded.
    pub maxmult: u32,
    /// Coordinate extension applied while sweeping only.
    pub extension: u32,
    /// Run the union sweep instead of the segmented sweep.
    pub uniregion: bool,
    /// Reject overlaps confined to a single track.
    pub nointrack: bool,
    /// Number of permutation rounds.
    pub reshufflings: u32,
    /// Worker threads for the permutation rounds.
    pub threads: usize,
    /// Base random seed; worker `i` draws from `seed + i`.
    pub seed: u64,
}

impl Default for PermutationParams {
    fn default() -> Self {
        PermutationParams {
            ovlen: 1,
            minmult: 1,
            maxmult: 0,
            extension: 0,
            uniregion: false,
            nointrack: false,
            reshufflings: 100,
            threads: 1,
            seed: DEFAULT_SEED,
        }
    }
}

///
/// Judge the significance of the observed overlap pattern by repeated random
/// reshuffling.
///
/// The actual pass always runs first and serially: every contig engine
/// sweeps its unshuffled ancestors, leaving the accepted regions in place
/// for the caller's writers, and the per-multiplicity total segment lengths
/// summed over all contigs become the observed values. The permutation
/// rounds then run on per-worker deep copies of the engine map; a shared
/// countdown of remaining rounds hands out the work and each round's totals
/// are folded into the shared [`Stat`] under a second, separate lock. All
/// requested rounds run to completion; the evaluated `Stat` is returned.
///
/// A single run is exactly reproducible for a fixed seed when `threads <= 1`;
/// with more workers the partition of rounds among them varies with
/// scheduling, although the actual pass never consumes randomness and stays
/// deterministic.
///
pub fn shuffle_significance(
    engines: &mut BTreeMap<String, ShuffleEngine>,
    params: &PermutationParams,
) -> Stat {
    let mut stat = Stat::new();

    let mut totals = BTreeMap::new();
    for (contig, engine) in engines.iter_mut() {
        let accepted = run_sweep(engine, params);
        log::debug!("{contig}: {accepted} overlap regions in the actual pass");
        accumulate(&mut totals, engine.overlaps());
    }
    for (&mult, &len) in &totals {
        stat.add(mult, len, true);
    }
    log::info!(
        "actual pass done: {} contigs, multiplicities {:?}",
        engines.len(),
        stat.multiplicities()
    );

    if params.reshufflings > 0 {
        let threads = params.threads.clamp(1, params.reshufflings as usize);
        log::info!(
            "running {} permutation rounds on {} threads",
            params.reshufflings,
            threads
        );
        let stat_lock = Mutex::new(stat);
        let remaining = Mutex::new(params.reshufflings);
        if threads == 1 {
            // no point spawning: run the rounds in place on one copy
            let mut local = engines.clone();
            let mut rng = StdRng::seed_from_u64(params.seed);
            permutation_worker(&mut local, params, &remaining, &stat_lock, &mut rng);
        } else {
            std::thread::scope(|scope| {
                for worker in 0..threads {
                    let mut local = engines.clone();
                    let remaining = &remaining;
                    let stat_lock = &stat_lock;
                    scope.spawn(move || {
                        let mut rng =
                            StdRng::seed_from_u64(params.seed.wrapping_add(worker as u64));
                        permutation_worker(&mut local, params, remaining, stat_lock, &mut rng);
                    });
                }
            });
        }
        stat = stat_lock
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
    }

    stat.evaluate();
    stat
}

/// Merge the track-combination counts over every engine's current results.
pub fn count_overlaps(engines: &BTreeMap<String, ShuffleEngine>) -> Counter {
    let mut counter = Counter::new();
    for engine in engines.values() {
        let mut per_contig = Counter::new();
        per_contig.count_all(engine.overlaps());
        counter.merge(&per_contig);
    }
    counter
}

/// One worker: draw rounds from the countdown until it reaches zero,
/// shuffling and sweeping a private copy of every contig engine.
fn permutation_worker(
    engines: &mut BTreeMap<String, ShuffleEngine>,
    params: &PermutationParams,
    remaining: &Mutex<u32>,
    stat: &Mutex<Stat>,
    rng: &mut StdRng,
) {
    loop {
        {
            let mut left = remaining.lock().unwrap_or_else(PoisonError::into_inner);
            if *left == 0 {
                return;
            }
            *left -= 1;
        }
        let mut totals = BTreeMap::new();
        for engine in engines.values_mut() {
            run_shuffled_sweep(engine, params, rng);
            accumulate(&mut totals, engine.overlaps());
        }
        let mut stat = stat.lock().unwrap_or_else(PoisonError::into_inner);
        for (&mult, &len) in &totals {
            stat.add(mult, len, false);
        }
    }
}

fn run_sweep(engine: &mut ShuffleEngine, params: &PermutationParams) -> usize {
    if params.uniregion {
        engine.find_union_overlaps(params.ovlen, params.minmult, params.maxmult, params.extension)
    } else {
        engine.find_overlaps(
            params.ovlen,
            params.minmult,
            params.maxmult,
            params.extension,
            !params.nointrack,
        )
    }
}

fn run_shuffled_sweep(
    engine: &mut ShuffleEngine,
    params: &PermutationParams,
    rng: &mut StdRng,
) -> usize {
    if params.uniregion {
        engine.shuffle_union_overlaps(
            rng,
            params.ovlen,
            params.minmult,
            params.maxmult,
            params.extension,
        )
    } else {
        engine.shuffle_overlaps(
            rng,
            params.ovlen,
            params.minmult,
            params.maxmult,
            params.extension,
            !params.nointrack,
        )
    }
}

/// Fold one sweep's per-multiplicity total segment lengths into `totals`.
fn accumulate(totals: &mut BTreeMap<u32, f64>, regions: &[MultiRegion]) {
    for region in regions {
        *totals.entry(region.multiplicity()).or_insert(0.0) += region.length() as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use movl_core::Interval;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::errors::StatsError;
    use crate::free::FreeRegions;

    fn three_track_engine() -> ShuffleEngine {
        let free = FreeRegions::new(vec![Interval::with_coords(1, 100_000)]);
        let mut engine = ShuffleEngine::new(free);
        engine.add(Interval::with_coords(100, 600), 1, false);
        engine.add(Interval::with_coords(200, 500), 2, true);
        engine.add(Interval::with_coords(300, 400), 3, true);
        engine
    }

    fn three_track_map() -> BTreeMap<String, ShuffleEngine> {
        BTreeMap::from([("chr1".to_string(), three_track_engine())])
    }

    #[rstest]
    fn test_actual_values_without_rounds() {
        let mut engines = three_track_map();
        let params = PermutationParams {
            minmult: 2,
            reshufflings: 0,
            ..Default::default()
        };
        let stat = shuffle_significance(&mut engines, &params);
        assert_eq!(stat.multiplicities(), vec![2, 3]);
        assert_eq!(stat.distr(2).unwrap().actual(), Some(200.0));
        assert_eq!(stat.distr(3).unwrap().actual(), Some(101.0));
        // no permutation rounds ran, so the null models cannot answer
        assert_eq!(stat.distr(2).unwrap().p_value(), Err(StatsError::Empty));
    }

    #[rstest]
    fn test_actual_pass_results_stay_in_engines() {
        let mut engines = three_track_map();
        let params = PermutationParams {
            minmult: 2,
            reshufflings: 16,
            threads: 2,
            ..Default::default()
        };
        shuffle_significance(&mut engines, &params);
        // the caller's engines keep the unshuffled results for the writers
        let regions = engines["chr1"].overlaps();
        let spans: Vec<(u32, u32)> = regions.iter().map(|r| (r.first(), r.last())).collect();
        assert_eq!(spans, vec![(200, 299), (300, 400), (401, 500)]);
        assert_eq!(count_overlaps(&engines).to_string(), "1,2:2 1,2,3:1");
    }

    #[rstest]
    #[case(1)]
    #[case(4)]
    fn test_actual_values_independent_of_threads(#[case] threads: usize) {
        let mut engines = three_track_map();
        let params = PermutationParams {
            minmult: 2,
            reshufflings: 8,
            threads,
            ..Default::default()
        };
        let stat = shuffle_significance(&mut engines, &params);
        assert_eq!(stat.distr(2).unwrap().actual(), Some(200.0));
        assert_eq!(stat.distr(3).unwrap().actual(), Some(101.0));
    }

    /// Two movable intervals too long to avoid each other: every round
    /// produces a multiplicity-2 segment of at least 200 positions.
    fn crowded_map() -> BTreeMap<String, ShuffleEngine> {
        let free = FreeRegions::new(vec![Interval::with_coords(1, 700)]);
        let mut engine = ShuffleEngine::new(free);
        engine.add(Interval::with_coords(1, 500), 1, true);
        engine.add(Interval::with_coords(301, 700), 2, true);
        BTreeMap::from([("chr1".to_string(), engine)])
    }

    #[rstest]
    fn test_null_model_fed_every_round() {
        let mut engines = crowded_map();
        let params = PermutationParams {
            minmult: 2,
            reshufflings: 20,
            threads: 2,
            ..Default::default()
        };
        let stat = shuffle_significance(&mut engines, &params);
        let distr = stat.distr(2).unwrap();
        assert_eq!(distr.null().len(), 20);
        assert!(distr.valid());
        assert_eq!(distr.actual(), Some(200.0));
        let p = distr.p_value().unwrap();
        assert!((0.0..=0.5).contains(&p));
    }

    #[rstest]
    fn test_single_thread_runs_are_reproducible() {
        let params = PermutationParams {
            minmult: 2,
            reshufflings: 10,
            threads: 1,
            seed: 7,
            ..Default::default()
        };
        let stat_a = shuffle_significance(&mut crowded_map(), &params);
        let stat_b = shuffle_significance(&mut crowded_map(), &params);
        assert_eq!(
            stat_a.distr(2).unwrap().p_value().unwrap(),
            stat_b.distr(2).unwrap().p_value().unwrap()
        );
    }

    #[rstest]
    fn test_union_mode() {
        let mut engines = three_track_map();
        let params = PermutationParams {
            minmult: 3,
            maxmult: 3,
            uniregion: true,
            reshufflings: 0,
            ..Default::default()
        };
        let stat = shuffle_significance(&mut engines, &params);
        assert_eq!(stat.distr(3).unwrap().actual(), Some(501.0));
        let regions = engines["chr1"].overlaps();
        assert_eq!(regions.len(), 1);
        assert_eq!((regions[0].first(), regions[0].last()), (100, 600));
    }
}
