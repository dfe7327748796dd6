//! Permutation testing of multiple overlaps among genomic interval tracks.
//!
//! The overlap engines in [`movl-overlaps`](https://crates.io/crates/movl-overlaps)
//! report *where* tracks overlap; this crate answers *whether the overlap
//! pattern means anything*. Movable ancestors are repeatedly re-placed at
//! random inside permitted free space ([`FreeRegions`], [`ShuffleEngine`])
//! and each round's per-multiplicity total overlap length feeds an empirical
//! null model ([`EmpiricalDistribution`], [`Stat`]), from which the observed
//! pattern gets a two-sided p-value and a z-score.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use movl_core::Interval;
//! use movl_permtest::{FreeRegions, PermutationParams, ShuffleEngine, shuffle_significance};
//!
//! let free = FreeRegions::new(vec![Interval::with_coords(1, 100_000)]);
//! let mut engine = ShuffleEngine::new(free);
//! engine.add(Interval::with_coords(100, 600), 1, false);
//! engine.add(Interval::with_coords(200, 500), 2, true);
//!
//! let mut engines = BTreeMap::from([("chr1".to_string(), engine)]);
//! let params = PermutationParams {
//!     minmult: 2,
//!     reshufflings: 20,
//!     ..Default::default()
//! };
//! let stat = shuffle_significance(&mut engines, &params);
//!
//! // the observed overlap [200, 500] spans 301 positions
//! assert_eq!(stat.distr(2).unwrap().actual(), Some(301.0));
//! ```
//!
//! The permutation rounds are embarrassingly parallel: set
//! [`PermutationParams::threads`] and each worker runs rounds on its own deep
//! copy of the engine map, drawing work from a shared countdown.

pub mod driver;
pub mod empirical;
pub mod errors;
pub mod free;
pub mod shuffle;
pub mod stat;

// re-exports
pub use self::driver::{DEFAULT_SEED, PermutationParams, count_overlaps, shuffle_significance};
pub use self::empirical::EmpiricalDistribution;
pub use self::errors::{PlacementError, StatsError};
pub use self::free::FreeRegions;
pub use self::shuffle::ShuffleEngine;
pub use self::stat::{Distr, Stat};
