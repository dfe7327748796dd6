//! Sweep-line detection of multiple overlaps among genomic interval tracks.
//!
//! The central type is [`OverlapEngine`]: it owns the labeled input
//! intervals ("ancestors") of one chromosome/contig and converts them into a
//! sequence of multiplicity-homogeneous overlap segments with full ancestry,
//! under a configurable acceptance [`Filter`].
//!
//! ## Quick Start
//!
//! ```rust
//! use movl_core::Interval;
//! use movl_overlaps::OverlapEngine;
//!
//! // three tracks on one contig
//! let mut engine = OverlapEngine::new();
//! engine.add(Interval::with_coords(100, 600), 1, false);
//! engine.add(Interval::with_coords(200, 500), 2, false);
//! engine.add(Interval::with_coords(300, 400), 3, false);
//!
//! // segments where at least two distinct tracks overlap
//! let accepted = engine.find_overlaps(1, 2, 0, 0, false);
//! assert_eq!(accepted, 3);
//!
//! for region in engine.overlaps() {
//!     println!(
//!         "{}-{} x{}: {}",
//!         region.first(),
//!         region.last(),
//!         region.multiplicity(),
//!         region.ancestor_str()
//!     );
//! }
//! ```
//!
//! Two sweep variants are provided: [`OverlapEngine::find_overlaps`]
//! partitions every covered position into maximal constant-multiplicity
//! runs, while [`OverlapEngine::find_union_overlaps`] merges each connected
//! stretch of coverage into one region whose multiplicity is the deepest
//! overlap seen within it.

pub mod counter;
pub mod engine;
pub mod filter;
pub mod limit;

// re-exports
pub use self::counter::Counter;
pub use self::engine::OverlapEngine;
pub use self::filter::Filter;
pub use self::limit::RegionLimit;
