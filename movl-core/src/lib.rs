//! Core data model for movl: detection of multiple overlaps among genomic
//! interval tracks.
//!
//! This crate holds the plain data types shared by the sweep machinery
//! ([`movl-overlaps`](https://crates.io/crates/movl-overlaps)) and the
//! permutation-testing layer. It performs no I/O and owns no algorithms:
//! readers populate these types, the engines transform them, writers render
//! them.
//!
//! Coordinates are 1-based and inclusive on both ends: the interval
//! `[100, 200]` covers 101 positions. The all-zero interval `[0, 0]` is the
//! empty interval with length 0.
//!
//! Enable the `serde` feature to derive `Serialize`/`Deserialize` on every
//! model, so ancestor lists and computed overlap regions round-trip through
//! whatever archival format a collaborator chooses.

pub mod models;

pub use models::{AncestorRegion, Interval, MultiRegion, Strand};
