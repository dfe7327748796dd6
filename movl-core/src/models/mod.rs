pub mod ancestor;
pub mod interval;
pub mod multi_region;
pub mod strand;

// re-export for cleaner imports
pub use self::ancestor::AncestorRegion;
pub use self::interval::Interval;
pub use self::multi_region::MultiRegion;
pub use self::strand::Strand;
