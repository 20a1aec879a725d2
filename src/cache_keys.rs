//! Centralized cache key constants.
//!
//! All cache keys used by controllers and the snapshot refresher are
//! defined here to prevent duplication and drift between the two
//! locations. Keys scoped to a DAO or period are built by the helpers in
//! `crate::helpers`.

pub const SNAPSHOT_GLOBAL: &str = "snapshot_global";
pub const BENCHMARKS: &str = "benchmarks";
