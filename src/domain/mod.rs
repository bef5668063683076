//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - sourced rows and normalized measurements (`RawRow`, `DataPoint`, `Series`)
//! - metadata and source descriptors (`MetaHint`, `ExerciseMeta`, `SourceDescriptor`)
//! - manifest wire entries and the presentation tuple (`ManifestEntry`, `ExerciseView`)

pub mod types;

pub use types::*;
