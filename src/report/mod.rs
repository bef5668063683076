//! Terminal reports: cycle summary and per-exercise captions.

pub mod format;

pub use format::*;
