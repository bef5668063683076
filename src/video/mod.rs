//! Video reference handling: raw link -> canonical embed URL.

pub mod embed;

pub use embed::*;
