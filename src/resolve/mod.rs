//! Resolution of "what to render" and "how to label it".
//!
//! - configured exercise sections (`layout`)
//! - ordered source strategies: manifest, then layout (`sources`)
//! - per-field display metadata priority chain (`meta`)

pub mod layout;
pub mod meta;
pub mod sources;

pub use layout::*;
pub use meta::*;
pub use sources::*;
