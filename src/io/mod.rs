//! Input/output helpers.
//!
//! - CSV text -> rows (`tabular`)
//! - rows -> typed points (`normalize`)
//! - points -> per-exercise series (`group`)
//! - presentation export to JSON (`export`)

pub mod export;
pub mod group;
pub mod normalize;
pub mod tabular;

pub use export::*;
pub use group::*;
pub use normalize::*;
pub use tabular::*;
