//! `exercise-progress` library crate.
//!
//! The binary (`xp`) is a thin wrapper around this library so that:
//!
//! - the ingestion pipeline is testable without spawning processes
//! - a different front-end can reuse the same `ExerciseView` output

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod resolve;
pub mod video;
