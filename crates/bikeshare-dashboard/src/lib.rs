//! # Bikeshare Dashboard
//!
//! Command line application that turns a bike rental dataset into a static
//! dashboard of charts.
//!
//! This is the binary crate wiring configuration, logging and the
//! aggregation pipeline together.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;

pub use app::*;
pub use cli::*;
pub use error::*;
