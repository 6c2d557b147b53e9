//! # Bikeshare Graphs
//!
//! Loads a bike rental dataset, derives the dashboard's summary views and
//! renders them as charts on a static dashboard page.
//!
//! The aggregation pipeline ([`aggregator`]) is pure: it takes an immutable
//! [`RentalDataset`] by reference and performs no I/O. Loading, rendering and
//! writing live in [`dataset`], [`renderer`], [`dashboard`] and [`manager`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod dashboard;
pub mod dataset;
pub mod manager;
pub mod renderer;
pub mod types;

pub use aggregator::*;
pub use dashboard::*;
pub use dataset::*;
pub use manager::*;
pub use renderer::*;
pub use types::*;
