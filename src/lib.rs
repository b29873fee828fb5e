//! Filter/aggregate engine behind dropdown-driven score views.
//!
//! A [`model::Dataset`] is loaded once and shared read-only. Each
//! [`model::FilterGroup`] derives its selectable values from it, and a
//! [`pipeline::controller::ViewController`] turns the group's current
//! [`model::Selection`] into a histogram and a table.

pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;

pub use error::Error;
