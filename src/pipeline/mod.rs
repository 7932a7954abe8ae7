//! End-to-end runs over the configured feature tables
//!
//! [`Dataset`] turns the raw train/test tables into aligned feature
//! matrices; [`Pipeline`] runs the single-fit and feature-search drivers on
//! top of it.

mod dataset;
mod runner;

pub use dataset::Dataset;
pub use runner::{Pipeline, RunReport};
