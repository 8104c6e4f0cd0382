//! Core library for the `route-metrics` CLI.
//!
//! This crate provides the building blocks used by the binary: a chunked
//! line reader, the run aggregator, latency statistics, template bucketing,
//! and the csv/json reporters. The primary user-facing interface is the
//! `route-metrics` command-line application; library APIs may evolve as the
//! CLI grows.
pub mod args;
pub mod config;
pub mod error;
pub mod processor;
pub mod reader;
pub mod report;
pub mod stats;
pub mod template;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;
