//! # Configuration Module
//!
//! User-facing configuration for a slicing run and its validation.

pub mod config;

pub use config::SliceConfig;
