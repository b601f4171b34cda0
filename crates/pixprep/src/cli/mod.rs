//! Command implementations for the pixprep CLI.

pub mod config;
pub mod convert;
pub mod plot;
