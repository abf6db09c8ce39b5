//! Command implementations for the Curator CLI.

pub mod aggregate;
pub mod config;
pub mod run;
